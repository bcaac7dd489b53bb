pub mod age;
pub mod course;
pub mod personal_best;
pub mod qualification;
pub mod reconcile;
pub mod standards;
pub mod standards_builder;
pub mod time_codec;
