pub mod competition;
pub mod event;
pub mod record;
pub mod standards;
pub mod swimmer;

pub use competition::{Competition, QualifyingPeriod};
pub use event::{Course, Distance, EventKey, Stroke, SwimEvent};
pub use record::SwimTimeRecord;
pub use standards::{AgeGroup, QualifyingStandards, StandardSet, StandardsTable, Tier};
pub use swimmer::{Sex, Swimmer, default_target_percentage};
