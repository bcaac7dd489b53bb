pub mod defaults;
pub mod dto;
pub mod error;
pub mod models;
pub mod services;

pub use error::{CoreError, Result};
pub use models::{
    AgeGroup, Competition, Course, Distance, EventKey, QualifyingPeriod, QualifyingStandards,
    Sex, StandardSet, StandardsTable, Stroke, SwimEvent, SwimTimeRecord, Swimmer, Tier,
};
pub use services::course::{CourseConverter, LinearCourseFactor};
