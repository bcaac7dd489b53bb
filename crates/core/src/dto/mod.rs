pub mod report;
pub mod requests;

pub use report::{
    GapToTarget, MissingRace, MissingReason, ProgressionPoint, StalenessEntry, TargetRace,
    TargetStandard,
};
pub use requests::{CompetitionRequest, CreateSwimmerRequest, ProfileUpdate, TimeEntryRequest};
