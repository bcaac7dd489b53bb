pub mod candidate;
pub mod config;
pub mod csv_standards;
pub mod error;
pub mod sources;
pub mod stroke_mapper;
pub mod traits;
pub mod validator;

pub use candidate::ImportCandidate;
pub use config::Config;
pub use error::{ImporterError, Result};
pub use stroke_mapper::StrokeMapper;
pub use traits::TimesSource;
pub use validator::{ImportValidator, ValidationReport};

pub use sources::swimmingresults::{SwimmingResultsClient, SwimmingResultsImporter};
