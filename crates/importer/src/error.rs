use thiserror::Error;

pub type Result<T> = std::result::Result<T, ImporterError>;

#[derive(Error, Debug)]
pub enum ImporterError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("HTTP error {status}: {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Membership number {0} not recognised or data hidden")]
    MemberNotRecognised(String),

    #[error("Failed to read CSV: {0}")]
    CsvError(#[from] csv::Error),

    #[error("CSV must contain Distance, Stroke, Age Group, Sex and Qualifying Time columns (missing {0})")]
    MissingColumn(&'static str),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    StorageError(#[from] storage::StorageError),

    #[error(transparent)]
    CoreError(#[from] swim_core::CoreError),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}
