use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid time format: {0}")]
    InvalidFormat(String),

    #[error("Invalid time value: {0}ms")]
    InvalidValue(i64),

    #[error("Invalid factor: {0} (must be positive)")]
    InvalidFactor(Decimal),

    #[error("Invalid qualifying period: {start} is after {end}")]
    InvalidPeriod { start: NaiveDate, end: NaiveDate },

    #[error("Unknown stroke: {0}")]
    UnknownStroke(String),

    #[error("Unsupported distance: {0}m")]
    UnsupportedDistance(u16),

    #[error("Invalid event key: {0}")]
    InvalidEventKey(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

pub type Result<T> = std::result::Result<T, CoreError>;
