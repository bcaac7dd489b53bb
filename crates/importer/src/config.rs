use std::str::FromStr;

use rust_decimal::Decimal;
use swim_core::services::course::DEFAULT_COURSE_FACTOR;

use crate::error::{ImporterError, Result};
use crate::sources::swimmingresults::{DEFAULT_BASE_URL, DEFAULT_BATCH_SIZE};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://swimqt.db?mode=rwc";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_url: String,
    pub results_base_url: String,
    pub import_batch_size: usize,
    pub course_factor: Decimal,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            results_base_url: DEFAULT_BASE_URL.to_string(),
            import_batch_size: DEFAULT_BATCH_SIZE,
            course_factor: DEFAULT_COURSE_FACTOR,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let import_batch_size = match lookup("IMPORT_BATCH_SIZE") {
            Some(raw) => parse_var::<usize>("IMPORT_BATCH_SIZE", &raw)?,
            None => defaults.import_batch_size,
        };
        if import_batch_size == 0 {
            return Err(ImporterError::ConfigError(
                "IMPORT_BATCH_SIZE must be a positive integer".to_string(),
            ));
        }

        let course_factor = match lookup("COURSE_FACTOR") {
            Some(raw) => parse_var::<Decimal>("COURSE_FACTOR", &raw)?,
            None => defaults.course_factor,
        };
        if course_factor <= Decimal::ZERO {
            return Err(ImporterError::ConfigError(
                "COURSE_FACTOR must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            results_base_url: lookup("RESULTS_BASE_URL").unwrap_or(defaults.results_base_url),
            import_batch_size,
            course_factor,
        })
    }
}

fn parse_var<T: FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| ImporterError::ConfigError(format!("{} has invalid value '{}'", name, raw)))
}
