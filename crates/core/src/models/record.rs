use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::event::SwimEvent;
use crate::error::Result;
use crate::services::time_codec::{format_time, parse_time};

/// A single recorded swim.
///
/// `time_ms` and `formatted_time` always describe the same time: the
/// constructors and [`SwimTimeRecord::set_time`] derive one from the other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwimTimeRecord {
    pub id: Uuid,
    pub date: NaiveDate,
    pub time_ms: i64,
    pub formatted_time: String,
    pub event: SwimEvent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meet_name: Option<String>,
    #[serde(default)]
    pub is_official: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl SwimTimeRecord {
    /// Builds a record from the time text a swimmer typed or a results page showed.
    pub fn new(date: NaiveDate, time_text: &str, event: SwimEvent) -> Result<Self> {
        let time_ms = parse_time(time_text)?;
        Ok(Self {
            id: Uuid::new_v4(),
            date,
            time_ms,
            formatted_time: format_time(time_ms)?,
            event,
            meet_name: None,
            is_official: false,
            notes: None,
        })
    }

    /// Builds a record from a millisecond value, truncated to hundredths so
    /// that the stored text and value agree.
    pub fn from_millis(date: NaiveDate, time_ms: i64, event: SwimEvent) -> Result<Self> {
        let formatted_time = format_time(time_ms)?;
        Ok(Self {
            id: Uuid::new_v4(),
            date,
            time_ms: parse_time(&formatted_time)?,
            formatted_time,
            event,
            meet_name: None,
            is_official: false,
            notes: None,
        })
    }

    pub fn with_meet(mut self, meet_name: impl Into<String>) -> Self {
        self.meet_name = Some(meet_name.into());
        self
    }

    pub fn official(mut self) -> Self {
        self.is_official = true;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Replaces the time, keeping both representations in step.
    pub fn set_time(&mut self, time_text: &str) -> Result<()> {
        let time_ms = parse_time(time_text)?;
        self.formatted_time = format_time(time_ms)?;
        self.time_ms = time_ms;
        Ok(())
    }

    /// True when `formatted_time` parses back to `time_ms`.
    pub fn is_consistent(&self) -> bool {
        parse_time(&self.formatted_time).is_ok_and(|ms| ms == self.time_ms)
    }
}
