use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::event::Course;
use super::standards::StandardsTable;
use crate::error::{CoreError, Result};

/// Inclusive date window in which swims count towards qualification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPeriod")]
pub struct QualifyingPeriod {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawPeriod {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawPeriod> for QualifyingPeriod {
    type Error = CoreError;

    fn try_from(raw: RawPeriod) -> Result<Self> {
        Self::new(raw.start, raw.end)
    }
}

impl QualifyingPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(CoreError::InvalidPeriod { start, end });
        }
        Ok(Self { start, end })
    }

    /// Single-day window, as produced for legacy competitions that only had a date.
    pub fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub qualifying_period: Option<QualifyingPeriod>,
    #[serde(default)]
    pub age_at_date: Option<NaiveDate>,
    #[serde(default)]
    pub course: Course,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    #[serde(default)]
    pub standards: StandardsTable,
}

impl Competition {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            qualifying_period: None,
            age_at_date: None,
            course: Course::default(),
            requirements: None,
            standards: StandardsTable::default(),
        }
    }

    pub fn with_period(mut self, period: QualifyingPeriod) -> Self {
        self.qualifying_period = Some(period);
        self
    }

    pub fn with_age_at_date(mut self, date: NaiveDate) -> Self {
        self.age_at_date = Some(date);
        self
    }

    pub fn with_course(mut self, course: Course) -> Self {
        self.course = course;
        self
    }

    pub fn with_standards(mut self, standards: StandardsTable) -> Self {
        self.standards = standards;
        self
    }

    /// True when the date falls inside the qualifying window, or when the
    /// competition has no window at all.
    pub fn accepts_date(&self, date: NaiveDate) -> bool {
        self.qualifying_period
            .is_none_or(|period| period.contains(date))
    }
}
