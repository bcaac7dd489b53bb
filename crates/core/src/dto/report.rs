use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Course, EventKey};

/// A near-miss: best eligible time within the swimmer's target percentage
/// of a qualifying time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetRace {
    pub competition_id: String,
    pub competition_name: String,
    pub event: EventKey,
    pub best_time_ms: i64,
    pub is_converted: bool,
    pub qualifying_time_ms: i64,
    pub gap_ms: i64,
    pub gap_pct: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MissingReason {
    /// No swim at all for the event.
    NoTimeRecorded,
    /// Swims exist but none inside the qualifying period. Carries the best
    /// swim regardless of date, converted to the competition course.
    OutsidePeriod {
        best_time_ms: i64,
        is_converted: bool,
        date: NaiveDate,
        gap_ms: i64,
        gap_pct: Decimal,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingRace {
    pub competition_id: String,
    pub competition_name: String,
    pub event: EventKey,
    pub qualifying_time_ms: i64,
    pub reason: MissingReason,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressionPoint {
    pub date: NaiveDate,
    pub time_ms: i64,
    pub normalized_ms: i64,
    /// Normalized time per 25 m length.
    pub pace_ms: i64,
    pub course: Course,
    pub meet_name: Option<String>,
    /// Fastest normalized swim of the series.
    pub is_best: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StalenessEntry {
    pub event: EventKey,
    pub pb_date: NaiveDate,
    pub weeks_since_pb: i64,
    pub last_swim_date: NaiveDate,
    pub weeks_since_last: i64,
    pub is_different: bool,
}

/// A competition qualifying time expressed in a display course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetStandard {
    pub competition_id: String,
    pub competition_name: String,
    pub time_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GapToTarget {
    /// No swims or no applicable standards for the event.
    NoData,
    QualifiedAll { best_time_ms: i64 },
    Outstanding {
        best_time_ms: i64,
        target_ms: i64,
        gap_ms: i64,
    },
}
