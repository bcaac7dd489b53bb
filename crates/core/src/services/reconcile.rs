//! Folding imported swims into an existing history.
//!
//! Both strategies are pure: the existing list is never touched, a new list
//! is returned alongside the count the caller reports back to the user.

use std::collections::HashSet;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::models::{Course, Distance, Stroke, SwimTimeRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    #[default]
    Merge,
    Overwrite,
}

impl FromStr for ImportMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "merge" => Ok(Self::Merge),
            "overwrite" => Ok(Self::Overwrite),
            _ => Err(CoreError::InvalidFormat(format!("Unknown import mode: {s}"))),
        }
    }
}

/// Exact identity of a swim: same day, event, course and time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExactSignature {
    date: NaiveDate,
    stroke: Stroke,
    distance: Distance,
    course: Course,
    time_ms: i64,
}

impl From<&SwimTimeRecord> for ExactSignature {
    fn from(record: &SwimTimeRecord) -> Self {
        Self {
            date: record.date,
            stroke: record.event.stroke,
            distance: record.event.distance,
            course: record.event.course,
            time_ms: record.time_ms,
        }
    }
}

/// Looser identity used when overwriting: course and time are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DaySignature {
    date: NaiveDate,
    stroke: Stroke,
    distance: Distance,
}

impl From<&SwimTimeRecord> for DaySignature {
    fn from(record: &SwimTimeRecord) -> Self {
        Self {
            date: record.date,
            stroke: record.event.stroke,
            distance: record.event.distance,
        }
    }
}

/// Appends incoming swims whose exact signature is not already in
/// `existing`. Returns the merged list and the number appended.
pub fn merge(existing: &[SwimTimeRecord], incoming: &[SwimTimeRecord]) -> (Vec<SwimTimeRecord>, usize) {
    let known: HashSet<ExactSignature> = existing.iter().map(ExactSignature::from).collect();
    let mut merged = existing.to_vec();
    let before = merged.len();
    merged.extend(
        incoming
            .iter()
            .filter(|record| !known.contains(&ExactSignature::from(*record)))
            .cloned(),
    );
    let added = merged.len() - before;
    (merged, added)
}

/// Drops every existing swim sharing a day signature with an incoming one,
/// then appends all incoming swims. The count is always `incoming.len()`.
pub fn overwrite(
    existing: &[SwimTimeRecord],
    incoming: &[SwimTimeRecord],
) -> (Vec<SwimTimeRecord>, usize) {
    let replaced: HashSet<DaySignature> = incoming.iter().map(DaySignature::from).collect();
    let mut merged: Vec<SwimTimeRecord> = existing
        .iter()
        .filter(|record| !replaced.contains(&DaySignature::from(*record)))
        .cloned()
        .collect();
    merged.extend(incoming.iter().cloned());
    (merged, incoming.len())
}

pub fn reconcile(
    mode: ImportMode,
    existing: &[SwimTimeRecord],
    incoming: &[SwimTimeRecord],
) -> (Vec<SwimTimeRecord>, usize) {
    match mode {
        ImportMode::Merge => merge(existing, incoming),
        ImportMode::Overwrite => overwrite(existing, incoming),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SwimEvent;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn swim(stroke: Stroke, course: Course, time: &str, on: NaiveDate) -> SwimTimeRecord {
        SwimTimeRecord::new(on, time, SwimEvent::new(stroke, Distance::M50, course)).unwrap()
    }

    fn history() -> Vec<SwimTimeRecord> {
        vec![
            swim(Stroke::Freestyle, Course::LongCourse, "31.00", date(2024, 1, 1)),
            swim(Stroke::Backstroke, Course::ShortCourse, "36.00", date(2024, 2, 1)),
        ]
    }

    #[test]
    fn test_merge_empty_incoming_is_noop() {
        let existing = history();
        let (merged, added) = merge(&existing, &[]);
        assert_eq!(merged, existing);
        assert_eq!(added, 0);
    }

    #[test]
    fn test_merge_ignores_exact_duplicates() {
        let existing = history();
        // Fresh ids, same signatures.
        let incoming = history();
        let (merged, added) = merge(&existing, &incoming);
        assert_eq!(merged, existing);
        assert_eq!(added, 0);
    }

    #[test]
    fn test_merge_appends_new_swims() {
        let existing = history();
        let faster = swim(Stroke::Freestyle, Course::LongCourse, "30.80", date(2024, 1, 1));
        let incoming = vec![existing[0].clone(), faster.clone()];

        let (merged, added) = merge(&existing, &incoming);
        assert_eq!(added, 1);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[2], faster);
        assert_eq!(existing.len(), 2);
    }

    #[test]
    fn test_overwrite_replaces_same_day_event_regardless_of_time() {
        let existing = history();
        let corrected = swim(Stroke::Freestyle, Course::ShortCourse, "29.90", date(2024, 1, 1));
        let unrelated = swim(Stroke::Butterfly, Course::LongCourse, "35.00", date(2024, 3, 1));
        let incoming = vec![corrected.clone(), unrelated.clone()];

        let (merged, count) = overwrite(&existing, &incoming);
        assert_eq!(count, 2);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0], existing[1]);
        assert_eq!(merged[1], corrected);
        assert_eq!(merged[2], unrelated);
    }

    #[test]
    fn test_overwrite_empty_incoming_is_noop() {
        let existing = history();
        let (merged, count) = overwrite(&existing, &[]);
        assert_eq!(merged, existing);
        assert_eq!(count, 0);
    }

    #[test]
    fn test_import_mode_from_str() {
        assert_eq!("Merge".parse::<ImportMode>().unwrap(), ImportMode::Merge);
        assert_eq!("overwrite".parse::<ImportMode>().unwrap(), ImportMode::Overwrite);
        assert!("replace".parse::<ImportMode>().is_err());
    }

    #[test]
    fn test_reconcile_dispatches_on_mode() {
        let existing = history();
        let incoming = history();
        assert_eq!(reconcile(ImportMode::Merge, &existing, &incoming).1, 0);
        assert_eq!(reconcile(ImportMode::Overwrite, &existing, &incoming).1, 2);
    }
}
