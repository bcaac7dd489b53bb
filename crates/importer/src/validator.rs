use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::warn;

use swim_core::models::{Distance, Stroke, SwimTimeRecord};
use swim_core::services::reconcile::ExactSignature;

use crate::candidate::ImportCandidate;

/// Screens import candidates before they reach the reconciler. Candidates
/// with errors are dropped; warnings are informational.
pub struct ImportValidator {
    today: NaiveDate,
}

impl ImportValidator {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    pub fn screen(&self, candidates: Vec<ImportCandidate>) -> (Vec<SwimTimeRecord>, ValidationReport) {
        let mut report = ValidationReport::default();
        let mut records = Vec::with_capacity(candidates.len());
        let mut seen = HashSet::new();

        for candidate in candidates {
            let label = format!(
                "{} {}m {} on {}",
                candidate.course, candidate.distance, candidate.stroke, candidate.date
            );

            if candidate.date > self.today {
                report
                    .errors
                    .push(format!("'{}' is dated in the future", label));
                continue;
            }

            if candidate.meet_name.as_deref().is_none_or(|name| name.trim().is_empty()) {
                report
                    .warnings
                    .push(format!("'{}' has no meet name", label));
            }

            if !is_standard_event(candidate.stroke, candidate.distance) {
                report
                    .warnings
                    .push(format!("'{}' is not a standard pool event", label));
            }

            let time_text = candidate.time_text.clone();
            let record = match candidate.into_record() {
                Ok(record) => record,
                Err(e) => {
                    report
                        .errors
                        .push(format!("'{}' has unreadable time '{}': {}", label, time_text, e));
                    continue;
                }
            };

            if record.time_ms <= 0 {
                report
                    .errors
                    .push(format!("'{}' has a zero time", label));
                continue;
            }

            if !seen.insert(ExactSignature::from(&record)) {
                report
                    .warnings
                    .push(format!("'{}' {} appears more than once", label, record.formatted_time));
            }

            records.push(record);
        }

        (records, report)
    }
}

fn is_standard_event(stroke: Stroke, distance: Distance) -> bool {
    match stroke {
        Stroke::Freestyle => true,
        Stroke::Backstroke | Stroke::Breaststroke | Stroke::Butterfly => {
            matches!(distance, Distance::M25 | Distance::M50 | Distance::M100 | Distance::M200)
        }
        Stroke::IndividualMedley => {
            matches!(distance, Distance::M100 | Distance::M200 | Distance::M400)
        }
    }
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            warn!("{}", warning);
        }
    }

    pub fn log_errors(&self) {
        for error in &self.errors {
            warn!("Dropped: {}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swim_core::models::Course;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn candidate(stroke: Stroke, distance: Distance, time: &str, on: NaiveDate) -> ImportCandidate {
        ImportCandidate {
            stroke,
            distance,
            course: Course::LongCourse,
            date: on,
            time_text: time.to_string(),
            meet_name: Some("County Champs".to_string()),
        }
    }

    #[test]
    fn test_screen_keeps_valid_candidates() {
        let validator = ImportValidator::new(date(2025, 1, 1));
        let (records, report) = validator.screen(vec![
            candidate(Stroke::Freestyle, Distance::M50, "30.12", date(2024, 6, 1)),
            candidate(Stroke::IndividualMedley, Distance::M200, "2:41.90", date(2024, 6, 2)),
        ]);
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|record| record.is_official));
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_screen_drops_errors() {
        let validator = ImportValidator::new(date(2025, 1, 1));
        let (records, report) = validator.screen(vec![
            candidate(Stroke::Freestyle, Distance::M50, "30.12", date(2025, 6, 1)),
            candidate(Stroke::Freestyle, Distance::M50, "NT", date(2024, 6, 1)),
            candidate(Stroke::Freestyle, Distance::M50, "00.00", date(2024, 6, 1)),
        ]);
        assert!(records.is_empty());
        assert_eq!(report.errors.len(), 3);
    }

    #[test]
    fn test_screen_warnings_do_not_drop() {
        let validator = ImportValidator::new(date(2025, 1, 1));
        let mut unnamed = candidate(Stroke::Breaststroke, Distance::M400, "6:30.00", date(2024, 6, 1));
        unnamed.meet_name = None;
        let duplicate = candidate(Stroke::Freestyle, Distance::M50, "30.12", date(2024, 6, 1));

        let (records, report) = validator.screen(vec![unnamed, duplicate.clone(), duplicate]);
        assert_eq!(records.len(), 3);
        assert_eq!(report.warnings.len(), 3);
        assert!(report.errors.is_empty());
    }
}
