use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use swim_core::models::{Course, Distance, Stroke, SwimEvent, SwimTimeRecord};

pub const DEFAULT_MEET_NAME: &str = "Imported";

/// One swim as read from an external source, before it becomes a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportCandidate {
    pub stroke: Stroke,
    pub distance: Distance,
    pub course: Course,
    pub date: NaiveDate,
    pub time_text: String,
    pub meet_name: Option<String>,
}

impl ImportCandidate {
    pub fn event(&self) -> SwimEvent {
        SwimEvent::new(self.stroke, self.distance, self.course)
    }

    /// Builds an official record. Fails when the time text does not parse.
    pub fn into_record(self) -> swim_core::Result<SwimTimeRecord> {
        let meet_name = self
            .meet_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_MEET_NAME)
            .to_string();
        Ok(SwimTimeRecord::new(self.date, &self.time_text, self.event())?
            .with_meet(meet_name)
            .official())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(time: &str, meet: Option<&str>) -> ImportCandidate {
        ImportCandidate {
            stroke: Stroke::Backstroke,
            distance: Distance::M100,
            course: Course::ShortCourse,
            date: NaiveDate::from_ymd_opt(2024, 11, 9).unwrap(),
            time_text: time.to_string(),
            meet_name: meet.map(str::to_string),
        }
    }

    #[test]
    fn test_into_record_marks_official_and_defaults_meet() {
        let record = candidate("1:10.25", Some("  ")).into_record().unwrap();
        assert!(record.is_official);
        assert_eq!(record.time_ms, 70_250);
        assert_eq!(record.meet_name.as_deref(), Some(DEFAULT_MEET_NAME));
        assert_eq!(record.event.course, Course::ShortCourse);

        let named = candidate("1:10.25", Some("Essex Champs")).into_record().unwrap();
        assert_eq!(named.meet_name.as_deref(), Some("Essex Champs"));
    }

    #[test]
    fn test_into_record_rejects_bad_time() {
        assert!(candidate("DQ", None).into_record().is_err());
    }
}
