use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::Result;
use crate::models::{
    Competition, Course, Distance, QualifyingPeriod, Sex, Stroke, SwimEvent, SwimTimeRecord,
};
use crate::services::time_codec::parse_time;

/// Request payload for creating a new swimmer
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSwimmerRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,

    pub sex: Sex,

    pub date_of_birth: Option<NaiveDate>,

    #[validate(custom(function = "validate_member_number"))]
    pub member_number: Option<String>,
}

/// Request payload for updating a swimmer's profile
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,

    pub sex: Option<Sex>,

    pub date_of_birth: Option<NaiveDate>,

    #[validate(custom(function = "validate_member_number"))]
    pub member_number: Option<String>,

    #[validate(custom(function = "validate_target_percentage"))]
    pub target_percentage: Option<Decimal>,
}

/// Request payload for recording or editing one swim
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntryRequest {
    pub date: NaiveDate,

    #[validate(custom(function = "validate_time_text"))]
    pub time: String,

    pub stroke: Stroke,

    pub distance: Distance,

    pub course: Course,

    #[validate(length(max = 255))]
    pub meet_name: Option<String>,

    #[serde(default)]
    pub is_official: bool,

    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

/// Request payload for creating or replacing a competition
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_period"))]
pub struct CompetitionRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,

    pub qualifying_start: Option<NaiveDate>,

    pub qualifying_end: Option<NaiveDate>,

    pub age_at_date: Option<NaiveDate>,

    #[serde(default)]
    pub course: Course,

    #[validate(length(max = 2000))]
    pub requirements: Option<String>,
}

// Validation helpers
fn validate_member_number(member_number: &str) -> std::result::Result<(), ValidationError> {
    if !member_number.is_empty() && member_number.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_member_number"))
    }
}

fn validate_target_percentage(value: &Decimal) -> std::result::Result<(), ValidationError> {
    if *value >= Decimal::ZERO && *value <= Decimal::ONE_HUNDRED {
        Ok(())
    } else {
        Err(ValidationError::new("target_percentage_out_of_range"))
    }
}

fn validate_time_text(text: &str) -> std::result::Result<(), ValidationError> {
    parse_time(text)
        .map(|_| ())
        .map_err(|_| ValidationError::new("invalid_time"))
}

fn validate_period(request: &CompetitionRequest) -> std::result::Result<(), ValidationError> {
    match (request.qualifying_start, request.qualifying_end) {
        (Some(start), Some(end)) if start > end => Err(ValidationError::new("invalid_period")),
        (Some(_), None) | (None, Some(_)) => Err(ValidationError::new("incomplete_period")),
        _ => Ok(()),
    }
}

impl TimeEntryRequest {
    pub fn event(&self) -> SwimEvent {
        SwimEvent::new(self.stroke, self.distance, self.course)
    }

    /// Validates and builds a record with a fresh id.
    pub fn into_record(self) -> Result<SwimTimeRecord> {
        self.validate()?;
        let mut record = SwimTimeRecord::new(self.date, &self.time, self.event())?;
        record.meet_name = self.meet_name.filter(|name| !name.trim().is_empty());
        record.is_official = self.is_official;
        record.notes = self.notes.filter(|notes| !notes.trim().is_empty());
        Ok(record)
    }
}

impl CompetitionRequest {
    pub fn qualifying_period(&self) -> Result<Option<QualifyingPeriod>> {
        match (self.qualifying_start, self.qualifying_end) {
            (Some(start), Some(end)) => Ok(Some(QualifyingPeriod::new(start, end)?)),
            _ => Ok(None),
        }
    }

    /// Validates and builds a competition with an empty standards table.
    pub fn into_competition(self, id: impl Into<String>) -> Result<Competition> {
        self.validate()?;
        let qualifying_period = self.qualifying_period()?;
        let mut competition = Competition::new(id, self.name).with_course(self.course);
        competition.qualifying_period = qualifying_period;
        competition.age_at_date = self.age_at_date;
        competition.requirements = self.requirements.filter(|text| !text.trim().is_empty());
        Ok(competition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(time: &str) -> TimeEntryRequest {
        TimeEntryRequest {
            date: date(2024, 5, 4),
            time: time.to_string(),
            stroke: Stroke::Butterfly,
            distance: Distance::M100,
            course: Course::ShortCourse,
            meet_name: Some("County Champs".to_string()),
            is_official: true,
            notes: Some("  ".to_string()),
        }
    }

    fn competition_request() -> CompetitionRequest {
        CompetitionRequest {
            name: "Regional Championships".to_string(),
            qualifying_start: Some(date(2025, 1, 1)),
            qualifying_end: Some(date(2025, 3, 31)),
            age_at_date: Some(date(2025, 12, 31)),
            course: Course::LongCourse,
            requirements: None,
        }
    }

    #[test]
    fn test_time_entry_into_record() {
        let record = entry("1:12.4").into_record().unwrap();
        assert_eq!(record.time_ms, 72_400);
        assert_eq!(record.formatted_time, "1:12.40");
        assert_eq!(record.meet_name.as_deref(), Some("County Champs"));
        assert!(record.is_official);
        assert_eq!(record.notes, None);
    }

    #[test]
    fn test_time_entry_rejects_bad_time() {
        let err = entry("1:xx.00").into_record().unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_profile_update_target_range() {
        let ok = ProfileUpdate {
            target_percentage: Some(dec!(7.5)),
            ..ProfileUpdate::default()
        };
        assert!(ok.validate().is_ok());

        let too_high = ProfileUpdate {
            target_percentage: Some(dec!(120)),
            ..ProfileUpdate::default()
        };
        assert!(too_high.validate().is_err());

        let bad_member = ProfileUpdate {
            member_number: Some("12ab".to_string()),
            ..ProfileUpdate::default()
        };
        assert!(bad_member.validate().is_err());
    }

    #[test]
    fn test_create_swimmer_requires_name() {
        let request = CreateSwimmerRequest {
            name: String::new(),
            sex: Sex::F,
            date_of_birth: None,
            member_number: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_competition_request_builds_competition() {
        let competition = competition_request().into_competition("regional").unwrap();
        let period = competition.qualifying_period.unwrap();
        assert_eq!(period.start(), date(2025, 1, 1));
        assert_eq!(period.end(), date(2025, 3, 31));
        assert_eq!(competition.course, Course::LongCourse);
        assert!(competition.standards.is_empty());
    }

    #[test]
    fn test_competition_request_rejects_reversed_period() {
        let mut request = competition_request();
        request.qualifying_start = Some(date(2025, 4, 1));
        assert!(request.validate().is_err());

        let mut half_open = competition_request();
        half_open.qualifying_end = None;
        assert!(half_open.validate().is_err());
    }

    #[test]
    fn test_competition_request_without_period() {
        let mut request = competition_request();
        request.qualifying_start = None;
        request.qualifying_end = None;
        let competition = request.into_competition("open").unwrap();
        assert!(competition.qualifying_period.is_none());
    }
}
