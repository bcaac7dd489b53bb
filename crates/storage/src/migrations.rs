//! Shape migration of stored JSON snapshots.
//!
//! Runs on the untyped trees before they are decoded, so older layouts never
//! reach the typed model.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{info, warn};
use uuid::Uuid;

use swim_core::models::{AgeGroup, EventKey, Sex, Tier, default_target_percentage};

pub const SCHEMA_VERSION: i64 = 1;

/// Everything read from the snapshot store, undecoded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSnapshot {
    pub swimmers: Option<Value>,
    pub legacy_swimmer: Option<Value>,
    pub competitions: Option<Value>,
    pub standards: Option<Value>,
    pub session: Option<String>,
    pub schema_version: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeMigration {
    /// Single-swimmer blob turned into a one-element swimmer list.
    LegacySwimmer,
    /// Competition `date` turned into a one-day qualifying period.
    CompetitionDate,
    /// Empty-string dates turned into nulls.
    BlankDates,
    /// Record ids that are not UUIDs replaced with fresh ones.
    RecordIds,
    /// Standards in an older layout dropped in favour of the defaults.
    StandardsReset,
    /// Standards cells with an unknown sex, age group or event dropped.
    UnknownStandardsCells,
    /// Non-numeric or negative target percentages reset to the default.
    TargetPercentage,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub applied: Vec<ShapeMigration>,
    pub from_version: Option<i64>,
}

impl MigrationReport {
    pub fn is_empty(&self) -> bool {
        self.applied.is_empty() && self.from_version == Some(SCHEMA_VERSION)
    }

    fn record(&mut self, migration: ShapeMigration) {
        if !self.applied.contains(&migration) {
            self.applied.push(migration);
        }
    }
}

/// Brings a raw snapshot to the current shape. A `None` standards slot in
/// the result means the defaults should be used.
pub fn migrate(mut raw: RawSnapshot) -> (RawSnapshot, MigrationReport) {
    let mut report = MigrationReport {
        applied: Vec::new(),
        from_version: raw.schema_version,
    };

    let legacy = raw.legacy_swimmer.take();
    if raw.swimmers.is_none()
        && let Some(legacy) = legacy
    {
        raw.swimmers = Some(Value::Array(vec![legacy]));
        report.record(ShapeMigration::LegacySwimmer);
        info!("Migrated legacy swimmer data to multi-swimmer format");
    }

    if let Some(Value::Array(swimmers)) = raw.swimmers.as_mut() {
        for swimmer in swimmers.iter_mut().filter_map(Value::as_object_mut) {
            migrate_swimmer(swimmer, &mut report);
        }
    }

    if let Some(Value::Array(competitions)) = raw.competitions.as_mut() {
        for competition in competitions.iter_mut().filter_map(Value::as_object_mut) {
            migrate_competition(competition, &mut report);
        }
    }

    if raw.standards.as_ref().is_some_and(standards_outdated) {
        info!("Detected outdated standards format, resetting to defaults");
        raw.standards = None;
        report.record(ShapeMigration::StandardsReset);
    }

    if let Some(standards) = raw.standards.as_mut() {
        for tier in Tier::ALL {
            let Some(times) = standards
                .get_mut(tier.as_str())
                .and_then(|set| set.get_mut("times"))
            else {
                continue;
            };
            if prune_standards(times) > 0 {
                report.record(ShapeMigration::UnknownStandardsCells);
            }
        }
    }

    raw.schema_version = Some(SCHEMA_VERSION);
    (raw, report)
}

fn migrate_swimmer(swimmer: &mut Map<String, Value>, report: &mut MigrationReport) {
    if blank_to_null(swimmer, "dateOfBirth") {
        report.record(ShapeMigration::BlankDates);
    }
    if swimmer.get("memberNumber").and_then(Value::as_str) == Some("") {
        swimmer.remove("memberNumber");
    }

    if swimmer
        .get("targetPercentage")
        .is_some_and(|value| !is_valid_percentage(value))
    {
        warn!(swimmer = ?swimmer.get("id"), "Invalid target percentage, using the default");
        swimmer.insert(
            "targetPercentage".to_string(),
            Value::String(default_target_percentage().to_string()),
        );
        report.record(ShapeMigration::TargetPercentage);
    }

    if !swimmer.get("id").is_some_and(|id| id.is_string()) {
        let id = match swimmer.get("id") {
            Some(Value::Number(number)) => number.to_string(),
            _ => Uuid::new_v4().to_string(),
        };
        swimmer.insert("id".to_string(), Value::String(id));
    }

    let Some(Value::Array(times)) = swimmer.get_mut("times") else {
        return;
    };
    for record in times.iter_mut().filter_map(Value::as_object_mut) {
        let is_uuid = record
            .get("id")
            .and_then(Value::as_str)
            .is_some_and(|id| Uuid::parse_str(id).is_ok());
        if !is_uuid {
            record.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
            report.record(ShapeMigration::RecordIds);
        }
    }
}

fn migrate_competition(competition: &mut Map<String, Value>, report: &mut MigrationReport) {
    if let Some(date) = competition.remove("date") {
        let has_period = competition
            .get("qualifyingPeriod")
            .is_some_and(|period| !period.is_null());
        if !has_period && date.as_str().is_some_and(|text| !text.is_empty()) {
            let mut period = Map::new();
            period.insert("start".to_string(), date.clone());
            period.insert("end".to_string(), date);
            competition.insert("qualifyingPeriod".to_string(), Value::Object(period));
            report.record(ShapeMigration::CompetitionDate);
        }
    }

    if blank_to_null(competition, "ageAtDate") {
        report.record(ShapeMigration::BlankDates);
    }

    let blank_period = competition
        .get("qualifyingPeriod")
        .and_then(Value::as_object)
        .is_some_and(|period| {
            ["start", "end"]
                .iter()
                .any(|field| period.get(*field).and_then(Value::as_str).is_none_or(str::is_empty))
        });
    if blank_period {
        competition.insert("qualifyingPeriod".to_string(), Value::Null);
        report.record(ShapeMigration::BlankDates);
    }

    if let Some(standards) = competition.get_mut("standards")
        && prune_standards(standards) > 0
    {
        report.record(ShapeMigration::UnknownStandardsCells);
    }
}

/// Decimal percentages are stored as numbers by older builds and as strings
/// by this one. Either must be a non-negative number.
fn is_valid_percentage(value: &Value) -> bool {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.is_some_and(|pct| pct.is_finite() && pct >= 0.0)
}

/// Drops every entry of a sex → age group → event table that the typed
/// table cannot decode, along with rows left empty. A value that is not an
/// object at all becomes an empty table. Returns the number of entries
/// dropped.
fn prune_standards(table: &mut Value) -> usize {
    let Some(sexes) = table.as_object_mut() else {
        warn!("Standards table is not an object, clearing it");
        *table = Value::Object(Map::new());
        return 1;
    };

    let mut dropped = 0;
    sexes.retain(|sex, groups| {
        if !decodes_as::<Sex>(sex) {
            warn!(sex = %sex, "Dropping standards for unknown sex");
            dropped += 1;
            return false;
        }
        let Some(groups) = groups.as_object_mut() else {
            dropped += 1;
            return false;
        };
        groups.retain(|group, events| {
            if !decodes_as::<AgeGroup>(group) {
                warn!(age_group = %group, "Dropping standards for unknown age group");
                dropped += 1;
                return false;
            }
            let Some(events) = events.as_object_mut() else {
                dropped += 1;
                return false;
            };
            events.retain(|key, time_ms| {
                let keep = decodes_as::<EventKey>(key) && time_ms.as_i64().is_some();
                if !keep {
                    warn!(event = %key, value = %time_ms, "Dropping unreadable standards cell");
                    dropped += 1;
                }
                keep
            });
            !events.is_empty()
        });
        !groups.is_empty()
    });
    dropped
}

fn decodes_as<T: DeserializeOwned>(key: &str) -> bool {
    serde_json::from_value::<T>(Value::String(key.to_string())).is_ok()
}

fn blank_to_null(object: &mut Map<String, Value>, field: &str) -> bool {
    if object.get(field).and_then(Value::as_str) == Some("") {
        object.insert(field.to_string(), Value::Null);
        true
    } else {
        false
    }
}

/// Standards written before age-group rows existed have no `County` tier or
/// no male 13 row under it.
fn standards_outdated(standards: &Value) -> bool {
    standards
        .get("County")
        .and_then(|county| county.get("times"))
        .and_then(|times| times.get("M"))
        .and_then(|male| male.get("13"))
        .is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use swim_core::models::{Competition, Distance, Stroke, Swimmer};

    #[test]
    fn test_legacy_swimmer_becomes_list() {
        let raw = RawSnapshot {
            legacy_swimmer: Some(json!({"id": "1700000000000", "name": "Sam", "sex": "F", "pin": "1234", "times": []})),
            ..RawSnapshot::default()
        };

        let (migrated, report) = migrate(raw);
        assert!(migrated.legacy_swimmer.is_none());
        let swimmers = migrated.swimmers.unwrap();
        assert_eq!(swimmers.as_array().unwrap().len(), 1);
        assert_eq!(swimmers[0]["name"], "Sam");
        assert_eq!(report.applied, vec![ShapeMigration::LegacySwimmer]);
        assert_eq!(migrated.schema_version, Some(SCHEMA_VERSION));
    }

    #[test]
    fn test_legacy_blob_ignored_when_list_exists() {
        let raw = RawSnapshot {
            swimmers: Some(json!([{"id": "a", "name": "Ana", "sex": "F"}])),
            legacy_swimmer: Some(json!({"id": "b", "name": "Ben", "sex": "M"})),
            ..RawSnapshot::default()
        };

        let (migrated, report) = migrate(raw);
        assert_eq!(migrated.swimmers.unwrap()[0]["id"], "a");
        assert!(migrated.legacy_swimmer.is_none());
        assert!(!report.applied.contains(&ShapeMigration::LegacySwimmer));
    }

    #[test]
    fn test_competition_date_becomes_period() {
        let raw = RawSnapshot {
            competitions: Some(json!([
                {"id": "c1", "name": "Open", "date": "2025-03-01", "ageAtDate": ""},
                {"id": "c2", "name": "Champs", "qualifyingPeriod": {"start": "2025-01-01", "end": "2025-02-01"}}
            ])),
            ..RawSnapshot::default()
        };

        let (migrated, report) = migrate(raw);
        let competitions = migrated.competitions.unwrap();
        assert_eq!(
            competitions[0]["qualifyingPeriod"],
            json!({"start": "2025-03-01", "end": "2025-03-01"})
        );
        assert!(competitions[0].get("date").is_none());
        assert!(competitions[0]["ageAtDate"].is_null());
        assert_eq!(competitions[1]["qualifyingPeriod"]["end"], "2025-02-01");
        assert_eq!(
            report.applied,
            vec![ShapeMigration::CompetitionDate, ShapeMigration::BlankDates]
        );
    }

    #[test]
    fn test_blank_period_dropped() {
        let raw = RawSnapshot {
            competitions: Some(json!([
                {"id": "c1", "name": "Open", "qualifyingPeriod": {"start": "", "end": ""}}
            ])),
            ..RawSnapshot::default()
        };

        let (migrated, _) = migrate(raw);
        assert!(migrated.competitions.unwrap()[0]["qualifyingPeriod"].is_null());
    }

    #[test]
    fn test_non_uuid_record_ids_replaced() {
        let keep = Uuid::new_v4().to_string();
        let raw = RawSnapshot {
            swimmers: Some(json!([{
                "id": 42,
                "name": "Ana",
                "sex": "F",
                "dateOfBirth": "",
                "times": [{"id": "1700000000000"}, {"id": keep}]
            }])),
            ..RawSnapshot::default()
        };

        let (migrated, report) = migrate(raw);
        let swimmer = &migrated.swimmers.unwrap()[0];
        assert_eq!(swimmer["id"], "42");
        assert!(swimmer["dateOfBirth"].is_null());
        let first = swimmer["times"][0]["id"].as_str().unwrap();
        assert!(Uuid::parse_str(first).is_ok());
        assert_eq!(swimmer["times"][1]["id"], keep.as_str());
        assert!(report.applied.contains(&ShapeMigration::RecordIds));
    }

    #[test]
    fn test_unknown_competition_standards_dropped() {
        let raw = RawSnapshot {
            competitions: Some(json!([{
                "id": "c1",
                "name": "Open",
                "standards": {
                    "M": {"13-14": {"Freestyle60": 40000}},
                    "F": {"13": {"Freestyle60": 40000, "Freestyle50": 31000, "Backstroke50": "x"}},
                    "X": {"13": {"Freestyle50": 30000}}
                }
            }])),
            ..RawSnapshot::default()
        };

        let (migrated, report) = migrate(raw);
        let competitions = migrated.competitions.unwrap();
        assert_eq!(
            competitions[0]["standards"],
            json!({"F": {"13": {"Freestyle50": 31000}}})
        );
        assert!(report.applied.contains(&ShapeMigration::UnknownStandardsCells));

        let decoded: Vec<Competition> = serde_json::from_value(competitions).unwrap();
        assert_eq!(
            decoded[0].standards.get(
                Sex::F,
                AgeGroup::Thirteen,
                EventKey::new(Stroke::Freestyle, Distance::M50)
            ),
            Some(31_000)
        );
        assert_eq!(decoded[0].standards.len(), 1);
    }

    #[test]
    fn test_unknown_tier_cells_dropped() {
        let raw = RawSnapshot {
            standards: Some(json!({
                "County": {"name": "Essex", "year": 2026, "times": {"M": {"13": {"Freestyle50": 33890, "Freestyle75": 50000}}}}
            })),
            schema_version: Some(SCHEMA_VERSION),
            ..RawSnapshot::default()
        };

        let (migrated, report) = migrate(raw);
        assert_eq!(
            migrated.standards.unwrap()["County"]["times"],
            json!({"M": {"13": {"Freestyle50": 33890}}})
        );
        assert_eq!(report.applied, vec![ShapeMigration::UnknownStandardsCells]);
    }

    #[test]
    fn test_invalid_target_percentage_reset() {
        let raw = RawSnapshot {
            swimmers: Some(json!([
                {"id": "a", "name": "Ana", "sex": "F", "targetPercentage": null},
                {"id": "b", "name": "Ben", "sex": "M", "targetPercentage": -2},
                {"id": "c", "name": "Cal", "sex": "M", "targetPercentage": "abc"},
                {"id": "d", "name": "Dee", "sex": "F", "targetPercentage": 7},
                {"id": "e", "name": "Eve", "sex": "F", "targetPercentage": "3.5"},
                {"id": "f", "name": "Fin", "sex": "M"}
            ])),
            ..RawSnapshot::default()
        };

        let (migrated, report) = migrate(raw);
        assert!(report.applied.contains(&ShapeMigration::TargetPercentage));

        let swimmers: Vec<Swimmer> = serde_json::from_value(migrated.swimmers.unwrap()).unwrap();
        let percentages: Vec<String> = swimmers
            .iter()
            .map(|swimmer| swimmer.target_percentage.to_string())
            .collect();
        assert_eq!(percentages, vec!["5", "5", "5", "7", "3.5", "5"]);
    }

    #[test]
    fn test_stored_percentage_strings_untouched() {
        let raw = RawSnapshot {
            swimmers: Some(json!([{"id": "a", "name": "Ana", "sex": "F", "targetPercentage": "5"}])),
            schema_version: Some(SCHEMA_VERSION),
            ..RawSnapshot::default()
        };
        let (_, report) = migrate(raw);
        assert!(report.is_empty());
    }

    #[test]
    fn test_outdated_standards_reset() {
        let outdated = RawSnapshot {
            standards: Some(json!({"County": {"name": "Essex", "year": 2024, "times": {"M": {"12": {}}}}})),
            ..RawSnapshot::default()
        };
        let (migrated, report) = migrate(outdated);
        assert!(migrated.standards.is_none());
        assert_eq!(report.applied, vec![ShapeMigration::StandardsReset]);

        let current = RawSnapshot {
            standards: Some(json!({"County": {"times": {"M": {"13": {"Freestyle50": 33890}}}}})),
            schema_version: Some(SCHEMA_VERSION),
            ..RawSnapshot::default()
        };
        let (migrated, report) = migrate(current);
        assert!(migrated.standards.is_some());
        assert!(report.is_empty());
    }
}
