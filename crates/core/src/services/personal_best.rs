use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::course::{CourseConverter, round_ms};
use crate::dto::report::{ProgressionPoint, StalenessEntry};
use crate::models::{Course, Distance, EventKey, QualifyingPeriod, SwimTimeRecord};

const DAYS_PER_WEEK: i64 = 7;
const LENGTH_METERS: u16 = 25;

/// Fastest record of a filtered set, with its time expressed in the target
/// course. When two records normalize to the same value either may be
/// returned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PersonalBest<'a> {
    pub record: &'a SwimTimeRecord,
    pub time_ms: i64,
}

impl PersonalBest<'_> {
    pub fn event(&self) -> EventKey {
        self.record.event.key()
    }

    pub fn is_converted(&self, target: Course) -> bool {
        self.record.event.course != target
    }
}

pub fn normalized_time<C: CourseConverter + ?Sized>(
    record: &SwimTimeRecord,
    target: Course,
    converter: &C,
) -> i64 {
    converter.convert(record.time_ms, record.event.key(), record.event.course, target)
}

pub fn best_time<'a, C, P>(
    records: &'a [SwimTimeRecord],
    predicate: P,
    target: Course,
    converter: &C,
) -> Option<PersonalBest<'a>>
where
    C: CourseConverter + ?Sized,
    P: Fn(&SwimTimeRecord) -> bool,
{
    records
        .iter()
        .filter(|record| predicate(record))
        .map(|record| PersonalBest {
            record,
            time_ms: normalized_time(record, target, converter),
        })
        .min_by_key(|best| best.time_ms)
}

pub fn best_for_event<'a, C: CourseConverter + ?Sized>(
    records: &'a [SwimTimeRecord],
    event: EventKey,
    target: Course,
    converter: &C,
) -> Option<PersonalBest<'a>> {
    best_time(records, |record| event.matches(&record.event), target, converter)
}

/// Best time for an event swum inside the period, both ends inclusive.
pub fn best_within_period<'a, C: CourseConverter + ?Sized>(
    records: &'a [SwimTimeRecord],
    event: EventKey,
    period: &QualifyingPeriod,
    target: Course,
    converter: &C,
) -> Option<PersonalBest<'a>> {
    best_time(
        records,
        |record| event.matches(&record.event) && period.contains(record.date),
        target,
        converter,
    )
}

/// Whole weeks elapsed from `date` to `now`, rounded towards negative infinity.
pub fn weeks_since(date: NaiveDate, now: NaiveDate) -> i64 {
    (now - date).num_days().div_euclid(DAYS_PER_WEEK)
}

/// Personal best for every event with at least one record, ordered by
/// stroke then distance.
pub fn personal_bests<'a, C: CourseConverter + ?Sized>(
    records: &'a [SwimTimeRecord],
    target: Course,
    converter: &C,
) -> Vec<PersonalBest<'a>> {
    let mut bests: BTreeMap<EventKey, PersonalBest<'a>> = BTreeMap::new();
    for record in records {
        let candidate = PersonalBest {
            record,
            time_ms: normalized_time(record, target, converter),
        };
        bests
            .entry(record.event.key())
            .and_modify(|best| {
                if candidate.time_ms < best.time_ms {
                    *best = candidate;
                }
            })
            .or_insert(candidate);
    }
    bests.into_values().collect()
}

/// The `limit` most recent swims, newest first.
pub fn recent_swims(records: &[SwimTimeRecord], limit: usize) -> Vec<&SwimTimeRecord> {
    let mut recent: Vec<&SwimTimeRecord> = records.iter().collect();
    recent.sort_by(|a, b| b.date.cmp(&a.date));
    recent.truncate(limit);
    recent
}

/// Swims for one event in date order, normalized to `target`.
pub fn progression<C: CourseConverter + ?Sized>(
    records: &[SwimTimeRecord],
    event: EventKey,
    period: Option<&QualifyingPeriod>,
    target: Course,
    converter: &C,
) -> Vec<ProgressionPoint> {
    let mut points: Vec<ProgressionPoint> = records
        .iter()
        .filter(|record| event.matches(&record.event))
        .filter(|record| period.is_none_or(|period| period.contains(record.date)))
        .map(|record| {
            let normalized_ms = normalized_time(record, target, converter);
            ProgressionPoint {
                date: record.date,
                time_ms: record.time_ms,
                normalized_ms,
                pace_ms: pace_per_length(normalized_ms, record.event.distance),
                course: record.event.course,
                meet_name: record.meet_name.clone(),
                is_best: false,
            }
        })
        .collect();
    points.sort_by_key(|point| point.date);

    if let Some(best) = points.iter().map(|point| point.normalized_ms).min() {
        for point in points.iter_mut() {
            point.is_best = point.normalized_ms == best;
        }
    }
    points
}

/// Time per 25 m length, rounded to the millisecond.
pub fn pace_per_length(time_ms: i64, distance: Distance) -> i64 {
    let lengths = Decimal::from(distance.meters()) / Decimal::from(LENGTH_METERS);
    round_ms(Decimal::from(time_ms) / lengths)
}

/// Weeks since the personal best and since the latest swim, per event,
/// longest since PB first.
pub fn staleness<C: CourseConverter + ?Sized>(
    records: &[SwimTimeRecord],
    target: Course,
    now: NaiveDate,
    converter: &C,
) -> Vec<StalenessEntry> {
    let mut entries: Vec<StalenessEntry> = personal_bests(records, target, converter)
        .into_iter()
        .filter_map(|best| {
            let event = best.event();
            let last_swim_date = records
                .iter()
                .filter(|record| event.matches(&record.event))
                .map(|record| record.date)
                .max()?;

            let weeks_since_pb = weeks_since(best.record.date, now);
            let weeks_since_last = weeks_since(last_swim_date, now);
            Some(StalenessEntry {
                event,
                pb_date: best.record.date,
                weeks_since_pb,
                last_swim_date,
                weeks_since_last,
                is_different: weeks_since_pb != weeks_since_last,
            })
        })
        .collect();

    entries.sort_by(|a, b| {
        b.weeks_since_pb
            .cmp(&a.weeks_since_pb)
            .then_with(|| a.event.cmp(&b.event))
    });
    entries
}
