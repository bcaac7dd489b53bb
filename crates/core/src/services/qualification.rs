use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use super::age::age_group_on;
use super::course::CourseConverter;
use super::personal_best::{PersonalBest, best_for_event, best_time};
use crate::dto::report::{GapToTarget, MissingRace, MissingReason, TargetRace, TargetStandard};
use crate::models::{AgeGroup, Competition, Course, EventKey, Swimmer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QualificationStatus {
    Qualified,
    /// Within the swimmer's target percentage of the qualifying time.
    TargetRace,
    /// Slower than the qualifying time by more than the target percentage.
    Gap,
    /// Swims exist for the event, none inside the qualifying period.
    Missing,
    NoTimeRecorded,
}

/// One row of a competition evaluation. Times are in the competition course.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventEvaluation {
    pub event: EventKey,
    pub qualifying_time_ms: i64,
    pub best_time_ms: Option<i64>,
    pub best_date: Option<NaiveDate>,
    pub is_converted: bool,
    pub gap_ms: Option<i64>,
    pub gap_pct: Option<Decimal>,
    pub status: QualificationStatus,
}

/// `gap / time * 100`, zero when `time` is not positive.
pub fn gap_percentage(gap_ms: i64, time_ms: i64) -> Decimal {
    Decimal::from(gap_ms)
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(Decimal::from(time_ms)))
        .filter(|_| time_ms > 0)
        .unwrap_or(Decimal::ZERO)
}

/// Age group the swimmer competes in at this competition, if both dates
/// needed to compute it are known.
pub fn competition_age_group(swimmer: &Swimmer, competition: &Competition) -> Option<AgeGroup> {
    let Some(date_of_birth) = swimmer.date_of_birth else {
        debug!(swimmer = %swimmer.id, "No date of birth, skipping {}", competition.name);
        return None;
    };
    let Some(age_at_date) = competition.age_at_date else {
        debug!(competition = %competition.id, "No age-at date, skipping {}", competition.name);
        return None;
    };
    Some(age_group_on(date_of_birth, age_at_date))
}

/// Classifies every event the competition has a standard for, for this
/// swimmer's sex and age group. Empty when the age group cannot be computed.
pub fn evaluate_competition<C: CourseConverter + ?Sized>(
    swimmer: &Swimmer,
    competition: &Competition,
    converter: &C,
) -> Vec<EventEvaluation> {
    let Some(group) = competition_age_group(swimmer, competition) else {
        return Vec::new();
    };

    competition
        .standards
        .events(swimmer.sex, group)
        .map(|(event, qualifying_time_ms)| {
            evaluate_event(swimmer, competition, event, qualifying_time_ms, converter)
        })
        .collect()
}

fn evaluate_event<C: CourseConverter + ?Sized>(
    swimmer: &Swimmer,
    competition: &Competition,
    event: EventKey,
    qualifying_time_ms: i64,
    converter: &C,
) -> EventEvaluation {
    let records = &swimmer.times;
    let has_any = records.iter().any(|record| event.matches(&record.event));
    let eligible = best_time(
        records,
        |record| event.matches(&record.event) && competition.accepts_date(record.date),
        competition.course,
        converter,
    );

    let Some(best) = eligible else {
        return EventEvaluation {
            event,
            qualifying_time_ms,
            best_time_ms: None,
            best_date: None,
            is_converted: false,
            gap_ms: None,
            gap_pct: None,
            status: if has_any {
                QualificationStatus::Missing
            } else {
                QualificationStatus::NoTimeRecorded
            },
        };
    };

    let (status, gap_ms, gap_pct) = if best.time_ms <= qualifying_time_ms {
        (QualificationStatus::Qualified, None, None)
    } else {
        let gap_ms = best.time_ms - qualifying_time_ms;
        let gap_pct = gap_percentage(gap_ms, best.time_ms);
        let status = if gap_pct <= swimmer.target_percentage {
            QualificationStatus::TargetRace
        } else {
            QualificationStatus::Gap
        };
        (status, Some(gap_ms), Some(gap_pct))
    };

    EventEvaluation {
        event,
        qualifying_time_ms,
        best_time_ms: Some(best.time_ms),
        best_date: Some(best.record.date),
        is_converted: best.is_converted(competition.course),
        gap_ms,
        gap_pct,
        status,
    }
}

/// The selected competition, or every competition the swimmer has entered.
pub fn competitions_in_scope<'a>(
    swimmer: &'a Swimmer,
    competitions: &'a [Competition],
    selected: Option<&'a str>,
) -> impl Iterator<Item = &'a Competition> + 'a {
    competitions.iter().filter(move |competition| match selected {
        Some(id) => competition.id == id,
        None => swimmer.has_entered(&competition.id),
    })
}

/// Near misses across the competitions in scope, closest to qualifying first.
pub fn target_races<C: CourseConverter + ?Sized>(
    swimmer: &Swimmer,
    competitions: &[Competition],
    selected: Option<&str>,
    converter: &C,
) -> Vec<TargetRace> {
    let mut races: Vec<TargetRace> = competitions_in_scope(swimmer, competitions, selected)
        .flat_map(|competition| {
            evaluate_competition(swimmer, competition, converter)
                .into_iter()
                .filter(|row| row.status == QualificationStatus::TargetRace)
                .filter_map(move |row| {
                    Some(TargetRace {
                        competition_id: competition.id.clone(),
                        competition_name: competition.name.clone(),
                        event: row.event,
                        best_time_ms: row.best_time_ms?,
                        is_converted: row.is_converted,
                        qualifying_time_ms: row.qualifying_time_ms,
                        gap_ms: row.gap_ms?,
                        gap_pct: row.gap_pct?,
                    })
                })
        })
        .collect();

    races.sort_by(|a, b| {
        a.gap_pct
            .cmp(&b.gap_pct)
            .then_with(|| a.competition_name.cmp(&b.competition_name))
            .then_with(|| a.event.cmp(&b.event))
    });
    races
}

/// Events with a standard but no eligible swim, across the competitions in
/// scope.
pub fn missing_races<C: CourseConverter + ?Sized>(
    swimmer: &Swimmer,
    competitions: &[Competition],
    selected: Option<&str>,
    converter: &C,
) -> Vec<MissingRace> {
    let mut missing = Vec::new();
    for competition in competitions_in_scope(swimmer, competitions, selected) {
        for row in evaluate_competition(swimmer, competition, converter) {
            let reason = match row.status {
                QualificationStatus::NoTimeRecorded => MissingReason::NoTimeRecorded,
                QualificationStatus::Missing => {
                    match best_for_event(&swimmer.times, row.event, competition.course, converter) {
                        Some(best) => outside_period(&best, row.qualifying_time_ms, competition.course),
                        None => MissingReason::NoTimeRecorded,
                    }
                }
                _ => continue,
            };
            missing.push(MissingRace {
                competition_id: competition.id.clone(),
                competition_name: competition.name.clone(),
                event: row.event,
                qualifying_time_ms: row.qualifying_time_ms,
                reason,
            });
        }
    }
    missing.sort_by(|a, b| {
        a.competition_name
            .cmp(&b.competition_name)
            .then_with(|| a.event.cmp(&b.event))
    });
    missing
}

// gap_ms <= 0 means the swim is already under the qualifying time.
fn outside_period(best: &PersonalBest<'_>, qualifying_time_ms: i64, course: Course) -> MissingReason {
    let gap_ms = best.time_ms - qualifying_time_ms;
    MissingReason::OutsidePeriod {
        best_time_ms: best.time_ms,
        is_converted: best.is_converted(course),
        date: best.record.date,
        gap_ms,
        gap_pct: gap_percentage(gap_ms, best.time_ms),
    }
}

/// Qualifying times for one event across the competitions in scope,
/// converted from each competition's course into `display_course`.
pub fn target_standards<C: CourseConverter + ?Sized>(
    swimmer: &Swimmer,
    competitions: &[Competition],
    selected: Option<&str>,
    event: EventKey,
    display_course: Course,
    converter: &C,
) -> Vec<TargetStandard> {
    competitions_in_scope(swimmer, competitions, selected)
        .filter_map(|competition| {
            let group = competition_age_group(swimmer, competition)?;
            let time_ms = competition.standards.get(swimmer.sex, group, event)?;
            Some(TargetStandard {
                competition_id: competition.id.clone(),
                competition_name: competition.name.clone(),
                time_ms: converter.convert(time_ms, event, competition.course, display_course),
            })
        })
        .collect()
}

/// Gap from the swimmer's best to the largest qualifying time still unmet.
///
/// With a competition selected, the best is limited to that competition's
/// qualifying period.
pub fn gap_to_target<C: CourseConverter + ?Sized>(
    swimmer: &Swimmer,
    competitions: &[Competition],
    selected: Option<&str>,
    event: EventKey,
    display_course: Course,
    converter: &C,
) -> GapToTarget {
    let targets = target_standards(swimmer, competitions, selected, event, display_course, converter);
    let period = selected
        .and_then(|id| competitions.iter().find(|competition| competition.id == id))
        .and_then(|competition| competition.qualifying_period);

    let best = best_time(
        &swimmer.times,
        |record| {
            event.matches(&record.event) && period.is_none_or(|period| period.contains(record.date))
        },
        display_course,
        converter,
    );

    let Some(best) = best else {
        return GapToTarget::NoData;
    };
    if targets.is_empty() {
        return GapToTarget::NoData;
    }

    match targets
        .iter()
        .map(|target| target.time_ms)
        .filter(|&target_ms| best.time_ms > target_ms)
        .max()
    {
        Some(target_ms) => GapToTarget::Outstanding {
            best_time_ms: best.time_ms,
            target_ms,
            gap_ms: best.time_ms - target_ms,
        },
        None => GapToTarget::QualifiedAll {
            best_time_ms: best.time_ms,
        },
    }
}
