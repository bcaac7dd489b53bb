//! Short-course / long-course time conversion.
//!
//! The default converter applies one flat empirical factor (1.02) to every
//! event. It is an approximation, not a federation-sanctioned formula;
//! callers that need per-event tables implement [`CourseConverter`] and pass
//! their own converter to the engines.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::error::{CoreError, Result};
use crate::models::{Course, EventKey};

pub const DEFAULT_COURSE_FACTOR: Decimal = dec!(1.02);

pub trait CourseConverter {
    fn short_to_long(&self, time_ms: i64, event: EventKey) -> i64;

    fn long_to_short(&self, time_ms: i64, event: EventKey) -> i64;

    /// Converts between any two courses, always passing through long course.
    /// Each step rounds to the nearest millisecond.
    fn convert(&self, time_ms: i64, event: EventKey, from: Course, to: Course) -> i64 {
        if from == to {
            return time_ms;
        }
        let long_course = match from {
            Course::ShortCourse => self.short_to_long(time_ms, event),
            Course::LongCourse => time_ms,
        };
        match to {
            Course::LongCourse => long_course,
            Course::ShortCourse => self.long_to_short(long_course, event),
        }
    }
}

/// One multiplicative factor for every event: LC = SC × factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearCourseFactor {
    factor: Decimal,
}

impl LinearCourseFactor {
    pub fn new(factor: Decimal) -> Result<Self> {
        if factor <= Decimal::ZERO {
            return Err(CoreError::InvalidFactor(factor));
        }
        Ok(Self { factor })
    }

    pub fn factor(&self) -> Decimal {
        self.factor
    }

    /// Event-agnostic conversion, same result as [`CourseConverter::convert`].
    pub fn convert_time(&self, time_ms: i64, from: Course, to: Course) -> i64 {
        if from == to {
            return time_ms;
        }
        let long_course = match from {
            Course::ShortCourse => round_ms(Decimal::from(time_ms) * self.factor),
            Course::LongCourse => time_ms,
        };
        match to {
            Course::LongCourse => long_course,
            Course::ShortCourse => round_ms(Decimal::from(long_course) / self.factor),
        }
    }
}

impl Default for LinearCourseFactor {
    fn default() -> Self {
        Self {
            factor: DEFAULT_COURSE_FACTOR,
        }
    }
}

impl CourseConverter for LinearCourseFactor {
    fn short_to_long(&self, time_ms: i64, _event: EventKey) -> i64 {
        self.convert_time(time_ms, Course::ShortCourse, Course::LongCourse)
    }

    fn long_to_short(&self, time_ms: i64, _event: EventKey) -> i64 {
        self.convert_time(time_ms, Course::LongCourse, Course::ShortCourse)
    }
}

/// Converts with the default 1.02 factor.
pub fn convert_time(time_ms: i64, from: Course, to: Course) -> i64 {
    LinearCourseFactor::default().convert_time(time_ms, from, to)
}

pub(crate) fn round_ms(value: Decimal) -> i64 {
    let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    i64::try_from(rounded).unwrap_or(i64::MAX)
}
