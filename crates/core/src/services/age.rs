use chrono::{Datelike, NaiveDate};

use crate::models::AgeGroup;

/// Civil-calendar age on `reference`: the year difference, less one when the
/// birthday has not yet come round that year.
pub fn age_on(date_of_birth: NaiveDate, reference: NaiveDate) -> i32 {
    let mut age = reference.year() - date_of_birth.year();
    if (reference.month(), reference.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age
}

impl AgeGroup {
    pub fn for_age(age: i32) -> Self {
        match age {
            ..=11 => Self::TenAndEleven,
            12 => Self::Twelve,
            13 => Self::Thirteen,
            14 => Self::Fourteen,
            15 => Self::Fifteen,
            16 => Self::Sixteen,
            17 => Self::Seventeen,
            _ => Self::EighteenAndOver,
        }
    }
}

pub fn age_group_on(date_of_birth: NaiveDate, reference: NaiveDate) -> AgeGroup {
    AgeGroup::for_age(age_on(date_of_birth, reference))
}
