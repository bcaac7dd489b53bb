//! Shipped qualifying-time tiers.
//!
//! County is the Essex 2026 table. Regional and National are estimates
//! derived from it by a flat factor, with literal overrides where the real
//! figure is known.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::{
    AgeGroup, Distance, EventKey, QualifyingStandards, Sex, StandardSet, StandardsTable, Stroke,
};
use crate::services::standards_builder::scale_cells;

pub const STANDARDS_YEAR: i32 = 2026;
pub const REGIONAL_FACTOR: Decimal = dec!(0.95);
pub const NATIONAL_FACTOR: Decimal = dec!(0.90);

const fn t(minutes: i64, seconds: i64, hundredths: i64) -> i64 {
    minutes * 60_000 + seconds * 1_000 + hundredths * 10
}

const COUNTY_EVENTS: [(Stroke, Distance); 14] = [
    (Stroke::Freestyle, Distance::M50),
    (Stroke::Freestyle, Distance::M100),
    (Stroke::Freestyle, Distance::M200),
    (Stroke::Freestyle, Distance::M400),
    (Stroke::Backstroke, Distance::M50),
    (Stroke::Backstroke, Distance::M100),
    (Stroke::Backstroke, Distance::M200),
    (Stroke::Breaststroke, Distance::M50),
    (Stroke::Breaststroke, Distance::M100),
    (Stroke::Breaststroke, Distance::M200),
    (Stroke::Butterfly, Distance::M50),
    (Stroke::Butterfly, Distance::M100),
    (Stroke::Butterfly, Distance::M200),
    (Stroke::IndividualMedley, Distance::M200),
];

// Columns follow COUNTY_EVENTS.
const COUNTY_2026: [(Sex, AgeGroup, [i64; 14]); 16] = [
    (
        Sex::M,
        AgeGroup::TenAndEleven,
        [
            t(0, 36, 47), t(1, 21, 20), t(2, 56, 60), t(6, 3, 30),
            t(0, 42, 40), t(1, 33, 90), t(3, 20, 30), t(0, 48, 10),
            t(1, 45, 0), t(3, 45, 0), t(0, 40, 0), t(1, 30, 0),
            t(3, 20, 0), t(3, 15, 0),
        ],
    ),
    (
        Sex::M,
        AgeGroup::Twelve,
        [
            t(0, 35, 52), t(1, 19, 95), t(2, 49, 65), t(5, 53, 65),
            t(0, 41, 85), t(1, 30, 45), t(3, 8, 5), t(0, 48, 5),
            t(1, 44, 0), t(3, 40, 0), t(0, 39, 0), t(1, 28, 0),
            t(3, 15, 0), t(3, 10, 0),
        ],
    ),
    (
        Sex::M,
        AgeGroup::Thirteen,
        [
            t(0, 33, 89), t(1, 14, 50), t(2, 38, 0), t(5, 39, 55),
            t(0, 38, 60), t(1, 27, 5), t(3, 2, 40), t(0, 46, 35),
            t(1, 40, 0), t(3, 35, 0), t(0, 37, 0), t(1, 25, 0),
            t(3, 10, 0), t(3, 0, 0),
        ],
    ),
    (
        Sex::M,
        AgeGroup::Fourteen,
        [
            t(0, 31, 10), t(1, 8, 95), t(2, 27, 75), t(5, 15, 85),
            t(0, 35, 90), t(1, 19, 30), t(2, 52, 75), t(0, 43, 25),
            t(1, 35, 0), t(3, 25, 0), t(0, 34, 0), t(1, 15, 0),
            t(2, 50, 0), t(2, 45, 0),
        ],
    ),
    (
        Sex::M,
        AgeGroup::Fifteen,
        [
            t(0, 29, 95), t(1, 7, 24), t(2, 22, 5), t(5, 13, 40),
            t(0, 35, 60), t(1, 17, 15), t(2, 43, 90), t(0, 40, 5),
            t(1, 30, 0), t(3, 15, 0), t(0, 32, 0), t(1, 12, 0),
            t(2, 45, 0), t(2, 40, 0),
        ],
    ),
    (
        Sex::M,
        AgeGroup::Sixteen,
        [
            t(0, 27, 70), t(1, 7, 20), t(2, 17, 60), t(5, 5, 30),
            t(0, 33, 45), t(1, 13, 35), t(2, 38, 90), t(0, 37, 21),
            t(1, 22, 0), t(3, 0, 0), t(0, 30, 0), t(1, 8, 0),
            t(2, 35, 0), t(2, 30, 0),
        ],
    ),
    (
        Sex::M,
        AgeGroup::Seventeen,
        [
            t(0, 27, 70), t(1, 7, 20), t(2, 17, 60), t(5, 5, 30),
            t(0, 33, 45), t(1, 13, 35), t(2, 38, 90), t(0, 37, 21),
            t(1, 22, 0), t(3, 0, 0), t(0, 30, 0), t(1, 8, 0),
            t(2, 35, 0), t(2, 30, 0),
        ],
    ),
    (
        Sex::M,
        AgeGroup::EighteenAndOver,
        [
            t(0, 27, 70), t(1, 7, 20), t(2, 17, 60), t(5, 5, 30),
            t(0, 33, 45), t(1, 13, 35), t(2, 38, 90), t(0, 37, 21),
            t(1, 22, 0), t(3, 0, 0), t(0, 30, 0), t(1, 8, 0),
            t(2, 35, 0), t(2, 30, 0),
        ],
    ),
    (
        Sex::F,
        AgeGroup::TenAndEleven,
        [
            t(0, 36, 66), t(1, 23, 30), t(3, 0, 20), t(6, 29, 30),
            t(0, 43, 25), t(1, 33, 50), t(3, 41, 65), t(0, 49, 40),
            t(1, 48, 0), t(3, 50, 0), t(0, 41, 0), t(1, 35, 0),
            t(3, 30, 0), t(3, 25, 0),
        ],
    ),
    (
        Sex::F,
        AgeGroup::Twelve,
        [
            t(0, 34, 55), t(1, 20, 30), t(2, 51, 25), t(5, 45, 75),
            t(0, 41, 20), t(1, 31, 75), t(3, 18, 0), t(0, 47, 70),
            t(1, 45, 0), t(3, 45, 0), t(0, 38, 0), t(1, 30, 0),
            t(3, 20, 0), t(3, 15, 0),
        ],
    ),
    (
        Sex::F,
        AgeGroup::Thirteen,
        [
            t(0, 33, 5), t(1, 14, 95), t(2, 43, 20), t(5, 44, 10),
            t(0, 39, 60), t(1, 25, 70), t(3, 6, 60), t(0, 44, 40),
            t(1, 40, 0), t(3, 35, 0), t(0, 36, 0), t(1, 25, 0),
            t(3, 10, 0), t(3, 5, 0),
        ],
    ),
    (
        Sex::F,
        AgeGroup::Fourteen,
        [
            t(0, 32, 5), t(1, 9, 40), t(2, 28, 35), t(5, 16, 60),
            t(0, 37, 15), t(1, 19, 35), t(2, 50, 15), t(0, 42, 80),
            t(1, 35, 0), t(3, 25, 0), t(0, 35, 0), t(1, 20, 0),
            t(3, 0, 0), t(2, 55, 0),
        ],
    ),
    (
        Sex::F,
        AgeGroup::Fifteen,
        [
            t(0, 31, 20), t(1, 8, 35), t(2, 25, 90), t(5, 10, 0),
            t(0, 36, 50), t(1, 18, 90), t(2, 49, 25), t(0, 42, 75),
            t(1, 33, 0), t(3, 22, 0), t(0, 34, 50), t(1, 19, 0),
            t(2, 58, 0), t(2, 52, 0),
        ],
    ),
    (
        Sex::F,
        AgeGroup::Sixteen,
        [
            t(0, 30, 90), t(1, 8, 20), t(2, 25, 60), t(5, 8, 85),
            t(0, 36, 10), t(1, 18, 60), t(2, 46, 20), t(0, 42, 5),
            t(1, 32, 0), t(3, 20, 0), t(0, 34, 0), t(1, 18, 0),
            t(2, 55, 0), t(2, 50, 0),
        ],
    ),
    (
        Sex::F,
        AgeGroup::Seventeen,
        [
            t(0, 30, 90), t(1, 8, 20), t(2, 25, 60), t(5, 8, 85),
            t(0, 36, 10), t(1, 18, 60), t(2, 46, 20), t(0, 42, 5),
            t(1, 32, 0), t(3, 20, 0), t(0, 34, 0), t(1, 18, 0),
            t(2, 55, 0), t(2, 50, 0),
        ],
    ),
    (
        Sex::F,
        AgeGroup::EighteenAndOver,
        [
            t(0, 30, 90), t(1, 8, 20), t(2, 25, 60), t(5, 8, 85),
            t(0, 36, 10), t(1, 18, 60), t(2, 46, 20), t(0, 42, 5),
            t(1, 32, 0), t(3, 20, 0), t(0, 34, 0), t(1, 18, 0),
            t(2, 55, 0), t(2, 50, 0),
        ],
    ),];

pub fn county_2026() -> StandardsTable {
    COUNTY_2026
        .iter()
        .flat_map(|(sex, group, times)| {
            COUNTY_EVENTS
                .iter()
                .zip(times.iter())
                .map(move |((stroke, distance), ms)| {
                    (*sex, *group, EventKey::new(*stroke, *distance), *ms)
                })
        })
        .collect()
}

pub fn default_standards() -> QualifyingStandards {
    let county = county_2026();

    let mut regional = scale_cells(&county, REGIONAL_FACTOR);
    regional.set(
        Sex::M,
        AgeGroup::Thirteen,
        EventKey::new(Stroke::Freestyle, Distance::M50),
        t(0, 30, 0),
    );

    let national = scale_cells(&county, NATIONAL_FACTOR);

    QualifyingStandards {
        county: StandardSet {
            name: "Essex".to_string(),
            year: STANDARDS_YEAR,
            times: county,
        },
        regional: StandardSet {
            name: "East Region".to_string(),
            year: STANDARDS_YEAR,
            times: regional,
        },
        national: StandardSet {
            name: "Swim England".to_string(),
            year: STANDARDS_YEAR,
            times: national,
        },
    }
}
