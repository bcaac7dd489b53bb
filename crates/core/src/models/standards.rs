use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::event::EventKey;
use super::swimmer::Sex;
use crate::error::{CoreError, Result};

/// Age bucket selecting a row of a standards table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "10 & 11")]
    TenAndEleven,
    #[serde(rename = "12")]
    Twelve,
    #[serde(rename = "13")]
    Thirteen,
    #[serde(rename = "14")]
    Fourteen,
    #[serde(rename = "15")]
    Fifteen,
    #[serde(rename = "16")]
    Sixteen,
    #[serde(rename = "17")]
    Seventeen,
    #[serde(rename = "18+")]
    EighteenAndOver,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 8] = [
        Self::TenAndEleven,
        Self::Twelve,
        Self::Thirteen,
        Self::Fourteen,
        Self::Fifteen,
        Self::Sixteen,
        Self::Seventeen,
        Self::EighteenAndOver,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::TenAndEleven => "10 & 11",
            Self::Twelve => "12",
            Self::Thirteen => "13",
            Self::Fourteen => "14",
            Self::Fifteen => "15",
            Self::Sixteen => "16",
            Self::Seventeen => "17",
            Self::EighteenAndOver => "18+",
        }
    }
}

impl FromStr for AgeGroup {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|group| group.label() == trimmed)
            .ok_or_else(|| CoreError::InvalidFormat(format!("unknown age group '{}'", s)))
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

type EventTimes = BTreeMap<EventKey, i64>;

/// Qualifying times in milliseconds, keyed sex → age group → event.
///
/// Non-positive times are never returned: a zero cell reads the same as a
/// missing one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StandardsTable(BTreeMap<Sex, BTreeMap<AgeGroup, EventTimes>>);

impl StandardsTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, sex: Sex, group: AgeGroup, key: EventKey) -> Option<i64> {
        self.0
            .get(&sex)?
            .get(&group)?
            .get(&key)
            .copied()
            .filter(|ms| *ms > 0)
    }

    /// Writes one cell. A non-positive time clears the cell instead.
    pub fn set(&mut self, sex: Sex, group: AgeGroup, key: EventKey, time_ms: i64) {
        if time_ms <= 0 {
            self.remove(sex, group, key);
            return;
        }
        self.0
            .entry(sex)
            .or_default()
            .entry(group)
            .or_default()
            .insert(key, time_ms);
    }

    pub fn remove(&mut self, sex: Sex, group: AgeGroup, key: EventKey) -> Option<i64> {
        let groups = self.0.get_mut(&sex)?;
        let events = groups.get_mut(&group)?;
        let removed = events.remove(&key);
        if events.is_empty() {
            groups.remove(&group);
        }
        if groups.is_empty() {
            self.0.remove(&sex);
        }
        removed
    }

    /// Events with a usable standard for one (sex, age group) row.
    pub fn events(&self, sex: Sex, group: AgeGroup) -> impl Iterator<Item = (EventKey, i64)> + '_ {
        self.0
            .get(&sex)
            .and_then(|groups| groups.get(&group))
            .into_iter()
            .flat_map(|events| events.iter())
            .filter(|(_, ms)| **ms > 0)
            .map(|(key, ms)| (*key, *ms))
    }

    pub fn cells(&self) -> impl Iterator<Item = (Sex, AgeGroup, EventKey, i64)> + '_ {
        self.0.iter().flat_map(|(sex, groups)| {
            groups.iter().flat_map(move |(group, events)| {
                events
                    .iter()
                    .filter(|(_, ms)| **ms > 0)
                    .map(move |(key, ms)| (*sex, *group, *key, *ms))
            })
        })
    }

    pub fn has_row(&self, sex: Sex, group: AgeGroup) -> bool {
        self.events(sex, group).next().is_some()
    }

    pub fn len(&self) -> usize {
        self.cells().count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells().next().is_none()
    }

    /// Copies every cell of `other` over this table.
    pub fn extend_from(&mut self, other: &StandardsTable) {
        for (sex, group, key, ms) in other.cells() {
            self.set(sex, group, key, ms);
        }
    }
}

impl FromIterator<(Sex, AgeGroup, EventKey, i64)> for StandardsTable {
    fn from_iter<I: IntoIterator<Item = (Sex, AgeGroup, EventKey, i64)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (sex, group, key, ms) in iter {
            table.set(sex, group, key, ms);
        }
        table
    }
}

/// A named, dated standards table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardSet {
    pub name: String,
    pub year: i32,
    pub times: StandardsTable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    County,
    Regional,
    National,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Self::County, Self::Regional, Self::National];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::County => "County",
            Self::Regional => "Regional",
            Self::National => "National",
        }
    }
}

impl FromStr for Tier {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "county" => Ok(Self::County),
            "regional" => Ok(Self::Regional),
            "national" => Ok(Self::National),
            _ => Err(CoreError::InvalidFormat(format!("unknown tier '{}'", s))),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three default standard tiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QualifyingStandards {
    pub county: StandardSet,
    pub regional: StandardSet,
    pub national: StandardSet,
}

impl QualifyingStandards {
    pub fn tier(&self, tier: Tier) -> &StandardSet {
        match tier {
            Tier::County => &self.county,
            Tier::Regional => &self.regional,
            Tier::National => &self.national,
        }
    }

    pub fn tier_mut(&mut self, tier: Tier) -> &mut StandardSet {
        match tier {
            Tier::County => &mut self.county,
            Tier::Regional => &mut self.regional,
            Tier::National => &mut self.national,
        }
    }
}
