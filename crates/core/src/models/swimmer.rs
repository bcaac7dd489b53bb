use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::record::SwimTimeRecord;
use crate::error::{CoreError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Sex {
    M,
    F,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::M => "M",
            Self::F => "F",
        }
    }
}

impl FromStr for Sex {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "M" | "MALE" => Ok(Self::M),
            "F" | "FEMALE" => Ok(Self::F),
            _ => Err(CoreError::InvalidFormat(format!("unknown sex '{}'", s))),
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn default_target_percentage() -> Decimal {
    dec!(5)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Swimmer {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    pub sex: Sex,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_number: Option<String>,
    #[serde(default, rename = "enteredCompetitions")]
    pub entered_competition_ids: BTreeSet<String>,
    #[serde(default = "default_target_percentage")]
    pub target_percentage: Decimal,
    #[serde(default)]
    pub times: Vec<SwimTimeRecord>,
}

impl Swimmer {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        sex: Sex,
        date_of_birth: Option<NaiveDate>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            date_of_birth,
            sex,
            member_number: None,
            entered_competition_ids: BTreeSet::new(),
            target_percentage: default_target_percentage(),
            times: Vec::new(),
        }
    }

    pub fn has_entered(&self, competition_id: &str) -> bool {
        self.entered_competition_ids.contains(competition_id)
    }
}
