use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Swimming stroke. Declaration order is the display order used for
/// personal-best listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stroke {
    Freestyle,
    Backstroke,
    Breaststroke,
    Butterfly,
    #[serde(rename = "Individual Medley")]
    IndividualMedley,
}

impl Stroke {
    pub const ALL: [Stroke; 5] = [
        Self::Freestyle,
        Self::Backstroke,
        Self::Breaststroke,
        Self::Butterfly,
        Self::IndividualMedley,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Freestyle => "Freestyle",
            Self::Backstroke => "Backstroke",
            Self::Breaststroke => "Breaststroke",
            Self::Butterfly => "Butterfly",
            Self::IndividualMedley => "Individual Medley",
        }
    }
}

impl FromStr for Stroke {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|stroke| stroke.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CoreError::UnknownStroke(s.to_string()))
    }
}

impl fmt::Display for Stroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Race distance in meters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Distance {
    M25,
    M50,
    M100,
    M200,
    M400,
    M800,
    M1500,
}

impl Distance {
    pub const ALL: [Distance; 7] = [
        Self::M25,
        Self::M50,
        Self::M100,
        Self::M200,
        Self::M400,
        Self::M800,
        Self::M1500,
    ];

    pub fn meters(&self) -> u16 {
        match self {
            Self::M25 => 25,
            Self::M50 => 50,
            Self::M100 => 100,
            Self::M200 => 200,
            Self::M400 => 400,
            Self::M800 => 800,
            Self::M1500 => 1500,
        }
    }
}

impl TryFrom<u16> for Distance {
    type Error = CoreError;

    fn try_from(meters: u16) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.meters() == meters)
            .ok_or(CoreError::UnsupportedDistance(meters))
    }
}

impl From<Distance> for u16 {
    fn from(distance: Distance) -> Self {
        distance.meters()
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.meters())
    }
}

/// Pool length the time was swum in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Course {
    #[serde(rename = "SCM")]
    ShortCourse,
    #[default]
    #[serde(rename = "LCM")]
    LongCourse,
}

impl Course {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShortCourse => "SCM",
            Self::LongCourse => "LCM",
        }
    }
}

impl FromStr for Course {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "SCM" | "SC" | "SHORT" | "SHORT COURSE" => Ok(Self::ShortCourse),
            "LCM" | "LC" | "LONG" | "LONG COURSE" => Ok(Self::LongCourse),
            _ => Err(CoreError::InvalidFormat(format!("unknown course '{}'", s))),
        }
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SwimEvent {
    pub stroke: Stroke,
    pub distance: Distance,
    pub course: Course,
}

impl SwimEvent {
    pub fn new(stroke: Stroke, distance: Distance, course: Course) -> Self {
        Self {
            stroke,
            distance,
            course,
        }
    }

    pub fn key(&self) -> EventKey {
        EventKey::new(self.stroke, self.distance)
    }
}

/// Course-independent (stroke, distance) pair.
///
/// Serializes as the concatenated text form (`"Freestyle50"`,
/// `"Individual Medley200"`) used by standards tables at the persistence
/// boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EventKey {
    pub stroke: Stroke,
    pub distance: Distance,
}

impl EventKey {
    pub fn new(stroke: Stroke, distance: Distance) -> Self {
        Self { stroke, distance }
    }

    pub fn matches(&self, event: &SwimEvent) -> bool {
        self.stroke == event.stroke && self.distance == event.distance
    }

    /// Human label such as `50m Freestyle`.
    pub fn label(&self) -> String {
        format!("{}m {}", self.distance, self.stroke)
    }

    fn parse_str(s: &str) -> Result<Self> {
        // Longest stroke name that prefixes the key wins.
        let stroke = Stroke::ALL
            .into_iter()
            .filter(|stroke| s.starts_with(stroke.as_str()))
            .max_by_key(|stroke| stroke.as_str().len())
            .ok_or_else(|| CoreError::InvalidEventKey(s.to_string()))?;

        let meters: u16 = s[stroke.as_str().len()..]
            .trim()
            .parse()
            .map_err(|_| CoreError::InvalidEventKey(s.to_string()))?;

        Ok(Self::new(stroke, Distance::try_from(meters)?))
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.stroke, self.distance)
    }
}

impl FromStr for EventKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_str(s)
    }
}

impl TryFrom<String> for EventKey {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse_str(&value)
    }
}

impl From<EventKey> for String {
    fn from(key: EventKey) -> Self {
        key.to_string()
    }
}
