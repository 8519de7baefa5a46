//! Grade-level scale and progression math
//!
//! Pure functions: the cumulative continuation count maps onto a fixed
//! four-step scale. Level-ups are granted at 2, 6 and 14 continuations
//! and the result clamps at the top of the scale.

use serde::{Deserialize, Serialize};

/// Continuation counts at which a level-up is granted.
pub const LEVEL_UP_THRESHOLDS: [u32; 3] = [2, 6, 14];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GradeLevel {
    #[serde(rename = "elementary")]
    Elementary,
    #[serde(rename = "middle school")]
    MiddleSchool,
    #[serde(rename = "high school")]
    HighSchool,
    #[serde(rename = "college")]
    College,
}

const SCALE: [GradeLevel; 4] = [
    GradeLevel::Elementary,
    GradeLevel::MiddleSchool,
    GradeLevel::HighSchool,
    GradeLevel::College,
];

impl GradeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            GradeLevel::Elementary => "elementary",
            GradeLevel::MiddleSchool => "middle school",
            GradeLevel::HighSchool => "high school",
            GradeLevel::College => "college",
        }
    }

    /// Unrecognized level strings fall back to middle school rather than
    /// erroring; the scale is a UI vocabulary, not a validation surface.
    pub fn parse_or_default(s: &str) -> GradeLevel {
        s.parse().unwrap_or(GradeLevel::MiddleSchool)
    }

    fn index(self) -> usize {
        SCALE.iter().position(|l| *l == self).unwrap_or(1)
    }

    fn from_index_clamped(index: usize) -> GradeLevel {
        SCALE[index.min(SCALE.len() - 1)]
    }
}

impl std::fmt::Display for GradeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for GradeLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "elementary" => Ok(GradeLevel::Elementary),
            "middle school" => Ok(GradeLevel::MiddleSchool),
            "high school" => Ok(GradeLevel::HighSchool),
            "college" => Ok(GradeLevel::College),
            _ => Err(format!("Unknown grade level: {}", s)),
        }
    }
}

/// The level to generate the next quiz at, given how many continuation
/// rounds have been completed and where the chain started.
pub fn next_grade_level(continue_count: u32, starting_level: &str) -> GradeLevel {
    let start = GradeLevel::parse_or_default(starting_level);
    let level_ups = LEVEL_UP_THRESHOLDS
        .iter()
        .filter(|threshold| continue_count >= **threshold)
        .count();

    GradeLevel::from_index_clamped(start.index() + level_ups)
}

/// Rounds remaining until the next level-up, independent of the starting
/// level. `None` once every threshold has been passed.
pub fn continues_until_next_level(continue_count: u32) -> Option<u32> {
    LEVEL_UP_THRESHOLDS
        .iter()
        .find(|threshold| **threshold > continue_count)
        .map(|threshold| threshold - continue_count)
}
