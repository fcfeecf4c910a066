//! Shared SA value types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SeatingError;
use crate::matrix::FamiliarityMatrix;

/// Whether higher or lower total familiarity is preferred.
///
/// Fixed for the duration of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Seat familiar guests next to each other.
    #[default]
    Maximize,
    /// Seat strangers next to each other.
    Minimize,
}

impl Direction {
    /// Whether a score change of `delta` is an improvement.
    ///
    /// Zero is never an improvement.
    #[inline]
    pub fn improves(self, delta: f64) -> bool {
        match self {
            Direction::Maximize => delta > 0.0,
            Direction::Minimize => delta < 0.0,
        }
    }

    /// Magnitude by which `delta` makes things worse.
    ///
    /// Non-negative for every non-improving `delta`.
    #[inline]
    pub fn worsening(self, delta: f64) -> f64 {
        match self {
            Direction::Maximize => -delta,
            Direction::Minimize => delta,
        }
    }

    /// Whether `candidate` strictly beats `incumbent`. Ties do not.
    #[inline]
    pub fn is_better(self, candidate: f64, incumbent: f64) -> bool {
        match self {
            Direction::Maximize => candidate > incumbent,
            Direction::Minimize => candidate < incumbent,
        }
    }
}

/// How the Metropolis probability of a non-improving swap is formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Acceptance {
    /// `exp(-delta / T)` with `delta = candidate - current` in either
    /// direction. When maximizing, a worsening swap has `p >= 1` and is
    /// taken unless the exponent overflows.
    #[default]
    Signed,
    /// `exp(-w / T)` where `w` is how much the swap worsens the score in
    /// the chosen direction, so maximizing mirrors minimizing.
    Mirrored,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Maximize => f.write_str("max"),
            Direction::Minimize => f.write_str("min"),
        }
    }
}

impl FromStr for Direction {
    type Err = SeatingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "max" | "maximize" => Ok(Direction::Maximize),
            "min" | "minimize" => Ok(Direction::Minimize),
            other => Err(SeatingError::InvalidConfig(format!(
                "unknown direction '{other}', expected 'max' or 'min'"
            ))),
        }
    }
}

/// A finished seating: guest names around the table and their score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seating {
    /// Guests in seat order; the last sits next to the first.
    pub guests: Vec<String>,
    /// Total familiarity of the arrangement.
    pub score: f64,
}

impl Seating {
    /// Names an index arrangement and attaches its score.
    pub fn from_arrangement(matrix: &FamiliarityMatrix, arrangement: &[usize], score: f64) -> Self {
        Self {
            guests: matrix.names_of(arrangement),
            score,
        }
    }
}
