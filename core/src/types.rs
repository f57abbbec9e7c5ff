//! Shared primitive types used across the workspace.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque customer identifier as handed out by a backend (numeric-looking).
pub type CustomerId = String;

/// Churn likelihood as an integer percentage, always within [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiskScore(u8);

impl RiskScore {
    pub const MIN: RiskScore = RiskScore(0);

    /// Score shown before any prediction has run, and after a reset.
    pub const RESET: RiskScore = RiskScore(38);

    /// Clamp an integer into range.
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(0, 100) as u8)
    }

    /// Round half away from zero, then clamp. NaN maps to 0.
    pub fn from_percent(value: f64) -> Self {
        if value.is_nan() {
            return Self::MIN;
        }
        Self::clamped(value.round() as i64)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for RiskScore {
    fn default() -> Self {
        Self::RESET
    }
}

impl fmt::Display for RiskScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}
