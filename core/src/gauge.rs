//! Three-tier banding of a risk score for the gauge display.
//!
//! Bands are half-open on the lower bound: 40 is already MEDIUM and 70 is
//! already HIGH.

use crate::types::RiskScore;
use serde::{Deserialize, Serialize};

pub const MEDIUM_THRESHOLD: u8 = 40;
pub const HIGH_THRESHOLD:   u8 = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl RiskBand {
    pub fn label(&self) -> &'static str {
        match self {
            RiskBand::Low    => "LOW RISK",
            RiskBand::Medium => "MEDIUM RISK",
            RiskBand::High   => "HIGH RISK",
        }
    }

    /// Legend caption shown under the gauge.
    pub fn range_caption(&self) -> &'static str {
        match self {
            RiskBand::Low    => "< 40%",
            RiskBand::Medium => "40% - 70%",
            RiskBand::High   => "> 70%",
        }
    }
}

pub fn band(score: RiskScore) -> RiskBand {
    match score.value() {
        v if v < MEDIUM_THRESHOLD => RiskBand::Low,
        v if v < HIGH_THRESHOLD   => RiskBand::Medium,
        _                         => RiskBand::High,
    }
}
