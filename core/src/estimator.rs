//! Heuristic churn estimate, the offline fallback used when no backend
//! prediction is available.
//!
//! Pure and deterministic: the score is a base of 30 plus a fixed sequence
//! of additive adjustments, clamped into [0, 100]. `explain` exposes each
//! adjustment so callers can show which factors drove the result.

use crate::{
    profile::{LastInteraction, ProfileData, ServiceType},
    types::RiskScore,
};
use serde::Serialize;

pub const BASE_SCORE: i32 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskBreakdown {
    pub base:              i32,
    pub age:               i32,
    pub tenure:            i32,
    pub service_type:      i32,
    pub auto_pay:          i32,
    pub support_calls:     i32,
    pub last_interaction:  i32,
    pub spend_ratio:       i32,
    /// Sum before clamping.
    pub raw_total:         i32,
    pub score:             RiskScore,
}

impl RiskBreakdown {
    /// Named non-zero adjustments, in evaluation order.
    pub fn drivers(&self) -> Vec<(&'static str, i32)> {
        [
            ("age",              self.age),
            ("tenure",           self.tenure),
            ("service_type",     self.service_type),
            ("auto_pay",         self.auto_pay),
            ("support_calls",    self.support_calls),
            ("last_interaction", self.last_interaction),
            ("spend_ratio",      self.spend_ratio),
        ]
        .into_iter()
        .filter(|(_, delta)| *delta != 0)
        .collect()
    }
}

pub fn estimate(profile: &ProfileData) -> RiskScore {
    explain(profile).score
}

pub fn explain(profile: &ProfileData) -> RiskBreakdown {
    let age = if profile.age < 25 {
        10
    } else if profile.age > 60 {
        5
    } else {
        0
    };

    let tenure = if profile.tenure < 12 {
        20
    } else if profile.tenure < 24 {
        10
    } else if profile.tenure > 48 {
        -10
    } else {
        0
    };

    let service_type = match profile.service_type {
        ServiceType::Basic    => 15,
        ServiceType::Standard => 0,
        ServiceType::Premium  => -10,
    };

    let auto_pay = if profile.auto_pay { 0 } else { 10 };

    let support_calls = if profile.support_calls > 5 {
        15
    } else if profile.support_calls > 3 {
        8
    } else if profile.support_calls == 0 {
        -5
    } else {
        0
    };

    let last_interaction = match profile.last_interaction {
        LastInteraction::Over3Months   => 20,
        LastInteraction::WithinAMonth  => 5,
        LastInteraction::Within24Hours => -5,
        LastInteraction::WithinAWeek   => 0,
    };

    let spend_ratio = match spend_ratio(profile) {
        Some(r) if r > 0.3 => 10,
        Some(r) if r < 0.1 => 5,
        _                  => 0,
    };

    let raw_total = BASE_SCORE
        + age
        + tenure
        + service_type
        + auto_pay
        + support_calls
        + last_interaction
        + spend_ratio;

    RiskBreakdown {
        base: BASE_SCORE,
        age,
        tenure,
        service_type,
        auto_pay,
        support_calls,
        last_interaction,
        spend_ratio,
        raw_total,
        score: RiskScore::clamped(raw_total as i64),
    }
}

/// Annual spend over income. `None` for a zero income, which a coerced
/// profile never carries.
fn spend_ratio(profile: &ProfileData) -> Option<f64> {
    if profile.income == 0 {
        return None;
    }
    Some(profile.monthly_spend as f64 * 12.0 / profile.income as f64)
}
