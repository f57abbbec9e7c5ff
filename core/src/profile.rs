//! Canonical customer profile, independent of backend domain.
//!
//! Every field has a bounded range or a finite enum domain. Values coming
//! from a backend go through `ProfileData::coerced()` so the profile never
//! holds anything the editor could not display.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

// ── Field bounds ─────────────────────────────────────────────────────────────

pub const AGE_RANGE:           RangeInclusive<u32> = 18..=80;
pub const INCOME_RANGE:        RangeInclusive<u32> = 20_000..=200_000;
pub const INCOME_STEP:         u32 = 5_000;
pub const TENURE_RANGE:        RangeInclusive<u32> = 1..=120;
pub const MONTHLY_SPEND_RANGE: RangeInclusive<u32> = 50..=5_000;
pub const MONTHLY_SPEND_STEP:  u32 = 50;
pub const SUPPORT_CALLS_RANGE: RangeInclusive<u32> = 0..=20;

// ── Enumerated fields ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male   => "Male",
            Gender::Female => "Female",
            Gender::Other  => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceType {
    Basic,
    Standard,
    Premium,
}

impl ServiceType {
    pub const ALL: [ServiceType; 3] = [ServiceType::Basic, ServiceType::Standard, ServiceType::Premium];

    pub fn label(&self) -> &'static str {
        match self {
            ServiceType::Basic    => "Basic",
            ServiceType::Standard => "Standard",
            ServiceType::Premium  => "Premium",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LastInteraction {
    #[serde(rename = "Within 24 hours")]
    Within24Hours,
    #[serde(rename = "Within a week")]
    WithinAWeek,
    #[serde(rename = "Within a month")]
    WithinAMonth,
    #[serde(rename = "Over 3 months")]
    Over3Months,
}

impl LastInteraction {
    pub const ALL: [LastInteraction; 4] = [
        LastInteraction::Within24Hours,
        LastInteraction::WithinAWeek,
        LastInteraction::WithinAMonth,
        LastInteraction::Over3Months,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            LastInteraction::Within24Hours => "Within 24 hours",
            LastInteraction::WithinAWeek   => "Within a week",
            LastInteraction::WithinAMonth  => "Within a month",
            LastInteraction::Over3Months   => "Over 3 months",
        }
    }
}

macro_rules! display_via_label {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        })*
    };
}

display_via_label!(Gender, ServiceType, LastInteraction);

/// Case-insensitive lookup of an enum value by its display label.
pub fn parse_label<T: Copy>(all: &[T], label_of: fn(&T) -> &'static str, raw: &str) -> Option<T> {
    let wanted = raw.trim();
    all.iter().copied().find(|v| label_of(v).eq_ignore_ascii_case(wanted))
}

// ── Profile ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileData {
    pub age:              u32,
    pub gender:           Gender,
    pub income:           u32,
    /// Months with the provider.
    pub tenure:           u32,
    pub service_type:     ServiceType,
    pub monthly_spend:    u32,
    pub auto_pay:         bool,
    pub support_calls:    u32,
    pub last_interaction: LastInteraction,
}

impl Default for ProfileData {
    fn default() -> Self {
        Self {
            age:              42,
            gender:           Gender::Male,
            income:           75_000,
            tenure:           36,
            service_type:     ServiceType::Premium,
            monthly_spend:    1_250,
            auto_pay:         true,
            support_calls:    3,
            last_interaction: LastInteraction::WithinAWeek,
        }
    }
}

impl ProfileData {
    /// Copy with every numeric field pulled inside its range and onto its
    /// step grid.
    pub fn coerced(&self) -> Self {
        Self {
            age:           clamp_u32(self.age, &AGE_RANGE),
            income:        snap(self.income, &INCOME_RANGE, INCOME_STEP),
            tenure:        clamp_u32(self.tenure, &TENURE_RANGE),
            monthly_spend: snap(self.monthly_spend, &MONTHLY_SPEND_RANGE, MONTHLY_SPEND_STEP),
            support_calls: clamp_u32(self.support_calls, &SUPPORT_CALLS_RANGE),
            ..self.clone()
        }
    }

    /// True when `coerced()` would leave the profile unchanged.
    pub fn is_within_bounds(&self) -> bool {
        self.coerced() == *self
    }
}

pub(crate) fn clamp_u32(value: u32, range: &RangeInclusive<u32>) -> u32 {
    value.clamp(*range.start(), *range.end())
}

/// Clamp a raw float into `range`, rounding half away from zero. Non-finite
/// input lands on the lower bound.
pub(crate) fn clamp_f64(value: f64, range: &RangeInclusive<u32>) -> u32 {
    if !value.is_finite() {
        return *range.start();
    }
    value.round().clamp(*range.start() as f64, *range.end() as f64) as u32
}

/// Clamp, then snap to the nearest multiple of `step` counted from the
/// range start.
pub(crate) fn snap(value: u32, range: &RangeInclusive<u32>, step: u32) -> u32 {
    let clamped = clamp_u32(value, range);
    let offset = clamped - range.start();
    let steps = (offset + step / 2) / step;
    clamp_u32(range.start() + steps * step, range)
}
