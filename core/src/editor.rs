//! Field-by-field profile editing through bounded and enumerated controls.

use crate::{
    error::{ChurnError, ChurnResult},
    profile::{
        self, parse_label, Gender, LastInteraction, ProfileData, ServiceType,
        AGE_RANGE, INCOME_RANGE, INCOME_STEP, MONTHLY_SPEND_RANGE, MONTHLY_SPEND_STEP,
        SUPPORT_CALLS_RANGE, TENURE_RANGE,
    },
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProfileField {
    Age,
    Gender,
    Income,
    Tenure,
    ServiceType,
    MonthlySpend,
    AutoPay,
    SupportCalls,
    LastInteraction,
}

impl ProfileField {
    pub const ALL: [ProfileField; 9] = [
        ProfileField::Age,
        ProfileField::Gender,
        ProfileField::Income,
        ProfileField::Tenure,
        ProfileField::ServiceType,
        ProfileField::MonthlySpend,
        ProfileField::AutoPay,
        ProfileField::SupportCalls,
        ProfileField::LastInteraction,
    ];

    /// Wire name, matching the serialized profile.
    pub fn key(&self) -> &'static str {
        match self {
            ProfileField::Age             => "age",
            ProfileField::Gender          => "gender",
            ProfileField::Income          => "income",
            ProfileField::Tenure          => "tenure",
            ProfileField::ServiceType     => "serviceType",
            ProfileField::MonthlySpend    => "monthlySpend",
            ProfileField::AutoPay         => "autoPay",
            ProfileField::SupportCalls    => "supportCalls",
            ProfileField::LastInteraction => "lastInteraction",
        }
    }
}

impl FromStr for ProfileField {
    type Err = ChurnError;

    /// Accepts the camelCase wire name or its snake_case / kebab-case
    /// spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        ProfileField::ALL
            .into_iter()
            .find(|f| f.key().to_lowercase() == folded)
            .ok_or_else(|| ChurnError::Validation(format!("Unknown profile field '{s}'")))
    }
}

/// Apply a textual edit to `profile`. Numeric values are clamped into range
/// and snapped onto the field's step; enum values match their display label
/// case-insensitively. On error the profile is left untouched.
pub fn set_field(profile: &mut ProfileData, field: ProfileField, raw: &str) -> ChurnResult<()> {
    match field {
        ProfileField::Age => {
            profile.age = profile::clamp_f64(parse_number(field, raw)?, &AGE_RANGE);
        }
        ProfileField::Income => {
            let v = profile::clamp_f64(parse_number(field, raw)?, &INCOME_RANGE);
            profile.income = profile::snap(v, &INCOME_RANGE, INCOME_STEP);
        }
        ProfileField::Tenure => {
            profile.tenure = profile::clamp_f64(parse_number(field, raw)?, &TENURE_RANGE);
        }
        ProfileField::MonthlySpend => {
            let v = profile::clamp_f64(parse_number(field, raw)?, &MONTHLY_SPEND_RANGE);
            profile.monthly_spend = profile::snap(v, &MONTHLY_SPEND_RANGE, MONTHLY_SPEND_STEP);
        }
        ProfileField::SupportCalls => {
            profile.support_calls =
                profile::clamp_f64(parse_number(field, raw)?, &SUPPORT_CALLS_RANGE);
        }
        ProfileField::AutoPay => {
            profile.auto_pay = parse_bool(raw)
                .ok_or_else(|| invalid(field, raw))?;
        }
        ProfileField::Gender => {
            profile.gender = parse_label(&Gender::ALL, Gender::label, raw)
                .ok_or_else(|| invalid(field, raw))?;
        }
        ProfileField::ServiceType => {
            profile.service_type = parse_label(&ServiceType::ALL, ServiceType::label, raw)
                .ok_or_else(|| invalid(field, raw))?;
        }
        ProfileField::LastInteraction => {
            profile.last_interaction = parse_label(&LastInteraction::ALL, LastInteraction::label, raw)
                .ok_or_else(|| invalid(field, raw))?;
        }
    }
    log::debug!("editor: {} set to '{}'", field.key(), raw.trim());
    Ok(())
}

fn parse_number(field: ProfileField, raw: &str) -> ChurnResult<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| invalid(field, raw))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1"  => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _                            => None,
    }
}

fn invalid(field: ProfileField, raw: &str) -> ChurnError {
    ChurnError::Validation(format!("Invalid value '{}' for {}", raw.trim(), field.key()))
}
