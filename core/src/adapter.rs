//! Per-domain dispatch: one `DomainAdapter` record per vertical, selected
//! once per session via `DomainAdapter::for_domain`.
//!
//! Each record knows:
//!   - which envelope key wraps a customer detail payload
//!   - how that payload maps onto `ProfileData`
//!   - where the probability sits in a prediction response
//!   - which field carries the id of a freshly created customer
//!   - which path suffix triggers a prediction
//!
//! Mapping is lenient. Missing or non-numeric fields fall back to the
//! documented defaults and never fail the whole payload.

use crate::{
    domain::Domain,
    profile::{self, Gender, ProfileData},
    types::{CustomerId, RiskScore},
};
use serde_json::{Map, Value};

// ── Strategy table ───────────────────────────────────────────────────────────

pub struct DomainAdapter {
    pub domain:           Domain,
    /// Key wrapping the attribute map in `GET /customers/{id}`.
    pub detail_envelope:  &'static str,
    /// Path suffix for `POST /customers/{id}/...`.
    pub predict_suffix:   &'static str,
    /// Field carrying the authoritative id in a creation response.
    pub created_id_field: &'static str,
    map_detail:           fn(&Map<String, Value>) -> RawProfile,
    map_prediction:       fn(&Value) -> Option<f64>,
}

static INSURANCE: DomainAdapter = DomainAdapter {
    domain:           Domain::Insurance,
    detail_envelope:  "data",
    predict_suffix:   "predict",
    created_id_field: "ChassisNo",
    map_detail:       insurance_detail,
    map_prediction:   insurance_probability,
};

static CREDIT_CARD: DomainAdapter = DomainAdapter {
    domain:           Domain::CreditCard,
    detail_envelope:  "data",
    predict_suffix:   "predict",
    created_id_field: "CLIENTNUM",
    map_detail:       credit_card_detail,
    map_prediction:   credit_card_probability,
};

static ISP: DomainAdapter = DomainAdapter {
    domain:           Domain::Isp,
    detail_envelope:  "features",
    predict_suffix:   "predict-only",
    created_id_field: "customer_id",
    map_detail:       isp_detail,
    map_prediction:   isp_probability,
};

impl DomainAdapter {
    pub fn for_domain(domain: Domain) -> &'static DomainAdapter {
        match domain {
            Domain::Insurance  => &INSURANCE,
            Domain::CreditCard => &CREDIT_CARD,
            Domain::Isp        => &ISP,
        }
    }

    // ── URLs ──────────────────────────────────────────────────────

    pub fn ids_url(&self, base: &str) -> String {
        format!("{base}/customers/ids")
    }

    pub fn detail_url(&self, base: &str, id: &str) -> String {
        format!("{base}/customers/{id}")
    }

    pub fn predict_url(&self, base: &str, id: &str) -> String {
        format!("{base}/customers/{id}/{}", self.predict_suffix)
    }

    pub fn create_url(&self, base: &str) -> String {
        format!("{base}/customers")
    }

    // ── Payload mapping ───────────────────────────────────────────

    /// Map a customer detail response onto the canonical profile.
    /// A missing or non-object envelope is treated as an empty record.
    pub fn profile_from_detail(&self, payload: &Value) -> ProfileData {
        let empty = Map::new();
        let record = payload
            .get(self.detail_envelope)
            .and_then(Value::as_object)
            .unwrap_or(&empty);
        (self.map_detail)(record).into_profile()
    }

    /// Map a prediction response onto a risk score. Anything unreadable
    /// scores 0.
    pub fn risk_from_prediction(&self, payload: &Value) -> RiskScore {
        let prediction = payload.get("prediction").unwrap_or(&Value::Null);
        (self.map_prediction)(prediction)
            .map(RiskScore::from_percent)
            .unwrap_or(RiskScore::MIN)
    }

    /// Like `risk_from_prediction`, but `None` when the response carries no
    /// readable probability at all. Creation responses may omit it.
    pub fn optional_risk(&self, payload: &Value) -> Option<RiskScore> {
        payload
            .get("prediction")
            .and_then(self.map_prediction)
            .map(RiskScore::from_percent)
    }

    /// Authoritative id from a creation response. Accepts numbers and
    /// non-empty strings.
    pub fn created_id(&self, payload: &Value) -> Option<CustomerId> {
        match payload.get(self.created_id_field)? {
            Value::Number(n)                    => Some(n.to_string()),
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _                                   => None,
        }
    }
}

// ── Intermediate raw profile ─────────────────────────────────────────────────

/// Backend-supplied fields before range coercion. Fields no backend
/// supplies (income, service type, auto-pay, last interaction) always take
/// the profile defaults.
#[derive(Debug, Clone, PartialEq)]
struct RawProfile {
    age:           f64,
    gender:        Gender,
    tenure:        f64,
    monthly_spend: f64,
    support_calls: f64,
}

impl RawProfile {
    fn into_profile(self) -> ProfileData {
        let defaults = ProfileData::default();
        ProfileData {
            age:           profile::clamp_f64(self.age, &profile::AGE_RANGE),
            gender:        self.gender,
            tenure:        profile::clamp_f64(self.tenure, &profile::TENURE_RANGE),
            monthly_spend: profile::clamp_f64(self.monthly_spend, &profile::MONTHLY_SPEND_RANGE),
            support_calls: profile::clamp_f64(self.support_calls, &profile::SUPPORT_CALLS_RANGE),
            ..defaults
        }
        .coerced()
    }
}

const DEFAULT_AGE:           f64 = 42.0;
const DEFAULT_TENURE:        f64 = 36.0;
const DEFAULT_SPEND:         f64 = 1250.0;
const DEFAULT_SUPPORT_CALLS: f64 = 3.0;

fn number(record: &Map<String, Value>, key: &str) -> Option<f64> {
    record.get(key).and_then(Value::as_f64)
}

fn credit_card_detail(record: &Map<String, Value>) -> RawProfile {
    let gender = match record.get("Gender").and_then(Value::as_str) {
        Some("F") => Gender::Female,
        Some("M") => Gender::Male,
        _         => Gender::Male,
    };
    RawProfile {
        age:           number(record, "Customer_Age").unwrap_or(DEFAULT_AGE),
        gender,
        tenure:        number(record, "Months_on_book").unwrap_or(DEFAULT_TENURE),
        monthly_spend: number(record, "Total_Trans_Amt").unwrap_or(DEFAULT_SPEND),
        support_calls: number(record, "Contacts_Count_12_mon").unwrap_or(DEFAULT_SUPPORT_CALLS),
    }
}

fn insurance_detail(record: &Map<String, Value>) -> RawProfile {
    RawProfile {
        age:           DEFAULT_AGE,
        gender:        Gender::Male,
        tenure:        DEFAULT_TENURE,
        monthly_spend: number(record, "CurrentPremium").unwrap_or(DEFAULT_SPEND),
        support_calls: DEFAULT_SUPPORT_CALLS,
    }
}

fn isp_detail(record: &Map<String, Value>) -> RawProfile {
    // subscription_age is in years
    let years = number(record, "subscription_age").unwrap_or(0.0);
    let download = number(record, "download_avg").unwrap_or(0.0);
    let upload = number(record, "upload_avg").unwrap_or(0.0);
    RawProfile {
        age:           DEFAULT_AGE,
        gender:        Gender::Male,
        tenure:        (years * 12.0).round(),
        monthly_spend: download + upload,
        support_calls: 0.0,
    }
}

fn credit_card_probability(prediction: &Value) -> Option<f64> {
    prediction.get("probability_percent").and_then(Value::as_f64)
}

fn isp_probability(prediction: &Value) -> Option<f64> {
    prediction.get("churn_probability_percent").and_then(Value::as_f64)
}

fn insurance_probability(prediction: &Value) -> Option<f64> {
    let raw = prediction.get("probability").and_then(Value::as_str)?;
    parse_percent(raw)
}

/// Parse `"85.28%"` (suffix optional) into `85.28`.
pub fn parse_percent(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    number.parse::<f64>().ok().filter(|v| v.is_finite())
}
