//! Typed access to one domain's prediction backend.
//!
//! Responses are classified in a fixed order so callers can tell failures
//! apart: transport error, then non-2xx status, then non-JSON body, then a
//! JSON body with the wrong envelope shape.

use crate::{
    adapter::DomainAdapter,
    creation::flatten_error_body,
    error::{ChurnError, ChurnResult},
    profile::ProfileData,
    transport::{HttpResponse, Transport},
    types::{CustomerId, RiskScore},
};
use serde_json::Value;

/// Result of a successful (or recovered) creation call.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedCustomer {
    pub id:        CustomerId,
    /// Risk returned alongside the creation, when the backend predicted.
    pub risk:      Option<RiskScore>,
    /// True when the call failed with 500 but the customer turned out to
    /// exist anyway.
    pub recovered: bool,
}

pub struct PredictionClient<T: Transport> {
    transport: T,
    adapter:   &'static DomainAdapter,
    base:      String,
}

impl<T: Transport> PredictionClient<T> {
    pub fn new(transport: T, adapter: &'static DomainAdapter, base: impl Into<String>) -> Self {
        Self { transport, adapter, base: base.into() }
    }

    pub fn adapter(&self) -> &'static DomainAdapter {
        self.adapter
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Point the client at another domain, keeping the transport.
    pub fn retarget(&mut self, adapter: &'static DomainAdapter, base: impl Into<String>) {
        self.adapter = adapter;
        self.base = base.into();
    }

    /// `GET /customers/ids`. An empty array is a valid, empty listing.
    pub fn fetch_customer_ids(&self) -> ChurnResult<Vec<CustomerId>> {
        let url = self.adapter.ids_url(&self.base);
        let json = read_json(self.transport.get(&url)?)?;

        let items = json
            .as_array()
            .ok_or(ChurnError::Envelope { expected: "an array of customer ids" })?;

        items
            .iter()
            .map(|item| match item {
                Value::Number(n) => Ok(n.to_string()),
                Value::String(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
                _ => Err(ChurnError::Envelope { expected: "an array of customer ids" }),
            })
            .collect()
    }

    /// `GET /customers/{id}`, mapped onto the canonical profile.
    pub fn fetch_profile(&self, id: &str) -> ChurnResult<ProfileData> {
        let url = self.adapter.detail_url(&self.base, id);
        let json = read_json(self.transport.get(&url)?)?;
        if !json.is_object() {
            return Err(ChurnError::Envelope { expected: "a customer record object" });
        }
        Ok(self.adapter.profile_from_detail(&json))
    }

    /// Whether the backend knows `id`. Only a 2xx answer counts.
    pub fn customer_exists(&self, id: &str) -> ChurnResult<bool> {
        let url = self.adapter.detail_url(&self.base, id);
        Ok(self.transport.get(&url)?.is_success())
    }

    /// `POST /customers/{id}/predict` (or `/predict-only`).
    pub fn predict(&self, id: &str) -> ChurnResult<RiskScore> {
        let url = self.adapter.predict_url(&self.base, id);
        let json = read_json(self.transport.post(&url, None)?)?;
        if !json.is_object() {
            return Err(ChurnError::Envelope { expected: "a prediction object" });
        }
        Ok(self.adapter.risk_from_prediction(&json))
    }

    /// `POST /customers`. A 500 answer triggers one existence check for
    /// `placeholder` before the failure is reported, since a backend may
    /// create the record and then fail while predicting.
    pub fn create_customer(&self, payload: &Value, placeholder: &str) -> ChurnResult<CreatedCustomer> {
        let url = self.adapter.create_url(&self.base);
        let body = serde_json::to_string(payload)?;
        let response = self.transport.post(&url, Some(&body))?;
        let parsed: Option<Value> = serde_json::from_str(&response.body).ok();

        if response.is_success() {
            let json = parsed.ok_or_else(|| not_json(&response))?;
            let id = self
                .adapter
                .created_id(&json)
                .unwrap_or_else(|| placeholder.to_string());
            return Ok(CreatedCustomer {
                id,
                risk: self.adapter.optional_risk(&json),
                recovered: false,
            });
        }

        if response.status == 500 {
            log::warn!("client: create returned 500, checking whether {placeholder} exists");
            match self.customer_exists(placeholder) {
                Ok(true) => {
                    return Ok(CreatedCustomer {
                        id:        placeholder.to_string(),
                        risk:      None,
                        recovered: true,
                    });
                }
                Ok(false) => {}
                Err(e) => log::error!("client: existence check for {placeholder} failed: {e}"),
            }
        }

        match parsed {
            Some(json) => Err(ChurnError::Validation(flatten_error_body(
                response.status,
                Some(&json),
                &response.body,
            ))),
            None => Err(ChurnError::Validation(format!(
                "Invalid response from server ({}): {}",
                response.status,
                if response.body.trim().is_empty() { "Unknown error".to_string() } else { response.snippet() },
            ))),
        }
    }
}

/// Status and content-type gate shared by the read endpoints.
fn read_json(response: HttpResponse) -> ChurnResult<Value> {
    if !response.is_success() {
        log::warn!("client: status {}: {}", response.status, response.snippet());
        return Err(ChurnError::HttpStatus {
            status: response.status,
            body:   response.snippet(),
        });
    }
    if !response.is_json() {
        return Err(not_json(&response));
    }
    serde_json::from_str(&response.body).map_err(|_| not_json(&response))
}

fn not_json(response: &HttpResponse) -> ChurnError {
    ChurnError::NotJson {
        content_type: response.content_type.clone().unwrap_or_else(|| "none".into()),
        snippet:      response.snippet(),
    }
}
