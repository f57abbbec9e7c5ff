//! User-facing notifications raised by workspace operations.
//!
//! RULE: workspace operations never return errors to their caller. Every
//! failure becomes exactly one `Notification`, worded for the kind of
//! failure so the user knows what to check.

use crate::{domain::Domain, error::ChurnError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title:       String,
    pub description: String,
    pub severity:    Severity,
}

impl Notification {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self { title: title.into(), description: description.into(), severity: Severity::Info }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self { title: title.into(), description: description.into(), severity: Severity::Destructive }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Destructive
    }
}

/// What the user was doing when a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    LoadCustomers,
    LoadProfile,
    Predict,
    Create,
    Edit,
}

impl Operation {
    fn failure_title(&self) -> &'static str {
        match self {
            Operation::LoadCustomers => "Failed to Load Customers",
            Operation::LoadProfile   => "Failed to Load Profile",
            Operation::Predict       => "Prediction failed",
            Operation::Create        => "Unable to create customer",
            Operation::Edit          => "Invalid value",
        }
    }
}

/// Word a failure for the user, by error kind.
pub fn describe_failure(domain: Domain, op: Operation, err: &ChurnError) -> Notification {
    let label = domain.label();
    let port = domain.dev_port();
    match err {
        ChurnError::Connection { .. } => Notification::destructive(
            "Connection Error",
            format!(
                "Cannot connect to {label} backend. Please make sure the backend server is running on port {port}."
            ),
        ),
        ChurnError::HttpStatus { status, .. } => Notification::destructive(
            op.failure_title(),
            format!("Server returned {status}. Check if {label} backend is running on port {port}."),
        ),
        ChurnError::NotJson { .. } => Notification::destructive(
            "Invalid Response",
            format!("Backend returned HTML instead of JSON. Check if {label} backend is running on port {port}."),
        ),
        ChurnError::Envelope { .. } => Notification::destructive(
            "Invalid Response",
            "Server returned invalid customer data format.",
        ),
        ChurnError::Validation(msg) => Notification::destructive(op.failure_title(), msg.clone()),
        other => Notification::destructive(op.failure_title(), other.to_string()),
    }
}
