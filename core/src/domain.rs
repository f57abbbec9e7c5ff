//! Industry verticals served by the desk.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Domain {
    Insurance,
    CreditCard,
    Isp,
}

impl Domain {
    pub const ALL: [Domain; 3] = [Domain::Insurance, Domain::CreditCard, Domain::Isp];

    /// Resolve the `domain` query parameter. Absent or unknown keys fall
    /// back to insurance.
    pub fn from_query(key: Option<&str>) -> Self {
        key.and_then(Self::parse).unwrap_or(Domain::Insurance)
    }

    /// Strict parse of a domain key.
    pub fn parse(key: &str) -> Option<Self> {
        match key.trim() {
            "insurance"   => Some(Domain::Insurance),
            "credit-card" => Some(Domain::CreditCard),
            "isp"         => Some(Domain::Isp),
            _             => None,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Domain::Insurance  => "insurance",
            Domain::CreditCard => "credit-card",
            Domain::Isp        => "isp",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Domain::Insurance  => "Insurance",
            Domain::CreditCard => "Credit Card",
            Domain::Isp        => "ISP",
        }
    }

    /// Path the dev proxy forwards to this domain's backend.
    pub fn default_base_path(&self) -> &'static str {
        match self {
            Domain::Insurance  => "/api/insurance",
            Domain::CreditCard => "/api/credit-card",
            Domain::Isp        => "/api/isp",
        }
    }

    /// Local port the backend listens on in development.
    pub fn dev_port(&self) -> u16 {
        match self {
            Domain::Insurance  => 8081,
            Domain::CreditCard => 8000,
            Domain::Isp        => 8090,
        }
    }
}

impl Default for Domain {
    fn default() -> Self {
        Domain::Insurance
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
