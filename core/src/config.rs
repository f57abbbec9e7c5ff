//! Desk configuration, loaded once at startup and injected into the
//! workspace. Nothing downstream reads the process environment directly.

use crate::{
    domain::Domain,
    error::{ChurnError, ChurnResult},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable overriding the API base for every domain.
pub const API_URL_ENV: &str = "CHURN_API_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskConfig {
    /// Single base URL used for all domains when set.
    pub api_url: Option<String>,
    /// Origin prefixed to the relative default paths (`/api/...`), e.g. the
    /// dev server at `http://localhost:8080`.
    pub origin: Option<String>,
    /// Per-request timeout in milliseconds. `None` waits indefinitely.
    pub timeout_ms: Option<u64>,
    /// Seed for the placeholder id stream. `None` seeds from entropy.
    pub id_seed: Option<u64>,
}

impl DeskConfig {
    /// Load from a JSON file.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: DeskConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Layer `CHURN_API_URL` over whatever was loaded. Empty values are
    /// ignored.
    pub fn apply_env(mut self) -> Self {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                log::debug!("config: {API_URL_ENV} overrides api_url");
                self.api_url = Some(url);
            }
        }
        self
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    pub fn validate(&self) -> ChurnResult<()> {
        if let Some(url) = &self.api_url {
            if url.trim().is_empty() {
                return Err(ChurnError::Config("api_url must not be empty".into()));
            }
        }
        if self.timeout_ms == Some(0) {
            return Err(ChurnError::Config("timeout_ms must be positive".into()));
        }
        Ok(())
    }

    /// Base URL for `domain`: the override when present, otherwise the
    /// domain's default path behind `origin`.
    pub fn base_url(&self, domain: Domain) -> String {
        if let Some(url) = &self.api_url {
            return url.trim_end_matches('/').to_string();
        }
        let path = domain.default_base_path();
        match &self.origin {
            Some(origin) => format!("{}{path}", origin.trim_end_matches('/')),
            None         => path.to_string(),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Config with a fixed id seed and a loopback origin, for tests.
    pub fn default_test() -> Self {
        Self {
            api_url:    None,
            origin:     Some("http://127.0.0.1:8080".into()),
            timeout_ms: Some(2_000),
            id_seed:    Some(42),
        }
    }
}
