//! HTTP seam between the desk and the prediction backends.
//!
//! RULE: a transport only reports what came back. Non-2xx statuses are
//! ordinary responses here; classifying them is the client's job. The
//! only error a transport raises is "could not talk to the host".

use crate::{
    config::DeskConfig,
    error::{ChurnError, ChurnResult},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status:       u16,
    pub content_type: Option<String>,
    pub body:         String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.to_ascii_lowercase().contains("application/json"))
            .unwrap_or(false)
    }

    /// First 200 characters of the body, for log lines and messages.
    pub fn snippet(&self) -> String {
        self.body.chars().take(200).collect()
    }
}

pub trait Transport {
    fn get(&self, url: &str) -> ChurnResult<HttpResponse>;

    /// POST with an optional JSON body.
    fn post(&self, url: &str, body: Option<&str>) -> ChurnResult<HttpResponse>;
}

/// Blocking transport backed by a `ureq` agent.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(config: &DeskConfig) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        Self { agent: builder.build() }
    }

    fn finish(
        &self,
        url: &str,
        result: Result<ureq::Response, ureq::Error>,
    ) -> ChurnResult<HttpResponse> {
        let response = match result {
            Ok(r) => r,
            Err(ureq::Error::Status(_, r)) => r,
            Err(ureq::Error::Transport(t)) => {
                log::warn!("transport: {url} unreachable: {t}");
                return Err(ChurnError::Connection {
                    url:    url.to_string(),
                    reason: t.to_string(),
                });
            }
        };

        let status = response.status();
        let content_type = response.header("content-type").map(str::to_string);
        let body = response.into_string()?;
        log::debug!("transport: {url} -> {status} ({} bytes)", body.len());
        Ok(HttpResponse { status, content_type, body })
    }
}

impl Transport for UreqTransport {
    fn get(&self, url: &str) -> ChurnResult<HttpResponse> {
        log::debug!("transport: GET {url}");
        let result = self
            .agent
            .get(url)
            .set("Content-Type", "application/json")
            .call();
        self.finish(url, result)
    }

    fn post(&self, url: &str, body: Option<&str>) -> ChurnResult<HttpResponse> {
        log::debug!("transport: POST {url}");
        let request = self
            .agent
            .post(url)
            .set("Content-Type", "application/json");
        let result = match body {
            Some(body) => request.send_string(body),
            None       => request.call(),
        };
        self.finish(url, result)
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str) -> ChurnResult<HttpResponse> {
        (**self).get(url)
    }

    fn post(&self, url: &str, body: Option<&str>) -> ChurnResult<HttpResponse> {
        (**self).post(url, body)
    }
}
