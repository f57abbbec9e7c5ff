//! Scripted in-process backend shared by the workspace tests.

#![allow(dead_code)]

use churn_core::{
    config::DeskConfig,
    domain::Domain,
    error::{ChurnError, ChurnResult},
    transport::{HttpResponse, Transport},
};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

pub const ORIGIN: &str = "http://127.0.0.1:8080";

pub fn base(domain: Domain) -> String {
    format!("{ORIGIN}{}", domain.default_base_path())
}

pub fn test_config() -> DeskConfig {
    let _ = env_logger::builder().is_test(true).try_init();
    DeskConfig::default_test()
}

pub fn json(status: u16, body: Value) -> ChurnResult<HttpResponse> {
    Ok(HttpResponse {
        status,
        content_type: Some("application/json".into()),
        body: body.to_string(),
    })
}

pub fn html(status: u16, body: &str) -> ChurnResult<HttpResponse> {
    Ok(HttpResponse {
        status,
        content_type: Some("text/html; charset=utf-8".into()),
        body: body.to_string(),
    })
}

pub fn refused(url: &str) -> ChurnResult<HttpResponse> {
    Err(ChurnError::Connection {
        url:    url.to_string(),
        reason: "Connection refused".into(),
    })
}

/// Responses are queued per `"METHOD url"`. The last queued response for a
/// route keeps answering once the queue is down to one entry.
#[derive(Default)]
pub struct FakeBackend {
    routes: RefCell<HashMap<String, VecDeque<ChurnResult<HttpResponse>>>>,
    calls:  RefCell<Vec<String>>,
    bodies: RefCell<Vec<String>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, method: &str, url: &str, response: ChurnResult<HttpResponse>) -> &Self {
        self.routes
            .borrow_mut()
            .entry(format!("{method} {url}"))
            .or_default()
            .push_back(response);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self, method: &str, url: &str) -> usize {
        let key = format!("{method} {url}");
        self.calls.borrow().iter().filter(|c| **c == key).count()
    }

    pub fn posted_bodies(&self) -> Vec<String> {
        self.bodies.borrow().clone()
    }

    fn answer(&self, method: &str, url: &str) -> ChurnResult<HttpResponse> {
        let key = format!("{method} {url}");
        self.calls.borrow_mut().push(key.clone());

        let mut routes = self.routes.borrow_mut();
        let Some(queue) = routes.get_mut(&key) else {
            return json(404, serde_json::json!({ "detail": "Not Found" }));
        };
        let next = if queue.len() > 1 { queue.pop_front() } else { None };
        match next {
            Some(response) => response,
            None => match queue.front() {
                Some(Ok(r)) => Ok(r.clone()),
                Some(Err(ChurnError::Connection { url, reason })) => Err(ChurnError::Connection {
                    url:    url.clone(),
                    reason: reason.clone(),
                }),
                Some(Err(e)) => Err(ChurnError::Validation(e.to_string())),
                None => json(404, serde_json::json!({ "detail": "Not Found" })),
            },
        }
    }
}

impl Transport for FakeBackend {
    fn get(&self, url: &str) -> ChurnResult<HttpResponse> {
        self.answer("GET", url)
    }

    fn post(&self, url: &str, body: Option<&str>) -> ChurnResult<HttpResponse> {
        if let Some(body) = body {
            self.bodies.borrow_mut().push(body.to_string());
        }
        self.answer("POST", url)
    }
}
