//! Shared helpers for the HTTP binding tests

#![allow(dead_code)]

use seqvenn_jobs::ServiceConfig;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use wiremock::{Request, Respond, ResponseTemplate};

/// Responds with each template in turn, then repeats the last one
pub struct Sequence {
    responses: Vec<ResponseTemplate>,
    calls: AtomicUsize,
}

impl Sequence {
    pub fn new(responses: Vec<ResponseTemplate>) -> Self {
        assert!(!responses.is_empty(), "sequence needs at least one response");
        Self {
            responses,
            calls: AtomicUsize::new(0),
        }
    }
}

impl Respond for Sequence {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let index = call.min(self.responses.len() - 1);
        self.responses[index].clone()
    }
}

/// Point a preset at the mock server and drop every wait to zero
pub fn fast(config: ServiceConfig, base_url: impl Into<String>) -> ServiceConfig {
    config
        .with_base_url(base_url)
        .with_intervals(Duration::ZERO, Duration::ZERO)
        .with_request_timeout(5)
}

pub fn json(body: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

pub const USER_AGENT: &str = "seqvenn-tests";
