//! Shared reqwest plumbing for the service clients

use crate::config::ServiceConfig;
use crate::error::Result;
use reqwest::header::{HeaderMap, LINK};
use reqwest::{Client, Response};
use std::time::Duration;

/// Longest response body excerpt carried in an error message
const ERROR_BODY_LIMIT: usize = 200;

/// Build a client with the service's timeout and the configured user agent
pub(crate) fn build_http_client(config: &ServiceConfig, user_agent: &str) -> Result<Client> {
    config.validate()?;

    let client = Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .user_agent(user_agent)
        .build()?;

    Ok(client)
}

/// Describe a non-success response: status code plus the start of the body
pub(crate) async fn failure_reason(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let excerpt: String = body.trim().chars().take(ERROR_BODY_LIMIT).collect();

    if excerpt.is_empty() {
        format!("HTTP {}", status)
    } else {
        format!("HTTP {}: {}", status, excerpt)
    }
}

/// Read an identifier field that services send either as a string or a number
pub(crate) fn id_field(document: &serde_json::Value, field: &str) -> Option<String> {
    match document.get(field)? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Target of the `rel="next"` entry of a `Link` header, if any
pub(crate) fn next_page_url(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(LINK)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .find_map(|link| {
            let (target, params) = link.split_once(';')?;
            let is_next = params
                .split(';')
                .any(|param| matches!(param.trim(), "rel=\"next\"" | "rel=next"));
            let target = target.trim().strip_prefix('<')?.strip_suffix('>')?;
            is_next.then(|| target.to_string())
        })
}
