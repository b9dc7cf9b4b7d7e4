//! UniProt ID mapping REST client

use super::normalize::{classify_status, normalize_mapping, MappedId};
use crate::config::ServiceConfig;
use crate::endpoints;
use crate::error::{JobError, Result};
use crate::http::{build_http_client, failure_reason, id_field, next_page_url};
use crate::job::{run_job, JobHandle, JobService, JobStatus, PollPolicy};
use crate::normalize::Normalized;
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

const SERVICE: &str = "idmapping";

/// Result rows requested per page; the service default is 25
const PAGE_SIZE: u32 = 500;

/// Append the `results` and `failedIds` arrays of a later page
fn merge_page(document: &mut serde_json::Value, mut page: serde_json::Value) {
    for field in ["results", "failedIds"] {
        let Some(serde_json::Value::Array(more)) = page.get_mut(field).map(serde_json::Value::take) else {
            continue;
        };
        match document.get_mut(field) {
            Some(serde_json::Value::Array(existing)) => existing.extend(more),
            _ => {
                if let Some(object) = document.as_object_mut() {
                    object.insert(field.to_string(), serde_json::Value::Array(more));
                }
            },
        }
    }
}

/// Prepare identifiers for submission
///
/// Drops blank values and repeats, keeping the first occurrence of each id in
/// its original position.
pub fn accession_list<I, S>(ids: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    ids.into_iter()
        .map(|id| id.as_ref().trim().to_string())
        .filter(|id| !id.is_empty())
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

/// One mapping submission between two database namespaces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdMappingRequest {
    pub from: String,
    pub to: String,
    pub ids: Vec<String>,
}

impl IdMappingRequest {
    /// Build a request; `ids` goes through [`accession_list`]
    pub fn new<I, S>(from: impl Into<String>, to: impl Into<String>, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            from: from.into(),
            to: to.into(),
            ids: accession_list(ids),
        }
    }
}

/// ID mapping client
pub struct IdMappingClient {
    client: Client,
    base_url: String,
    policy: PollPolicy,
}

impl IdMappingClient {
    pub fn new(config: &ServiceConfig, user_agent: &str) -> Result<Self> {
        Ok(Self {
            client: build_http_client(config, user_agent)?,
            base_url: config.base_url().to_string(),
            policy: config.poll_policy(),
        })
    }

    /// Run one mapping job and partition its results
    pub async fn map(
        &self,
        request: &IdMappingRequest,
        cancel: &CancellationToken,
    ) -> Result<Normalized<MappedId>> {
        let document = run_job(self, request, cancel).await?;
        let mapping = normalize_mapping(&document)?;
        info!(
            from = %request.from,
            to = %request.to,
            submitted = request.ids.len(),
            mapped = mapping.rows.len(),
            failed = mapping.diagnostics.len(),
            "ID mapping complete"
        );
        Ok(mapping)
    }
}

#[async_trait]
impl JobService for IdMappingClient {
    type Request = IdMappingRequest;

    fn name(&self) -> &'static str {
        SERVICE
    }

    fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    async fn submit(&self, request: &IdMappingRequest) -> Result<JobHandle> {
        if request.ids.is_empty() {
            return Err(JobError::submission(SERVICE, "no identifiers to map"));
        }

        let url = endpoints::idmapping_run_url(&self.base_url);
        let ids = request.ids.join(",");
        info!(from = %request.from, to = %request.to, count = request.ids.len(), "Submitting ID mapping");

        let response = self
            .client
            .post(&url)
            .form(&[("from", request.from.as_str()), ("to", request.to.as_str()), ("ids", ids.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(JobError::submission(SERVICE, failure_reason(response).await));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| JobError::submission(SERVICE, format!("invalid response body: {}", e)))?;

        id_field(&body, "jobId")
            .map(JobHandle::new)
            .ok_or_else(|| JobError::submission(SERVICE, "response has no 'jobId' field"))
    }

    async fn status(&self, job: &JobHandle) -> Result<JobStatus> {
        let url = endpoints::idmapping_status_url(&self.base_url, job.as_str());
        debug!(url = %url, "GET ID mapping status");

        let body: serde_json::Value = self.client.get(&url).send().await?.error_for_status()?.json().await?;
        Ok(classify_status(&body))
    }

    /// Read every results page, following `Link: <...>; rel="next"`
    async fn fetch(&self, job: &JobHandle) -> Result<serde_json::Value> {
        let first_url = endpoints::idmapping_results_url(&self.base_url, job.as_str());
        let mut request = self.client.get(&first_url).query(&[("size", PAGE_SIZE)]);
        let mut document: Option<serde_json::Value> = None;
        let mut pages: u32 = 0;

        loop {
            let response = request.send().await?;
            if !response.status().is_success() {
                return Err(JobError::fetch(SERVICE, job, failure_reason(response).await));
            }

            let next = next_page_url(response.headers());
            let page: serde_json::Value = response
                .json()
                .await
                .map_err(|e| JobError::fetch(SERVICE, job, format!("invalid JSON: {}", e)))?;
            pages += 1;
            debug!(job = %job, page = pages, "Read ID mapping results page");

            document = Some(match document.take() {
                Some(mut merged) => {
                    merge_page(&mut merged, page);
                    merged
                },
                None => page,
            });

            match next {
                Some(url) => request = self.client.get(url),
                None => break,
            }
        }

        Ok(document.unwrap_or_default())
    }
}
