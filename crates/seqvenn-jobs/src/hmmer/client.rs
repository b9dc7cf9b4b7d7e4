//! HMMER REST client

use super::normalize::{classify_status, normalize_hits, PhmmerHit};
use crate::config::ServiceConfig;
use crate::endpoints;
use crate::error::{JobError, Result};
use crate::http::{build_http_client, failure_reason, id_field};
use crate::job::{run_job, JobHandle, JobService, JobStatus, PollPolicy};
use crate::normalize::Normalized;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

const SERVICE: &str = "phmmer";

/// Sequence database searched when the caller does not pick one
pub const DEFAULT_PHMMER_DATABASE: &str = "refprot";

/// Submission payload: FASTA text plus target database
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhmmerRequest {
    pub input: String,
    pub database: String,
}

impl PhmmerRequest {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            database: DEFAULT_PHMMER_DATABASE.to_string(),
        }
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }
}

/// phmmer search client
pub struct HmmerClient {
    client: Client,
    base_url: String,
    policy: PollPolicy,
}

impl HmmerClient {
    pub fn new(config: &ServiceConfig, user_agent: &str) -> Result<Self> {
        Ok(Self {
            client: build_http_client(config, user_agent)?,
            base_url: config.base_url().to_string(),
            policy: config.poll_policy(),
        })
    }

    /// Run one search to completion and normalize its hits
    pub async fn search(
        &self,
        request: &PhmmerRequest,
        cancel: &CancellationToken,
    ) -> Result<Normalized<PhmmerHit>> {
        let document = run_job(self, request, cancel).await?;
        let hits = normalize_hits(&document)?;
        info!(hits = hits.len(), database = %request.database, "phmmer search complete");
        Ok(hits)
    }

    async fn get_result(&self, job: &JobHandle) -> Result<reqwest::Response> {
        let url = endpoints::hmmer_result_url(&self.base_url, job.as_str());
        debug!(url = %url, "GET phmmer result");
        Ok(self.client.get(&url).header(ACCEPT, "application/json").send().await?)
    }
}

#[async_trait]
impl JobService for HmmerClient {
    type Request = PhmmerRequest;

    fn name(&self) -> &'static str {
        SERVICE
    }

    fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    async fn submit(&self, request: &PhmmerRequest) -> Result<JobHandle> {
        if request.input.trim().is_empty() {
            return Err(JobError::submission(SERVICE, "query sequence is empty"));
        }

        let url = endpoints::phmmer_search_url(&self.base_url);
        debug!(url = %url, database = %request.database, "POST phmmer search");

        let response = self
            .client
            .post(&url)
            .header(ACCEPT, "application/json")
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(JobError::submission(SERVICE, failure_reason(response).await));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| JobError::submission(SERVICE, format!("invalid response body: {}", e)))?;

        id_field(&body, "id")
            .map(JobHandle::new)
            .ok_or_else(|| JobError::submission(SERVICE, "response has no 'id' field"))
    }

    async fn status(&self, job: &JobHandle) -> Result<JobStatus> {
        let body: serde_json::Value = self.get_result(job).await?.error_for_status()?.json().await?;
        let raw = body.get("status").and_then(|s| s.as_str()).unwrap_or_default();
        Ok(classify_status(raw))
    }

    async fn fetch(&self, job: &JobHandle) -> Result<serde_json::Value> {
        let response = self.get_result(job).await?;
        if !response.status().is_success() {
            return Err(JobError::fetch(SERVICE, job, failure_reason(response).await));
        }

        response
            .json()
            .await
            .map_err(|e| JobError::fetch(SERVICE, job, format!("invalid JSON: {}", e)))
    }
}
