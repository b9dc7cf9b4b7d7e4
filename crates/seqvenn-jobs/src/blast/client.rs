//! BLAST URL API client

use super::normalize::{classify_status, normalize_hits, qblast_info, BlastHit};
use crate::config::ServiceConfig;
use crate::error::{JobError, Result};
use crate::http::{build_http_client, failure_reason};
use crate::job::{run_job, JobHandle, JobService, JobStatus, PollPolicy};
use crate::normalize::Normalized;
use async_trait::async_trait;
use reqwest::Client;
use std::fmt;
use std::str::FromStr;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

const SERVICE: &str = "blast";

/// Non-redundant protein sequences
pub const DEFAULT_BLAST_DATABASE: &str = "nr";

/// BLAST search program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlastProgram {
    Blastp,
    Blastn,
    Blastx,
    Tblastn,
    Tblastx,
}

impl BlastProgram {
    pub const ALL: [BlastProgram; 5] = [
        BlastProgram::Blastp,
        BlastProgram::Blastn,
        BlastProgram::Blastx,
        BlastProgram::Tblastn,
        BlastProgram::Tblastx,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlastProgram::Blastp => "blastp",
            BlastProgram::Blastn => "blastn",
            BlastProgram::Blastx => "blastx",
            BlastProgram::Tblastn => "tblastn",
            BlastProgram::Tblastx => "tblastx",
        }
    }
}

impl fmt::Display for BlastProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlastProgram {
    type Err = JobError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|program| program.as_str() == wanted)
            .ok_or_else(|| {
                JobError::config(format!(
                    "Unknown BLAST program '{}'. Expected one of: blastp, blastn, blastx, tblastn, tblastx",
                    s
                ))
            })
    }
}

/// Parameters of one `CMD=Put` submission
#[derive(Debug, Clone, PartialEq)]
pub struct BlastRequest {
    pub program: BlastProgram,
    pub database: String,
    pub query: String,
    pub expect: Option<f64>,
    pub hitlist_size: Option<u32>,
    pub entrez_query: Option<String>,
}

impl BlastRequest {
    pub fn new(program: BlastProgram, query: impl Into<String>) -> Self {
        Self {
            program,
            database: DEFAULT_BLAST_DATABASE.to_string(),
            query: query.into(),
            expect: None,
            hitlist_size: None,
            entrez_query: None,
        }
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn with_expect(mut self, expect: f64) -> Self {
        self.expect = Some(expect);
        self
    }

    pub fn with_hitlist_size(mut self, size: u32) -> Self {
        self.hitlist_size = Some(size);
        self
    }

    pub fn with_entrez_query(mut self, query: impl Into<String>) -> Self {
        self.entrez_query = Some(query.into());
        self
    }

    fn form(&self) -> Vec<(&'static str, String)> {
        let mut form = vec![
            ("CMD", "Put".to_string()),
            ("PROGRAM", self.program.to_string()),
            ("DATABASE", self.database.clone()),
            ("QUERY", self.query.clone()),
        ];
        if let Some(expect) = self.expect {
            form.push(("EXPECT", expect.to_string()));
        }
        if let Some(size) = self.hitlist_size {
            form.push(("HITLIST_SIZE", size.to_string()));
        }
        if let Some(entrez) = &self.entrez_query {
            form.push(("ENTREZ_QUERY", entrez.clone()));
        }
        form
    }
}

/// BLAST client bound to one `Blast.cgi` endpoint
pub struct BlastClient {
    client: Client,
    base_url: String,
    policy: PollPolicy,
}

impl BlastClient {
    pub fn new(config: &ServiceConfig, user_agent: &str) -> Result<Self> {
        Ok(Self {
            client: build_http_client(config, user_agent)?,
            base_url: config.base_url().to_string(),
            policy: config.poll_policy(),
        })
    }

    /// Run one search to completion and normalize its report
    pub async fn search(
        &self,
        request: &BlastRequest,
        cancel: &CancellationToken,
    ) -> Result<Normalized<BlastHit>> {
        let document = run_job(self, request, cancel).await?;
        let hits = normalize_hits(&document)?;
        info!(program = %request.program, database = %request.database, hsps = hits.len(), "BLAST search complete");
        Ok(hits)
    }

    async fn get(&self, job: &JobHandle, params: &[(&str, &str)]) -> Result<reqwest::Response> {
        debug!(rid = %job, params = ?params, "GET Blast.cgi");
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("CMD", "Get"), ("RID", job.as_str())])
            .query(params)
            .send()
            .await?;
        Ok(response)
    }
}

#[async_trait]
impl JobService for BlastClient {
    type Request = BlastRequest;

    fn name(&self) -> &'static str {
        SERVICE
    }

    fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    async fn submit(&self, request: &BlastRequest) -> Result<JobHandle> {
        if request.query.trim().is_empty() {
            return Err(JobError::submission(SERVICE, "query sequence is empty"));
        }

        info!(program = %request.program, database = %request.database, "Submitting BLAST search");
        let response = self.client.post(&self.base_url).form(&request.form()).send().await?;

        if !response.status().is_success() {
            return Err(JobError::submission(SERVICE, failure_reason(response).await));
        }

        let body = response
            .text()
            .await
            .map_err(|e| JobError::submission(SERVICE, format!("unreadable response: {}", e)))?;

        let rid = qblast_info(&body, "RID")
            .ok_or_else(|| JobError::submission(SERVICE, "response has no RID in its QBlastInfo block"))?;

        if let Some(rtoe) = qblast_info(&body, "RTOE") {
            debug!(rid, estimated_secs = rtoe, "BLAST estimated time of execution");
        }

        Ok(JobHandle::new(rid))
    }

    async fn status(&self, job: &JobHandle) -> Result<JobStatus> {
        let body = self
            .get(job, &[("FORMAT_OBJECT", "SearchInfo")])
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(classify_status(&body))
    }

    async fn fetch(&self, job: &JobHandle) -> Result<serde_json::Value> {
        let response = self.get(job, &[("FORMAT_TYPE", "JSON2_S")]).await?;
        if !response.status().is_success() {
            return Err(JobError::fetch(SERVICE, job, failure_reason(response).await));
        }

        // The URL API labels JSON2_S as text; parse from the raw body.
        let body = response
            .text()
            .await
            .map_err(|e| JobError::fetch(SERVICE, job, e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| JobError::fetch(SERVICE, job, format!("invalid JSON: {}", e)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_program_parse_is_case_insensitive() {
        assert_eq!("blastp".parse::<BlastProgram>().unwrap(), BlastProgram::Blastp);
        assert_eq!("TBLASTN".parse::<BlastProgram>().unwrap(), BlastProgram::Tblastn);
        assert_eq!(" blastx ".parse::<BlastProgram>().unwrap(), BlastProgram::Blastx);
        assert!("psiblast".parse::<BlastProgram>().is_err());
    }

    #[test]
    fn test_program_display_roundtrip() {
        for program in BlastProgram::ALL {
            assert_eq!(program.to_string().parse::<BlastProgram>().unwrap(), program);
        }
    }

    #[test]
    fn test_form_carries_optional_parameters() {
        let request = BlastRequest::new(BlastProgram::Blastx, ">q\nATG")
            .with_database("refseq_protein")
            .with_expect(0.001)
            .with_hitlist_size(50);

        let form = request.form();

        assert!(form.contains(&("CMD", "Put".to_string())));
        assert!(form.contains(&("PROGRAM", "blastx".to_string())));
        assert!(form.contains(&("DATABASE", "refseq_protein".to_string())));
        assert!(form.contains(&("EXPECT", "0.001".to_string())));
        assert!(form.contains(&("HITLIST_SIZE", "50".to_string())));
        assert!(!form.iter().any(|(key, _)| *key == "ENTREZ_QUERY"));
    }

    #[test]
    fn test_request_defaults_to_nr() {
        let request = BlastRequest::new(BlastProgram::Blastp, "MTEIT");
        assert_eq!(request.database, "nr");
        assert_eq!(request.form().len(), 4);
    }
}
