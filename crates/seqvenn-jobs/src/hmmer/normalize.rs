//! phmmer status classification and hit normalization

use crate::error::{JobError, Result};
use crate::job::JobStatus;
use crate::normalize::Normalized;
use seqvenn_common::table::TabularRecord;
use serde::{Deserialize, Serialize};
use tracing::debug;

const SERVICE: &str = "phmmer";

/// Classify a raw HMMER job status
pub fn classify_status(raw: &str) -> JobStatus {
    match raw {
        "PENDING" | "STARTED" | "RUNNING" => JobStatus::Running,
        "RETRY" => JobStatus::Retry,
        "SUCCESS" => JobStatus::Succeeded,
        "FAILURE" | "ERROR" | "REVOKED" => JobStatus::Failed(raw.to_string()),
        other => JobStatus::Unknown(other.to_string()),
    }
}

/// Metadata of one phmmer hit; the service may omit any field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhmmerHit {
    pub accession: Option<String>,
    pub identifier: Option<String>,
    pub uniprot_accession: Option<String>,
    pub phylum: Option<String>,
    pub species: Option<String>,
}

impl TabularRecord for PhmmerHit {
    const COLUMNS: &'static [&'static str] =
        &["accession", "identifier", "uniprot_accession", "phylum", "species"];

    fn cells(&self) -> Vec<Option<String>> {
        vec![
            self.accession.clone(),
            self.identifier.clone(),
            self.uniprot_accession.clone(),
            self.phylum.clone(),
            self.species.clone(),
        ]
    }
}

#[derive(Debug, Default, Deserialize)]
struct PhmmerDocument {
    #[serde(default)]
    result: Option<PhmmerResult>,
}

#[derive(Debug, Default, Deserialize)]
struct PhmmerResult {
    #[serde(default)]
    hits: Option<Vec<RawHit>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawHit {
    #[serde(default)]
    metadata: Option<PhmmerHit>,
}

/// Flatten `result.hits[].metadata` into one row per hit
///
/// A missing `result`, `hits` or `metadata` yields no rows or an all-null
/// row; a field of the wrong JSON type is rejected.
pub fn normalize_hits(document: &serde_json::Value) -> Result<Normalized<PhmmerHit>> {
    let parsed = PhmmerDocument::deserialize(document)
        .map_err(|e| JobError::normalize(SERVICE, e.to_string()))?;

    let hits = parsed.result.and_then(|r| r.hits).unwrap_or_default();
    debug!(hits = hits.len(), "Normalizing phmmer hits");

    let rows = hits
        .into_iter()
        .map(|hit| hit.metadata.unwrap_or_default())
        .collect();

    Ok(Normalized::rows_only(rows))
}
