//! ID mapping status classification and result partitioning

use crate::error::{JobError, Result};
use crate::job::JobStatus;
use crate::normalize::Normalized;
use seqvenn_common::table::TabularRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

const SERVICE: &str = "idmapping";

/// Classify an ID mapping status document
///
/// A document without `jobStatus` that already carries `results` or
/// `failedIds` is a finished job whose status URL redirected to its results.
pub fn classify_status(document: &serde_json::Value) -> JobStatus {
    match document.get("jobStatus").and_then(|s| s.as_str()) {
        Some("NEW") | Some("RUNNING") => JobStatus::Running,
        Some("FINISHED") => JobStatus::Succeeded,
        Some(raw @ ("ERROR" | "FAILED")) => JobStatus::Failed(raw.to_string()),
        Some(other) => JobStatus::Unknown(other.to_string()),
        None if document.get("results").is_some() || document.get("failedIds").is_some() => {
            JobStatus::Succeeded
        },
        None => JobStatus::Unknown(String::new()),
    }
}

/// One successfully mapped identifier
///
/// `source_id` is the submitted identifier in the `from` namespace, for
/// example a UniProt accession when mapping phmmer hits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MappedId {
    pub source_id: String,
    pub mapped_id: String,
}

impl MappedId {
    pub fn new(source_id: impl Into<String>, mapped_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            mapped_id: mapped_id.into(),
        }
    }
}

impl TabularRecord for MappedId {
    const COLUMNS: &'static [&'static str] = &["source_id", "mapped_id"];

    fn cells(&self) -> Vec<Option<String>> {
        vec![Some(self.source_id.clone()), Some(self.mapped_id.clone())]
    }
}

#[derive(Debug, Deserialize)]
struct MappingDocument {
    #[serde(default)]
    results: Vec<RawMapping>,
    #[serde(default, rename = "failedIds")]
    failed_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawMapping {
    from: String,
    to: MappingTarget,
}

/// Plain id for cross-reference targets, a full entry for UniProtKB targets
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MappingTarget {
    Id(String),
    Entry {
        #[serde(rename = "primaryAccession")]
        primary_accession: String,
    },
}

impl MappingTarget {
    fn into_id(self) -> String {
        match self {
            MappingTarget::Id(id) => id,
            MappingTarget::Entry { primary_accession } => primary_accession,
        }
    }
}

/// Split a results document into mapped rows and failed identifiers
///
/// Both halves are always returned together: the rows hold `results[]`, the
/// diagnostics hold `failedIds[]` verbatim.
pub fn normalize_mapping(document: &serde_json::Value) -> Result<Normalized<MappedId>> {
    let parsed = MappingDocument::deserialize(document)
        .map_err(|e| JobError::normalize(SERVICE, e.to_string()))?;

    let rows: Vec<MappedId> = parsed
        .results
        .into_iter()
        .map(|raw| MappedId::new(raw.from, raw.to.into_id()))
        .collect();

    let mapped: HashSet<&str> = rows.iter().map(|row| row.source_id.as_str()).collect();
    for id in parsed.failed_ids.iter().filter(|id| mapped.contains(id.as_str())) {
        warn!(id = %id, "Identifier reported as both mapped and failed");
    }

    debug!(mapped = rows.len(), failed = parsed.failed_ids.len(), "Normalized ID mapping results");
    Ok(Normalized::new(rows, parsed.failed_ids))
}
