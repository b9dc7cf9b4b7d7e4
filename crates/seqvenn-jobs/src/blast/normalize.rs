//! QBlastInfo parsing and JSON2_S report normalization

use crate::error::{JobError, Result};
use crate::job::JobStatus;
use crate::normalize::Normalized;
use seqvenn_common::table::TabularRecord;
use serde::{Deserialize, Serialize};
use tracing::debug;

const SERVICE: &str = "blast";

/// Read `key = value` from the `QBlastInfoBegin`/`QBlastInfoEnd` block of a
/// URL API page
pub fn qblast_info<'a>(body: &'a str, key: &str) -> Option<&'a str> {
    let start = body.find("QBlastInfoBegin")? + "QBlastInfoBegin".len();
    let block = &body[start..];
    let block = block.find("QBlastInfoEnd").map_or(block, |end| &block[..end]);

    block.lines().find_map(|line| {
        let (name, value) = line.split_once('=')?;
        (name.trim() == key).then(|| value.trim()).filter(|v| !v.is_empty())
    })
}

/// Classify a `FORMAT_OBJECT=SearchInfo` page
pub fn classify_status(body: &str) -> JobStatus {
    match qblast_info(body, "Status") {
        Some("WAITING") => JobStatus::Running,
        Some("READY") => JobStatus::Succeeded,
        Some("FAILED") => JobStatus::Failed("FAILED".to_string()),
        Some(other) => JobStatus::Unknown(other.to_string()),
        None => JobStatus::Unknown(String::new()),
    }
}

/// Scientific notation below 0.001, plain decimal otherwise
fn format_e_value(value: f64) -> String {
    if value != 0.0 && value.abs() < 1e-3 {
        format!("{:e}", value)
    } else {
        value.to_string()
    }
}

/// One high-scoring pair of a BLAST hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlastHit {
    pub hit_id: String,
    pub hit_def: Option<String>,
    pub accession: Option<String>,
    pub e_value: Option<f64>,
    pub identities: Option<u64>,
    pub alignment_length: Option<u64>,
    pub bit_score: Option<f64>,
    pub query_start: Option<u64>,
    pub query_end: Option<u64>,
    pub subject_start: Option<u64>,
    pub subject_end: Option<u64>,
}

impl TabularRecord for BlastHit {
    const COLUMNS: &'static [&'static str] = &[
        "hit_id",
        "hit_def",
        "accession",
        "e_value",
        "identities",
        "alignment_length",
        "bit_score",
        "query_start",
        "query_end",
        "subject_start",
        "subject_end",
    ];

    fn cells(&self) -> Vec<Option<String>> {
        fn cell<T: ToString>(value: Option<T>) -> Option<String> {
            value.map(|v| v.to_string())
        }

        vec![
            Some(self.hit_id.clone()),
            self.hit_def.clone(),
            self.accession.clone(),
            self.e_value.map(format_e_value),
            cell(self.identities),
            cell(self.alignment_length),
            cell(self.bit_score),
            cell(self.query_start),
            cell(self.query_end),
            cell(self.subject_start),
            cell(self.subject_end),
        ]
    }
}

#[derive(Debug, Deserialize)]
struct Json2Document {
    #[serde(rename = "BlastOutput2", default)]
    outputs: Vec<Json2Output>,
}

#[derive(Debug, Default, Deserialize)]
struct Json2Output {
    #[serde(default)]
    report: Option<Json2Report>,
}

#[derive(Debug, Default, Deserialize)]
struct Json2Report {
    #[serde(default)]
    results: Option<Json2Results>,
}

#[derive(Debug, Default, Deserialize)]
struct Json2Results {
    #[serde(default)]
    search: Option<Json2Search>,
}

#[derive(Debug, Default, Deserialize)]
struct Json2Search {
    #[serde(default)]
    hits: Vec<Json2Hit>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Json2Hit {
    #[serde(default)]
    description: Vec<Json2Description>,
    #[serde(default)]
    hsps: Vec<Json2Hsp>,
}

#[derive(Debug, Default, Deserialize)]
struct Json2Description {
    #[serde(default)]
    id: String,
    #[serde(default)]
    accession: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Json2Hsp {
    evalue: Option<f64>,
    identity: Option<u64>,
    align_len: Option<u64>,
    bit_score: Option<f64>,
    query_from: Option<u64>,
    query_to: Option<u64>,
    hit_from: Option<u64>,
    hit_to: Option<u64>,
}

/// Flatten a JSON2_S report into one row per HSP
///
/// Hits without HSPs produce no rows. A search-level `message` (for example
/// "No hits found") is returned as a diagnostic.
pub fn normalize_hits(document: &serde_json::Value) -> Result<Normalized<BlastHit>> {
    let parsed = Json2Document::deserialize(document)
        .map_err(|e| JobError::normalize(SERVICE, e.to_string()))?;

    let mut rows = Vec::new();
    let mut diagnostics = Vec::new();

    let searches = parsed
        .outputs
        .into_iter()
        .filter_map(|output| output.report?.results?.search);

    for search in searches {
        if let Some(message) = search.message.filter(|m| !m.trim().is_empty()) {
            diagnostics.push(message);
        }

        for hit in search.hits {
            let description = hit.description.into_iter().next().unwrap_or_default();
            for hsp in hit.hsps {
                rows.push(BlastHit {
                    hit_id: description.id.clone(),
                    hit_def: description.title.clone(),
                    accession: description.accession.clone(),
                    e_value: hsp.evalue,
                    identities: hsp.identity,
                    alignment_length: hsp.align_len,
                    bit_score: hsp.bit_score,
                    query_start: hsp.query_from,
                    query_end: hsp.query_to,
                    subject_start: hsp.hit_from,
                    subject_end: hsp.hit_to,
                });
            }
        }
    }

    debug!(hsps = rows.len(), "Normalized BLAST report");
    Ok(Normalized::new(rows, diagnostics))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    const PUT_PAGE: &str = r#"<html><body>
<!--QBlastInfoBegin
    RID = 7XK3J9SA016
    RTOE = 18
QBlastInfoEnd
--></body></html>"#;

    fn search_info(status: &str) -> String {
        format!("<!--\nQBlastInfoBegin\n\tStatus={}\nQBlastInfoEnd\n-->", status)
    }

    #[test]
    fn test_qblast_info_reads_block() {
        assert_eq!(qblast_info(PUT_PAGE, "RID"), Some("7XK3J9SA016"));
        assert_eq!(qblast_info(PUT_PAGE, "RTOE"), Some("18"));
        assert_eq!(qblast_info(PUT_PAGE, "Status"), None);
    }

    #[test]
    fn test_qblast_info_ignores_text_outside_block() {
        let body = "RID = OUTSIDE\n<!--QBlastInfoBegin\n    RTOE = 5\nQBlastInfoEnd\n-->";
        assert_eq!(qblast_info(body, "RID"), None);
        assert_eq!(qblast_info("no block here", "RID"), None);
    }

    #[test]
    fn test_classify_status() {
        assert_eq!(classify_status(&search_info("WAITING")), JobStatus::Running);
        assert_eq!(classify_status(&search_info("READY")), JobStatus::Succeeded);
        assert_eq!(
            classify_status(&search_info("FAILED")),
            JobStatus::Failed("FAILED".into())
        );
        assert_eq!(
            classify_status(&search_info("UNKNOWN")),
            JobStatus::Unknown("UNKNOWN".into())
        );
        assert_eq!(classify_status("<html></html>"), JobStatus::Unknown(String::new()));
    }

    fn report() -> serde_json::Value {
        json!({
            "BlastOutput2": [{
                "report": {
                    "program": "blastp",
                    "results": {"search": {
                        "query_id": "Query_1",
                        "hits": [
                            {
                                "num": 1,
                                "description": [
                                    {"id": "ref|XP_011522811.1|", "accession": "XP_011522811", "title": "ATP synthase subunit"},
                                    {"id": "gb|EAW94811.1|", "accession": "EAW94811", "title": "duplicate"}
                                ],
                                "hsps": [
                                    {"num": 1, "bit_score": 512.3, "evalue": 1.5e-180, "identity": 250,
                                     "align_len": 255, "query_from": 1, "query_to": 255, "hit_from": 3, "hit_to": 257},
                                    {"num": 2, "bit_score": 40.0, "evalue": 0.002, "identity": 12,
                                     "align_len": 30, "query_from": 300, "query_to": 329, "hit_from": 10, "hit_to": 39}
                                ]
                            },
                            {
                                "num": 2,
                                "description": [{"id": "gb|AAB12345.1|", "accession": "AAB12345", "title": "hypothetical"}],
                                "hsps": [{"evalue": 3e-20, "identity": 80, "align_len": 120}]
                            }
                        ]
                    }}
                }
            }]
        })
    }

    #[test]
    fn test_one_row_per_hsp() {
        let normalized = normalize_hits(&report()).unwrap();

        assert_eq!(normalized.len(), 3);
        let first = &normalized.rows[0];
        assert_eq!(first.hit_id, "ref|XP_011522811.1|");
        assert_eq!(first.accession.as_deref(), Some("XP_011522811"));
        assert_eq!(first.hit_def.as_deref(), Some("ATP synthase subunit"));
        assert_eq!(first.identities, Some(250));
        assert_eq!(first.subject_start, Some(3));
        assert_eq!(normalized.rows[1].hit_id, "ref|XP_011522811.1|");
        assert_eq!(normalized.rows[1].e_value, Some(0.002));
    }

    #[test]
    fn test_missing_hsp_fields_are_null() {
        let normalized = normalize_hits(&report()).unwrap();
        let sparse = &normalized.rows[2];
        assert_eq!(sparse.bit_score, None);
        assert_eq!(sparse.query_start, None);

        let table = normalized.table();
        assert_eq!(table.columns(), BlastHit::COLUMNS);
        assert_eq!(table.rows()[2][6], None);
    }

    #[test]
    fn test_e_value_cells() {
        assert_eq!(format_e_value(1.5e-180), "1.5e-180");
        assert_eq!(format_e_value(0.002), "0.002");
        assert_eq!(format_e_value(0.0), "0");
        assert_eq!(format_e_value(12.0), "12");
    }

    #[test]
    fn test_no_hits_message_becomes_diagnostic() {
        let document = json!({
            "BlastOutput2": [{"report": {"results": {"search": {"hits": [], "message": "No hits found"}}}}]
        });

        let normalized = normalize_hits(&document).unwrap();

        assert!(normalized.is_empty());
        assert_eq!(normalized.diagnostics, vec!["No hits found".to_string()]);
    }

    #[test]
    fn test_empty_document_has_no_rows() {
        assert!(normalize_hits(&json!({})).unwrap().is_empty());
        assert!(normalize_hits(&json!({"BlastOutput2": [{}]})).unwrap().is_empty());
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let document = json!({"BlastOutput2": [{"report": {"results": {"search": {"hits": "none"}}}}]});
        assert!(matches!(
            normalize_hits(&document).unwrap_err(),
            JobError::Normalize { service: "blast", .. }
        ));
    }
}
