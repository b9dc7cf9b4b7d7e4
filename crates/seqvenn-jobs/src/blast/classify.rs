//! Route BLAST hits to the ID mapping service by accession namespace
//!
//! BLAST database ids are tagged with their source database (`ref|…|`,
//! `gb|…|`, `emb|…|`, `dbj|…|`, `sp|…|`, …). RefSeq hits already live in the
//! target namespace. INSDC hits (GenBank, EMBL, DDBJ) share one namespace and
//! are mapped to RefSeq in a single job. Everything else is left alone.

use super::normalize::BlastHit;
use crate::error::Result;
use crate::idmapping::{accession_list, IdMappingClient, IdMappingRequest, MappedId, EMBL_GENBANK_DDBJ, REFSEQ_PROTEIN};
use crate::normalize::Normalized;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

const INSDC_TAGS: [&str; 3] = ["gb", "emb", "dbj"];

/// Source namespace of a BLAST hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessionOrigin {
    RefSeq,
    Insdc,
    Other,
}

impl AccessionOrigin {
    /// Classify by the tag before the first `|` of a hit id
    pub fn from_hit_id(hit_id: &str) -> Self {
        let tag = hit_id.split('|').next().unwrap_or_default().trim();
        if tag == "ref" {
            AccessionOrigin::RefSeq
        } else if INSDC_TAGS.contains(&tag) {
            AccessionOrigin::Insdc
        } else {
            AccessionOrigin::Other
        }
    }

    pub fn needs_mapping(&self) -> bool {
        matches!(self, AccessionOrigin::Insdc)
    }
}

/// Accession of a hit: the report's `accession` field, else the second
/// `|`-separated segment of the hit id
fn hit_accession(hit: &BlastHit) -> Option<String> {
    hit.accession
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .or_else(|| hit.hit_id.split('|').nth(1).map(str::trim).filter(|a| !a.is_empty()))
        .map(str::to_string)
}

/// Hits bucketed by what the mapping step has to do with them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingPlan {
    /// RefSeq accessions, carried through unchanged
    pub refseq: Vec<String>,
    /// INSDC accessions to submit for mapping
    pub needs_mapping: Vec<String>,
    /// Hit ids in no mappable namespace
    pub unmapped: Vec<String>,
}

impl MappingPlan {
    pub fn from_hits(hits: &[BlastHit]) -> Self {
        let mut refseq = Vec::new();
        let mut needs_mapping = Vec::new();
        let mut unmapped = Vec::new();

        for hit in hits {
            let origin = AccessionOrigin::from_hit_id(&hit.hit_id);
            match (origin, hit_accession(hit)) {
                (AccessionOrigin::RefSeq, Some(accession)) => refseq.push(accession),
                (AccessionOrigin::Insdc, Some(accession)) => needs_mapping.push(accession),
                _ => unmapped.push(hit.hit_id.clone()),
            }
        }

        Self {
            refseq: accession_list(refseq),
            needs_mapping: accession_list(needs_mapping),
            unmapped: accession_list(unmapped),
        }
    }

    /// Mapping job for the INSDC bucket, or `None` when it is empty
    pub fn request(&self) -> Option<IdMappingRequest> {
        (!self.needs_mapping.is_empty())
            .then(|| IdMappingRequest::new(EMBL_GENBANK_DDBJ, REFSEQ_PROTEIN, &self.needs_mapping))
    }
}

/// Express BLAST hits as RefSeq protein accessions
///
/// RefSeq hits become identity rows, INSDC hits go through one mapping job.
/// Diagnostics hold the ids the service could not map followed by hit ids
/// outside both namespaces. No job is submitted when nothing needs mapping.
pub async fn map_blast_hits(
    client: &IdMappingClient,
    hits: &[BlastHit],
    cancel: &CancellationToken,
) -> Result<Normalized<MappedId>> {
    let plan = MappingPlan::from_hits(hits);
    debug!(
        refseq = plan.refseq.len(),
        needs_mapping = plan.needs_mapping.len(),
        unmapped = plan.unmapped.len(),
        "Classified BLAST hits"
    );

    let mut rows: Vec<MappedId> = plan
        .refseq
        .iter()
        .map(|accession| MappedId::new(accession.as_str(), accession.as_str()))
        .collect();
    let mut diagnostics = Vec::new();

    match plan.request() {
        Some(request) => {
            let mapped = client.map(&request, cancel).await?;
            rows.extend(mapped.rows);
            diagnostics.extend(mapped.diagnostics);
        },
        None => info!("No INSDC accessions to map, skipping ID mapping job"),
    }

    diagnostics.extend(plan.unmapped);
    Ok(Normalized::new(rows, diagnostics))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn hit(hit_id: &str, accession: Option<&str>) -> BlastHit {
        BlastHit {
            hit_id: hit_id.to_string(),
            hit_def: None,
            accession: accession.map(str::to_string),
            e_value: None,
            identities: None,
            alignment_length: None,
            bit_score: None,
            query_start: None,
            query_end: None,
            subject_start: None,
            subject_end: None,
        }
    }

    #[test]
    fn test_origin_by_prefix() {
        assert_eq!(AccessionOrigin::from_hit_id("ref|XP_011522811.1|"), AccessionOrigin::RefSeq);
        assert_eq!(AccessionOrigin::from_hit_id("gb|AAB12345.1|"), AccessionOrigin::Insdc);
        assert_eq!(AccessionOrigin::from_hit_id("emb|CAA12345.1|"), AccessionOrigin::Insdc);
        assert_eq!(AccessionOrigin::from_hit_id("dbj|BAA12345.1|"), AccessionOrigin::Insdc);
        assert_eq!(AccessionOrigin::from_hit_id("sp|P12345|"), AccessionOrigin::Other);
        assert_eq!(AccessionOrigin::from_hit_id(""), AccessionOrigin::Other);
    }

    #[test]
    fn test_prefix_must_be_whole_tag() {
        assert_eq!(AccessionOrigin::from_hit_id("reference|X|"), AccessionOrigin::Other);
        assert_eq!(AccessionOrigin::from_hit_id("gbx|X|"), AccessionOrigin::Other);
        assert!(!AccessionOrigin::from_hit_id("pdb|1ABC|A").needs_mapping());
    }

    #[test]
    fn test_insdc_tags_route_alike() {
        let hits = [
            hit("gb|AAB1.1|", Some("AAB1")),
            hit("emb|CAA2.1|", Some("CAA2")),
            hit("dbj|BAA3.1|", Some("BAA3")),
        ];

        let plan = MappingPlan::from_hits(&hits);

        assert_eq!(plan.needs_mapping, vec!["AAB1", "CAA2", "BAA3"]);
        assert!(plan.refseq.is_empty());
        assert!(plan.unmapped.is_empty());
    }

    #[test]
    fn test_plan_buckets_and_dedupes() {
        let hits = [
            hit("ref|XP_1.1|", Some("XP_1")),
            hit("ref|XP_1.1|", Some("XP_1")),
            hit("gb|AAB1.1|", None),
            hit("sp|P12345|", Some("P12345")),
        ];

        let plan = MappingPlan::from_hits(&hits);

        assert_eq!(plan.refseq, vec!["XP_1"]);
        assert_eq!(plan.needs_mapping, vec!["AAB1.1"]);
        assert_eq!(plan.unmapped, vec!["sp|P12345|"]);
    }

    #[test]
    fn test_request_only_when_needed() {
        let refseq_only = MappingPlan::from_hits(&[hit("ref|XP_1.1|", Some("XP_1"))]);
        assert!(refseq_only.request().is_none());

        let plan = MappingPlan::from_hits(&[hit("emb|CAA2.1|", Some("CAA2"))]);
        let request = plan.request().unwrap();
        assert_eq!(request.from, "EMBL-GenBank-DDBJ");
        assert_eq!(request.to, "RefSeq_Protein");
        assert_eq!(request.ids, vec!["CAA2"]);
    }
}
