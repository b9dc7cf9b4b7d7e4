//! Accession overlap between search methods
//!
//! Each accession belongs to exactly one region: the set of methods that
//! found it. Regions are the cells of a Venn diagram over the methods.

use seqvenn_common::table::TabularRecord;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Accessions found by exactly this combination of methods
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverlapRegion {
    pub methods: BTreeSet<String>,
    pub accessions: BTreeSet<String>,
}

impl TabularRecord for OverlapRegion {
    const COLUMNS: &'static [&'static str] = &["methods", "count", "accessions"];

    fn cells(&self) -> Vec<Option<String>> {
        vec![
            Some(join(&self.methods, "+")),
            Some(self.accessions.len().to_string()),
            Some(join(&self.accessions, ";")),
        ]
    }
}

fn join(set: &BTreeSet<String>, separator: &str) -> String {
    set.iter().map(String::as_str).collect::<Vec<_>>().join(separator)
}

/// Non-empty overlap regions, ordered by method set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Overlap {
    /// Every compared method, including those that found nothing
    pub methods: BTreeSet<String>,
    pub regions: Vec<OverlapRegion>,
}

impl Overlap {
    pub fn from_sets(sets: &BTreeMap<String, BTreeSet<String>>) -> Self {
        let mut membership: BTreeMap<&str, BTreeSet<String>> = BTreeMap::new();
        for (method, accessions) in sets {
            for accession in accessions {
                membership.entry(accession.as_str()).or_default().insert(method.clone());
            }
        }

        let mut regions: BTreeMap<BTreeSet<String>, BTreeSet<String>> = BTreeMap::new();
        for (accession, methods) in membership {
            regions.entry(methods).or_default().insert(accession.to_string());
        }

        Self {
            methods: sets.keys().cloned().collect(),
            regions: regions
                .into_iter()
                .map(|(methods, accessions)| OverlapRegion { methods, accessions })
                .collect(),
        }
    }

    /// Number of accessions found by exactly `methods`
    pub fn count_for(&self, methods: &[&str]) -> usize {
        let wanted: BTreeSet<String> = methods.iter().map(|m| m.to_string()).collect();
        self.regions
            .iter()
            .find(|region| region.methods == wanted)
            .map_or(0, |region| region.accessions.len())
    }

    /// Accessions found by every method
    pub fn shared_by_all(&self) -> BTreeSet<String> {
        self.regions
            .iter()
            .filter(|region| region.methods == self.methods)
            .flat_map(|region| region.accessions.iter().cloned())
            .collect()
    }
}
