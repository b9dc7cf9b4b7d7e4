//! UniProt ID mapping
//!
//! Translates accessions between database namespaces through the
//! `rest.uniprot.org/idmapping` job API.

mod client;
mod normalize;

pub use client::{accession_list, IdMappingClient, IdMappingRequest};
pub use normalize::{classify_status, normalize_mapping, MappedId};

/// UniProtKB accession or entry name
pub const UNIPROTKB_AC_ID: &str = "UniProtKB_AC-ID";

/// RefSeq protein accession
pub const REFSEQ_PROTEIN: &str = "RefSeq_Protein";

/// INSDC (GenBank/EMBL/DDBJ) protein accession
pub const EMBL_GENBANK_DDBJ: &str = "EMBL-GenBank-DDBJ";
