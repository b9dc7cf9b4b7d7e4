//! NCBI BLAST through the Common URL API (`Blast.cgi`)
//!
//! `CMD=Put` submits a search and answers with an HTML page whose
//! `QBlastInfo` comment block holds the request id (RID). `CMD=Get` with
//! `FORMAT_OBJECT=SearchInfo` reports progress, and `FORMAT_TYPE=JSON2_S`
//! returns the finished report as a single JSON document.

mod classify;
mod client;
mod normalize;

pub use classify::{map_blast_hits, AccessionOrigin, MappingPlan};
pub use client::{BlastClient, BlastProgram, BlastRequest, DEFAULT_BLAST_DATABASE};
pub use normalize::{classify_status, normalize_hits, qblast_info, BlastHit};
