//! EMBL-EBI HMMER `phmmer` search
//!
//! `POST /search/phmmer` with `{input, database}` returns `{id}`. The same
//! `GET /result/{id}` resource reports `{status}` while the search runs and
//! carries `result.hits[]` once it has finished.

mod client;
mod normalize;

pub use client::{HmmerClient, PhmmerRequest, DEFAULT_PHMMER_DATABASE};
pub use normalize::{classify_status, normalize_hits, PhmmerHit};
