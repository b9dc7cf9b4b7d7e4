//! seqvenn job clients
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Submit/poll/fetch clients for the remote services behind a seqvenn run,
//! built on one generic [`job::JobService`] abstraction:
//!
//! - [`hmmer`]: EMBL-EBI HMMER `phmmer` searches
//! - [`blast`]: NCBI BLAST URL API searches plus the accession classifier
//! - [`idmapping`]: UniProt ID mapping between accession namespaces
//! - [`overlap`]: which accessions each method found, as Venn regions
//!
//! Every normalizer returns [`normalize::Normalized`] rows that render as a
//! [`seqvenn_common::Table`].
//!
//! # Example
//!
//! ```no_run
//! use seqvenn_jobs::config::ClientConfig;
//! use seqvenn_jobs::hmmer::{HmmerClient, PhmmerRequest};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> seqvenn_jobs::Result<()> {
//! let config = ClientConfig::from_env()?;
//! let client = HmmerClient::new(&config.hmmer, &config.user_agent)?;
//!
//! let request = PhmmerRequest::new(">query\nMTEITAAMVKELRESTGAGMMDCKNALSEAN");
//! let hits = client.search(&request, &CancellationToken::new()).await?;
//! println!("{} hits", hits.len());
//! # Ok(())
//! # }
//! ```

pub mod blast;
pub mod config;
pub mod endpoints;
pub mod error;
mod http;
pub mod hmmer;
pub mod idmapping;
pub mod job;
pub mod normalize;
pub mod overlap;

pub use config::{ClientConfig, ServiceConfig};
pub use error::{JobError, Result};
pub use job::{run_job, JobHandle, JobService, JobStatus, PollPolicy, Poller};
pub use normalize::Normalized;
pub use overlap::{Overlap, OverlapRegion};
