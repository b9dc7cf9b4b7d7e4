//! Generic asynchronous job client
//!
//! All three remote services follow the same shape: submit a request and
//! receive an opaque job id, poll a status endpoint until the job reaches a
//! terminal state, then fetch the result document. [`JobService`] captures
//! the per-service parts of that cycle and [`run_job`] drives it.
//!
//! ```text
//! submit ──► poll ──► fetch ──► (normalize, per service)
//!             │ ▲
//!             └─┘ running / retry
//! ```

mod poller;

pub use poller::{PollPolicy, Poller};

use crate::error::{JobError, Result};
use async_trait::async_trait;
use std::fmt;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Opaque job identifier issued by a remote service
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobHandle(String);

impl JobHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Job status as classified by the owning service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    /// Queued or running; poll again
    Running,
    /// The service asks the client to come back later
    Retry,
    /// Finished; the result can be fetched
    Succeeded,
    /// Terminal failure reported by the service (raw status string)
    Failed(String),
    /// A status value outside the known set (raw status string)
    Unknown(String),
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Running => f.write_str("running"),
            JobStatus::Retry => f.write_str("retry"),
            JobStatus::Succeeded => f.write_str("succeeded"),
            JobStatus::Failed(raw) => write!(f, "failed ({})", raw),
            JobStatus::Unknown(raw) => write!(f, "unknown ({})", raw),
        }
    }
}

/// One remote service that runs jobs
///
/// `submit` and `status` make exactly one HTTP request per call; `fetch` may
/// read several result pages. Implementations never retry on their own;
/// retry and wait policy belongs to the [`Poller`].
#[async_trait]
pub trait JobService: Send + Sync {
    /// Caller-supplied parameters of one submission
    type Request: Send + Sync;

    /// Short service name used in logs and errors
    fn name(&self) -> &'static str;

    /// Poll policy this client was configured with
    fn policy(&self) -> &PollPolicy;

    /// Submit a job. Not idempotent: every call creates a new remote job.
    async fn submit(&self, request: &Self::Request) -> Result<JobHandle>;

    /// Read and classify the current status of a job
    async fn status(&self, job: &JobHandle) -> Result<JobStatus>;

    /// Retrieve the raw result document of a finished job
    async fn fetch(&self, job: &JobHandle) -> Result<serde_json::Value>;
}

/// Submit, wait for completion and fetch the raw result document
pub async fn run_job<S>(
    service: &S,
    request: &S::Request,
    cancel: &CancellationToken,
) -> Result<serde_json::Value>
where
    S: JobService + ?Sized,
{
    let job = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(JobError::cancelled(service.name(), "<unsubmitted>")),
        job = service.submit(request) => job?,
    };
    info!(service = service.name(), job = %job, "Job submitted");

    Poller::new(service.policy().clone())
        .wait(service, &job, cancel)
        .await?;

    info!(service = service.name(), job = %job, "Job completed, fetching results");
    let document = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(JobError::cancelled(service.name(), &job)),
        document = service.fetch(&job) => document?,
    };

    Ok(document)
}
