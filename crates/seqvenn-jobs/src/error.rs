//! Error taxonomy for remote job runs
//!
//! Every variant terminates the run it occurs in. The only built-in
//! resilience is the transient-retry budget of the poller; nothing here is
//! retried or salvaged.

use thiserror::Error;

/// Result type alias for job operations
pub type Result<T> = std::result::Result<T, JobError>;

/// Errors raised while submitting, polling, fetching or normalizing a job
#[derive(Error, Debug)]
pub enum JobError {
    /// The submission request was rejected or its response had no job id
    #[error("{service} submission failed: {reason}")]
    Submission {
        service: &'static str,
        reason: String,
    },

    /// The service kept asking for a retry past the configured budget
    #[error("{service} job {job} exceeded the retry budget ({max_retries} retries)")]
    RetryBudgetExceeded {
        service: &'static str,
        job: String,
        max_retries: u32,
    },

    /// A terminal failure or unrecognized status was reported
    #[error("{service} job {job} failed or returned status: '{status}'")]
    UnexpectedJobStatus {
        service: &'static str,
        job: String,
        status: String,
    },

    /// Result retrieval failed after success was reported
    #[error("{service} result fetch for job {job} failed: {reason}")]
    Fetch {
        service: &'static str,
        job: String,
        reason: String,
    },

    /// Transport-level failure or non-2xx response from any HTTP call
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The poll count or wall-clock limit ran out before a terminal state
    #[error("{service} job {job} did not finish: {reason}")]
    Timeout {
        service: &'static str,
        job: String,
        reason: String,
    },

    /// The caller cancelled the run
    #[error("{service} job {job} was cancelled")]
    Cancelled { service: &'static str, job: String },

    /// The result document does not match the expected schema
    #[error("Malformed {service} result: {reason}")]
    Normalize {
        service: &'static str,
        reason: String,
    },

    /// Client configuration is missing or invalid
    #[error("Configuration error: {0}")]
    Config(String),
}

impl JobError {
    pub fn submission(service: &'static str, reason: impl Into<String>) -> Self {
        Self::Submission {
            service,
            reason: reason.into(),
        }
    }

    pub fn fetch(service: &'static str, job: impl ToString, reason: impl Into<String>) -> Self {
        Self::Fetch {
            service,
            job: job.to_string(),
            reason: reason.into(),
        }
    }

    pub fn timeout(service: &'static str, job: impl ToString, reason: impl Into<String>) -> Self {
        Self::Timeout {
            service,
            job: job.to_string(),
            reason: reason.into(),
        }
    }

    pub fn cancelled(service: &'static str, job: impl ToString) -> Self {
        Self::Cancelled {
            service,
            job: job.to_string(),
        }
    }

    pub fn normalize(service: &'static str, reason: impl Into<String>) -> Self {
        Self::Normalize {
            service,
            reason: reason.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True for errors caused by the caller stopping the run
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}
