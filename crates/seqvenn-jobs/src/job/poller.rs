//! Completion poller
//!
//! States: polling → (retrying ↔ polling) → succeeded | failed. A running
//! status waits `poll_interval`; a retry status consumes one unit of the
//! retry budget and waits `retry_interval`; anything terminal ends the loop.
//! The loop also ends on cancellation, after `max_polls` status requests or
//! once `max_wait` has elapsed.

use super::{JobHandle, JobService, JobStatus};
use crate::error::{JobError, Result};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Wait and retry policy for one poll loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    pub poll_interval: Duration,
    pub retry_interval: Duration,
    pub max_retries: u32,
    pub max_polls: Option<u32>,
    pub max_wait: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(3),
            retry_interval: Duration::from_secs(5),
            max_retries: 10,
            max_polls: None,
            max_wait: None,
        }
    }
}

/// Drives the status endpoint of a [`JobService`] until a terminal state
#[derive(Debug, Clone)]
pub struct Poller {
    policy: PollPolicy,
}

impl Poller {
    pub fn new(policy: PollPolicy) -> Self {
        Self { policy }
    }

    /// Poll until the job succeeds
    ///
    /// Returns `Ok(())` on the first `Succeeded` status. No HTTP request is
    /// issued after an error has been decided.
    pub async fn wait<S>(&self, service: &S, job: &JobHandle, cancel: &CancellationToken) -> Result<()>
    where
        S: JobService + ?Sized,
    {
        let started = Instant::now();
        let mut polls: u32 = 0;
        let mut retries: u32 = 0;

        loop {
            if let Some(max_polls) = self.policy.max_polls {
                if polls >= max_polls {
                    return Err(JobError::timeout(
                        service.name(),
                        job,
                        format!("no terminal status after {} polls", polls),
                    ));
                }
            }
            polls += 1;

            let status = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(JobError::cancelled(service.name(), job)),
                status = service.status(job) => status?,
            };
            debug!(service = service.name(), job = %job, poll = polls, status = %status, "Polled job status");

            let delay = match status {
                JobStatus::Running => {
                    info!(service = service.name(), job = %job, poll = polls, "Still running...");
                    self.policy.poll_interval
                },
                JobStatus::Retry => {
                    retries += 1;
                    if retries > self.policy.max_retries {
                        return Err(JobError::RetryBudgetExceeded {
                            service: service.name(),
                            job: job.to_string(),
                            max_retries: self.policy.max_retries,
                        });
                    }
                    warn!(
                        service = service.name(),
                        job = %job,
                        attempt = retries,
                        max_retries = self.policy.max_retries,
                        "Service requested retry"
                    );
                    self.policy.retry_interval
                },
                JobStatus::Succeeded => {
                    info!(service = service.name(), job = %job, polls, "Job succeeded");
                    return Ok(());
                },
                JobStatus::Failed(raw) | JobStatus::Unknown(raw) => {
                    return Err(JobError::UnexpectedJobStatus {
                        service: service.name(),
                        job: job.to_string(),
                        status: raw,
                    });
                },
            };

            if let Some(max_wait) = self.policy.max_wait {
                if started.elapsed() + delay > max_wait {
                    return Err(JobError::timeout(
                        service.name(),
                        job,
                        format!("still pending after {}s", max_wait.as_secs()),
                    ));
                }
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(JobError::cancelled(service.name(), job)),
                _ = tokio::time::sleep(delay) => {},
            }
        }
    }
}
