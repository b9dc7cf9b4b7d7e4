//! Client configuration
//!
//! Each service client is built from an explicit [`ServiceConfig`]: base URL,
//! poll cadence, retry budget and limits. Nothing is read from process-wide
//! constants at request time, so tests can point a client at a mock server
//! with millisecond intervals.

use crate::error::{JobError, Result};
use crate::job::PollPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ============================================================================
// Service Defaults
// ============================================================================

/// EMBL-EBI HMMER REST API
pub const DEFAULT_HMMER_BASE_URL: &str = "https://www.ebi.ac.uk/Tools/hmmer/api/v1";

/// NCBI BLAST URL API
pub const DEFAULT_BLAST_BASE_URL: &str = "https://blast.ncbi.nlm.nih.gov/Blast.cgi";

/// UniProt REST API (ID mapping lives under `/idmapping`)
pub const DEFAULT_IDMAPPING_BASE_URL: &str = "https://rest.uniprot.org";

/// Default per-request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Default `User-Agent` sent with every request
pub const DEFAULT_USER_AGENT: &str = concat!("seqvenn/", env!("CARGO_PKG_VERSION"));

/// Connection and polling settings for one remote service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL without trailing slash
    pub base_url: String,
    /// Wait between polls while the job is running
    pub poll_interval_ms: u64,
    /// Wait after a transient-failure status
    pub retry_interval_ms: u64,
    /// Number of transient-failure statuses tolerated
    pub max_retries: u32,
    /// Upper bound on status requests (None for unlimited)
    pub max_polls: Option<u32>,
    /// Wall-clock limit for the poll loop in seconds (None for unlimited)
    pub max_wait_secs: Option<u64>,
    /// Timeout for a single HTTP request
    pub request_timeout_secs: u64,
}

impl ServiceConfig {
    /// HMMER phmmer: poll every 3 s, retry after 5 s, 10 retries
    pub fn hmmer() -> Self {
        Self {
            base_url: DEFAULT_HMMER_BASE_URL.to_string(),
            poll_interval_ms: 3_000,
            retry_interval_ms: 5_000,
            max_retries: 10,
            max_polls: None,
            max_wait_secs: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }

    /// NCBI BLAST: a RID may be polled at most once a minute, no retry status
    pub fn blast() -> Self {
        Self {
            base_url: DEFAULT_BLAST_BASE_URL.to_string(),
            poll_interval_ms: 60_000,
            retry_interval_ms: 60_000,
            max_retries: 0,
            max_polls: None,
            max_wait_secs: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }

    /// UniProt ID mapping: poll every 3 s, retry after 5 s, 5 retries
    pub fn idmapping() -> Self {
        Self {
            base_url: DEFAULT_IDMAPPING_BASE_URL.to_string(),
            poll_interval_ms: 3_000,
            retry_interval_ms: 5_000,
            max_retries: 5,
            max_polls: None,
            max_wait_secs: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }

    /// Set base URL
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set poll and retry intervals
    pub fn with_intervals(mut self, poll: Duration, retry: Duration) -> Self {
        self.poll_interval_ms = duration_ms(poll);
        self.retry_interval_ms = duration_ms(retry);
        self
    }

    /// Set transient-failure retry budget
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Limit the number of status requests
    pub fn with_max_polls(mut self, polls: u32) -> Self {
        self.max_polls = Some(polls);
        self
    }

    /// Limit the wall-clock time spent polling
    pub fn with_max_wait(mut self, secs: u64) -> Self {
        self.max_wait_secs = Some(secs);
        self
    }

    /// Set per-request timeout
    pub fn with_request_timeout(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Base URL with any trailing slash removed
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Poll policy derived from this configuration
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            retry_interval: Duration::from_millis(self.retry_interval_ms),
            max_retries: self.max_retries,
            max_polls: self.max_polls,
            max_wait: self.max_wait_secs.map(Duration::from_secs),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(JobError::config("Service base URL cannot be empty"));
        }

        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(JobError::config(format!(
                "Service base URL must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }

        if self.request_timeout_secs == 0 {
            return Err(JobError::config("Request timeout must be greater than 0"));
        }

        if self.max_polls == Some(0) {
            return Err(JobError::config("max_polls must be greater than 0 when set"));
        }

        Ok(())
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Partial service settings from a config file or the environment
///
/// Unset fields keep the value of the service preset they are applied to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceOverrides {
    pub base_url: Option<String>,
    pub poll_interval_ms: Option<u64>,
    pub retry_interval_ms: Option<u64>,
    pub max_retries: Option<u32>,
    pub max_polls: Option<u32>,
    pub max_wait_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
}

impl ServiceOverrides {
    /// Read `{prefix}_BASE_URL`, `{prefix}_POLL_INTERVAL_MS`,
    /// `{prefix}_RETRY_INTERVAL_MS`, `{prefix}_MAX_RETRIES`,
    /// `{prefix}_MAX_POLLS`, `{prefix}_MAX_WAIT_SECS` and
    /// `{prefix}_REQUEST_TIMEOUT_SECS`
    pub fn from_env(prefix: &str) -> Result<Self> {
        Ok(Self {
            base_url: std::env::var(format!("{}_BASE_URL", prefix)).ok(),
            poll_interval_ms: env_number(prefix, "POLL_INTERVAL_MS")?,
            retry_interval_ms: env_number(prefix, "RETRY_INTERVAL_MS")?,
            max_retries: env_number(prefix, "MAX_RETRIES")?,
            max_polls: env_number(prefix, "MAX_POLLS")?,
            max_wait_secs: env_number(prefix, "MAX_WAIT_SECS")?,
            request_timeout_secs: env_number(prefix, "REQUEST_TIMEOUT_SECS")?,
        })
    }

    /// Layer `other` on top of `self`; values set in `other` win
    pub fn merge(self, other: ServiceOverrides) -> Self {
        Self {
            base_url: other.base_url.or(self.base_url),
            poll_interval_ms: other.poll_interval_ms.or(self.poll_interval_ms),
            retry_interval_ms: other.retry_interval_ms.or(self.retry_interval_ms),
            max_retries: other.max_retries.or(self.max_retries),
            max_polls: other.max_polls.or(self.max_polls),
            max_wait_secs: other.max_wait_secs.or(self.max_wait_secs),
            request_timeout_secs: other.request_timeout_secs.or(self.request_timeout_secs),
        }
    }

    /// Apply onto a preset
    pub fn apply(self, base: ServiceConfig) -> ServiceConfig {
        ServiceConfig {
            base_url: self.base_url.unwrap_or(base.base_url),
            poll_interval_ms: self.poll_interval_ms.unwrap_or(base.poll_interval_ms),
            retry_interval_ms: self.retry_interval_ms.unwrap_or(base.retry_interval_ms),
            max_retries: self.max_retries.unwrap_or(base.max_retries),
            max_polls: self.max_polls.or(base.max_polls),
            max_wait_secs: self.max_wait_secs.or(base.max_wait_secs),
            request_timeout_secs: self.request_timeout_secs.unwrap_or(base.request_timeout_secs),
        }
    }
}

fn env_number<T: std::str::FromStr>(prefix: &str, suffix: &str) -> Result<Option<T>> {
    let key = format!("{}_{}", prefix, suffix);
    match std::env::var(&key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| JobError::config(format!("{} must be a non-negative integer, got '{}'", key, raw))),
        Err(_) => Ok(None),
    }
}

/// Settings for all three services
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub user_agent: String,
    pub hmmer: ServiceConfig,
    pub blast: ServiceConfig,
    pub idmapping: ServiceConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            hmmer: ServiceConfig::hmmer(),
            blast: ServiceConfig::blast(),
            idmapping: ServiceConfig::idmapping(),
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `SEQVENN_USER_AGENT`, `SEQVENN_HMMER_*`,
    /// `SEQVENN_BLAST_*` and `SEQVENN_IDMAPPING_*`
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            user_agent: std::env::var("SEQVENN_USER_AGENT").unwrap_or(defaults.user_agent),
            hmmer: ServiceOverrides::from_env("SEQVENN_HMMER")?.apply(defaults.hmmer),
            blast: ServiceOverrides::from_env("SEQVENN_BLAST")?.apply(defaults.blast),
            idmapping: ServiceOverrides::from_env("SEQVENN_IDMAPPING")?.apply(defaults.idmapping),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate every service section
    pub fn validate(&self) -> Result<()> {
        if self.user_agent.trim().is_empty() {
            return Err(JobError::config("User agent cannot be empty"));
        }
        self.hmmer.validate()?;
        self.blast.validate()?;
        self.idmapping.validate()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let hmmer = ServiceConfig::hmmer();
        assert_eq!(hmmer.base_url(), DEFAULT_HMMER_BASE_URL);
        assert_eq!(hmmer.poll_interval_ms, 3_000);
        assert_eq!(hmmer.retry_interval_ms, 5_000);
        assert_eq!(hmmer.max_retries, 10);
        assert!(hmmer.max_wait_secs.is_none());

        assert_eq!(ServiceConfig::blast().max_retries, 0);
        assert_eq!(ServiceConfig::idmapping().base_url(), DEFAULT_IDMAPPING_BASE_URL);
    }

    #[test]
    fn test_builder_and_policy() {
        let config = ServiceConfig::hmmer()
            .with_base_url("http://127.0.0.1:9000/")
            .with_intervals(Duration::from_millis(10), Duration::from_millis(20))
            .with_max_retries(2)
            .with_max_polls(7)
            .with_max_wait(60);

        assert_eq!(config.base_url(), "http://127.0.0.1:9000");

        let policy = config.poll_policy();
        assert_eq!(policy.poll_interval, Duration::from_millis(10));
        assert_eq!(policy.retry_interval, Duration::from_millis(20));
        assert_eq!(policy.max_retries, 2);
        assert_eq!(policy.max_polls, Some(7));
        assert_eq!(policy.max_wait, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_validate() {
        assert!(ServiceConfig::hmmer().validate().is_ok());
        assert!(ServiceConfig::hmmer().with_base_url("").validate().is_err());
        assert!(ServiceConfig::hmmer()
            .with_base_url("ftp://ftp.ebi.ac.uk")
            .validate()
            .is_err());
        assert!(ServiceConfig::hmmer().with_request_timeout(0).validate().is_err());
        assert!(ServiceConfig::hmmer().with_max_polls(0).validate().is_err());
    }

    #[test]
    fn test_overrides_apply_and_merge() {
        let file = ServiceOverrides {
            base_url: Some("http://file".to_string()),
            max_retries: Some(1),
            ..Default::default()
        };
        let env = ServiceOverrides {
            base_url: Some("http://env".to_string()),
            ..Default::default()
        };

        let config = file.merge(env).apply(ServiceConfig::idmapping());
        assert_eq!(config.base_url, "http://env");
        assert_eq!(config.max_retries, 1);
        assert_eq!(config.poll_interval_ms, 3_000);
    }

    #[test]
    fn test_overrides_from_env() {
        std::env::set_var("SEQVENN_TEST_CFG_BASE_URL", "http://localhost:1234");
        std::env::set_var("SEQVENN_TEST_CFG_MAX_POLLS", "12");
        std::env::set_var("SEQVENN_TEST_CFG_POLL_INTERVAL_MS", "250");

        let overrides = ServiceOverrides::from_env("SEQVENN_TEST_CFG").unwrap();
        assert_eq!(overrides.base_url.as_deref(), Some("http://localhost:1234"));
        assert_eq!(overrides.max_polls, Some(12));
        assert_eq!(overrides.poll_interval_ms, Some(250));
        assert_eq!(overrides.max_retries, None);

        std::env::set_var("SEQVENN_TEST_CFG_MAX_POLLS", "many");
        assert!(ServiceOverrides::from_env("SEQVENN_TEST_CFG").is_err());

        std::env::remove_var("SEQVENN_TEST_CFG_BASE_URL");
        std::env::remove_var("SEQVENN_TEST_CFG_MAX_POLLS");
        std::env::remove_var("SEQVENN_TEST_CFG_POLL_INTERVAL_MS");
    }

    #[test]
    fn test_client_config_default_is_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.user_agent.starts_with("seqvenn/"));
    }
}
