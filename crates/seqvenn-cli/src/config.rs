//! Configuration layering for the CLI
//!
//! Built-in service presets, then an optional TOML file, then `SEQVENN_*`
//! environment variables, then command-line flags. Later layers win field by
//! field.
//!
//! ```toml
//! user_agent = "my-lab-pipeline/1.0"
//!
//! [hmmer]
//! poll_interval_ms = 5000
//!
//! [blast]
//! base_url = "https://blast.ncbi.nlm.nih.gov/Blast.cgi"
//! max_wait_secs = 1800
//! ```

use crate::error::{CliError, Result};
use seqvenn_jobs::config::{ClientConfig, ServiceOverrides};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Contents of a `--config` file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub user_agent: Option<String>,
    pub hmmer: ServiceOverrides,
    pub blast: ServiceOverrides,
    pub idmapping: ServiceOverrides,
}

impl FileConfig {
    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CliError::file_not_found(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }
}

/// Limits given on the command line; they apply to every service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LimitFlags {
    pub max_wait_secs: Option<u64>,
    pub max_polls: Option<u32>,
}

impl LimitFlags {
    fn overrides(&self) -> ServiceOverrides {
        ServiceOverrides {
            max_wait_secs: self.max_wait_secs,
            max_polls: self.max_polls,
            ..ServiceOverrides::default()
        }
    }
}

/// Merge every layer into a validated [`ClientConfig`]
pub fn resolve(file: Option<FileConfig>, flags: LimitFlags) -> Result<ClientConfig> {
    let file = file.unwrap_or_default();
    let defaults = ClientConfig::default();

    let layer = |file: ServiceOverrides, prefix: &str| -> Result<ServiceOverrides> {
        let env = ServiceOverrides::from_env(prefix)?;
        Ok(file.merge(env).merge(flags.overrides()))
    };

    let config = ClientConfig {
        user_agent: std::env::var("SEQVENN_USER_AGENT")
            .ok()
            .or(file.user_agent)
            .unwrap_or(defaults.user_agent),
        hmmer: layer(file.hmmer, "SEQVENN_HMMER")?.apply(defaults.hmmer),
        blast: layer(file.blast, "SEQVENN_BLAST")?.apply(defaults.blast),
        idmapping: layer(file.idmapping, "SEQVENN_IDMAPPING")?.apply(defaults.idmapping),
    };

    config.validate()?;
    debug!(?config, "Resolved client configuration");
    Ok(config)
}

/// Load the optional config file and resolve the full configuration
pub fn load(path: Option<&Path>, flags: LimitFlags) -> Result<ClientConfig> {
    let file = path.map(FileConfig::load).transpose()?;
    resolve(file, flags)
}
