//! Command implementations

pub mod blast;
pub mod compare;
pub mod map;
pub mod phmmer;

use seqvenn_common::OutputFormat;
use seqvenn_jobs::ClientConfig;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

/// Settings shared by every command
#[derive(Debug, Clone)]
pub struct Context {
    pub config: ClientConfig,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub cancel: CancellationToken,
}
