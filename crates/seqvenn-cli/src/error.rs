//! Error types for the seqvenn CLI
//!
//! User-facing errors with messages that say what to check next.

use seqvenn_common::TableError;
use seqvenn_jobs::JobError;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    /// A remote job failed at some stage
    #[error("{0}")]
    Job(#[from] JobError),

    /// Result table could not be rendered or written
    #[error("Output error: {0}")]
    Table(#[from] TableError),

    /// Input file is missing
    #[error("File not found: '{0}'. Verify the file path exists and you have read permissions.")]
    FileNotFound(String),

    /// File system operation failed
    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),

    /// Configuration file has invalid syntax or unknown keys
    #[error("Failed to parse config file: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Configuration is missing or invalid
    #[error("Configuration error: {0}. Check your config file and SEQVENN_* environment variables.")]
    Config(String),

    /// Command input is unusable
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CliError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound(path.into())
    }

    /// True when the user interrupted the run
    pub fn is_cancelled(&self) -> bool {
        matches!(self, CliError::Job(e) if e.is_cancelled())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_error_message_passes_through() {
        let err: CliError = JobError::submission("phmmer", "HTTP 500").into();
        assert_eq!(err.to_string(), "phmmer submission failed: HTTP 500");
    }

    #[test]
    fn test_is_cancelled() {
        assert!(CliError::from(JobError::cancelled("blast", "RID1")).is_cancelled());
        assert!(!CliError::invalid_input("empty").is_cancelled());
    }

    #[test]
    fn test_file_not_found_message() {
        let err = CliError::file_not_found("query.fasta");
        assert!(err.to_string().contains("query.fasta"));
    }
}
