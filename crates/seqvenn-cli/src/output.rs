//! Result output

use crate::error::{CliError, Result};
use colored::Colorize;
use seqvenn_common::{OutputFormat, Table};
use std::path::Path;
use tracing::info;

/// Resolve `--format`, defaulting on whether stdout is a terminal
pub fn determine_format(format: Option<&str>) -> Result<OutputFormat> {
    match format {
        Some(name) => Ok(name.parse()?),
        None => Ok(OutputFormat::for_stdout()),
    }
}

/// Write a table to `--output` or stdout
pub fn emit(table: &Table, format: OutputFormat, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            table.write_to_path(format, path)?;
            info!(path = %path.display(), rows = table.len(), "Wrote results");
            eprintln!("{} Wrote {} rows to {}", "✓".green(), table.len(), path.display());
        },
        None => table.write_to(format, std::io::stdout().lock())?,
    }
    Ok(())
}

/// Report diagnostics on stderr, one per line under a summary
pub fn report_diagnostics(label: &str, diagnostics: &[String]) {
    if diagnostics.is_empty() {
        return;
    }
    eprintln!("{} {} ({}):", "warning:".yellow().bold(), label, diagnostics.len());
    for item in diagnostics {
        eprintln!("  {}", item);
    }
}

/// Create the comparison output directory
pub fn prepare_dir(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(CliError::invalid_input(format!(
            "output path '{}' exists and is not a directory",
            dir.display()
        )));
    }
    std::fs::create_dir_all(dir)?;
    Ok(())
}
