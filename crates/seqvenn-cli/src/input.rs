//! Query and accession input

use crate::error::{CliError, Result};
use seqvenn_jobs::idmapping::accession_list;
use std::io::Read;
use std::path::Path;

/// Read a file, or stdin when the path is `-`
pub fn read_source(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        return Ok(buffer);
    }

    if !path.exists() {
        return Err(CliError::file_not_found(path.display().to_string()));
    }
    Ok(std::fs::read_to_string(path)?)
}

/// Normalize query text to a single FASTA record
///
/// Bare sequences get a `>query` header. Only the first record of a
/// multi-record file is kept.
pub fn fasta_query(text: &str) -> Result<String> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let (header, body) = match lines.split_first() {
        Some((first, rest)) if first.starts_with('>') => (first.to_string(), rest),
        Some(_) => (">query".to_string(), lines.as_slice()),
        None => return Err(CliError::invalid_input("query sequence is empty")),
    };

    let sequence: Vec<&str> = body.iter().copied().take_while(|line| !line.starts_with('>')).collect();
    if sequence.is_empty() {
        return Err(CliError::invalid_input(format!("FASTA record '{}' has no sequence", header)));
    }

    Ok(format!("{}\n{}\n", header, sequence.join("\n")))
}

/// Split accession text on whitespace and commas, dropping blanks and repeats
pub fn parse_ids(text: &str) -> Vec<String> {
    accession_list(text.split(|c: char| c.is_whitespace() || c == ','))
}
