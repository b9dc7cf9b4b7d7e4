//! Uniform normalizer output
//!
//! Every normalizer returns rows plus a diagnostics list, even when the
//! diagnostics are always empty for that service. For ID mapping the
//! diagnostics are the identifiers the service could not resolve.

use seqvenn_common::table::{Table, TabularRecord};

/// Rows of one result set plus diagnostics
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized<R> {
    pub rows: Vec<R>,
    pub diagnostics: Vec<String>,
}

impl<R> Normalized<R> {
    pub fn new(rows: Vec<R>, diagnostics: Vec<String>) -> Self {
        Self { rows, diagnostics }
    }

    pub fn rows_only(rows: Vec<R>) -> Self {
        Self::new(rows, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<R> Default for Normalized<R> {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

impl<R: TabularRecord> Normalized<R> {
    /// Fixed-column table of the rows
    pub fn table(&self) -> Table {
        Table::from_records(&self.rows)
    }
}
