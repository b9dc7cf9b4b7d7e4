//! seqvenn common library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared pieces used by every seqvenn workspace member:
//!
//! - **Logging**: tracing subscriber setup driven by `SEQVENN_LOG_*` variables
//! - **Tables**: the fixed-column [`table::Table`] every normalizer produces,
//!   and its table/JSON/CSV/TSV renderings
//!
//! # Example
//!
//! ```no_run
//! use seqvenn_common::table::{OutputFormat, Table};
//!
//! fn main() -> seqvenn_common::Result<()> {
//!     let mut table = Table::new(["accession", "species"]);
//!     table.push_row(vec![Some("P12345".to_string()), None])?;
//!     print!("{}", table.render(OutputFormat::Tsv)?);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod logging;
pub mod table;

pub use error::{Result, TableError};
pub use table::{OutputFormat, Table, TabularRecord};
