//! Fixed-column tables
//!
//! Every normalizer in seqvenn produces rows of a record type with a declared
//! column list. [`Table`] is the untyped form of such a result set: the column
//! set never depends on which optional fields a row happens to carry, and a
//! missing value is a `None` cell rather than a missing column.

use crate::error::{Result, TableError};
use std::fmt;
use std::io::{self, IsTerminal, Write};
use std::path::Path;
use std::str::FromStr;

/// A record type that can be laid out as one table row
pub trait TabularRecord {
    /// Column names, in output order
    const COLUMNS: &'static [&'static str];

    /// Cell values in the order of [`Self::COLUMNS`]
    fn cells(&self) -> Vec<Option<String>>;
}

/// Output rendering for a [`Table`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Box-drawn table for terminals
    #[default]
    Table,
    /// JSON array of objects, absent cells as `null`
    Json,
    /// Comma separated values with a header line
    Csv,
    /// Tab separated values with a header line
    Tsv,
}

impl OutputFormat {
    /// Table on a terminal, TSV when stdout is piped
    pub fn for_stdout() -> Self {
        if io::stdout().is_terminal() {
            OutputFormat::Table
        } else {
            OutputFormat::Tsv
        }
    }
}

impl FromStr for OutputFormat {
    type Err = TableError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "tsv" => Ok(OutputFormat::Tsv),
            other => Err(TableError::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Tsv => write!(f, "tsv"),
        }
    }
}

/// Column names plus rows of nullable cells
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    /// Create an empty table with the given columns
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Build a table from typed records
    pub fn from_records<R: TabularRecord>(records: &[R]) -> Self {
        let mut table = Self::new(R::COLUMNS.iter().copied());
        table.rows = records.iter().map(TabularRecord::cells).collect();
        table
    }

    /// Append a row; its width must match the column count
    pub fn push_row(&mut self, row: Vec<Option<String>>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(TableError::RowWidth {
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render the table into a string
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Table => Ok(self.render_box()),
            OutputFormat::Json => self.render_json(),
            OutputFormat::Csv => self.render_delimited(b','),
            OutputFormat::Tsv => self.render_delimited(b'\t'),
        }
    }

    /// Render and write to any writer
    pub fn write_to<W: Write>(&self, format: OutputFormat, mut writer: W) -> Result<()> {
        writer.write_all(self.render(format)?.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Render and write to a file, replacing it
    pub fn write_to_path(&self, format: OutputFormat, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_to(format, io::BufWriter::new(file))
    }

    fn render_box(&self) -> String {
        use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table as Grid};

        let mut grid = Grid::new();
        grid.load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_header(&self.columns);

        for row in &self.rows {
            grid.add_row(row.iter().map(|cell| cell.clone().unwrap_or_default()));
        }

        format!("{}\n", grid)
    }

    fn render_json(&self) -> Result<String> {
        let objects: Vec<serde_json::Map<String, serde_json::Value>> = self
            .rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .zip(row)
                    .map(|(column, cell)| {
                        let value = match cell {
                            Some(s) => serde_json::Value::String(s.clone()),
                            None => serde_json::Value::Null,
                        };
                        (column.clone(), value)
                    })
                    .collect()
            })
            .collect();

        let mut rendered = serde_json::to_string_pretty(&objects)?;
        rendered.push('\n');
        Ok(rendered)
    }

    fn render_delimited(&self, delimiter: u8) -> Result<String> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(Vec::new());

        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| TableError::Io(e.into_error()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    struct Pair {
        left: Option<String>,
        right: Option<String>,
    }

    impl TabularRecord for Pair {
        const COLUMNS: &'static [&'static str] = &["left", "right"];

        fn cells(&self) -> Vec<Option<String>> {
            vec![self.left.clone(), self.right.clone()]
        }
    }

    fn sample() -> Table {
        Table::from_records(&[
            Pair {
                left: Some("P12345".to_string()),
                right: None,
            },
            Pair {
                left: Some("Q67890".to_string()),
                right: Some("XP_1, isoform".to_string()),
            },
        ])
    }

    #[test]
    fn test_from_records_keeps_declared_columns() {
        let table = sample();
        assert_eq!(table.columns(), &["left", "right"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0][1], None);
    }

    #[test]
    fn test_push_row_rejects_wrong_width() {
        let mut table = Table::new(["a", "b"]);
        assert!(table.push_row(vec![None, None]).is_ok());
        let err = table.push_row(vec![None]).unwrap_err();
        assert!(matches!(err, TableError::RowWidth { expected: 2, actual: 1 }));
    }

    #[test]
    fn test_render_csv_quotes_and_blanks() {
        let csv = sample().render(OutputFormat::Csv).unwrap();
        assert_eq!(csv, "left,right\nP12345,\nQ67890,\"XP_1, isoform\"\n");
    }

    #[test]
    fn test_render_tsv() {
        let tsv = sample().render(OutputFormat::Tsv).unwrap();
        assert!(tsv.starts_with("left\tright\n"));
        assert!(tsv.contains("P12345\t\n"));
    }

    #[test]
    fn test_render_json_uses_null() {
        let json = sample().render(OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["left"], "P12345");
        assert!(value[0]["right"].is_null());
    }

    #[test]
    fn test_render_box_contains_cells() {
        let rendered = sample().render(OutputFormat::Table).unwrap();
        assert!(rendered.contains("left"));
        assert!(rendered.contains("Q67890"));
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("CSV".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_write_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hits.csv");
        sample().write_to_path(OutputFormat::Csv, &path).unwrap();
        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.starts_with("left,right"));
    }
}
