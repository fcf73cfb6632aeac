//! Column-preserving CSV table.
//!
//! Cleaning steps rewrite a few named columns and must hand every other
//! column back untouched, so rows are kept as raw strings rather than
//! deserialized into fixed records.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use csv::{ReaderBuilder, Trim, WriterBuilder};

use crate::encoding::{read_text, write_text, TextEncoding};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Table {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn from_csv_str(text: &str) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::Headers)
            .from_reader(text.as_bytes());
        let headers = reader
            .headers()
            .context("reading CSV header row")?
            .iter()
            .map(str::to_string)
            .collect();
        let mut rows = Vec::new();
        for (idx, record) in reader.records().enumerate() {
            let record = record.with_context(|| format!("reading CSV data row {}", idx + 1))?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(Table { headers, rows })
    }

    pub fn read(path: &Path, encoding: TextEncoding) -> Result<Self> {
        let text = read_text(path, encoding)?;
        Self::from_csv_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn to_csv_string(&self) -> Result<String> {
        let mut writer = WriterBuilder::new().from_writer(Vec::new());
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|err| anyhow!("flushing CSV writer: {}", err.error()))?;
        Ok(String::from_utf8(bytes)?)
    }

    /// Overwrite `path` with this table.
    pub fn write(&self, path: &Path, encoding: TextEncoding) -> Result<()> {
        let text = self.to_csv_string()?;
        write_text(path, &text, encoding)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.rows.iter().map(Vec::as_slice)
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column(name).ok_or_else(|| {
            anyhow!(
                "missing column '{}' (found: {})",
                name,
                self.headers.join(", ")
            )
        })
    }

    /// Index of `name`, appending an empty column when absent.
    pub fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(idx) = self.column(name) {
            return idx;
        }
        self.headers.push(name.to_string());
        for row in &mut self.rows {
            row.push(String::new());
        }
        self.headers.len() - 1
    }

    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows[row][col].as_str()
    }

    pub fn set_cell(&mut self, row: usize, col: usize, value: impl Into<String>) {
        self.rows[row][col] = value.into();
    }
}
