//! Read transaction CSV exports.
//!
//! Expected layout: a header row, then rows of exactly six columns:
//!   date,account,description,category,tag,amount
//!   2023-11-01,Capital One,Chipotle,Restaurants,,-12.63
//!
//! Column names in the header are ignored; fields are read by position.
//! A single malformed row fails the whole read.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use budget_core::Transaction;
use csv::{ReaderBuilder, StringRecord, Trim};

use crate::types::{RawRow, FIELD_COUNT};

/// Streaming reader over one CSV source.
///
/// `records()` is single-pass: once walked, the rows are gone. Use
/// `read_all()` (or `read_transactions`) to get a reusable `Vec`.
pub struct TransactionReader<R: Read> {
    inner: csv::Reader<R>,
    source: String,
}

impl TransactionReader<File> {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let inner = builder()
            .from_path(path)
            .with_context(|| format!("opening {}", path.display()))?;
        Ok(Self {
            inner,
            source: path.display().to_string(),
        })
    }
}

impl<R: Read> TransactionReader<R> {
    /// `source` is only used to label errors.
    pub fn from_reader(rdr: R, source: impl Into<String>) -> Self {
        Self {
            inner: builder().from_reader(rdr),
            source: source.into(),
        }
    }

    /// One-shot iterator of parsed rows.
    pub fn records(&mut self) -> impl Iterator<Item = Result<Transaction>> + '_ {
        let source = self.source.as_str();
        self.inner.records().map(move |result| {
            let record = result.with_context(|| format!("reading {source}"))?;
            parse_record(&record, source)
        })
    }

    /// Materialize every row, failing on the first bad one.
    pub fn read_all(mut self) -> Result<Vec<Transaction>> {
        let txns = self.records().collect::<Result<Vec<_>>>()?;
        log::info!("read {} transactions from {}", txns.len(), self.source);
        Ok(txns)
    }
}

fn builder() -> ReaderBuilder {
    let mut b = ReaderBuilder::new();
    // field count is checked per row so the error can name the line
    b.has_headers(true).flexible(true).trim(Trim::All);
    b
}

fn parse_record(record: &StringRecord, source: &str) -> Result<Transaction> {
    let line = record.position().map(|p| p.line()).unwrap_or(0);
    if record.len() != FIELD_COUNT {
        bail!(
            "{source}:{line}: expected {FIELD_COUNT} fields, found {}",
            record.len()
        );
    }

    let raw: RawRow = record
        .deserialize(None)
        .with_context(|| format!("{source}:{line}: malformed row"))?;
    raw.parse().with_context(|| format!("{source}:{line}"))
}

/// Read and parse a whole CSV file.
pub fn read_transactions(path: impl AsRef<Path>) -> Result<Vec<Transaction>> {
    TransactionReader::from_path(path)?.read_all()
}

/// Parse CSV text already in memory.
pub fn parse_transactions(text: &str) -> Result<Vec<Transaction>> {
    TransactionReader::from_reader(text.as_bytes(), "<input>").read_all()
}
