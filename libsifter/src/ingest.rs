//! Parsing of delimited text into a [`Dataset`].
use camino::{Utf8Path, Utf8PathBuf};
use csv::{ReaderBuilder, Trim};
use thiserror::Error;

use crate::dataset::{ColumnKey, DataSource, Dataset, Record};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Malformed delimited text: {0}")]
    Csv(#[from] csv::Error),
    #[error("The file has no header row")]
    MissingHeader,
    #[error("Column {} has an empty name", .index + 1)]
    EmptyColumnName { index: usize },
    #[error("Column '{0}' appears more than once in the header")]
    DuplicateColumn(String),
    #[error("The dropped file has no content")]
    EmptyDrop,
    #[error("Failed to read {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestOptions {
    pub delimiter: u8,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// Diagnostics for a successful parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IngestReport {
    pub rows: usize,
    pub columns: usize,
    /// Fields that were missing or not numeric and therefore became 0.
    pub coerced_fields: usize,
}

#[derive(Debug)]
pub struct Ingested {
    pub dataset: Dataset,
    pub report: IngestReport,
}

/// Parses the leading integer of a field.
///
/// Whitespace around the field is ignored, an optional sign is accepted, and parsing
/// stops at the first non-digit. Returns `None` when there are no digits or the value
/// does not fit in an `i64`.
#[must_use]
pub fn parse_leading_int(field: &str) -> Option<i64> {
    let trimmed = field.trim();
    let unsigned = trimmed.trim_start_matches(['+', '-']);
    let sign_len = trimmed.len() - unsigned.len();
    if sign_len > 1 {
        return None;
    }
    let digits = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .map_or(unsigned, |end| &unsigned[..end]);
    if digits.is_empty() {
        return None;
    }
    trimmed[..sign_len + digits.len()].parse().ok()
}

/// Parses delimited text with a header row. Every field is coerced to an integer; fields
/// that are missing or not numeric become 0.
pub fn parse_delimited(
    data: &[u8],
    options: IngestOptions,
    source: DataSource,
) -> Result<Ingested, IngestError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(data);

    let header = reader.headers()?.clone();
    if header.is_empty() {
        return Err(IngestError::MissingHeader);
    }

    let mut columns: Vec<ColumnKey> = Vec::with_capacity(header.len());
    for (index, name) in header.iter().enumerate() {
        let key = ColumnKey::new(name).ok_or(IngestError::EmptyColumnName { index })?;
        if columns.contains(&key) {
            return Err(IngestError::DuplicateColumn(key.as_str().to_string()));
        }
        columns.push(key);
    }

    let mut report = IngestReport {
        columns: columns.len(),
        ..Default::default()
    };
    let mut records = vec![];
    for row in reader.records() {
        let row = row?;
        // A whitespace-only line trims down to a single empty field.
        if row.len() <= 1 && row.iter().all(str::is_empty) {
            continue;
        }
        let values = (0..columns.len())
            .map(|i| {
                row.get(i).and_then(parse_leading_int).unwrap_or_else(|| {
                    report.coerced_fields += 1;
                    0
                })
            })
            .collect();
        records.push(Record::new(values));
    }
    report.rows = records.len();

    Ok(Ingested {
        dataset: Dataset::new(columns, records, source),
        report,
    })
}

/// Reads and parses a file from disk.
pub fn read_file(path: &Utf8Path, options: IngestOptions) -> Result<Ingested, IngestError> {
    let data = std::fs::read(path).map_err(|source| IngestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_delimited(&data, options, DataSource::File(path.to_path_buf()))
}
