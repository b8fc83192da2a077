//! Column identifiers, records and the per-column map type.
use std::collections::BTreeSet;

use camino::Utf8PathBuf;
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Numbers making up the built-in sample. Every other sample column is `number mod k`.
const SAMPLE_NUMBERS: [i64; 11] = [12, 24, 36, 48, 60, 7, 14, 25, 101, 888, 5664];
const SAMPLE_MODULI: [i64; 4] = [3, 4, 5, 6];

/// Validated column identifier: trimmed, non-empty header text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize)]
#[display("{_0}")]
pub struct ColumnKey(String);

impl ColumnKey {
    /// Returns `None` if the name is empty after trimming.
    #[must_use]
    pub fn new(name: &str) -> Option<Self> {
        let trimmed = name.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Where the current dataset came from.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum DataSource {
    #[display("Built-in sample")]
    Sample,
    #[display("{_0}")]
    File(Utf8PathBuf),
    #[display("{_0} (uploaded)")]
    Upload(String),
}

/// One row. Values are aligned with [`Dataset::columns`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    values: Vec<i64>,
}

impl Record {
    #[must_use]
    pub fn new(values: Vec<i64>) -> Self {
        Self { values }
    }

    #[must_use]
    pub fn values(&self) -> &[i64] {
        &self.values
    }

    /// Value at a column position, as resolved by [`Dataset::column_index`].
    #[must_use]
    pub fn value(&self, column: usize) -> i64 {
        self.values[column]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    columns: Vec<ColumnKey>,
    records: Vec<Record>,
    source: DataSource,
}

impl Dataset {
    /// Builds a dataset from uniform records.
    ///
    /// Callers guarantee the column keys are unique; ingestion enforces it.
    ///
    /// # Panics
    /// If a record does not hold exactly one value per column.
    #[must_use]
    pub fn new(columns: Vec<ColumnKey>, records: Vec<Record>, source: DataSource) -> Self {
        assert!(
            records.iter().all(|r| r.values.len() == columns.len()),
            "every record needs exactly {} values",
            columns.len()
        );
        Self {
            columns,
            records,
            source,
        }
    }

    /// The fixed dataset shown before any file is loaded.
    #[must_use]
    pub fn sample() -> Self {
        let columns = std::iter::once("number".to_string())
            .chain(SAMPLE_MODULI.iter().map(|m| format!("mod{m}")))
            .filter_map(|name| ColumnKey::new(&name))
            .collect();
        let records = SAMPLE_NUMBERS
            .iter()
            .map(|&n| {
                Record::new(
                    std::iter::once(n)
                        .chain(SAMPLE_MODULI.iter().map(|m| n % m))
                        .collect(),
                )
            })
            .collect();
        Self::new(columns, records, DataSource::Sample)
    }

    #[must_use]
    pub fn columns(&self) -> &[ColumnKey] {
        &self.columns
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    #[must_use]
    pub fn source(&self) -> &DataSource {
        &self.source
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn column_index(&self, column: &ColumnKey) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// All distinct values a column takes, ascending.
    #[must_use]
    pub fn distinct_values(&self, column: usize) -> BTreeSet<i64> {
        self.records.iter().map(|r| r.value(column)).collect()
    }
}

/// Mapping from column to `T` whose key set always equals the column list it was
/// created from.
///
/// Entries are stored in column order; there is no way to insert a key that was not
/// part of the original column list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap<T> {
    entries: Vec<(ColumnKey, T)>,
}

impl<T: Default> ColumnMap<T> {
    /// One default entry per column.
    #[must_use]
    pub fn for_columns(columns: &[ColumnKey]) -> Self {
        Self {
            entries: columns.iter().map(|c| (c.clone(), T::default())).collect(),
        }
    }
}

impl<T> ColumnMap<T> {
    #[must_use]
    pub fn get(&self, column: &ColumnKey) -> Option<&T> {
        self.entries.iter().find(|(c, _)| c == column).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, column: &ColumnKey) -> Option<&mut T> {
        self.entries
            .iter_mut()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ColumnKey, &T)> {
        self.entries.iter().map(|(c, v)| (c, v))
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.entries.iter_mut().map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &ColumnKey> {
        self.entries.iter().map(|(c, _)| c)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True if the key set equals `columns`, in order.
    #[must_use]
    pub fn matches_columns(&self, columns: &[ColumnKey]) -> bool {
        self.keys().eq(columns.iter())
    }
}

impl<T: Default> Default for ColumnMap<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}
