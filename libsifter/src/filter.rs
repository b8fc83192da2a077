//! Row filtering and the values offered in each column's dropdown.
use std::collections::BTreeSet;

use itertools::Itertools;

use crate::dataset::{ColumnKey, ColumnMap, Dataset, Record};

/// Selected values per column. An empty set places no restriction on the column.
pub type FilterState = ColumnMap<BTreeSet<i64>>;

/// Search-within-dropdown text per column.
pub type SearchState = ColumnMap<String>;

/// Column positions and their accepted values, skipping `except` and unrestricted columns.
fn constraints<'a>(
    dataset: &Dataset,
    filters: &'a FilterState,
    except: Option<&ColumnKey>,
) -> Vec<(usize, &'a BTreeSet<i64>)> {
    filters
        .iter()
        .filter(|(column, selected)| !selected.is_empty() && Some(*column) != except)
        .filter_map(|(column, selected)| Some((dataset.column_index(column)?, selected)))
        .collect()
}

fn satisfies(record: &Record, constraints: &[(usize, &BTreeSet<i64>)]) -> bool {
    constraints
        .iter()
        .all(|(column, selected)| selected.contains(&record.value(*column)))
}

/// Rows accepted by every active filter, in dataset order.
#[must_use]
pub fn apply_filters<'a>(dataset: &'a Dataset, filters: &FilterState) -> Vec<&'a Record> {
    let constraints = constraints(dataset, filters, None);
    dataset
        .records()
        .iter()
        .filter(|record| satisfies(record, &constraints))
        .collect()
}

/// Distinct values of `column`, ascending, over the rows that pass every filter except
/// the one on `column` itself.
#[must_use]
pub fn reachable_values(dataset: &Dataset, filters: &FilterState, column: &ColumnKey) -> Vec<i64> {
    let Some(target) = dataset.column_index(column) else {
        return vec![];
    };
    let constraints = constraints(dataset, filters, Some(column));
    dataset
        .records()
        .iter()
        .filter(|record| satisfies(record, &constraints))
        .map(|record| record.value(target))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Keeps the values whose decimal form contains `term`, ignoring case.
#[must_use]
pub fn narrow_by_search(values: &[i64], term: &str) -> Vec<i64> {
    if term.is_empty() {
        return values.to_vec();
    }
    let needle = term.to_lowercase();
    values
        .iter()
        .copied()
        .filter(|value| value.to_string().to_lowercase().contains(&needle))
        .collect()
}

/// The checkbox list of a column's dropdown.
#[must_use]
pub fn offered_values(
    dataset: &Dataset,
    filters: &FilterState,
    searches: &SearchState,
    column: &ColumnKey,
) -> Vec<i64> {
    let reachable = reachable_values(dataset, filters, column);
    let term = searches.get(column).map_or("", String::as_str);
    narrow_by_search(&reachable, term)
}

#[must_use]
pub fn has_active_filters(filters: &FilterState) -> bool {
    filters.iter().any(|(_, selected)| !selected.is_empty())
}

/// Human readable list of active filters, e.g. `mod3: 0, 1; mod5: 4`.
#[must_use]
pub fn describe_filters(filters: &FilterState) -> Option<String> {
    has_active_filters(filters).then(|| {
        filters
            .iter()
            .filter(|(_, selected)| !selected.is_empty())
            .map(|(column, selected)| format!("{column}: {}", selected.iter().join(", ")))
            .join("; ")
    })
}
