
use crate::chunk::ValueMap;
use std::collections::BTreeSet;
use thiserror::Error as ThisError;

///
/// KeyError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum KeyError {
    #[error("scan key column '{column}' is missing or null")]
    NullKey { column: String },
}

/// Render the present scan columns of `row` as `col.value` joined by `-`.
#[must_use]
pub fn scan_key<S: AsRef<str>>(columns: &[S], row: &ValueMap) -> String {
    key_parts(columns, row).join("-")
}

/// Render a chunk's boundaries as `min:<key>-max:<key>`.
#[must_use]
pub fn min_max_scan_key<S: AsRef<str>>(columns: &[S], min: &ValueMap, max: &ValueMap) -> String {
    format!(
        "min:{}-max:{}",
        key_parts(columns, min).join("-"),
        key_parts(columns, max).join("-")
    )
}

/// Extract the scan-key columns of `row` together with their rendered key.
///
/// Every scan column must be present and non-null.
pub fn guide_keys<S: AsRef<str>>(
    columns: &[S],
    row: &ValueMap,
) -> Result<(ValueMap, String), KeyError> {
    let mut keys = ValueMap::new();
    for column in columns {
        let column = column.as_ref();
        match row.get(column) {
            Some(value) if !value.is_null() => {
                keys.insert(column.to_string(), value.clone());
            }
            _ => {
                return Err(KeyError::NullKey {
                    column: column.to_string(),
                });
            }
        }
    }
    let rendered = scan_key(columns, &keys);

    Ok((keys, rendered))
}

/// Whether two column lists name the same set of columns, in any order.
#[must_use]
pub fn same_columns<A: AsRef<str>, B: AsRef<str>>(left: &[A], right: &[B]) -> bool {
    if left.len() != right.len() {
        return false;
    }

    let mut left: Vec<&str> = left.iter().map(AsRef::as_ref).collect();
    let mut right: Vec<&str> = right.iter().map(AsRef::as_ref).collect();
    left.sort_unstable();
    right.sort_unstable();

    left == right
}

/// First column that appears more than once, if any.
#[must_use]
pub fn duplicate_column<S: AsRef<str>>(columns: &[S]) -> Option<&str> {
    let mut seen = BTreeSet::new();
    columns
        .iter()
        .map(AsRef::as_ref)
        .find(|column| !seen.insert(*column))
}

fn key_parts<S: AsRef<str>>(columns: &[S], row: &ValueMap) -> Vec<String> {
    columns
        .iter()
        .filter_map(|column| {
            let column = column.as_ref();
            row.get(column).map(|value| format!("{column}.{value}"))
        })
        .collect()
}
