
use crate::{
    chunk::{Chunk, ScanRange, ValueMap},
    error::ErrorClass,
    key::{duplicate_column, min_max_scan_key, same_columns, scan_key},
    predicate::{ScanWhere, SqlDialect, scan_bson, scan_where_sql_with},
    value::{CompareError, Side, compare_column},
};
use ::bson::Document;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error as ThisError;

///
/// CursorError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum CursorError {
    #[error(transparent)]
    Compare(#[from] CompareError),

    #[error("scan key has no columns")]
    EmptyScanKey,

    #[error("scan key column '{column}' is listed more than once")]
    DuplicateColumn { column: String },

    #[error("checkpoint scan columns {checkpoint:?} do not match scan key {current:?}")]
    ColumnMismatch {
        checkpoint: Vec<String>,
        current: Vec<String>,
    },

    #[error("upper boundary {upper} is below lower boundary {lower}")]
    UpperBelowLower { lower: String, upper: String },

    #[error("boundary {upper} does not advance past {lower}")]
    NotAdvancing { lower: String, upper: String },
}

impl CursorError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::Compare(err) => err.class(),
            Self::EmptyScanKey | Self::DuplicateColumn { .. } | Self::ColumnMismatch { .. } => {
                ErrorClass::InvalidConfig
            }
            Self::UpperBelowLower { .. } | Self::NotAdvancing { .. } => {
                ErrorClass::InvariantViolation
            }
        }
    }
}

///
/// ScanCheckpoint
///
/// Persistable cursor state: the scan key it was taken under, the lower
/// boundary of the next slice, and whether that boundary is exclusive.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ScanCheckpoint {
    pub scan_columns: Vec<String>,
    #[serde(default)]
    pub lower: Option<ValueMap>,
    #[serde(default)]
    pub next: bool,
}

///
/// ChunkSlice
///
/// A chunk plus its continuation flag, ready for predicate synthesis.
///

#[derive(Clone, Debug, PartialEq)]
pub struct ChunkSlice {
    pub chunk: Chunk,
    pub next: bool,
}

impl ChunkSlice {
    #[must_use]
    pub fn where_sql(&self, dialect: SqlDialect, extra: Option<&str>) -> ScanWhere {
        scan_where_sql_with(dialect, &self.chunk, extra, self.next)
    }

    #[must_use]
    pub fn filter(&self, extra: Option<&Document>) -> Document {
        scan_bson(&self.chunk, extra, self.next)
    }

    /// `min:..-max:..` label of the slice boundaries, for logs and progress.
    #[must_use]
    pub fn label(&self) -> String {
        let columns: Vec<&str> = self.chunk.columns().collect();
        let range = self.chunk.range();

        min_max_scan_key(&columns, &range.lower, &range.upper)
    }
}

///
/// ScanCursor
///
/// Walks one table's scan key slice by slice. The upper boundary of each
/// slice becomes the exclusive lower boundary of the next one; boundaries
/// themselves are chosen by the caller.
///

#[derive(Clone, Debug)]
pub struct ScanCursor {
    columns: Vec<String>,
    lower: Option<ValueMap>,
    next: bool,
}

impl ScanCursor {
    pub fn new(columns: Vec<String>) -> Result<Self, CursorError> {
        validate_columns(&columns)?;

        Ok(Self {
            columns,
            lower: None,
            next: false,
        })
    }

    /// Re-hydrate a cursor from a checkpoint taken under the same scan key.
    ///
    /// The current column order wins; the checkpoint only has to name the
    /// same set of columns.
    pub fn restore(columns: Vec<String>, checkpoint: &ScanCheckpoint) -> Result<Self, CursorError> {
        validate_columns(&columns)?;
        if !same_columns(&columns, &checkpoint.scan_columns) {
            return Err(CursorError::ColumnMismatch {
                checkpoint: checkpoint.scan_columns.clone(),
                current: columns,
            });
        }
        tracing::debug!(
            lower = ?checkpoint.lower.as_ref().map(|lower| scan_key(&columns, lower)),
            next = checkpoint.next,
            "scan cursor restored"
        );

        Ok(Self {
            columns,
            lower: checkpoint.lower.clone(),
            next: checkpoint.next,
        })
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub const fn lower(&self) -> Option<&ValueMap> {
        self.lower.as_ref()
    }

    #[must_use]
    pub const fn is_next(&self) -> bool {
        self.next
    }

    /// Slice from the current lower boundary up to `upper` (inclusive), or
    /// to the end of the table when `upper` is `None`.
    pub fn slice(&self, upper: Option<&ValueMap>) -> Result<ChunkSlice, CursorError> {
        if let (Some(lower), Some(upper)) = (&self.lower, upper)
            && compare_column(&self.columns, upper, lower)? == Ordering::Less
        {
            return Err(CursorError::UpperBelowLower {
                lower: scan_key(&self.columns, lower),
                upper: scan_key(&self.columns, upper),
            });
        }

        let range = ScanRange::new(
            self.lower.clone().unwrap_or_default(),
            upper.cloned().unwrap_or_default(),
        );

        Ok(ChunkSlice {
            chunk: Chunk::from_range(&self.columns, &range),
            next: self.next,
        })
    }

    /// Move past a scanned slice: `upper` becomes the next exclusive lower
    /// boundary. It must cover every scan column and lie strictly above the
    /// current lower boundary.
    pub fn advance(&mut self, upper: ValueMap) -> Result<(), CursorError> {
        if let Some(column) = self.columns.iter().find(|c| !upper.contains_key(*c)) {
            return Err(CompareError::MissingColumn {
                column: column.clone(),
                side: Side::Left,
            }
            .into());
        }
        if let Some(lower) = &self.lower
            && compare_column(&self.columns, &upper, lower)? != Ordering::Greater
        {
            return Err(CursorError::NotAdvancing {
                lower: scan_key(&self.columns, lower),
                upper: scan_key(&self.columns, &upper),
            });
        }
        tracing::debug!(upper = %scan_key(&self.columns, &upper), "scan cursor advanced");

        self.lower = Some(upper);
        self.next = true;

        Ok(())
    }

    #[must_use]
    pub fn checkpoint(&self) -> ScanCheckpoint {
        ScanCheckpoint {
            scan_columns: self.columns.clone(),
            lower: self.lower.clone(),
            next: self.next,
        }
    }
}

fn validate_columns(columns: &[String]) -> Result<(), CursorError> {
    if columns.is_empty() {
        return Err(CursorError::EmptyScanKey);
    }
    if let Some(column) = duplicate_column(columns) {
        return Err(CursorError::DuplicateColumn {
            column: column.to_string(),
        });
    }

    Ok(())
}
