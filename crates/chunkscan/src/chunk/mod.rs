mod range;


use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// re-exports
pub use range::{ScanRange, ValueMap};

///
/// Bound
///
/// One scan-key column's constraint. Either side may be absent; a present
/// side may still hold `Value::Null`.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Bound {
    pub column: String,
    pub lower: Option<Value>,
    pub upper: Option<Value>,
}

impl Bound {
    #[must_use]
    pub fn unbounded(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            lower: None,
            upper: None,
        }
    }

    #[must_use]
    pub fn new(column: impl Into<String>, lower: Option<Value>, upper: Option<Value>) -> Self {
        Self {
            column: column.into(),
            lower,
            upper,
        }
    }

    #[must_use]
    pub const fn has_lower(&self) -> bool {
        self.lower.is_some()
    }

    #[must_use]
    pub const fn has_upper(&self) -> bool {
        self.upper.is_some()
    }

    /// Classify this bound by (has lower, has upper, lower == upper).
    #[must_use]
    pub fn shape(&self) -> BoundShape<'_> {
        match (&self.lower, &self.upper) {
            (None, None) => BoundShape::Unbounded,
            (Some(lower), None) => BoundShape::Lower(lower),
            (None, Some(upper)) => BoundShape::Upper(upper),
            (Some(lower), Some(upper)) if lower == upper => BoundShape::Exact(lower),
            (Some(lower), Some(upper)) => BoundShape::Between { lower, upper },
        }
    }
}

///
/// BoundShape
///
/// Closed classification of a bound. `Exact` pins the column to a single
/// value and is never rendered as a range.
///

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BoundShape<'a> {
    Unbounded,
    Lower(&'a Value),
    Upper(&'a Value),
    Exact(&'a Value),
    Between {
        lower: &'a Value,
        upper: &'a Value,
    },
}

///
/// Chunk
///
/// One slice of the scan key's value space, as independent per-column
/// bounds ordered by scan-key significance (most significant first).
///
/// Bounds are append-only; `offsets` maps a column name to its position
/// and is updated together with `bounds` on every insert.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Chunk {
    bounds: Vec<Bound>,
    offsets: HashMap<String, usize>,
}

impl Chunk {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a chunk with every scan column present and unbounded.
    #[must_use]
    pub fn with_scan_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut chunk = Self::new();
        for column in columns {
            chunk.push_bound(Bound::unbounded(column));
        }

        chunk
    }

    /// Build a chunk over `columns`, taking each column's lower and upper
    /// value from `range` when present.
    ///
    /// Range entries for columns outside `columns` are ignored.
    #[must_use]
    pub fn from_range<S: AsRef<str>>(columns: &[S], range: &ScanRange) -> Self {
        let mut chunk = Self::new();
        for column in columns {
            let column = column.as_ref();
            chunk.push_bound(Bound::new(
                column,
                range.lower.get(column).cloned(),
                range.upper.get(column).cloned(),
            ));
        }

        chunk
    }

    #[must_use]
    pub fn bounds(&self) -> &[Bound] {
        &self.bounds
    }

    #[must_use]
    pub fn bound(&self, column: &str) -> Option<&Bound> {
        self.offsets.get(column).map(|&offset| &self.bounds[offset])
    }

    #[must_use]
    pub fn position(&self, column: &str) -> Option<usize> {
        self.offsets.get(column).copied()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.bounds.iter().map(|bound| bound.column.as_str())
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.bounds.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    /// Lower/upper value maps of every present bound side.
    #[must_use]
    pub fn range(&self) -> ScanRange {
        let mut range = ScanRange::default();
        for bound in &self.bounds {
            if let Some(lower) = &bound.lower {
                range.lower.insert(bound.column.clone(), lower.clone());
            }
            if let Some(upper) = &bound.upper {
                range.upper.insert(bound.column.clone(), upper.clone());
            }
        }

        range
    }

    pub fn update_lower(&mut self, column: &str, lower: Value) {
        self.update(column, Some(lower), None);
    }

    pub fn update_upper(&mut self, column: &str, upper: Value) {
        self.update(column, None, Some(upper));
    }

    /// Set the provided sides of `column`'s bound, leaving `None` sides
    /// untouched. An unknown column is appended as the least significant.
    pub fn update(&mut self, column: &str, lower: Option<Value>, upper: Option<Value>) {
        if let Some(&offset) = self.offsets.get(column) {
            let bound = &mut self.bounds[offset];
            if lower.is_some() {
                bound.lower = lower;
            }
            if upper.is_some() {
                bound.upper = upper;
            }
            return;
        }

        self.push_bound(Bound::new(column, lower, upper));
    }

    /// Independent copy with one column updated.
    #[must_use]
    pub fn copy_and_update(
        &self,
        column: &str,
        lower: Option<Value>,
        upper: Option<Value>,
    ) -> Self {
        let mut chunk = self.clone();
        chunk.update(column, lower, upper);

        chunk
    }

    // Duplicate columns keep their first position.
    fn push_bound(&mut self, bound: Bound) {
        if self.offsets.contains_key(&bound.column) {
            return;
        }

        self.offsets.insert(bound.column.clone(), self.bounds.len());
        self.bounds.push(bound);
    }
}
