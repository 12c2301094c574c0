use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Column name to value map; the row/boundary shape exchanged with callers.
pub type ValueMap = BTreeMap<String, Value>;

///
/// ScanRange
///
/// Externally exchangeable form of a chunk's boundaries, used when
/// persisting or re-hydrating scan state. A column missing from a map is
/// unbounded on that side.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ScanRange {
    #[serde(default)]
    pub lower: ValueMap,
    #[serde(default)]
    pub upper: ValueMap,
}

impl ScanRange {
    #[must_use]
    pub const fn new(lower: ValueMap, upper: ValueMap) -> Self {
        Self { lower, upper }
    }

    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.lower.is_empty() && self.upper.is_empty()
    }
}
