use crate::{
    error::ErrorClass,
    value::{Value, ValueKind, canonical::Canonical},
};
use derive_more::Display;
use std::{cmp::Ordering, collections::BTreeMap};
use thiserror::Error as ThisError;

///
/// CompareError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum CompareError {
    #[error("cannot compare {left} value '{left_value}' with {right} value '{right_value}'")]
    TypeMismatch {
        left: ValueKind,
        right: ValueKind,
        left_value: String,
        right_value: String,
    },

    #[error("{side} row is missing scan column '{column}'")]
    MissingColumn { column: String, side: Side },

    #[error("{kind} values have no key order")]
    Unsupported { kind: ValueKind },
}

impl CompareError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::TypeMismatch { .. } => ErrorClass::TypeMismatch,
            Self::MissingColumn { .. } => ErrorClass::MissingInput,
            Self::Unsupported { .. } => ErrorClass::Unsupported,
        }
    }

    fn mismatch(left: &Value, right: &Value, left_kind: ValueKind, right_kind: ValueKind) -> Self {
        Self::TypeMismatch {
            left: left_kind,
            right: right_kind,
            left_value: left.to_string(),
            right_value: right.to_string(),
        }
    }
}

///
/// Side
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Side {
    #[display("left")]
    Left,
    #[display("right")]
    Right,
}

/// Total order over scan-key values.
///
/// Ordering rules, first match wins:
/// 1. `Null` sorts before every non-null value
/// 2. Identical variants compare natively
/// 3. Mixed plain numerics compare as `f64`
/// 4. Canonical forms compare natively; mismatched kinds are an error
/// 5. Canonical kinds without a native order compare by rendered text
pub fn compare(left: &Value, right: &Value) -> Result<Ordering, CompareError> {
    match (left, right) {
        (Value::Null, Value::Null) => return Ok(Ordering::Equal),
        (Value::Null, _) => return Ok(Ordering::Less),
        (_, Value::Null) => return Ok(Ordering::Greater),
        _ => {}
    }

    if let Some(ordering) = native_cmp(left, right) {
        return Ok(ordering);
    }

    if let (Some(l), Some(r)) = (left.as_f64(), right.as_f64()) {
        return Ok(cmp_f64(l, r));
    }

    let (l, r) = (Canonical::of(left), Canonical::of(right));
    if let Some(ordering) = canonical_cmp(&l, &r) {
        return Ok(ordering);
    }

    match (&l, &r) {
        (Canonical::Integer(a), Canonical::Float(b)) => Ok(cmp_f64(widen(*a), *b)),
        (Canonical::Float(a), Canonical::Integer(b)) => Ok(cmp_f64(*a, widen(*b))),
        (Canonical::Json(_), Canonical::Json(_)) => {
            tracing::trace!(%left, %right, "comparing json values by rendered text");
            Ok(left.to_string().cmp(&right.to_string()))
        }
        _ => Err(CompareError::mismatch(left, right, l.kind(), r.kind())),
    }
}

/// Strict key comparator.
///
/// Both values are normalized and must land on the same canonical kind;
/// there is no numeric cross-kind widening and no rendered-text fallback.
pub fn compare_key(left: &Value, right: &Value) -> Result<Ordering, CompareError> {
    let (l, r) = (Canonical::of(left), Canonical::of(right));
    if l.kind() != r.kind() {
        return Err(CompareError::mismatch(left, right, l.kind(), r.kind()));
    }

    canonical_cmp(&l, &r).ok_or(CompareError::Unsupported { kind: l.kind() })
}

/// Compare two rows column by column in scan-key significance order.
///
/// Returns the first non-equal column result, or `Equal` when every
/// column matches.
pub fn compare_column<S: AsRef<str>>(
    columns: &[S],
    left: &BTreeMap<String, Value>,
    right: &BTreeMap<String, Value>,
) -> Result<Ordering, CompareError> {
    for column in columns {
        let column = column.as_ref();
        let l = left.get(column).ok_or_else(|| CompareError::MissingColumn {
            column: column.to_string(),
            side: Side::Left,
        })?;
        let r = right.get(column).ok_or_else(|| CompareError::MissingColumn {
            column: column.to_string(),
            side: Side::Right,
        })?;

        let ordering = compare(l, r)?;
        if ordering != Ordering::Equal {
            return Ok(ordering);
        }
    }

    Ok(Ordering::Equal)
}

// Same-variant comparison; `None` when the variants differ or have no
// native order.
fn native_cmp(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Blob(a), Value::Blob(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Float32(a), Value::Float32(b)) => Some(cmp_f64(f64::from(*a), f64::from(*b))),
        (Value::Float64(a), Value::Float64(b)) => Some(cmp_f64(*a, *b)),
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::ObjectId(a), Value::ObjectId(b)) => Some(a.bytes().cmp(&b.bytes())),
        (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
        (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
        (Value::Uint(a), Value::Uint(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

// Same-kind canonical comparison; `None` for mismatched kinds and for
// kinds without a native order.
fn canonical_cmp(left: &Canonical<'_>, right: &Canonical<'_>) -> Option<Ordering> {
    match (left, right) {
        (Canonical::Bool(a), Canonical::Bool(b)) => Some(a.cmp(b)),
        (Canonical::Bytes(a), Canonical::Bytes(b)) => Some(a.cmp(b)),
        (Canonical::Float(a), Canonical::Float(b)) => Some(cmp_f64(*a, *b)),
        (Canonical::Integer(a), Canonical::Integer(b)) => Some(a.cmp(b)),
        (Canonical::Null, Canonical::Null) => Some(Ordering::Equal),
        (Canonical::ObjectId(a), Canonical::ObjectId(b)) => Some(a.bytes().cmp(&b.bytes())),
        (Canonical::Text(a), Canonical::Text(b)) => Some(a.cmp(b)),
        (Canonical::Time(a), Canonical::Time(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

// NaN compares equal to everything, matching the driver-side behaviour of
// plain `<`/`>` checks.
fn cmp_f64(left: f64, right: f64) -> Ordering {
    left.partial_cmp(&right).unwrap_or(Ordering::Equal)
}

#[allow(clippy::cast_precision_loss)]
fn widen(value: i128) -> f64 {
    value as f64
}
