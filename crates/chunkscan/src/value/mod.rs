mod canonical;
mod compare;
mod convert;


use ::bson::oid::ObjectId;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::fmt;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

// re-exports
pub use compare::{CompareError, Side, compare, compare_column, compare_key};

///
/// Value
///
/// One scan-key value as handed over by the chunk-splitting and
/// schema-introspection collaborators. Values are already coerced to the
/// column's storage shape; this crate never parses them.
///
/// Null      → SQL NULL / BSON null; orders before everything else.
/// Nullable  → a driver-level nullable wrapper (`NullInt64` and friends);
///             unwraps to its zero value for cross-type comparison.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum Value {
    Blob(Vec<u8>),
    Bool(bool),
    Float32(f32),
    Float64(f64),
    Int(i64),
    /// Structured document value (document-store keys, JSON columns).
    /// Has no native order; compared by rendered text.
    Json(serde_json::Value),
    Null,
    Nullable(SqlNull),
    ObjectId(ObjectId),
    Text(String),
    Timestamp(OffsetDateTime),
    Uint(u64),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Coarse kind used for error reporting and canonical routing.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Blob(_) => ValueKind::Bytes,
            Self::Bool(_) => ValueKind::Bool,
            Self::Float32(_) | Self::Float64(_) => ValueKind::Float,
            Self::Int(_) | Self::Uint(_) => ValueKind::Integer,
            Self::Json(_) => ValueKind::Json,
            Self::Null => ValueKind::Null,
            Self::Nullable(inner) => inner.kind(),
            Self::ObjectId(_) => ValueKind::ObjectId,
            Self::Text(_) => ValueKind::Text,
            Self::Timestamp(_) => ValueKind::Time,
        }
    }

    /// Plain numeric view; wrappers and non-numeric values are `None`.
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float32(v) => Some(f64::from(*v)),
            Self::Float64(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            Self::Uint(v) => Some(*v as f64),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blob(bytes) => {
                write!(f, "0x")?;
                for byte in bytes {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
            Self::Bool(v) => write!(f, "{v}"),
            Self::Float32(v) => write!(f, "{v}"),
            Self::Float64(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Json(v) => write!(f, "{v}"),
            Self::Null => write!(f, "NULL"),
            Self::Nullable(inner) => write!(f, "{inner}"),
            Self::ObjectId(v) => write!(f, "{}", v.to_hex()),
            Self::Text(v) => write!(f, "{v}"),
            Self::Timestamp(v) => fmt_time(f, *v),
            Self::Uint(v) => write!(f, "{v}"),
        }
    }
}

///
/// SqlNull
///
/// Nullable driver wrappers. `None` is the driver's invalid (NULL) state.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum SqlNull {
    Bool(Option<bool>),
    Float(Option<f64>),
    Int(Option<i64>),
    Text(Option<String>),
    Time(Option<OffsetDateTime>),
}

impl SqlNull {
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        match self {
            Self::Bool(v) => v.is_some(),
            Self::Float(v) => v.is_some(),
            Self::Int(v) => v.is_some(),
            Self::Text(v) => v.is_some(),
            Self::Time(v) => v.is_some(),
        }
    }

    const fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::Float(_) => ValueKind::Float,
            Self::Int(_) => ValueKind::Integer,
            Self::Text(_) => ValueKind::Text,
            Self::Time(_) => ValueKind::Time,
        }
    }
}

impl fmt::Display for SqlNull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(Some(v)) => write!(f, "{v}"),
            Self::Float(Some(v)) => write!(f, "{v}"),
            Self::Int(Some(v)) => write!(f, "{v}"),
            Self::Text(Some(v)) => write!(f, "{v}"),
            Self::Time(Some(v)) => fmt_time(f, *v),
            _ => write!(f, "NULL"),
        }
    }
}

// RFC 3339 where representable, the crate's own rendering otherwise.
fn fmt_time(f: &mut fmt::Formatter<'_>, time: OffsetDateTime) -> fmt::Result {
    match time.format(&Rfc3339) {
        Ok(text) => f.write_str(&text),
        Err(_) => write!(f, "{time}"),
    }
}

///
/// ValueKind
///
/// Canonical kind after wrapper unwrapping and integer widening.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum ValueKind {
    #[display("bool")]
    Bool,
    #[display("bytes")]
    Bytes,
    #[display("float")]
    Float,
    #[display("integer")]
    Integer,
    #[display("json")]
    Json,
    #[display("null")]
    Null,
    #[display("object_id")]
    ObjectId,
    #[display("text")]
    Text,
    #[display("time")]
    Time,
}

//
// Conversions
//

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

value_from! {
    bool => Bool,
    f32 => Float32,
    f64 => Float64,
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u8 => Uint,
    u16 => Uint,
    u32 => Uint,
    u64 => Uint,
    String => Text,
    &str => Text,
    Vec<u8> => Blob,
    OffsetDateTime => Timestamp,
    ObjectId => ObjectId,
    serde_json::Value => Json,
    SqlNull => Nullable,
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
