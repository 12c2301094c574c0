use crate::value::{SqlNull, Value, ValueKind};
use ::bson::oid::ObjectId;
use time::OffsetDateTime;

///
/// Canonical
///
/// Normalized comparison form of a `Value`.
///
/// Integers widen to `i128` so that signed and unsigned inputs keep their
/// sign and magnitude. Nullable wrappers unwrap to their zero/empty value
/// when invalid (the epoch for timestamps); only `Value::Null` stays null.
///

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Canonical<'a> {
    Bool(bool),
    Bytes(&'a [u8]),
    Float(f64),
    Integer(i128),
    Json(&'a serde_json::Value),
    Null,
    ObjectId(ObjectId),
    Text(&'a str),
    Time(OffsetDateTime),
}

impl<'a> Canonical<'a> {
    pub(crate) fn of(value: &'a Value) -> Self {
        match value {
            Value::Blob(v) => Self::Bytes(v),
            Value::Bool(v) => Self::Bool(*v),
            Value::Float32(v) => Self::Float(f64::from(*v)),
            Value::Float64(v) => Self::Float(*v),
            Value::Int(v) => Self::Integer(i128::from(*v)),
            Value::Json(v) => Self::Json(v),
            Value::Null => Self::Null,
            Value::Nullable(inner) => Self::of_nullable(inner),
            Value::ObjectId(v) => Self::ObjectId(*v),
            Value::Text(v) => Self::Text(v),
            Value::Timestamp(v) => Self::Time(*v),
            Value::Uint(v) => Self::Integer(i128::from(*v)),
        }
    }

    fn of_nullable(inner: &'a SqlNull) -> Self {
        match inner {
            SqlNull::Bool(v) => Self::Bool(v.unwrap_or_default()),
            SqlNull::Float(v) => Self::Float(v.unwrap_or_default()),
            SqlNull::Int(v) => Self::Integer(i128::from(v.unwrap_or_default())),
            SqlNull::Text(v) => Self::Text(v.as_deref().unwrap_or_default()),
            SqlNull::Time(v) => Self::Time(v.unwrap_or(OffsetDateTime::UNIX_EPOCH)),
        }
    }

    pub(crate) const fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::Bytes(_) => ValueKind::Bytes,
            Self::Float(_) => ValueKind::Float,
            Self::Integer(_) => ValueKind::Integer,
            Self::Json(_) => ValueKind::Json,
            Self::Null => ValueKind::Null,
            Self::ObjectId(_) => ValueKind::ObjectId,
            Self::Text(_) => ValueKind::Text,
            Self::Time(_) => ValueKind::Time,
        }
    }
}
