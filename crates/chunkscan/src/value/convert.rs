use crate::value::{SqlNull, Value};
use ::bson::{Binary, Bson, DateTime as BsonDateTime, spec::BinarySubtype};
use time::OffsetDateTime;

impl From<&Value> for Bson {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: &Value) -> Self {
        match value {
            Value::Blob(bytes) => Self::Binary(Binary {
                subtype: BinarySubtype::Generic,
                bytes: bytes.clone(),
            }),
            Value::Bool(v) => Self::Boolean(*v),
            Value::Float32(v) => Self::Double(f64::from(*v)),
            Value::Float64(v) => Self::Double(*v),
            Value::Int(v) => Self::Int64(*v),
            // Malformed extended JSON keeps its rendered text.
            Value::Json(v) => {
                Self::try_from(v.clone()).unwrap_or_else(|_| Self::String(v.to_string()))
            }
            Value::Null => Self::Null,
            Value::Nullable(inner) => nullable_to_bson(inner),
            Value::ObjectId(v) => Self::ObjectId(*v),
            Value::Text(v) => Self::String(v.clone()),
            Value::Timestamp(v) => datetime(*v),
            // BSON has no unsigned 64-bit type; values above i64::MAX degrade to double.
            Value::Uint(v) => i64::try_from(*v).map_or(Self::Double(*v as f64), Self::Int64),
        }
    }
}

fn nullable_to_bson(inner: &SqlNull) -> Bson {
    match inner {
        SqlNull::Bool(Some(v)) => Bson::Boolean(*v),
        SqlNull::Float(Some(v)) => Bson::Double(*v),
        SqlNull::Int(Some(v)) => Bson::Int64(*v),
        SqlNull::Text(Some(v)) => Bson::String(v.clone()),
        SqlNull::Time(Some(v)) => datetime(*v),
        _ => Bson::Null,
    }
}

// BSON datetimes carry whole milliseconds since the epoch, floored.
#[allow(clippy::cast_possible_truncation)]
fn datetime(time: OffsetDateTime) -> Bson {
    Bson::DateTime(BsonDateTime::from_millis(
        time.unix_timestamp_nanos().div_euclid(1_000_000) as i64,
    ))
}
