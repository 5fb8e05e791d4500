use chrono::{DateTime, FixedOffset, Utc};
use patchwork_schema::Value;

use super::{CoercionFailure, FieldCx, FieldValue};

fn parse_rfc3339(text: &str) -> Result<DateTime<FixedOffset>, CoercionFailure> {
    DateTime::parse_from_rfc3339(text).map_err(|err| {
        CoercionFailure::Invalid(format!("{text:?} is not an RFC 3339 timestamp: {err}"))
    })
}

impl FieldValue for DateTime<FixedOffset> {
    fn from_change(value: &Value, _cx: &FieldCx<'_>) -> Result<Self, CoercionFailure> {
        match value {
            Value::Timestamp(at) => Ok(*at),
            Value::String(text) => parse_rfc3339(text),
            _ => Err(CoercionFailure::Mismatch),
        }
    }
}

impl FieldValue for DateTime<Utc> {
    fn from_change(value: &Value, _cx: &FieldCx<'_>) -> Result<Self, CoercionFailure> {
        match value {
            Value::Timestamp(at) => Ok(at.with_timezone(&Utc)),
            Value::String(text) => parse_rfc3339(text).map(|at| at.with_timezone(&Utc)),
            _ => Err(CoercionFailure::Mismatch),
        }
    }
}
