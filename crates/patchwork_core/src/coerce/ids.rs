use patchwork_schema::Value;
use uuid::Uuid;

use super::{CoercionFailure, FieldCx, FieldValue};

impl FieldValue for Uuid {
    fn from_change(value: &Value, _cx: &FieldCx<'_>) -> Result<Self, CoercionFailure> {
        match value {
            Value::Uuid(id) => Ok(*id),
            Value::Bytes(bytes) => Uuid::from_slice(bytes).map_err(|_| {
                CoercionFailure::Invalid(format!("expected 16 bytes, got {}", bytes.len()))
            }),
            Value::String(text) => Uuid::parse_str(text)
                .map_err(|err| CoercionFailure::Invalid(format!("{text:?} is not a UUID: {err}"))),
            _ => Err(CoercionFailure::Mismatch),
        }
    }
}
