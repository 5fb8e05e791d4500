//! Conversion from `serde_json` documents, the usual shape of a PATCH body.
//!
//! `Value` goes through the same mapping when deserialized, so a
//! `ChangeSet` can be read straight from a request body.

use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value as JsonValue};

use crate::changes::{ChangeSet, ChangeSetError};
use crate::values::Value;

impl From<JsonValue> for Value {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(value) => Value::Bool(value),
            JsonValue::Number(number) => {
                if let Some(value) = number.as_i64() {
                    Value::Int(value)
                } else if let Some(value) = number.as_u64() {
                    Value::UInt(value)
                } else {
                    number.as_f64().map_or(Value::Null, Value::Float)
                }
            }
            JsonValue::String(value) => Value::String(value),
            JsonValue::Array(values) => Value::List(values.into_iter().map(Value::from).collect()),
            JsonValue::Object(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<Map<String, JsonValue>> for ChangeSet {
    fn from(entries: Map<String, JsonValue>) -> Self {
        entries.into_iter().collect()
    }
}

impl TryFrom<JsonValue> for ChangeSet {
    type Error = ChangeSetError;

    fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
        match value {
            JsonValue::Object(entries) => Ok(ChangeSet::from(entries)),
            other => Err(ChangeSetError::NotAnObject {
                found: json_kind(&other),
            }),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        JsonValue::deserialize(deserializer).map(Value::from)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(value) => serializer.serialize_bool(*value),
            Value::Int(value) => serializer.serialize_i64(*value),
            Value::UInt(value) => serializer.serialize_u64(*value),
            Value::Float(value) => serializer.serialize_f64(*value),
            Value::String(value) => serializer.serialize_str(value),
            Value::Bytes(bytes) => serializer.collect_seq(bytes),
            Value::List(values) => serializer.collect_seq(values),
            Value::Map(entries) => serializer.collect_map(entries),
            Value::Timestamp(at) => at.serialize(serializer),
            Value::Uuid(id) => id.serialize(serializer),
            Value::Opaque(opaque) => Err(S::Error::custom(format!(
                "opaque {} value cannot be serialized",
                opaque.type_name()
            ))),
        }
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
