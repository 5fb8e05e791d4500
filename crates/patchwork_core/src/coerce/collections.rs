use std::collections::{BTreeMap, HashMap};

use patchwork_schema::Value;

use super::{CoercionFailure, FieldCx, FieldValue};

impl<T: FieldValue> FieldValue for Option<T> {
    fn from_change(value: &Value, cx: &FieldCx<'_>) -> Result<Self, CoercionFailure> {
        match value {
            Value::Null => Ok(None),
            Value::String(text) if text.is_empty() && cx.empty_string_as_none => Ok(None),
            other => T::from_value(other, cx).map(Some),
        }
    }
}

fn element<T: FieldValue>(
    index: usize,
    item: &Value,
    cx: &FieldCx<'_>,
) -> Result<T, CoercionFailure> {
    T::from_value(item, cx).map_err(|failure| {
        CoercionFailure::Invalid(format!("element {index}: {}", failure.describe(item)))
    })
}

/// Sequences are replaced wholesale; an empty list clears the field.
impl<T: FieldValue> FieldValue for Vec<T> {
    fn from_change(value: &Value, cx: &FieldCx<'_>) -> Result<Self, CoercionFailure> {
        match value {
            Value::List(items) => items
                .iter()
                .enumerate()
                .map(|(index, item)| element(index, item, cx))
                .collect(),
            Value::Bytes(bytes) => bytes
                .iter()
                .enumerate()
                .map(|(index, byte)| element(index, &Value::Int(i64::from(*byte)), cx))
                .collect(),
            _ => Err(CoercionFailure::Mismatch),
        }
    }
}

fn entries<T: FieldValue, M: FromIterator<(String, T)>>(
    value: &Value,
    cx: &FieldCx<'_>,
) -> Result<M, CoercionFailure> {
    let Value::Map(entries) = value else {
        return Err(CoercionFailure::Mismatch);
    };
    entries
        .iter()
        .map(|(key, item)| {
            T::from_value(item, cx)
                .map(|typed| (key.clone(), typed))
                .map_err(|failure| {
                    CoercionFailure::Invalid(format!("entry {key:?}: {}", failure.describe(item)))
                })
        })
        .collect()
}

impl<T: FieldValue> FieldValue for HashMap<String, T> {
    fn from_change(value: &Value, cx: &FieldCx<'_>) -> Result<Self, CoercionFailure> {
        entries::<T, Self>(value, cx)
    }
}

impl<T: FieldValue> FieldValue for BTreeMap<String, T> {
    fn from_change(value: &Value, cx: &FieldCx<'_>) -> Result<Self, CoercionFailure> {
        entries::<T, Self>(value, cx)
    }
}
