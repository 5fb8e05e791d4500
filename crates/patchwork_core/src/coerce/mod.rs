//! Conversion of loosely-typed change values into field types.
//!
//! Every field type a derived record can hold implements [`FieldValue`].
//! Types without an implementation are declared `#[patch(opaque)]` and go
//! through [`assign_opaque`] instead.

mod collections;
mod ids;
mod scalar;
mod time;

use patchwork_schema::Value;

use crate::error::ApplyError;
use crate::options::ApplyOptions;
use crate::schema::ResolvedField;

/// The field a value is being coerced for.
#[derive(Clone, Debug)]
pub struct FieldCx<'a> {
    pub record: &'static str,
    pub tag: &'a str,
    pub type_name: &'static str,
    pub empty_string_as_none: bool,
}

impl<'a> FieldCx<'a> {
    pub fn new(resolved: &'a ResolvedField, options: &ApplyOptions) -> Self {
        Self {
            record: resolved.record,
            tag: resolved.field.tag.as_str(),
            type_name: resolved.field.type_name,
            empty_string_as_none: resolved.field.empty_string.resolve(options),
        }
    }

    pub fn coercion_error(&self, value: &Value, failure: CoercionFailure) -> ApplyError {
        ApplyError::Coercion {
            field: self.tag.to_string(),
            expected: self.type_name,
            actual: value.kind_name(),
            reason: failure.describe(value),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CoercionFailure {
    /// The value's shape does not fit the type at all.
    Mismatch,
    /// The shape fits but the content does not parse or is out of range.
    Invalid(String),
}

impl CoercionFailure {
    pub fn describe(self, value: &Value) -> String {
        match self {
            CoercionFailure::Mismatch => format!("incompatible {} value", value.kind_name()),
            CoercionFailure::Invalid(reason) => reason,
        }
    }
}

pub trait FieldValue: Clone + 'static {
    fn from_change(value: &Value, cx: &FieldCx<'_>) -> Result<Self, CoercionFailure>;

    /// Takes an opaque value of exactly `Self` as is, otherwise coerces.
    fn from_value(value: &Value, cx: &FieldCx<'_>) -> Result<Self, CoercionFailure> {
        if let Value::Opaque(opaque) = value {
            if let Some(typed) = opaque.downcast_ref::<Self>() {
                return Ok(typed.clone());
            }
        }
        Self::from_change(value, cx)
    }
}

pub fn assign<T: FieldValue>(slot: &mut T, value: &Value, cx: &FieldCx<'_>) -> Result<(), ApplyError> {
    *slot = T::from_value(value, cx).map_err(|failure| cx.coercion_error(value, failure))?;
    Ok(())
}

pub fn assign_opaque<T: Clone + 'static>(
    slot: &mut T,
    value: &Value,
    cx: &FieldCx<'_>,
) -> Result<(), ApplyError> {
    let typed = match value {
        Value::Opaque(opaque) => opaque.downcast_ref::<T>(),
        _ => None,
    };
    match typed {
        Some(typed) => {
            *slot = typed.clone();
            Ok(())
        }
        None => Err(ApplyError::UnknownFieldType {
            record: cx.record,
            field: cx.tag.to_string(),
            type_name: cx.type_name,
            actual: value.kind_name(),
        }),
    }
}

#[cfg(test)]
pub(crate) fn test_cx(type_name: &'static str) -> FieldCx<'static> {
    FieldCx {
        record: "Test",
        tag: "field",
        type_name,
        empty_string_as_none: true,
    }
}
