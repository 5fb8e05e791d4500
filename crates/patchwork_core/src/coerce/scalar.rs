use patchwork_schema::Value;

use super::{CoercionFailure, FieldCx, FieldValue};

impl FieldValue for bool {
    fn from_change(value: &Value, _cx: &FieldCx<'_>) -> Result<Self, CoercionFailure> {
        match value {
            Value::Bool(value) => Ok(*value),
            _ => Err(CoercionFailure::Mismatch),
        }
    }
}

impl FieldValue for String {
    fn from_change(value: &Value, _cx: &FieldCx<'_>) -> Result<Self, CoercionFailure> {
        match value {
            Value::String(value) => Ok(value.clone()),
            _ => Err(CoercionFailure::Mismatch),
        }
    }
}

// JSON clients send whole numbers as floats now and then; those are accepted.
fn integral(value: f64) -> Result<i64, CoercionFailure> {
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(CoercionFailure::Invalid(format!("{value} is not a whole number")));
    }
    if value < i64::MIN as f64 || value >= i64::MAX as f64 {
        return Err(CoercionFailure::Invalid(format!("{value} is out of range")));
    }
    Ok(value as i64)
}

macro_rules! integer_field {
    ($($ty:ty),*) => {
        $(
            impl FieldValue for $ty {
                fn from_change(value: &Value, _cx: &FieldCx<'_>) -> Result<Self, CoercionFailure> {
                    let wide = match value {
                        Value::Int(value) => i128::from(*value),
                        Value::UInt(value) => i128::from(*value),
                        Value::Float(value) => i128::from(integral(*value)?),
                        _ => return Err(CoercionFailure::Mismatch),
                    };
                    <$ty>::try_from(wide).map_err(|_| {
                        CoercionFailure::Invalid(format!(
                            "{wide} is out of range for {}",
                            stringify!($ty)
                        ))
                    })
                }
            }
        )*
    };
}

integer_field!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl FieldValue for f64 {
    fn from_change(value: &Value, _cx: &FieldCx<'_>) -> Result<Self, CoercionFailure> {
        match value {
            Value::Float(value) => Ok(*value),
            Value::Int(value) => Ok(*value as f64),
            Value::UInt(value) => Ok(*value as f64),
            _ => Err(CoercionFailure::Mismatch),
        }
    }
}

impl FieldValue for f32 {
    fn from_change(value: &Value, _cx: &FieldCx<'_>) -> Result<Self, CoercionFailure> {
        match value {
            Value::Float(value) => Ok(*value as f32),
            Value::Int(value) => Ok(*value as f32),
            Value::UInt(value) => Ok(*value as f32),
            _ => Err(CoercionFailure::Mismatch),
        }
    }
}
