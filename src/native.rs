//! Native convertibility between the closed `Value` variants and Rust scalars.
//!
//! These are the conversions the language itself would perform without any
//! help from the target type: checked integer narrowing, float widening,
//! `str::parse`, and the byte/char views of a string. Anything that needs a
//! capability or a structural decode lives elsewhere.

use crate::target::Target;
use crate::value::Value;

/// Identity first, then native convertibility.
///
/// This is the whole rule the sequence converter applies per element, and the
/// first two steps of the full strategy chain. The value is handed back when
/// neither applies.
pub(crate) fn cast<T: Target>(value: Value) -> Result<T, Value> {
    let value = match T::from_identity(value) {
        Ok(target) => return Ok(target),
        Err(value) => value,
    };
    T::from_native(&value).ok_or(value)
}

/// Widen any integral value to `i128`.
///
/// Floats count when they are finite and have no fractional part; `bool`
/// maps to 0/1 and `char` to its scalar value.
pub(crate) fn integral(value: &Value) -> Option<i128> {
    match value {
        Value::Bool(v) => Some(i128::from(*v)),
        Value::I8(v) => Some(i128::from(*v)),
        Value::I16(v) => Some(i128::from(*v)),
        Value::I32(v) => Some(i128::from(*v)),
        Value::I64(v) => Some(i128::from(*v)),
        Value::U8(v) => Some(i128::from(*v)),
        Value::U16(v) => Some(i128::from(*v)),
        Value::U32(v) => Some(i128::from(*v)),
        Value::U64(v) => Some(i128::from(*v)),
        Value::F32(v) => whole(f64::from(*v)),
        Value::F64(v) => whole(*v),
        Value::Char(c) => Some(i128::from(u32::from(*c))),
        _ => None,
    }
}

fn whole(f: f64) -> Option<i128> {
    if f.is_finite() && f.fract() == 0.0 {
        Some(f as i128)
    } else {
        None
    }
}

/// Read any numeric value as `f64`.
pub(crate) fn real(value: &Value) -> Option<f64> {
    match value {
        Value::I8(v) => Some(f64::from(*v)),
        Value::I16(v) => Some(f64::from(*v)),
        Value::I32(v) => Some(f64::from(*v)),
        Value::I64(v) => Some(*v as f64),
        Value::U8(v) => Some(f64::from(*v)),
        Value::U16(v) => Some(f64::from(*v)),
        Value::U32(v) => Some(f64::from(*v)),
        Value::U64(v) => Some(*v as f64),
        Value::F32(v) => Some(f64::from(*v)),
        Value::F64(v) => Some(*v),
        _ => None,
    }
}

/// Integer targets: checked narrowing from anything integral, or a parsed string.
pub(crate) fn integer<T>(value: &Value) -> Option<T>
where
    T: TryFrom<i128> + std::str::FromStr,
{
    match value {
        Value::String(s) => s.parse::<T>().ok(),
        other => integral(other).and_then(|n| T::try_from(n).ok()),
    }
}

pub(crate) fn float32(value: &Value) -> Option<f32> {
    match value {
        Value::String(s) => s.parse::<f32>().ok(),
        Value::F32(v) => Some(*v),
        other => real(other).map(|f| f as f32),
    }
}

pub(crate) fn float64(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => s.parse::<f64>().ok(),
        other => real(other),
    }
}

pub(crate) fn boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => s.parse::<bool>().ok(),
        _ => None,
    }
}

pub(crate) fn character(value: &Value) -> Option<char> {
    match value {
        Value::Char(c) => Some(*c),
        Value::U8(b) => Some(char::from(*b)),
        Value::String(s) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(c),
                _ => None,
            }
        }
        Value::Bool(_) | Value::F32(_) | Value::F64(_) => None,
        other => integral(other)
            .and_then(|n| u32::try_from(n).ok())
            .and_then(char::from_u32),
    }
}

pub(crate) fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Char(c) => Some(c.to_string()),
        Value::Bytes(b) => String::from_utf8(b.clone()).ok(),
        Value::Bool(_)
        | Value::I8(_)
        | Value::I16(_)
        | Value::I32(_)
        | Value::I64(_)
        | Value::U8(_)
        | Value::U16(_)
        | Value::U32(_)
        | Value::U64(_)
        | Value::F32(_)
        | Value::F64(_) => Some(value.to_string()),
        _ => None,
    }
}
