use std::fmt;

use crate::error::{BuilderError, Result};

/// A concrete value bound to a parameter.
///
/// Only primitives are allowed: they are the values that have an
/// unambiguous textual form inside an identifier. Floats render with
/// Rust's `Display`, which never switches to exponent notation
/// (`1e21` renders as `1000000000000000000000`).
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl ParamValue {
    /// Convert an untyped JSON/YAML value, rejecting null, arrays and objects.
    pub fn from_json(value: &serde_json::Value) -> Result<ParamValue> {
        use serde_json::Value;

        match value {
            Value::Bool(b) => Ok(ParamValue::Bool(*b)),
            Value::String(s) => Ok(ParamValue::Str(s.clone())),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(ParamValue::Int(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(ParamValue::Float(f))
                } else {
                    Err(BuilderError::invalid("Param value", "primitive", n.to_string()))
                }
            }
            other => Err(BuilderError::invalid(
                "Param value",
                "primitive",
                json_type_name(other),
            )),
        }
    }
}

/// Short type name used in `InvalidArgument` messages.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;

    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{b}"),
            ParamValue::Int(i) => write!(f, "{i}"),
            ParamValue::Float(x) => write!(f, "{x}"),
            ParamValue::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Str(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Str(s)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

impl From<f64> for ParamValue {
    fn from(x: f64) -> Self {
        ParamValue::Float(x)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ParamValue {
                fn from(i: $t) -> Self {
                    ParamValue::Int(i64::from(i))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);
