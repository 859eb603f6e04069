//! Typed key/value pairs attached to log entries.

use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Value of a structured field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// UTF-8 string
    Str(String),
    /// Signed integer
    I64(i64),
    /// Unsigned integer
    U64(u64),
    /// Floating point number
    F64(f64),
    /// Boolean
    Bool(bool),
    /// Elapsed time, encoded as fractional seconds
    Duration(Duration),
    /// Rendered error message
    Error(String),
    /// Arbitrary serializable value
    Json(Value),
}

impl FieldValue {
    /// JSON form used by both encoders.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Str(s) | FieldValue::Error(s) => Value::String(s.clone()),
            FieldValue::I64(n) => Value::from(*n),
            FieldValue::U64(n) => Value::from(*n),
            // NaN and infinities have no JSON form
            FieldValue::F64(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(n.to_string())),
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Duration(d) => serde_json::Number::from_f64(d.as_secs_f64())
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldValue::Json(v) => v.clone(),
        }
    }
}

/// A structured field.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Field name
    pub key: String,
    /// Field value
    pub value: FieldValue,
}

impl Field {
    /// Create a field from a key and value.
    pub fn new(key: impl Into<String>, value: FieldValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// String field.
pub fn string(key: impl Into<String>, value: impl Into<String>) -> Field {
    Field::new(key, FieldValue::Str(value.into()))
}

/// Signed integer field.
pub fn int(key: impl Into<String>, value: i64) -> Field {
    Field::new(key, FieldValue::I64(value))
}

/// Unsigned integer field.
pub fn uint(key: impl Into<String>, value: u64) -> Field {
    Field::new(key, FieldValue::U64(value))
}

/// Floating point field.
pub fn float(key: impl Into<String>, value: f64) -> Field {
    Field::new(key, FieldValue::F64(value))
}

/// Boolean field.
pub fn boolean(key: impl Into<String>, value: bool) -> Field {
    Field::new(key, FieldValue::Bool(value))
}

/// Duration field.
pub fn duration(key: impl Into<String>, value: Duration) -> Field {
    Field::new(key, FieldValue::Duration(value))
}

/// Error field under the conventional `error` key.
pub fn error(err: &dyn std::error::Error) -> Field {
    named_error("error", err)
}

/// Error field under a custom key.
pub fn named_error(key: impl Into<String>, err: &dyn std::error::Error) -> Field {
    Field::new(key, FieldValue::Error(err.to_string()))
}

/// Field holding any serializable value.
///
/// A value that fails to serialize is recorded as `<key>Error` with the
/// serializer's message instead.
pub fn any<T: Serialize + ?Sized>(key: impl Into<String>, value: &T) -> Field {
    let key = key.into();
    match serde_json::to_value(value) {
        Ok(v) => Field::new(key, FieldValue::Json(v)),
        Err(e) => Field::new(format!("{}Error", key), FieldValue::Str(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_to_json() {
        assert_eq!(string("hello", "world").value.to_json(), Value::from("world"));
        assert_eq!(int("n", -3).value.to_json(), Value::from(-3));
        assert_eq!(
            duration("took", Duration::from_millis(1500)).value.to_json(),
            Value::from(1.5)
        );
        assert_eq!(float("nan", f64::NAN).value.to_json(), Value::from("NaN"));
    }

    #[test]
    fn test_error_field() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let field = error(&io);
        assert_eq!(field.key, "error");
        assert_eq!(field.value, FieldValue::Error("disk full".to_string()));
    }

    #[test]
    fn test_any_serializes() {
        let mut map = BTreeMap::new();
        map.insert("a", 1);
        let field = any("map", &map);
        assert_eq!(field.value.to_json(), serde_json::json!({"a": 1}));
    }

    #[test]
    fn test_any_failure_degrades() {
        // JSON object keys must be strings
        let mut map = BTreeMap::new();
        map.insert(vec![1u8], 1);
        let field = any("bad", &map);
        assert_eq!(field.key, "badError");
        assert!(matches!(field.value, FieldValue::Str(_)));
    }
}
