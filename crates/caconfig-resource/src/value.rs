//! Property value maps

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Property map of a resource.
pub type ValueMap = serde_json::Map<String, Value>;

/// Typed, lenient accessors on a [`ValueMap`].
///
/// Stored values are often strings even when the reader expects a number
/// or a flag, so the accessors convert numeric and boolean strings.
pub trait ValueMapExt {
    fn get_str(&self, key: &str) -> Option<&str>;
    fn get_bool(&self, key: &str) -> Option<bool>;
    fn get_i64(&self, key: &str) -> Option<i64>;
    fn get_f64(&self, key: &str) -> Option<f64>;
    fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T>;

    /// `true` only if the property is present and reads as `true`.
    fn is_true(&self, key: &str) -> bool {
        self.get_bool(key).unwrap_or(false)
    }
}

impl ValueMapExt for ValueMap {
    fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn get_i64(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn get_f64(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }
}
