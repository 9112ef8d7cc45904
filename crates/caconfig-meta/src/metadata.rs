//! Configuration metadata model
//!
//! A [`ConfigurationMetadata`] describes one named configuration: its
//! properties with their types and defaults, and whether it is a collection.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Declared type of a configuration property.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "metadata", rename_all = "snake_case")]
pub enum PropertyType {
    #[default]
    String,
    Integer,
    Long,
    Double,
    Boolean,
    StringArray,
    IntegerArray,
    /// Nested configuration stored below `{config}/{property}`
    Nested(Box<ConfigurationMetadata>),
    /// Nested configuration collection stored below `{config}/{property}`
    NestedCollection(Box<ConfigurationMetadata>),
}

impl PropertyType {
    /// Value used when neither the resource nor the metadata supply one.
    ///
    /// Numbers are zero, booleans false and arrays empty. Strings and nested
    /// configurations have no zero value.
    pub fn zero_value(&self) -> Option<Value> {
        match self {
            Self::Integer | Self::Long => Some(Value::from(0)),
            Self::Double => Some(Value::from(0.0)),
            Self::Boolean => Some(Value::Bool(false)),
            Self::StringArray | Self::IntegerArray => Some(Value::Array(Vec::new())),
            Self::String | Self::Nested(_) | Self::NestedCollection(_) => None,
        }
    }

    pub fn is_nested(&self) -> bool {
        matches!(self, Self::Nested(_) | Self::NestedCollection(_))
    }

    /// Convert a stored value to the declared type where it can be read as
    /// one (`"111"` as an integer, a single string as a string array).
    /// Values that cannot be converted are returned unchanged.
    pub fn coerce(&self, value: &Value) -> Value {
        match (self, value) {
            (Self::Integer | Self::Long, Value::String(s)) => s
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or_else(|_| value.clone()),
            (Self::Integer | Self::Long, Value::Number(n)) if !n.is_i64() => n
                .as_f64()
                .map(|f| Value::from(f.trunc() as i64))
                .unwrap_or_else(|| value.clone()),
            (Self::Double, Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .unwrap_or_else(|| value.clone()),
            (Self::Boolean, Value::String(s)) => s
                .trim()
                .parse::<bool>()
                .map(Value::Bool)
                .unwrap_or_else(|_| value.clone()),
            (Self::String, Value::Number(_) | Value::Bool(_)) => Value::String(value.to_string()),
            (Self::StringArray, Value::Array(items)) => Value::Array(
                items.iter().map(|item| Self::String.coerce(item)).collect(),
            ),
            (Self::IntegerArray, Value::Array(items)) => Value::Array(
                items.iter().map(|item| Self::Long.coerce(item)).collect(),
            ),
            (Self::StringArray, Value::String(_)) => {
                Value::Array(vec![Self::String.coerce(value)])
            }
            (Self::IntegerArray, Value::String(_) | Value::Number(_)) => {
                Value::Array(vec![Self::Long.coerce(value)])
            }
            _ => value.clone(),
        }
    }
}

/// Metadata for a single configuration property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyMetadata {
    pub name: String,
    #[serde(default)]
    pub property_type: PropertyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PropertyMetadata {
    pub fn new(name: impl Into<String>, property_type: PropertyType) -> Self {
        Self {
            name: name.into(),
            property_type,
            default_value: None,
            label: None,
            description: None,
        }
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Declared default, or the type's zero value.
    pub fn effective_default(&self) -> Option<Value> {
        self.default_value
            .as_ref()
            .map(|value| self.property_type.coerce(value))
            .or_else(|| self.property_type.zero_value())
    }
}

/// Metadata for a named configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationMetadata {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub properties: Vec<PropertyMetadata>,
    #[serde(default)]
    pub collection: bool,
}

impl ConfigurationMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            description: None,
            properties: Vec::new(),
            collection: false,
        }
    }

    /// Mark this configuration as a collection.
    pub fn as_collection(mut self) -> Self {
        self.collection = true;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_property(mut self, property: PropertyMetadata) -> Self {
        self.properties.push(property);
        self
    }

    /// Look up a property by name.
    pub fn property(&self, name: &str) -> Option<&PropertyMetadata> {
        self.properties.iter().find(|p| p.name == name)
    }
}
