//! Query parameters.

use serde::{Deserialize, Serialize};

use super::validation::same_name;
use super::value::{Value, ValueType};

/// A parameter declared by a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterInfo {
    pub name: String,
    #[serde(default, rename = "type")]
    pub value_type: ValueType,
    /// Value used when neither the filter nor the definition supplies one.
    #[serde(default)]
    pub default_value: Option<Value>,
    #[serde(default)]
    pub required: bool,
}

impl ParameterInfo {
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            default_value: None,
            required: false,
        }
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// A value supplied for a named parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterValue {
    pub name: String,
    pub value: Value,
}

impl ParameterValue {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Find a parameter value by name (case-insensitive).
pub fn find_value<'a>(values: &'a [ParameterValue], name: &str) -> Option<&'a ParameterValue> {
    values.iter().find(|v| same_name(&v.name, name))
}
