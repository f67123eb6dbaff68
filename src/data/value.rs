//! Dynamic cell values.
//!
//! Query rows are untyped: every cell holds a [`Value`]. Values carry a total
//! order (used by sorting, grouping and the Min/Max aggregates) that ranks
//! variants first and compares payloads second:
//!
//! ```text
//! Null < Bool < number (Integer and Float compared numerically) < Text < DateTime
//! ```

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A dynamically typed cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    DateTime(DateTime<Utc>),
}

/// The declared type of a column or parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    #[default]
    Any,
    Bool,
    Integer,
    Float,
    Text,
    DateTime,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Any => "any",
            ValueType::Bool => "bool",
            ValueType::Integer => "integer",
            ValueType::Float => "float",
            ValueType::Text => "text",
            ValueType::DateTime => "datetime",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The runtime type of this value. `Null` reports [`ValueType::Any`].
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Null => ValueType::Any,
            Value::Bool(_) => ValueType::Bool,
            Value::Integer(_) => ValueType::Integer,
            Value::Float(_) => ValueType::Float,
            Value::Text(_) => ValueType::Text,
            Value::DateTime(_) => ValueType::DateTime,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            other => other.value_type().as_str(),
        }
    }

    /// Numeric view of the value, if it is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Convert this value to the declared type, if a lossless conversion exists.
    ///
    /// Text is parsed for numeric, boolean and RFC 3339 date-time targets.
    /// `Null` converts to every type.
    pub fn coerce(&self, target: ValueType) -> Option<Value> {
        if self.is_null() || target == ValueType::Any || self.value_type() == target {
            return Some(self.clone());
        }

        match (self, target) {
            (Value::Integer(i), ValueType::Float) => Some(Value::Float(*i as f64)),
            (Value::Float(f), ValueType::Integer) if f.fract() == 0.0 => {
                Some(Value::Integer(*f as i64))
            }
            (Value::Text(s), ValueType::Integer) => s.trim().parse().ok().map(Value::Integer),
            (Value::Text(s), ValueType::Float) => s.trim().parse().ok().map(Value::Float),
            (Value::Text(s), ValueType::Bool) => s.trim().parse().ok().map(Value::Bool),
            (Value::Text(s), ValueType::DateTime) => DateTime::parse_from_rfc3339(s.trim())
                .ok()
                .map(|dt| Value::DateTime(dt.with_timezone(&Utc))),
            (other, ValueType::Text) => Some(Value::Text(other.to_string())),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Integer(_) | Value::Float(_) => 2,
            Value::Text(_) => 3,
            Value::DateTime(_) => 4,
        }
    }

    /// Total order over heterogeneous values.
    pub fn compare(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::DateTime(a), Value::DateTime(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b).unwrap_or_else(|| a.total_cmp(b)),
            (Value::Integer(a), Value::Float(b)) => compare_int_float(*a, *b),
            (Value::Float(a), Value::Integer(b)) => compare_int_float(*b, *a).reverse(),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }
}

/// Exact comparison of an integer with a float, without rounding the integer.
///
/// NaN orders like `f64::total_cmp`: negative NaN below every number, positive
/// NaN above.
fn compare_int_float(i: i64, f: f64) -> Ordering {
    const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

    if f.is_nan() {
        return if f.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    if f >= TWO_POW_63 {
        return Ordering::Less;
    }
    if f < -TWO_POW_63 {
        return Ordering::Greater;
    }

    // |trunc| < 2^63 here, so the cast is exact.
    let whole = f.trunc();
    match i.cmp(&(whole as i64)) {
        Ordering::Equal => {
            let fraction = f - whole;
            if fraction > 0.0 {
                Ordering::Less
            } else if fraction < 0.0 {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        }
        ordering => ordering,
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => f.write_str(s),
            Value::DateTime(dt) => f.write_str(&dt.to_rfc3339()),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = String;

    fn try_from(json: serde_json::Value) -> Result<Self, Self::Error> {
        match json {
            serde_json::Value::Null => Ok(Value::Null),
            serde_json::Value::Bool(b) => Ok(Value::Bool(b)),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Value::Integer)
                .or_else(|| n.as_f64().map(Value::Float))
                .ok_or_else(|| format!("number out of range: {}", n)),
            serde_json::Value::String(s) => Ok(Value::Text(s)),
            serde_json::Value::Array(_) => Err("arrays are not valid cell values".to_string()),
            serde_json::Value::Object(_) => Err("objects are not valid cell values".to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = serde_json::Value::deserialize(deserializer)?;
        Value::try_from(json).map_err(serde::de::Error::custom)
    }
}

/// Conversion out of a [`Value`] into a concrete Rust type.
///
/// Used by [`DataBinding::resolve_as`](super::DataBinding::resolve_as).
pub trait FromValue: Sized {
    /// Name of the destination type, for error messages.
    const TYPE_NAME: &'static str;

    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for Value {
    const TYPE_NAME: &'static str = "any";

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromValue for f64 {
    const TYPE_NAME: &'static str = "float";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_f64()
    }
}

impl FromValue for i64 {
    const TYPE_NAME: &'static str = "integer";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

impl FromValue for bool {
    const TYPE_NAME: &'static str = "bool";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl FromValue for String {
    const TYPE_NAME: &'static str = "text";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Text(s) => Some(s.clone()),
            _ => None,
        }
    }
}

/// Null converts to `None`; anything else must convert to `T`.
impl<T: FromValue> FromValue for Option<T> {
    const TYPE_NAME: &'static str = T::TYPE_NAME;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl FromValue for DateTime<Utc> {
    const TYPE_NAME: &'static str = "datetime";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }
}
