//! Data bindings: pull a value out of a row.
//!
//! A binding names what it reads (a column, a text template over several
//! columns, or a constant) plus an optional default used when the referenced
//! column is absent, and an optional format template (`{}` is replaced by the
//! resolved value). Resolution is pure and can run on any number of rows
//! concurrently.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::value::{FromValue, Value};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{([^{}]+)\}").unwrap());

/// Result type for binding resolution.
pub type BindingResult<T> = Result<T, BindingError>;

/// Errors raised while resolving a binding.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindingError {
    #[error("binding not found: no value for '{reference}'")]
    BindingNotFound { reference: String },

    #[error("binding type mismatch for '{reference}': expected {expected}, found {found}")]
    BindingTypeMismatch {
        reference: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Anything a binding can read from: query rows and generated table rows.
pub trait BindingSource {
    /// Look up a column value by name (case-insensitive).
    fn lookup(&self, column: &str) -> Option<&Value>;
}

/// What a binding reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingExpression {
    /// The value of one column.
    Column(String),
    /// Text with `{Column}` placeholders.
    Template(String),
    /// A fixed value.
    Constant(Value),
}

/// A declared reference used to pull a value out of a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataBinding {
    #[serde(flatten)]
    pub expression: BindingExpression,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl DataBinding {
    pub fn new(expression: BindingExpression) -> Self {
        Self {
            expression,
            default_value: None,
            format: None,
        }
    }

    pub fn column(name: impl Into<String>) -> Self {
        Self::new(BindingExpression::Column(name.into()))
    }

    pub fn template(text: impl Into<String>) -> Self {
        Self::new(BindingExpression::Template(text.into()))
    }

    pub fn constant(value: impl Into<Value>) -> Self {
        Self::new(BindingExpression::Constant(value.into()))
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Columns this binding reads.
    pub fn referenced_columns(&self) -> Vec<String> {
        match &self.expression {
            BindingExpression::Column(name) => vec![name.clone()],
            BindingExpression::Template(text) => PLACEHOLDER
                .captures_iter(text)
                .map(|caps| caps[1].trim().to_string())
                .collect(),
            BindingExpression::Constant(_) => Vec::new(),
        }
    }

    /// Human-readable form used in error messages.
    pub fn describe(&self) -> String {
        match &self.expression {
            BindingExpression::Column(name) => name.clone(),
            BindingExpression::Template(text) => text.clone(),
            BindingExpression::Constant(value) => format!("constant {}", value),
        }
    }

    /// Resolve the binding against a row.
    pub fn resolve<S: BindingSource + ?Sized>(&self, row: &S) -> BindingResult<Value> {
        let value = match &self.expression {
            BindingExpression::Column(name) => match row.lookup(name) {
                Some(value) => value.clone(),
                None => self.fallback(name)?,
            },
            BindingExpression::Template(text) => match render_template(text, row) {
                Ok(rendered) => Value::Text(rendered),
                Err(missing) => self.fallback(&missing)?,
            },
            BindingExpression::Constant(value) => value.clone(),
        };

        Ok(match &self.format {
            Some(format) if !value.is_null() => Value::Text(format.replace("{}", &value.to_string())),
            _ => value,
        })
    }

    /// Resolve the binding and convert the value to `T`.
    pub fn resolve_as<T: FromValue, S: BindingSource + ?Sized>(&self, row: &S) -> BindingResult<T> {
        let value = self.resolve(row)?;
        T::from_value(&value).ok_or_else(|| BindingError::BindingTypeMismatch {
            reference: self.describe(),
            expected: T::TYPE_NAME,
            found: value.type_name(),
        })
    }

    fn fallback(&self, missing: &str) -> BindingResult<Value> {
        self.default_value
            .clone()
            .ok_or_else(|| BindingError::BindingNotFound {
                reference: missing.to_string(),
            })
    }
}

/// Substitute `{Column}` placeholders. Returns the first missing column on failure.
fn render_template<S: BindingSource + ?Sized>(text: &str, row: &S) -> Result<String, String> {
    let mut rendered = String::with_capacity(text.len());
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(text) {
        let whole = caps.get(0).map(|m| (m.start(), m.end())).unwrap_or((last, last));
        let column = caps[1].trim();
        let value = row.lookup(column).ok_or_else(|| column.to_string())?;

        rendered.push_str(&text[last..whole.0]);
        rendered.push_str(&value.to_string());
        last = whole.1;
    }

    rendered.push_str(&text[last..]);
    Ok(rendered)
}
