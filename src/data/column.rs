//! Column schemas for query results.

use serde::{Deserialize, Serialize};

use super::value::ValueType;

/// Schema of a single data column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataColumnSchema {
    pub name: String,
    #[serde(default, rename = "type")]
    pub value_type: ValueType,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
}

fn default_nullable() -> bool {
    true
}

impl DataColumnSchema {
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            nullable: true,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }
}

/// A column as returned by a query, together with the object it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryColumnInfo {
    /// Table or view that produced the column, if known.
    pub source: Option<String>,
    pub column: DataColumnSchema,
}

impl QueryColumnInfo {
    pub fn new(column: DataColumnSchema) -> Self {
        Self {
            source: None,
            column,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.column.name
    }
}

impl From<DataColumnSchema> for QueryColumnInfo {
    fn from(column: DataColumnSchema) -> Self {
        QueryColumnInfo::new(column)
    }
}
