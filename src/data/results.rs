//! Query result sets.
//!
//! A [`QueryResults`] is produced in two phases. The executing query first
//! creates a [`QueryResultsBuilder`] carrying the identifying metadata
//! (query name, execution time, success flag and any error messages), then
//! emits the immutable result exactly once:
//!
//! - [`QueryResultsBuilder::with_data`] validates columns and rows against
//!   each other and fails with a [`StructureError`] on any inconsistency;
//! - [`QueryResultsBuilder::without_data`] emits an empty result, used when
//!   execution failed and only the error messages are meaningful.

use std::collections::BTreeMap;
use std::ops::Index;
use std::sync::Arc;

use super::column::{DataColumnSchema, QueryColumnInfo};
use super::validation::{same_name, validate_structure, CellSet, StructureResult};
use super::value::Value;

/// A single (column, value) pair in a query row.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryCell {
    pub column: Arc<DataColumnSchema>,
    pub value: Value,
}

impl QueryCell {
    pub fn new(column: Arc<DataColumnSchema>, value: impl Into<Value>) -> Self {
        Self {
            column,
            value: value.into(),
        }
    }

    pub fn column_name(&self) -> &str {
        &self.column.name
    }
}

/// One row of a query result.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryRow {
    cells: Vec<QueryCell>,
}

impl QueryRow {
    pub fn new(cells: Vec<QueryCell>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[QueryCell] {
        &self.cells
    }

    /// Find the cell for a column (case-insensitive).
    pub fn cell(&self, column: &str) -> Option<&QueryCell> {
        self.cells.iter().find(|c| same_name(c.column_name(), column))
    }

    pub fn value(&self, column: &str) -> Option<&Value> {
        self.cell(column).map(|c| &c.value)
    }
}

impl CellSet for QueryRow {
    fn cell_count(&self) -> usize {
        self.cells.len()
    }

    fn has_cell(&self, column: &str) -> bool {
        self.cell(column).is_some()
    }
}

/// The immutable results of a query execution.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResults {
    query_name: String,
    execution_time_ms: u64,
    success: bool,
    error_messages: BTreeMap<String, String>,
    columns: Vec<QueryColumnInfo>,
    rows: Vec<QueryRow>,
}

impl QueryResults {
    /// Start building the results of a query.
    pub fn builder(query_name: impl Into<String>, execution_time_ms: u64) -> QueryResultsBuilder {
        QueryResultsBuilder {
            query_name: query_name.into(),
            execution_time_ms,
            success: true,
            error_messages: BTreeMap::new(),
        }
    }

    pub fn query_name(&self) -> &str {
        &self.query_name
    }

    pub fn execution_time_ms(&self) -> u64 {
        self.execution_time_ms
    }

    pub fn success(&self) -> bool {
        self.success
    }

    /// Error messages keyed by error code.
    pub fn error_messages(&self) -> &BTreeMap<String, String> {
        &self.error_messages
    }

    pub fn columns(&self) -> &[QueryColumnInfo] {
        &self.columns
    }

    pub fn rows(&self) -> &[QueryRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&QueryRow> {
        self.rows.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QueryRow> {
        self.rows.iter()
    }

    /// All error messages joined into one line, for reporting.
    pub fn error_summary(&self) -> String {
        if self.error_messages.is_empty() {
            return "query reported failure without error messages".to_string();
        }

        self.error_messages
            .iter()
            .map(|(code, message)| format!("{}: {}", code, message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl Index<usize> for QueryResults {
    type Output = QueryRow;

    fn index(&self, index: usize) -> &Self::Output {
        &self.rows[index]
    }
}

impl<'a> IntoIterator for &'a QueryResults {
    type Item = &'a QueryRow;
    type IntoIter = std::slice::Iter<'a, QueryRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// First phase of [`QueryResults`] construction.
#[derive(Debug, Clone)]
#[must_use = "builders have no effect until used"]
pub struct QueryResultsBuilder {
    query_name: String,
    execution_time_ms: u64,
    success: bool,
    error_messages: BTreeMap<String, String>,
}

impl QueryResultsBuilder {
    /// Mark the execution as failed.
    pub fn failed(mut self) -> Self {
        self.success = false;
        self
    }

    /// Attach an error message under an error code.
    pub fn with_error(mut self, code: impl Into<String>, message: impl Into<String>) -> Self {
        self.error_messages.insert(code.into(), message.into());
        self
    }

    pub fn with_errors(mut self, errors: BTreeMap<String, String>) -> Self {
        self.error_messages.extend(errors);
        self
    }

    /// Populate the results, validating every row against the columns.
    pub fn with_data(
        self,
        columns: Vec<QueryColumnInfo>,
        rows: Vec<QueryRow>,
    ) -> StructureResult<QueryResults> {
        let names: Vec<&str> = columns.iter().map(|c| c.name()).collect();
        validate_structure(&names, &rows)?;

        Ok(QueryResults {
            query_name: self.query_name,
            execution_time_ms: self.execution_time_ms,
            success: self.success,
            error_messages: self.error_messages,
            columns,
            rows,
        })
    }

    /// Emit failed results that carry no columns or rows.
    ///
    /// Successful results always hold at least one column, so this marks the
    /// results failed whether or not [`failed`](Self::failed) was called.
    pub fn without_data(self) -> QueryResults {
        QueryResults {
            query_name: self.query_name,
            execution_time_ms: self.execution_time_ms,
            success: false,
            error_messages: self.error_messages,
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }
}

/// Build a row from values in column order. Test and data-source helper.
///
/// Values pair with columns by position; callers check that the lengths
/// match, since surplus values have no column to land in.
pub fn row_from_values(columns: &[Arc<DataColumnSchema>], values: Vec<Value>) -> QueryRow {
    QueryRow::new(
        columns
            .iter()
            .cloned()
            .zip(values)
            .map(|(column, value)| QueryCell::new(column, value))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{StructureError, ValueType};

    fn schema(name: &str) -> Arc<DataColumnSchema> {
        Arc::new(DataColumnSchema::new(name, ValueType::Any))
    }

    fn infos(columns: &[Arc<DataColumnSchema>]) -> Vec<QueryColumnInfo> {
        columns.iter().map(|c| QueryColumnInfo::new((**c).clone())).collect()
    }

    #[test]
    fn test_with_data_valid() {
        let columns = vec![schema("Name"), schema("Amount")];
        let rows = vec![
            row_from_values(&columns, vec!["A".into(), 30.into()]),
            row_from_values(&columns, vec!["B".into(), 10.into()]),
        ];

        let results = QueryResults::builder("sales", 12)
            .with_data(infos(&columns), rows)
            .unwrap();

        assert!(results.success());
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].value("amount"), Some(&Value::Integer(10)));
        assert_eq!(results.iter().count(), 2);
        assert_eq!(results.query_name(), "sales");
    }

    #[test]
    fn test_with_data_rejects_duplicate_columns() {
        let columns = vec![schema("Name"), schema(" NAME")];
        let err = QueryResults::builder("q", 0)
            .with_data(infos(&columns), vec![])
            .unwrap_err();
        assert!(matches!(err, StructureError::DuplicateColumn(_)));
    }

    #[test]
    fn test_results_without_data_are_never_successful() {
        let results = QueryResults::builder("q", 0).without_data();
        assert!(!results.success());
        assert!(results.columns().is_empty());

        let results = QueryResults::builder("q", 0)
            .failed()
            .with_error("E1", "timeout")
            .without_data();
        assert!(!results.success());
        assert_eq!(results.error_summary(), "E1: timeout");
    }

    #[test]
    fn test_with_data_rejects_empty_columns() {
        let err = QueryResults::builder("q", 0)
            .with_data(vec![], vec![])
            .unwrap_err();
        assert_eq!(err, StructureError::NoColumns);
    }

    #[test]
    fn test_with_data_rejects_foreign_cell() {
        let columns = vec![schema("Name"), schema("Amount")];
        let other = vec![schema("Name"), schema("Total")];
        let rows = vec![row_from_values(&other, vec!["A".into(), 1.into()])];

        let err = QueryResults::builder("q", 0)
            .with_data(infos(&columns), rows)
            .unwrap_err();
        assert!(matches!(err, StructureError::MissingCell { row: 0, .. }));
    }

    #[test]
    fn test_without_data_keeps_errors() {
        let results = QueryResults::builder("q", 5)
            .failed()
            .with_error("E42", "connection refused")
            .without_data();

        assert!(!results.success());
        assert!(results.is_empty());
        assert_eq!(results.error_summary(), "E42: connection refused");
    }
}
