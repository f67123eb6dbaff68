//! In-memory data source.
//!
//! [`MemoryQuery`] executes against rows held in memory. It backs report
//! documents loaded by the CLI and is handy in tests. Execution semantics:
//!
//! - every required parameter must have a value;
//! - a parameter whose name matches a column filters rows by equality
//!   (a null value disables the filter);
//! - rows are ordered by the query's grouping rules, then its sorting rules.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;

use super::column::{DataColumnSchema, QueryColumnInfo};
use super::parameter::{find_value, ParameterInfo, ParameterValue};
use super::query::{Query, QueryError, QueryResult};
use super::results::{row_from_values, QueryResults, QueryRow};
use super::sorting::{sort_by_rules, GroupingRule, SortingRule};
use super::validation::{same_name, StructureError};
use super::value::Value;

/// A query over an in-memory table.
#[derive(Debug, Clone)]
pub struct MemoryQuery {
    name: String,
    data_source: String,
    columns: Vec<QueryColumnInfo>,
    schemas: Vec<Arc<DataColumnSchema>>,
    parameters: Vec<ParameterInfo>,
    sorting_rules: Vec<SortingRule>,
    grouping_rules: Vec<GroupingRule>,
    rows: Vec<Vec<Value>>,
}

impl MemoryQuery {
    pub fn new(name: impl Into<String>, columns: Vec<DataColumnSchema>) -> Self {
        let name = name.into();
        let schemas: Vec<Arc<DataColumnSchema>> = columns.into_iter().map(Arc::new).collect();
        let columns = schemas
            .iter()
            .map(|c| QueryColumnInfo::new((**c).clone()).with_source(name.clone()))
            .collect();

        Self {
            data_source: "memory".to_string(),
            name,
            columns,
            schemas,
            parameters: Vec::new(),
            sorting_rules: Vec::new(),
            grouping_rules: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn with_data_source(mut self, data_source: impl Into<String>) -> Self {
        self.data_source = data_source.into();
        self
    }

    pub fn with_parameter(mut self, parameter: ParameterInfo) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_row(mut self, values: Vec<Value>) -> Self {
        self.rows.push(values);
        self
    }

    pub fn with_rows(mut self, rows: impl IntoIterator<Item = Vec<Value>>) -> Self {
        self.rows.extend(rows);
        self
    }

    /// Order results by `column`.
    pub fn sort_column(mut self, rule: SortingRule) -> Self {
        self.sorting_rules.push(rule);
        self
    }

    /// Group results by `column`.
    pub fn add_grouping(mut self, rule: GroupingRule) -> Self {
        self.grouping_rules.push(rule);
        self
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.schemas.iter().position(|c| same_name(&c.name, name))
    }

    /// Resolve the effective value of every declared parameter.
    fn effective_parameters(&self, values: &[ParameterValue]) -> QueryResult<Vec<ParameterValue>> {
        let mut effective = Vec::with_capacity(self.parameters.len());

        for info in &self.parameters {
            let value = find_value(values, &info.name)
                .map(|v| v.value.clone())
                .or_else(|| info.default_value.clone())
                .unwrap_or(Value::Null);

            if value.is_null() && info.required {
                return Err(QueryError::MissingParameter {
                    query: self.name.clone(),
                    parameter: info.name.clone(),
                });
            }

            let value = value
                .coerce(info.value_type)
                .ok_or_else(|| QueryError::InvalidParameter {
                    query: self.name.clone(),
                    parameter: info.name.clone(),
                    message: format!("expected {}, found {}", info.value_type, value.type_name()),
                })?;

            effective.push(ParameterValue::new(info.name.clone(), value));
        }

        Ok(effective)
    }

    /// Every stored row must hold exactly one value per column.
    fn check_rows(&self) -> Result<(), StructureError> {
        let expected = self.schemas.len();
        match self.rows.iter().position(|row| row.len() != expected) {
            Some(row) => Err(StructureError::CellCountMismatch {
                row,
                expected,
                found: self.rows[row].len(),
            }),
            None => Ok(()),
        }
    }

    fn matches(&self, row: &[Value], filters: &[(usize, Value)]) -> bool {
        filters.iter().all(|(idx, wanted)| {
            row.get(*idx)
                .map(|actual| actual.compare(wanted).is_eq())
                .unwrap_or(false)
        })
    }
}

#[async_trait]
impl Query for MemoryQuery {
    fn name(&self) -> &str {
        &self.name
    }

    fn data_source(&self) -> &str {
        &self.data_source
    }

    fn columns(&self) -> &[QueryColumnInfo] {
        &self.columns
    }

    fn parameters(&self) -> &[ParameterInfo] {
        &self.parameters
    }

    fn sorting_rules(&self) -> &[SortingRule] {
        &self.sorting_rules
    }

    fn grouping_rules(&self) -> &[GroupingRule] {
        &self.grouping_rules
    }

    async fn execute(&self, values: &[ParameterValue]) -> QueryResult<QueryResults> {
        let started = Instant::now();
        let malformed = |source: StructureError| QueryError::Malformed {
            query: self.name.clone(),
            source,
        };

        self.check_rows().map_err(malformed)?;
        let parameters = self.effective_parameters(values)?;

        let filters: Vec<(usize, Value)> = parameters
            .into_iter()
            .filter(|p| !p.value.is_null())
            .filter_map(|p| self.column_index(&p.name).map(|idx| (idx, p.value)))
            .collect();

        let rows: Vec<QueryRow> = self
            .rows
            .iter()
            .filter(|row| self.matches(row, &filters))
            .map(|row| row_from_values(&self.schemas, row.clone()))
            .collect();

        let rules: Vec<SortingRule> = self
            .grouping_rules
            .iter()
            .map(SortingRule::from)
            .chain(self.sorting_rules.iter().cloned())
            .collect();

        let rows = sort_by_rules(rows, &rules, |row, column| row.value(column).cloned())
            .map_err(malformed)?;

        let elapsed = started.elapsed().as_millis() as u64;
        QueryResults::builder(self.name.clone(), elapsed)
            .with_data(self.columns.clone(), rows)
            .map_err(malformed)
    }
}
