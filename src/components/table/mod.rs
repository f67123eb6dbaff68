//! Tables: a query rendered as rows of typed cells.

mod generator;
mod grouping;
mod sorting;

pub use generator::TableGenerator;
pub use grouping::{group_rows, GroupingValue, TableGrouping};
pub use sorting::sort_rows;

use std::ops::Index;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::action::{ActionDefinition, ReportAction};
use super::definition::{ComponentAttributes, DefinitionError, DefinitionResult};
use super::ComponentHeader;
use crate::data::validation::{same_name, validate_columns, validate_structure, CellSet};
use crate::data::{
    AggregateFunction, BindingSource, DataBinding, ParameterValue, Query, StructureResult, Value,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ColumnAlignment {
    #[default]
    Left,
    Center,
    Right,
}

/// How essential a column is; renderers may drop low-importance columns first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ColumnImportance {
    High,
    #[default]
    Medium,
    Low,
}

/// A column declared on a table definition.
#[derive(Debug, Clone, PartialEq)]
pub struct TableColumnDefinition {
    pub name: String,
    pub title: String,
    pub binding: DataBinding,
    pub alignment: ColumnAlignment,
    pub importance: ColumnImportance,
    pub cell_action: Option<ActionDefinition>,
    /// Aggregate shown in the totals row for this column.
    pub total: Option<AggregateFunction>,
}

impl TableColumnDefinition {
    pub fn new(name: impl Into<String>, title: impl Into<String>, binding: DataBinding) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            binding,
            alignment: ColumnAlignment::default(),
            importance: ColumnImportance::default(),
            cell_action: None,
            total: None,
        }
    }

    /// A column titled by its name and bound to the query column of the same name.
    pub fn bound(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(name.clone(), name.clone(), DataBinding::column(name))
    }

    pub fn aligned(mut self, alignment: ColumnAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_importance(mut self, importance: ColumnImportance) -> Self {
        self.importance = importance;
        self
    }

    pub fn with_cell_action(mut self, action: ActionDefinition) -> Self {
        self.cell_action = Some(action);
        self
    }

    pub fn with_total(mut self, function: AggregateFunction) -> Self {
        self.total = Some(function);
        self
    }

    pub(crate) fn to_column(&self) -> TableColumn {
        TableColumn {
            name: self.name.clone(),
            title: self.title.clone(),
            alignment: self.alignment,
            importance: self.importance,
        }
    }
}

/// Definition of a table component.
#[derive(Debug, Clone)]
pub struct TableDefinition {
    pub attributes: ComponentAttributes,
    pub query: Arc<dyn Query>,
    pub columns: Vec<TableColumnDefinition>,
    pub default_parameter_values: Vec<ParameterValue>,
    pub row_action: Option<ActionDefinition>,
    pub disable_sorting: bool,
}

impl TableDefinition {
    pub fn new(attributes: ComponentAttributes, query: Arc<dyn Query>) -> Self {
        Self {
            attributes,
            query,
            columns: Vec::new(),
            default_parameter_values: Vec::new(),
            row_action: None,
            disable_sorting: false,
        }
    }

    pub fn with_column(mut self, column: TableColumnDefinition) -> Self {
        self.columns.push(column);
        self
    }

    pub fn with_default_parameter(mut self, value: ParameterValue) -> Self {
        self.default_parameter_values.push(value);
        self
    }

    pub fn with_row_action(mut self, action: ActionDefinition) -> Self {
        self.row_action = Some(action);
        self
    }

    /// Ignore filter sorting rules for this table.
    pub fn without_sorting(mut self) -> Self {
        self.disable_sorting = true;
        self
    }

    pub fn validate(&self) -> DefinitionResult<()> {
        let names: Vec<&str> = self.columns.iter().map(|c| c.name.as_str()).collect();
        validate_columns(&names).map_err(|e| DefinitionError::InvalidComponent {
            component: self.attributes.name.clone(),
            message: e.to_string(),
        })
    }

    /// Totals declared per column, in column order.
    pub(crate) fn total_functions(&self) -> Vec<Option<AggregateFunction>> {
        self.columns.iter().map(|c| c.total).collect()
    }
}

/// A generated table column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableColumn {
    pub name: String,
    pub title: String,
    pub alignment: ColumnAlignment,
    pub importance: ColumnImportance,
}

/// A generated cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableCell {
    pub column: TableColumn,
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<ReportAction>,
}

impl TableCell {
    pub fn new(column: TableColumn, value: Value) -> Self {
        Self {
            column,
            value,
            action: None,
        }
    }

    pub fn with_action(mut self, action: Option<ReportAction>) -> Self {
        self.action = action;
        self
    }
}

/// A generated row: one cell per table column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<ReportAction>,
}

impl TableRow {
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self {
            cells,
            action: None,
        }
    }

    pub fn with_action(mut self, action: Option<ReportAction>) -> Self {
        self.action = action;
        self
    }

    pub fn cell(&self, column: &str) -> Option<&TableCell> {
        self.cells.iter().find(|c| same_name(&c.column.name, column))
    }

    pub fn value(&self, column: &str) -> Option<&Value> {
        self.cell(column).map(|c| &c.value)
    }
}

impl CellSet for TableRow {
    fn cell_count(&self) -> usize {
        self.cells.len()
    }

    fn has_cell(&self, column: &str) -> bool {
        self.cell(column).is_some()
    }
}

impl BindingSource for TableRow {
    fn lookup(&self, column: &str) -> Option<&Value> {
        self.value(column)
    }
}

/// A generated table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    #[serde(flatten)]
    pub header: ComponentHeader,
    pub columns: Vec<TableColumn>,
    pub rows: Vec<TableRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totals: Option<Vec<TableCell>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub groupings: Vec<TableGrouping>,
}

impl Table {
    /// Build a table, checking every row against the columns.
    pub fn new(
        header: ComponentHeader,
        columns: Vec<TableColumn>,
        rows: Vec<TableRow>,
    ) -> StructureResult<Self> {
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        validate_structure(&names, &rows)?;

        Ok(Self {
            header,
            columns,
            rows,
            totals: None,
            groupings: Vec::new(),
        })
    }

    pub fn with_totals(mut self, totals: Option<Vec<TableCell>>) -> Self {
        self.totals = totals;
        self
    }

    pub fn with_groupings(mut self, groupings: Vec<TableGrouping>) -> Self {
        self.groupings = groupings;
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TableRow> {
        self.rows.iter()
    }
}

impl Index<usize> for Table {
    type Output = TableRow;

    fn index(&self, index: usize) -> &Self::Output {
        &self.rows[index]
    }
}

/// One totals cell per column; `None` when no column declares a total.
pub fn compute_totals(
    columns: &[TableColumn],
    functions: &[Option<AggregateFunction>],
    rows: &[TableRow],
) -> Option<Vec<TableCell>> {
    if functions.iter().all(Option::is_none) {
        return None;
    }

    let cells = columns
        .iter()
        .zip(functions)
        .map(|(column, function)| {
            let value = match function {
                Some(function) => function.compute(rows.iter().filter_map(|r| r.value(&column.name))),
                None => Value::Null,
            };
            TableCell::new(column.clone(), value)
        })
        .collect();

    Some(cells)
}
