use std::cmp::Ordering;

use serde::Serialize;

use super::{compute_totals, TableCell, TableColumn, TableRow};
use crate::data::sorting::compare_keys;
use crate::data::validation::validate_structure;
use crate::data::{AggregateFunction, GroupingRule, SortDirection, StructureError, StructureResult, Value};

/// The value a grouping column takes for every row of a group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupingValue {
    pub column: String,
    pub value: Value,
}

/// Rows sharing one grouping key, with their own totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableGrouping {
    pub grouping_values: Vec<GroupingValue>,
    pub rows: Vec<TableRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totals: Option<Vec<TableCell>>,
}

impl TableGrouping {
    /// Build a grouping, checking every row against `columns`.
    pub fn new(
        columns: &[TableColumn],
        grouping_values: Vec<GroupingValue>,
        rows: Vec<TableRow>,
    ) -> StructureResult<Self> {
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        validate_structure(&names, &rows)?;

        Ok(Self {
            grouping_values,
            rows,
            totals: None,
        })
    }

    pub fn with_totals(mut self, totals: Option<Vec<TableCell>>) -> Self {
        self.totals = totals;
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Partition already sorted rows by the grouping columns.
///
/// Groups are ordered by key according to each rule's direction; equal keys
/// keep first-appearance order and rows keep their order inside a group.
pub fn group_rows(
    rows: &[TableRow],
    columns: &[TableColumn],
    rules: &[GroupingRule],
    totals: &[Option<AggregateFunction>],
) -> StructureResult<Vec<TableGrouping>> {
    if rules.is_empty() {
        return Ok(Vec::new());
    }

    let mut keyed = rows
        .iter()
        .map(|row| {
            let key = rules
                .iter()
                .map(|rule| {
                    row.value(&rule.column)
                        .cloned()
                        .ok_or_else(|| StructureError::UnknownColumn(rule.column.clone()))
                })
                .collect::<StructureResult<Vec<_>>>()?;
            Ok((key, row))
        })
        .collect::<StructureResult<Vec<_>>>()?;

    // Stable: rows sharing a key stay in their incoming order, so each run of
    // equal keys is one group.
    let directions: Vec<SortDirection> = rules.iter().map(|r| r.direction).collect();
    keyed.sort_by(|(a, _), (b, _)| compare_keys(a, b, &directions));

    let mut groups: Vec<(Vec<Value>, Vec<TableRow>)> = Vec::new();
    for (key, row) in keyed {
        match groups.last_mut() {
            Some((last, members)) if compare_keys(last, &key, &directions) == Ordering::Equal => {
                members.push(row.clone())
            }
            _ => groups.push((key, vec![row.clone()])),
        }
    }

    groups
        .into_iter()
        .map(|(key, members)| {
            let values = rules
                .iter()
                .zip(key)
                .map(|(rule, value)| GroupingValue {
                    column: rule.column.clone(),
                    value,
                })
                .collect();
            let group_totals = compute_totals(columns, totals, &members);
            Ok(TableGrouping::new(columns, values, members)?.with_totals(group_totals))
        })
        .collect()
}
