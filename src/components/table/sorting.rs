use crate::data::sorting::sort_by_rules;
use crate::data::{SortingRule, StructureResult};

use super::TableRow;

/// Sort generated rows by `rules`; the first rule is the primary key.
///
/// The sort is stable and an empty rule list keeps the input order.
pub fn sort_rows(rows: Vec<TableRow>, rules: &[SortingRule]) -> StructureResult<Vec<TableRow>> {
    sort_by_rules(rows, rules, |row, column| row.value(column).cloned())
}
