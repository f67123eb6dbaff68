//! Sorting and grouping rules.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::validation::{StructureError, StructureResult};
use super::value::Value;

/// Sort direction for a single rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// Orient an ascending comparison for this direction.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Order rows by a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortingRule {
    pub column: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortingRule {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }

    pub fn asc(column: impl Into<String>) -> Self {
        Self::new(column, SortDirection::Ascending)
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self::new(column, SortDirection::Descending)
    }
}

/// Group rows by a column; groups are ordered by `direction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupingRule {
    pub column: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl GroupingRule {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }
}

impl From<&GroupingRule> for SortingRule {
    fn from(rule: &GroupingRule) -> Self {
        SortingRule::new(rule.column.clone(), rule.direction)
    }
}

/// Compare two key tuples rule by rule; later rules only break ties.
pub fn compare_keys(a: &[Value], b: &[Value], directions: &[SortDirection]) -> Ordering {
    a.iter()
        .zip(b)
        .zip(directions)
        .map(|((x, y), direction)| direction.apply(x.compare(y)))
        .find(|ordering| *ordering != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

/// Stable multi-key sort.
///
/// `key` extracts the value of a named column from an item. With no rules the
/// input order is returned untouched. A rule naming a column the item does
/// not carry is a structural error.
pub fn sort_by_rules<T, F>(items: Vec<T>, rules: &[SortingRule], mut key: F) -> StructureResult<Vec<T>>
where
    F: FnMut(&T, &str) -> Option<Value>,
{
    if rules.is_empty() {
        return Ok(items);
    }

    let mut keyed = items
        .into_iter()
        .map(|item| {
            let keys = rules
                .iter()
                .map(|rule| {
                    key(&item, &rule.column)
                        .ok_or_else(|| StructureError::UnknownColumn(rule.column.clone()))
                })
                .collect::<StructureResult<Vec<_>>>()?;
            Ok((keys, item))
        })
        .collect::<StructureResult<Vec<_>>>()?;

    let directions: Vec<SortDirection> = rules.iter().map(|r| r.direction).collect();

    // `sort_by` is stable: equal keys keep their prior relative order.
    keyed.sort_by(|(a, _), (b, _)| compare_keys(a, b, &directions));

    Ok(keyed.into_iter().map(|(_, item)| item).collect())
}
