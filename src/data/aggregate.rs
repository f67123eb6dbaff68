//! Aggregate functions for column totals.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::value::Value;

/// A function folding a column's values into one total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateFunction {
    Sum,
    Count,
    Average,
    Median,
    Min,
    Max,
}

impl AggregateFunction {
    /// Fold `values` into a single total.
    ///
    /// Numeric functions skip nulls and non-numeric values. `Count` counts
    /// non-null values. `Min`/`Max` use the cross-type value ordering.
    /// Empty input yields `Null`, except `Count` which yields 0.
    pub fn compute<'a, I>(&self, values: I) -> Value
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let values: Vec<&Value> = values.into_iter().filter(|v| !v.is_null()).collect();

        match self {
            AggregateFunction::Count => Value::Integer(values.len() as i64),
            AggregateFunction::Min => extreme(&values, Ordering::Less),
            AggregateFunction::Max => extreme(&values, Ordering::Greater),
            AggregateFunction::Sum => sum(&values),
            AggregateFunction::Average => {
                let numbers = numbers(&values);
                if numbers.is_empty() {
                    Value::Null
                } else {
                    Value::Float(numbers.iter().sum::<f64>() / numbers.len() as f64)
                }
            }
            AggregateFunction::Median => median(numbers(&values)),
        }
    }
}

fn numbers(values: &[&Value]) -> Vec<f64> {
    values.iter().filter_map(|v| v.as_f64()).collect()
}

fn sum(values: &[&Value]) -> Value {
    let numeric: Vec<&&Value> = values.iter().filter(|v| v.as_f64().is_some()).collect();
    if numeric.is_empty() {
        return Value::Null;
    }

    // Stay integral while every input is an integer.
    let mut int_total: Option<i64> = Some(0);
    let mut float_total = 0.0;
    for value in numeric {
        match value {
            Value::Integer(i) => int_total = int_total.and_then(|t| t.checked_add(*i)),
            _ => int_total = None,
        }
        float_total += value.as_f64().unwrap_or_default();
    }

    int_total.map(Value::Integer).unwrap_or(Value::Float(float_total))
}

fn median(mut numbers: Vec<f64>) -> Value {
    if numbers.is_empty() {
        return Value::Null;
    }

    numbers.sort_by(|a, b| a.total_cmp(b));
    let half = numbers.len() / 2;

    if numbers.len() % 2 == 0 {
        Value::Float((numbers[half - 1] + numbers[half]) / 2.0)
    } else {
        Value::Float(numbers[half])
    }
}

fn extreme(values: &[&Value], wanted: Ordering) -> Value {
    values
        .iter()
        .copied()
        .reduce(|best, v| if v.compare(best) == wanted { v } else { best })
        .cloned()
        .unwrap_or(Value::Null)
}
