//! Data layer: values, bindings, queries and their results.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Component generators                      │
//! └─────────────────────────────────────────────────────────────┘
//!            │ execute(params)                 │ resolve(row)
//!            ▼                                 ▼
//! ┌───────────────────────────┐   ┌───────────────────────────┐
//! │  Query (async seam)       │   │  DataBinding              │
//! │  - MemoryQuery            │   │  - Column / Template /    │
//! │  - external data sources  │   │    Constant               │
//! └───────────────────────────┘   └───────────────────────────┘
//!            │                                 ▲
//!            ▼                                 │
//! ┌─────────────────────────────────────────────────────────────┐
//! │  QueryResults (validated columns + rows of QueryCells)      │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod aggregate;
pub mod binding;
pub mod column;
pub mod memory;
pub mod parameter;
pub mod query;
pub mod results;
pub mod sorting;
pub mod validation;
pub mod value;

pub use aggregate::AggregateFunction;
pub use binding::{BindingError, BindingExpression, BindingResult, BindingSource, DataBinding};
pub use column::{DataColumnSchema, QueryColumnInfo};
pub use memory::MemoryQuery;
pub use parameter::{ParameterInfo, ParameterValue};
pub use query::{Query, QueryError, QueryResult};
pub use results::{QueryCell, QueryResults, QueryResultsBuilder, QueryRow};
pub use sorting::{GroupingRule, SortDirection, SortingRule};
pub use validation::{same_name, CellSet, StructureError, StructureResult};
pub use value::{FromValue, Value, ValueType};

impl BindingSource for QueryRow {
    fn lookup(&self, column: &str) -> Option<&Value> {
        self.value(column)
    }
}

impl BindingSource for [ParameterValue] {
    fn lookup(&self, column: &str) -> Option<&Value> {
        parameter::find_value(self, column).map(|p| &p.value)
    }
}
