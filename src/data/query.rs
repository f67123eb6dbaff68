//! The query seam.
//!
//! A [`Query`] is the boundary between report generation and whatever data
//! source actually holds the rows. Generation only needs to know a query's
//! declared shape and be able to execute it asynchronously; how the data
//! source resolves it is not its concern.
//!
//! # Example
//!
//! ```ignore
//! use folio::data::{ParameterValue, Query};
//!
//! async fn example(query: &dyn Query) -> folio::data::QueryResult<()> {
//!     let results = query.execute(&[ParameterValue::new("Region", "EMEA")]).await?;
//!     for row in &results {
//!         println!("{:?}", row.value("Total"));
//!     }
//!     Ok(())
//! }
//! ```

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use super::column::QueryColumnInfo;
use super::parameter::{ParameterInfo, ParameterValue};
use super::results::QueryResults;
use super::sorting::{GroupingRule, SortingRule};
use super::validation::StructureError;

/// Result type for query execution.
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors raised by a query execution.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    /// A required parameter had no value.
    #[error("query '{query}' requires a value for parameter '{parameter}'")]
    MissingParameter { query: String, parameter: String },

    /// A supplied parameter value does not fit the declared type.
    #[error("query '{query}': invalid value for parameter '{parameter}': {message}")]
    InvalidParameter {
        query: String,
        parameter: String,
        message: String,
    },

    /// The data source could not be reached.
    #[error("data source '{0}' is unavailable")]
    DataSourceUnavailable(String),

    /// The data source returned malformed rows.
    #[error("query '{query}' returned malformed data: {source}")]
    Malformed {
        query: String,
        #[source]
        source: StructureError,
    },

    /// Execution failed inside the data source.
    #[error("query '{query}' failed: {message}")]
    Execution { query: String, message: String },
}

impl QueryError {
    pub fn execution(query: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Execution {
            query: query.into(),
            message: message.into(),
        }
    }
}

/// A named query bound to exactly one data source.
///
/// Implementations must be safe to execute concurrently from independent
/// generation tasks.
#[async_trait]
pub trait Query: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Name of the data source the query runs against.
    fn data_source(&self) -> &str;

    fn columns(&self) -> &[QueryColumnInfo];

    fn parameters(&self) -> &[ParameterInfo];

    fn sorting_rules(&self) -> &[SortingRule];

    fn grouping_rules(&self) -> &[GroupingRule];

    /// Execute the query with the given parameter values.
    async fn execute(&self, values: &[ParameterValue]) -> QueryResult<QueryResults>;

    /// Execute on a tokio runtime, blocking until the results are ready.
    ///
    /// Fails when called from inside a current-thread runtime.
    fn execute_blocking(&self, values: &[ParameterValue]) -> QueryResult<QueryResults> {
        crate::runtime::block_on(self.execute(values))
            .map_err(|e| QueryError::execution(self.name(), e.to_string()))?
    }
}
