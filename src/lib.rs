//! # Folio
//!
//! Concurrent report generation from declarative report definitions.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │           ReportDefinition + ReportFilter                │
//! │  (5 sections, components, query refs, parameters)        │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [report orchestrator]
//! ┌─────────────────────────────────────────────────────────┐
//! │       Section orchestrators (concurrent, one each)       │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [generator registry]
//! ┌─────────────────────────────────────────────────────────┐
//! │   Component generators: Table, Repeater, Chart, ...      │
//! │   (query execution, data binding, sorting, grouping)     │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │     Report, or the error messages of every failure       │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use folio::prelude::*;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let orders = Arc::new(
//!     MemoryQuery::new("Orders", vec![DataColumnSchema::new("Customer", ValueType::Text)])
//!         .with_row(vec!["A".into()]),
//! );
//!
//! let body = SectionDefinition::new(SectionType::ReportBody, "Orders").with_component(
//!     TableDefinition::new(ComponentAttributes::new("Orders", "Orders"), orders)
//!         .with_column(TableColumnDefinition::bound("Customer")),
//! )?;
//!
//! let definition = Arc::new(ReportDefinition::new("orders", "Orders").with_section(body));
//! let result = ReportGenerator::new().generate(definition, None).await;
//! assert!(result.success());
//! # Ok(())
//! # }
//! ```

pub mod components;
pub mod config;
pub mod data;
pub mod document;
pub mod error;
pub mod filter;
pub mod logging;
pub mod report;
mod runtime;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::components::{
        ActionDefinition, ActionType, ChartDataSetDefinition, ChartDefinition, ChartType,
        ColumnAlignment, ColumnImportance, Component, ComponentAttributes, ComponentDefinition,
        ComponentGenerator, ComponentKind, GeneratorRegistry, RepeaterDefinition, RepeaterType,
        ReportComponent, SeparatorDefinition, SeparatorStyle, TableColumnDefinition,
        TableDefinition,
    };
    pub use crate::data::{
        AggregateFunction, DataBinding, DataColumnSchema, GroupingRule, MemoryQuery,
        ParameterInfo, ParameterValue, Query, QueryResults, SortDirection, SortingRule, Value,
        ValueType,
    };
    pub use crate::error::{GenerationError, GenerationResult};
    pub use crate::filter::ReportFilter;
    pub use crate::report::{
        Report, ReportDefinition, ReportGenerationResult, ReportGenerator, ReportSection,
        ReportSectionGenerationResult, SectionDefinition, SectionType,
    };
}

// Also export at crate root for convenience
pub use error::{GenerationError, GenerationResult};
pub use filter::ReportFilter;
pub use report::{Report, ReportDefinition, ReportGenerator};
