//! Report documents: a complete report described as JSON.
//!
//! A document carries its queries inline (columns, parameters and rows) and
//! lays out sections whose components reference those queries by name.
//! [`ReportDocument::build`] turns it into a [`ReportDefinition`] backed by
//! [`MemoryQuery`] instances.
//!
//! ```json
//! {
//!   "name": "sales",
//!   "title": "Sales",
//!   "queries": [{
//!     "name": "Orders",
//!     "columns": [{"name": "Customer", "type": "text"}, {"name": "Amount", "type": "integer"}],
//!     "rows": [["A", 30], ["B", 10]]
//!   }],
//!   "sections": {
//!     "report_body": {
//!       "title": "Body",
//!       "components": [{
//!         "kind": "table", "name": "Orders", "query": "Orders",
//!         "columns": [{"name": "Customer"}, {"name": "Amount", "total": "sum"}]
//!       }]
//!     }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use crate::components::{
    ActionDefinition, ChartDataSetDefinition, ChartDefinition, ChartType, ColumnAlignment,
    ColumnImportance, ComponentAttributes, ComponentDefinition, DefinitionError, RelativeSize,
    RepeaterDefinition, RepeaterType, SeparatorDefinition, SeparatorStyle, TableColumnDefinition,
    TableDefinition,
};
use crate::data::validation::validate_columns;
use crate::data::{
    same_name, AggregateFunction, DataBinding, DataColumnSchema, GroupingRule, MemoryQuery,
    ParameterInfo, ParameterValue, Query, SortingRule, StructureError, Value,
};
use crate::report::{ReportDefinition, SectionDefinition, SectionType};

pub type DocumentResult<T> = Result<T, DocumentError>;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("failed to read report document: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse report document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("the query name '{0}' can only be used once")]
    DuplicateQuery(String),

    #[error("query '{query}' is malformed: {source}")]
    MalformedQuery {
        query: String,
        #[source]
        source: StructureError,
    },

    #[error("component '{component}' references unknown query '{query}'")]
    UnknownQuery { component: String, query: String },

    #[error("section '{section}': {source}")]
    Definition {
        section: SectionType,
        #[source]
        source: DefinitionError,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportDocument {
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub queries: Vec<QueryDocument>,
    #[serde(default)]
    pub sections: BTreeMap<SectionType, SectionDocument>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueryDocument {
    pub name: String,
    #[serde(default = "default_data_source")]
    pub data_source: String,
    pub columns: Vec<DataColumnSchema>,
    #[serde(default)]
    pub parameters: Vec<ParameterInfo>,
    #[serde(default)]
    pub sorting: Vec<SortingRule>,
    #[serde(default)]
    pub grouping: Vec<GroupingRule>,
    #[serde(default)]
    pub rows: Vec<Vec<Value>>,
}

fn default_data_source() -> String {
    "memory".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct SectionDocument {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub components: Vec<ComponentDocument>,
}

/// Attributes common to every component.
#[derive(Debug, Clone, Deserialize)]
pub struct AttributesDocument {
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub no_data_message: Option<String>,
    #[serde(default)]
    pub relative_width: Option<f64>,
    #[serde(default)]
    pub relative_height: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComponentDocument {
    Table(TableDocument),
    Repeater(RepeaterDocument),
    Chart(ChartDocument),
    Separator(SeparatorDocument),
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableDocument {
    #[serde(flatten)]
    pub attributes: AttributesDocument,
    pub query: String,
    pub columns: Vec<ColumnDocument>,
    #[serde(default)]
    pub default_parameters: Vec<ParameterValue>,
    #[serde(default)]
    pub row_action: Option<ActionDefinition>,
    #[serde(default)]
    pub disable_sorting: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ColumnDocument {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Defaults to the query column of the same name.
    #[serde(default)]
    pub binding: Option<DataBinding>,
    #[serde(default)]
    pub alignment: ColumnAlignment,
    #[serde(default)]
    pub importance: ColumnImportance,
    #[serde(default)]
    pub cell_action: Option<ActionDefinition>,
    #[serde(default)]
    pub total: Option<AggregateFunction>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepeaterDocument {
    #[serde(flatten)]
    pub attributes: AttributesDocument,
    pub query: String,
    pub binding: DataBinding,
    #[serde(default)]
    pub action: Option<ActionDefinition>,
    #[serde(default)]
    pub repeater_type: RepeaterType,
    #[serde(default)]
    pub default_parameters: Vec<ParameterValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartDocument {
    #[serde(flatten)]
    pub attributes: AttributesDocument,
    #[serde(default)]
    pub chart_type: ChartType,
    #[serde(default)]
    pub x_axis_label: Option<String>,
    #[serde(default)]
    pub y_axis_label: Option<String>,
    pub data_sets: Vec<DataSetDocument>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataSetDocument {
    pub name: String,
    pub query: String,
    pub x: DataBinding,
    pub y: DataBinding,
    #[serde(default)]
    pub label: Option<DataBinding>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub default_parameters: Vec<ParameterValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeparatorDocument {
    #[serde(flatten)]
    pub attributes: AttributesDocument,
    #[serde(default)]
    pub style: SeparatorStyle,
}

impl ReportDocument {
    pub fn from_json(json: &str) -> DocumentResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> DocumentResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Build the report definition, validating every section and component.
    pub fn build(&self) -> DocumentResult<ReportDefinition> {
        let queries = self.build_queries()?;

        let mut definition = ReportDefinition::new(self.name.clone(), self.title.clone());
        if let Some(description) = &self.description {
            definition = definition.with_description(description.clone());
        }

        for (&section_type, section) in &self.sections {
            let mut built = SectionDefinition::new(section_type, section.title.clone());
            if let Some(description) = &section.description {
                built = built.with_description(description.clone());
            }

            for component in &section.components {
                let component = component.build(&queries, section_type)?;
                built
                    .add_component(component)
                    .map_err(|source| DocumentError::Definition {
                        section: section_type,
                        source,
                    })?;
            }

            definition = definition.with_section(built);
        }

        Ok(definition)
    }

    fn build_queries(&self) -> DocumentResult<Vec<Arc<dyn Query>>> {
        let mut queries: Vec<Arc<dyn Query>> = Vec::with_capacity(self.queries.len());

        for doc in &self.queries {
            if queries.iter().any(|q| same_name(q.name(), &doc.name)) {
                return Err(DocumentError::DuplicateQuery(doc.name.clone()));
            }
            queries.push(Arc::new(doc.build()?));
        }

        Ok(queries)
    }
}

impl QueryDocument {
    fn build(&self) -> DocumentResult<MemoryQuery> {
        let malformed = |source: StructureError| DocumentError::MalformedQuery {
            query: self.name.clone(),
            source,
        };

        let names: Vec<&str> = self.columns.iter().map(|c| c.name.as_str()).collect();
        validate_columns(&names).map_err(malformed)?;

        if let Some((row, values)) = self
            .rows
            .iter()
            .enumerate()
            .find(|(_, values)| values.len() != names.len())
        {
            return Err(malformed(StructureError::CellCountMismatch {
                row,
                expected: names.len(),
                found: values.len(),
            }));
        }

        let query = self.parameters.iter().cloned().fold(
            MemoryQuery::new(self.name.clone(), self.columns.clone())
                .with_data_source(self.data_source.clone())
                .with_rows(self.rows.iter().cloned()),
            MemoryQuery::with_parameter,
        );
        let query = self.sorting.iter().cloned().fold(query, MemoryQuery::sort_column);
        let query = self.grouping.iter().cloned().fold(query, MemoryQuery::add_grouping);

        Ok(query)
    }
}

impl AttributesDocument {
    fn build(&self, section: SectionType) -> DocumentResult<ComponentAttributes> {
        let size = |dimension: &'static str, value: Option<f64>| {
            value
                .map(|v| {
                    RelativeSize::new(v).ok_or(DocumentError::Definition {
                        section,
                        source: DefinitionError::InvalidRelativeSize { dimension, value: v },
                    })
                })
                .transpose()
        };

        let mut attributes = ComponentAttributes::new(self.name.clone(), self.title.clone());
        attributes.no_data_message = self.no_data_message.clone();
        attributes.relative_width = size("width", self.relative_width)?;
        attributes.relative_height = size("height", self.relative_height)?;
        Ok(attributes)
    }
}

fn find_query(
    queries: &[Arc<dyn Query>],
    component: &str,
    name: &str,
) -> DocumentResult<Arc<dyn Query>> {
    queries
        .iter()
        .find(|q| same_name(q.name(), name))
        .cloned()
        .ok_or_else(|| DocumentError::UnknownQuery {
            component: component.to_string(),
            query: name.to_string(),
        })
}

impl ComponentDocument {
    fn build(
        &self,
        queries: &[Arc<dyn Query>],
        section: SectionType,
    ) -> DocumentResult<ComponentDefinition> {
        let definition: ComponentDefinition = match self {
            ComponentDocument::Table(doc) => {
                let attributes = doc.attributes.build(section)?;
                let query = find_query(queries, &attributes.name, &doc.query)?;

                let mut table = TableDefinition::new(attributes, query);
                table.columns = doc.columns.iter().map(ColumnDocument::build).collect();
                table.default_parameter_values = doc.default_parameters.clone();
                table.row_action = doc.row_action.clone();
                table.disable_sorting = doc.disable_sorting;
                table.into()
            }
            ComponentDocument::Repeater(doc) => {
                let attributes = doc.attributes.build(section)?;
                let query = find_query(queries, &attributes.name, &doc.query)?;

                let mut repeater = RepeaterDefinition::new(attributes, query, doc.binding.clone())
                    .with_type(doc.repeater_type);
                repeater.action = doc.action.clone();
                repeater.default_parameter_values = doc.default_parameters.clone();
                repeater.into()
            }
            ComponentDocument::Chart(doc) => {
                let attributes = doc.attributes.build(section)?;

                let data_sets = doc
                    .data_sets
                    .iter()
                    .map(|d| {
                        let query = find_query(queries, &attributes.name, &d.query)?;
                        let mut data_set =
                            ChartDataSetDefinition::new(d.name.clone(), query, d.x.clone(), d.y.clone());
                        data_set.label_binding = d.label.clone();
                        data_set.color = d.color.clone();
                        data_set.default_parameter_values = d.default_parameters.clone();
                        Ok(data_set)
                    })
                    .collect::<DocumentResult<Vec<_>>>()?;

                let mut chart = ChartDefinition::new(attributes, doc.chart_type);
                chart.x_axis_label = doc.x_axis_label.clone();
                chart.y_axis_label = doc.y_axis_label.clone();
                chart.data_sets = data_sets;
                chart.into()
            }
            ComponentDocument::Separator(doc) => {
                SeparatorDefinition::new(doc.attributes.build(section)?, doc.style).into()
            }
        };

        Ok(definition)
    }
}

impl ColumnDocument {
    fn build(&self) -> TableColumnDefinition {
        let binding = self
            .binding
            .clone()
            .unwrap_or_else(|| DataBinding::column(self.name.clone()));
        let title = self.title.clone().unwrap_or_else(|| self.name.clone());

        let mut column = TableColumnDefinition::new(self.name.clone(), title, binding)
            .aligned(self.alignment)
            .with_importance(self.importance);
        column.cell_action = self.cell_action.clone();
        column.total = self.total;
        column
    }
}
