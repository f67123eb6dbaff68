//! Charts: one or more data sets plotted against shared axes.
//!
//! Each data set runs its own query. The generator executes every data set
//! concurrently and fails as a whole when any one of them fails.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};

use super::definition::{ComponentAttributes, ComponentDefinition, ComponentKind, DefinitionError, DefinitionResult};
use super::generator::{execute_query, ComponentGenerator};
use super::{Component, ComponentHeader};
use crate::data::{same_name, DataBinding, ParameterValue, Query, Value};
use crate::error::{GenerationError, GenerationResult};
use crate::filter::ReportFilter;
use crate::report::SectionType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    #[default]
    Bar,
    Line,
    Area,
    Pie,
}

/// One series of a chart.
#[derive(Debug, Clone)]
pub struct ChartDataSetDefinition {
    pub name: String,
    pub query: Arc<dyn Query>,
    pub x_binding: DataBinding,
    /// Must resolve to a number or null.
    pub y_binding: DataBinding,
    pub label_binding: Option<DataBinding>,
    pub default_parameter_values: Vec<ParameterValue>,
    pub color: Option<String>,
}

impl ChartDataSetDefinition {
    pub fn new(
        name: impl Into<String>,
        query: Arc<dyn Query>,
        x_binding: DataBinding,
        y_binding: DataBinding,
    ) -> Self {
        Self {
            name: name.into(),
            query,
            x_binding,
            y_binding,
            label_binding: None,
            default_parameter_values: Vec::new(),
            color: None,
        }
    }

    pub fn with_label(mut self, binding: DataBinding) -> Self {
        self.label_binding = Some(binding);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_default_parameter(mut self, value: ParameterValue) -> Self {
        self.default_parameter_values.push(value);
        self
    }
}

#[derive(Debug, Clone)]
pub struct ChartDefinition {
    pub attributes: ComponentAttributes,
    pub chart_type: ChartType,
    /// Template resolved against the first data set's parameter values.
    pub x_axis_label: Option<String>,
    pub y_axis_label: Option<String>,
    pub data_sets: Vec<ChartDataSetDefinition>,
}

impl ChartDefinition {
    pub fn new(attributes: ComponentAttributes, chart_type: ChartType) -> Self {
        Self {
            attributes,
            chart_type,
            x_axis_label: None,
            y_axis_label: None,
            data_sets: Vec::new(),
        }
    }

    pub fn with_axis_labels(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_axis_label = Some(x.into());
        self.y_axis_label = Some(y.into());
        self
    }

    pub fn with_data_set(mut self, data_set: ChartDataSetDefinition) -> Self {
        self.data_sets.push(data_set);
        self
    }

    pub fn validate(&self) -> DefinitionResult<()> {
        let invalid = |message: String| DefinitionError::InvalidComponent {
            component: self.attributes.name.clone(),
            message,
        };

        if self.data_sets.is_empty() {
            return Err(invalid("a chart needs at least one data set".to_string()));
        }

        for (idx, data_set) in self.data_sets.iter().enumerate() {
            if self.data_sets[..idx].iter().any(|d| same_name(&d.name, &data_set.name)) {
                return Err(invalid(format!("the data set name '{}' can only be used once", data_set.name)));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDataPoint {
    pub x: Value,
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDataSet {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub points: Vec<ChartDataPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    #[serde(flatten)]
    pub header: ComponentHeader,
    pub chart_type: ChartType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_axis_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_axis_label: Option<String>,
    pub data_sets: Vec<ChartDataSet>,
}

/// Generates [`Chart`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChartGenerator;

impl ChartGenerator {
    async fn generate_data_set(
        data_set: &ChartDataSetDefinition,
        parameters: Vec<ParameterValue>,
    ) -> GenerationResult<ChartDataSet> {
        let results = execute_query(data_set.query.as_ref(), &parameters).await?;

        let points = results
            .iter()
            .map(|row| {
                let label = data_set
                    .label_binding
                    .as_ref()
                    .map(|b| b.resolve(row).map(|v| v.to_string()))
                    .transpose()?;

                Ok(ChartDataPoint {
                    x: data_set.x_binding.resolve(row)?,
                    y: data_set.y_binding.resolve_as::<Option<f64>, _>(row)?,
                    label,
                })
            })
            .collect::<GenerationResult<Vec<_>>>()?;

        Ok(ChartDataSet {
            name: data_set.name.clone(),
            color: data_set.color.clone(),
            points,
        })
    }
}

fn axis_label(template: Option<&String>, parameters: &[ParameterValue]) -> GenerationResult<Option<String>> {
    template
        .map(|t| {
            DataBinding::template(t.as_str())
                .resolve(parameters)
                .map(|v| v.to_string())
        })
        .transpose()
        .map_err(GenerationError::from)
}

#[async_trait]
impl ComponentGenerator for ChartGenerator {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Chart
    }

    async fn generate(
        &self,
        definition: &ComponentDefinition,
        section: SectionType,
        filter: &ReportFilter,
    ) -> GenerationResult<Component> {
        let chart = definition
            .as_chart()
            .ok_or_else(|| GenerationError::invalid_definition(ComponentKind::Chart, definition.kind()))?;

        let parameters: Vec<Vec<ParameterValue>> = chart
            .data_sets
            .iter()
            .map(|d| filter.resolve_parameters(section, d.query.as_ref(), &d.default_parameter_values))
            .collect();

        let first = parameters.first().map(Vec::as_slice).unwrap_or_default();
        let x_axis_label = axis_label(chart.x_axis_label.as_ref(), first)?;
        let y_axis_label = axis_label(chart.y_axis_label.as_ref(), first)?;

        let tasks = chart
            .data_sets
            .iter()
            .zip(parameters.iter().cloned())
            .map(|(data_set, params)| Self::generate_data_set(data_set, params));

        let data_sets = join_all(tasks)
            .await
            .into_iter()
            .collect::<GenerationResult<Vec<_>>>()?;

        Ok(Component::Chart(Chart {
            header: ComponentHeader::new(&chart.attributes, ComponentKind::Chart),
            chart_type: chart.chart_type,
            x_axis_label,
            y_axis_label,
            data_sets,
        }))
    }
}
