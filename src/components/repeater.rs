//! Repeaters: one item per query row.

use std::ops::Index;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::action::{ActionDefinition, ReportAction};
use super::definition::{ComponentAttributes, ComponentDefinition, ComponentKind};
use super::generator::{execute_query, ComponentGenerator};
use super::{Component, ComponentHeader};
use crate::data::{DataBinding, ParameterValue, Query, Value};
use crate::error::{GenerationError, GenerationResult};
use crate::filter::ReportFilter;
use crate::report::SectionType;

/// How a repeater lays out its items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RepeaterType {
    #[default]
    Unordered,
    Ordered,
    Inline,
}

#[derive(Debug, Clone)]
pub struct RepeaterDefinition {
    pub attributes: ComponentAttributes,
    pub query: Arc<dyn Query>,
    /// Produces each item's value.
    pub binding: DataBinding,
    pub action: Option<ActionDefinition>,
    pub repeater_type: RepeaterType,
    pub default_parameter_values: Vec<ParameterValue>,
}

impl RepeaterDefinition {
    pub fn new(attributes: ComponentAttributes, query: Arc<dyn Query>, binding: DataBinding) -> Self {
        Self {
            attributes,
            query,
            binding,
            action: None,
            repeater_type: RepeaterType::default(),
            default_parameter_values: Vec::new(),
        }
    }

    pub fn with_action(mut self, action: ActionDefinition) -> Self {
        self.action = Some(action);
        self
    }

    pub fn with_type(mut self, repeater_type: RepeaterType) -> Self {
        self.repeater_type = repeater_type;
        self
    }

    pub fn with_default_parameter(mut self, value: ParameterValue) -> Self {
        self.default_parameter_values.push(value);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepeaterItem {
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<ReportAction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Repeater {
    #[serde(flatten)]
    pub header: ComponentHeader,
    pub repeater_type: RepeaterType,
    pub items: Vec<RepeaterItem>,
}

impl Repeater {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RepeaterItem> {
        self.items.iter()
    }
}

impl Index<usize> for Repeater {
    type Output = RepeaterItem;

    fn index(&self, index: usize) -> &Self::Output {
        &self.items[index]
    }
}

/// Generates [`Repeater`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct RepeaterGenerator;

#[async_trait]
impl ComponentGenerator for RepeaterGenerator {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Repeater
    }

    async fn generate(
        &self,
        definition: &ComponentDefinition,
        section: SectionType,
        filter: &ReportFilter,
    ) -> GenerationResult<Component> {
        let repeater = definition.as_repeater().ok_or_else(|| {
            GenerationError::invalid_definition(ComponentKind::Repeater, definition.kind())
        })?;

        let parameters = filter.resolve_parameters(
            section,
            repeater.query.as_ref(),
            &repeater.default_parameter_values,
        );
        let results = execute_query(repeater.query.as_ref(), &parameters).await?;

        let items = results
            .iter()
            .map(|row| {
                let value = repeater.binding.resolve(row)?;
                let action = repeater.action.as_ref().map(|a| a.resolve(row)).transpose()?;
                Ok(RepeaterItem { value, action })
            })
            .collect::<GenerationResult<Vec<_>>>()?;

        Ok(Component::Repeater(Repeater {
            header: ComponentHeader::new(&repeater.attributes, ComponentKind::Repeater),
            repeater_type: repeater.repeater_type,
            items,
        }))
    }
}
