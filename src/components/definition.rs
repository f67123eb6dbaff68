//! Author-time component definitions.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::chart::ChartDefinition;
use super::repeater::RepeaterDefinition;
use super::separator::SeparatorDefinition;
use super::table::TableDefinition;
use crate::data::Query;

/// Result type for definition construction.
pub type DefinitionResult<T> = Result<T, DefinitionError>;

/// A report or component definition violates its invariants.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DefinitionError {
    #[error("component names cannot be empty")]
    EmptyName,

    #[error("relative {dimension} must be greater than 0 and at most 100, got {value}")]
    InvalidRelativeSize { dimension: &'static str, value: f64 },

    #[error("the component name '{name}' is already used in section '{section}'")]
    DuplicateComponentName { section: String, name: String },

    #[error("component '{component}' is invalid: {message}")]
    InvalidComponent { component: String, message: String },
}

/// The kind tag of a component, used to dispatch to its generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    Table,
    Repeater,
    Chart,
    Separator,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 4] = [
        ComponentKind::Table,
        ComponentKind::Repeater,
        ComponentKind::Chart,
        ComponentKind::Separator,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Table => "table",
            ComponentKind::Repeater => "repeater",
            ComponentKind::Chart => "chart",
            ComponentKind::Separator => "separator",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A relative width or height, in (0, 100].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct RelativeSize(f64);

impl RelativeSize {
    pub fn new(value: f64) -> Option<Self> {
        (value > 0.0 && value <= 100.0).then_some(Self(value))
    }

    pub fn get(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for RelativeSize {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        RelativeSize::new(value)
            .ok_or_else(|| format!("relative size must be in (0, 100], got {}", value))
    }
}

impl From<RelativeSize> for f64 {
    fn from(size: RelativeSize) -> Self {
        size.0
    }
}

/// Attributes shared by every component definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentAttributes {
    pub name: String,
    pub title: String,
    pub no_data_message: Option<String>,
    pub relative_width: Option<RelativeSize>,
    pub relative_height: Option<RelativeSize>,
}

impl ComponentAttributes {
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            no_data_message: None,
            relative_width: None,
            relative_height: None,
        }
    }

    pub fn with_no_data_message(mut self, message: impl Into<String>) -> Self {
        self.no_data_message = Some(message.into());
        self
    }

    /// Set the relative size. Both dimensions must lie in (0, 100].
    pub fn with_relative_size(mut self, width: f64, height: Option<f64>) -> DefinitionResult<Self> {
        self.relative_width = Some(RelativeSize::new(width).ok_or(
            DefinitionError::InvalidRelativeSize {
                dimension: "width",
                value: width,
            },
        )?);

        self.relative_height = match height {
            Some(h) => Some(RelativeSize::new(h).ok_or(DefinitionError::InvalidRelativeSize {
                dimension: "height",
                value: h,
            })?),
            None => None,
        };

        Ok(self)
    }
}

/// A declarative component description, one variant per component kind.
#[derive(Debug, Clone)]
pub enum ComponentDefinition {
    Table(TableDefinition),
    Repeater(RepeaterDefinition),
    Chart(ChartDefinition),
    Separator(SeparatorDefinition),
}

impl ComponentDefinition {
    pub fn kind(&self) -> ComponentKind {
        match self {
            ComponentDefinition::Table(_) => ComponentKind::Table,
            ComponentDefinition::Repeater(_) => ComponentKind::Repeater,
            ComponentDefinition::Chart(_) => ComponentKind::Chart,
            ComponentDefinition::Separator(_) => ComponentKind::Separator,
        }
    }

    pub fn attributes(&self) -> &ComponentAttributes {
        match self {
            ComponentDefinition::Table(d) => &d.attributes,
            ComponentDefinition::Repeater(d) => &d.attributes,
            ComponentDefinition::Chart(d) => &d.attributes,
            ComponentDefinition::Separator(d) => &d.attributes,
        }
    }

    pub fn name(&self) -> &str {
        &self.attributes().name
    }

    /// Queries executed when this component is generated.
    pub fn queries(&self) -> Vec<Arc<dyn Query>> {
        match self {
            ComponentDefinition::Table(d) => vec![d.query.clone()],
            ComponentDefinition::Repeater(d) => vec![d.query.clone()],
            ComponentDefinition::Chart(d) => d.data_sets.iter().map(|s| s.query.clone()).collect(),
            ComponentDefinition::Separator(_) => Vec::new(),
        }
    }

    /// Check the variant's own invariants.
    pub fn validate(&self) -> DefinitionResult<()> {
        if self.name().trim().is_empty() {
            return Err(DefinitionError::EmptyName);
        }

        match self {
            ComponentDefinition::Table(d) => d.validate(),
            ComponentDefinition::Chart(d) => d.validate(),
            ComponentDefinition::Repeater(_) | ComponentDefinition::Separator(_) => Ok(()),
        }
    }

    pub fn as_table(&self) -> Option<&TableDefinition> {
        match self {
            ComponentDefinition::Table(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_repeater(&self) -> Option<&RepeaterDefinition> {
        match self {
            ComponentDefinition::Repeater(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_chart(&self) -> Option<&ChartDefinition> {
        match self {
            ComponentDefinition::Chart(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_separator(&self) -> Option<&SeparatorDefinition> {
        match self {
            ComponentDefinition::Separator(d) => Some(d),
            _ => None,
        }
    }
}

impl From<TableDefinition> for ComponentDefinition {
    fn from(d: TableDefinition) -> Self {
        ComponentDefinition::Table(d)
    }
}

impl From<RepeaterDefinition> for ComponentDefinition {
    fn from(d: RepeaterDefinition) -> Self {
        ComponentDefinition::Repeater(d)
    }
}

impl From<ChartDefinition> for ComponentDefinition {
    fn from(d: ChartDefinition) -> Self {
        ComponentDefinition::Chart(d)
    }
}

impl From<SeparatorDefinition> for ComponentDefinition {
    fn from(d: SeparatorDefinition) -> Self {
        ComponentDefinition::Separator(d)
    }
}
