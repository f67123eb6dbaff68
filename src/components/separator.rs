//! Separators: layout-only components with no data.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::definition::{ComponentAttributes, ComponentDefinition, ComponentKind};
use super::generator::ComponentGenerator;
use super::{Component, ComponentHeader};
use crate::error::{GenerationError, GenerationResult};
use crate::filter::ReportFilter;
use crate::report::SectionType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SeparatorStyle {
    #[default]
    Line,
    Space,
    PageBreak,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeparatorDefinition {
    pub attributes: ComponentAttributes,
    pub style: SeparatorStyle,
}

impl SeparatorDefinition {
    pub fn new(attributes: ComponentAttributes, style: SeparatorStyle) -> Self {
        Self { attributes, style }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Separator {
    #[serde(flatten)]
    pub header: ComponentHeader,
    pub style: SeparatorStyle,
}

/// Generates [`Separator`]s. Runs no query.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeparatorGenerator;

#[async_trait]
impl ComponentGenerator for SeparatorGenerator {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Separator
    }

    async fn generate(
        &self,
        definition: &ComponentDefinition,
        _section: SectionType,
        _filter: &ReportFilter,
    ) -> GenerationResult<Component> {
        let separator = definition.as_separator().ok_or_else(|| {
            GenerationError::invalid_definition(ComponentKind::Separator, definition.kind())
        })?;

        Ok(Component::Separator(Separator {
            header: ComponentHeader::new(&separator.attributes, ComponentKind::Separator),
            style: separator.style,
        }))
    }
}
