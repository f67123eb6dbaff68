//! Report and section definitions.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::components::{ComponentDefinition, DefinitionError, DefinitionResult};
use crate::data::{same_name, Query};
use crate::filter::ReportFilter;

/// The five fixed report sections, in layout order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionType {
    PageHeader,
    ReportHeader,
    ReportBody,
    ReportFooter,
    PageFooter,
}

impl SectionType {
    pub const ALL: [SectionType; 5] = [
        SectionType::PageHeader,
        SectionType::ReportHeader,
        SectionType::ReportBody,
        SectionType::ReportFooter,
        SectionType::PageFooter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionType::PageHeader => "page_header",
            SectionType::ReportHeader => "report_header",
            SectionType::ReportBody => "report_body",
            SectionType::ReportFooter => "report_footer",
            SectionType::PageFooter => "page_footer",
        }
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One section of a report definition.
#[derive(Debug, Clone)]
pub struct SectionDefinition {
    pub section_type: SectionType,
    pub title: String,
    pub description: Option<String>,
    components: Vec<ComponentDefinition>,
}

impl SectionDefinition {
    pub fn new(section_type: SectionType, title: impl Into<String>) -> Self {
        Self {
            section_type,
            title: title.into(),
            description: None,
            components: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Append a component after validating it.
    ///
    /// Fails when the component is invalid or its name is already used in
    /// this section (case-insensitive).
    pub fn add_component(&mut self, component: impl Into<ComponentDefinition>) -> DefinitionResult<()> {
        let component = component.into();
        component.validate()?;

        if self.component(component.name()).is_some() {
            return Err(DefinitionError::DuplicateComponentName {
                section: self.section_type.to_string(),
                name: component.name().to_string(),
            });
        }

        self.components.push(component);
        Ok(())
    }

    pub fn with_component(mut self, component: impl Into<ComponentDefinition>) -> DefinitionResult<Self> {
        self.add_component(component)?;
        Ok(self)
    }

    /// Components in declaration order.
    pub fn components(&self) -> &[ComponentDefinition] {
        &self.components
    }

    pub fn component(&self, name: &str) -> Option<&ComponentDefinition> {
        self.components.iter().find(|c| same_name(c.name(), name))
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

/// A complete report definition. Immutable once shared.
#[derive(Debug, Clone)]
pub struct ReportDefinition {
    pub name: String,
    pub title: String,
    pub description: Option<String>,
    sections: BTreeMap<SectionType, SectionDefinition>,
}

impl ReportDefinition {
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            description: None,
            sections: BTreeMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set a section, replacing any previous section of the same type.
    pub fn with_section(mut self, section: SectionDefinition) -> Self {
        self.sections.insert(section.section_type, section);
        self
    }

    pub fn section(&self, section_type: SectionType) -> Option<&SectionDefinition> {
        self.sections.get(&section_type)
    }

    /// Declared sections in layout order.
    pub fn sections(&self) -> impl Iterator<Item = &SectionDefinition> {
        self.sections.values()
    }

    /// Every query the report executes, once each, in first-use order.
    pub fn queries(&self) -> Vec<Arc<dyn Query>> {
        let mut queries: Vec<Arc<dyn Query>> = Vec::new();

        for query in self
            .sections()
            .flat_map(|s| s.components())
            .flat_map(|c| c.queries())
        {
            if !queries.iter().any(|q| same_name(q.name(), query.name())) {
                queries.push(query);
            }
        }

        queries
    }

    /// A filter carrying the declared parameter defaults of every query.
    pub fn default_filter(&self) -> ReportFilter {
        let mut filter = ReportFilter::new();

        for query in self.queries() {
            for parameter in query.parameters() {
                if let Some(value) = &parameter.default_value {
                    filter.set_query_parameter(query.name(), &parameter.name, value.clone());
                }
            }
        }

        filter
    }
}
