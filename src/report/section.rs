use serde::Serialize;

use super::SectionType;
use crate::components::{Component, ReportComponent};
use crate::data::same_name;

/// A generated section: its components in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSection {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub section_type: SectionType,
    pub components: Vec<Component>,
}

impl ReportSection {
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| same_name(c.name(), name))
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Component> {
        self.components.iter()
    }
}
