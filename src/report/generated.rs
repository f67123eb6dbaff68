use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{ReportDefinition, ReportSection, SectionType};
use crate::filter::ReportFilter;

/// A fully generated report. Each section slot is empty when the definition
/// declares no components for it.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    #[serde(skip)]
    pub definition: Arc<ReportDefinition>,
    pub name: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub filter: ReportFilter,
    pub generated_at: DateTime<Utc>,
    pub page_header: Option<ReportSection>,
    pub report_header: Option<ReportSection>,
    pub body: Option<ReportSection>,
    pub report_footer: Option<ReportSection>,
    pub page_footer: Option<ReportSection>,
}

impl Report {
    pub(crate) fn new(definition: Arc<ReportDefinition>, filter: ReportFilter) -> Self {
        Self {
            name: definition.name.clone(),
            title: definition.title.clone(),
            description: definition.description.clone(),
            definition,
            filter,
            generated_at: Utc::now(),
            page_header: None,
            report_header: None,
            body: None,
            report_footer: None,
            page_footer: None,
        }
    }

    fn slot_mut(&mut self, section_type: SectionType) -> &mut Option<ReportSection> {
        match section_type {
            SectionType::PageHeader => &mut self.page_header,
            SectionType::ReportHeader => &mut self.report_header,
            SectionType::ReportBody => &mut self.body,
            SectionType::ReportFooter => &mut self.report_footer,
            SectionType::PageFooter => &mut self.page_footer,
        }
    }

    /// Place a section in the slot matching its type.
    pub(crate) fn with_section(mut self, section: ReportSection) -> Self {
        let section_type = section.section_type;
        *self.slot_mut(section_type) = Some(section);
        self
    }

    pub fn section(&self, section_type: SectionType) -> Option<&ReportSection> {
        match section_type {
            SectionType::PageHeader => self.page_header.as_ref(),
            SectionType::ReportHeader => self.report_header.as_ref(),
            SectionType::ReportBody => self.body.as_ref(),
            SectionType::ReportFooter => self.report_footer.as_ref(),
            SectionType::PageFooter => self.page_footer.as_ref(),
        }
    }

    /// Generated sections in layout order.
    pub fn sections(&self) -> impl Iterator<Item = &ReportSection> {
        SectionType::ALL.into_iter().filter_map(|t| self.section(t))
    }
}
