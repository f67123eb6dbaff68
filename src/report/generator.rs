//! Report and section orchestration.
//!
//! ```text
//! generate(definition, filter)
//!     │
//!     ├── section PageHeader ──┐
//!     ├── section ReportHeader │   join_all
//!     ├── section ReportBody ──┼──────────────► compile errors or build Report
//!     ├── section ReportFooter │
//!     └── section PageFooter ──┘
//!              │
//!              └── component 1..N (join_all, one generator each)
//! ```
//!
//! No task cancels a sibling. Every task is awaited, and every failure ends
//! up as a named entry in the error map.

use std::any::Any;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use futures::FutureExt;
use tracing::Instrument;

use super::{
    Report, ReportDefinition, ReportGenerationResult, ReportSection, ReportSectionGenerationResult,
    SectionType,
};
use crate::components::{Component, ComponentDefinition, GeneratorRegistry};
use crate::config::GenerationSettings;
use crate::error::{GenerationError, GenerationResult};
use crate::filter::ReportFilter;

/// Generates reports from definitions.
#[derive(Debug, Clone)]
pub struct ReportGenerator {
    registry: Arc<GeneratorRegistry>,
    settings: GenerationSettings,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator {
    /// A generator using the built-in component generators.
    pub fn new() -> Self {
        Self::with_registry(Arc::new(GeneratorRegistry::with_defaults()))
    }

    pub fn with_registry(registry: Arc<GeneratorRegistry>) -> Self {
        Self {
            registry,
            settings: GenerationSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn registry(&self) -> &GeneratorRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    // =========================================================================
    // Report level
    // =========================================================================

    /// Generate every section concurrently.
    ///
    /// When `filter` is `None` the definition's default filter is used.
    pub async fn generate(
        &self,
        definition: Arc<ReportDefinition>,
        filter: Option<ReportFilter>,
    ) -> ReportGenerationResult {
        let started = Instant::now();
        let filter = filter.unwrap_or_else(|| definition.default_filter());
        let span = tracing::info_span!("report", report = %definition.name);

        async {
            tracing::debug!("generating report");

            let tasks = SectionType::ALL
                .into_iter()
                .map(|section_type| self.generate_section(&definition, section_type, &filter));
            let results: Vec<_> = join_all(tasks).await.into_iter().flatten().collect();

            let errors = compile_errors(&results);
            let elapsed_ms = started.elapsed().as_millis() as u64;

            if !errors.is_empty() {
                tracing::warn!(elapsed_ms, errors = errors.len(), "report generation failed");
                return ReportGenerationResult::failed(elapsed_ms, errors);
            }

            let report = results
                .into_iter()
                .filter_map(|result| result.into_payload())
                .fold(Report::new(definition.clone(), filter.clone()), Report::with_section);

            tracing::info!(elapsed_ms, "report generated");
            ReportGenerationResult::succeeded(elapsed_ms, report)
        }
        .instrument(span)
        .await
    }

    /// Run [`generate`](Self::generate) to completion on a tokio runtime.
    ///
    /// Outside a runtime one is started for the call. From inside a
    /// current-thread runtime the result is a failure keyed `runtime`.
    pub fn generate_blocking(
        &self,
        definition: Arc<ReportDefinition>,
        filter: Option<ReportFilter>,
    ) -> ReportGenerationResult {
        crate::runtime::block_on(self.generate(definition, filter)).unwrap_or_else(|e| {
            tracing::error!(error = %e, "blocking report generation failed");
            let errors = BTreeMap::from([("runtime".to_string(), e.to_string())]);
            ReportGenerationResult::failed(0, errors)
        })
    }

    // =========================================================================
    // Section level
    // =========================================================================

    /// Generate the components of one section concurrently.
    ///
    /// Returns `None` when the section is absent or declares no components.
    pub async fn generate_section(
        &self,
        definition: &ReportDefinition,
        section_type: SectionType,
        filter: &ReportFilter,
    ) -> Option<ReportSectionGenerationResult> {
        let section = definition.section(section_type).filter(|s| !s.is_empty())?;
        let started = Instant::now();
        let span = tracing::info_span!("section", report = %definition.name, section = %section_type);

        let result = async {
            tracing::debug!(components = section.components().len(), "generating section");

            let tasks = section
                .components()
                .iter()
                .map(|component| self.generate_component(component, section_type, filter));
            let results = join_all(tasks).await;

            let mut components = Vec::with_capacity(results.len());
            let mut errors = BTreeMap::new();

            for (component, result) in section.components().iter().zip(results) {
                match result {
                    Ok(generated) => components.push(generated),
                    Err(e) => {
                        errors.insert(component.name().to_string(), e.to_string());
                    }
                }
            }

            let elapsed_ms = started.elapsed().as_millis() as u64;

            if !errors.is_empty() {
                tracing::warn!(elapsed_ms, errors = errors.len(), "section generation failed");
                return ReportSectionGenerationResult::failed(elapsed_ms, errors);
            }

            tracing::info!(elapsed_ms, "section generated");
            ReportSectionGenerationResult::succeeded(
                elapsed_ms,
                ReportSection {
                    title: section.title.clone(),
                    description: section.description.clone(),
                    section_type,
                    components,
                },
            )
        }
        .instrument(span)
        .await;

        Some(result)
    }

    // =========================================================================
    // Component level
    // =========================================================================

    async fn generate_component(
        &self,
        definition: &ComponentDefinition,
        section_type: SectionType,
        filter: &ReportFilter,
    ) -> GenerationResult<Component> {
        let started = Instant::now();
        let span = tracing::info_span!(
            "component",
            component = %definition.name(),
            kind = %definition.kind()
        );

        async {
            let generator = self.registry.resolve(definition.kind())?;
            let task = generator.generate(definition, section_type, filter);

            let result = if self.settings.catch_panics {
                AssertUnwindSafe(task)
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|payload| Err(GenerationError::Panicked(panic_message(payload))))
            } else {
                task.await
            };

            let elapsed_ms = started.elapsed().as_millis() as u64;
            match &result {
                Ok(_) if self.is_slow(elapsed_ms) => tracing::warn!(
                    elapsed_ms,
                    threshold_ms = self.settings.slow_component_ms,
                    "slow component"
                ),
                Ok(_) => tracing::debug!(elapsed_ms, "component generated"),
                Err(e) => tracing::warn!(elapsed_ms, error = %e, "component generation failed"),
            }

            result.map(|c| c.with_default_no_data_message(self.settings.default_no_data_message.as_deref()))
        }
        .instrument(span)
        .await
    }

    fn is_slow(&self, elapsed_ms: u64) -> bool {
        self.settings.slow_component_ms > 0 && elapsed_ms >= self.settings.slow_component_ms
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Merge the error maps of failed sections in layout order.
///
/// A name already recorded by an earlier section keeps its first message.
fn compile_errors(results: &[ReportSectionGenerationResult]) -> BTreeMap<String, String> {
    let mut errors = BTreeMap::new();

    for result in results.iter().filter(|r| !r.success()) {
        for (name, message) in result.error_messages() {
            match errors.entry(name.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(message.clone());
                }
                Entry::Occupied(_) => {
                    tracing::warn!(component = %name, "error name already recorded by an earlier section");
                }
            }
        }
    }

    errors
}
