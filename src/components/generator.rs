//! Generator strategies and their registry.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use super::chart::ChartGenerator;
use super::definition::{ComponentDefinition, ComponentKind};
use super::repeater::RepeaterGenerator;
use super::separator::SeparatorGenerator;
use super::table::TableGenerator;
use super::Component;
use crate::data::{ParameterValue, Query, QueryResults};
use crate::error::{GenerationError, GenerationResult};
use crate::filter::ReportFilter;
use crate::report::SectionType;

/// Turns one kind of component definition into a generated component.
///
/// Generators never mutate the definition or the filter they are given.
#[async_trait]
pub trait ComponentGenerator: Send + Sync {
    /// The component kind this generator handles.
    fn kind(&self) -> ComponentKind;

    async fn generate(
        &self,
        definition: &ComponentDefinition,
        section: SectionType,
        filter: &ReportFilter,
    ) -> GenerationResult<Component>;
}

/// Maps component kinds to generators. Read-only once built; share it behind `Arc`.
#[derive(Clone)]
pub struct GeneratorRegistry {
    generators: HashMap<ComponentKind, Arc<dyn ComponentGenerator>>,
}

impl GeneratorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            generators: HashMap::new(),
        }
    }

    /// A registry with the built-in generator for every component kind.
    pub fn with_defaults() -> Self {
        Self::new()
            .register(Arc::new(TableGenerator))
            .register(Arc::new(RepeaterGenerator))
            .register(Arc::new(ChartGenerator))
            .register(Arc::new(SeparatorGenerator))
    }

    /// Register a generator for its kind, replacing any previous one.
    pub fn register(mut self, generator: Arc<dyn ComponentGenerator>) -> Self {
        self.generators.insert(generator.kind(), generator);
        self
    }

    pub fn resolve(&self, kind: ComponentKind) -> GenerationResult<Arc<dyn ComponentGenerator>> {
        self.generators
            .get(&kind)
            .cloned()
            .ok_or(GenerationError::UnregisteredKind(kind))
    }

    pub fn kinds(&self) -> Vec<ComponentKind> {
        let mut kinds: Vec<_> = self.generators.keys().copied().collect();
        kinds.sort();
        kinds
    }
}

impl Default for GeneratorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for GeneratorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

/// Execute a query and treat a result flagged as failed as an error.
pub(crate) async fn execute_query(
    query: &dyn Query,
    parameters: &[ParameterValue],
) -> GenerationResult<QueryResults> {
    let results = query.execute(parameters).await?;

    if !results.success() {
        return Err(GenerationError::QueryFailed {
            query: query.name().to_string(),
            message: results.error_summary(),
        });
    }

    tracing::debug!(
        query = query.name(),
        rows = results.len(),
        execution_time_ms = results.execution_time_ms(),
        "query executed"
    );

    Ok(results)
}
