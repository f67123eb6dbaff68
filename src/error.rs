//! Errors raised while generating a component.
//!
//! Every failure inside a component generation task ends up as a
//! [`GenerationError`]. The section orchestrator turns it into a named entry
//! of the section's error map; it never escapes to sibling tasks.

use thiserror::Error;

use crate::components::{ComponentKind, DefinitionError};
use crate::data::{BindingError, QueryError, StructureError};

/// Result type for component generation.
pub type GenerationResult<T> = Result<T, GenerationError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    /// The definition handed to a generator is of another kind.
    #[error("invalid definition type: expected a {expected} definition, found a {found} definition")]
    InvalidDefinitionType {
        expected: ComponentKind,
        found: ComponentKind,
    },

    /// No generator is registered for the component kind.
    #[error("no generator is registered for component kind '{0}'")]
    UnregisteredKind(ComponentKind),

    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    Structure(#[from] StructureError),

    #[error(transparent)]
    Binding(#[from] BindingError),

    #[error(transparent)]
    Query(#[from] QueryError),

    /// The query ran but reported failure.
    #[error("query '{query}' reported failure: {message}")]
    QueryFailed { query: String, message: String },

    /// The generator panicked.
    #[error("generation panicked: {0}")]
    Panicked(String),
}

impl GenerationError {
    pub fn invalid_definition(expected: ComponentKind, found: ComponentKind) -> Self {
        Self::InvalidDefinitionType { expected, found }
    }

    /// Structural and definition errors are never worth retrying.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::InvalidDefinitionType { .. } | Self::Definition(_) | Self::Structure(_)
        )
    }
}
