//! Row and cell actions.

use serde::{Deserialize, Serialize};

use crate::data::{BindingResult, BindingSource, DataBinding};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    #[default]
    Navigate,
    Download,
    Script,
}

/// An action declared on a component, resolved once per row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDefinition {
    #[serde(default)]
    pub action_type: ActionType,
    /// Where the action points; usually a template such as `/orders/{Id}`.
    pub destination: DataBinding,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
}

impl ActionDefinition {
    pub fn navigate(destination: DataBinding) -> Self {
        Self {
            action_type: ActionType::Navigate,
            destination,
            tooltip: None,
        }
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    pub fn resolve<S: BindingSource + ?Sized>(&self, row: &S) -> BindingResult<ReportAction> {
        let destination = self.destination.resolve(row)?;

        Ok(ReportAction {
            action_type: self.action_type,
            destination: destination.to_string(),
            tooltip: self.tooltip.clone(),
        })
    }
}

/// A resolved action attached to a generated row, cell or item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportAction {
    pub action_type: ActionType,
    pub destination: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
}
