//! Outcomes of report and section generation.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{Report, ReportSection};

static NO_ERRORS: BTreeMap<String, String> = BTreeMap::new();

/// Execution time plus either a payload or the named errors that prevented it.
///
/// The error map is never empty: a run either succeeds with a payload or
/// fails with at least one error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationOutcome<T> {
    pub execution_time_ms: u64,
    #[serde(flatten)]
    outcome: Outcome<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
enum Outcome<T> {
    Payload(T),
    Errors(BTreeMap<String, String>),
}

pub type ReportGenerationResult = GenerationOutcome<Report>;
pub type ReportSectionGenerationResult = GenerationOutcome<ReportSection>;

impl<T> GenerationOutcome<T> {
    pub fn succeeded(execution_time_ms: u64, payload: T) -> Self {
        Self {
            execution_time_ms,
            outcome: Outcome::Payload(payload),
        }
    }

    /// `errors` must not be empty.
    pub(crate) fn failed(execution_time_ms: u64, errors: BTreeMap<String, String>) -> Self {
        debug_assert!(!errors.is_empty());
        Self {
            execution_time_ms,
            outcome: Outcome::Errors(errors),
        }
    }

    /// Success iff there are no errors.
    pub fn success(&self) -> bool {
        matches!(self.outcome, Outcome::Payload(_))
    }

    pub fn payload(&self) -> Option<&T> {
        match &self.outcome {
            Outcome::Payload(payload) => Some(payload),
            Outcome::Errors(_) => None,
        }
    }

    pub fn into_payload(self) -> Option<T> {
        match self.outcome {
            Outcome::Payload(payload) => Some(payload),
            Outcome::Errors(_) => None,
        }
    }

    /// Error messages keyed by failing component name; empty on success.
    pub fn error_messages(&self) -> &BTreeMap<String, String> {
        match &self.outcome {
            Outcome::Payload(_) => &NO_ERRORS,
            Outcome::Errors(errors) => errors,
        }
    }

    pub fn into_result(self) -> Result<T, BTreeMap<String, String>> {
        match self.outcome {
            Outcome::Payload(payload) => Ok(payload),
            Outcome::Errors(errors) => Err(errors),
        }
    }
}
