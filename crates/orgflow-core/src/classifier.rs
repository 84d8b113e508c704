//! Deploy result classification.
//!
//! Pure mapping from (stdout text, exit code) to a tagged outcome. The checks
//! run in a fixed order: JSON decode, conflict tag, success, component
//! failures, process-failure fallback.

use std::collections::BTreeMap;

use crate::diagnostics::extract_failure_records;
use crate::domain::diagnostic::FailureRecord;
use crate::domain::response::{
    ComponentFailure, ConflictPayload, DeployResponse, FileResult, SOURCE_CONFLICT_TAG,
};

/// Classified outcome of one deploy invocation. Exactly one tag holds for
/// any input.
#[derive(Debug, Clone, PartialEq)]
pub enum DeployOutcome {
    /// Deploy reported `Succeeded` with `success == true`.
    Success(DeployResponse),

    /// Remote source conflicts; carries the CLI's message verbatim.
    SourceConflict(String),

    /// Per-component compile/validation failures keyed by full name.
    ComponentFailures(BTreeMap<String, FailureRecord>),

    /// Exit without a classifiable failure payload.
    ProcessFailure(i32),

    /// Stdout was not decodable JSON.
    ParseFailure,
}

impl DeployOutcome {
    /// Short label used in logs and reports.
    pub fn label(&self) -> &'static str {
        match self {
            DeployOutcome::Success(_) => "success",
            DeployOutcome::SourceConflict(_) => "source_conflict",
            DeployOutcome::ComponentFailures(_) => "component_failures",
            DeployOutcome::ProcessFailure(_) => "process_failure",
            DeployOutcome::ParseFailure => "parse_failure",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DeployOutcome::Success(_))
    }
}

/// Classify one deploy invocation's stdout and exit code.
///
/// The conflict check always precedes the success check: a conflict payload
/// must never be misread as a failed-deploy payload. Non-JSON output from a
/// `--json` invocation is a parse failure regardless of exit code.
pub fn classify(stdout_text: &str, exit_code: i32) -> DeployOutcome {
    let value: serde_json::Value = match serde_json::from_str(stdout_text) {
        Ok(value) => value,
        Err(_) => return DeployOutcome::ParseFailure,
    };

    if let Ok(conflict) = serde_json::from_value::<ConflictPayload>(value.clone()) {
        if conflict.name == SOURCE_CONFLICT_TAG {
            return DeployOutcome::SourceConflict(conflict.message);
        }
    }

    let response: DeployResponse = match serde_json::from_value(value) {
        Ok(response) => response,
        Err(_) => return DeployOutcome::ParseFailure,
    };

    let is_success = response
        .result
        .as_ref()
        .is_some_and(|result| result.status == "Succeeded" && result.success);
    if is_success {
        return DeployOutcome::Success(response);
    }

    let empty_failures: &[ComponentFailure] = &[];
    let empty_files: &[FileResult] = &[];
    let (component_failures, files) = match response.result.as_ref() {
        Some(result) => (
            result
                .details
                .as_ref()
                .map_or(empty_failures, |details| details.component_failures.as_slice()),
            result.files.as_slice(),
        ),
        None => (empty_failures, empty_files),
    };

    let records = extract_failure_records(component_failures, files);
    if !records.is_empty() {
        return DeployOutcome::ComponentFailures(records);
    }

    DeployOutcome::ProcessFailure(exit_code)
}
