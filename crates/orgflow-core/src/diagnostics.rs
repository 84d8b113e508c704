//! Failure-record extraction and the diagnostics store.
//!
//! Normalizes the deploy response's component- and file-level failure
//! entries into [`FailureRecord`]s, projects them onto editor diagnostics,
//! and holds the last deploy's diagnostics keyed by file name.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::diagnostic::{DiagnosticRecord, FailureRecord};
use crate::domain::response::{ComponentFailure, FileResult};

/// Merge component-level and file-level failure sub-records into
/// [`FailureRecord`]s keyed by component full name.
///
/// Field precedence is keep-biased: the first populated value for a field
/// wins, and later entries sharing the key never overwrite it. Component
/// entries contribute name/line/column/type; file entries with a non-empty
/// error string contribute path/message.
pub fn extract_failure_records(
    component_failures: &[ComponentFailure],
    files: &[FileResult],
) -> BTreeMap<String, FailureRecord> {
    let mut records: BTreeMap<String, FailureRecord> = BTreeMap::new();

    for failure in component_failures {
        let incoming = FailureRecord {
            file_name: failure.file_name.clone(),
            line: failure.line_number,
            column: failure.column_number,
            error_type: failure.problem_type.clone(),
            component_type: failure.component_type.clone(),
            ..FailureRecord::new(&failure.full_name)
        };
        upsert(&mut records, incoming);
    }

    for file in files {
        let message = match file.error.as_deref() {
            Some(error) if !error.is_empty() => error.to_string(),
            _ => continue,
        };
        let incoming = FailureRecord {
            file_path: file.file_path.clone(),
            message: Some(message),
            ..FailureRecord::new(&file.full_name)
        };
        upsert(&mut records, incoming);
    }

    records
}

fn upsert(records: &mut BTreeMap<String, FailureRecord>, incoming: FailureRecord) {
    match records.get_mut(&incoming.full_name) {
        Some(existing) => existing.merge_keep_bias(incoming),
        None => {
            records.insert(incoming.full_name.clone(), incoming);
        }
    }
}

/// Project failure records onto editor diagnostics keyed by file name.
///
/// Only `"Error"`-typed records become diagnostics; a record of any other
/// type is skipped individually and projection continues with the rest.
pub fn to_diagnostics(
    records: &BTreeMap<String, FailureRecord>,
) -> BTreeMap<String, DiagnosticRecord> {
    let mut diagnostics = BTreeMap::new();
    for record in records.values() {
        if let Some(diagnostic) = DiagnosticRecord::from_failure(record) {
            diagnostics.insert(diagnostic.file_name.clone(), diagnostic);
        }
    }
    diagnostics
}

/// In-process store of the last deploy's diagnostics, keyed by file name.
///
/// Contents persist across operations until [`DiagnosticsStore::clear`] runs
/// at the start of the next accepted deploy. Internally synchronized so the
/// orchestrator can be shared behind `Arc`; all mutation happens from
/// classification paths.
#[derive(Debug, Default)]
pub struct DiagnosticsStore {
    records: Mutex<BTreeMap<String, DiagnosticRecord>>,
}

impl DiagnosticsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove all stored diagnostics. Idempotent.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Replace the store contents.
    pub fn replace(&self, diagnostics: BTreeMap<String, DiagnosticRecord>) {
        *self.lock() = diagnostics;
    }

    /// Diagnostic for one file name, if any.
    pub fn get(&self, file_name: &str) -> Option<DiagnosticRecord> {
        self.lock().get(file_name).cloned()
    }

    /// Snapshot of all stored diagnostics.
    pub fn snapshot(&self) -> BTreeMap<String, DiagnosticRecord> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, DiagnosticRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
