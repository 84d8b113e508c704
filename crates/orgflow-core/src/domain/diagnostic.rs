//! File-scoped failure and diagnostic records.

use serde::{Deserialize, Serialize};

/// Severity attached to a notification or diagnostic.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// End-column sentinel meaning "render to end of line".
///
/// The deploy CLI never reports an end column.
pub const END_COLUMN_SENTINEL: u32 = 255;

/// Problem type string the deploy CLI uses for compile errors.
pub const ERROR_PROBLEM_TYPE: &str = "Error";

/// A per-component failure assembled from the deploy response.
///
/// One record merges the component-level sub-record (name, line, column,
/// problem/component type) with the file-level sub-record (path, message)
/// sharing the same full name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct FailureRecord {
    /// Component full name; the merge key.
    pub full_name: String,

    /// Short file name (e.g. `Acct.cls`).
    pub file_name: Option<String>,

    /// Project-relative file path.
    pub file_path: Option<String>,

    /// 1-based error line.
    pub line: Option<u32>,

    /// 1-based error column.
    pub column: Option<u32>,

    /// Problem type reported by the CLI ("Error", "Warning", ...).
    pub error_type: Option<String>,

    /// Component type (e.g. `ApexClass`).
    pub component_type: Option<String>,

    /// File-level error message.
    pub message: Option<String>,
}

impl FailureRecord {
    /// Empty record for `full_name`.
    pub fn new(full_name: &str) -> Self {
        Self {
            full_name: full_name.to_string(),
            ..Self::default()
        }
    }

    /// Keep-bias merge: a field that is already populated is never
    /// overwritten by a later merge.
    pub fn merge_keep_bias(&mut self, incoming: FailureRecord) {
        if self.file_name.is_none() {
            self.file_name = incoming.file_name;
        }
        if self.file_path.is_none() {
            self.file_path = incoming.file_path;
        }
        if self.line.is_none() {
            self.line = incoming.line;
        }
        if self.column.is_none() {
            self.column = incoming.column;
        }
        if self.error_type.is_none() {
            self.error_type = incoming.error_type;
        }
        if self.component_type.is_none() {
            self.component_type = incoming.component_type;
        }
        if self.message.is_none() {
            self.message = incoming.message;
        }
    }

    /// Whether this record represents a compile error (vs. warning/info).
    pub fn is_error(&self) -> bool {
        self.error_type.as_deref() == Some(ERROR_PROBLEM_TYPE)
    }

    /// File name an editor can attach this record to: the short file name
    /// when present, otherwise the final component of the file path.
    pub fn owning_file_name(&self) -> Option<String> {
        if let Some(name) = self.file_name.as_deref() {
            if !name.is_empty() {
                return Some(name.to_string());
            }
        }
        self.file_path.as_deref().and_then(|path| {
            std::path::Path::new(path)
                .file_name()
                .and_then(|name| name.to_str())
                .map(str::to_string)
        })
    }
}

/// An editor-facing diagnostic derived from a [`FailureRecord`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosticRecord {
    pub severity: Severity,

    pub message: String,

    /// 0-based line.
    pub line: u32,

    /// 0-based column.
    pub column: u32,

    /// Always [`END_COLUMN_SENTINEL`].
    pub end_column: u32,

    /// Owning file name; the diagnostics sink matches this against open
    /// editor buffers.
    pub file_name: String,
}

impl DiagnosticRecord {
    /// Derive a diagnostic from a failure record.
    ///
    /// Returns `None` for records that are not `"Error"`-typed and for
    /// records with no usable file name. Missing line/column default to the
    /// first line/column.
    pub fn from_failure(record: &FailureRecord) -> Option<Self> {
        if !record.is_error() {
            return None;
        }
        let file_name = record.owning_file_name()?;
        Some(Self {
            severity: Severity::Error,
            message: record
                .message
                .clone()
                .unwrap_or_else(|| format!("{} failed to deploy", record.full_name)),
            line: record.line.unwrap_or(1).saturating_sub(1),
            column: record.column.unwrap_or(1).saturating_sub(1),
            end_column: END_COLUMN_SENTINEL,
            file_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_record(full_name: &str) -> FailureRecord {
        FailureRecord {
            error_type: Some("Error".to_string()),
            file_name: Some(format!("{full_name}.cls")),
            ..FailureRecord::new(full_name)
        }
    }

    #[test]
    fn test_merge_keeps_populated_fields() {
        let mut record = FailureRecord {
            line: Some(5),
            error_type: Some("Error".to_string()),
            ..FailureRecord::new("Foo")
        };
        record.merge_keep_bias(FailureRecord {
            line: Some(99),
            message: Some("bad thing".to_string()),
            ..FailureRecord::new("Foo")
        });

        assert_eq!(record.line, Some(5), "populated field must not change");
        assert_eq!(record.message.as_deref(), Some("bad thing"));
    }

    #[test]
    fn test_merge_fills_empty_fields() {
        let mut record = FailureRecord::new("Foo");
        record.merge_keep_bias(FailureRecord {
            file_path: Some("classes/Foo.cls".to_string()),
            column: Some(3),
            ..FailureRecord::new("Foo")
        });

        assert_eq!(record.file_path.as_deref(), Some("classes/Foo.cls"));
        assert_eq!(record.column, Some(3));
    }

    #[test]
    fn test_is_error_matches_exact_problem_type() {
        assert!(error_record("Foo").is_error());

        let warning = FailureRecord {
            error_type: Some("Warning".to_string()),
            ..FailureRecord::new("Foo")
        };
        assert!(!warning.is_error());
        assert!(!FailureRecord::new("Foo").is_error());
    }

    #[test]
    fn test_owning_file_name_prefers_short_name() {
        let record = FailureRecord {
            file_name: Some("Foo.cls".to_string()),
            file_path: Some("classes/Other.cls".to_string()),
            ..FailureRecord::new("Foo")
        };
        assert_eq!(record.owning_file_name().as_deref(), Some("Foo.cls"));
    }

    #[test]
    fn test_owning_file_name_falls_back_to_path_component() {
        let record = FailureRecord {
            file_path: Some("classes/Foo.cls".to_string()),
            ..FailureRecord::new("Foo")
        };
        assert_eq!(record.owning_file_name().as_deref(), Some("Foo.cls"));
        assert_eq!(FailureRecord::new("Foo").owning_file_name(), None);
    }

    #[test]
    fn test_diagnostic_defaults_to_first_line_and_column() {
        let diagnostic = DiagnosticRecord::from_failure(&error_record("Foo")).expect("diagnostic");
        assert_eq!(diagnostic.line, 0);
        assert_eq!(diagnostic.column, 0);
        assert_eq!(diagnostic.end_column, END_COLUMN_SENTINEL);
        assert_eq!(diagnostic.severity, Severity::Error);
    }

    #[test]
    fn test_diagnostic_converts_to_zero_based() {
        let record = FailureRecord {
            line: Some(10),
            column: Some(3),
            message: Some("Missing semicolon".to_string()),
            ..error_record("Acct")
        };
        let diagnostic = DiagnosticRecord::from_failure(&record).expect("diagnostic");
        assert_eq!(diagnostic.line, 9);
        assert_eq!(diagnostic.column, 2);
        assert_eq!(diagnostic.message, "Missing semicolon");
        assert_eq!(diagnostic.file_name, "Acct.cls");
    }

    #[test]
    fn test_non_error_record_yields_no_diagnostic() {
        let record = FailureRecord {
            error_type: Some("Warning".to_string()),
            file_name: Some("Foo.cls".to_string()),
            ..FailureRecord::new("Foo")
        };
        assert!(DiagnosticRecord::from_failure(&record).is_none());
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn test_failure_record_serde_roundtrip() {
        let record = FailureRecord {
            line: Some(10),
            column: Some(3),
            message: Some("Missing semicolon".to_string()),
            component_type: Some("ApexClass".to_string()),
            ..error_record("Acct")
        };
        let json = serde_json::to_string(&record).expect("serialize");
        let deserialized: FailureRecord = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(record, deserialized);
    }
}
