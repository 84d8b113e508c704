//! Wire types matching the deploy CLI's `--json` output schema.
//!
//! The CLI is tolerant about field presence and occasionally emits line and
//! column numbers as JSON strings, so the structs here default every optional
//! field and accept both numeric forms.

use serde::{Deserialize, Deserializer, Serialize};

/// Top-level JSON payload from a deploy invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeployResponse {
    /// CLI-level status code.
    #[serde(default)]
    pub status: i64,

    /// Deploy result body; absent on some truncated replies.
    #[serde(default)]
    pub result: Option<DeployResultBody>,
}

/// The `result` object of a deploy response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DeployResultBody {
    /// Deploy status string ("Succeeded", "Failed", ...).
    #[serde(default)]
    pub status: String,

    /// Whether the deploy succeeded.
    #[serde(default)]
    pub success: bool,

    /// Per-component failure details.
    #[serde(default)]
    pub details: Option<DeployDetails>,

    /// Per-file results; `error` is empty for files that deployed cleanly.
    #[serde(default)]
    pub files: Vec<FileResult>,
}

/// The `result.details` object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DeployDetails {
    #[serde(default, rename = "componentFailures")]
    pub component_failures: Vec<ComponentFailure>,
}

/// One entry of `result.details.componentFailures`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ComponentFailure {
    #[serde(default)]
    pub full_name: String,

    #[serde(default)]
    pub file_name: Option<String>,

    /// 1-based; arrives as a JSON number or a string.
    #[serde(default, deserialize_with = "number_or_string")]
    pub line_number: Option<u32>,

    /// 1-based; arrives as a JSON number or a string.
    #[serde(default, deserialize_with = "number_or_string")]
    pub column_number: Option<u32>,

    /// Problem type string ("Error", "Warning", ...).
    #[serde(default)]
    pub problem_type: Option<String>,

    #[serde(default)]
    pub component_type: Option<String>,
}

/// One entry of `result.files`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FileResult {
    #[serde(default)]
    pub full_name: String,

    #[serde(default)]
    pub file_path: Option<String>,

    #[serde(default)]
    pub error: Option<String>,
}

/// The alternate top-level payload the CLI emits on a source conflict.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConflictPayload {
    /// Error type tag; `"SourceConflictError"` for conflicts.
    pub name: String,

    #[serde(default)]
    pub message: String,
}

/// Type tag the CLI uses for source-conflict payloads.
pub const SOURCE_CONFLICT_TAG: &str = "SourceConflictError";

fn number_or_string<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u32),
        String(String),
    }

    Ok(match Option::<NumberOrString>::deserialize(deserializer)? {
        None => None,
        Some(NumberOrString::Number(n)) => Some(n),
        Some(NumberOrString::String(s)) => s.trim().parse::<u32>().ok(),
    })
}
