//! Per-invocation deploy context and terminal report.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classifier::DeployOutcome;
use crate::progress::ProgressHandle;

/// Which deploy operation shape is running.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeployVariant {
    SingleFile,
    ChangedSet,
    SelectedSet,
}

impl DeployVariant {
    /// Snake-case label used in logs and reports.
    pub fn label(&self) -> &'static str {
        match self {
            DeployVariant::SingleFile => "single_file",
            DeployVariant::ChangedSet => "changed_set",
            DeployVariant::SelectedSet => "selected_set",
        }
    }

    /// Progress title shown while the operation runs.
    pub fn title(&self) -> &'static str {
        match self {
            DeployVariant::SingleFile => "Deploying file",
            DeployVariant::ChangedSet => "Deploying changed set",
            DeployVariant::SelectedSet => "Deploying selection",
        }
    }
}

/// What a deploy operation targets.
#[derive(Debug, Clone, PartialEq)]
pub enum DeploySubject {
    /// One source file.
    File(PathBuf),

    /// Files resolved from an external selection list.
    Files(Vec<PathBuf>),

    /// The working tree's change set; no explicit subject.
    None,
}

/// Stage of a deploy chain.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Manifest,
    Deploy,
}

impl StageKind {
    pub fn label(&self) -> &'static str {
        match self {
            StageKind::Manifest => "manifest",
            StageKind::Deploy => "deploy",
        }
    }
}

/// Context owned by exactly one deploy invocation.
///
/// Created after the preconditions pass and discarded when the operation's
/// chain completes; never shared across deployments.
pub struct DeployContext {
    pub run_id: Uuid,
    pub variant: DeployVariant,
    pub subject: DeploySubject,
    pub started_at: DateTime<Utc>,
    pub progress: ProgressHandle,
}

impl DeployContext {
    pub fn new(variant: DeployVariant, subject: DeploySubject, progress: ProgressHandle) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            variant,
            subject,
            started_at: Utc::now(),
            progress,
        }
    }

    /// Milliseconds elapsed since the context was created.
    pub fn elapsed_ms(&self) -> u64 {
        (Utc::now() - self.started_at).num_milliseconds().max(0) as u64
    }
}

/// Terminal summary of one deploy operation.
#[derive(Debug)]
pub struct DeployReport {
    pub run_id: Uuid,
    pub variant: DeployVariant,
    pub outcome: DeployOutcome,

    /// Stage that produced a failing outcome, when one did.
    pub failed_stage: Option<StageKind>,

    /// Number of diagnostics published to the store.
    pub diagnostics_published: usize,

    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
}
