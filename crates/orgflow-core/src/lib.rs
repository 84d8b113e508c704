//! Orgflow Core Library
//!
//! Deploy orchestration for metadata-driven org platforms: drives an
//! external deploy CLI and change-detection tool, classifies their JSON
//! results, and publishes editor-facing diagnostics.

pub mod cache;
pub mod classifier;
pub mod config;
pub mod diagnostics;
pub mod domain;
pub mod guard;
pub mod job;
pub mod manifest;
pub mod notify;
pub mod obs;
pub mod orchestrator;
pub mod progress;
pub mod selection;
pub mod telemetry;

pub use cache::persist_raw_response;
pub use classifier::{classify, DeployOutcome};
pub use config::DeployConfig;
pub use diagnostics::{extract_failure_records, to_diagnostics, DiagnosticsStore};
pub use domain::{
    ComponentFailure, DeployContext, DeployReport, DeployResponse, DeploySubject, DeployVariant,
    DiagnosticRecord, FailureRecord, FileResult, OrgflowError, Result, Severity, StageKind,
    ValidationError, END_COLUMN_SENTINEL,
};
pub use guard::DeployGuard;
pub use job::{Job, JobExecutor, JobState, ProcessExecutor};
pub use manifest::{force_dirty, manifest_job};
pub use notify::{Notifier, NullNotifier, TracingNotifier};
pub use obs::{
    emit_deploy_finished, emit_deploy_rejected, emit_deploy_started, emit_stage_finished, RunSpan,
};
pub use orchestrator::DeployOrchestrator;
pub use progress::{NullProgress, ProgressBackend, ProgressHandle};
pub use selection::{resolve_selection, FileIndex};
pub use telemetry::init_tracing;

/// Orgflow version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
