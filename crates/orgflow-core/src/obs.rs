//! Structured observability hooks for deploy lifecycle events.
//!
//! This module provides:
//! - Deploy-scoped tracing spans via the `RunSpan` RAII guard
//! - Emission functions for key lifecycle events: start, stage exit,
//!   terminal state, pre-spawn rejection
//!
//! Events are emitted at `info!` level; set `RUST_LOG` to filter.

use tracing::info;

/// RAII guard that enters a deploy-scoped tracing span.
pub struct RunSpan {
    _span: tracing::span::EnteredSpan,
}

impl RunSpan {
    /// Create and enter a span tagged with the deploy run id.
    pub fn enter(run_id: &str) -> Self {
        let span = tracing::info_span!("orgflow.deploy", run_id = %run_id);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: deploy operation accepted and started.
pub fn emit_deploy_started(run_id: &str, variant: &str) {
    info!(event = "deploy.started", run_id = %run_id, variant = %variant);
}

/// Emit event: one stage's job exited.
pub fn emit_stage_finished(run_id: &str, stage: &str, exit_code: i32) {
    info!(event = "deploy.stage_finished", run_id = %run_id, stage = %stage, exit_code = exit_code);
}

/// Emit event: deploy operation reached a terminal state.
pub fn emit_deploy_finished(run_id: &str, outcome: &str, diagnostics: usize, duration_ms: u64) {
    info!(
        event = "deploy.finished",
        run_id = %run_id,
        outcome = %outcome,
        diagnostics = diagnostics,
        duration_ms = duration_ms,
    );
}

/// Emit event: deploy rejected before any side effect (warning level).
pub fn emit_deploy_rejected(reason: &str) {
    tracing::warn!(event = "deploy.rejected", reason = %reason);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_span_create() {
        // Just ensure RunSpan::enter doesn't panic
        let _span = RunSpan::enter("test-run-id");
    }
}
