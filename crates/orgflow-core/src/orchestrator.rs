//! Deployment orchestrator.
//!
//! Owns the single-flight guard, builds one context per invocation, chains
//! the manifest stage into the deploy stage as a sequential pipeline, and
//! drives classification, diagnostics, response caching, and notification.
//!
//! Every accepted operation releases the guard and finishes its progress
//! handle exactly once, on every exit path. Precondition rejections happen
//! before any side effect: no diagnostics are cleared, no progress handle
//! exists, no process spawns.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cache::persist_raw_response;
use crate::classifier::{classify, DeployOutcome};
use crate::config::DeployConfig;
use crate::diagnostics::{to_diagnostics, DiagnosticsStore};
use crate::domain::context::{
    DeployContext, DeployReport, DeploySubject, DeployVariant, StageKind,
};
use crate::domain::diagnostic::Severity;
use crate::domain::error::{Result, ValidationError};
use crate::guard::DeployGuard;
use crate::job::{Job, JobExecutor, ProcessExecutor};
use crate::manifest::{force_dirty, manifest_job};
use crate::notify::{Notifier, NullNotifier};
use crate::obs::{
    emit_deploy_finished, emit_deploy_rejected, emit_deploy_started, emit_stage_finished, RunSpan,
};
use crate::progress::{NullProgress, ProgressBackend, ProgressHandle};
use crate::selection::{resolve_selection, FileIndex};

/// Drives deploy operations against the external CLIs.
pub struct DeployOrchestrator {
    config: DeployConfig,
    executor: Arc<dyn JobExecutor>,
    progress: Arc<dyn ProgressBackend>,
    notifier: Arc<dyn Notifier>,
    guard: DeployGuard,
    diagnostics: DiagnosticsStore,
}

impl DeployOrchestrator {
    /// Orchestrator with the default process executor and no-op UI backends.
    pub fn new(config: DeployConfig) -> Self {
        Self {
            config,
            executor: Arc::new(ProcessExecutor),
            progress: Arc::new(NullProgress),
            notifier: Arc::new(NullNotifier),
            guard: DeployGuard::new(),
            diagnostics: DiagnosticsStore::new(),
        }
    }

    /// Replace the progress backend.
    pub fn with_progress(mut self, progress: Arc<dyn ProgressBackend>) -> Self {
        self.progress = progress;
        self
    }

    /// Replace the notification sink.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Replace the job execution backend.
    pub fn with_executor(mut self, executor: Arc<dyn JobExecutor>) -> Self {
        self.executor = executor;
        self
    }

    /// Read access to the published diagnostics.
    pub fn diagnostics(&self) -> &DiagnosticsStore {
        &self.diagnostics
    }

    /// Whether a deploy currently holds the single-flight guard.
    pub fn is_deploying(&self) -> bool {
        self.guard.is_busy()
    }

    /// Deploy one source file.
    pub async fn deploy_file(&self, file: &Path) -> Result<DeployReport> {
        let cli = self.acquire()?;
        let context = self.begin(
            DeployVariant::SingleFile,
            DeploySubject::File(file.to_path_buf()),
        );
        let staged = self.run_deploy_stage(&cli, &context, file).await;
        self.finalize(context, staged)
    }

    /// Compute a change manifest against the reference revision, then deploy
    /// it. The deploy stage never starts when manifest preparation fails.
    pub async fn deploy_changed(&self) -> Result<DeployReport> {
        let cli = self.acquire()?;
        let context = self.begin(DeployVariant::ChangedSet, DeploySubject::None);
        let staged = self.run_manifest_then_deploy(&cli, &context).await;
        self.finalize(context, staged)
    }

    /// Deploy an explicit selection of files, resolved through `index` and
    /// forced through the manifest stage.
    pub async fn deploy_selected(
        &self,
        selection: &[String],
        index: &FileIndex,
    ) -> Result<DeployReport> {
        let cli = self.acquire()?;
        let resolved = match resolve_selection(selection, index) {
            Ok(resolved) => resolved,
            Err(err) => {
                self.guard.release();
                emit_deploy_rejected("selection resolved to zero files");
                return Err(err);
            }
        };
        let context = self.begin(
            DeployVariant::SelectedSet,
            DeploySubject::Files(resolved.clone()),
        );
        let staged = self.run_selected(&cli, &context, &resolved).await;
        self.finalize(context, staged)
    }

    /// Common preconditions: the single-flight guard, then CLI resolution.
    ///
    /// When resolution fails the token is released before any observable
    /// side effect, so a rejection leaves the orchestrator untouched.
    fn acquire(&self) -> Result<PathBuf> {
        if !self.guard.try_acquire() {
            emit_deploy_rejected("deploy already in progress");
            return Err(ValidationError::DeployInProgress.into());
        }
        match self.config.resolve_cli() {
            Ok(cli) => Ok(cli),
            Err(err) => {
                self.guard.release();
                emit_deploy_rejected("deploy CLI not found");
                Err(err.into())
            }
        }
    }

    /// First side effects of an accepted deploy: drop the previous
    /// operation's diagnostics and announce progress.
    fn begin(&self, variant: DeployVariant, subject: DeploySubject) -> DeployContext {
        self.diagnostics.clear();
        let progress = ProgressHandle::begin(self.progress.clone(), variant.title());
        let context = DeployContext::new(variant, subject, progress);
        emit_deploy_started(&context.run_id.to_string(), variant.label());
        context
    }

    async fn run_deploy_stage(
        &self,
        cli: &Path,
        context: &DeployContext,
        target: &Path,
    ) -> Result<(DeployOutcome, StageKind)> {
        context.progress.report("deploying", 50);

        let mut job = Job::new(
            cli.to_string_lossy().into_owned(),
            self.config.deploy_args(target),
        )
        .with_cwd(self.config.project_dir.clone());
        self.executor.execute(&mut job).await?;

        let exit_code = job.exit_code.unwrap_or(-1);
        emit_stage_finished(
            &context.run_id.to_string(),
            StageKind::Deploy.label(),
            exit_code,
        );

        let stdout_text = job.stdout_text();
        if !stdout_text.is_empty() {
            persist_raw_response(&self.config.cache_file(), &stdout_text)?;
        }

        context.progress.report("classifying result", 90);
        Ok((classify(&stdout_text, exit_code), StageKind::Deploy))
    }

    async fn run_manifest_then_deploy(
        &self,
        cli: &Path,
        context: &DeployContext,
    ) -> Result<(DeployOutcome, StageKind)> {
        context.progress.report("computing change manifest", 20);

        let mut job = manifest_job(&self.config);
        self.executor.execute(&mut job).await?;

        let exit_code = job.exit_code.unwrap_or(-1);
        emit_stage_finished(
            &context.run_id.to_string(),
            StageKind::Manifest.label(),
            exit_code,
        );

        if exit_code != 0 {
            return Ok((DeployOutcome::ProcessFailure(exit_code), StageKind::Manifest));
        }

        let manifest = self.config.manifest_file();
        self.run_deploy_stage(cli, context, &manifest).await
    }

    async fn run_selected(
        &self,
        cli: &Path,
        context: &DeployContext,
        resolved: &[PathBuf],
    ) -> Result<(DeployOutcome, StageKind)> {
        context.progress.report("marking selected files changed", 10);
        for path in resolved {
            force_dirty(path)?;
        }
        self.run_manifest_then_deploy(cli, context).await
    }

    /// Terminal path shared by every accepted operation: publish diagnostics,
    /// notify, finish the progress handle, release the guard.
    fn finalize(
        &self,
        context: DeployContext,
        staged: Result<(DeployOutcome, StageKind)>,
    ) -> Result<DeployReport> {
        let run_id_text = context.run_id.to_string();
        let _span = RunSpan::enter(&run_id_text);

        let (outcome, stage) = match staged {
            Ok(staged) => staged,
            Err(err) => {
                self.notifier
                    .notify(Severity::Error, &format!("Deployment failed: {err}"));
                context.progress.finish();
                self.guard.release();
                emit_deploy_finished(&run_id_text, "error", 0, context.elapsed_ms());
                return Err(err);
            }
        };

        let diagnostics_published = self.publish_diagnostics(&outcome);
        self.notify_outcome(&outcome, stage, diagnostics_published);

        context.progress.finish();
        self.guard.release();

        let duration_ms = context.elapsed_ms();
        emit_deploy_finished(
            &run_id_text,
            outcome.label(),
            diagnostics_published,
            duration_ms,
        );

        let failed_stage = if outcome.is_success() {
            None
        } else {
            Some(stage)
        };
        Ok(DeployReport {
            run_id: context.run_id,
            variant: context.variant,
            outcome,
            failed_stage,
            diagnostics_published,
            started_at: context.started_at,
            duration_ms,
        })
    }

    fn publish_diagnostics(&self, outcome: &DeployOutcome) -> usize {
        match outcome {
            DeployOutcome::ComponentFailures(records) => {
                let diagnostics = to_diagnostics(records);
                let count = diagnostics.len();
                self.diagnostics.replace(diagnostics);
                count
            }
            // A conflict is not a compile error; other outcomes carry no
            // per-component detail.
            _ => 0,
        }
    }

    fn notify_outcome(&self, outcome: &DeployOutcome, stage: StageKind, diagnostics: usize) {
        match outcome {
            DeployOutcome::Success(_) => {
                self.notifier.notify(Severity::Info, "Deployment successful");
            }
            DeployOutcome::SourceConflict(message) => {
                self.notifier.notify(Severity::Error, message);
            }
            DeployOutcome::ComponentFailures(records) => {
                self.notifier.notify(
                    Severity::Error,
                    &format!(
                        "Deployment failed: {} component failure(s), {} diagnostic(s)",
                        records.len(),
                        diagnostics
                    ),
                );
            }
            DeployOutcome::ProcessFailure(exit_code) => {
                let stage_name = match stage {
                    StageKind::Manifest => "Change manifest generation",
                    StageKind::Deploy => "Deploy",
                };
                self.notifier.notify(
                    Severity::Error,
                    &format!("{stage_name} failed with exit code {exit_code}"),
                );
            }
            DeployOutcome::ParseFailure => {
                self.notifier
                    .notify(Severity::Error, "Deploy output was not valid JSON");
            }
        }
    }
}
