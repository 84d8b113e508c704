//! Orgflow CLI - editor-assist deploy orchestration.
//!
//! ## Commands
//!
//! - `file`: deploy one source file
//! - `changed`: compute a change manifest, then deploy it
//! - `selected`: force-deploy an explicit selection of files

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::Level;

use orgflow_core::{
    init_tracing, DeployConfig, DeployOrchestrator, DeployReport, FileIndex, TracingNotifier,
};

#[derive(Parser)]
#[command(name = "orgflow")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Deploy orchestration for metadata-driven org platforms", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted output and log lines
    #[arg(long, global = true)]
    json: bool,

    /// Project directory the external tools run in
    #[arg(long, global = true, default_value = ".")]
    project_dir: PathBuf,

    /// Deploy CLI binary (name on PATH or explicit path)
    #[arg(long, global = true)]
    cli_bin: Option<String>,

    /// API version forwarded to the deploy CLI
    #[arg(long, global = true)]
    api_version: Option<String>,

    /// Pass the ignore-conflicts flag to the deploy CLI
    #[arg(long, global = true)]
    ignore_conflicts: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy one source file
    File {
        /// Path to the source file
        path: PathBuf,
    },

    /// Compute a change manifest against the reference revision, then deploy it
    Changed {
        /// Reference revision for change detection
        #[arg(long, default_value = "HEAD")]
        revision: String,
    },

    /// Deploy an explicit selection of files (forced through the manifest stage)
    Selected {
        /// File names to deploy, resolved against the index directory
        files: Vec<String>,

        /// Directory scanned to build the file-name index
        #[arg(long, default_value = "src")]
        index_dir: PathBuf,
    },
}

#[derive(Serialize)]
struct ReportOutput {
    run_id: String,
    variant: &'static str,
    outcome: &'static str,
    diagnostics: usize,
    duration_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    init_tracing(cli.json, level);

    let mut config = DeployConfig {
        project_dir: cli.project_dir.clone(),
        ignore_conflicts: cli.ignore_conflicts,
        ..DeployConfig::default()
    };
    if let Some(binary) = cli.cli_bin {
        config.binary_path = binary;
    }
    if let Some(api_version) = cli.api_version {
        config.api_version = api_version;
    }
    if let Commands::Changed { revision } = &cli.command {
        config.reference_revision = revision.clone();
    }

    let orchestrator = DeployOrchestrator::new(config).with_notifier(Arc::new(TracingNotifier));

    let report = match &cli.command {
        Commands::File { path } => orchestrator.deploy_file(path).await,
        Commands::Changed { .. } => orchestrator.deploy_changed().await,
        Commands::Selected { files, index_dir } => {
            let index_root = cli.project_dir.join(index_dir);
            let index = build_index(&index_root)
                .with_context(|| format!("scanning {}", index_root.display()))?;
            orchestrator.deploy_selected(files, &index).await
        }
    };

    let report = report.context("deploy operation failed")?;
    render_report(&report, cli.json);
    Ok(exit_code_for(&report))
}

fn build_index(dir: &Path) -> std::io::Result<FileIndex> {
    let mut index = FileIndex::new();
    collect_files(dir, &mut index)?;
    Ok(index)
}

fn collect_files(dir: &Path, index: &mut FileIndex) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(&path, index)?;
        } else {
            index.insert(path);
        }
    }
    Ok(())
}

fn render_report(report: &DeployReport, json: bool) {
    if json {
        let output = ReportOutput {
            run_id: report.run_id.to_string(),
            variant: report.variant.label(),
            outcome: report.outcome.label(),
            diagnostics: report.diagnostics_published,
            duration_ms: report.duration_ms,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
    } else {
        println!(
            "{} deploy finished: {} ({} diagnostic(s), {} ms)",
            report.variant.label(),
            report.outcome.label(),
            report.diagnostics_published,
            report.duration_ms
        );
    }
}

fn exit_code_for(report: &DeployReport) -> ExitCode {
    if report.outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
