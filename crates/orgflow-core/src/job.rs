//! External process invocation wrapper.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::domain::error::{OrgflowError, Result};

/// Lifecycle state of a [`Job`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    NotStarted,
    Running,
    Exited,
}

/// One external process invocation.
///
/// Owned exclusively by the stage that created it; captured output is only
/// meaningful once the state is [`JobState::Exited`].
#[derive(Debug)]
pub struct Job {
    /// Executable to run.
    pub command: String,

    /// Ordered argument list.
    pub args: Vec<String>,

    /// Working directory for the child.
    pub cwd: Option<PathBuf>,

    /// Current lifecycle state.
    pub state: JobState,

    /// Captured stdout, split into ordered lines.
    pub stdout_lines: Vec<String>,

    /// Captured stderr, split into ordered lines.
    pub stderr_lines: Vec<String>,

    /// Exit code; -1 when the process was killed by a signal.
    pub exit_code: Option<i32>,
}

impl Job {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
            cwd: None,
            state: JobState::NotStarted,
            stdout_lines: Vec::new(),
            stderr_lines: Vec::new(),
            exit_code: None,
        }
    }

    /// Set the child's working directory.
    pub fn with_cwd(mut self, cwd: PathBuf) -> Self {
        self.cwd = Some(cwd);
        self
    }

    /// Full stdout text, lines rejoined.
    pub fn stdout_text(&self) -> String {
        self.stdout_lines.join("\n")
    }

    /// Whether the job exited with code 0.
    pub fn succeeded(&self) -> bool {
        self.state == JobState::Exited && self.exit_code == Some(0)
    }
}

/// Execution backend for [`Job`]s.
#[async_trait]
pub trait JobExecutor: Send + Sync {
    /// Run the job to completion, filling captured output and exit code.
    async fn execute(&self, job: &mut Job) -> Result<()>;
}

/// Default executor backed by `tokio::process`.
///
/// No timeout is enforced: a hung external process hangs its job
/// indefinitely.
#[derive(Debug, Default)]
pub struct ProcessExecutor;

#[async_trait]
impl JobExecutor for ProcessExecutor {
    async fn execute(&self, job: &mut Job) -> Result<()> {
        let mut command = Command::new(&job.command);
        command
            .args(&job.args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(cwd) = &job.cwd {
            command.current_dir(cwd);
        }

        let child = command.spawn().map_err(|source| OrgflowError::Spawn {
            command: job.command.clone(),
            source,
        })?;
        job.state = JobState::Running;

        let output = child.wait_with_output().await?;

        job.exit_code = Some(output.status.code().unwrap_or(-1));
        job.stdout_lines = split_lines(&output.stdout);
        job.stderr_lines = split_lines(&output.stderr);
        job.state = JobState::Exited;
        Ok(())
    }
}

fn split_lines(bytes: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_execute_captures_stdout_lines() {
        let mut job = Job::new("sh", vec!["-c".to_string(), "echo one; echo two".to_string()]);
        ProcessExecutor.execute(&mut job).await.expect("execute");

        assert_eq!(job.state, JobState::Exited);
        assert_eq!(job.exit_code, Some(0));
        assert_eq!(job.stdout_lines, vec!["one", "two"]);
        assert!(job.succeeded());
    }

    #[tokio::test]
    async fn test_execute_captures_stderr_and_exit_code() {
        let mut job = Job::new(
            "sh",
            vec!["-c".to_string(), "echo oops >&2; exit 3".to_string()],
        );
        ProcessExecutor.execute(&mut job).await.expect("execute");

        assert_eq!(job.exit_code, Some(3));
        assert_eq!(job.stderr_lines, vec!["oops"]);
        assert!(!job.succeeded());
    }

    #[tokio::test]
    async fn test_spawn_failure_is_reported() {
        let mut job = Job::new("/nonexistent-binary-that-does-not-exist", vec![]);
        let err = ProcessExecutor.execute(&mut job).await.unwrap_err();

        assert!(matches!(err, OrgflowError::Spawn { .. }));
        assert_eq!(job.state, JobState::NotStarted);
    }

    #[test]
    fn test_stdout_text_rejoins_lines() {
        let mut job = Job::new("true", vec![]);
        job.stdout_lines = vec!["{\"a\":1,".to_string(), "\"b\":2}".to_string()];
        assert_eq!(job.stdout_text(), "{\"a\":1,\n\"b\":2}");
    }

    #[test]
    fn test_new_job_starts_clean() {
        let job = Job::new("orgcli", vec!["deploy".to_string()]);
        assert_eq!(job.state, JobState::NotStarted);
        assert!(job.exit_code.is_none());
        assert!(!job.succeeded());
    }
}
