//! Change-manifest stage helpers.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::config::DeployConfig;
use crate::domain::error::Result;
use crate::job::Job;

/// Build the delta-tool job that writes the change manifest.
///
/// Success is signaled purely by exit code 0; the manifest lands at the
/// configured relative output path, not on stdout.
pub fn manifest_job(config: &DeployConfig) -> Job {
    Job::new(config.delta_tool.clone(), config.manifest_args())
        .with_cwd(config.project_dir.clone())
}

/// Append a trailing blank line to `path`.
///
/// Workaround for the delta tool's change detection: a file selected for
/// deploy with no real edits would otherwise be absent from the manifest.
/// All callers go through this function so the workaround can be removed
/// when the tool's detection semantics change.
pub fn force_dirty(path: &Path) -> Result<()> {
    let mut file = OpenOptions::new().append(true).open(path)?;
    file.write_all(b"\n")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_manifest_job_shape() {
        let config = DeployConfig {
            delta_tool: "/usr/local/bin/srcdelta".to_string(),
            project_dir: PathBuf::from("/work/project"),
            ..DeployConfig::default()
        };
        let job = manifest_job(&config);

        assert_eq!(job.command, "/usr/local/bin/srcdelta");
        assert_eq!(job.args[0], "--revision");
        assert_eq!(job.cwd.as_deref(), Some(Path::new("/work/project")));
    }

    #[test]
    fn test_force_dirty_appends_blank_line() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("Widget.cls");
        std::fs::write(&path, "class Widget {}\n").expect("write");

        force_dirty(&path).expect("force dirty");
        force_dirty(&path).expect("force dirty again");

        let content = std::fs::read_to_string(&path).expect("read");
        assert_eq!(content, "class Widget {}\n\n\n");
    }

    #[test]
    fn test_force_dirty_missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("absent.cls");
        assert!(force_dirty(&missing).is_err());
    }
}
