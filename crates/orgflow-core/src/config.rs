//! Deploy tool configuration.

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::error::ValidationError;

/// Configuration for the deploy CLI and the change-detection (delta) tool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeployConfig {
    /// Deploy CLI binary: a name searched on `PATH` or an explicit path.
    pub binary_path: String,

    /// Deploy subcommand passed before the target argument.
    pub deploy_subcommand: String,

    /// Change-detection tool binary.
    pub delta_tool: String,

    /// Project root the external tools run in.
    pub project_dir: PathBuf,

    /// API version forwarded to the deploy CLI.
    pub api_version: String,

    /// Whether to pass the ignore-conflicts flag.
    pub ignore_conflicts: bool,

    /// Reference revision the delta tool diffs against.
    pub reference_revision: String,

    /// Manifest output path, relative to `project_dir`.
    pub manifest_path: PathBuf,

    /// Last-response cache path, relative to `project_dir`.
    pub cache_path: PathBuf,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            binary_path: "orgcli".to_string(),
            deploy_subcommand: "deploy".to_string(),
            delta_tool: "srcdelta".to_string(),
            project_dir: PathBuf::from("."),
            api_version: "58.0".to_string(),
            ignore_conflicts: false,
            reference_revision: "HEAD".to_string(),
            manifest_path: PathBuf::from(".orgflow/changes.manifest"),
            cache_path: PathBuf::from(".orgflow/last_response.json"),
        }
    }
}

impl DeployConfig {
    /// Absolute path of the generated manifest.
    pub fn manifest_file(&self) -> PathBuf {
        self.project_dir.join(&self.manifest_path)
    }

    /// Absolute path of the raw-response cache.
    pub fn cache_file(&self) -> PathBuf {
        self.project_dir.join(&self.cache_path)
    }

    /// Argument vector for a deploy invocation against `target` (a source
    /// file or a generated manifest).
    pub fn deploy_args(&self, target: &Path) -> Vec<String> {
        let mut args = vec![
            self.deploy_subcommand.clone(),
            target.to_string_lossy().into_owned(),
            "--json".to_string(),
            "--api-version".to_string(),
            self.api_version.clone(),
        ];
        if self.ignore_conflicts {
            args.push("--ignore-conflicts".to_string());
        }
        args
    }

    /// Argument vector for the delta-tool (manifest) invocation.
    pub fn manifest_args(&self) -> Vec<String> {
        vec![
            "--revision".to_string(),
            self.reference_revision.clone(),
            "--out".to_string(),
            self.manifest_file().to_string_lossy().into_owned(),
        ]
    }

    /// Resolve the deploy CLI binary.
    ///
    /// A value containing a path separator is checked directly; a bare name
    /// is searched on `PATH`.
    pub fn resolve_cli(&self) -> Result<PathBuf, ValidationError> {
        resolve_binary(&self.binary_path).ok_or_else(|| ValidationError::CliNotFound {
            binary: self.binary_path.clone(),
        })
    }
}

fn resolve_binary(binary: &str) -> Option<PathBuf> {
    let candidate = Path::new(binary);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }
    let paths = env::var_os("PATH")?;
    env::split_paths(&paths)
        .map(|dir| dir.join(binary))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = DeployConfig::default();
        assert_eq!(config.binary_path, "orgcli");
        assert_eq!(config.deploy_subcommand, "deploy");
        assert_eq!(config.api_version, "58.0");
        assert!(!config.ignore_conflicts);
        assert_eq!(config.reference_revision, "HEAD");
    }

    #[test]
    fn test_deploy_args_shape() {
        let config = DeployConfig::default();
        let args = config.deploy_args(Path::new("src/classes/Acct.cls"));
        assert_eq!(
            args,
            vec![
                "deploy",
                "src/classes/Acct.cls",
                "--json",
                "--api-version",
                "58.0",
            ]
        );
    }

    #[test]
    fn test_deploy_args_with_ignore_conflicts() {
        let config = DeployConfig {
            ignore_conflicts: true,
            ..DeployConfig::default()
        };
        let args = config.deploy_args(Path::new("m.manifest"));
        assert_eq!(args.last().map(String::as_str), Some("--ignore-conflicts"));
    }

    #[test]
    fn test_manifest_args_name_revision_and_output() {
        let config = DeployConfig {
            project_dir: PathBuf::from("/work/project"),
            ..DeployConfig::default()
        };
        let args = config.manifest_args();
        assert_eq!(args[0], "--revision");
        assert_eq!(args[1], "HEAD");
        assert_eq!(args[2], "--out");
        assert!(args[3].ends_with(".orgflow/changes.manifest"));
        assert!(args[3].starts_with("/work/project"));
    }

    #[test]
    fn test_resolve_cli_finds_path_binaries() {
        // `sh` is on PATH everywhere this crate builds.
        let config = DeployConfig {
            binary_path: "sh".to_string(),
            ..DeployConfig::default()
        };
        assert!(config.resolve_cli().is_ok());
    }

    #[test]
    fn test_resolve_cli_rejects_missing_binary() {
        let config = DeployConfig {
            binary_path: "/nonexistent/orgcli".to_string(),
            ..DeployConfig::default()
        };
        let err = config.resolve_cli().unwrap_err();
        assert!(matches!(err, ValidationError::CliNotFound { .. }));

        let config = DeployConfig {
            binary_path: "definitely-not-a-real-binary-name".to_string(),
            ..DeployConfig::default()
        };
        assert!(config.resolve_cli().is_err());
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = DeployConfig {
            binary_path: "/usr/local/bin/orgcli".to_string(),
            ignore_conflicts: true,
            ..DeployConfig::default()
        };
        let json = serde_json::to_string(&config).expect("serialize");
        let deserialized: DeployConfig = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(config, deserialized);
    }
}
