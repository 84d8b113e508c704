//! Domain-level error taxonomy for orgflow.

/// Errors that reject a deploy operation before any side effect.
///
/// A validation rejection clears no diagnostics, creates no progress handle,
/// and spawns no process.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("deploy already in progress")]
    DeployInProgress,

    #[error("deploy CLI not found: {binary}")]
    CliNotFound { binary: String },

    #[error("selection resolved to zero deployable files")]
    EmptySelection,
}

/// Orgflow domain errors.
#[derive(Debug, thiserror::Error)]
pub enum OrgflowError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("failed to spawn {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for orgflow domain operations.
pub type Result<T> = std::result::Result<T, OrgflowError>;
