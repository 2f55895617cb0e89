//! Error types for topicsync-core.

use std::path::PathBuf;

use thiserror::Error;

use crate::reconcile::RemoteError;

/// All errors that can arise from record store operations.
#[derive(Debug, Error)]
pub enum RecordError {
    /// Underlying I/O failure (permission denied, disk full, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error (save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load — includes file path and line context from serde_yaml.
    #[error("failed to parse record at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The record file did not exist at the expected path.
    #[error("record not found at {path}")]
    NotFound { path: PathBuf },
}

/// Errors that abort an `init` or `update` run.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("configuration file {path} does not exist; run `init` first")]
    ConfigurationMissing { path: PathBuf },

    #[error("configuration file {path} already exists; remove it before running `init`")]
    ConfigurationAlreadyExists { path: PathBuf },

    #[error("failed to load record: {0}")]
    RecordLoad(#[source] RecordError),

    #[error("failed to save record: {0}")]
    RecordSave(#[source] RecordError),

    #[error("failed to list repositories of '{owner}': {source}")]
    RemoteList {
        owner: String,
        #[source]
        source: RemoteError,
    },
}
