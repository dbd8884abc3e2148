//! Error types shared by the walker, orchestrator and transports

use std::path::PathBuf;

/// Result alias for sync operations
pub type Result<T> = std::result::Result<T, SyncError>;

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Rejected before any request is made
    #[error("{0}")]
    Validation(String),

    /// The remote answered without the key we expected; `raw` is the body as received
    #[error("{operation} failed: {raw}")]
    RemoteProtocol {
        operation: &'static str,
        raw: serde_json::Value,
    },

    #[error("I/O error at {path}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("config error: {0}")]
    Config(String),
}

impl SyncError {
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Process exit status for this failure
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            _ => 1,
        }
    }
}

impl From<walkdir::Error> for SyncError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(|p| p.to_path_buf()).unwrap_or_default();
        let source = err
            .into_io_error()
            .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
        Self::Filesystem { path, source }
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
