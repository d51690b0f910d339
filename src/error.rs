use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading the hierarchy a view is built from.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("failed to list {}: {source}", path.display())]
    List {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to walk {}: {message}", path.display())]
    Walk { path: PathBuf, message: String },
    #[error("no such entry: {}", path.display())]
    NotFound { path: PathBuf },
}

/// Failures while loading a `ViewConfig` file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("config JSON failed: {0}")]
    Json(#[from] serde_json::Error),
}
