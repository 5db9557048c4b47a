use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("no cached credentials at {}", .0.display())]
    Missing(PathBuf),

    #[error("failed to read cache file {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("malformed cache file {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("incomplete credentials in cache file {}", .0.display())]
    Incomplete(PathBuf),

    #[error(
        "cached credentials in {} were not issued by a session provider (provider: {provider})",
        .path.display()
    )]
    Degenerate { path: PathBuf, provider: String },

    #[error("failed to serialize credentials: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to write cache file {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to create cache directory {}: {source}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },
}

impl CacheError {
    /// Whether the manager may fall back to a refresh after this error
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::CreateDir { .. })
    }
}
