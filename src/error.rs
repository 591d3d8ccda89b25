use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProvisionError {
    // Filesystem preparation
    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    // Network errors
    #[error("Request to {url} failed: {source}")]
    Network {
        url: String,
        source: reqwest::Error,
    },

    #[error("Server answered {status} for {url}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    // Local file I/O
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // Archive errors
    #[error("Archive is not gzip-compressed: {reason}")]
    InvalidCompression { reason: String },

    #[error("Failed to read archive entry: {0}")]
    EntryRead(#[source] std::io::Error),

    #[error("Unsupported {kind} entry in archive: {path}")]
    UnsupportedEntry { path: String, kind: String },

    #[error("Archive entry {path} escapes the destination directory")]
    PathEscape { path: String },

    // Relocation and cleanup
    #[error("Failed to move {} to {}: {source}", from.display(), to.display())]
    Relocate {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to remove {}: {source}", path.display())]
    Cleanup {
        path: PathBuf,
        source: std::io::Error,
    },

    // Compose subprocess
    #[error("Failed to launch {program}: {source}")]
    ComposeLaunch {
        program: String,
        source: std::io::Error,
    },

    #[error("{program} exited with {status}")]
    ComposeExit {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    // Config errors
    #[error("Invalid configuration in {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, ProvisionError>;

impl ProvisionError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ProvisionError::Io {
            path: path.into(),
            source,
        }
    }
}
