//! Error types for gamewrap.
//!
//! `LauncherError` covers the store, shortcut and configuration layers.
//! The launch sequence reports through its own typed `SupervisorError` so
//! callers can decide how a failed launch is surfaced to the user.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the gamewrap library.
#[derive(Debug, Error)]
pub enum LauncherError {
    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    // Serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to create shortcut at {path}: {message}")]
    Shortcut { path: PathBuf, message: String },

    // Generic errors
    #[error("{0}")]
    Other(String),
}

/// Result type alias for gamewrap operations.
pub type Result<T> = std::result::Result<T, LauncherError>;

impl From<std::io::Error> for LauncherError {
    fn from(err: std::io::Error) -> Self {
        LauncherError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for LauncherError {
    fn from(err: serde_json::Error) -> Self {
        LauncherError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl LauncherError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        LauncherError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }
}

/// Failure of a single launch sequence.
///
/// Each variant names the step that failed. Steps after the failing one do
/// not run, except that a helper which was already started is stopped on a
/// best-effort basis before the error is returned.
#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("Failed to start helper {path}: {source}")]
    HelperSpawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to start {game} from {path}: {source}")]
    TargetSpawn {
        game: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to poll {game} (pid {pid}): {source}")]
    Poll {
        game: String,
        pid: u32,
        #[source]
        source: std::io::Error,
    },

    #[error("Launch worker for {game} panicked")]
    WorkerPanicked { game: String },
}

impl SupervisorError {
    /// Short label for the failed step, used in log fields.
    pub fn step(&self) -> &'static str {
        match self {
            SupervisorError::HelperSpawn { .. } => "helper-spawn",
            SupervisorError::TargetSpawn { .. } => "target-spawn",
            SupervisorError::Poll { .. } => "poll",
            SupervisorError::WorkerPanicked { .. } => "worker",
        }
    }
}
