//! Command-level error types.
//!
//! Per-file problems (missing files, impostor images) are never errors;
//! they are collected into reports. Only a missing prerequisite artifact,
//! malformed input, or a failed verification surfaces here.

use std::path::PathBuf;
use thiserror::Error;

/// Exit status for a failed check or general error.
pub const EXIT_FAILURE: u8 = 1;

/// Exit status when the lock snapshot has not been generated yet.
pub const EXIT_MISSING_LOCK: u8 = 2;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("lock file `{0}` not found, run `imgreg lock` first")]
    MissingLock(PathBuf),

    #[error("registry `{0}` not found, run `imgreg build` or `imgreg import` first")]
    MissingRegistry(PathBuf),

    #[error("route file `{0}` not found")]
    MissingRoutes(PathBuf),

    #[error("legacy registry source `{0}` not found")]
    MissingSource(PathBuf),

    #[error("registry `{0}` already exists, pass --force to overwrite")]
    RegistryExists(PathBuf),

    #[error("verification failed for {count} path(s)")]
    VerifyFailed { count: usize },

    #[error("{count} route(s) matched no images")]
    EmptyRoutes { count: usize },

    #[error("IO error when accessing `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("malformed JSON in `{0}`")]
    Json(PathBuf, #[source] serde_json::Error),
}

impl ToolError {
    /// Process exit status for this error.
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::MissingLock(_) => EXIT_MISSING_LOCK,
            _ => EXIT_FAILURE,
        }
    }
}

/// Exit status for an arbitrary command error.
pub fn exit_code_of(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<ToolError>()
        .map_or(EXIT_FAILURE, ToolError::exit_code)
}
