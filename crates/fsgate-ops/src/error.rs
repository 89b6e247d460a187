// error.rs — Error types for directory and file operations.

use std::path::PathBuf;
use thiserror::Error;

use fsgate_guard::GuardError;

/// Errors that can occur during sandboxed directory/file operations.
#[derive(Debug, Error)]
pub enum OpsError {
    /// Path validation failed (denied or unresolvable).
    #[error(transparent)]
    Guard(#[from] GuardError),

    /// The target does not exist where existence is required.
    #[error("not found: '{path}'")]
    NotFound { path: PathBuf },

    /// The target exists but is the wrong kind (e.g. a file where a
    /// directory was expected).
    #[error("'{path}' is not a valid directory")]
    InvalidTarget { path: PathBuf },

    /// An underlying read/write/create failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
