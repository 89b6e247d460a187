// error.rs — Error types for the search subsystem.
//
// These never reach the MCP caller directly: the public search methods
// fail closed to empty result lists and log the error instead.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

use fsgate_guard::GuardError;

/// Errors that can occur during a search.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Search-root validation failed (denied or unresolvable).
    #[error(transparent)]
    Guard(#[from] GuardError),

    /// Spawning or reading the external search process failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The external search process exited with an unexpected status.
    /// Exit status 0 (matches) and 1 (no matches) are both success.
    #[error("grep failed with {status}: {stderr}")]
    GrepFailed { status: ExitStatus, stderr: String },

    /// The external search process did not finish within the deadline.
    #[error("grep did not finish within {seconds}s")]
    GrepTimeout { seconds: u64 },
}
