// error.rs — Error types for the path guard.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while validating a path against the allow-list.
#[derive(Debug, Error)]
pub enum GuardError {
    /// The resolved path is outside every allowed root directory.
    ///
    /// The message names only the path the caller supplied (resolved);
    /// the configured allow-list goes to the log, not the caller.
    #[error("access denied: '{path}' is outside the allowed directories")]
    AccessDenied { path: PathBuf },

    /// The path could not be canonicalized — an intermediate component
    /// does not exist or is inaccessible. This must propagate: a path
    /// that cannot be resolved cannot be proven contained.
    #[error("cannot resolve '{path}': {source}")]
    Resolution {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The allow-list was empty. At least one root directory is required.
    #[error("at least one allowed directory is required")]
    EmptyAllowList,
}
