// file.rs — FileService: sandboxed file reads, writes, and appends.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use fsgate_guard::AllowedRoots;

use crate::error::OpsError;

/// Structured outcome of a mutating file operation, serialized back to
/// the caller as-is.
#[derive(Debug, Clone, Serialize)]
pub struct OperationResult {
    pub success: bool,
    /// The resolved (canonical) path the operation acted on.
    pub path: String,
    pub message: String,
    /// Bytes written or appended.
    pub bytes: u64,
}

/// File operations, every path validated through the allow-list.
#[derive(Clone)]
pub struct FileService {
    roots: Arc<AllowedRoots>,
}

impl FileService {
    pub fn new(roots: Arc<AllowedRoots>) -> Self {
        Self { roots }
    }

    /// Whether a regular file exists at the path.
    ///
    /// Denial and resolution failure collapse to `false`: callers cannot
    /// distinguish "not permitted" from "permitted but absent" through
    /// this operation. That is the contract — the distinction lives only
    /// in the debug log.
    pub fn exists(&self, file_path: impl AsRef<Path>) -> bool {
        match self.roots.validate(&file_path) {
            Ok(validated) => validated.is_file(),
            Err(e) => {
                tracing::debug!(
                    path = %file_path.as_ref().display(),
                    error = %e,
                    "existence check degraded to false"
                );
                false
            }
        }
    }

    /// Read a file's full content as UTF-8 text.
    pub fn read(&self, file_path: impl AsRef<Path>) -> Result<String, OpsError> {
        let validated = self.roots.validate(file_path)?;

        if !validated.exists() {
            return Err(OpsError::NotFound { path: validated });
        }

        fs::read_to_string(&validated).map_err(|source| OpsError::Io {
            path: validated,
            source,
        })
    }

    /// Create or truncate a file with the given content.
    ///
    /// Missing parent directories are NOT created — writing into a
    /// directory that does not exist is an I/O error.
    pub fn write(&self, file_path: impl AsRef<Path>, content: &str) -> Result<OperationResult, OpsError> {
        let validated = self.roots.validate(file_path)?;

        fs::write(&validated, content).map_err(|source| OpsError::Io {
            path: validated.clone(),
            source,
        })?;

        tracing::debug!(path = %validated.display(), bytes = content.len(), "file written");
        Ok(OperationResult {
            success: true,
            path: validated.display().to_string(),
            message: "File written successfully.".to_string(),
            bytes: content.len() as u64,
        })
    }

    /// Append content to the end of a file, creating the file — and any
    /// missing parent directories — if needed.
    pub fn append(&self, file_path: impl AsRef<Path>, content: &str) -> Result<OperationResult, OpsError> {
        let validated = self.roots.validate(file_path)?;

        if !validated.exists() {
            if let Some(parent) = validated.parent() {
                if !parent.exists() {
                    tracing::debug!(parent = %parent.display(), "creating parent directories for append");
                    fs::create_dir_all(parent).map_err(|source| OpsError::Io {
                        path: parent.to_path_buf(),
                        source,
                    })?;
                }
            }
        }

        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&validated)
            .map_err(|source| OpsError::Io {
                path: validated.clone(),
                source,
            })?;

        file.write_all(content.as_bytes())
            .map_err(|source| OpsError::Io {
                path: validated.clone(),
                source,
            })?;

        tracing::debug!(path = %validated.display(), bytes = content.len(), "content appended");
        Ok(OperationResult {
            success: true,
            path: validated.display().to_string(),
            message: "Content appended successfully.".to_string(),
            bytes: content.len() as u64,
        })
    }
}
