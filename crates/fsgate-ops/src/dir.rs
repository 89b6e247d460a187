// dir.rs — DirectoryService: list and create directories inside the sandbox.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fsgate_guard::AllowedRoots;

use crate::error::OpsError;

/// Directory operations, every path validated through the allow-list.
///
/// Stateless apart from the shared immutable roots — safe to call from
/// concurrently dispatched tool invocations.
#[derive(Clone)]
pub struct DirectoryService {
    roots: Arc<AllowedRoots>,
}

impl DirectoryService {
    pub fn new(roots: Arc<AllowedRoots>) -> Self {
        Self { roots }
    }

    /// List the immediate children (files and subdirectories) of a
    /// directory. Entry order is whatever the platform returns.
    pub fn list(&self, dir_path: impl AsRef<Path>) -> Result<Vec<String>, OpsError> {
        let validated = self.roots.validate(dir_path)?;

        if !validated.is_dir() {
            return Err(OpsError::InvalidTarget { path: validated });
        }

        let entries = fs::read_dir(&validated).map_err(|source| OpsError::Io {
            path: validated.clone(),
            source,
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| OpsError::Io {
                path: validated.clone(),
                source,
            })?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }

    /// Create a directory, including any missing parents.
    ///
    /// Idempotent: if the resolved path already exists as a directory this
    /// succeeds without touching anything. Returns the resolved path.
    pub fn create(&self, dir_path: impl AsRef<Path>) -> Result<PathBuf, OpsError> {
        let validated = self.roots.validate(dir_path)?;

        if validated.is_dir() {
            tracing::debug!(path = %validated.display(), "directory already exists");
            return Ok(validated);
        }

        fs::create_dir_all(&validated).map_err(|source| OpsError::Io {
            path: validated.clone(),
            source,
        })?;
        tracing::info!(path = %validated.display(), "directory created");
        Ok(validated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fsgate_guard::GuardError;
    use tempfile::tempdir;

    fn service(root: &Path) -> DirectoryService {
        DirectoryService::new(Arc::new(AllowedRoots::new([root]).unwrap()))
    }

    #[test]
    fn list_returns_child_names() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"a").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let mut names = service(dir.path()).list(dir.path()).unwrap();
        names.sort();
        assert_eq!(names, vec!["a.txt", "sub"]);
    }

    #[test]
    fn list_outside_allow_list_denied() {
        let dir = tempdir().unwrap();
        let other = tempdir().unwrap();

        let result = service(dir.path()).list(other.path());
        assert!(matches!(
            result,
            Err(OpsError::Guard(GuardError::AccessDenied { .. }))
        ));
    }

    #[test]
    fn list_file_is_invalid_target() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("f.txt");
        fs::write(&file, b"x").unwrap();

        let result = service(dir.path()).list(&file);
        assert!(matches!(result, Err(OpsError::InvalidTarget { .. })));
    }

    #[test]
    fn list_missing_directory_is_invalid_target() {
        let dir = tempdir().unwrap();
        let result = service(dir.path()).list(dir.path().join("nope"));
        assert!(matches!(result, Err(OpsError::InvalidTarget { .. })));
    }

    #[test]
    fn create_makes_nested_directories() {
        let dir = tempdir().unwrap();
        let svc = service(dir.path());

        let created = svc.create(dir.path().join("a/b")).unwrap();
        assert!(created.is_dir());
        assert!(dir.path().join("a").is_dir());
    }

    #[test]
    fn create_is_idempotent() {
        let dir = tempdir().unwrap();
        let svc = service(dir.path());
        let target = dir.path().join("once");

        let first = svc.create(&target).unwrap();
        // Put a file inside, then create again — contents must survive.
        fs::write(first.join("keep.txt"), b"k").unwrap();
        let second = svc.create(&target).unwrap();

        assert_eq!(first, second);
        assert!(second.join("keep.txt").exists());
    }

    #[test]
    fn create_outside_allow_list_denied() {
        let dir = tempdir().unwrap();
        let other = tempdir().unwrap();

        let result = service(dir.path()).create(other.path().join("sub"));
        assert!(matches!(
            result,
            Err(OpsError::Guard(GuardError::AccessDenied { .. }))
        ));
    }
}
