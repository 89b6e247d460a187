// service.rs — SearchService: name search via pruned traversal, content
// search via an external grep process.

use std::fs;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use walkdir::WalkDir;

use fsgate_guard::AllowedRoots;

use crate::error::SearchError;
use crate::ignore::IgnoreList;

/// Bound on name-search results — a pathological tree degrades to a
/// truncated answer instead of unbounded memory growth.
const MAX_NAME_MATCHES: usize = 10_000;

/// Deadline for the external grep process. Expiry kills the child.
const GREP_TIMEOUT: Duration = Duration::from_secs(30);

/// Search over a validated directory tree. Stateless apart from the
/// shared immutable allow-list and ignore table.
#[derive(Clone)]
pub struct SearchService {
    roots: Arc<AllowedRoots>,
    ignore: IgnoreList,
}

impl SearchService {
    pub fn new(roots: Arc<AllowedRoots>) -> Self {
        Self {
            roots,
            ignore: IgnoreList::default(),
        }
    }

    /// Find files under `search_root` whose name contains `substring`,
    /// case-insensitively. Ignored directories are pruned before descent.
    ///
    /// Fails closed: denial or unexpected error returns an empty list.
    pub fn find_by_name(&self, search_root: impl AsRef<Path>, substring: &str) -> Vec<String> {
        match self.try_find_by_name(search_root.as_ref(), substring) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!(
                    root = %search_root.as_ref().display(),
                    error = %e,
                    "name search degraded to empty result"
                );
                Vec::new()
            }
        }
    }

    fn try_find_by_name(&self, search_root: &Path, substring: &str) -> Result<Vec<String>, SearchError> {
        let root = self.roots.validate(search_root)?;
        let needle = substring.to_lowercase();

        let ignore = self.ignore;
        let walker = WalkDir::new(&root).into_iter().filter_entry(move |entry| {
            // Prune ignored subtrees, but never the search root itself.
            !(entry.depth() > 0
                && entry.file_type().is_dir()
                && ignore.matches(&entry.file_name().to_string_lossy()))
        });

        let mut matches = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    // Unreadable subtree — skip it, the rest of the walk
                    // is still useful.
                    tracing::debug!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if entry.file_type().is_dir() {
                continue;
            }
            if !entry.file_name().to_string_lossy().to_lowercase().contains(&needle) {
                continue;
            }

            // Symlink-escape defense: the walk path is inside the root
            // lexically, but the file it resolves to may not be. Anything
            // that fails canonical containment is filtered noise.
            let Ok(canonical) = fs::canonicalize(entry.path()) else {
                continue;
            };
            if !canonical.is_file() {
                continue;
            }
            if !self.roots.contains(&canonical) {
                tracing::debug!(
                    path = %entry.path().display(),
                    "excluding match that resolves outside allow-list"
                );
                continue;
            }

            matches.push(entry.path().display().to_string());
            if matches.len() >= MAX_NAME_MATCHES {
                tracing::warn!(root = %root.display(), "name search truncated at {MAX_NAME_MATCHES} matches");
                break;
            }
        }
        Ok(matches)
    }

    /// Find files under `search_root` whose content contains `text`,
    /// case-insensitively, by delegating to `grep -irl`.
    ///
    /// Fails closed: denial, a grep failure, or the timeout returns an
    /// empty list. Grep exiting 1 ("no matches") is an empty success,
    /// not a failure.
    pub async fn find_by_content(&self, search_root: impl AsRef<Path>, text: &str) -> Vec<String> {
        match self.try_find_by_content(search_root.as_ref(), text).await {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!(
                    root = %search_root.as_ref().display(),
                    error = %e,
                    "content search degraded to empty result"
                );
                Vec::new()
            }
        }
    }

    async fn try_find_by_content(&self, search_root: &Path, text: &str) -> Result<Vec<String>, SearchError> {
        let root = self.roots.validate(search_root)?;

        let mut cmd = tokio::process::Command::new("grep");
        cmd.arg("-irl")
            .arg(text)
            .arg(&root)
            .args(self.ignore.grep_exclude_flags())
            .stdin(Stdio::null())
            // Dropping the future on timeout must not leave a grep
            // running against the sandbox.
            .kill_on_drop(true);

        let output = tokio::time::timeout(GREP_TIMEOUT, cmd.output())
            .await
            .map_err(|_| SearchError::GrepTimeout {
                seconds: GREP_TIMEOUT.as_secs(),
            })?
            .map_err(|source| SearchError::Io {
                path: root.clone(),
                source,
            })?;

        // 0 = matches found, 1 = no matches; anything else is a tool failure.
        match output.status.code() {
            Some(0) | Some(1) => {}
            _ => {
                return Err(SearchError::GrepFailed {
                    status: output.status,
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                });
            }
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut matches = Vec::new();
        for line in stdout.lines() {
            if line.is_empty() {
                continue;
            }
            // Same symlink-escape defense as name search.
            let Ok(canonical) = fs::canonicalize(line) else {
                continue;
            };
            if !self.roots.contains(&canonical) {
                tracing::debug!(path = line, "excluding match that resolves outside allow-list");
                continue;
            }
            matches.push(line.to_string());
        }
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn service(root: &Path) -> SearchService {
        SearchService::new(Arc::new(AllowedRoots::new([root]).unwrap()))
    }

    #[test]
    fn name_search_finds_matches_case_insensitively() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Note1.txt"), b"x").unwrap();
        fs::write(dir.path().join("other.txt"), b"x").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/mynotes.md"), b"x").unwrap();

        let mut matches = service(dir.path()).find_by_name(dir.path(), "note");
        matches.sort();
        assert_eq!(matches.len(), 2);
        assert!(matches[0].ends_with("Note1.txt"));
        assert!(matches[1].ends_with("mynotes.md"));
    }

    #[test]
    fn name_search_prunes_ignored_directories() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("note1.txt"), b"x").unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join(".git/note2.txt"), b"x").unwrap();
        fs::create_dir(dir.path().join("node_modules")).unwrap();
        fs::write(dir.path().join("node_modules/note3.txt"), b"x").unwrap();

        let matches = service(dir.path()).find_by_name(dir.path(), "note");
        assert_eq!(matches.len(), 1);
        assert!(matches[0].ends_with("note1.txt"));
    }

    #[test]
    fn name_search_denied_root_is_empty() {
        let dir = tempdir().unwrap();
        let other = tempdir().unwrap();
        fs::write(other.path().join("note.txt"), b"x").unwrap();

        let matches = service(dir.path()).find_by_name(other.path(), "note");
        assert!(matches.is_empty());
    }

    #[test]
    fn name_search_missing_root_is_empty() {
        let dir = tempdir().unwrap();
        let matches = service(dir.path()).find_by_name(dir.path().join("gone"), "note");
        assert!(matches.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn name_search_excludes_symlink_escapes() {
        let dir = tempdir().unwrap();
        let outside = tempdir().unwrap();
        fs::write(outside.path().join("escape-note.txt"), b"x").unwrap();
        fs::write(dir.path().join("inside-note.txt"), b"x").unwrap();
        std::os::unix::fs::symlink(
            outside.path().join("escape-note.txt"),
            dir.path().join("linked-note.txt"),
        )
        .unwrap();

        let matches = service(dir.path()).find_by_name(dir.path(), "note");
        assert_eq!(matches.len(), 1);
        assert!(matches[0].ends_with("inside-note.txt"));
    }

    #[tokio::test]
    async fn content_search_finds_matching_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"the needle is here").unwrap();
        fs::write(dir.path().join("b.txt"), b"nothing to see").unwrap();

        let matches = service(dir.path()).find_by_content(dir.path(), "NEEDLE").await;
        assert_eq!(matches.len(), 1);
        assert!(matches[0].ends_with("a.txt"));
    }

    #[tokio::test]
    async fn content_search_zero_matches_is_empty_success() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"plain text").unwrap();

        let matches = service(dir.path())
            .find_by_content(dir.path(), "no-such-token")
            .await;
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn content_search_respects_ignore_dirs() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join(".git/config.txt"), b"needle").unwrap();
        fs::write(dir.path().join("real.txt"), b"needle").unwrap();

        let matches = service(dir.path()).find_by_content(dir.path(), "needle").await;
        assert_eq!(matches.len(), 1);
        assert!(matches[0].ends_with("real.txt"));
    }

    #[tokio::test]
    async fn content_search_denied_root_is_empty() {
        let dir = tempdir().unwrap();
        let other = tempdir().unwrap();
        fs::write(other.path().join("a.txt"), b"needle").unwrap();

        let matches = service(dir.path()).find_by_content(other.path(), "needle").await;
        assert!(matches.is_empty());
    }
}
