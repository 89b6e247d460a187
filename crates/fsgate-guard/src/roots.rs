// roots.rs — Allow-list resolution and containment checks.
//
// The containment rule: a resolved path is permitted iff it equals one of
// the allowed roots or has one as a strict ancestor, where both the
// candidate and the roots are canonicalized at validation time. Comparing
// canonical forms component-by-component (Path::starts_with) is what makes
// "/tmp/allowed-evil" fail against root "/tmp/allowed" — a raw string
// prefix check would let it through.
//
// Roots are re-canonicalized on every call rather than once at startup:
// a symlink in a root's ancestry can change between calls, and a stale
// cached form would then compare against the wrong subtree.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::GuardError;

/// The configured allow-list: an ordered set of root directories every
/// operation must stay inside. Immutable after construction; safe to share
/// across concurrent tool invocations.
#[derive(Debug, Clone)]
pub struct AllowedRoots {
    /// Expanded (env vars, `~`) but not canonicalized — canonicalization
    /// happens per validation call.
    roots: Vec<PathBuf>,
}

impl AllowedRoots {
    /// Build the allow-list from configured directories, expanding env
    /// var references and a leading `~` in each entry.
    ///
    /// Rejects an empty list: a server with no allowed roots can permit
    /// nothing and is almost certainly a configuration mistake.
    pub fn new<I, P>(dirs: I) -> Result<Self, GuardError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let roots: Vec<PathBuf> = dirs
            .into_iter()
            .map(|d| expand(&d.as_ref().to_string_lossy()))
            .collect();

        if roots.is_empty() {
            return Err(GuardError::EmptyAllowList);
        }

        Ok(Self { roots })
    }

    /// The configured (expanded) roots.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Resolve a caller-supplied path and check containment.
    ///
    /// Returns the canonical absolute path on success. Resolution failure
    /// and denial both propagate as errors — callers that want to degrade
    /// (file_exists, the search tools) do so themselves.
    pub fn validate(&self, candidate: impl AsRef<Path>) -> Result<PathBuf, GuardError> {
        let resolved = resolve(candidate.as_ref())?;

        if self.contains(&resolved) {
            Ok(resolved)
        } else {
            tracing::warn!(
                path = %resolved.display(),
                allowed = ?self.roots,
                "access denied: path outside allow-list"
            );
            Err(GuardError::AccessDenied { path: resolved })
        }
    }

    /// Containment check for an already-resolved path.
    ///
    /// Used by the search subsystem to re-validate every traversal result
    /// (a symlinked subdirectory can carry a walk outside the sandbox even
    /// when the search root itself validated).
    pub fn contains(&self, resolved: &Path) -> bool {
        for root in &self.roots {
            // A root that cannot be canonicalized right now (deleted,
            // permission change) grants nothing for this call.
            let Ok(canonical_root) = fs::canonicalize(root) else {
                continue;
            };
            if resolved.starts_with(&canonical_root) {
                return true;
            }
        }
        false
    }
}

/// Resolve a path to canonical absolute form: expand env vars and `~`,
/// absolutize against the current directory, then canonicalize.
///
/// The trailing components of the path are allowed not to exist (a write
/// may target a new file); the deepest existing ancestor is canonicalized
/// through the filesystem — symlinks followed — and the non-existent tail
/// is appended with `.`/`..` normalized lexically. Any other failure
/// (inaccessible intermediate component) is a [`GuardError::Resolution`].
pub fn resolve(path: &Path) -> Result<PathBuf, GuardError> {
    let expanded = expand(&path.to_string_lossy());

    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        let cwd = env::current_dir().map_err(|source| GuardError::Resolution {
            path: path.to_path_buf(),
            source,
        })?;
        cwd.join(expanded)
    };

    soft_canonicalize(&absolute).map_err(|source| GuardError::Resolution {
        path: path.to_path_buf(),
        source,
    })
}

/// Expand `$VAR`/`${VAR}` references and a leading `~`.
///
/// Unset variables are left literal rather than expanded to empty, so a
/// typo'd reference fails containment loudly instead of silently pointing
/// somewhere else.
fn expand(raw: &str) -> PathBuf {
    let with_env = expand_env(raw);
    expand_tilde(&with_env)
}

fn expand_env(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }

        match chars.peek() {
            Some(&(start, '{')) => {
                // ${VAR}
                if let Some(end) = raw[start..].find('}') {
                    let name = &raw[start + 1..start + end];
                    match env::var(name) {
                        Ok(value) => out.push_str(&value),
                        Err(_) => {
                            out.push('$');
                            out.push_str(&raw[start..=start + end]);
                        }
                    }
                    // Skip past the closing brace.
                    while let Some(&(i, _)) = chars.peek() {
                        if i > start + end {
                            break;
                        }
                        chars.next();
                    }
                } else {
                    out.push('$');
                }
            }
            Some(&(start, c0)) if c0.is_ascii_alphanumeric() || c0 == '_' => {
                // $VAR — the name is the longest [A-Za-z0-9_] run.
                let mut end = start;
                while let Some(&(i, c1)) = chars.peek() {
                    if c1.is_ascii_alphanumeric() || c1 == '_' {
                        end = i;
                        chars.next();
                    } else {
                        break;
                    }
                }
                let name = &raw[start..=end];
                match env::var(name) {
                    Ok(value) => out.push_str(&value),
                    Err(_) => {
                        out.push('$');
                        out.push_str(name);
                    }
                }
            }
            _ => out.push('$'),
        }
    }

    out
}

fn expand_tilde(raw: &str) -> PathBuf {
    if raw == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(raw)
}

/// Canonicalize a path whose trailing components may not exist yet.
///
/// Walks up from the full path until `fs::canonicalize` succeeds, then
/// re-appends the missing components. `.` and `..` in the missing tail are
/// normalized lexically — they cannot pass through a symlink, because
/// nothing in the tail exists on disk.
fn soft_canonicalize(path: &Path) -> io::Result<PathBuf> {
    let mut missing: Vec<OsString> = Vec::new();
    let mut probe = path.to_path_buf();

    let base = loop {
        match fs::canonicalize(&probe) {
            Ok(canonical) => break canonical,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let Some(parent) = probe.parent() else {
                    // Even the filesystem root failed — nothing to do.
                    return Err(e);
                };
                // The last component of `probe`, kept for re-appending.
                match probe.components().next_back() {
                    Some(Component::Normal(name)) => missing.push(name.to_os_string()),
                    Some(Component::ParentDir) => missing.push(OsString::from("..")),
                    Some(Component::CurDir) | None => {}
                    Some(_) => return Err(e),
                }
                probe = parent.to_path_buf();
            }
            Err(e) => return Err(e),
        }
    };

    let mut result = base;
    for component in missing.iter().rev() {
        if component == ".." {
            result.pop();
        } else {
            result.push(component);
        }
    }
    Ok(result)
}
