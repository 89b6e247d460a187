// ignore.rs — Static ignore table for search traversal.
//
// Directory and file name patterns excluded from recursive search: VCS
// metadata, dependency trees, build output, IDE state, OS noise, and
// language-specific caches. Not user-configurable at runtime.
//
// Matching is deliberately not a glob engine: a pattern is an exact name,
// a "*.suffix" suffix match, or a "prefix-*" prefix match. Nothing in the
// table needs more.

/// Name patterns pruned from search traversal.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    // VCS metadata
    ".git",
    ".svn",
    ".hg",
    ".bzr",
    // Dependency management
    "node_modules",
    "vendor",
    "bower_components",
    "packages",
    ".bundle",
    ".eggs",
    // Build output
    "build",
    "dist",
    "out",
    "target",
    "coverage",
    "bin",
    "logs",
    "log",
    "tmp",
    "*.log",
    "*.class",
    "*.jar",
    "*.war",
    "*.ear",
    // IDE and editor state
    ".idea",
    ".vscode",
    ".vscode-*",
    ".settings",
    // OS and hidden noise
    ".DS_Store",
    ".Trash",
    ".cache",
    ".local",
    "*.tmp",
    "*.swp",
    "*.swo",
    "*.bak",
    // Python caches
    "__pycache__",
    "*.pyc",
    "*.pyo",
    ".pytest_cache",
    ".mypy_cache",
    ".tox",
    ".coverage",
    ".ipynb_checkpoints",
];

/// The ignore table with exact/suffix/prefix matching.
#[derive(Debug, Clone, Copy)]
pub struct IgnoreList {
    patterns: &'static [&'static str],
}

impl Default for IgnoreList {
    fn default() -> Self {
        Self {
            patterns: DEFAULT_IGNORE_PATTERNS,
        }
    }
}

impl IgnoreList {
    /// Whether an entry name matches any ignore pattern.
    pub fn matches(&self, name: &str) -> bool {
        self.patterns.iter().any(|pattern| {
            if let Some(suffix) = pattern.strip_prefix('*') {
                name.ends_with(suffix)
            } else if let Some(prefix) = pattern.strip_suffix('*') {
                name.starts_with(prefix)
            } else {
                name == *pattern
            }
        })
    }

    /// Exclusion flags for a `grep` invocation.
    ///
    /// File globs ("*.log") become `--exclude`; everything else — plain
    /// directory names and directory prefixes like ".vscode-*" — becomes
    /// `--exclude-dir`, which grep itself matches as a glob.
    pub fn grep_exclude_flags(&self) -> Vec<String> {
        let mut flags = Vec::with_capacity(self.patterns.len() * 2);
        for pattern in self.patterns {
            if pattern.starts_with("*.") {
                flags.push("--exclude".to_string());
            } else {
                flags.push("--exclude-dir".to_string());
            }
            flags.push((*pattern).to_string());
        }
        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_names_match() {
        let ignore = IgnoreList::default();
        assert!(ignore.matches(".git"));
        assert!(ignore.matches("node_modules"));
        assert!(ignore.matches("__pycache__"));
        assert!(!ignore.matches("src"));
        assert!(!ignore.matches("gitlog"));
    }

    #[test]
    fn suffix_patterns_match() {
        let ignore = IgnoreList::default();
        assert!(ignore.matches("debug.log"));
        assert!(ignore.matches("editor.swp"));
        assert!(!ignore.matches("catalog"));
    }

    #[test]
    fn prefix_patterns_match() {
        let ignore = IgnoreList::default();
        assert!(ignore.matches(".vscode-test"));
        assert!(!ignore.matches("vscode"));
    }

    #[test]
    fn grep_flags_pair_each_pattern() {
        let ignore = IgnoreList::default();
        let flags = ignore.grep_exclude_flags();
        assert_eq!(flags.len(), DEFAULT_IGNORE_PATTERNS.len() * 2);

        let joined: Vec<&str> = flags.iter().map(String::as_str).collect();
        assert!(joined
            .windows(2)
            .any(|w| w == ["--exclude-dir", ".git"]));
        assert!(joined.windows(2).any(|w| w == ["--exclude", "*.log"]));
    }
}
