//! # fsgate-search
//!
//! Sandboxed search for fsgate: filenames by substring, file bodies by
//! substring.
//!
//! Name search walks the directory tree under a validated root, pruning
//! subtrees named in the [`IgnoreList`] before descending. Content search
//! shells out to `grep -irl` with exclusion flags derived from the same
//! list. Both re-validate every result against the allow-list after
//! canonicalization — a symlinked subdirectory can carry results outside
//! the sandbox even when the search root itself validated — and silently
//! drop anything that fails.
//!
//! Search is advisory: the public methods fail closed, degrading denial
//! or unexpected error to an empty result list instead of aborting the
//! caller's broader task. The underlying fallible versions are kept
//! internal.

pub mod error;
pub mod ignore;
pub mod service;

pub use error::SearchError;
pub use ignore::IgnoreList;
pub use service::SearchService;
