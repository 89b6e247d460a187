//! # fsgate-guard
//!
//! Path containment boundary for fsgate.
//!
//! Every filesystem operation the server exposes goes through
//! [`AllowedRoots::validate`] before touching the disk. A candidate path is
//! expanded (environment variables, leading `~`), resolved to a canonical
//! absolute form, and accepted only if one of the configured allow-list
//! roots is the path itself or a strict ancestor of it — compared at path
//! component granularity after canonicalizing *both* sides, never by raw
//! string prefix.
//!
//! ## Key components
//!
//! - [`AllowedRoots`] — the immutable allow-list, the sole authority for
//!   "is this access permitted".
//! - [`resolve`] — expansion + canonicalization of a caller-supplied path.
//! - [`GuardError`] — `AccessDenied` (outside the allow-list) and
//!   `Resolution` (path cannot be canonicalized). Both propagate; a path
//!   that cannot be resolved cannot be proven contained.

pub mod error;
pub mod roots;

pub use error::GuardError;
pub use roots::{resolve, AllowedRoots};
