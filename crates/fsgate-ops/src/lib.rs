//! # fsgate-ops
//!
//! Sandboxed directory and file operations for fsgate.
//!
//! Two stateless services, each holding a shared [`AllowedRoots`] and
//! validating every path argument through it before any I/O:
//!
//! - [`DirectoryService`] — list a directory's immediate children, create
//!   a directory (with parents, idempotently).
//! - [`FileService`] — existence check, full-text read, create-or-truncate
//!   write, and append. Write does *not* create missing parent
//!   directories; append does. The asymmetry is deliberate: a write
//!   implies an expected pre-existing location, an append is log-like
//!   and tolerant.
//!
//! Guard failures always propagate as errors here — silently proceeding
//! would void the sandbox contract. The single exception is
//! [`FileService::exists`], which collapses denial and absence into
//! `false` by design.

pub mod dir;
pub mod error;
pub mod file;

pub use dir::DirectoryService;
pub use error::OpsError;
pub use file::{FileService, OperationResult};

pub use fsgate_guard::AllowedRoots;
