//! # fsgate-gateway
//!
//! The MCP server for fsgate.
//!
//! [`FsGatewayServer`] implements the rmcp `ServerHandler` trait, exposing
//! the sandboxed directory, file, and search services as MCP tools. Every
//! tool call validates its path arguments against the configured allow-list
//! before any I/O; denials surface as MCP errors for mutating and
//! existence-sensitive operations, while the search tools fail closed to
//! empty result lists.
//!
//! Tools:
//!   list_directory                      — immediate children of a directory
//!   create_directory                    — mkdir -p, idempotent
//!   file_exists                         — boolean existence check
//!   read_file                           — full text read
//!   write_file                          — create-or-truncate write
//!   append_to_file                      — append, creating parents
//!   find_files_with_substring_in_path   — filename substring search
//!   search_file_bodies_for_substring    — content substring search (grep)
//!
//! Also serves one illustrative read-only resource,
//! `users://{user_id}/profile`.

pub mod config;
pub mod resource;
pub mod server;

pub use config::GatewayConfig;
pub use server::FsGatewayServer;
