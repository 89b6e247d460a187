// config.rs — Gateway configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Configuration for the gateway server.
///
/// The allow-list is the whole configuration: the set of directory trees
/// tool calls are permitted to touch. Entries may contain `~` and
/// environment variable references; expansion happens when the allow-list
/// is built at startup. At least one entry is required — an empty list is
/// rejected by [`crate::FsGatewayServer::new`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Directories the server may operate in, each the root of a
    /// permitted subtree.
    pub allowed_dirs: Vec<PathBuf>,
}

impl GatewayConfig {
    pub fn new<I, P>(allowed_dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        Self {
            allowed_dirs: allowed_dirs
                .into_iter()
                .map(|p| p.as_ref().to_path_buf())
                .collect(),
        }
    }
}
