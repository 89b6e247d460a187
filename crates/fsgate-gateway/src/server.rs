// server.rs — MCP server wiring for fsgate.
//
// FsGatewayServer implements the rmcp ServerHandler trait, exposing the
// directory, file, and search services as MCP tools. The services share
// one immutable AllowedRoots; nothing here holds mutable state, so tool
// calls can be dispatched concurrently without locking.
//
// Error policy (mirrors the service layer):
//   list/create/read/write/append — guard failures become MCP errors
//   file_exists                   — denial collapses to `false`
//   both search tools             — fail closed to empty lists

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::service::RequestContext;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, RoleServer, ServerHandler};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use fsgate_guard::{AllowedRoots, GuardError};
use fsgate_ops::{DirectoryService, FileService, OpsError};
use fsgate_search::SearchService;

use crate::config::GatewayConfig;
use crate::resource::{self, USER_PROFILE_URI_TEMPLATE};

// ── Tool parameter types ─────────────────────────────────────────

/// Parameters for `list_directory`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListDirectoryParams {
    /// The path to the directory to list.
    pub dir_path: String,
}

/// Parameters for `create_directory`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateDirectoryParams {
    /// The path to the directory to create. Missing parents are created.
    pub dir_path: String,
}

/// Parameters for `file_exists`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct FileExistsParams {
    /// The path to the file to check.
    pub file_path: String,
}

/// Parameters for `read_file`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ReadFileParams {
    /// The path to the file to read.
    pub file_path: String,
}

/// Parameters for `write_file`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct WriteFileParams {
    /// The path to the file to write.
    pub file_path: String,
    /// The content to write to the file.
    pub content: String,
}

/// Parameters for `append_to_file`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct AppendToFileParams {
    /// The path to the file to append to.
    pub file_path: String,
    /// The content to append to the file.
    pub content: String,
}

/// Parameters for `find_files_with_substring_in_path`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct FindFilesParams {
    /// The directory to search under.
    pub search_path: String,
    /// The substring to look for in file names (case-insensitive).
    pub substring: String,
}

/// Parameters for `search_file_bodies_for_substring`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchBodiesParams {
    /// The directory to search under.
    pub search_path: String,
    /// The text to look for in file contents (case-insensitive).
    pub text: String,
}

// ── MCP Server ───────────────────────────────────────────────────

/// The fsgate MCP server. Holds the sandboxed services and the tool router.
pub struct FsGatewayServer {
    dirs: DirectoryService,
    files: FileService,
    search: SearchService,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl FsGatewayServer {
    /// Create a server from config.
    ///
    /// Fails if the allow-list is empty — a server that can touch nothing
    /// is a configuration mistake, not a useful deployment.
    pub fn new(config: GatewayConfig) -> Result<Self, GuardError> {
        let roots = Arc::new(AllowedRoots::new(config.allowed_dirs)?);
        tracing::info!(allowed = ?roots.roots(), "gateway initialized");

        Ok(Self {
            dirs: DirectoryService::new(Arc::clone(&roots)),
            files: FileService::new(Arc::clone(&roots)),
            search: SearchService::new(roots),
            tool_router: Self::tool_router(),
        })
    }

    // ── Directory tools ──────────────────────────────────────

    #[tool(
        description = "List the contents of a directory. Returns the immediate child file and directory names."
    )]
    fn list_directory(
        &self,
        Parameters(params): Parameters<ListDirectoryParams>,
    ) -> Result<CallToolResult, McpError> {
        let names = self.dirs.list(&params.dir_path).map_err(ops_error)?;
        json_content(&names)
    }

    #[tool(
        description = "Create a new directory at the specified path, including any missing parent directories. Succeeds if the directory already exists. Returns the resolved path."
    )]
    fn create_directory(
        &self,
        Parameters(params): Parameters<CreateDirectoryParams>,
    ) -> Result<CallToolResult, McpError> {
        let created = self.dirs.create(&params.dir_path).map_err(ops_error)?;
        Ok(CallToolResult::success(vec![Content::text(
            created.display().to_string(),
        )]))
    }

    // ── File tools ───────────────────────────────────────────

    #[tool(
        description = "Check if a file exists at the specified path. Returns false for paths outside the allowed directories."
    )]
    fn file_exists(
        &self,
        Parameters(params): Parameters<FileExistsParams>,
    ) -> Result<CallToolResult, McpError> {
        json_content(&self.files.exists(&params.file_path))
    }

    #[tool(description = "Read the contents of a file at the specified path as text.")]
    fn read_file(
        &self,
        Parameters(params): Parameters<ReadFileParams>,
    ) -> Result<CallToolResult, McpError> {
        let content = self.files.read(&params.file_path).map_err(ops_error)?;
        Ok(CallToolResult::success(vec![Content::text(content)]))
    }

    #[tool(
        description = "Write content to a file, creating or truncating it. Parent directories are NOT created — the target directory must already exist."
    )]
    fn write_file(
        &self,
        Parameters(params): Parameters<WriteFileParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = self
            .files
            .write(&params.file_path, &params.content)
            .map_err(ops_error)?;
        json_content(&result)
    }

    #[tool(
        description = "Append content to the end of a file, creating the file and any missing parent directories if needed."
    )]
    fn append_to_file(
        &self,
        Parameters(params): Parameters<AppendToFileParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = self
            .files
            .append(&params.file_path, &params.content)
            .map_err(ops_error)?;
        json_content(&result)
    }

    // ── Search tools ─────────────────────────────────────────

    #[tool(
        description = "Search a directory tree for files whose name contains a substring (case-insensitive). Ignored directories (.git, node_modules, build output, ...) are skipped. Returns matching paths; an empty list on denial or error."
    )]
    fn find_files_with_substring_in_path(
        &self,
        Parameters(params): Parameters<FindFilesParams>,
    ) -> Result<CallToolResult, McpError> {
        let matches = self.search.find_by_name(&params.search_path, &params.substring);
        json_content(&matches)
    }

    #[tool(
        description = "Search file contents under a directory for a text substring (case-insensitive). Returns the paths of matching files; an empty list on denial, no matches, or error."
    )]
    async fn search_file_bodies_for_substring(
        &self,
        Parameters(params): Parameters<SearchBodiesParams>,
    ) -> Result<CallToolResult, McpError> {
        let matches = self
            .search
            .find_by_content(&params.search_path, &params.text)
            .await;
        json_content(&matches)
    }
}

// ── ServerHandler implementation ─────────────────────────────────

#[tool_handler]
impl ServerHandler for FsGatewayServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: "fsgate".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: Some("fsgate".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Sandboxed filesystem MCP server. All operations are \
                 confined to the directories the server was started with; \
                 paths outside the allow-list are denied."
                    .into(),
            ),
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        let mut profile = RawResource::new(USER_PROFILE_URI_TEMPLATE, "user_profile");
        profile.description = Some("Sample read-only user profile record".to_string());
        profile.mime_type = Some("application/json".to_string());
        Ok(ListResourcesResult {
            resources: vec![profile.no_annotation()],
            next_cursor: None,
            meta: None,
        })
    }

    async fn read_resource(
        &self,
        ReadResourceRequestParam { uri, .. }: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        let Some(user_id) = resource::parse_profile_uri(&uri) else {
            return Err(McpError::resource_not_found(
                format!("unknown resource: {uri}"),
                None,
            ));
        };
        let profile = resource::user_profile(user_id);
        let json = serde_json::to_string(&profile)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(json, uri)],
        })
    }
}

// ── Helpers ──────────────────────────────────────────────────────

/// Wrap a serializable value as a successful JSON tool result.
fn json_content<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let content =
        Content::json(value).map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![content]))
}

/// Map a service error to an MCP error.
///
/// Denials are invalid requests (the caller asked for something the
/// sandbox forbids); missing/wrong-kind targets are invalid params;
/// everything else is internal.
fn ops_error(e: OpsError) -> McpError {
    match &e {
        OpsError::Guard(GuardError::AccessDenied { .. }) => {
            McpError::invalid_request(e.to_string(), None)
        }
        OpsError::Guard(_) | OpsError::NotFound { .. } | OpsError::InvalidTarget { .. } => {
            McpError::invalid_params(e.to_string(), None)
        }
        OpsError::Io { .. } => McpError::internal_error(e.to_string(), None),
    }
}
