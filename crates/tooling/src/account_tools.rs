use directory::{AccountCreationRequest, AccountCreator, CreationOutcome, DirectoryReader, UserListing};
use rmcp::{
    handler::server::{
        router::tool::ToolRouter,
        wrapper::{Json, Parameters},
    },
    model::{Implementation, ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router, ServerHandler,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

pub const SERVER_NAME: &str = "useradd";
pub const SERVER_VERSION: &str = "v0.0.1";

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListUsersArgs {
    /// the optional username to filter by
    #[serde(default)]
    pub username: Option<String>,
}

/// The `ListUsers` and `AddUser` tools, served as one MCP server.
#[derive(Clone)]
pub struct AccountTools {
    reader: Arc<DirectoryReader>,
    creator: Arc<AccountCreator>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl AccountTools {
    pub fn new(reader: Arc<DirectoryReader>, creator: Arc<AccountCreator>) -> Self {
        Self {
            reader,
            creator,
            tool_router: Self::tool_router(),
        }
    }

    // A listing failure becomes an `isError` result, not a protocol error.
    #[tool(name = "ListUsers", description = "A tool to list the users on the system")]
    async fn list_users(
        &self,
        Parameters(args): Parameters<ListUsersArgs>,
    ) -> Result<Json<UserListing>, String> {
        info!(tool = "ListUsers", "Tool called");

        self.reader
            .list_users(args.username.as_deref())
            .await
            .map(Json)
            .map_err(|e| {
                warn!(tool = "ListUsers", error = %e, "Tool execution failed");
                e.to_string()
            })
    }

    // A useradd run that exits non-zero is still a normal result with
    // `success: false`; only a launch failure is an error.
    #[tool(name = "AddUser", description = "A tool to add a new user to the system")]
    async fn add_user(
        &self,
        Parameters(request): Parameters<AccountCreationRequest>,
    ) -> Result<Json<CreationOutcome>, String> {
        info!(tool = "AddUser", "Tool called");

        self.creator
            .create_account(&request)
            .await
            .map(Json)
            .map_err(|e| {
                warn!(tool = "AddUser", error = %e, "Tool execution failed");
                e.to_string()
            })
    }
}

#[tool_handler]
impl ServerHandler for AccountTools {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
                ..Default::default()
            },
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
