//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::tools::{
    AppraiserSearchParams, FilterParams,
    appraiser_search::search_impl,
    cache::{purge_impl, status_impl},
};

use appraisers_client::AppraiserSearch;
use appraisers_core::CacheDb;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for mcp-appraisers.
#[derive(Clone)]
pub struct McpAppraisersServer {
    tool_router: ToolRouter<Self>,
    engine: Arc<AppraiserSearch>,
    cache: CacheDb,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl McpAppraisersServer {
    /// Create a new server handler around a query engine and its cache.
    pub fn new(engine: AppraiserSearch, cache: CacheDb) -> Self {
        Self { tool_router: Self::tool_router(), engine: Arc::new(engine), cache }
    }

    /// Search the FHA licensed-appraiser roster.
    ///
    /// Walks every result page for the filters and caches the full result set.
    #[tool(
        description = "Search the HUD FHA licensed-appraiser roster by state, license, last_name, first_name, city or zip. At least one filter is required. Returns all matching appraisers as JSON."
    )]
    async fn appraiser_search(&self, params: Parameters<AppraiserSearchParams>) -> Result<CallToolResult, McpError> {
        search_impl(&self.engine, params.0).await
    }

    #[tool(description = "Report the query cache key for a set of roster filters and whether a fresh cached result exists. Never fetches.")]
    async fn appraiser_cache_status(&self, params: Parameters<FilterParams>) -> Result<CallToolResult, McpError> {
        status_impl(&self.engine, &self.cache, params.0).await
    }

    #[tool(description = "Delete expired entries from the roster query cache. Returns the number deleted.")]
    async fn cache_purge(&self) -> Result<CallToolResult, McpError> {
        purge_impl(&self.cache).await
    }
}

impl ServerHandler for McpAppraisersServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "mcp-appraisers".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::unreachable_engine;

    #[tokio::test]
    async fn test_tools_registered() {
        let (engine, cache) = unreachable_engine().await;
        let server = McpAppraisersServer::new(engine, cache);

        let mut names: Vec<String> = server.tool_router.list_all().into_iter().map(|t| t.name.to_string()).collect();
        names.sort();
        assert_eq!(names, ["appraiser_cache_status", "appraiser_search", "cache_purge"]);
    }

    #[tokio::test]
    async fn test_server_info() {
        let (engine, cache) = unreachable_engine().await;
        let info = McpAppraisersServer::new(engine, cache).get_info();
        assert_eq!(info.server_info.name, "mcp-appraisers");
        assert!(info.capabilities.tools.is_some());
    }
}
