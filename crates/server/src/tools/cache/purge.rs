//! cache_purge tool implementation.
//!
//! Deletes expired query cache entries.

use appraisers_core::{CacheDb, Error};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output from the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeOutput {
    /// Number of entries deleted.
    pub deleted: u64,
}

/// Implementation of the cache_purge tool.
pub async fn purge_impl(cache: &CacheDb) -> Result<CallToolResult, McpError> {
    let deleted = cache.purge_expired_queries().await?;
    tracing::info!(deleted, "purged expired query cache entries");

    let output = CachePurgeOutput { deleted };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
