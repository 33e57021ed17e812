//! appraiser_cache_status tool implementation.
//!
//! Reports whether a filter set has a fresh cached result, without fetching.

use appraisers_client::AppraiserSearch;
use appraisers_core::{CacheDb, Error};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tools::FilterParams;

/// Output from the appraiser_cache_status tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheStatusOutput {
    /// Query cache key for the filters.
    pub cache_key: String,
    /// Whether a fresh entry exists.
    pub cached: bool,
    /// Records in the stored entry, fresh or expired.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

/// Implementation of the appraiser_cache_status tool.
pub async fn status_impl(
    engine: &AppraiserSearch, cache: &CacheDb, params: FilterParams,
) -> Result<CallToolResult, McpError> {
    let filters = params.into_filters();
    if !filters.has_any() {
        return Err(Error::InvalidQuery("at least one search filter must be set".into()).into());
    }

    let cache_key = engine.cache_key(&filters);
    let cached = engine.is_cached(&filters).await?;
    let meta = cache.get_query_meta(&cache_key).await?;

    let output = CacheStatusOutput {
        cache_key,
        cached,
        record_count: meta.as_ref().map(|m| m.record_count),
        fetched_at: meta.as_ref().map(|m| m.fetched_at.clone()),
        expires_at: meta.map(|m| m.expires_at),
    };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
