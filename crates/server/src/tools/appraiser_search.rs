//! appraiser_search tool implementation.
//!
//! Runs a roster query through the engine, served from the query cache when fresh.

use appraisers_client::{AppraiserSearch, SearchOptions};
use appraisers_core::{AppraiserRecord, Error, FilterField, SearchFilters};
use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The six roster search fields. At least one must be non-empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct FilterParams {
    /// Two-letter state code (e.g., "AK").
    #[serde(default)]
    pub state: Option<String>,

    /// License number.
    #[serde(default)]
    pub license: Option<String>,

    /// Appraiser last name.
    #[serde(default)]
    pub last_name: Option<String>,

    /// Appraiser first name.
    #[serde(default)]
    pub first_name: Option<String>,

    #[serde(default)]
    pub city: Option<String>,

    /// 5-digit ZIP code.
    #[serde(default)]
    pub zip: Option<String>,
}

impl FilterParams {
    pub fn into_filters(self) -> SearchFilters {
        let values = [self.state, self.license, self.last_name, self.first_name, self.city, self.zip];
        FilterField::ALL
            .into_iter()
            .zip(values)
            .fold(SearchFilters::new(), |filters, (field, value)| match value {
                Some(value) => filters.set(field, value),
                None => filters,
            })
    }
}

/// Input parameters for appraiser_search tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct AppraiserSearchParams {
    #[serde(flatten)]
    pub filters: FilterParams,

    /// Force a refresh, bypassing the cache.
    #[serde(default)]
    pub force_refresh: bool,
}

/// Output structure for appraiser_search tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AppraiserSearchOutput {
    /// Matching appraisers, ordered by last name then first name.
    pub records: Vec<AppraiserRecord>,
    /// Debug information.
    pub debug: DebugInfo,
}

/// Debug information.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DebugInfo {
    /// Cache hit status.
    pub cache_hit: bool,
    /// Result pages fetched from the roster (0 on a cache hit).
    pub pages_fetched: u32,
    /// Total matches reported by the roster, when fetched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_records: Option<u64>,
    /// Query cache key.
    pub cache_key: String,
}

/// Implementation of the appraiser_search tool.
pub async fn search_impl(engine: &AppraiserSearch, params: AppraiserSearchParams) -> Result<CallToolResult, McpError> {
    let filters = params.filters.into_filters();
    let options = SearchOptions { force_refresh: params.force_refresh };

    let outcome = engine.search(&filters, options).await?;

    let output = AppraiserSearchOutput {
        records: outcome.records,
        debug: DebugInfo {
            cache_hit: outcome.cache_hit,
            pages_fetched: outcome.pages_fetched,
            total_records: outcome.total_records,
            cache_key: outcome.cache_key,
        },
    };

    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
