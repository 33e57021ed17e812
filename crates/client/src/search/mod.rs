//! Query engine for the appraiser roster.
//!
//! One logical query is a [`SearchFilters`] value. The engine derives its cache
//! key, serves fresh cache entries verbatim, and otherwise walks the result pages
//! one at a time until the pager stops offering a next page. Only a complete
//! result set is ever cached.

pub mod form;

pub use form::{SORT_ORDER, build_form};

use std::time::{Duration, Instant};

use appraisers_core::{
    AppConfig, AppraiserRecord, CacheDb, DEFAULT_PAGE_SIZE, Error, MAX_CACHE_TTL_SECS, Page, SearchFilters,
    compute_query_key,
};
use serde::{Deserialize, Serialize};

use crate::extract::{ResultPage, extract_page};
use crate::fetch::Transport;

/// Paging and caching parameters for the engine.
#[derive(Debug, Clone, Copy)]
pub struct SearchSettings {
    /// Rows requested per page (default: 50)
    pub page_size: u32,
    /// Lifetime of a cached result set (default: 1h, capped at 10 years)
    pub cache_ttl: Duration,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self { page_size: DEFAULT_PAGE_SIZE, cache_ttl: Duration::from_secs(3600) }
    }
}

impl From<&AppConfig> for SearchSettings {
    fn from(config: &AppConfig) -> Self {
        Self { page_size: config.page_size, cache_ttl: config.cache_ttl() }
    }
}

/// Per-call options.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchOptions {
    /// Skip the cache read; the fresh result still replaces the cached one.
    pub force_refresh: bool,
}

/// Result of one [`AppraiserSearch::search`] call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub records: Vec<AppraiserRecord>,
    pub cache_key: String,
    pub cache_hit: bool,
    /// Zero on a cache hit.
    pub pages_fetched: u32,
    /// Total reported by the first page; None on a cache hit or when the page omits it.
    pub total_records: Option<u64>,
}

/// Paginating, caching search over a [`Transport`].
pub struct AppraiserSearch {
    transport: Box<dyn Transport>,
    cache: CacheDb,
    settings: SearchSettings,
}

impl AppraiserSearch {
    pub fn new(transport: impl Transport + 'static, cache: CacheDb, settings: SearchSettings) -> Self {
        Self { transport: Box::new(transport), cache, settings }
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// Cache key for a filter set. Pagination never contributes.
    pub fn cache_key(&self, filters: &SearchFilters) -> String {
        compute_query_key(filters)
    }

    /// Whether a fresh cached result exists for these filters. Never fetches.
    pub async fn is_cached(&self, filters: &SearchFilters) -> Result<bool, Error> {
        self.cache.has_query(&self.cache_key(filters)).await
    }

    /// All records matching the filters, from cache when fresh.
    pub async fn fetch_all(&self, filters: &SearchFilters) -> Result<Vec<AppraiserRecord>, Error> {
        Ok(self.search(filters, SearchOptions::default()).await?.records)
    }

    /// [`fetch_all`](Self::fetch_all) with options and bookkeeping.
    pub async fn search(&self, filters: &SearchFilters, options: SearchOptions) -> Result<SearchOutcome, Error> {
        if !filters.has_any() {
            return Err(Error::InvalidQuery("at least one search filter must be set".into()));
        }

        let cache_key = self.cache_key(filters);

        if !options.force_refresh
            && let Some(records) = self.cached_records(&cache_key).await?
        {
            tracing::debug!(cache_key = %cache_key, records = records.len(), "query cache hit");
            return Ok(SearchOutcome { records, cache_key, cache_hit: true, pages_fetched: 0, total_records: None });
        }

        let start = Instant::now();
        let page_size = self.settings.page_size;
        let mut page = Page::first(page_size);
        let mut records = Vec::new();
        let mut pages_fetched = 0u32;
        let mut total_records = None;

        loop {
            let result = self.fetch_page(filters, page).await?;
            pages_fetched += 1;
            if pages_fetched == 1 {
                total_records = result.total_records;
            }
            records.extend(result.rows);

            if !result.can_continue {
                break;
            }
            page = page.next(page_size);
        }

        self.store(&cache_key, filters, &records).await;

        tracing::info!(
            cache_key = %cache_key,
            records = records.len(),
            pages = pages_fetched,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "query complete"
        );

        Ok(SearchOutcome { records, cache_key, cache_hit: false, pages_fetched, total_records })
    }

    /// Submit and extract a single page. No caching.
    pub async fn fetch_page(&self, filters: &SearchFilters, page: Page) -> Result<ResultPage, Error> {
        let form = build_form(filters, page);
        let body = self.transport.submit(&form).await?;
        let result = extract_page(&body)?;

        tracing::debug!(
            start_at = page.start_at,
            max_rows = page.max_rows,
            rows = result.rows.len(),
            can_continue = result.can_continue,
            "fetched result page"
        );

        Ok(result)
    }

    async fn cached_records(&self, cache_key: &str) -> Result<Option<Vec<AppraiserRecord>>, Error> {
        let Some(json) = self.cache.get_query(cache_key).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&json) {
            Ok(records) => Ok(Some(records)),
            Err(e) => {
                tracing::warn!(cache_key = %cache_key, "ignoring corrupt cache entry: {}", e);
                Ok(None)
            }
        }
    }

    async fn store(&self, cache_key: &str, filters: &SearchFilters, records: &[AppraiserRecord]) {
        if let Err(e) = self.try_store(cache_key, filters, records).await {
            tracing::warn!(cache_key = %cache_key, "failed to cache query result: {}", e);
        }
    }

    async fn try_store(&self, cache_key: &str, filters: &SearchFilters, records: &[AppraiserRecord]) -> Result<(), Error> {
        let filters_json = serde_json::to_string(filters).map_err(|e| Error::CacheCorrupt(e.to_string()))?;
        let records_json = serde_json::to_string(records).map_err(|e| Error::CacheCorrupt(e.to_string()))?;
        let ttl = self.settings.cache_ttl.as_secs().min(MAX_CACHE_TTL_SECS) as i64;

        self.cache
            .put_query(cache_key, &filters_json, &records_json, records.len(), ttl)
            .await
    }
}
