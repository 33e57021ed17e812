//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (APPRAISERS_*)
//! 2. TOML config file (if APPRAISERS_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::appraiser::DEFAULT_PAGE_SIZE;

mod validation;

pub use validation::{ConfigError, MAX_CACHE_TTL_SECS};

/// Roster search form endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://entp.hud.gov/idapp/html/appr1.cfm";

/// The roster rejects obvious non-browser clients, so a desktop browser UA is the default.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_11_5) AppleWebKit/537.36 \
                                      (KHTML, like Gecko) Chrome/50.0.2661.102 Safari/537.36";

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (APPRAISERS_*)
/// 2. TOML config file (if APPRAISERS_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to SQLite cache database.
    ///
    /// Set via APPRAISERS_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Search form endpoint the query is POSTed to.
    ///
    /// Set via APPRAISERS_ENDPOINT environment variable.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Referer header sent with every submission. Defaults to the endpoint.
    ///
    /// Set via APPRAISERS_REFERER environment variable.
    #[serde(default)]
    pub referer: Option<String>,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via APPRAISERS_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via APPRAISERS_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum bytes accepted per result page.
    ///
    /// Set via APPRAISERS_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Maximum number of redirects followed per submission.
    ///
    /// Set via APPRAISERS_MAX_REDIRECTS environment variable.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Rows requested per result page.
    ///
    /// Set via APPRAISERS_PAGE_SIZE environment variable.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Lifetime of a cached query result in seconds.
    ///
    /// Set via APPRAISERS_CACHE_TTL_SECS environment variable.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./appraisers-cache.sqlite")
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.into()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_max_redirects() -> usize {
    5
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_cache_ttl_secs() -> u64 {
    3600
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            endpoint: default_endpoint(),
            referer: None,
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            max_bytes: default_max_bytes(),
            max_redirects: default_max_redirects(),
            page_size: default_page_size(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Cache TTL as Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Referer header value, falling back to the endpoint.
    pub fn referer(&self) -> &str {
        self.referer.as_deref().unwrap_or(&self.endpoint)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `APPRAISERS_`
    /// 2. TOML file from `APPRAISERS_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("APPRAISERS_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("APPRAISERS_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
