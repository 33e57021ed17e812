//! HTTP form transport for the roster search endpoint.
//!
//! ### Request shape
//! - Form-encoded POST to the configured endpoint.
//! - Browser `User-Agent`, HTML `Accept`, `Referer` pointing at the search page.
//! - Redirects followed up to the configured limit (default: 5).
//!
//! ### Limits
//! - Request timeout (default: 20s).
//! - Max body bytes: 5MB (configurable), checked against `Content-Length` and the decoded body.
//!
//! Any failure here is reported as [`Error::Transport`] and never retried.

use std::time::{Duration, Instant};

use appraisers_core::config::{DEFAULT_ENDPOINT, DEFAULT_USER_AGENT};
use appraisers_core::{AppConfig, Error};
use async_trait::async_trait;
use reqwest::{Client, header};
use url::Url;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

/// Submits one search form and returns the response body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn submit(&self, form: &[(&'static str, String)]) -> Result<String, Error>;
}

/// Configuration for the form client.
#[derive(Debug, Clone)]
pub struct FormClientConfig {
    pub endpoint: String,

    /// User agent string (default: a desktop Chrome UA)
    pub user_agent: String,

    /// Referer header; defaults to the endpoint
    pub referer: String,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,
}

impl Default for FormClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            referer: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_millis(20000),
            max_redirects: 5,
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

impl From<&AppConfig> for FormClientConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            user_agent: config.user_agent.clone(),
            referer: config.referer().to_string(),
            timeout: config.timeout(),
            max_redirects: config.max_redirects,
            max_bytes: config.max_bytes,
        }
    }
}

/// reqwest-backed [`Transport`].
pub struct FormClient {
    http: Client,
    endpoint: Url,
    config: FormClientConfig,
}

impl FormClient {
    pub fn new(config: FormClientConfig) -> Result<Self, Error> {
        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| Error::InvalidInput(format!("invalid endpoint {}: {e}", config.endpoint)))?;

        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(
            header::REFERER,
            header::HeaderValue::from_str(&config.referer)
                .map_err(|e| Error::InvalidInput(format!("invalid referer: {e}")))?,
        );

        let http = Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, endpoint, config })
    }

    pub fn config(&self) -> &FormClientConfig {
        &self.config
    }

    fn too_large(&self, len: u64) -> Error {
        Error::Transport(format!("{len} bytes exceeds {}", self.config.max_bytes))
    }
}

#[async_trait]
impl Transport for FormClient {
    async fn submit(&self, form: &[(&'static str, String)]) -> Result<String, Error> {
        let start = Instant::now();

        let response = self
            .http
            .post(self.endpoint.clone())
            .form(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Transport(format!("timed out after {:?}", self.config.timeout))
                } else {
                    Error::Transport(format!("network error: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Transport(format!("status {}", status.as_u16())));
        }

        if let Some(len) = response.content_length()
            && len > self.config.max_bytes as u64
        {
            return Err(self.too_large(len));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(format!("failed to read response: {e}")))?;

        if body.len() > self.config.max_bytes {
            return Err(self.too_large(body.len() as u64));
        }

        tracing::debug!(
            endpoint = %self.endpoint,
            bytes = body.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "submitted search form"
        );

        Ok(body)
    }
}
