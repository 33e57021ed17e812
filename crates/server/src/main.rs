//! mcp-appraisers server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use anyhow::Result;
use appraisers_client::{AppraiserSearch, FormClient, FormClientConfig, SearchSettings};
use appraisers_core::{AppConfig, CacheDb};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    tracing::info!(
        endpoint = %config.endpoint,
        db_path = %config.db_path.display(),
        page_size = config.page_size,
        "Starting mcp-appraisers server on stdio transport"
    );

    let cache = CacheDb::open(&config.db_path).await?;
    let client = FormClient::new(FormClientConfig::from(&config))?;
    let engine = AppraiserSearch::new(client, cache.clone(), SearchSettings::from(&config));

    let handler = handler::McpAppraisersServer::new(engine, cache);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
