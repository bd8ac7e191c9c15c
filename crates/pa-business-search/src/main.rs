mod config;
mod detail;
mod error;
mod lookup;
mod model;
mod normalize;
mod search;
mod server;
#[cfg(test)]
mod test_support;
mod wire;

use std::sync::Arc;

use filing_common::http::{HttpClientConfig, JsonClient};
use rmcp::{ServiceExt, transport::stdio};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use detail::DetailFetcher;
use search::SearchClient;
use server::BusinessSearchServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries MCP JSON-RPC
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting pa-business-search MCP server");

    let config = Config::from_env()?;
    let http_config =
        HttpClientConfig::from_env(concat!("pa-business-search/", env!("CARGO_PKG_VERSION")));
    info!(
        state = %config.state,
        base_url = %config.base_url,
        timeout_ms = http_config.timeout.map(|t| t.as_millis() as u64),
        "configuration loaded"
    );

    let http = Arc::new(JsonClient::new(http_config)?);
    let search = Arc::new(SearchClient::new(Arc::clone(&http), config));
    let details = Arc::new(DetailFetcher::new(http, Arc::clone(&search)));

    let server = BusinessSearchServer::new(search, details);

    info!("MCP server ready, serving on stdio");
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!(error = %e, "MCP server error");
    })?;

    service.waiting().await?;
    info!("MCP server shut down");
    Ok(())
}
