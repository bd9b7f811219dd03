//! CRM MCP Server - Main entry point
//!
//! This is the main executable for the CRM MCP Server, which provides a Model Context
//! Protocol (MCP) interface to a hosted multi-tenant CRM.

use anyhow::Result;
use crm_mcp_server::client::{AsyncCrmClient, AsyncCrmClientImpl};
use crm_mcp_server::{Config, CrmClient, CrmMcpServer, Repositories};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Logging goes to stderr only; stdout carries MCP traffic. `RUST_LOG` wins over `level`.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = match Config::from_env() {
        Ok(cfg) => {
            init_tracing(&cfg.log_level);
            info!("Configuration loaded successfully");
            cfg
        }
        Err(e) => {
            init_tracing("error");
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    info!(
        "Starting CRM MCP Server with backend URL: {}",
        config.supabase_url
    );

    let async_client = Arc::new(AsyncCrmClientImpl::new(CrmClient::new(&config)));
    let metrics = async_client.metrics().clone();
    let client = async_client as Arc<dyn AsyncCrmClient>;

    // Every repository is scoped to the user behind the access token
    let user = match client.current_user().await {
        Ok(user) => user,
        Err(e) => {
            error!("Could not resolve the signed-in user: {}", e);
            return Err(e.into());
        }
    };
    info!("Authenticated as user {}", user.id);

    let repos = Repositories::rest(client, &user.id);
    let server = CrmMcpServer::new(repos, &config);
    info!(
        "CRM MCP Server initialized (match threshold {}, preview rows {})",
        config.contact_match_threshold, config.import_preview_rows
    );

    info!("Starting MCP server with stdio transport");
    crm_mcp_server::server::run_server(server).await?;

    let summary = metrics.summary();
    info!(
        "HTTP requests: {} ({} errors, avg {:.1} ms), rows fetched: {}, rows written: {}",
        summary.http_requests_total,
        summary.http_errors_total,
        summary.http_duration_avg_ms,
        summary.rows_fetched_total,
        summary.rows_written_total
    );
    info!("CRM MCP Server shutdown complete");
    Ok(())
}
