//! MCP server implementation for the hosted CRM.
//!
//! This module provides the MCP protocol server that exposes the CRM's
//! records, reports and spreadsheet tools to AI assistants.

pub mod handlers;

pub use handlers::CrmMcpServer;

use anyhow::Result;
use rmcp::transport::io::stdio;
use rmcp::ServiceExt;

/// Run the CRM MCP server with stdio transport.
///
/// This function starts the MCP server and runs it until the client
/// disconnects. It communicates via stdin/stdout using the MCP protocol.
pub async fn run_server(server: CrmMcpServer) -> Result<()> {
    let service = server.serve(stdio()).await?;

    service.waiting().await?;

    Ok(())
}
