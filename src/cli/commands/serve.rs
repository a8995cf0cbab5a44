//! Serve command: run the MCP server over stdio.

use crate::api::{ApiClient, ApiConfig};
use crate::config::Settings;
use crate::mcp::{Dispatcher, McpServer};
use anyhow::Result;

/// Build the dispatcher from settings and serve until stdin closes.
///
/// The credential is resolved before any input is read; a missing key is an error.
pub async fn run_serve(settings: Settings) -> Result<()> {
    let config = ApiConfig::from_settings(&settings)?;
    tracing::info!(base_url = %config.base_url(), "Upstream configured");

    let client = ApiClient::new(config)?;
    let server = McpServer::new(Dispatcher::new(client, settings.models));
    server.run().await
}
