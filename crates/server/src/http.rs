use anyhow::{Context, Result};
use axum::{response::Json, routing::get, Router};
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpServerConfig, StreamableHttpService,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tooling::AccountTools;
use tracing::info;

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

/// `GET /health` plus the Streamable HTTP MCP endpoint at `/mcp`.
pub fn create_app(tools: AccountTools) -> Router {
    let mcp = StreamableHttpService::new(
        move || Ok(tools.clone()),
        Arc::new(LocalSessionManager::default()),
        StreamableHttpServerConfig::default(),
    );

    Router::new()
        .route("/health", get(health))
        .nest_service("/mcp", mcp)
}

pub async fn serve_http(tools: AccountTools, addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to address {}", addr))?;

    info!("Serving MCP over HTTP on http://{}/mcp", addr);

    axum::serve(listener, create_app(tools))
        .await
        .context("HTTP server failed")?;

    Ok(())
}
