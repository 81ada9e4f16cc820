//! Streamable-HTTP style transport: one JSON-RPC message per POST.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::error::ServerResult;
use crate::protocol::SERVER_NAME;
use crate::server::NpmMcpServer;

pub async fn serve(server: Arc<NpmMcpServer>, addr: String) -> ServerResult<()> {
    let app = router(server);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("HTTP transport listening on {addr}");

    axum::serve(listener, app).await?;
    Ok(())
}

pub fn router(server: Arc<NpmMcpServer>) -> Router {
    Router::new()
        .route("/mcp", post(handle_mcp))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(server)
}

/// The body is read as text so malformed JSON still gets a JSON-RPC error.
async fn handle_mcp(State(server): State<Arc<NpmMcpServer>>, body: String) -> Response {
    match server.handle_message(&body).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": SERVER_NAME,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
