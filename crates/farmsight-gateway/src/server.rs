// SPDX-FileCopyrightText: 2026 Farmsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the telemetry API.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use farmsight_core::FarmsightError;
use farmsight_storage::Database;

use crate::handlers;

/// Shared state for axum request handlers.
///
/// The storage handle is owned for the process lifetime and injected into
/// every handler; there is no other connection to the database.
#[derive(Clone)]
pub struct GatewayState {
    pub db: Arc<Database>,
}

/// Gateway server configuration (mirrors ServerConfig from farmsight-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Build the telemetry API router.
///
/// Exposed separately from [`start_server`] so integration tests can drive
/// the router directly without binding a socket.
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/ping", get(handlers::get_ping))
        .route("/insert/{entity}", post(handlers::post_insert))
        .route("/get/{entity}", get(handlers::get_entity))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the gateway HTTP server.
///
/// Binds to the configured host:port and serves:
/// - GET /ping
/// - POST /insert/{entity}
/// - GET /get/{entity}
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), FarmsightError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| FarmsightError::Server {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| FarmsightError::Server {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}
