// ABOUTME: HTTP server assembly: router, middleware stack, listener and graceful shutdown
// ABOUTME: `build_router` is shared by the binary and the HTTP-level tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::constants::defaults::MAX_BODY_BYTES;
use crate::errors::{AppError, AppResult};
use crate::mcp::resources::ServerResources;
use crate::middleware::{propagate_request_id_layer, set_request_id_layer, setup_cors, trace_layer};
use crate::routes::api_router;

/// Complete application router with middleware applied
///
/// Layer order (outermost first): request ID assignment, propagation,
/// tracing, CORS, body limit.
pub fn build_router(resources: &Arc<ServerResources>) -> Router {
    api_router(resources)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(setup_cors(&resources.config.cors_allowed_origins))
        .layer(trace_layer())
        .layer(propagate_request_id_layer())
        .layer(set_request_id_layer())
}

/// Bind and serve until Ctrl+C or SIGTERM
///
/// # Errors
///
/// Returns an error if the address is invalid or the listener fails
pub async fn run(resources: Arc<ServerResources>) -> AppResult<()> {
    let host = &resources.config.host;
    let port = resources.config.http_port;
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| AppError::config(format!("Invalid listen address {host}:{port}: {e}")))?;

    let app = build_router(&resources);
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::internal(format!("Transport error: {e}")))?;
    info!("HTTP server listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Transport error: {e}")))?;

    resources.database.pool().close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Ctrl+C received, shutting down"),
        () = terminate => info!("SIGTERM received, shutting down"),
    }
}
