// ABOUTME: Liveness endpoint reporting database reachability and enabled integrations
// ABOUTME: Served at /health outside the /api prefix
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};
use tracing::warn;

use crate::constants::protocol::SERVER_VERSION;
use crate::constants::service_names::SGT_CHEF_SERVER;
use crate::mcp::resources::ServerResources;

/// Health routes handler
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create health routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/health", get(Self::health))
            .with_state(resources)
    }

    async fn health(State(resources): State<Arc<ServerResources>>) -> (StatusCode, Json<Value>) {
        let database_ok = match sqlx::query("SELECT 1")
            .execute(resources.database.pool())
            .await
        {
            Ok(_) => true,
            Err(e) => {
                warn!("Health check database probe failed: {e}");
                false
            }
        };

        let status = if database_ok {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };
        (
            status,
            Json(json!({
                "status": if database_ok { "ok" } else { "degraded" },
                "service": SGT_CHEF_SERVER,
                "version": SERVER_VERSION,
                "database": if database_ok { "ok" } else { "unreachable" },
                "llm_enabled": resources.llm.is_some(),
                "media_enabled": resources.media.is_some(),
            })),
        )
    }
}
