// ABOUTME: HTTP transport for MCP: one JSON-RPC message per POST
// ABOUTME: Notifications are acknowledged with 202 and no body
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::Value;
use tracing::warn;

use crate::constants::errors::{ERROR_INVALID_REQUEST, ERROR_PARSE};
use crate::jsonrpc::{JsonRpcRequest, JsonRpcResponse};
use crate::mcp::{McpProtocolHandler, ServerResources};

/// MCP routes handler
pub struct McpRoutes;

impl McpRoutes {
    /// Create MCP routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/mcp", post(Self::handle_mcp))
            .with_state(resources)
    }

    async fn handle_mcp(State(resources): State<Arc<ServerResources>>, body: Bytes) -> Response {
        let value: Value = match serde_json::from_slice(&body) {
            Ok(value) => value,
            Err(e) => {
                warn!("MCP request is not valid JSON: {e}");
                return Self::reply(JsonRpcResponse::error(
                    None,
                    ERROR_PARSE,
                    format!("Parse error: {e}"),
                ));
            }
        };

        let id = value.get("id").cloned();
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                return Self::reply(JsonRpcResponse::error(
                    id,
                    ERROR_INVALID_REQUEST,
                    format!("Invalid request: {e}"),
                ))
            }
        };

        match McpProtocolHandler::handle_request(&resources, request).await {
            Some(response) => Self::reply(response),
            None => StatusCode::ACCEPTED.into_response(),
        }
    }

    fn reply(response: JsonRpcResponse) -> Response {
        (StatusCode::OK, Json(response)).into_response()
    }
}
