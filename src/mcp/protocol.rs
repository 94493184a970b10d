// ABOUTME: MCP JSON-RPC method dispatch over the tool registry
// ABOUTME: Handles initialize, ping, tools/list, tools/call and notifications
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::resources::ServerResources;
use crate::constants::errors::{
    ERROR_INVALID_PARAMS, ERROR_INVALID_REQUEST, ERROR_METHOD_NOT_FOUND,
};
use crate::constants::protocol::{JSONRPC_VERSION, MCP_PROTOCOL_VERSION, SERVER_VERSION};
use crate::constants::service_names::SGT_CHEF_SERVER;
use crate::jsonrpc::{JsonRpcRequest, JsonRpcResponse};
use crate::tools::ToolExecutionContext;

#[derive(Debug, Deserialize)]
struct ToolCallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

/// Stateless MCP request handler
pub struct McpProtocolHandler;

impl McpProtocolHandler {
    /// Handle one request; `None` means no response body (`notifications/*`)
    pub async fn handle_request(
        resources: &ServerResources,
        request: JsonRpcRequest,
    ) -> Option<JsonRpcResponse> {
        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::error(
                request.id,
                ERROR_INVALID_REQUEST,
                format!("Unsupported JSON-RPC version: {}", request.jsonrpc),
            ));
        }

        if request.is_notification() {
            debug!(method = %request.method, "MCP notification received");
            return None;
        }

        if request.id.is_none() {
            warn!(method = %request.method, "MCP request without id");
            return Some(JsonRpcResponse::error(
                None,
                ERROR_INVALID_REQUEST,
                format!("Request id is required for method: {}", request.method),
            ));
        }

        let id = request.id;
        let response = match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(id, Self::initialize_result()),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::success(id, Self::tools_list_result(resources)),
            "tools/call" => Self::handle_tools_call(resources, id, request.params).await,
            method => {
                warn!(method, "Unknown MCP method");
                JsonRpcResponse::error(id, ERROR_METHOD_NOT_FOUND, format!("Method not found: {method}"))
            }
        };
        Some(response)
    }

    fn initialize_result() -> Value {
        json!({
            "protocolVersion": MCP_PROTOCOL_VERSION,
            "capabilities": {
                "tools": { "listChanged": false }
            },
            "serverInfo": {
                "name": SGT_CHEF_SERVER,
                "version": SERVER_VERSION
            }
        })
    }

    fn tools_list_result(resources: &ServerResources) -> Value {
        let tools: Vec<Value> = resources
            .all_tools
            .definitions()
            .into_iter()
            .map(|def| {
                json!({
                    "name": def.name,
                    "description": def.description,
                    "inputSchema": def.input_schema
                })
            })
            .collect();
        json!({ "tools": tools })
    }

    async fn handle_tools_call(
        resources: &ServerResources,
        id: Option<Value>,
        params: Option<Value>,
    ) -> JsonRpcResponse {
        let params: ToolCallParams = match params.map(serde_json::from_value).transpose() {
            Ok(Some(params)) => params,
            Ok(None) => {
                return JsonRpcResponse::error(id, ERROR_INVALID_PARAMS, "Missing params")
            }
            Err(e) => {
                return JsonRpcResponse::error(
                    id,
                    ERROR_INVALID_PARAMS,
                    format!("Invalid tools/call params: {e}"),
                )
            }
        };

        info!(tool = %params.name, "MCP tool call");
        let ctx = ToolExecutionContext::new(resources.database.clone());
        let outcome = resources
            .all_tools
            .invoke(&params.name, params.arguments, &ctx)
            .await;

        let mut result = json!({
            "content": [{ "type": "text", "text": outcome.text }],
            "isError": outcome.is_error
        });
        if let Some(data) = outcome.data {
            result["structuredContent"] = data;
        }
        JsonRpcResponse::success(id, result)
    }
}
