// ABOUTME: Anthropic messages API client implementing LlmProvider
// ABOUTME: Builds tool-enabled requests and parses text/tool_use content blocks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::{ChatRequest, ChatResponse, ContentBlock, LlmProvider, StopReason, TokenUsage};
use crate::config::LlmConfig;
use crate::errors::{AppError, AppResult};

/// API version header value
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Service label used in error messages
const SERVICE: &str = "LLM";

/// Anthropic messages API provider
pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicProvider {
    /// Build a provider from configuration
    ///
    /// # Errors
    ///
    /// Returns a config error if no API key is configured or the HTTP client
    /// cannot be built
    pub fn from_config(config: &LlmConfig) -> AppResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| AppError::config("ANTHROPIC_API_KEY is not set"))?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            endpoint: format!("{}/v1/messages", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    fn build_request(&self, request: &ChatRequest) -> AppResult<Value> {
        let mut body = json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "messages": serde_json::to_value(&request.messages)?,
        });

        if !request.system.is_empty() {
            body["system"] = json!(request.system);
        }
        if !request.tools.is_empty() {
            body["tools"] = serde_json::to_value(&request.tools)?;
        }

        Ok(body)
    }

    async fn send_request(&self, body: &Value) -> AppResult<Value> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::external_service(SERVICE, format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_owned());
            warn!(status = status.as_u16(), "LLM API returned an error status");
            return Err(AppError::external_service(
                SERVICE,
                format!("API error {status}: {}", api_error_message(&error_body)),
            ));
        }

        response.json().await.map_err(|e| {
            AppError::external_service(SERVICE, format!("Failed to parse response: {e}"))
        })
    }
}

/// Parse a messages API response body
///
/// # Errors
///
/// Returns an external-service error if the body has no content array
pub fn parse_response(body: &Value) -> AppResult<ChatResponse> {
    let blocks = body
        .get("content")
        .and_then(Value::as_array)
        .ok_or_else(|| AppError::external_service(SERVICE, "Response has no content"))?;

    let mut content = Vec::with_capacity(blocks.len());
    for block in blocks {
        match block.get("type").and_then(Value::as_str) {
            Some("text") => {
                let text = block.get("text").and_then(Value::as_str).unwrap_or_default();
                content.push(ContentBlock::text(text));
            }
            Some("tool_use") => {
                let id = block.get("id").and_then(Value::as_str).unwrap_or_default();
                let name = block.get("name").and_then(Value::as_str).unwrap_or_default();
                content.push(ContentBlock::ToolUse {
                    id: id.to_owned(),
                    name: name.to_owned(),
                    input: block.get("input").cloned().unwrap_or_else(|| json!({})),
                });
            }
            other => debug!(block_type = ?other, "Ignoring unsupported content block"),
        }
    }

    let stop_reason = body
        .get("stop_reason")
        .and_then(Value::as_str)
        .map_or(StopReason::EndTurn, StopReason::parse);

    let usage = body.get("usage").map_or_else(TokenUsage::default, |u| TokenUsage {
        input_tokens: u.get("input_tokens").and_then(Value::as_u64).unwrap_or(0),
        output_tokens: u.get("output_tokens").and_then(Value::as_u64).unwrap_or(0),
    });

    Ok(ChatResponse {
        content,
        stop_reason,
        usage,
    })
}

fn api_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(Value::as_str)
                .map(ToOwned::to_owned)
        })
        .unwrap_or_else(|| body.chars().take(500).collect())
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &ChatRequest) -> AppResult<ChatResponse> {
        let body = self.build_request(request)?;
        let response = self.send_request(&body).await?;
        parse_response(&response)
    }
}

impl fmt::Debug for AnthropicProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnthropicProvider")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::llm::{ChatMessage, ToolDefinition};

    fn provider() -> AnthropicProvider {
        let config = LlmConfig {
            api_key: Some("test-key".to_owned()),
            base_url: "http://localhost:9999/".to_owned(),
            ..LlmConfig::default()
        };
        AnthropicProvider::from_config(&config).unwrap()
    }

    #[test]
    fn test_requires_api_key() {
        assert!(AnthropicProvider::from_config(&LlmConfig::default()).is_err());
    }

    #[test]
    fn test_build_request_with_tools() {
        let p = provider();
        assert_eq!(p.endpoint, "http://localhost:9999/v1/messages");

        let request = ChatRequest {
            system: "You are Sgt Chef".to_owned(),
            messages: vec![ChatMessage::user("What's for dinner?")],
            tools: vec![ToolDefinition {
                name: "get_current_week".to_owned(),
                description: "Current week".to_owned(),
                input_schema: json!({"type": "object", "properties": {}}),
            }],
        };
        let body = p.build_request(&request).unwrap();
        assert_eq!(body["system"], "You are Sgt Chef");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "What's for dinner?");
        assert_eq!(body["tools"][0]["name"], "get_current_week");
        assert_eq!(body["max_tokens"], 2048);
    }

    #[test]
    fn test_parse_tool_use_response() {
        let body = json!({
            "content": [
                {"type": "text", "text": "Let me look."},
                {"type": "tool_use", "id": "toolu_1", "name": "list_recipes", "input": {"tag": "soup"}}
            ],
            "stop_reason": "tool_use",
            "usage": {"input_tokens": 120, "output_tokens": 30}
        });
        let response = parse_response(&body).unwrap();
        assert_eq!(response.stop_reason, StopReason::ToolUse);
        assert_eq!(response.usage.input_tokens, 120);
        let uses = response.tool_uses();
        assert_eq!(uses.len(), 1);
        assert_eq!(uses[0].1, "list_recipes");
        assert_eq!(uses[0].2["tag"], "soup");
    }

    #[test]
    fn test_parse_rejects_missing_content() {
        let err = parse_response(&json!({"type": "error"})).unwrap_err();
        assert_eq!(err.http_status(), axum::http::StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_api_error_message_extraction() {
        let body = r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#;
        assert_eq!(api_error_message(body), "Overloaded");
        assert_eq!(api_error_message("plain failure"), "plain failure");
    }
}
