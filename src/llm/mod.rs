// ABOUTME: LLM provider abstraction and message types for the tool-calling assistants
// ABOUTME: Content blocks, chat messages, tool definitions, stop reasons and token usage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # LLM Provider Layer
//!
//! The assistants talk to the model through the [`LlmProvider`] trait. The
//! message types mirror the Anthropic messages API: a message carries either
//! plain text or a list of typed content blocks, and assistant turns may
//! request tool invocations through `tool_use` blocks answered by
//! `tool_result` blocks in the following user turn.

/// Anthropic messages API client
pub mod anthropic;
/// System prompts for the assistants
pub mod prompts;

pub use anthropic::AnthropicProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppResult;

/// Speaker of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Human (or synthetic tool-result) turn
    User,
    /// Model turn
    Assistant,
}

impl MessageRole {
    /// Wire name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One typed piece of message content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Plain text
    Text {
        /// The text
        text: String,
    },
    /// Model request to invoke a tool
    ToolUse {
        /// Call identifier echoed by the result
        id: String,
        /// Tool name
        name: String,
        /// Tool arguments
        input: Value,
    },
    /// Outcome of a tool invocation
    ToolResult {
        /// Identifier of the `tool_use` block being answered
        tool_use_id: String,
        /// Rendered result text
        content: String,
        /// Whether the tool failed
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        is_error: bool,
    },
}

impl ContentBlock {
    /// Text block
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

/// Message body: bare text or content blocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Plain text shorthand
    Text(String),
    /// Structured content
    Blocks(Vec<ContentBlock>),
}

/// One conversation turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Speaker
    pub role: MessageRole,
    /// Body
    pub content: MessageContent,
}

impl ChatMessage {
    /// User text turn
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: MessageContent::Text(text.into()),
        }
    }

    /// Assistant text turn
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: MessageContent::Text(text.into()),
        }
    }

    /// Turn built from content blocks
    #[must_use]
    pub const fn blocks(role: MessageRole, blocks: Vec<ContentBlock>) -> Self {
        Self {
            role,
            content: MessageContent::Blocks(blocks),
        }
    }

    /// Concatenated text of the message, ignoring tool blocks
    #[must_use]
    pub fn text(&self) -> String {
        match &self.content {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Blocks(blocks) => blocks
                .iter()
                .filter_map(|b| match b {
                    ContentBlock::Text { text } => Some(text.as_str()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// Whether the message has no text and no blocks
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match &self.content {
            MessageContent::Text(text) => text.trim().is_empty(),
            MessageContent::Blocks(blocks) => blocks.is_empty(),
        }
    }
}

/// Tool schema projected for the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name
    pub name: String,
    /// What the tool does
    pub description: String,
    /// JSON schema of the arguments
    pub input_schema: Value,
}

/// One model call
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// System prompt
    pub system: String,
    /// Conversation so far
    pub messages: Vec<ChatMessage>,
    /// Tools the model may call
    pub tools: Vec<ToolDefinition>,
}

/// Why the model stopped generating
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Natural end of turn
    EndTurn,
    /// Waiting for tool results
    ToolUse,
    /// Completion token limit reached
    MaxTokens,
    /// A stop sequence matched
    StopSequence,
    /// Anything the provider adds later
    Other(String),
}

impl StopReason {
    /// Parse the provider's stop reason string
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "end_turn" => Self::EndTurn,
            "tool_use" => Self::ToolUse,
            "max_tokens" => Self::MaxTokens,
            "stop_sequence" => Self::StopSequence,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Whether this reason ends the conversation turn regardless of content
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::EndTurn | Self::MaxTokens | Self::StopSequence)
    }
}

/// Token accounting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Prompt tokens
    pub input_tokens: u64,
    /// Completion tokens
    pub output_tokens: u64,
}

impl TokenUsage {
    /// Accumulate another call's usage
    pub fn add(&mut self, other: Self) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
    }
}

/// One model response
#[derive(Debug, Clone)]
pub struct ChatResponse {
    /// Content blocks in emission order
    pub content: Vec<ContentBlock>,
    /// Stop reason
    pub stop_reason: StopReason,
    /// Token usage for this call
    pub usage: TokenUsage,
}

impl ChatResponse {
    /// Tool invocations requested by the model, in order
    #[must_use]
    pub fn tool_uses(&self) -> Vec<(&str, &str, &Value)> {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::ToolUse { id, name, input } => {
                    Some((id.as_str(), name.as_str(), input))
                }
                _ => None,
            })
            .collect()
    }
}

/// A chat-completion backend
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name for logs
    fn name(&self) -> &'static str;

    /// Model identifier
    fn model(&self) -> &str;

    /// Run one completion
    ///
    /// # Errors
    ///
    /// Returns an external-service error if the call fails or the response is malformed
    async fn complete(&self, request: &ChatRequest) -> AppResult<ChatResponse>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_message_accepts_plain_and_block_content() {
        let plain: ChatMessage =
            serde_json::from_value(json!({"role": "user", "content": "hi"})).unwrap();
        assert_eq!(plain, ChatMessage::user("hi"));

        let blocks: ChatMessage = serde_json::from_value(json!({
            "role": "assistant",
            "content": [
                {"type": "text", "text": "Checking"},
                {"type": "tool_use", "id": "t1", "name": "get_current_week", "input": {}}
            ]
        }))
        .unwrap();
        assert_eq!(blocks.text(), "Checking");
    }

    #[test]
    fn test_tool_result_omits_false_error_flag() {
        let block = ContentBlock::ToolResult {
            tool_use_id: "t1".to_owned(),
            content: "ok".to_owned(),
            is_error: false,
        };
        let value = serde_json::to_value(&block).unwrap();
        assert!(value.get("is_error").is_none());
        assert_eq!(value["type"], "tool_result");
    }

    #[test]
    fn test_stop_reason_terminal() {
        assert!(StopReason::parse("end_turn").is_terminal());
        assert!(StopReason::parse("max_tokens").is_terminal());
        assert!(!StopReason::parse("tool_use").is_terminal());
        assert_eq!(StopReason::parse("pause_turn"), StopReason::Other("pause_turn".to_owned()));
    }
}
