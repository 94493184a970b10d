// ABOUTME: Conversation driver running the model/tool loop for both assistants
// ABOUTME: Executes requested tools in order and stops on a final answer or the iteration bound
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Conversation driver
//!
//! Each iteration sends the running message list to the model. When the
//! response requests tools, every tool runs sequentially in the order the
//! model asked, the model's content is appended as an assistant turn, and
//! the results are appended as one user turn of `tool_result` blocks. The
//! loop ends when the model answers without tools, reports a terminal stop
//! reason, or the iteration bound is reached.

use std::borrow::Cow;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::errors::AppResult;
use crate::llm::{
    ChatMessage, ChatRequest, ContentBlock, LlmProvider, MessageRole, StopReason, TokenUsage,
};
use crate::tools::{ToolExecutionContext, ToolRegistry};

// ============================================================================
// Transcript types
// ============================================================================

/// One visible step of a conversation turn
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TranscriptItem {
    /// Text the model produced
    Text {
        /// Cleaned text
        text: String,
    },
    /// A tool the model called and what it returned
    ToolCall {
        /// Call identifier
        id: String,
        /// Tool name
        name: String,
        /// Arguments as sent by the model
        input: Value,
        /// Text result fed back to the model
        output: String,
        /// Whether the call failed
        is_error: bool,
    },
}

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStop {
    /// Model produced its final answer
    Completed,
    /// Iteration bound reached while the model still wanted tools
    MaxIterations,
}

/// Result of one driver run
#[derive(Debug, Clone, Serialize)]
pub struct ConversationOutcome {
    /// Text and tool-call items in order
    pub transcript: Vec<TranscriptItem>,
    /// Final reply text (last text the model produced)
    pub reply: String,
    /// Accumulated token usage across model calls
    pub usage: TokenUsage,
    /// Stop condition
    pub stop: ConversationStop,
    /// Stop reason of the last model response
    pub stop_reason: Option<StopReason>,
    /// Number of model calls made
    pub iterations: usize,
}

// ============================================================================
// Helper functions
// ============================================================================

/// Remove `<function(name)>...</function>` markup some models emit in text
#[must_use]
pub fn strip_synthetic_function_calls(content: &str) -> Cow<'_, str> {
    fn function_pattern() -> Option<&'static Regex> {
        static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
        PATTERN
            .get_or_init(|| Regex::new(r"<function[/\(][^>]+>[\s\S]*?</function>").ok())
            .as_ref()
    }

    let Some(pattern) = function_pattern() else {
        return Cow::Borrowed(content);
    };
    if !pattern.is_match(content) {
        return Cow::Borrowed(content);
    }
    Cow::Owned(pattern.replace_all(content, "").trim().to_owned())
}

fn clean_text_blocks(blocks: Vec<ContentBlock>) -> Vec<ContentBlock> {
    blocks
        .into_iter()
        .filter_map(|block| match block {
            ContentBlock::Text { text } => {
                let cleaned = strip_synthetic_function_calls(&text).into_owned();
                (!cleaned.trim().is_empty()).then_some(ContentBlock::Text { text: cleaned })
            }
            other => Some(other),
        })
        .collect()
}

// ============================================================================
// ConversationDriver
// ============================================================================

/// Runs the model/tool loop for one assistant
pub struct ConversationDriver<'a> {
    provider: Arc<dyn LlmProvider>,
    registry: &'a ToolRegistry,
    ctx: ToolExecutionContext,
    max_iterations: usize,
}

impl<'a> ConversationDriver<'a> {
    /// Create a driver; an iteration bound of zero is raised to one
    #[must_use]
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        registry: &'a ToolRegistry,
        ctx: ToolExecutionContext,
        max_iterations: usize,
    ) -> Self {
        Self {
            provider,
            registry,
            ctx,
            max_iterations: max_iterations.max(1),
        }
    }

    /// Drive the conversation until a final answer or the iteration bound
    ///
    /// `messages` is extended in place with every assistant and tool-result
    /// turn produced, including the final assistant answer.
    ///
    /// # Errors
    ///
    /// Returns an external-service error if a model call fails. Tool
    /// failures are fed back to the model and never abort the loop.
    pub async fn run(
        &self,
        system: &str,
        messages: &mut Vec<ChatMessage>,
    ) -> AppResult<ConversationOutcome> {
        let tools = self.registry.definitions();
        let mut transcript = Vec::new();
        let mut usage = TokenUsage::default();
        let mut reply = String::new();
        let mut last_stop = None;

        for iteration in 1..=self.max_iterations {
            let request = ChatRequest {
                system: system.to_owned(),
                messages: messages.clone(),
                tools: tools.clone(),
            };
            let response = self.provider.complete(&request).await?;
            usage.add(response.usage);

            let tool_calls: Vec<(String, String, Value)> = response
                .tool_uses()
                .into_iter()
                .map(|(id, name, input)| (id.to_owned(), name.to_owned(), input.clone()))
                .collect();
            let content = clean_text_blocks(response.content);
            let stop_reason = response.stop_reason;

            for block in &content {
                if let ContentBlock::Text { text } = block {
                    transcript.push(TranscriptItem::Text { text: text.clone() });
                    reply.clone_from(text);
                }
            }

            if tool_calls.is_empty() || stop_reason.is_terminal() {
                debug!(iteration, ?stop_reason, "Model returned final answer");
                let final_blocks: Vec<ContentBlock> = content
                    .into_iter()
                    .filter(|b| matches!(b, ContentBlock::Text { .. }))
                    .collect();
                if !final_blocks.is_empty() {
                    messages.push(ChatMessage::blocks(MessageRole::Assistant, final_blocks));
                }
                return Ok(ConversationOutcome {
                    transcript,
                    reply,
                    usage,
                    stop: ConversationStop::Completed,
                    stop_reason: Some(stop_reason),
                    iterations: iteration,
                });
            }

            info!(
                iteration,
                tool_count = tool_calls.len(),
                provider = self.provider.name(),
                "Executing tool calls"
            );

            let mut results = Vec::with_capacity(tool_calls.len());
            for (id, name, input) in tool_calls {
                let outcome = self.registry.invoke(&name, input.clone(), &self.ctx).await;
                results.push(ContentBlock::ToolResult {
                    tool_use_id: id.clone(),
                    content: outcome.text.clone(),
                    is_error: outcome.is_error,
                });
                transcript.push(TranscriptItem::ToolCall {
                    id,
                    name,
                    input,
                    output: outcome.text,
                    is_error: outcome.is_error,
                });
            }

            messages.push(ChatMessage::blocks(MessageRole::Assistant, content));
            messages.push(ChatMessage::blocks(MessageRole::User, results));
            last_stop = Some(stop_reason);
        }

        warn!(
            max_iterations = self.max_iterations,
            "Tool iteration bound reached before a final answer"
        );
        Ok(ConversationOutcome {
            transcript,
            reply,
            usage,
            stop: ConversationStop::MaxIterations,
            stop_reason: last_stop,
            iterations: self.max_iterations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_synthetic_function_calls() {
        let text = "Planning now. <function(plan_cook)>{\"week_id\": \"x\"}</function>";
        assert_eq!(strip_synthetic_function_calls(text), "Planning now.");
        assert_eq!(
            strip_synthetic_function_calls("<function/list_recipes>{}</function>"),
            ""
        );
        assert!(matches!(
            strip_synthetic_function_calls("plain answer"),
            Cow::Borrowed("plain answer")
        ));
    }

    #[test]
    fn test_clean_text_blocks_drops_empty_text() {
        let blocks = vec![
            ContentBlock::text("<function(get_recipe)>{}</function>"),
            ContentBlock::ToolUse {
                id: "t1".to_owned(),
                name: "get_recipe".to_owned(),
                input: Value::Null,
            },
        ];
        let cleaned = clean_text_blocks(blocks);
        assert_eq!(cleaned.len(), 1);
        assert!(matches!(cleaned[0], ContentBlock::ToolUse { .. }));
    }
}
