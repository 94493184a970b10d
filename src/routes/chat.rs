// ABOUTME: Sgt Chef conversation endpoint running the tool loop over the chef tools
// ABOUTME: Stateless: the client sends the full message history with each request
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Sgt Chef chat route
//!
//! The server prepends the Sgt Chef system prompt (today's date and current
//! ISO week) to the client's history and drives the model through the chef
//! tool registry until it produces a final answer.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::calendar;
use crate::chat::{ConversationDriver, ConversationOutcome};
use crate::errors::{AppError, AppJson};
use crate::llm::prompts::chef_system_prompt;
use crate::llm::{ChatMessage, MessageRole};
use crate::mcp::resources::ServerResources;
use crate::tools::ToolExecutionContext;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request to talk to Sgt Chef
#[derive(Debug, Deserialize)]
pub struct ChatRequestBody {
    /// Conversation so far, ending with the user's latest message
    pub messages: Vec<ChatMessage>,
}

/// Sgt Chef's answer
#[derive(Debug, Serialize)]
pub struct ChatResponseBody {
    /// Loop result: reply, transcript, usage and stop condition
    #[serde(flatten)]
    pub outcome: ConversationOutcome,
    /// Turns appended to the history by this request
    pub messages: Vec<ChatMessage>,
    /// Wall-clock time spent
    pub execution_time_ms: u64,
}

/// Reject histories that do not end with a user turn
pub(crate) fn validate_history(messages: &[ChatMessage]) -> Result<(), AppError> {
    match messages.last() {
        None => Err(AppError::missing_field("messages")),
        Some(last) if last.role != MessageRole::User => Err(AppError::invalid_input(
            "The last message must come from the user",
        )),
        Some(last) if last.is_empty() => Err(AppError::invalid_input("The last message is empty")),
        Some(_) => Ok(()),
    }
}

// ============================================================================
// Chat Routes
// ============================================================================

/// Chat routes handler
pub struct ChatRoutes;

impl ChatRoutes {
    /// Create chat routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/chat", post(Self::send_message))
            .with_state(resources)
    }

    async fn send_message(
        State(resources): State<Arc<ServerResources>>,
        AppJson(request): AppJson<ChatRequestBody>,
    ) -> Result<Response, AppError> {
        validate_history(&request.messages)?;
        let provider = resources.require_llm()?;
        let started = Instant::now();

        let system = chef_system_prompt(calendar::today());

        let mut messages = request.messages;
        let history_len = messages.len();
        let driver = ConversationDriver::new(
            provider,
            &resources.chef_tools,
            ToolExecutionContext::new(resources.database.clone()),
            resources.config.llm.max_tool_iterations,
        );
        let outcome = driver.run(&system, &mut messages).await?;

        let execution_time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(
            iterations = outcome.iterations,
            input_tokens = outcome.usage.input_tokens,
            output_tokens = outcome.usage.output_tokens,
            execution_time_ms,
            "Sgt Chef conversation completed"
        );

        let response = ChatResponseBody {
            outcome,
            messages: messages.split_off(history_len),
            execution_time_ms,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ContentBlock;

    #[test]
    fn test_validate_history() {
        assert!(validate_history(&[]).is_err());
        assert!(validate_history(&[ChatMessage::assistant("hi")]).is_err());
        assert!(validate_history(&[ChatMessage::user("   ")]).is_err());
        assert!(validate_history(&[ChatMessage::user("plan dinner")]).is_ok());
        let tool_result = ChatMessage::blocks(
            MessageRole::User,
            vec![ContentBlock::ToolResult {
                tool_use_id: "t1".to_owned(),
                content: "ok".to_owned(),
                is_error: false,
            }],
        );
        assert!(validate_history(&[tool_result]).is_ok());
    }
}
