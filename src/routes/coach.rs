// ABOUTME: Accountability coach endpoints bound to a calendar instance
// ABOUTME: Conversations persist on the instance's session only after a successful model run
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::calendar::{self, InstanceKey};
use crate::chat::{ConversationDriver, ConversationOutcome};
use crate::database::UpsertSessionRequest;
use crate::errors::{require_non_empty, AppError, AppJson};
use crate::llm::prompts::coach_system_prompt;
use crate::llm::ChatMessage;
use crate::mcp::resources::ServerResources;
use crate::tools::ToolExecutionContext;

/// Message to the coach
#[derive(Debug, Deserialize)]
pub struct CoachMessageRequest {
    /// What the user says
    pub message: String,
}

/// Stored conversation for an instance
#[derive(Debug, Serialize)]
pub struct CoachConversationResponse {
    /// Instance key
    pub instance: String,
    /// Human-readable period
    pub label: String,
    /// First day of the period
    pub start_date: String,
    /// Last day of the period
    pub end_date: String,
    /// Recorded weight
    pub weight: Option<f64>,
    /// Full message history
    pub messages: Vec<ChatMessage>,
}

/// Coach reply
#[derive(Debug, Serialize)]
pub struct CoachReplyResponse {
    /// Instance key
    pub instance: String,
    /// Loop result: reply, transcript, usage and stop condition
    #[serde(flatten)]
    pub outcome: ConversationOutcome,
    /// Turns appended to the session by this request, including the user message
    pub messages: Vec<ChatMessage>,
    /// Wall-clock time spent
    pub execution_time_ms: u64,
}

/// Coach routes handler
pub struct CoachRoutes;

impl CoachRoutes {
    /// Create coach routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/coach/:instance",
                get(Self::get_conversation).post(Self::send_message),
            )
            .with_state(resources)
    }

    async fn get_conversation(
        State(resources): State<Arc<ServerResources>>,
        Path(instance): Path<String>,
    ) -> Result<Response, AppError> {
        let key: InstanceKey = instance.parse()?;
        let session = resources
            .database
            .sessions()
            .get_by_instance(&key.to_string())
            .await?;
        let (weight, messages) = session.map_or((None, Vec::new()), |s| (s.weight, s.messages));

        let response = CoachConversationResponse {
            instance: key.to_string(),
            label: key.label(),
            start_date: key.start_date.to_string(),
            end_date: key.end_date().to_string(),
            weight,
            messages,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    async fn send_message(
        State(resources): State<Arc<ServerResources>>,
        Path(instance): Path<String>,
        AppJson(request): AppJson<CoachMessageRequest>,
    ) -> Result<Response, AppError> {
        let key: InstanceKey = instance.parse()?;
        let instance = key.to_string();
        let text = require_non_empty("message", &request.message)?.to_owned();
        let provider = resources.require_llm()?;
        let started = Instant::now();

        let mut messages = resources
            .database
            .sessions()
            .get_by_instance(&instance)
            .await?
            .map(|s| s.messages)
            .unwrap_or_default();
        let history_len = messages.len();
        messages.push(ChatMessage::user(text));

        let system = coach_system_prompt(&key, calendar::today());
        let driver = ConversationDriver::new(
            provider,
            &resources.coach_tools,
            ToolExecutionContext::for_instance(resources.database.clone(), instance.clone()),
            resources.config.llm.max_tool_iterations,
        );
        let outcome = driver.run(&system, &mut messages).await?;

        // weight: None keeps any reading a tool recorded during the run
        resources
            .database
            .sessions()
            .upsert(
                &instance,
                &UpsertSessionRequest {
                    messages: Some(messages.clone()),
                    weight: None,
                },
            )
            .await?;

        let execution_time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(
            instance = %instance,
            iterations = outcome.iterations,
            execution_time_ms,
            "Coach conversation saved"
        );

        let response = CoachReplyResponse {
            instance,
            outcome,
            messages: messages.split_off(history_len),
            execution_time_ms,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }
}
