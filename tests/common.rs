// ABOUTME: Shared test utilities: in-memory database, scripted model, stub image host
// ABOUTME: Also builds the full router and issues one-shot HTTP requests against it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    dead_code,
    missing_docs,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `sgt_chef`
//!
//! Every test gets its own `sqlite::memory:` database with migrations applied.
//! Model responses are scripted so conversation tests are deterministic.

use std::collections::VecDeque;
use std::env;
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use bytes::Bytes;
use serde_json::{json, Value};
use tower::ServiceExt;

use sgt_chef::config::ServerConfig;
use sgt_chef::database::Database;
use sgt_chef::errors::{AppError, AppResult};
use sgt_chef::external::{MediaHost, UploadedMedia};
use sgt_chef::llm::{
    ChatRequest, ChatResponse, ContentBlock, LlmProvider, StopReason, TokenUsage,
};
use sgt_chef::mcp::ServerResources;
use sgt_chef::server::build_router;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Fresh in-memory database with the schema applied
pub async fn create_test_database() -> Database {
    init_test_logging();
    Database::new("sqlite::memory:")
        .await
        .expect("Failed to create test database")
}

// ============================================================================
// Scripted model
// ============================================================================

/// Model provider replaying a fixed list of responses and recording requests
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<AppResult<ChatResponse>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<AppResult<ChatResponse>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-model"
    }

    async fn complete(&self, request: &ChatRequest) -> AppResult<ChatResponse> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::external_service("scripted", "script exhausted")))
    }
}

/// Final text answer
pub fn text_response(text: &str) -> AppResult<ChatResponse> {
    Ok(ChatResponse {
        content: vec![ContentBlock::text(text)],
        stop_reason: StopReason::EndTurn,
        usage: TokenUsage {
            input_tokens: 10,
            output_tokens: 5,
        },
    })
}

/// Response requesting the given `(id, name, input)` tool calls
pub fn tool_use_response(calls: Vec<(&str, &str, Value)>) -> AppResult<ChatResponse> {
    let content = calls
        .into_iter()
        .map(|(id, name, input)| ContentBlock::ToolUse {
            id: id.to_owned(),
            name: name.to_owned(),
            input,
        })
        .collect();
    Ok(ChatResponse {
        content,
        stop_reason: StopReason::ToolUse,
        usage: TokenUsage {
            input_tokens: 10,
            output_tokens: 5,
        },
    })
}

// ============================================================================
// Stub image host
// ============================================================================

/// Image host that accepts everything and remembers what it received
#[derive(Default)]
pub struct StubMediaHost {
    uploads: Mutex<Vec<(String, String, usize)>>,
}

impl StubMediaHost {
    /// `(filename, content_type, size)` for each upload
    pub fn uploads(&self) -> Vec<(String, String, usize)> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaHost for StubMediaHost {
    async fn upload(
        &self,
        filename: &str,
        content_type: &str,
        data: Bytes,
    ) -> AppResult<UploadedMedia> {
        let mut uploads = self.uploads.lock().unwrap();
        uploads.push((filename.to_owned(), content_type.to_owned(), data.len()));
        let media_id = format!("stub-{}", uploads.len());
        Ok(UploadedMedia {
            url: format!("https://images.test/{media_id}.jpg"),
            media_id,
        })
    }
}

// ============================================================================
// Server helpers
// ============================================================================

/// Resources over a fresh database with the given upstream clients
pub async fn test_resources(
    llm: Option<Arc<dyn LlmProvider>>,
    media: Option<Arc<dyn MediaHost>>,
) -> Arc<ServerResources> {
    let database = create_test_database().await;
    Arc::new(ServerResources::new(
        database,
        Arc::new(ServerConfig::default()),
        llm,
        media,
    ))
}

/// Full router over resources with no upstream clients
pub async fn test_router() -> (Router, Arc<ServerResources>) {
    let resources = test_resources(None, None).await;
    (build_router(&resources), resources)
}

/// Send one request and decode the JSON body (`Value::Null` when empty)
pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    send_request(router, request).await
}

/// Send a prepared request and decode the JSON body
pub async fn send_request(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| json!(String::from_utf8_lossy(&bytes)))
    };
    (status, value)
}

pub async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    send(router, Method::GET, uri, None).await
}

pub async fn post(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(router, Method::POST, uri, Some(body)).await
}

pub async fn put(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(router, Method::PUT, uri, Some(body)).await
}

pub async fn delete(router: &Router, uri: &str) -> (StatusCode, Value) {
    send(router, Method::DELETE, uri, None).await
}
