// ABOUTME: Habit, meal and workout log routes
// ABOUTME: Lists filter by instance and category
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use crate::database::{CreateLogRequest, ListLogsFilter, UpdateLogRequest};
use crate::errors::{AppError, AppJson};
use crate::mcp::resources::ServerResources;

/// Log routes handler
pub struct LogRoutes;

impl LogRoutes {
    /// Create all log routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/logs", get(Self::list_logs).post(Self::create_log))
            .route(
                "/api/logs/:log_id",
                get(Self::get_log)
                    .put(Self::update_log)
                    .delete(Self::delete_log),
            )
            .with_state(resources)
    }

    async fn list_logs(
        State(resources): State<Arc<ServerResources>>,
        Query(filter): Query<ListLogsFilter>,
    ) -> Result<Response, AppError> {
        let logs = resources.database.logs().list(&filter).await?;
        Ok((StatusCode::OK, Json(logs)).into_response())
    }

    async fn create_log(
        State(resources): State<Arc<ServerResources>>,
        AppJson(request): AppJson<CreateLogRequest>,
    ) -> Result<Response, AppError> {
        let log = resources.database.logs().create(&request).await?;
        Ok((StatusCode::CREATED, Json(log)).into_response())
    }

    async fn get_log(
        State(resources): State<Arc<ServerResources>>,
        Path(log_id): Path<String>,
    ) -> Result<Response, AppError> {
        let log = resources
            .database
            .logs()
            .get(&log_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Log {log_id}")))?;
        Ok((StatusCode::OK, Json(log)).into_response())
    }

    async fn update_log(
        State(resources): State<Arc<ServerResources>>,
        Path(log_id): Path<String>,
        AppJson(request): AppJson<UpdateLogRequest>,
    ) -> Result<Response, AppError> {
        let log = resources
            .database
            .logs()
            .update(&log_id, &request)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Log {log_id}")))?;
        Ok((StatusCode::OK, Json(log)).into_response())
    }

    async fn delete_log(
        State(resources): State<Arc<ServerResources>>,
        Path(log_id): Path<String>,
    ) -> Result<Response, AppError> {
        if resources.database.logs().delete(&log_id).await? {
            Ok(StatusCode::NO_CONTENT.into_response())
        } else {
            Err(AppError::not_found(format!("Log {log_id}")))
        }
    }
}
