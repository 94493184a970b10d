// ABOUTME: Planned meal routes, filterable by week
// ABOUTME: Cooks reference a week and optionally a saved recipe
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

use super::WeekFilterQuery;
use crate::database::{CreateCookRequest, UpdateCookRequest};
use crate::errors::{AppError, AppJson};
use crate::mcp::resources::ServerResources;

/// Cook routes handler
pub struct CookRoutes;

impl CookRoutes {
    /// Create all cook routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/cooks", get(Self::list_cooks).post(Self::create_cook))
            .route(
                "/api/cooks/:cook_id",
                get(Self::get_cook)
                    .put(Self::update_cook)
                    .delete(Self::delete_cook),
            )
            .with_state(resources)
    }

    async fn list_cooks(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<WeekFilterQuery>,
    ) -> Result<Response, AppError> {
        let cooks = resources
            .database
            .cooks()
            .list(query.week_id.as_deref(), query.limit)
            .await?;
        Ok((StatusCode::OK, Json(cooks)).into_response())
    }

    async fn create_cook(
        State(resources): State<Arc<ServerResources>>,
        AppJson(request): AppJson<CreateCookRequest>,
    ) -> Result<Response, AppError> {
        let cook = resources.database.cooks().create(&request).await?;
        Ok((StatusCode::CREATED, Json(cook)).into_response())
    }

    async fn get_cook(
        State(resources): State<Arc<ServerResources>>,
        Path(cook_id): Path<String>,
    ) -> Result<Response, AppError> {
        let cook = resources
            .database
            .cooks()
            .get(&cook_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Cook {cook_id}")))?;
        Ok((StatusCode::OK, Json(cook)).into_response())
    }

    async fn update_cook(
        State(resources): State<Arc<ServerResources>>,
        Path(cook_id): Path<String>,
        AppJson(request): AppJson<UpdateCookRequest>,
    ) -> Result<Response, AppError> {
        let cook = resources
            .database
            .cooks()
            .update(&cook_id, &request)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Cook {cook_id}")))?;
        Ok((StatusCode::OK, Json(cook)).into_response())
    }

    async fn delete_cook(
        State(resources): State<Arc<ServerResources>>,
        Path(cook_id): Path<String>,
    ) -> Result<Response, AppError> {
        if resources.database.cooks().delete(&cook_id).await? {
            Ok(StatusCode::NO_CONTENT.into_response())
        } else {
            Err(AppError::not_found(format!("Cook {cook_id}")))
        }
    }
}
