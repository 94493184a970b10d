// ABOUTME: Prep task routes, filterable by week
// ABOUTME: Preps reference a week and optionally a project
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
use crate::database::{CreatePrepRequest, UpdatePrepRequest};
use crate::errors::{AppError, AppJson};
use crate::mcp::resources::ServerResources;

/// Prep routes handler
pub struct PrepRoutes;

impl PrepRoutes {
    /// Create all prep routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/preps", get(Self::list_preps).post(Self::create_prep))
            .route(
                "/api/preps/:prep_id",
                get(Self::get_prep)
                    .put(Self::update_prep)
                    .delete(Self::delete_prep),
            )
            .with_state(resources)
    }

    async fn list_preps(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<WeekFilterQuery>,
    ) -> Result<Response, AppError> {
        let preps = resources
            .database
            .preps()
            .list(query.week_id.as_deref(), query.limit)
            .await?;
        Ok((StatusCode::OK, Json(preps)).into_response())
    }

    async fn create_prep(
        State(resources): State<Arc<ServerResources>>,
        AppJson(request): AppJson<CreatePrepRequest>,
    ) -> Result<Response, AppError> {
        let prep = resources.database.preps().create(&request).await?;
        Ok((StatusCode::CREATED, Json(prep)).into_response())
    }

    async fn get_prep(
        State(resources): State<Arc<ServerResources>>,
        Path(prep_id): Path<String>,
    ) -> Result<Response, AppError> {
        let prep = resources
            .database
            .preps()
            .get(&prep_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Prep {prep_id}")))?;
        Ok((StatusCode::OK, Json(prep)).into_response())
    }

    async fn update_prep(
        State(resources): State<Arc<ServerResources>>,
        Path(prep_id): Path<String>,
        AppJson(request): AppJson<UpdatePrepRequest>,
    ) -> Result<Response, AppError> {
        let prep = resources
            .database
            .preps()
            .update(&prep_id, &request)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Prep {prep_id}")))?;
        Ok((StatusCode::OK, Json(prep)).into_response())
    }

    async fn delete_prep(
        State(resources): State<Arc<ServerResources>>,
        Path(prep_id): Path<String>,
    ) -> Result<Response, AppError> {
        if resources.database.preps().delete(&prep_id).await? {
            Ok(StatusCode::NO_CONTENT.into_response())
        } else {
            Err(AppError::not_found(format!("Prep {prep_id}")))
        }
    }
}
