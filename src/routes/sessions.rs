// ABOUTME: Coaching session routes keyed by instance (day/week/month key)
// ABOUTME: PUT upserts; list can be narrowed to one period by key prefix
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
use serde::Deserialize;

use crate::calendar::InstancePeriod;
use crate::database::UpsertSessionRequest;
use crate::errors::{AppError, AppJson};
use crate::mcp::resources::ServerResources;

#[derive(Debug, Default, Deserialize)]
struct ListSessionsQuery {
    #[serde(default)]
    prefix: Option<String>,
    #[serde(default)]
    limit: Option<u32>,
}

/// Session routes handler
pub struct SessionRoutes;

impl SessionRoutes {
    /// Create all session routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/sessions", get(Self::list_sessions))
            .route(
                "/api/sessions/:instance",
                get(Self::get_session)
                    .put(Self::upsert_session)
                    .delete(Self::delete_session),
            )
            .with_state(resources)
    }

    async fn list_sessions(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<ListSessionsQuery>,
    ) -> Result<Response, AppError> {
        let period = query
            .prefix
            .as_deref()
            .map(str::parse::<InstancePeriod>)
            .transpose()?;
        let sessions = resources
            .database
            .sessions()
            .list(period, query.limit)
            .await?;
        Ok((StatusCode::OK, Json(sessions)).into_response())
    }

    async fn get_session(
        State(resources): State<Arc<ServerResources>>,
        Path(instance): Path<String>,
    ) -> Result<Response, AppError> {
        let session = resources
            .database
            .sessions()
            .get_by_instance(&instance)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Session {instance}")))?;
        Ok((StatusCode::OK, Json(session)).into_response())
    }

    async fn upsert_session(
        State(resources): State<Arc<ServerResources>>,
        Path(instance): Path<String>,
        AppJson(request): AppJson<UpsertSessionRequest>,
    ) -> Result<Response, AppError> {
        let session = resources
            .database
            .sessions()
            .upsert(&instance, &request)
            .await?;
        Ok((StatusCode::OK, Json(session)).into_response())
    }

    async fn delete_session(
        State(resources): State<Arc<ServerResources>>,
        Path(instance): Path<String>,
    ) -> Result<Response, AppError> {
        if resources.database.sessions().delete(&instance).await? {
            Ok(StatusCode::NO_CONTENT.into_response())
        } else {
            Err(AppError::not_found(format!("Session {instance}")))
        }
    }
}
