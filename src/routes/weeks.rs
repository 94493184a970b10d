// ABOUTME: Week routes including the current-week shortcut, full plan and starting status
// ABOUTME: Deleting a week cascades to its cooks, preps, shopping items and starting status
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
use serde::Serialize;

use super::ListQuery;
use crate::calendar::{current_iso_week, iso_week_range};
use crate::database::{
    Cook, CreateWeekRequest, Prep, Shop, StartingStatus, UpdateWeekRequest, UpsertStartingStatusRequest,
    Week,
};
use crate::errors::{AppError, AppJson};
use crate::formatters::week_plan_summary;
use crate::mcp::resources::ServerResources;

/// Week with its calendar range
#[derive(Debug, Serialize)]
struct WeekResponse {
    #[serde(flatten)]
    week: Week,
    start_date: String,
    end_date: String,
}

impl WeekResponse {
    fn from_week(week: Week) -> Result<Self, AppError> {
        let (start, end) = iso_week_range(week.year, week.week_number)?;
        Ok(Self {
            week,
            start_date: start.to_string(),
            end_date: end.to_string(),
        })
    }
}

/// Everything planned for one week
#[derive(Debug, Serialize)]
struct WeekPlanResponse {
    week: WeekResponse,
    cooks: Vec<Cook>,
    preps: Vec<Prep>,
    shops: Vec<Shop>,
    starting_status: Option<StartingStatus>,
    summary: String,
}

/// Week routes handler
pub struct WeekRoutes;

impl WeekRoutes {
    /// Create all week routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/weeks", get(Self::list_weeks).post(Self::create_week))
            .route("/api/weeks/current", get(Self::current_week))
            .route(
                "/api/weeks/:week_id",
                get(Self::get_week)
                    .put(Self::update_week)
                    .delete(Self::delete_week),
            )
            .route("/api/weeks/:week_id/plan", get(Self::get_plan))
            .route(
                "/api/weeks/:week_id/starting-status",
                get(Self::get_starting_status).put(Self::upsert_starting_status),
            )
            .with_state(resources)
    }

    async fn require_week(resources: &ServerResources, week_id: &str) -> Result<Week, AppError> {
        resources
            .database
            .weeks()
            .get(week_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Week {week_id}")))
    }

    async fn list_weeks(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<ListQuery>,
    ) -> Result<Response, AppError> {
        let weeks = resources.database.weeks().list(query.limit).await?;
        let weeks = weeks
            .into_iter()
            .map(WeekResponse::from_week)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((StatusCode::OK, Json(weeks)).into_response())
    }

    async fn create_week(
        State(resources): State<Arc<ServerResources>>,
        AppJson(request): AppJson<CreateWeekRequest>,
    ) -> Result<Response, AppError> {
        let week = resources.database.weeks().create(&request).await?;
        Ok((StatusCode::CREATED, Json(WeekResponse::from_week(week)?)).into_response())
    }

    async fn current_week(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let (year, week_number) = current_iso_week();
        let week = resources
            .database
            .weeks()
            .get_or_create(year, week_number)
            .await?;
        Ok((StatusCode::OK, Json(WeekResponse::from_week(week)?)).into_response())
    }

    async fn get_week(
        State(resources): State<Arc<ServerResources>>,
        Path(week_id): Path<String>,
    ) -> Result<Response, AppError> {
        let week = Self::require_week(&resources, &week_id).await?;
        Ok((StatusCode::OK, Json(WeekResponse::from_week(week)?)).into_response())
    }

    async fn update_week(
        State(resources): State<Arc<ServerResources>>,
        Path(week_id): Path<String>,
        AppJson(request): AppJson<UpdateWeekRequest>,
    ) -> Result<Response, AppError> {
        let week = resources
            .database
            .weeks()
            .update(&week_id, &request)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Week {week_id}")))?;
        Ok((StatusCode::OK, Json(WeekResponse::from_week(week)?)).into_response())
    }

    async fn delete_week(
        State(resources): State<Arc<ServerResources>>,
        Path(week_id): Path<String>,
    ) -> Result<Response, AppError> {
        if resources.database.weeks().delete(&week_id).await? {
            Ok(StatusCode::NO_CONTENT.into_response())
        } else {
            Err(AppError::not_found(format!("Week {week_id}")))
        }
    }

    async fn get_plan(
        State(resources): State<Arc<ServerResources>>,
        Path(week_id): Path<String>,
    ) -> Result<Response, AppError> {
        let week = Self::require_week(&resources, &week_id).await?;
        let id = week.id.to_string();
        let db = &resources.database;
        let cooks = db.cooks().list(Some(&id), None).await?;
        let preps = db.preps().list(Some(&id), None).await?;
        let shops = db.shops().list(Some(&id), None).await?;
        let starting_status = db.starting_status().get_for_week(&id).await?;
        let summary = week_plan_summary(&week, &cooks, &preps, &shops, starting_status.as_ref());

        let plan = WeekPlanResponse {
            week: WeekResponse::from_week(week)?,
            cooks,
            preps,
            shops,
            starting_status,
            summary,
        };
        Ok((StatusCode::OK, Json(plan)).into_response())
    }

    async fn get_starting_status(
        State(resources): State<Arc<ServerResources>>,
        Path(week_id): Path<String>,
    ) -> Result<Response, AppError> {
        let week = Self::require_week(&resources, &week_id).await?;
        let status = resources
            .database
            .starting_status()
            .get_for_week(&week.id.to_string())
            .await?
            .ok_or_else(|| AppError::not_found(format!("Starting status for week {week_id}")))?;
        Ok((StatusCode::OK, Json(status)).into_response())
    }

    async fn upsert_starting_status(
        State(resources): State<Arc<ServerResources>>,
        Path(week_id): Path<String>,
        AppJson(request): AppJson<UpsertStartingStatusRequest>,
    ) -> Result<Response, AppError> {
        let week = Self::require_week(&resources, &week_id).await?;
        let status = resources
            .database
            .starting_status()
            .upsert_for_week(&week.id.to_string(), &request)
            .await?;
        Ok((StatusCode::OK, Json(status)).into_response())
    }
}
