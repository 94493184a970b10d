// ABOUTME: Kitchen project routes with status filtering
// ABOUTME: Deleting a project detaches its prep tasks
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

use crate::database::{CreateProjectRequest, UpdateProjectRequest};
use crate::errors::{AppError, AppJson};
use crate::mcp::resources::ServerResources;
use crate::models::ProjectStatus;

/// Query parameters for listing projects
#[derive(Debug, Default, Deserialize)]
struct ListProjectsQuery {
    #[serde(default)]
    status: Option<ProjectStatus>,
    #[serde(default)]
    limit: Option<u32>,
}

/// Project routes handler
pub struct ProjectRoutes;

impl ProjectRoutes {
    /// Create all project routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/projects",
                get(Self::list_projects).post(Self::create_project),
            )
            .route(
                "/api/projects/:project_id",
                get(Self::get_project)
                    .put(Self::update_project)
                    .delete(Self::delete_project),
            )
            .with_state(resources)
    }

    async fn list_projects(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<ListProjectsQuery>,
    ) -> Result<Response, AppError> {
        let projects = resources
            .database
            .projects()
            .list(query.status, query.limit)
            .await?;
        Ok((StatusCode::OK, Json(projects)).into_response())
    }

    async fn create_project(
        State(resources): State<Arc<ServerResources>>,
        AppJson(request): AppJson<CreateProjectRequest>,
    ) -> Result<Response, AppError> {
        let project = resources.database.projects().create(&request).await?;
        Ok((StatusCode::CREATED, Json(project)).into_response())
    }

    async fn get_project(
        State(resources): State<Arc<ServerResources>>,
        Path(project_id): Path<String>,
    ) -> Result<Response, AppError> {
        let project = resources
            .database
            .projects()
            .get(&project_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Project {project_id}")))?;
        Ok((StatusCode::OK, Json(project)).into_response())
    }

    async fn update_project(
        State(resources): State<Arc<ServerResources>>,
        Path(project_id): Path<String>,
        AppJson(request): AppJson<UpdateProjectRequest>,
    ) -> Result<Response, AppError> {
        let project = resources
            .database
            .projects()
            .update(&project_id, &request)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Project {project_id}")))?;
        Ok((StatusCode::OK, Json(project)).into_response())
    }

    async fn delete_project(
        State(resources): State<Arc<ServerResources>>,
        Path(project_id): Path<String>,
    ) -> Result<Response, AppError> {
        if resources.database.projects().delete(&project_id).await? {
            Ok(StatusCode::NO_CONTENT.into_response())
        } else {
            Err(AppError::not_found(format!("Project {project_id}")))
        }
    }
}
