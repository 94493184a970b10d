// ABOUTME: Database operations for prep projects (batch cooking, ferments, stocks)
// ABOUTME: CRUD with optional status filtering
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

use super::{list_limit, normalize_optional, row_timestamp, row_uuid};
use crate::errors::{require_non_empty, AppError, AppResult};
use crate::models::ProjectStatus;

/// A longer-running kitchen project that preps can belong to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier
    pub id: Uuid,
    /// Project name
    pub name: String,
    /// Description
    pub description: Option<String>,
    /// Lifecycle status
    pub status: ProjectStatus,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Request to create a project
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateProjectRequest {
    /// Project name
    pub name: String,
    /// Description
    #[serde(default)]
    pub description: Option<String>,
    /// Initial status (defaults to planned)
    #[serde(default)]
    pub status: ProjectStatus,
}

/// Partial update for a project
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProjectRequest {
    /// New name (if provided)
    pub name: Option<String>,
    /// New description (if provided)
    pub description: Option<String>,
    /// New status (if provided)
    pub status: Option<ProjectStatus>,
}

/// Project database operations manager
pub struct ProjectManager {
    pool: SqlitePool,
}

impl ProjectManager {
    /// Create a new project manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List projects, newest first, optionally by status
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list(
        &self,
        status: Option<ProjectStatus>,
        limit: Option<u32>,
    ) -> AppResult<Vec<Project>> {
        let rows = sqlx::query(
            r"
            SELECT id, name, description, status, created_at, updated_at
            FROM projects
            WHERE ($1 IS NULL OR status = $1)
            ORDER BY created_at DESC
            LIMIT $2
            ",
        )
        .bind(status.map(|s| s.as_str()))
        .bind(list_limit(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list projects: {e}")))?;

        rows.iter().map(row_to_project).collect()
    }

    /// Get a project by ID
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, project_id: &str) -> AppResult<Option<Project>> {
        let row = sqlx::query(
            r"
            SELECT id, name, description, status, created_at, updated_at
            FROM projects
            WHERE id = $1
            ",
        )
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get project: {e}")))?;

        row.as_ref().map(row_to_project).transpose()
    }

    /// Create a project
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the database operation fails
    pub async fn create(&self, request: &CreateProjectRequest) -> AppResult<Project> {
        let now = Utc::now();
        let project = Project {
            id: Uuid::new_v4(),
            name: require_non_empty("name", &request.name)?.to_owned(),
            description: normalize_optional(request.description.clone()),
            status: request.status,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r"
            INSERT INTO projects (id, name, description, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            ",
        )
        .bind(project.id.to_string())
        .bind(&project.name)
        .bind(&project.description)
        .bind(project.status.as_str())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(project)
    }

    /// Apply a partial update
    ///
    /// # Errors
    ///
    /// Returns an error if a provided name is blank or the database operation fails
    pub async fn update(
        &self,
        project_id: &str,
        request: &UpdateProjectRequest,
    ) -> AppResult<Option<Project>> {
        let Some(existing) = self.get(project_id).await? else {
            return Ok(None);
        };

        let name = match &request.name {
            Some(name) => require_non_empty("name", name)?.to_owned(),
            None => existing.name,
        };
        let description = request
            .description
            .clone()
            .map_or(existing.description, |d| normalize_optional(Some(d)));
        let status = request.status.unwrap_or(existing.status);

        let result = sqlx::query(
            r"
            UPDATE projects SET name = $1, description = $2, status = $3, updated_at = $4
            WHERE id = $5
            ",
        )
        .bind(&name)
        .bind(&description)
        .bind(status.as_str())
        .bind(Utc::now().to_rfc3339())
        .bind(project_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update project: {e}")))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(project_id).await
    }

    /// Delete a project; linked preps keep their description and lose the link
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn delete(&self, project_id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(project_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete project: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_project(row: &SqliteRow) -> AppResult<Project> {
    let status: String = row.get("status");
    Ok(Project {
        id: row_uuid(row, "id")?,
        name: row.get("name"),
        description: row.get("description"),
        status: ProjectStatus::parse(&status),
        created_at: row_timestamp(row, "created_at")?,
        updated_at: row_timestamp(row, "updated_at")?,
    })
}
