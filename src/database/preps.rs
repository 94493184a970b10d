// ABOUTME: Database operations for prep tasks planned into a week
// ABOUTME: CRUD scoped by week with optional project links
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

use super::{list_limit, row_optional_uuid, row_timestamp, row_uuid};
use crate::errors::{require_non_empty, AppError, AppResult};
use crate::models::DayOfWeek;

/// A prep task (chop, marinate, bake ahead) for a week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prep {
    /// Unique identifier
    pub id: Uuid,
    /// Owning week
    pub week_id: Uuid,
    /// Linked project, if any
    pub project_id: Option<Uuid>,
    /// What to prep
    pub description: String,
    /// Planned day
    pub day: Option<DayOfWeek>,
    /// Whether it is done
    pub completed: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Request to create a prep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePrepRequest {
    /// Owning week
    pub week_id: Uuid,
    /// Linked project
    #[serde(default)]
    pub project_id: Option<Uuid>,
    /// What to prep
    pub description: String,
    /// Planned day
    #[serde(default)]
    pub day: Option<DayOfWeek>,
    /// Already done
    #[serde(default)]
    pub completed: bool,
}

/// Partial update for a prep
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePrepRequest {
    /// New project link (if provided)
    pub project_id: Option<Uuid>,
    /// New description (if provided)
    pub description: Option<String>,
    /// New day (if provided)
    pub day: Option<DayOfWeek>,
    /// New completion flag (if provided)
    pub completed: Option<bool>,
}

/// Prep database operations manager
pub struct PrepManager {
    pool: SqlitePool,
}

impl PrepManager {
    /// Create a new prep manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List preps, optionally for one week
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list(&self, week_id: Option<&str>, limit: Option<u32>) -> AppResult<Vec<Prep>> {
        let rows = sqlx::query(
            r"
            SELECT id, week_id, project_id, description, day, completed, created_at, updated_at
            FROM preps
            WHERE ($1 IS NULL OR week_id = $1)
            ORDER BY created_at ASC
            LIMIT $2
            ",
        )
        .bind(week_id)
        .bind(list_limit(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list preps: {e}")))?;

        rows.iter().map(row_to_prep).collect()
    }

    /// Get a prep by ID
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, prep_id: &str) -> AppResult<Option<Prep>> {
        let row = sqlx::query(
            r"
            SELECT id, week_id, project_id, description, day, completed, created_at, updated_at
            FROM preps
            WHERE id = $1
            ",
        )
        .bind(prep_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get prep: {e}")))?;

        row.as_ref().map(row_to_prep).transpose()
    }

    /// Create a prep
    ///
    /// # Errors
    ///
    /// Returns an error if the description is blank, the week or project
    /// does not exist, or the database operation fails
    pub async fn create(&self, request: &CreatePrepRequest) -> AppResult<Prep> {
        let now = Utc::now();
        let prep = Prep {
            id: Uuid::new_v4(),
            week_id: request.week_id,
            project_id: request.project_id,
            description: require_non_empty("description", &request.description)?.to_owned(),
            day: request.day,
            completed: request.completed,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r"
            INSERT INTO preps (
                id, week_id, project_id, description, day, completed, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            ",
        )
        .bind(prep.id.to_string())
        .bind(prep.week_id.to_string())
        .bind(prep.project_id.map(|id| id.to_string()))
        .bind(&prep.description)
        .bind(prep.day.map(|d| d.as_str()))
        .bind(prep.completed)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(prep)
    }

    /// Apply a partial update
    ///
    /// # Errors
    ///
    /// Returns an error if a provided description is blank or the database operation fails
    pub async fn update(&self, prep_id: &str, request: &UpdatePrepRequest) -> AppResult<Option<Prep>> {
        let Some(existing) = self.get(prep_id).await? else {
            return Ok(None);
        };

        let description = match &request.description {
            Some(d) => require_non_empty("description", d)?.to_owned(),
            None => existing.description,
        };

        let result = sqlx::query(
            r"
            UPDATE preps SET
                project_id = $1, description = $2, day = $3, completed = $4, updated_at = $5
            WHERE id = $6
            ",
        )
        .bind(request.project_id.or(existing.project_id).map(|id| id.to_string()))
        .bind(&description)
        .bind(request.day.or(existing.day).map(|d| d.as_str()))
        .bind(request.completed.unwrap_or(existing.completed))
        .bind(Utc::now().to_rfc3339())
        .bind(prep_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(prep_id).await
    }

    /// Delete a prep
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn delete(&self, prep_id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM preps WHERE id = $1")
            .bind(prep_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete prep: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_prep(row: &SqliteRow) -> AppResult<Prep> {
    let day: Option<String> = row.get("day");
    Ok(Prep {
        id: row_uuid(row, "id")?,
        week_id: row_uuid(row, "week_id")?,
        project_id: row_optional_uuid(row, "project_id")?,
        description: row.get("description"),
        day: day.as_deref().and_then(DayOfWeek::parse),
        completed: row.get("completed"),
        created_at: row_timestamp(row, "created_at")?,
        updated_at: row_timestamp(row, "updated_at")?,
    })
}
