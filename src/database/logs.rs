// ABOUTME: Database operations for habit and activity logs bucketed by instance
// ABOUTME: CRUD with instance and category filters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

use super::{list_limit, normalize_optional, row_timestamp, row_uuid};
use crate::calendar::validate_instance;
use crate::errors::{require_non_empty, AppError, AppResult};

/// One logged event (habit tick, meal eaten, workout)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Log {
    /// Unique identifier
    pub id: Uuid,
    /// Instance key the log belongs to
    pub instance: String,
    /// Free-text category, lowercased
    pub category: String,
    /// What happened
    pub content: String,
    /// Optional numeric measure (minutes, reps, grams)
    pub value: Option<f64>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Request to create a log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLogRequest {
    /// Instance key
    pub instance: String,
    /// Category
    pub category: String,
    /// What happened
    pub content: String,
    /// Numeric measure
    #[serde(default)]
    pub value: Option<f64>,
}

/// Partial update for a log
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateLogRequest {
    /// New instance (if provided)
    pub instance: Option<String>,
    /// New category (if provided)
    pub category: Option<String>,
    /// New content (if provided)
    pub content: Option<String>,
    /// New value (if provided)
    pub value: Option<f64>,
}

/// Filter options for listing logs
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListLogsFilter {
    /// Exact instance key
    pub instance: Option<String>,
    /// Exact category
    pub category: Option<String>,
    /// Maximum number of results
    pub limit: Option<u32>,
}

/// Log database operations manager
pub struct LogManager {
    pool: SqlitePool,
}

impl LogManager {
    /// Create a new log manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List logs, oldest first within the filter
    ///
    /// # Errors
    ///
    /// Returns an error if an instance filter is malformed or the database operation fails
    pub async fn list(&self, filter: &ListLogsFilter) -> AppResult<Vec<Log>> {
        let instance = normalize_optional(filter.instance.clone())
            .map(|i| validate_instance(&i))
            .transpose()?;
        let category = normalize_optional(filter.category.clone()).map(|c| c.to_lowercase());

        let rows = sqlx::query(
            r"
            SELECT id, instance, category, content, value, created_at, updated_at
            FROM logs
            WHERE ($1 IS NULL OR instance = $1)
              AND ($2 IS NULL OR category = $2)
            ORDER BY created_at ASC
            LIMIT $3
            ",
        )
        .bind(&instance)
        .bind(&category)
        .bind(list_limit(filter.limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list logs: {e}")))?;

        rows.iter().map(row_to_log).collect()
    }

    /// Get a log by ID
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, log_id: &str) -> AppResult<Option<Log>> {
        let row = sqlx::query(
            r"
            SELECT id, instance, category, content, value, created_at, updated_at
            FROM logs
            WHERE id = $1
            ",
        )
        .bind(log_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get log: {e}")))?;

        row.as_ref().map(row_to_log).transpose()
    }

    /// Create a log
    ///
    /// # Errors
    ///
    /// Returns an error if a required field is blank, the instance key is
    /// invalid, or the database operation fails
    pub async fn create(&self, request: &CreateLogRequest) -> AppResult<Log> {
        let instance = validate_instance(require_non_empty("instance", &request.instance)?)?;
        let now = Utc::now();
        let log = Log {
            id: Uuid::new_v4(),
            instance,
            category: require_non_empty("category", &request.category)?.to_lowercase(),
            content: require_non_empty("content", &request.content)?.to_owned(),
            value: request.value,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r"
            INSERT INTO logs (id, instance, category, content, value, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            ",
        )
        .bind(log.id.to_string())
        .bind(&log.instance)
        .bind(&log.category)
        .bind(&log.content)
        .bind(log.value)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(log)
    }

    /// Apply a partial update
    ///
    /// # Errors
    ///
    /// Returns an error if a provided field is invalid or the database operation fails
    pub async fn update(&self, log_id: &str, request: &UpdateLogRequest) -> AppResult<Option<Log>> {
        let Some(existing) = self.get(log_id).await? else {
            return Ok(None);
        };

        let instance = match &request.instance {
            Some(i) => validate_instance(i)?,
            None => existing.instance,
        };
        let category = match &request.category {
            Some(c) => require_non_empty("category", c)?.to_lowercase(),
            None => existing.category,
        };
        let content = match &request.content {
            Some(c) => require_non_empty("content", c)?.to_owned(),
            None => existing.content,
        };

        let result = sqlx::query(
            r"
            UPDATE logs SET instance = $1, category = $2, content = $3, value = $4, updated_at = $5
            WHERE id = $6
            ",
        )
        .bind(&instance)
        .bind(&category)
        .bind(&content)
        .bind(request.value.or(existing.value))
        .bind(Utc::now().to_rfc3339())
        .bind(log_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update log: {e}")))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(log_id).await
    }

    /// Delete a log
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn delete(&self, log_id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM logs WHERE id = $1")
            .bind(log_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete log: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_log(row: &SqliteRow) -> AppResult<Log> {
    Ok(Log {
        id: row_uuid(row, "id")?,
        instance: row.get("instance"),
        category: row.get("category"),
        content: row.get("content"),
        value: row.get("value"),
        created_at: row_timestamp(row, "created_at")?,
        updated_at: row_timestamp(row, "updated_at")?,
    })
}
