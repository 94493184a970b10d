// ABOUTME: Database operations for calendar sessions keyed by instance (day2026049, week202608)
// ABOUTME: Stores the coach conversation as JSON plus an optional weight reading
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

use super::{list_limit, row_json, row_timestamp, row_uuid};
use crate::calendar::{validate_instance, InstancePeriod};
use crate::errors::{AppError, AppResult};
use crate::llm::ChatMessage;

/// A calendar bucket holding a coach conversation and an optional weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier
    pub id: Uuid,
    /// Instance key (unique)
    pub instance: String,
    /// Stored conversation
    pub messages: Vec<ChatMessage>,
    /// Weight reading for the period
    pub weight: Option<f64>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Create-or-update payload for a session; omitted fields are preserved
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpsertSessionRequest {
    /// Replacement conversation (if provided)
    pub messages: Option<Vec<ChatMessage>>,
    /// New weight (if provided)
    pub weight: Option<f64>,
}

/// Session database operations manager
pub struct SessionManager {
    pool: SqlitePool,
}

impl SessionManager {
    /// Create a new session manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List sessions, newest instance first, optionally restricted to one period kind
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list(
        &self,
        period: Option<InstancePeriod>,
        limit: Option<u32>,
    ) -> AppResult<Vec<Session>> {
        let pattern = period.map(|p| format!("{}%", p.prefix()));
        let rows = sqlx::query(
            r"
            SELECT id, instance, messages, weight, created_at, updated_at
            FROM sessions
            WHERE ($1 IS NULL OR instance LIKE $1)
            ORDER BY instance DESC
            LIMIT $2
            ",
        )
        .bind(&pattern)
        .bind(list_limit(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list sessions: {e}")))?;

        rows.iter().map(row_to_session).collect()
    }

    /// Get the session for an instance key
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the database operation fails
    pub async fn get_by_instance(&self, instance: &str) -> AppResult<Option<Session>> {
        let instance = validate_instance(instance)?;
        let row = sqlx::query(
            r"
            SELECT id, instance, messages, weight, created_at, updated_at
            FROM sessions
            WHERE instance = $1
            ",
        )
        .bind(&instance)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get session: {e}")))?;

        row.as_ref().map(row_to_session).transpose()
    }

    /// Create the session for an instance or update the provided fields
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the database operation fails
    pub async fn upsert(&self, instance: &str, request: &UpsertSessionRequest) -> AppResult<Session> {
        let instance = validate_instance(instance)?;
        let existing = self.get_by_instance(&instance).await?;
        let (messages, weight) = match existing {
            Some(current) => (
                request.messages.clone().unwrap_or(current.messages),
                request.weight.or(current.weight),
            ),
            None => (request.messages.clone().unwrap_or_default(), request.weight),
        };
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r"
            INSERT INTO sessions (id, instance, messages, weight, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            ON CONFLICT(instance) DO UPDATE SET
                messages = excluded.messages,
                weight = excluded.weight,
                updated_at = excluded.updated_at
            ",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&instance)
        .bind(serde_json::to_string(&messages)?)
        .bind(weight)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.get_by_instance(&instance)
            .await?
            .ok_or_else(|| AppError::internal("Session missing after upsert"))
    }

    /// Get the session for an instance, creating an empty one if absent
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the database operation fails
    pub async fn get_or_create(&self, instance: &str) -> AppResult<Session> {
        if let Some(session) = self.get_by_instance(instance).await? {
            return Ok(session);
        }
        self.upsert(instance, &UpsertSessionRequest::default()).await
    }

    /// Delete the session for an instance
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the database operation fails
    pub async fn delete(&self, instance: &str) -> AppResult<bool> {
        let instance = validate_instance(instance)?;
        let result = sqlx::query("DELETE FROM sessions WHERE instance = $1")
            .bind(&instance)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete session: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_session(row: &SqliteRow) -> AppResult<Session> {
    Ok(Session {
        id: row_uuid(row, "id")?,
        instance: row.get("instance"),
        messages: row_json(row, "messages")?,
        weight: row.get("weight"),
        created_at: row_timestamp(row, "created_at")?,
        updated_at: row_timestamp(row, "updated_at")?,
    })
}
