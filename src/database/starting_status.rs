// ABOUTME: Database operations for a week's starting status (what is already on hand)
// ABOUTME: Exactly one record per week, written through upsert
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

use super::{normalize_optional, row_json, row_timestamp, row_uuid};
use crate::errors::{AppError, AppResult};

/// Inventory and notes at the start of a week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartingStatus {
    /// Unique identifier
    pub id: Uuid,
    /// Owning week (unique)
    pub week_id: Uuid,
    /// Items already on hand
    pub inventory: Vec<String>,
    /// Notes
    pub notes: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Full replacement of a week's starting status
///
/// Omitted fields keep their stored value when a record already exists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpsertStartingStatusRequest {
    /// Items on hand
    pub inventory: Option<Vec<String>>,
    /// Notes
    pub notes: Option<String>,
}

/// Starting status database operations manager
pub struct StartingStatusManager {
    pool: SqlitePool,
}

impl StartingStatusManager {
    /// Create a new starting status manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a status by its own ID
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, status_id: &str) -> AppResult<Option<StartingStatus>> {
        let row = sqlx::query(
            r"
            SELECT id, week_id, inventory, notes, created_at, updated_at
            FROM starting_statuses
            WHERE id = $1
            ",
        )
        .bind(status_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get starting status: {e}")))?;

        row.as_ref().map(row_to_status).transpose()
    }

    /// Get the status for a week
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get_for_week(&self, week_id: &str) -> AppResult<Option<StartingStatus>> {
        let row = sqlx::query(
            r"
            SELECT id, week_id, inventory, notes, created_at, updated_at
            FROM starting_statuses
            WHERE week_id = $1
            ",
        )
        .bind(week_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get starting status: {e}")))?;

        row.as_ref().map(row_to_status).transpose()
    }

    /// Create or replace the status for a week
    ///
    /// # Errors
    ///
    /// Returns an error if the week does not exist or the database operation fails
    pub async fn upsert_for_week(
        &self,
        week_id: &str,
        request: &UpsertStartingStatusRequest,
    ) -> AppResult<StartingStatus> {
        let existing = self.get_for_week(week_id).await?;
        let (inventory, notes) = match existing {
            Some(current) => (
                request.inventory.clone().unwrap_or(current.inventory),
                request
                    .notes
                    .clone()
                    .map_or(current.notes, |n| normalize_optional(Some(n))),
            ),
            None => (
                request.inventory.clone().unwrap_or_default(),
                normalize_optional(request.notes.clone()),
            ),
        };
        let inventory: Vec<String> = inventory
            .iter()
            .map(|i| i.trim())
            .filter(|i| !i.is_empty())
            .map(ToOwned::to_owned)
            .collect();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r"
            INSERT INTO starting_statuses (id, week_id, inventory, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            ON CONFLICT(week_id) DO UPDATE SET
                inventory = excluded.inventory,
                notes = excluded.notes,
                updated_at = excluded.updated_at
            ",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(week_id)
        .bind(serde_json::to_string(&inventory)?)
        .bind(&notes)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.get_for_week(week_id)
            .await?
            .ok_or_else(|| AppError::internal("Starting status missing after upsert"))
    }

    /// Delete the status for a week
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn delete_for_week(&self, week_id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM starting_statuses WHERE week_id = $1")
            .bind(week_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete starting status: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_status(row: &SqliteRow) -> AppResult<StartingStatus> {
    Ok(StartingStatus {
        id: row_uuid(row, "id")?,
        week_id: row_uuid(row, "week_id")?,
        inventory: row_json(row, "inventory")?,
        notes: row.get("notes"),
        created_at: row_timestamp(row, "created_at")?,
        updated_at: row_timestamp(row, "updated_at")?,
    })
}
