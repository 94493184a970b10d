// ABOUTME: Database operations for planning weeks keyed by ISO year and week number
// ABOUTME: CRUD plus natural-key lookup and find-or-create for the current week
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

use super::{list_limit, normalize_optional, row_timestamp, row_uuid};
use crate::calendar::iso_week_range;
use crate::errors::{AppError, AppResult, ErrorCode};

/// A planning week; cooks, preps, shops and the starting status hang off it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Week {
    /// Unique identifier
    pub id: Uuid,
    /// ISO week-numbering year
    pub year: i32,
    /// ISO week number (1..=53)
    pub week_number: u32,
    /// Free-form notes
    pub notes: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Request to create a week
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWeekRequest {
    /// ISO week-numbering year
    pub year: i32,
    /// ISO week number
    pub week_number: u32,
    /// Free-form notes
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial update for a week
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateWeekRequest {
    /// New year (if provided)
    pub year: Option<i32>,
    /// New week number (if provided)
    pub week_number: Option<u32>,
    /// New notes (if provided)
    pub notes: Option<String>,
}

/// Week database operations manager
pub struct WeekManager {
    pool: SqlitePool,
}

impl WeekManager {
    /// Create a new week manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List weeks, most recent first
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list(&self, limit: Option<u32>) -> AppResult<Vec<Week>> {
        let rows = sqlx::query(
            r"
            SELECT id, year, week_number, notes, created_at, updated_at
            FROM weeks
            ORDER BY year DESC, week_number DESC
            LIMIT $1
            ",
        )
        .bind(list_limit(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list weeks: {e}")))?;

        rows.iter().map(row_to_week).collect()
    }

    /// Get a week by ID
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, week_id: &str) -> AppResult<Option<Week>> {
        let row = sqlx::query(
            r"
            SELECT id, year, week_number, notes, created_at, updated_at
            FROM weeks
            WHERE id = $1
            ",
        )
        .bind(week_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get week: {e}")))?;

        row.as_ref().map(row_to_week).transpose()
    }

    /// Get a week by its natural key
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get_by_year_week(&self, year: i32, week_number: u32) -> AppResult<Option<Week>> {
        let row = sqlx::query(
            r"
            SELECT id, year, week_number, notes, created_at, updated_at
            FROM weeks
            WHERE year = $1 AND week_number = $2
            ",
        )
        .bind(year)
        .bind(i64::from(week_number))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get week: {e}")))?;

        row.as_ref().map(row_to_week).transpose()
    }

    /// Create a week
    ///
    /// # Errors
    ///
    /// Returns an invalid-input error if the ISO week does not exist, or a
    /// conflict if the week already exists
    pub async fn create(&self, request: &CreateWeekRequest) -> AppResult<Week> {
        iso_week_range(request.year, request.week_number)?;

        let now = Utc::now();
        let week = Week {
            id: Uuid::new_v4(),
            year: request.year,
            week_number: request.week_number,
            notes: normalize_optional(request.notes.clone()),
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r"
            INSERT INTO weeks (id, year, week_number, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            ",
        )
        .bind(week.id.to_string())
        .bind(week.year)
        .bind(i64::from(week.week_number))
        .bind(&week.notes)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let err = AppError::from(e);
            if err.code == ErrorCode::ResourceConflict {
                AppError::conflict(format!(
                    "Week {} of {} already exists",
                    week.week_number, week.year
                ))
            } else {
                err
            }
        })?;

        Ok(week)
    }

    /// Find the week with this natural key or create it
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails or the week is invalid
    pub async fn get_or_create(&self, year: i32, week_number: u32) -> AppResult<Week> {
        if let Some(existing) = self.get_by_year_week(year, week_number).await? {
            return Ok(existing);
        }

        let request = CreateWeekRequest {
            year,
            week_number,
            notes: None,
        };
        match self.create(&request).await {
            Ok(week) => Ok(week),
            // Lost a race with a concurrent creator
            Err(err) if err.code == ErrorCode::ResourceConflict => self
                .get_by_year_week(year, week_number)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Week {week_number} of {year}"))),
            Err(err) => Err(err),
        }
    }

    /// Apply a partial update
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails or the new key is invalid
    pub async fn update(&self, week_id: &str, request: &UpdateWeekRequest) -> AppResult<Option<Week>> {
        let Some(existing) = self.get(week_id).await? else {
            return Ok(None);
        };

        let year = request.year.unwrap_or(existing.year);
        let week_number = request.week_number.unwrap_or(existing.week_number);
        if request.year.is_some() || request.week_number.is_some() {
            iso_week_range(year, week_number)?;
        }
        let notes = request
            .notes
            .clone()
            .map_or(existing.notes, |n| normalize_optional(Some(n)));

        let result = sqlx::query(
            r"
            UPDATE weeks SET year = $1, week_number = $2, notes = $3, updated_at = $4
            WHERE id = $5
            ",
        )
        .bind(year)
        .bind(i64::from(week_number))
        .bind(&notes)
        .bind(Utc::now().to_rfc3339())
        .bind(week_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(week_id).await
    }

    /// Delete a week; its cooks, preps, shops and starting status go with it
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn delete(&self, week_id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM weeks WHERE id = $1")
            .bind(week_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete week: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_week(row: &SqliteRow) -> AppResult<Week> {
    let week_number: i64 = row.get("week_number");
    Ok(Week {
        id: row_uuid(row, "id")?,
        year: row.get("year"),
        week_number: u32::try_from(week_number)
            .map_err(|e| AppError::internal(format!("Invalid week number: {e}")))?,
        notes: row.get("notes"),
        created_at: row_timestamp(row, "created_at")?,
        updated_at: row_timestamp(row, "updated_at")?,
    })
}
