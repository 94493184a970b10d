// ABOUTME: Database operations for cooks (meals planned into a week)
// ABOUTME: CRUD scoped by week with optional recipe links
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

use super::{
    list_limit, normalize_optional, row_optional_u32, row_optional_uuid, row_timestamp, row_uuid,
};
use crate::errors::{require_non_empty, AppError, AppResult};
use crate::models::{DayOfWeek, MealSlot};

/// A meal planned for a week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cook {
    /// Unique identifier
    pub id: Uuid,
    /// Owning week
    pub week_id: Uuid,
    /// Linked recipe, if any
    pub recipe_id: Option<Uuid>,
    /// What is being cooked
    pub title: String,
    /// Planned day
    pub day: Option<DayOfWeek>,
    /// Meal slot
    pub meal: MealSlot,
    /// Servings to make
    pub servings: Option<u32>,
    /// Notes
    pub notes: Option<String>,
    /// Whether it has been cooked
    pub completed: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Request to create a cook
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCookRequest {
    /// Owning week
    pub week_id: Uuid,
    /// Linked recipe
    #[serde(default)]
    pub recipe_id: Option<Uuid>,
    /// What is being cooked
    pub title: String,
    /// Planned day
    #[serde(default)]
    pub day: Option<DayOfWeek>,
    /// Meal slot (defaults to dinner)
    #[serde(default)]
    pub meal: MealSlot,
    /// Servings
    #[serde(default)]
    pub servings: Option<u32>,
    /// Notes
    #[serde(default)]
    pub notes: Option<String>,
    /// Already cooked
    #[serde(default)]
    pub completed: bool,
}

/// Partial update for a cook
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCookRequest {
    /// New recipe link (if provided)
    pub recipe_id: Option<Uuid>,
    /// New title (if provided)
    pub title: Option<String>,
    /// New day (if provided)
    pub day: Option<DayOfWeek>,
    /// New meal slot (if provided)
    pub meal: Option<MealSlot>,
    /// New servings (if provided)
    pub servings: Option<u32>,
    /// New notes (if provided)
    pub notes: Option<String>,
    /// New completion flag (if provided)
    pub completed: Option<bool>,
}

const COOK_COLUMNS: &str = "id, week_id, recipe_id, title, day, meal, servings, notes, completed, created_at, updated_at";

/// Cook database operations manager
pub struct CookManager {
    pool: SqlitePool,
}

impl CookManager {
    /// Create a new cook manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List cooks, optionally for one week, in creation order
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list(&self, week_id: Option<&str>, limit: Option<u32>) -> AppResult<Vec<Cook>> {
        let sql = format!(
            "SELECT {COOK_COLUMNS} FROM cooks WHERE ($1 IS NULL OR week_id = $1) ORDER BY created_at ASC LIMIT $2"
        );
        let rows = sqlx::query(&sql)
            .bind(week_id)
            .bind(list_limit(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list cooks: {e}")))?;

        rows.iter().map(row_to_cook).collect()
    }

    /// Get a cook by ID
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, cook_id: &str) -> AppResult<Option<Cook>> {
        let sql = format!("SELECT {COOK_COLUMNS} FROM cooks WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(cook_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get cook: {e}")))?;

        row.as_ref().map(row_to_cook).transpose()
    }

    /// Create a cook
    ///
    /// # Errors
    ///
    /// Returns an error if the title is blank, the week or recipe does not
    /// exist, or the database operation fails
    pub async fn create(&self, request: &CreateCookRequest) -> AppResult<Cook> {
        let now = Utc::now();
        let cook = Cook {
            id: Uuid::new_v4(),
            week_id: request.week_id,
            recipe_id: request.recipe_id,
            title: require_non_empty("title", &request.title)?.to_owned(),
            day: request.day,
            meal: request.meal,
            servings: request.servings,
            notes: normalize_optional(request.notes.clone()),
            completed: request.completed,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r"
            INSERT INTO cooks (
                id, week_id, recipe_id, title, day, meal, servings, notes, completed,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            ",
        )
        .bind(cook.id.to_string())
        .bind(cook.week_id.to_string())
        .bind(cook.recipe_id.map(|id| id.to_string()))
        .bind(&cook.title)
        .bind(cook.day.map(|d| d.as_str()))
        .bind(cook.meal.as_str())
        .bind(cook.servings.map(i64::from))
        .bind(&cook.notes)
        .bind(cook.completed)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(cook)
    }

    /// Apply a partial update
    ///
    /// # Errors
    ///
    /// Returns an error if a provided title is blank or the database operation fails
    pub async fn update(&self, cook_id: &str, request: &UpdateCookRequest) -> AppResult<Option<Cook>> {
        let Some(existing) = self.get(cook_id).await? else {
            return Ok(None);
        };

        let title = match &request.title {
            Some(title) => require_non_empty("title", title)?.to_owned(),
            None => existing.title,
        };
        let notes = request
            .notes
            .clone()
            .map_or(existing.notes, |n| normalize_optional(Some(n)));

        let result = sqlx::query(
            r"
            UPDATE cooks SET
                recipe_id = $1, title = $2, day = $3, meal = $4, servings = $5,
                notes = $6, completed = $7, updated_at = $8
            WHERE id = $9
            ",
        )
        .bind(request.recipe_id.or(existing.recipe_id).map(|id| id.to_string()))
        .bind(&title)
        .bind(request.day.or(existing.day).map(|d| d.as_str()))
        .bind(request.meal.unwrap_or(existing.meal).as_str())
        .bind(request.servings.or(existing.servings).map(i64::from))
        .bind(&notes)
        .bind(request.completed.unwrap_or(existing.completed))
        .bind(Utc::now().to_rfc3339())
        .bind(cook_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(cook_id).await
    }

    /// Delete a cook
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn delete(&self, cook_id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM cooks WHERE id = $1")
            .bind(cook_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete cook: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_cook(row: &SqliteRow) -> AppResult<Cook> {
    let day: Option<String> = row.get("day");
    let meal: String = row.get("meal");
    Ok(Cook {
        id: row_uuid(row, "id")?,
        week_id: row_uuid(row, "week_id")?,
        recipe_id: row_optional_uuid(row, "recipe_id")?,
        title: row.get("title"),
        day: day.as_deref().and_then(DayOfWeek::parse),
        meal: MealSlot::parse(&meal),
        servings: row_optional_u32(row, "servings"),
        notes: row.get("notes"),
        completed: row.get("completed"),
        created_at: row_timestamp(row, "created_at")?,
        updated_at: row_timestamp(row, "updated_at")?,
    })
}
