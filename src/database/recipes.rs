// ABOUTME: Database operations for the recipe collection
// ABOUTME: CRUD with text search and tag filtering over JSON-encoded lists
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

use super::{like_contains, list_limit, normalize_optional, row_json, row_optional_u32, row_timestamp, row_uuid};
use crate::errors::{require_non_empty, AppError, AppResult};

/// A saved recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique identifier
    pub id: Uuid,
    /// Recipe name
    pub name: String,
    /// Short description
    pub description: Option<String>,
    /// Ingredient lines, e.g. "2 cups rice"
    pub ingredients: Vec<String>,
    /// Ordered instruction steps
    pub instructions: Vec<String>,
    /// Number of servings
    pub servings: Option<u32>,
    /// Preparation time in minutes
    pub prep_time_mins: Option<u32>,
    /// Cooking time in minutes
    pub cook_time_mins: Option<u32>,
    /// Tags for filtering
    pub tags: Vec<String>,
    /// Where the recipe came from
    pub source_url: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    /// Total active plus passive time, when either is known
    #[must_use]
    pub fn total_time_mins(&self) -> Option<u32> {
        match (self.prep_time_mins, self.cook_time_mins) {
            (None, None) => None,
            (prep, cook) => Some(prep.unwrap_or(0) + cook.unwrap_or(0)),
        }
    }
}

/// Request to create a recipe
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateRecipeRequest {
    /// Recipe name
    pub name: String,
    /// Short description
    #[serde(default)]
    pub description: Option<String>,
    /// Ingredient lines
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// Instruction steps
    #[serde(default)]
    pub instructions: Vec<String>,
    /// Number of servings
    #[serde(default)]
    pub servings: Option<u32>,
    /// Preparation time in minutes
    #[serde(default)]
    pub prep_time_mins: Option<u32>,
    /// Cooking time in minutes
    #[serde(default)]
    pub cook_time_mins: Option<u32>,
    /// Tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Source link
    #[serde(default)]
    pub source_url: Option<String>,
}

/// Partial update for a recipe
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRecipeRequest {
    /// New name (if provided)
    pub name: Option<String>,
    /// New description (if provided)
    pub description: Option<String>,
    /// New ingredient lines (if provided)
    pub ingredients: Option<Vec<String>>,
    /// New instruction steps (if provided)
    pub instructions: Option<Vec<String>>,
    /// New servings (if provided)
    pub servings: Option<u32>,
    /// New prep time (if provided)
    pub prep_time_mins: Option<u32>,
    /// New cook time (if provided)
    pub cook_time_mins: Option<u32>,
    /// New tags (if provided)
    pub tags: Option<Vec<String>>,
    /// New source link (if provided)
    pub source_url: Option<String>,
}

/// Filter options for listing recipes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListRecipesFilter {
    /// Substring matched against name, description and tags
    pub q: Option<String>,
    /// Exact tag (case-insensitive)
    pub tag: Option<String>,
    /// Maximum number of results
    pub limit: Option<u32>,
}

/// Recipe database operations manager
pub struct RecipeManager {
    pool: SqlitePool,
}

impl RecipeManager {
    /// Create a new recipe manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List recipes alphabetically with optional search and tag filters
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list(&self, filter: &ListRecipesFilter) -> AppResult<Vec<Recipe>> {
        let pattern = normalize_optional(filter.q.clone()).map(|q| like_contains(&q));
        let tag = normalize_optional(filter.tag.clone());

        let rows = sqlx::query(
            r"
            SELECT id, name, description, ingredients, instructions, servings,
                   prep_time_mins, cook_time_mins, tags, source_url, created_at, updated_at
            FROM recipes
            WHERE ($1 IS NULL
                   OR name LIKE $1 ESCAPE '\'
                   OR description LIKE $1 ESCAPE '\'
                   OR EXISTS (
                        SELECT 1 FROM json_each(recipes.tags) WHERE json_each.value LIKE $1 ESCAPE '\'
                   ))
              AND ($2 IS NULL OR EXISTS (
                    SELECT 1 FROM json_each(recipes.tags) WHERE lower(json_each.value) = lower($2)
                  ))
            ORDER BY name COLLATE NOCASE ASC
            LIMIT $3
            ",
        )
        .bind(&pattern)
        .bind(&tag)
        .bind(list_limit(filter.limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list recipes: {e}")))?;

        rows.iter().map(row_to_recipe).collect()
    }

    /// Get a recipe by ID
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails or data deserialization fails
    pub async fn get(&self, recipe_id: &str) -> AppResult<Option<Recipe>> {
        let row = sqlx::query(
            r"
            SELECT id, name, description, ingredients, instructions, servings,
                   prep_time_mins, cook_time_mins, tags, source_url, created_at, updated_at
            FROM recipes
            WHERE id = $1
            ",
        )
        .bind(recipe_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get recipe: {e}")))?;

        row.as_ref().map(row_to_recipe).transpose()
    }

    /// Create a recipe
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the database operation fails
    pub async fn create(&self, request: &CreateRecipeRequest) -> AppResult<Recipe> {
        let name = require_non_empty("name", &request.name)?.to_owned();
        let now = Utc::now();
        let recipe = Recipe {
            id: Uuid::new_v4(),
            name,
            description: normalize_optional(request.description.clone()),
            ingredients: clean_lines(&request.ingredients),
            instructions: clean_lines(&request.instructions),
            servings: request.servings,
            prep_time_mins: request.prep_time_mins,
            cook_time_mins: request.cook_time_mins,
            tags: clean_tags(&request.tags),
            source_url: normalize_optional(request.source_url.clone()),
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r"
            INSERT INTO recipes (
                id, name, description, ingredients, instructions, servings,
                prep_time_mins, cook_time_mins, tags, source_url, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
            ",
        )
        .bind(recipe.id.to_string())
        .bind(&recipe.name)
        .bind(&recipe.description)
        .bind(serde_json::to_string(&recipe.ingredients)?)
        .bind(serde_json::to_string(&recipe.instructions)?)
        .bind(recipe.servings.map(i64::from))
        .bind(recipe.prep_time_mins.map(i64::from))
        .bind(recipe.cook_time_mins.map(i64::from))
        .bind(serde_json::to_string(&recipe.tags)?)
        .bind(&recipe.source_url)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(recipe)
    }

    /// Apply a partial update
    ///
    /// # Errors
    ///
    /// Returns an error if a provided name is blank or the database operation fails
    pub async fn update(
        &self,
        recipe_id: &str,
        request: &UpdateRecipeRequest,
    ) -> AppResult<Option<Recipe>> {
        let Some(existing) = self.get(recipe_id).await? else {
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
        let ingredients = request
            .ingredients
            .as_deref()
            .map_or(existing.ingredients, clean_lines);
        let instructions = request
            .instructions
            .as_deref()
            .map_or(existing.instructions, clean_lines);
        let tags = request.tags.as_deref().map_or(existing.tags, clean_tags);
        let source_url = request
            .source_url
            .clone()
            .map_or(existing.source_url, |u| normalize_optional(Some(u)));

        let result = sqlx::query(
            r"
            UPDATE recipes SET
                name = $1, description = $2, ingredients = $3, instructions = $4,
                servings = $5, prep_time_mins = $6, cook_time_mins = $7,
                tags = $8, source_url = $9, updated_at = $10
            WHERE id = $11
            ",
        )
        .bind(&name)
        .bind(&description)
        .bind(serde_json::to_string(&ingredients)?)
        .bind(serde_json::to_string(&instructions)?)
        .bind(request.servings.or(existing.servings).map(i64::from))
        .bind(request.prep_time_mins.or(existing.prep_time_mins).map(i64::from))
        .bind(request.cook_time_mins.or(existing.cook_time_mins).map(i64::from))
        .bind(serde_json::to_string(&tags)?)
        .bind(&source_url)
        .bind(Utc::now().to_rfc3339())
        .bind(recipe_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update recipe: {e}")))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(recipe_id).await
    }

    /// Delete a recipe; cooks that referenced it keep their title and lose the link
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn delete(&self, recipe_id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(recipe_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete recipe: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

fn clean_lines(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

fn clean_tags(tags: &[String]) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !cleaned.contains(&tag) {
            cleaned.push(tag);
        }
    }
    cleaned
}

fn row_to_recipe(row: &SqliteRow) -> AppResult<Recipe> {
    Ok(Recipe {
        id: row_uuid(row, "id")?,
        name: row.get("name"),
        description: row.get("description"),
        ingredients: row_json(row, "ingredients")?,
        instructions: row_json(row, "instructions")?,
        servings: row_optional_u32(row, "servings"),
        prep_time_mins: row_optional_u32(row, "prep_time_mins"),
        cook_time_mins: row_optional_u32(row, "cook_time_mins"),
        tags: row_json(row, "tags")?,
        source_url: row.get("source_url"),
        created_at: row_timestamp(row, "created_at")?,
        updated_at: row_timestamp(row, "updated_at")?,
    })
}
