// ABOUTME: Database operations for shopping list items planned into a week
// ABOUTME: CRUD scoped by week with purchased tracking
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

use super::{list_limit, normalize_optional, row_timestamp, row_uuid};
use crate::errors::{require_non_empty, AppError, AppResult};

/// One line on a week's shopping list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shop {
    /// Unique identifier
    pub id: Uuid,
    /// Owning week
    pub week_id: Uuid,
    /// Item to buy
    pub item: String,
    /// Free-form quantity, e.g. "2 lb"
    pub quantity: Option<String>,
    /// Store to buy it at
    pub store: Option<String>,
    /// Whether it has been bought
    pub purchased: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Request to create a shopping item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShopRequest {
    /// Owning week
    pub week_id: Uuid,
    /// Item to buy
    pub item: String,
    /// Quantity
    #[serde(default)]
    pub quantity: Option<String>,
    /// Store
    #[serde(default)]
    pub store: Option<String>,
    /// Already bought
    #[serde(default)]
    pub purchased: bool,
}

/// Partial update for a shopping item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateShopRequest {
    /// New item (if provided)
    pub item: Option<String>,
    /// New quantity (if provided)
    pub quantity: Option<String>,
    /// New store (if provided)
    pub store: Option<String>,
    /// New purchased flag (if provided)
    pub purchased: Option<bool>,
}

/// Shopping list database operations manager
pub struct ShopManager {
    pool: SqlitePool,
}

impl ShopManager {
    /// Create a new shop manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List items, optionally for one week; unpurchased first
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list(&self, week_id: Option<&str>, limit: Option<u32>) -> AppResult<Vec<Shop>> {
        let rows = sqlx::query(
            r"
            SELECT id, week_id, item, quantity, store, purchased, created_at, updated_at
            FROM shops
            WHERE ($1 IS NULL OR week_id = $1)
            ORDER BY purchased ASC, created_at ASC
            LIMIT $2
            ",
        )
        .bind(week_id)
        .bind(list_limit(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list shopping items: {e}")))?;

        rows.iter().map(row_to_shop).collect()
    }

    /// Get an item by ID
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, shop_id: &str) -> AppResult<Option<Shop>> {
        let row = sqlx::query(
            r"
            SELECT id, week_id, item, quantity, store, purchased, created_at, updated_at
            FROM shops
            WHERE id = $1
            ",
        )
        .bind(shop_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get shopping item: {e}")))?;

        row.as_ref().map(row_to_shop).transpose()
    }

    /// Create an item
    ///
    /// # Errors
    ///
    /// Returns an error if the item is blank, the week does not exist, or the
    /// database operation fails
    pub async fn create(&self, request: &CreateShopRequest) -> AppResult<Shop> {
        let now = Utc::now();
        let shop = Shop {
            id: Uuid::new_v4(),
            week_id: request.week_id,
            item: require_non_empty("item", &request.item)?.to_owned(),
            quantity: normalize_optional(request.quantity.clone()),
            store: normalize_optional(request.store.clone()),
            purchased: request.purchased,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r"
            INSERT INTO shops (
                id, week_id, item, quantity, store, purchased, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            ",
        )
        .bind(shop.id.to_string())
        .bind(shop.week_id.to_string())
        .bind(&shop.item)
        .bind(&shop.quantity)
        .bind(&shop.store)
        .bind(shop.purchased)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(shop)
    }

    /// Apply a partial update
    ///
    /// # Errors
    ///
    /// Returns an error if a provided item is blank or the database operation fails
    pub async fn update(&self, shop_id: &str, request: &UpdateShopRequest) -> AppResult<Option<Shop>> {
        let Some(existing) = self.get(shop_id).await? else {
            return Ok(None);
        };

        let item = match &request.item {
            Some(item) => require_non_empty("item", item)?.to_owned(),
            None => existing.item,
        };
        let quantity = request
            .quantity
            .clone()
            .map_or(existing.quantity, |q| normalize_optional(Some(q)));
        let store = request
            .store
            .clone()
            .map_or(existing.store, |s| normalize_optional(Some(s)));

        let result = sqlx::query(
            r"
            UPDATE shops SET item = $1, quantity = $2, store = $3, purchased = $4, updated_at = $5
            WHERE id = $6
            ",
        )
        .bind(&item)
        .bind(&quantity)
        .bind(&store)
        .bind(request.purchased.unwrap_or(existing.purchased))
        .bind(Utc::now().to_rfc3339())
        .bind(shop_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update shopping item: {e}")))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(shop_id).await
    }

    /// Delete an item
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn delete(&self, shop_id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM shops WHERE id = $1")
            .bind(shop_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete shopping item: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_shop(row: &SqliteRow) -> AppResult<Shop> {
    Ok(Shop {
        id: row_uuid(row, "id")?,
        week_id: row_uuid(row, "week_id")?,
        item: row.get("item"),
        quantity: row.get("quantity"),
        store: row.get("store"),
        purchased: row.get("purchased"),
        created_at: row_timestamp(row, "created_at")?,
        updated_at: row_timestamp(row, "updated_at")?,
    })
}
