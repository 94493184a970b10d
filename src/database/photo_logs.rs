// ABOUTME: Database operations for photo logs (uploaded images tied to an instance)
// ABOUTME: Stores the media host reference returned by the upload client
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

/// A photo attached to a calendar instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoLog {
    /// Unique identifier
    pub id: Uuid,
    /// Instance key
    pub instance: String,
    /// Caption
    pub caption: Option<String>,
    /// Public image URL on the media host
    pub image_url: String,
    /// Media host identifier
    pub media_id: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Request to record an already-uploaded photo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePhotoLogRequest {
    /// Instance key
    pub instance: String,
    /// Caption
    pub caption: Option<String>,
    /// Public image URL
    pub image_url: String,
    /// Media host identifier
    pub media_id: String,
}

/// Photo log database operations manager
pub struct PhotoLogManager {
    pool: SqlitePool,
}

impl PhotoLogManager {
    /// Create a new photo log manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List photo logs, newest first, optionally for one instance
    ///
    /// # Errors
    ///
    /// Returns an error if an instance filter is malformed or the database operation fails
    pub async fn list(&self, instance: Option<&str>, limit: Option<u32>) -> AppResult<Vec<PhotoLog>> {
        let instance = instance.map(validate_instance).transpose()?;
        let rows = sqlx::query(
            r"
            SELECT id, instance, caption, image_url, media_id, created_at, updated_at
            FROM photo_logs
            WHERE ($1 IS NULL OR instance = $1)
            ORDER BY created_at DESC
            LIMIT $2
            ",
        )
        .bind(&instance)
        .bind(list_limit(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list photo logs: {e}")))?;

        rows.iter().map(row_to_photo_log).collect()
    }

    /// Get a photo log by ID
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, photo_log_id: &str) -> AppResult<Option<PhotoLog>> {
        let row = sqlx::query(
            r"
            SELECT id, instance, caption, image_url, media_id, created_at, updated_at
            FROM photo_logs
            WHERE id = $1
            ",
        )
        .bind(photo_log_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get photo log: {e}")))?;

        row.as_ref().map(row_to_photo_log).transpose()
    }

    /// Record a photo log
    ///
    /// # Errors
    ///
    /// Returns an error if the instance is invalid, the image reference is
    /// blank, or the database operation fails
    pub async fn create(&self, request: &CreatePhotoLogRequest) -> AppResult<PhotoLog> {
        let now = Utc::now();
        let photo = PhotoLog {
            id: Uuid::new_v4(),
            instance: validate_instance(require_non_empty("instance", &request.instance)?)?,
            caption: normalize_optional(request.caption.clone()),
            image_url: require_non_empty("image_url", &request.image_url)?.to_owned(),
            media_id: require_non_empty("media_id", &request.media_id)?.to_owned(),
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r"
            INSERT INTO photo_logs (
                id, instance, caption, image_url, media_id, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $6)
            ",
        )
        .bind(photo.id.to_string())
        .bind(&photo.instance)
        .bind(&photo.caption)
        .bind(&photo.image_url)
        .bind(&photo.media_id)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(photo)
    }

    /// Delete a photo log record (the hosted image is left in place)
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn delete(&self, photo_log_id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM photo_logs WHERE id = $1")
            .bind(photo_log_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete photo log: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_photo_log(row: &SqliteRow) -> AppResult<PhotoLog> {
    Ok(PhotoLog {
        id: row_uuid(row, "id")?,
        instance: row.get("instance"),
        caption: row.get("caption"),
        image_url: row.get("image_url"),
        media_id: row.get("media_id"),
        created_at: row_timestamp(row, "created_at")?,
        updated_at: row_timestamp(row, "updated_at")?,
    })
}
