// ABOUTME: Core database management with embedded migrations for SQLite
// ABOUTME: Owns the connection pool and hands out per-entity managers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Cook (planned meal) storage
pub mod cooks;
/// Habit and activity log storage
pub mod logs;
/// Photo log storage
pub mod photo_logs;
/// Prep task storage
pub mod preps;
/// Prep project storage
pub mod projects;
/// Recipe storage
pub mod recipes;
/// Coach session storage keyed by instance
pub mod sessions;
/// Shopping list storage
pub mod shops;
/// Per-week starting inventory storage
pub mod starting_status;
/// Planning week storage
pub mod weeks;

pub use cooks::{Cook, CookManager, CreateCookRequest, UpdateCookRequest};
pub use logs::{CreateLogRequest, ListLogsFilter, Log, LogManager, UpdateLogRequest};
pub use photo_logs::{CreatePhotoLogRequest, PhotoLog, PhotoLogManager};
pub use preps::{CreatePrepRequest, Prep, PrepManager, UpdatePrepRequest};
pub use projects::{CreateProjectRequest, Project, ProjectManager, UpdateProjectRequest};
pub use recipes::{CreateRecipeRequest, ListRecipesFilter, Recipe, RecipeManager, UpdateRecipeRequest};
pub use sessions::{Session, SessionManager, UpsertSessionRequest};
pub use shops::{CreateShopRequest, Shop, ShopManager, UpdateShopRequest};
pub use starting_status::{StartingStatus, StartingStatusManager, UpsertStartingStatusRequest};
pub use weeks::{CreateWeekRequest, UpdateWeekRequest, Week, WeekManager};

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use tracing::info;
use uuid::Uuid;

use crate::constants::limits::{DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use crate::errors::{AppError, AppResult};

/// Connection pool shared by all managers
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect, create the file if needed, enable foreign keys and run migrations
    ///
    /// In-memory URLs get a single long-lived connection so every query sees
    /// the same database.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Database URL is invalid or malformed
    /// - Database connection fails
    /// - Migration process fails
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::config(format!("Invalid database URL: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true);

        let in_memory = is_memory_url(database_url);
        if !in_memory {
            if let Some(parent) = options.get_filename().parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        AppError::database(format!(
                            "Failed to create database directory {}: {e}",
                            parent.display()
                        ))
                    })?;
                }
            }
        }

        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Run all pending embedded migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any migration fails
    pub async fn migrate(&self) -> AppResult<()> {
        info!("Running database migrations...");

        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Migration failed: {e}")))?;

        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Get a reference to the pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Week operations
    #[must_use]
    pub fn weeks(&self) -> WeekManager {
        WeekManager::new(self.pool.clone())
    }

    /// Recipe operations
    #[must_use]
    pub fn recipes(&self) -> RecipeManager {
        RecipeManager::new(self.pool.clone())
    }

    /// Project operations
    #[must_use]
    pub fn projects(&self) -> ProjectManager {
        ProjectManager::new(self.pool.clone())
    }

    /// Cook operations
    #[must_use]
    pub fn cooks(&self) -> CookManager {
        CookManager::new(self.pool.clone())
    }

    /// Prep operations
    #[must_use]
    pub fn preps(&self) -> PrepManager {
        PrepManager::new(self.pool.clone())
    }

    /// Shopping list operations
    #[must_use]
    pub fn shops(&self) -> ShopManager {
        ShopManager::new(self.pool.clone())
    }

    /// Starting status operations
    #[must_use]
    pub fn starting_status(&self) -> StartingStatusManager {
        StartingStatusManager::new(self.pool.clone())
    }

    /// Session operations
    #[must_use]
    pub fn sessions(&self) -> SessionManager {
        SessionManager::new(self.pool.clone())
    }

    /// Log operations
    #[must_use]
    pub fn logs(&self) -> LogManager {
        LogManager::new(self.pool.clone())
    }

    /// Photo log operations
    #[must_use]
    pub fn photo_logs(&self) -> PhotoLogManager {
        PhotoLogManager::new(self.pool.clone())
    }
}

fn is_memory_url(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

// Row decoding helpers shared by the managers

pub(crate) fn row_uuid(row: &SqliteRow, column: &str) -> AppResult<Uuid> {
    let raw: String = row.get(column);
    Uuid::parse_str(&raw).map_err(|e| AppError::internal(format!("Invalid UUID in {column}: {e}")))
}

pub(crate) fn row_optional_uuid(row: &SqliteRow, column: &str) -> AppResult<Option<Uuid>> {
    let raw: Option<String> = row.get(column);
    raw.map(|s| {
        Uuid::parse_str(&s)
            .map_err(|e| AppError::internal(format!("Invalid UUID in {column}: {e}")))
    })
    .transpose()
}

pub(crate) fn row_timestamp(row: &SqliteRow, column: &str) -> AppResult<DateTime<Utc>> {
    let raw: String = row.get(column);
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::internal(format!("Invalid datetime in {column}: {e}")))
}

pub(crate) fn row_json<T: DeserializeOwned>(row: &SqliteRow, column: &str) -> AppResult<T> {
    let raw: String = row.get(column);
    Ok(serde_json::from_str(&raw)?)
}

pub(crate) fn row_optional_u32(row: &SqliteRow, column: &str) -> Option<u32> {
    row.get::<Option<i64>, _>(column)
        .and_then(|v| u32::try_from(v).ok())
}

/// Clamp a caller-supplied page size into the allowed range
pub(crate) fn list_limit(limit: Option<u32>) -> i64 {
    i64::from(limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT))
}

/// Trim an optional string, mapping blank to `None`
pub(crate) fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// `%term%` LIKE pattern with `\`, `%` and `_` escaped; pair with `ESCAPE '\'`
pub(crate) fn like_contains(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
