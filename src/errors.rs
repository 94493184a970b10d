// ABOUTME: Unified error type with standard error codes and HTTP response mapping
// ABOUTME: Converts storage, serialization, and extraction failures into AppError
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Unified error handling
//!
//! Every fallible operation in the crate returns [`AppResult`]. Handlers return
//! `Result<Response, AppError>` and rely on the [`IntoResponse`] implementation
//! below to produce a JSON body of the form
//! `{"error": {"code": "...", "message": "..."}}` with the matching status.

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use std::fmt;
use tracing::error;

/// Result alias used throughout the crate
pub type AppResult<T> = Result<T, AppError>;

/// Standard error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Malformed or semantically invalid input
    InvalidInput,
    /// A required field was absent or empty
    MissingRequiredField,
    /// Requested entity does not exist
    ResourceNotFound,
    /// Natural-key uniqueness violated
    ResourceConflict,
    /// Storage layer failure
    DatabaseError,
    /// Upstream HTTP service (LLM, media host) failed
    ExternalServiceError,
    /// Server misconfiguration
    ConfigError,
    /// Anything else
    InternalError,
}

impl ErrorCode {
    /// HTTP status for this code
    #[must_use]
    pub const fn http_status(self) -> StatusCode {
        match self {
            Self::InvalidInput | Self::MissingRequiredField => StatusCode::BAD_REQUEST,
            Self::ResourceNotFound => StatusCode::NOT_FOUND,
            Self::ResourceConflict => StatusCode::CONFLICT,
            Self::ExternalServiceError => StatusCode::BAD_GATEWAY,
            Self::DatabaseError | Self::ConfigError | Self::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable string form used in response bodies
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::MissingRequiredField => "missing_required_field",
            Self::ResourceNotFound => "resource_not_found",
            Self::ResourceConflict => "resource_conflict",
            Self::DatabaseError => "database_error",
            Self::ExternalServiceError => "external_service_error",
            Self::ConfigError => "config_error",
            Self::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application error carrying a code and a human-readable message
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct AppError {
    /// Classification of the failure
    pub code: ErrorCode,
    /// Message safe to return to clients
    pub message: String,
}

impl AppError {
    /// Create an error with an explicit code
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Invalid input (400)
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Missing required field (400)
    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingRequiredField,
            format!("Missing required field: {field}"),
        )
    }

    /// Entity not found (404)
    pub fn not_found(what: impl Into<String>) -> Self {
        let what = what.into();
        Self::new(ErrorCode::ResourceNotFound, format!("{what} not found"))
    }

    /// Uniqueness conflict (409)
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ResourceConflict, message)
    }

    /// Storage failure (500)
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Upstream service failure (502)
    pub fn external_service(service: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{service} error: {message}"),
        )
    }

    /// Configuration failure (500)
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Internal failure (500)
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// HTTP status for this error
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.http_status();
        if status.is_server_error() {
            error!(code = %self.code, "Request failed: {}", self.message);
        }
        let body = json!({
            "error": {
                "code": self.code,
                "message": self.message,
            }
        });
        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                Self::conflict(format!("Duplicate entry: {}", db_err.message()))
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                Self::invalid_input(format!("Referenced entity does not exist: {}", db_err.message()))
            }
            sqlx::Error::RowNotFound => Self::not_found("Row"),
            _ => Self::database(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(format!("Serialization failed: {err}"))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        if message.contains("missing field") {
            Self::new(ErrorCode::MissingRequiredField, message)
        } else {
            Self::invalid_input(message)
        }
    }
}

/// JSON extractor that reports body errors as [`AppError`] (400) instead of
/// axum's default 415/422 plain-text rejections
#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl<T: Serialize> IntoResponse for AppJson<T> {
    fn into_response(self) -> Response {
        Json(self.0).into_response()
    }
}

/// Reject empty or whitespace-only strings for a required field
///
/// # Errors
///
/// Returns `MissingRequiredField` if the value is blank
pub fn require_non_empty<'a>(field: &str, value: &'a str) -> AppResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::missing_field(field));
    }
    Ok(trimmed)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::missing_field("name").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::not_found("Week").http_status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::conflict("dup").http_status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::external_service("LLM", "timeout").http_status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::database("boom").http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(AppError::not_found("Recipe abc").to_string(), "Recipe abc not found");
        assert_eq!(
            AppError::missing_field("name").to_string(),
            "Missing required field: name"
        );
        assert_eq!(
            AppError::external_service("Media host", "503").to_string(),
            "Media host error: 503"
        );
    }

    #[test]
    fn test_require_non_empty() {
        assert_eq!(require_non_empty("name", "  Chili ").ok(), Some("Chili"));
        let err = require_non_empty("name", "   ").unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingRequiredField);
    }
}
