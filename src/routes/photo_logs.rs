// ABOUTME: Photo log routes: multipart upload to the media host, then a stored record
// ABOUTME: Fields are `image` (file), `instance` and optional `caption`
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use bytes::Bytes;
use serde::Deserialize;
use tracing::info;

use crate::calendar::validate_instance;
use crate::database::CreatePhotoLogRequest;
use crate::errors::AppError;
use crate::mcp::resources::ServerResources;

#[derive(Debug, Default, Deserialize)]
struct ListPhotoLogsQuery {
    #[serde(default)]
    instance: Option<String>,
    #[serde(default)]
    limit: Option<u32>,
}

/// Parsed multipart upload
#[derive(Debug, Default)]
struct PhotoUpload {
    image: Option<(String, String, Bytes)>,
    instance: Option<String>,
    caption: Option<String>,
}

impl PhotoUpload {
    async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut upload = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::invalid_input(format!("Invalid multipart body: {e}")))?
        {
            let name = field.name().unwrap_or_default().to_owned();
            match name.as_str() {
                "image" => {
                    let filename = field.file_name().unwrap_or("photo").to_owned();
                    let content_type = field
                        .content_type()
                        .unwrap_or("application/octet-stream")
                        .to_owned();
                    let data = field.bytes().await.map_err(|e| {
                        AppError::invalid_input(format!("Failed to read image: {e}"))
                    })?;
                    upload.image = Some((filename, content_type, data));
                }
                "instance" | "caption" => {
                    let text = field.text().await.map_err(|e| {
                        AppError::invalid_input(format!("Failed to read field {name}: {e}"))
                    })?;
                    let text = Some(text.trim().to_owned()).filter(|t| !t.is_empty());
                    if name == "instance" {
                        upload.instance = text;
                    } else {
                        upload.caption = text;
                    }
                }
                _ => {}
            }
        }
        Ok(upload)
    }
}

/// Photo log routes handler
pub struct PhotoLogRoutes;

impl PhotoLogRoutes {
    /// Create all photo log routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/photo-logs",
                get(Self::list_photo_logs).post(Self::upload_photo_log),
            )
            .route(
                "/api/photo-logs/:photo_log_id",
                get(Self::get_photo_log).delete(Self::delete_photo_log),
            )
            .with_state(resources)
    }

    async fn list_photo_logs(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<ListPhotoLogsQuery>,
    ) -> Result<Response, AppError> {
        let photo_logs = resources
            .database
            .photo_logs()
            .list(query.instance.as_deref(), query.limit)
            .await?;
        Ok((StatusCode::OK, Json(photo_logs)).into_response())
    }

    async fn upload_photo_log(
        State(resources): State<Arc<ServerResources>>,
        multipart: Multipart,
    ) -> Result<Response, AppError> {
        let upload = PhotoUpload::read(multipart).await?;
        let instance = validate_instance(
            upload
                .instance
                .as_deref()
                .ok_or_else(|| AppError::missing_field("instance"))?,
        )?;
        let (filename, content_type, data) =
            upload.image.ok_or_else(|| AppError::missing_field("image"))?;
        if data.is_empty() {
            return Err(AppError::invalid_input("Image is empty"));
        }
        if !content_type.starts_with("image/") {
            return Err(AppError::invalid_input(format!(
                "Expected an image upload, got {content_type}"
            )));
        }

        let media = resources.require_media()?;
        let uploaded = media.upload(&filename, &content_type, data).await?;

        let photo_log = resources
            .database
            .photo_logs()
            .create(&CreatePhotoLogRequest {
                instance,
                caption: upload.caption,
                image_url: uploaded.url,
                media_id: uploaded.media_id,
            })
            .await?;
        info!(photo_log_id = %photo_log.id, instance = %photo_log.instance, "Photo log stored");
        Ok((StatusCode::CREATED, Json(photo_log)).into_response())
    }

    async fn get_photo_log(
        State(resources): State<Arc<ServerResources>>,
        Path(photo_log_id): Path<String>,
    ) -> Result<Response, AppError> {
        let photo_log = resources
            .database
            .photo_logs()
            .get(&photo_log_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Photo log {photo_log_id}")))?;
        Ok((StatusCode::OK, Json(photo_log)).into_response())
    }

    async fn delete_photo_log(
        State(resources): State<Arc<ServerResources>>,
        Path(photo_log_id): Path<String>,
    ) -> Result<Response, AppError> {
        if resources.database.photo_logs().delete(&photo_log_id).await? {
            Ok(StatusCode::NO_CONTENT.into_response())
        } else {
            Err(AppError::not_found(format!("Photo log {photo_log_id}")))
        }
    }
}
