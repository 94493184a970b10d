// ABOUTME: Image host client used by photo logs to upload pictures
// ABOUTME: Sends multipart uploads and extracts the hosted URL and media ID
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Media host client
//!
//! Uploads are a single multipart `POST` to the configured endpoint with a
//! `file` part and optional `upload_preset` / `api_key` text parts. The host
//! answers with JSON carrying `secure_url` (or `url`) and `public_id`.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::MediaConfig;
use crate::errors::{AppError, AppResult};

const SERVICE: &str = "Media host";

/// A stored image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedMedia {
    /// Public URL of the image
    pub url: String,
    /// Host-side identifier
    pub media_id: String,
}

/// Somewhere images can be uploaded to
#[async_trait]
pub trait MediaHost: Send + Sync {
    /// Upload one image
    ///
    /// # Errors
    ///
    /// Returns an external-service error if the upload fails
    async fn upload(
        &self,
        filename: &str,
        content_type: &str,
        data: Bytes,
    ) -> AppResult<UploadedMedia>;
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    secure_url: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    public_id: Option<String>,
}

/// Multipart upload client over HTTP
pub struct HttpMediaHost {
    client: Client,
    upload_url: String,
    upload_preset: Option<String>,
    api_key: Option<String>,
}

impl HttpMediaHost {
    /// Build a client from configuration
    ///
    /// # Errors
    ///
    /// Returns a config error if no upload URL is configured or the HTTP client cannot be built
    pub fn from_config(config: &MediaConfig) -> AppResult<Self> {
        let upload_url = config
            .upload_url
            .clone()
            .ok_or_else(|| AppError::config("MEDIA_UPLOAD_URL is not set"))?;
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::config(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            upload_url,
            upload_preset: config.upload_preset.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl MediaHost for HttpMediaHost {
    async fn upload(
        &self,
        filename: &str,
        content_type: &str,
        data: Bytes,
    ) -> AppResult<UploadedMedia> {
        let size = data.len();
        let part = Part::bytes(data.to_vec())
            .file_name(filename.to_owned())
            .mime_str(content_type)
            .map_err(|e| AppError::invalid_input(format!("Invalid content type: {e}")))?;

        let mut form = Form::new().part("file", part);
        if let Some(preset) = &self.upload_preset {
            form = form.text("upload_preset", preset.clone());
        }
        if let Some(key) = &self.api_key {
            form = form.text("api_key", key.clone());
        }

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::external_service(SERVICE, e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::external_service(
                SERVICE,
                format!("Upload failed with HTTP {status}"),
            ));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| AppError::external_service(SERVICE, format!("JSON parse error: {e}")))?;
        let uploaded = parse_upload_response(body)?;
        info!(bytes = size, media_id = %uploaded.media_id, "Uploaded image");
        Ok(uploaded)
    }
}

fn parse_upload_response(body: UploadResponse) -> AppResult<UploadedMedia> {
    let url = body
        .secure_url
        .or(body.url)
        .ok_or_else(|| AppError::external_service(SERVICE, "Response has no image URL"))?;
    let media_id = body
        .public_id
        .ok_or_else(|| AppError::external_service(SERVICE, "Response has no public_id"))?;
    Ok(UploadedMedia { url, media_id })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn body(value: serde_json::Value) -> UploadResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_prefers_secure_url() {
        let media = parse_upload_response(body(json!({
            "secure_url": "https://img.example/a.jpg",
            "url": "http://img.example/a.jpg",
            "public_id": "sgt/a"
        })))
        .unwrap();
        assert_eq!(media.url, "https://img.example/a.jpg");
        assert_eq!(media.media_id, "sgt/a");
    }

    #[test]
    fn test_falls_back_to_url() {
        let media =
            parse_upload_response(body(json!({"url": "http://img/b.png", "public_id": "b"})))
                .unwrap();
        assert_eq!(media.url, "http://img/b.png");
    }

    #[test]
    fn test_missing_fields_are_upstream_errors() {
        let err = parse_upload_response(body(json!({"public_id": "c"}))).unwrap_err();
        assert_eq!(err.code, crate::errors::ErrorCode::ExternalServiceError);
        assert!(parse_upload_response(body(json!({"url": "u"}))).is_err());
    }

    #[test]
    fn test_from_config_requires_url() {
        assert!(HttpMediaHost::from_config(&MediaConfig::default()).is_err());
    }
}
