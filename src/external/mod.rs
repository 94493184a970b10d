// ABOUTME: Clients for third-party services other than the language model
// ABOUTME: Currently the image host used for photo logs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Image upload client
pub mod media_client;

pub use media_client::{HttpMediaHost, MediaHost, UploadedMedia};
