// ABOUTME: Shared server state handed to every route and protocol handler
// ABOUTME: Holds storage, configuration, optional upstream clients and the tool registries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::external::{HttpMediaHost, MediaHost};
use crate::llm::{AnthropicProvider, LlmProvider};
use crate::tools::ToolRegistry;

/// Everything a request handler needs, shared behind an `Arc`
pub struct ServerResources {
    /// Storage
    pub database: Database,
    /// Configuration
    pub config: Arc<ServerConfig>,
    /// Model provider; `None` when no API key is configured
    pub llm: Option<Arc<dyn LlmProvider>>,
    /// Image host; `None` when no upload URL is configured
    pub media: Option<Arc<dyn MediaHost>>,
    /// Sgt Chef tools
    pub chef_tools: ToolRegistry,
    /// Coach tools
    pub coach_tools: ToolRegistry,
    /// Every tool, for MCP
    pub all_tools: ToolRegistry,
}

impl ServerResources {
    /// Assemble resources from explicit parts
    #[must_use]
    pub fn new(
        database: Database,
        config: Arc<ServerConfig>,
        llm: Option<Arc<dyn LlmProvider>>,
        media: Option<Arc<dyn MediaHost>>,
    ) -> Self {
        Self {
            database,
            config,
            llm,
            media,
            chef_tools: ToolRegistry::chef(),
            coach_tools: ToolRegistry::coach(),
            all_tools: ToolRegistry::all(),
        }
    }

    /// Build upstream clients from configuration
    ///
    /// # Errors
    ///
    /// Returns a config error if an enabled client cannot be constructed
    pub fn from_config(database: Database, config: Arc<ServerConfig>) -> AppResult<Self> {
        let llm: Option<Arc<dyn LlmProvider>> = if config.llm_enabled() {
            let provider = AnthropicProvider::from_config(&config.llm)?;
            info!(model = provider.model(), "LLM provider configured");
            Some(Arc::new(provider))
        } else {
            warn!("ANTHROPIC_API_KEY not set; chat and coach endpoints are disabled");
            None
        };

        let media: Option<Arc<dyn MediaHost>> = if config.media_enabled() {
            Some(Arc::new(HttpMediaHost::from_config(&config.media)?))
        } else {
            warn!("MEDIA_UPLOAD_URL not set; photo uploads are disabled");
            None
        };

        Ok(Self::new(database, config, llm, media))
    }

    /// The model provider, or a config error when none is configured
    ///
    /// # Errors
    ///
    /// Returns a config error if the LLM is disabled
    pub fn require_llm(&self) -> AppResult<Arc<dyn LlmProvider>> {
        self.llm
            .clone()
            .ok_or_else(|| AppError::config("LLM provider is not configured (set ANTHROPIC_API_KEY)"))
    }

    /// The media host, or a config error when none is configured
    ///
    /// # Errors
    ///
    /// Returns a config error if uploads are disabled
    pub fn require_media(&self) -> AppResult<Arc<dyn MediaHost>> {
        self.media
            .clone()
            .ok_or_else(|| AppError::config("Media host is not configured (set MEDIA_UPLOAD_URL)"))
    }
}
