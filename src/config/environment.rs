// ABOUTME: Environment-based server configuration loading and validation
// ABOUTME: Parses host, port, database, LLM, media host, CORS, and logging settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Server configuration
//!
//! Configuration is read exclusively from environment variables. There are no
//! config files; every value has a default except the LLM API key and the
//! media upload URL, whose absence disables the corresponding feature.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::defaults;
use crate::errors::{AppError, AppResult};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(AppError::config(format!(
                "Invalid LOG_FORMAT '{other}' (expected 'json' or 'pretty')"
            ))),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => f.write_str("pretty"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// LLM provider settings
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// API key; `None` disables the chat and coach endpoints
    pub api_key: Option<String>,
    /// Base URL of the messages API
    pub base_url: String,
    /// Model identifier
    pub model: String,
    /// Completion token limit per call
    pub max_tokens: u32,
    /// Upper bound on model calls per conversation turn
    pub max_tool_iterations: usize,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: defaults::LLM_BASE_URL.to_owned(),
            model: defaults::LLM_MODEL.to_owned(),
            max_tokens: defaults::LLM_MAX_TOKENS,
            max_tool_iterations: defaults::MAX_TOOL_ITERATIONS,
            timeout: Duration::from_secs(defaults::LLM_TIMEOUT_SECS),
        }
    }
}

/// Media host (image upload) settings
#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// Upload endpoint; `None` disables photo-log uploads
    pub upload_url: Option<String>,
    /// Unsigned upload preset sent with each file
    pub upload_preset: Option<String>,
    /// API key sent with each file
    pub api_key: Option<String>,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            upload_url: None,
            upload_preset: None,
            api_key: None,
            timeout: Duration::from_secs(defaults::MEDIA_TIMEOUT_SECS),
        }
    }
}

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,
    /// HTTP port
    pub http_port: u16,
    /// sqlx database URL
    pub database_url: String,
    /// LLM settings
    pub llm: LlmConfig,
    /// Media host settings
    pub media: MediaConfig,
    /// Allowed CORS origins (`*` allows any)
    pub cors_allowed_origins: Vec<String>,
    /// Log output format
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::HOST.to_owned(),
            http_port: defaults::HTTP_PORT,
            database_url: defaults::DATABASE_URL.to_owned(),
            llm: LlmConfig::default(),
            media: MediaConfig::default(),
            cors_allowed_origins: vec!["*".to_owned()],
            log_format: LogFormat::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from process environment variables
    ///
    /// # Errors
    ///
    /// Returns a config error if any variable is present but malformed
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    ///
    /// # Errors
    ///
    /// Returns a config error if any value is present but malformed
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let llm = LlmConfig {
            api_key: get("ANTHROPIC_API_KEY"),
            base_url: get("SGT_CHEF_LLM_BASE_URL")
                .unwrap_or_else(|| defaults::LLM_BASE_URL.to_owned()),
            model: get("SGT_CHEF_LLM_MODEL").unwrap_or_else(|| defaults::LLM_MODEL.to_owned()),
            max_tokens: parse_or("SGT_CHEF_LLM_MAX_TOKENS", get("SGT_CHEF_LLM_MAX_TOKENS"), defaults::LLM_MAX_TOKENS)?,
            max_tool_iterations: parse_or(
                "SGT_CHEF_MAX_TOOL_ITERATIONS",
                get("SGT_CHEF_MAX_TOOL_ITERATIONS"),
                defaults::MAX_TOOL_ITERATIONS,
            )?,
            timeout: Duration::from_secs(parse_or(
                "SGT_CHEF_LLM_TIMEOUT_SECS",
                get("SGT_CHEF_LLM_TIMEOUT_SECS"),
                defaults::LLM_TIMEOUT_SECS,
            )?),
        };
        if llm.max_tool_iterations == 0 {
            return Err(AppError::config(
                "SGT_CHEF_MAX_TOOL_ITERATIONS must be at least 1",
            ));
        }

        let media = MediaConfig {
            upload_url: get("MEDIA_UPLOAD_URL"),
            upload_preset: get("MEDIA_UPLOAD_PRESET"),
            api_key: get("MEDIA_API_KEY"),
            timeout: Duration::from_secs(defaults::MEDIA_TIMEOUT_SECS),
        };

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS").map_or_else(
            || vec!["*".to_owned()],
            |raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(ToOwned::to_owned)
                    .collect()
            },
        );

        let log_format = get("LOG_FORMAT")
            .map(|v| v.parse::<LogFormat>())
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| defaults::HOST.to_owned()),
            http_port: parse_or("HTTP_PORT", get("HTTP_PORT"), defaults::HTTP_PORT)?,
            database_url: get("DATABASE_URL").unwrap_or_else(|| defaults::DATABASE_URL.to_owned()),
            llm,
            media,
            cors_allowed_origins,
            log_format,
        })
    }

    /// Whether the LLM assistants can be used
    #[must_use]
    pub const fn llm_enabled(&self) -> bool {
        self.llm.api_key.is_some()
    }

    /// Whether photo uploads can be forwarded to the media host
    #[must_use]
    pub const fn media_enabled(&self) -> bool {
        self.media.upload_url.is_some()
    }
}

fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> AppResult<T> {
    raw.map_or(Ok(default), |value| {
        value
            .trim()
            .parse()
            .map_err(|_| AppError::config(format!("Invalid value for {key}: '{value}'")))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ServerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.http_port, defaults::HTTP_PORT);
        assert_eq!(config.llm.max_tool_iterations, 10);
        assert!(!config.llm_enabled());
        assert!(!config.media_enabled());
        assert_eq!(config.cors_allowed_origins, vec!["*".to_owned()]);
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("HTTP_PORT", "9000"),
            ("ANTHROPIC_API_KEY", "sk-test"),
            ("SGT_CHEF_MAX_TOOL_ITERATIONS", "4"),
            ("CORS_ALLOWED_ORIGINS", "http://localhost:3000, https://chef.example"),
            ("LOG_FORMAT", "json"),
        ]))
        .unwrap();
        assert_eq!(config.http_port, 9000);
        assert!(config.llm_enabled());
        assert_eq!(config.llm.max_tool_iterations, 4);
        assert_eq!(config.cors_allowed_origins.len(), 2);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(ServerConfig::from_lookup(lookup_from(&[("HTTP_PORT", "eighty")])).is_err());
        assert!(ServerConfig::from_lookup(lookup_from(&[("LOG_FORMAT", "xml")])).is_err());
        assert!(
            ServerConfig::from_lookup(lookup_from(&[("SGT_CHEF_MAX_TOOL_ITERATIONS", "0")]))
                .is_err()
        );
    }
}
