// ABOUTME: Main library entry point for the Sgt Chef meal-planning and habit-logging server
// ABOUTME: Provides REST, assistant and MCP surfaces over a SQLite store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Sgt Chef Server
//!
//! A personal meal-planning and habit-logging service.
//!
//! ## Features
//!
//! - **Planning API**: weeks, recipes, projects, cooks, preps, shopping lists
//!   and per-week starting inventory
//! - **Habit tracking**: coaching sessions keyed by day/week/month, logs and
//!   photo logs uploaded to an image host
//! - **Assistants**: Sgt Chef (cooking) and an accountability coach, both
//!   driving a language model through typed tools
//! - **MCP**: the same tools over JSON-RPC for external clients
//!
//! ## Architecture
//!
//! - **Database**: one manager per entity over a shared `SqlitePool`
//! - **Tools**: schema-described async functions grouped into registries
//! - **Chat**: the model/tool conversation loop
//! - **Routes**: thin axum handlers delegating to managers and the loop
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use sgt_chef::config::ServerConfig;
//! use sgt_chef::database::Database;
//! use sgt_chef::errors::AppResult;
//! use sgt_chef::mcp::ServerResources;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = Arc::new(ServerConfig::from_env()?);
//!     let database = Database::new(&config.database_url).await?;
//!     let resources = Arc::new(ServerResources::from_config(database, config)?);
//!     sgt_chef::server::run(resources).await
//! }
//! ```

/// Instance keys and ISO week helpers
pub mod calendar;
/// Model/tool conversation loop
pub mod chat;
/// Environment configuration
pub mod config;
/// Application constants
pub mod constants;
/// SQLite storage and entity managers
pub mod database;
/// Error types and HTTP mapping
pub mod errors;
/// Third-party service clients
pub mod external;
/// Text summaries of entities
pub mod formatters;
/// JSON-RPC envelopes
pub mod jsonrpc;
/// Language model client types
pub mod llm;
/// Tracing subscriber setup
pub mod logging;
/// MCP protocol and shared resources
pub mod mcp;
/// HTTP middleware
pub mod middleware;
/// Shared enums
pub mod models;
/// HTTP routes
pub mod routes;
/// Server assembly
pub mod server;
/// Tools for the assistants and MCP
pub mod tools;
