// ABOUTME: Route module organization for the Sgt Chef HTTP endpoints
// ABOUTME: One module per resource plus the assistants, MCP and health
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route module for the Sgt Chef server
//!
//! Each domain module exposes a `XRoutes::routes(resources)` constructor
//! returning a fully-stated `Router`; [`api_router`] merges them. Handlers
//! are thin and delegate to the entity managers.

// ═══════════════════════════════════════════════════════════════
// Core infrastructure
// ═══════════════════════════════════════════════════════════════

/// Health check routes
pub mod health;
/// MCP JSON-RPC endpoint
pub mod mcp;

// ═══════════════════════════════════════════════════════════════
// Meal planning
// ═══════════════════════════════════════════════════════════════

/// Planned meal routes
pub mod cooks;
/// Prep task routes
pub mod preps;
/// Prep project routes
pub mod projects;
/// Recipe routes
pub mod recipes;
/// Shopping list routes
pub mod shops;
/// Week, plan and starting status routes
pub mod weeks;

// ═══════════════════════════════════════════════════════════════
// Habit tracking
// ═══════════════════════════════════════════════════════════════

/// Log routes
pub mod logs;
/// Photo log routes with image upload
pub mod photo_logs;
/// Session routes
pub mod sessions;

// ═══════════════════════════════════════════════════════════════
// Assistants
// ═══════════════════════════════════════════════════════════════

/// Sgt Chef conversation route
pub mod chat;
/// Accountability coach routes
pub mod coach;

use std::sync::Arc;

use axum::Router;
use serde::Deserialize;

use crate::mcp::resources::ServerResources;

/// `?limit=` query
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Maximum rows to return
    #[serde(default)]
    pub limit: Option<u32>,
}

/// `?week_id=&limit=` query for week-scoped lists
#[derive(Debug, Default, Deserialize)]
pub struct WeekFilterQuery {
    /// Only rows for this week
    #[serde(default)]
    pub week_id: Option<String>,
    /// Maximum rows to return
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Every route the server exposes, without middleware
pub fn api_router(resources: &Arc<ServerResources>) -> Router {
    Router::new()
        .merge(health::HealthRoutes::routes(Arc::clone(resources)))
        .merge(weeks::WeekRoutes::routes(Arc::clone(resources)))
        .merge(recipes::RecipeRoutes::routes(Arc::clone(resources)))
        .merge(projects::ProjectRoutes::routes(Arc::clone(resources)))
        .merge(cooks::CookRoutes::routes(Arc::clone(resources)))
        .merge(preps::PrepRoutes::routes(Arc::clone(resources)))
        .merge(shops::ShopRoutes::routes(Arc::clone(resources)))
        .merge(sessions::SessionRoutes::routes(Arc::clone(resources)))
        .merge(logs::LogRoutes::routes(Arc::clone(resources)))
        .merge(photo_logs::PhotoLogRoutes::routes(Arc::clone(resources)))
        .merge(chat::ChatRoutes::routes(Arc::clone(resources)))
        .merge(coach::CoachRoutes::routes(Arc::clone(resources)))
        .merge(mcp::McpRoutes::routes(Arc::clone(resources)))
}
