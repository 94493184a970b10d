// ABOUTME: Shopping list routes, filterable by week
// ABOUTME: Lists return unpurchased items first
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use super::WeekFilterQuery;
use crate::database::{CreateShopRequest, UpdateShopRequest};
use crate::errors::{AppError, AppJson};
use crate::mcp::resources::ServerResources;

/// Shopping list routes handler
pub struct ShopRoutes;

impl ShopRoutes {
    /// Create all shopping list routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/shops", get(Self::list_shops).post(Self::create_shop))
            .route(
                "/api/shops/:shop_id",
                get(Self::get_shop)
                    .put(Self::update_shop)
                    .delete(Self::delete_shop),
            )
            .with_state(resources)
    }

    async fn list_shops(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<WeekFilterQuery>,
    ) -> Result<Response, AppError> {
        let shops = resources
            .database
            .shops()
            .list(query.week_id.as_deref(), query.limit)
            .await?;
        Ok((StatusCode::OK, Json(shops)).into_response())
    }

    async fn create_shop(
        State(resources): State<Arc<ServerResources>>,
        AppJson(request): AppJson<CreateShopRequest>,
    ) -> Result<Response, AppError> {
        let shop = resources.database.shops().create(&request).await?;
        Ok((StatusCode::CREATED, Json(shop)).into_response())
    }

    async fn get_shop(
        State(resources): State<Arc<ServerResources>>,
        Path(shop_id): Path<String>,
    ) -> Result<Response, AppError> {
        let shop = resources
            .database
            .shops()
            .get(&shop_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Shopping item {shop_id}")))?;
        Ok((StatusCode::OK, Json(shop)).into_response())
    }

    async fn update_shop(
        State(resources): State<Arc<ServerResources>>,
        Path(shop_id): Path<String>,
        AppJson(request): AppJson<UpdateShopRequest>,
    ) -> Result<Response, AppError> {
        let shop = resources
            .database
            .shops()
            .update(&shop_id, &request)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Shopping item {shop_id}")))?;
        Ok((StatusCode::OK, Json(shop)).into_response())
    }

    async fn delete_shop(
        State(resources): State<Arc<ServerResources>>,
        Path(shop_id): Path<String>,
    ) -> Result<Response, AppError> {
        if resources.database.shops().delete(&shop_id).await? {
            Ok(StatusCode::NO_CONTENT.into_response())
        } else {
            Err(AppError::not_found(format!("Shopping item {shop_id}")))
        }
    }
}
