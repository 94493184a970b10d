// ABOUTME: Recipe book routes with text and tag search
// ABOUTME: Deleting a recipe leaves planned cooks in place with the link cleared
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

use crate::database::{CreateRecipeRequest, ListRecipesFilter, UpdateRecipeRequest};
use crate::errors::{AppError, AppJson};
use crate::mcp::resources::ServerResources;

/// Recipe routes handler
pub struct RecipeRoutes;

impl RecipeRoutes {
    /// Create all recipe routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/recipes",
                get(Self::list_recipes).post(Self::create_recipe),
            )
            .route(
                "/api/recipes/:recipe_id",
                get(Self::get_recipe)
                    .put(Self::update_recipe)
                    .delete(Self::delete_recipe),
            )
            .with_state(resources)
    }

    async fn list_recipes(
        State(resources): State<Arc<ServerResources>>,
        Query(filter): Query<ListRecipesFilter>,
    ) -> Result<Response, AppError> {
        let recipes = resources.database.recipes().list(&filter).await?;
        Ok((StatusCode::OK, Json(recipes)).into_response())
    }

    async fn create_recipe(
        State(resources): State<Arc<ServerResources>>,
        AppJson(request): AppJson<CreateRecipeRequest>,
    ) -> Result<Response, AppError> {
        let recipe = resources.database.recipes().create(&request).await?;
        Ok((StatusCode::CREATED, Json(recipe)).into_response())
    }

    async fn get_recipe(
        State(resources): State<Arc<ServerResources>>,
        Path(recipe_id): Path<String>,
    ) -> Result<Response, AppError> {
        let recipe = resources
            .database
            .recipes()
            .get(&recipe_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Recipe {recipe_id}")))?;
        Ok((StatusCode::OK, Json(recipe)).into_response())
    }

    async fn update_recipe(
        State(resources): State<Arc<ServerResources>>,
        Path(recipe_id): Path<String>,
        AppJson(request): AppJson<UpdateRecipeRequest>,
    ) -> Result<Response, AppError> {
        let recipe = resources
            .database
            .recipes()
            .update(&recipe_id, &request)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Recipe {recipe_id}")))?;
        Ok((StatusCode::OK, Json(recipe)).into_response())
    }

    async fn delete_recipe(
        State(resources): State<Arc<ServerResources>>,
        Path(recipe_id): Path<String>,
    ) -> Result<Response, AppError> {
        if resources.database.recipes().delete(&recipe_id).await? {
            Ok(StatusCode::NO_CONTENT.into_response())
        } else {
            Err(AppError::not_found(format!("Recipe {recipe_id}")))
        }
    }
}
