// ABOUTME: HTTP-level tests for the planning and habit REST routes
// ABOUTME: Drives the full router with middleware through one-shot requests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

// Test files: allow missing_docs (rustc lint) and unwrap (valid in tests)
#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{delete, get, post, put, send_request, test_router};
use serde_json::json;

#[tokio::test]
async fn test_health_reports_database_and_upstreams() {
    let (router, _resources) = test_router().await;

    let (status, body) = get(&router, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "ok");
    assert_eq!(body["llm_enabled"], false);
    assert_eq!(body["media_enabled"], false);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let (router, _resources) = test_router().await;

    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "req-123")
        .body(Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(router, request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "req-123");
}

// ============================================================================
// Weeks
// ============================================================================

#[tokio::test]
async fn test_week_lifecycle() {
    let (router, _resources) = test_router().await;

    let (status, week) = post(&router, "/api/weeks", json!({"year": 2026, "week_number": 8})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(week["start_date"], "2026-02-16");
    assert_eq!(week["end_date"], "2026-02-22");
    let id = week["id"].as_str().unwrap().to_owned();

    let (status, fetched) = get(&router, &format!("/api/weeks/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["week_number"], 8);

    let (status, updated) = put(&router, &format!("/api/weeks/{id}"), json!({"notes": "Guests Friday"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["notes"], "Guests Friday");
    assert_eq!(updated["year"], 2026);

    let (status, body) = delete(&router, &format!("/api/weeks/{id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, body) = get(&router, &format!("/api/weeks/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "resource_not_found");
}

#[tokio::test]
async fn test_duplicate_week_conflicts() {
    let (router, _resources) = test_router().await;
    let body = json!({"year": 2026, "week_number": 8});

    let (status, _) = post(&router, "/api/weeks", body.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, err) = post(&router, "/api/weeks", body).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["error"]["code"], "resource_conflict");
}

#[tokio::test]
async fn test_week_missing_field_is_bad_request() {
    let (router, _resources) = test_router().await;

    let (status, err) = post(&router, "/api/weeks", json!({"year": 2026})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"]["code"], "missing_required_field");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let (router, _resources) = test_router().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/weeks")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, err) = send_request(&router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"]["code"], "invalid_input");
}

#[tokio::test]
async fn test_current_week_is_stable() {
    let (router, _resources) = test_router().await;

    let (status, first) = get(&router, "/api/weeks/current").await;
    assert_eq!(status, StatusCode::OK);
    let (_, second) = get(&router, "/api/weeks/current").await;
    assert_eq!(first["id"], second["id"]);

    let (_, weeks) = get(&router, "/api/weeks").await;
    assert_eq!(weeks.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unsupported_method_is_405() {
    let (router, _resources) = test_router().await;

    let (status, _) = put(&router, "/api/weeks", json!({})).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_week_plan_collects_everything() {
    let (router, _resources) = test_router().await;
    let (_, week) = post(&router, "/api/weeks", json!({"year": 2026, "week_number": 9})).await;
    let week_id = week["id"].as_str().unwrap().to_owned();

    let (status, recipe) = post(
        &router,
        "/api/recipes",
        json!({"name": "Dal", "ingredients": ["1 cup lentils"], "servings": 4}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, cook) = post(
        &router,
        "/api/cooks",
        json!({
            "week_id": week_id,
            "recipe_id": recipe["id"],
            "title": "Dal",
            "day": "monday",
            "meal": "dinner",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(cook["completed"], false);

    let (status, _) = post(
        &router,
        "/api/preps",
        json!({"week_id": week_id, "description": "Rinse lentils"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = post(
        &router,
        "/api/shops",
        json!({"week_id": week_id, "item": "Lentils", "quantity": "1 bag"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, inventory) = put(
        &router,
        &format!("/api/weeks/{week_id}/starting-status"),
        json!({"inventory": ["rice", "onions"]}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(inventory["inventory"], json!(["rice", "onions"]));

    let (status, plan) = get(&router, &format!("/api/weeks/{week_id}/plan")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(plan["week"]["id"], week_id.as_str());
    assert_eq!(plan["cooks"].as_array().unwrap().len(), 1);
    assert_eq!(plan["preps"].as_array().unwrap().len(), 1);
    assert_eq!(plan["shops"].as_array().unwrap().len(), 1);
    assert_eq!(plan["starting_status"]["inventory"], json!(["rice", "onions"]));
    assert!(plan["summary"].as_str().unwrap().contains("Dal"));
}

#[tokio::test]
async fn test_starting_status_absent_is_404() {
    let (router, _resources) = test_router().await;
    let (_, week) = post(&router, "/api/weeks", json!({"year": 2026, "week_number": 10})).await;
    let week_id = week["id"].as_str().unwrap();

    let (status, _) = get(&router, &format!("/api/weeks/{week_id}/starting-status")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Recipes, projects and plan items
// ============================================================================

#[tokio::test]
async fn test_recipe_crud_and_filters() {
    let (router, _resources) = test_router().await;

    let (status, err) = post(&router, "/api/recipes", json!({"name": "  "})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"]["code"], "missing_required_field");

    let (_, recipe) = post(
        &router,
        "/api/recipes",
        json!({"name": "Pancakes", "tags": ["breakfast"]}),
    )
    .await;
    post(&router, "/api/recipes", json!({"name": "Ramen", "tags": ["dinner"]})).await;
    let id = recipe["id"].as_str().unwrap().to_owned();

    let (_, tagged) = get(&router, "/api/recipes?tag=breakfast").await;
    assert_eq!(tagged.as_array().unwrap().len(), 1);
    let (_, searched) = get(&router, "/api/recipes?q=ram").await;
    assert_eq!(searched[0]["name"], "Ramen");

    let (status, updated) = put(&router, &format!("/api/recipes/{id}"), json!({"servings": 2})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["servings"], 2);
    assert_eq!(updated["tags"], json!(["breakfast"]));

    let (status, _) = delete(&router, &format!("/api/recipes/{id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = delete(&router, &format!("/api/recipes/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_project_status_filter() {
    let (router, _resources) = test_router().await;

    let (status, project) = post(&router, "/api/projects", json!({"name": "Sourdough starter"})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(project["status"], "planned");
    post(&router, "/api/projects", json!({"name": "Kimchi", "status": "active"})).await;

    let (_, active) = get(&router, "/api/projects?status=active").await;
    assert_eq!(active.as_array().unwrap().len(), 1);
    assert_eq!(active[0]["name"], "Kimchi");
}

#[tokio::test]
async fn test_cook_for_unknown_week_is_rejected() {
    let (router, _resources) = test_router().await;

    let (status, _) = post(
        &router,
        "/api/cooks",
        json!({"week_id": uuid::Uuid::new_v4(), "title": "Ghost meal"}),
    )
    .await;
    assert!(status.is_client_error(), "got {status}");
}

#[tokio::test]
async fn test_shop_partial_update_and_week_filter() {
    let (router, _resources) = test_router().await;
    let (_, week) = post(&router, "/api/weeks", json!({"year": 2026, "week_number": 11})).await;
    let week_id = week["id"].as_str().unwrap().to_owned();

    let (_, shop) = post(
        &router,
        "/api/shops",
        json!({"week_id": week_id, "item": "Milk", "store": "Corner shop"}),
    )
    .await;
    let shop_id = shop["id"].as_str().unwrap();

    let (status, bought) = put(&router, &format!("/api/shops/{shop_id}"), json!({"purchased": true})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bought["purchased"], true);
    assert_eq!(bought["store"], "Corner shop");

    let (_, listed) = get(&router, &format!("/api/shops?week_id={week_id}")).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    let (_, none) = get(&router, "/api/shops?week_id=other").await;
    assert!(none.as_array().unwrap().is_empty());
}

// ============================================================================
// Sessions and logs
// ============================================================================

#[tokio::test]
async fn test_session_upsert_and_prefix_listing() {
    let (router, _resources) = test_router().await;

    let (status, session) = put(&router, "/api/sessions/day2026049", json!({"weight": 79.4})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["weight"], 79.4);
    assert_eq!(session["messages"], json!([]));

    put(&router, "/api/sessions/week202608", json!({})).await;

    let (_, days) = get(&router, "/api/sessions?prefix=day").await;
    assert_eq!(days.as_array().unwrap().len(), 1);
    let (status, _) = get(&router, "/api/sessions?prefix=year").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(&router, "/api/sessions/day2026050").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = put(&router, "/api/sessions/tuesday", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = delete(&router, "/api/sessions/week202608").await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_log_crud() {
    let (router, _resources) = test_router().await;

    let (status, log) = post(
        &router,
        "/api/logs",
        json!({"instance": "day2026049", "category": "water", "content": "2 litres", "value": 2.0}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = log["id"].as_str().unwrap().to_owned();

    let (status, updated) = put(&router, &format!("/api/logs/{id}"), json!({"value": 2.5})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["value"], 2.5);
    assert_eq!(updated["content"], "2 litres");

    let (_, listed) = get(&router, "/api/logs?instance=day2026049&category=water").await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, _) = delete(&router, &format!("/api/logs/{id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = get(&router, &format!("/api/logs/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
