// ABOUTME: Integration tests for the entity managers over an in-memory database
// ABOUTME: Covers partial updates, natural-key uniqueness, cascades and session upserts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

// Test files: allow missing_docs (rustc lint) and unwrap (valid in tests)
#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use sgt_chef::database::{
    CreateCookRequest, CreateLogRequest, CreatePhotoLogRequest, CreatePrepRequest,
    CreateProjectRequest, CreateRecipeRequest, CreateShopRequest, CreateWeekRequest,
    ListLogsFilter, ListRecipesFilter, UpdateCookRequest, UpdateRecipeRequest, UpdateShopRequest,
    UpdateWeekRequest, UpsertSessionRequest, UpsertStartingStatusRequest,
};
use sgt_chef::errors::ErrorCode;
use sgt_chef::llm::ChatMessage;
use sgt_chef::models::{DayOfWeek, MealSlot, ProjectStatus};

fn week_request(year: i32, week_number: u32) -> CreateWeekRequest {
    CreateWeekRequest {
        year,
        week_number,
        notes: None,
    }
}

fn recipe_request(name: &str, tags: &[&str]) -> CreateRecipeRequest {
    CreateRecipeRequest {
        name: name.to_owned(),
        ingredients: vec!["1 onion".to_owned(), "2 cloves garlic".to_owned()],
        instructions: vec!["Chop".to_owned(), "Fry".to_owned()],
        servings: Some(4),
        tags: tags.iter().map(|t| (*t).to_owned()).collect(),
        ..Default::default()
    }
}

// ============================================================================
// Weeks
// ============================================================================

#[tokio::test]
async fn test_week_create_and_natural_key_lookup() {
    let db = common::create_test_database().await;
    let weeks = db.weeks();

    let created = weeks.create(&week_request(2026, 8)).await.unwrap();
    assert_eq!(created.year, 2026);
    assert_eq!(created.week_number, 8);

    let fetched = weeks.get(&created.id.to_string()).await.unwrap().unwrap();
    assert_eq!(fetched, created);

    let by_key = weeks.get_by_year_week(2026, 8).await.unwrap().unwrap();
    assert_eq!(by_key.id, created.id);
    assert!(weeks.get_by_year_week(2026, 9).await.unwrap().is_none());
}

#[tokio::test]
async fn test_week_duplicate_is_conflict() {
    let db = common::create_test_database().await;
    db.weeks().create(&week_request(2026, 8)).await.unwrap();

    let err = db.weeks().create(&week_request(2026, 8)).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceConflict);
}

#[tokio::test]
async fn test_week_rejects_nonexistent_iso_week() {
    let db = common::create_test_database().await;

    let err = db.weeks().create(&week_request(2025, 53)).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
}

#[tokio::test]
async fn test_week_get_or_create_is_idempotent() {
    let db = common::create_test_database().await;

    let first = db.weeks().get_or_create(2026, 10).await.unwrap();
    let second = db.weeks().get_or_create(2026, 10).await.unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(db.weeks().list(None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_week_partial_update_keeps_other_fields() {
    let db = common::create_test_database().await;
    let week = db.weeks().create(&week_request(2026, 8)).await.unwrap();
    let id = week.id.to_string();

    let updated = db
        .weeks()
        .update(
            &id,
            &UpdateWeekRequest {
                notes: Some("Busy week".to_owned()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.notes.as_deref(), Some("Busy week"));
    assert_eq!(updated.week_number, 8);

    assert!(db
        .weeks()
        .update("no-such-week", &UpdateWeekRequest::default())
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_week_delete_cascades_to_plan() {
    let db = common::create_test_database().await;
    let week = db.weeks().create(&week_request(2026, 8)).await.unwrap();
    let week_id = week.id.to_string();

    let cook = db
        .cooks()
        .create(&CreateCookRequest {
            week_id: week.id,
            recipe_id: None,
            title: "Chili".to_owned(),
            day: Some(DayOfWeek::Monday),
            meal: MealSlot::Dinner,
            servings: None,
            notes: None,
            completed: false,
        })
        .await
        .unwrap();
    let shop = db
        .shops()
        .create(&CreateShopRequest {
            week_id: week.id,
            item: "Beans".to_owned(),
            quantity: Some("2 cans".to_owned()),
            store: None,
            purchased: false,
        })
        .await
        .unwrap();
    db.starting_status()
        .upsert_for_week(
            &week_id,
            &UpsertStartingStatusRequest {
                inventory: Some(vec!["rice".to_owned()]),
                notes: None,
            },
        )
        .await
        .unwrap();

    assert!(db.weeks().delete(&week_id).await.unwrap());
    assert!(db.cooks().get(&cook.id.to_string()).await.unwrap().is_none());
    assert!(db.shops().get(&shop.id.to_string()).await.unwrap().is_none());
    assert!(db
        .starting_status()
        .get_for_week(&week_id)
        .await
        .unwrap()
        .is_none());

    assert!(!db.weeks().delete(&week_id).await.unwrap());
}

// ============================================================================
// Recipes
// ============================================================================

#[tokio::test]
async fn test_recipe_round_trip_preserves_lists() {
    let db = common::create_test_database().await;
    let created = db
        .recipes()
        .create(&recipe_request("Chili", &["dinner", "batch"]))
        .await
        .unwrap();

    let fetched = db
        .recipes()
        .get(&created.id.to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.ingredients, vec!["1 onion", "2 cloves garlic"]);
    assert_eq!(fetched.instructions, vec!["Chop", "Fry"]);
    assert_eq!(fetched.tags, vec!["dinner", "batch"]);
    assert_eq!(fetched.servings, Some(4));
}

#[tokio::test]
async fn test_recipe_search_and_tag_filter() {
    let db = common::create_test_database().await;
    db.recipes()
        .create(&recipe_request("Beef Chili", &["dinner"]))
        .await
        .unwrap();
    db.recipes()
        .create(&recipe_request("Overnight Oats", &["breakfast"]))
        .await
        .unwrap();

    let all = db.recipes().list(&ListRecipesFilter::default()).await.unwrap();
    let names: Vec<&str> = all.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Beef Chili", "Overnight Oats"]);

    let search = db
        .recipes()
        .list(&ListRecipesFilter {
            q: Some("chili".to_owned()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(search.len(), 1);
    assert_eq!(search[0].name, "Beef Chili");

    let tagged = db
        .recipes()
        .list(&ListRecipesFilter {
            tag: Some("Breakfast".to_owned()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(tagged.len(), 1);
    assert_eq!(tagged[0].name, "Overnight Oats");
}

#[tokio::test]
async fn test_recipe_search_treats_wildcards_literally() {
    let db = common::create_test_database().await;
    for (name, tags) in [
        ("100% Rye", &["bread"][..]),
        ("Beef Chili", &["dinner"][..]),
        ("Overnight Oats", &["breakfast"][..]),
    ] {
        db.recipes().create(&recipe_request(name, tags)).await.unwrap();
    }

    let search = |q: &str| {
        let filter = ListRecipesFilter {
            q: Some(q.to_owned()),
            ..Default::default()
        };
        let recipes = db.recipes();
        async move {
            recipes
                .list(&filter)
                .await
                .unwrap()
                .into_iter()
                .map(|r| r.name)
                .collect::<Vec<_>>()
        }
    };

    assert_eq!(search("%").await, vec!["100% Rye"]);
    assert!(search("_").await.is_empty());
    // JSON punctuation of the stored tag list is not searchable text
    assert!(search("[").await.is_empty());
    assert!(search("\"").await.is_empty());
    assert_eq!(search("BREAK").await, vec!["Overnight Oats"]);
}

#[tokio::test]
async fn test_recipe_partial_update() {
    let db = common::create_test_database().await;
    let recipe = db
        .recipes()
        .create(&recipe_request("Chili", &[]))
        .await
        .unwrap();

    let updated = db
        .recipes()
        .update(
            &recipe.id.to_string(),
            &UpdateRecipeRequest {
                servings: Some(6),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.servings, Some(6));
    assert_eq!(updated.name, "Chili");
    assert_eq!(updated.ingredients, recipe.ingredients);
}

#[tokio::test]
async fn test_recipe_delete_unlinks_cooks() {
    let db = common::create_test_database().await;
    let week = db.weeks().get_or_create(2026, 8).await.unwrap();
    let recipe = db
        .recipes()
        .create(&recipe_request("Chili", &[]))
        .await
        .unwrap();
    let cook = db
        .cooks()
        .create(&CreateCookRequest {
            week_id: week.id,
            recipe_id: Some(recipe.id),
            title: "Chili".to_owned(),
            day: None,
            meal: MealSlot::Dinner,
            servings: Some(4),
            notes: None,
            completed: false,
        })
        .await
        .unwrap();

    assert!(db.recipes().delete(&recipe.id.to_string()).await.unwrap());
    let cook = db.cooks().get(&cook.id.to_string()).await.unwrap().unwrap();
    assert_eq!(cook.recipe_id, None);
    assert_eq!(cook.title, "Chili");
}

// ============================================================================
// Cooks, preps, shops
// ============================================================================

#[tokio::test]
async fn test_cook_for_unknown_week_is_rejected() {
    let db = common::create_test_database().await;

    let err = db
        .cooks()
        .create(&CreateCookRequest {
            week_id: uuid::Uuid::new_v4(),
            recipe_id: None,
            title: "Ghost".to_owned(),
            day: None,
            meal: MealSlot::Lunch,
            servings: None,
            notes: None,
            completed: false,
        })
        .await
        .unwrap_err();
    assert_ne!(err.code, ErrorCode::DatabaseError);
}

#[tokio::test]
async fn test_cook_update_and_week_filter() {
    let db = common::create_test_database().await;
    let week_a = db.weeks().get_or_create(2026, 8).await.unwrap();
    let week_b = db.weeks().get_or_create(2026, 9).await.unwrap();

    let cook = db
        .cooks()
        .create(&CreateCookRequest {
            week_id: week_a.id,
            recipe_id: None,
            title: "Tacos".to_owned(),
            day: Some(DayOfWeek::Tuesday),
            meal: MealSlot::Dinner,
            servings: None,
            notes: None,
            completed: false,
        })
        .await
        .unwrap();
    db.cooks()
        .create(&CreateCookRequest {
            week_id: week_b.id,
            recipe_id: None,
            title: "Soup".to_owned(),
            day: None,
            meal: MealSlot::Lunch,
            servings: None,
            notes: None,
            completed: false,
        })
        .await
        .unwrap();

    let in_a = db
        .cooks()
        .list(Some(&week_a.id.to_string()), None)
        .await
        .unwrap();
    assert_eq!(in_a.len(), 1);
    assert_eq!(in_a[0].title, "Tacos");
    assert_eq!(db.cooks().list(None, None).await.unwrap().len(), 2);

    let done = db
        .cooks()
        .update(
            &cook.id.to_string(),
            &UpdateCookRequest {
                completed: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert!(done.completed);
    assert_eq!(done.day, Some(DayOfWeek::Tuesday));
    assert_eq!(done.meal, MealSlot::Dinner);
}

#[tokio::test]
async fn test_prep_links_project() {
    let db = common::create_test_database().await;
    let week = db.weeks().get_or_create(2026, 8).await.unwrap();
    let project = db
        .projects()
        .create(&CreateProjectRequest {
            name: "Stock".to_owned(),
            description: None,
            status: ProjectStatus::Active,
        })
        .await
        .unwrap();

    let prep = db
        .preps()
        .create(&CreatePrepRequest {
            week_id: week.id,
            project_id: Some(project.id),
            description: "Roast bones".to_owned(),
            day: Some(DayOfWeek::Sunday),
            completed: false,
        })
        .await
        .unwrap();
    assert_eq!(prep.project_id, Some(project.id));

    let active = db
        .projects()
        .list(Some(ProjectStatus::Active), None)
        .await
        .unwrap();
    assert_eq!(active.len(), 1);
    assert!(db
        .projects()
        .list(Some(ProjectStatus::Done), None)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_shop_mark_purchased() {
    let db = common::create_test_database().await;
    let week = db.weeks().get_or_create(2026, 8).await.unwrap();
    let shop = db
        .shops()
        .create(&CreateShopRequest {
            week_id: week.id,
            item: "Eggs".to_owned(),
            quantity: Some("12".to_owned()),
            store: Some("Market".to_owned()),
            purchased: false,
        })
        .await
        .unwrap();

    let bought = db
        .shops()
        .update(
            &shop.id.to_string(),
            &UpdateShopRequest {
                purchased: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert!(bought.purchased);
    assert_eq!(bought.quantity.as_deref(), Some("12"));
    assert_eq!(bought.store.as_deref(), Some("Market"));
}

#[tokio::test]
async fn test_cook_prep_shop_delete_removes_from_list_and_get() {
    let db = common::create_test_database().await;
    let week = db.weeks().get_or_create(2026, 8).await.unwrap();
    let week_id = week.id.to_string();

    let cook = db
        .cooks()
        .create(&CreateCookRequest {
            week_id: week.id,
            recipe_id: None,
            title: "Tacos".to_owned(),
            day: Some(DayOfWeek::Friday),
            meal: MealSlot::Dinner,
            servings: None,
            notes: None,
            completed: false,
        })
        .await
        .unwrap();
    let prep = db
        .preps()
        .create(&CreatePrepRequest {
            week_id: week.id,
            project_id: None,
            description: "Pickle onions".to_owned(),
            day: None,
            completed: false,
        })
        .await
        .unwrap();
    let shop = db
        .shops()
        .create(&CreateShopRequest {
            week_id: week.id,
            item: "Tortillas".to_owned(),
            quantity: None,
            store: None,
            purchased: false,
        })
        .await
        .unwrap();

    let cook_id = cook.id.to_string();
    let prep_id = prep.id.to_string();
    let shop_id = shop.id.to_string();

    assert!(db.cooks().delete(&cook_id).await.unwrap());
    assert!(db.preps().delete(&prep_id).await.unwrap());
    assert!(db.shops().delete(&shop_id).await.unwrap());

    assert!(db.cooks().get(&cook_id).await.unwrap().is_none());
    assert!(db.preps().get(&prep_id).await.unwrap().is_none());
    assert!(db.shops().get(&shop_id).await.unwrap().is_none());
    assert!(db.cooks().list(Some(&week_id), None).await.unwrap().is_empty());
    assert!(db.preps().list(Some(&week_id), None).await.unwrap().is_empty());
    assert!(db.shops().list(Some(&week_id), None).await.unwrap().is_empty());

    assert!(!db.cooks().delete(&cook_id).await.unwrap());
    assert!(!db.preps().delete(&prep_id).await.unwrap());
    assert!(!db.shops().delete(&shop_id).await.unwrap());
    assert!(db.weeks().get(&week_id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_project_delete_unlinks_preps() {
    let db = common::create_test_database().await;
    let week = db.weeks().get_or_create(2026, 8).await.unwrap();
    let project = db
        .projects()
        .create(&CreateProjectRequest {
            name: "Sourdough".to_owned(),
            description: None,
            status: ProjectStatus::Active,
        })
        .await
        .unwrap();
    let prep = db
        .preps()
        .create(&CreatePrepRequest {
            week_id: week.id,
            project_id: Some(project.id),
            description: "Feed starter".to_owned(),
            day: None,
            completed: false,
        })
        .await
        .unwrap();

    let project_id = project.id.to_string();
    assert!(db.projects().delete(&project_id).await.unwrap());
    assert!(db.projects().get(&project_id).await.unwrap().is_none());
    assert!(db.projects().list(None, None).await.unwrap().is_empty());
    assert!(!db.projects().delete(&project_id).await.unwrap());

    let prep = db.preps().get(&prep.id.to_string()).await.unwrap().unwrap();
    assert_eq!(prep.project_id, None);
}

// ============================================================================
// Starting status
// ============================================================================

#[tokio::test]
async fn test_starting_status_one_per_week() {
    let db = common::create_test_database().await;
    let week = db.weeks().get_or_create(2026, 8).await.unwrap();
    let week_id = week.id.to_string();

    let first = db
        .starting_status()
        .upsert_for_week(
            &week_id,
            &UpsertStartingStatusRequest {
                inventory: Some(vec!["rice".to_owned(), "beans".to_owned()]),
                notes: Some("Freezer full".to_owned()),
            },
        )
        .await
        .unwrap();
    let second = db
        .starting_status()
        .upsert_for_week(
            &week_id,
            &UpsertStartingStatusRequest {
                inventory: Some(vec!["pasta".to_owned()]),
                notes: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.inventory, vec!["pasta"]);
    assert_eq!(second.notes.as_deref(), Some("Freezer full"));
}

// ============================================================================
// Sessions, logs, photo logs
// ============================================================================

#[tokio::test]
async fn test_session_upsert_merges_fields() {
    let db = common::create_test_database().await;
    let sessions = db.sessions();

    let created = sessions
        .upsert(
            "day2026049",
            &UpsertSessionRequest {
                messages: Some(vec![ChatMessage::user("Morning")]),
                weight: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(created.messages.len(), 1);
    assert_eq!(created.weight, None);

    let weighed = sessions
        .upsert(
            "day2026049",
            &UpsertSessionRequest {
                messages: None,
                weight: Some(81.5),
            },
        )
        .await
        .unwrap();
    assert_eq!(weighed.id, created.id);
    assert_eq!(weighed.messages.len(), 1);
    assert_eq!(weighed.weight, Some(81.5));
}

#[tokio::test]
async fn test_session_rejects_invalid_instance() {
    let db = common::create_test_database().await;

    let err = db
        .sessions()
        .upsert("fortnight2026", &UpsertSessionRequest::default())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
}

#[tokio::test]
async fn test_session_list_by_period() {
    let db = common::create_test_database().await;
    for instance in ["day2026049", "day2026050", "week202608", "month202602"] {
        db.sessions().get_or_create(instance).await.unwrap();
    }

    let days = db
        .sessions()
        .list(Some("day".parse().unwrap()), None)
        .await
        .unwrap();
    let keys: Vec<&str> = days.iter().map(|s| s.instance.as_str()).collect();
    assert_eq!(keys, vec!["day2026050", "day2026049"]);
    assert_eq!(db.sessions().list(None, None).await.unwrap().len(), 4);

    assert!(db.sessions().delete("week202608").await.unwrap());
    assert!(db
        .sessions()
        .get_by_instance("week202608")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_logs_filter_by_instance_and_category() {
    let db = common::create_test_database().await;
    for (instance, category) in [
        ("day2026049", "workout"),
        ("day2026049", "meal"),
        ("day2026050", "workout"),
    ] {
        db.logs()
            .create(&CreateLogRequest {
                instance: instance.to_owned(),
                category: category.to_owned(),
                content: "did it".to_owned(),
                value: None,
            })
            .await
            .unwrap();
    }

    let day = db
        .logs()
        .list(&ListLogsFilter {
            instance: Some("day2026049".to_owned()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(day.len(), 2);

    let workouts = db
        .logs()
        .list(&ListLogsFilter {
            category: Some("workout".to_owned()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(workouts.len(), 2);
}

#[tokio::test]
async fn test_photo_log_round_trip() {
    let db = common::create_test_database().await;
    let photo = db
        .photo_logs()
        .create(&CreatePhotoLogRequest {
            instance: "day2026049".to_owned(),
            caption: Some("Lunch".to_owned()),
            image_url: "https://images.test/a.jpg".to_owned(),
            media_id: "a".to_owned(),
        })
        .await
        .unwrap();

    let listed = db
        .photo_logs()
        .list(Some("day2026049"), None)
        .await
        .unwrap();
    assert_eq!(listed, vec![photo.clone()]);
    assert!(db
        .photo_logs()
        .delete(&photo.id.to_string())
        .await
        .unwrap());
    assert!(db
        .photo_logs()
        .get(&photo.id.to_string())
        .await
        .unwrap()
        .is_none());
}
