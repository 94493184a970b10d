// ABOUTME: Sgt Chef tools for weeks, recipes, cooks, preps, shopping and starting status
// ABOUTME: Each tool validates typed arguments, calls one manager and renders a summary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Sgt Chef Tools
//!
//! - `GetCurrentWeekTool` - Find or create the current ISO week
//! - `GetWeekPlanTool` - Week with its cooks, preps, shopping and starting status
//! - `ListRecipesTool` / `GetRecipeTool` / `CreateRecipeTool` - Recipe book
//! - `PlanCookTool` - Schedule a meal
//! - `PlanPrepTool` - Schedule a prep task
//! - `AddShoppingItemTool` - Add to the shopping list
//! - `ListProjectsTool` - Prep projects
//! - `UpdateStartingStatusTool` - What is already on hand for a week

use std::fmt::Write as _;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::calendar::current_iso_week;
use crate::database::{
    CreateCookRequest, CreatePrepRequest, CreateRecipeRequest, CreateShopRequest,
    ListRecipesFilter, UpsertStartingStatusRequest, Week,
};
use crate::errors::{AppError, AppResult};
use crate::formatters::{summarize_list, week_plan_summary, Summary};
use crate::mcp::schema::{JsonSchema, PropertySchema};
use crate::models::{DayOfWeek, MealSlot, ProjectStatus};
use crate::tools::{parse_args, McpTool, ToolExecutionContext, ToolResult};

const DAY_VALUES: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

// ============================================================================
// Helper functions
// ============================================================================

fn parse_id(field: &str, value: &str) -> AppResult<Uuid> {
    Uuid::parse_str(value.trim())
        .map_err(|_| AppError::invalid_input(format!("{field} is not a valid ID: {value}")))
}

fn parse_day(value: Option<&str>) -> AppResult<Option<DayOfWeek>> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| {
            DayOfWeek::parse(v)
                .ok_or_else(|| AppError::invalid_input(format!("Unknown day of week: {v}")))
        })
        .transpose()
}

async fn require_week(ctx: &ToolExecutionContext, week_id: &str) -> AppResult<Week> {
    ctx.database
        .weeks()
        .get(week_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Week {week_id}")))
}

// ============================================================================
// GetCurrentWeekTool
// ============================================================================

/// Find or create the current ISO week
pub struct GetCurrentWeekTool;

#[async_trait]
impl McpTool for GetCurrentWeekTool {
    fn name(&self) -> &'static str {
        "get_current_week"
    }

    fn description(&self) -> &'static str {
        "Get the current planning week (ISO week), creating it if it does not exist yet. Returns the week ID."
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::empty()
    }

    async fn execute(&self, _args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let (year, week_number) = current_iso_week();
        let week = ctx.database.weeks().get_or_create(year, week_number).await?;
        ToolResult::with_data(week.summary(), &week)
    }
}

// ============================================================================
// GetWeekPlanTool
// ============================================================================

#[derive(Debug, Default, Deserialize)]
struct WeekPlanParams {
    #[serde(default)]
    week_id: Option<String>,
    #[serde(default)]
    year: Option<i32>,
    #[serde(default)]
    week_number: Option<u32>,
}

/// Full plan for a week
pub struct GetWeekPlanTool;

#[async_trait]
impl McpTool for GetWeekPlanTool {
    fn name(&self) -> &'static str {
        "get_week_plan"
    }

    fn description(&self) -> &'static str {
        "Get the full plan for a week: meals, prep tasks, shopping list and starting inventory. \
         Identify the week by week_id or by year and week_number; defaults to the current week."
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::empty()
            .property("week_id", PropertySchema::string("Week ID"))
            .property("year", PropertySchema::integer("ISO year"))
            .property("week_number", PropertySchema::integer("ISO week number (1-53)"))
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let params: WeekPlanParams = parse_args(self.name(), args)?;
        let week = match (params.week_id, params.year, params.week_number) {
            (Some(id), _, _) => require_week(ctx, &id).await?,
            (None, Some(year), Some(week_number)) => ctx
                .database
                .weeks()
                .get_by_year_week(year, week_number)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Week {week_number} of {year}")))?,
            (None, None, None) => {
                let (year, week_number) = current_iso_week();
                ctx.database.weeks().get_or_create(year, week_number).await?
            }
            _ => {
                return Err(AppError::invalid_input(
                    "Provide week_id, or both year and week_number",
                ))
            }
        };

        let week_id = week.id.to_string();
        let cooks = ctx.database.cooks().list(Some(&week_id), None).await?;
        let preps = ctx.database.preps().list(Some(&week_id), None).await?;
        let shops = ctx.database.shops().list(Some(&week_id), None).await?;
        let status = ctx.database.starting_status().get_for_week(&week_id).await?;

        let text = week_plan_summary(&week, &cooks, &preps, &shops, status.as_ref());
        ToolResult::with_data(
            text,
            &json!({
                "week": week,
                "cooks": cooks,
                "preps": preps,
                "shops": shops,
                "starting_status": status,
            }),
        )
    }
}

// ============================================================================
// ListRecipesTool
// ============================================================================

/// Search the recipe book
pub struct ListRecipesTool;

#[async_trait]
impl McpTool for ListRecipesTool {
    fn name(&self) -> &'static str {
        "list_recipes"
    }

    fn description(&self) -> &'static str {
        "List saved recipes, optionally filtered by a text query (name or description) or a tag."
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::empty()
            .property("q", PropertySchema::string("Text to search for in name or description"))
            .property("tag", PropertySchema::string("Only recipes with this tag"))
            .property("limit", PropertySchema::integer("Maximum results (default 50)"))
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let filter: ListRecipesFilter = parse_args(self.name(), args)?;
        let recipes = ctx.database.recipes().list(&filter).await?;
        let text = format!(
            "{} recipe(s):\n{}",
            recipes.len(),
            summarize_list(&recipes, "No recipes found.")
        );
        ToolResult::with_data(text, &recipes)
    }
}

// ============================================================================
// GetRecipeTool
// ============================================================================

#[derive(Debug, Deserialize)]
struct RecipeIdParams {
    recipe_id: String,
}

/// Full details of one recipe
pub struct GetRecipeTool;

#[async_trait]
impl McpTool for GetRecipeTool {
    fn name(&self) -> &'static str {
        "get_recipe"
    }

    fn description(&self) -> &'static str {
        "Get a recipe's ingredients and instructions by ID."
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::empty().required_property("recipe_id", PropertySchema::string("Recipe ID"))
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let params: RecipeIdParams = parse_args(self.name(), args)?;
        let recipe = ctx
            .database
            .recipes()
            .get(&params.recipe_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Recipe {}", params.recipe_id)))?;

        let mut text = recipe.summary();
        if let Some(description) = &recipe.description {
            text.push('\n');
            text.push_str(description);
        }
        text.push_str("\n\nIngredients:\n");
        for ingredient in &recipe.ingredients {
            let _ = writeln!(text, "- {ingredient}");
        }
        text.push_str("\nInstructions:\n");
        for (i, step) in recipe.instructions.iter().enumerate() {
            let _ = writeln!(text, "{}. {step}", i + 1);
        }
        ToolResult::with_data(text.trim_end(), &recipe)
    }
}

// ============================================================================
// CreateRecipeTool
// ============================================================================

/// Save a recipe
pub struct CreateRecipeTool;

#[async_trait]
impl McpTool for CreateRecipeTool {
    fn name(&self) -> &'static str {
        "create_recipe"
    }

    fn description(&self) -> &'static str {
        "Save a new recipe to the recipe book."
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::empty()
            .required_property("name", PropertySchema::string("Recipe name"))
            .property("description", PropertySchema::string("Short description"))
            .property(
                "ingredients",
                PropertySchema::string_array("Ingredients with quantities, one per entry"),
            )
            .property("instructions", PropertySchema::string_array("Steps in order"))
            .property("servings", PropertySchema::integer("Number of servings"))
            .property("prep_time_mins", PropertySchema::integer("Prep time in minutes"))
            .property("cook_time_mins", PropertySchema::integer("Cook time in minutes"))
            .property("tags", PropertySchema::string_array("Tags such as vegetarian or quick"))
            .property("source_url", PropertySchema::string("Where the recipe came from"))
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let request: CreateRecipeRequest = parse_args(self.name(), args)?;
        let recipe = ctx.database.recipes().create(&request).await?;
        ToolResult::with_data(format!("Saved recipe {}", recipe.summary()), &recipe)
    }
}

// ============================================================================
// PlanCookTool
// ============================================================================

#[derive(Debug, Deserialize)]
struct PlanCookParams {
    week_id: String,
    #[serde(default)]
    recipe_id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    day: Option<String>,
    #[serde(default)]
    meal: Option<MealSlot>,
    #[serde(default)]
    servings: Option<u32>,
    #[serde(default)]
    notes: Option<String>,
}

/// Schedule a meal in a week
pub struct PlanCookTool;

#[async_trait]
impl McpTool for PlanCookTool {
    fn name(&self) -> &'static str {
        "plan_cook"
    }

    fn description(&self) -> &'static str {
        "Plan a meal for a week. Link a saved recipe with recipe_id, or give a free-text title."
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::empty()
            .required_property("week_id", PropertySchema::string("Week ID"))
            .property("recipe_id", PropertySchema::string("Saved recipe to cook"))
            .property(
                "title",
                PropertySchema::string("Meal title (defaults to the recipe name)"),
            )
            .property("day", PropertySchema::string_enum("Day of the week", &DAY_VALUES))
            .property(
                "meal",
                PropertySchema::string_enum(
                    "Meal slot (default dinner)",
                    &["breakfast", "lunch", "dinner", "snack"],
                ),
            )
            .property("servings", PropertySchema::integer("Servings to make"))
            .property("notes", PropertySchema::string("Notes"))
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let params: PlanCookParams = parse_args(self.name(), args)?;
        let week = require_week(ctx, &params.week_id).await?;

        let recipe = match params.recipe_id.as_deref() {
            Some(id) => Some(
                ctx.database
                    .recipes()
                    .get(id)
                    .await?
                    .ok_or_else(|| AppError::not_found(format!("Recipe {id}")))?,
            ),
            None => None,
        };

        let title = params
            .title
            .filter(|t| !t.trim().is_empty())
            .or_else(|| recipe.as_ref().map(|r| r.name.clone()))
            .ok_or_else(|| AppError::missing_field("title"))?;

        let request = CreateCookRequest {
            week_id: week.id,
            recipe_id: recipe.as_ref().map(|r| r.id),
            title,
            day: parse_day(params.day.as_deref())?,
            meal: params.meal.unwrap_or_default(),
            servings: params.servings.or_else(|| recipe.as_ref().and_then(|r| r.servings)),
            notes: params.notes,
            completed: false,
        };
        let cook = ctx.database.cooks().create(&request).await?;
        ToolResult::with_data(format!("Planned {}", cook.summary()), &cook)
    }
}

// ============================================================================
// PlanPrepTool
// ============================================================================

#[derive(Debug, Deserialize)]
struct PlanPrepParams {
    week_id: String,
    description: String,
    #[serde(default)]
    day: Option<String>,
    #[serde(default)]
    project_id: Option<String>,
}

/// Schedule a prep task in a week
pub struct PlanPrepTool;

#[async_trait]
impl McpTool for PlanPrepTool {
    fn name(&self) -> &'static str {
        "plan_prep"
    }

    fn description(&self) -> &'static str {
        "Add a prep task (chopping, marinating, batch cooking) to a week, optionally tied to a project."
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::empty()
            .required_property("week_id", PropertySchema::string("Week ID"))
            .required_property("description", PropertySchema::string("What to prep"))
            .property("day", PropertySchema::string_enum("Day of the week", &DAY_VALUES))
            .property("project_id", PropertySchema::string("Related project ID"))
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let params: PlanPrepParams = parse_args(self.name(), args)?;
        let week = require_week(ctx, &params.week_id).await?;
        let project_id = params
            .project_id
            .as_deref()
            .map(|id| parse_id("project_id", id))
            .transpose()?;

        let request = CreatePrepRequest {
            week_id: week.id,
            project_id,
            description: params.description,
            day: parse_day(params.day.as_deref())?,
            completed: false,
        };
        let prep = ctx.database.preps().create(&request).await?;
        ToolResult::with_data(format!("Planned prep {}", prep.summary()), &prep)
    }
}

// ============================================================================
// AddShoppingItemTool
// ============================================================================

#[derive(Debug, Deserialize)]
struct AddShoppingItemParams {
    week_id: String,
    item: String,
    #[serde(default)]
    quantity: Option<String>,
    #[serde(default)]
    store: Option<String>,
}

/// Add an item to a week's shopping list
pub struct AddShoppingItemTool;

#[async_trait]
impl McpTool for AddShoppingItemTool {
    fn name(&self) -> &'static str {
        "add_shopping_item"
    }

    fn description(&self) -> &'static str {
        "Add an item to a week's shopping list."
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::empty()
            .required_property("week_id", PropertySchema::string("Week ID"))
            .required_property("item", PropertySchema::string("Item to buy"))
            .property("quantity", PropertySchema::string("Amount, e.g. '2 lb'"))
            .property("store", PropertySchema::string("Where to buy it"))
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let params: AddShoppingItemParams = parse_args(self.name(), args)?;
        let week = require_week(ctx, &params.week_id).await?;
        let request = CreateShopRequest {
            week_id: week.id,
            item: params.item,
            quantity: params.quantity,
            store: params.store,
            purchased: false,
        };
        let shop = ctx.database.shops().create(&request).await?;
        ToolResult::with_data(format!("Added {}", shop.summary()), &shop)
    }
}

// ============================================================================
// ListProjectsTool
// ============================================================================

#[derive(Debug, Default, Deserialize)]
struct ListProjectsParams {
    #[serde(default)]
    status: Option<ProjectStatus>,
}

/// List prep projects
pub struct ListProjectsTool;

#[async_trait]
impl McpTool for ListProjectsTool {
    fn name(&self) -> &'static str {
        "list_projects"
    }

    fn description(&self) -> &'static str {
        "List kitchen projects (ferments, stocks, batch prep), optionally by status."
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::empty().property(
            "status",
            PropertySchema::string_enum("Project status", &["planned", "active", "done"]),
        )
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let params: ListProjectsParams = parse_args(self.name(), args)?;
        let projects = ctx.database.projects().list(params.status, None).await?;
        ToolResult::with_data(summarize_list(&projects, "No projects found."), &projects)
    }
}

// ============================================================================
// UpdateStartingStatusTool
// ============================================================================

#[derive(Debug, Deserialize)]
struct StartingStatusParams {
    week_id: String,
    #[serde(default)]
    inventory: Option<Vec<String>>,
    #[serde(default)]
    notes: Option<String>,
}

/// Record what is already on hand at the start of a week
pub struct UpdateStartingStatusTool;

#[async_trait]
impl McpTool for UpdateStartingStatusTool {
    fn name(&self) -> &'static str {
        "update_starting_status"
    }

    fn description(&self) -> &'static str {
        "Record what is already in the fridge and pantry at the start of a week. \
         Replaces the inventory list when given; omitted fields are kept."
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::empty()
            .required_property("week_id", PropertySchema::string("Week ID"))
            .property("inventory", PropertySchema::string_array("Items on hand"))
            .property("notes", PropertySchema::string("Notes"))
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let params: StartingStatusParams = parse_args(self.name(), args)?;
        let week = require_week(ctx, &params.week_id).await?;
        let request = UpsertStartingStatusRequest {
            inventory: params.inventory,
            notes: params.notes,
        };
        let status = ctx
            .database
            .starting_status()
            .upsert_for_week(&week.id.to_string(), &request)
            .await?;
        ToolResult::with_data(
            format!("Week {} of {}: {}", week.week_number, week.year, status.summary()),
            &status,
        )
    }
}

/// All Sgt Chef tools in registry order
#[must_use]
pub fn create_chef_tools() -> Vec<Box<dyn McpTool>> {
    vec![
        Box::new(GetCurrentWeekTool),
        Box::new(GetWeekPlanTool),
        Box::new(ListRecipesTool),
        Box::new(GetRecipeTool),
        Box::new(CreateRecipeTool),
        Box::new(PlanCookTool),
        Box::new(PlanPrepTool),
        Box::new(AddShoppingItemTool),
        Box::new(ListProjectsTool),
        Box::new(UpdateStartingStatusTool),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_day() {
        assert_eq!(parse_day(Some("Fri")).unwrap(), Some(DayOfWeek::Friday));
        assert_eq!(parse_day(None).unwrap(), None);
        assert_eq!(parse_day(Some("  ")).unwrap(), None);
        assert!(parse_day(Some("someday")).is_err());
    }

    #[test]
    fn test_parse_id_rejects_garbage() {
        assert!(parse_id("project_id", "nope").is_err());
        assert!(parse_id("project_id", &Uuid::new_v4().to_string()).is_ok());
    }
}
