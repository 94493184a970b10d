// ABOUTME: Accountability coach tools for sessions, weigh-ins and habit logs
// ABOUTME: Instance arguments default to the instance the conversation is bound to
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::calendar::validate_instance;
use crate::database::{CreateLogRequest, ListLogsFilter, UpsertSessionRequest};
use crate::errors::{AppError, AppResult};
use crate::formatters::{summarize_list, Summary};
use crate::mcp::schema::{JsonSchema, PropertySchema};
use crate::tools::{parse_args, McpTool, ToolExecutionContext, ToolResult};

const INSTANCE_HELP: &str =
    "Instance key such as day2026049, week202608 or month202602 (defaults to the current conversation)";

#[derive(Debug, Default, Deserialize)]
struct InstanceParams {
    #[serde(default)]
    instance: Option<String>,
}

// ============================================================================
// GetSessionTool
// ============================================================================

/// Session record for an instance
pub struct GetSessionTool;

#[async_trait]
impl McpTool for GetSessionTool {
    fn name(&self) -> &'static str {
        "get_session"
    }

    fn description(&self) -> &'static str {
        "Get the coaching session for a day, week or month: recorded weight and the logs filed under it."
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::empty().property("instance", PropertySchema::string(INSTANCE_HELP))
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let params: InstanceParams = parse_args(self.name(), args)?;
        let instance = validate_instance(&ctx.resolve_instance(params.instance)?)?;

        let session = ctx.database.sessions().get_by_instance(&instance).await?;
        let logs = ctx
            .database
            .logs()
            .list(&ListLogsFilter {
                instance: Some(instance.clone()),
                ..ListLogsFilter::default()
            })
            .await?;

        let header = session.as_ref().map_or_else(
            || format!("No session recorded for {instance} yet."),
            Summary::summary,
        );
        let text = format!("{header}\nLogs:\n{}", summarize_list(&logs, "No logs yet."));
        ToolResult::with_data(
            text,
            &json!({
                "instance": instance,
                "weight": session.as_ref().and_then(|s| s.weight),
                "message_count": session.as_ref().map_or(0, |s| s.messages.len()),
                "logs": logs,
            }),
        )
    }
}

// ============================================================================
// RecordWeightTool
// ============================================================================

#[derive(Debug, Deserialize)]
struct RecordWeightParams {
    weight: f64,
    #[serde(default)]
    instance: Option<String>,
}

/// Record a weigh-in on a session
pub struct RecordWeightTool;

#[async_trait]
impl McpTool for RecordWeightTool {
    fn name(&self) -> &'static str {
        "record_weight"
    }

    fn description(&self) -> &'static str {
        "Record the user's body weight for a day, week or month. Replaces any earlier reading."
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::empty()
            .required_property("weight", PropertySchema::number("Body weight"))
            .property("instance", PropertySchema::string(INSTANCE_HELP))
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let params: RecordWeightParams = parse_args(self.name(), args)?;
        if !params.weight.is_finite() || params.weight <= 0.0 {
            return Err(AppError::invalid_input(format!(
                "Weight must be a positive number, got {}",
                params.weight
            )));
        }
        let instance = ctx.resolve_instance(params.instance)?;

        let session = ctx
            .database
            .sessions()
            .upsert(
                &instance,
                &UpsertSessionRequest {
                    messages: None,
                    weight: Some(params.weight),
                },
            )
            .await?;
        ToolResult::with_data(
            format!("Recorded weight {} for {}", params.weight, session.instance),
            &json!({"instance": session.instance, "weight": session.weight}),
        )
    }
}

// ============================================================================
// CreateLogTool
// ============================================================================

#[derive(Debug, Deserialize)]
struct CreateLogParams {
    category: String,
    content: String,
    #[serde(default)]
    value: Option<f64>,
    #[serde(default)]
    instance: Option<String>,
}

/// File a habit, meal or workout log
pub struct CreateLogTool;

#[async_trait]
impl McpTool for CreateLogTool {
    fn name(&self) -> &'static str {
        "create_log"
    }

    fn description(&self) -> &'static str {
        "Log something the user did: a habit, meal, workout or other activity, with an optional numeric value."
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::empty()
            .required_property(
                "category",
                PropertySchema::string("Category, e.g. habit, meal, workout"),
            )
            .required_property("content", PropertySchema::string("What happened"))
            .property(
                "value",
                PropertySchema::number("Optional amount (minutes, reps, servings)"),
            )
            .property("instance", PropertySchema::string(INSTANCE_HELP))
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let params: CreateLogParams = parse_args(self.name(), args)?;
        let request = CreateLogRequest {
            instance: ctx.resolve_instance(params.instance)?,
            category: params.category,
            content: params.content,
            value: params.value,
        };
        let log = ctx.database.logs().create(&request).await?;
        ToolResult::with_data(format!("Logged {}", log.summary()), &log)
    }
}

// ============================================================================
// ListLogsTool
// ============================================================================

#[derive(Debug, Default, Deserialize)]
struct ListLogsParams {
    #[serde(default)]
    instance: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    limit: Option<u32>,
}

/// List logs for an instance
pub struct ListLogsTool;

#[async_trait]
impl McpTool for ListLogsTool {
    fn name(&self) -> &'static str {
        "list_logs"
    }

    fn description(&self) -> &'static str {
        "List logs for a day, week or month, optionally filtered by category."
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::empty()
            .property("instance", PropertySchema::string(INSTANCE_HELP))
            .property("category", PropertySchema::string("Only this category"))
            .property("limit", PropertySchema::integer("Maximum results (default 50)"))
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let params: ListLogsParams = parse_args(self.name(), args)?;
        let filter = ListLogsFilter {
            instance: Some(ctx.resolve_instance(params.instance)?),
            category: params.category,
            limit: params.limit,
        };
        let logs = ctx.database.logs().list(&filter).await?;
        ToolResult::with_data(summarize_list(&logs, "No logs found."), &logs)
    }
}

/// All coach tools in registry order
#[must_use]
pub fn create_coach_tools() -> Vec<Box<dyn McpTool>> {
    vec![
        Box::new(GetSessionTool),
        Box::new(RecordWeightTool),
        Box::new(CreateLogTool),
        Box::new(ListLogsTool),
    ]
}
