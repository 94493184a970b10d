// ABOUTME: Tool trait, execution context and results shared by the assistants and MCP
// ABOUTME: Tools wrap the entity managers behind typed arguments and text summaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Tools
//!
//! A tool is a named, schema-described async function the model (or an MCP
//! client) may invoke. Tools are grouped into registries:
//!
//! - [`ToolRegistry::chef`]: meal planning, recipes and shopping
//! - [`ToolRegistry::coach`]: sessions, weight and habit logs
//! - [`ToolRegistry::all`]: both, exposed over MCP

/// Tool implementations
pub mod implementations;
/// Tool lookup and invocation
pub mod registry;

pub use registry::{ToolOutcome, ToolRegistry};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::mcp::schema::JsonSchema;

/// State available to a running tool
#[derive(Clone)]
pub struct ToolExecutionContext {
    /// Storage
    pub database: Database,
    /// Instance the conversation is bound to (coach conversations)
    pub instance: Option<String>,
}

impl ToolExecutionContext {
    /// Context with no bound instance
    #[must_use]
    pub const fn new(database: Database) -> Self {
        Self {
            database,
            instance: None,
        }
    }

    /// Context bound to a calendar instance
    #[must_use]
    pub fn for_instance(database: Database, instance: impl Into<String>) -> Self {
        Self {
            database,
            instance: Some(instance.into()),
        }
    }

    /// Explicit instance argument, falling back to the bound instance
    ///
    /// # Errors
    ///
    /// Returns a missing-field error if neither is present
    pub fn resolve_instance(&self, explicit: Option<String>) -> AppResult<String> {
        explicit
            .filter(|i| !i.trim().is_empty())
            .or_else(|| self.instance.clone())
            .ok_or_else(|| AppError::missing_field("instance"))
    }
}

/// Successful tool output
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    /// Plain-text rendering fed back to the model
    pub text: String,
    /// Structured payload for MCP clients
    pub data: Option<Value>,
}

impl ToolResult {
    /// Text-only result
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            data: None,
        }
    }

    /// Text result with a structured payload
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be serialized
    pub fn with_data<T: Serialize>(text: impl Into<String>, data: &T) -> AppResult<Self> {
        Ok(Self {
            text: text.into(),
            data: Some(serde_json::to_value(data)?),
        })
    }
}

/// A callable tool
#[async_trait]
pub trait McpTool: Send + Sync {
    /// Unique tool name
    fn name(&self) -> &'static str;

    /// What the tool does, shown to the model
    fn description(&self) -> &'static str;

    /// Argument schema
    fn input_schema(&self) -> JsonSchema;

    /// Run the tool
    ///
    /// # Errors
    ///
    /// Returns an error if arguments are invalid or the underlying operation fails
    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult>;
}

/// Deserialize tool arguments into a typed parameter struct
///
/// A missing or `null` argument object is treated as `{}`.
///
/// # Errors
///
/// Returns an invalid-input error naming the tool if deserialization fails
pub fn parse_args<T: DeserializeOwned>(tool: &str, args: Value) -> AppResult<T> {
    let args = if args.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        args
    };
    serde_json::from_value(args)
        .map_err(|e| AppError::invalid_input(format!("Invalid arguments for {tool}: {e}")))
}
