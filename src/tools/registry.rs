// ABOUTME: Tool registry: schema projection for the model and lookup-and-invoke by name
// ABOUTME: Unknown tools and handler failures become error outcomes, never aborts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::time::Instant;

use serde_json::Value;
use tracing::{info, warn};

use super::implementations::{create_chef_tools, create_coach_tools};
use super::{McpTool, ToolExecutionContext};
use crate::llm::ToolDefinition;

/// Result of invoking a tool by name
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutcome {
    /// Text for the model
    pub text: String,
    /// Structured payload, when the tool produced one
    pub data: Option<Value>,
    /// Whether this is an error result
    pub is_error: bool,
}

impl ToolOutcome {
    fn error(text: String) -> Self {
        Self {
            text,
            data: None,
            is_error: true,
        }
    }
}

/// Ordered set of tools with unique names
pub struct ToolRegistry {
    tools: Vec<Box<dyn McpTool>>,
}

impl ToolRegistry {
    /// Build a registry; later tools with a name already present are dropped
    #[must_use]
    pub fn new(tools: Vec<Box<dyn McpTool>>) -> Self {
        let mut unique: Vec<Box<dyn McpTool>> = Vec::with_capacity(tools.len());
        for tool in tools {
            if unique.iter().any(|t| t.name() == tool.name()) {
                warn!(tool = tool.name(), "Duplicate tool name ignored");
                continue;
            }
            unique.push(tool);
        }
        Self { tools: unique }
    }

    /// Sgt Chef tools
    #[must_use]
    pub fn chef() -> Self {
        Self::new(create_chef_tools())
    }

    /// Accountability coach tools
    #[must_use]
    pub fn coach() -> Self {
        Self::new(create_coach_tools())
    }

    /// Every tool, for MCP clients
    #[must_use]
    pub fn all() -> Self {
        let mut tools = create_chef_tools();
        tools.extend(create_coach_tools());
        Self::new(tools)
    }

    /// Number of registered tools
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Registered tool names in order
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Whether a tool with this name exists
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    fn find(&self, name: &str) -> Option<&dyn McpTool> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .map(AsRef::as_ref)
    }

    /// Schema projection for the model API
    #[must_use]
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|tool| ToolDefinition {
                name: tool.name().to_owned(),
                description: tool.description().to_owned(),
                input_schema: serde_json::to_value(tool.input_schema())
                    .unwrap_or_else(|_| serde_json::json!({"type": "object"})),
            })
            .collect()
    }

    /// Look up a tool by name and run it
    ///
    /// Unknown names yield `Unknown tool: <name>`; handler failures yield
    /// `Tool Error: <message>`. Neither is retried.
    pub async fn invoke(&self, name: &str, args: Value, ctx: &ToolExecutionContext) -> ToolOutcome {
        let Some(tool) = self.find(name) else {
            warn!(tool = name, "Model requested unknown tool");
            return ToolOutcome::error(format!("Unknown tool: {name}"));
        };

        let started = Instant::now();
        match tool.execute(args, ctx).await {
            Ok(result) => {
                info!(
                    tool = name,
                    elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                    "Tool executed"
                );
                ToolOutcome {
                    text: result.text,
                    data: result.data,
                    is_error: false,
                }
            }
            Err(e) => {
                warn!(tool = name, code = %e.code, "Tool execution failed");
                ToolOutcome::error(format!("Tool Error: {e}"))
            }
        }
    }
}
