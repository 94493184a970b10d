// ABOUTME: Application constants for service identity, protocol versions, and defaults
// ABOUTME: Centralizes JSON-RPC error codes and environment defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Service identity
pub mod service_names {
    /// Name reported by `/health` and MCP `initialize`
    pub const SGT_CHEF_SERVER: &str = "sgt-chef-server";
}

/// Protocol constants
pub mod protocol {
    /// JSON-RPC version string
    pub const JSONRPC_VERSION: &str = "2.0";
    /// MCP protocol revision advertised on `initialize`
    pub const MCP_PROTOCOL_VERSION: &str = "2025-06-18";
    /// Server version reported to MCP clients
    pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
}

/// JSON-RPC 2.0 error codes
pub mod errors {
    /// Invalid JSON was received
    pub const ERROR_PARSE: i32 = -32700;
    /// The JSON sent is not a valid request object
    pub const ERROR_INVALID_REQUEST: i32 = -32600;
    /// The method does not exist
    pub const ERROR_METHOD_NOT_FOUND: i32 = -32601;
    /// Invalid method parameters
    pub const ERROR_INVALID_PARAMS: i32 = -32602;
}

/// Defaults applied when environment variables are absent
pub mod defaults {
    /// Bind host
    pub const HOST: &str = "127.0.0.1";
    /// HTTP port
    pub const HTTP_PORT: u16 = 8081;
    /// SQLite database location
    pub const DATABASE_URL: &str = "sqlite:./data/sgt_chef.db";
    /// Anthropic API base URL
    pub const LLM_BASE_URL: &str = "https://api.anthropic.com";
    /// Model used when `SGT_CHEF_LLM_MODEL` is unset
    pub const LLM_MODEL: &str = "claude-sonnet-4-20250514";
    /// Completion token limit per model call
    pub const LLM_MAX_TOKENS: u32 = 2048;
    /// Maximum model calls per conversation turn
    pub const MAX_TOOL_ITERATIONS: usize = 10;
    /// Outbound LLM request timeout
    pub const LLM_TIMEOUT_SECS: u64 = 120;
    /// Outbound media upload timeout
    pub const MEDIA_TIMEOUT_SECS: u64 = 60;
    /// Maximum accepted request body (photo uploads included)
    pub const MAX_BODY_BYTES: usize = 15 * 1024 * 1024;
}

/// List endpoint limits
pub mod limits {
    /// Default page size for list endpoints and tools
    pub const DEFAULT_LIST_LIMIT: u32 = 50;
    /// Hard cap on page size
    pub const MAX_LIST_LIMIT: u32 = 200;
}
