// ABOUTME: Model Context Protocol surface exposing the tools over JSON-RPC
// ABOUTME: Also owns the shared server resources and tool schema types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// JSON-RPC method dispatch
pub mod protocol;
/// Shared server state
pub mod resources;
/// Tool argument schemas
pub mod schema;

pub use protocol::McpProtocolHandler;
pub use resources::ServerResources;
