// ABOUTME: Tool implementations grouped by assistant
// ABOUTME: Exposes the constructor lists the registries are built from
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Sgt Chef meal planning tools
pub mod chef;
/// Accountability coach tools
pub mod coach;

pub use chef::create_chef_tools;
pub use coach::create_coach_tools;
