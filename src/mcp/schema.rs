// ABOUTME: JSON schema types describing tool arguments for MCP clients and the LLM
// ABOUTME: Small builder over object/property schemas with array items and enums
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Object schema for a tool's arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonSchema {
    /// Always `object` for tool arguments
    #[serde(rename = "type")]
    pub schema_type: String,
    /// Named properties
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, PropertySchema>>,
    /// Required property names
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
}

impl JsonSchema {
    /// Empty object schema (no arguments)
    #[must_use]
    pub fn empty() -> Self {
        Self {
            schema_type: "object".to_owned(),
            properties: Some(BTreeMap::new()),
            required: None,
        }
    }

    /// Add a property
    #[must_use]
    pub fn property(mut self, name: &str, schema: PropertySchema) -> Self {
        self.properties
            .get_or_insert_with(BTreeMap::new)
            .insert(name.to_owned(), schema);
        self
    }

    /// Add a property and mark it required
    #[must_use]
    pub fn required_property(mut self, name: &str, schema: PropertySchema) -> Self {
        self.required
            .get_or_insert_with(Vec::new)
            .push(name.to_owned());
        self.property(name, schema)
    }
}

/// Schema of a single property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySchema {
    /// JSON type name
    #[serde(rename = "type")]
    pub property_type: String,
    /// Human-readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Element schema for arrays
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<PropertySchema>>,
    /// Allowed values for enumerated strings
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
}

impl PropertySchema {
    fn of(property_type: &str, description: &str) -> Self {
        Self {
            property_type: property_type.to_owned(),
            description: Some(description.to_owned()),
            items: None,
            enum_values: None,
        }
    }

    /// String property
    #[must_use]
    pub fn string(description: &str) -> Self {
        Self::of("string", description)
    }

    /// Integer property
    #[must_use]
    pub fn integer(description: &str) -> Self {
        Self::of("integer", description)
    }

    /// Number property
    #[must_use]
    pub fn number(description: &str) -> Self {
        Self::of("number", description)
    }

    /// Array of strings
    #[must_use]
    pub fn string_array(description: &str) -> Self {
        Self {
            items: Some(Box::new(Self {
                property_type: "string".to_owned(),
                description: None,
                items: None,
                enum_values: None,
            })),
            ..Self::of("array", description)
        }
    }

    /// String restricted to a fixed set of values
    #[must_use]
    pub fn string_enum(description: &str, values: &[&str]) -> Self {
        Self {
            enum_values: Some(values.iter().map(|v| (*v).to_owned()).collect()),
            ..Self::of("string", description)
        }
    }
}
