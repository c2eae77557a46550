// ABOUTME: MCP tool schema definitions for the bookmarking tool catalogue
// ABOUTME: Type-safe JSON schema construction; the catalogue is static for the process lifetime
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Linkvault

//! MCP tool schema definitions.
//!
//! Each tool maps one-to-one onto a Raindrop REST endpoint; the handlers in
//! [`crate::mcp::tool_handlers`] do the forwarding.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// MCP Tool Schema Definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: JsonSchema,
}

/// JSON Schema Definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<HashMap<String, PropertySchema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
}

/// Property schema for tool parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub property_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Tool Call for executing a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    pub arguments: Option<serde_json::Value>,
}

fn property(property_type: &str, description: &str) -> PropertySchema {
    PropertySchema {
        property_type: property_type.into(),
        description: Some(description.into()),
    }
}

/// Get all tool schemas exposed by this server
#[must_use]
pub fn get_tools() -> Vec<ToolSchema> {
    vec![
        create_search_bookmarks_tool(),
        create_create_bookmark_tool(),
        create_update_bookmark_tool(),
        create_delete_bookmark_tool(),
        create_list_collections_tool(),
        create_list_tags_tool(),
    ]
}

fn create_search_bookmarks_tool() -> ToolSchema {
    let mut properties = HashMap::new();
    properties.insert(
        "search".to_string(),
        property("string", "Full-text search query"),
    );
    properties.insert(
        "collection_id".to_string(),
        property("number", "Collection to search in (0 searches all collections)"),
    );
    properties.insert("page".to_string(), property("number", "Result page, 0-based"));
    properties.insert(
        "per_page".to_string(),
        property("number", "Results per page (max 50)"),
    );

    ToolSchema {
        name: "search_bookmarks".to_string(),
        description: "Search bookmarks, optionally scoped to a collection".into(),
        input_schema: JsonSchema {
            schema_type: "object".into(),
            properties: Some(properties),
            required: None,
        },
    }
}

fn create_create_bookmark_tool() -> ToolSchema {
    let mut properties = HashMap::new();
    properties.insert("link".to_string(), property("string", "URL to bookmark"));
    properties.insert("title".to_string(), property("string", "Bookmark title"));
    properties.insert(
        "collection_id".to_string(),
        property("number", "Collection to file the bookmark under"),
    );
    properties.insert(
        "tags".to_string(),
        property("array", "Tags to attach to the bookmark"),
    );

    ToolSchema {
        name: "create_bookmark".to_string(),
        description: "Create a new bookmark".into(),
        input_schema: JsonSchema {
            schema_type: "object".into(),
            properties: Some(properties),
            required: Some(vec!["link".to_string()]),
        },
    }
}

fn create_update_bookmark_tool() -> ToolSchema {
    let mut properties = HashMap::new();
    properties.insert("id".to_string(), property("number", "Bookmark identifier"));
    properties.insert("title".to_string(), property("string", "New title"));
    properties.insert("link".to_string(), property("string", "New URL"));
    properties.insert("tags".to_string(), property("array", "Replacement tag list"));
    properties.insert(
        "collection_id".to_string(),
        property("number", "Collection to move the bookmark to"),
    );

    ToolSchema {
        name: "update_bookmark".to_string(),
        description: "Update an existing bookmark".into(),
        input_schema: JsonSchema {
            schema_type: "object".into(),
            properties: Some(properties),
            required: Some(vec!["id".to_string()]),
        },
    }
}

fn create_delete_bookmark_tool() -> ToolSchema {
    let mut properties = HashMap::new();
    properties.insert("id".to_string(), property("number", "Bookmark identifier"));

    ToolSchema {
        name: "delete_bookmark".to_string(),
        description: "Delete a bookmark".into(),
        input_schema: JsonSchema {
            schema_type: "object".into(),
            properties: Some(properties),
            required: Some(vec!["id".to_string()]),
        },
    }
}

fn create_list_collections_tool() -> ToolSchema {
    ToolSchema {
        name: "list_collections".to_string(),
        description: "List all bookmark collections".into(),
        input_schema: JsonSchema {
            schema_type: "object".into(),
            properties: None,
            required: None,
        },
    }
}

fn create_list_tags_tool() -> ToolSchema {
    ToolSchema {
        name: "list_tags".to_string(),
        description: "List all tags in use".into(),
        input_schema: JsonSchema {
            schema_type: "object".into(),
            properties: None,
            required: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_names_are_unique() {
        let tools = get_tools();
        let mut names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), tools.len());
    }

    #[test]
    fn test_input_schema_serializes_camel_case() {
        let json = serde_json::to_value(get_tools()).unwrap();
        assert!(json[0].get("inputSchema").is_some());
        assert!(json[0].get("input_schema").is_none());
    }

    #[test]
    fn test_required_fields() {
        let tools = get_tools();
        let create = tools.iter().find(|t| t.name == "create_bookmark").unwrap();
        assert_eq!(
            create.input_schema.required.as_deref(),
            Some(&["link".to_string()][..])
        );
    }
}
