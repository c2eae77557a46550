// ABOUTME: Tool execution handlers forwarding tools/call requests to the Raindrop client
// ABOUTME: Argument extraction and result wrapping only; no bookmarking business logic
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Linkvault

//! Tool execution for the `tools/call` protocol method.
//!
//! Each tool name maps onto one [`RaindropClient`] method. Arguments are
//! validated just enough to build the upstream request; the upstream JSON is
//! returned as text content in the MCP tool-result shape.

use crate::errors::{AppError, AppResult};
use crate::providers::RaindropClient;
use serde_json::{json, Value};
use tracing::debug;

/// Executes tool calls against the bookmarking API
#[derive(Clone)]
pub struct ToolHandlers {
    client: RaindropClient,
}

impl ToolHandlers {
    /// Create tool handlers backed by the given API client
    #[must_use]
    pub const fn new(client: RaindropClient) -> Self {
        Self { client }
    }

    /// Execute a tool by name
    ///
    /// # Errors
    /// Returns an error for unknown tools, invalid arguments, or upstream failures
    pub async fn call_tool(&self, name: &str, arguments: Option<&Value>) -> AppResult<Value> {
        debug!("executing tool: {}", name);
        let args = arguments.cloned().unwrap_or_else(|| json!({}));

        let result = match name {
            "search_bookmarks" => {
                let collection_id = args["collection_id"].as_i64().unwrap_or(0);
                let search = args["search"].as_str();
                let page = args["page"].as_u64().map(|p| u32::try_from(p).unwrap_or(0));
                let per_page = args["per_page"]
                    .as_u64()
                    .map(|p| u32::try_from(p).unwrap_or(50).min(50));
                self.client
                    .search_bookmarks(collection_id, search, page, per_page)
                    .await?
            }
            "create_bookmark" => {
                let link = args["link"]
                    .as_str()
                    .ok_or_else(|| AppError::invalid_input("create_bookmark requires 'link'"))?;
                let mut body = json!({ "link": link });
                if let Some(title) = args["title"].as_str() {
                    body["title"] = json!(title);
                }
                if let Some(tags) = args["tags"].as_array() {
                    body["tags"] = json!(tags);
                }
                if let Some(collection_id) = args["collection_id"].as_i64() {
                    body["collection"] = json!({ "$id": collection_id });
                }
                self.client.create_bookmark(&body).await?
            }
            "update_bookmark" => {
                let id = Self::require_id(&args, "update_bookmark")?;
                let mut body = json!({});
                if let Some(title) = args["title"].as_str() {
                    body["title"] = json!(title);
                }
                if let Some(link) = args["link"].as_str() {
                    body["link"] = json!(link);
                }
                if let Some(tags) = args["tags"].as_array() {
                    body["tags"] = json!(tags);
                }
                if let Some(collection_id) = args["collection_id"].as_i64() {
                    body["collection"] = json!({ "$id": collection_id });
                }
                self.client.update_bookmark(id, &body).await?
            }
            "delete_bookmark" => {
                let id = Self::require_id(&args, "delete_bookmark")?;
                self.client.delete_bookmark(id).await?
            }
            "list_collections" => self.client.list_collections().await?,
            "list_tags" => self.client.list_tags().await?,
            _ => return Err(AppError::not_found(format!("Tool {name}"))),
        };

        Ok(Self::text_result(&result))
    }

    fn require_id(args: &Value, tool: &str) -> AppResult<i64> {
        args["id"]
            .as_i64()
            .ok_or_else(|| AppError::invalid_input(format!("{tool} requires numeric 'id'")))
    }

    /// Wrap upstream JSON in the MCP tool-result content shape
    fn text_result(value: &Value) -> Value {
        json!({
            "content": [{
                "type": "text",
                "text": value.to_string()
            }],
            "isError": false
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handlers() -> ToolHandlers {
        // Token deliberately absent: tool execution must fail before any
        // network call with a configuration error.
        ToolHandlers::new(RaindropClient::new("http://127.0.0.1:0".into(), None))
    }

    #[tokio::test]
    async fn test_unknown_tool_is_not_found() {
        let err = handlers().call_tool("no_such_tool", None).await.unwrap_err();
        assert_eq!(err.code, crate::errors::ErrorCode::ResourceNotFound);
    }

    #[tokio::test]
    async fn test_create_bookmark_requires_link() {
        let err = handlers()
            .call_tool("create_bookmark", Some(&json!({ "title": "no link" })))
            .await
            .unwrap_err();
        assert_eq!(err.code, crate::errors::ErrorCode::InvalidInput);
    }

    #[tokio::test]
    async fn test_delete_bookmark_requires_numeric_id() {
        let err = handlers()
            .call_tool("delete_bookmark", Some(&json!({ "id": "abc" })))
            .await
            .unwrap_err();
        assert_eq!(err.code, crate::errors::ErrorCode::InvalidInput);
    }

    #[tokio::test]
    async fn test_missing_token_is_config_error() {
        let err = handlers().call_tool("list_tags", None).await.unwrap_err();
        assert_eq!(err.code, crate::errors::ErrorCode::ConfigMissing);
    }
}
