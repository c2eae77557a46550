// ABOUTME: JSON-RPC message types and core MCP protocol handlers
// ABOUTME: Handles initialize, ping, tools/list, and resources/list protocol messages
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Linkvault

//! # MCP Protocol Handlers
//!
//! JSON-RPC 2.0 request/response types used on the protocol path, plus the
//! stateless protocol handlers (initialization, ping, catalogue listing).
//! Stateful dispatch lives in [`crate::mcp::dispatcher`].

use crate::constants::{errors, protocol};
use crate::mcp::schema::get_tools;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// MCP request
#[derive(Debug, Clone, Deserialize)]
pub struct McpRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: Option<Value>,
    /// Optional ID - notifications don't have IDs, only regular requests do
    pub id: Option<Value>,
}

impl McpRequest {
    /// True if this is a well-formed initialization request
    #[must_use]
    pub fn is_initialize(&self) -> bool {
        self.jsonrpc == "2.0" && self.method == "initialize" && self.id.is_some()
    }

    /// True if this is a notification (no response expected)
    #[must_use]
    pub fn is_notification(&self) -> bool {
        self.id.is_none() || self.method.starts_with("notifications/")
    }
}

/// MCP response
#[derive(Debug, Serialize)]
pub struct McpResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<McpError>,
    pub id: Value,
}

/// MCP error
#[derive(Debug, Serialize)]
pub struct McpError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl McpResponse {
    /// Create a successful MCP response
    #[must_use]
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_owned(),
            result: Some(result),
            error: None,
            id,
        }
    }

    /// Create an error MCP response
    #[must_use]
    pub fn error(id: Value, code: i32, message: String) -> Self {
        Self {
            jsonrpc: "2.0".to_owned(),
            result: None,
            error: Some(McpError {
                code,
                message,
                data: None,
            }),
            id,
        }
    }
}

/// Default ID for notifications and error responses that don't have a request ID
#[must_use]
pub fn default_request_id() -> Value {
    Value::Null
}

/// Stateless MCP protocol handlers
pub struct ProtocolHandler;

impl ProtocolHandler {
    /// Handle initialize request
    #[must_use]
    pub fn handle_initialize(request: &McpRequest) -> McpResponse {
        let request_id = request.id.clone().unwrap_or_else(default_request_id);
        McpResponse::success(
            request_id,
            serde_json::json!({
                "protocolVersion": protocol::MCP_PROTOCOL_VERSION,
                "capabilities": {
                    "tools": {},
                    "resources": {}
                },
                "serverInfo": {
                    "name": protocol::SERVER_NAME,
                    "version": protocol::SERVER_VERSION
                }
            }),
        )
    }

    /// Handle ping request
    #[must_use]
    pub fn handle_ping(request: &McpRequest) -> McpResponse {
        let request_id = request.id.clone().unwrap_or_else(default_request_id);
        McpResponse::success(request_id, serde_json::json!({}))
    }

    /// Handle tools list request
    #[must_use]
    pub fn handle_tools_list(request: &McpRequest) -> McpResponse {
        let request_id = request.id.clone().unwrap_or_else(default_request_id);
        McpResponse::success(request_id, serde_json::json!({ "tools": get_tools() }))
    }

    /// Handle resources list request (no resources are exposed)
    #[must_use]
    pub fn handle_resources_list(request: &McpRequest) -> McpResponse {
        let request_id = request.id.clone().unwrap_or_else(default_request_id);
        McpResponse::success(request_id, serde_json::json!({ "resources": [] }))
    }

    /// Handle unknown method
    #[must_use]
    pub fn handle_unknown_method(request: &McpRequest) -> McpResponse {
        let request_id = request.id.clone().unwrap_or_else(default_request_id);
        McpResponse::error(
            request_id,
            errors::ERROR_METHOD_NOT_FOUND,
            format!("Method not found: {}", request.method),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(method: &str, id: Option<Value>) -> McpRequest {
        McpRequest {
            jsonrpc: "2.0".to_owned(),
            method: method.to_owned(),
            params: None,
            id,
        }
    }

    #[test]
    fn test_is_initialize() {
        assert!(request("initialize", Some(Value::from(1))).is_initialize());
        assert!(!request("initialize", None).is_initialize());
        assert!(!request("tools/list", Some(Value::from(1))).is_initialize());
    }

    #[test]
    fn test_initialize_response_shape() {
        let response =
            ProtocolHandler::handle_initialize(&request("initialize", Some(Value::from(7))));
        let result = response.result.expect("initialize returns a result");
        assert_eq!(
            result["serverInfo"]["name"],
            crate::constants::protocol::SERVER_NAME
        );
        assert_eq!(response.id, Value::from(7));
    }

    #[test]
    fn test_tools_list_is_nonempty() {
        let response =
            ProtocolHandler::handle_tools_list(&request("tools/list", Some(Value::from(1))));
        let result = response.result.expect("tools/list returns a result");
        let tools = result["tools"].as_array().expect("tools array");
        assert!(!tools.is_empty());
    }

    #[test]
    fn test_unknown_method_error_code() {
        let response =
            ProtocolHandler::handle_unknown_method(&request("bogus/method", Some(Value::from(1))));
        let error = response.error.expect("error response");
        assert_eq!(error.code, errors::ERROR_METHOD_NOT_FOUND);
    }

    #[test]
    fn test_error_response_serialization_omits_result() {
        let response = McpResponse::error(Value::Null, -32700, "Parse error".into());
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("result").is_none());
        assert_eq!(json["error"]["code"], -32700);
        assert_eq!(json["id"], Value::Null);
    }
}
