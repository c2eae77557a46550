// ABOUTME: Protocol dispatch behind a narrow trait seam consumed by session transports
// ABOUTME: Validates, routes, and executes MCP protocol requests with proper error handling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Linkvault

//! # Protocol Dispatcher
//!
//! The session layer depends on protocol execution only through
//! [`ProtocolDispatcher`]: given a parsed request bound to a live transport,
//! produce an optional response (notifications produce none). Keeping the
//! seam narrow lets the multiplexer and registry be tested against a stub.

use crate::constants::errors::{ERROR_INTERNAL, ERROR_INVALID_PARAMS};
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::mcp::protocol::{default_request_id, McpRequest, McpResponse, ProtocolHandler};
use crate::mcp::schema::ToolCall;
use crate::mcp::tool_handlers::ToolHandlers;
use async_trait::async_trait;
use tracing::{debug, error};

/// Narrow contract between the session transport and protocol execution
#[async_trait]
pub trait ProtocolDispatcher: Send + Sync {
    /// Execute one protocol request; `None` means no response (notification)
    async fn handle(&self, request: McpRequest) -> Option<McpResponse>;
}

/// Default dispatcher routing protocol methods to handlers and tools
pub struct ToolDispatcher {
    tools: ToolHandlers,
}

impl ToolDispatcher {
    /// Create a dispatcher backed by the given tool handlers
    #[must_use]
    pub const fn new(tools: ToolHandlers) -> Self {
        Self { tools }
    }

    async fn process_request(&self, request: &McpRequest) -> AppResult<McpResponse> {
        Self::validate_request(request)?;

        match request.method.as_str() {
            "initialize" => Ok(ProtocolHandler::handle_initialize(request)),
            "ping" => Ok(ProtocolHandler::handle_ping(request)),
            "tools/list" => Ok(ProtocolHandler::handle_tools_list(request)),
            "tools/call" => self.handle_tools_call(request).await,
            method if method.starts_with("resources/") => {
                Ok(ProtocolHandler::handle_resources_list(request))
            }
            _ => Ok(ProtocolHandler::handle_unknown_method(request)),
        }
    }

    fn validate_request(request: &McpRequest) -> AppResult<()> {
        if request.jsonrpc != "2.0" {
            return Err(AppError::invalid_input(format!(
                "Invalid JSON-RPC version: got '{}', expected '2.0'",
                request.jsonrpc
            )));
        }
        if request.method.is_empty() {
            return Err(AppError::invalid_input("Missing method"));
        }
        Ok(())
    }

    async fn handle_tools_call(&self, request: &McpRequest) -> AppResult<McpResponse> {
        let request_id = request.id.clone().unwrap_or_else(default_request_id);

        let params = request
            .params
            .clone()
            .ok_or_else(|| AppError::invalid_input("tools/call requires params"))?;
        let call: ToolCall = serde_json::from_value(params)
            .map_err(|e| AppError::invalid_input(format!("invalid tools/call params: {e}")))?;

        match self.tools.call_tool(&call.name, call.arguments.as_ref()).await {
            Ok(result) => Ok(McpResponse::success(request_id, result)),
            Err(e) => {
                // Tool failures come back as protocol errors; upstream detail
                // is preserved in the message.
                let code = match e.code {
                    ErrorCode::InvalidInput
                    | ErrorCode::MissingRequiredField
                    | ErrorCode::ResourceNotFound => ERROR_INVALID_PARAMS,
                    _ => ERROR_INTERNAL,
                };
                Ok(McpResponse::error(request_id, code, e.to_string()))
            }
        }
    }
}

#[async_trait]
impl ProtocolDispatcher for ToolDispatcher {
    async fn handle(&self, request: McpRequest) -> Option<McpResponse> {
        debug!("dispatching method: {}", request.method);

        if request.is_notification() {
            debug!("notification consumed: {}", request.method);
            return None;
        }

        let response = match self.process_request(&request).await {
            Ok(response) => response,
            Err(e) => {
                error!(
                    "failed to process request: {} | method={} id={:?}",
                    e, request.method, request.id
                );
                let request_id = request.id.clone().unwrap_or_else(default_request_id);
                match e.code {
                    ErrorCode::InvalidInput | ErrorCode::MissingRequiredField => {
                        McpResponse::error(request_id, ERROR_INVALID_PARAMS, e.message)
                    }
                    // Unexpected failures are logged in full above; the
                    // client gets a generic message.
                    _ => McpResponse::error(
                        request_id,
                        ERROR_INTERNAL,
                        "Internal server error".to_owned(),
                    ),
                }
            }
        };
        Some(response)
    }
}
