// ABOUTME: Streamable HTTP transport multiplexer for the /mcp protocol endpoint
// ABOUTME: Creates, reuses, or rejects sessions and forwards parsed bodies to the dispatcher
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Linkvault

//! # Transport Multiplexer
//!
//! POST `/mcp` runs a small state machine per request:
//!
//! - no session header, body is a well-formed `initialize` → create a session
//!   and return its id in the `Mcp-Session-Id` response header;
//! - no session header, anything else → structured rejection, nothing created;
//! - known session header → route to that session's transport;
//! - unknown session header → rejection (a client-supplied id never creates a
//!   session, which prevents session fixation);
//! - unparsable body → JSON-RPC parse error, registry untouched.
//!
//! Host validation has already happened by the time these handlers run (see
//! [`crate::server`]); only POST is routed here, so a bare fetch without a
//! body is rejected structurally by the router.

use crate::constants::errors::{
    ERROR_INVALID_REQUEST, ERROR_INVALID_SESSION, ERROR_PARSE,
};
use crate::constants::protocol::SESSION_ID_HEADER;
use crate::mcp::protocol::{McpRequest, McpResponse};
use crate::server::ServerResources;
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// MCP transport routes implementation
pub struct McpRoutes;

impl McpRoutes {
    /// Create the protocol route (POST only; preflight is answered by the
    /// CORS layer)
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/mcp", post(Self::handle_mcp_post))
            .with_state(resources)
    }

    /// Build the structured JSON-RPC rejection body used on this path
    #[must_use]
    pub fn rejection(status: StatusCode, code: i32, message: String) -> Response {
        let body = McpResponse::error(Value::Null, code, message);
        (status, Json(body)).into_response()
    }

    /// Handle POST /mcp - initialize or reuse a session, dispatch the body
    async fn handle_mcp_post(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Bytes,
    ) -> Response {
        // Parse failures happen before any transport dispatch; existing
        // registry state is left untouched.
        let raw: Value = match serde_json::from_slice(&body) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("unparsable protocol body: {}", e);
                return Self::rejection(
                    StatusCode::BAD_REQUEST,
                    ERROR_PARSE,
                    "Parse error".to_owned(),
                );
            }
        };

        let request: McpRequest = match serde_json::from_value(raw) {
            Ok(request) => request,
            Err(e) => {
                warn!("structurally invalid protocol request: {}", e);
                return Self::rejection(
                    StatusCode::BAD_REQUEST,
                    ERROR_INVALID_REQUEST,
                    "Invalid request".to_owned(),
                );
            }
        };

        let session_id = headers
            .get(SESSION_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        match session_id {
            Some(id) => Self::route_to_session(&resources, &id, request).await,
            None => Self::maybe_initialize(&resources, request).await,
        }
    }

    /// Active path: the request carries a session id present in the registry
    async fn route_to_session(
        resources: &Arc<ServerResources>,
        session_id: &str,
        request: McpRequest,
    ) -> Response {
        let Some(transport) = resources.registry.get_transport(session_id).await else {
            // Expired, evicted, or never valid. Creating a session under a
            // client-supplied id here would enable session fixation.
            warn!("request for unknown session: {}", session_id);
            return Self::rejection(
                StatusCode::NOT_FOUND,
                ERROR_INVALID_SESSION,
                format!("Session not found: {session_id}"),
            );
        };

        debug!("routing {} to session {}", request.method, session_id);
        Self::respond(transport.handle_request(request).await, None)
    }

    /// No-session path: only a well-formed initialize call creates state
    async fn maybe_initialize(
        resources: &Arc<ServerResources>,
        request: McpRequest,
    ) -> Response {
        if !request.is_initialize() {
            return Self::rejection(
                StatusCode::BAD_REQUEST,
                ERROR_INVALID_SESSION,
                "Bad Request: no valid session ID provided and not an initialization request"
                    .to_owned(),
            );
        }

        let transport = resources
            .registry
            .create_session(resources.dispatcher.clone())
            .await;
        let session_id = transport.session_id().to_owned();

        let response = transport.handle_request(request).await;
        Self::respond(response, Some(&session_id))
    }

    /// Serialize the dispatch outcome; notifications get 202 with no body
    fn respond(response: Option<McpResponse>, new_session_id: Option<&str>) -> Response {
        let mut http_response = match response {
            Some(response) => (StatusCode::OK, Json(response)).into_response(),
            None => StatusCode::ACCEPTED.into_response(),
        };

        if let Some(session_id) = new_session_id {
            if let Ok(value) = HeaderValue::from_str(session_id) {
                http_response
                    .headers_mut()
                    .insert(SESSION_ID_HEADER, value);
            }
        }

        http_response
    }
}
