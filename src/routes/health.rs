// ABOUTME: Health check and capability document route handlers
// ABOUTME: Static or near-static payloads; these endpoints never fail in normal operation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Linkvault

//! Health and documentation routes

use crate::constants::protocol;
use crate::server::ServerResources;
use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create health and capability routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/health", get(Self::handle_health))
            .route("/", get(Self::handle_root))
            .with_state(resources)
    }

    /// Handle GET /health - liveness plus active session count
    async fn handle_health(
        State(resources): State<Arc<ServerResources>>,
    ) -> Json<serde_json::Value> {
        let active_sessions = resources.registry.active_count().await;
        Json(serde_json::json!({
            "status": "healthy",
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "active_sessions": active_sessions
        }))
    }

    /// Handle GET / - static capability/documentation payload
    async fn handle_root(
        State(_resources): State<Arc<ServerResources>>,
    ) -> Json<serde_json::Value> {
        Json(serde_json::json!({
            "name": protocol::SERVER_NAME,
            "version": protocol::SERVER_VERSION,
            "protocol_version": protocol::MCP_PROTOCOL_VERSION,
            "description": "MCP server exposing bookmarking tools over Streamable HTTP",
            "endpoints": {
                "mcp": { "path": "/mcp", "method": "POST" },
                "health": { "path": "/health", "method": "GET" },
                "oauth_authorize": { "path": "/auth/raindrop", "method": "GET" },
                "oauth_callback": { "path": "/auth/raindrop/callback", "method": "GET" }
            }
        }))
    }
}
