// ABOUTME: Shared resource container, router assembly, and server run loop
// ABOUTME: Host-header enforcement lives here as middleware wrapping every route
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Linkvault

//! Server composition.
//!
//! [`ServerResources`] is built once at startup and shared across all
//! handlers via `Arc`; no handler owns mutable state of its own. The router
//! layers, outermost first: trace, body limit, CORS, then the Host-allowlist
//! middleware. CORS sits outside the Host check so preflight requests are
//! answered without it; the request that follows a preflight is still
//! validated.

use crate::config::environment::ServerConfig;
use crate::constants::defaults::MAX_BODY_BYTES;
use crate::constants::errors::ERROR_INVALID_HOST;
use crate::mcp::dispatcher::{ProtocolDispatcher, ToolDispatcher};
use crate::mcp::session::SessionRegistry;
use crate::mcp::tool_handlers::ToolHandlers;
use crate::middleware::cors::setup_cors;
use crate::providers::raindrop::RaindropClient;
use crate::routes::{AuthRoutes, HealthRoutes, McpRoutes};
use crate::security::validate_host;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{info, warn};

/// Container for all shared server resources
pub struct ServerResources {
    /// Immutable configuration loaded at startup
    pub config: ServerConfig,
    /// Active session registry
    pub registry: Arc<SessionRegistry>,
    /// Protocol dispatcher handed to every new session
    pub dispatcher: Arc<dyn ProtocolDispatcher>,
    /// Outbound HTTP client for the OAuth token exchange
    pub http_client: reqwest::Client,
}

impl ServerResources {
    /// Create resources from configuration, spawning the close listener.
    ///
    /// Must run inside a Tokio runtime.
    pub fn new(config: ServerConfig) -> Arc<Self> {
        let (registry, close_rx) = SessionRegistry::new();
        SessionRegistry::spawn_close_listener(registry.clone(), close_rx);

        let client = RaindropClient::new(
            config.raindrop_api.base_url.clone(),
            config.raindrop_api.access_token.clone(),
        );
        let dispatcher: Arc<dyn ProtocolDispatcher> =
            Arc::new(ToolDispatcher::new(ToolHandlers::new(client)));

        Arc::new(Self {
            config,
            registry,
            dispatcher,
            http_client: reqwest::Client::new(),
        })
    }
}

/// Reject requests whose Host header is not on the allowlist.
///
/// Runs before any route handler. The protocol endpoint answers in JSON-RPC
/// shape so clients see a structured error; every other path gets a plain
/// error document. Both are HTTP 403.
async fn enforce_host_allowlist(
    State(resources): State<Arc<ServerResources>>,
    request: Request,
    next: Next,
) -> Response {
    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok());

    if let Err(rejection) = validate_host(host, &resources.config.allowed_hosts) {
        warn!(
            "rejected request to {}: {}",
            request.uri().path(),
            rejection
        );
        let message = format!("Invalid host header: {rejection}");
        if request.uri().path() == "/mcp" {
            return McpRoutes::rejection(StatusCode::FORBIDDEN, ERROR_INVALID_HOST, message);
        }
        return (
            StatusCode::FORBIDDEN,
            Json(serde_json::json!({
                "error": { "code": "forbidden", "message": message }
            })),
        )
            .into_response();
    }

    next.run(request).await
}

/// Assemble the full application router
pub fn router(resources: Arc<ServerResources>) -> Router {
    let cors = setup_cors(&resources.config);

    Router::new()
        .merge(HealthRoutes::routes(resources.clone()))
        .merge(AuthRoutes::routes(resources.clone()))
        .merge(McpRoutes::routes(resources.clone()))
        .layer(axum::middleware::from_fn_with_state(
            resources,
            enforce_host_allowlist,
        ))
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until shutdown.
///
/// Spawns the idle-session sweeper alongside the accept loop.
///
/// # Errors
/// Returns an error if the listen port cannot be bound or the accept loop
/// fails.
pub async fn run(resources: Arc<ServerResources>) -> anyhow::Result<()> {
    SessionRegistry::spawn_sweeper(
        resources.registry.clone(),
        resources.config.session.idle_timeout_secs,
        resources.config.session.sweep_interval_secs,
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], resources.config.http_port));
    let app = router(resources.clone());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on {} ({})", addr, resources.config.summary());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to install shutdown signal handler: {}", e);
        // Without a signal handler the future must still resolve eventually;
        // pending forever would disable graceful shutdown, not the server.
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
