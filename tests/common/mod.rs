// ABOUTME: Shared helpers for integration tests
// ABOUTME: Builds in-memory server resources and decodes response bodies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Linkvault

use axum::response::Response;
use http_body_util::BodyExt;
use linkvault_mcp_server::config::environment::{
    CorsConfig, OAuthProviderConfig, RaindropApiConfig, ServerConfig, SessionConfig,
};
use linkvault_mcp_server::server::{router, ServerResources};

/// Configuration with the default allowlist and no external credentials.
///
/// The API base points at an unroutable port so any accidental outbound call
/// fails fast instead of touching the network.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        http_port: 3002,
        allowed_hosts: vec!["localhost".into(), "127.0.0.1".into(), "::1".into()],
        session: SessionConfig {
            idle_timeout_secs: 1800,
            sweep_interval_secs: 60,
        },
        cors: CorsConfig {
            allowed_origins: "*".into(),
        },
        oauth: OAuthProviderConfig {
            client_id: None,
            client_secret: None,
            redirect_uri: None,
        },
        raindrop_api: RaindropApiConfig {
            base_url: "http://127.0.0.1:1/rest/v1".into(),
            auth_url: "https://raindrop.io/oauth/authorize".into(),
            token_url: "http://127.0.0.1:1/oauth/access_token".into(),
            access_token: None,
        },
    }
}

/// Full application router over the given configuration
pub fn test_router(config: ServerConfig) -> axum::Router {
    router(ServerResources::new(config))
}

/// Collect and parse a JSON response body
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}
