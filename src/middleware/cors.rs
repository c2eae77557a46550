// ABOUTME: CORS middleware configuration for the MCP and OAuth endpoints
// ABOUTME: Origin policy comes from CORS_ALLOWED_ORIGINS; wildcard in development
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Linkvault

use crate::config::environment::ServerConfig;
use crate::constants::protocol::SESSION_ID_HEADER;
use http::{header::HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Configure CORS for the server.
///
/// Preflight (OPTIONS) requests are answered by this layer before the
/// protocol handler runs, so they are deliberately exempt from Host
/// validation: the preflight response discloses nothing, and the actual
/// request that follows is still validated.
pub fn setup_cors(config: &ServerConfig) -> CorsLayer {
    let allow_origin =
        if config.cors.allowed_origins.is_empty() || config.cors.allowed_origins == "*" {
            AllowOrigin::any()
        } else {
            let origins: Vec<HeaderValue> = config
                .cors
                .allowed_origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    if trimmed.is_empty() {
                        None
                    } else {
                        HeaderValue::from_str(trimmed).ok()
                    }
                })
                .collect();

            if origins.is_empty() {
                AllowOrigin::any()
            } else {
                AllowOrigin::list(origins)
            }
        };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("accept"),
            HeaderName::from_static("origin"),
            HeaderName::from_static(SESSION_ID_HEADER),
        ])
        .expose_headers([HeaderName::from_static(SESSION_ID_HEADER)])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
}
