// ABOUTME: Integration tests for Host-header allowlist enforcement
// ABOUTME: Covers default allowlist, port and IPv6 handling, and the preflight exemption
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Linkvault

mod common;

use axum::body::Body;
use common::{body_json, test_config, test_router};
use http::{Request, StatusCode};
use tower::ServiceExt;

fn initialize_body() -> String {
    serde_json::json!({
        "jsonrpc": "2.0",
        "method": "initialize",
        "params": {
            "protocolVersion": "2024-11-05",
            "capabilities": {},
            "clientInfo": { "name": "test-client", "version": "0.0.1" }
        },
        "id": 1
    })
    .to_string()
}

#[tokio::test]
async fn test_health_allows_localhost_with_port() {
    let app = test_router(test_config());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("host", "localhost:3002")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_health_rejects_foreign_host() {
    let app = test_router(test_config());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("host", "evil.example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "forbidden");
}

#[tokio::test]
async fn test_missing_host_header_rejected() {
    let app = test_router(test_config());

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_ipv6_bracketed_host_allowed() {
    let app = test_router(test_config());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("host", "[::1]:3002")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_host_with_embedded_credentials_rejected() {
    let app = test_router(test_config());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("host", "localhost@evil.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_mcp_rejection_uses_jsonrpc_shape() {
    let app = test_router(test_config());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/mcp")
                .header("host", "evil.example.com")
                .header("content-type", "application/json")
                .body(Body::from(initialize_body()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["jsonrpc"], "2.0");
    assert_eq!(body["error"]["code"], -32000);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("Invalid host header"));
}

#[tokio::test]
async fn test_allowlist_extension_admits_configured_host() {
    let mut config = test_config();
    config
        .allowed_hosts
        .push("bookmarks.example.com".to_owned());
    let app = test_router(config);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("host", "bookmarks.example.com:443")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_cors_preflight_exempt_from_host_check() {
    let app = test_router(test_config());

    // Preflight carries the browser's Origin and requested method; the CORS
    // layer answers it before the allowlist middleware runs.
    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/mcp")
                .header("host", "evil.example.com")
                .header("origin", "https://app.example.com")
                .header("access-control-request-method", "POST")
                .header("access-control-request-headers", "content-type,mcp-session-id")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .contains_key("access-control-allow-methods"));
}
