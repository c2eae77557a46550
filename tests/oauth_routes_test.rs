// ABOUTME: Integration tests for the OAuth redirect and callback routes
// ABOUTME: Token exchange is tested against a local stand-in for the Raindrop endpoint
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Linkvault

mod common;

use axum::body::Body;
use axum::routing::post;
use axum::{Form, Json, Router};
use common::{body_json, test_config, test_router};
use http::{Request, StatusCode};
use linkvault_mcp_server::config::environment::ServerConfig;
use std::collections::HashMap;
use std::future::IntoFuture;
use tower::ServiceExt;

fn configured(config: &mut ServerConfig) {
    config.oauth.client_id = Some("test-client-id".into());
    config.oauth.client_secret = Some("test-client-secret".into());
    config.oauth.redirect_uri = Some("http://localhost:3002/auth/raindrop/callback".into());
}

/// Stand-in token endpoint: accepts code "good-code", rejects everything else
async fn spawn_token_endpoint() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind token endpoint");
    let addr = listener.local_addr().expect("local addr");

    let app = Router::new().route(
        "/oauth/access_token",
        post(|Form(params): Form<HashMap<String, String>>| async move {
            if params.get("grant_type").map(String::as_str) != Some("authorization_code") {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({ "error": "unsupported_grant_type" })),
                );
            }
            if params.get("code").map(String::as_str) == Some("good-code") {
                (
                    StatusCode::OK,
                    Json(serde_json::json!({
                        "access_token": "test-access-token",
                        "refresh_token": "test-refresh-token",
                        "expires_in": 1_209_600,
                        "token_type": "Bearer"
                    })),
                )
            } else {
                (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({ "error": "bad_authorization_code" })),
                )
            }
        }),
    );

    tokio::spawn(axum::serve(listener, app).into_future());
    format!("http://{addr}/oauth/access_token")
}

#[tokio::test]
async fn test_unknown_provider_rejected() {
    let app = test_router(test_config());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/pinboard")
                .header("host", "localhost")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "RESOURCE_NOT_FOUND");
}

#[tokio::test]
async fn test_authorize_without_client_id_is_config_error() {
    let app = test_router(test_config());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/raindrop")
                .header("host", "localhost")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "CONFIG_MISSING");
}

#[tokio::test]
async fn test_authorize_redirects_to_provider() {
    let mut config = test_config();
    configured(&mut config);
    let app = test_router(config);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/raindrop")
                .header("host", "localhost")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    let location = response
        .headers()
        .get("location")
        .expect("redirect location")
        .to_str()
        .unwrap();
    assert!(location.starts_with("https://raindrop.io/oauth/authorize?"));
    assert!(location.contains("client_id=test-client-id"));
    assert!(location.contains("response_type=code"));
    assert!(location.contains(
        "redirect_uri=http%3A%2F%2Flocalhost%3A3002%2Fauth%2Fraindrop%2Fcallback"
    ));
}

#[tokio::test]
async fn test_callback_without_code_rejected() {
    let mut config = test_config();
    configured(&mut config);
    let app = test_router(config);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/raindrop/callback")
                .header("host", "localhost")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_callback_exchanges_code_for_token() {
    let mut config = test_config();
    configured(&mut config);
    config.raindrop_api.token_url = spawn_token_endpoint().await;
    let app = test_router(config);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/raindrop/callback?code=good-code")
                .header("host", "localhost")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["access_token"], "test-access-token");
    assert_eq!(body["token_type"], "Bearer");
}

#[tokio::test]
async fn test_callback_surfaces_upstream_rejection() {
    let mut config = test_config();
    configured(&mut config);
    config.raindrop_api.token_url = spawn_token_endpoint().await;
    let app = test_router(config);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/raindrop/callback?code=stale-code")
                .header("host", "localhost")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "EXTERNAL_SERVICE_ERROR");
}
