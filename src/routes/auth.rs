// ABOUTME: OAuth redirect and callback routes for the Raindrop authorization-code flow
// ABOUTME: Stateless two-leg exchange; no session or registry interaction occurs here
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Linkvault

//! OAuth routes.
//!
//! Two independent, stateless operations: building the authorization redirect
//! and exchanging a callback `code` for an access token. The exchange state
//! is request-scoped only; nothing persists beyond the HTTP round trip.

use crate::errors::{AppError, AppResult};
use crate::server::ServerResources;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Scope requested during authorization
const OAUTH_SCOPE: &str = "all";

/// Token endpoint response
#[derive(Debug, Deserialize, serde::Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

/// OAuth routes implementation
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create OAuth redirect and callback routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/auth/:provider", get(Self::handle_authorize))
            .route("/auth/:provider/callback", get(Self::handle_callback))
            .with_state(resources)
    }

    fn check_provider(provider: &str) -> AppResult<()> {
        if provider == "raindrop" {
            Ok(())
        } else {
            Err(AppError::not_found(format!("Provider {provider}")))
        }
    }

    /// Handle GET /auth/{provider} - redirect to the authorization endpoint
    async fn handle_authorize(
        State(resources): State<Arc<ServerResources>>,
        Path(provider): Path<String>,
    ) -> Result<Response, AppError> {
        Self::check_provider(&provider)?;

        let oauth = &resources.config.oauth;
        // Absent client id is a deployment problem, not a caller mistake.
        let client_id = oauth
            .client_id
            .as_deref()
            .ok_or_else(|| AppError::config_missing("RAINDROP_CLIENT_ID is not configured"))?;
        let redirect_uri = oauth
            .redirect_uri
            .as_deref()
            .ok_or_else(|| AppError::config_missing("RAINDROP_REDIRECT_URI is not configured"))?;

        let auth_url = format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}",
            resources.config.raindrop_api.auth_url,
            urlencoding::encode(client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(OAUTH_SCOPE)
        );

        info!("redirecting to {} authorization endpoint", provider);
        Ok(Redirect::temporary(&auth_url).into_response())
    }

    /// Handle GET /auth/{provider}/callback - exchange the code for a token
    async fn handle_callback(
        State(resources): State<Arc<ServerResources>>,
        Path(provider): Path<String>,
        Query(params): Query<HashMap<String, String>>,
    ) -> Result<Response, AppError> {
        Self::check_provider(&provider)?;

        let code = params
            .get("code")
            .filter(|c| !c.is_empty())
            .ok_or_else(|| AppError::invalid_input("Missing 'code' query parameter"))?;

        let token = Self::exchange_code(&resources, code).await?;
        Ok(Json(token).into_response())
    }

    /// Exchange an authorization code with the external token endpoint
    async fn exchange_code(
        resources: &Arc<ServerResources>,
        code: &str,
    ) -> AppResult<TokenResponse> {
        let oauth = &resources.config.oauth;
        let client_id = oauth
            .client_id
            .as_deref()
            .ok_or_else(|| AppError::config_missing("RAINDROP_CLIENT_ID is not configured"))?;
        let client_secret = oauth
            .client_secret
            .as_deref()
            .ok_or_else(|| AppError::config_missing("RAINDROP_CLIENT_SECRET is not configured"))?;
        let redirect_uri = oauth
            .redirect_uri
            .as_deref()
            .ok_or_else(|| AppError::config_missing("RAINDROP_REDIRECT_URI is not configured"))?;

        let params = [
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
        ];

        let response = resources
            .http_client
            .post(&resources.config.raindrop_api.token_url)
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!("token exchange rejected: HTTP {} {}", status, text);
            return Err(AppError::external_service(
                "raindrop",
                format!("token exchange failed (HTTP {status}): {text}"),
            ));
        }

        let token: TokenResponse = serde_json::from_str(&text).map_err(|e| {
            AppError::external_service("raindrop", format!("invalid token response: {e}"))
        })?;

        info!("token exchange successful");
        Ok(token)
    }
}
