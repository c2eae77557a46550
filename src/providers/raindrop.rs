// ABOUTME: Thin Raindrop REST API client used by the MCP tool handlers
// ABOUTME: Declarative request/response forwarding with bearer authentication
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Linkvault

//! Raindrop bookmarking API client.
//!
//! Every method maps one-to-one onto a Raindrop REST endpoint and returns the
//! upstream JSON body unchanged. Validation of tool arguments happens in the
//! tool handlers; this client only signs and forwards.

use crate::errors::{AppError, AppResult};
use serde_json::Value;
use tracing::debug;

/// Raindrop REST API client
#[derive(Clone)]
pub struct RaindropClient {
    http: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
}

impl RaindropClient {
    /// Create a client for the given API base URL
    #[must_use]
    pub fn new(base_url: String, access_token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            access_token,
        }
    }

    /// Search bookmarks in a collection (collection 0 means "all")
    ///
    /// # Errors
    /// Returns an error if the token is unconfigured or the upstream call fails
    pub async fn search_bookmarks(
        &self,
        collection_id: i64,
        search: Option<&str>,
        page: Option<u32>,
        per_page: Option<u32>,
    ) -> AppResult<Value> {
        let mut request = self
            .http
            .get(format!("{}/raindrops/{collection_id}", self.base_url));

        if let Some(search) = search {
            request = request.query(&[("search", search)]);
        }
        if let Some(page) = page {
            request = request.query(&[("page", page)]);
        }
        if let Some(per_page) = per_page {
            request = request.query(&[("perpage", per_page)]);
        }

        self.execute(request).await
    }

    /// Create a bookmark
    ///
    /// # Errors
    /// Returns an error if the token is unconfigured or the upstream call fails
    pub async fn create_bookmark(&self, body: &Value) -> AppResult<Value> {
        let request = self
            .http
            .post(format!("{}/raindrop", self.base_url))
            .json(body);
        self.execute(request).await
    }

    /// Update an existing bookmark
    ///
    /// # Errors
    /// Returns an error if the token is unconfigured or the upstream call fails
    pub async fn update_bookmark(&self, id: i64, body: &Value) -> AppResult<Value> {
        let request = self
            .http
            .put(format!("{}/raindrop/{id}", self.base_url))
            .json(body);
        self.execute(request).await
    }

    /// Delete a bookmark
    ///
    /// # Errors
    /// Returns an error if the token is unconfigured or the upstream call fails
    pub async fn delete_bookmark(&self, id: i64) -> AppResult<Value> {
        let request = self.http.delete(format!("{}/raindrop/{id}", self.base_url));
        self.execute(request).await
    }

    /// List all collections
    ///
    /// # Errors
    /// Returns an error if the token is unconfigured or the upstream call fails
    pub async fn list_collections(&self) -> AppResult<Value> {
        let request = self.http.get(format!("{}/collections", self.base_url));
        self.execute(request).await
    }

    /// List all tags
    ///
    /// # Errors
    /// Returns an error if the token is unconfigured or the upstream call fails
    pub async fn list_tags(&self) -> AppResult<Value> {
        let request = self.http.get(format!("{}/tags", self.base_url));
        self.execute(request).await
    }

    async fn execute(&self, request: reqwest::RequestBuilder) -> AppResult<Value> {
        let token = self.access_token.as_deref().ok_or_else(|| {
            AppError::config_missing("RAINDROP_ACCESS_TOKEN is not configured")
        })?;

        let response = request.bearer_auth(token).send().await?;
        let status = response.status();
        let text = response.text().await?;

        debug!("raindrop response status={} bytes={}", status, text.len());

        if !status.is_success() {
            return Err(AppError::external_service(
                "raindrop",
                format!("HTTP {status}: {text}"),
            ));
        }

        serde_json::from_str(&text).map_err(|e| {
            AppError::external_service("raindrop", format!("invalid JSON response: {e}"))
        })
    }
}
