// ABOUTME: Environment-based server configuration loaded once at process startup
// ABOUTME: Covers listen port, Host allowlist, session eviction, CORS, and Raindrop credentials
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Linkvault

//! Server configuration sourced from environment variables.
//!
//! Everything here is read exactly once in [`ServerConfig::from_env`] and is
//! immutable for the lifetime of the process. The Host allowlist in
//! particular is assembled here (static defaults plus `ALLOWED_HOSTS`) and
//! never mutated afterwards, so no synchronization is needed around it.

use crate::constants::{defaults, raindrop};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Host header allowlist (defaults plus `ALLOWED_HOSTS` extension)
    pub allowed_hosts: Vec<String>,
    /// Session lifecycle settings
    pub session: SessionConfig,
    /// CORS settings
    pub cors: CorsConfig,
    /// Raindrop OAuth application credentials
    pub oauth: OAuthProviderConfig,
    /// Raindrop API endpoints and token
    pub raindrop_api: RaindropApiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Seconds of inactivity after which a session is evicted
    pub idle_timeout_secs: u64,
    /// Seconds between idle-session sweeps
    pub sweep_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated allowed origins, or "*" for any
    pub allowed_origins: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthProviderConfig {
    /// OAuth client ID
    pub client_id: Option<String>,
    /// OAuth client secret
    pub client_secret: Option<String>,
    /// OAuth redirect URI
    pub redirect_uri: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaindropApiConfig {
    /// REST API base URL
    pub base_url: String,
    /// Authorization endpoint
    pub auth_url: String,
    /// Token exchange endpoint
    pub token_url: String,
    /// Access token used by the tool handlers
    pub access_token: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a variable is present but unparsable
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        if let Err(e) = dotenvy::dotenv() {
            warn!("No .env file found or failed to load: {}", e);
        }

        let config = Self {
            http_port: env_var_or("HTTP_PORT", &defaults::DEFAULT_HTTP_PORT.to_string())?
                .parse()
                .context("Invalid HTTP_PORT value")?,
            allowed_hosts: build_allowed_hosts(&env::var("ALLOWED_HOSTS").unwrap_or_default()),
            session: SessionConfig {
                idle_timeout_secs: env_var_or(
                    "SESSION_IDLE_TIMEOUT",
                    &defaults::DEFAULT_SESSION_IDLE_TIMEOUT_SECS.to_string(),
                )?
                .parse()
                .context("Invalid SESSION_IDLE_TIMEOUT value")?,
                sweep_interval_secs: defaults::SESSION_SWEEP_INTERVAL_SECS,
            },
            cors: CorsConfig {
                allowed_origins: env_var_or("CORS_ALLOWED_ORIGINS", "*")?,
            },
            oauth: OAuthProviderConfig {
                client_id: env::var("RAINDROP_CLIENT_ID").ok(),
                client_secret: env::var("RAINDROP_CLIENT_SECRET").ok(),
                redirect_uri: env::var("RAINDROP_REDIRECT_URI").ok(),
            },
            raindrop_api: RaindropApiConfig {
                base_url: env_var_or("RAINDROP_API_BASE", raindrop::DEFAULT_API_BASE)?,
                auth_url: env_var_or("RAINDROP_AUTH_URL", raindrop::DEFAULT_AUTH_URL)?,
                token_url: env_var_or("RAINDROP_TOKEN_URL", raindrop::DEFAULT_TOKEN_URL)?,
                access_token: env::var("RAINDROP_ACCESS_TOKEN").ok(),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration consistency
    ///
    /// # Errors
    /// Returns an error if a value is out of range
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.http_port != 0, "HTTP_PORT must be non-zero");
        anyhow::ensure!(
            self.session.idle_timeout_secs > 0,
            "SESSION_IDLE_TIMEOUT must be positive"
        );
        if self.oauth.client_id.is_none() {
            warn!("RAINDROP_CLIENT_ID not set; OAuth authorization flow is disabled");
        }
        if let Some(uri) = &self.oauth.redirect_uri {
            url::Url::parse(uri).context("Invalid RAINDROP_REDIRECT_URI value")?;
        }
        if self.raindrop_api.access_token.is_none() {
            warn!("RAINDROP_ACCESS_TOKEN not set; bookmark tools will fail until configured");
        }
        Ok(())
    }

    /// One-line startup summary without secrets
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "port={} allowed_hosts=[{}] idle_timeout={}s oauth_configured={} api_base={}",
            self.http_port,
            self.allowed_hosts.join(","),
            self.session.idle_timeout_secs,
            self.oauth.client_id.is_some(),
            self.raindrop_api.base_url
        )
    }
}

/// Assemble the Host allowlist: static defaults plus a comma-separated extension
fn build_allowed_hosts(extra: &str) -> Vec<String> {
    let mut hosts: Vec<String> = defaults::DEFAULT_ALLOWED_HOSTS
        .iter()
        .map(|h| (*h).to_owned())
        .collect();

    for host in extra.split(',') {
        let trimmed = host.trim();
        if !trimmed.is_empty() && !hosts.iter().any(|h| h == trimmed) {
            hosts.push(trimmed.to_owned());
        }
    }

    hosts
}

fn env_var_or(key: &str, default: &str) -> Result<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Ok(default.to_owned()),
    }
}
