// ABOUTME: Main library entry point for the Linkvault MCP server
// ABOUTME: Exposes bookmarking tools to MCP clients over Streamable HTTP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Linkvault

#![deny(unsafe_code)]

//! # Linkvault MCP Server
//!
//! A Model Context Protocol (MCP) server exposing Raindrop.io bookmark
//! management as MCP tools over the Streamable HTTP transport.
//!
//! ## Features
//!
//! - **Streamable HTTP transport**: session-scoped JSON-RPC over a single
//!   POST endpoint with `Mcp-Session-Id` correlation
//! - **DNS-rebinding defense**: exact-match Host allowlist enforced on every
//!   request
//! - **Session lifecycle**: initialize-only creation, channel-driven
//!   teardown, idle eviction
//! - **`OAuth2` authorization**: redirect and code-exchange endpoints for the
//!   Raindrop authorization-code flow
//!
//! ## Quick Start
//!
//! ```no_run
//! use linkvault_mcp_server::config::environment::ServerConfig;
//! use linkvault_mcp_server::server::{self, ServerResources};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     let resources = ServerResources::new(config);
//!     server::run(resources).await
//! }
//! ```

/// Server configuration loaded from environment variables
pub mod config;
/// Protocol, default, and provider constants
pub mod constants;
/// Error types and HTTP error responses
pub mod errors;
/// Structured logging initialization
pub mod logging;
/// Model Context Protocol implementation: dispatch, schema, sessions
pub mod mcp;
/// HTTP middleware (CORS)
pub mod middleware;
/// Raindrop.io REST API client
pub mod providers;
/// HTTP route handlers
pub mod routes;
/// Host-header validation
pub mod security;
/// Resource container, router assembly, and run loop
pub mod server;
