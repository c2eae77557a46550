// ABOUTME: Route module organization for Linkvault MCP server HTTP endpoints
// ABOUTME: Each domain module contains route definitions and thin handlers only
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Linkvault

//! Route modules, organized by domain. Handlers delegate to the session
//! layer, the OAuth exchange, or static payloads; none of them hold state of
//! their own beyond the shared [`crate::server::ServerResources`].

/// OAuth redirect and callback routes
pub mod auth;
/// Health check and capability document routes
pub mod health;
/// Model Context Protocol transport routes
pub mod mcp;

pub use auth::AuthRoutes;
pub use health::HealthRoutes;
pub use mcp::McpRoutes;
