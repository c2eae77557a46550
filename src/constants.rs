// ABOUTME: Protocol constants, JSON-RPC error codes, and configuration defaults
// ABOUTME: Single source of truth for values shared between transport, routes, and tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Linkvault

//! Shared constants for the Linkvault MCP server

/// MCP protocol constants
pub mod protocol {
    /// MCP protocol version implemented by this server
    pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

    /// Server name advertised during initialization
    pub const SERVER_NAME: &str = "linkvault-mcp-server";

    /// Server version from Cargo.toml
    pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

    /// Header carrying the session identifier on the protocol path
    pub const SESSION_ID_HEADER: &str = "mcp-session-id";
}

/// JSON-RPC error codes used on the protocol path
pub mod errors {
    /// Host header absent or not on the allowlist (DNS rebinding defense)
    pub const ERROR_INVALID_HOST: i32 = -32000;

    /// Session id missing/unknown, or a non-initialize request without one
    pub const ERROR_INVALID_SESSION: i32 = -32001;

    /// Standard JSON-RPC: request body was not parseable JSON
    pub const ERROR_PARSE: i32 = -32700;

    /// Standard JSON-RPC: request was structurally invalid
    pub const ERROR_INVALID_REQUEST: i32 = -32600;

    /// Standard JSON-RPC: method not recognized
    pub const ERROR_METHOD_NOT_FOUND: i32 = -32601;

    /// Standard JSON-RPC: invalid method parameters
    pub const ERROR_INVALID_PARAMS: i32 = -32602;

    /// Standard JSON-RPC: internal server failure
    pub const ERROR_INTERNAL: i32 = -32603;
}

/// Configuration defaults
pub mod defaults {
    /// Default HTTP listen port
    pub const DEFAULT_HTTP_PORT: u16 = 3002;

    /// Hostnames always accepted by the Host validator
    pub const DEFAULT_ALLOWED_HOSTS: [&str; 3] = ["localhost", "127.0.0.1", "::1"];

    /// Idle session eviction window in seconds
    pub const DEFAULT_SESSION_IDLE_TIMEOUT_SECS: u64 = 1800;

    /// Interval between idle-session sweeps in seconds
    pub const SESSION_SWEEP_INTERVAL_SECS: u64 = 60;

    /// Maximum accepted request body on the protocol path, in bytes
    pub const MAX_BODY_BYTES: usize = 1024 * 1024;
}

/// Raindrop API endpoints (overridable via environment for testing)
pub mod raindrop {
    /// Authorization endpoint
    pub const DEFAULT_AUTH_URL: &str = "https://raindrop.io/oauth/authorize";

    /// Token exchange endpoint
    pub const DEFAULT_TOKEN_URL: &str = "https://raindrop.io/oauth/access_token";

    /// REST API base URL
    pub const DEFAULT_API_BASE: &str = "https://api.raindrop.io/rest/v1";
}
