// ABOUTME: MCP protocol implementation: JSON-RPC types, dispatch, sessions, and tool surface
// ABOUTME: The session layer here is the security- and state-sensitive boundary of the service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Linkvault

/// Protocol method dispatch behind a narrow trait seam
pub mod dispatcher;
/// JSON-RPC message types and core protocol handlers
pub mod protocol;
/// Tool catalogue definitions
pub mod schema;
/// Session registry and per-session transports
pub mod session;
/// Tool execution forwarding to the bookmarking API
pub mod tool_handlers;
