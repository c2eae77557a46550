// ABOUTME: External bookmarking service clients consumed by the tool handlers
// ABOUTME: Thin request/response forwarding; no business logic lives here
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Linkvault

/// Raindrop REST API client
pub mod raindrop;

pub use raindrop::RaindropClient;
