// ABOUTME: HTTP middleware layers shared across routes
// ABOUTME: Currently CORS only; Host validation is applied in the server assembly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Linkvault

/// CORS layer configuration
pub mod cors;
