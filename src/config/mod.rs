// ABOUTME: Configuration module organization for environment-sourced server settings
// ABOUTME: All configuration is read once at startup; there is no hot reload
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Linkvault

/// Environment variable based configuration
pub mod environment;
