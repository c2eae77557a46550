// ABOUTME: Host header validation guarding the server against DNS rebinding attacks
// ABOUTME: Exact-match allowlisting of the extracted hostname; no fuzzy or substring matching
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Linkvault

//! # Host Header Validation
//!
//! Every inbound request passes through [`validate_host`] before any other
//! processing. DNS rebinding lets an attacker-controlled hostname resolve to
//! the loopback address, so browser-originated requests reach this server
//! while carrying an attacker-chosen Host header. Exact-match allowlisting of
//! the extracted hostname closes the attack: `localhost:3002` passes,
//! `localhost@evil.com` does not, because the extracted value is compared as
//! a whole against allowlist members.

use std::fmt;

/// Why a Host header was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostRejection {
    /// No Host header was sent
    Missing,
    /// The extracted hostname is not an allowlist member
    NotAllowed(String),
}

impl fmt::Display for HostRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "Missing Host header"),
            Self::NotAllowed(host) => write!(f, "Host not allowed: {host}"),
        }
    }
}

/// Validate a raw Host header value against the allowlist.
///
/// The hostname is extracted first: an IPv6 literal (`[::1]:3002`) yields the
/// text between the brackets, anything else is split on the first `:` and the
/// left segment kept. The extracted hostname must be an exact member of the
/// allowlist.
///
/// # Errors
/// Returns a [`HostRejection`] naming the reason; the caller short-circuits
/// with a 403-equivalent response. No side effects.
pub fn validate_host(
    host_header: Option<&str>,
    allowlist: &[String],
) -> Result<(), HostRejection> {
    let Some(raw) = host_header else {
        return Err(HostRejection::Missing);
    };

    let hostname = extract_hostname(raw);

    if allowlist.iter().any(|allowed| allowed == hostname) {
        Ok(())
    } else {
        Err(HostRejection::NotAllowed(hostname.to_owned()))
    }
}

/// Extract the bare hostname from a Host header value
fn extract_hostname(raw: &str) -> &str {
    if let Some(rest) = raw.strip_prefix('[') {
        // IPv6 literal: take the text between the brackets
        rest.split(']').next().unwrap_or(rest)
    } else {
        // Discard a port suffix if present
        raw.split(':').next().unwrap_or(raw)
    }
}
