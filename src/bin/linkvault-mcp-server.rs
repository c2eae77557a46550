// ABOUTME: Binary entry point for the Linkvault MCP server
// ABOUTME: Loads configuration, initializes logging, and runs the HTTP server
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Linkvault

use anyhow::Result;
use clap::Parser;
use linkvault_mcp_server::{
    config::environment::ServerConfig,
    logging,
    server::{self, ServerResources},
};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "linkvault-mcp-server",
    about = "MCP server exposing Raindrop.io bookmark tools over Streamable HTTP",
    version
)]
struct Args {
    /// HTTP listen port (overrides HTTP_PORT)
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(port) = args.http_port {
        config.http_port = port;
    }

    info!("Starting Linkvault MCP server: {}", config.summary());

    let resources = ServerResources::new(config);
    server::run(resources).await
}
