// ABOUTME: Server binary: loads configuration, opens the database and serves HTTP
// ABOUTME: Command-line flags override host, port and database URL from the environment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Sgt Chef Server
//!
//! ```bash
//! # Serve with environment configuration
//! cargo run --bin sgt-chef-server
//!
//! # Override the port and database
//! cargo run --bin sgt-chef-server -- --port 9000 --database-url sqlite::memory:
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use sgt_chef::config::ServerConfig;
use sgt_chef::constants::protocol::SERVER_VERSION;
use sgt_chef::constants::service_names::SGT_CHEF_SERVER;
use sgt_chef::database::Database;
use sgt_chef::logging::init_logging;
use sgt_chef::mcp::ServerResources;
use sgt_chef::server;

#[derive(Parser)]
#[command(
    name = "sgt-chef-server",
    about = "Sgt Chef meal-planning and habit-logging server",
    version
)]
struct Args {
    /// Listen port (overrides HTTP_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Listen host (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// sqlx database URL (overrides DATABASE_URL)
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env().context("Failed to load configuration")?;
    if let Some(port) = args.port {
        config.http_port = port;
    }
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }

    init_logging(config.log_format).context("Failed to initialize logging")?;
    info!(
        service = SGT_CHEF_SERVER,
        version = SERVER_VERSION,
        host = %config.host,
        port = config.http_port,
        "Starting server"
    );

    let database = Database::new(&config.database_url)
        .await
        .context("Failed to open database")?;
    let config = Arc::new(config);
    let resources = Arc::new(
        ServerResources::from_config(database, config).context("Failed to build server resources")?,
    );

    server::run(resources).await.context("Server failed")?;
    Ok(())
}
