// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Birder
//!
//! Resolves X post links and profile commands read from stdin.

use anyhow::Result;
use birder::{BirderConfig, Dispatcher, run};
use tokio::io::{BufReader, stdin, stdout};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use x_api::XClient;

#[tokio::main]
async fn main() -> Result<()> {
    let config = BirderConfig::load()?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.environment.default_log_filter()));

    // stdout carries replies
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!(environment = %config.environment, base_url = %config.base_url, "Starting birder");

    let client = XClient::new(config.to_x_api_config()?)?;
    let dispatcher = Dispatcher::from_config(client, &config);

    let handled = run(&dispatcher, BufReader::new(stdin()), stdout()).await?;

    info!(handled, "Input closed, shutting down");

    Ok(())
}
