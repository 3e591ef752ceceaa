// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use helio_store::{DataStore, StoreConfig};
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::FmtSubscriber;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with env filter support
    // Respects RUST_LOG environment variable
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Setting default subscriber failed")?;

    let cli = Cli::parse();

    let mut config =
        StoreConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(url) = cli.api_url {
        config.api_base_url = url;
        config.validate().context("Invalid --api-url")?;
    }
    debug!("Configuration: {:?}", config);

    let store = Arc::new(DataStore::new(&config).context("Failed to create data store")?);
    cli::commands::run(cli.command, store, config.refresh_settings()).await
}
