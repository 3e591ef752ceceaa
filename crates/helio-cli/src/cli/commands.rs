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

use anyhow::{Context, Result};
use helio_store::{DataStore, RefreshLoop, RefreshSettings, UploadFile};
use helio_types::{
    EnvironmentalSample, ModuleReading, OptimizationRequest, PerformanceInputs, SolarSample,
};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use super::args::Commands;
use super::output::{SettledSummary, parse_json_arg, print_json};

/// Run one subcommand against the store
pub async fn run(command: Commands, store: Arc<DataStore>, settings: RefreshSettings) -> Result<()> {
    match command {
        Commands::Watch { interval } => {
            let settings = match interval {
                Some(0) => anyhow::bail!("--interval must be greater than zero"),
                Some(secs) => RefreshSettings {
                    interval: Duration::from_secs(secs),
                    ..settings
                },
                None => settings,
            };
            watch(store, settings).await
        }
        Commands::Metrics => print_json(&store.fetch_dashboard_metrics().await?),
        Commands::Latest { limit } => print_json(&store.fetch_latest_data(limit).await?),
        Commands::Range { start, end } => print_json(&store.fetch_data_range(&start, &end).await?),
        Commands::Anomalies => print_json(&store.fetch_active_anomalies().await?),
        Commands::Resolve { id } => print_json(&store.resolve_anomaly(id).await?),
        Commands::Charts { days } => print_json(&store.fetch_performance_charts(days).await?),
        Commands::Predict(args) => {
            let inputs = PerformanceInputs::from(args);
            print_json(&store.predict_performance(&inputs).await?)
        }
        Commands::History { days, limit } => {
            print_json(&store.fetch_prediction_history(days, limit).await?)
        }
        Commands::Detect { reading } => {
            let reading: ModuleReading = parse_json_arg(&reading)?;
            print_json(&store.detect_anomalies(&reading).await?)
        }
        Commands::Optimize { params } => {
            let params: OptimizationRequest = parse_json_arg(&params)?;
            print_json(&store.optimize_system(&params).await?)
        }
        Commands::SubmitSolar { sample } => {
            let sample: SolarSample = parse_json_arg(&sample)?;
            print_json(&store.submit_solar_sample(&sample).await?)
        }
        Commands::SubmitEnvironmental { sample } => {
            let sample: EnvironmentalSample = parse_json_arg(&sample)?;
            print_json(&store.submit_environmental_sample(&sample).await?)
        }
        Commands::Upload { path, data_type } => {
            let file = UploadFile::from_path(&path).await?;
            let receipt = if is_workbook(&path) {
                store.upload_workbook(file, data_type).await?
            } else {
                store.upload_file(file, data_type).await?
            };
            print_json(&receipt)
        }
        Commands::Models => print_json(&store.fetch_models_status().await?),
    }
}

/// Excel files go to the workbook endpoint, everything else is sent as CSV
fn is_workbook(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx") || ext.eq_ignore_ascii_case("xls"))
}

async fn watch(store: Arc<DataStore>, settings: RefreshSettings) -> Result<()> {
    info!("👀 Watching {} (Ctrl+C to stop)", store.api_base_url());
    let mut stdout = std::io::stdout();
    watch_until(store, settings, tokio::signal::ctrl_c(), &mut stdout).await
}

/// Run the refresh loop and write a summary line whenever the settled
/// dashboard changes, until `shutdown` resolves.
async fn watch_until<W: Write>(
    store: Arc<DataStore>,
    settings: RefreshSettings,
    shutdown: impl Future<Output = std::io::Result<()>>,
    out: &mut W,
) -> Result<()> {
    let mut changes = store.subscribe();
    let handle = RefreshLoop::start(store.clone(), settings);
    let mut summary = SettledSummary::default();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;

            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                if let Some(line) = summary.observe(&store.snapshot()) {
                    writeln!(out, "{line}")?;
                    out.flush()?;
                }
            }
            signal = &mut shutdown => {
                signal.context("Failed to listen for Ctrl+C")?;
                break;
            }
        }
    }

    handle.stop().await;
    Ok(())
}
