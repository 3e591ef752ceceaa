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

//! Background loading of dashboard data.
//!
//! The loop performs the initial load once, then refreshes metrics and the
//! latest samples on a fixed period. Every tick dispatches its refresh as its
//! own task, so a slow backend never delays the next tick. Refreshes may
//! overlap; the store's in-flight counter keeps `loading` consistent.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::store::DataStore;

/// Timing and sizing of the background loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSettings {
    pub interval: Duration,
    pub initial_latest_limit: u32,
    pub refresh_latest_limit: u32,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            initial_latest_limit: 20,
            refresh_latest_limit: 5,
        }
    }
}

/// Spawns the background loop for a store
#[derive(Debug)]
pub struct RefreshLoop;

impl RefreshLoop {
    /// Start the loop on the current tokio runtime.
    ///
    /// The initial load begins immediately; the first periodic refresh fires
    /// one full interval later.
    pub fn start(store: Arc<DataStore>, settings: RefreshSettings) -> RefreshHandle {
        let (shutdown, shutdown_rx) = watch::channel(false);
        info!(
            "⏱️ Starting dashboard refresh every {}s",
            settings.interval.as_secs_f64()
        );
        let task = tokio::spawn(run(store, settings, shutdown_rx));
        RefreshHandle {
            shutdown,
            task: Some(task),
        }
    }
}

/// Owner of a running loop. Dropping it aborts the loop without waiting.
#[derive(Debug)]
pub struct RefreshHandle {
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl RefreshHandle {
    /// Stop scheduling refreshes and wait for those already dispatched
    pub async fn stop(mut self) {
        self.shutdown.send_replace(true);
        if let Some(task) = self.task.take()
            && let Err(e) = task.await
        {
            debug!("Refresh loop ended abnormally: {}", e);
        }
        info!("⏹️ Dashboard refresh stopped");
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run(store: Arc<DataStore>, settings: RefreshSettings, mut shutdown: watch::Receiver<bool>) {
    tokio::select! {
        _ = shutdown.wait_for(|stop| *stop) => return,
        () = store.load_initial(settings.initial_latest_limit) => {}
    }

    let period = settings.interval;
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut refreshes = JoinSet::new();

    loop {
        tokio::select! {
            _ = shutdown.wait_for(|stop| *stop) => break,
            _ = ticker.tick() => {
                let store = store.clone();
                let limit = settings.refresh_latest_limit;
                refreshes.spawn(async move { store.refresh(limit).await });
            }
            Some(_) = refreshes.join_next(), if !refreshes.is_empty() => {}
        }
    }

    if !refreshes.is_empty() {
        debug!("Waiting for {} refreshes in flight", refreshes.len());
    }
    while refreshes.join_next().await.is_some() {}
}
