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

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::bounded::BoundedDeque;
use crate::payloads::{ActiveAnomaly, AnomalyEntry, OptimizationResponse, PredictionResponse, SystemMetrics};

/// Most recent predictions kept in the store
pub const PREDICTION_CAPACITY: usize = 100;

/// Most recent anomalies kept in the store
pub const ANOMALY_CAPACITY: usize = 100;

/// Most recent optimization results kept in the store
pub const OPTIMIZATION_CAPACITY: usize = 50;

/// Backend used when nothing else is configured
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

/// When each replace-style field was last filled from the backend.
/// `None` means the field was never loaded, as opposed to loaded empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadMarkers {
    pub system_metrics: Option<DateTime<Utc>>,
    pub latest_data: Option<DateTime<Utc>>,
    pub anomalies: Option<DateTime<Utc>>,
}

/// Everything the store knows. Views only ever see clones of this record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreState {
    pub system_metrics: SystemMetrics,
    pub solar_data: Vec<Value>,
    pub environmental_data: Vec<Value>,
    pub predictions: BoundedDeque<PredictionResponse>,
    pub anomalies: BoundedDeque<AnomalyEntry>,
    pub optimizations: BoundedDeque<OptimizationResponse>,
    pub loading: bool,
    pub error: Option<String>,
    pub api_base_url: String,
    /// Requests dispatched and not yet resolved; `loading` mirrors `in_flight > 0`
    pub in_flight: usize,
    pub last_loaded: LoadMarkers,
}

/// The closed set of transitions the store may apply
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    RequestStarted,
    RequestSucceeded,
    RequestFailed(String),
    /// The caller stopped waiting before the response arrived
    RequestAbandoned,
    MetricsLoaded {
        metrics: SystemMetrics,
        at: DateTime<Utc>,
    },
    LatestDataLoaded {
        solar: Vec<Value>,
        environmental: Vec<Value>,
        at: DateTime<Utc>,
    },
    PredictionAdded(PredictionResponse),
    AnomalyAdded(AnomalyEntry),
    AnomaliesReplaced {
        anomalies: Vec<ActiveAnomaly>,
        at: DateTime<Utc>,
    },
    OptimizationAdded(OptimizationResponse),
    AnomalyResolved(i64),
}

impl StoreState {
    /// Fresh state: zeroed metrics, empty lists, nothing in flight
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            system_metrics: SystemMetrics::default(),
            solar_data: Vec::new(),
            environmental_data: Vec::new(),
            predictions: BoundedDeque::new(PREDICTION_CAPACITY),
            anomalies: BoundedDeque::new(ANOMALY_CAPACITY),
            optimizations: BoundedDeque::new(OPTIMIZATION_CAPACITY),
            loading: false,
            error: None,
            api_base_url: api_base_url.into(),
            in_flight: 0,
            last_loaded: LoadMarkers::default(),
        }
    }

    /// Apply one transition and return the resulting state.
    ///
    /// Each event touches only the fields it owns.
    #[must_use]
    pub fn reduce(mut self, event: StoreEvent) -> Self {
        match event {
            StoreEvent::RequestStarted => {
                self.in_flight += 1;
                self.loading = true;
                self.error = None;
            }
            StoreEvent::RequestSucceeded | StoreEvent::RequestAbandoned => {
                self.in_flight = self.in_flight.saturating_sub(1);
                self.loading = self.in_flight > 0;
            }
            StoreEvent::RequestFailed(message) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                self.loading = self.in_flight > 0;
                self.error = Some(message);
            }
            StoreEvent::MetricsLoaded { metrics, at } => {
                self.system_metrics = metrics;
                self.last_loaded.system_metrics = Some(at);
            }
            StoreEvent::LatestDataLoaded {
                solar,
                environmental,
                at,
            } => {
                self.solar_data = solar;
                self.environmental_data = environmental;
                self.last_loaded.latest_data = Some(at);
            }
            StoreEvent::PredictionAdded(prediction) => {
                self.predictions.push_front(prediction);
            }
            StoreEvent::AnomalyAdded(anomaly) => {
                self.anomalies.push_front(anomaly);
            }
            StoreEvent::AnomaliesReplaced { anomalies, at } => {
                self.anomalies
                    .replace(anomalies.into_iter().map(AnomalyEntry::Active));
                self.last_loaded.anomalies = Some(at);
            }
            StoreEvent::OptimizationAdded(optimization) => {
                self.optimizations.push_front(optimization);
            }
            StoreEvent::AnomalyResolved(id) => {
                self.anomalies.retain(|entry| entry.id() != Some(id));
            }
        }
        self
    }
}

impl Default for StoreState {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}
