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

pub mod bounded;
pub mod payloads;
pub mod state;

// Re-export common types for convenience
pub use bounded::BoundedDeque;
pub use payloads::{
    ActiveAnomalies, ActiveAnomaly, AnomalyEntry, AnomalyReport, Confidence, DataRange, DataType,
    EnvironmentalSample, LatestData, ModelsStatus, ModuleReading, OptimizationRequest,
    OptimizationResponse, PerformanceCharts, PerformanceInputs, PredictionHistory,
    PredictionResponse, ResolveReceipt, SolarSample, SubmitReceipt, SystemMetrics, UploadReceipt,
};
pub use state::{
    ANOMALY_CAPACITY, DEFAULT_API_BASE_URL, LoadMarkers, OPTIMIZATION_CAPACITY,
    PREDICTION_CAPACITY, StoreEvent, StoreState,
};
