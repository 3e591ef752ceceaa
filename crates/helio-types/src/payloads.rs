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

//! Request and response bodies exchanged with the solar analytics backend.
//!
//! Field names match the backend JSON exactly. Response fields default when
//! missing so that partial payloads still decode.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ============= Dashboard metrics =============

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemMetrics {
    pub modules: ModuleCounts,
    pub power: PowerMetrics,
    pub anomalies: AnomalyCounts,
    pub environment: EnvironmentMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleCounts {
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerMetrics {
    pub total_generated_24h: f64,
    /// Percent, already scaled by the backend
    pub average_efficiency: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyCounts {
    pub total_active: u64,
    pub critical: u64,
    pub medium_high: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentMetrics {
    pub average_temperature: f64,
    pub average_irradiance: f64,
    pub average_humidity: f64,
}

// ============= Raw samples =============

/// Latest solar and environmental samples. The records themselves are opaque.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatestData {
    pub solar_data: Vec<Value>,
    pub environmental_data: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<RecordCounts>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordCounts {
    pub solar: u64,
    pub environmental: u64,
}

/// Samples recorded between two timestamps
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataRange {
    pub solar_data: Vec<Value>,
    pub environmental_data: Vec<Value>,
    pub period: Option<Period>,
    pub count: Option<RecordCounts>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Period {
    pub start: String,
    pub end: String,
}

/// One reading of a PV module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarSample {
    pub module_id: String,
    pub open_circuit_voltage: f64,
    pub max_power_voltage: f64,
    pub max_power_current: f64,
    pub short_circuit_current: f64,
    pub max_power: f64,
    pub efficiency: f64,
    pub cell_temperature: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// One weather station reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalSample {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    pub ambient_temperature: f64,
    pub irradiance: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precipitation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloudiness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Backend acknowledgement of a single stored sample
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmitReceipt {
    pub message: String,
    pub id: Option<i64>,
    pub timestamp: Option<String>,
}

// ============= File upload =============

/// Which table an uploaded file feeds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    #[default]
    Solar,
    Environmental,
}

impl DataType {
    pub fn as_str(self) -> &'static str {
        match self {
            DataType::Solar => "solar",
            DataType::Environmental => "environmental",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "solar" => Ok(DataType::Solar),
            "environmental" => Ok(DataType::Environmental),
            other => Err(format!(
                "unknown data type '{other}', expected 'solar' or 'environmental'"
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadReceipt {
    pub message: String,
    pub records_created: u64,
    /// First few row errors reported by the backend
    pub errors: Vec<String>,
    pub total_errors: u64,
}

// ============= Performance prediction =============

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceInputs {
    pub irradiance: f64,
    pub ambient_temp: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell_temp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloudiness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precipitation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionResponse {
    pub prediction: PredictedPerformance,
    pub input_conditions: BTreeMap<String, f64>,
    pub prediction_id: Option<i64>,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictedPerformance {
    pub predicted_power: f64,
    pub confidence: f64,
    pub unit: String,
}

/// Stored predictions from `/predictions/history`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionHistory {
    pub predictions: Vec<Value>,
    pub count: u64,
    pub period: Option<Period>,
}

// ============= Anomaly detection =============

/// Electrical readings of one module submitted for anomaly detection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleReading {
    pub module_id: String,
    pub voltage_oc: f64,
    pub voltage_mp: f64,
    pub current_mp: f64,
    pub current_sc: f64,
    pub power_max: f64,
    pub efficiency: f64,
    pub cell_temp: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ambient_temp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub irradiance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_days: Option<f64>,
}

/// Result of `/predict/anomalies`. Only `anomaly_detected` is always present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnomalyReport {
    pub anomaly_detected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anomaly: Option<AnomalyDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<Recommendation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anomaly_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyDetail {
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: String,
    pub confidence: Confidence,
    pub description: String,
}

/// Detection confidence. The rule-based detector reports a label ("Alta",
/// "Normal"); a model-backed detector may report a score instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Confidence {
    Label(String),
    Score(f64),
}

impl Default for Confidence {
    fn default() -> Self {
        Confidence::Label(String::new())
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::Label(label) => f.write_str(label),
            Confidence::Score(score) => write!(f, "{score}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Recommendation {
    pub action: String,
    pub priority: String,
    pub timeframe: String,
}

/// Anomaly record as listed by `/anomalies/active`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActiveAnomaly {
    pub id: i64,
    pub timestamp: Option<String>,
    pub module_id: String,
    pub anomaly_type: String,
    pub severity_level: String,
    pub confidence: Confidence,
    pub description: String,
    pub recommended_action: Option<String>,
    pub priority: Option<String>,
    pub timeframe: Option<String>,
    pub isolation_score: Option<f64>,
    pub reconstruction_error: Option<f64>,
    pub status: String,
    pub resolved_at: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActiveAnomalies {
    pub anomalies: Vec<ActiveAnomaly>,
    pub count: u64,
    pub filters: BTreeMap<String, Option<String>>,
}

/// One entry of the store's anomaly list: either a fresh detection or a
/// record loaded from the active list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnomalyEntry {
    Detected(AnomalyReport),
    Active(ActiveAnomaly),
}

impl AnomalyEntry {
    /// Backend id of the anomaly, if known
    pub fn id(&self) -> Option<i64> {
        match self {
            AnomalyEntry::Detected(report) => report.anomaly_id,
            AnomalyEntry::Active(record) => Some(record.id),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveReceipt {
    pub message: String,
    pub anomaly_id: i64,
    pub resolved_at: Option<String>,
}

// ============= Multi-objective optimization =============

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizationRequest {
    /// Environmental rows the optimizer averages over
    pub environmental_data: Vec<Value>,
    pub technology: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizationResponse {
    pub optimization_result: OptimizationOutcome,
    pub recommendations: BTreeMap<String, String>,
    pub optimization_id: Option<i64>,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizationOutcome {
    /// tilt_angle, azimuth_angle, tracking_mode, cleaning_frequency, ...
    pub optimal_configuration: BTreeMap<String, f64>,
    pub objectives: Objectives,
    pub technology: String,
    pub location_id: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Objectives {
    pub energy_efficiency: f64,
    pub expected_lifespan: f64,
    pub total_cost: f64,
    pub co2_avoided: f64,
}

// ============= Charts and model status =============

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceCharts {
    pub timestamps: Vec<String>,
    pub power: Vec<f64>,
    pub efficiency: Vec<f64>,
    pub temperature: Vec<f64>,
    pub modules: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsStatus {
    pub models_status: BTreeMap<String, ModelStatus>,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelStatus {
    pub loaded: bool,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
}
