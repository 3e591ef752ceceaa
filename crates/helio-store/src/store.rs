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

use chrono::Utc;
use helio_types::{
    ActiveAnomalies, AnomalyEntry, AnomalyReport, DataRange, DataType, EnvironmentalSample,
    LatestData, ModelsStatus, ModuleReading, OptimizationRequest, OptimizationResponse,
    PerformanceCharts, PerformanceInputs, PredictionHistory, PredictionResponse, ResolveReceipt,
    SolarSample, StoreEvent, StoreState, SubmitReceipt, SystemMetrics, UploadReceipt,
};
use parking_lot::RwLock;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::config::StoreConfig;
use crate::errors::{StoreError, StoreResult};
use crate::transport::{ApiRequest, ReqwestTransport, Transport, UploadFile};

/// Application data store.
///
/// Holds everything fetched from the backend and exposes one async action per
/// endpoint. State only changes through [`StoreEvent`] transitions applied by
/// the actions; callers read it through [`DataStore::snapshot`].
pub struct DataStore {
    api_base_url: String,
    transport: Arc<dyn Transport>,
    state: RwLock<StoreState>,
    revision: watch::Sender<u64>,
}

impl fmt::Debug for DataStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataStore")
            .field("api_base_url", &self.api_base_url)
            .field("transport", &self.transport.name())
            .field("revision", &*self.revision.borrow())
            .finish_non_exhaustive()
    }
}

impl DataStore {
    /// Create a store talking to the configured backend over HTTP
    pub fn new(config: &StoreConfig) -> StoreResult<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(config.request_timeout())?;
        info!("🗄️ Data store using backend {}", config.api_base_url);
        Ok(Self::with_transport(&config.api_base_url, Arc::new(transport)))
    }

    /// Create a store on top of any transport
    pub fn with_transport(api_base_url: &str, transport: Arc<dyn Transport>) -> Self {
        let api_base_url = api_base_url.trim().trim_end_matches('/').to_owned();
        let (revision, _) = watch::channel(0);
        Self {
            state: RwLock::new(StoreState::new(api_base_url.clone())),
            api_base_url,
            transport,
            revision,
        }
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// Owned copy of the current state
    pub fn snapshot(&self) -> StoreState {
        self.state.read().clone()
    }

    /// Receiver whose value is bumped after every applied transition
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn apply(&self, event: StoreEvent) {
        {
            let mut state = self.state.write();
            let current = std::mem::take(&mut *state);
            *state = current.reduce(event);
        }
        self.revision.send_modify(|revision| *revision += 1);
    }

    /// Generic request pipeline.
    ///
    /// Marks the request in flight and clears the last error, performs the
    /// call, then either records the failure message or decodes the JSON body.
    /// The in-flight mark is released on every exit path, including when the
    /// returned future is dropped early.
    pub async fn request<T: DeserializeOwned>(&self, request: ApiRequest) -> StoreResult<T> {
        self.dispatch(|| Ok(request)).await
    }

    /// POST a JSON body. Serializing the body is part of the request, so a
    /// failure there is recorded in `error` like any other.
    async fn post_json<B, T>(&self, endpoint: &str, body: &B) -> StoreResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.dispatch(|| ApiRequest::post_json(endpoint, body)).await
    }

    async fn dispatch<T: DeserializeOwned>(
        &self,
        build: impl FnOnce() -> StoreResult<ApiRequest>,
    ) -> StoreResult<T> {
        let in_flight = InFlight::begin(self);

        let outcome = match build() {
            Ok(request) => {
                let url = format!("{}{}", self.api_base_url, request.endpoint);
                let method = request.method.clone();
                debug!("📡 [API] {} {}", method, url);
                self.exchange(url.clone(), request).await.inspect_err(|e| {
                    error!("❌ [API] {} {} failed: {}", method, url, e);
                })
            }
            Err(e) => {
                error!("❌ [API] Failed to build request: {}", e);
                Err(e)
            }
        };

        match outcome {
            Ok(payload) => {
                in_flight.settle(StoreEvent::RequestSucceeded);
                Ok(payload)
            }
            Err(e) => {
                in_flight.settle(StoreEvent::RequestFailed(e.to_string()));
                Err(e)
            }
        }
    }

    async fn exchange<T: DeserializeOwned>(&self, url: String, request: ApiRequest) -> StoreResult<T> {
        let response = self.transport.send(url, request).await?;
        if !response.is_success() {
            return Err(StoreError::from_status(response.status));
        }
        Ok(serde_json::from_slice(&response.body)?)
    }

    // ============= Dashboard and samples =============

    /// GET `/dashboard/metrics`, replaces `system_metrics`
    pub async fn fetch_dashboard_metrics(&self) -> StoreResult<SystemMetrics> {
        let metrics: SystemMetrics = self.request(ApiRequest::get("/dashboard/metrics")).await?;
        self.apply(StoreEvent::MetricsLoaded {
            metrics: metrics.clone(),
            at: Utc::now(),
        });
        Ok(metrics)
    }

    /// GET `/data/latest?limit=N`, replaces both sample lists
    pub async fn fetch_latest_data(&self, limit: u32) -> StoreResult<LatestData> {
        let data: LatestData = self
            .request(ApiRequest::get(format!("/data/latest?limit={limit}")))
            .await?;
        self.apply(StoreEvent::LatestDataLoaded {
            solar: data.solar_data.clone(),
            environmental: data.environmental_data.clone(),
            at: Utc::now(),
        });
        Ok(data)
    }

    pub async fn submit_solar_sample(&self, sample: &SolarSample) -> StoreResult<SubmitReceipt> {
        self.post_json("/data/solar", sample).await
    }

    pub async fn submit_environmental_sample(
        &self,
        sample: &EnvironmentalSample,
    ) -> StoreResult<SubmitReceipt> {
        self.post_json("/data/environmental", sample).await
    }

    /// GET `/data/range` between two ISO 8601 timestamps
    pub async fn fetch_data_range(&self, start_date: &str, end_date: &str) -> StoreResult<DataRange> {
        let endpoint = format!(
            "/data/range?start_date={}&end_date={}",
            urlencoding::encode(start_date),
            urlencoding::encode(end_date)
        );
        self.request(ApiRequest::get(endpoint)).await
    }

    // ============= File upload =============

    /// Multipart POST of a CSV file to `/upload/csv`
    pub async fn upload_file(&self, file: UploadFile, data_type: DataType) -> StoreResult<UploadReceipt> {
        info!("📤 Uploading {} as {} data", file.file_name, data_type);
        self.request(ApiRequest::upload("/upload/csv", file, data_type))
            .await
    }

    /// Multipart POST of an Excel workbook to `/upload/xlsx`
    pub async fn upload_workbook(
        &self,
        file: UploadFile,
        data_type: DataType,
    ) -> StoreResult<UploadReceipt> {
        info!("📤 Uploading workbook {} as {} data", file.file_name, data_type);
        self.request(ApiRequest::upload("/upload/xlsx", file, data_type))
            .await
    }

    // ============= AI endpoints =============

    /// POST `/predict/performance`, prepends the result to `predictions`
    pub async fn predict_performance(
        &self,
        inputs: &PerformanceInputs,
    ) -> StoreResult<PredictionResponse> {
        let prediction: PredictionResponse = self
            .post_json("/predict/performance", inputs)
            .await?;
        self.apply(StoreEvent::PredictionAdded(prediction.clone()));
        Ok(prediction)
    }

    /// POST `/predict/anomalies`. Only a positive detection lands in `anomalies`.
    pub async fn detect_anomalies(&self, reading: &ModuleReading) -> StoreResult<AnomalyReport> {
        let report: AnomalyReport = self
            .post_json("/predict/anomalies", reading)
            .await?;
        if report.anomaly_detected {
            self.apply(StoreEvent::AnomalyAdded(AnomalyEntry::Detected(report.clone())));
        } else {
            debug!("Module {} reported normal", reading.module_id);
        }
        Ok(report)
    }

    /// POST `/optimize/multiobj`, prepends the result to `optimizations`
    pub async fn optimize_system(
        &self,
        params: &OptimizationRequest,
    ) -> StoreResult<OptimizationResponse> {
        let result: OptimizationResponse = self
            .post_json("/optimize/multiobj", params)
            .await?;
        self.apply(StoreEvent::OptimizationAdded(result.clone()));
        Ok(result)
    }

    /// GET `/anomalies/active`, replaces `anomalies`
    pub async fn fetch_active_anomalies(&self) -> StoreResult<ActiveAnomalies> {
        let active: ActiveAnomalies = self.request(ApiRequest::get("/anomalies/active")).await?;
        self.apply(StoreEvent::AnomaliesReplaced {
            anomalies: active.anomalies.clone(),
            at: Utc::now(),
        });
        Ok(active)
    }

    /// PUT `/anomalies/<id>/resolve`, drops that anomaly from `anomalies`
    pub async fn resolve_anomaly(&self, anomaly_id: i64) -> StoreResult<ResolveReceipt> {
        let receipt: ResolveReceipt = self
            .request(ApiRequest::put(format!("/anomalies/{anomaly_id}/resolve")))
            .await?;
        self.apply(StoreEvent::AnomalyResolved(anomaly_id));
        Ok(receipt)
    }

    pub async fn fetch_performance_charts(&self, days: u32) -> StoreResult<PerformanceCharts> {
        self.request(ApiRequest::get(format!("/charts/performance?days={days}")))
            .await
    }

    pub async fn fetch_prediction_history(&self, days: u32, limit: u32) -> StoreResult<PredictionHistory> {
        self.request(ApiRequest::get(format!(
            "/predictions/history?days={days}&limit={limit}"
        )))
        .await
    }

    pub async fn fetch_models_status(&self) -> StoreResult<ModelsStatus> {
        self.request(ApiRequest::get("/models/status")).await
    }

    // ============= Background loading =============

    /// Initial load: metrics, latest samples and active anomalies, concurrently.
    /// Each failure is logged and swallowed so it cannot block the others.
    pub async fn load_initial(&self, latest_limit: u32) {
        info!("🚀 Loading initial dashboard data");
        let (metrics, latest, anomalies) = tokio::join!(
            self.fetch_dashboard_metrics(),
            self.fetch_latest_data(latest_limit),
            self.fetch_active_anomalies()
        );
        log_swallowed("dashboard metrics", metrics);
        log_swallowed("latest data", latest);
        log_swallowed("active anomalies", anomalies);
    }

    /// Periodic refresh of metrics and latest samples, failures logged only
    pub async fn refresh(&self, latest_limit: u32) {
        debug!("🔄 Refreshing dashboard data");
        let (metrics, latest) = tokio::join!(
            self.fetch_dashboard_metrics(),
            self.fetch_latest_data(latest_limit)
        );
        log_swallowed("dashboard metrics", metrics);
        log_swallowed("latest data", latest);
    }
}

fn log_swallowed<T>(what: &str, result: StoreResult<T>) {
    if let Err(e) = result {
        warn!("⚠️ Failed to load {}: {}", what, e);
    }
}

/// In-flight mark of one request. Dropping it unsettled releases the mark
/// without touching `error`.
struct InFlight<'a> {
    store: &'a DataStore,
    settled: bool,
}

impl<'a> InFlight<'a> {
    fn begin(store: &'a DataStore) -> Self {
        store.apply(StoreEvent::RequestStarted);
        Self {
            store,
            settled: false,
        }
    }

    fn settle(mut self, event: StoreEvent) {
        self.settled = true;
        self.store.apply(event);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.store.apply(StoreEvent::RequestAbandoned);
        }
    }
}
