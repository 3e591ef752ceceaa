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

//! In-memory backend for store and refresh loop tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Method;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::errors::{StoreError, StoreResult};
use crate::transport::{ApiRequest, RawResponse, Transport};

pub(crate) enum Reply {
    Json(u16, Value),
    Raw(u16, &'static str),
    Timeout,
}

type Responder = Box<dyn Fn(&ApiRequest, usize) -> Reply + Send + Sync>;

/// A request as the backend saw it
#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
    pub url: String,
    pub request: ApiRequest,
}

/// Routes are keyed by method and path without the query string.
/// Unknown routes answer 404.
#[derive(Default)]
pub(crate) struct FakeBackend {
    routes: Mutex<HashMap<(Method, String), (Responder, usize)>>,
    calls: Mutex<Vec<RecordedCall>>,
    gate: Mutex<Option<Arc<Semaphore>>>,
}

impl FakeBackend {
    /// Backend answering the three initial-load endpoints with small payloads
    pub fn healthy() -> Self {
        let backend = Self::default();
        backend.respond(Method::GET, "/dashboard/metrics", 200, metrics_body());
        backend.respond(Method::GET, "/data/latest", 200, latest_body());
        backend.respond(
            Method::GET,
            "/anomalies/active",
            200,
            json!({
                "anomalies": [{
                    "id": 1,
                    "timestamp": "2025-10-02T09:00:00",
                    "module_id": "M-01",
                    "anomaly_type": "Falla de Celda",
                    "severity_level": "Alta",
                    "confidence": "Alta",
                    "description": "Anomalía detectada en módulo M-01: Falla de Celda",
                    "recommended_action": "Inspección visual y reemplazo de módulo",
                    "priority": "Alta",
                    "timeframe": "1-2 semanas",
                    "isolation_score": 0,
                    "reconstruction_error": 0,
                    "status": "active",
                    "resolved_at": null,
                    "created_at": "2025-10-02T09:00:00"
                }],
                "count": 1,
                "filters": {"severity": null, "module_id": null}
            }),
        );
        backend
    }

    pub fn respond(&self, method: Method, path: &str, status: u16, body: Value) {
        self.respond_with(method, path, move |_, _| Reply::Json(status, body.clone()));
    }

    /// Register a responder that also sees the call index for its route
    pub fn respond_with(
        &self,
        method: Method,
        path: &str,
        responder: impl Fn(&ApiRequest, usize) -> Reply + Send + Sync + 'static,
    ) {
        self.routes
            .lock()
            .insert((method, path.to_owned()), (Box::new(responder), 0));
    }

    /// Hold every following request until permits are added to the returned semaphore
    pub fn close_gate(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.gate.lock() = Some(gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Number of calls whose endpoint, query included, equals `endpoint`
    pub fn calls_to(&self, endpoint: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.request.endpoint == endpoint)
            .count()
    }
}

#[async_trait]
impl Transport for FakeBackend {
    async fn send(&self, url: String, request: ApiRequest) -> StoreResult<RawResponse> {
        self.calls.lock().push(RecordedCall {
            url,
            request: request.clone(),
        });

        let gate = self.gate.lock().clone();
        if let Some(gate) = gate {
            gate.acquire().await.expect("gate closed").forget();
        }

        let path = request
            .endpoint
            .split('?')
            .next()
            .unwrap_or_default()
            .to_owned();
        let reply = {
            let mut routes = self.routes.lock();
            match routes.get_mut(&(request.method.clone(), path)) {
                Some((responder, count)) => {
                    let reply = responder(&request, *count);
                    *count += 1;
                    reply
                }
                None => Reply::Json(404, json!({"error": "not found"})),
            }
        };

        match reply {
            Reply::Json(status, body) => Ok(RawResponse {
                status,
                body: body.to_string().into_bytes(),
            }),
            Reply::Raw(status, body) => Ok(RawResponse {
                status,
                body: body.as_bytes().to_vec(),
            }),
            Reply::Timeout => Err(StoreError::Timeout),
        }
    }

    fn name(&self) -> &str {
        "fake"
    }
}

pub(crate) fn metrics_body() -> Value {
    json!({
        "modules": {"total": 24, "active": 22, "inactive": 2},
        "power": {"total_generated_24h": 5120.5, "average_efficiency": 18.4},
        "anomalies": {"total_active": 3, "critical": 1, "medium_high": 2},
        "environment": {"average_temperature": 29.1, "average_irradiance": 812.0, "average_humidity": 71.5},
        "timestamp": "2025-10-02T10:00:00"
    })
}

pub(crate) fn latest_body() -> Value {
    json!({
        "solar_data": [{"id": 10, "module_id": "M-01", "max_power": 301.2}],
        "environmental_data": [{"id": 4, "location_id": "default", "irradiance": 805.0}],
        "count": {"solar": 1, "environmental": 1}
    })
}

pub(crate) fn prediction_body(power: f64) -> Value {
    json!({
        "prediction": {"predicted_power": power, "confidence": 0.75, "unit": "W"},
        "input_conditions": {"irradiance": 800.0, "ambient_temp": 28.0},
        "prediction_id": 1,
        "timestamp": "2025-10-02T10:00:00"
    })
}
