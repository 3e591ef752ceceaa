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

use async_trait::async_trait;
use helio_types::DataType;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, trace};

use crate::errors::{StoreError, StoreResult};

/// A file picked for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn from_bytes(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, keeping its base name as the upload file name
    pub async fn from_path(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.csv".to_owned());
        Ok(Self { file_name, bytes })
    }
}

/// Body of an outgoing request
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    /// `multipart/form-data` with fields `file` and `data_type`
    Upload { file: UploadFile, data_type: DataType },
}

/// One call against the backend, relative to the store's base URL
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub endpoint: String,
    /// Extra headers, applied after the default JSON content type
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn get(endpoint: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            endpoint: endpoint.into(),
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn put(endpoint: impl Into<String>) -> Self {
        Self {
            method: Method::PUT,
            ..Self::get(endpoint)
        }
    }

    pub fn post_json<B: Serialize + ?Sized>(endpoint: impl Into<String>, body: &B) -> StoreResult<Self> {
        Ok(Self {
            method: Method::POST,
            body: RequestBody::Json(serde_json::to_value(body)?),
            ..Self::get(endpoint)
        })
    }

    pub fn upload(endpoint: impl Into<String>, file: UploadFile, data_type: DataType) -> Self {
        Self {
            method: Method::POST,
            body: RequestBody::Upload { file, data_type },
            ..Self::get(endpoint)
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Status and body of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Moves requests to the backend and brings back the raw response.
/// The store never talks HTTP directly, only through this trait.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one exchange. Non-2xx statuses are returned as responses,
    /// only transport failures are errors.
    async fn send(&self, url: String, request: ApiRequest) -> StoreResult<RawResponse>;

    /// Get transport name for logging
    fn name(&self) -> &str;
}

/// Production transport on top of a shared reqwest client
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> StoreResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, url: String, request: ApiRequest) -> StoreResult<RawResponse> {
        let mut builder = self.client.request(request.method.clone(), &url);
        let custom_content_type = request
            .headers
            .iter()
            .any(|(name, _)| name.eq_ignore_ascii_case("content-type"));
        if !custom_content_type && !matches!(request.body, RequestBody::Upload { .. }) {
            builder = builder.header(reqwest::header::CONTENT_TYPE, "application/json");
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.body(body.to_string()),
            RequestBody::Upload { file, data_type } => {
                trace!("   Upload: {} ({} bytes)", file.file_name, file.bytes.len());
                let part = Part::bytes(file.bytes).file_name(file.file_name);
                let form = Form::new()
                    .part("file", part)
                    .text("data_type", data_type.as_str());
                builder.multipart(form)
            }
        };

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(map_reqwest_error)?.to_vec();
        debug!("   {} {} -> {} ({} bytes)", request.method, url, status, body.len());

        Ok(RawResponse { status, body })
    }

    fn name(&self) -> &str {
        "reqwest"
    }
}

fn map_reqwest_error(e: reqwest::Error) -> StoreError {
    if e.is_timeout() {
        StoreError::Timeout
    } else {
        StoreError::Http(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_defaults() {
        let request = ApiRequest::get("/dashboard/metrics");
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.body, RequestBody::Empty);
        assert!(request.headers.is_empty());
    }

    #[test]
    fn test_post_json_serializes_body() {
        let request = ApiRequest::post_json("/data/solar", &json!({"module_id": "M-1"})).unwrap();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.body, RequestBody::Json(json!({"module_id": "M-1"})));
    }

    #[test]
    fn test_success_range() {
        let ok = RawResponse { status: 201, body: Vec::new() };
        let redirect = RawResponse { status: 302, body: Vec::new() };
        assert!(ok.is_success());
        assert!(!redirect.is_success());
    }

    #[tokio::test]
    async fn test_upload_file_from_path_uses_base_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("modules.csv");
        std::fs::write(&path, "module_id,max_power\nM-1,310\n").unwrap();

        let file = UploadFile::from_path(&path).await.unwrap();
        assert_eq!(file.file_name, "modules.csv");
        assert!(file.bytes.starts_with(b"module_id"));
    }

    #[tokio::test]
    async fn test_upload_file_missing_path() {
        let err = UploadFile::from_path("/definitely/not/here.csv").await.unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }
}
