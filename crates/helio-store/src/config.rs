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

use helio_types::DEFAULT_API_BASE_URL;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

use crate::errors::{StoreError, StoreResult};
use crate::refresh::RefreshSettings;

pub const ENV_API_BASE_URL: &str = "HELIO_API_BASE_URL";
pub const ENV_REFRESH_INTERVAL_SECS: &str = "HELIO_REFRESH_INTERVAL_SECS";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "HELIO_REQUEST_TIMEOUT_SECS";

/// Store configuration, read from an optional TOML file and the environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Backend base URL, e.g. http://localhost:5000/api
    pub api_base_url: String,

    /// Per-request timeout applied by the HTTP transport
    pub request_timeout_secs: u64,

    /// Period of the background refresh of metrics and latest samples
    pub refresh_interval_secs: u64,

    /// How many latest samples the initial load asks for
    pub initial_latest_limit: u32,

    /// How many latest samples each periodic refresh asks for
    pub refresh_latest_limit: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            request_timeout_secs: 10,
            refresh_interval_secs: 30,
            initial_latest_limit: 20,
            refresh_latest_limit: 5,
        }
    }
}

impl StoreConfig {
    pub fn from_toml_str(content: &str) -> StoreResult<Self> {
        toml::from_str(content).map_err(|e| StoreError::Config(format!("Invalid config: {e}")))
    }

    pub fn from_file(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Defaults, then the file if given, then environment overrides
    pub fn load(path: Option<&Path>) -> StoreResult<Self> {
        let mut config = match path {
            Some(path) => {
                info!("📋 Loading store configuration from {}", path.display());
                Self::from_file(path)?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides looked up by environment variable name
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_API_BASE_URL)
            && !url.trim().is_empty()
        {
            self.api_base_url = url.trim().to_owned();
        }
        if let Some(secs) = lookup(ENV_REFRESH_INTERVAL_SECS) {
            match secs.trim().parse::<u64>() {
                Ok(n) => self.refresh_interval_secs = n,
                Err(_) => warn!("Ignoring {}={:?}: not a number", ENV_REFRESH_INTERVAL_SECS, secs),
            }
        }
        if let Some(secs) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
            match secs.trim().parse::<u64>() {
                Ok(n) => self.request_timeout_secs = n,
                Err(_) => warn!("Ignoring {}={:?}: not a number", ENV_REQUEST_TIMEOUT_SECS, secs),
            }
        }
    }

    pub fn validate(&self) -> StoreResult<()> {
        let url = self.api_base_url.trim();
        if url.is_empty() {
            return Err(StoreError::Config("api_base_url must not be empty".to_owned()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(StoreError::Config(format!(
                "api_base_url must start with http:// or https://, got '{url}'"
            )));
        }
        if self.refresh_interval_secs == 0 {
            return Err(StoreError::Config(
                "refresh_interval_secs must be greater than zero".to_owned(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn refresh_settings(&self) -> RefreshSettings {
        RefreshSettings {
            interval: Duration::from_secs(self.refresh_interval_secs),
            initial_latest_limit: self.initial_latest_limit,
            refresh_latest_limit: self.refresh_latest_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:5000/api");
        assert_eq!(config.refresh_interval_secs, 30);
        assert_eq!(config.initial_latest_limit, 20);
        assert_eq!(config.refresh_latest_limit, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = StoreConfig::from_toml_str(
            r#"
            api_base_url = "https://pv.example.org/api"
            refresh_interval_secs = 60
            "#,
        )
        .unwrap();
        assert_eq!(config.api_base_url, "https://pv.example.org/api");
        assert_eq!(config.refresh_interval_secs, 60);
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = StoreConfig::from_toml_str("refresh_interval_secs = \"soon\"").unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[test]
    fn test_overrides_win_over_file() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_API_BASE_URL, "http://10.0.0.5:5000/api"),
            (ENV_REFRESH_INTERVAL_SECS, "15"),
            (ENV_REQUEST_TIMEOUT_SECS, "later"),
        ]);
        let mut config = StoreConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| (*v).to_owned()));

        assert_eq!(config.api_base_url, "http://10.0.0.5:5000/api");
        assert_eq!(config.refresh_interval_secs, 15);
        // unparsable value is ignored
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let config = StoreConfig {
            api_base_url: "localhost:5000".to_owned(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = StoreConfig {
            refresh_interval_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("helio.toml");
        std::fs::write(&path, "refresh_latest_limit = 8\n").unwrap();

        let config = StoreConfig::from_file(&path).unwrap();
        assert_eq!(config.refresh_latest_limit, 8);

        let missing = StoreConfig::from_file(dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(StoreError::Io { .. })));
    }

    #[test]
    fn test_refresh_settings_follow_config() {
        let config = StoreConfig {
            refresh_interval_secs: 45,
            ..Default::default()
        };
        let settings = config.refresh_settings();
        assert_eq!(settings.interval, Duration::from_secs(45));
        assert_eq!(settings.initial_latest_limit, 20);
    }
}
