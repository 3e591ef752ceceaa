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

//! Rendering of store data for the terminal.

use anyhow::{Context, Result};
use helio_types::StoreState;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Print any payload as pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Parse a JSON argument. `@path` reads the JSON from a file.
pub fn parse_json_arg<T: DeserializeOwned>(arg: &str) -> Result<T> {
    match arg.strip_prefix('@') {
        Some(path) => {
            let content = std::fs::read_to_string(Path::new(path))
                .with_context(|| format!("Failed to read {path}"))?;
            serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {path}"))
        }
        None => serde_json::from_str(arg).context("Invalid JSON argument"),
    }
}

/// One-line dashboard summary used by `watch`
pub fn summary_line(state: &StoreState) -> String {
    let metrics = &state.system_metrics;
    let mut line = format!(
        "modules {}/{} active | 24h {:.1} Wh | eff {:.1}% | anomalies {} ({} critical) | samples {} solar, {} env",
        metrics.modules.active,
        metrics.modules.total,
        metrics.power.total_generated_24h,
        metrics.power.average_efficiency,
        metrics.anomalies.total_active,
        metrics.anomalies.critical,
        state.solar_data.len(),
        state.environmental_data.len(),
    );
    if state.loading {
        line.push_str(" | loading");
    }
    if let Some(error) = &state.error {
        line.push_str(" | error: ");
        line.push_str(error);
    }
    line
}

/// Tracks what `watch` last printed. Only settled states (nothing in flight)
/// are reported, and an unchanged summary is not repeated.
#[derive(Debug, Default)]
pub struct SettledSummary {
    last: Option<String>,
}

impl SettledSummary {
    /// Summary line to print for `state`, if any
    pub fn observe(&mut self, state: &StoreState) -> Option<String> {
        if state.loading {
            return None;
        }
        let line = summary_line(state);
        if self.last.as_deref() == Some(line.as_str()) {
            return None;
        }
        self.last = Some(line.clone());
        Some(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helio_types::{ModuleReading, StoreEvent};
    use serde_json::json;

    #[test]
    fn test_summary_of_fresh_state() {
        let line = summary_line(&StoreState::default());
        assert!(line.starts_with("modules 0/0 active"));
        assert!(!line.contains("error"));
    }

    #[test]
    fn test_summary_shows_loading_and_error() {
        let state = StoreState::default()
            .reduce(StoreEvent::RequestStarted)
            .reduce(StoreEvent::RequestStarted)
            .reduce(StoreEvent::RequestFailed("Error 502: Bad Gateway".to_owned()));
        let line = summary_line(&state);
        assert!(line.ends_with("| loading | error: Error 502: Bad Gateway"));
    }

    #[test]
    fn test_parse_inline_json() {
        let reading: ModuleReading = parse_json_arg(
            r#"{"module_id":"M-01","voltage_oc":45.2,"voltage_mp":37.1,"current_mp":8.1,
                "current_sc":8.7,"power_max":300.5,"efficiency":0.18,"cell_temp":48}"#,
        )
        .unwrap();
        assert_eq!(reading.module_id, "M-01");
    }

    #[test]
    fn test_parse_json_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        std::fs::write(&path, json!({"technology": "mono-Si", "environmental_data": []}).to_string())
            .unwrap();

        let value: serde_json::Value = parse_json_arg(&format!("@{}", path.display())).unwrap();
        assert_eq!(value["technology"], json!("mono-Si"));
        assert!(parse_json_arg::<serde_json::Value>("@/no/such/file.json").is_err());
        assert!(parse_json_arg::<serde_json::Value>("{broken").is_err());
    }

    #[test]
    fn test_settled_summary_skips_loading_and_repeats() {
        let mut summary = SettledSummary::default();
        let idle = StoreState::default();
        let busy = idle.clone().reduce(StoreEvent::RequestStarted);

        assert!(summary.observe(&busy).is_none());
        assert!(summary.observe(&idle).is_some());
        assert!(summary.observe(&idle).is_none());

        let failed = busy.reduce(StoreEvent::RequestFailed("Request timed out".to_owned()));
        let line = summary.observe(&failed).unwrap();
        assert!(line.ends_with("error: Request timed out"));
        assert!(summary.observe(&idle).is_some());
    }
}
