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

//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use helio_types::{DataType, PerformanceInputs};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "helio")]
#[command(author, version, about = "Solar monitoring backend client")]
#[command(
    long_about = "Command-line client for the solar monitoring and AI analytics backend.\n\
    \nEvery subcommand performs one store action and prints the backend reply as JSON.\n\
    `watch` keeps the dashboard data refreshed and prints a summary on every change.\n\
    \nExamples:\n  \
    helio watch                                  # Initial load, then refresh every 30s\n  \
    helio latest --limit 5                       # Latest solar and environmental samples\n  \
    helio predict --irradiance 800 --ambient-temp 28 --humidity 70 --wind-speed 2\n  \
    helio upload modules.csv --data-type solar   # Bulk import"
)]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, global = true, env = "HELIO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Backend base URL, overrides configuration and environment
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Load dashboard data, then keep refreshing it until Ctrl+C
    Watch {
        /// Refresh period in seconds, overrides configuration
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Dashboard metrics
    Metrics,

    /// Most recent solar and environmental samples
    Latest {
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },

    /// Samples recorded between two ISO 8601 timestamps
    Range {
        start: String,
        end: String,
    },

    /// Active anomalies
    Anomalies,

    /// Mark an anomaly as resolved
    Resolve { id: i64 },

    /// Performance chart series
    Charts {
        #[arg(long, default_value_t = 7)]
        days: u32,
    },

    /// Predict module power output from environmental conditions
    Predict(PredictArgs),

    /// Stored prediction history
    History {
        #[arg(long, default_value_t = 7)]
        days: u32,
        #[arg(long, default_value_t = 50)]
        limit: u32,
    },

    /// Run anomaly detection on a module reading
    #[command(long_about = "Run anomaly detection on one module reading.\n\
        \nREADING is inline JSON or @path to a JSON file, e.g.\n  \
        helio detect '{\"module_id\":\"M-01\",\"voltage_oc\":45.2,\"voltage_mp\":37.1,\"current_mp\":8.1,\
        \"current_sc\":8.7,\"power_max\":300.5,\"efficiency\":0.18,\"cell_temp\":48}'")]
    Detect {
        /// Module reading as JSON or @file
        reading: String,
    },

    /// Multi-objective optimization of a system configuration
    Optimize {
        /// Optimization parameters as JSON or @file
        params: String,
    },

    /// Store one solar module sample
    SubmitSolar {
        /// Sample as JSON or @file
        sample: String,
    },

    /// Store one environmental sample
    SubmitEnvironmental {
        /// Sample as JSON or @file
        sample: String,
    },

    /// Bulk import a CSV file, or an Excel workbook (.xlsx/.xls)
    Upload {
        path: PathBuf,

        /// Target table: solar or environmental
        #[arg(long, default_value_t = DataType::Solar)]
        data_type: DataType,
    },

    /// Load status of the backend AI models
    Models,
}

#[derive(Debug, Parser)]
pub struct PredictArgs {
    /// Solar irradiance in W/m²
    #[arg(long)]
    pub irradiance: f64,

    /// Ambient temperature in °C
    #[arg(long)]
    pub ambient_temp: f64,

    /// Relative humidity in %
    #[arg(long)]
    pub humidity: f64,

    /// Wind speed in m/s
    #[arg(long)]
    pub wind_speed: f64,

    /// Cell temperature in °C, estimated by the backend when omitted
    #[arg(long)]
    pub cell_temp: Option<f64>,

    #[arg(long)]
    pub cloudiness: Option<f64>,

    #[arg(long)]
    pub module_id: Option<String>,
}

impl From<PredictArgs> for PerformanceInputs {
    fn from(args: PredictArgs) -> Self {
        PerformanceInputs {
            irradiance: args.irradiance,
            ambient_temp: args.ambient_temp,
            humidity: args.humidity,
            wind_speed: args.wind_speed,
            cell_temp: args.cell_temp,
            cloudiness: args.cloudiness,
            module_id: args.module_id,
            ..Default::default()
        }
    }
}
