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

//! Client-side data store for the solar monitoring backend.
//!
//! [`DataStore`] owns the application state and performs every backend call
//! through a [`Transport`]. [`RefreshLoop`] keeps dashboard data current in
//! the background.

pub mod config;
pub mod errors;
pub mod refresh;
pub mod store;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use config::StoreConfig;
pub use errors::{StoreError, StoreResult};
pub use refresh::{RefreshHandle, RefreshLoop, RefreshSettings};
pub use store::DataStore;
pub use transport::{ApiRequest, RawResponse, ReqwestTransport, RequestBody, Transport, UploadFile};
