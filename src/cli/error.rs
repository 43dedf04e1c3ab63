// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all aras_spectra-related errors. This should be the *only*
//! error enum that is publicly visible from the CLI.

use thiserror::Error;

use crate::{
    cache::CacheError, catalog::CatalogError, fetch::FetchError, pipeline::PipelineError,
    plot::PlotError, settings::SettingsError,
};

/// The *only* publicly visible error from the aras_spectra CLI.
#[derive(Error, Debug)]
pub enum ArasSpectraError {
    /// An error related to the acquisition pipeline.
    #[error("{0}")]
    Pipeline(String),

    /// An error related to the caches.
    #[error("{0}")]
    Cache(String),

    /// An error related to plotting.
    #[error("{0}")]
    Plot(String),

    /// An error related to settings files and flags.
    #[error("{0}")]
    Settings(String),

    #[error("{0}")]
    Generic(String),
}

impl From<PipelineError> for ArasSpectraError {
    fn from(e: PipelineError) -> Self {
        let s = e.to_string();
        match e {
            PipelineError::Catalog(_) => Self::Pipeline(s),
            PipelineError::Cache(_) => Self::Cache(s),
        }
    }
}

impl From<CatalogError> for ArasSpectraError {
    fn from(e: CatalogError) -> Self {
        Self::Pipeline(e.to_string())
    }
}

impl From<FetchError> for ArasSpectraError {
    fn from(e: FetchError) -> Self {
        Self::Pipeline(e.to_string())
    }
}

impl From<CacheError> for ArasSpectraError {
    fn from(e: CacheError) -> Self {
        Self::Cache(e.to_string())
    }
}

impl From<PlotError> for ArasSpectraError {
    fn from(e: PlotError) -> Self {
        Self::Plot(e.to_string())
    }
}

impl From<SettingsError> for ArasSpectraError {
    fn from(e: SettingsError) -> Self {
        Self::Settings(e.to_string())
    }
}

impl From<std::io::Error> for ArasSpectraError {
    fn from(e: std::io::Error) -> Self {
        Self::Generic(e.to_string())
    }
}
