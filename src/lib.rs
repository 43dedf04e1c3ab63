// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Fetch, filter and cache ARAS amateur spectroscopy FITS spectra, and plot
spectral lines in velocity space.
 */

pub mod cache;
pub mod catalog;
pub mod cli;
pub mod constants;
pub mod fetch;
pub mod filter;
pub mod fits;
pub mod pipeline;
pub mod plot;
pub mod settings;
pub mod spectra;
pub mod velocity;

// Re-exports.
pub use cache::CachePolicy;
pub use constants::*;
pub use filter::QualityFilter;
pub use settings::Settings;
pub use spectra::{SpectrumCollection, SpectrumHeader, SpectrumRecord};

use std::sync::atomic::AtomicBool;

/// Whether progress bars are drawn during long loops.
pub static PROGRESS_BARS: AtomicBool = AtomicBool::new(false);
