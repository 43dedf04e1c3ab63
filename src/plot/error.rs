// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlotError {
    #[cfg(not(feature = "plotting"))]
    #[error("aras_spectra was not compiled with the \"plotting\" feature.\nYou need to compile it from source with this feature to render plots.")]
    NoPlottingFeature,

    /// Neither the date flag nor the wavelength flag was requested, so there
    /// is nothing to label the curve with.
    #[error("No label requested: enable the observation-date label, the wavelength label, or both")]
    NoLabel,

    #[error("Spectrum index {index} is out of range: the collection holds {len} spectra")]
    BadIndex { index: usize, len: usize },

    #[error("Opacity {0} is outside [0, 1]")]
    BadOpacity(f64),

    #[cfg(feature = "plotting")]
    #[error("No series to plot!")]
    NoSeries,

    #[cfg(feature = "plotting")]
    #[error("Error from the plotters library: {0}")]
    Draw(String),
}
