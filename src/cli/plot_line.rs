// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The `plot-line` subcommand: velocity-space curves from cached spectra.
//!
//! One curve is drawn per (index, rest-wavelength) pair, so a single line
//! can be compared across observations, several lines across a single
//! observation, or both at once.

use std::path::PathBuf;

use clap::Parser;
use log::info;

use super::ArasSpectraError;
use crate::{
    cache,
    plot::{render_series, velocity_series, LabelMode, PlotOptions},
};

#[derive(Parser, Debug)]
pub(super) struct PlotLineArgs {
    /// Index of a spectrum in the cached collection. Repeat to overlay
    /// several observations.
    #[clap(short, long = "index", required = true)]
    indices: Vec<usize>,

    /// Rest wavelength of a line in angstroms. Repeat to overlay several
    /// lines.
    #[clap(short = 'w', long = "rest-wavelength", required = true)]
    rest_wavelengths: Vec<f64>,

    /// Label each curve with its observation date.
    #[clap(long)]
    show_date: bool,

    /// Label each curve with its rest wavelength.
    #[clap(long)]
    show_wavelength: bool,

    /// Curve opacity, in [0, 1].
    #[clap(long, default_value = "1.0")]
    opacity: f64,

    /// Flux scale factor applied after normalization.
    #[clap(long, default_value = "1.0")]
    scale: f64,

    /// Minimum of the velocity axis [km/s].
    #[clap(long, default_value = "-2000", allow_hyphen_values = true)]
    vmin: f64,

    /// Maximum of the velocity axis [km/s].
    #[clap(long, default_value = "2000", allow_hyphen_values = true)]
    vmax: f64,

    /// Maximum of the normalized-flux axis.
    #[clap(long, default_value = "1.05")]
    ymax: f64,

    /// The cached spectrum collection to plot from.
    #[clap(long, parse(from_os_str), default_value = "ag_dra.spectra.json")]
    collection_cache: PathBuf,

    /// Output PNG path.
    #[clap(short, long, parse(from_os_str), default_value = "lines.png")]
    output: PathBuf,
}

impl PlotLineArgs {
    pub(super) fn run(self) -> Result<(), ArasSpectraError> {
        let mode = LabelMode::from_flags(self.show_date, self.show_wavelength)?;
        let collection = cache::load_collection(&self.collection_cache)?;

        let mut series = vec![];
        for &index in &self.indices {
            for &rest_wavelength in &self.rest_wavelengths {
                series.push(velocity_series(
                    &collection,
                    index,
                    rest_wavelength,
                    mode,
                    self.opacity,
                    self.scale,
                )?);
            }
        }

        let options = PlotOptions {
            x_range: (self.vmin, self.vmax),
            y_range: (0.0, self.ymax),
            ..PlotOptions::default()
        };
        render_series(&series, &options, &self.output)?;
        info!("Wrote {}", self.output.display());
        Ok(())
    }
}
