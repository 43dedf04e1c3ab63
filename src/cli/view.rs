// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The `view` subcommand: fetch one spectrum by URL and plot flux against
//! wavelength over its full range.

use std::path::PathBuf;

use clap::Parser;
use log::info;

use super::ArasSpectraError;
use crate::{
    fetch::{HttpSource, SpectrumSource},
    plot::{render_spectrum, PlotOptions},
};

#[derive(Parser, Debug)]
pub(super) struct ViewArgs {
    /// URL of a spectrum FITS file.
    #[clap(name = "URL")]
    url: String,

    /// Output PNG path.
    #[clap(short, long, parse(from_os_str), default_value = "spectrum.png")]
    output: PathBuf,
}

impl ViewArgs {
    pub(super) fn run(self) -> Result<(), ArasSpectraError> {
        let source = HttpSource::default();
        let record = source.fetch(&self.url)?;
        info!(
            "{} samples, {:.1} to {:.1} A, observed {}",
            record.header.naxis1,
            record.wavelengths[0],
            record.wavelengths[record.wavelengths.len() - 1],
            record.header.date_obs,
        );
        render_spectrum(&record, &PlotOptions::default(), &self.output)?;
        info!("Wrote {}", self.output.display());
        Ok(())
    }
}
