// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The `fetch` subcommand: run the acquisition pipeline.

use std::path::PathBuf;

use clap::Parser;

use super::ArasSpectraError;
use crate::{
    cache::CachePolicy,
    fetch::HttpSource,
    pipeline,
    settings::Settings,
};

#[derive(Parser, Debug, Default)]
pub(super) struct FetchArgs {
    /// All of these arguments may be specified in a TOML settings file. Any
    /// CLI arguments override values set in the file.
    #[clap(short, long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// Base URI of the archive; relative spectrum hrefs get this prefixed.
    #[clap(long)]
    catalog_base_uri: Option<String>,

    /// Catalog page name appended to the base URI, e.g. AGDra.htm.
    #[clap(long)]
    catalog_page: Option<String>,

    /// Minimum CRVAL1 / CDELT1 for a spectrum to be kept.
    #[clap(long)]
    min_resolution: Option<f64>,

    /// Minimum wavelength span in angstroms for a spectrum to be kept.
    #[clap(long)]
    min_wavelength_range: Option<f64>,

    /// Where to cache the accepted spectrum collection.
    #[clap(long, parse(from_os_str))]
    collection_cache: Option<PathBuf>,

    /// Where to cache the scraped link list (link-list-diff policy only).
    #[clap(long, parse(from_os_str))]
    link_list_cache: Option<PathBuf>,

    /// Cache strategy: "existence" or "link-list-diff".
    #[clap(long)]
    cache_policy: Option<CachePolicy>,
}

impl FetchArgs {
    fn merge(self) -> Result<Settings, ArasSpectraError> {
        let mut settings = match &self.config {
            Some(path) => Settings::from_toml(path)?,
            None => Settings::default(),
        };
        if let Some(v) = self.catalog_base_uri {
            settings.catalog_base_uri = v;
        }
        if let Some(v) = self.catalog_page {
            settings.catalog_page = v;
        }
        if let Some(v) = self.min_resolution {
            settings.min_resolution = v;
        }
        if let Some(v) = self.min_wavelength_range {
            settings.min_wavelength_range = v;
        }
        if let Some(v) = self.collection_cache {
            settings.collection_cache_path = v;
        }
        if let Some(v) = self.link_list_cache {
            settings.link_list_cache_path = v;
        }
        if let Some(v) = self.cache_policy {
            settings.cache_policy = v;
        }
        Ok(settings)
    }

    pub(super) fn run(self) -> Result<(), ArasSpectraError> {
        let settings = self.merge()?;
        let client = reqwest::blocking::Client::new();
        let source = HttpSource::new(client.clone());
        pipeline::run(&settings, &client, &source)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flags_override_defaults() {
        let args = FetchArgs {
            min_resolution: Some(9000.0),
            cache_policy: Some(CachePolicy::LinkListDiff),
            ..FetchArgs::default()
        };
        let settings = args.merge().unwrap();
        assert_eq!(settings.min_resolution, 9000.0);
        assert_eq!(settings.cache_policy, CachePolicy::LinkListDiff);
        // Untouched fields keep their defaults.
        assert_eq!(settings.min_wavelength_range, 2000.0);
    }
}
