// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Run-time settings for the acquisition pipeline.
//!
//! Everything may be specified in a TOML file; any CLI arguments override
//! values set in the file. The defaults target the AG Draconis page of the
//! ARAS symbiotics database.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    cache::CachePolicy,
    constants::{
        DEFAULT_CATALOG_BASE_URI, DEFAULT_CATALOG_PAGE, DEFAULT_COLLECTION_CACHE,
        DEFAULT_LINK_LIST_CACHE, DEFAULT_MIN_RESOLUTION, DEFAULT_MIN_WAVELENGTH_RANGE,
    },
};

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Couldn't read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Couldn't parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Base URI of the archive; relative spectrum hrefs get this prefixed.
    pub catalog_base_uri: String,

    /// Page name appended to the base URI, e.g. `AGDra.htm`.
    pub catalog_page: String,

    /// Minimum `CRVAL1 / CDELT1` for a spectrum to be kept.
    pub min_resolution: f64,

    /// Minimum wavelength span \[A\] for a spectrum to be kept.
    pub min_wavelength_range: f64,

    /// Where the accepted collection is cached.
    pub collection_cache_path: PathBuf,

    /// Where the scraped link list is cached (only used by the
    /// `link-list-diff` policy).
    pub link_list_cache_path: PathBuf,

    pub cache_policy: CachePolicy,
}

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            catalog_base_uri: DEFAULT_CATALOG_BASE_URI.to_string(),
            catalog_page: DEFAULT_CATALOG_PAGE.to_string(),
            min_resolution: DEFAULT_MIN_RESOLUTION,
            min_wavelength_range: DEFAULT_MIN_WAVELENGTH_RANGE,
            collection_cache_path: PathBuf::from(DEFAULT_COLLECTION_CACHE),
            link_list_cache_path: PathBuf::from(DEFAULT_LINK_LIST_CACHE),
            cache_policy: CachePolicy::default(),
        }
    }
}

impl Settings {
    pub fn from_toml(path: &Path) -> Result<Settings, SettingsError> {
        let contents = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn defaults_target_the_ag_dra_page() {
        let s = Settings::default();
        assert_eq!(s.min_resolution, 8000.0);
        assert_eq!(s.min_wavelength_range, 2000.0);
        assert!(s.catalog_base_uri.ends_with("/Symbiotics/"));
        assert_eq!(s.catalog_page, "AGDra.htm");
        assert_eq!(s.cache_policy, CachePolicy::Existence);
    }

    #[test]
    fn partial_toml_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(
            &path,
            indoc! {r#"
                catalog_page = "CHCyg.htm"
                min_resolution = 5000.0
                cache_policy = "link-list-diff"
            "#},
        )
        .unwrap();

        let s = Settings::from_toml(&path).unwrap();
        assert_eq!(s.catalog_page, "CHCyg.htm");
        assert_eq!(s.min_resolution, 5000.0);
        assert_eq!(s.cache_policy, CachePolicy::LinkListDiff);
        // Untouched fields keep their defaults.
        assert_eq!(s.min_wavelength_range, 2000.0);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "min_resolutoin = 8000.0\n").unwrap();
        assert!(matches!(
            Settings::from_toml(&path),
            Err(SettingsError::Parse { .. })
        ));
    }
}
