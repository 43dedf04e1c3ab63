// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Durable caches for the link list and the accepted spectrum collection.
//!
//! There is no invalidation: the presence of a collection cache file means
//! "trust it forever". Writes go through a temporary file in the target
//! directory followed by a rename, so a crash mid-write can't leave a
//! half-written cache behind.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use thiserror::Error;

use crate::{catalog::LinkSet, spectra::SpectrumCollection};

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Couldn't read cache file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cache file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Couldn't write cache file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Couldn't serialise into cache file {path}: {source}")]
    Serialise {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Which cache strategy gates the fetch pipeline. The two strategies come
/// from different generations of the same pipeline and are deliberately not
/// merged; callers pick one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum CachePolicy {
    /// If the collection cache file exists, load it and skip the fetch
    /// pipeline entirely; otherwise fetch, filter and write it.
    #[default]
    Existence,

    /// As `Existence` for the collection, but additionally persist the
    /// scraped link list, overwriting it only when the fresh scrape found
    /// strictly more links. Cardinality is the only change signal: a
    /// removed-then-added link at equal count is invisible.
    LinkListDiff,
}

fn load<T: DeserializeOwned>(path: &Path) -> Result<T, CacheError> {
    let file = File::open(path).map_err(|source| CacheError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CacheError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialise `value` next to `path`, then rename over it.
fn save<T: Serialize>(path: &Path, value: &T) -> Result<(), CacheError> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let mut staged = tempfile::NamedTempFile::new_in(dir.unwrap_or(Path::new("."))).map_err(
        |source| CacheError::Write {
            path: path.to_path_buf(),
            source,
        },
    )?;
    {
        let mut writer = BufWriter::new(&mut staged);
        serde_json::to_writer(&mut writer, value).map_err(|source| CacheError::Serialise {
            path: path.to_path_buf(),
            source,
        })?;
        writer.flush().map_err(|source| CacheError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }
    staged.persist(path).map_err(|e| CacheError::Write {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}

pub fn load_collection(path: &Path) -> Result<SpectrumCollection, CacheError> {
    load(path)
}

pub fn save_collection(path: &Path, collection: &SpectrumCollection) -> Result<(), CacheError> {
    save(path, collection)
}

pub fn load_links(path: &Path) -> Result<LinkSet, CacheError> {
    load(path)
}

/// The link-list half of [CachePolicy::LinkListDiff]: persist `fresh` when
/// there is no saved list yet, or when `fresh` is strictly larger than the
/// saved one. Returns whether the file was (re)written.
pub fn update_links(path: &Path, fresh: &LinkSet) -> Result<bool, CacheError> {
    if !path.is_file() {
        log::info!("Writing spectra list to {}", path.display());
        save(path, fresh)?;
        return Ok(true);
    }

    let saved = load_links(path)?;
    if fresh.len() > saved.len() {
        log::info!("Updating spectra list in {}", path.display());
        save(path, fresh)?;
        Ok(true)
    } else {
        Ok(false)
    }
}
