// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Downloading and decoding individual spectra.
//!
//! Failures here are per-item: the pipeline reports them and moves on to the
//! next link. The [SpectrumSource] trait exists so the pipeline can be
//! tested without a network.

use std::{io::Write, path::Path};

use thiserror::Error;

use crate::{
    fits::{
        fits_get_all_cards, fits_get_image, fits_get_optional_key, fits_get_required_key,
        fits_open, fits_open_hdu, FitsError,
    },
    spectra::{SpectrumHeader, SpectrumRecord},
};

#[derive(Error, Debug)]
pub enum FetchError {
    /// The network retrieval failed.
    #[error("Couldn't retrieve {url}: {source}")]
    Retrieve {
        url: String,
        source: reqwest::Error,
    },

    /// The downloaded bytes couldn't be staged to disk. cfitsio opens paths,
    /// not buffers, so every download goes through a temporary file.
    #[error("Couldn't stage {url} to a temporary file: {source}")]
    Stage {
        url: String,
        source: std::io::Error,
    },

    /// The retrieval worked but the bytes aren't a usable spectrum.
    #[error("Couldn't decode {url}: {source}")]
    Decode { url: String, source: DecodeError },
}

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error(transparent)]
    Fits(#[from] FitsError),

    /// The primary HDU's data don't match its own NAXIS1.
    #[error("Expected NAXIS1 = {expected} flux samples, found {found}")]
    FluxLength { expected: usize, found: usize },
}

/// Something that can turn a spectrum link into a decoded record.
pub trait SpectrumSource {
    fn fetch(&self, url: &str) -> Result<SpectrumRecord, FetchError>;
}

/// Fetches spectra over HTTP, one at a time.
pub struct HttpSource {
    client: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new(client: reqwest::blocking::Client) -> HttpSource {
        HttpSource { client }
    }
}

impl Default for HttpSource {
    fn default() -> HttpSource {
        HttpSource::new(reqwest::blocking::Client::new())
    }
}

impl SpectrumSource for HttpSource {
    fn fetch(&self, url: &str) -> Result<SpectrumRecord, FetchError> {
        let bytes = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.bytes())
            .map_err(|source| FetchError::Retrieve {
                url: url.to_string(),
                source,
            })?;

        let stage = |source| FetchError::Stage {
            url: url.to_string(),
            source,
        };
        let mut staged = tempfile::Builder::new()
            .suffix(".fit")
            .tempfile()
            .map_err(stage)?;
        staged.write_all(&bytes).map_err(stage)?;
        staged.flush().map_err(stage)?;

        decode_spectrum(staged.path()).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

/// Decode a spectrum FITS file: required keys off the primary HDU, the rest
/// of the header for provenance, and the 1-D flux array. Missing required
/// keys are rejected here, not later on field access.
pub fn decode_spectrum(path: &Path) -> Result<SpectrumRecord, DecodeError> {
    let mut fptr = fits_open(path)?;
    let hdu = fits_open_hdu(&mut fptr, 0)?;

    let crval1: f64 = fits_get_required_key(&mut fptr, &hdu, "CRVAL1")?;
    let cdelt1: f64 = fits_get_required_key(&mut fptr, &hdu, "CDELT1")?;
    let naxis1: usize = fits_get_required_key(&mut fptr, &hdu, "NAXIS1")?;
    let date_obs: String = fits_get_required_key(&mut fptr, &hdu, "DATE-OBS")?;
    let object_name: Option<String> = fits_get_optional_key(&mut fptr, &hdu, "OBJNAME")?;
    let observer: Option<String> = fits_get_optional_key(&mut fptr, &hdu, "OBSERVER")?;

    let typed_keys = [
        "CRVAL1", "CDELT1", "NAXIS1", "DATE-OBS", "OBJNAME", "OBSERVER",
    ];
    let extra = fits_get_all_cards(&mut fptr, &hdu)?
        .into_iter()
        .filter(|(name, _)| !typed_keys.contains(&name.as_str()))
        .collect();

    let flux: Vec<f64> = fits_get_image(&mut fptr, &hdu)?;

    let header = SpectrumHeader {
        crval1,
        cdelt1,
        naxis1,
        date_obs,
        object_name,
        observer,
        extra,
    };
    let found = flux.len();
    SpectrumRecord::from_flux(header, flux).ok_or(DecodeError::FluxLength {
        expected: naxis1,
        found,
    })
}

#[cfg(test)]
mod tests {
    use fitsio::{
        images::{ImageDescription, ImageType},
        FitsFile,
    };
    use tempfile::TempDir;

    use super::*;

    /// Write a little spectrum file like the ones ARAS observers upload.
    fn write_spectrum_fits(path: &Path, naxis1: usize, with_date_obs: bool) {
        let description = ImageDescription {
            data_type: ImageType::Double,
            dimensions: &[naxis1],
        };
        let mut fptr = FitsFile::create(path)
            .with_custom_primary(&description)
            .open()
            .unwrap();
        let hdu = fptr.primary_hdu().unwrap();
        hdu.write_key(&mut fptr, "CRVAL1", 4000.0).unwrap();
        hdu.write_key(&mut fptr, "CDELT1", 0.4).unwrap();
        if with_date_obs {
            hdu.write_key(&mut fptr, "DATE-OBS", "2019-07-06T21:42:00")
                .unwrap();
        }
        hdu.write_key(&mut fptr, "OBSERVER", "A. Observer").unwrap();
        let flux: Vec<f64> = (0..naxis1).map(|k| k as f64).collect();
        hdu.write_image(&mut fptr, &flux).unwrap();
    }

    #[test]
    fn decodes_header_and_flux() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("asdb_agdra_20190706_181.fit");
        write_spectrum_fits(&path, 64, true);

        let record = decode_spectrum(&path).unwrap();
        assert_eq!(record.header.naxis1, 64);
        assert_eq!(record.header.crval1, 4000.0);
        assert_eq!(record.header.cdelt1, 0.4);
        assert_eq!(record.header.date_obs, "2019-07-06T21:42:00");
        assert_eq!(record.header.observer.as_deref(), Some("A. Observer"));
        assert_eq!(record.wavelengths.len(), 64);
        assert_eq!(record.flux.len(), 64);
        assert_eq!(record.flux[10], 10.0);
        // The typed keys must not be duplicated into the provenance map.
        assert!(!record.header.extra.contains_key("CRVAL1"));
        assert!(!record.header.extra.contains_key("OBSERVER"));
    }

    #[test]
    fn missing_required_key_is_a_decode_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no_date.fit");
        write_spectrum_fits(&path, 16, false);

        match decode_spectrum(&path) {
            Err(DecodeError::Fits(FitsError::MissingKey { key, .. })) => {
                assert_eq!(&*key, "DATE-OBS");
            }
            other => panic!("expected a missing-key error, got {other:?}"),
        }
    }
}
