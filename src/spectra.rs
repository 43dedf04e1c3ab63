// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Types describing accepted spectra.
//!
//! A [SpectrumRecord]'s wavelength grid is never stored in a FITS file; it is
//! an affine sequence derived from the `CRVAL1`/`CDELT1`/`NAXIS1` header
//! keys. The full header is retained for provenance even though only a
//! handful of keys feed the pipeline.

use std::ops::{Deref, DerefMut};

use indexmap::IndexMap;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// The primary-HDU header of one spectrum. Required keys are typed fields;
/// every other card is kept verbatim, in file order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectrumHeader {
    /// `CRVAL1`: wavelength of the first sample \[A\].
    pub crval1: f64,

    /// `CDELT1`: wavelength step per sample \[A\].
    pub cdelt1: f64,

    /// `NAXIS1`: number of flux samples.
    pub naxis1: usize,

    /// `DATE-OBS`: observation timestamp, kept as-is for display.
    pub date_obs: String,

    /// `OBJNAME`, when present.
    pub object_name: Option<String>,

    /// `OBSERVER`, when present.
    pub observer: Option<String>,

    /// All other header cards, in file order.
    pub extra: IndexMap<String, String>,
}

impl SpectrumHeader {
    /// The wavelength grid described by this header:
    /// `CRVAL1 + k * CDELT1` for `k` in `[0, NAXIS1)`.
    pub fn wavelengths(&self) -> Array1<f64> {
        Array1::from_iter((0..self.naxis1).map(|k| self.crval1 + k as f64 * self.cdelt1))
    }

    /// `CRVAL1 / CDELT1`. Not a rigorous resolving power (that would depend
    /// on the line FWHM, not the pixel scale), but it is the quantity the
    /// quality filter has always cut on, so it is preserved exactly.
    pub fn resolution(&self) -> f64 {
        self.crval1 / self.cdelt1
    }

    /// Span of the wavelength grid \[A\]: last sample minus first sample.
    pub fn wavelength_range(&self) -> f64 {
        match self.naxis1 {
            0 => 0.0,
            n => (n - 1) as f64 * self.cdelt1,
        }
    }
}

/// One accepted observation: the derived wavelength grid, the flux samples,
/// and the header they came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectrumRecord {
    /// Strictly increasing, one value per flux sample \[A\].
    pub wavelengths: Array1<f64>,

    /// Index-aligned with `wavelengths` \[arbitrary units\].
    pub flux: Array1<f64>,

    pub header: SpectrumHeader,
}

impl SpectrumRecord {
    /// Derive the wavelength grid from `header` and pair it with `flux`.
    /// Returns `None` if the flux length doesn't match `NAXIS1`.
    pub fn from_flux(header: SpectrumHeader, flux: Vec<f64>) -> Option<SpectrumRecord> {
        if flux.len() != header.naxis1 {
            return None;
        }
        Some(SpectrumRecord {
            wavelengths: header.wavelengths(),
            flux: Array1::from_vec(flux),
            header,
        })
    }
}

/// The spectra accepted during one run, in discovery order. The index
/// position is the only identifier used elsewhere; once built (or loaded
/// from cache) a collection is not modified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpectrumCollection(Vec<SpectrumRecord>);

impl SpectrumCollection {
    pub fn new() -> SpectrumCollection {
        SpectrumCollection(Vec::new())
    }
}

impl From<Vec<SpectrumRecord>> for SpectrumCollection {
    fn from(records: Vec<SpectrumRecord>) -> SpectrumCollection {
        SpectrumCollection(records)
    }
}

impl Deref for SpectrumCollection {
    type Target = Vec<SpectrumRecord>;

    fn deref(&self) -> &Vec<SpectrumRecord> {
        &self.0
    }
}

impl DerefMut for SpectrumCollection {
    fn deref_mut(&mut self) -> &mut Vec<SpectrumRecord> {
        &mut self.0
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A small synthetic header in the shape of an ARAS echelle spectrum.
    pub(crate) fn test_header(crval1: f64, cdelt1: f64, naxis1: usize) -> SpectrumHeader {
        let mut extra = IndexMap::new();
        extra.insert("BSS_INST".to_string(), "LISA".to_string());
        SpectrumHeader {
            crval1,
            cdelt1,
            naxis1,
            date_obs: "2019-07-06T21:42:00".to_string(),
            object_name: Some("AG Dra".to_string()),
            observer: Some("A. Observer".to_string()),
            extra,
        }
    }

    pub(crate) fn test_record(crval1: f64, cdelt1: f64, naxis1: usize) -> SpectrumRecord {
        let header = test_header(crval1, cdelt1, naxis1);
        let flux = (0..naxis1).map(|k| 1.0 + (k as f64 * 0.1).sin()).collect();
        SpectrumRecord::from_flux(header, flux).unwrap()
    }

    #[test]
    fn wavelength_grid_is_affine_and_aligned() {
        let record = test_record(4000.0, 0.4, 6000);
        assert_eq!(record.wavelengths.len(), record.flux.len());
        assert_eq!(record.wavelengths.len(), record.header.naxis1);
        assert_eq!(record.wavelengths[0], 4000.0);
        approx::assert_abs_diff_eq!(record.wavelengths[1], 4000.4, epsilon = 1e-9);
        // Strictly increasing for any positive CDELT1.
        assert!(record
            .wavelengths
            .windows(2)
            .into_iter()
            .all(|w| w[1] > w[0]));
    }

    #[test]
    fn flux_length_must_match_naxis1() {
        let header = test_header(4000.0, 0.4, 10);
        assert!(SpectrumRecord::from_flux(header, vec![0.0; 9]).is_none());
    }

    #[test]
    fn wavelength_range_matches_grid() {
        let header = test_header(4000.0, 0.4, 6000);
        let grid = header.wavelengths();
        let range = grid[grid.len() - 1] - grid[0];
        assert!((header.wavelength_range() - range).abs() < 1e-9);
        assert!((header.wavelength_range() - 2399.6).abs() < 1e-9);
    }
}
