// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The quality gate applied to every downloaded spectrum.
//!
//! Rejection is normal control flow, not an error; rejected spectra are
//! dropped without being recorded or retried.

use crate::{
    constants::{DEFAULT_MIN_RESOLUTION, DEFAULT_MIN_WAVELENGTH_RANGE},
    spectra::SpectrumHeader,
};

/// Accepts a spectrum iff its resolution proxy (`CRVAL1 / CDELT1`) and its
/// wavelength span both clear the configured thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityFilter {
    pub min_resolution: f64,

    /// Same units as the wavelengths \[A\].
    pub min_wavelength_range: f64,
}

impl Default for QualityFilter {
    fn default() -> QualityFilter {
        QualityFilter {
            min_resolution: DEFAULT_MIN_RESOLUTION,
            min_wavelength_range: DEFAULT_MIN_WAVELENGTH_RANGE,
        }
    }
}

impl QualityFilter {
    pub fn accepts(&self, header: &SpectrumHeader) -> bool {
        header.resolution() >= self.min_resolution
            && header.wavelength_range() >= self.min_wavelength_range
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectra::tests::test_header;

    #[test]
    fn accepts_high_resolution_wide_spectrum() {
        // resolution = 10000, range = 0.4 * 5999 = 2399.6.
        let header = test_header(4000.0, 0.4, 6000);
        assert!(QualityFilter::default().accepts(&header));
    }

    #[test]
    fn rejects_low_resolution() {
        // resolution = 4000, below the default 8000.
        let header = test_header(4000.0, 1.0, 1500);
        assert!(!QualityFilter::default().accepts(&header));
    }

    #[test]
    fn rejects_narrow_range() {
        // resolution = 10000 is fine, but the span is only 0.4 * 999 A.
        let header = test_header(4000.0, 0.4, 1000);
        assert!(!QualityFilter::default().accepts(&header));
    }

    #[test]
    fn thresholds_are_inclusive() {
        let filter = QualityFilter {
            min_resolution: 10000.0,
            min_wavelength_range: 2399.6,
        };
        let header = test_header(4000.0, 0.4, 6000);
        assert!(filter.accepts(&header));
    }
}
