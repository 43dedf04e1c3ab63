// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

All constants *must* be double precision. Wavelengths are in angstroms,
velocities in km/s.
 */

/// Speed of light \[km/s\].
pub const VEL_C_KMS: f64 = 299_792.458;

/// Spectra with `CRVAL1 / CDELT1` below this value are discarded by the
/// default quality filter.
pub const DEFAULT_MIN_RESOLUTION: f64 = 8000.0;

/// Spectra spanning less than this many angstroms are discarded by the
/// default quality filter.
pub const DEFAULT_MIN_WAVELENGTH_RANGE: f64 = 2000.0;

/// The ARAS database page for AG Draconis lives under this URI.
pub const DEFAULT_CATALOG_BASE_URI: &str =
    "http://www.astrosurf.com/aras/Aras_DataBase/Symbiotics/";

/// The catalog page for AG Draconis.
pub const DEFAULT_CATALOG_PAGE: &str = "AGDra.htm";

/// Default cache file for the accepted spectrum collection.
pub const DEFAULT_COLLECTION_CACHE: &str = "ag_dra.spectra.json";

/// Default cache file for the scraped link list.
pub const DEFAULT_LINK_LIST_CACHE: &str = "ag_dra.links.json";

/// A catalog href is treated as a spectrum link iff it contains this
/// substring.
pub const SPECTRUM_LINK_MARKER: &str = ".fit";

/// H-beta rest wavelength \[A\].
pub const H_BETA: f64 = 4861.0;

/// He I 5015 rest wavelength \[A\].
pub const HE_I_5015: f64 = 5015.0;

/// He I 5875 rest wavelength \[A\].
pub const HE_I_5875: f64 = 5875.0;
