// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Wavelength-to-velocity conversion.

use ndarray::Array1;

use crate::constants::VEL_C_KMS;

/// Convert a wavelength array \[A\] to Doppler velocities \[km/s\] relative
/// to `rest_wavelength`, under the non-relativistic approximation. Pure and
/// elementwise; the output has the same length and order as the input.
pub fn doppler_velocities(wavelengths: &Array1<f64>, rest_wavelength: f64) -> Array1<f64> {
    wavelengths.mapv(|w| VEL_C_KMS * (w - rest_wavelength) / rest_wavelength)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    use super::*;

    #[test]
    fn rest_wavelength_maps_to_zero() {
        let v = doppler_velocities(&array![4861.0], 4861.0);
        assert_abs_diff_eq!(v[0], 0.0);
    }

    #[test]
    fn hundred_km_s_redshift() {
        // 4861.0 * (1 + 100 / c) = 4862.6214...
        let v = doppler_velocities(&array![4862.62], 4861.0);
        assert_abs_diff_eq!(v[0], 100.0, epsilon = 0.1);
    }

    #[test]
    fn elementwise_and_order_preserving() {
        let wavelengths = array![4859.0, 4861.0, 4863.0];
        let v = doppler_velocities(&wavelengths, 4861.0);
        assert_eq!(v.len(), wavelengths.len());
        assert!(v[0] < 0.0);
        assert_abs_diff_eq!(v[1], 0.0);
        assert!(v[2] > 0.0);
    }
}
