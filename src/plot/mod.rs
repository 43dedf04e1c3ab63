// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turning spectrum records into labelled velocity-space curves.
//!
//! Building a [VelocitySeries] is pure array work and is always available;
//! actually rendering to a bitmap needs the "plotting" feature.

mod error;

pub use error::PlotError;

use ndarray::Array1;

use crate::{spectra::SpectrumCollection, velocity::doppler_velocities};

/// What goes into a curve's legend entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelMode {
    /// `#<index> - <observation date>`
    Date,

    /// `#<index> - <rest wavelength> A`
    Wavelength,

    /// `#<index> - <rest wavelength> A - <observation date>`
    Both,
}

impl LabelMode {
    /// Validate the two CLI flags into a mode. Asking for no label at all is
    /// a configuration error, not a silent fallthrough.
    pub fn from_flags(show_date: bool, show_wavelength: bool) -> Result<LabelMode, PlotError> {
        match (show_date, show_wavelength) {
            (true, false) => Ok(LabelMode::Date),
            (false, true) => Ok(LabelMode::Wavelength),
            (true, true) => Ok(LabelMode::Both),
            (false, false) => Err(PlotError::NoLabel),
        }
    }
}

/// A rest wavelength formatted for a legend, to 1 decimal place.
pub fn line_label(rest_wavelength: f64) -> String {
    format!("{rest_wavelength:.1} A")
}

/// One curve, ready for a renderer: velocities on x, scaled normalized flux
/// on y, a legend label, and an opacity.
#[derive(Debug, Clone, PartialEq)]
pub struct VelocitySeries {
    pub velocities: Array1<f64>,
    pub flux: Array1<f64>,
    pub label: String,
    pub opacity: f64,
}

/// Build the velocity-space curve for one spectrum and one line. Flux is
/// normalized by the record's own maximum (peak = 1 before `scale` is
/// applied); velocity is relative to `rest_wavelength`.
pub fn velocity_series(
    collection: &SpectrumCollection,
    index: usize,
    rest_wavelength: f64,
    mode: LabelMode,
    opacity: f64,
    scale: f64,
) -> Result<VelocitySeries, PlotError> {
    if !(0.0..=1.0).contains(&opacity) {
        return Err(PlotError::BadOpacity(opacity));
    }
    let record = collection.get(index).ok_or(PlotError::BadIndex {
        index,
        len: collection.len(),
    })?;

    let velocities = doppler_velocities(&record.wavelengths, rest_wavelength);
    let peak = record.flux.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let flux = record.flux.mapv(|f| f / peak * scale);

    let label = match mode {
        LabelMode::Date => format!("#{index} - {}", record.header.date_obs),
        LabelMode::Wavelength => format!("#{index} - {}", line_label(rest_wavelength)),
        LabelMode::Both => format!(
            "#{index} - {} - {}",
            line_label(rest_wavelength),
            record.header.date_obs
        ),
    };

    Ok(VelocitySeries {
        velocities,
        flux,
        label,
        opacity,
    })
}

/// Axis ranges and canvas size for rendered plots.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotOptions {
    /// Velocity range \[km/s\].
    pub x_range: (f64, f64),

    /// Normalized-flux range.
    pub y_range: (f64, f64),

    pub width: u32,
    pub height: u32,
}

impl Default for PlotOptions {
    fn default() -> PlotOptions {
        PlotOptions {
            x_range: (-2000.0, 2000.0),
            y_range: (0.0, 1.05),
            width: 1500,
            height: 700,
        }
    }
}

#[cfg(not(feature = "plotting"))]
pub fn render_series(
    _series: &[VelocitySeries],
    _options: &PlotOptions,
    _output: &std::path::Path,
) -> Result<(), PlotError> {
    // Plotting is optional because the font/bitmap dependencies aren't
    // always available. Surface that, rather than quietly doing nothing.
    Err(PlotError::NoPlottingFeature)
}

#[cfg(not(feature = "plotting"))]
pub fn render_spectrum(
    _record: &crate::spectra::SpectrumRecord,
    _options: &PlotOptions,
    _output: &std::path::Path,
) -> Result<(), PlotError> {
    Err(PlotError::NoPlottingFeature)
}

#[cfg(feature = "plotting")]
pub use plotting::{render_series, render_spectrum};

#[cfg(feature = "plotting")]
mod plotting {
    use std::path::Path;

    use lazy_static::lazy_static;
    use plotters::{
        prelude::*,
        style::{Color, RGBAColor},
    };

    use super::*;
    use crate::spectra::SpectrumRecord;

    lazy_static! {
        static ref SERIES_COLOURS: [RGBAColor; 6] = [
            BLUE.mix(1.0),
            RED.mix(1.0),
            GREEN.mix(1.0),
            MAGENTA.mix(1.0),
            CYAN.mix(1.0),
            BLACK.mix(1.0),
        ];
    }

    fn draw_err<E: std::fmt::Display>(e: E) -> PlotError {
        PlotError::Draw(e.to_string())
    }

    /// Render labelled velocity-space curves to a PNG at `output`.
    pub fn render_series(
        series: &[VelocitySeries],
        options: &PlotOptions,
        output: &Path,
    ) -> Result<(), PlotError> {
        if series.is_empty() {
            return Err(PlotError::NoSeries);
        }

        let root = BitMapBackend::new(output, (options.width, options.height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let mut cc = ChartBuilder::on(&root)
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(
                options.x_range.0..options.x_range.1,
                options.y_range.0..options.y_range.1,
            )
            .map_err(draw_err)?;

        cc.configure_mesh()
            .x_desc("vrad (km/s)")
            .y_desc("flux (a.u.)")
            .light_line_style(&WHITE)
            .draw()
            .map_err(draw_err)?;

        for (i, s) in series.iter().enumerate() {
            let colour = SERIES_COLOURS[i % SERIES_COLOURS.len()].mix(s.opacity);
            cc.draw_series(LineSeries::new(
                s.velocities
                    .iter()
                    .zip(s.flux.iter())
                    .map(|(&x, &y)| (x, y)),
                colour,
            ))
            .map_err(draw_err)?
            .label(s.label.clone())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], colour)
            });
        }

        cc.configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .border_style(&BLACK)
            .background_style(WHITE.mix(0.8))
            .draw()
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
        Ok(())
    }

    /// Render one spectrum as flux vs. wavelength over its full range, with
    /// a title from the object name, date and observer.
    pub fn render_spectrum(
        record: &SpectrumRecord,
        options: &PlotOptions,
        output: &Path,
    ) -> Result<(), PlotError> {
        let (xmin, xmax) = (
            record.wavelengths[0],
            record.wavelengths[record.wavelengths.len() - 1],
        );
        let peak = record.flux.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let title = format!(
            "{} - {} - Observer: {}",
            record.header.object_name.as_deref().unwrap_or("?"),
            record.header.date_obs,
            record.header.observer.as_deref().unwrap_or("?"),
        );

        let root = BitMapBackend::new(output, (options.width, options.height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let mut cc = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 30))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(xmin..xmax, 0.0..peak * 1.05)
            .map_err(draw_err)?;

        cc.configure_mesh()
            .x_desc("Wavelength [A]")
            .y_desc("Flux (a.u.)")
            .light_line_style(&WHITE)
            .draw()
            .map_err(draw_err)?;

        cc.draw_series(LineSeries::new(
            record
                .wavelengths
                .iter()
                .zip(record.flux.iter())
                .map(|(&x, &y)| (x, y)),
            BLUE.mix(1.0),
        ))
        .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::spectra::tests::test_record;

    fn collection() -> SpectrumCollection {
        SpectrumCollection::from(vec![
            test_record(4000.0, 0.4, 6000),
            test_record(3800.0, 0.2, 4000),
        ])
    }

    #[test]
    fn normalized_flux_peaks_at_exactly_one() {
        let series = velocity_series(
            &collection(),
            0,
            crate::constants::H_BETA,
            LabelMode::Wavelength,
            1.0,
            1.0,
        )
        .unwrap();
        let peak = series.flux.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(peak, 1.0);
    }

    #[test]
    fn scale_factor_rescales_the_peak() {
        let series = velocity_series(
            &collection(),
            0,
            crate::constants::H_BETA,
            LabelMode::Wavelength,
            1.0,
            0.5,
        )
        .unwrap();
        let peak = series.flux.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert_abs_diff_eq!(peak, 0.5);
    }

    #[test]
    fn velocity_is_zero_at_the_rest_wavelength() {
        // Record 0 spans 4000..6399.6, so H-beta sits inside it.
        let series = velocity_series(
            &collection(),
            0,
            4861.0,
            LabelMode::Date,
            1.0,
            1.0,
        )
        .unwrap();
        // 4861.0 = 4000 + 0.4 * 2152.5, so the closest samples straddle 0.
        let min_abs = series
            .velocities
            .iter()
            .fold(f64::INFINITY, |m, &v| m.min(v.abs()));
        assert!(min_abs < 15.0, "closest sample was {min_abs} km/s away");
    }

    #[test]
    fn labels_follow_the_requested_mode() {
        let collection = collection();
        let date = velocity_series(&collection, 1, 4861.0, LabelMode::Date, 1.0, 1.0).unwrap();
        assert_eq!(date.label, "#1 - 2019-07-06T21:42:00");

        let wl =
            velocity_series(&collection, 1, 4861.0, LabelMode::Wavelength, 1.0, 1.0).unwrap();
        assert_eq!(wl.label, "#1 - 4861.0 A");

        let both = velocity_series(&collection, 1, 4861.0, LabelMode::Both, 1.0, 1.0).unwrap();
        assert_eq!(both.label, "#1 - 4861.0 A - 2019-07-06T21:42:00");
    }

    #[test]
    fn no_label_flags_is_a_configuration_error() {
        assert!(matches!(
            LabelMode::from_flags(false, false),
            Err(PlotError::NoLabel)
        ));
        assert_eq!(LabelMode::from_flags(true, true).unwrap(), LabelMode::Both);
    }

    #[test]
    fn bad_index_and_bad_opacity_are_rejected() {
        let collection = collection();
        assert!(matches!(
            velocity_series(&collection, 7, 4861.0, LabelMode::Date, 1.0, 1.0),
            Err(PlotError::BadIndex { index: 7, len: 2 })
        ));
        assert!(matches!(
            velocity_series(&collection, 0, 4861.0, LabelMode::Date, 1.5, 1.0),
            Err(PlotError::BadOpacity(_))
        ));
    }
}
