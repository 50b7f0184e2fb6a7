//! Visualization of pressure series.
//!
//! Renders one or more bucketed pressure series to a PNG using the plotters
//! library. Smoothed series are drawn as a fine-grained line with the raw
//! buckets overlaid as a semi-transparent scatter.

use std::path::Path;

use log::warn;
use plotters::prelude::*;
use plotters_bitmap::BitMapBackend;
use thiserror::Error;

use crate::config::PlotConfig;
use crate::core::loaders::PressureSeries;
use crate::core::transforms::{smooth_series, SmoothingLevel};

/// Errors that can occur during visualization.
#[derive(Error, Debug)]
pub enum VisualizationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Plotting error: {0}")]
    PlottingError(String),

    #[error("No plottable series")]
    NoSeries,
}

/// Result type for visualization operations.
pub type Result<T> = std::result::Result<T, VisualizationError>;

/// Color palette assigned to series in input order.
const SERIES_COLORS: &[(u8, u8, u8)] = &[
    (55, 126, 184),  // Blue
    (228, 26, 28),   // Red
    (77, 175, 74),   // Green
    (152, 78, 163),  // Purple
    (255, 127, 0),   // Orange
    (166, 86, 40),   // Brown
];

/// Alpha for the raw-bucket scatter overlay.
const SCATTER_ALPHA: f64 = 0.35;

/// Render pressure series to a PNG comparison plot.
///
/// For each named series: with smoothing enabled, the series is upsampled
/// and Gaussian-smoothed, drawn as a line, and its raw buckets overlaid as
/// scatter points; with `SmoothingLevel::None` the raw polyline is drawn.
/// Series that are empty or too short to smooth are skipped with a warning.
///
/// The y-axis bounds come from the plot config; the x-axis spans the data
/// with 5% padding. Labels accompany each series in the log output only
/// (text rendering is avoided, fonts may be unavailable headless).
pub fn plot_series(
    output_path: &Path,
    series: &[(String, PressureSeries)],
    level: SmoothingLevel,
    config: &PlotConfig,
) -> Result<()> {
    // Collect drawable series up front so axis bounds cover everything
    let mut drawable: Vec<(&str, Vec<f64>, Vec<f64>)> = Vec::with_capacity(series.len());
    for (name, s) in series {
        if s.is_empty() {
            warn!("no data in series '{}', skipping", name);
            continue;
        }
        let (times, values) = s.points();
        drawable.push((name.as_str(), times, values));
    }

    if drawable.is_empty() {
        return Err(VisualizationError::NoSeries);
    }

    let (x_min, x_max) = compute_x_bounds(&drawable);
    let x_padding = (x_max - x_min) * 0.05;

    let root = BitMapBackend::new(output_path, (config.width, config.height))
        .into_drawing_area();

    root.fill(&WHITE)
        .map_err(|e| VisualizationError::PlottingError(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .build_cartesian_2d(
            (x_min - x_padding)..(x_max + x_padding),
            config.y_min..config.y_max,
        )
        .map_err(|e| VisualizationError::PlottingError(e.to_string()))?;

    // Grid lines only; axis tick labels are text and are left out
    chart
        .configure_mesh()
        .x_labels(0)
        .y_labels(0)
        .draw()
        .map_err(|e| VisualizationError::PlottingError(e.to_string()))?;

    for (i, (name, times, values)) in drawable.iter().enumerate() {
        let (r, g, b) = SERIES_COLORS[i % SERIES_COLORS.len()];
        let color = RGBColor(r, g, b);

        match level.params() {
            None => {
                // Raw polyline, no smoothing
                chart
                    .draw_series(LineSeries::new(
                        times.iter().zip(values.iter()).map(|(&x, &y)| (x, y)),
                        color.stroke_width(2),
                    ))
                    .map_err(|e| VisualizationError::PlottingError(e.to_string()))?;
            }
            Some(params) => {
                let Some((x_fine, y_smooth)) = smooth_series(times, values, params) else {
                    warn!("series '{}' has fewer than two buckets, skipping", name);
                    continue;
                };

                chart
                    .draw_series(LineSeries::new(
                        x_fine.iter().zip(y_smooth.iter()).map(|(&x, &y)| (x, y)),
                        color.stroke_width(2),
                    ))
                    .map_err(|e| VisualizationError::PlottingError(e.to_string()))?;

                // Overlay the raw buckets
                let scatter_color = RGBAColor(r, g, b, SCATTER_ALPHA);
                chart
                    .draw_series(
                        times
                            .iter()
                            .zip(values.iter())
                            .map(|(&x, &y)| Circle::new((x, y), 3, scatter_color.filled())),
                    )
                    .map_err(|e| VisualizationError::PlottingError(e.to_string()))?;
            }
        }
    }

    root.present()
        .map_err(|e| VisualizationError::PlottingError(e.to_string()))?;

    Ok(())
}

/// Compute the min/max time across all drawable series.
fn compute_x_bounds(drawable: &[(&str, Vec<f64>, Vec<f64>)]) -> (f64, f64) {
    let mut x_min = f64::MAX;
    let mut x_max = f64::MIN;

    for (_, times, _) in drawable {
        for &t in times {
            if t < x_min {
                x_min = t;
            }
            if t > x_max {
                x_max = t;
            }
        }
    }

    if (x_max - x_min).abs() < f64::EPSILON {
        x_min -= 1.0;
        x_max += 1.0;
    }

    (x_min, x_max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_series(rows: &[(i64, f64)]) -> PressureSeries {
        rows.iter().copied().collect()
    }

    #[test]
    fn test_plot_smoothed_series() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("combined_wave.png");

        let series = vec![
            (
                "Square".to_string(),
                make_series(&[(0, 1.0), (1, 3.0), (2, 2.0), (3, 2.5)]),
            ),
            (
                "Rectangle".to_string(),
                make_series(&[(0, 0.5), (1, 1.5), (2, 1.0), (3, 2.0)]),
            ),
        ];

        plot_series(&path, &series, SmoothingLevel::Low, &PlotConfig::default()).unwrap();

        assert!(path.exists());
        assert!(path.metadata().unwrap().len() > 0);
    }

    #[test]
    fn test_plot_raw_series() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("raw.png");

        let series = vec![(
            "Square".to_string(),
            make_series(&[(0, 1.0), (1, 2.0), (2, 1.5)]),
        )];

        plot_series(&path, &series, SmoothingLevel::None, &PlotConfig::default()).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_plot_all_empty_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.png");

        let series = vec![("Square".to_string(), PressureSeries::new())];

        let result = plot_series(&path, &series, SmoothingLevel::Low, &PlotConfig::default());
        assert!(matches!(result, Err(VisualizationError::NoSeries)));
    }

    #[test]
    fn test_single_bucket_series_skipped_when_smoothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("short.png");

        // One plottable series plus one too short to smooth
        let series = vec![
            (
                "Square".to_string(),
                make_series(&[(0, 1.0), (1, 2.0), (2, 3.0)]),
            ),
            ("Stub".to_string(), make_series(&[(0, 1.0)])),
        ];

        plot_series(&path, &series, SmoothingLevel::Med, &PlotConfig::default()).unwrap();
        assert!(path.exists());
    }
}
