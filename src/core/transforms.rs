//! Smoothing transforms for pressure series visualization.
//!
//! This module provides the numeric pieces behind the plot renderer:
//! linear-interpolation upsampling onto a uniform time grid, a normalized
//! Gaussian kernel, and "same"-mode convolution. Named smoothing levels map
//! to fixed (upsample, kernel) presets.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Named smoothing level selectable on the CLI or in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SmoothingLevel {
    /// Plot the raw series unchanged
    None,
    /// Gentle smoothing
    Low,
    /// Moderate smoothing
    Med,
    /// Strong smoothing
    High,
}

/// Upsampling and kernel parameters for one smoothing level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingParams {
    /// Number of points on the uniform upsampled grid
    pub upsample_points: usize,
    /// Gaussian kernel width in samples (bumped to odd if even)
    pub kernel_width: usize,
    /// Gaussian kernel standard deviation in samples
    pub sigma: f64,
}

impl SmoothingLevel {
    /// Returns the preset parameters for this level, or `None` for the
    /// raw (unsmoothed) level.
    pub fn params(self) -> Option<SmoothingParams> {
        match self {
            SmoothingLevel::None => None,
            SmoothingLevel::Low => Some(SmoothingParams {
                upsample_points: 300,
                kernel_width: 5,
                sigma: 0.8,
            }),
            SmoothingLevel::Med => Some(SmoothingParams {
                upsample_points: 500,
                kernel_width: 7,
                sigma: 1.6,
            }),
            SmoothingLevel::High => Some(SmoothingParams {
                upsample_points: 800,
                kernel_width: 11,
                sigma: 3.0,
            }),
        }
    }
}

/// Build a normalized Gaussian kernel.
///
/// Even widths are bumped to the next odd value so the kernel has a center
/// sample. The returned weights sum to 1.
pub fn gaussian_kernel(width: usize, sigma: f64) -> Vec<f64> {
    let width = if width % 2 == 0 { width + 1 } else { width };
    let half = (width / 2) as i64;

    let mut kernel = Vec::with_capacity(width);
    for i in -half..=half {
        let x = i as f64 / sigma;
        kernel.push((-0.5 * x * x).exp());
    }

    let sum: f64 = kernel.iter().sum();
    for k in &mut kernel {
        *k /= sum;
    }
    kernel
}

/// Generate `n` evenly spaced values from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![start];
    }
    let step = (end - start) / (n - 1) as f64;
    (0..n).map(|i| start + step * i as f64).collect()
}

/// Piecewise-linear interpolation of `(xs, ys)` at the query points `x_fine`.
///
/// Query points outside the data range are clamped to the edge values.
/// `xs` must be ascending (bucketed series iterate in key order).
pub fn interp_linear(x_fine: &[f64], xs: &[f64], ys: &[f64]) -> Vec<f64> {
    debug_assert_eq!(xs.len(), ys.len(), "xs and ys must have same length");

    let n = xs.len();
    let mut out = Vec::with_capacity(x_fine.len());

    for &xq in x_fine {
        if n == 0 {
            break;
        }
        if xq <= xs[0] {
            out.push(ys[0]);
            continue;
        }
        if xq >= xs[n - 1] {
            out.push(ys[n - 1]);
            continue;
        }

        // First index with xs[i] > xq; xq lies in [xs[i-1], xs[i])
        let i = xs.partition_point(|&x| x <= xq);
        let (x0, x1) = (xs[i - 1], xs[i]);
        let (y0, y1) = (ys[i - 1], ys[i]);
        let t = (xq - x0) / (x1 - x0);
        out.push(y0 + t * (y1 - y0));
    }

    out
}

/// Convolve a signal with a kernel, keeping the input length ("same" mode).
///
/// The signal is zero-padded at the edges. The kernel is applied centered;
/// Gaussian kernels are symmetric, so flipping is immaterial.
pub fn convolve_same(signal: &[f64], kernel: &[f64]) -> Vec<f64> {
    let n = signal.len();
    let k = kernel.len();
    let half = (k / 2) as i64;

    let mut out = Vec::with_capacity(n);
    for i in 0..n as i64 {
        let mut acc = 0.0;
        for (j, &w) in kernel.iter().enumerate() {
            let idx = i + j as i64 - half;
            if idx >= 0 && idx < n as i64 {
                acc += signal[idx as usize] * w;
            }
        }
        out.push(acc);
    }
    out
}

/// Upsample a series onto a uniform grid and smooth it with a Gaussian.
///
/// Returns the `(x_fine, y_smooth)` pair, or `None` if the series has fewer
/// than two points and cannot be interpolated.
pub fn smooth_series(
    times: &[f64],
    values: &[f64],
    params: SmoothingParams,
) -> Option<(Vec<f64>, Vec<f64>)> {
    if times.len() < 2 {
        return None;
    }

    let x_fine = linspace(times[0], times[times.len() - 1], params.upsample_points);
    let y_interp = interp_linear(&x_fine, times, values);
    let kernel = gaussian_kernel(params.kernel_width, params.sigma);
    let y_smooth = convolve_same(&y_interp, &kernel);

    Some((x_fine, y_smooth))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gaussian_kernel_normalized() {
        let kernel = gaussian_kernel(5, 0.8);
        assert_eq!(kernel.len(), 5);
        let sum: f64 = kernel.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
        // Symmetric around the center
        assert!((kernel[0] - kernel[4]).abs() < 1e-12);
        assert!((kernel[1] - kernel[3]).abs() < 1e-12);
        assert!(kernel[2] > kernel[1]);
    }

    #[test]
    fn test_gaussian_kernel_even_width_bumped() {
        let kernel = gaussian_kernel(4, 1.0);
        assert_eq!(kernel.len(), 5);
    }

    #[test]
    fn test_linspace_endpoints() {
        let grid = linspace(0.0, 10.0, 5);
        assert_eq!(grid, vec![0.0, 2.5, 5.0, 7.5, 10.0]);
    }

    #[test]
    fn test_interp_linear() {
        let xs = vec![0.0, 1.0, 3.0];
        let ys = vec![0.0, 2.0, 6.0];

        let out = interp_linear(&[0.0, 0.5, 2.0, 3.0], &xs, &ys);
        assert_eq!(out, vec![0.0, 1.0, 4.0, 6.0]);
    }

    #[test]
    fn test_interp_linear_clamps_out_of_range() {
        let xs = vec![1.0, 2.0];
        let ys = vec![5.0, 7.0];

        let out = interp_linear(&[0.0, 3.0], &xs, &ys);
        assert_eq!(out, vec![5.0, 7.0]);
    }

    #[test]
    fn test_convolve_same_length_and_interior() {
        let signal = vec![2.0; 50];
        let kernel = gaussian_kernel(5, 0.8);

        let out = convolve_same(&signal, &kernel);
        assert_eq!(out.len(), 50);
        // Away from the zero-padded edges a normalized kernel preserves a
        // constant signal
        assert!((out[25] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_smooth_series_too_short() {
        let result = smooth_series(&[1.0], &[2.0], SmoothingLevel::Low.params().unwrap());
        assert!(result.is_none());
    }

    #[test]
    fn test_smooth_series_grid_spans_input() {
        let times = vec![0.0, 1.0, 2.0, 3.0];
        let values = vec![1.0, 3.0, 2.0, 4.0];

        let (x_fine, y_smooth) =
            smooth_series(&times, &values, SmoothingLevel::Med.params().unwrap()).unwrap();

        assert_eq!(x_fine.len(), 500);
        assert_eq!(y_smooth.len(), 500);
        assert_eq!(x_fine[0], 0.0);
        assert_eq!(*x_fine.last().unwrap(), 3.0);
    }

    #[test]
    fn test_none_level_has_no_params() {
        assert!(SmoothingLevel::None.params().is_none());
        assert!(SmoothingLevel::High.params().is_some());
    }
}
