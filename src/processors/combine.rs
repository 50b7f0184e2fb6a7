//! Pair combination of pressure series.
//!
//! Sums two bucketed series key-wise and writes the result. Missing inputs
//! are treated as empty series, and the output file is written even when
//! both inputs are empty.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};

use crate::core::loaders::{load_series_or_empty, PressureSeries};
use crate::core::writers::write_series_csv;

/// The standard wall pairings: opposite walls 0+1 and 2+3.
pub fn default_pairs(directory: &Path) -> Vec<(PathBuf, PathBuf, PathBuf)> {
    vec![
        (
            directory.join("pressure_0.csv"),
            directory.join("pressure_1.csv"),
            directory.join("pressure_01.csv"),
        ),
        (
            directory.join("pressure_2.csv"),
            directory.join("pressure_3.csv"),
            directory.join("pressure_23.csv"),
        ),
    ]
}

/// Combine two pressure files into one by key-wise addition.
///
/// Returns the combined series. Missing inputs load as empty with a warning;
/// the output is always written, even if empty.
pub fn combine_pair(in_a: &Path, in_b: &Path, out_path: &Path) -> Result<PressureSeries> {
    let mut combined = load_series_or_empty(in_a)
        .with_context(|| format!("reading {}", in_a.display()))?;
    let b = load_series_or_empty(in_b)
        .with_context(|| format!("reading {}", in_b.display()))?;

    combined.merge(&b);

    if combined.is_empty() {
        warn!(
            "no data found in {} or {}, writing empty {}",
            in_a.display(),
            in_b.display(),
            out_path.display()
        );
    }

    write_series_csv(out_path, &combined)
        .with_context(|| format!("writing {}", out_path.display()))?;

    info!("wrote {} ({} seconds)", out_path.display(), combined.len());

    Ok(combined)
}

/// Run `combine_pair` over the standard wall pairings in a directory.
///
/// Returns `(output path, bucket count)` per pair.
pub fn combine_default_pairs(directory: &Path) -> Result<Vec<(PathBuf, usize)>> {
    let mut results = Vec::new();
    for (a, b, out) in default_pairs(directory) {
        let combined = combine_pair(&a, &b, &out)?;
        results.push((out, combined.len()));
    }
    Ok(results)
}
