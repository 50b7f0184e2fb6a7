//! Impulse-to-pressure conversion.
//!
//! Reads `impulse_<id>.csv` files, divides each impulse by a wall-specific
//! divisor derived from the slit parameter `L`, buckets the results by
//! integer second, and writes `pressure_<id>.csv` files.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};
use regex::Regex;
use thiserror::Error;

use crate::config::GeometryConfig;
use crate::core::loaders::{self, PressureSeries};
use crate::core::writers;

/// Errors that can occur during impulse processing.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("divisor for wall {wall} is exactly zero (would produce inf/NaN pressures)")]
    ZeroDivisor { wall: u32 },

    #[error("no divisor defined for '{name}' (unrecognized wall id)")]
    MissingDivisor { name: String },

    #[error(transparent)]
    Load(#[from] loaders::LoaderError),
}

/// Outcome of processing a single impulse file.
#[derive(Debug)]
pub struct ProcessedFile {
    /// Source impulse file.
    pub source: PathBuf,
    /// Written pressure file.
    pub output: PathBuf,
    /// Wall id parsed from the filename, if any.
    pub wall_id: Option<u32>,
    /// Number of integer-second buckets written.
    pub buckets: usize,
}

/// Compute the per-wall divisor table from the slit parameter `L`.
///
/// Walls 0 and 1 span three box edges plus half the remaining slit gap;
/// walls 2 and 3 span two edges plus the slit itself:
///
/// - walls 0, 1: `3E + (E - L) / 2`
/// - walls 2, 3: `2E + L`
///
/// where `E` is the box edge length from the geometry config.
pub fn wall_divisors(l: f64, geometry: &GeometryConfig) -> HashMap<u32, f64> {
    let e = geometry.edge_m;
    let long_side = 3.0 * e + (e - l) / 2.0;
    let short_side = 2.0 * e + l;

    let mut divisors = HashMap::new();
    divisors.insert(0, long_side);
    divisors.insert(1, long_side);
    divisors.insert(2, short_side);
    divisors.insert(3, short_side);
    divisors
}

/// Parse the wall id from an impulse file stem (`impulse_3` -> `3`).
///
/// Returns `None` for stems whose suffix is not an integer; such files are
/// still processed and written to the generic fallback output name.
fn parse_wall_id(stem: &str) -> Option<u32> {
    let pattern = Regex::new(r"(?i)^impulse[_-](\d+)$").unwrap();
    pattern
        .captures(stem)
        .and_then(|captures| captures.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Output filename for a wall id (`pressure_<id>.csv`, or the generic
/// fallback when the id could not be parsed).
fn output_name(wall_id: Option<u32>) -> String {
    match wall_id {
        Some(id) => format!("pressure_{}.csv", id),
        None => "pressure_unknown.csv".to_string(),
    }
}

/// Find `impulse_*.csv` files in a directory, sorted by path.
///
/// Returns each file together with its parsed wall id.
pub fn find_impulse_files(directory: &Path) -> Vec<(PathBuf, Option<u32>)> {
    let mut csv_files: Vec<PathBuf> = fs::read_dir(directory)
        .into_iter()
        .flatten()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .map(|ext| ext.eq_ignore_ascii_case("csv"))
                .unwrap_or(false)
        })
        .filter(|path| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .map(|stem| stem.to_ascii_lowercase().starts_with("impulse_"))
                .unwrap_or(false)
        })
        .collect();

    csv_files.sort();

    csv_files
        .into_iter()
        .map(|path| {
            let wall_id = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(parse_wall_id);
            (path, wall_id)
        })
        .collect()
}

/// Convert one impulse file into a bucketed pressure series.
///
/// Every impulse value is divided by the wall's divisor before bucketing.
/// A zero divisor is rejected up front; a file with samples but no divisor
/// (unparsable wall id) fails on its first sample, so an empty unknown-id
/// file still falls through to an empty fallback output.
pub fn process_impulse_file(
    path: &Path,
    wall_id: Option<u32>,
    divisors: &HashMap<u32, f64>,
) -> std::result::Result<PressureSeries, ProcessError> {
    let divisor = wall_id.and_then(|id| divisors.get(&id).copied());

    if let (Some(id), Some(d)) = (wall_id, divisor) {
        if d == 0.0 {
            return Err(ProcessError::ZeroDivisor { wall: id });
        }
    }

    let samples = loaders::load_samples(path)?;

    let mut series = PressureSeries::new();
    for (time, impulse) in samples {
        let d = divisor.ok_or_else(|| ProcessError::MissingDivisor {
            name: path.display().to_string(),
        })?;
        series.add_sample(time, impulse / d);
    }

    Ok(series)
}

/// Process all impulse files in a directory.
///
/// Writes one `pressure_<id>.csv` per input file into `output_dir` and
/// returns a per-file summary. Processing is fatal on the first divisor
/// error; individual malformed rows are skipped by the loader.
pub fn process_directory(
    input_dir: &Path,
    output_dir: &Path,
    l: f64,
    geometry: &GeometryConfig,
) -> Result<Vec<ProcessedFile>> {
    let divisors = wall_divisors(l, geometry);
    let files = find_impulse_files(input_dir);

    if files.is_empty() {
        warn!("no impulse_*.csv files found in {}", input_dir.display());
        return Ok(Vec::new());
    }

    let mut results = Vec::with_capacity(files.len());
    for (path, wall_id) in files {
        if wall_id.is_none() {
            warn!(
                "couldn't parse wall id from '{}', writing to fallback output",
                path.display()
            );
        }

        let series = process_impulse_file(&path, wall_id, &divisors)
            .with_context(|| format!("processing {}", path.display()))?;

        let output = output_dir.join(output_name(wall_id));
        writers::write_series_csv(&output, &series)
            .with_context(|| format!("writing {}", output.display()))?;

        info!(
            "created {} from {} ({} buckets)",
            output.display(),
            path.display(),
            series.len()
        );

        results.push(ProcessedFile {
            source: path,
            output,
            wall_id,
            buckets: series.len(),
        });
    }

    Ok(results)
}
