//! Loaders for impulse sample and pressure series CSV files.
//!
//! This module provides parsers for:
//! - Raw impulse sample files (two-column `time,value` rows, no header)
//! - Bucketed pressure series files (`second,value` rows, no header)
//!
//! Both formats are headerless two-column CSV; malformed rows are skipped
//! with a logged warning rather than aborting the whole file.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use csv::ReaderBuilder;
use log::warn;
use thiserror::Error;

/// Errors that can occur during file loading.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for loader operations.
pub type Result<T> = std::result::Result<T, LoaderError>;

/// A pressure series bucketed by integer second.
///
/// Keys are floored timestamps; values are the accumulated pressure for that
/// second. The underlying map is ordered, so iteration and serialization are
/// always ascending by second.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PressureSeries {
    buckets: BTreeMap<i64, f64>,
}

impl PressureSeries {
    /// Creates a new empty series.
    pub fn new() -> Self {
        Self {
            buckets: BTreeMap::new(),
        }
    }

    /// Adds a raw sample, flooring its timestamp to an integer second.
    pub fn add_sample(&mut self, time: f64, value: f64) {
        let second = time.floor() as i64;
        *self.buckets.entry(second).or_insert(0.0) += value;
    }

    /// Adds a value directly to an integer-second bucket.
    pub fn add_bucket(&mut self, second: i64, value: f64) {
        *self.buckets.entry(second).or_insert(0.0) += value;
    }

    /// Key-wise addition of another series into this one.
    pub fn merge(&mut self, other: &PressureSeries) {
        for (&second, &value) in &other.buckets {
            self.add_bucket(second, value);
        }
    }

    /// Returns the accumulated value for a bucket, if present.
    pub fn get(&self, second: i64) -> Option<f64> {
        self.buckets.get(&second).copied()
    }

    /// Returns the number of buckets in the series.
    #[inline]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Returns true if the series has no buckets.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Iterates over `(second, value)` pairs in ascending order.
    pub fn iter(&self) -> btree_map::Iter<'_, i64, f64> {
        self.buckets.iter()
    }

    /// Splits the series into parallel `(times, values)` vectors for plotting.
    pub fn points(&self) -> (Vec<f64>, Vec<f64>) {
        let mut times = Vec::with_capacity(self.buckets.len());
        let mut values = Vec::with_capacity(self.buckets.len());
        for (&second, &value) in &self.buckets {
            times.push(second as f64);
            values.push(value);
        }
        (times, values)
    }
}

impl FromIterator<(i64, f64)> for PressureSeries {
    fn from_iter<I: IntoIterator<Item = (i64, f64)>>(iter: I) -> Self {
        let mut series = PressureSeries::new();
        for (second, value) in iter {
            series.add_bucket(second, value);
        }
        series
    }
}

/// Parse a two-column CSV record into a `(time, value)` pair.
///
/// Returns `None` if either field is missing or fails to parse as a float.
fn parse_pair(record: &csv::StringRecord) -> Option<(f64, f64)> {
    let time: f64 = record.get(0)?.trim().parse().ok()?;
    let value: f64 = record.get(1)?.trim().parse().ok()?;
    Some((time, value))
}

/// Load raw `(time, value)` samples from a headerless two-column CSV file.
///
/// Malformed rows (wrong column count, non-numeric fields) are skipped with
/// a logged warning.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn load_samples<P: AsRef<Path>>(path: P) -> Result<Vec<(f64, f64)>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let mut samples = Vec::new();
    for result in reader.records() {
        let record = result?;
        match parse_pair(&record) {
            Some(pair) => samples.push(pair),
            None => {
                warn!(
                    "skipping malformed row in {}: {:?}",
                    path.display(),
                    record
                );
            }
        }
    }

    Ok(samples)
}

/// Load a pressure series from CSV, bucketing rows by floored timestamp.
///
/// Pressure files written by this pipeline already carry integer-second
/// keys, in which case bucketing is the identity; float keys from other
/// sources are floored and summed per second.
///
/// An existing but empty file yields an empty series. Use
/// [`load_series_or_empty`] when a missing file should also be treated as
/// empty (combiner semantics).
pub fn load_series<P: AsRef<Path>>(path: P) -> Result<PressureSeries> {
    let samples = load_samples(path)?;
    let mut series = PressureSeries::new();
    for (time, value) in samples {
        series.add_sample(time, value);
    }
    Ok(series)
}

/// Load a pressure series, treating a missing file as an empty series.
pub fn load_series_or_empty<P: AsRef<Path>>(path: P) -> Result<PressureSeries> {
    let path = path.as_ref();
    if !path.exists() {
        warn!("{} not found, treating as empty", path.display());
        return Ok(PressureSeries::new());
    }
    load_series(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_series_bucketing() {
        let mut series = PressureSeries::new();
        series.add_sample(0.2, 1.0);
        series.add_sample(0.4, 2.0);
        series.add_sample(1.1, 3.0);

        assert_eq!(series.len(), 2);
        assert_eq!(series.get(0), Some(3.0));
        assert_eq!(series.get(1), Some(3.0));
    }

    #[test]
    fn test_series_merge() {
        let mut a: PressureSeries = vec![(0, 1.0), (2, 2.0)].into_iter().collect();
        let b: PressureSeries = vec![(0, 0.5), (3, 4.0)].into_iter().collect();

        a.merge(&b);

        assert_eq!(a.get(0), Some(1.5));
        assert_eq!(a.get(2), Some(2.0));
        assert_eq!(a.get(3), Some(4.0));
    }

    #[test]
    fn test_points_ascending() {
        let series: PressureSeries = vec![(3, 1.0), (0, 2.0), (1, 3.0)].into_iter().collect();
        let (times, values) = series.points();

        assert_eq!(times, vec![0.0, 1.0, 3.0]);
        assert_eq!(values, vec![2.0, 3.0, 1.0]);
    }

    #[test]
    fn test_load_samples_skips_malformed() -> Result<()> {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "0.2,1.0").unwrap();
        writeln!(file, "garbage,row").unwrap();
        writeln!(file, "0.9").unwrap();
        writeln!(file, "1.1,3.0").unwrap();
        file.flush().unwrap();

        let samples = load_samples(file.path())?;
        assert_eq!(samples, vec![(0.2, 1.0), (1.1, 3.0)]);

        Ok(())
    }

    #[test]
    fn test_load_series_buckets_float_keys() -> Result<()> {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "0.2,1.0").unwrap();
        writeln!(file, "0.4,2.0").unwrap();
        writeln!(file, "1.1,3.0").unwrap();
        file.flush().unwrap();

        let series = load_series(file.path())?;
        assert_eq!(series.get(0), Some(3.0));
        assert_eq!(series.get(1), Some(3.0));

        Ok(())
    }

    #[test]
    fn test_load_series_or_empty_missing_file() {
        let series = load_series_or_empty("definitely_not_here.csv").unwrap();
        assert!(series.is_empty());
    }
}
