//! Writer for bucketed pressure series CSV files.
//!
//! Output format matches the loader's expectations: headerless
//! `second,value` rows, ascending by second. Values use the shortest
//! round-trip float formatting so that a write/read cycle preserves them
//! exactly.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use thiserror::Error;

use super::loaders::PressureSeries;

/// Errors that can occur during write operations.
#[derive(Error, Debug)]
pub enum WriteError {
    /// Failed to create parent directories.
    #[error("failed to create parent directories for '{path}': {source}")]
    CreateDirectory {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create or open file for writing.
    #[error("failed to create file '{path}': {source}")]
    CreateFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV writing error.
    #[error("CSV write error for '{path}': {source}")]
    CsvError {
        path: String,
        #[source]
        source: csv::Error,
    },

    /// Failed to flush buffered data.
    #[error("failed to write to file '{path}': {source}")]
    WriteFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for write operations.
pub type Result<T> = std::result::Result<T, WriteError>;

/// Creates parent directories for a file path if they don't exist.
fn ensure_parent_dirs(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| WriteError::CreateDirectory {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
    }
    Ok(())
}

/// Write a pressure series to CSV, one `second,value` row per bucket.
///
/// Rows are emitted in ascending bucket order. An empty series produces an
/// empty file (still created), matching the combiner's contract. Parent
/// directories are created as needed.
///
/// # Errors
///
/// Returns an error if directories or the file cannot be created, or a row
/// cannot be written.
pub fn write_series_csv(path: &Path, series: &PressureSeries) -> Result<()> {
    ensure_parent_dirs(path)?;

    let file = File::create(path).map_err(|e| WriteError::CreateFile {
        path: path.display().to_string(),
        source: e,
    })?;
    let buf_writer = BufWriter::new(file);
    let mut csv_writer = csv::Writer::from_writer(buf_writer);

    let path_str = path.display().to_string();

    for (second, value) in series.iter() {
        csv_writer
            .write_record(&[second.to_string(), value.to_string()])
            .map_err(|e| WriteError::CsvError {
                path: path_str.clone(),
                source: e,
            })?;
    }

    csv_writer.flush().map_err(|e| WriteError::WriteFile {
        path: path_str,
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::loaders::load_series;
    use std::fs;
    use tempfile::tempdir;

    fn create_test_series() -> PressureSeries {
        vec![(2, 0.75), (0, 1.5), (1, 2.25)].into_iter().collect()
    }

    #[test]
    fn test_write_series_sorted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pressure_0.csv");

        write_series_csv(&path, &create_test_series()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(lines, vec!["0,1.5", "1,2.25", "2,0.75"]);
    }

    #[test]
    fn test_write_empty_series_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pressure_empty.csv");

        write_series_csv(&path, &PressureSeries::new()).unwrap();

        assert!(path.exists());
        assert!(fs::read_to_string(&path).unwrap().is_empty());
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("out").join("pressure.csv");

        write_series_csv(&path, &create_test_series()).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_round_trip_preserves_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("round_trip.csv");

        let mut series = PressureSeries::new();
        series.add_bucket(0, 1.0 / 3.0);
        series.add_bucket(7, 2.0e-9);
        series.add_bucket(12, 123456.789);

        write_series_csv(&path, &series).unwrap();
        let loaded = load_series(&path).unwrap();

        assert_eq!(loaded.len(), series.len());
        for (second, value) in series.iter() {
            let read_back = loaded.get(*second).unwrap();
            assert!((read_back - value).abs() < 1e-12);
        }
    }
}
