//! Configuration types for the pressure pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::transforms::SmoothingLevel;

/// Configuration for the simulation box geometry.
///
/// The per-wall divisors are derived from the box edge length and the
/// runtime slit parameter `L` (see `processors::impulse::wall_divisors`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometryConfig {
    /// Edge length of the simulation box in meters
    #[serde(default = "default_edge_m")]
    pub edge_m: f64,
}

fn default_edge_m() -> f64 {
    0.09
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            edge_m: default_edge_m(),
        }
    }
}

/// Configuration for plot smoothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmoothingConfig {
    /// Smoothing level applied when the CLI does not specify one
    #[serde(default = "default_level")]
    pub default_level: SmoothingLevel,
}

fn default_level() -> SmoothingLevel {
    SmoothingLevel::Low
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            default_level: default_level(),
        }
    }
}

/// Configuration for the rendered comparison plot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotConfig {
    /// Output image width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    /// Output image height in pixels
    #[serde(default = "default_height")]
    pub height: u32,

    /// Lower y-axis bound
    #[serde(default)]
    pub y_min: f64,

    /// Upper y-axis bound
    #[serde(default = "default_y_max")]
    pub y_max: f64,

    /// Names assigned to input series in order
    #[serde(default = "default_series_labels")]
    pub series_labels: Vec<String>,
}

fn default_width() -> u32 {
    1600
}

fn default_height() -> u32 {
    960
}

fn default_y_max() -> f64 {
    5.0
}

fn default_series_labels() -> Vec<String> {
    vec!["Square".to_string(), "Rectangle".to_string()]
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            y_min: 0.0,
            y_max: default_y_max(),
            series_labels: default_series_labels(),
        }
    }
}

/// Main pipeline configuration combining all sub-configs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub geometry: GeometryConfig,

    #[serde(default)]
    pub smoothing: SmoothingConfig,

    #[serde(default)]
    pub plot: PlotConfig,
}

impl PipelineConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: PipelineConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a YAML file.
    pub fn to_yaml<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_geometry_config() {
        let config = GeometryConfig::default();
        assert!((config.edge_m - 0.09).abs() < 1e-12);
    }

    #[test]
    fn test_default_pipeline_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.plot.y_max, 5.0);
        assert_eq!(config.plot.series_labels.len(), 2);
        assert_eq!(config.smoothing.default_level, SmoothingLevel::Low);
    }

    #[test]
    fn test_yaml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");

        let mut config = PipelineConfig::default();
        config.geometry.edge_m = 0.12;
        config.plot.y_max = 8.0;
        config.to_yaml(&path).unwrap();

        let loaded = PipelineConfig::from_yaml(&path).unwrap();
        assert!((loaded.geometry.edge_m - 0.12).abs() < 1e-12);
        assert_eq!(loaded.plot.y_max, 8.0);
    }
}
