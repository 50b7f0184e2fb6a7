//! Post-processing pipeline for simulated wall-impulse data.
//!
//! This crate provides tools for:
//! - Converting raw per-wall impulse CSV samples into time-bucketed pressure series
//! - Combining pairs of pressure series by key-wise addition
//! - Rendering smoothed comparison plots (upsampling + Gaussian convolution) to PNG
//!
//! # Example
//!
//! ```no_run
//! use pressure_pipeline::core::loaders::load_series;
//! use pressure_pipeline::core::transforms::{smooth_series, SmoothingLevel};
//!
//! let series = load_series("pressure_01.csv").unwrap();
//! let (times, values) = series.points();
//! if let Some(params) = SmoothingLevel::Low.params() {
//!     let smoothed = smooth_series(&times, &values, params);
//! }
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod processors;
pub mod visualization;

pub use config::{GeometryConfig, PipelineConfig, PlotConfig, SmoothingConfig};
pub use core::loaders::PressureSeries;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
