//! Core data structures and flat-file I/O for pressure series.

pub mod loaders;
pub mod transforms;
pub mod writers;
