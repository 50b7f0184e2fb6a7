//! Batch processors for the pressure pipeline.
//!
//! - [`impulse`]: impulse-to-pressure conversion with per-wall divisors
//! - [`combine`]: key-wise summation of pressure series pairs

pub mod combine;
pub mod impulse;
