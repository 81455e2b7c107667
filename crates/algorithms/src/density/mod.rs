//! Multi-scale density of valid data
//!
//! - **geometric**: block-pyramid density at doubling scales

mod geometric;

pub use geometric::{DensityParams, GeometricDensity, geometric_density, octave_count};
