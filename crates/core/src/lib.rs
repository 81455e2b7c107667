//! # gwstats Core
//!
//! Core types for the gwstats geographically weighted statistics library.
//!
//! This crate provides:
//! - `Grid`: read access to georeferenced cells, whatever the storage
//! - `Raster`: the in-memory grid, also used for every derived output
//! - `GeoTransform` / `Bounds`: georeferencing and extents
//! - `Algorithm`: the common shape of every operation

pub mod error;
pub mod raster;

pub use error::{Error, Result};
pub use raster::{Bounds, DEFAULT_NODATA, GeoTransform, Grid, Raster};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::Algorithm;
    pub use crate::error::{Error, Result};
    pub use crate::raster::{Bounds, GeoTransform, Grid, Raster};
}

/// Core trait for all algorithms in gwstats.
///
/// Algorithms are pure functions from an input and parameters to an output.
pub trait Algorithm {
    /// Input type for the algorithm
    type Input;
    /// Output type for the algorithm
    type Output;
    /// Parameters controlling algorithm behavior
    type Params: Default;
    /// Error type for algorithm execution
    type Error: std::error::Error;

    /// Returns the algorithm name
    fn name(&self) -> &'static str;

    /// Returns a description of what the algorithm does
    fn description(&self) -> &'static str;

    /// Execute the algorithm
    fn execute(&self, input: Self::Input, params: Self::Params) -> std::result::Result<Self::Output, Self::Error>;

    /// Execute with default parameters
    fn execute_default(&self, input: Self::Input) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
