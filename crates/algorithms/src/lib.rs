//! # gwstats Algorithms
//!
//! Geographically weighted statistics over raster grids.
//!
//! ## Available Algorithm Categories
//!
//! - **statistics**: regional univariate and bivariate statistics within a
//!   distance-decay kernel
//! - **density**: multi-scale geometric density
//! - **algebra**: weighted addition, masking, rescaling and aggregation

pub mod algebra;
pub mod config;
pub mod density;
pub mod maybe_rayon;
pub mod statistics;

pub use config::GwsConfig;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::algebra::{Aggregation, Rescale, accumulate, add, aggregate, mask, normalise_to_range, rescale};
    pub use crate::config::GwsConfig;
    pub use crate::density::{DensityParams, GeometricDensity, geometric_density};
    pub use crate::statistics::{
        BivariateParams, BivariateStatistic, KernelSpec, OutputGrids, RegionBivariate, RegionUnivariate,
        Selection, Statistic, StatisticKind, UnivariateParams, region_bivariate_statistics,
        region_univariate_statistics,
    };
    pub use gwstats_core::prelude::*;
}
