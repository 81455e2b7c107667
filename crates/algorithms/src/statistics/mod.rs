//! Geographically weighted regional statistics
//!
//! - **kernel**: distance-decay weights and their normalisation totals
//! - **window**: sliding and direct kernel windows over a grid
//! - **selection**: statistic tokens resolved with their dependencies
//! - **moments**: per-window accumulators
//! - **univariate**: sums, means and moments of one grid
//! - **bivariate**: differences, correlation and z-scores of two grids
//! - **output**: named collection of derived grids

pub mod kernel;
pub mod window;
pub mod selection;
pub mod moments;
pub mod univariate;
pub mod bivariate;
pub mod output;

pub use bivariate::{BivariateParams, BivariateStatistic, RegionBivariate, region_bivariate_statistics};
pub use kernel::{KernelSpec, KernelTotals, KernelWeights, kernel_parameters, kernel_weight};
pub use moments::signed_cube_root;
pub use output::OutputGrids;
pub use selection::{Selection, StatisticKind};
pub use univariate::{RegionUnivariate, SUM_WEIGHT, Statistic, UnivariateParams, region_univariate_statistics};
pub use window::Window;
