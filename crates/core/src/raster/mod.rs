//! Raster data structures and grid access

mod access;
mod geotransform;
mod grid;

pub use access::Grid;
pub use geotransform::{Bounds, GeoTransform};
pub use grid::{DEFAULT_NODATA, Raster};
