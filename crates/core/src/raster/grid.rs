//! In-memory raster grid

use crate::error::{Error, Result};
use crate::raster::{GeoTransform, Grid};
use ndarray::Array2;

/// Sentinel used when a grid is created without an explicit one
pub const DEFAULT_NODATA: f64 = -9999.0;

/// A georeferenced, in-memory 2D grid of `f64` cells.
///
/// Cells equal to the no-data sentinel (or NaN) carry no measurement and are
/// skipped by every statistic.
///
/// # Example
///
/// ```ignore
/// use gwstats_core::Raster;
///
/// let mut raster = Raster::new(100, 100).with_name("elevation");
/// raster.set(10, 20, 42.0)?;
/// let value = raster.get(10, 20)?;
/// ```
#[derive(Debug, Clone)]
pub struct Raster {
    /// Cell values in row-major order (row, col)
    data: Array2<f64>,
    /// Affine transformation
    transform: GeoTransform,
    /// No-data sentinel
    nodata: f64,
    /// Name used when naming derived grids
    name: String,
}

impl Raster {
    /// Create a new raster filled with zeros
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::from_array(Array2::zeros((rows, cols)))
    }

    /// Create a new raster filled with a specific value
    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Self::from_array(Array2::from_elem((rows, cols), value))
    }

    /// Create a raster from row-major data
    pub fn from_vec(data: Vec<f64>, rows: usize, cols: usize) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::InvalidDimensions {
                width: cols,
                height: rows,
            });
        }

        let array = Array2::from_shape_vec((rows, cols), data)
            .map_err(|e| Error::Other(e.to_string()))?;

        Ok(Self::from_array(array))
    }

    /// Create a raster from an ndarray
    pub fn from_array(data: Array2<f64>) -> Self {
        Self {
            data,
            transform: GeoTransform::default(),
            nodata: DEFAULT_NODATA,
            name: String::new(),
        }
    }

    /// Allocate a raster filled with `value`, reporting allocation failure
    /// instead of aborting.
    pub fn try_filled(rows: usize, cols: usize, value: f64) -> Result<Self> {
        let cells = rows
            .checked_mul(cols)
            .ok_or(Error::ResourceExhausted { what: "raster", cells: usize::MAX })?;

        let mut buf = Vec::new();
        buf.try_reserve_exact(cells)
            .map_err(|_| Error::ResourceExhausted { what: "raster", cells })?;
        buf.resize(cells, value);

        Self::from_vec(buf, rows, cols)
    }

    /// Allocate an output grid with the shape and georeferencing of `template`,
    /// every cell set to `nodata`.
    pub fn nodata_like<G: Grid + ?Sized>(template: &G, nodata: f64) -> Result<Self> {
        let mut raster = Self::try_filled(template.rows(), template.cols(), nodata)?;
        raster.transform = *template.transform();
        raster.nodata = nodata;
        Ok(raster)
    }

    /// Builder: set the name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builder: set the geotransform
    pub fn with_transform(mut self, transform: GeoTransform) -> Self {
        self.transform = transform;
        self
    }

    /// Builder: set the no-data sentinel
    pub fn with_nodata(mut self, nodata: f64) -> Self {
        self.nodata = nodata;
        self
    }

    // Dimensions

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the raster is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    // Data access

    /// Get value at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Result<f64> {
        self.data
            .get((row, col))
            .copied()
            .ok_or(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            })
    }

    /// Set value at (row, col)
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        let (rows, cols) = self.shape();
        match self.data.get_mut((row, col)) {
            Some(cell) => {
                *cell = value;
                Ok(())
            }
            None => Err(Error::IndexOutOfBounds { row, col, rows, cols }),
        }
    }

    /// Get a reference to the underlying array
    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    /// Get a mutable reference to the underlying array
    pub fn data_mut(&mut self) -> &mut Array2<f64> {
        &mut self.data
    }

    // Metadata

    /// Get the geotransform
    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    /// Get the no-data sentinel
    pub fn nodata(&self) -> f64 {
        self.nodata
    }

    /// Grid name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cell size (assumes square cells)
    pub fn cell_size(&self) -> f64 {
        self.transform.cell_size()
    }

    /// Whether `value` is no-data for this raster
    pub fn is_nodata(&self, value: f64) -> bool {
        value.is_nan() || value == self.nodata
    }
}

impl Grid for Raster {
    fn rows(&self) -> usize {
        self.data.nrows()
    }

    fn cols(&self) -> usize {
        self.data.ncols()
    }

    fn nodata(&self) -> f64 {
        self.nodata
    }

    fn value(&self, row: usize, col: usize) -> f64 {
        self.data[(row, col)]
    }

    fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_creation() {
        let raster = Raster::new(100, 200);
        assert_eq!(raster.rows(), 100);
        assert_eq!(raster.cols(), 200);
        assert_eq!(raster.shape(), (100, 200));
        assert_eq!(raster.nodata(), DEFAULT_NODATA);
    }

    #[test]
    fn test_raster_access() {
        let mut raster = Raster::new(10, 10);
        raster.set(5, 5, 42.0).unwrap();
        assert_eq!(raster.get(5, 5).unwrap(), 42.0);
        assert!(raster.set(10, 0, 1.0).is_err());
        assert!(raster.get(0, 10).is_err());
    }

    #[test]
    fn test_from_vec_dimension_check() {
        assert!(Raster::from_vec(vec![1.0; 5], 2, 3).is_err());
        let r = Raster::from_vec((0..6).map(f64::from).collect(), 2, 3).unwrap();
        assert_eq!(r.get(1, 0).unwrap(), 3.0);
    }

    #[test]
    fn test_nodata_like_copies_georeferencing() {
        let src = Raster::new(3, 4).with_transform(GeoTransform::square(10.0, 20.0, 5.0));
        let out = Raster::nodata_like(&src, -5.0).unwrap();
        assert_eq!(out.shape(), (3, 4));
        assert_eq!(*out.transform(), *src.transform());
        assert!(out.data().iter().all(|&v| v == -5.0));
        assert_eq!(Grid::valid_count(&out), 0);
    }
}
