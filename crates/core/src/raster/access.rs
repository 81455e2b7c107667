//! Read access to grid cells, independent of storage

use super::{Bounds, GeoTransform};

/// Read-only view of a georeferenced grid of `f64` cells.
///
/// Algorithms are written against this trait so the caller can choose the
/// storage behind it (in-memory [`Raster`](super::Raster), chunked, memory
/// mapped). Implementations only need to answer in-range reads in bounded
/// time; out-of-range handling and no-data checks come for free.
pub trait Grid {
    /// Number of rows
    fn rows(&self) -> usize;

    /// Number of columns
    fn cols(&self) -> usize;

    /// No-data sentinel of this grid
    fn nodata(&self) -> f64;

    /// Value at an in-range cell
    fn value(&self, row: usize, col: usize) -> f64;

    /// Georeferencing of the grid
    fn transform(&self) -> &GeoTransform;

    /// Name used when naming derived grids
    fn name(&self) -> &str {
        ""
    }

    /// Dimensions as (rows, cols)
    fn shape(&self) -> (usize, usize) {
        (self.rows(), self.cols())
    }

    /// Cell size (square cells)
    fn cell_size(&self) -> f64 {
        self.transform().cell_size()
    }

    /// Extent in map coordinates
    fn bounds(&self) -> Bounds {
        self.transform().bounds(self.cols(), self.rows())
    }

    /// Whether `value` is this grid's sentinel (NaN always counts as no-data)
    fn is_nodata(&self, value: f64) -> bool {
        value.is_nan() || value == self.nodata()
    }

    /// Value at a possibly out-of-range cell; outside the grid reads the sentinel.
    fn cell(&self, row: isize, col: isize) -> f64 {
        if row < 0 || col < 0 || row as usize >= self.rows() || col as usize >= self.cols() {
            return self.nodata();
        }
        self.value(row as usize, col as usize)
    }

    /// Valid value at a possibly out-of-range cell
    fn valid(&self, row: isize, col: isize) -> Option<f64> {
        let v = self.cell(row, col);
        if self.is_nodata(v) { None } else { Some(v) }
    }

    /// Number of cells holding data
    fn valid_count(&self) -> usize {
        let mut count = 0;
        for row in 0..self.rows() {
            for col in 0..self.cols() {
                if !self.is_nodata(self.value(row, col)) {
                    count += 1;
                }
            }
        }
        count
    }
}

impl<G: Grid + ?Sized> Grid for &G {
    fn rows(&self) -> usize {
        (**self).rows()
    }

    fn cols(&self) -> usize {
        (**self).cols()
    }

    fn nodata(&self) -> f64 {
        (**self).nodata()
    }

    fn value(&self, row: usize, col: usize) -> f64 {
        (**self).value(row, col)
    }

    fn transform(&self) -> &GeoTransform {
        (**self).transform()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
