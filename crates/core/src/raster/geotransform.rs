//! Affine georeferencing of grid cells

use serde::{Deserialize, Serialize};

/// Affine transformation between cell indices and map coordinates.
///
/// ```text
/// x = origin_x + col * pixel_width + row * row_rotation
/// y = origin_y + col * col_rotation + row * pixel_height
/// ```
///
/// Regional statistics assume square cells without rotation; for north-up
/// grids `pixel_height` is negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    /// X coordinate of the upper-left corner
    pub origin_x: f64,
    /// Y coordinate of the upper-left corner
    pub origin_y: f64,
    /// Cell size in X
    pub pixel_width: f64,
    /// Cell size in Y, usually negative
    pub pixel_height: f64,
    /// Rotation about X axis (usually 0)
    pub row_rotation: f64,
    /// Rotation about Y axis (usually 0)
    pub col_rotation: f64,
}

impl GeoTransform {
    /// North-up transform with no rotation
    pub fn new(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
            row_rotation: 0.0,
            col_rotation: 0.0,
        }
    }

    /// North-up transform with square cells anchored at the upper-left corner
    pub fn square(origin_x: f64, origin_y: f64, cell_size: f64) -> Self {
        Self::new(origin_x, origin_y, cell_size, -cell_size)
    }

    /// Map coordinates of the centre of cell (col, row)
    pub fn pixel_to_geo(&self, col: usize, row: usize) -> (f64, f64) {
        self.fractional_to_geo(col as f64 + 0.5, row as f64 + 0.5)
    }

    /// Map coordinates of the upper-left corner of cell (col, row)
    pub fn pixel_to_geo_corner(&self, col: usize, row: usize) -> (f64, f64) {
        self.fractional_to_geo(col as f64, row as f64)
    }

    fn fractional_to_geo(&self, col: f64, row: f64) -> (f64, f64) {
        let x = self.origin_x + col * self.pixel_width + row * self.row_rotation;
        let y = self.origin_y + col * self.col_rotation + row * self.pixel_height;
        (x, y)
    }

    /// Fractional (col, row) of a map coordinate; `.floor()` gives the cell index.
    pub fn geo_to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        let det = self.pixel_width * self.pixel_height - self.row_rotation * self.col_rotation;

        if det.abs() < 1e-10 {
            return (f64::NAN, f64::NAN);
        }

        let dx = x - self.origin_x;
        let dy = y - self.origin_y;

        let col = (self.pixel_height * dx - self.row_rotation * dy) / det;
        let row = (-self.col_rotation * dx + self.pixel_width * dy) / det;

        (col, row)
    }

    /// Whether `other` puts every cell centre where this transform does, to
    /// within a millionth of a cell.
    pub fn is_aligned_with(&self, other: &GeoTransform) -> bool {
        const TOLERANCE: f64 = 1e-6;
        [(0, 0), (1, 0), (0, 1)].into_iter().all(|(col, row)| {
            let (x, y) = other.pixel_to_geo(col, row);
            let (c, r) = self.geo_to_pixel(x, y);
            (c - (col as f64 + 0.5)).abs() < TOLERANCE && (r - (row as f64 + 0.5)).abs() < TOLERANCE
        })
    }

    /// Cell size (square cells)
    pub fn cell_size(&self) -> f64 {
        self.pixel_width.abs()
    }

    /// Same origin, cells `factor` times larger
    pub fn coarsened(&self, factor: usize) -> Self {
        let f = factor as f64;
        Self {
            pixel_width: self.pixel_width * f,
            pixel_height: self.pixel_height * f,
            row_rotation: self.row_rotation * f,
            col_rotation: self.col_rotation * f,
            ..*self
        }
    }

    /// Extent of a grid of `cols` x `rows` cells
    pub fn bounds(&self, cols: usize, rows: usize) -> Bounds {
        let corners = [
            self.pixel_to_geo_corner(0, 0),
            self.pixel_to_geo_corner(cols, 0),
            self.pixel_to_geo_corner(0, rows),
            self.pixel_to_geo_corner(cols, rows),
        ];

        let mut bounds = Bounds {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        };
        for (x, y) in corners {
            bounds.min_x = bounds.min_x.min(x);
            bounds.min_y = bounds.min_y.min(y);
            bounds.max_x = bounds.max_x.max(x);
            bounds.max_y = bounds.max_y.max(y);
        }
        bounds
    }
}

impl Default for GeoTransform {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, -1.0)
    }
}

/// Axis-aligned extent in map coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Whether the two extents share any area.
    ///
    /// Extents that only touch along an edge do not intersect.
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min_x < other.max_x
            && other.min_x < self.max_x
            && self.min_y < other.max_y
            && other.min_y < self.max_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pixel_to_geo_roundtrip() {
        let gt = GeoTransform::new(100.0, 200.0, 10.0, -10.0);

        let (x, y) = gt.pixel_to_geo(5, 10);
        let (col, row) = gt.geo_to_pixel(x, y);

        assert_relative_eq!(col, 5.5, epsilon = 1e-10);
        assert_relative_eq!(row, 10.5, epsilon = 1e-10);
    }

    #[test]
    fn test_alignment() {
        let gt = GeoTransform::square(500.0, 1000.0, 10.0);
        assert!(gt.is_aligned_with(&gt));
        assert!(gt.is_aligned_with(&GeoTransform::square(500.0 + 1e-9, 1000.0, 10.0)));
        // three cells east
        assert!(!gt.is_aligned_with(&GeoTransform::square(530.0, 1000.0, 10.0)));
        // same corner, finer cells
        assert!(!gt.is_aligned_with(&GeoTransform::square(500.0, 1000.0, 5.0)));
        // south-up
        assert!(!gt.is_aligned_with(&GeoTransform::new(500.0, 1000.0, 10.0, 10.0)));
    }

    #[test]
    fn test_bounds() {
        let gt = GeoTransform::square(0.0, 100.0, 1.0);
        let b = gt.bounds(100, 50);

        assert_relative_eq!(b.min_x, 0.0, epsilon = 1e-10);
        assert_relative_eq!(b.min_y, 50.0, epsilon = 1e-10);
        assert_relative_eq!(b.max_x, 100.0, epsilon = 1e-10);
        assert_relative_eq!(b.max_y, 100.0, epsilon = 1e-10);
    }

    #[test]
    fn test_intersects() {
        let a = GeoTransform::square(0.0, 10.0, 1.0).bounds(10, 10);
        let b = GeoTransform::square(5.0, 15.0, 1.0).bounds(10, 10);
        let c = GeoTransform::square(10.0, 10.0, 1.0).bounds(10, 10);
        let d = GeoTransform::square(50.0, 50.0, 1.0).bounds(10, 10);

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        // shared edge only
        assert!(!a.intersects(&c));
        assert!(!a.intersects(&d));
    }

    #[test]
    fn test_coarsened_keeps_origin() {
        let gt = GeoTransform::square(3.0, 7.0, 2.0).coarsened(4);
        assert_relative_eq!(gt.origin_x, 3.0);
        assert_relative_eq!(gt.origin_y, 7.0);
        assert_relative_eq!(gt.cell_size(), 8.0);
        assert_relative_eq!(gt.pixel_height, -8.0);
    }
}
