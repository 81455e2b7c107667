//! Named collection of derived grids

use gwstats_core::Raster;

/// Ordered collection of output grids, each named after the statistic and
/// the source grid(s) it was derived from.
#[derive(Debug, Clone, Default)]
pub struct OutputGrids {
    grids: Vec<Raster>,
}

impl OutputGrids {
    /// Empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a grid; its name identifies it in the collection
    pub fn push(&mut self, grid: Raster) {
        self.grids.push(grid);
    }

    /// Grid with the given name
    pub fn get(&self, name: &str) -> Option<&Raster> {
        self.grids.iter().find(|g| g.name() == name)
    }

    /// Names in output order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.grids.iter().map(|g| g.name())
    }

    /// (name, grid) pairs in output order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Raster)> {
        self.grids.iter().map(|g| (g.name(), g))
    }

    /// Number of grids
    pub fn len(&self) -> usize {
        self.grids.len()
    }

    /// Whether the collection holds no grids
    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }

    /// Take ownership of the grids
    pub fn into_vec(self) -> Vec<Raster> {
        self.grids
    }
}

impl IntoIterator for OutputGrids {
    type Item = Raster;
    type IntoIter = std::vec::IntoIter<Raster>;

    fn into_iter(self) -> Self::IntoIter {
        self.grids.into_iter()
    }
}

impl FromIterator<Raster> for OutputGrids {
    fn from_iter<I: IntoIterator<Item = Raster>>(iter: I) -> Self {
        Self {
            grids: iter.into_iter().collect(),
        }
    }
}

/// `<code>_<source>`
pub(crate) fn univariate_name(code: &str, source: &str) -> String {
    format!("{code}_{source}")
}

/// `<a>_<code>_<b>`
pub(crate) fn bivariate_name(a: &str, code: &str, b: &str) -> String {
    format!("{a}_{code}_{b}")
}

/// Copy per-row sweep results into the output grids. Row buffers hold grid
/// k at `[k * cols..(k + 1) * cols]`; `None` and non-finite results leave the
/// sentinel in place.
pub(crate) fn write_rows(rows: &[Vec<Option<f64>>], grids: &mut [Raster], cols: usize) {
    for (row, values) in rows.iter().enumerate() {
        for (k, grid) in grids.iter_mut().enumerate() {
            let data = grid.data_mut();
            for col in 0..cols {
                if let Some(v) = values[k * cols + col]
                    && v.is_finite()
                {
                    data[(row, col)] = v;
                }
            }
        }
    }
}
