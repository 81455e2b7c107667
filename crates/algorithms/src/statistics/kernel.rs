//! Distance-decay kernels
//!
//! A kernel assigns every offset within `distance` of a cell a weight that
//! decays with distance from the centre. The weights of a complete window
//! (no no-data, fully inside the grid) also give the normalisation totals
//! used to rescale partial windows.

use gwstats_core::{Error, GeoTransform, Grid, Result};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::GwsConfig;

/// Kernel parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KernelSpec {
    /// Kernel radius in map units
    pub distance: f64,
    /// Weight at the centre of the kernel
    pub weight_intersect: f64,
    /// Decay exponent; 0 gives a flat kernel, negative values decay toward 1
    pub weight_factor: f64,
    /// Cell size of the grid the kernel is applied to
    pub cell_size: f64,
}

impl KernelSpec {
    /// Create and validate a kernel specification
    pub fn new(distance: f64, weight_intersect: f64, weight_factor: f64, cell_size: f64) -> Result<Self> {
        let spec = Self {
            distance,
            weight_intersect,
            weight_factor,
            cell_size,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Kernel sized for the cells of `grid`
    pub fn for_grid<G: Grid + ?Sized>(
        grid: &G,
        distance: f64,
        weight_intersect: f64,
        weight_factor: f64,
    ) -> Result<Self> {
        Self::new(distance, weight_intersect, weight_factor, grid.cell_size())
    }

    /// Reject geometrically meaningless kernels
    pub fn validate(&self) -> Result<()> {
        if !self.distance.is_finite() || self.distance < 0.0 {
            return Err(Error::invalid("distance", self.distance, "must be finite and >= 0"));
        }
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(Error::invalid("cell_size", self.cell_size, "must be finite and > 0"));
        }
        if !self.weight_intersect.is_finite() {
            return Err(Error::invalid("weight_intersect", self.weight_intersect, "must be finite"));
        }
        if !self.weight_factor.is_finite() {
            return Err(Error::invalid("weight_factor", self.weight_factor, "must be finite"));
        }
        if window_cells(self.distance / self.cell_size).is_none() {
            return Err(Error::invalid("distance", self.distance, "kernel window has more cells than fit in memory"));
        }
        Ok(())
    }

    /// Half-width of the kernel window in cells
    pub fn cell_distance(&self) -> usize {
        (self.distance / self.cell_size).ceil() as usize
    }

    /// Side length of the kernel window in cells
    pub fn window_size(&self) -> usize {
        self.cell_distance().saturating_mul(2).saturating_add(1)
    }

    /// Weight at `delta` map units from the centre
    pub fn weight_at(&self, delta: f64) -> Option<f64> {
        kernel_weight(self.distance, self.weight_intersect, self.weight_factor, delta)
    }

    /// Weight of the window offset (p, q), measured between cell centres
    pub fn offset_weight(&self, p: usize, q: usize) -> Option<f64> {
        let cd = self.cell_distance() as f64;
        let dr = p as f64 - cd;
        let dc = q as f64 - cd;
        self.weight_at(self.cell_size * (dr * dr + dc * dc).sqrt())
    }
}

/// Number of cells of a window reaching `cells` cell sizes from its centre,
/// `None` when that count overflows `usize`.
fn window_cells(cells: f64) -> Option<usize> {
    let cell_distance = cells.ceil();
    if cell_distance >= usize::MAX as f64 {
        return None;
    }
    let size = (cell_distance as usize).checked_mul(2)?.checked_add(1)?;
    size.checked_mul(size)
}

/// Kernel weight at distance `delta` from the centre.
///
/// `None` marks offsets outside the kernel (`delta >= distance`); the centre
/// itself is always inside. With normalised distance `x = delta / distance`
/// and `f = |weight_factor|` the decay term is `(1 - x)^f` for `f >= 1` and
/// `1 - x^(1/f)` for `f < 1`; both fall from 1 at the centre to 0 at the rim.
/// Positive factors scale it by `weight_intersect` (rim weight 0), negative
/// factors blend from `weight_intersect` to 1 at the rim.
pub fn kernel_weight(distance: f64, weight_intersect: f64, weight_factor: f64, delta: f64) -> Option<f64> {
    if delta > 0.0 && delta >= distance {
        return None;
    }
    if weight_factor == 0.0 || delta == 0.0 {
        return Some(weight_intersect);
    }

    let x = delta / distance;
    let f = weight_factor.abs();
    let decay = if f < 1.0 {
        1.0 - x.powf(1.0 / f)
    } else {
        (1.0 - x).powf(f)
    };

    if weight_factor > 0.0 {
        Some(weight_intersect * decay)
    } else {
        Some(1.0 + (weight_intersect - 1.0) * decay)
    }
}

/// Normalisation totals of a complete kernel window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelTotals {
    /// Sum of all weights
    pub sum_weight: f64,
    /// Number of offsets inside the kernel
    pub cells: usize,
}

/// Weights and totals of a complete window without materialising the
/// weight array.
pub fn kernel_parameters(spec: &KernelSpec) -> Result<KernelTotals> {
    spec.validate()?;
    let size = spec.window_size();
    let mut totals = KernelTotals { sum_weight: 0.0, cells: 0 };
    for p in 0..size {
        for q in 0..size {
            if let Some(w) = spec.offset_weight(p, q) {
                totals.sum_weight += w;
                totals.cells += 1;
            }
        }
    }
    Ok(totals)
}

/// Per-offset weights of a kernel window.
///
/// Offset (p, q) with `p, q` in `[0, 2 * cell_distance]` lies at
/// `(p - cell_distance, q - cell_distance)` cells from the centre.
#[derive(Debug, Clone)]
pub struct KernelWeights {
    cell_distance: usize,
    /// NaN marks offsets outside the kernel
    weights: Array2<f64>,
    totals: KernelTotals,
}

impl KernelWeights {
    /// Compute the weight array and its totals.
    pub fn compute(spec: &KernelSpec) -> Result<Self> {
        spec.validate()?;
        let cell_distance = spec.cell_distance();
        let size = 2 * cell_distance + 1;
        let cells = size * size;

        let mut buf = Vec::new();
        buf.try_reserve_exact(cells)
            .map_err(|_| Error::ResourceExhausted { what: "kernel weights", cells })?;

        let mut totals = KernelTotals { sum_weight: 0.0, cells: 0 };
        for p in 0..size {
            for q in 0..size {
                match spec.offset_weight(p, q) {
                    Some(w) => {
                        totals.sum_weight += w;
                        totals.cells += 1;
                        buf.push(w);
                    }
                    None => buf.push(f64::NAN),
                }
            }
        }

        let weights = Array2::from_shape_vec((size, size), buf)
            .map_err(|e| Error::Other(e.to_string()))?;

        Ok(Self {
            cell_distance,
            weights,
            totals,
        })
    }

    /// Half-width of the window in cells
    pub fn cell_distance(&self) -> usize {
        self.cell_distance
    }

    /// Side length of the window
    pub fn size(&self) -> usize {
        self.weights.nrows()
    }

    /// Weight at offset (p, q), `None` outside the kernel
    pub fn weight(&self, p: usize, q: usize) -> Option<f64> {
        let w = self.weights[(p, q)];
        if w.is_nan() { None } else { Some(w) }
    }

    /// Totals of the complete window
    pub fn totals(&self) -> KernelTotals {
        self.totals
    }
}

/// Source of the weight for each offset of a window
pub(crate) trait WindowWeights {
    fn weight(&self, p: usize, q: usize) -> Option<f64>;
}

impl WindowWeights for KernelWeights {
    fn weight(&self, p: usize, q: usize) -> Option<f64> {
        KernelWeights::weight(self, p, q)
    }
}

/// Precomputed weights for the cached sweep, or `None` when every window
/// must be weighed geometrically: the kernel exceeds the configured limit or
/// its weight array cannot be allocated.
pub(crate) fn cached_weights(kernel: &KernelSpec, config: &GwsConfig) -> Result<Option<KernelWeights>> {
    let cell_distance = kernel.cell_distance();
    if !config.use_fast_path(cell_distance) {
        info!(
            cell_distance,
            limit = config.fast_path_max_cell_distance,
            "kernel too large for the cached window; recomputing every window"
        );
        return Ok(None);
    }
    match KernelWeights::compute(kernel) {
        Ok(w) => Ok(Some(w)),
        Err(e @ Error::ResourceExhausted { .. }) => {
            warn!("{e}; recomputing every window");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Weights measured from the true map distance between the centre cell and
/// each neighbour, recomputed for every window.
pub(crate) struct GeometricWeights<'a> {
    spec: &'a KernelSpec,
    transform: &'a GeoTransform,
    rows: usize,
    cols: usize,
    top: isize,
    left: isize,
    centre: (f64, f64),
}

impl<'a> GeometricWeights<'a> {
    pub fn new<G: Grid + ?Sized>(grid: &'a G, spec: &'a KernelSpec, row: usize, col: usize) -> Self {
        let cd = spec.cell_distance() as isize;
        let transform = grid.transform();
        Self {
            spec,
            transform,
            rows: grid.rows(),
            cols: grid.cols(),
            top: row as isize - cd,
            left: col as isize - cd,
            centre: transform.pixel_to_geo(col, row),
        }
    }
}

impl WindowWeights for GeometricWeights<'_> {
    fn weight(&self, p: usize, q: usize) -> Option<f64> {
        let r = self.top + p as isize;
        let c = self.left + q as isize;
        if r < 0 || c < 0 || r as usize >= self.rows || c as usize >= self.cols {
            return None;
        }
        let (x, y) = self.transform.pixel_to_geo(c as usize, r as usize);
        let delta = (x - self.centre.0).hypot(y - self.centre.1);
        self.spec.weight_at(delta)
    }
}
