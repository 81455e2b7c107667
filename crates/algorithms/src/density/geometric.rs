//! Multi-scale geometric density.
//!
//! Each scale halves the resolution of a data pyramid: the numerator holds
//! the sum of valid values of a block, the denominator its number of valid
//! cells. Their ratio, expanded back to full resolution and smoothed with a
//! box of the block's size, is the density at that scale.

use gwstats_core::{Algorithm, Error, Grid, Raster, Result};
use ndarray::Array2;
use tracing::{debug, info};

use crate::config::GwsConfig;
use crate::maybe_rayon::map_rows;
use crate::statistics::OutputGrids;

/// Parameters for geometric density
#[derive(Debug, Clone, Copy)]
pub struct DensityParams {
    /// Largest scale of interest, in map units
    pub max_distance: f64,
    pub config: GwsConfig,
}

impl Default for DensityParams {
    fn default() -> Self {
        Self {
            max_distance: 16.0,
            config: GwsConfig::default(),
        }
    }
}

/// Geometric density algorithm
#[derive(Debug, Clone, Default)]
pub struct GeometricDensity;

impl Algorithm for GeometricDensity {
    type Input = Raster;
    type Output = OutputGrids;
    type Params = DensityParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Geometric Density"
    }

    fn description(&self) -> &'static str {
        "Density of valid values at successively doubled block sizes"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        geometric_density(&input, params.max_distance, &params.config)
    }
}

/// Number of scales for a kernel of `cell_distance` cells on a grid whose
/// half extent is `half_extent` cells.
pub fn octave_count(cell_distance: usize, half_extent: usize) -> usize {
    let mut n = cell_distance.min(half_extent);
    if n == 0 {
        return 0;
    }
    let mut octaves = 1;
    while n > 1 {
        n /= 2;
        octaves += 1;
    }
    octaves
}

/// Geometric density of `grid` at every scale up to `max_distance`,
/// finest first. Grids are named `GeometricDensity<growth>_<name>`.
pub fn geometric_density<G: Grid + Sync + ?Sized>(
    grid: &G,
    max_distance: f64,
    config: &GwsConfig,
) -> Result<OutputGrids> {
    if !max_distance.is_finite() || max_distance < 0.0 {
        return Err(Error::invalid("max_distance", max_distance, "must be finite and >= 0"));
    }
    let cell_size = grid.cell_size();
    if !cell_size.is_finite() || cell_size <= 0.0 {
        return Err(Error::invalid("cell_size", cell_size, "must be finite and > 0"));
    }
    config.validate()?;

    let (rows, cols) = grid.shape();
    let cell_distance = (max_distance / cell_size).ceil() as usize;
    let octaves = octave_count(cell_distance, rows.max(cols) / 2);
    info!(rows, cols, cell_distance, octaves, "geometric density of {:?}", grid.name());

    let mut outputs = OutputGrids::new();
    let empty = grid.valid_count() == 0;
    let (mut numerator, mut denominator) = base_level(grid)?;

    for iteration in 1..=octaves {
        let growth = 1usize << iteration;
        let name = format!("GeometricDensity{growth}_{}", grid.name());
        let mut out = Raster::nodata_like(grid, config.output_nodata)?.with_name(name);

        numerator = halve(&numerator)?;
        denominator = halve(&denominator)?;
        if !empty {
            let ratio = expand_ratio(&numerator, &denominator, growth, rows, cols)?;
            *out.data_mut() = box_mean(&ratio, growth)?;
        }
        debug!(growth, "density scale done");
        outputs.push(out);
    }
    Ok(outputs)
}

fn from_rows(rows: usize, cols: usize, data: Vec<Vec<f64>>) -> Result<Array2<f64>> {
    Array2::from_shape_vec((rows, cols), data.concat()).map_err(|e| Error::Other(e.to_string()))
}

/// Values (0 at no-data) and valid-cell indicators at full resolution
fn base_level<G: Grid + Sync + ?Sized>(grid: &G) -> Result<(Array2<f64>, Array2<f64>)> {
    let (rows, cols) = grid.shape();
    let levels = map_rows(rows, |row| {
        (0..cols)
            .map(|col| match grid.valid(row as isize, col as isize) {
                Some(v) => (v, 1.0),
                None => (0.0, 0.0),
            })
            .unzip::<_, _, Vec<f64>, Vec<f64>>()
    });
    let (num, den): (Vec<_>, Vec<_>) = levels.into_iter().unzip();
    Ok((from_rows(rows, cols, num)?, from_rows(rows, cols, den)?))
}

/// Sum 2×2 blocks; odd trailing rows and columns form partial blocks.
fn halve(level: &Array2<f64>) -> Result<Array2<f64>> {
    let (rows, cols) = level.dim();
    let (out_rows, out_cols) = (rows.div_ceil(2), cols.div_ceil(2));
    let data = map_rows(out_rows, |r| {
        (0..out_cols)
            .map(|c| {
                let mut sum = 0.0;
                for row in 2 * r..(2 * r + 2).min(rows) {
                    for col in 2 * c..(2 * c + 2).min(cols) {
                        sum += level[[row, col]];
                    }
                }
                sum
            })
            .collect::<Vec<_>>()
    });
    from_rows(out_rows, out_cols, data)
}

/// Block ratios broadcast back to the `rows × cols` grid; 0 where a block
/// has no valid cell.
fn expand_ratio(
    numerator: &Array2<f64>,
    denominator: &Array2<f64>,
    growth: usize,
    rows: usize,
    cols: usize,
) -> Result<Array2<f64>> {
    let data = map_rows(rows, |row| {
        (0..cols)
            .map(|col| {
                let block = [row / growth, col / growth];
                let d = denominator[block];
                if d > 0.0 { numerator[block] / d } else { 0.0 }
            })
            .collect::<Vec<_>>()
    });
    from_rows(rows, cols, data)
}

/// Mean over a `size × size` box around each cell, clipped to the grid,
/// using a summed-area table.
fn box_mean(values: &Array2<f64>, size: usize) -> Result<Array2<f64>> {
    let (rows, cols) = values.dim();
    let mut table = Array2::<f64>::zeros((rows + 1, cols + 1));
    for row in 0..rows {
        let mut running = 0.0;
        for col in 0..cols {
            running += values[[row, col]];
            table[[row + 1, col + 1]] = table[[row, col + 1]] + running;
        }
    }

    let half = size / 2;
    let data = map_rows(rows, |row| {
        let top = row.saturating_sub(half);
        let bottom = (row + size - half).min(rows);
        (0..cols)
            .map(|col| {
                let left = col.saturating_sub(half);
                let right = (col + size - half).min(cols);
                let sum = table[[bottom, right]] - table[[top, right]] - table[[bottom, left]]
                    + table[[top, left]];
                sum / ((bottom - top) * (right - left)) as f64
            })
            .collect::<Vec<_>>()
    });
    from_rows(rows, cols, data)
}
