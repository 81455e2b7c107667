//! Rescaling of grid values

use gwstats_core::{Error, Grid, Raster, Result};
use serde::{Deserialize, Serialize};

use crate::maybe_rayon::map_rows;

/// Target range and transfer function of a rescale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Rescale {
    /// Min–max rescale to `[min, max]`
    Linear { min: f64, max: f64 },
    /// Rescale `ln(v − vmin + 1)` to `[min, max]`, compressing long tails
    Log { min: f64, max: f64 },
}

impl Rescale {
    fn bounds(self) -> (f64, f64) {
        match self {
            Rescale::Linear { min, max } | Rescale::Log { min, max } => (min, max),
        }
    }
}

/// Map `value` from `[min, min + range]` to `[1, 10]`; 1 when `range` is 0.
pub fn normalise_to_range(value: f64, min: f64, range: f64) -> f64 {
    if range == 0.0 {
        1.0
    } else {
        1.0 + 9.0 * (value - min) / range
    }
}

/// Rescale the valid cells of `grid` into the target range.
///
/// A grid with a single distinct value maps to the lower bound; no-data
/// stays no-data.
pub fn rescale<G: Grid + Sync + ?Sized>(grid: &G, method: Rescale) -> Result<Raster> {
    let (lo, hi) = method.bounds();
    if !lo.is_finite() || !hi.is_finite() || lo > hi {
        return Err(Error::invalid("range", format!("[{lo}, {hi}]"), "bounds must be finite and ordered"));
    }

    let (rows, cols) = grid.shape();
    let mut v_min = f64::INFINITY;
    let mut v_max = f64::NEG_INFINITY;
    for row in 0..rows as isize {
        for col in 0..cols as isize {
            if let Some(v) = grid.valid(row, col) {
                v_min = v_min.min(v);
                v_max = v_max.max(v);
            }
        }
    }

    let transfer = |v: f64| match method {
        Rescale::Linear { .. } => v,
        Rescale::Log { .. } => (v - v_min + 1.0).ln(),
    };
    let (t_min, t_max) = if v_min <= v_max {
        (transfer(v_min), transfer(v_max))
    } else {
        (0.0, 0.0)
    };
    let range = t_max - t_min;

    let nodata = grid.nodata();
    let data: Vec<f64> = map_rows(rows, |row| {
        (0..cols)
            .map(|col| match grid.valid(row as isize, col as isize) {
                Some(v) if range > 0.0 => lo + (hi - lo) * (transfer(v) - t_min) / range,
                Some(_) => lo,
                None => nodata,
            })
            .collect::<Vec<_>>()
    })
    .concat();

    Ok(Raster::from_vec(data, rows, cols)?
        .with_transform(*grid.transform())
        .with_nodata(nodata)
        .with_name(grid.name()))
}
