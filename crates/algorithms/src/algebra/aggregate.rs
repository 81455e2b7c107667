//! Block aggregation to a coarser grid

use gwstats_core::{Error, Grid, Raster, Result};
use serde::{Deserialize, Serialize};

use crate::maybe_rayon::map_rows;

/// How the valid cells of a block combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Aggregation {
    #[default]
    Sum,
    Mean,
}

/// Aggregate `factor × factor` blocks into single cells.
///
/// The result has the same origin and a cell size `factor` times larger;
/// trailing partial blocks become partial cells. Only valid cells
/// contribute, and blocks without any are no-data.
pub fn aggregate<G: Grid + Sync + ?Sized>(grid: &G, factor: usize, how: Aggregation) -> Result<Raster> {
    if factor == 0 {
        return Err(Error::invalid("factor", factor, "must be >= 1"));
    }
    let (rows, cols) = grid.shape();
    let out_rows = rows.div_ceil(factor);
    let out_cols = cols.div_ceil(factor);
    let nodata = grid.nodata();

    let data: Vec<f64> = map_rows(out_rows, |orow| {
        let mut out = Vec::with_capacity(out_cols);
        for ocol in 0..out_cols {
            let mut sum = 0.0;
            let mut count = 0usize;
            for row in orow * factor..((orow + 1) * factor).min(rows) {
                for col in ocol * factor..((ocol + 1) * factor).min(cols) {
                    if let Some(v) = grid.valid(row as isize, col as isize) {
                        sum += v;
                        count += 1;
                    }
                }
            }
            out.push(match (count, how) {
                (0, _) => nodata,
                (_, Aggregation::Sum) => sum,
                (n, Aggregation::Mean) => sum / n as f64,
            });
        }
        out
    })
    .concat();

    Ok(Raster::from_vec(data, out_rows, out_cols)?
        .with_transform(grid.transform().coarsened(factor))
        .with_nodata(nodata)
        .with_name(grid.name()))
}
