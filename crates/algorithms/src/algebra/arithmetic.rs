//! Cell-wise arithmetic between co-registered grids.
//!
//! No-data in any operand produces no-data in the result.

use gwstats_core::{Error, Grid, Raster, Result};

use crate::maybe_rayon::map_rows;

fn check_shape<A: Grid + ?Sized, B: Grid + ?Sized>(a: &A, b: &B) -> Result<()> {
    if a.shape() != b.shape() {
        return Err(Error::SizeMismatch {
            er: a.rows(),
            ec: a.cols(),
            ar: b.rows(),
            ac: b.cols(),
        });
    }
    Ok(())
}

/// Build a grid shaped like `template` from a per-cell function.
fn from_cells<G, F>(template: &G, nodata: f64, f: F) -> Result<Raster>
where
    G: Grid + Sync + ?Sized,
    F: Fn(isize, isize) -> Option<f64> + Sync + Send,
{
    let (rows, cols) = template.shape();
    let data: Vec<f64> = map_rows(rows, |row| {
        (0..cols)
            .map(|col| f(row as isize, col as isize).unwrap_or(nodata))
            .collect::<Vec<_>>()
    })
    .concat();

    Ok(Raster::from_vec(data, rows, cols)?
        .with_transform(*template.transform())
        .with_nodata(nodata)
        .with_name(template.name()))
}

/// `a + weight * b` cell by cell.
///
/// The result keeps the name, georeferencing and sentinel of `a`.
pub fn add<A, B>(a: &A, b: &B, weight: f64) -> Result<Raster>
where
    A: Grid + Sync + ?Sized,
    B: Grid + Sync + ?Sized,
{
    check_shape(a, b)?;
    if !weight.is_finite() {
        return Err(Error::invalid("weight", weight, "must be finite"));
    }
    from_cells(a, a.nodata(), |row, col| Some(a.valid(row, col)? + weight * b.valid(row, col)?))
}

/// Add `weight * source` into `target` in place.
///
/// No-data target cells start from zero wherever the source is valid;
/// no-data source cells leave the target untouched.
pub fn accumulate<G: Grid + ?Sized>(target: &mut Raster, source: &G, weight: f64) -> Result<()> {
    check_shape(&*target, source)?;
    if !weight.is_finite() {
        return Err(Error::invalid("weight", weight, "must be finite"));
    }
    let nodata = target.nodata();
    for ((row, col), cell) in target.data_mut().indexed_iter_mut() {
        let Some(v) = source.valid(row as isize, col as isize) else { continue };
        let base = if cell.is_nan() || *cell == nodata { 0.0 } else { *cell };
        *cell = base + weight * v;
    }
    Ok(())
}

/// Copy of `grid` with no-data wherever `mask` has no data.
pub fn mask<G, M>(grid: &G, mask: &M) -> Result<Raster>
where
    G: Grid + Sync + ?Sized,
    M: Grid + Sync + ?Sized,
{
    check_shape(grid, mask)?;
    from_cells(grid, grid.nodata(), |row, col| {
        mask.valid(row, col)?;
        grid.valid(row, col)
    })
}
