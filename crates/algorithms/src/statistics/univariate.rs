//! Geographically weighted univariate statistics
//!
//! For every cell, the values inside a distance-decay kernel centred on it
//! are summarised into weighted and unweighted statistics. The work is two
//! sweeps over the grid:
//!
//! 1. **First order**: sums and means of each window, plus the `SumWeight`
//!    grid (share of the complete kernel's weight the window realised).
//! 2. **Second order**: moments of each window about the local mean grids
//!    of the first sweep (`Mean` for unweighted, `WMean1` for weighted), so it
//!    only starts once the first sweep has finished.
//!
//! Kernels up to [`GwsConfig::fast_path_max_cell_distance`] cells use a
//! sliding window and a precomputed weight array. Larger kernels read every
//! window from the grid and weigh neighbours by their true map distance.

use gwstats_core::{Algorithm, Error, Grid, Raster, Result};
use tracing::{debug, info};

use super::kernel::{
    GeometricWeights, KernelSpec, KernelTotals, WindowWeights, cached_weights, kernel_parameters,
};
use super::moments::{FirstOrderSums, Moments, ratio};
use super::output::{OutputGrids, univariate_name, write_rows};
use super::selection::{Selection, StatisticKind};
use super::window::{DirectWindow, RowWindow, WindowSpan, WindowValues};
use crate::config::GwsConfig;
use crate::maybe_rayon::map_rows;

/// Code of the grid that is always produced: `sumWeight / totalSumWeight`
pub const SUM_WEIGHT: &str = "SumWeight";

/// Univariate regional statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Statistic {
    /// Sum rescaled to a complete window: `sum * cells / totalCells`
    Sum,
    /// Weighted sum
    WSum,
    /// Weighted sum normalised by the running weight total
    NWSum,
    /// Weighted sum scaled by the realised weight share
    WSumN,
    /// Arithmetic mean
    Mean,
    /// Weighted mean, `wSum / sumWeight`
    WMean1,
    /// Weighted mean accumulated one value at a time; equals `WMean1` up to
    /// rounding
    WMean2,
    /// `NWSum / sumWeight`
    NWMean,
    /// `WMean2` scaled by the realised weight share
    WMeanN,
    /// Mean deviation from the local means
    Prop,
    /// Variance about the local means
    Var,
    /// Cube root of the third moment about the local means
    Skew,
    /// `Prop / Var`
    CVar,
    /// `Skew / Var`
    CSkew,
    WProp,
    WVar,
    WSkew,
    WCVar,
    WCSkew,
}

use Statistic::*;

const FIRST_ORDER: &[Statistic] = &[Sum, WSum, NWSum, WSumN, Mean, WMean1, WMean2, NWMean, WMeanN];
const SECOND_ORDER: &[Statistic] = &[Prop, Var, Skew, CVar, CSkew, WProp, WVar, WSkew, WCVar, WCSkew];

impl StatisticKind for Statistic {
    const ALL: &'static [Self] = &[
        Sum, WSum, NWSum, WSumN, Mean, WMean1, WMean2, NWMean, WMeanN, Prop, Var, Skew, CVar,
        CSkew, WProp, WVar, WSkew, WCVar, WCSkew,
    ];

    fn code(self) -> &'static str {
        match self {
            Sum => "Sum",
            WSum => "WSum",
            NWSum => "NWSum",
            WSumN => "WSumN",
            Mean => "Mean",
            WMean1 => "WMean1",
            WMean2 => "WMean2",
            NWMean => "NWMean",
            WMeanN => "WMeanN",
            Prop => "Prop",
            Var => "Var",
            Skew => "Skew",
            CVar => "CVar",
            CSkew => "CSkew",
            WProp => "WProp",
            WVar => "WVar",
            WSkew => "WSkew",
            WCVar => "WCVar",
            WCSkew => "WCSkew",
        }
    }

    fn dependencies(self) -> &'static [Self] {
        match self {
            Prop | Var | Skew => &[Mean],
            CVar => &[Prop, Var],
            CSkew => &[Skew, Var],
            WProp | WVar | WSkew => &[WMean1],
            WCVar => &[WProp, WVar],
            WCSkew => &[WSkew, WVar],
            _ => &[],
        }
    }

    fn bundle(token: &str) -> Option<&'static [Self]> {
        if token.eq_ignore_ascii_case("FirstOrder") {
            Some(FIRST_ORDER)
        } else if token.eq_ignore_ascii_case("SecondOrder") {
            Some(SECOND_ORDER)
        } else if token.eq_ignore_ascii_case("All") {
            Some(Self::ALL)
        } else {
            None
        }
    }
}

impl Statistic {
    /// Whether the statistic needs the first sweep's mean grids
    pub fn is_second_order(self) -> bool {
        SECOND_ORDER.contains(&self)
    }

    fn first_order(self, s: &FirstOrderSums, totals: &KernelTotals) -> Option<f64> {
        match self {
            Sum => ratio(s.sum * s.sum_cells, totals.cells as f64),
            WSum => Some(s.w_sum),
            NWSum => Some(s.n_w_sum),
            WSumN => ratio(s.w_sum * s.sum_weight, totals.sum_weight),
            Mean => ratio(s.sum, s.sum_cells),
            WMean1 => ratio(s.w_sum, s.sum_weight),
            WMean2 => Some(s.w_mean),
            NWMean => ratio(s.n_w_sum, s.sum_weight),
            WMeanN => ratio(s.w_mean * s.sum_weight, totals.sum_weight),
            _ => None,
        }
    }

    fn second_order(self, m: &Moments) -> Option<f64> {
        match self {
            Prop => m.prop(),
            Var => m.var(),
            Skew => m.skew(),
            CVar => m.cvar(),
            CSkew => m.cskew(),
            WProp => m.w_prop(),
            WVar => m.w_var(),
            WSkew => m.w_skew(),
            WCVar => m.w_cvar(),
            WCSkew => m.w_cskew(),
            _ => None,
        }
    }
}

/// Parameters for regional univariate statistics
#[derive(Debug, Clone)]
pub struct UnivariateParams {
    /// Kernel radius in map units
    pub distance: f64,
    /// Weight at the kernel centre
    pub weight_intersect: f64,
    /// Kernel decay exponent
    pub weight_factor: f64,
    /// Statistics to compute (dependencies included)
    pub statistics: Selection<Statistic>,
    pub config: GwsConfig,
}

impl Default for UnivariateParams {
    fn default() -> Self {
        Self {
            distance: 1.5,
            weight_intersect: 1.0,
            weight_factor: 0.0,
            statistics: [Mean, WMean1].into_iter().collect(),
            config: GwsConfig::default(),
        }
    }
}

/// Regional univariate statistics algorithm
#[derive(Debug, Clone, Default)]
pub struct RegionUnivariate;

impl Algorithm for RegionUnivariate {
    type Input = Raster;
    type Output = OutputGrids;
    type Params = UnivariateParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Regional Univariate Statistics"
    }

    fn description(&self) -> &'static str {
        "Geographically weighted sums, means and moments within a distance-decay kernel"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        let kernel = KernelSpec::for_grid(
            &input,
            params.distance,
            params.weight_intersect,
            params.weight_factor,
        )?;
        region_univariate_statistics(&input, &params.statistics, &kernel, &params.config)
    }
}

/// Compute geographically weighted univariate statistics.
///
/// Returns `SumWeight` followed by one grid per statistic in the selection
/// closure, each named `<code>_<grid name>`. Cells whose window holds no
/// valid value (or no weight) are no-data in every grid.
pub fn region_univariate_statistics<G>(
    grid: &G,
    statistics: &Selection<Statistic>,
    kernel: &KernelSpec,
    config: &GwsConfig,
) -> Result<OutputGrids>
where
    G: Grid + Sync + ?Sized,
{
    kernel.validate()?;
    config.validate()?;

    let (rows, cols) = grid.shape();
    let cell_distance = kernel.cell_distance();
    let nodata = config.output_nodata;
    info!(
        rows,
        cols,
        cell_distance,
        statistics = ?statistics,
        "regional univariate statistics of {:?}",
        grid.name()
    );

    let first: Vec<Statistic> = statistics.iter().filter(|s| !s.is_second_order()).collect();
    let second: Vec<Statistic> = statistics.iter().filter(|s| s.is_second_order()).collect();

    // Every output is allocated before the sweeps start.
    let mut first_grids = vec![output_grid(grid, SUM_WEIGHT, nodata)?];
    for stat in &first {
        first_grids.push(output_grid(grid, stat.code(), nodata)?);
    }
    let mut second_grids = second
        .iter()
        .map(|stat| output_grid(grid, stat.code(), nodata))
        .collect::<Result<Vec<_>>>()?;

    let weights = cached_weights(kernel, config)?;
    let totals = match &weights {
        Some(w) => w.totals(),
        None => kernel_parameters(kernel)?,
    };
    debug!(?totals, fast = weights.is_some(), "first-order sweep");

    let first_rows = map_rows(rows, |row| {
        let mut out = vec![None; (first.len() + 1) * cols];
        match &weights {
            Some(w) => {
                let mut window = RowWindow::start(grid, cell_distance, row);
                for col in 0..cols {
                    window.advance(col);
                    let span = WindowSpan::clipped(cell_distance, row, col, (rows, cols));
                    let sums = first_order_sums(&window, w, span);
                    emit_first_order(&sums, &first, &totals, &mut out, cols, col);
                }
            }
            None => {
                for col in 0..cols {
                    let window = DirectWindow::new(grid, cell_distance, row, col);
                    let weights = GeometricWeights::new(grid, kernel, row, col);
                    let span = WindowSpan::clipped(cell_distance, row, col, (rows, cols));
                    let sums = first_order_sums(&window, &weights, span);
                    emit_first_order(&sums, &first, &totals, &mut out, cols, col);
                }
            }
        }
        out
    });
    write_rows(&first_rows, &mut first_grids, cols);
    drop(first_rows);

    if !second.is_empty() {
        debug!("second-order sweep");
        let grid_of = |stat: Statistic| {
            first
                .iter()
                .position(|&s| s == stat)
                .map(|k| &first_grids[k + 1])
        };
        let means = grid_of(Mean);
        let w_means = grid_of(WMean1);

        let second_rows = map_rows(rows, |row| {
            let mut out = vec![None; second.len() * cols];
            match &weights {
                Some(w) => {
                    let mut window = RowWindow::start(grid, cell_distance, row);
                    let mut mean_window = means.map(|g| RowWindow::start(g, cell_distance, row));
                    let mut w_mean_window = w_means.map(|g| RowWindow::start(g, cell_distance, row));
                    for col in 0..cols {
                        window.advance(col);
                        if let Some(mw) = &mut mean_window {
                            mw.advance(col);
                        }
                        if let Some(mw) = &mut w_mean_window {
                            mw.advance(col);
                        }
                        let moments = moments_about_local_means(
                            &window,
                            mean_window.as_ref(),
                            w_mean_window.as_ref(),
                            w,
                            WindowSpan::clipped(cell_distance, row, col, (rows, cols)),
                        );
                        emit_second_order(&moments, &second, &mut out, cols, col);
                    }
                }
                None => {
                    for col in 0..cols {
                        let window = DirectWindow::new(grid, cell_distance, row, col);
                        let mean_window = means.map(|g| DirectWindow::new(g, cell_distance, row, col));
                        let w_mean_window =
                            w_means.map(|g| DirectWindow::new(g, cell_distance, row, col));
                        let weights = GeometricWeights::new(grid, kernel, row, col);
                        let moments = moments_about_local_means(
                            &window,
                            mean_window.as_ref(),
                            w_mean_window.as_ref(),
                            &weights,
                            WindowSpan::clipped(cell_distance, row, col, (rows, cols)),
                        );
                        emit_second_order(&moments, &second, &mut out, cols, col);
                    }
                }
            }
            out
        });
        write_rows(&second_rows, &mut second_grids, cols);
    }

    Ok(first_grids.into_iter().chain(second_grids).collect())
}

fn output_grid<G: Grid + ?Sized>(grid: &G, code: &str, nodata: f64) -> Result<Raster> {
    Ok(Raster::nodata_like(grid, nodata)?.with_name(univariate_name(code, grid.name())))
}

/// Single fused pass over one window
fn first_order_sums<V, W>(values: &V, weights: &W, span: WindowSpan) -> FirstOrderSums
where
    V: WindowValues,
    W: WindowWeights,
{
    let mut sums = FirstOrderSums::default();
    for (p, q) in span.offsets() {
        let Some(weight) = weights.weight(p, q) else { continue };
        let Some(value) = values.valid(p, q) else { continue };
        sums.push(value, weight);
    }
    sums
}

fn moments_about_local_means<V, M, W>(
    values: &V,
    means: Option<&M>,
    w_means: Option<&M>,
    weights: &W,
    span: WindowSpan,
) -> Moments
where
    V: WindowValues,
    M: WindowValues,
    W: WindowWeights,
{
    let mut moments = Moments::default();
    for (p, q) in span.offsets() {
        let Some(weight) = weights.weight(p, q) else { continue };
        let Some(value) = values.valid(p, q) else { continue };
        let mean = means.and_then(|m| m.valid(p, q));
        let w_mean = w_means.and_then(|m| m.valid(p, q));
        moments.push(value, mean, w_mean, weight);
    }
    moments
}

/// Row buffer layout: grid k of the pass occupies `out[k * cols..(k + 1) * cols]`.
fn emit_first_order(
    sums: &FirstOrderSums,
    stats: &[Statistic],
    totals: &KernelTotals,
    out: &mut [Option<f64>],
    cols: usize,
    col: usize,
) {
    if !sums.is_supported() {
        return;
    }
    out[col] = ratio(sums.sum_weight, totals.sum_weight);
    for (k, stat) in stats.iter().enumerate() {
        out[(k + 1) * cols + col] = stat.first_order(sums, totals);
    }
}

fn emit_second_order(moments: &Moments, stats: &[Statistic], out: &mut [Option<f64>], cols: usize, col: usize) {
    for (k, stat) in stats.iter().enumerate() {
        out[k * cols + col] = stat.second_order(moments);
    }
}
