//! Geographically weighted comparison of two co-registered grids
//!
//! Within each kernel window only *pairs* count: offsets where both grids
//! hold a valid value. A window needs more than [`GwsConfig::min_pairs`]
//! pairs to report anything.
//!
//! Normalised statistics first rescale each grid's values to `[1, 10]` using
//! the extrema of that grid *within the window*, so two grids of different
//! units become comparable.

use gwstats_core::{Algorithm, Error, Grid, Raster, Result};
use tracing::{debug, info};

use super::kernel::{GeometricWeights, KernelSpec, KernelTotals, WindowWeights, cached_weights, kernel_parameters};
use super::moments::ratio;
use super::output::{OutputGrids, bivariate_name, write_rows};
use super::selection::{Selection, StatisticKind};
use super::window::{DirectWindow, RowWindow, WindowSpan, WindowValues};
use crate::algebra::normalise_to_range;
use crate::config::GwsConfig;
use crate::maybe_rayon::map_rows;

/// Bivariate regional statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BivariateStatistic {
    /// `Σ(a − b)`
    Diff,
    /// `Σ(a − b)·w`
    WDiff,
    /// Sum of range-normalised differences
    NDiff,
    /// Weighted sum of range-normalised differences, scaled by the realised
    /// weight share
    WNDiff,
    /// Pearson correlation of the normalised values
    Corr,
    /// Weighted correlation of the normalised values
    WCorr,
    /// Difference of the centre cell's z-scores. A single value per window,
    /// not a sum over it.
    ZDiff,
    /// Difference of the centre cell's weighted z-scores, times the centre
    /// weight. Like `ZDiff`, not a sum over the window.
    WZDiff,
}

use BivariateStatistic::*;

const COUNT: usize = 8;

const DIFFERENCE: &[BivariateStatistic] = &[Diff, WDiff, NDiff, WNDiff];
const CORRELATION: &[BivariateStatistic] = &[Corr, WCorr];
const Z_SCORE: &[BivariateStatistic] = &[ZDiff, WZDiff];

impl StatisticKind for BivariateStatistic {
    const ALL: &'static [Self] = &[Diff, WDiff, NDiff, WNDiff, Corr, WCorr, ZDiff, WZDiff];

    fn code(self) -> &'static str {
        match self {
            Diff => "Diff",
            WDiff => "WDiff",
            NDiff => "NDiff",
            WNDiff => "WNDiff",
            Corr => "Corr",
            WCorr => "WCorr",
            ZDiff => "ZDiff",
            WZDiff => "WZDiff",
        }
    }

    fn dependencies(self) -> &'static [Self] {
        &[]
    }

    fn bundle(token: &str) -> Option<&'static [Self]> {
        if token.eq_ignore_ascii_case("Difference") {
            Some(DIFFERENCE)
        } else if token.eq_ignore_ascii_case("Correlation") {
            Some(CORRELATION)
        } else if token.eq_ignore_ascii_case("ZScore") {
            Some(Z_SCORE)
        } else if token.eq_ignore_ascii_case("All") {
            Some(Self::ALL)
        } else {
            None
        }
    }
}

impl BivariateStatistic {
    /// Whether the statistic works on range-normalised values
    pub fn is_normalised(self) -> bool {
        !matches!(self, Diff | WDiff)
    }
}

/// Parameters for regional bivariate statistics
#[derive(Debug, Clone)]
pub struct BivariateParams {
    /// Kernel radius in map units
    pub distance: f64,
    /// Weight at the kernel centre
    pub weight_intersect: f64,
    /// Kernel decay exponent
    pub weight_factor: f64,
    pub statistics: Selection<BivariateStatistic>,
    pub config: GwsConfig,
}

impl Default for BivariateParams {
    fn default() -> Self {
        Self {
            distance: 3.0,
            weight_intersect: 1.0,
            weight_factor: 0.0,
            statistics: [Diff, Corr].into_iter().collect(),
            config: GwsConfig::default(),
        }
    }
}

/// Regional bivariate statistics algorithm
#[derive(Debug, Clone, Default)]
pub struct RegionBivariate;

impl Algorithm for RegionBivariate {
    type Input = (Raster, Raster);
    type Output = OutputGrids;
    type Params = BivariateParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Regional Bivariate Statistics"
    }

    fn description(&self) -> &'static str {
        "Geographically weighted differences, correlation and z-score differences of two grids"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        let (a, b) = input;
        let kernel = KernelSpec::for_grid(&a, params.distance, params.weight_intersect, params.weight_factor)?;
        region_bivariate_statistics(&a, &b, &params.statistics, &kernel, &params.config)
    }
}

/// Compute geographically weighted comparison statistics of `a` and `b`.
///
/// Grids whose extents do not overlap yield an empty collection. Overlapping
/// grids must be co-registered: same shape, same cell size and the same
/// origin, so that cell (row, col) of `a` covers the ground of cell
/// (row, col) of `b`. Outputs are named `<a>_<code>_<b>` and follow the
/// georeferencing of `a`.
pub fn region_bivariate_statistics<A, B>(
    a: &A,
    b: &B,
    statistics: &Selection<BivariateStatistic>,
    kernel: &KernelSpec,
    config: &GwsConfig,
) -> Result<OutputGrids>
where
    A: Grid + Sync + ?Sized,
    B: Grid + Sync + ?Sized,
{
    kernel.validate()?;
    config.validate()?;

    if !a.bounds().intersects(&b.bounds()) {
        info!("{:?} and {:?} do not overlap; nothing to compare", a.name(), b.name());
        return Ok(OutputGrids::new());
    }
    let (rows, cols) = a.shape();
    if b.shape() != (rows, cols) {
        return Err(Error::SizeMismatch {
            er: rows,
            ec: cols,
            ar: b.rows(),
            ac: b.cols(),
        });
    }
    if !a.transform().is_aligned_with(b.transform()) {
        return Err(Error::invalid(
            "transform",
            format!("{:?}", b.transform()),
            format!("{:?} is not co-registered with {:?}", b.name(), a.name()),
        ));
    }

    let cell_distance = kernel.cell_distance();
    let nodata = config.output_nodata;
    info!(
        rows,
        cols,
        cell_distance,
        statistics = ?statistics,
        "regional bivariate statistics of {:?} and {:?}",
        a.name(),
        b.name()
    );

    let stats: Vec<BivariateStatistic> = statistics.iter().collect();
    let mut grids = stats
        .iter()
        .map(|s| Ok(Raster::nodata_like(a, nodata)?.with_name(bivariate_name(a.name(), s.code(), b.name()))))
        .collect::<Result<Vec<_>>>()?;

    let weights = cached_weights(kernel, config)?;
    let totals = match &weights {
        Some(w) => w.totals(),
        None => kernel_parameters(kernel)?,
    };
    let scan = PairEvaluator {
        totals,
        min_pairs: config.min_pairs,
        normalised: stats.iter().any(|s| s.is_normalised()),
    };
    debug!(?totals, fast = weights.is_some(), "pair sweep");

    let results = map_rows(rows, |row| {
        let mut out = vec![None; stats.len() * cols];
        match &weights {
            Some(w) => {
                let mut wa = RowWindow::start(a, cell_distance, row);
                let mut wb = RowWindow::start(b, cell_distance, row);
                for col in 0..cols {
                    wa.advance(col);
                    wb.advance(col);
                    let span = WindowSpan::clipped(cell_distance, row, col, (rows, cols));
                    let values = scan.evaluate(&wa, &wb, w, span);
                    emit(&values, &stats, &mut out, cols, col);
                }
            }
            None => {
                for col in 0..cols {
                    let wa = DirectWindow::new(a, cell_distance, row, col);
                    let wb = DirectWindow::new(b, cell_distance, row, col);
                    let w = GeometricWeights::new(a, kernel, row, col);
                    let span = WindowSpan::clipped(cell_distance, row, col, (rows, cols));
                    let values = scan.evaluate(&wa, &wb, &w, span);
                    emit(&values, &stats, &mut out, cols, col);
                }
            }
        }
        out
    });
    write_rows(&results, &mut grids, cols);

    Ok(grids.into_iter().collect())
}

fn emit(values: &[Option<f64>; COUNT], stats: &[BivariateStatistic], out: &mut [Option<f64>], cols: usize, col: usize) {
    for (k, &stat) in stats.iter().enumerate() {
        out[k * cols + col] = values[stat as usize];
    }
}

/// Weighted pairs `(a, b, w)` of one window
fn pairs<'w, VA, VB, W>(a: &'w VA, b: &'w VB, weights: &'w W, span: WindowSpan) -> impl Iterator<Item = (f64, f64, f64)> + 'w
where
    VA: WindowValues,
    VB: WindowValues,
    W: WindowWeights,
{
    span.offsets().filter_map(move |(p, q)| {
        let w = weights.weight(p, q)?;
        Some((a.valid(p, q)?, b.valid(p, q)?, w))
    })
}

/// Raw sums and per-grid extrema of a window's pairs
struct PairScan {
    pairs: usize,
    sum_weight: f64,
    min: [f64; 2],
    max: [f64; 2],
    diff: f64,
    w_diff: f64,
}

impl PairScan {
    fn new() -> Self {
        Self {
            pairs: 0,
            sum_weight: 0.0,
            min: [f64::INFINITY; 2],
            max: [f64::NEG_INFINITY; 2],
            diff: 0.0,
            w_diff: 0.0,
        }
    }

    fn push(&mut self, v0: f64, v1: f64, w: f64) {
        self.pairs += 1;
        self.sum_weight += w;
        for (i, v) in [v0, v1].into_iter().enumerate() {
            self.min[i] = self.min[i].min(v);
            self.max[i] = self.max[i].max(v);
        }
        self.diff += v0 - v1;
        self.w_diff += (v0 - v1) * w;
    }

    fn normalise(&self, v0: f64, v1: f64) -> (f64, f64) {
        (
            normalise_to_range(v0, self.min[0], self.max[0] - self.min[0]),
            normalise_to_range(v1, self.min[1], self.max[1] - self.min[1]),
        )
    }
}

/// Sums of normalised values, products and differences
#[derive(Default)]
struct NormalisedSums {
    diff: f64,
    w_diff: f64,
    sum: [f64; 2],
    sq: [f64; 2],
    cross: f64,
    w_sum: [f64; 2],
    w_sq: [f64; 2],
    w_cross: f64,
    sum_weight: f64,
}

impl NormalisedSums {
    fn push(&mut self, n0: f64, n1: f64, w: f64) {
        self.diff += n0 - n1;
        self.w_diff += (n0 - n1) * w;
        self.sum[0] += n0;
        self.sum[1] += n1;
        self.sq[0] += n0 * n0;
        self.sq[1] += n1 * n1;
        self.cross += n0 * n1;
        self.w_sum[0] += n0 * w;
        self.w_sum[1] += n1 * w;
        self.w_sq[0] += n0 * n0 * w;
        self.w_sq[1] += n1 * n1 * w;
        self.w_cross += n0 * n1 * w;
        self.sum_weight += w;
    }
}

/// Means, standard deviations and covariance of normalised pairs
struct PairMoments {
    mean: [f64; 2],
    sd: [f64; 2],
    cov: f64,
}

impl PairMoments {
    fn from_sums(sum: [f64; 2], sq: [f64; 2], cross: f64, total: f64) -> Option<Self> {
        if total <= 0.0 {
            return None;
        }
        let mean = [sum[0] / total, sum[1] / total];
        let var = [
            (sq[0] / total - mean[0] * mean[0]).max(0.0),
            (sq[1] / total - mean[1] * mean[1]).max(0.0),
        ];
        Some(Self {
            mean,
            sd: [var[0].sqrt(), var[1].sqrt()],
            cov: cross / total - mean[0] * mean[1],
        })
    }

    fn has_spread(&self) -> bool {
        self.sd[0] > 0.0 && self.sd[1] > 0.0
    }

    fn correlation(&self) -> Option<f64> {
        if !self.has_spread() {
            return None;
        }
        ratio(self.cov, self.sd[0] * self.sd[1]).map(|r| r.clamp(-1.0, 1.0))
    }

    fn z_difference(&self, n0: f64, n1: f64) -> Option<f64> {
        if !self.has_spread() {
            return None;
        }
        Some((n0 - self.mean[0]) / self.sd[0] - (n1 - self.mean[1]) / self.sd[1])
    }
}

/// Per-cell evaluation shared by both sweeps
struct PairEvaluator {
    totals: KernelTotals,
    min_pairs: usize,
    /// Whether any selected statistic needs the normalised pass
    normalised: bool,
}

impl PairEvaluator {
    /// Every statistic of one window, indexed by discriminant
    fn evaluate<VA, VB, W>(&self, a: &VA, b: &VB, weights: &W, span: WindowSpan) -> [Option<f64>; COUNT]
    where
        VA: WindowValues,
        VB: WindowValues,
        W: WindowWeights,
    {
        let mut out = [None; COUNT];

        let mut scan = PairScan::new();
        for (v0, v1, w) in pairs(a, b, weights, span) {
            scan.push(v0, v1, w);
        }
        if scan.pairs <= self.min_pairs {
            return out;
        }
        out[Diff as usize] = Some(scan.diff);
        out[WDiff as usize] = Some(scan.w_diff);
        if !self.normalised {
            return out;
        }

        let mut sums = NormalisedSums::default();
        for (v0, v1, w) in pairs(a, b, weights, span) {
            let (n0, n1) = scan.normalise(v0, v1);
            sums.push(n0, n1, w);
        }
        out[NDiff as usize] = Some(sums.diff);
        out[WNDiff as usize] = ratio(sums.w_diff * scan.sum_weight, self.totals.sum_weight);

        let plain = PairMoments::from_sums(sums.sum, sums.sq, sums.cross, scan.pairs as f64);
        let weighted = PairMoments::from_sums(sums.w_sum, sums.w_sq, sums.w_cross, sums.sum_weight);
        out[Corr as usize] = plain.as_ref().and_then(PairMoments::correlation);
        out[WCorr as usize] = weighted.as_ref().and_then(PairMoments::correlation);

        let c = span.radius;
        if let (Some(v0), Some(v1), Some(w)) = (a.valid(c, c), b.valid(c, c), weights.weight(c, c)) {
            let (n0, n1) = scan.normalise(v0, v1);
            out[ZDiff as usize] = plain.as_ref().and_then(|m| m.z_difference(n0, n1));
            out[WZDiff as usize] = weighted.as_ref().and_then(|m| m.z_difference(n0, n1)).map(|z| z * w);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use gwstats_core::GeoTransform;

    fn raster(rows: usize, cols: usize, name: &str, f: impl Fn(usize, usize) -> f64) -> Raster {
        let data = (0..rows * cols).map(|i| f(i / cols, i % cols)).collect();
        Raster::from_vec(data, rows, cols)
            .unwrap()
            .with_transform(GeoTransform::square(0.0, rows as f64, 1.0))
            .with_name(name)
    }

    fn run(a: &Raster, b: &Raster, tokens: &[&str], config: &GwsConfig) -> OutputGrids {
        let kernel = KernelSpec::for_grid(a, 3.0, 1.0, 1.0).unwrap();
        region_bivariate_statistics(a, b, &Selection::from_tokens(tokens), &kernel, config).unwrap()
    }

    #[test]
    fn test_discriminants_follow_output_order() {
        for (i, s) in BivariateStatistic::ALL.iter().enumerate() {
            assert_eq!(*s as usize, i);
            assert_eq!(s.index(), i);
        }
        assert_eq!(BivariateStatistic::ALL.len(), COUNT);
    }

    #[test]
    fn test_diff_of_offset_grids() {
        let a = raster(9, 9, "a", |r, c| (r * 9 + c) as f64);
        let b = raster(9, 9, "b", |r, c| (r * 9 + c) as f64 - 2.0);
        let out = run(&a, &b, &["Diff", "NDiff", "Corr"], &GwsConfig::default());
        assert_eq!(out.names().collect::<Vec<_>>(), vec!["a_Diff_b", "a_NDiff_b", "a_Corr_b"]);

        // radius 3 disc (rim excluded) at the centre: 25 pairs, each differing by 2
        let diff = out.get("a_Diff_b").unwrap().get(4, 4).unwrap();
        assert_relative_eq!(diff, 50.0);
        // identical shapes normalise identically
        assert_relative_eq!(out.get("a_NDiff_b").unwrap().get(4, 4).unwrap(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(out.get("a_Corr_b").unwrap().get(4, 4).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_min_pairs_threshold() {
        let a = raster(9, 9, "a", |r, c| (r + c) as f64);
        let b = raster(9, 9, "b", |r, _| r as f64);
        let out = run(&a, &b, &["Diff"], &GwsConfig::default());
        let diff = out.get("a_Diff_b").unwrap();
        // corner window holds 9 pairs
        assert_eq!(diff.get(0, 0).unwrap(), -9999.0);
        assert!(diff.get(4, 4).unwrap() != -9999.0);

        let relaxed = GwsConfig { min_pairs: 0, ..Default::default() };
        let out = run(&a, &b, &["Diff"], &relaxed);
        assert!(out.get("a_Diff_b").unwrap().get(0, 0).unwrap() != -9999.0);
    }

    #[test]
    fn test_anticorrelated_grids() {
        let a = raster(9, 9, "a", |r, c| (r * 3 + c) as f64);
        let b = raster(9, 9, "b", |r, c| 100.0 - (r * 3 + c) as f64 * 0.5);
        let out = run(&a, &b, &["Correlation"], &GwsConfig::default());
        assert_relative_eq!(out.get("a_Corr_b").unwrap().get(4, 4).unwrap(), -1.0, epsilon = 1e-12);
        assert_relative_eq!(out.get("a_WCorr_b").unwrap().get(4, 4).unwrap(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_constant_grid_has_no_correlation() {
        let a = raster(9, 9, "a", |_, _| 5.0);
        let b = raster(9, 9, "b", |r, c| (r + c) as f64);
        let out = run(&a, &b, &["Corr", "ZDiff", "NDiff"], &GwsConfig::default());
        assert_eq!(out.get("a_Corr_b").unwrap().get(4, 4).unwrap(), -9999.0);
        assert_eq!(out.get("a_ZDiff_b").unwrap().get(4, 4).unwrap(), -9999.0);
        // the constant grid normalises to 1 everywhere
        assert!(out.get("a_NDiff_b").unwrap().get(4, 4).unwrap() != -9999.0);
    }

    #[test]
    fn test_centre_z_difference() {
        // a rises along columns, b along rows: the centre sits at both means
        let a = raster(9, 9, "a", |_, c| c as f64);
        let b = raster(9, 9, "b", |r, _| r as f64);
        let out = run(&a, &b, &["ZScore"], &GwsConfig::default());
        assert_relative_eq!(out.get("a_ZDiff_b").unwrap().get(4, 4).unwrap(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(out.get("a_WZDiff_b").unwrap().get(4, 4).unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_z_difference_reads_the_centre_only() {
        // z-scores summed over a window cancel to zero; the centre of a convex
        // surface sits below its window mean
        let a = raster(9, 9, "a", |_, c| (c * c) as f64);
        let b = raster(9, 9, "b", |r, _| r as f64);
        let out = run(&a, &b, &["ZDiff"], &GwsConfig::default());
        assert!(out.get("a_ZDiff_b").unwrap().get(4, 4).unwrap() < -0.1);
    }

    #[test]
    fn test_disjoint_extents_give_nothing() {
        let a = raster(5, 5, "a", |_, _| 1.0);
        let b = raster(5, 5, "b", |_, _| 1.0).with_transform(GeoTransform::square(100.0, 5.0, 1.0));
        assert!(run(&a, &b, &["All"], &GwsConfig::default()).is_empty());
    }

    #[test]
    fn test_nodata_in_one_grid_drops_pairs() {
        let a = raster(9, 9, "a", |r, c| (r * 9 + c) as f64);
        let b = raster(9, 9, "b", |r, c| {
            let i = r * 9 + c;
            if i % 4 == 0 { -9999.0 } else { i as f64 - 2.0 }
        });
        let kernel = KernelSpec::for_grid(&a, 3.0, 1.0, 1.0).unwrap();

        // pairs of the window on (4, 4), summed by hand
        let (mut pairs, mut diff, mut w_diff) = (0, 0.0, 0.0);
        for r in 1..=7usize {
            for c in 1..=7usize {
                let (dr, dc) = (r as f64 - 4.0, c as f64 - 4.0);
                let Some(w) = kernel.weight_at((dr * dr + dc * dc).sqrt()) else { continue };
                let (va, vb) = (a.get(r, c).unwrap(), b.get(r, c).unwrap());
                if vb == -9999.0 {
                    continue;
                }
                pairs += 1;
                diff += va - vb;
                w_diff += (va - vb) * w;
            }
        }
        assert_eq!(pairs, 18);

        let relaxed = GwsConfig { min_pairs: 10, ..Default::default() };
        let out = run(&a, &b, &["Difference", "Corr"], &relaxed);
        assert_relative_eq!(out.get("a_Diff_b").unwrap().get(4, 4).unwrap(), diff);
        assert_relative_eq!(out.get("a_WDiff_b").unwrap().get(4, 4).unwrap(), w_diff, epsilon = 1e-12);
        // both grids are rescaled over the same valid pairs; a sentinel leaking
        // into b's extrema would pull its normalised values apart from a's
        assert_relative_eq!(out.get("a_NDiff_b").unwrap().get(4, 4).unwrap(), 0.0, epsilon = 1e-9);
        assert_relative_eq!(out.get("a_Corr_b").unwrap().get(4, 4).unwrap(), 1.0, epsilon = 1e-12);

        // exactly min_pairs pairs is not enough
        let at_threshold = GwsConfig { min_pairs: pairs, ..Default::default() };
        let out = run(&a, &b, &["Diff"], &at_threshold);
        assert_eq!(out.get("a_Diff_b").unwrap().get(4, 4).unwrap(), -9999.0);
        let below = GwsConfig { min_pairs: pairs - 1, ..Default::default() };
        let out = run(&a, &b, &["Diff"], &below);
        assert_relative_eq!(out.get("a_Diff_b").unwrap().get(4, 4).unwrap(), diff);
    }

    #[test]
    fn test_shifted_origin_is_rejected() {
        // the same field, with b's origin three cells east of a's
        let a = raster(12, 12, "a", |_, c| c as f64);
        let b = raster(12, 12, "b", |_, c| (c + 3) as f64).with_transform(GeoTransform::square(3.0, 12.0, 1.0));
        let kernel = KernelSpec::for_grid(&a, 3.0, 1.0, 1.0).unwrap();
        let result = region_bivariate_statistics(&a, &b, &Selection::from_tokens(["Diff"]), &kernel, &GwsConfig::default());
        assert!(matches!(result, Err(Error::InvalidParameter { name: "transform", .. })));

        let aligned = raster(12, 12, "b", |_, c| c as f64);
        let out = region_bivariate_statistics(&a, &aligned, &Selection::from_tokens(["Diff"]), &kernel, &GwsConfig::default())
            .unwrap();
        assert_relative_eq!(out.get("a_Diff_b").unwrap().get(6, 6).unwrap(), 0.0);
    }

    #[test]
    fn test_direct_sweep_on_kernel_wider_than_grid() {
        let a = raster(6, 6, "a", |r, c| (r * 6 + c) as f64);
        let b = raster(6, 6, "b", |r, c| (r * 6 + c) as f64 - 1.0);
        let kernel = KernelSpec::for_grid(&a, 20.0, 1.0, 0.0).unwrap();
        let direct = GwsConfig {
            fast_path_max_cell_distance: 0,
            ..Default::default()
        };
        let out = region_bivariate_statistics(&a, &b, &Selection::from_tokens(["Diff"]), &kernel, &direct).unwrap();
        // every window covers the whole grid
        for &v in out.get("a_Diff_b").unwrap().data() {
            assert_relative_eq!(v, 36.0);
        }
    }

    #[test]
    fn test_shape_mismatch_is_an_error() {
        let a = raster(5, 5, "a", |_, _| 1.0);
        let b = raster(5, 4, "b", |_, _| 1.0).with_transform(GeoTransform::square(0.0, 5.0, 1.0));
        let kernel = KernelSpec::for_grid(&a, 1.0, 1.0, 0.0).unwrap();
        let result = region_bivariate_statistics(&a, &b, &Selection::from_tokens(["Diff"]), &kernel, &GwsConfig::default());
        assert!(matches!(result, Err(Error::SizeMismatch { .. })));
    }
}
