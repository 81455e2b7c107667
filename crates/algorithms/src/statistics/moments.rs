//! Per-window accumulators
//!
//! Both the cached and the direct sweep feed values into the same
//! accumulators in the same (p, q) order, so they agree on every statistic.

/// Real cube root that keeps the sign of `x`.
///
/// `powf(1/3)` of a negative number is NaN; this is `sign(x) * |x|^(1/3)`.
pub fn signed_cube_root(x: f64) -> f64 {
    if x < 0.0 {
        -(-x).cbrt()
    } else {
        x.cbrt()
    }
}

/// `numerator / denominator`, or `None` when the result is not finite
pub(crate) fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }
    let r = numerator / denominator;
    r.is_finite().then_some(r)
}

/// First-order sums of one window.
///
/// `n_w_sum` is normalised by the weight accumulated *so far* in the window,
/// not by the final window total. Kept this way to reproduce established
/// results. `w_mean` is the running form of `w_sum / sum_weight` and ends on
/// the same value up to rounding.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FirstOrderSums {
    pub sum_weight: f64,
    pub sum_cells: f64,
    pub sum: f64,
    pub w_sum: f64,
    pub n_w_sum: f64,
    pub w_mean: f64,
}

impl FirstOrderSums {
    /// Add one valid value with its kernel weight
    pub fn push(&mut self, value: f64, weight: f64) {
        self.sum_weight += weight;
        self.sum_cells += 1.0;
        self.sum += value;
        self.w_sum += value * weight;
        if self.sum_weight != 0.0 {
            self.n_w_sum += value * weight / self.sum_weight;
            self.w_mean += (value - self.w_mean) * weight / self.sum_weight;
        }
    }

    /// Whether the window held enough to report anything
    pub fn is_supported(&self) -> bool {
        self.sum_cells > 0.0 && self.sum_weight > 0.0
    }
}

/// Central moments of one window about each neighbour's own local mean.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Moments {
    /// Values with a defined unweighted local mean
    pub cells: f64,
    pub d1: f64,
    pub d2: f64,
    pub d3: f64,
    /// Weight of values with a defined weighted local mean
    pub sum_weight: f64,
    pub w_d1: f64,
    pub w_d2: f64,
    pub w_d3: f64,
}

impl Moments {
    /// Add one valid value. `mean` and `w_mean` are the local means at the
    /// value's own cell, `None` where that cell has none.
    pub fn push(&mut self, value: f64, mean: Option<f64>, w_mean: Option<f64>, weight: f64) {
        if let Some(m) = mean {
            let d = value - m;
            self.cells += 1.0;
            self.d1 += d;
            self.d2 += d * d;
            self.d3 += d * d * d;
        }
        if let Some(m) = w_mean {
            let d = value - m;
            self.sum_weight += weight;
            self.w_d1 += d * weight;
            self.w_d2 += d * d * weight;
            self.w_d3 += d * d * d * weight;
        }
    }

    pub fn prop(&self) -> Option<f64> {
        ratio(self.d1, self.cells)
    }

    pub fn var(&self) -> Option<f64> {
        ratio(self.d2, self.cells)
    }

    pub fn skew(&self) -> Option<f64> {
        ratio(self.d3, self.cells).map(signed_cube_root)
    }

    pub fn cvar(&self) -> Option<f64> {
        coefficient(self.prop(), self.var())
    }

    pub fn cskew(&self) -> Option<f64> {
        coefficient(self.skew(), self.var())
    }

    pub fn w_prop(&self) -> Option<f64> {
        self.weighted(self.w_d1)
    }

    pub fn w_var(&self) -> Option<f64> {
        self.weighted(self.w_d2)
    }

    pub fn w_skew(&self) -> Option<f64> {
        self.weighted(self.w_d3).map(signed_cube_root)
    }

    pub fn w_cvar(&self) -> Option<f64> {
        coefficient(self.w_prop(), self.w_var())
    }

    pub fn w_cskew(&self) -> Option<f64> {
        coefficient(self.w_skew(), self.w_var())
    }

    fn weighted(&self, sum: f64) -> Option<f64> {
        if self.sum_weight > 0.0 { ratio(sum, self.sum_weight) } else { None }
    }
}

/// `value / variance` for a strictly positive variance
fn coefficient(value: Option<f64>, variance: Option<f64>) -> Option<f64> {
    match (value, variance) {
        (Some(v), Some(var)) if var > 0.0 => ratio(v, var),
        _ => None,
    }
}
