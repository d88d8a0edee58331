//! Monotone cubic Hermite interpolation.
//!
//! Tangents follow the Fritsch-Carlson construction: secant averages at the
//! interior knots, zeroed across flat segments and pulled back onto the circle
//! of radius 3 wherever `alpha² + beta² > 9`. With monotone knot values the
//! interpolant never leaves the range of the two knots bracketing a segment.
//! If the knot values are not monotone the curve may still peak above the
//! largest knot, so it is not a strict bound on unconstrained control points.
//!
//! Both the fit and the evaluation run under IEEE-754 semantics: a zero-width
//! segment or a constant profile produces `inf`/`NaN` ratios that the guards
//! below absorb instead of aborting.
//!
//! <http://en.wikipedia.org/wiki/Monotone_cubic_interpolation>

use crate::error::{FreeformError, Result};

/// Segment widths at or below this are treated as this width.
pub const MIN_SEGMENT_WIDTH: f64 = 1e-10;

/// A fitted monotone spline.
///
/// The stored knots carry one synthetic point at each end, one unit beyond
/// the first and last real knot and at the same value, so the curve leaves
/// the data with zero slope and extrapolates flat.
#[derive(Debug, Clone)]
pub struct MonoSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    m: Vec<f64>,
}

impl MonoSpline {
    /// Fit a spline through `(x[i], y[i])`.
    ///
    /// `x` should be strictly increasing. Repeated positions do not fail; the
    /// evaluation floors the segment width at [`MIN_SEGMENT_WIDTH`].
    pub fn new(x: &[f64], y: &[f64]) -> Result<Self> {
        if x.len() != y.len() {
            return Err(FreeformError::LengthMismatch {
                what: "knot values",
                expected: x.len(),
                found: y.len(),
            });
        }
        if x.len() < 2 {
            return Err(FreeformError::TooFewKnots(x.len()));
        }
        Ok(fit(x, y))
    }

    /// Extended knot positions and values, including the synthetic ends.
    pub fn knots(&self) -> (&[f64], &[f64]) {
        (&self.x, &self.y)
    }

    /// One tangent per extended knot; the first and last are always zero.
    pub fn tangents(&self) -> &[f64] {
        &self.m
    }

    pub fn eval(&self, xt: &[f64]) -> Vec<f64> {
        hermite(&self.x, &self.y, &self.m, xt)
    }
}

/// Interpolate `(x, y)` monotonically at `xt`.
pub fn monospline(x: &[f64], y: &[f64], xt: &[f64]) -> Result<Vec<f64>> {
    Ok(MonoSpline::new(x, y)?.eval(xt))
}

/// Fit without validation. Callers guarantee `x.len() == y.len() >= 1`.
pub(crate) fn fit(x: &[f64], y: &[f64]) -> MonoSpline {
    debug_assert!(!x.is_empty() && x.len() == y.len());
    let n = x.len();

    let mut xe = Vec::with_capacity(n + 2);
    xe.push(x[0] - 1.0);
    xe.extend_from_slice(x);
    xe.push(x[n - 1] + 1.0);

    let mut ye = Vec::with_capacity(n + 2);
    ye.push(y[0]);
    ye.extend_from_slice(y);
    ye.push(y[n - 1]);

    let m = limited_tangents(&xe, &ye);
    MonoSpline { x: xe, y: ye, m }
}

fn limited_tangents(x: &[f64], y: &[f64]) -> Vec<f64> {
    let segments = x.len() - 1;
    let dy: Vec<f64> = y.windows(2).map(|w| w[1] - w[0]).collect();
    let delta: Vec<f64> = x
        .windows(2)
        .zip(&dy)
        .map(|(w, &dy)| dy / (w[1] - w[0]))
        .collect();

    let mut m = Vec::with_capacity(x.len());
    m.push(0.0);
    m.extend(delta.windows(2).map(|d| (d[0] + d[1]) / 2.0));
    m.push(0.0);

    // Flatness is judged on the initial estimates so that a plateau only
    // zeroes its own two tangents; the radius-3 limit uses the current ones
    // so a tangent shared by two limited segments satisfies both. A
    // zero-width segment has no finite secant and is treated as a step.
    let flat: Vec<bool> = (0..segments)
        .map(|i| {
            !delta[i].is_finite()
                || dy[i] == 0.0
                || m[i] / delta[i] == 0.0
                || m[i + 1] / delta[i] == 0.0
        })
        .collect();
    for i in (0..segments).filter(|&i| !delta[i].is_finite()) {
        m[i] = 0.0;
        m[i + 1] = 0.0;
    }

    for i in 0..segments {
        if flat[i] {
            m[i] = 0.0;
            m[i + 1] = 0.0;
            continue;
        }
        let alpha = m[i] / delta[i];
        let beta = m[i + 1] / delta[i];
        let d = alpha * alpha + beta * beta;
        if d > 9.0 {
            let tau = 3.0 / d.sqrt();
            m[i] = tau * alpha * delta[i];
            m[i + 1] = tau * beta * delta[i];
        }
    }
    m
}

/// Evaluate the cubic Hermite polynomial through `(x[i], y[i])` with slope
/// `m[i]` at each knot.
///
/// The segment for each query is found by binary search over the interior
/// knots and clamped to the outermost segments, so queries outside the knot
/// range extrapolate the end cubics.
///
/// With fewer than two knots there is no segment and every query is `NaN`.
///
/// # Panics
/// Panics if `y` or `m` is shorter than `x`.
pub fn hermite(x: &[f64], y: &[f64], m: &[f64], xt: &[f64]) -> Vec<f64> {
    if x.len() < 2 {
        return vec![f64::NAN; xt.len()];
    }
    let last = x.len() - 2;
    let interior = &x[1..=last];
    xt.iter()
        .map(|&t| {
            let i = interior.partition_point(|&v| v < t).min(last);
            let mut h = x[i + 1] - x[i];
            if h <= MIN_SEGMENT_WIDTH {
                h = MIN_SEGMENT_WIDTH;
            }
            let s = (y[i + 1] - y[i]) / h;
            let v = t - x[i];
            let c3 = (m[i] + m[i + 1] - 2.0 * s) / (h * h);
            let c2 = (3.0 * s - 2.0 * m[i] - m[i + 1]) / h;
            let c1 = m[i];
            let c0 = y[i];
            ((c3 * v + c2) * v + c1) * v + c0
        })
        .collect()
}
