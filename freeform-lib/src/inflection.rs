//! Inflection counting for freeform control-point sequences.
//!
//! Exposed to fits as a derived value so that wiggly interface profiles can
//! be penalized. It is a diagnostic only; rendering never consults it.

/// Count the inflection points of the polyline through `(x[i], y[i])`.
///
/// Each interior point is compared with the chord through its two
/// neighbours. Points exactly on the chord carry no sign and are skipped;
/// every sign change between the remaining deviations is one inflection.
/// Degenerate input (fewer than three points, coincident positions) never
/// fails: `NaN` deviations compare false and contribute nothing.
pub fn count_inflections(x: &[f64], y: &[f64]) -> usize {
    let n = x.len().min(y.len());
    if n < 3 {
        return 0;
    }

    let deviations: Vec<f64> = (1..n - 1)
        .map(|i| {
            let slope = (y[i + 1] - y[i - 1]) / (x[i + 1] - x[i - 1]);
            let intercept = y[i + 1] - slope * x[i + 1];
            y[i] - (slope * x[i] + intercept)
        })
        .filter(|&d| d != 0.0)
        .collect();

    deviations.windows(2).filter(|d| d[0] * d[1] < 0.0).count()
}

/// Inflections of the curve built by accumulating steps `dx`, `dy` from the
/// origin.
pub fn inflections(dx: &[f64], dy: &[f64]) -> usize {
    count_inflections(&cumulative(dx), &cumulative(dy))
}

/// `[0, s0, s0 + s1, ...]`
pub(crate) fn cumulative(steps: &[f64]) -> Vec<f64> {
    std::iter::once(0.0)
        .chain(steps.iter().scan(0.0, |acc, &s| {
            *acc += s;
            Some(*acc)
        }))
        .collect()
}
