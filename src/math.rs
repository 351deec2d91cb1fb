//! Numerically stable means used by the entropy-conservative fluxes.

/// Relative-difference threshold `f² = ((x - y)/(x + y))²` below which the
/// logarithmic mean is evaluated by its series expansion.
const LN_MEAN_SERIES_THRESHOLD: f64 = 1.0e-4;

#[inline(always)]
fn relative_difference_squared(x: f64, y: f64) -> f64 {
    (x * (x - 2.0 * y) + y * y) / (x * (x + 2.0 * y) + y * y)
}

#[inline(always)]
fn ln_mean_series(f2: f64) -> f64 {
    2.0 + f2 * (2.0 / 3.0 + f2 * (2.0 / 5.0 + f2 * (2.0 / 7.0)))
}

/// Logarithmic mean `(y - x) / ln(y / x)` of two positive numbers.
///
/// For nearly equal arguments the quotient is replaced by a truncated series
/// in `f² = ((x - y)/(x + y))²`, which is accurate to machine precision and
/// avoids the `0 / 0` at `x == y`.
///
/// Ismail and Roe (2009), https://doi.org/10.1016/j.jcp.2009.04.021
#[inline]
pub fn ln_mean(x: f64, y: f64) -> f64 {
    let f2 = relative_difference_squared(x, y);
    if f2 < LN_MEAN_SERIES_THRESHOLD {
        (x + y) / ln_mean_series(f2)
    } else {
        (y - x) / (y / x).ln()
    }
}

/// Inverse logarithmic mean `ln(y / x) / (y - x)`.
///
/// Cheaper than `1 / ln_mean(x, y)` because the series branch needs no
/// division by the polynomial.
#[inline]
pub fn inv_ln_mean(x: f64, y: f64) -> f64 {
    let f2 = relative_difference_squared(x, y);
    if f2 < LN_MEAN_SERIES_THRESHOLD {
        ln_mean_series(f2) / (x + y)
    } else {
        (y / x).ln() / (y - x)
    }
}
