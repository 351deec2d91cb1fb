//! HLL (Harten–Lax–van Leer) approximate Riemann solver.
//!
//! The HLL solver uses a two-wave approximation to the Riemann problem:
//!
//! F* = (λ_max F_ll - λ_min F_rr + λ_min λ_max (u_rr - u_ll)) / (λ_max - λ_min)
//!
//! with pure upwinding when both signal speeds share a sign. The signal
//! speeds come from a [`MinMaxSpeedEstimate`]; the dissipative part is
//! masked on non-transported components.
//!
//! Reference: Harten, Lax, van Leer (1983), https://doi.org/10.1137/1025002

use thiserror::Error;

use super::traits::SurfaceFlux;
use crate::equations::{Direction, Equations2D};
use crate::wave_speed::MinMaxSpeedEstimate;

/// Errors from checked flux evaluation.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum FluxError {
    /// Speeds are equal, unordered or NaN, so no two-wave fan separates
    /// the states.
    #[error("degenerate HLL wave speeds: lambda_min = {lambda_min}, lambda_max = {lambda_max}")]
    DegenerateWaveSpeeds { lambda_min: f64, lambda_max: f64 },
}

enum HllBranch {
    Left,
    Right,
    Blend,
}

#[inline(always)]
fn select_branch(lambda_min: f64, lambda_max: f64) -> HllBranch {
    if lambda_min >= 0.0 {
        HllBranch::Left
    } else if lambda_max <= 0.0 {
        HllBranch::Right
    } else {
        HllBranch::Blend
    }
}

#[inline(always)]
fn hll_blend<E: Equations2D>(
    u_ll: &E::State,
    u_rr: &E::State,
    f_ll: E::State,
    f_rr: E::State,
    lambda_min: f64,
    lambda_max: f64,
    eq: &E,
) -> E::State {
    let inv_delta = 1.0 / (lambda_max - lambda_min);
    let dissipation = eq.mask_dissipation((*u_rr - *u_ll) * (lambda_min * lambda_max * inv_delta));
    (f_ll * lambda_max - f_rr * lambda_min) * inv_delta + dissipation
}

/// HLL flux for given signal speeds `λ_min < λ_max`.
///
/// Callers must supply strictly ordered speeds; inverted or NaN speeds
/// reaching the blend are a contract violation, caught only in debug builds.
/// Use [`try_flux_hll_with_speeds`] where the speeds cannot be trusted.
#[inline]
pub fn flux_hll_with_speeds<E: Equations2D>(
    u_ll: &E::State,
    u_rr: &E::State,
    dir: Direction,
    eq: &E,
    lambda_min: f64,
    lambda_max: f64,
) -> E::State {
    match select_branch(lambda_min, lambda_max) {
        HllBranch::Left => eq.flux(u_ll, dir),
        HllBranch::Right => eq.flux(u_rr, dir),
        HllBranch::Blend => {
            debug_assert!(
                lambda_max > lambda_min,
                "degenerate HLL wave speeds ({lambda_min}, {lambda_max})"
            );
            let f_ll = eq.flux(u_ll, dir);
            let f_rr = eq.flux(u_rr, dir);
            hll_blend(u_ll, u_rr, f_ll, f_rr, lambda_min, lambda_max, eq)
        }
    }
}

/// Checked variant of [`flux_hll_with_speeds`]; equal speeds are an error.
pub fn try_flux_hll_with_speeds<E: Equations2D>(
    u_ll: &E::State,
    u_rr: &E::State,
    dir: Direction,
    eq: &E,
    lambda_min: f64,
    lambda_max: f64,
) -> Result<E::State, FluxError> {
    // Also rejects NaN.
    if !(lambda_min < lambda_max) {
        return Err(FluxError::DegenerateWaveSpeeds {
            lambda_min,
            lambda_max,
        });
    }
    Ok(flux_hll_with_speeds(u_ll, u_rr, dir, eq, lambda_min, lambda_max))
}

/// HLL flux with signal speeds from `estimate`.
#[inline]
pub fn flux_hll<E: Equations2D>(
    u_ll: &E::State,
    u_rr: &E::State,
    dir: Direction,
    eq: &E,
    estimate: MinMaxSpeedEstimate,
) -> E::State {
    let (lambda_min, lambda_max) = estimate.evaluate(u_ll, u_rr, dir, eq);
    flux_hll_with_speeds(u_ll, u_rr, dir, eq, lambda_min, lambda_max)
}

/// Checked HLL flux; fails instead of dividing by a degenerate speed gap.
pub fn try_flux_hll<E: Equations2D>(
    u_ll: &E::State,
    u_rr: &E::State,
    dir: Direction,
    eq: &E,
    estimate: MinMaxSpeedEstimate,
) -> Result<E::State, FluxError> {
    let (lambda_min, lambda_max) = estimate.evaluate(u_ll, u_rr, dir, eq);
    try_flux_hll_with_speeds(u_ll, u_rr, dir, eq, lambda_min, lambda_max)
}

/// More robust than central-type fluxes for strong shocks, but more
/// diffusive at contacts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FluxHLL {
    pub estimate: MinMaxSpeedEstimate,
}

impl FluxHLL {
    pub fn new(estimate: MinMaxSpeedEstimate) -> Self {
        Self { estimate }
    }
}

impl<E: Equations2D> SurfaceFlux<E> for FluxHLL {
    #[inline(always)]
    fn compute(&self, u_ll: &E::State, u_rr: &E::State, dir: Direction, eq: &E) -> E::State {
        flux_hll(u_ll, u_rr, dir, eq, self.estimate)
    }

    fn name(&self) -> &'static str {
        match self.estimate {
            MinMaxSpeedEstimate::Naive => "hll_naive",
            MinMaxSpeedEstimate::Davis => "hll_davis",
            MinMaxSpeedEstimate::Einfeldt => "hll_einfeldt",
        }
    }
}
