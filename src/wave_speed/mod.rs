//! Signal-speed estimates for a pair of adjacent states.
//!
//! Looser estimates are cheaper but add more dissipation when used in a
//! Riemann-type flux. From loosest to tightest:
//!
//! - naive: `max(|v_ll|, |v_rr|) + max(c_ll, c_rr)`
//! - Davis: min/max of `v ± c` taken over both sides
//! - Einfeldt: Davis with the Roe-averaged speeds folded in
//!
//! For a normal direction `v` is the normal velocity `v · n` and `c` is
//! scaled by `|n|`, matching the scaling of the fluxes.

use serde::{Deserialize, Serialize};

use crate::equations::{Direction, Equations2D};

/// Selects a single maximum-speed estimate (Lax–Friedrichs dissipation).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxAbsSpeedEstimate {
    /// `max(|v_ll|, |v_rr|) + max(c_ll, c_rr)`
    Naive,
    /// `max(|v_ll| + c_ll, |v_rr| + c_rr)`
    #[default]
    Local,
}

impl MaxAbsSpeedEstimate {
    #[inline(always)]
    pub fn evaluate<E: Equations2D>(
        self,
        u_ll: &E::State,
        u_rr: &E::State,
        dir: Direction,
        eq: &E,
    ) -> f64 {
        match self {
            MaxAbsSpeedEstimate::Naive => max_abs_speed_naive(u_ll, u_rr, dir, eq),
            MaxAbsSpeedEstimate::Local => max_abs_speed(u_ll, u_rr, dir, eq),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MaxAbsSpeedEstimate::Naive => "naive",
            MaxAbsSpeedEstimate::Local => "local",
        }
    }
}

/// Selects a signed `(λ_min, λ_max)` estimate (HLL).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinMaxSpeedEstimate {
    Naive,
    #[default]
    Davis,
    Einfeldt,
}

impl MinMaxSpeedEstimate {
    #[inline(always)]
    pub fn evaluate<E: Equations2D>(
        self,
        u_ll: &E::State,
        u_rr: &E::State,
        dir: Direction,
        eq: &E,
    ) -> (f64, f64) {
        match self {
            MinMaxSpeedEstimate::Naive => min_max_speed_naive(u_ll, u_rr, dir, eq),
            MinMaxSpeedEstimate::Davis => min_max_speed_davis(u_ll, u_rr, dir, eq),
            MinMaxSpeedEstimate::Einfeldt => min_max_speed_einfeldt(u_ll, u_rr, dir, eq),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MinMaxSpeedEstimate::Naive => "naive",
            MinMaxSpeedEstimate::Davis => "davis",
            MinMaxSpeedEstimate::Einfeldt => "einfeldt",
        }
    }
}

/// Loosest bound: `max(|v_ll|, |v_rr|) + max(c_ll, c_rr)`.
#[inline]
pub fn max_abs_speed_naive<E: Equations2D>(
    u_ll: &E::State,
    u_rr: &E::State,
    dir: Direction,
    eq: &E,
) -> f64 {
    let (v_ll, c_ll) = eq.normal_velocity_and_sound_speed(u_ll, dir);
    let (v_rr, c_rr) = eq.normal_velocity_and_sound_speed(u_rr, dir);
    v_ll.abs().max(v_rr.abs()) + c_ll.max(c_rr)
}

/// `max(|v_ll| + c_ll, |v_rr| + c_rr)`.
#[inline]
pub fn max_abs_speed<E: Equations2D>(
    u_ll: &E::State,
    u_rr: &E::State,
    dir: Direction,
    eq: &E,
) -> f64 {
    let (v_ll, c_ll) = eq.normal_velocity_and_sound_speed(u_ll, dir);
    let (v_rr, c_rr) = eq.normal_velocity_and_sound_speed(u_rr, dir);
    (v_ll.abs() + c_ll).max(v_rr.abs() + c_rr)
}

/// Symmetric bounds `(-λ, λ)` from the naive maximum speed.
#[inline]
pub fn min_max_speed_naive<E: Equations2D>(
    u_ll: &E::State,
    u_rr: &E::State,
    dir: Direction,
    eq: &E,
) -> (f64, f64) {
    let lambda = max_abs_speed_naive(u_ll, u_rr, dir, eq);
    (-lambda, lambda)
}

/// Davis (1988): bounds over `v ± c` on both sides.
#[inline]
pub fn min_max_speed_davis<E: Equations2D>(
    u_ll: &E::State,
    u_rr: &E::State,
    dir: Direction,
    eq: &E,
) -> (f64, f64) {
    let (v_ll, c_ll) = eq.normal_velocity_and_sound_speed(u_ll, dir);
    let (v_rr, c_rr) = eq.normal_velocity_and_sound_speed(u_rr, dir);
    ((v_ll - c_ll).min(v_rr - c_rr), (v_ll + c_ll).max(v_rr + c_rr))
}

/// Einfeldt (1988): left/right signal speeds bounded by the Roe average.
#[inline]
pub fn min_max_speed_einfeldt<E: Equations2D>(
    u_ll: &E::State,
    u_rr: &E::State,
    dir: Direction,
    eq: &E,
) -> (f64, f64) {
    let (v_ll, c_ll) = eq.normal_velocity_and_sound_speed(u_ll, dir);
    let (v_rr, c_rr) = eq.normal_velocity_and_sound_speed(u_rr, dir);
    let (v_roe, c_roe) = eq.roe_average_speeds(u_ll, u_rr, dir);
    ((v_ll - c_ll).min(v_roe - c_roe), (v_rr + c_rr).max(v_roe + c_roe))
}
