//! Central (arithmetic-mean) flux.
//!
//! Non-dissipative; useful as a baseline and as the volume flux of a
//! standard DG discretization.

use super::traits::SurfaceFlux;
use crate::equations::{Direction, Equations2D};

/// `½ (f(u_ll) + f(u_rr)) · n`
#[inline(always)]
pub fn flux_central<E: Equations2D>(
    u_ll: &E::State,
    u_rr: &E::State,
    dir: Direction,
    eq: &E,
) -> E::State {
    (eq.flux(u_ll, dir) + eq.flux(u_rr, dir)) * 0.5
}

#[derive(Clone, Copy, Debug, Default)]
pub struct FluxCentral;

impl<E: Equations2D> SurfaceFlux<E> for FluxCentral {
    #[inline(always)]
    fn compute(&self, u_ll: &E::State, u_rr: &E::State, dir: Direction, eq: &E) -> E::State {
        flux_central(u_ll, u_rr, dir, eq)
    }

    fn name(&self) -> &'static str {
        "central"
    }
}
