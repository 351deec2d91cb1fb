//! Trait-based numerical flux abstraction.
//!
//! Every flux is a plain function of two adjacent states, a direction and
//! the equation descriptor. The traits wrap those functions so a setup can
//! store a runtime-selected flux, either as a zero-cost enum (see
//! `ShallowWaterFlux`, `EulerFlux`) or as a boxed trait object.
//!
//! # Example
//! ```
//! use dgsem_rs::equations::{Direction, ShallowWater2D, ShallowWaterState2D};
//! use dgsem_rs::flux::{FluxFjordholmEtal, FluxLaxFriedrichs, SurfaceFlux};
//!
//! let eq = ShallowWater2D::standard();
//! let u_ll = ShallowWaterState2D::from_primitives(2.0, 0.5, 0.0, 0.0);
//! let u_rr = ShallowWaterState2D::from_primitives(1.0, 0.0, 0.0, 0.0);
//!
//! // Using concrete type
//! let f_ec = FluxFjordholmEtal.compute(&u_ll, &u_rr, Direction::X, &eq);
//!
//! // Using trait object
//! let flux: &dyn SurfaceFlux<ShallowWater2D> = &FluxLaxFriedrichs::default();
//! let f_llf = flux.compute(&u_ll, &u_rr, Direction::X, &eq);
//! assert!(f_llf.h > f_ec.h);
//! ```

use crate::equations::{Direction, Equations2D};

/// Conservative two-point numerical flux `F*(u_ll, u_rr) · n`.
///
/// # Implementation Notes
///
/// - Fluxes must be consistent: `F*(u, u) = f(u) · n`
/// - Fluxes must be conservative: `F*(u_ll, u_rr; n) = -F*(u_rr, u_ll; -n)`
/// - For an unnormalised `n` the result is scaled by `|n|`
/// - `compute` must not allocate
pub trait SurfaceFlux<E: Equations2D>: Send + Sync {
    fn compute(&self, u_ll: &E::State, u_rr: &E::State, dir: Direction, eq: &E) -> E::State;

    /// Human-readable name for debugging and logging.
    fn name(&self) -> &'static str;

    /// Whether the flux satisfies the discrete entropy-conservation identity.
    fn is_entropy_conservative(&self) -> bool {
        false
    }
}

/// Two-point flux of a non-conservative term.
///
/// Not symmetric: `G(u_ll, u_rr)` is the contribution seen from the
/// `u_ll` side of the face. The interface glue adds `½ G` to each side.
pub trait NonconservativeFlux<E: Equations2D>: Send + Sync {
    fn compute(&self, u_ll: &E::State, u_rr: &E::State, dir: Direction, eq: &E) -> E::State;

    fn name(&self) -> &'static str;
}

impl<E: Equations2D, F: SurfaceFlux<E> + ?Sized> SurfaceFlux<E> for Box<F> {
    #[inline(always)]
    fn compute(&self, u_ll: &E::State, u_rr: &E::State, dir: Direction, eq: &E) -> E::State {
        (**self).compute(u_ll, u_rr, dir, eq)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn is_entropy_conservative(&self) -> bool {
        (**self).is_entropy_conservative()
    }
}

impl<E: Equations2D, G: NonconservativeFlux<E> + ?Sized> NonconservativeFlux<E> for Box<G> {
    #[inline(always)]
    fn compute(&self, u_ll: &E::State, u_rr: &E::State, dir: Direction, eq: &E) -> E::State {
        (**self).compute(u_ll, u_rr, dir, eq)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Boxed surface flux for configuration-driven selection.
pub type BoxedSurfaceFlux<E> = Box<dyn SurfaceFlux<E>>;

/// Boxed non-conservative flux for configuration-driven selection.
pub type BoxedNonconservativeFlux<E> = Box<dyn NonconservativeFlux<E>>;
