//! Two-point fluxes for the shallow water equations with topography.
//!
//! The conservative fluxes below are entropy conservative for a flat bottom.
//! Each is paired with a non-conservative flux `G` for the term `g h ∇b`;
//! the surface contribution on the `ll` side of a face is
//! `F*(u_ll, u_rr) + ½ G(u_ll, u_rr)` (see `solver::interface_flux`).
//!
//! Well-balanced pairings (lake at rest preserved exactly):
//!
//! - `flux_fjordholm_etal` + `flux_nonconservative_fjordholm_etal`
//! - `flux_wintermeyer_etal` + `flux_nonconservative_wintermeyer_etal`
//! - any consistent flux under [`FluxHydrostaticReconstruction`] +
//!   `flux_nonconservative_audusse_etal`, also across discontinuous `b`

use super::central::flux_central;
use super::hll::flux_hll;
use super::lax_friedrichs::flux_lax_friedrichs;
use super::traits::{BoxedNonconservativeFlux, BoxedSurfaceFlux, NonconservativeFlux, SurfaceFlux};
use crate::config::{ConfigError, NonconservativeFluxConfig, SurfaceFluxConfig};
use crate::equations::{Direction, Equations2D, ShallowWater2D, ShallowWaterState2D};
use crate::wave_speed::{MaxAbsSpeedEstimate, MinMaxSpeedEstimate};

type State = ShallowWaterState2D;

// =============================================================================
// Entropy-conservative fluxes
// =============================================================================

/// Energy-conservative flux of Fjordholm, Mishra and Tadmor.
///
/// Built from arithmetic averages of `h` and `v` and `¼ g (h_ll² + h_rr²)`.
///
/// Fjordholm, Mishra, Tadmor (2011), https://doi.org/10.1016/j.jcp.2011.03.042
#[inline]
pub fn flux_fjordholm_etal(u_ll: &State, u_rr: &State, dir: Direction, eq: &ShallowWater2D) -> State {
    let (n1, n2) = dir.components();
    let (v1_ll, v2_ll) = u_ll.velocity();
    let (v1_rr, v2_rr) = u_rr.velocity();

    let h_avg = 0.5 * (u_ll.h + u_rr.h);
    let v1_avg = 0.5 * (v1_ll + v1_rr);
    let v2_avg = 0.5 * (v2_ll + v2_rr);
    let p_avg = 0.25 * eq.gravity * (u_ll.h * u_ll.h + u_rr.h * u_rr.h);

    let f1 = h_avg * (v1_avg * n1 + v2_avg * n2);
    State::new(f1, f1 * v1_avg + p_avg * n1, f1 * v2_avg + p_avg * n2, 0.0)
}

/// Entropy-conservative split-form flux of Wintermeyer et al.
///
/// Averages momenta instead of height times velocity; the pressure term is
/// `½ g h_ll h_rr`.
///
/// Wintermeyer, Winters, Gassner, Kopriva (2017),
/// https://doi.org/10.1016/j.jcp.2017.03.036
#[inline]
pub fn flux_wintermeyer_etal(u_ll: &State, u_rr: &State, dir: Direction, eq: &ShallowWater2D) -> State {
    let (n1, n2) = dir.components();
    let (v1_ll, v2_ll) = u_ll.velocity();
    let (v1_rr, v2_rr) = u_rr.velocity();

    let h_v1_avg = 0.5 * (u_ll.h_v1 + u_rr.h_v1);
    let h_v2_avg = 0.5 * (u_ll.h_v2 + u_rr.h_v2);
    let v1_avg = 0.5 * (v1_ll + v1_rr);
    let v2_avg = 0.5 * (v2_ll + v2_rr);
    let p_avg = 0.5 * eq.gravity * u_ll.h * u_rr.h;

    let f1 = h_v1_avg * n1 + h_v2_avg * n2;
    State::new(f1, f1 * v1_avg + p_avg * n1, f1 * v2_avg + p_avg * n2, 0.0)
}

// =============================================================================
// Non-conservative fluxes
// =============================================================================

#[inline(always)]
fn topography_source(magnitude: f64, dir: Direction) -> State {
    let (n1, n2) = dir.components();
    State::new(0.0, magnitude * n1, magnitude * n2, 0.0)
}

/// `(0, g h_ll Δb n, 0)`, the partner of [`flux_wintermeyer_etal`].
#[inline]
pub fn flux_nonconservative_wintermeyer_etal(
    u_ll: &State,
    u_rr: &State,
    dir: Direction,
    eq: &ShallowWater2D,
) -> State {
    topography_source(eq.gravity * u_ll.h * (u_rr.b - u_ll.b), dir)
}

/// `(0, g h_avg Δb n, 0)`, the partner of [`flux_fjordholm_etal`].
#[inline]
pub fn flux_nonconservative_fjordholm_etal(
    u_ll: &State,
    u_rr: &State,
    dir: Direction,
    eq: &ShallowWater2D,
) -> State {
    let h_avg = 0.5 * (u_ll.h + u_rr.h);
    topography_source(eq.gravity * h_avg * (u_rr.b - u_ll.b), dir)
}

/// `(0, g (h_ll² - h_ll*²) n, 0)` with the hydrostatically reconstructed
/// height `h_ll*`.
///
/// Audusse, Bouchut, Bristeau, Klein, Perthame (2004),
/// https://doi.org/10.1137/S1064827503431090
#[inline]
pub fn flux_nonconservative_audusse_etal(
    u_ll: &State,
    u_rr: &State,
    dir: Direction,
    eq: &ShallowWater2D,
) -> State {
    let (u_ll_star, _) = hydrostatic_reconstruction_audusse_etal(u_ll, u_rr);
    topography_source(eq.gravity * (u_ll.h * u_ll.h - u_ll_star.h * u_ll_star.h), dir)
}

// =============================================================================
// Hydrostatic reconstruction
// =============================================================================

/// Reconstruct both sides against the higher of the two bottoms:
/// `h* = max(0, h + b - max(b_ll, b_rr))`.
///
/// Velocities and each side's own `b` are kept. With equal bottoms and
/// non-negative heights this is the identity.
#[inline]
pub fn hydrostatic_reconstruction_audusse_etal(u_ll: &State, u_rr: &State) -> (State, State) {
    let b_star = u_ll.b.max(u_rr.b);

    let reconstruct = |u: &State| {
        let (v1, v2) = u.velocity();
        let h_star = (u.h + u.b - b_star).max(0.0);
        State::new(h_star, h_star * v1, h_star * v2, u.b)
    };

    (reconstruct(u_ll), reconstruct(u_rr))
}

/// Evaluate a base flux on the hydrostatically reconstructed pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FluxHydrostaticReconstruction<F> {
    pub base: F,
}

impl<F> FluxHydrostaticReconstruction<F> {
    pub fn new(base: F) -> Self {
        Self { base }
    }
}

impl<F: SurfaceFlux<ShallowWater2D>> SurfaceFlux<ShallowWater2D> for FluxHydrostaticReconstruction<F> {
    #[inline(always)]
    fn compute(&self, u_ll: &State, u_rr: &State, dir: Direction, eq: &ShallowWater2D) -> State {
        let (u_ll_star, u_rr_star) = hydrostatic_reconstruction_audusse_etal(u_ll, u_rr);
        self.base.compute(&u_ll_star, &u_rr_star, dir, eq)
    }

    fn name(&self) -> &'static str {
        "hydrostatic_reconstruction"
    }
}

// =============================================================================
// Trait wrappers
// =============================================================================

#[derive(Clone, Copy, Debug, Default)]
pub struct FluxFjordholmEtal;

impl SurfaceFlux<ShallowWater2D> for FluxFjordholmEtal {
    #[inline(always)]
    fn compute(&self, u_ll: &State, u_rr: &State, dir: Direction, eq: &ShallowWater2D) -> State {
        flux_fjordholm_etal(u_ll, u_rr, dir, eq)
    }

    fn name(&self) -> &'static str {
        "fjordholm_etal"
    }

    fn is_entropy_conservative(&self) -> bool {
        true
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct FluxWintermeyerEtal;

impl SurfaceFlux<ShallowWater2D> for FluxWintermeyerEtal {
    #[inline(always)]
    fn compute(&self, u_ll: &State, u_rr: &State, dir: Direction, eq: &ShallowWater2D) -> State {
        flux_wintermeyer_etal(u_ll, u_rr, dir, eq)
    }

    fn name(&self) -> &'static str {
        "wintermeyer_etal"
    }

    fn is_entropy_conservative(&self) -> bool {
        true
    }
}

/// Runtime-selected conservative flux for the shallow water equations.
///
/// Zero-cost dispatch: matching on the enum is as fast as calling the flux
/// function directly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ShallowWaterFlux {
    Central,
    LaxFriedrichs {
        estimate: MaxAbsSpeedEstimate,
    },
    Hll {
        estimate: MinMaxSpeedEstimate,
    },
    #[default]
    FjordholmEtal,
    WintermeyerEtal,
}

impl SurfaceFlux<ShallowWater2D> for ShallowWaterFlux {
    #[inline]
    fn compute(&self, u_ll: &State, u_rr: &State, dir: Direction, eq: &ShallowWater2D) -> State {
        match *self {
            ShallowWaterFlux::Central => flux_central(u_ll, u_rr, dir, eq),
            ShallowWaterFlux::LaxFriedrichs { estimate } => {
                flux_lax_friedrichs(u_ll, u_rr, dir, eq, estimate)
            }
            ShallowWaterFlux::Hll { estimate } => flux_hll(u_ll, u_rr, dir, eq, estimate),
            ShallowWaterFlux::FjordholmEtal => flux_fjordholm_etal(u_ll, u_rr, dir, eq),
            ShallowWaterFlux::WintermeyerEtal => flux_wintermeyer_etal(u_ll, u_rr, dir, eq),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ShallowWaterFlux::Central => "central",
            ShallowWaterFlux::LaxFriedrichs { .. } => "lax_friedrichs",
            ShallowWaterFlux::Hll { .. } => "hll",
            ShallowWaterFlux::FjordholmEtal => "fjordholm_etal",
            ShallowWaterFlux::WintermeyerEtal => "wintermeyer_etal",
        }
    }

    fn is_entropy_conservative(&self) -> bool {
        matches!(
            self,
            ShallowWaterFlux::FjordholmEtal | ShallowWaterFlux::WintermeyerEtal
        )
    }
}

impl TryFrom<SurfaceFluxConfig> for ShallowWaterFlux {
    type Error = ConfigError;

    fn try_from(config: SurfaceFluxConfig) -> Result<Self, Self::Error> {
        match config {
            SurfaceFluxConfig::Central => Ok(ShallowWaterFlux::Central),
            SurfaceFluxConfig::LaxFriedrichs { estimate } => {
                Ok(ShallowWaterFlux::LaxFriedrichs { estimate })
            }
            SurfaceFluxConfig::Hll { estimate } => Ok(ShallowWaterFlux::Hll { estimate }),
            SurfaceFluxConfig::FjordholmEtal => Ok(ShallowWaterFlux::FjordholmEtal),
            SurfaceFluxConfig::WintermeyerEtal => Ok(ShallowWaterFlux::WintermeyerEtal),
            SurfaceFluxConfig::Ranocha
            | SurfaceFluxConfig::Chandrashekar
            | SurfaceFluxConfig::ShimaEtal
            | SurfaceFluxConfig::KennedyGruber => Err(ConfigError::Unsupported {
                what: "compressible Euler surface flux",
                equations: ShallowWater2D::NAME,
            }),
        }
    }
}

/// Runtime-selected non-conservative flux for the topography term.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ShallowWaterNonconservativeFlux {
    WintermeyerEtal,
    #[default]
    FjordholmEtal,
    AudusseEtal,
}

impl NonconservativeFlux<ShallowWater2D> for ShallowWaterNonconservativeFlux {
    #[inline]
    fn compute(&self, u_ll: &State, u_rr: &State, dir: Direction, eq: &ShallowWater2D) -> State {
        match self {
            ShallowWaterNonconservativeFlux::WintermeyerEtal => {
                flux_nonconservative_wintermeyer_etal(u_ll, u_rr, dir, eq)
            }
            ShallowWaterNonconservativeFlux::FjordholmEtal => {
                flux_nonconservative_fjordholm_etal(u_ll, u_rr, dir, eq)
            }
            ShallowWaterNonconservativeFlux::AudusseEtal => {
                flux_nonconservative_audusse_etal(u_ll, u_rr, dir, eq)
            }
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ShallowWaterNonconservativeFlux::WintermeyerEtal => "nonconservative_wintermeyer_etal",
            ShallowWaterNonconservativeFlux::FjordholmEtal => "nonconservative_fjordholm_etal",
            ShallowWaterNonconservativeFlux::AudusseEtal => "nonconservative_audusse_etal",
        }
    }
}

impl From<NonconservativeFluxConfig> for ShallowWaterNonconservativeFlux {
    fn from(config: NonconservativeFluxConfig) -> Self {
        match config {
            NonconservativeFluxConfig::WintermeyerEtal => ShallowWaterNonconservativeFlux::WintermeyerEtal,
            NonconservativeFluxConfig::FjordholmEtal => ShallowWaterNonconservativeFlux::FjordholmEtal,
            NonconservativeFluxConfig::AudusseEtal => ShallowWaterNonconservativeFlux::AudusseEtal,
        }
    }
}

/// Create a boxed surface flux from configuration.
pub fn create_shallow_water_flux(
    config: SurfaceFluxConfig,
    hydrostatic_reconstruction: bool,
) -> Result<BoxedSurfaceFlux<ShallowWater2D>, ConfigError> {
    let base = ShallowWaterFlux::try_from(config)?;
    if hydrostatic_reconstruction {
        Ok(Box::new(FluxHydrostaticReconstruction::new(base)))
    } else {
        Ok(Box::new(base))
    }
}

/// Create a boxed non-conservative flux from configuration.
pub fn create_shallow_water_nonconservative_flux(
    config: NonconservativeFluxConfig,
) -> BoxedNonconservativeFlux<ShallowWater2D> {
    Box::new(ShallowWaterNonconservativeFlux::from(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equations::StateVector;

    const TOL: f64 = 1e-12;

    fn eq() -> ShallowWater2D {
        ShallowWater2D::new(9.81, 1.0)
    }

    #[test]
    fn test_fjordholm_pressure_average() {
        let eq = eq();
        let u_ll = State::from_primitives(2.0, 0.0, 0.0, 0.0);
        let u_rr = State::from_primitives(1.0, 0.0, 0.0, 0.0);
        let f = flux_fjordholm_etal(&u_ll, &u_rr, Direction::X, &eq);
        assert_eq!(f.h, 0.0);
        assert!((f.h_v1 - 0.25 * 9.81 * 5.0).abs() < TOL);
    }

    #[test]
    fn test_wintermeyer_pressure_product() {
        let eq = eq();
        let u_ll = State::from_primitives(2.0, 0.0, 0.0, 0.0);
        let u_rr = State::from_primitives(1.0, 0.0, 0.0, 0.0);
        let f = flux_wintermeyer_etal(&u_ll, &u_rr, Direction::Y, &eq);
        assert!((f.h_v2 - 0.5 * 9.81 * 2.0).abs() < TOL);
        assert_eq!(f.h_v1, 0.0);
    }

    #[test]
    fn test_reconstruction_clips_dry_side() {
        // Left free surface lies below the right bottom.
        let u_ll = State::from_primitives(0.2, 1.0, 0.0, 0.0);
        let u_rr = State::from_primitives(0.5, 0.0, 0.0, 0.5);
        let (ll_star, rr_star) = hydrostatic_reconstruction_audusse_etal(&u_ll, &u_rr);
        assert_eq!(ll_star.h, 0.0);
        assert_eq!(ll_star.h_v1, 0.0);
        assert_eq!(ll_star.b, 0.0);
        assert_eq!(rr_star, u_rr);
    }

    #[test]
    fn test_audusse_vanishes_for_flat_bottom() {
        let eq = eq();
        let u_ll = State::from_primitives(1.25, 0.2, 0.1, 0.5);
        let u_rr = State::from_primitives(0.75, -0.3, 0.0, 0.5);
        let g = flux_nonconservative_audusse_etal(&u_ll, &u_rr, Direction::X, &eq);
        assert_eq!(g, State::zero());
    }

    #[test]
    fn test_hydrostatic_wrapper_on_smooth_pair() {
        let eq = eq();
        let u_ll = State::from_primitives(1.3, 0.2, 0.1, 0.4);
        let u_rr = State::from_primitives(0.9, -0.3, 0.0, 0.4);
        let wrapped = FluxHydrostaticReconstruction::new(FluxFjordholmEtal);
        let f = wrapped.compute(&u_ll, &u_rr, Direction::X, &eq);
        let direct = flux_fjordholm_etal(&u_ll, &u_rr, Direction::X, &eq);
        assert!(f.max_abs_diff(&direct) < TOL);
    }

    #[test]
    fn test_enum_matches_functions() {
        let eq = eq();
        let u_ll = State::from_primitives(1.3, 0.2, 0.1, 0.4);
        let u_rr = State::from_primitives(0.9, -0.3, 0.0, 0.1);
        let dir = Direction::normal(0.3, 0.7);

        assert_eq!(
            ShallowWaterFlux::WintermeyerEtal.compute(&u_ll, &u_rr, dir, &eq),
            flux_wintermeyer_etal(&u_ll, &u_rr, dir, &eq)
        );
        assert_eq!(
            ShallowWaterNonconservativeFlux::AudusseEtal.compute(&u_ll, &u_rr, dir, &eq),
            flux_nonconservative_audusse_etal(&u_ll, &u_rr, dir, &eq)
        );
        assert!(ShallowWaterFlux::FjordholmEtal.is_entropy_conservative());
        assert!(!ShallowWaterFlux::Central.is_entropy_conservative());
    }

    #[test]
    fn test_create_from_config() {
        let flux = create_shallow_water_flux(SurfaceFluxConfig::FjordholmEtal, true).unwrap();
        assert_eq!(flux.name(), "hydrostatic_reconstruction");

        let err = create_shallow_water_flux(SurfaceFluxConfig::Ranocha, false).err().unwrap();
        assert!(matches!(err, ConfigError::Unsupported { .. }));

        let noncons = create_shallow_water_nonconservative_flux(NonconservativeFluxConfig::AudusseEtal);
        assert_eq!(noncons.name(), "nonconservative_audusse_etal");
    }
}
