//! Two-point fluxes for the compressible Euler equations.
//!
//! All four are split-form (volume) fluxes that are also usable at faces.
//! `flux_ranocha` and `flux_chandrashekar` are entropy conservative for the
//! entropy `-ρ s / (γ - 1)`; the other two are kinetic-energy preserving.

use super::central::flux_central;
use super::hll::flux_hll;
use super::lax_friedrichs::flux_lax_friedrichs;
use super::traits::{BoxedSurfaceFlux, SurfaceFlux};
use crate::config::{ConfigError, SurfaceFluxConfig};
use crate::equations::{CompressibleEuler2D, Direction, Equations2D, EulerState2D};
use crate::math::{inv_ln_mean, ln_mean};
use crate::wave_speed::{MaxAbsSpeedEstimate, MinMaxSpeedEstimate};

type State = EulerState2D;

/// Primitive quantities of both sides, unpacked once per flux call.
struct PrimitivePair {
    rho_ll: f64,
    v1_ll: f64,
    v2_ll: f64,
    p_ll: f64,
    rho_rr: f64,
    v1_rr: f64,
    v2_rr: f64,
    p_rr: f64,
}

impl PrimitivePair {
    #[inline(always)]
    fn new(u_ll: &State, u_rr: &State, eq: &CompressibleEuler2D) -> Self {
        let prim_ll = eq.cons2prim(u_ll);
        let prim_rr = eq.cons2prim(u_rr);
        Self {
            rho_ll: prim_ll.rho,
            v1_ll: prim_ll.v1,
            v2_ll: prim_ll.v2,
            p_ll: prim_ll.p,
            rho_rr: prim_rr.rho,
            v1_rr: prim_rr.v1,
            v2_rr: prim_rr.v2,
            p_rr: prim_rr.p,
        }
    }
}

/// Entropy-conserving and kinetic-energy-preserving flux of Ranocha.
///
/// Uses logarithmic means of density and of `ρ / p`.
///
/// Ranocha (2018), https://doi.org/10.1007/s42967-019-0001-3
#[inline]
pub fn flux_ranocha(u_ll: &State, u_rr: &State, dir: Direction, eq: &CompressibleEuler2D) -> State {
    let (n1, n2) = dir.components();
    let PrimitivePair {
        rho_ll,
        v1_ll,
        v2_ll,
        p_ll,
        rho_rr,
        v1_rr,
        v2_rr,
        p_rr,
    } = PrimitivePair::new(u_ll, u_rr, eq);

    let v_dot_n_ll = v1_ll * n1 + v2_ll * n2;
    let v_dot_n_rr = v1_rr * n1 + v2_rr * n2;

    let rho_mean = ln_mean(rho_ll, rho_rr);
    // p_ll p_rr / ln_mean(ρ_ll p_rr, ρ_rr p_ll) = 1 / ln_mean(ρ_ll / p_ll, ρ_rr / p_rr)
    let inv_rho_p_mean = p_ll * p_rr * inv_ln_mean(rho_ll * p_rr, rho_rr * p_ll);
    let v1_avg = 0.5 * (v1_ll + v1_rr);
    let v2_avg = 0.5 * (v2_ll + v2_rr);
    let p_avg = 0.5 * (p_ll + p_rr);
    let velocity_square_avg = 0.5 * (v1_ll * v1_rr + v2_ll * v2_rr);

    let f1 = rho_mean * 0.5 * (v_dot_n_ll + v_dot_n_rr);
    State::new(
        f1,
        f1 * v1_avg + p_avg * n1,
        f1 * v2_avg + p_avg * n2,
        f1 * (velocity_square_avg + inv_rho_p_mean * eq.inv_gamma_minus_one())
            + 0.5 * (p_ll * v_dot_n_rr + p_rr * v_dot_n_ll),
    )
}

/// Entropy-conserving and kinetic-energy-preserving flux of Chandrashekar.
///
/// Uses logarithmic means of density and inverse temperature `β = ρ / 2p`.
///
/// Chandrashekar (2013), https://doi.org/10.4208/cicp.170712.010313a
#[inline]
pub fn flux_chandrashekar(
    u_ll: &State,
    u_rr: &State,
    dir: Direction,
    eq: &CompressibleEuler2D,
) -> State {
    let (n1, n2) = dir.components();
    let PrimitivePair {
        rho_ll,
        v1_ll,
        v2_ll,
        p_ll,
        rho_rr,
        v1_rr,
        v2_rr,
        p_rr,
    } = PrimitivePair::new(u_ll, u_rr, eq);

    let beta_ll = 0.5 * rho_ll / p_ll;
    let beta_rr = 0.5 * rho_rr / p_rr;
    let specific_kin_ll = v1_ll * v1_ll + v2_ll * v2_ll;
    let specific_kin_rr = v1_rr * v1_rr + v2_rr * v2_rr;

    let rho_avg = 0.5 * (rho_ll + rho_rr);
    let rho_mean = ln_mean(rho_ll, rho_rr);
    let beta_mean = ln_mean(beta_ll, beta_rr);
    let beta_avg = 0.5 * (beta_ll + beta_rr);
    let v1_avg = 0.5 * (v1_ll + v1_rr);
    let v2_avg = 0.5 * (v2_ll + v2_rr);
    let p_mean = 0.5 * rho_avg / beta_avg;
    let velocity_square_avg = 0.5 * (specific_kin_ll + specific_kin_rr);

    let f1 = rho_mean * (v1_avg * n1 + v2_avg * n2);
    let f2 = f1 * v1_avg + p_mean * n1;
    let f3 = f1 * v2_avg + p_mean * n2;
    let f4 = f1 * 0.5 * (eq.inv_gamma_minus_one() / beta_mean - velocity_square_avg)
        + f2 * v1_avg
        + f3 * v2_avg;
    State::new(f1, f2, f3, f4)
}

/// Kinetic-energy and pressure-equilibrium preserving flux of Shima et al.
///
/// Shima, Kuya, Tamaki, Kawai (2021), https://doi.org/10.1016/j.jcp.2020.110060
#[inline]
pub fn flux_shima_etal(u_ll: &State, u_rr: &State, dir: Direction, eq: &CompressibleEuler2D) -> State {
    let (n1, n2) = dir.components();
    let PrimitivePair {
        rho_ll,
        v1_ll,
        v2_ll,
        p_ll,
        rho_rr,
        v1_rr,
        v2_rr,
        p_rr,
    } = PrimitivePair::new(u_ll, u_rr, eq);

    let v_dot_n_ll = v1_ll * n1 + v2_ll * n2;
    let v_dot_n_rr = v1_rr * n1 + v2_rr * n2;

    let rho_avg = 0.5 * (rho_ll + rho_rr);
    let v1_avg = 0.5 * (v1_ll + v1_rr);
    let v2_avg = 0.5 * (v2_ll + v2_rr);
    let v_dot_n_avg = 0.5 * (v_dot_n_ll + v_dot_n_rr);
    let p_avg = 0.5 * (p_ll + p_rr);
    let kin_avg = 0.5 * (v1_ll * v1_rr + v2_ll * v2_rr);
    let pv_dot_n_avg = 0.5 * (p_ll * v_dot_n_rr + p_rr * v_dot_n_ll);

    let f1 = rho_avg * v_dot_n_avg;
    State::new(
        f1,
        f1 * v1_avg + p_avg * n1,
        f1 * v2_avg + p_avg * n2,
        p_avg * v_dot_n_avg * eq.inv_gamma_minus_one() + f1 * kin_avg + pv_dot_n_avg,
    )
}

/// Kinetic-energy-preserving flux of Kennedy and Gruber.
///
/// Kennedy, Gruber (2008), https://doi.org/10.1016/j.jcp.2007.09.020
#[inline]
pub fn flux_kennedy_gruber(
    u_ll: &State,
    u_rr: &State,
    dir: Direction,
    eq: &CompressibleEuler2D,
) -> State {
    let (n1, n2) = dir.components();
    let PrimitivePair {
        rho_ll,
        v1_ll,
        v2_ll,
        p_ll,
        rho_rr,
        v1_rr,
        v2_rr,
        p_rr,
    } = PrimitivePair::new(u_ll, u_rr, eq);

    let rho_avg = 0.5 * (rho_ll + rho_rr);
    let v1_avg = 0.5 * (v1_ll + v1_rr);
    let v2_avg = 0.5 * (v2_ll + v2_rr);
    let p_avg = 0.5 * (p_ll + p_rr);
    let e_avg = 0.5 * (u_ll.rho_e / rho_ll + u_rr.rho_e / rho_rr);
    let v_dot_n_avg = v1_avg * n1 + v2_avg * n2;

    let f1 = rho_avg * v_dot_n_avg;
    State::new(
        f1,
        f1 * v1_avg + p_avg * n1,
        f1 * v2_avg + p_avg * n2,
        f1 * e_avg + p_avg * v_dot_n_avg,
    )
}

macro_rules! euler_flux_struct {
    ($name:ident, $func:ident, $label:literal, $ec:literal) => {
        #[derive(Clone, Copy, Debug, Default)]
        pub struct $name;

        impl SurfaceFlux<CompressibleEuler2D> for $name {
            #[inline(always)]
            fn compute(
                &self,
                u_ll: &State,
                u_rr: &State,
                dir: Direction,
                eq: &CompressibleEuler2D,
            ) -> State {
                $func(u_ll, u_rr, dir, eq)
            }

            fn name(&self) -> &'static str {
                $label
            }

            fn is_entropy_conservative(&self) -> bool {
                $ec
            }
        }
    };
}

euler_flux_struct!(FluxRanocha, flux_ranocha, "ranocha", true);
euler_flux_struct!(FluxChandrashekar, flux_chandrashekar, "chandrashekar", true);
euler_flux_struct!(FluxShimaEtal, flux_shima_etal, "shima_etal", false);
euler_flux_struct!(FluxKennedyGruber, flux_kennedy_gruber, "kennedy_gruber", false);

/// Runtime-selected conservative flux for the Euler equations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EulerFlux {
    Central,
    LaxFriedrichs {
        estimate: MaxAbsSpeedEstimate,
    },
    Hll {
        estimate: MinMaxSpeedEstimate,
    },
    #[default]
    Ranocha,
    Chandrashekar,
    ShimaEtal,
    KennedyGruber,
}

impl SurfaceFlux<CompressibleEuler2D> for EulerFlux {
    #[inline]
    fn compute(&self, u_ll: &State, u_rr: &State, dir: Direction, eq: &CompressibleEuler2D) -> State {
        match *self {
            EulerFlux::Central => flux_central(u_ll, u_rr, dir, eq),
            EulerFlux::LaxFriedrichs { estimate } => flux_lax_friedrichs(u_ll, u_rr, dir, eq, estimate),
            EulerFlux::Hll { estimate } => flux_hll(u_ll, u_rr, dir, eq, estimate),
            EulerFlux::Ranocha => flux_ranocha(u_ll, u_rr, dir, eq),
            EulerFlux::Chandrashekar => flux_chandrashekar(u_ll, u_rr, dir, eq),
            EulerFlux::ShimaEtal => flux_shima_etal(u_ll, u_rr, dir, eq),
            EulerFlux::KennedyGruber => flux_kennedy_gruber(u_ll, u_rr, dir, eq),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            EulerFlux::Central => "central",
            EulerFlux::LaxFriedrichs { .. } => "lax_friedrichs",
            EulerFlux::Hll { .. } => "hll",
            EulerFlux::Ranocha => "ranocha",
            EulerFlux::Chandrashekar => "chandrashekar",
            EulerFlux::ShimaEtal => "shima_etal",
            EulerFlux::KennedyGruber => "kennedy_gruber",
        }
    }

    fn is_entropy_conservative(&self) -> bool {
        matches!(self, EulerFlux::Ranocha | EulerFlux::Chandrashekar)
    }
}

impl TryFrom<SurfaceFluxConfig> for EulerFlux {
    type Error = ConfigError;

    fn try_from(config: SurfaceFluxConfig) -> Result<Self, Self::Error> {
        match config {
            SurfaceFluxConfig::Central => Ok(EulerFlux::Central),
            SurfaceFluxConfig::LaxFriedrichs { estimate } => Ok(EulerFlux::LaxFriedrichs { estimate }),
            SurfaceFluxConfig::Hll { estimate } => Ok(EulerFlux::Hll { estimate }),
            SurfaceFluxConfig::Ranocha => Ok(EulerFlux::Ranocha),
            SurfaceFluxConfig::Chandrashekar => Ok(EulerFlux::Chandrashekar),
            SurfaceFluxConfig::ShimaEtal => Ok(EulerFlux::ShimaEtal),
            SurfaceFluxConfig::KennedyGruber => Ok(EulerFlux::KennedyGruber),
            SurfaceFluxConfig::FjordholmEtal | SurfaceFluxConfig::WintermeyerEtal => {
                Err(ConfigError::Unsupported {
                    what: "shallow water surface flux",
                    equations: CompressibleEuler2D::NAME,
                })
            }
        }
    }
}

/// Create a boxed surface flux from configuration.
pub fn create_euler_flux(
    config: SurfaceFluxConfig,
) -> Result<BoxedSurfaceFlux<CompressibleEuler2D>, ConfigError> {
    Ok(Box::new(EulerFlux::try_from(config)?))
}
