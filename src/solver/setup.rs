//! Configuration-driven problem setup.
//!
//! The equation family is resolved once here. Afterwards callers match on
//! [`DiscretizationFamily`] a single time and run generic code monomorphised
//! for the concrete family.

use super::driver::{
    InterfaceFlux, apply_stage_limiter, check_admissibility, check_layout, interface_flux, max_dt,
};
use super::solution::SystemSolution2D;
use crate::basis::LobattoLegendreBasis;
use crate::config::{ConfigError, NonconservativeFluxConfig, SolverConfig, SurfaceFluxConfig};
use crate::equations::{CompressibleEuler2D, Direction, EquationFamily, Equations2D, ShallowWater2D};
use crate::error::Result;
use crate::flux::{
    BoxedNonconservativeFlux, BoxedSurfaceFlux, create_euler_flux, create_shallow_water_flux,
    create_shallow_water_nonconservative_flux,
};
use crate::limiters::{
    LimiterChain, LimiterContext2D, LimiterError, LimiterReport, create_euler_limiter,
    create_shallow_water_limiter,
};
use crate::mesh::ElementGeometry2D;

/// Everything the element loops of one equation family need.
pub struct Discretization<E: Equations2D> {
    pub equations: E,
    pub basis: LobattoLegendreBasis,
    pub surface_flux: BoxedSurfaceFlux<E>,
    pub nonconservative_flux: Option<BoxedNonconservativeFlux<E>>,
    pub limiter: LimiterChain<E>,
    pub cfl: f64,
}

impl<E: Equations2D> std::fmt::Debug for Discretization<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Discretization")
            .field("equations", &self.equations)
            .field("polydeg", &self.basis.polydeg())
            .field("surface_flux", &self.surface_flux.name())
            .field(
                "nonconservative_flux",
                &self.nonconservative_flux.as_ref().map(|g| g.name()),
            )
            .field("limiter", &self.limiter.names())
            .field("cfl", &self.cfl)
            .finish()
    }
}

impl<E: Equations2D> Discretization<E> {
    /// Surface contributions of one face.
    #[inline]
    pub fn interface_flux(
        &self,
        u_ll: &E::State,
        u_rr: &E::State,
        dir: Direction,
    ) -> InterfaceFlux<E::State> {
        interface_flux(
            u_ll,
            u_rr,
            dir,
            &self.equations,
            &self.surface_flux,
            self.nonconservative_flux.as_deref(),
        )
    }

    /// Limiter context over `geometry`.
    pub fn limiter_context<'a>(
        &'a self,
        geometry: &'a ElementGeometry2D,
    ) -> std::result::Result<LimiterContext2D<'a, E>, LimiterError> {
        LimiterContext2D::new(&self.equations, &self.basis, geometry)
    }

    /// Run the configured limiter chain over `u`.
    pub fn apply_stage_limiter<const N: usize>(
        &self,
        u: &mut SystemSolution2D<N>,
        u_prev: &SystemSolution2D<N>,
        geometry: &ElementGeometry2D,
    ) -> std::result::Result<LimiterReport, LimiterError> {
        let ctx = self.limiter_context(geometry)?;
        apply_stage_limiter(&self.limiter, u, u_prev, &ctx)
    }

    /// Limit a finished stage, then verify every node is admissible.
    pub fn finish_stage<const N: usize>(
        &self,
        u: &mut SystemSolution2D<N>,
        u_prev: &SystemSolution2D<N>,
        geometry: &ElementGeometry2D,
    ) -> Result<LimiterReport> {
        let report = self.apply_stage_limiter(u, u_prev, geometry)?;
        check_admissibility(u, &self.equations)?;
        Ok(report)
    }

    /// Time step from the configured CFL number.
    pub fn max_dt<const N: usize>(
        &self,
        u: &SystemSolution2D<N>,
        geometry: &ElementGeometry2D,
    ) -> std::result::Result<f64, LimiterError> {
        let ctx = self.limiter_context(geometry)?;
        check_layout(u, &ctx)?;
        Ok(max_dt(u, &ctx, self.cfl))
    }
}

/// Non-conservative flux paired with a surface flux when none is configured.
fn matching_nonconservative_flux(
    surface_flux: SurfaceFluxConfig,
    hydrostatic_reconstruction: bool,
) -> NonconservativeFluxConfig {
    if hydrostatic_reconstruction {
        return NonconservativeFluxConfig::AudusseEtal;
    }
    match surface_flux {
        SurfaceFluxConfig::WintermeyerEtal => NonconservativeFluxConfig::WintermeyerEtal,
        _ => NonconservativeFluxConfig::FjordholmEtal,
    }
}

/// A discretization for one of the supported equation families.
#[derive(Debug)]
pub enum DiscretizationFamily {
    ShallowWater(Discretization<ShallowWater2D>),
    CompressibleEuler(Discretization<CompressibleEuler2D>),
}

impl DiscretizationFamily {
    /// Validate `config` and build the fluxes and limiters it names.
    pub fn from_config(config: &SolverConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let basis = LobattoLegendreBasis::new(config.polydeg)?;

        let family = match EquationFamily::from_config(&config.equations)? {
            EquationFamily::ShallowWater(equations) => {
                let surface = config.surface_flux.unwrap_or(SurfaceFluxConfig::FjordholmEtal);
                let nonconservative = config.nonconservative_flux.unwrap_or_else(|| {
                    matching_nonconservative_flux(surface, config.hydrostatic_reconstruction)
                });
                DiscretizationFamily::ShallowWater(Discretization {
                    equations,
                    basis,
                    surface_flux: create_shallow_water_flux(
                        surface,
                        config.hydrostatic_reconstruction,
                    )?,
                    nonconservative_flux: Some(create_shallow_water_nonconservative_flux(
                        nonconservative,
                    )),
                    limiter: create_shallow_water_limiter(&config.limiters)?,
                    cfl: config.cfl,
                })
            }
            EquationFamily::CompressibleEuler(equations) => {
                if config.nonconservative_flux.is_some() {
                    return Err(ConfigError::Unsupported {
                        what: "non-conservative flux",
                        equations: CompressibleEuler2D::NAME,
                    });
                }
                if config.hydrostatic_reconstruction {
                    return Err(ConfigError::Unsupported {
                        what: "hydrostatic reconstruction",
                        equations: CompressibleEuler2D::NAME,
                    });
                }
                let surface = config.surface_flux.unwrap_or(SurfaceFluxConfig::Ranocha);
                DiscretizationFamily::CompressibleEuler(Discretization {
                    equations,
                    basis,
                    surface_flux: create_euler_flux(surface)?,
                    nonconservative_flux: None,
                    limiter: create_euler_limiter(&config.limiters)?,
                    cfl: config.cfl,
                })
            }
        };

        tracing::info!(
            equations = family.name(),
            polydeg = config.polydeg,
            surface_flux = family.surface_flux_name(),
            "discretization ready"
        );
        Ok(family)
    }

    pub fn name(&self) -> &'static str {
        match self {
            DiscretizationFamily::ShallowWater(_) => ShallowWater2D::NAME,
            DiscretizationFamily::CompressibleEuler(_) => CompressibleEuler2D::NAME,
        }
    }

    pub fn surface_flux_name(&self) -> &'static str {
        match self {
            DiscretizationFamily::ShallowWater(d) => d.surface_flux.name(),
            DiscretizationFamily::CompressibleEuler(d) => d.surface_flux.name(),
        }
    }

    pub fn basis(&self) -> &LobattoLegendreBasis {
        match self {
            DiscretizationFamily::ShallowWater(d) => &d.basis,
            DiscretizationFamily::CompressibleEuler(d) => &d.basis,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EquationsConfig, LimiterConfig};

    #[test]
    fn test_default_config_builds_shallow_water() {
        let family = DiscretizationFamily::from_config(&SolverConfig::default()).unwrap();
        let DiscretizationFamily::ShallowWater(d) = family else {
            panic!("expected shallow water");
        };
        assert_eq!(d.surface_flux.name(), "fjordholm_etal");
        assert_eq!(
            d.nonconservative_flux.as_ref().map(|g| g.name()),
            Some("nonconservative_fjordholm_etal")
        );
        assert_eq!(d.basis.n_nodes_1d(), 4);
    }

    #[test]
    fn test_hydrostatic_reconstruction_pairs_audusse() {
        let config = SolverConfig {
            surface_flux: Some(SurfaceFluxConfig::Hll {
                estimate: Default::default(),
            }),
            hydrostatic_reconstruction: true,
            ..SolverConfig::default()
        };
        let DiscretizationFamily::ShallowWater(d) = DiscretizationFamily::from_config(&config).unwrap()
        else {
            panic!("expected shallow water");
        };
        assert_eq!(d.surface_flux.name(), "hydrostatic_reconstruction");
        assert_eq!(
            d.nonconservative_flux.as_ref().map(|g| g.name()),
            Some("nonconservative_audusse_etal")
        );
    }

    #[test]
    fn test_euler_defaults_and_rejections() {
        let euler = SolverConfig {
            equations: EquationsConfig::CompressibleEuler { gamma: 1.4 },
            limiters: vec![LimiterConfig::EntropyBounded {
                exp_entropy_decrease_max: -1e-13,
            }],
            ..SolverConfig::default()
        };
        let family = DiscretizationFamily::from_config(&euler).unwrap();
        assert_eq!(family.name(), "CompressibleEulerEquations2D");
        assert_eq!(family.surface_flux_name(), "ranocha");

        let with_noncons = SolverConfig {
            nonconservative_flux: Some(NonconservativeFluxConfig::FjordholmEtal),
            ..euler.clone()
        };
        assert!(matches!(
            DiscretizationFamily::from_config(&with_noncons),
            Err(ConfigError::Unsupported { .. })
        ));

        let with_swe_flux = SolverConfig {
            surface_flux: Some(SurfaceFluxConfig::WintermeyerEtal),
            ..euler
        };
        assert!(DiscretizationFamily::from_config(&with_swe_flux).is_err());
    }
}
