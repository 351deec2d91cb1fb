//! Numerical flux functions.
//!
//! Provides two-point fluxes for DGSEM surface and volume integrals:
//! - Generic fluxes (any equation family): central, local Lax-Friedrichs, HLL
//! - Shallow water: entropy-conservative fluxes, non-conservative topography
//!   fluxes and hydrostatic reconstruction
//! - Compressible Euler: entropy-conservative and kinetic-energy-preserving
//!   split-form fluxes
//!
//! # Flux Traits
//!
//! [`SurfaceFlux`] and [`NonconservativeFlux`] wrap the free functions so a
//! solver can select a flux at runtime while keeping the hot loop generic.
//!
//! ## Built-in Flux Types
//! - [`FluxCentral`], [`FluxLaxFriedrichs`], [`FluxHLL`]: generic
//! - [`ShallowWaterFlux`], [`EulerFlux`]: enums for zero-cost dispatch
//! - [`FluxHydrostaticReconstruction`]: wraps any shallow water flux

mod central;
mod compressible_euler_2d;
mod hll;
mod lax_friedrichs;
mod shallow_water_2d;
pub mod traits;

pub use central::{FluxCentral, flux_central};
pub use compressible_euler_2d::{
    EulerFlux, FluxChandrashekar, FluxKennedyGruber, FluxRanocha, FluxShimaEtal,
    create_euler_flux, flux_chandrashekar, flux_kennedy_gruber, flux_ranocha, flux_shima_etal,
};
pub use hll::{FluxError, FluxHLL, flux_hll, flux_hll_with_speeds, try_flux_hll, try_flux_hll_with_speeds};
pub use lax_friedrichs::{FluxLaxFriedrichs, flux_lax_friedrichs};
pub use shallow_water_2d::{
    FluxFjordholmEtal, FluxHydrostaticReconstruction, FluxWintermeyerEtal, ShallowWaterFlux,
    ShallowWaterNonconservativeFlux, create_shallow_water_flux,
    create_shallow_water_nonconservative_flux, flux_fjordholm_etal,
    flux_nonconservative_audusse_etal, flux_nonconservative_fjordholm_etal,
    flux_nonconservative_wintermeyer_etal, flux_wintermeyer_etal,
    hydrostatic_reconstruction_audusse_etal,
};
pub use traits::{BoxedNonconservativeFlux, BoxedSurfaceFlux, NonconservativeFlux, SurfaceFlux};
