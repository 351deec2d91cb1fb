//! # dgsem-rs
//!
//! Numerical fluxes, wave-speed estimates and stage limiters for nodal
//! discontinuous Galerkin spectral element (DGSEM) solvers of hyperbolic
//! conservation laws.
//!
//! This crate provides the pointwise core a DGSEM driver calls into:
//! - Equation families (shallow water with topography, compressible Euler)
//! - Entropy-conservative and dissipative two-point fluxes
//! - Non-conservative topography fluxes and hydrostatic reconstruction
//! - Signal-speed estimators (naive, Davis, Einfeldt)
//! - Positivity-preserving and entropy-bounded stage limiters
//! - Element-loop helpers (limiter pass, face fluxes, CFL time step)
//!
//! # Example
//!
//! ```
//! use dgsem_rs::config::SolverConfig;
//! use dgsem_rs::equations::{Direction, ShallowWaterState2D};
//! use dgsem_rs::solver::DiscretizationFamily;
//!
//! let config = SolverConfig::default();
//! let DiscretizationFamily::ShallowWater(dg) = DiscretizationFamily::from_config(&config).unwrap()
//! else {
//!     unreachable!()
//! };
//!
//! // Lake at rest over a topography step.
//! let u_ll = ShallowWaterState2D::from_primitives(0.75, 0.0, 0.0, 0.25);
//! let u_rr = ShallowWaterState2D::from_primitives(0.5, 0.0, 0.0, 0.5);
//! let face = dg.interface_flux(&u_ll, &u_rr, Direction::X);
//! assert!(face.left.h.abs() < 1e-14);
//! ```

pub mod basis;
pub mod config;
pub mod equations;
pub mod error;
pub mod flux;
pub mod limiters;
pub mod math;
pub mod mesh;
pub mod solver;
pub mod types;
pub mod wave_speed;

// Re-export main types for convenience
pub use basis::LobattoLegendreBasis;
pub use config::{ConfigError, LimiterConfig, SolverConfig, SurfaceFluxConfig};
pub use equations::{
    CompressibleEuler2D, Direction, EquationFamily, Equations2D, EulerState2D, Orientation,
    PositivityVariable, ShallowWater2D, ShallowWaterState2D, StateVector, ThermodynamicEntropy,
};
pub use error::{Error, Result};
pub use flux::{
    EulerFlux, FluxError, NonconservativeFlux, ShallowWaterFlux, ShallowWaterNonconservativeFlux,
    SurfaceFlux,
};
pub use limiters::{
    EntropyBoundedLimiter, LimiterChain, LimiterContext2D, LimiterError, LimiterReport,
    PositivityPreservingLimiterZhangShu, StageLimiter,
};
pub use mesh::ElementGeometry2D;
pub use solver::{
    AdmissibilityError, Discretization, DiscretizationFamily, InterfaceFlux, SystemSolution2D,
    apply_stage_limiter, interface_flux, max_dt,
};
pub use types::{ElementIndex, NodeIndex};
pub use wave_speed::{MaxAbsSpeedEstimate, MinMaxSpeedEstimate};
