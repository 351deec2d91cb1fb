//! Element-loop driver for the flux and limiter core.
//!
//! - [`SystemSolution2D`]: interleaved nodal storage
//! - [`apply_stage_limiter`], [`interface_flux`], [`max_dt`],
//!   [`check_admissibility`]: per-element and per-face contracts
//! - [`DiscretizationFamily`]: configuration-driven setup

mod driver;
mod setup;
mod solution;

pub use driver::{
    AdmissibilityError, InterfaceFlux, apply_stage_limiter, check_admissibility, check_layout,
    for_each_element_mut, interface_flux, max_dt,
};
pub use setup::{Discretization, DiscretizationFamily};
pub use solution::SystemSolution2D;
