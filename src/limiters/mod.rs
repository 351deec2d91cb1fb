//! Stage limiters for DGSEM.
//!
//! Limiters run after every explicit Runge-Kutta stage. Each one works on a
//! single element: a cheap scan decides whether the element is admissible,
//! and only violated elements are blended towards their volume-weighted mean.
//!
//! - [`StageLimiter`]: Trait for per-element stage limiters
//! - [`PositivityPreservingLimiterZhangShu`], [`EntropyBoundedLimiter`]: Concrete implementations
//! - [`LimiterChain`]: Compose multiple limiters
//!
//! The loop over elements lives in `solver::apply_stage_limiter`.

mod chain;
mod entropy_bounded;
mod positivity;
mod traits;

// Traits
pub use traits::{
    BoxedStageLimiter, ElementCheck, ElementOutcome, LimiterContext2D, LimiterError, LimiterReport,
    StageLimiter, blend_towards_mean, element_mean,
};

pub use chain::{LimiterChain, NoLimiter, create_euler_limiter, create_shallow_water_limiter};
pub use entropy_bounded::{EntropyBoundedLimiter, entropy_blending_factor};
pub use positivity::{PositivityPreservingLimiterZhangShu, check_positivity};
