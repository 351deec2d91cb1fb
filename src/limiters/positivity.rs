//! Zhang-Shu positivity-preserving stage limiter.
//!
//! For every constraint `(variable, threshold)` and every element:
//!
//! 1. scan the nodes for the smallest value of `variable`
//! 2. if it is below `threshold`, compute the volume-weighted element mean
//! 3. blend `u ← θ u + (1 - θ) ū` with
//!    `θ = (value(ū) - threshold) / (value(ū) - min)`
//!
//! The blend keeps the element mean. For a concave admissibility variable
//! (water height, density, pressure) the blended nodes satisfy the bound.
//!
//! # References
//! - Zhang & Shu (2010), "On positivity-preserving high order discontinuous
//!   Galerkin schemes for compressible Euler equations on rectangular meshes",
//!   https://doi.org/10.1016/j.jcp.2010.08.016

use std::marker::PhantomData;

use super::traits::{
    ElementCheck, ElementOutcome, LimiterContext2D, LimiterError, StageLimiter, blend_towards_mean,
    element_mean,
};
use crate::config::{ConfigError, PositivityConstraint};
use crate::equations::{Equations2D, PositivityVariable, StateVector};
use crate::types::ElementIndex;

/// Smallest nodal value of `variable` compared against `threshold`.
#[inline]
pub fn check_positivity<E: Equations2D>(
    eq: &E,
    u: &[f64],
    variable: PositivityVariable,
    threshold: f64,
) -> ElementCheck {
    let min = u
        .chunks_exact(<E::State as StateVector>::N_VARS)
        .map(|node| eq.admissibility_value(variable, &E::State::from_slice(node)))
        .fold(f64::INFINITY, f64::min);
    if min < threshold {
        ElementCheck::Triggered { min }
    } else {
        ElementCheck::Passed
    }
}

/// Positivity-preserving limiter of Zhang and Shu.
///
/// Constraints are applied in order; a later constraint sees the element
/// already blended by the earlier ones.
#[derive(Clone, Debug)]
pub struct PositivityPreservingLimiterZhangShu<E> {
    constraints: Vec<PositivityConstraint>,
    _equations: PhantomData<fn() -> E>,
}

impl<E: Equations2D> PositivityPreservingLimiterZhangShu<E> {
    /// Create a limiter for the given constraints.
    ///
    /// Fails if the list is empty, a threshold is not finite, or a variable
    /// is not defined for the equation family.
    pub fn new(constraints: Vec<PositivityConstraint>) -> Result<Self, ConfigError> {
        if constraints.is_empty() {
            return Err(ConfigError::EmptyConstraints);
        }
        for c in &constraints {
            if !E::supports_variable(c.variable) {
                return Err(ConfigError::UnsupportedVariable {
                    variable: c.variable,
                    equations: E::NAME,
                });
            }
            if !c.threshold.is_finite() {
                return Err(ConfigError::InvalidThreshold {
                    variable: c.variable,
                    threshold: c.threshold,
                });
            }
        }
        Ok(Self {
            constraints,
            _equations: PhantomData,
        })
    }

    /// Single-constraint limiter.
    pub fn with_threshold(variable: PositivityVariable, threshold: f64) -> Result<Self, ConfigError> {
        Self::new(vec![PositivityConstraint {
            variable,
            threshold,
        }])
    }

    pub fn constraints(&self) -> &[PositivityConstraint] {
        &self.constraints
    }

    fn limit_variable(
        &self,
        element: ElementIndex,
        u: &mut [f64],
        constraint: &PositivityConstraint,
        ctx: &LimiterContext2D<'_, E>,
    ) -> Result<ElementOutcome, LimiterError> {
        let eq = ctx.equations;
        let PositivityConstraint {
            variable,
            threshold,
        } = *constraint;

        let min = match check_positivity(eq, u, variable, threshold) {
            ElementCheck::Passed => return Ok(ElementOutcome::Passed),
            ElementCheck::Triggered { min } => min,
        };

        let mean: E::State = element_mean(u, ctx.geometry.element_volume_weights(element));
        let value_mean = eq.admissibility_value(variable, &mean);
        // NaN means fail here too.
        if !(value_mean >= threshold) {
            tracing::warn!(
                %element,
                %variable,
                value_mean,
                threshold,
                "element mean violates positivity bound"
            );
            return Err(LimiterError::NonAdmissibleMean {
                element,
                variable,
                value_mean,
                threshold,
            });
        }

        // value_mean >= threshold > min, so θ ∈ [0, 1) without clipping.
        let theta = (value_mean - threshold) / (value_mean - min);
        blend_towards_mean(eq, u, &mean, theta);

        tracing::debug!(%element, %variable, min, value_mean, theta, "positivity limiter applied");
        Ok(ElementOutcome::Blended { retained: theta })
    }
}

impl<E: Equations2D> StageLimiter<E> for PositivityPreservingLimiterZhangShu<E> {
    fn limit_element(
        &self,
        element: ElementIndex,
        u: &mut [f64],
        _u_prev: &[f64],
        ctx: &LimiterContext2D<'_, E>,
    ) -> Result<ElementOutcome, LimiterError> {
        let mut outcome = ElementOutcome::Passed;
        for constraint in &self.constraints {
            outcome = outcome.then(self.limit_variable(element, u, constraint, ctx)?);
        }
        Ok(outcome)
    }

    fn name(&self) -> &'static str {
        "positivity_zhang_shu"
    }
}
