//! Limiter composition and configuration-driven construction.

use super::entropy_bounded::EntropyBoundedLimiter;
use super::positivity::PositivityPreservingLimiterZhangShu;
use super::traits::{BoxedStageLimiter, ElementOutcome, LimiterContext2D, LimiterError, StageLimiter};
use crate::config::{ConfigError, LimiterConfig};
use crate::equations::{CompressibleEuler2D, Equations2D, ShallowWater2D};
use crate::types::ElementIndex;

/// No-op limiter (does nothing).
///
/// Useful as a placeholder or for testing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoLimiter;

impl<E: Equations2D> StageLimiter<E> for NoLimiter {
    fn limit_element(
        &self,
        _element: ElementIndex,
        _u: &mut [f64],
        _u_prev: &[f64],
        _ctx: &LimiterContext2D<'_, E>,
    ) -> Result<ElementOutcome, LimiterError> {
        Ok(ElementOutcome::Passed)
    }

    fn name(&self) -> &'static str {
        "none"
    }
}

/// Chain of limiters applied in sequence.
///
/// Each element passes through every limiter before the next element is
/// touched; since limiters are element-local this equals applying them one
/// after the other over the whole solution.
pub struct LimiterChain<E> {
    limiters: Vec<BoxedStageLimiter<E>>,
}

impl<E: Equations2D> LimiterChain<E> {
    /// Create an empty limiter chain.
    pub fn new() -> Self {
        Self {
            limiters: Vec::new(),
        }
    }

    /// Add a limiter to the chain.
    ///
    /// Limiters are applied in the order they are added.
    pub fn then<L: StageLimiter<E> + 'static>(mut self, limiter: L) -> Self {
        self.limiters.push(Box::new(limiter));
        self
    }

    /// Add a boxed limiter to the chain.
    pub fn then_boxed(mut self, limiter: BoxedStageLimiter<E>) -> Self {
        self.limiters.push(limiter);
        self
    }

    /// Returns true if the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.limiters.is_empty()
    }

    /// Returns the number of limiters in the chain.
    pub fn len(&self) -> usize {
        self.limiters.len()
    }

    /// Names of the chained limiters, in application order.
    pub fn names(&self) -> Vec<&'static str> {
        self.limiters.iter().map(|l| l.name()).collect()
    }
}

impl<E: Equations2D> Default for LimiterChain<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for LimiterChain<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LimiterChain")
            .field("len", &self.limiters.len())
            .finish()
    }
}

impl<E: Equations2D> StageLimiter<E> for LimiterChain<E> {
    fn limit_element(
        &self,
        element: ElementIndex,
        u: &mut [f64],
        u_prev: &[f64],
        ctx: &LimiterContext2D<'_, E>,
    ) -> Result<ElementOutcome, LimiterError> {
        let mut outcome = ElementOutcome::Passed;
        for limiter in &self.limiters {
            outcome = outcome.then(limiter.limit_element(element, u, u_prev, ctx)?);
        }
        Ok(outcome)
    }

    fn name(&self) -> &'static str {
        "chain"
    }
}

/// Build the shallow water limiter chain from configuration.
pub fn create_shallow_water_limiter(
    configs: &[LimiterConfig],
) -> Result<LimiterChain<ShallowWater2D>, ConfigError> {
    configs.iter().try_fold(LimiterChain::new(), |chain, config| {
        config.validate()?;
        match config {
            LimiterConfig::PositivityZhangShu { constraints } => Ok(chain.then(
                PositivityPreservingLimiterZhangShu::<ShallowWater2D>::new(constraints.clone())?,
            )),
            LimiterConfig::EntropyBounded { .. } => Err(ConfigError::Unsupported {
                what: "entropy-bounded limiter",
                equations: ShallowWater2D::NAME,
            }),
        }
    })
}

/// Build the compressible Euler limiter chain from configuration.
pub fn create_euler_limiter(
    configs: &[LimiterConfig],
) -> Result<LimiterChain<CompressibleEuler2D>, ConfigError> {
    configs.iter().try_fold(LimiterChain::new(), |chain, config| {
        config.validate()?;
        match config {
            LimiterConfig::PositivityZhangShu { constraints } => Ok(chain.then(
                PositivityPreservingLimiterZhangShu::<CompressibleEuler2D>::new(constraints.clone())?,
            )),
            LimiterConfig::EntropyBounded {
                exp_entropy_decrease_max,
            } => Ok(chain.then(EntropyBoundedLimiter::new(*exp_entropy_decrease_max)?)),
        }
    })
}
