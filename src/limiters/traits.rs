//! Trait definitions for stage limiters.

use std::fmt;

use thiserror::Error;

use crate::basis::LobattoLegendreBasis;
use crate::equations::{Equations2D, PositivityVariable, StateVector};
use crate::mesh::ElementGeometry2D;
use crate::types::ElementIndex;

/// Errors raised while limiting a stage.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LimiterError {
    /// The element mean already violates the bound, so no blend towards it
    /// can restore admissibility. Usually a too-coarse mesh or a too-tight
    /// threshold.
    #[error(
        "element {element}: mean {variable} = {value_mean} is below the threshold {threshold}"
    )]
    NonAdmissibleMean {
        element: ElementIndex,
        variable: PositivityVariable,
        value_mean: f64,
        threshold: f64,
    },

    #[error("{what}: expected {expected}, got {actual}")]
    LayoutMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Read-only tables shared by every element during a limiter pass.
pub struct LimiterContext2D<'a, E> {
    pub equations: &'a E,
    pub basis: &'a LobattoLegendreBasis,
    pub geometry: &'a ElementGeometry2D,
}

impl<'a, E> Clone for LimiterContext2D<'a, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, E> Copy for LimiterContext2D<'a, E> {}

impl<'a, E: fmt::Debug> fmt::Debug for LimiterContext2D<'a, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LimiterContext2D")
            .field("equations", self.equations)
            .field("polydeg", &self.basis.polydeg())
            .field("n_elements", &self.geometry.n_elements())
            .finish()
    }
}

impl<'a, E> LimiterContext2D<'a, E> {
    /// Create a limiter context; the geometry must be built on `basis`.
    pub fn new(
        equations: &'a E,
        basis: &'a LobattoLegendreBasis,
        geometry: &'a ElementGeometry2D,
    ) -> Result<Self, LimiterError> {
        if geometry.n_nodes_1d() != basis.n_nodes_1d() {
            return Err(LimiterError::LayoutMismatch {
                what: "nodes per direction",
                expected: basis.n_nodes_1d(),
                actual: geometry.n_nodes_1d(),
            });
        }
        Ok(Self {
            equations,
            basis,
            geometry,
        })
    }

    #[inline]
    pub fn n_elements(&self) -> usize {
        self.geometry.n_elements()
    }

    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.geometry.n_nodes()
    }
}

/// Result of the detection scan over one element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ElementCheck {
    /// Every node satisfies the bound; the element is left untouched.
    Passed,
    /// The smallest nodal value falls below the bound.
    Triggered { min: f64 },
}

/// What a limiter did to one element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ElementOutcome {
    Passed,
    /// Nodes were blended towards the element mean, keeping the fraction
    /// `retained` of their deviation from it (θ for Zhang-Shu, `1 - ε` for
    /// the entropy-bounded limiter).
    Blended { retained: f64 },
}

impl ElementOutcome {
    /// Outcome of applying `self` and then `next` to the same element.
    pub fn then(self, next: ElementOutcome) -> ElementOutcome {
        match (self, next) {
            (ElementOutcome::Passed, other) | (other, ElementOutcome::Passed) => other,
            (ElementOutcome::Blended { retained: a }, ElementOutcome::Blended { retained: b }) => {
                ElementOutcome::Blended { retained: a * b }
            }
        }
    }

    pub fn is_blended(&self) -> bool {
        matches!(self, ElementOutcome::Blended { .. })
    }
}

/// Summary of one limiter pass over all elements.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LimiterReport {
    pub elements_checked: usize,
    pub elements_limited: usize,
    /// Smallest retained fraction over all limited elements (1 if none).
    pub min_retained: f64,
}

impl Default for LimiterReport {
    fn default() -> Self {
        Self {
            elements_checked: 0,
            elements_limited: 0,
            min_retained: 1.0,
        }
    }
}

impl LimiterReport {
    /// Add one element's outcome.
    pub fn record(mut self, outcome: ElementOutcome) -> Self {
        self.elements_checked += 1;
        if let ElementOutcome::Blended { retained } = outcome {
            self.elements_limited += 1;
            self.min_retained = self.min_retained.min(retained);
        }
        self
    }

    /// Combine the reports of two disjoint element ranges.
    pub fn merge(self, other: Self) -> Self {
        Self {
            elements_checked: self.elements_checked + other.elements_checked,
            elements_limited: self.elements_limited + other.elements_limited,
            min_retained: self.min_retained.min(other.min_retained),
        }
    }
}

/// Trait for stage limiters in 2D DGSEM.
///
/// Limiters run after every explicit stage and act on each element
/// independently: scan the nodes, and only if a bound is violated blend
/// them towards the element's volume-weighted mean.
///
/// # Implementation Notes
///
/// - `u` holds one element's nodal states, layout `[node * N_VARS + var]`
/// - `u_prev` is the same element at the start of the stage
/// - The blend must preserve the element mean
/// - `limit_element` must not allocate
///
/// # Extending
///
/// To add a new limiter:
/// 1. Create a struct with limiter parameters
/// 2. Implement `StageLimiter` for it
/// 3. Use `LimiterChain` to combine with other limiters
pub trait StageLimiter<E: Equations2D>: Send + Sync {
    fn limit_element(
        &self,
        element: ElementIndex,
        u: &mut [f64],
        u_prev: &[f64],
        ctx: &LimiterContext2D<'_, E>,
    ) -> Result<ElementOutcome, LimiterError>;

    /// Human-readable name for debugging and logging.
    fn name(&self) -> &'static str;
}

/// Type alias for boxed limiter (runtime polymorphism).
pub type BoxedStageLimiter<E> = Box<dyn StageLimiter<E>>;

/// Volume-weighted mean state of one element.
#[inline]
pub fn element_mean<S: StateVector>(u: &[f64], volume_weights: &[f64]) -> S {
    let mut integral = S::zero();
    let mut volume = 0.0;
    for (node, &w) in u.chunks_exact(S::N_VARS).zip(volume_weights) {
        integral += S::from_slice(node) * w;
        volume += w;
    }
    integral * (1.0 / volume)
}

/// Move every node towards the mean: `u_node + (1 - retained) (mean - u_node)`.
///
/// The update is masked like a dissipation term, so auxiliary fields such as
/// bottom topography keep their nodal values.
#[inline]
pub fn blend_towards_mean<E: Equations2D>(eq: &E, u: &mut [f64], mean: &E::State, retained: f64) {
    let weight = 1.0 - retained;
    for node in u.chunks_exact_mut(<E::State as StateVector>::N_VARS) {
        let u_node = E::State::from_slice(node);
        let blended = u_node + eq.mask_dissipation((*mean - u_node) * weight);
        blended.write_to(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equations::{ShallowWater2D, ShallowWaterState2D};

    const TOL: f64 = 1e-14;

    #[test]
    fn test_outcomes_compose() {
        let a = ElementOutcome::Blended { retained: 0.5 };
        let b = ElementOutcome::Blended { retained: 0.25 };
        assert_eq!(ElementOutcome::Passed.then(a), a);
        assert_eq!(a.then(ElementOutcome::Passed), a);
        assert_eq!(a.then(b), ElementOutcome::Blended { retained: 0.125 });
        assert!(!ElementOutcome::Passed.is_blended());
    }

    #[test]
    fn test_report_merge() {
        let r1 = LimiterReport::default()
            .record(ElementOutcome::Passed)
            .record(ElementOutcome::Blended { retained: 0.7 });
        let r2 = LimiterReport::default().record(ElementOutcome::Blended { retained: 0.2 });
        let r = r1.merge(r2);
        assert_eq!(r.elements_checked, 3);
        assert_eq!(r.elements_limited, 2);
        assert_eq!(r.min_retained, 0.2);
        assert_eq!(LimiterReport::default().min_retained, 1.0);
    }

    #[test]
    fn test_mean_and_blend() {
        let eq = ShallowWater2D::standard();
        let mut u = vec![1.0, 0.0, 0.0, 0.5, 3.0, 2.0, 0.0, 0.25];
        let weights = [1.0, 3.0];
        let mean: ShallowWaterState2D = element_mean(&u, &weights);
        assert!((mean.h - 2.5).abs() < TOL);
        assert!((mean.h_v1 - 1.5).abs() < TOL);

        blend_towards_mean(&eq, &mut u, &mean, 0.0);
        assert!((u[0] - 2.5).abs() < TOL);
        assert!((u[4] - 2.5).abs() < TOL);
        assert!((u[5] - 1.5).abs() < TOL);
        // Topography is not blended.
        assert_eq!(u[3], 0.5);
        assert_eq!(u[7], 0.25);
    }
}
