//! Entropy-bounded stage limiter.
//!
//! Bounds the decrease of the exponentiated thermodynamic entropy
//! `exp(s) = p / rho^γ` over one stage. With `s_min` the smallest nodal
//! `exp(s)` of the element at the start of the stage and
//! `d(u) = exp(s(u)) - s_min`, an element is limited when
//! `min d < exp_entropy_decrease_max`, by blending towards the mean with
//!
//! ε = (exp_entropy_decrease_max - d_min) / (d(ū) - d_min)
//!
//! clipped to `[0, 1]`. ε = 1 replaces the element by its mean.
//!
//! # References
//! - Lin, Chan, Tomas (2023), "A positivity preserving strategy for entropy
//!   stable discontinuous Galerkin discretizations of the compressible
//!   Euler and Navier-Stokes equations", https://doi.org/10.1016/j.jcp.2022.111850

use super::traits::{
    ElementCheck, ElementOutcome, LimiterContext2D, LimiterError, StageLimiter, blend_towards_mean,
    element_mean,
};
use crate::config::ConfigError;
use crate::equations::{StateVector, ThermodynamicEntropy};
use crate::types::ElementIndex;

/// Blend factor towards the mean, clipped to `[0, 1]`.
///
/// A non-positive denominator means the mean itself lost too much entropy;
/// the element is then replaced by its mean (ε = 1).
#[inline]
pub fn entropy_blending_factor(threshold: f64, d_min: f64, d_mean: f64) -> f64 {
    let denominator = d_mean - d_min;
    if !(denominator > 0.0) {
        return 1.0;
    }
    ((threshold - d_min) / denominator).clamp(0.0, 1.0)
}

/// Limits the per-stage decrease of `exp(s)` inside each element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntropyBoundedLimiter {
    exp_entropy_decrease_max: f64,
}

impl Default for EntropyBoundedLimiter {
    fn default() -> Self {
        Self {
            exp_entropy_decrease_max: -1e-13,
        }
    }
}

impl EntropyBoundedLimiter {
    /// Create a limiter; the tolerated decrease must be negative.
    pub fn new(exp_entropy_decrease_max: f64) -> Result<Self, ConfigError> {
        if exp_entropy_decrease_max >= 0.0 || exp_entropy_decrease_max.is_nan() {
            return Err(ConfigError::NonNegativeEntropyThreshold(exp_entropy_decrease_max));
        }
        Ok(Self {
            exp_entropy_decrease_max,
        })
    }

    pub fn exp_entropy_decrease_max(&self) -> f64 {
        self.exp_entropy_decrease_max
    }

    /// Smallest `d(u)` over the element compared against the threshold.
    pub fn check<E: ThermodynamicEntropy>(&self, eq: &E, u: &[f64], s_min: f64) -> ElementCheck {
        let d_min = u
            .chunks_exact(<E::State as StateVector>::N_VARS)
            .map(|node| eq.exp_entropy(&E::State::from_slice(node)) - s_min)
            .fold(f64::INFINITY, f64::min);
        if d_min < self.exp_entropy_decrease_max {
            ElementCheck::Triggered { min: d_min }
        } else {
            ElementCheck::Passed
        }
    }
}

impl<E: ThermodynamicEntropy> StageLimiter<E> for EntropyBoundedLimiter {
    fn limit_element(
        &self,
        element: ElementIndex,
        u: &mut [f64],
        u_prev: &[f64],
        ctx: &LimiterContext2D<'_, E>,
    ) -> Result<ElementOutcome, LimiterError> {
        let eq = ctx.equations;
        let s_min = u_prev
            .chunks_exact(<E::State as StateVector>::N_VARS)
            .map(|node| eq.exp_entropy(&E::State::from_slice(node)))
            .fold(f64::INFINITY, f64::min);

        let d_min = match self.check(eq, u, s_min) {
            ElementCheck::Passed => return Ok(ElementOutcome::Passed),
            ElementCheck::Triggered { min } => min,
        };

        let mean: E::State = element_mean(u, ctx.geometry.element_volume_weights(element));
        let d_mean = eq.exp_entropy(&mean) - s_min;
        let epsilon = entropy_blending_factor(self.exp_entropy_decrease_max, d_min, d_mean);
        if d_mean < self.exp_entropy_decrease_max {
            tracing::warn!(
                %element,
                d_mean,
                threshold = self.exp_entropy_decrease_max,
                "element mean violates entropy bound, replacing element by its mean"
            );
        }
        blend_towards_mean(eq, u, &mean, 1.0 - epsilon);

        tracing::debug!(%element, d_min, d_mean, epsilon, "entropy-bounded limiter applied");
        Ok(ElementOutcome::Blended {
            retained: 1.0 - epsilon,
        })
    }

    fn name(&self) -> &'static str {
        "entropy_bounded"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basis::LobattoLegendreBasis;
    use crate::equations::{CompressibleEuler2D, Equations2D, EulerPrimitive2D};
    use crate::mesh::ElementGeometry2D;

    const TOL: f64 = 1e-12;

    #[test]
    fn test_blending_factor_clipped() {
        assert!((entropy_blending_factor(-0.1, -0.5, 1.5) - 0.2).abs() < TOL);
        // Raw ε > 1: full replacement.
        assert_eq!(entropy_blending_factor(-0.1, -0.5, -0.3), 1.0);
        assert_eq!(entropy_blending_factor(-0.1, -0.5, -0.5), 1.0);
        assert_eq!(entropy_blending_factor(-0.1, -0.5, -0.7), 1.0);
        // Not triggered from above the threshold.
        assert_eq!(entropy_blending_factor(-0.1, 0.0, 1.0), 0.0);
    }

    #[test]
    fn test_rejects_non_negative_threshold() {
        assert!(EntropyBoundedLimiter::new(0.0).is_err());
        assert!(EntropyBoundedLimiter::new(f64::NAN).is_err());
        assert!(EntropyBoundedLimiter::new(-1e-10).is_ok());
    }

    #[test]
    fn test_entropy_drop_limited() {
        let eq = CompressibleEuler2D::air();
        let basis = LobattoLegendreBasis::new(1).unwrap();
        let geometry =
            ElementGeometry2D::uniform_cartesian(&basis, (0.0, 1.0), (0.0, 1.0), 1, 1).unwrap();
        let ctx = LimiterContext2D::new(&eq, &basis, &geometry).unwrap();
        let limiter = EntropyBoundedLimiter::new(-1e-3).unwrap();

        let write = |prims: &[EulerPrimitive2D]| {
            let mut u = vec![0.0; 16];
            for (node, p) in u.chunks_exact_mut(4).zip(prims) {
                eq.prim2cons(p).write_to(node);
            }
            u
        };
        let uniform = EulerPrimitive2D::new(1.0, 0.0, 0.0, 1.0);
        let prev = write(&[uniform; 4]);

        // Pressure drop at one node lowers p / rho^γ below s_min = 1.
        let mut u = write(&[
            uniform,
            uniform,
            EulerPrimitive2D::new(1.0, 0.0, 0.0, 1.6),
            EulerPrimitive2D::new(1.0, 0.0, 0.0, 0.6),
        ]);
        let outcome = limiter.limit_element(ElementIndex::new(0), &mut u, &prev, &ctx).unwrap();

        // d_min = -0.4, d_mean = 0.05: ε = (-1e-3 + 0.4) / 0.45
        let epsilon = (-1e-3 + 0.4) / 0.45;
        match outcome {
            ElementOutcome::Blended { retained } => assert!((retained - (1.0 - epsilon)).abs() < TOL),
            other => panic!("expected a blend, got {other:?}"),
        }
        let s = crate::equations::EulerState2D::from_slice(&u[12..16]);
        assert!((eq.exp_entropy(&s) - 1.0 - (-1e-3)).abs() < 1e-10);
    }

    #[test]
    fn test_full_replacement_when_mean_lost_entropy() {
        let eq = CompressibleEuler2D::air();
        let basis = LobattoLegendreBasis::new(1).unwrap();
        let geometry =
            ElementGeometry2D::uniform_cartesian(&basis, (0.0, 1.0), (0.0, 1.0), 1, 1).unwrap();
        let ctx = LimiterContext2D::new(&eq, &basis, &geometry).unwrap();
        let limiter = EntropyBoundedLimiter::default();

        let mut prev = vec![0.0; 16];
        let mut u = vec![0.0; 16];
        for node in 0..4 {
            eq.prim2cons(&EulerPrimitive2D::new(1.0, 0.0, 0.0, 1.0))
                .write_to(&mut prev[node * 4..]);
            let p = if node == 0 { 0.5 } else { 0.9 };
            eq.prim2cons(&EulerPrimitive2D::new(1.0, 0.0, 0.0, p))
                .write_to(&mut u[node * 4..]);
        }
        let outcome = limiter.limit_element(ElementIndex::new(0), &mut u, &prev, &ctx).unwrap();
        assert_eq!(outcome, ElementOutcome::Blended { retained: 0.0 });

        let first = &u[0..4];
        for node in u.chunks_exact(4) {
            for (a, b) in node.iter().zip(first) {
                assert!((a - b).abs() < TOL);
            }
        }
    }
}
