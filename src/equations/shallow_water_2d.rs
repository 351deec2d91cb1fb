//! 2D shallow water equations with variable bottom topography.
//!
//! ∂h/∂t + ∇·(h v) = 0
//! ∂(h v)/∂t + ∇·(h v ⊗ v + ½ g h² I) = -g h ∇b
//!
//! The bottom topography `b` is stored as a fourth, non-transported state
//! component so that two-point fluxes see it on both sides of a face. The
//! term `-g h ∇b` is non-conservative and handled by dedicated two-point
//! fluxes (see `flux::shallow_water_2d`).
//!
//! Velocities are `h v / h` without desingularization: keeping `h`
//! positive is the job of the positivity limiter. The one exception is a
//! node without momentum, which is at rest even when dry.

use super::state::define_state;
use super::{Direction, Equations2D, PositivityVariable, StateVector};
use crate::config::ConfigError;

define_state!(
    /// Conserved shallow water state `(h, h v1, h v2, b)`.
    ShallowWaterState2D, 4 {
        /// Water height
        h,
        /// x-momentum
        h_v1,
        /// y-momentum
        h_v2,
        /// Bottom topography (auxiliary, not transported)
        b,
    }
);

define_state!(
    /// Primitive shallow water variables `(H, v1, v2, b)` with `H = h + b`.
    ShallowWaterPrimitive2D, 4 {
        /// Total water height (free-surface elevation)
        total_height,
        v1,
        v2,
        b,
    }
);

define_state!(
    /// Entropy variables `(g H - ½|v|², v1, v2, b)`.
    ShallowWaterEntropy2D, 4 {
        w1,
        w2,
        w3,
        b,
    }
);

impl ShallowWaterState2D {
    /// State from water height, velocities and bottom topography.
    #[inline(always)]
    pub fn from_primitives(h: f64, v1: f64, v2: f64, b: f64) -> Self {
        Self {
            h,
            h_v1: h * v1,
            h_v2: h * v2,
            b,
        }
    }

    /// Velocity `(v1, v2)`.
    ///
    /// Zero momentum is at rest, also on a dry node. Non-zero momentum over
    /// `h = 0` is not guarded and gives non-finite velocities.
    #[inline(always)]
    pub fn velocity(&self) -> (f64, f64) {
        if self.h_v1 == 0.0 && self.h_v2 == 0.0 {
            return (0.0, 0.0);
        }
        (self.h_v1 / self.h, self.h_v2 / self.h)
    }

    /// Free-surface elevation `h + b`.
    #[inline(always)]
    pub fn total_height(&self) -> f64 {
        self.h + self.b
    }
}

/// Shallow water descriptor.
///
/// # Example
///
/// ```
/// use dgsem_rs::equations::{Direction, Equations2D, ShallowWater2D, ShallowWaterState2D};
///
/// let swe = ShallowWater2D::new(9.81, 1.0);
/// let u = ShallowWaterState2D::from_primitives(0.7, 0.0, 0.0, 0.3);
/// let f = swe.flux(&u, Direction::X);
/// assert_eq!(f.h, 0.0);
/// assert!((f.h_v1 - 0.5 * 9.81 * 0.49).abs() < 1e-14);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShallowWater2D {
    /// Gravitational acceleration
    pub gravity: f64,
    /// Reference total water height of the lake at rest
    pub h0: f64,
}

impl ShallowWater2D {
    pub fn new(gravity: f64, h0: f64) -> Self {
        Self { gravity, h0 }
    }

    /// Validated constructor.
    pub fn try_new(gravity: f64, h0: f64) -> Result<Self, ConfigError> {
        if !(gravity > 0.0 && gravity.is_finite()) {
            return Err(ConfigError::InvalidGravity(gravity));
        }
        Ok(Self::new(gravity, h0))
    }

    /// Standard gravity, reference level 1.
    pub fn standard() -> Self {
        Self::new(9.81, 1.0)
    }

    /// Gravity wave speed `sqrt(g h)`.
    #[inline(always)]
    pub fn celerity(&self, u: &ShallowWaterState2D) -> f64 {
        (self.gravity * u.h).sqrt()
    }

    /// Hydrostatic pressure `½ g h²`.
    #[inline(always)]
    pub fn pressure(&self, u: &ShallowWaterState2D) -> f64 {
        0.5 * self.gravity * u.h * u.h
    }

    /// Deviation of the free surface from the lake-at-rest level `h0`.
    #[inline]
    pub fn lake_at_rest_error(&self, u: &ShallowWaterState2D) -> f64 {
        (u.total_height() - self.h0).abs()
    }
}

impl Default for ShallowWater2D {
    fn default() -> Self {
        Self::standard()
    }
}

impl Equations2D for ShallowWater2D {
    type State = ShallowWaterState2D;
    type Primitive = ShallowWaterPrimitive2D;
    type Entropy = ShallowWaterEntropy2D;

    const HAS_NONCONSERVATIVE_TERMS: bool = true;
    const NAME: &'static str = "ShallowWaterEquations2D";

    #[inline(always)]
    fn flux(&self, u: &ShallowWaterState2D, dir: Direction) -> ShallowWaterState2D {
        let (n1, n2) = dir.components();
        let (v1, v2) = u.velocity();
        let h_v_normal = u.h_v1 * n1 + u.h_v2 * n2;
        let p = self.pressure(u);

        ShallowWaterState2D {
            h: h_v_normal,
            h_v1: h_v_normal * v1 + p * n1,
            h_v2: h_v_normal * v2 + p * n2,
            b: 0.0,
        }
    }

    #[inline]
    fn cons2prim(&self, u: &ShallowWaterState2D) -> ShallowWaterPrimitive2D {
        let (v1, v2) = u.velocity();
        ShallowWaterPrimitive2D::new(u.total_height(), v1, v2, u.b)
    }

    #[inline]
    fn prim2cons(&self, prim: &ShallowWaterPrimitive2D) -> ShallowWaterState2D {
        let h = prim.total_height - prim.b;
        ShallowWaterState2D::from_primitives(h, prim.v1, prim.v2, prim.b)
    }

    #[inline]
    fn cons2entropy(&self, u: &ShallowWaterState2D) -> ShallowWaterEntropy2D {
        let (v1, v2) = u.velocity();
        let w1 = self.gravity * u.total_height() - 0.5 * (v1 * v1 + v2 * v2);
        ShallowWaterEntropy2D::new(w1, v1, v2, u.b)
    }

    #[inline]
    fn entropy2cons(&self, w: &ShallowWaterEntropy2D) -> ShallowWaterState2D {
        let (v1, v2) = (w.w2, w.w3);
        let h = (w.w1 + 0.5 * (v1 * v1 + v2 * v2)) / self.gravity - w.b;
        ShallowWaterState2D::from_primitives(h, v1, v2, w.b)
    }

    #[inline]
    fn max_abs_speeds(&self, u: &ShallowWaterState2D) -> [f64; 2] {
        let (v1, v2) = u.velocity();
        let c = self.celerity(u);
        [v1.abs() + c, v2.abs() + c]
    }

    #[inline(always)]
    fn normal_velocity_and_sound_speed(&self, u: &ShallowWaterState2D, dir: Direction) -> (f64, f64) {
        let (n1, n2) = dir.components();
        let (v1, v2) = u.velocity();
        (v1 * n1 + v2 * n2, self.celerity(u) * dir.magnitude())
    }

    fn roe_average_speeds(
        &self,
        u_ll: &ShallowWaterState2D,
        u_rr: &ShallowWaterState2D,
        dir: Direction,
    ) -> (f64, f64) {
        let (n1, n2) = dir.components();
        let sqrt_h_ll = u_ll.h.sqrt();
        let sqrt_h_rr = u_rr.h.sqrt();
        let sqrt_sum = sqrt_h_ll + sqrt_h_rr;

        // Two dry states: the limit of the average is at rest.
        if sqrt_sum == 0.0 {
            return (0.0, 0.0);
        }

        // A dry side carries no weight; its velocity is never read.
        let weighted_normal_velocity = |sqrt_h: f64, u: &ShallowWaterState2D| {
            if sqrt_h > 0.0 {
                let (v1, v2) = u.velocity();
                sqrt_h * (v1 * n1 + v2 * n2)
            } else {
                0.0
            }
        };

        let v_roe = (weighted_normal_velocity(sqrt_h_ll, u_ll)
            + weighted_normal_velocity(sqrt_h_rr, u_rr))
            / sqrt_sum;
        let c_roe = (self.gravity * 0.5 * (u_ll.h + u_rr.h)).sqrt() * dir.magnitude();
        (v_roe, c_roe)
    }

    #[inline(always)]
    fn mask_dissipation(&self, dissipation: ShallowWaterState2D) -> ShallowWaterState2D {
        ShallowWaterState2D {
            b: 0.0,
            ..dissipation
        }
    }

    fn is_admissible(&self, u: &ShallowWaterState2D) -> bool {
        // A dry node must also be at rest.
        u.is_finite() && (u.h > 0.0 || (u.h == 0.0 && u.h_v1 == 0.0 && u.h_v2 == 0.0))
    }

    fn supports_variable(variable: PositivityVariable) -> bool {
        matches!(variable, PositivityVariable::WaterHeight)
    }

    #[inline(always)]
    fn admissibility_value(&self, variable: PositivityVariable, u: &ShallowWaterState2D) -> f64 {
        debug_assert!(Self::supports_variable(variable));
        u.h
    }

    fn entropy(&self, u: &ShallowWaterState2D) -> f64 {
        self.energy_total(u)
    }

    fn entropy_potential(&self, u: &ShallowWaterState2D, dir: Direction) -> f64 {
        let (n1, n2) = dir.components();
        let (v1, v2) = u.velocity();
        self.gravity * u.h * u.h * (v1 * n1 + v2 * n2) * 0.5
    }

    fn energy_total(&self, u: &ShallowWaterState2D) -> f64 {
        let (v1, v2) = u.velocity();
        let kinetic = 0.5 * u.h * (v1 * v1 + v2 * v2);
        kinetic + 0.5 * self.gravity * u.h * u.h + self.gravity * u.h * u.b
    }
}
