//! 2D compressible Euler equations for an ideal gas.
//!
//! ∂ρ/∂t + ∇·(ρ v) = 0
//! ∂(ρ v)/∂t + ∇·(ρ v ⊗ v + p I) = 0
//! ∂(ρ e)/∂t + ∇·((ρ e + p) v) = 0
//!
//! with `p = (γ - 1)(ρ e - ½ ρ |v|²)`.
//!
//! The mathematical entropy is `-ρ s / (γ - 1)` with the specific entropy
//! `s = ln p - γ ln ρ`; entropy variables follow Harten (1983).

use super::state::define_state;
use super::{Direction, Equations2D, PositivityVariable, StateVector, ThermodynamicEntropy};
use crate::config::ConfigError;

define_state!(
    /// Conserved Euler state `(ρ, ρ v1, ρ v2, ρ e)`.
    EulerState2D, 4 {
        rho,
        rho_v1,
        rho_v2,
        /// Total energy density
        rho_e,
    }
);

define_state!(
    /// Primitive Euler variables `(ρ, v1, v2, p)`.
    EulerPrimitive2D, 4 {
        rho,
        v1,
        v2,
        p,
    }
);

define_state!(
    /// Entropy variables `∂S/∂u` of `S = -ρ s / (γ - 1)`.
    EulerEntropy2D, 4 {
        w1,
        w2,
        w3,
        w4,
    }
);

impl EulerState2D {
    #[inline(always)]
    pub fn velocity(&self) -> (f64, f64) {
        (self.rho_v1 / self.rho, self.rho_v2 / self.rho)
    }
}

/// Ideal-gas Euler descriptor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompressibleEuler2D {
    /// Ratio of specific heats
    pub gamma: f64,
    inv_gamma_minus_one: f64,
}

impl CompressibleEuler2D {
    pub fn new(gamma: f64) -> Self {
        Self {
            gamma,
            inv_gamma_minus_one: 1.0 / (gamma - 1.0),
        }
    }

    /// Validated constructor.
    pub fn try_new(gamma: f64) -> Result<Self, ConfigError> {
        if !(gamma > 1.0 && gamma.is_finite()) {
            return Err(ConfigError::InvalidGamma(gamma));
        }
        Ok(Self::new(gamma))
    }

    /// Diatomic gas, `γ = 1.4`.
    pub fn air() -> Self {
        Self::new(1.4)
    }

    #[inline(always)]
    pub fn inv_gamma_minus_one(&self) -> f64 {
        self.inv_gamma_minus_one
    }

    #[inline(always)]
    pub fn pressure(&self, u: &EulerState2D) -> f64 {
        let kinetic = 0.5 * (u.rho_v1 * u.rho_v1 + u.rho_v2 * u.rho_v2) / u.rho;
        (self.gamma - 1.0) * (u.rho_e - kinetic)
    }

    #[inline(always)]
    pub fn sound_speed(&self, rho: f64, p: f64) -> f64 {
        (self.gamma * p / rho).sqrt()
    }

    /// Specific entropy `s = ln p - γ ln ρ`.
    #[inline]
    pub fn specific_entropy(&self, rho: f64, p: f64) -> f64 {
        p.ln() - self.gamma * rho.ln()
    }
}

impl Default for CompressibleEuler2D {
    fn default() -> Self {
        Self::air()
    }
}

impl Equations2D for CompressibleEuler2D {
    type State = EulerState2D;
    type Primitive = EulerPrimitive2D;
    type Entropy = EulerEntropy2D;

    const HAS_NONCONSERVATIVE_TERMS: bool = false;
    const NAME: &'static str = "CompressibleEulerEquations2D";

    #[inline(always)]
    fn flux(&self, u: &EulerState2D, dir: Direction) -> EulerState2D {
        let (n1, n2) = dir.components();
        let (v1, v2) = u.velocity();
        let p = self.pressure(u);
        let v_normal = v1 * n1 + v2 * n2;
        let rho_v_normal = u.rho * v_normal;

        EulerState2D {
            rho: rho_v_normal,
            rho_v1: rho_v_normal * v1 + p * n1,
            rho_v2: rho_v_normal * v2 + p * n2,
            rho_e: (u.rho_e + p) * v_normal,
        }
    }

    #[inline]
    fn cons2prim(&self, u: &EulerState2D) -> EulerPrimitive2D {
        let (v1, v2) = u.velocity();
        EulerPrimitive2D::new(u.rho, v1, v2, self.pressure(u))
    }

    #[inline]
    fn prim2cons(&self, prim: &EulerPrimitive2D) -> EulerState2D {
        let rho_v1 = prim.rho * prim.v1;
        let rho_v2 = prim.rho * prim.v2;
        let rho_e = prim.p * self.inv_gamma_minus_one
            + 0.5 * (rho_v1 * prim.v1 + rho_v2 * prim.v2);
        EulerState2D::new(prim.rho, rho_v1, rho_v2, rho_e)
    }

    fn cons2entropy(&self, u: &EulerState2D) -> EulerEntropy2D {
        let (v1, v2) = u.velocity();
        let p = self.pressure(u);
        let s = self.specific_entropy(u.rho, p);
        let rho_p = u.rho / p;

        EulerEntropy2D::new(
            (self.gamma - s) * self.inv_gamma_minus_one - 0.5 * rho_p * (v1 * v1 + v2 * v2),
            rho_p * v1,
            rho_p * v2,
            -rho_p,
        )
    }

    fn entropy2cons(&self, w: &EulerEntropy2D) -> EulerState2D {
        // Work with the scaled variables (γ - 1) w.
        let gm1 = self.gamma - 1.0;
        let (v1, v2, v3, v4) = (w.w1 * gm1, w.w2 * gm1, w.w3 * gm1, w.w4 * gm1);

        let v_square = v2 * v2 + v3 * v3;
        let s = self.gamma - v1 + v_square / (2.0 * v4);
        let rho_iota = (gm1 / (-v4).powf(self.gamma)).powf(self.inv_gamma_minus_one)
            * (-s * self.inv_gamma_minus_one).exp();

        EulerState2D::new(
            -rho_iota * v4,
            rho_iota * v2,
            rho_iota * v3,
            rho_iota * (1.0 - v_square / (2.0 * v4)),
        )
    }

    #[inline]
    fn max_abs_speeds(&self, u: &EulerState2D) -> [f64; 2] {
        let (v1, v2) = u.velocity();
        let c = self.sound_speed(u.rho, self.pressure(u));
        [v1.abs() + c, v2.abs() + c]
    }

    #[inline(always)]
    fn normal_velocity_and_sound_speed(&self, u: &EulerState2D, dir: Direction) -> (f64, f64) {
        let (n1, n2) = dir.components();
        let (v1, v2) = u.velocity();
        let c = self.sound_speed(u.rho, self.pressure(u));
        (v1 * n1 + v2 * n2, c * dir.magnitude())
    }

    fn roe_average_speeds(
        &self,
        u_ll: &EulerState2D,
        u_rr: &EulerState2D,
        dir: Direction,
    ) -> (f64, f64) {
        let (n1, n2) = dir.components();
        let sqrt_rho_ll = u_ll.rho.sqrt();
        let sqrt_rho_rr = u_rr.rho.sqrt();
        let sqrt_sum = sqrt_rho_ll + sqrt_rho_rr;

        // Vacuum on both sides: the limit of the average is at rest.
        if sqrt_sum == 0.0 {
            return (0.0, 0.0);
        }
        let inv_sum = 1.0 / sqrt_sum;

        // Weighted (v1, v2, H); a vacuum side carries no weight.
        let weighted = |sqrt_rho: f64, u: &EulerState2D| -> [f64; 3] {
            if sqrt_rho > 0.0 {
                let (v1, v2) = u.velocity();
                let enthalpy = (u.rho_e + self.pressure(u)) / u.rho;
                [sqrt_rho * v1, sqrt_rho * v2, sqrt_rho * enthalpy]
            } else {
                [0.0; 3]
            }
        };
        let [a1, a2, a3] = weighted(sqrt_rho_ll, u_ll);
        let [b1, b2, b3] = weighted(sqrt_rho_rr, u_rr);

        let v1_roe = (a1 + b1) * inv_sum;
        let v2_roe = (a2 + b2) * inv_sum;
        let enthalpy_roe = (a3 + b3) * inv_sum;

        let v_square_roe = v1_roe * v1_roe + v2_roe * v2_roe;
        let c_roe = ((self.gamma - 1.0) * (enthalpy_roe - 0.5 * v_square_roe)).sqrt();
        (v1_roe * n1 + v2_roe * n2, c_roe * dir.magnitude())
    }

    fn is_admissible(&self, u: &EulerState2D) -> bool {
        u.is_finite() && u.rho > 0.0 && self.pressure(u) > 0.0
    }

    fn supports_variable(variable: PositivityVariable) -> bool {
        matches!(
            variable,
            PositivityVariable::Density
                | PositivityVariable::Pressure
                | PositivityVariable::DensityPressure
        )
    }

    #[inline]
    fn admissibility_value(&self, variable: PositivityVariable, u: &EulerState2D) -> f64 {
        match variable {
            PositivityVariable::Density => u.rho,
            PositivityVariable::Pressure => self.pressure(u),
            PositivityVariable::DensityPressure => u.rho * self.pressure(u),
            PositivityVariable::WaterHeight => {
                debug_assert!(false, "water height is not an Euler variable");
                f64::NAN
            }
        }
    }

    fn entropy(&self, u: &EulerState2D) -> f64 {
        let s = self.specific_entropy(u.rho, self.pressure(u));
        -u.rho * s * self.inv_gamma_minus_one
    }

    fn entropy_potential(&self, u: &EulerState2D, dir: Direction) -> f64 {
        let (n1, n2) = dir.components();
        u.rho_v1 * n1 + u.rho_v2 * n2
    }

    fn energy_total(&self, u: &EulerState2D) -> f64 {
        u.rho_e
    }
}

impl ThermodynamicEntropy for CompressibleEuler2D {
    #[inline]
    fn exp_entropy(&self, u: &EulerState2D) -> f64 {
        self.pressure(u) * u.rho.powf(-self.gamma)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-12;

    fn euler() -> CompressibleEuler2D {
        CompressibleEuler2D::new(1.4)
    }

    fn state() -> EulerState2D {
        euler().prim2cons(&EulerPrimitive2D::new(1.2, 0.3, -0.4, 2.5))
    }

    #[test]
    fn test_pressure_from_state() {
        let euler = euler();
        assert!((euler.pressure(&state()) - 2.5).abs() < TOL);
    }

    #[test]
    fn test_prim_roundtrip() {
        let euler = euler();
        let u = state();
        assert!(euler.prim2cons(&euler.cons2prim(&u)).max_abs_diff(&u) < TOL);
    }

    #[test]
    fn test_entropy_roundtrip() {
        let euler = euler();
        let u = state();
        assert!(euler.entropy2cons(&euler.cons2entropy(&u)).max_abs_diff(&u) < TOL);
    }

    #[test]
    fn test_flux_energy_component() {
        let euler = euler();
        let u = state();
        let f = euler.flux(&u, Direction::Y);
        assert!((f.rho - 1.2 * -0.4).abs() < TOL);
        assert!((f.rho_e - (u.rho_e + 2.5) * -0.4).abs() < TOL);
    }

    #[test]
    fn test_entropy_variables_are_gradient() {
        // w = ∂S/∂u, checked by central differences
        let euler = euler();
        let u = state();
        let w = euler.cons2entropy(&u);
        let eps = 1e-6;
        for var in 0..4 {
            let mut plus = u.to_array();
            let mut minus = u.to_array();
            plus[var] += eps;
            minus[var] -= eps;
            let dsdu = (euler.entropy(&EulerState2D::from_array(plus))
                - euler.entropy(&EulerState2D::from_array(minus)))
                / (2.0 * eps);
            assert!((dsdu - w.get(var)).abs() < 1e-7, "variable {var}");
        }
    }

    #[test]
    fn test_exp_entropy() {
        let euler = euler();
        let expected = 2.5 / 1.2_f64.powf(1.4);
        assert!((euler.exp_entropy(&state()) - expected).abs() < TOL);
    }

    #[test]
    fn test_admissibility_values() {
        let euler = euler();
        let u = state();
        assert_eq!(euler.admissibility_value(PositivityVariable::Density, &u), 1.2);
        let rho_p = euler.admissibility_value(PositivityVariable::DensityPressure, &u);
        assert!((rho_p - 3.0).abs() < TOL);
        assert!(!CompressibleEuler2D::supports_variable(PositivityVariable::WaterHeight));
    }

    #[test]
    fn test_roe_average_skips_vacuum_side() {
        let euler = euler();
        let vacuum = EulerState2D::zero();
        let u = state();
        let (v_roe, c_roe) = euler.roe_average_speeds(&vacuum, &u, Direction::Y);
        assert!((v_roe + 0.4).abs() < TOL);
        assert!((c_roe - euler.sound_speed(1.2, 2.5)).abs() < TOL);
        assert_eq!(euler.roe_average_speeds(&vacuum, &vacuum, Direction::X), (0.0, 0.0));
    }

    #[test]
    fn test_negative_pressure_not_admissible() {
        let euler = euler();
        let u = EulerState2D::new(1.0, 2.0, 0.0, 1.0);
        assert!(euler.pressure(&u) < 0.0);
        assert!(!euler.is_admissible(&u));
    }
}
