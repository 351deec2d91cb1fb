//! Hyperbolic systems of conservation laws in 2D.
//!
//! Each family implements [`Equations2D`]: the analytic flux, the variable
//! conversions, the characteristic speeds and the admissibility checks the
//! stage limiters rely on.
//!
//! ∂u/∂t + ∂f₁(u)/∂x + ∂f₂(u)/∂y + (non-conservative terms) = 0
//!
//! Families are selected once at setup through [`EquationFamily`]; all hot
//! paths are generic over the concrete family.

mod compressible_euler_2d;
mod shallow_water_2d;
mod state;

pub use compressible_euler_2d::{
    CompressibleEuler2D, EulerEntropy2D, EulerPrimitive2D, EulerState2D,
};
pub use shallow_water_2d::{
    ShallowWater2D, ShallowWaterEntropy2D, ShallowWaterPrimitive2D, ShallowWaterState2D,
};
pub use state::StateVector;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, EquationsConfig};

/// Coordinate axis of a Cartesian face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    X,
    Y,
}

impl Orientation {
    /// Map the 1-based axis number (1 = x, 2 = y).
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            1 => Some(Orientation::X),
            2 => Some(Orientation::Y),
            _ => None,
        }
    }

    /// 1-based axis number.
    pub fn index(self) -> usize {
        match self {
            Orientation::X => 1,
            Orientation::Y => 2,
        }
    }

    /// Unit vector along the axis.
    #[inline(always)]
    pub fn unit_normal(self) -> (f64, f64) {
        match self {
            Orientation::X => (1.0, 0.0),
            Orientation::Y => (0.0, 1.0),
        }
    }
}

/// Direction argument of every pointwise and two-point operation.
///
/// A `Normal` need not have unit length; results computed for it are scaled
/// by its magnitude, which is how curved faces carry their surface metric.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Direction {
    Orientation(Orientation),
    Normal { nx: f64, ny: f64 },
}

impl Direction {
    pub const X: Direction = Direction::Orientation(Orientation::X);
    pub const Y: Direction = Direction::Orientation(Orientation::Y);

    #[inline(always)]
    pub fn normal(nx: f64, ny: f64) -> Self {
        Direction::Normal { nx, ny }
    }

    /// Components `(n1, n2)`; orientations give the axis unit vector.
    #[inline(always)]
    pub fn components(self) -> (f64, f64) {
        match self {
            Direction::Orientation(o) => o.unit_normal(),
            Direction::Normal { nx, ny } => (nx, ny),
        }
    }

    /// Length of the direction vector (1 for orientations).
    #[inline(always)]
    pub fn magnitude(self) -> f64 {
        match self {
            Direction::Orientation(_) => 1.0,
            Direction::Normal { nx, ny } => nx.hypot(ny),
        }
    }

    /// The opposite direction `-n`.
    #[inline(always)]
    pub fn flipped(self) -> Self {
        let (nx, ny) = self.components();
        Direction::Normal { nx: -nx, ny: -ny }
    }
}

impl From<Orientation> for Direction {
    fn from(orientation: Orientation) -> Self {
        Direction::Orientation(orientation)
    }
}

impl From<(f64, f64)> for Direction {
    fn from((nx, ny): (f64, f64)) -> Self {
        Direction::Normal { nx, ny }
    }
}

/// Scalar quantity a positivity limiter keeps above a threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositivityVariable {
    WaterHeight,
    Density,
    Pressure,
    /// Product of density and pressure; positive iff both share a sign.
    DensityPressure,
}

impl fmt::Display for PositivityVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PositivityVariable::WaterHeight => "water_height",
            PositivityVariable::Density => "density",
            PositivityVariable::Pressure => "pressure",
            PositivityVariable::DensityPressure => "density_pressure",
        };
        f.write_str(name)
    }
}

/// Operation table of one equation family.
///
/// The descriptor is immutable physical parameters only; it is created once
/// and shared read-only by every flux evaluation and element loop.
pub trait Equations2D: Clone + fmt::Debug + Send + Sync {
    /// Conserved variables (the stored solution).
    type State: StateVector;
    type Primitive: StateVector;
    type Entropy: StateVector;

    /// Whether the system carries a non-conservative term.
    const HAS_NONCONSERVATIVE_TERMS: bool;

    /// Human-readable family name for logging and errors.
    const NAME: &'static str;

    /// Analytic flux `f(u) · n`.
    fn flux(&self, u: &Self::State, dir: Direction) -> Self::State;

    fn cons2prim(&self, u: &Self::State) -> Self::Primitive;
    fn prim2cons(&self, prim: &Self::Primitive) -> Self::State;
    fn cons2entropy(&self, u: &Self::State) -> Self::Entropy;
    fn entropy2cons(&self, w: &Self::Entropy) -> Self::State;

    /// Local characteristic speed magnitude per axis, `|v_i| + c`.
    fn max_abs_speeds(&self, u: &Self::State) -> [f64; 2];

    /// Normal velocity `v · n` and sound speed `c |n|`.
    fn normal_velocity_and_sound_speed(&self, u: &Self::State, dir: Direction) -> (f64, f64);

    /// Roe-averaged normal velocity and sound speed of a state pair.
    ///
    /// Used by the Einfeldt wave-speed estimate.
    fn roe_average_speeds(&self, u_ll: &Self::State, u_rr: &Self::State, dir: Direction)
        -> (f64, f64);

    /// Zero the components of an update (flux dissipation, limiter blend)
    /// that are not transported.
    #[inline(always)]
    fn mask_dissipation(&self, dissipation: Self::State) -> Self::State {
        dissipation
    }

    /// Finite and physically bounded (positive height, density, pressure).
    fn is_admissible(&self, u: &Self::State) -> bool;

    /// Whether [`Equations2D::admissibility_value`] is defined for `variable`.
    fn supports_variable(variable: PositivityVariable) -> bool;

    /// Value of a positivity variable; only called for supported variables.
    fn admissibility_value(&self, variable: PositivityVariable, u: &Self::State) -> f64;

    /// Mathematical entropy (convex in the conserved variables).
    fn entropy(&self, u: &Self::State) -> f64;

    /// Entropy flux potential `ψ · n`, such that entropy-conservative fluxes
    /// satisfy `(w_rr - w_ll) · F = ψ_rr - ψ_ll`.
    fn entropy_potential(&self, u: &Self::State, dir: Direction) -> f64;

    /// Total energy density.
    fn energy_total(&self, u: &Self::State) -> f64;
}

/// Families with a thermodynamic entropy the entropy-bounded limiter can
/// monitor.
pub trait ThermodynamicEntropy: Equations2D {
    /// Exponentiated thermodynamic entropy, e.g. `p / rho^γ`.
    fn exp_entropy(&self, u: &Self::State) -> f64;
}

/// Closed set of supported equation families.
///
/// Built once from configuration; callers match once and enter generic code
/// monomorphised for the concrete family.
#[derive(Clone, Debug, PartialEq)]
pub enum EquationFamily {
    ShallowWater(ShallowWater2D),
    CompressibleEuler(CompressibleEuler2D),
}

impl EquationFamily {
    pub fn from_config(config: &EquationsConfig) -> Result<Self, ConfigError> {
        match *config {
            EquationsConfig::ShallowWater { gravity, h0 } => {
                ShallowWater2D::try_new(gravity, h0).map(EquationFamily::ShallowWater)
            }
            EquationsConfig::CompressibleEuler { gamma } => {
                CompressibleEuler2D::try_new(gamma).map(EquationFamily::CompressibleEuler)
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EquationFamily::ShallowWater(_) => ShallowWater2D::NAME,
            EquationFamily::CompressibleEuler(_) => CompressibleEuler2D::NAME,
        }
    }

    pub fn n_vars(&self) -> usize {
        match self {
            EquationFamily::ShallowWater(_) => ShallowWaterState2D::N_VARS,
            EquationFamily::CompressibleEuler(_) => EulerState2D::N_VARS,
        }
    }

    pub fn has_nonconservative_terms(&self) -> bool {
        match self {
            EquationFamily::ShallowWater(_) => ShallowWater2D::HAS_NONCONSERVATIVE_TERMS,
            EquationFamily::CompressibleEuler(_) => CompressibleEuler2D::HAS_NONCONSERVATIVE_TERMS,
        }
    }
}
