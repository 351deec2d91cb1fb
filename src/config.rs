//! Problem-setup configuration.
//!
//! Everything here is fixed before the first stage and read-only afterwards:
//! the equation family and its physical constants, the numerical fluxes and
//! the stage limiters with their thresholds.
//!
//! # Example
//!
//! ```
//! use dgsem_rs::config::SolverConfig;
//!
//! let config = SolverConfig::from_json_str(r#"{
//!     "polydeg": 3,
//!     "equations": { "family": "shallow_water", "gravity": 9.81, "h0": 1.0 },
//!     "surface_flux": { "type": "fjordholm_etal" },
//!     "nonconservative_flux": "audusse_etal",
//!     "hydrostatic_reconstruction": true,
//!     "limiters": [
//!         { "type": "positivity_zhang_shu",
//!           "constraints": [{ "variable": "water_height", "threshold": 1e-6 }] }
//!     ]
//! }"#).unwrap();
//!
//! assert_eq!(config.polydeg, 3);
//! assert_eq!(config.limiters.len(), 1);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::equations::{EquationFamily, PositivityVariable};
use crate::wave_speed::{MaxAbsSpeedEstimate, MinMaxSpeedEstimate};

/// Errors detected while setting up a problem.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("polynomial degree must be at least 1, got {0}")]
    InvalidPolydeg(usize),

    #[error("gravitational constant must be positive and finite, got {0}")]
    InvalidGravity(f64),

    #[error("ratio of specific heats must be finite and greater than 1, got {0}")]
    InvalidGamma(f64),

    #[error("CFL number must be positive and finite, got {0}")]
    InvalidCfl(f64),

    #[error("limiter threshold for {variable} must be finite, got {threshold}")]
    InvalidThreshold {
        variable: PositivityVariable,
        threshold: f64,
    },

    #[error("maximum exponentiated entropy decrease must be negative, got {0}")]
    NonNegativeEntropyThreshold(f64),

    #[error("positivity limiter needs at least one constraint")]
    EmptyConstraints,

    #[error("{equations} has no admissibility variable {variable}")]
    UnsupportedVariable {
        variable: PositivityVariable,
        equations: &'static str,
    },

    #[error("{what} is not available for {equations}")]
    Unsupported {
        what: &'static str,
        equations: &'static str,
    },

    #[error("{what}: expected {expected} entries, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("inverse Jacobian is zero or non-finite at element {element}, node {node}")]
    DegenerateJacobian { element: usize, node: usize },

    #[error("failed to parse configuration: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

/// Equation family and its physical constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum EquationsConfig {
    ShallowWater {
        gravity: f64,
        /// Reference total water height of the lake at rest.
        #[serde(default = "default_h0")]
        h0: f64,
    },
    CompressibleEuler {
        gamma: f64,
    },
}

fn default_h0() -> f64 {
    1.0
}

impl Default for EquationsConfig {
    fn default() -> Self {
        EquationsConfig::ShallowWater {
            gravity: 9.81,
            h0: default_h0(),
        }
    }
}

/// Conservative two-point surface flux.
///
/// Which variants are valid depends on the equation family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SurfaceFluxConfig {
    Central,
    LaxFriedrichs {
        #[serde(default)]
        estimate: MaxAbsSpeedEstimate,
    },
    Hll {
        #[serde(default)]
        estimate: MinMaxSpeedEstimate,
    },
    FjordholmEtal,
    WintermeyerEtal,
    Ranocha,
    Chandrashekar,
    ShimaEtal,
    KennedyGruber,
}

/// Two-point flux for the non-conservative bottom-topography term.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonconservativeFluxConfig {
    WintermeyerEtal,
    FjordholmEtal,
    AudusseEtal,
}

/// One `(variable, threshold)` pair of the positivity limiter.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PositivityConstraint {
    pub variable: PositivityVariable,
    pub threshold: f64,
}

/// Stage limiter parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LimiterConfig {
    PositivityZhangShu {
        constraints: Vec<PositivityConstraint>,
    },
    EntropyBounded {
        #[serde(default = "default_exp_entropy_decrease_max")]
        exp_entropy_decrease_max: f64,
    },
}

fn default_exp_entropy_decrease_max() -> f64 {
    -1e-13
}

impl LimiterConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            LimiterConfig::PositivityZhangShu { constraints } => {
                if constraints.is_empty() {
                    return Err(ConfigError::EmptyConstraints);
                }
                for c in constraints {
                    if !c.threshold.is_finite() {
                        return Err(ConfigError::InvalidThreshold {
                            variable: c.variable,
                            threshold: c.threshold,
                        });
                    }
                }
                Ok(())
            }
            LimiterConfig::EntropyBounded {
                exp_entropy_decrease_max,
            } => {
                if *exp_entropy_decrease_max >= 0.0 || exp_entropy_decrease_max.is_nan() {
                    return Err(ConfigError::NonNegativeEntropyThreshold(
                        *exp_entropy_decrease_max,
                    ));
                }
                Ok(())
            }
        }
    }
}

/// Complete setup of the flux and limiter core.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Polynomial degree of the nodal basis.
    pub polydeg: usize,
    pub equations: EquationsConfig,
    /// `None` selects the family's entropy-conservative default.
    pub surface_flux: Option<SurfaceFluxConfig>,
    /// Only valid for families with non-conservative terms. `None` selects
    /// the well-balanced partner of the surface flux.
    pub nonconservative_flux: Option<NonconservativeFluxConfig>,
    /// Wrap the surface flux in the Audusse hydrostatic reconstruction.
    pub hydrostatic_reconstruction: bool,
    /// Stage limiters, applied in order.
    pub limiters: Vec<LimiterConfig>,
    pub cfl: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            polydeg: 3,
            equations: EquationsConfig::default(),
            surface_flux: None,
            nonconservative_flux: None,
            hydrostatic_reconstruction: false,
            limiters: Vec::new(),
            cfl: 0.5,
        }
    }
}

impl SolverConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SolverConfig = serde_json::from_str(json)?;
        config.validate()?;
        tracing::info!(
            polydeg = config.polydeg,
            equations = ?config.equations,
            surface_flux = ?config.surface_flux,
            n_limiters = config.limiters.len(),
            "loaded solver configuration"
        );
        Ok(config)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check parameter ranges that do not depend on the equation family.
    ///
    /// Family-specific checks (flux and variable availability) happen when
    /// the discretization is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.polydeg == 0 {
            return Err(ConfigError::InvalidPolydeg(self.polydeg));
        }
        if !(self.cfl > 0.0 && self.cfl.is_finite()) {
            return Err(ConfigError::InvalidCfl(self.cfl));
        }
        EquationFamily::from_config(&self.equations)?;
        for limiter in &self.limiters {
            limiter.validate()?;
        }
        Ok(())
    }
}
