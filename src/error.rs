//! Crate-level error type.

use thiserror::Error;

use crate::config::ConfigError;
use crate::flux::FluxError;
use crate::limiters::LimiterError;
use crate::solver::AdmissibilityError;

/// Any error raised by the flux and limiter core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Invalid problem setup.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Checked flux evaluation failed.
    #[error(transparent)]
    Flux(#[from] FluxError),

    /// A stage limiter could not restore admissibility.
    #[error(transparent)]
    Limiter(#[from] LimiterError),

    /// A node is still non-admissible after limiting.
    #[error(transparent)]
    Admissibility(#[from] AdmissibilityError),
}

pub type Result<T> = std::result::Result<T, Error>;
