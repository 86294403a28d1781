//! Error types for the simulation crate.

use alsvid_ir::CircuitError;
use thiserror::Error;

/// Errors produced during state evolution and sampling.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// Internal invariant violated during evolution. The circuit layer
    /// should have rejected the operation; this is defense in depth.
    #[error("simulation invariant violated: {0}")]
    Simulation(String),

    /// Noise mode outside {none, depolarizing, bitflip} under strict
    /// configuration. The non-strict default degrades to no noise instead.
    #[error("unknown noise mode '{0}'")]
    UnknownNoiseMode(String),

    /// Noise probability outside [0, 1].
    #[error("noise probability {0} outside [0, 1]")]
    InvalidProbability(f64),

    /// Circuit construction or validation error.
    #[error("circuit error: {0}")]
    Circuit(#[from] CircuitError),
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;
