//! Engine-level error type and classification.

use alsvid_ir::CircuitError;
use alsvid_sim::SimError;
use thiserror::Error;

/// Any failure a simulation request can surface.
///
/// Construction-time errors (schema, vocabulary, range, arity) abort the
/// request immediately; they are caller mistakes, not transient
/// conditions. Analysis-stage failures never appear here — they degrade
/// inside the entanglement report instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// Malformed request fields (e.g. zero shots).
    #[error("schema error: {0}")]
    Schema(String),

    /// The circuit exceeds the configured qubit bound.
    #[error("circuit has {num_qubits} qubits but the engine is bounded at {max_qubits}")]
    CircuitTooLarge {
        /// Requested register size.
        num_qubits: u32,
        /// Configured bound.
        max_qubits: u32,
    },

    /// Circuit construction or validation failed.
    #[error(transparent)]
    Circuit(#[from] CircuitError),

    /// Evolution or sampling failed.
    #[error(transparent)]
    Sim(#[from] SimError),
}

impl EngineError {
    /// Stable machine-readable error kind for the failure payload.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::Schema(_) => "schema_error",
            EngineError::CircuitTooLarge { .. } => "circuit_too_large",
            EngineError::Circuit(inner) => circuit_kind(inner),
            EngineError::Sim(inner) => match inner {
                SimError::UnknownNoiseMode(_) => "unknown_noise_mode",
                SimError::InvalidProbability(_) => "invalid_probability",
                SimError::Circuit(nested) => circuit_kind(nested),
                _ => "simulation_error",
            },
        }
    }
}

fn circuit_kind(err: &CircuitError) -> &'static str {
    match err {
        CircuitError::Schema(_) => "schema_error",
        CircuitError::UnsupportedGate(_) => "unsupported_gate_error",
        CircuitError::QubitRange { .. } => "qubit_range_error",
        CircuitError::GateArity { .. } => "gate_arity_error",
        _ => "circuit_error",
    }
}
