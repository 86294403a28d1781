//! Error types for the circuit crate.

use thiserror::Error;

/// Errors produced while constructing or validating a circuit.
///
/// All variants are caller mistakes, not transient conditions — a request
/// that fails construction is rejected outright, never retried.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CircuitError {
    /// Malformed or inconsistent circuit description (missing fields,
    /// nonpositive qubit count, declared count mismatch).
    #[error("schema error: {0}")]
    Schema(String),

    /// Gate name outside the supported vocabulary.
    #[error("unsupported gate: '{0}'")]
    UnsupportedGate(String),

    /// A gate operand lies outside `[0, num_qubits)`.
    #[error("qubit index {qubit} out of range for {num_qubits}-qubit circuit (gate: {gate})")]
    QubitRange {
        /// The offending qubit index.
        qubit: u32,
        /// Number of qubits in the circuit.
        num_qubits: u32,
        /// Name of the gate carrying the operand.
        gate: String,
    },

    /// Structurally invalid control/target combination for a gate kind.
    #[error("gate '{gate}' has invalid operands: {reason}")]
    GateArity {
        /// Name of the gate.
        gate: String,
        /// What was wrong with the operand lists.
        reason: String,
    },
}

/// Result type for circuit operations.
pub type IrResult<T> = Result<T, CircuitError>;
