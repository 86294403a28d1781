//! Boundary output types.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use alsvid_eval::{EntanglementReport, ResourceReport};

use crate::error::EngineError;

/// A complex amplitude serialized as a `{real, imag}` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComplexPair {
    /// Real part.
    pub real: f64,
    /// Imaginary part.
    pub imag: f64,
}

impl From<Complex64> for ComplexPair {
    fn from(c: Complex64) -> Self {
        Self {
            real: c.re,
            imag: c.im,
        }
    }
}

impl From<ComplexPair> for Complex64 {
    fn from(p: ComplexPair) -> Self {
        Complex64::new(p.real, p.imag)
    }
}

/// The full structured result of one simulation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutput {
    /// Bitstring → shot count.
    pub counts: BTreeMap<String, u64>,
    /// Bitstring → empirical probability.
    pub probabilities: BTreeMap<String, f64>,
    /// Final state amplitudes in basis order.
    pub statevector: Vec<ComplexPair>,
    /// Structural resource metrics.
    pub resources: ResourceReport,
    /// Entanglement diagnostics (fields null when degraded).
    pub entanglement: EntanglementReport,
}

/// Structured failure payload for the request boundary.
///
/// A failed request gets this and nothing else — no partial output is
/// ever returned alongside an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// Human-readable message.
    pub error: String,
    /// Stable machine-readable kind (e.g. `gate_arity_error`).
    pub kind: String,
}

impl From<&EngineError> for ErrorPayload {
    fn from(err: &EngineError) -> Self {
        Self {
            error: err.to_string(),
            kind: err.kind().to_string(),
        }
    }
}
