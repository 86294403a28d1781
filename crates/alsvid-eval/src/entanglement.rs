//! Entanglement diagnostics from a final statevector.
//!
//! The register is split into two halves and the amplitude vector is
//! reshaped into a matrix whose singular values are the Schmidt
//! coefficients; entanglement entropy is the Shannon entropy of their
//! squares. Numerical failure never propagates — the report degrades to
//! all-null fields so counts and statevector stay usable upstream.

use nalgebra::DMatrix;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Probabilities at or below this floor are excluded from the entropy
/// sum to avoid log(0).
const ENTROPY_FLOOR: f64 = 1e-12;

/// Scale factor for the coherence-time heuristic. The resulting number
/// is illustrative, not a measured physical quantity.
const COHERENCE_SCALE: f64 = 50.0;

/// The four canonical two-qubit maximally entangled states.
const BELL_STATES: [(&str, [f64; 4]); 4] = {
    // 1/√2, spelled out so the table stays const.
    const R: f64 = std::f64::consts::FRAC_1_SQRT_2;
    [
        ("phi_plus", [R, 0.0, 0.0, R]),
        ("phi_minus", [R, 0.0, 0.0, -R]),
        ("psi_plus", [0.0, R, R, 0.0]),
        ("psi_minus", [0.0, R, -R, 0.0]),
    ]
};

/// Entanglement diagnostics for a final state.
///
/// `None` fields mean the analysis was unavailable (degraded), or — for
/// `fidelity`/`bell_state` — that the register is not exactly two qubits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntanglementReport {
    /// Entanglement entropy across the half-register cut, in bits.
    pub entropy: Option<f64>,
    /// Fidelity against the closest Bell state (two-qubit registers only).
    pub fidelity: Option<f64>,
    /// Name of the closest Bell state (two-qubit registers only).
    pub bell_state: Option<String>,
    /// Coherence-time heuristic: 50 × entropy.
    pub coherence_time: Option<f64>,
    /// Re(ψψ*) truncated to its top-left numQubits×numQubits block.
    pub matrix: Vec<Vec<f64>>,
    /// Schmidt coefficients, L2-normalized.
    pub schmidt: Vec<f64>,
}

impl EntanglementReport {
    /// The degraded all-null report.
    pub fn unavailable() -> Self {
        Self {
            entropy: None,
            fidelity: None,
            bell_state: None,
            coherence_time: None,
            matrix: vec![],
            schmidt: vec![],
        }
    }
}

/// Compute entanglement diagnostics for a statevector.
///
/// Mixed states are expected to arrive as their pure approximation
/// (trajectory average or dominant eigenvector). Any malformed input —
/// wrong length, zero or non-finite norm — degrades to
/// [`EntanglementReport::unavailable`] with a warning.
pub fn analyze_entanglement(amplitudes: &[Complex64], num_qubits: u32) -> EntanglementReport {
    match try_analyze(amplitudes, num_qubits) {
        Some(report) => report,
        None => {
            warn!(num_qubits, "entanglement analysis degraded to unavailable");
            EntanglementReport::unavailable()
        }
    }
}

fn try_analyze(amplitudes: &[Complex64], num_qubits: u32) -> Option<EntanglementReport> {
    if num_qubits == 0 || amplitudes.len() != 1usize << num_qubits {
        return None;
    }

    let norm_sq: f64 = amplitudes.iter().map(Complex64::norm_sqr).sum();
    if !norm_sq.is_finite() || norm_sq <= ENTROPY_FLOOR {
        return None;
    }
    let inv_norm = 1.0 / norm_sq.sqrt();
    let vec: Vec<Complex64> = amplitudes.iter().map(|a| a * inv_norm).collect();

    // Bipartition: A takes num_qubits / 2 qubits (the high index bits),
    // B the remainder; reshape into a dimA × dimB amplitude matrix.
    let dim_a = 1usize << (num_qubits / 2);
    let dim_b = vec.len() / dim_a;
    let psi = DMatrix::from_fn(dim_a, dim_b, |r, c| vec[r * dim_b + c]);

    let singular = psi.singular_values();
    let s_norm = singular.iter().map(|s| s * s).sum::<f64>().sqrt();
    if !s_norm.is_finite() || s_norm <= ENTROPY_FLOOR {
        return None;
    }
    let schmidt: Vec<f64> = singular.iter().map(|s| s / s_norm).collect();

    let entropy: f64 = schmidt
        .iter()
        .map(|s| s * s)
        .filter(|&p| p > ENTROPY_FLOOR)
        .map(|p| -p * p.log2())
        .sum();
    if !entropy.is_finite() {
        return None;
    }

    let (bell_state, fidelity) = if num_qubits == 2 {
        let (name, fid) = closest_bell_state(&vec);
        (Some(name.to_string()), Some(fid))
    } else {
        (None, None)
    };

    let block = num_qubits as usize;
    let matrix: Vec<Vec<f64>> = (0..block)
        .map(|r| {
            (0..block)
                .map(|c| (vec[r] * vec[c].conj()).re)
                .collect()
        })
        .collect();

    Some(EntanglementReport {
        entropy: Some(entropy),
        fidelity,
        bell_state,
        coherence_time: Some(COHERENCE_SCALE * entropy),
        matrix,
        schmidt,
    })
}

/// Fidelity |⟨Bell|ψ⟩|² against each canonical Bell state; returns the
/// maximizing state's name and value. Ties keep the earlier entry.
fn closest_bell_state(vec: &[Complex64]) -> (&'static str, f64) {
    let mut best = ("phi_plus", f64::NEG_INFINITY);
    for (name, bell) in BELL_STATES {
        let overlap: Complex64 = bell
            .iter()
            .zip(vec)
            .map(|(b, v)| Complex64::new(*b, 0.0) * v)
            .sum();
        let fid = overlap.norm_sqr();
        if fid > best.1 {
            best = (name, fid);
        }
    }
    best
}
