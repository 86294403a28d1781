//! `alsvid-eval` — resource metrics and entanglement diagnostics.
//!
//! Consumes a circuit and its final statevector read-only and produces
//! two independent reports:
//!
//! - [`ResourceReport`] — depth (dependency-DAG longest chain), width,
//!   gate histogram, and the derived efficiency/parallelization ratios
//! - [`EntanglementReport`] — Schmidt coefficients and entanglement
//!   entropy across the half-register cut, Bell-state fidelity for
//!   two-qubit registers, a coherence-time heuristic, and a truncated
//!   correlation matrix
//!
//! Entanglement analysis never fails a run: malformed or zero-norm
//! input degrades to an all-null report so measurement statistics stay
//! usable.

pub mod entanglement;
pub mod resource;

pub use entanglement::{EntanglementReport, analyze_entanglement};
pub use resource::{ResourceReport, analyze_resources};
