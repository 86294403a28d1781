//! Noiseless unitary evolution.

use tracing::debug;

use alsvid_ir::Circuit;

use crate::error::SimResult;
use crate::statevector::Statevector;

/// Evolve a circuit from |0...0⟩ to its final pure state.
///
/// Gates apply strictly in list order; MEASURE markers are skipped. The
/// final state is renormalized to absorb floating-point drift, since
/// downstream probability and entropy calculations assume exact unit
/// norm.
pub fn evolve(circuit: &Circuit) -> SimResult<Statevector> {
    let num_qubits = circuit.num_qubits() as usize;
    debug!(
        num_qubits,
        ops = circuit.len(),
        "evolving statevector"
    );

    let mut sv = Statevector::new(num_qubits);
    for op in circuit.ops() {
        sv.apply_op(op)?;
    }
    sv.renormalize();
    Ok(sv)
}
