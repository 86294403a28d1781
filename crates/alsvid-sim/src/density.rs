//! Exact density-matrix evolution with Kraus-mixture noise.
//!
//! The faithful alternative to trajectory averaging: ρ = |ψ⟩⟨ψ| is
//! conjugated through each unitary, and after each noisy gate location
//! the channel is mixed in as a weighted sum of Pauli-conjugated copies.
//! Adequate only for small registers — memory is 4^n amplitudes.

use ndarray::Array2;
use num_complex::Complex64;
use tracing::debug;

use alsvid_ir::{Circuit, GateKind, GateOp, QubitId};

use crate::error::SimResult;
use crate::noise::{NoiseChannel, Pauli};
use crate::statevector::Statevector;

/// Pauli operators used in channel mixtures.
const PAULIS: [Pauli; 3] = [
    Pauli::X,
    Pauli::Y,
    Pauli::Z,
];

/// A density matrix over `num_qubits` qubits: Hermitian, unit trace.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityMatrix {
    rho: Array2<Complex64>,
    num_qubits: usize,
}

impl DensityMatrix {
    /// Create ρ = |0...0⟩⟨0...0|.
    pub fn new(num_qubits: usize) -> Self {
        let dim = 1usize << num_qubits;
        let mut rho = Array2::from_elem((dim, dim), Complex64::new(0.0, 0.0));
        rho[(0, 0)] = Complex64::new(1.0, 0.0);
        Self { rho, num_qubits }
    }

    /// Number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Dimension of the underlying state space (2^n).
    #[inline]
    pub fn dim(&self) -> usize {
        1usize << self.num_qubits
    }

    /// The raw matrix.
    pub fn rho(&self) -> &Array2<Complex64> {
        &self.rho
    }

    /// Trace (should stay 1 up to floating drift).
    pub fn trace(&self) -> f64 {
        self.rho.diag().iter().map(|c| c.re).sum()
    }

    /// Divide by the trace to absorb floating-point drift.
    pub fn renormalize(&mut self) {
        let tr = self.trace();
        if tr > 0.0 {
            let inv = Complex64::new(1.0 / tr, 0.0);
            self.rho.mapv_inplace(|c| c * inv);
        }
    }

    /// Outcome probabilities: the diagonal, clipped at zero.
    pub fn probabilities(&self) -> Vec<f64> {
        self.rho.diag().iter().map(|c| c.re.max(0.0)).collect()
    }

    /// Apply a unitary gate op: ρ ← UρU†.
    ///
    /// Columns are treated as state vectors for Uρ; rows are conjugated,
    /// evolved, and conjugated back for ρU† (row i of ρU† equals
    /// conj(U·conj(row i))). MEASURE is a no-op.
    pub fn apply_unitary(&mut self, op: &GateOp) -> SimResult<()> {
        if op.is_measure() {
            return Ok(());
        }
        let dim = self.dim();

        for j in 0..dim {
            let col: Vec<Complex64> = (0..dim).map(|i| self.rho[(i, j)]).collect();
            let mut sv = Statevector::from_amplitudes(col)?;
            sv.apply_op(op)?;
            for (i, a) in sv.amplitudes().iter().enumerate() {
                self.rho[(i, j)] = *a;
            }
        }

        for i in 0..dim {
            let row: Vec<Complex64> = (0..dim).map(|j| self.rho[(i, j)].conj()).collect();
            let mut sv = Statevector::from_amplitudes(row)?;
            sv.apply_op(op)?;
            for (j, a) in sv.amplitudes().iter().enumerate() {
                self.rho[(i, j)] = a.conj();
            }
        }
        Ok(())
    }

    /// Mix the channel in after a gate.
    ///
    /// Single-qubit gates take the channel on each target. CX takes the
    /// two-qubit extension on each control/target pair (15-Pauli uniform
    /// for depolarizing; independent per-qubit flips for bit-flip). CCX
    /// has no canonical multi-qubit extension here — the single-qubit
    /// channel applies to each operand, consistent with trajectory mode.
    pub fn apply_channel_after(&mut self, channel: &NoiseChannel, op: &GateOp) {
        match op.kind {
            GateKind::Measure => {}
            GateKind::Cx => {
                let pairs: Vec<(QubitId, QubitId)> = if op.controls.is_empty() {
                    vec![(op.targets[0], op.targets[1])]
                } else {
                    op.controls.iter().copied().zip(op.targets.iter().copied()).collect()
                };
                for (c, t) in pairs {
                    match channel {
                        NoiseChannel::Depolarizing { p } => {
                            self.depolarize_pair(*p, c.index(), t.index());
                        }
                        NoiseChannel::BitFlip { p } => {
                            self.bit_flip(*p, c.index());
                            self.bit_flip(*p, t.index());
                        }
                    }
                }
            }
            GateKind::Ccx => {
                for q in op.operands().collect::<Vec<_>>() {
                    self.apply_single_qubit_channel(channel, q.index());
                }
            }
            _ => {
                for t in &op.targets {
                    self.apply_single_qubit_channel(channel, t.index());
                }
            }
        }
    }

    fn apply_single_qubit_channel(&mut self, channel: &NoiseChannel, qubit: usize) {
        match channel {
            NoiseChannel::Depolarizing { p } => self.depolarize_single(*p, qubit),
            NoiseChannel::BitFlip { p } => self.bit_flip(*p, qubit),
        }
    }

    /// ρ ← (1-p)ρ + p·XρX on one qubit.
    fn bit_flip(&mut self, p: f64, qubit: usize) {
        if p == 0.0 {
            return;
        }
        let flipped = self.pauli_conjugated(&[(Pauli::X, qubit)]);
        self.mix(p, &[flipped]);
    }

    /// ρ ← (1-p)ρ + p/3·(XρX + YρY + ZρZ) on one qubit.
    fn depolarize_single(&mut self, p: f64, qubit: usize) {
        if p == 0.0 {
            return;
        }
        let branches: Vec<Array2<Complex64>> = PAULIS
            .iter()
            .map(|&pl| self.pauli_conjugated(&[(pl, qubit)]))
            .collect();
        self.mix(p, &branches);
    }

    /// ρ ← (1-p)ρ + p/15·Σ (P⊗Q)ρ(P⊗Q) over the 15 non-identity Pauli
    /// pairs on two qubits.
    fn depolarize_pair(&mut self, p: f64, q1: usize, q2: usize) {
        if p == 0.0 {
            return;
        }
        let mut branches = Vec::with_capacity(15);
        let options = [
            None,
            Some(Pauli::X),
            Some(Pauli::Y),
            Some(Pauli::Z),
        ];
        for a in options {
            for b in options {
                if a.is_none() && b.is_none() {
                    continue;
                }
                let mut paulis = Vec::with_capacity(2);
                if let Some(pl) = a {
                    paulis.push((pl, q1));
                }
                if let Some(pl) = b {
                    paulis.push((pl, q2));
                }
                branches.push(self.pauli_conjugated(&paulis));
            }
        }
        self.mix(p, &branches);
    }

    /// ρ ← (1-p)ρ + (p/k)·Σ branches.
    fn mix(&mut self, p: f64, branches: &[Array2<Complex64>]) {
        let keep = Complex64::new(1.0 - p, 0.0);
        let w = Complex64::new(p / branches.len() as f64, 0.0);
        self.rho.mapv_inplace(|c| c * keep);
        for branch in branches {
            self.rho.zip_mut_with(branch, |c, b| *c += w * b);
        }
    }

    /// Compute PρP† for a product of Paulis on distinct qubits. Paulis
    /// are Hermitian, so conjugation reuses the same kernels both sides.
    fn pauli_conjugated(
        &self,
        paulis: &[(Pauli, usize)],
    ) -> Array2<Complex64> {
        let dim = self.dim();
        let mut out = self.rho.clone();
        let mut scratch = vec![Complex64::new(0.0, 0.0); dim];

        for j in 0..dim {
            for i in 0..dim {
                scratch[i] = out[(i, j)];
            }
            for &(pl, q) in paulis {
                pl.apply(&mut scratch, q);
            }
            for i in 0..dim {
                out[(i, j)] = scratch[i];
            }
        }
        for i in 0..dim {
            for j in 0..dim {
                scratch[j] = out[(i, j)].conj();
            }
            for &(pl, q) in paulis {
                pl.apply(&mut scratch, q);
            }
            for j in 0..dim {
                out[(i, j)] = scratch[j].conj();
            }
        }
        out
    }

    /// Extract the dominant eigenvector by power iteration.
    ///
    /// For a pure ρ this recovers the exact state (up to global phase) in
    /// one step; for mixed states it is the best pure approximation for
    /// downstream entanglement analysis. A numerically zero ρ yields the
    /// zero vector, which the analyzer degrades on.
    pub fn principal_statevector(&self) -> SimResult<Statevector> {
        let dim = self.dim();

        // Start from the most populated basis state.
        let start = self
            .probabilities()
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map_or(0, |(i, _)| i);

        let mut v = vec![Complex64::new(0.0, 0.0); dim];
        v[start] = Complex64::new(1.0, 0.0);

        for _ in 0..64 {
            let mut w = vec![Complex64::new(0.0, 0.0); dim];
            for i in 0..dim {
                for j in 0..dim {
                    w[i] += self.rho[(i, j)] * v[j];
                }
            }
            let norm = w.iter().map(|c| c.norm_sqr()).sum::<f64>().sqrt();
            if norm < 1e-15 {
                return Statevector::from_amplitudes(w);
            }
            for c in &mut w {
                *c /= norm;
            }
            let delta: f64 = w
                .iter()
                .zip(&v)
                .map(|(a, b)| (a - b).norm_sqr())
                .sum::<f64>()
                .sqrt();
            v = w;
            if delta < 1e-12 {
                break;
            }
        }
        Statevector::from_amplitudes(v)
    }
}

/// Evolve a circuit as a density matrix, mixing in the channel after
/// every noisy gate location.
pub fn evolve_density(
    circuit: &Circuit,
    channel: Option<&NoiseChannel>,
) -> SimResult<DensityMatrix> {
    let num_qubits = circuit.num_qubits() as usize;
    debug!(
        num_qubits,
        ops = circuit.len(),
        noisy = channel.is_some(),
        "evolving density matrix"
    );

    let mut rho = DensityMatrix::new(num_qubits);
    for op in circuit.ops() {
        if op.is_measure() {
            continue;
        }
        rho.apply_unitary(op)?;
        if let Some(ch) = channel {
            rho.apply_channel_after(ch, op);
        }
    }
    rho.renormalize();
    Ok(rho)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evolve::evolve;
    use alsvid_ir::QubitId;

    fn shannon_entropy(probs: &[f64]) -> f64 {
        probs
            .iter()
            .filter(|&&p| p > 1e-12)
            .map(|&p| -p * p.log2())
            .sum()
    }

    #[test]
    fn test_initial_density() {
        let rho = DensityMatrix::new(2);
        assert_eq!(rho.probabilities(), vec![1.0, 0.0, 0.0, 0.0]);
        assert!((rho.trace() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_noiseless_density_matches_pure_evolution() {
        let mut circuit = Circuit::new(2).unwrap();
        circuit
            .h(QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap();

        let sv = evolve(&circuit).unwrap();
        let rho = evolve_density(&circuit, None).unwrap();

        for (p_rho, p_sv) in rho.probabilities().iter().zip(sv.probabilities()) {
            assert!((p_rho - p_sv).abs() < 1e-9);
        }
        // ρ is pure, so the principal eigenvector is the state itself up
        // to global phase: |⟨ψ|v⟩|² ≈ 1.
        let v = rho.principal_statevector().unwrap();
        let overlap: Complex64 = v
            .amplitudes()
            .iter()
            .zip(sv.amplitudes())
            .map(|(a, b)| a.conj() * b)
            .sum();
        assert!((overlap.norm() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_certain_bitflip_undoes_x() {
        let mut circuit = Circuit::new(1).unwrap();
        circuit.x(QubitId(0)).unwrap();
        let rho = evolve_density(&circuit, Some(&NoiseChannel::BitFlip { p: 1.0 })).unwrap();
        let probs = rho.probabilities();
        assert!((probs[0] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_depolarizing_uniform_pauli_weights() {
        // Uniform-Pauli depolarizing at p=1 on |1⟩: (X+Y+Z conjugations)/3
        // → diag(2/3, 1/3).
        let mut circuit = Circuit::new(1).unwrap();
        circuit.x(QubitId(0)).unwrap();
        let rho =
            evolve_density(&circuit, Some(&NoiseChannel::Depolarizing { p: 1.0 })).unwrap();
        let probs = rho.probabilities();
        assert!((probs[0] - 2.0 / 3.0).abs() < 1e-9);
        assert!((probs[1] - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_outcome_entropy_monotonic_in_p() {
        let mut circuit = Circuit::new(1).unwrap();
        circuit.x(QubitId(0)).unwrap();

        let mut last = -1.0;
        for p in [0.0, 0.2, 0.4, 0.6] {
            let rho =
                evolve_density(&circuit, Some(&NoiseChannel::Depolarizing { p })).unwrap();
            let entropy = shannon_entropy(&rho.probabilities());
            assert!(
                entropy > last,
                "entropy {entropy} not increasing at p={p} (prev {last})"
            );
            last = entropy;
        }
    }

    #[test]
    fn test_trace_preserved_under_noise() {
        let mut circuit = Circuit::new(2).unwrap();
        circuit
            .h(QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap();
        let rho =
            evolve_density(&circuit, Some(&NoiseChannel::Depolarizing { p: 0.25 })).unwrap();
        assert!((rho.trace() - 1.0).abs() < 1e-9);
    }
}
