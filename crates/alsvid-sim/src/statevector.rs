//! Dense statevector representation and gate kernels.
//!
//! Amplitude index `i` encodes qubit `k` in bit `k` of `i`; bitstrings
//! render qubit 0 as the leftmost character. All kernels act in place on
//! the amplitude buffer via masked index loops.

use num_complex::Complex64;
use std::f64::consts::PI;

use alsvid_ir::{GateKind, GateOp};

use crate::error::{SimError, SimResult};

/// A dense pure quantum state over `num_qubits` qubits.
#[derive(Debug, Clone, PartialEq)]
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let size = 1usize << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Wrap an existing amplitude buffer.
    ///
    /// Fails when the length is not a power of two.
    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> SimResult<Self> {
        let len = amplitudes.len();
        if len == 0 || !len.is_power_of_two() {
            return Err(SimError::Simulation(format!(
                "amplitude buffer length {len} is not a power of two"
            )));
        }
        Ok(Self {
            amplitudes,
            num_qubits: len.trailing_zeros() as usize,
        })
    }

    /// Get the number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Dimension of the state space (2^n).
    #[inline]
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    /// The amplitude buffer.
    #[inline]
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Consume into the amplitude buffer.
    pub fn into_amplitudes(self) -> Vec<Complex64> {
        self.amplitudes
    }

    /// Mutable amplitude buffer, for in-crate kernel application.
    #[inline]
    pub(crate) fn amplitudes_mut(&mut self) -> &mut [Complex64] {
        &mut self.amplitudes
    }

    /// L2 norm of the state.
    pub fn norm(&self) -> f64 {
        self.amplitudes
            .iter()
            .map(Complex64::norm_sqr)
            .sum::<f64>()
            .sqrt()
    }

    /// Divide by the L2 norm to absorb floating-point drift. A zero-norm
    /// state is left untouched.
    pub fn renormalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for amp in &mut self.amplitudes {
                *amp /= norm;
            }
        }
    }

    /// Outcome probabilities: |amplitude|² per basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// Render a basis-state index as a bitstring, qubit 0 leftmost.
    pub fn bitstring(&self, outcome: usize) -> String {
        bitstring(outcome, self.num_qubits)
    }

    /// Apply a gate operation.
    ///
    /// Single-qubit gates fan out over each target; CX applies each
    /// zipped control/target pair (or the two-element-target spelling);
    /// MEASURE is a no-op for unitary evolution. Operand combinations the
    /// circuit layer should have rejected surface as
    /// [`SimError::Simulation`].
    pub fn apply_op(&mut self, op: &GateOp) -> SimResult<()> {
        for q in op.operands() {
            if q.index() >= self.num_qubits {
                return Err(SimError::Simulation(format!(
                    "operand {q} outside {}-qubit state",
                    self.num_qubits
                )));
            }
        }

        let amps = &mut self.amplitudes;
        match op.kind {
            GateKind::H => {
                for t in &op.targets {
                    kernels::h(amps, t.index());
                }
            }
            GateKind::X => {
                for t in &op.targets {
                    kernels::x(amps, t.index());
                }
            }
            GateKind::Y => {
                for t in &op.targets {
                    kernels::y(amps, t.index());
                }
            }
            GateKind::Z => {
                for t in &op.targets {
                    kernels::z(amps, t.index());
                }
            }
            GateKind::S => {
                for t in &op.targets {
                    kernels::phase(amps, t.index(), PI / 2.0);
                }
            }
            GateKind::T => {
                for t in &op.targets {
                    kernels::phase(amps, t.index(), PI / 4.0);
                }
            }
            GateKind::Rx => {
                let theta = op.theta();
                for t in &op.targets {
                    kernels::rx(amps, t.index(), theta);
                }
            }
            GateKind::Ry => {
                let theta = op.theta();
                for t in &op.targets {
                    kernels::ry(amps, t.index(), theta);
                }
            }
            GateKind::Rz => {
                let theta = op.theta();
                for t in &op.targets {
                    kernels::rz(amps, t.index(), theta);
                }
            }
            GateKind::Cx => {
                if !op.controls.is_empty() && op.controls.len() == op.targets.len() {
                    for (c, t) in op.controls.iter().zip(&op.targets) {
                        kernels::cx(amps, c.index(), t.index());
                    }
                } else if op.controls.is_empty() && op.targets.len() == 2 {
                    kernels::cx(amps, op.targets[0].index(), op.targets[1].index());
                } else {
                    return Err(SimError::Simulation(
                        "CX reached evolution with unmatched operands".into(),
                    ));
                }
            }
            GateKind::Ccx => {
                if op.controls.len() >= 2 && !op.targets.is_empty() {
                    kernels::ccx(
                        amps,
                        op.controls[0].index(),
                        op.controls[1].index(),
                        op.targets[0].index(),
                    );
                } else {
                    return Err(SimError::Simulation(
                        "CCX reached evolution with missing operands".into(),
                    ));
                }
            }
            GateKind::Measure => {}
        }
        Ok(())
    }
}

/// Render a basis-state index as a bitstring, qubit 0 leftmost.
pub fn bitstring(outcome: usize, num_qubits: usize) -> String {
    (0..num_qubits)
        .map(|k| if outcome & (1 << k) != 0 { '1' } else { '0' })
        .collect()
}

/// In-place gate kernels over a raw amplitude buffer.
///
/// Shared between pure-state evolution and the density-matrix engine
/// (which applies them to matrix rows and columns).
pub(crate) mod kernels {
    use num_complex::Complex64;

    pub fn x(amps: &mut [Complex64], qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..amps.len() {
            if i & mask == 0 {
                amps.swap(i, i | mask);
            }
        }
    }

    pub fn y(amps: &mut [Complex64], qubit: usize) {
        let mask = 1 << qubit;
        let i_val = Complex64::new(0.0, 1.0);
        for i in 0..amps.len() {
            if i & mask == 0 {
                let j = i | mask;
                let tmp = amps[i];
                amps[i] = -i_val * amps[j];
                amps[j] = i_val * tmp;
            }
        }
    }

    pub fn z(amps: &mut [Complex64], qubit: usize) {
        let mask = 1 << qubit;
        for (i, amp) in amps.iter_mut().enumerate() {
            if i & mask != 0 {
                *amp = -*amp;
            }
        }
    }

    pub fn h(amps: &mut [Complex64], qubit: usize) {
        let mask = 1 << qubit;
        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        for i in 0..amps.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = amps[i];
                let b = amps[j];
                amps[i] = sqrt2_inv * (a + b);
                amps[j] = sqrt2_inv * (a - b);
            }
        }
    }

    pub fn phase(amps: &mut [Complex64], qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let phase = Complex64::from_polar(1.0, theta);
        for (i, amp) in amps.iter_mut().enumerate() {
            if i & mask != 0 {
                *amp *= phase;
            }
        }
    }

    pub fn rx(amps: &mut [Complex64], qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let c = (theta / 2.0).cos();
        let neg_i_s = Complex64::new(0.0, -(theta / 2.0).sin());
        for i in 0..amps.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = amps[i];
                let b = amps[j];
                amps[i] = c * a + neg_i_s * b;
                amps[j] = neg_i_s * a + c * b;
            }
        }
    }

    pub fn ry(amps: &mut [Complex64], qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        for i in 0..amps.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = amps[i];
                let b = amps[j];
                amps[i] = c * a - s * b;
                amps[j] = s * a + c * b;
            }
        }
    }

    pub fn rz(amps: &mut [Complex64], qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let phase_0 = Complex64::from_polar(1.0, -theta / 2.0);
        let phase_1 = Complex64::from_polar(1.0, theta / 2.0);
        for (i, amp) in amps.iter_mut().enumerate() {
            if i & mask == 0 {
                *amp *= phase_0;
            } else {
                *amp *= phase_1;
            }
        }
    }

    pub fn cx(amps: &mut [Complex64], control: usize, target: usize) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        for i in 0..amps.len() {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                amps.swap(i, i | tgt_mask);
            }
        }
    }

    pub fn ccx(amps: &mut [Complex64], c1: usize, c2: usize, target: usize) {
        let c1_mask = 1 << c1;
        let c2_mask = 1 << c2;
        let tgt_mask = 1 << target;
        for i in 0..amps.len() {
            if (i & c1_mask != 0) && (i & c2_mask != 0) && (i & tgt_mask == 0) {
                amps.swap(i, i | tgt_mask);
            }
        }
    }
}
