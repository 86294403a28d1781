//! Property-based tests for unitary evolution.
//!
//! Any valid circuit must leave the final state at unit norm within
//! floating tolerance.

use alsvid_ir::{Circuit, QubitId};
use alsvid_sim::evolve;
use proptest::prelude::*;
use std::f64::consts::PI;

/// Gate operations that can be applied to a circuit.
#[derive(Debug, Clone)]
enum Op {
    H(u32),
    X(u32),
    Y(u32),
    Z(u32),
    S(u32),
    T(u32),
    Rx(u32, f64),
    Ry(u32, f64),
    Rz(u32, f64),
    Cx(u32, u32),
}

impl Op {
    fn apply(&self, circuit: &mut Circuit) {
        let _ = match *self {
            Op::H(q) => circuit.h(QubitId(q)),
            Op::X(q) => circuit.x(QubitId(q)),
            Op::Y(q) => circuit.y(QubitId(q)),
            Op::Z(q) => circuit.z(QubitId(q)),
            Op::S(q) => circuit.s(QubitId(q)),
            Op::T(q) => circuit.t(QubitId(q)),
            Op::Rx(q, t) => circuit.rx(t, QubitId(q)),
            Op::Ry(q, t) => circuit.ry(t, QubitId(q)),
            Op::Rz(q, t) => circuit.rz(t, QubitId(q)),
            Op::Cx(c, t) => {
                if c == t {
                    return;
                }
                circuit.cx(QubitId(c), QubitId(t))
            }
        };
    }
}

fn arb_op(num_qubits: u32) -> impl Strategy<Value = Op> {
    let q = 0..num_qubits;
    let angle = -2.0 * PI..2.0 * PI;
    if num_qubits < 2 {
        prop_oneof![
            q.clone().prop_map(Op::H),
            q.clone().prop_map(Op::X),
            q.clone().prop_map(Op::Y),
            q.clone().prop_map(Op::Z),
            q.clone().prop_map(Op::S),
            q.clone().prop_map(Op::T),
            (q.clone(), angle.clone()).prop_map(|(q, t)| Op::Rx(q, t)),
            (q.clone(), angle.clone()).prop_map(|(q, t)| Op::Ry(q, t)),
            (q, angle).prop_map(|(q, t)| Op::Rz(q, t)),
        ]
        .boxed()
    } else {
        prop_oneof![
            q.clone().prop_map(Op::H),
            q.clone().prop_map(Op::X),
            q.clone().prop_map(Op::Y),
            q.clone().prop_map(Op::Z),
            q.clone().prop_map(Op::S),
            q.clone().prop_map(Op::T),
            (q.clone(), angle.clone()).prop_map(|(q, t)| Op::Rx(q, t)),
            (q.clone(), angle.clone()).prop_map(|(q, t)| Op::Ry(q, t)),
            (q.clone(), angle).prop_map(|(q, t)| Op::Rz(q, t)),
            (q.clone(), q).prop_map(|(c, t)| Op::Cx(c, t)),
        ]
        .boxed()
    }
}

fn arb_circuit() -> impl Strategy<Value = Circuit> {
    (1u32..=5).prop_flat_map(|num_qubits| {
        prop::collection::vec(arb_op(num_qubits), 0..=20).prop_map(move |ops| {
            let mut circuit = Circuit::new(num_qubits).unwrap();
            for op in &ops {
                op.apply(&mut circuit);
            }
            circuit
        })
    })
}

proptest! {
    #[test]
    fn evolution_preserves_unit_norm(circuit in arb_circuit()) {
        let sv = evolve(&circuit).unwrap();
        let norm_sq: f64 = sv.probabilities().iter().sum();
        prop_assert!((norm_sq - 1.0).abs() < 1e-9);
    }

    #[test]
    fn probabilities_are_nonnegative(circuit in arb_circuit()) {
        let sv = evolve(&circuit).unwrap();
        prop_assert!(sv.probabilities().iter().all(|&p| p >= 0.0));
    }
}
