//! Circuit resource metrics.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use alsvid_ir::Circuit;

/// Structural complexity metrics for a circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceReport {
    /// Longest dependency chain through the gate sequence.
    pub depth: usize,
    /// Number of qubits.
    pub width: u32,
    /// Occurrences per canonical gate name (MEASURE included).
    pub gate_counts: BTreeMap<String, u64>,
    /// Unique gate tags / total gate count, in (0, 1]; 1.0 for an empty
    /// circuit.
    pub efficiency: f64,
    /// Width / depth; 1.0 for an empty circuit.
    pub parallelization: f64,
}

/// Compute resource metrics for a circuit.
pub fn analyze_resources(circuit: &Circuit) -> ResourceReport {
    let depth = circuit.depth();
    let width = circuit.num_qubits();

    let mut gate_counts: BTreeMap<String, u64> = BTreeMap::new();
    for op in circuit.ops() {
        *gate_counts.entry(op.name().to_string()).or_insert(0) += 1;
    }

    let total: u64 = gate_counts.values().sum();
    let efficiency = if total == 0 {
        1.0
    } else {
        gate_counts.len() as f64 / total as f64
    };
    let parallelization = if depth == 0 {
        1.0
    } else {
        f64::from(width) / depth as f64
    };

    ResourceReport {
        depth,
        width,
        gate_counts,
        efficiency,
        parallelization,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alsvid_ir::QubitId;

    #[test]
    fn test_gate_histogram_three_h_one_cx() {
        let mut circuit = Circuit::new(3).unwrap();
        circuit
            .h(QubitId(0))
            .unwrap()
            .h(QubitId(1))
            .unwrap()
            .h(QubitId(2))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap();

        let report = analyze_resources(&circuit);
        assert_eq!(report.gate_counts.get("H"), Some(&3));
        assert_eq!(report.gate_counts.get("CX"), Some(&1));
        assert_eq!(report.width, 3);
        // H(0) → CX, or H(1) → CX: both chains have length 2.
        assert_eq!(report.depth, 2);
        assert!((report.efficiency - 2.0 / 4.0).abs() < 1e-12);
        assert!((report.parallelization - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty_circuit_defaults() {
        let circuit = Circuit::new(4).unwrap();
        let report = analyze_resources(&circuit);
        assert_eq!(report.depth, 0);
        assert_eq!(report.width, 4);
        assert!(report.gate_counts.is_empty());
        assert_eq!(report.efficiency, 1.0);
        assert_eq!(report.parallelization, 1.0);
    }

    #[test]
    fn test_measure_counted() {
        let circuit = Circuit::bell().unwrap();
        let report = analyze_resources(&circuit);
        assert_eq!(report.gate_counts.get("MEASURE"), Some(&1));
        assert_eq!(report.depth, 3);
    }
}
