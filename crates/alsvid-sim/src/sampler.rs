//! Shot sampling over outcome probability distributions.

use rand::Rng;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;
use tracing::debug;

use alsvid_ir::Circuit;

use crate::error::{SimError, SimResult};
use crate::statevector::bitstring;

/// Aggregated measurement statistics for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementOutcome {
    /// Bitstring → shot count; counts sum to `shots`.
    pub counts: BTreeMap<String, u64>,
    /// Bitstring → empirical probability (count / shots).
    pub probabilities: BTreeMap<String, f64>,
    /// Total shots drawn.
    pub shots: u64,
}

/// Draw `shots` outcomes from a categorical distribution and aggregate
/// them under the circuit's readout bindings.
///
/// Each MEASURE op binds target qubit t to classical bit t; qubits with
/// no binding read 0 in every bitstring. A circuit without any MEASURE
/// implicitly reads out every qubit. Sampling walks a precomputed CDF per
/// draw.
pub fn sample_counts<R: Rng>(
    probabilities: &[f64],
    circuit: &Circuit,
    shots: u64,
    rng: &mut R,
) -> SimResult<MeasurementOutcome> {
    if shots == 0 {
        return Err(SimError::Simulation("shot count must be at least 1".into()));
    }
    let num_qubits = circuit.num_qubits() as usize;
    if probabilities.len() != 1usize << num_qubits {
        return Err(SimError::Simulation(format!(
            "probability table has {} entries for a {}-qubit circuit",
            probabilities.len(),
            num_qubits
        )));
    }

    let mask = circuit.readout_mask();
    let read_mask: usize = mask
        .iter()
        .enumerate()
        .filter(|&(_, &m)| m)
        .map(|(k, _)| 1usize << k)
        .sum();

    // CDF over basis states; the final entry absorbs rounding drift.
    let mut cdf = Vec::with_capacity(probabilities.len());
    let mut acc = 0.0;
    for &p in probabilities {
        acc += p;
        cdf.push(acc);
    }

    debug!(shots, outcomes = probabilities.len(), "sampling measurement shots");

    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for _ in 0..shots {
        let r: f64 = rng.r#gen::<f64>() * acc;
        let outcome = cdf.partition_point(|&c| c <= r).min(cdf.len() - 1);
        let key = bitstring(outcome & read_mask, num_qubits);
        *counts.entry(key).or_insert(0) += 1;
    }

    let probabilities = counts
        .iter()
        .map(|(k, &v)| (k.clone(), v as f64 / shots as f64))
        .collect();

    Ok(MeasurementOutcome {
        counts,
        probabilities,
        shots,
    })
}

/// Sample with a fresh RNG: seeded when a seed is given, from entropy
/// otherwise.
pub fn sample_counts_seeded(
    probabilities: &[f64],
    circuit: &Circuit,
    shots: u64,
    seed: Option<u64>,
) -> SimResult<MeasurementOutcome> {
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    sample_counts(probabilities, circuit, shots, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evolve::evolve;
    use alsvid_ir::QubitId;

    #[test]
    fn test_deterministic_state_samples_one_outcome() {
        let mut circuit = Circuit::new(1).unwrap();
        circuit.x(QubitId(0)).unwrap();
        let sv = evolve(&circuit).unwrap();

        let outcome = sample_counts_seeded(&sv.probabilities(), &circuit, 100, Some(1)).unwrap();
        assert_eq!(outcome.counts.get("1"), Some(&100));
        assert_eq!(outcome.probabilities.get("1"), Some(&1.0));
    }

    #[test]
    fn test_counts_sum_to_shots() {
        let circuit = Circuit::bell().unwrap();
        let sv = evolve(&circuit).unwrap();
        let outcome = sample_counts_seeded(&sv.probabilities(), &circuit, 1024, Some(9)).unwrap();
        assert_eq!(outcome.counts.values().sum::<u64>(), 1024);
        assert_eq!(outcome.shots, 1024);
    }

    #[test]
    fn test_bell_outcomes_only_00_and_11() {
        let circuit = Circuit::bell().unwrap();
        let sv = evolve(&circuit).unwrap();
        let outcome = sample_counts_seeded(&sv.probabilities(), &circuit, 1024, Some(5)).unwrap();

        let zz = outcome.counts.get("00").copied().unwrap_or(0);
        let oo = outcome.counts.get("11").copied().unwrap_or(0);
        assert_eq!(zz + oo, 1024);
        // ~50/50 split; 5σ ≈ 80 for 1024 fair draws.
        assert!(zz.abs_diff(oo) < 160, "split {zz}/{oo} too skewed");
    }

    #[test]
    fn test_partial_readout_masks_unmeasured_qubits() {
        // Entangle, then read out only qubit 1: qubit 0's bit stays 0.
        let mut circuit = Circuit::new(2).unwrap();
        circuit
            .h(QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .measure(QubitId(1))
            .unwrap();
        let sv = evolve(&circuit).unwrap();
        let outcome = sample_counts_seeded(&sv.probabilities(), &circuit, 256, Some(2)).unwrap();

        for key in outcome.counts.keys() {
            assert!(key == "00" || key == "01", "unexpected key {key}");
        }
    }

    #[test]
    fn test_zero_shots_rejected() {
        let circuit = Circuit::new(1).unwrap();
        let err = sample_counts_seeded(&[1.0, 0.0], &circuit, 0, None).unwrap_err();
        assert!(matches!(err, SimError::Simulation(_)));
    }

    #[test]
    fn test_seeded_sampling_reproducible() {
        let circuit = Circuit::bell().unwrap();
        let sv = evolve(&circuit).unwrap();
        let a = sample_counts_seeded(&sv.probabilities(), &circuit, 512, Some(77)).unwrap();
        let b = sample_counts_seeded(&sv.probabilities(), &circuit, 512, Some(77)).unwrap();
        assert_eq!(a.counts, b.counts);
    }
}
