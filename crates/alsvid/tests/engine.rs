//! End-to-end tests for the simulation engine facade.

use std::collections::BTreeMap;

use alsvid::{
    EngineError, ErrorPayload, NoiseSpec, NoiseStrategy, RunRequest, Simulator, SimulatorConfig,
    simulate,
};
use alsvid_ir::{Circuit, CircuitDescription, GateOpDescription};

fn bell_description() -> CircuitDescription {
    Circuit::bell().unwrap().to_description()
}

fn gate(name: &str, targets: &[u32], controls: &[u32]) -> GateOpDescription {
    GateOpDescription {
        name: name.into(),
        targets: targets.to_vec(),
        controls: controls.to_vec(),
        params: BTreeMap::new(),
    }
}

// ---------------------------------------------------------------------------
// Happy path
// ---------------------------------------------------------------------------

#[test]
fn bell_pair_end_to_end() {
    let simulator = Simulator::new(SimulatorConfig::new().with_seed(42));
    let output = simulator
        .run(&bell_description(), &RunRequest::shots(1024))
        .unwrap();

    // Only the correlated outcomes occur, split ~50/50.
    let zz = output.counts.get("00").copied().unwrap_or(0);
    let oo = output.counts.get("11").copied().unwrap_or(0);
    assert_eq!(zz + oo, 1024);
    assert!(zz.abs_diff(oo) < 160, "split {zz}/{oo} too skewed");

    // Statevector: (|00⟩ + |11⟩)/√2.
    let r = std::f64::consts::FRAC_1_SQRT_2;
    assert!((output.statevector[0].real - r).abs() < 1e-9);
    assert!((output.statevector[3].real - r).abs() < 1e-9);
    assert!(output.statevector[1].real.abs() < 1e-9);

    // Entanglement: one bit across the cut, recognized as phi_plus.
    assert!((output.entanglement.entropy.unwrap() - 1.0).abs() < 1e-9);
    assert!((output.entanglement.fidelity.unwrap() - 1.0).abs() < 1e-9);
    assert_eq!(output.entanglement.bell_state.as_deref(), Some("phi_plus"));
    let schmidt = &output.entanglement.schmidt;
    assert!(schmidt.iter().all(|s| (s - r).abs() < 1e-9));

    // Resources: H, CX, MEASURE chained on qubit 0.
    assert_eq!(output.resources.depth, 3);
    assert_eq!(output.resources.width, 2);
    assert_eq!(output.resources.gate_counts.get("H"), Some(&1));
    assert_eq!(output.resources.gate_counts.get("CX"), Some(&1));
}

#[test]
fn probabilities_derive_from_counts() {
    let output = simulate(&bell_description(), &RunRequest::shots(512)).unwrap();
    for (key, &count) in &output.counts {
        let p = output.probabilities[key];
        assert!((p - count as f64 / 512.0).abs() < 1e-12);
    }
}

#[test]
fn final_state_is_unit_norm() {
    let mut rx = gate("RX", &[0], &[]);
    rx.params.insert("theta".into(), 0.7);

    let desc = CircuitDescription {
        num_qubits: 3,
        gates: vec![gate("h", &[0, 1, 2], &[]), gate("ccx", &[2], &[0, 1]), rx],
        ..Default::default()
    };

    let output = simulate(&desc, &RunRequest::shots(64)).unwrap();
    let norm_sq: f64 = output
        .statevector
        .iter()
        .map(|p| p.real * p.real + p.imag * p.imag)
        .sum();
    assert!((norm_sq - 1.0).abs() < 1e-9);
}

// ---------------------------------------------------------------------------
// Validation failures
// ---------------------------------------------------------------------------

#[test]
fn cx_with_one_target_is_gate_arity_error() {
    let desc = CircuitDescription {
        num_qubits: 2,
        gates: vec![gate("CX", &[0], &[])],
        ..Default::default()
    };
    let err = simulate(&desc, &RunRequest::shots(16)).unwrap_err();
    let payload = ErrorPayload::from(&err);
    assert_eq!(payload.kind, "gate_arity_error");
}

#[test]
fn unknown_gate_name_rejected() {
    let desc = CircuitDescription {
        num_qubits: 1,
        gates: vec![gate("SWAP", &[0], &[])],
        ..Default::default()
    };
    let err = simulate(&desc, &RunRequest::shots(16)).unwrap_err();
    assert_eq!(ErrorPayload::from(&err).kind, "unsupported_gate_error");
}

#[test]
fn out_of_range_operand_rejected() {
    let desc = CircuitDescription {
        num_qubits: 2,
        gates: vec![gate("H", &[5], &[])],
        ..Default::default()
    };
    let err = simulate(&desc, &RunRequest::shots(16)).unwrap_err();
    assert_eq!(ErrorPayload::from(&err).kind, "qubit_range_error");
}

#[test]
fn zero_shots_is_schema_error() {
    let err = simulate(&bell_description(), &RunRequest::shots(0)).unwrap_err();
    assert!(matches!(err, EngineError::Schema(_)));
}

#[test]
fn zero_qubits_is_schema_error() {
    let desc = CircuitDescription::default();
    let err = simulate(&desc, &RunRequest::shots(16)).unwrap_err();
    assert_eq!(ErrorPayload::from(&err).kind, "schema_error");
}

#[test]
fn qubit_bound_enforced_before_allocation() {
    let simulator = Simulator::new(SimulatorConfig::new().with_max_qubits(4));
    let desc = CircuitDescription {
        num_qubits: 10,
        ..Default::default()
    };
    let err = simulator.run(&desc, &RunRequest::shots(16)).unwrap_err();
    assert!(matches!(err, EngineError::CircuitTooLarge { .. }));
    assert_eq!(ErrorPayload::from(&err).kind, "circuit_too_large");
}

// ---------------------------------------------------------------------------
// Noise handling
// ---------------------------------------------------------------------------

#[test]
fn unknown_noise_mode_degrades_by_default() {
    let simulator = Simulator::new(SimulatorConfig::new().with_seed(11));
    let noiseless = simulator
        .run(&bell_description(), &RunRequest::shots(256))
        .unwrap();
    let degraded = simulator
        .run(
            &bell_description(),
            &RunRequest::shots(256).with_noise(NoiseSpec {
                mode: "amplitude_damping".into(),
                p: 0.1,
            }),
        )
        .unwrap();
    assert_eq!(noiseless.counts, degraded.counts);
}

#[test]
fn unknown_noise_mode_errors_when_strict() {
    let simulator = Simulator::new(SimulatorConfig::new().with_strict_noise(true));
    let err = simulator
        .run(
            &bell_description(),
            &RunRequest::shots(256).with_noise(NoiseSpec {
                mode: "amplitude_damping".into(),
                p: 0.1,
            }),
        )
        .unwrap_err();
    assert_eq!(ErrorPayload::from(&err).kind, "unknown_noise_mode");
}

#[test]
fn depolarizing_p_zero_matches_noiseless() {
    let simulator = Simulator::new(SimulatorConfig::new().with_seed(23));
    let noiseless = simulator
        .run(&bell_description(), &RunRequest::shots(512))
        .unwrap();
    let zero_noise = simulator
        .run(
            &bell_description(),
            &RunRequest::shots(512).with_noise(NoiseSpec {
                mode: "depolarizing".into(),
                p: 0.0,
            }),
        )
        .unwrap();
    // Same seed, identical outcome distribution → identical counts.
    assert_eq!(noiseless.counts, zero_noise.counts);
}

#[test]
fn density_strategy_bell_outcomes() {
    let simulator = Simulator::new(
        SimulatorConfig::new()
            .with_noise_strategy(NoiseStrategy::DensityMatrix)
            .with_seed(31),
    );
    let output = simulator
        .run(
            &bell_description(),
            &RunRequest::shots(512).with_noise(NoiseSpec {
                mode: "depolarizing".into(),
                p: 0.0,
            }),
        )
        .unwrap();
    let zz = output.counts.get("00").copied().unwrap_or(0);
    let oo = output.counts.get("11").copied().unwrap_or(0);
    assert_eq!(zz + oo, 512);
    assert!((output.entanglement.entropy.unwrap() - 1.0).abs() < 1e-6);
}

#[test]
fn depolarizing_noise_spreads_outcomes() {
    let simulator = Simulator::new(
        SimulatorConfig::new()
            .with_noise_strategy(NoiseStrategy::DensityMatrix)
            .with_seed(13),
    );
    // X(0): noiseless reads "1" always; heavy depolarizing leaks "0".
    let desc = CircuitDescription {
        num_qubits: 1,
        gates: vec![gate("x", &[0], &[])],
        ..Default::default()
    };
    let output = simulator
        .run(
            &desc,
            &RunRequest::shots(2048).with_noise(NoiseSpec {
                mode: "depolarizing".into(),
                p: 0.9,
            }),
        )
        .unwrap();
    let zeros = output.counts.get("0").copied().unwrap_or(0);
    assert!(zeros > 0, "p=0.9 depolarizing produced no flipped outcomes");
}

#[test]
fn invalid_noise_probability_rejected() {
    let err = simulate(
        &bell_description(),
        &RunRequest::shots(64).with_noise(NoiseSpec {
            mode: "bitflip".into(),
            p: 1.5,
        }),
    )
    .unwrap_err();
    assert_eq!(ErrorPayload::from(&err).kind, "invalid_probability");
}

// ---------------------------------------------------------------------------
// Reproducibility & serialization
// ---------------------------------------------------------------------------

#[test]
fn seeded_runs_reproducible() {
    let simulator = Simulator::new(SimulatorConfig::new().with_seed(99));
    let request = RunRequest::shots(512).with_noise(NoiseSpec {
        mode: "depolarizing".into(),
        p: 0.2,
    });
    let a = simulator.run(&bell_description(), &request).unwrap();
    let b = simulator.run(&bell_description(), &request).unwrap();
    assert_eq!(a.counts, b.counts);
    assert_eq!(a.statevector, b.statevector);
}

#[test]
fn output_serializes_with_complex_pairs() {
    let output = simulate(&bell_description(), &RunRequest::shots(32)).unwrap();
    let json = serde_json::to_value(&output).unwrap();
    assert!(json["statevector"][0]["real"].is_f64());
    assert!(json["statevector"][0]["imag"].is_f64());
    assert!(json["counts"].is_object());
    assert!(json["entanglement"]["entropy"].is_f64());
}

#[test]
fn request_deserializes_with_defaults() {
    let request: RunRequest = serde_json::from_str("{}").unwrap();
    assert_eq!(request.shots, 1024);
    assert!(request.noise.is_none());

    let request: RunRequest =
        serde_json::from_str(r#"{"shots": 64, "noise": {"mode": "bitflip", "p": 0.01}}"#).unwrap();
    assert_eq!(request.shots, 64);
    assert_eq!(request.noise.unwrap().mode, "bitflip");
}
