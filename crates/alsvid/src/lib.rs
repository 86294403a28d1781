//! Alsvid — a dense statevector quantum circuit simulation engine.
//!
//! Alsvid takes a structural circuit description (qubit count, ordered
//! gate list), evolves a complex state vector under it, and returns
//! measurement statistics plus resource and entanglement diagnostics in
//! one serializable payload. Noise is optional and comes in two
//! interchangeable realizations: trajectory sampling (default) and exact
//! density-matrix evolution.
//!
//! The engine is a pure interface: no HTTP layer, no text-format
//! parsing, no process telemetry. Those collaborators consume
//! [`CircuitDescription`] / [`SimulationOutput`] and live elsewhere.
//!
//! # Capacity
//!
//! | Qubits | Statevector | Density matrix |
//! |--------|-------------|----------------|
//! | 10 | ~16 KB | ~16 MB |
//! | 15 | ~512 KB | not recommended |
//! | 20 | ~16 MB | not recommended |
//!
//! # Example
//!
//! ```rust
//! use alsvid::{RunRequest, Simulator, SimulatorConfig};
//! use alsvid_ir::Circuit;
//!
//! let description = Circuit::bell().unwrap().to_description();
//! let simulator = Simulator::new(SimulatorConfig::new().with_seed(42));
//! let output = simulator.run(&description, &RunRequest::shots(1024)).unwrap();
//!
//! // A Bell pair only ever reads "00" or "11".
//! assert_eq!(output.counts.values().sum::<u64>(), 1024);
//! assert!((output.entanglement.entropy.unwrap() - 1.0).abs() < 1e-9);
//! assert_eq!(output.entanglement.bell_state.as_deref(), Some("phi_plus"));
//! ```

pub mod config;
pub mod error;
pub mod output;
pub mod simulator;

pub use config::SimulatorConfig;
pub use error::EngineError;
pub use output::{ComplexPair, ErrorPayload, SimulationOutput};
pub use simulator::{RunRequest, Simulator, simulate};

// The wire types callers need alongside the engine API.
pub use alsvid_ir::{Circuit, CircuitDescription, GateOpDescription};
pub use alsvid_sim::{NoiseSpec, NoiseStrategy};
