//! `alsvid-sim` — statevector evolution, noise channels, and sampling.
//!
//! The computational core of Alsvid: it takes a validated
//! `alsvid_ir::Circuit` and produces final states and measurement
//! statistics.
//!
//! - [`evolve`] — noiseless unitary evolution to a pure [`Statevector`]
//! - [`evolve_trajectories`] — stochastic noise via trajectory sampling
//!   (amplitude-averaged state, ensemble-mean probabilities)
//! - [`evolve_density`] — exact density-matrix evolution with Kraus
//!   mixtures ([`DensityMatrix`])
//! - [`sample_counts`] — categorical shot sampling into bitstring counts
//!
//! Memory is 2^n amplitudes (4^n for the density matrix), which limits
//! practical use to modest registers (~20 qubits pure, ~10 mixed).
//!
//! # Quick start
//!
//! ```rust
//! use alsvid_ir::Circuit;
//! use alsvid_sim::{evolve, sample_counts_seeded};
//!
//! let circuit = Circuit::bell().unwrap();
//! let state = evolve(&circuit).unwrap();
//! let outcome = sample_counts_seeded(&state.probabilities(), &circuit, 1024, Some(42)).unwrap();
//!
//! // Bell pair: only "00" and "11" ever occur.
//! assert_eq!(outcome.counts.values().sum::<u64>(), 1024);
//! ```

pub mod density;
pub mod error;
pub mod evolve;
pub mod noise;
pub mod sampler;
pub mod statevector;

pub use density::{DensityMatrix, evolve_density};
pub use error::{SimError, SimResult};
pub use evolve::evolve;
pub use noise::{NoiseChannel, NoiseSpec, NoiseStrategy, NoisyOutcome, evolve_trajectories};
pub use sampler::{MeasurementOutcome, sample_counts, sample_counts_seeded};
pub use statevector::{Statevector, bitstring};
