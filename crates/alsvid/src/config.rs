//! Simulator configuration.

use alsvid_sim::NoiseStrategy;
use serde::{Deserialize, Serialize};

/// Engine configuration with documented defaults.
///
/// Replaces runtime capability probing with explicit switches: callers
/// opt into strictness and strategy up front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Largest register the engine will allocate. Default 20 — a dense
    /// statevector at 20 qubits is ~16 MB; beyond that callers should
    /// bound requests externally.
    pub max_qubits: u32,
    /// How noisy runs are realized. Default [`NoiseStrategy::Trajectory`].
    pub noise_strategy: NoiseStrategy,
    /// Reject unrecognized noise modes instead of warning and running
    /// noiseless. Default `false`.
    pub strict_noise: bool,
    /// Base RNG seed for trajectories and shot sampling. `None` (the
    /// default) draws from entropy; setting it makes runs reproducible.
    pub seed: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            max_qubits: 20,
            noise_strategy: NoiseStrategy::default(),
            strict_noise: false,
            seed: None,
        }
    }
}

impl SimulatorConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the qubit bound.
    #[must_use]
    pub fn with_max_qubits(mut self, max_qubits: u32) -> Self {
        self.max_qubits = max_qubits;
        self
    }

    /// Select the noise strategy.
    #[must_use]
    pub fn with_noise_strategy(mut self, strategy: NoiseStrategy) -> Self {
        self.noise_strategy = strategy;
        self
    }

    /// Toggle strict noise-mode validation.
    #[must_use]
    pub fn with_strict_noise(mut self, strict: bool) -> Self {
        self.strict_noise = strict;
        self
    }

    /// Fix the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
