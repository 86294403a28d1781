//! The engine facade: one request in, one structured result out.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use alsvid_eval::{analyze_entanglement, analyze_resources};
use alsvid_ir::{Circuit, CircuitDescription};
use alsvid_sim::{
    NoiseChannel, NoiseSpec, NoiseStrategy, evolve, evolve_density, evolve_trajectories,
    sample_counts_seeded,
};

use crate::config::SimulatorConfig;
use crate::error::EngineError;
use crate::output::{ComplexPair, SimulationOutput};

/// One simulation request: shot count plus an optional noise spec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRequest {
    /// Number of measurement shots (must be ≥ 1).
    #[serde(default = "default_shots")]
    pub shots: u64,
    /// Optional noise channel specification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noise: Option<NoiseSpec>,
}

fn default_shots() -> u64 {
    1024
}

impl Default for RunRequest {
    fn default() -> Self {
        Self {
            shots: default_shots(),
            noise: None,
        }
    }
}

impl RunRequest {
    /// A noiseless request with the given shot count.
    pub fn shots(shots: u64) -> Self {
        Self {
            shots,
            noise: None,
        }
    }

    /// Attach a noise spec.
    #[must_use]
    pub fn with_noise(mut self, noise: NoiseSpec) -> Self {
        self.noise = Some(noise);
        self
    }
}

/// The simulation engine.
///
/// Each call to [`Simulator::run`] is one synchronous unit of work over
/// caller-owned inputs; the simulator itself holds only configuration,
/// so one instance can serve concurrent requests freely.
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    config: SimulatorConfig,
}

impl Simulator {
    /// Create a simulator with the given configuration.
    pub fn new(config: SimulatorConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Run one simulation request.
    ///
    /// Evolves the described circuit from |0...0⟩ (optionally under
    /// noise), samples `shots` measurement outcomes, and derives the
    /// resource and entanglement reports. Construction-time errors abort
    /// the request; entanglement analysis degrades to null fields rather
    /// than failing a run that produced valid counts.
    #[instrument(skip(self, description, request))]
    pub fn run(
        &self,
        description: &CircuitDescription,
        request: &RunRequest,
    ) -> Result<SimulationOutput, EngineError> {
        if request.shots == 0 {
            return Err(EngineError::Schema("shots must be at least 1".into()));
        }

        let circuit = Circuit::from_description(description)?;
        if circuit.num_qubits() > self.config.max_qubits {
            return Err(EngineError::CircuitTooLarge {
                num_qubits: circuit.num_qubits(),
                max_qubits: self.config.max_qubits,
            });
        }

        let channel = match &request.noise {
            Some(spec) => NoiseChannel::from_spec(spec, self.config.strict_noise)?,
            None => None,
        };

        debug!(
            num_qubits = circuit.num_qubits(),
            ops = circuit.len(),
            shots = request.shots,
            noisy = channel.is_some(),
            "running simulation"
        );

        let (amplitudes, probabilities) = match channel {
            None => {
                let sv = evolve(&circuit)?;
                let probs = sv.probabilities();
                (sv.into_amplitudes(), probs)
            }
            Some(ch) => match self.config.noise_strategy {
                NoiseStrategy::Trajectory => {
                    let outcome =
                        evolve_trajectories(&circuit, &ch, request.shots, self.config.seed)?;
                    (outcome.statevector.into_amplitudes(), outcome.probabilities)
                }
                NoiseStrategy::DensityMatrix => {
                    let rho = evolve_density(&circuit, Some(&ch))?;
                    let probs = rho.probabilities();
                    (rho.principal_statevector()?.into_amplitudes(), probs)
                }
            },
        };

        let measured =
            sample_counts_seeded(&probabilities, &circuit, request.shots, self.config.seed)?;
        let resources = analyze_resources(&circuit);
        let entanglement = analyze_entanglement(&amplitudes, circuit.num_qubits());

        Ok(SimulationOutput {
            counts: measured.counts,
            probabilities: measured.probabilities,
            statevector: amplitudes.into_iter().map(ComplexPair::from).collect(),
            resources,
            entanglement,
        })
    }
}

/// Run one request on a default-configured engine.
pub fn simulate(
    description: &CircuitDescription,
    request: &RunRequest,
) -> Result<SimulationOutput, EngineError> {
    Simulator::default().run(description, request)
}
