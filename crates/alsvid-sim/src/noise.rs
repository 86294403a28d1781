//! Stochastic noise channels and trajectory evolution.
//!
//! Noise is a refinement of the ideal evolution, never a required input:
//! an unrecognized mode degrades to a noiseless run (with a warning)
//! unless strict mode is configured.

use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use alsvid_ir::Circuit;

use crate::error::{SimError, SimResult};
use crate::statevector::{Statevector, kernels};

/// Wire-format noise specification: `{mode, p}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseSpec {
    /// Channel mode: `none`, `depolarizing`, or `bitflip`.
    #[serde(default = "default_mode")]
    pub mode: String,
    /// Error probability in [0, 1].
    #[serde(default)]
    pub p: f64,
}

fn default_mode() -> String {
    "none".to_string()
}

/// How a noisy run is realized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseStrategy {
    /// Sample whole-circuit trajectories and average amplitudes. This is
    /// a heuristic approximation of the mixed state (cross terms are
    /// lost), kept deliberately; outcome probabilities are the faithful
    /// ensemble mean.
    #[default]
    Trajectory,
    /// Evolve the density matrix exactly with Kraus mixtures.
    DensityMatrix,
}

/// A parsed noise channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoiseChannel {
    /// With probability `p`, replace the qubit's local state with the
    /// maximally mixed state (uniform random Pauli, p/3 each).
    Depolarizing {
        /// Error probability.
        p: f64,
    },
    /// Apply X with probability `p`, identity otherwise.
    BitFlip {
        /// Flip probability.
        p: f64,
    },
}

impl NoiseChannel {
    /// Parse a wire-format spec into a channel.
    ///
    /// Returns `None` for mode `none`. An unrecognized mode is a
    /// [`SimError::UnknownNoiseMode`] under `strict`, and otherwise logs
    /// a warning and degrades to `None`.
    pub fn from_spec(spec: &NoiseSpec, strict: bool) -> SimResult<Option<NoiseChannel>> {
        let channel = match spec.mode.to_ascii_lowercase().as_str() {
            "" | "none" => return Ok(None),
            "depolarizing" => NoiseChannel::Depolarizing {
                p: checked_probability(spec.p)?,
            },
            "bitflip" => NoiseChannel::BitFlip {
                p: checked_probability(spec.p)?,
            },
            _ => {
                if strict {
                    return Err(SimError::UnknownNoiseMode(spec.mode.clone()));
                }
                warn!(mode = %spec.mode, "unrecognized noise mode, running noiseless");
                return Ok(None);
            }
        };
        Ok(Some(channel))
    }

    /// Channel name for logs and reports.
    pub fn name(&self) -> &'static str {
        match self {
            NoiseChannel::Depolarizing { .. } => "depolarizing",
            NoiseChannel::BitFlip { .. } => "bitflip",
        }
    }

    /// Error probability of the channel.
    pub fn p(&self) -> f64 {
        match self {
            NoiseChannel::Depolarizing { p } | NoiseChannel::BitFlip { p } => *p,
        }
    }

    /// Draw one per-qubit error event: `None` means the no-error branch.
    fn sample_error<R: Rng>(&self, rng: &mut R) -> Option<Pauli> {
        match *self {
            NoiseChannel::Depolarizing { p } => {
                if rng.r#gen::<f64>() < p {
                    Some(match rng.gen_range(0..3u8) {
                        0 => Pauli::X,
                        1 => Pauli::Y,
                        _ => Pauli::Z,
                    })
                } else {
                    None
                }
            }
            NoiseChannel::BitFlip { p } => {
                if rng.r#gen::<f64>() < p {
                    Some(Pauli::X)
                } else {
                    None
                }
            }
        }
    }
}

fn checked_probability(p: f64) -> SimResult<f64> {
    if !(0.0..=1.0).contains(&p) || !p.is_finite() {
        return Err(SimError::InvalidProbability(p));
    }
    Ok(p)
}

/// A sampled Pauli error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pauli {
    X,
    Y,
    Z,
}

impl Pauli {
    pub(crate) fn apply(self, amps: &mut [Complex64], qubit: usize) {
        match self {
            Pauli::X => kernels::x(amps, qubit),
            Pauli::Y => kernels::y(amps, qubit),
            Pauli::Z => kernels::z(amps, qubit),
        }
    }
}

/// Result of a noisy evolution, for sampling and analysis.
#[derive(Debug, Clone)]
pub struct NoisyOutcome {
    /// The reported noisy state. In trajectory mode this is the
    /// renormalized amplitude-wise mean across trajectories — an
    /// approximation, not a faithful mixed-state descriptor.
    pub statevector: Statevector,
    /// Outcome probabilities: the ensemble mean of per-trajectory
    /// |amplitude|² (exact diagonal in density-matrix mode).
    pub probabilities: Vec<f64>,
}

/// Trajectories summed per parallel work item. Chunk boundaries are
/// fixed by index, not thread scheduling, so the final reduction order
/// is deterministic and seeded runs reproduce bit-for-bit.
const TRAJECTORY_CHUNK: u64 = 64;

/// Evolve a circuit under a noise channel by trajectory sampling.
///
/// Each trajectory runs the full circuit, independently drawing an error
/// event on every operand qubit of every gate. Trajectories are
/// independent and run in parallel; a seeded run derives one RNG per
/// trajectory from the base seed, so results are reproducible regardless
/// of thread scheduling.
pub fn evolve_trajectories(
    circuit: &Circuit,
    channel: &NoiseChannel,
    trajectories: u64,
    seed: Option<u64>,
) -> SimResult<NoisyOutcome> {
    if trajectories == 0 {
        return Err(SimError::Simulation(
            "trajectory count must be at least 1".into(),
        ));
    }

    let dim = 1usize << circuit.num_qubits();
    debug!(
        channel = channel.name(),
        p = channel.p(),
        trajectories,
        "sampling noise trajectories"
    );

    let chunks = trajectories.div_ceil(TRAJECTORY_CHUNK);
    let partials: Vec<(Vec<Complex64>, Vec<f64>)> = (0..chunks)
        .into_par_iter()
        .map(|chunk| {
            let lo = chunk * TRAJECTORY_CHUNK;
            let hi = (lo + TRAJECTORY_CHUNK).min(trajectories);
            let mut amp_sum = vec![Complex64::new(0.0, 0.0); dim];
            let mut prob_sum = vec![0.0; dim];
            for t in lo..hi {
                let mut rng = trajectory_rng(seed, t);
                let sv = run_trajectory(circuit, channel, &mut rng)?;
                for (i, a) in sv.amplitudes().iter().enumerate() {
                    amp_sum[i] += a;
                    prob_sum[i] += a.norm_sqr();
                }
            }
            Ok::<_, SimError>((amp_sum, prob_sum))
        })
        .collect::<SimResult<Vec<_>>>()?;

    // Reduce chunk sums in index order.
    let mut amp_sum = vec![Complex64::new(0.0, 0.0); dim];
    let mut prob_sum = vec![0.0; dim];
    for (amps, probs) in partials {
        for i in 0..dim {
            amp_sum[i] += amps[i];
            prob_sum[i] += probs[i];
        }
    }

    let inv = 1.0 / trajectories as f64;
    let mean_amps: Vec<Complex64> = amp_sum.into_iter().map(|a| a * inv).collect();
    let probabilities: Vec<f64> = prob_sum.into_iter().map(|p| p * inv).collect();

    let mut statevector = Statevector::from_amplitudes(mean_amps)?;
    statevector.renormalize();

    Ok(NoisyOutcome {
        statevector,
        probabilities,
    })
}

/// One pure-state trajectory through the noisy circuit.
fn run_trajectory<R: Rng>(
    circuit: &Circuit,
    channel: &NoiseChannel,
    rng: &mut R,
) -> SimResult<Statevector> {
    let mut sv = Statevector::new(circuit.num_qubits() as usize);
    for op in circuit.ops() {
        sv.apply_op(op)?;
        if op.is_measure() {
            continue;
        }
        for q in op.operands() {
            if let Some(pauli) = channel.sample_error(rng) {
                pauli.apply(sv.amplitudes_mut(), q.index());
            }
        }
    }
    sv.renormalize();
    Ok(sv)
}

fn trajectory_rng(seed: Option<u64>, index: u64) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s.wrapping_add(index.wrapping_mul(0x9E37_79B9_7F4A_7C15))),
        None => StdRng::from_entropy(),
    }
}
