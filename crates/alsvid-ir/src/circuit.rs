//! Circuit builder and the wire-format description types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::dag::DependencyDag;
use crate::error::{CircuitError, IrResult};
use crate::gate::{GateKind, GateOp};
use crate::qubit::QubitId;

/// An ordered, validated quantum circuit over a fixed qubit count.
///
/// Circuits are built incrementally (append-only) and never mutated during
/// simulation — the engine borrows them read-only. Gate order is execution
/// order; no reordering ever happens at this layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Circuit {
    /// Number of qubits. Every operand must lie in `[0, num_qubits)`.
    num_qubits: u32,
    /// Gate operations in execution order.
    ops: Vec<GateOp>,
    /// Opaque caller metadata, carried through untouched.
    metadata: BTreeMap<String, serde_json::Value>,
}

impl Circuit {
    /// Create an empty circuit.
    ///
    /// Fails with [`CircuitError::Schema`] if `num_qubits` is zero.
    pub fn new(num_qubits: u32) -> IrResult<Self> {
        if num_qubits == 0 {
            return Err(CircuitError::Schema(
                "num_qubits must be at least 1".into(),
            ));
        }
        Ok(Self {
            num_qubits,
            ops: vec![],
            metadata: BTreeMap::new(),
        })
    }

    /// Append a gate by name, validating vocabulary membership, operand
    /// range, and arity.
    pub fn add_gate(
        &mut self,
        name: &str,
        targets: impl IntoIterator<Item = QubitId>,
        controls: impl IntoIterator<Item = QubitId>,
        params: BTreeMap<String, f64>,
    ) -> IrResult<&mut Self> {
        let kind = GateKind::parse(name)
            .ok_or_else(|| CircuitError::UnsupportedGate(name.to_string()))?;
        let mut op = GateOp::new(kind, targets, controls);
        op.params = params;
        self.push(op)
    }

    /// Append an already-constructed gate op, validating it first.
    pub fn push(&mut self, op: GateOp) -> IrResult<&mut Self> {
        self.validate_op(&op)?;
        self.ops.push(op);
        Ok(self)
    }

    // =========================================================================
    // Convenience builders
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(GateOp::single(GateKind::H, qubit))
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(GateOp::single(GateKind::X, qubit))
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(GateOp::single(GateKind::Y, qubit))
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(GateOp::single(GateKind::Z, qubit))
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(GateOp::single(GateKind::S, qubit))
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(GateOp::single(GateKind::T, qubit))
    }

    /// Apply Rx rotation gate.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(GateOp::rotation(GateKind::Rx, theta, qubit))
    }

    /// Apply Ry rotation gate.
    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(GateOp::rotation(GateKind::Ry, theta, qubit))
    }

    /// Apply Rz rotation gate.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(GateOp::rotation(GateKind::Rz, theta, qubit))
    }

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push(GateOp::cx(control, target))
    }

    /// Apply Toffoli (CCX) gate.
    pub fn ccx(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push(GateOp::ccx(c1, c2, target))
    }

    /// Mark a qubit for readout (classical bit index = qubit index).
    pub fn measure(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(GateOp::measure([qubit]))
    }

    /// Mark every qubit for readout.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        let targets: Vec<_> = (0..self.num_qubits).map(QubitId).collect();
        self.push(GateOp::measure(targets))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// The gate operations, in execution order.
    #[inline]
    pub fn ops(&self) -> &[GateOp] {
        &self.ops
    }

    /// Number of gate operations.
    #[inline]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Check if the circuit has no operations.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Opaque caller metadata.
    pub fn metadata(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.metadata
    }

    /// Circuit depth: the longest chain of operations linked by a shared
    /// operand qubit. Computed over the dependency DAG.
    pub fn depth(&self) -> usize {
        DependencyDag::from_circuit(self).depth()
    }

    /// Check whether the circuit carries any explicit MEASURE marker.
    pub fn has_measurements(&self) -> bool {
        self.ops.iter().any(GateOp::is_measure)
    }

    /// Per-qubit readout mask. Qubit t is read into classical bit t when
    /// some MEASURE op targets it; a circuit with no MEASURE at all
    /// implicitly reads out every qubit.
    pub fn readout_mask(&self) -> Vec<bool> {
        let n = self.num_qubits as usize;
        if !self.has_measurements() {
            return vec![true; n];
        }
        let mut mask = vec![false; n];
        for op in self.ops.iter().filter(|op| op.is_measure()) {
            for t in &op.targets {
                mask[t.index()] = true;
            }
        }
        mask
    }

    // =========================================================================
    // Description conversion
    // =========================================================================

    /// Build a circuit from the wire-format description.
    ///
    /// This is the single fallible constructor used by external callers;
    /// every gate goes through the same vocabulary/range/arity validation
    /// as [`Circuit::add_gate`].
    pub fn from_description(desc: &CircuitDescription) -> IrResult<Self> {
        let mut circuit = Circuit::new(desc.num_qubits)?;
        for g in &desc.gates {
            circuit.add_gate(
                &g.name,
                g.targets.iter().copied().map(QubitId),
                g.controls.iter().copied().map(QubitId),
                g.params.clone(),
            )?;
        }
        circuit.metadata = desc.metadata.clone();
        Ok(circuit)
    }

    /// Like [`Circuit::from_description`], but also checks the description
    /// against a qubit count declared out-of-band by the caller.
    pub fn from_description_checked(
        declared_qubits: u32,
        desc: &CircuitDescription,
    ) -> IrResult<Self> {
        if desc.num_qubits != declared_qubits {
            return Err(CircuitError::Schema(format!(
                "declared qubit count {declared_qubits} does not match description ({})",
                desc.num_qubits
            )));
        }
        Self::from_description(desc)
    }

    /// Export back to the wire-format description.
    pub fn to_description(&self) -> CircuitDescription {
        CircuitDescription {
            num_qubits: self.num_qubits,
            gates: self
                .ops
                .iter()
                .map(|op| GateOpDescription {
                    name: op.name().to_string(),
                    targets: op.targets.iter().map(|q| q.0).collect(),
                    controls: op.controls.iter().map(|q| q.0).collect(),
                    params: op.params.clone(),
                })
                .collect(),
            metadata: self.metadata.clone(),
        }
    }

    /// Serialize the description as JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.to_description())
            .expect("circuit description serialization is infallible")
    }

    /// Build a circuit from a JSON description.
    pub fn from_json(json: &str) -> IrResult<Self> {
        let desc: CircuitDescription = serde_json::from_str(json)
            .map_err(|e| CircuitError::Schema(format!("invalid circuit JSON: {e}")))?;
        Self::from_description(&desc)
    }

    // =========================================================================
    // Pre-built circuits
    // =========================================================================

    /// Bell-pair circuit: H(0), CX(0→1), measure all.
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Circuit::new(2)?;
        circuit
            .h(QubitId(0))?
            .cx(QubitId(0), QubitId(1))?
            .measure_all()?;
        Ok(circuit)
    }

    /// GHZ circuit on `n` qubits: H(0) then a CNOT chain, measure all.
    pub fn ghz(n: u32) -> IrResult<Self> {
        let mut circuit = Circuit::new(n)?;
        circuit.h(QubitId(0))?;
        for i in 0..n.saturating_sub(1) {
            circuit.cx(QubitId(i), QubitId(i + 1))?;
        }
        circuit.measure_all()?;
        Ok(circuit)
    }

    // =========================================================================
    // Validation
    // =========================================================================

    fn validate_op(&self, op: &GateOp) -> IrResult<()> {
        for q in op.operands() {
            if q.0 >= self.num_qubits {
                return Err(CircuitError::QubitRange {
                    qubit: q.0,
                    num_qubits: self.num_qubits,
                    gate: op.name().to_string(),
                });
            }
        }

        let arity_err = |reason: &str| {
            Err(CircuitError::GateArity {
                gate: op.name().to_string(),
                reason: reason.to_string(),
            })
        };

        match op.kind {
            GateKind::H
            | GateKind::X
            | GateKind::Y
            | GateKind::Z
            | GateKind::S
            | GateKind::T
            | GateKind::Rx
            | GateKind::Ry
            | GateKind::Rz => {
                if op.targets.is_empty() {
                    return arity_err("requires at least one target");
                }
                if !op.controls.is_empty() {
                    return arity_err("takes no controls");
                }
            }
            GateKind::Cx => {
                let zipped = !op.controls.is_empty() && op.controls.len() == op.targets.len();
                let two_targets = op.controls.is_empty() && op.targets.len() == 2;
                if zipped {
                    for (c, t) in op.controls.iter().zip(&op.targets) {
                        if c == t {
                            return arity_err("control and target must differ");
                        }
                    }
                } else if two_targets {
                    if op.targets[0] == op.targets[1] {
                        return arity_err("control and target must differ");
                    }
                } else {
                    return arity_err(
                        "requires matched control/target lists or exactly two targets",
                    );
                }
            }
            GateKind::Ccx => {
                if op.controls.len() < 2 || op.targets.is_empty() {
                    return arity_err("requires two controls and one target");
                }
                let (c1, c2, t) = (op.controls[0], op.controls[1], op.targets[0]);
                if c1 == c2 || c1 == t || c2 == t {
                    return arity_err("controls and target must be pairwise distinct");
                }
            }
            GateKind::Measure => {
                if op.targets.is_empty() {
                    return arity_err("requires at least one target");
                }
                if !op.controls.is_empty() {
                    return arity_err("takes no controls");
                }
            }
        }
        Ok(())
    }
}

/// Wire-format circuit description: `{num_qubits, gates, metadata}`.
///
/// This is what external callers (HTTP layer, frontends) deserialize into;
/// [`Circuit::from_description`] turns it into a validated [`Circuit`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CircuitDescription {
    /// Number of qubits (must be ≥ 1).
    pub num_qubits: u32,
    /// Ordered gate list.
    #[serde(default)]
    pub gates: Vec<GateOpDescription>,
    /// Opaque caller metadata.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

/// Wire-format gate entry: `{name, targets, controls, params}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GateOpDescription {
    /// Gate name; matched case-insensitively against the vocabulary.
    pub name: String,
    /// Target qubit indices.
    #[serde(default)]
    pub targets: Vec<u32>,
    /// Control qubit indices.
    #[serde(default)]
    pub controls: Vec<u32>,
    /// Named real parameters.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, f64>,
}
