//! Gate vocabulary and gate operations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::qubit::QubitId;

/// The fixed gate vocabulary.
///
/// Rotation gates carry their angle in the owning [`GateOp`]'s parameter
/// map under the key `"theta"` (missing → 0.0), matching the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GateKind {
    /// Hadamard gate.
    H,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// S gate (sqrt(Z)).
    S,
    /// T gate (fourth root of Z).
    T,
    /// Rotation around X axis.
    Rx,
    /// Rotation around Y axis.
    Ry,
    /// Rotation around Z axis.
    Rz,
    /// Controlled-X (CNOT) gate.
    Cx,
    /// Toffoli gate (double-controlled X).
    Ccx,
    /// Classical readout marker. Not a unitary; binds target qubit t to
    /// classical bit t.
    Measure,
}

impl GateKind {
    /// Parse a gate name, case-insensitively. `CNOT` is accepted as an
    /// alias for `CX`.
    pub fn parse(name: &str) -> Option<GateKind> {
        match name.to_ascii_uppercase().as_str() {
            "H" => Some(GateKind::H),
            "X" => Some(GateKind::X),
            "Y" => Some(GateKind::Y),
            "Z" => Some(GateKind::Z),
            "S" => Some(GateKind::S),
            "T" => Some(GateKind::T),
            "RX" => Some(GateKind::Rx),
            "RY" => Some(GateKind::Ry),
            "RZ" => Some(GateKind::Rz),
            "CX" | "CNOT" => Some(GateKind::Cx),
            "CCX" => Some(GateKind::Ccx),
            "MEASURE" => Some(GateKind::Measure),
            _ => None,
        }
    }

    /// Canonical uppercase name, used in gate histograms and error messages.
    #[inline]
    pub fn canonical_name(self) -> &'static str {
        match self {
            GateKind::H => "H",
            GateKind::X => "X",
            GateKind::Y => "Y",
            GateKind::Z => "Z",
            GateKind::S => "S",
            GateKind::T => "T",
            GateKind::Rx => "RX",
            GateKind::Ry => "RY",
            GateKind::Rz => "RZ",
            GateKind::Cx => "CX",
            GateKind::Ccx => "CCX",
            GateKind::Measure => "MEASURE",
        }
    }

    /// Check whether this is a single-qubit unitary (acts on one target,
    /// no controls).
    #[inline]
    pub fn is_single_qubit(self) -> bool {
        matches!(
            self,
            GateKind::H
                | GateKind::X
                | GateKind::Y
                | GateKind::Z
                | GateKind::S
                | GateKind::T
                | GateKind::Rx
                | GateKind::Ry
                | GateKind::Rz
        )
    }

    /// Check whether this gate reads an angle parameter.
    #[inline]
    pub fn is_rotation(self) -> bool {
        matches!(self, GateKind::Rx | GateKind::Ry | GateKind::Rz)
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

/// One gate operation: a vocabulary entry plus its operand lists and
/// named real parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateOp {
    /// Which gate this is.
    pub kind: GateKind,
    /// Target qubits, in application order. Single-qubit gates with
    /// several targets fan out over each in turn.
    #[serde(default)]
    pub targets: Vec<QubitId>,
    /// Control qubits (empty for single-qubit gates).
    #[serde(default)]
    pub controls: Vec<QubitId>,
    /// Named real-valued parameters (e.g. `theta`); absent keys read 0.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, f64>,
}

impl GateOp {
    /// Create a gate op with explicit operand lists.
    pub fn new(
        kind: GateKind,
        targets: impl IntoIterator<Item = QubitId>,
        controls: impl IntoIterator<Item = QubitId>,
    ) -> Self {
        Self {
            kind,
            targets: targets.into_iter().collect(),
            controls: controls.into_iter().collect(),
            params: BTreeMap::new(),
        }
    }

    /// Create a single-qubit gate op on one target.
    pub fn single(kind: GateKind, target: QubitId) -> Self {
        Self::new(kind, [target], [])
    }

    /// Create a rotation gate op with the given angle.
    pub fn rotation(kind: GateKind, theta: f64, target: QubitId) -> Self {
        Self::single(kind, target).with_param("theta", theta)
    }

    /// Create a CX op in the matched control/target spelling.
    pub fn cx(control: QubitId, target: QubitId) -> Self {
        Self::new(GateKind::Cx, [target], [control])
    }

    /// Create a Toffoli op.
    pub fn ccx(c1: QubitId, c2: QubitId, target: QubitId) -> Self {
        Self::new(GateKind::Ccx, [target], [c1, c2])
    }

    /// Create a measurement marker over the given targets.
    pub fn measure(targets: impl IntoIterator<Item = QubitId>) -> Self {
        Self::new(GateKind::Measure, targets, [])
    }

    /// Set a named parameter.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: f64) -> Self {
        self.params.insert(name.into(), value);
        self
    }

    /// The rotation angle; 0.0 when absent.
    #[inline]
    pub fn theta(&self) -> f64 {
        self.params.get("theta").copied().unwrap_or(0.0)
    }

    /// All operand qubits, controls first.
    pub fn operands(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.controls.iter().chain(self.targets.iter()).copied()
    }

    /// Check if this is the classical readout marker.
    #[inline]
    pub fn is_measure(&self) -> bool {
        self.kind == GateKind::Measure
    }

    /// Canonical name of the underlying gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.kind.canonical_name()
    }
}
