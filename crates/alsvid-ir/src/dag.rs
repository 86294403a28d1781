//! Gate dependency DAG.
//!
//! Two operations depend on each other when they share an operand qubit;
//! the circuit's depth is the longest chain of dependent operations. The
//! DAG is derived from the ordered gate list on demand — the gate list
//! itself stays the canonical representation.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex as PetNodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::FxHashMap;

use crate::circuit::Circuit;
use crate::qubit::QubitId;

/// Node index type for the dependency DAG.
pub type NodeIndex = PetNodeIndex<u32>;

/// Dependency DAG over a circuit's gate list.
///
/// Nodes hold the index of the op in [`Circuit::ops`]; an edge q runs from
/// the previous op touching qubit q to the next one.
#[derive(Debug)]
pub struct DependencyDag {
    graph: DiGraph<usize, QubitId, u32>,
}

impl DependencyDag {
    /// Build the dependency DAG for a circuit.
    pub fn from_circuit(circuit: &Circuit) -> Self {
        let mut graph = DiGraph::with_capacity(circuit.len(), circuit.len());
        // Last op node seen on each qubit wire.
        let mut front: FxHashMap<QubitId, NodeIndex> =
            FxHashMap::with_capacity_and_hasher(circuit.num_qubits() as usize, Default::default());

        for (op_index, op) in circuit.ops().iter().enumerate() {
            let node = graph.add_node(op_index);
            for q in op.operands() {
                if let Some(&prev) = front.get(&q) {
                    if prev != node && !graph.contains_edge(prev, node) {
                        graph.add_edge(prev, node, q);
                    }
                }
                front.insert(q, node);
            }
        }

        Self { graph }
    }

    /// Number of operation nodes.
    pub fn num_ops(&self) -> usize {
        self.graph.node_count()
    }

    /// Longest dependency chain through the circuit; 0 for an empty one.
    pub fn depth(&self) -> usize {
        let mut depths: FxHashMap<NodeIndex, usize> =
            FxHashMap::with_capacity_and_hasher(self.graph.node_count(), Default::default());

        let mut max_depth = 0usize;

        for node in petgraph::algo::toposort(&self.graph, None)
            .expect("dependency graph is acyclic by construction")
        {
            let max_pred_depth = self
                .graph
                .edges_directed(node, Direction::Incoming)
                .map(|e| depths.get(&e.source()).copied().unwrap_or(0))
                .max()
                .unwrap_or(0);

            let node_depth = max_pred_depth + 1;
            if node_depth > max_depth {
                max_depth = node_depth;
            }
            depths.insert(node, node_depth);
        }

        max_depth
    }
}
