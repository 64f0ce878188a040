//! Undirected ZX diagrams with typed vertices and two edge kinds.

use std::collections::BTreeSet;

use arvak_ir::Phase;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableUnGraph;
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::ZxResult;

/// Identifier of a diagram vertex.
///
/// Identifiers are slot indices: a freed slot is handed out again by the
/// next [`Diagram::add_vertex`], so stored identifiers go stale once
/// vertices are removed.
pub type VertexId = usize;

/// The type of a diagram vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VertexKind {
    /// A wire end. Carries no phase.
    Boundary,
    /// A Z spider.
    Z,
    /// An X spider.
    X,
}

/// The type of a diagram edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EdgeKind {
    /// A plain wire.
    Simple,
    /// A wire carrying a Hadamard box.
    Hadamard,
}

impl EdgeKind {
    /// The other kind.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            EdgeKind::Simple => EdgeKind::Hadamard,
            EdgeKind::Hadamard => EdgeKind::Simple,
        }
    }

    /// The kind of the wire obtained by joining `self` and `other` end to end.
    #[must_use]
    pub fn compose(self, other: EdgeKind) -> Self {
        if self == other {
            EdgeKind::Simple
        } else {
            EdgeKind::Hadamard
        }
    }
}

/// Payload of a diagram vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexData {
    /// Vertex type.
    pub kind: VertexKind,
    /// Phase in units of π, kept in `[0, 2)`.
    pub phase: Phase,
    /// Qubit line the vertex was drawn on, if any.
    pub qubit: Option<u32>,
    /// Column the vertex was drawn in.
    pub row: u32,
}

/// A ZX diagram.
///
/// At most one edge of each kind joins a pair of vertices and there are no
/// self-loops. Inputs and outputs are kept in role order: entry `k` belongs
/// to qubit line `k` of the circuit the diagram was built from.
#[derive(Debug, Clone, Default)]
pub struct Diagram {
    graph: StableUnGraph<VertexData, EdgeKind>,
    inputs: Vec<VertexId>,
    outputs: Vec<VertexId>,
}

#[inline]
fn ix(v: VertexId) -> NodeIndex {
    NodeIndex::new(v)
}

impl Diagram {
    /// Create an empty diagram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex and return its identifier.
    pub fn add_vertex(&mut self, kind: VertexKind, phase: Phase) -> VertexId {
        self.graph
            .add_node(VertexData {
                kind,
                phase: phase.normalized(),
                qubit: None,
                row: 0,
            })
            .index()
    }

    /// Remove a vertex with its edges and any input or output role it held.
    pub fn remove_vertex(&mut self, v: VertexId) -> Option<VertexData> {
        let data = self.graph.remove_node(ix(v))?;
        self.inputs.retain(|&i| i != v);
        self.outputs.retain(|&o| o != v);
        Some(data)
    }

    /// Check whether `v` is a live vertex.
    pub fn contains(&self, v: VertexId) -> bool {
        self.graph.contains_node(ix(v))
    }

    /// The payload of `v`.
    pub fn vertex(&self, v: VertexId) -> Option<&VertexData> {
        self.graph.node_weight(ix(v))
    }

    /// Number of live vertices.
    pub fn num_vertices(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    pub fn num_edges(&self) -> usize {
        self.graph.edge_count()
    }

    /// Live vertices in ascending order.
    pub fn vertices(&self) -> Vec<VertexId> {
        let mut vertices: Vec<_> = self.graph.node_indices().map(|n| n.index()).collect();
        vertices.sort_unstable();
        vertices
    }

    /// One past the largest live vertex identifier.
    pub fn vertex_bound(&self) -> usize {
        self.graph
            .node_indices()
            .map(|n| n.index() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Every edge as `(low, high, kind)`, sorted.
    pub fn edges(&self) -> Vec<(VertexId, VertexId, EdgeKind)> {
        let mut edges: Vec<_> = self
            .graph
            .edge_references()
            .map(|e| {
                let (a, b) = (e.source().index(), e.target().index());
                (a.min(b), a.max(b), *e.weight())
            })
            .collect();
        edges.sort_unstable();
        edges
    }

    /// Add an edge of `kind` between `a` and `b`.
    ///
    /// Returns `false` without changing anything if either vertex is
    /// missing, if `a == b`, or if an edge of that kind already joins them.
    pub fn add_edge(&mut self, a: VertexId, b: VertexId, kind: EdgeKind) -> bool {
        if a == b || !self.contains(a) || !self.contains(b) || self.has_edge(a, b, kind) {
            return false;
        }
        self.graph.add_edge(ix(a), ix(b), kind);
        true
    }

    /// Remove the edge of `kind` between `a` and `b`, if present.
    pub fn remove_edge(&mut self, a: VertexId, b: VertexId, kind: EdgeKind) -> bool {
        if !self.contains(a) {
            return false;
        }
        let found = self
            .graph
            .edges(ix(a))
            .find(|e| other_end(e.source(), e.target(), a) == b && *e.weight() == kind)
            .map(|e| e.id());
        match found {
            Some(edge) => self.graph.remove_edge(edge).is_some(),
            None => false,
        }
    }

    /// Add an edge between two Z spiders, resolving parallel edges.
    ///
    /// Two Hadamard edges cancel, two simple edges collapse into one, and a
    /// simple edge next to a Hadamard edge leaves the simple edge and adds π
    /// to `a`. A Hadamard self-loop adds π; a simple self-loop vanishes.
    pub fn add_edge_smart(&mut self, a: VertexId, b: VertexId, kind: EdgeKind) -> ZxResult<()> {
        if a == b {
            if kind == EdgeKind::Hadamard {
                self.add_to_phase(a, Phase::pi())?;
            }
            return Ok(());
        }
        let simple = self.has_edge(a, b, EdgeKind::Simple);
        let hadamard = self.has_edge(a, b, EdgeKind::Hadamard);
        match kind {
            EdgeKind::Simple if simple => {}
            EdgeKind::Simple if hadamard => {
                self.remove_edge(a, b, EdgeKind::Hadamard);
                self.add_edge(a, b, EdgeKind::Simple);
                self.add_to_phase(a, Phase::pi())?;
            }
            EdgeKind::Hadamard if hadamard => {
                self.remove_edge(a, b, EdgeKind::Hadamard);
            }
            EdgeKind::Hadamard if simple => {
                self.add_to_phase(a, Phase::pi())?;
            }
            _ => {
                self.add_edge(a, b, kind);
            }
        }
        Ok(())
    }

    /// Check whether an edge of `kind` joins `a` and `b`.
    pub fn has_edge(&self, a: VertexId, b: VertexId, kind: EdgeKind) -> bool {
        self.edges_between(a, b).contains(&kind)
    }

    /// Check whether any edge joins `a` and `b`.
    pub fn connected(&self, a: VertexId, b: VertexId) -> bool {
        !self.edges_between(a, b).is_empty()
    }

    /// Kinds of the edges joining `a` and `b`, simple first.
    pub fn edges_between(&self, a: VertexId, b: VertexId) -> Vec<EdgeKind> {
        if !self.contains(a) {
            return Vec::new();
        }
        let mut kinds: Vec<_> = self
            .graph
            .edges(ix(a))
            .filter(|e| other_end(e.source(), e.target(), a) == b)
            .map(|e| *e.weight())
            .collect();
        kinds.sort_unstable();
        kinds
    }

    /// The kind of the edge joining `a` and `b`, simple first.
    pub fn edge(&self, a: VertexId, b: VertexId) -> Option<EdgeKind> {
        self.edges_between(a, b).first().copied()
    }

    /// Edges at `v` as `(neighbor, kind)`, sorted.
    pub fn incident(&self, v: VertexId) -> Vec<(VertexId, EdgeKind)> {
        if !self.contains(v) {
            return Vec::new();
        }
        let mut incident: Vec<_> = self
            .graph
            .edges(ix(v))
            .map(|e| (other_end(e.source(), e.target(), v), *e.weight()))
            .collect();
        incident.sort_unstable();
        incident
    }

    /// Distinct neighbors of `v` in ascending order.
    pub fn neighbors(&self, v: VertexId) -> Vec<VertexId> {
        let mut neighbors: Vec<_> = self.incident(v).into_iter().map(|(u, _)| u).collect();
        neighbors.dedup();
        neighbors
    }

    /// Number of distinct neighbors of `v`.
    pub fn degree(&self, v: VertexId) -> usize {
        self.neighbors(v).len()
    }

    /// Phase of `v`; zero for unknown vertices.
    pub fn phase(&self, v: VertexId) -> Phase {
        self.vertex(v).map_or(Phase::zero(), |d| d.phase)
    }

    /// Overwrite the phase of `v`.
    pub fn set_phase(&mut self, v: VertexId, phase: Phase) {
        if let Some(data) = self.graph.node_weight_mut(ix(v)) {
            data.phase = phase.normalized();
        }
    }

    /// Add `phase` to the phase of `v`.
    ///
    /// Fails if the exact sum does not fit the phase representation; the
    /// vertex keeps its old phase in that case.
    pub fn add_to_phase(&mut self, v: VertexId, phase: Phase) -> ZxResult<()> {
        if let Some(data) = self.graph.node_weight_mut(ix(v)) {
            data.phase = data.phase.checked_add(phase)?;
        }
        Ok(())
    }

    /// Type of `v`.
    pub fn kind(&self, v: VertexId) -> Option<VertexKind> {
        self.vertex(v).map(|d| d.kind)
    }

    /// Change the type of `v`.
    pub fn set_kind(&mut self, v: VertexId, kind: VertexKind) {
        if let Some(data) = self.graph.node_weight_mut(ix(v)) {
            data.kind = kind;
        }
    }

    /// Check whether `v` is a Z spider.
    pub fn is_z(&self, v: VertexId) -> bool {
        self.kind(v) == Some(VertexKind::Z)
    }

    /// Qubit line hint of `v`.
    pub fn qubit(&self, v: VertexId) -> Option<u32> {
        self.vertex(v).and_then(|d| d.qubit)
    }

    /// Set the qubit line hint of `v`.
    pub fn set_qubit(&mut self, v: VertexId, qubit: Option<u32>) {
        if let Some(data) = self.graph.node_weight_mut(ix(v)) {
            data.qubit = qubit;
        }
    }

    /// Column hint of `v`.
    pub fn row(&self, v: VertexId) -> u32 {
        self.vertex(v).map_or(0, |d| d.row)
    }

    /// Set the column hint of `v`.
    pub fn set_row(&mut self, v: VertexId, row: u32) {
        if let Some(data) = self.graph.node_weight_mut(ix(v)) {
            data.row = row;
        }
    }

    /// Input vertices in role order.
    pub fn inputs(&self) -> &[VertexId] {
        &self.inputs
    }

    /// Output vertices in role order.
    pub fn outputs(&self) -> &[VertexId] {
        &self.outputs
    }

    /// Replace the input list.
    pub fn set_inputs(&mut self, inputs: Vec<VertexId>) {
        self.inputs = inputs;
    }

    /// Replace the output list.
    pub fn set_outputs(&mut self, outputs: Vec<VertexId>) {
        self.outputs = outputs;
    }

    /// Check whether `v` holds an input role.
    pub fn is_input(&self, v: VertexId) -> bool {
        self.inputs.contains(&v)
    }

    /// Check whether `v` holds an output role.
    pub fn is_output(&self, v: VertexId) -> bool {
        self.outputs.contains(&v)
    }

    /// Check whether `v` holds any boundary role.
    pub fn has_role(&self, v: VertexId) -> bool {
        self.is_input(v) || self.is_output(v)
    }

    /// Move every input and output role held by `from` onto `to`.
    pub fn transfer_roles(&mut self, from: VertexId, to: VertexId) {
        for slot in self.inputs.iter_mut().chain(self.outputs.iter_mut()) {
            if *slot == from {
                *slot = to;
            }
        }
    }

    /// A Z spider with no role whose neighbors are all role-free Z spiders.
    pub fn is_interior(&self, v: VertexId) -> bool {
        self.is_z(v)
            && !self.has_role(v)
            && self
                .neighbors(v)
                .into_iter()
                .all(|u| self.is_z(u) && !self.has_role(u))
    }

    /// The sub-diagram on `keep`, with vertex identifiers unchanged.
    pub fn induced(&self, keep: &BTreeSet<VertexId>) -> Diagram {
        let mut sub = self.clone();
        for v in self.vertices() {
            if !keep.contains(&v) {
                sub.remove_vertex(v);
            }
        }
        sub
    }

    /// A copy with vertices renumbered `0..n` in ascending order.
    pub fn compacted(&self) -> Diagram {
        let order = self.vertices();
        let rank: FxHashMap<VertexId, VertexId> =
            order.iter().enumerate().map(|(i, &v)| (v, i)).collect();

        let mut out = Diagram::new();
        for &v in &order {
            out.graph.add_node(self.graph[ix(v)].clone());
        }
        for (a, b, kind) in self.edges() {
            out.graph.add_edge(ix(rank[&a]), ix(rank[&b]), kind);
        }
        out.inputs = self.inputs.iter().map(|v| rank[v]).collect();
        out.outputs = self.outputs.iter().map(|v| rank[v]).collect();
        out
    }
}

fn other_end(source: NodeIndex, target: NodeIndex, from: VertexId) -> VertexId {
    if source.index() == from {
        target.index()
    } else {
        source.index()
    }
}
