//! Measurement and byproduct correction.
//!
//! Each subgraph is measured layer by layer along its generalized flow,
//! highest layer first. Measuring `v` produces an outcome whose effect is
//! propagated as X byproducts onto its correction set and Z byproducts onto
//! the odd neighborhood of that set. Later measurements adapt to the
//! accumulated signals, and the outputs are fixed up at the end.

use std::collections::{BTreeMap, BTreeSet};

use arvak_ir::{Circuit, ClassicalCondition, ClbitId, Phase, QubitId, StandardGate};
use arvak_zx::gflow::gflow;
use arvak_zx::{Diagram, GFlow, VertexId};
use tracing::debug;

use crate::error::{MbqcError, MbqcResult};
use crate::signal::{Resolved, Signal};
use crate::{clbit_of, qubit_of, width};

/// Build the measurement and correction circuit for the given subgraphs.
///
/// `flows[i]` is the generalized flow of `subgraphs[i]`. Fails without
/// emitting anything if any subgraph has no flow. Vertex `v` is measured
/// into bit `v`; pending signals are materialized into scratch bits
/// numbered after those.
pub fn correct(subgraphs: &[Diagram], flows: &[Option<GFlow>]) -> MbqcResult<Circuit> {
    let mut paired = Vec::with_capacity(subgraphs.len());
    for (i, diagram) in subgraphs.iter().enumerate() {
        let flow = flows
            .get(i)
            .and_then(Option::as_ref)
            .ok_or(MbqcError::UnrealizableGraph { subgraph: i })?;
        paired.push((diagram, flow));
    }

    let n = width(
        subgraphs
            .iter()
            .map(Diagram::vertex_bound)
            .max()
            .unwrap_or(0),
    );
    let mut circuit = Circuit::with_size("correct", n, n);
    for (diagram, flow) in paired {
        Synthesizer::new(&mut circuit, diagram, flow).run()?;
    }
    Ok(circuit)
}

/// [`correct`] with the flows computed here.
pub fn correct_with_gflow(subgraphs: &[Diagram]) -> MbqcResult<Circuit> {
    let flows: Vec<Option<GFlow>> = subgraphs.iter().map(gflow).collect();
    correct(subgraphs, &flows)
}

struct Synthesizer<'a> {
    circuit: &'a mut Circuit,
    diagram: &'a Diagram,
    flow: &'a GFlow,
    x: BTreeMap<VertexId, Signal>,
    z: BTreeMap<VertexId, Signal>,
}

impl<'a> Synthesizer<'a> {
    fn new(circuit: &'a mut Circuit, diagram: &'a Diagram, flow: &'a GFlow) -> Self {
        Self {
            circuit,
            diagram,
            flow,
            x: BTreeMap::new(),
            z: BTreeMap::new(),
        }
    }

    fn run(mut self) -> MbqcResult<()> {
        let vertices = self.diagram.vertices();
        let qubits: Vec<QubitId> = vertices.iter().map(|&v| qubit_of(v)).collect();
        let clbits: Vec<ClbitId> = vertices.iter().map(|&v| clbit_of(v)).collect();

        let mut unreset = Vec::new();
        let mut barriers = 0;
        for k in (1..self.flow.depth()).rev() {
            let mut non_clifford = false;
            for v in self.flow.layer(k) {
                non_clifford |= self.measure(v)?;
                unreset.push(v);
            }
            if non_clifford {
                self.circuit.barrier(qubits.clone(), clbits.clone())?;
                barriers += 1;
                for v in unreset.drain(..) {
                    self.circuit.reset(qubit_of(v))?;
                }
            }
        }
        for v in unreset {
            self.circuit.reset(qubit_of(v))?;
        }

        for v in self.flow.layer(0) {
            self.fix_output(v)?;
        }

        debug!(
            "Corrected subgraph of {} vertices in {} layers with {} barriers",
            vertices.len(),
            self.flow.depth(),
            barriers
        );
        Ok(())
    }

    /// Measure `v` and propagate its outcome. Returns whether the
    /// measurement angle was non-Clifford.
    fn measure(&mut self, v: VertexId) -> MbqcResult<bool> {
        let phase = self.diagram.phase(v);
        let xs = self.x.get(&v).cloned().unwrap_or_default();
        let zs = self.z.get(&v).cloned().unwrap_or_default();

        let mut result = Signal::measured(v);
        if phase.is_clifford() {
            result ^= &zs;
            if !phase.is_zero() {
                result ^= &xs;
            }
        }
        if phase.is_proper_clifford() {
            result ^= true;
        }

        let empty = BTreeSet::new();
        let correction = self.flow.correction(v).unwrap_or(&empty);
        for &u in correction {
            if u != v {
                *self.x.entry(u).or_default() ^= &result;
            }
        }
        for u in self.diagram.vertices() {
            if u == v {
                continue;
            }
            let hits = self
                .diagram
                .neighbors(u)
                .iter()
                .filter(|n| correction.contains(*n))
                .count();
            if hits % 2 == 1 {
                *self.z.entry(u).or_default() ^= &result;
            }
        }

        let q = qubit_of(v);
        let non_clifford = !phase.is_clifford();
        if phase.is_pauli() {
            self.circuit.h(q)?;
        } else if phase.is_proper_clifford() {
            self.circuit.rx((-phase).normalized(), q)?;
        } else {
            self.circuit.h(q)?;
            self.apply_if(&zs, StandardGate::X, q)?;
            self.rotate(&xs, phase, q)?;
        }
        self.circuit.measure(q, clbit_of(v))?;
        Ok(non_clifford)
    }

    /// Rx(+phase) when the signal is set, Rx(-phase) when it is clear.
    fn rotate(&mut self, signal: &Signal, phase: Phase, q: QubitId) -> MbqcResult<()> {
        let plus = StandardGate::Rx(phase.normalized());
        let minus = StandardGate::Rx((-phase).normalized());
        match signal.resolve() {
            Resolved::Known(true) => {
                self.circuit.gate(plus, [q])?;
            }
            Resolved::Known(false) => {
                self.circuit.gate(minus, [q])?;
            }
            Resolved::Pending { bits, negate } => {
                let bit = self.scratch(&bits, negate)?;
                self.circuit
                    .conditional(plus, [q], ClassicalCondition::is_set(bit))?
                    .conditional(minus, [q], ClassicalCondition::is_clear(bit))?;
            }
        }
        Ok(())
    }

    fn fix_output(&mut self, v: VertexId) -> MbqcResult<()> {
        let q = qubit_of(v);
        let xs = self.x.get(&v).cloned().unwrap_or_default();
        let zs = self.z.get(&v).cloned().unwrap_or_default();
        self.apply_if(&xs, StandardGate::X, q)?;
        self.apply_if(&zs, StandardGate::Z, q)?;

        let phase = self.diagram.phase(v);
        if phase.is_pi() {
            self.circuit.z(q)?;
        } else if !phase.is_zero() {
            self.circuit.rz((-phase).normalized(), q)?;
        }
        Ok(())
    }

    /// Apply `gate` to `q` exactly when the signal is true.
    fn apply_if(&mut self, signal: &Signal, gate: StandardGate, q: QubitId) -> MbqcResult<()> {
        match signal.resolve() {
            Resolved::Known(false) => {}
            Resolved::Known(true) => {
                self.circuit.gate(gate, [q])?;
            }
            Resolved::Pending { bits, negate } => {
                let bit = self.scratch(&bits, negate)?;
                self.circuit
                    .conditional(gate, [q], ClassicalCondition::is_set(bit))?;
            }
        }
        Ok(())
    }

    /// A fresh bit holding `XOR(bits) ^ negate`.
    fn scratch(&mut self, bits: &[VertexId], negate: bool) -> MbqcResult<ClbitId> {
        let target = self.circuit.add_clbit();
        self.circuit
            .parity(bits.iter().map(|&b| clbit_of(b)), negate, target)?;
        Ok(target)
    }
}
