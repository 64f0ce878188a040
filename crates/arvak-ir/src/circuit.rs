//! High-level circuit builder API.

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;

use crate::dag::{CircuitDag, CircuitLevel};
use crate::error::{IrError, IrResult};
use crate::gate::{ClassicalCondition, Gate, StandardGate};
use crate::instruction::Instruction;
use crate::phase::Phase;
use crate::qubit::{ClbitId, QubitId};

/// A quantum circuit.
///
/// Wraps a [`CircuitDag`] with a fluent builder. Qubit and bit identifiers
/// are kept in ascending order and need not be contiguous, since pattern
/// circuits name their qubits after graph vertices.
#[derive(Debug, Clone)]
pub struct Circuit {
    name: String,
    qubits: Vec<QubitId>,
    clbits: Vec<ClbitId>,
    dag: CircuitDag,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qubits: vec![],
            clbits: vec![],
            dag: CircuitDag::new(),
        }
    }

    /// Create a circuit with qubits `0..num_qubits` and bits `0..num_clbits`.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        let mut circuit = Self::new(name);
        for q in 0..num_qubits {
            circuit.add_qubit_with_id(QubitId(q));
        }
        for c in 0..num_clbits {
            circuit.add_clbit_with_id(ClbitId(c));
        }
        circuit
    }

    /// Add a qubit numbered one past the largest existing id.
    pub fn add_qubit(&mut self) -> QubitId {
        let id = self.qubits.last().map_or(QubitId(0), |q| QubitId(q.0 + 1));
        self.add_qubit_with_id(id);
        id
    }

    /// Add a classical bit numbered one past the largest existing id.
    pub fn add_clbit(&mut self) -> ClbitId {
        let id = self.clbits.last().map_or(ClbitId(0), |c| ClbitId(c.0 + 1));
        self.add_clbit_with_id(id);
        id
    }

    /// Add a qubit with an explicit id. Returns `false` if it already existed.
    pub fn add_qubit_with_id(&mut self, id: QubitId) -> bool {
        match self.qubits.binary_search(&id) {
            Ok(_) => false,
            Err(pos) => {
                self.qubits.insert(pos, id);
                self.dag.add_qubit(id);
                true
            }
        }
    }

    /// Add a classical bit with an explicit id. Returns `false` if it already existed.
    pub fn add_clbit_with_id(&mut self, id: ClbitId) -> bool {
        match self.clbits.binary_search(&id) {
            Ok(_) => false,
            Err(pos) => {
                self.clbits.insert(pos, id);
                self.dag.add_clbit(id);
                true
            }
        }
    }

    /// Append an arbitrary instruction.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        self.dag.apply(instruction)?;
        Ok(self)
    }

    fn single(&mut self, gate: StandardGate, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(gate, qubit))
    }

    fn pair(&mut self, gate: StandardGate, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(gate, q1, q2))
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::H, qubit)
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::X, qubit)
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Y, qubit)
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Z, qubit)
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::S, qubit)
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Sdg, qubit)
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::T, qubit)
    }

    /// Apply T-dagger gate.
    pub fn tdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Tdg, qubit)
    }

    /// Apply sqrt(X) gate.
    pub fn sx(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::SX, qubit)
    }

    /// Apply sqrt(X)-dagger gate.
    pub fn sxdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::SXdg, qubit)
    }

    /// Apply Rx rotation gate.
    pub fn rx(&mut self, theta: Phase, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Rx(theta), qubit)
    }

    /// Apply Ry rotation gate.
    pub fn ry(&mut self, theta: Phase, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Ry(theta), qubit)
    }

    /// Apply Rz rotation gate.
    pub fn rz(&mut self, theta: Phase, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Rz(theta), qubit)
    }

    // =========================================================================
    // Multi-qubit gates
    // =========================================================================

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.pair(StandardGate::CX, control, target)
    }

    /// Apply CY gate.
    pub fn cy(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.pair(StandardGate::CY, control, target)
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.pair(StandardGate::CZ, control, target)
    }

    /// Apply controlled-Hadamard gate.
    pub fn ch(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.pair(StandardGate::CH, control, target)
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.pair(StandardGate::Swap, q1, q2)
    }

    /// Apply controlled-Rx gate.
    pub fn crx(&mut self, theta: Phase, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.pair(StandardGate::CRx(theta), control, target)
    }

    /// Apply controlled-Ry gate.
    pub fn cry(&mut self, theta: Phase, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.pair(StandardGate::CRy(theta), control, target)
    }

    /// Apply controlled-Rz gate.
    pub fn crz(&mut self, theta: Phase, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.pair(StandardGate::CRz(theta), control, target)
    }

    /// Apply Toffoli (CCX) gate.
    pub fn ccx(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(StandardGate::CCX, [c1, c2, target]))
    }

    /// Apply Fredkin (CSWAP) gate.
    pub fn cswap(&mut self, control: QubitId, t1: QubitId, t2: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(StandardGate::CSwap, [control, t1, t2]))
    }

    // =========================================================================
    // Other operations
    // =========================================================================

    /// Apply a gate.
    pub fn gate(
        &mut self,
        gate: impl Into<Gate>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(gate, qubits))
    }

    /// Apply a gate that fires only when `condition` holds.
    pub fn conditional(
        &mut self,
        gate: StandardGate,
        qubits: impl IntoIterator<Item = QubitId>,
        condition: ClassicalCondition,
    ) -> IrResult<&mut Self> {
        self.apply(Instruction::conditional(gate, qubits, condition))
    }

    /// Write `XOR(sources) ^ negate` into `target`.
    pub fn parity(
        &mut self,
        sources: impl IntoIterator<Item = ClbitId>,
        negate: bool,
        target: ClbitId,
    ) -> IrResult<&mut Self> {
        self.apply(Instruction::parity(sources, negate, target))
    }

    /// Measure a qubit to a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.apply(Instruction::measure(qubit, clbit))
    }

    /// Reset a qubit to |0⟩.
    pub fn reset(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::reset(qubit))
    }

    /// Apply a barrier across the given qubits and bits.
    pub fn barrier(
        &mut self,
        qubits: impl IntoIterator<Item = QubitId>,
        clbits: impl IntoIterator<Item = ClbitId>,
    ) -> IrResult<&mut Self> {
        self.apply(Instruction::barrier(qubits, clbits))
    }

    /// Apply a barrier across every qubit and bit.
    pub fn barrier_all(&mut self) -> IrResult<&mut Self> {
        let inst = Instruction::barrier(self.qubits.clone(), self.clbits.clone());
        self.apply(inst)
    }

    // =========================================================================
    // Composition
    // =========================================================================

    /// Append every operation of `other`, adding any wires it uses.
    pub fn append(&mut self, other: &Circuit) -> IrResult<&mut Self> {
        for &q in &other.qubits {
            self.add_qubit_with_id(q);
        }
        for &c in &other.clbits {
            self.add_clbit_with_id(c);
        }
        for inst in other.instructions() {
            self.dag.apply(inst.clone())?;
        }
        Ok(self)
    }

    /// Copy of this circuit with qubits renamed and bits shifted.
    ///
    /// Qubits absent from `qubit_map` keep their id. Fails if two qubits end
    /// up with the same id.
    pub fn renamed(
        &self,
        qubit_map: &BTreeMap<QubitId, QubitId>,
        clbit_offset: u32,
    ) -> IrResult<Circuit> {
        let rename = |q: QubitId| qubit_map.get(&q).copied().unwrap_or(q);

        let mut taken = FxHashSet::default();
        let mut out = Circuit::new(self.name.clone());
        for &q in &self.qubits {
            let target = rename(q);
            if !taken.insert(target) {
                return Err(IrError::RenameCollision(target));
            }
            out.add_qubit_with_id(target);
        }
        for &c in &self.clbits {
            out.add_clbit_with_id(c.offset(clbit_offset));
        }
        for inst in self.instructions() {
            out.dag.apply(inst.remapped(rename, clbit_offset))?;
        }
        out.dag.set_level(self.dag.level());
        Ok(out)
    }

    /// Circuit over the same wires holding only the given layers, in order.
    pub fn sliced(&self, layers: &[Vec<Instruction>]) -> IrResult<Circuit> {
        let mut out = Circuit::new(self.name.clone());
        for &q in &self.qubits {
            out.add_qubit_with_id(q);
        }
        for &c in &self.clbits {
            out.add_clbit_with_id(c);
        }
        for inst in layers.iter().flatten() {
            out.dag.apply(inst.clone())?;
        }
        Ok(out)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.clbits.len()
    }

    /// Get the number of operations.
    pub fn num_ops(&self) -> usize {
        self.dag.num_ops()
    }

    /// Get the circuit depth.
    pub fn depth(&self) -> usize {
        self.dag.depth()
    }

    /// Qubits in ascending order.
    pub fn qubits(&self) -> &[QubitId] {
        &self.qubits
    }

    /// Classical bits in ascending order.
    pub fn clbits(&self) -> &[ClbitId] {
        &self.clbits
    }

    /// Iterate over instructions in application order.
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.dag.topological_ops().map(|(_, inst)| inst)
    }

    /// Count operations by name.
    pub fn count_ops(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for inst in self.instructions() {
            *counts.entry(inst.name().to_string()).or_insert(0) += 1;
        }
        counts
    }

    /// Instructions grouped into as-soon-as-possible layers.
    pub fn layers(&self) -> Vec<Vec<Instruction>> {
        self.dag
            .layers()
            .into_iter()
            .map(|layer| {
                layer
                    .into_iter()
                    .filter_map(|node| self.dag.get_instruction(node).cloned())
                    .collect()
            })
            .collect()
    }

    /// Get the abstraction level.
    pub fn level(&self) -> CircuitLevel {
        self.dag.level()
    }

    /// Get a reference to the underlying DAG.
    pub fn dag(&self) -> &CircuitDag {
        &self.dag
    }

    /// Get a mutable reference to the underlying DAG.
    pub fn dag_mut(&mut self) -> &mut CircuitDag {
        &mut self.dag
    }

    /// Consume the circuit and return the DAG.
    pub fn into_dag(self) -> CircuitDag {
        self.dag
    }

    /// Create a circuit from a DAG.
    pub fn from_dag(dag: CircuitDag) -> Self {
        Self {
            name: "circuit".into(),
            qubits: dag.qubits(),
            clbits: dag.clbits(),
            dag,
        }
    }

    /// Set the circuit name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_circuit() {
        let circuit = Circuit::new("test");
        assert_eq!(circuit.name(), "test");
        assert_eq!(circuit.num_qubits(), 0);
        assert_eq!(circuit.num_clbits(), 0);
    }

    #[test]
    fn test_sparse_ids() {
        let mut circuit = Circuit::new("sparse");
        assert!(circuit.add_qubit_with_id(QubitId(7)));
        assert!(circuit.add_qubit_with_id(QubitId(2)));
        assert!(!circuit.add_qubit_with_id(QubitId(7)));
        assert_eq!(circuit.qubits(), &[QubitId(2), QubitId(7)]);
        assert_eq!(circuit.add_qubit(), QubitId(8));
    }

    #[test]
    fn test_fluent_api() {
        let mut circuit = Circuit::with_size("test", 2, 2);
        circuit
            .h(QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .measure(QubitId(0), ClbitId(0))
            .unwrap()
            .measure(QubitId(1), ClbitId(1))
            .unwrap();

        assert_eq!(circuit.depth(), 3);
        assert_eq!(circuit.count_ops()["measure"], 2);
    }

    #[test]
    fn test_feedforward_ops() {
        let mut circuit = Circuit::with_size("ff", 2, 3);
        circuit
            .measure(QubitId(0), ClbitId(0))
            .unwrap()
            .measure(QubitId(1), ClbitId(1))
            .unwrap()
            .parity([ClbitId(0), ClbitId(1)], false, ClbitId(2))
            .unwrap()
            .conditional(
                StandardGate::Z,
                [QubitId(1)],
                ClassicalCondition::is_set(ClbitId(2)),
            )
            .unwrap()
            .barrier_all()
            .unwrap()
            .reset(QubitId(0))
            .unwrap();

        let ops = circuit.count_ops();
        assert_eq!(ops["parity"], 1);
        assert_eq!(ops["z"], 1);
        assert_eq!(ops["barrier"], 1);
        assert_eq!(circuit.depth(), 5);
    }

    #[test]
    fn test_layers_and_sliced() {
        let mut circuit = Circuit::with_size("layers", 2, 0);
        circuit
            .h(QubitId(0))
            .unwrap()
            .t(QubitId(1))
            .unwrap()
            .cz(QubitId(0), QubitId(1))
            .unwrap()
            .h(QubitId(1))
            .unwrap();

        let layers = circuit.layers();
        assert_eq!(layers.len(), 3);
        assert_eq!(layers[0].len(), 2);

        let head = circuit.sliced(&layers[..2]).unwrap();
        assert_eq!(head.num_qubits(), 2);
        assert_eq!(head.num_ops(), 3);
        let tail = circuit.sliced(&layers[2..]).unwrap();
        assert_eq!(tail.num_ops(), 1);
    }

    #[test]
    fn test_append_adds_wires() {
        let mut first = Circuit::with_size("a", 1, 0);
        first.h(QubitId(0)).unwrap();

        let mut second = Circuit::new("b");
        second.add_qubit_with_id(QubitId(4));
        second.add_clbit_with_id(ClbitId(1));
        second.measure(QubitId(4), ClbitId(1)).unwrap();

        first.append(&second).unwrap();
        assert_eq!(first.qubits(), &[QubitId(0), QubitId(4)]);
        assert_eq!(first.clbits(), &[ClbitId(1)]);
        assert_eq!(first.num_ops(), 2);
    }

    #[test]
    fn test_renamed() {
        let mut circuit = Circuit::with_size("r", 2, 1);
        circuit
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .measure(QubitId(1), ClbitId(0))
            .unwrap();

        let map = BTreeMap::from([(QubitId(0), QubitId(5))]);
        let renamed = circuit.renamed(&map, 3).unwrap();
        assert_eq!(renamed.qubits(), &[QubitId(1), QubitId(5)]);
        assert_eq!(renamed.clbits(), &[ClbitId(3)]);
        let first = renamed.instructions().next().unwrap();
        assert_eq!(first.qubits, vec![QubitId(5), QubitId(1)]);
    }

    #[test]
    fn test_renamed_collision() {
        let circuit = Circuit::with_size("r", 2, 0);
        let map = BTreeMap::from([(QubitId(0), QubitId(1))]);
        assert!(matches!(
            circuit.renamed(&map, 0),
            Err(IrError::RenameCollision(QubitId(1)))
        ));
    }
}
