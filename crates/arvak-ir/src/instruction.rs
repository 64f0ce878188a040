//! Circuit instructions combining gates with operands.

use serde::{Deserialize, Serialize};

use crate::gate::{ClassicalCondition, Gate, StandardGate};
use crate::qubit::{ClbitId, QubitId};

/// The kind of instruction in a circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstructionKind {
    /// A quantum gate operation, possibly classically conditioned.
    Gate(Gate),
    /// Measurement operation.
    Measure,
    /// Reset qubit to |0⟩.
    Reset,
    /// Barrier (synchronization point) over qubits and classical bits.
    Barrier,
    /// Classical exclusive-or.
    ///
    /// Reads every clbit but the last and writes their parity, flipped when
    /// `negate` is set, into the last one.
    ClassicalParity {
        /// Flip the computed parity.
        negate: bool,
    },
}

/// A complete instruction with operands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    /// The kind of instruction.
    pub kind: InstructionKind,
    /// Qubits this instruction operates on.
    pub qubits: Vec<QubitId>,
    /// Classical bits this instruction reads or writes.
    ///
    /// A conditioned gate lists its condition bit here so that the DAG
    /// orders it after the operation producing that bit.
    pub clbits: Vec<ClbitId>,
}

impl Instruction {
    /// Create a gate instruction.
    pub fn gate(gate: impl Into<Gate>, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        let gate = gate.into();
        let clbits = gate.condition.map(|c| vec![c.clbit]).unwrap_or_default();
        Self {
            kind: InstructionKind::Gate(gate),
            qubits: qubits.into_iter().collect(),
            clbits,
        }
    }

    /// Create a single-qubit gate instruction.
    pub fn single_qubit_gate(gate: StandardGate, qubit: QubitId) -> Self {
        Self::gate(gate, [qubit])
    }

    /// Create a two-qubit gate instruction.
    pub fn two_qubit_gate(gate: StandardGate, q1: QubitId, q2: QubitId) -> Self {
        Self::gate(gate, [q1, q2])
    }

    /// Create a classically conditioned gate instruction.
    pub fn conditional(
        gate: StandardGate,
        qubits: impl IntoIterator<Item = QubitId>,
        condition: ClassicalCondition,
    ) -> Self {
        Self::gate(Gate::standard(gate).with_condition(condition), qubits)
    }

    /// Create a measurement instruction.
    pub fn measure(qubit: QubitId, clbit: ClbitId) -> Self {
        Self {
            kind: InstructionKind::Measure,
            qubits: vec![qubit],
            clbits: vec![clbit],
        }
    }

    /// Create a reset instruction.
    pub fn reset(qubit: QubitId) -> Self {
        Self {
            kind: InstructionKind::Reset,
            qubits: vec![qubit],
            clbits: vec![],
        }
    }

    /// Create a barrier instruction.
    pub fn barrier(
        qubits: impl IntoIterator<Item = QubitId>,
        clbits: impl IntoIterator<Item = ClbitId>,
    ) -> Self {
        Self {
            kind: InstructionKind::Barrier,
            qubits: qubits.into_iter().collect(),
            clbits: clbits.into_iter().collect(),
        }
    }

    /// Create a classical parity writing `XOR(sources) ^ negate` into `target`.
    pub fn parity(
        sources: impl IntoIterator<Item = ClbitId>,
        negate: bool,
        target: ClbitId,
    ) -> Self {
        let mut clbits: Vec<_> = sources.into_iter().collect();
        clbits.push(target);
        Self {
            kind: InstructionKind::ClassicalParity { negate },
            qubits: vec![],
            clbits,
        }
    }

    /// Check if this is a gate instruction.
    pub fn is_gate(&self) -> bool {
        matches!(self.kind, InstructionKind::Gate(_))
    }

    /// Check if this is a classically conditioned gate.
    pub fn is_conditional(&self) -> bool {
        matches!(&self.kind, InstructionKind::Gate(g) if g.is_conditional())
    }

    /// Check if this is a measurement.
    pub fn is_measure(&self) -> bool {
        matches!(self.kind, InstructionKind::Measure)
    }

    /// Check if this is a reset.
    pub fn is_reset(&self) -> bool {
        matches!(self.kind, InstructionKind::Reset)
    }

    /// Check if this is a barrier.
    pub fn is_barrier(&self) -> bool {
        matches!(self.kind, InstructionKind::Barrier)
    }

    /// Check if this is a classical parity.
    pub fn is_parity(&self) -> bool {
        matches!(self.kind, InstructionKind::ClassicalParity { .. })
    }

    /// Get the gate if this is a gate instruction.
    pub fn as_gate(&self) -> Option<&Gate> {
        match &self.kind {
            InstructionKind::Gate(g) => Some(g),
            _ => None,
        }
    }

    /// Get the standard gate if this is an unconditioned gate instruction.
    pub fn as_unconditional(&self) -> Option<StandardGate> {
        match &self.kind {
            InstructionKind::Gate(g) if !g.is_conditional() => Some(g.kind),
            _ => None,
        }
    }

    /// Get the name of the instruction.
    pub fn name(&self) -> &str {
        match &self.kind {
            InstructionKind::Gate(g) => g.name(),
            InstructionKind::Measure => "measure",
            InstructionKind::Reset => "reset",
            InstructionKind::Barrier => "barrier",
            InstructionKind::ClassicalParity { .. } => "parity",
        }
    }

    /// Copy of this instruction with qubits mapped and clbits shifted.
    #[must_use]
    pub fn remapped(&self, qubit_map: impl Fn(QubitId) -> QubitId, clbit_offset: u32) -> Self {
        let kind = match &self.kind {
            InstructionKind::Gate(g) => InstructionKind::Gate(Gate {
                kind: g.kind,
                condition: g.condition.map(|c| ClassicalCondition {
                    clbit: c.clbit.offset(clbit_offset),
                    value: c.value,
                }),
            }),
            other => other.clone(),
        };
        Self {
            kind,
            qubits: self.qubits.iter().map(|&q| qubit_map(q)).collect(),
            clbits: self
                .clbits
                .iter()
                .map(|c| c.offset(clbit_offset))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_instruction() {
        let inst = Instruction::single_qubit_gate(StandardGate::H, QubitId(0));
        assert!(inst.is_gate());
        assert_eq!(inst.qubits.len(), 1);
        assert!(inst.clbits.is_empty());
        assert_eq!(inst.name(), "h");
    }

    #[test]
    fn test_conditional_instruction_carries_bit() {
        let inst = Instruction::conditional(
            StandardGate::X,
            [QubitId(2)],
            ClassicalCondition::is_set(ClbitId(4)),
        );
        assert!(inst.is_conditional());
        assert_eq!(inst.clbits, vec![ClbitId(4)]);
        assert_eq!(inst.as_unconditional(), None);
    }

    #[test]
    fn test_barrier_instruction() {
        let inst = Instruction::barrier([QubitId(0), QubitId(1)], [ClbitId(0)]);
        assert!(inst.is_barrier());
        assert_eq!(inst.qubits.len(), 2);
        assert_eq!(inst.clbits.len(), 1);
    }

    #[test]
    fn test_parity_layout() {
        let inst = Instruction::parity([ClbitId(0), ClbitId(2)], true, ClbitId(7));
        assert!(inst.is_parity());
        assert_eq!(inst.clbits, vec![ClbitId(0), ClbitId(2), ClbitId(7)]);
        assert_eq!(inst.name(), "parity");
    }

    #[test]
    fn test_remapped_shifts_condition() {
        let inst = Instruction::conditional(
            StandardGate::Z,
            [QubitId(1)],
            ClassicalCondition::is_clear(ClbitId(0)),
        );
        let moved = inst.remapped(|q| QubitId(q.0 + 10), 5);
        assert_eq!(moved.qubits, vec![QubitId(11)]);
        assert_eq!(moved.clbits, vec![ClbitId(5)]);
        let cond = moved.as_gate().and_then(|g| g.condition);
        assert_eq!(cond, Some(ClassicalCondition::is_clear(ClbitId(5))));
    }

    #[test]
    fn test_serde_roundtrip() {
        let inst = Instruction::conditional(
            StandardGate::Rx(crate::phase::Phase::new(3, 4)),
            [QubitId(0)],
            ClassicalCondition::is_set(ClbitId(1)),
        );
        let json = serde_json::to_string(&inst).unwrap();
        let back: Instruction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, inst);
    }
}
