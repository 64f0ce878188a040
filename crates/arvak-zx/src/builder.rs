//! Diagram construction from rebased circuits.

use arvak_ir::{Circuit, Phase, QubitId, StandardGate};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::diagram::{Diagram, EdgeKind, VertexId, VertexKind};
use crate::error::{ZxError, ZxResult};

/// Open end of a qubit line while the diagram is being drawn.
struct Wire {
    line: u32,
    last: VertexId,
    pending: EdgeKind,
    row: u32,
}

impl Diagram {
    /// Build a diagram from a circuit over {H, Rz, Rx, CX, CZ}.
    ///
    /// Input boundaries come first, one per qubit in ascending order, then
    /// one spider per gate, then the output boundaries. Hadamards are not
    /// vertices: each one toggles the kind of the next edge on its line.
    /// Barriers are skipped.
    pub fn from_circuit(circuit: &Circuit) -> ZxResult<Diagram> {
        let mut diagram = Diagram::new();
        let mut wires: FxHashMap<QubitId, Wire> = FxHashMap::default();
        let mut inputs = Vec::with_capacity(circuit.num_qubits());

        for (line, &qubit) in (0u32..).zip(circuit.qubits()) {
            let v = diagram.add_vertex(VertexKind::Boundary, Phase::zero());
            diagram.set_qubit(v, Some(line));
            inputs.push(v);
            wires.insert(
                qubit,
                Wire {
                    line,
                    last: v,
                    pending: EdgeKind::Simple,
                    row: 0,
                },
            );
        }

        for inst in circuit.instructions() {
            if inst.is_barrier() {
                continue;
            }
            let Some(gate) = inst.as_unconditional() else {
                return Err(ZxError::UnsupportedGate(inst.name().to_string()));
            };

            match gate {
                StandardGate::H => {
                    let wire = wire_mut(&mut wires, inst.qubits[0])?;
                    wire.pending = wire.pending.toggled();
                }
                StandardGate::Rz(theta) => {
                    let wire = wire_mut(&mut wires, inst.qubits[0])?;
                    let row = wire.row + 1;
                    diagram.extend(wire, VertexKind::Z, theta, row);
                }
                StandardGate::Rx(theta) => {
                    let wire = wire_mut(&mut wires, inst.qubits[0])?;
                    let row = wire.row + 1;
                    diagram.extend(wire, VertexKind::X, theta, row);
                }
                StandardGate::CX | StandardGate::CZ => {
                    let (first, second) = (inst.qubits[0], inst.qubits[1]);
                    let first_row = wire_mut(&mut wires, first)?.row;
                    let second_row = wire_mut(&mut wires, second)?.row;
                    let row = first_row.max(second_row) + 1;
                    let (kind, edge) = if gate == StandardGate::CX {
                        (VertexKind::X, EdgeKind::Simple)
                    } else {
                        (VertexKind::Z, EdgeKind::Hadamard)
                    };
                    let a = diagram.extend(
                        wire_mut(&mut wires, first)?,
                        VertexKind::Z,
                        Phase::zero(),
                        row,
                    );
                    let b = diagram.extend(wire_mut(&mut wires, second)?, kind, Phase::zero(), row);
                    diagram.add_edge(a, b, edge);
                }
                other => return Err(ZxError::UnsupportedGate(other.name().to_string())),
            }
        }

        let last_row = wires.values().map(|w| w.row).max().unwrap_or(0) + 1;
        let mut outputs = Vec::with_capacity(inputs.len());
        for &qubit in circuit.qubits() {
            let wire = wire_mut(&mut wires, qubit)?;
            outputs.push(diagram.extend(wire, VertexKind::Boundary, Phase::zero(), last_row));
        }

        diagram.set_inputs(inputs);
        diagram.set_outputs(outputs);
        debug!(
            "Built diagram with {} vertices and {} edges from {} ops",
            diagram.num_vertices(),
            diagram.num_edges(),
            circuit.num_ops()
        );
        Ok(diagram)
    }

    /// Append a vertex to the open end of `wire`.
    fn extend(&mut self, wire: &mut Wire, kind: VertexKind, phase: Phase, row: u32) -> VertexId {
        let v = self.add_vertex(kind, phase);
        self.set_qubit(v, Some(wire.line));
        self.set_row(v, row);
        self.add_edge(wire.last, v, wire.pending);
        wire.last = v;
        wire.pending = EdgeKind::Simple;
        wire.row = row;
        v
    }
}

fn wire_mut(wires: &mut FxHashMap<QubitId, Wire>, qubit: QubitId) -> ZxResult<&mut Wire> {
    wires.get_mut(&qubit).ok_or(ZxError::QubitNotFound(qubit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_rotation() {
        let mut circuit = Circuit::with_size("rz", 1, 0);
        circuit.rz(Phase::new(1, 4), QubitId(0)).unwrap();

        let d = Diagram::from_circuit(&circuit).unwrap();
        assert_eq!(d.vertices(), vec![0, 1, 2]);
        assert_eq!(d.inputs(), [0]);
        assert_eq!(d.outputs(), [2]);
        assert_eq!(d.kind(1), Some(VertexKind::Z));
        assert_eq!(d.phase(1), Phase::new(1, 4));
        assert_eq!(
            d.edges(),
            vec![(0, 1, EdgeKind::Simple), (1, 2, EdgeKind::Simple)]
        );
    }

    #[test]
    fn test_hadamard_toggles_next_edge() {
        let mut circuit = Circuit::with_size("hh", 1, 0);
        circuit.h(QubitId(0)).unwrap();
        circuit.rx(Phase::new(1, 2), QubitId(0)).unwrap();
        circuit.h(QubitId(0)).unwrap();
        circuit.h(QubitId(0)).unwrap();
        circuit.h(QubitId(0)).unwrap();

        let d = Diagram::from_circuit(&circuit).unwrap();
        assert_eq!(d.kind(1), Some(VertexKind::X));
        assert_eq!(
            d.edges(),
            vec![(0, 1, EdgeKind::Hadamard), (1, 2, EdgeKind::Hadamard)]
        );
    }

    #[test]
    fn test_two_qubit_gates() {
        let mut circuit = Circuit::with_size("ent", 2, 0);
        circuit.cz(QubitId(1), QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();

        let d = Diagram::from_circuit(&circuit).unwrap();
        // inputs 0,1; cz spiders 2 (q1), 3 (q0); cx spiders 4 (q0), 5 (q1)
        assert_eq!(d.num_vertices(), 8);
        assert_eq!(d.qubit(2), Some(1));
        assert_eq!(d.edge(2, 3), Some(EdgeKind::Hadamard));
        assert_eq!(d.kind(4), Some(VertexKind::Z));
        assert_eq!(d.kind(5), Some(VertexKind::X));
        assert_eq!(d.edge(4, 5), Some(EdgeKind::Simple));
        assert_eq!(d.row(4), 2);
        assert_eq!(d.outputs(), [6, 7]);
        assert_eq!(d.row(6), 3);
    }

    #[test]
    fn test_barriers_are_skipped() {
        let mut circuit = Circuit::with_size("b", 2, 0);
        circuit.barrier_all().unwrap();
        let d = Diagram::from_circuit(&circuit).unwrap();
        assert_eq!(
            d.edges(),
            vec![(0, 2, EdgeKind::Simple), (1, 3, EdgeKind::Simple)]
        );
    }

    #[test]
    fn test_rejects_non_basis_gates() {
        let mut circuit = Circuit::with_size("t", 1, 0);
        circuit.t(QubitId(0)).unwrap();
        let err = Diagram::from_circuit(&circuit).unwrap_err();
        assert!(matches!(err, ZxError::UnsupportedGate(name) if name == "t"));
    }
}
