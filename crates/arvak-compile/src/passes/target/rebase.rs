//! Rebase into the gate set ZX diagrams are built from.

use arvak_ir::{CircuitDag, Instruction, InstructionKind, Phase, QubitId, StandardGate};

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::{BasisGates, PropertySet};

/// Rewrites every gate into {H, Rz, Rx, CX, CZ}.
///
/// The DAG is rebuilt in order so replacements land where the original gate
/// stood. Barriers pass through. Measurements, resets, classical parities
/// and conditioned gates have no diagram counterpart and are rejected.
pub struct RebaseToZx;

impl Pass for RebaseToZx {
    fn name(&self) -> &'static str {
        "RebaseToZx"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        let mut rebased = CircuitDag::new();
        for qubit in dag.qubits() {
            rebased.add_qubit(qubit);
        }
        for clbit in dag.clbits() {
            rebased.add_clbit(clbit);
        }
        rebased.set_level(dag.level());

        let mut out = Vec::new();
        for (_, inst) in dag.topological_ops() {
            match &inst.kind {
                InstructionKind::Barrier => out.push(inst.clone()),
                InstructionKind::Gate(gate) if !gate.is_conditional() => {
                    decompose(gate.kind, &inst.qubits, &mut out);
                }
                _ => {
                    return Err(CompileError::UnsupportedInstruction(
                        inst.name().to_string(),
                    ));
                }
            }
            for r in out.drain(..) {
                rebased.apply(r)?;
            }
        }

        *dag = rebased;
        if properties.basis_gates.is_none() {
            properties.basis_gates = Some(BasisGates::zx());
        }
        Ok(())
    }
}

fn rz(phase: Phase, q: QubitId) -> Instruction {
    Instruction::single_qubit_gate(StandardGate::Rz(phase.normalized()), q)
}

fn rx(phase: Phase, q: QubitId) -> Instruction {
    Instruction::single_qubit_gate(StandardGate::Rx(phase.normalized()), q)
}

fn h(q: QubitId) -> Instruction {
    Instruction::single_qubit_gate(StandardGate::H, q)
}

fn cx(c: QubitId, t: QubitId) -> Instruction {
    Instruction::two_qubit_gate(StandardGate::CX, c, t)
}

/// Append the ZX-basis decomposition of `gate` on `qubits` to `out`.
///
/// Decompositions hold up to global phase.
#[allow(clippy::too_many_lines)]
fn decompose(gate: StandardGate, qubits: &[QubitId], out: &mut Vec<Instruction>) {
    let q = |i: usize| qubits[i];
    let half = Phase::new(1, 2);
    let quarter = Phase::new(1, 4);

    match gate {
        StandardGate::I => {}
        StandardGate::H => out.push(h(q(0))),
        StandardGate::X => out.push(rx(Phase::pi(), q(0))),
        StandardGate::Y => {
            out.push(rz(Phase::pi(), q(0)));
            out.push(rx(Phase::pi(), q(0)));
        }
        StandardGate::Z => out.push(rz(Phase::pi(), q(0))),
        StandardGate::S => out.push(rz(half, q(0))),
        StandardGate::Sdg => out.push(rz(-half, q(0))),
        StandardGate::T => out.push(rz(quarter, q(0))),
        StandardGate::Tdg => out.push(rz(-quarter, q(0))),
        StandardGate::SX => out.push(rx(half, q(0))),
        StandardGate::SXdg => out.push(rx(-half, q(0))),
        StandardGate::Rx(theta) => out.push(rx(theta, q(0))),
        StandardGate::Rz(theta) => out.push(rz(theta, q(0))),
        StandardGate::Ry(theta) => {
            out.push(rz(-half, q(0)));
            out.push(rx(theta, q(0)));
            out.push(rz(half, q(0)));
        }
        StandardGate::CX => out.push(cx(q(0), q(1))),
        StandardGate::CZ => out.push(Instruction::two_qubit_gate(StandardGate::CZ, q(0), q(1))),
        StandardGate::CY => {
            out.push(rz(-half, q(1)));
            out.push(cx(q(0), q(1)));
            out.push(rz(half, q(1)));
        }
        StandardGate::CH => {
            let t = q(1);
            out.push(rz(half, t));
            out.push(h(t));
            out.push(rz(quarter, t));
            out.push(cx(q(0), t));
            out.push(rz(-quarter, t));
            out.push(h(t));
            out.push(rz(-half, t));
        }
        StandardGate::Swap => {
            out.push(cx(q(0), q(1)));
            out.push(cx(q(1), q(0)));
            out.push(cx(q(0), q(1)));
        }
        StandardGate::CRz(theta) => {
            out.push(rz(theta.half(), q(1)));
            out.push(cx(q(0), q(1)));
            out.push(rz(-theta.half(), q(1)));
            out.push(cx(q(0), q(1)));
        }
        StandardGate::CRx(theta) => {
            out.push(h(q(1)));
            decompose(StandardGate::CRz(theta), qubits, out);
            out.push(h(q(1)));
        }
        StandardGate::CRy(theta) => {
            decompose(StandardGate::Ry(theta.half()), &qubits[1..], out);
            out.push(cx(q(0), q(1)));
            decompose(StandardGate::Ry(-theta.half()), &qubits[1..], out);
            out.push(cx(q(0), q(1)));
        }
        StandardGate::CCX => {
            let (a, b, c) = (q(0), q(1), q(2));
            out.push(h(c));
            out.push(cx(b, c));
            out.push(rz(-quarter, c));
            out.push(cx(a, c));
            out.push(rz(quarter, c));
            out.push(cx(b, c));
            out.push(rz(-quarter, c));
            out.push(cx(a, c));
            out.push(rz(quarter, b));
            out.push(rz(quarter, c));
            out.push(h(c));
            out.push(cx(a, b));
            out.push(rz(quarter, a));
            out.push(rz(-quarter, b));
            out.push(cx(a, b));
        }
        StandardGate::CSwap => {
            let (c, t1, t2) = (q(0), q(1), q(2));
            out.push(cx(t2, t1));
            decompose(StandardGate::CCX, &[c, t1, t2], out);
            out.push(cx(t2, t1));
        }
    }
}
