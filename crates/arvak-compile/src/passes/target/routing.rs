//! Routing passes for inserting SWAP gates.

use arvak_ir::{CircuitDag, CircuitLevel, Instruction, QubitId, StandardGate};
use tracing::debug;

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::{CouplingMap, FinalLayout, Layout, PropertySet};

/// Greedy SWAP routing.
///
/// Walks the operations in order. Before a two-qubit gate whose operands
/// are not adjacent, the first operand is moved along a shortest path with
/// SWAPs until it neighbours the second. The DAG is rebuilt on physical
/// qubit ids (`QubitId(p)` for physical qubit `p`); measurements, resets,
/// barriers and conditioned gates follow their qubits. The layout in the
/// property set is left as the initial layout and the layout after routing
/// is stored as a [`FinalLayout`].
pub struct SwapRouting;

impl Pass for SwapRouting {
    fn name(&self) -> &'static str {
        "SwapRouting"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        let coupling_map = properties
            .coupling_map
            .as_ref()
            .ok_or(CompileError::MissingCouplingMap)?;
        let mut layout = properties
            .layout
            .clone()
            .ok_or(CompileError::MissingLayout)?;

        let mut routed = CircuitDag::new();
        for q in dag.qubits() {
            let p = layout.get_physical(q).ok_or(CompileError::MissingLayout)?;
            routed.add_qubit(QubitId(p));
        }
        for c in dag.clbits() {
            routed.add_clbit(c);
        }

        let mut swaps = 0usize;
        for (_, inst) in dag.topological_ops() {
            if inst.is_gate() && inst.qubits.len() > 2 {
                let p0 = physical(&layout, inst.qubits[0])?;
                let p1 = physical(&layout, inst.qubits[1])?;
                return Err(CompileError::RoutingFailed {
                    qubit1: p0,
                    qubit2: p1,
                });
            }

            if inst.is_gate() && inst.qubits.len() == 2 {
                swaps += bring_together(
                    coupling_map,
                    &mut layout,
                    &mut routed,
                    inst.qubits[0],
                    inst.qubits[1],
                )?;
            }

            let mapped = inst.remapped(|q| QubitId(layout.get_physical(q).unwrap_or(q.0)), 0);
            routed.apply(mapped)?;
        }

        debug!("Inserted {swaps} SWAPs");
        routed.set_level(CircuitLevel::Physical);
        *dag = routed;
        properties.insert(FinalLayout(layout));
        Ok(())
    }

    fn should_run(&self, _dag: &CircuitDag, properties: &PropertySet) -> bool {
        properties.coupling_map.is_some() && properties.layout.is_some()
    }
}

fn physical(layout: &Layout, qubit: QubitId) -> CompileResult<u32> {
    layout.get_physical(qubit).ok_or(CompileError::MissingLayout)
}

/// Emit SWAPs moving `moving` next to `anchor`; returns how many were added.
fn bring_together(
    coupling_map: &CouplingMap,
    layout: &mut Layout,
    routed: &mut CircuitDag,
    moving: QubitId,
    anchor: QubitId,
) -> CompileResult<usize> {
    let p0 = physical(layout, moving)?;
    let p1 = physical(layout, anchor)?;
    if coupling_map.is_connected(p0, p1) {
        return Ok(0);
    }

    let path = coupling_map
        .shortest_path(p0, p1)
        .ok_or(CompileError::RoutingFailed {
            qubit1: p0,
            qubit2: p1,
        })?;

    let hops = path.len().saturating_sub(2);
    for step in path.windows(2).take(hops) {
        let (a, b) = (step[0], step[1]);
        routed.add_qubit(QubitId(b));
        routed.apply(Instruction::two_qubit_gate(
            StandardGate::Swap,
            QubitId(a),
            QubitId(b),
        ))?;
        layout.swap(a, b);
    }
    Ok(hops)
}
