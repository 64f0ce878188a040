//! Joining segment patterns into one pattern.
//!
//! Segment `i` continues where segment `i - 1` stopped: the qubit holding
//! the input role of circuit qubit `k` in segment `i` is identified with
//! the qubit that held the output role of `k` in segment `i - 1`. All
//! other qubits are ancillas and are recycled where possible.

use std::collections::{BTreeMap, BTreeSet};

use arvak_compile::{CompileError, CouplingMap, FinalLayout, Layout, PassManagerBuilder};
use arvak_ir::{Circuit, QubitId};
use tracing::{debug, warn};

use crate::error::{MbqcError, MbqcResult};
use crate::io_map::{IoMap, Role};
use crate::pattern::Pattern;

fn next_qubit(circuit: &Circuit) -> u32 {
    circuit.qubits().iter().map(|q| q.0 + 1).max().unwrap_or(0)
}

fn next_clbit(circuit: &Circuit) -> u32 {
    circuit.clbits().iter().map(|c| c.0 + 1).max().unwrap_or(0)
}

/// Concatenate segment patterns on logical qubits.
///
/// Ancillas of segment `i` take over the ancillas of segment `i - 1` in
/// ascending order; any left over get fresh ids above every qubit placed
/// so far. Bits of each segment are shifted past the bits already used.
pub fn stitch(segments: &[Pattern]) -> MbqcResult<Pattern> {
    let Some((first, rest)) = segments.split_first() else {
        return Ok(Pattern::empty());
    };

    let mut circuit = first.circuit.clone();
    let mut outputs = first.io_map.outputs.clone();
    let mut previous: BTreeSet<QubitId> = first.circuit.qubits().iter().copied().collect();

    for (i, segment) in rest.iter().enumerate() {
        let mut rename = BTreeMap::new();
        for (q, &held) in &segment.io_map.inputs {
            if let Some(&prior) = outputs.get(q) {
                rename.insert(held, prior);
            }
        }

        let taken: BTreeSet<QubitId> = rename.values().copied().collect();
        let mut recycled = previous.iter().filter(|q| !taken.contains(q)).copied();
        let ancillas: Vec<QubitId> = segment
            .circuit
            .qubits()
            .iter()
            .filter(|q| !rename.contains_key(q))
            .copied()
            .collect();
        let mut fresh = next_qubit(&circuit);
        for ancilla in ancillas {
            let target = recycled.next().unwrap_or_else(|| {
                fresh += 1;
                QubitId(fresh - 1)
            });
            rename.insert(ancilla, target);
        }

        let renamed = segment.circuit.renamed(&rename, next_clbit(&circuit))?;
        circuit.append(&renamed)?;
        outputs = segment
            .io_map
            .outputs
            .iter()
            .map(|(&q, held)| (q, rename.get(held).copied().unwrap_or(*held)))
            .collect();
        previous = renamed.qubits().iter().copied().collect();
        debug!(
            "Stitched segment {} onto {} qubits",
            i + 1,
            circuit.num_qubits()
        );
    }

    Ok(Pattern {
        circuit: circuit.with_name("stitched"),
        io_map: IoMap {
            inputs: first.io_map.inputs.clone(),
            outputs,
        },
    })
}

/// Concatenate segment patterns placed and routed on `coupling_map`.
///
/// Each segment's input roles are pinned to the physical qubits holding
/// the previous segment's outputs before routing. A fully connected map
/// needs no routing and falls back to [`stitch`].
pub fn stitch_routed(segments: &[Pattern], coupling_map: &CouplingMap) -> MbqcResult<Pattern> {
    if coupling_map.is_fully_connected() {
        warn!("Coupling map is fully connected; stitching without routing");
        return stitch(segments);
    }
    let Some((first, rest)) = segments.split_first() else {
        return Ok(Pattern::empty());
    };

    let routed = route(&first.circuit, coupling_map, None)?;
    let inputs = place(&first.io_map.inputs, &routed.initial, Role::Input)?;
    let mut outputs = place(&first.io_map.outputs, &routed.last, Role::Output)?;
    let mut circuit = routed.circuit;

    for (i, segment) in rest.iter().enumerate() {
        let mut pins = Layout::new();
        for (q, &held) in &segment.io_map.inputs {
            if let Some(prior) = outputs.get(q) {
                pins.add(held, prior.0);
            }
        }

        let routed = route(&segment.circuit, coupling_map, Some(pins))?;
        let shifted = routed.circuit.renamed(&BTreeMap::new(), next_clbit(&circuit))?;
        circuit.append(&shifted)?;
        outputs = place(&segment.io_map.outputs, &routed.last, Role::Output)?;
        debug!("Routed and stitched segment {}", i + 1);
    }

    Ok(Pattern {
        circuit: circuit.with_name("stitched"),
        io_map: IoMap { inputs, outputs },
    })
}

struct Routed {
    circuit: Circuit,
    initial: Layout,
    last: Layout,
}

fn route(circuit: &Circuit, coupling_map: &CouplingMap, pins: Option<Layout>) -> MbqcResult<Routed> {
    let mut builder = PassManagerBuilder::new().with_target(coupling_map.clone());
    if let Some(pins) = pins {
        builder = builder.with_layout(pins);
    }
    let (pm, mut props) = builder.build();

    let mut dag = circuit.clone().into_dag();
    pm.run(&mut dag, &mut props)?;

    let initial = props.layout.clone().ok_or(CompileError::MissingLayout)?;
    let last = props
        .get::<FinalLayout>()
        .map(|f| f.0.clone())
        .ok_or(CompileError::MissingLayout)?;
    Ok(Routed {
        circuit: Circuit::from_dag(dag).with_name(circuit.name()),
        initial,
        last,
    })
}

/// Replace logical holders by the physical qubits `layout` assigns them.
fn place(
    side: &BTreeMap<QubitId, QubitId>,
    layout: &Layout,
    role: Role,
) -> MbqcResult<BTreeMap<QubitId, QubitId>> {
    side.iter()
        .map(|(&q, &held)| {
            layout
                .get_physical(held)
                .map(|p| (q, QubitId(p)))
                .ok_or(MbqcError::InconsistentIoMap {
                    role,
                    vertex: held.index(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A segment on `n` qubits where qubit `k` holds both roles of `k`,
    /// plus the given ancillas, each measured once.
    fn segment(n: u32, ancillas: &[u32]) -> Pattern {
        let total = n + u32::try_from(ancillas.len()).unwrap();
        let mut circuit = Circuit::with_size("seg", total, 0);
        for &a in ancillas {
            let c = circuit.add_clbit();
            circuit.h(QubitId(a)).unwrap().measure(QubitId(a), c).unwrap();
        }
        let mut io_map = IoMap::new();
        for k in 0..n {
            io_map.insert(Role::Input, QubitId(k), QubitId(k));
            io_map.insert(Role::Output, QubitId(k), QubitId(k));
        }
        Pattern { circuit, io_map }
    }

    #[test]
    fn test_single_segment_is_unchanged() {
        let seg = segment(2, &[2]);
        let stitched = stitch(std::slice::from_ref(&seg)).unwrap();
        assert_eq!(stitched.io_map, seg.io_map);
        assert_eq!(stitched.circuit.num_ops(), seg.circuit.num_ops());
    }

    #[test]
    fn test_roles_chain_through_segments() {
        let mut first = segment(2, &[2]);
        // qubit 1's output moved onto ancilla 2
        first.io_map.insert(Role::Output, QubitId(1), QubitId(2));
        let second = segment(2, &[2, 3]);

        let stitched = stitch(&[first.clone(), second]).unwrap();
        assert_eq!(stitched.io_map.inputs, first.io_map.inputs);
        // second's 0 -> 0, 1 -> 2, ancillas 2 -> 1 (recycled), 3 -> 3 (fresh)
        assert_eq!(stitched.io_map.get(Role::Output, QubitId(0)), Some(QubitId(0)));
        assert_eq!(stitched.io_map.get(Role::Output, QubitId(1)), Some(QubitId(2)));
        assert_eq!(stitched.circuit.num_qubits(), 4);
        assert!(stitched.io_map.outputs_distinct());
    }

    #[test]
    fn test_bits_are_shifted() {
        let stitched = stitch(&[segment(1, &[1]), segment(1, &[1]), segment(1, &[1])]).unwrap();
        let bits: Vec<u32> = stitched
            .circuit
            .instructions()
            .filter(|i| i.is_measure())
            .map(|i| i.clbits[0].0)
            .collect();
        assert_eq!(bits, vec![0, 1, 2]);
        assert_eq!(stitched.circuit.num_qubits(), 2);
    }

    #[test]
    fn test_empty_input() {
        let stitched = stitch(&[]).unwrap();
        assert!(stitched.io_map.is_empty());
        assert_eq!(stitched.circuit.num_ops(), 0);
    }

    #[test]
    fn test_full_map_falls_back() {
        let segs = [segment(2, &[2]), segment(2, &[2])];
        let routed = stitch_routed(&segs, &CouplingMap::full(3)).unwrap();
        let plain = stitch(&segs).unwrap();
        assert_eq!(routed.io_map, plain.io_map);
    }

    #[test]
    fn test_routed_outputs_are_physical() {
        let mut first = segment(2, &[2]);
        first.circuit.cz(QubitId(0), QubitId(2)).unwrap();
        let segs = [first, segment(2, &[2])];

        let stitched = stitch_routed(&segs, &CouplingMap::linear(3)).unwrap();
        assert_eq!(stitched.io_map.len(), 2);
        assert!(stitched.io_map.outputs_distinct());
        assert!(stitched.io_map.outputs.values().all(|q| q.0 < 3));
        assert_eq!(stitched.circuit.count_ops().get("measure"), Some(&2));
    }
}
