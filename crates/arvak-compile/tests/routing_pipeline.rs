//! Integration tests for rebasing and routing through the pass manager.
//!
//! Pattern circuits carry measurements, barriers and classically
//! conditioned gates; routing must keep all of them attached to the
//! physical qubit their logical qubit currently occupies.

use arvak_compile::{CouplingMap, FinalLayout, Layout, PassManagerBuilder, PropertySet};
use arvak_ir::{Circuit, CircuitDag, ClassicalCondition, ClbitId, Phase, QubitId, StandardGate};
use proptest::prelude::*;

/// Helper: run a builder's pipeline on a circuit.
fn compile(circuit: Circuit, builder: PassManagerBuilder) -> (CircuitDag, PropertySet) {
    let (pm, mut props) = builder.build();
    let mut dag = circuit.into_dag();
    pm.run(&mut dag, &mut props).unwrap();
    (dag, props)
}

/// Helper: every two-qubit gate acts on coupled physical qubits.
fn respects(dag: &CircuitDag, map: &CouplingMap) -> bool {
    dag.topological_ops()
        .filter(|(_, inst)| inst.is_gate() && inst.qubits.len() == 2)
        .all(|(_, inst)| map.is_connected(inst.qubits[0].0, inst.qubits[1].0))
}

// ============================================================================
// Feed-forward survives routing
// ============================================================================

#[test]
fn test_barrier_and_conditions_follow_qubits() {
    let mut circuit = Circuit::with_size("pattern", 4, 2);
    circuit
        .cz(QubitId(0), QubitId(3))
        .unwrap()
        .measure(QubitId(0), ClbitId(0))
        .unwrap()
        .barrier_all()
        .unwrap()
        .conditional(
            StandardGate::Z,
            [QubitId(3)],
            ClassicalCondition::is_clear(ClbitId(0)),
        )
        .unwrap()
        .reset(QubitId(0))
        .unwrap();

    let map = CouplingMap::linear(4);
    let (dag, props) = compile(circuit, PassManagerBuilder::new().with_target(map.clone()));

    assert!(respects(&dag, &map));
    dag.verify_integrity().unwrap();

    let final_layout = &props.get::<FinalLayout>().unwrap().0;
    let moved = final_layout.get_physical(QubitId(0)).unwrap();

    let ops: Vec<_> = dag.topological_ops().map(|(_, i)| i.clone()).collect();
    let measure = ops.iter().find(|i| i.is_measure()).unwrap();
    assert_eq!(measure.qubits, vec![QubitId(moved)]);
    let barrier = ops.iter().find(|i| i.is_barrier()).unwrap();
    assert_eq!(barrier.qubits.len(), 4);
    assert_eq!(barrier.clbits.len(), 2);
}

// ============================================================================
// Pinned layouts
// ============================================================================

#[test]
fn test_pinned_inputs_stay_put() {
    let mut circuit = Circuit::with_size("seg", 3, 0);
    circuit.h(QubitId(0)).unwrap();
    circuit.cz(QubitId(1), QubitId(2)).unwrap();

    let mut pins = Layout::new();
    pins.add(QubitId(0), 4);
    pins.add(QubitId(1), 2);

    let (dag, props) = compile(
        circuit,
        PassManagerBuilder::new()
            .with_target(CouplingMap::grid(2, 3))
            .with_layout(pins),
    );

    let initial = props.layout.as_ref().unwrap();
    assert_eq!(initial.get_physical(QubitId(0)), Some(4));
    assert_eq!(initial.get_physical(QubitId(1)), Some(2));
    assert_eq!(initial.get_physical(QubitId(2)), Some(0));

    let first = dag.topological_ops().next().unwrap().1;
    assert_eq!(first.qubits, vec![QubitId(4)]);
}

// ============================================================================
// Rebase + route on random circuits
// ============================================================================

fn gate_strategy() -> impl Strategy<Value = (u8, u32, u32)> {
    (0u8..6, 0u32..5, 0u32..5).prop_filter("distinct", |(_, a, b)| a != b)
}

proptest! {
    #[test]
    fn routed_circuits_respect_coupling(gates in prop::collection::vec(gate_strategy(), 1..25)) {
        let mut circuit = Circuit::with_size("rand", 5, 0);
        for (kind, a, b) in gates {
            let (a, b) = (QubitId(a), QubitId(b));
            let applied = match kind {
                0 => circuit.cx(a, b),
                1 => circuit.cz(a, b),
                2 => circuit.swap(a, b),
                3 => circuit.t(a),
                4 => circuit.crz(Phase::new(1, 4), a, b),
                _ => circuit.ry(Phase::new(1, 3), a),
            };
            applied.unwrap();
        }

        let map = CouplingMap::star(5);
        let (dag, props) = compile(
            circuit,
            PassManagerBuilder::new().with_rebase().with_target(map.clone()),
        );

        prop_assert!(respects(&dag, &map));
        prop_assert!(dag
            .topological_ops()
            .all(|(_, i)| matches!(i.name(), "h" | "rz" | "rx" | "cx" | "cz" | "swap")));
        let final_layout = &props.get::<FinalLayout>().unwrap().0;
        prop_assert_eq!(final_layout.len(), 5);
    }
}
