//! Property tests for circuit layering.

use arvak_ir::{Circuit, Phase, QubitId};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    H(u32),
    T(u32),
    Rz(u32, i64),
    Cz(u32, u32),
    Cx(u32, u32),
}

fn op_strategy(n: u32) -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..n).prop_map(Op::H),
        (0..n).prop_map(Op::T),
        (0..n, 1i64..8).prop_map(|(q, k)| Op::Rz(q, k)),
        (0..n, 0..n)
            .prop_filter("distinct", |(a, b)| a != b)
            .prop_map(|(a, b)| Op::Cz(a, b)),
        (0..n, 0..n)
            .prop_filter("distinct", |(a, b)| a != b)
            .prop_map(|(a, b)| Op::Cx(a, b)),
    ]
}

fn build(n: u32, ops: &[Op]) -> Circuit {
    let mut circuit = Circuit::with_size("prop", n, 0);
    for op in ops {
        let applied = match *op {
            Op::H(q) => circuit.h(QubitId(q)),
            Op::T(q) => circuit.t(QubitId(q)),
            Op::Rz(q, k) => circuit.rz(Phase::new(k, 4), QubitId(q)),
            Op::Cz(a, b) => circuit.cz(QubitId(a), QubitId(b)),
            Op::Cx(a, b) => circuit.cx(QubitId(a), QubitId(b)),
        };
        applied.unwrap();
    }
    circuit
}

proptest! {
    #[test]
    fn layers_cover_every_op(ops in prop::collection::vec(op_strategy(4), 0..40)) {
        let circuit = build(4, &ops);
        let layers = circuit.layers();
        let total: usize = layers.iter().map(Vec::len).sum();
        prop_assert_eq!(total, ops.len());
        prop_assert_eq!(layers.len(), circuit.depth());
        prop_assert!(layers.iter().all(|l| !l.is_empty()));
    }

    #[test]
    fn layers_touch_each_qubit_once(ops in prop::collection::vec(op_strategy(5), 1..40)) {
        let circuit = build(5, &ops);
        for layer in circuit.layers() {
            let mut seen = std::collections::BTreeSet::new();
            for inst in &layer {
                for q in &inst.qubits {
                    prop_assert!(seen.insert(*q));
                }
            }
        }
    }

    #[test]
    fn sliced_layers_rebuild_the_circuit(
        ops in prop::collection::vec(op_strategy(3), 1..30),
        cut in 0usize..30,
    ) {
        let circuit = build(3, &ops);
        let layers = circuit.layers();
        let cut = cut.min(layers.len());

        let mut joined = circuit.sliced(&layers[..cut]).unwrap();
        joined.append(&circuit.sliced(&layers[cut..]).unwrap()).unwrap();

        prop_assert_eq!(joined.layers(), layers);
        joined.dag().verify_integrity().unwrap();
    }
}
