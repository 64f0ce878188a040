//! Benchmarks for circuit to pattern conversion
//!
//! Run with: cargo bench -p arvak-mbqc

use arvak_ir::{Circuit, QubitId};
use arvak_mbqc::{MPattern, Strategy, entangle};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

/// A brickwork circuit with a T layer between entangling layers.
fn brickwork(n: u32, depth: u32) -> Circuit {
    let mut circuit = Circuit::with_size("brickwork", n, 0);
    for layer in 0..depth {
        for q in 0..n {
            circuit.h(QubitId(q)).unwrap();
            circuit.t(QubitId(q)).unwrap();
        }
        for q in ((layer % 2)..n.saturating_sub(1)).step_by(2) {
            circuit.cx(QubitId(q), QubitId(q + 1)).unwrap();
        }
    }
    circuit
}

fn bench_single_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_conversion");
    group.sample_size(20);

    for num_qubits in &[3, 5, 8] {
        let mpattern = MPattern::new(brickwork(*num_qubits, 4));
        group.bench_with_input(
            BenchmarkId::new("brickwork", num_qubits),
            &mpattern,
            |b, mpattern| {
                b.iter(|| black_box(mpattern.single_conversion().unwrap()));
            },
        );
    }

    group.finish();
}

fn bench_segmented(c: &mut Criterion) {
    let mut group = c.benchmark_group("segmented");
    group.sample_size(20);

    let circuit = brickwork(6, 8);
    for parallel in [false, true] {
        let mpattern = MPattern::new(circuit.clone()).with_parallel(parallel);
        group.bench_with_input(
            BenchmarkId::new("four_segments", if parallel { "rayon" } else { "sequential" }),
            &mpattern,
            |b, mpattern| {
                b.iter(|| black_box(mpattern.unrouted_conversion(4, Strategy::Gates).unwrap()));
            },
        );
    }

    group.finish();
}

fn bench_entangle(c: &mut Criterion) {
    let (diagram, _) = MPattern::new(brickwork(10, 6)).zx_diagram().unwrap();
    c.bench_function("entangle_10x6", |b| {
        b.iter(|| black_box(entangle(&diagram)));
    });
}

criterion_group!(benches, bench_single_conversion, bench_segmented, bench_entangle);

criterion_main!(benches);
