use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

use lqcd_lattice::{BoundaryKind, Lattice, LatticeShape};
use lqcd_mcmc::{build_algorithm, AlgorithmKind, SweepBackend};

const PERIODIC: [BoundaryKind; 4] = [BoundaryKind::Periodic; 4];

fn bench_sweeps(c: &mut Criterion) {
    let shape = LatticeShape::new([4, 4, 4, 4]).unwrap();
    let field = Lattice::cold_start(shape, PERIODIC, 5.5);

    let mut group = c.benchmark_group("sweep");
    for (label, kind) in [
        ("heatbath", AlgorithmKind::default()),
        (
            "metropolis",
            AlgorithmKind::Metropolis {
                step_spread: 0.2,
                hits: 4,
            },
        ),
    ] {
        let algorithm = build_algorithm(&kind);
        group.bench_function(label, |b| {
            b.iter_batched(
                || field.clone(),
                |mut working| {
                    SweepBackend::Serial
                        .sweep(algorithm.as_ref(), &mut working, 42, 0)
                        .unwrap();
                    working
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_sweeps);
criterion_main!(benches);
