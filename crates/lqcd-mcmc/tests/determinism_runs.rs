use lqcd_lattice::{canonical_hash, BoundaryKind, Lattice, LatticeShape};
use lqcd_mcmc::{build_algorithm, AlgorithmKind, SweepBackend};

const PERIODIC: [BoundaryKind; 4] = [BoundaryKind::Periodic; 4];

fn cold_field() -> Lattice {
    let shape = LatticeShape::new([4, 4, 4, 4]).unwrap();
    Lattice::cold_start(shape, PERIODIC, 5.5)
}

#[test]
fn repeated_heatbath_sweeps_with_same_seed_match() {
    let algorithm = build_algorithm(&AlgorithmKind::default());
    let mut first = cold_field();
    let mut second = cold_field();
    for sweep in 0..3 {
        SweepBackend::Serial
            .sweep(algorithm.as_ref(), &mut first, 2024, sweep)
            .unwrap();
        SweepBackend::Serial
            .sweep(algorithm.as_ref(), &mut second, 2024, sweep)
            .unwrap();
    }
    assert_eq!(
        canonical_hash(&first).unwrap(),
        canonical_hash(&second).unwrap()
    );
}

#[test]
fn different_seeds_diverge() {
    let algorithm = build_algorithm(&AlgorithmKind::default());
    let mut first = cold_field();
    let mut second = cold_field();
    SweepBackend::Serial
        .sweep(algorithm.as_ref(), &mut first, 1, 0)
        .unwrap();
    SweepBackend::Serial
        .sweep(algorithm.as_ref(), &mut second, 2, 0)
        .unwrap();
    assert_ne!(
        canonical_hash(&first).unwrap(),
        canonical_hash(&second).unwrap()
    );
}

#[test]
fn metropolis_accepts_a_reasonable_fraction() {
    let algorithm = build_algorithm(&AlgorithmKind::Metropolis {
        step_spread: 0.2,
        hits: 4,
    });
    let mut field = cold_field();
    let mut report = lqcd_mcmc::SweepReport::default();
    for sweep in 0..3 {
        report.merge(
            SweepBackend::Serial
                .sweep(algorithm.as_ref(), &mut field, 99, sweep)
                .unwrap(),
        );
    }
    let rate = report.acceptance_rate();
    assert!(rate > 0.1 && rate <= 1.0, "acceptance rate {rate}");
}

#[test]
fn sweeps_move_the_plaquette_off_unity() {
    let algorithm = build_algorithm(&AlgorithmKind::default());
    let mut field = cold_field();
    for sweep in 0..5 {
        SweepBackend::Serial
            .sweep(algorithm.as_ref(), &mut field, 7, sweep)
            .unwrap();
    }
    let plaquette = field.average_plaquette();
    assert!(plaquette < 1.0, "plaquette should drop below 1, got {plaquette}");
    assert!(plaquette > 0.0, "beta 5.5 should stay ordered, got {plaquette}");
}
