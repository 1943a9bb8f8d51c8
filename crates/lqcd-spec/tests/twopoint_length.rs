use lqcd_lattice::{BoundaryKind, Lattice, LatticeShape};
use lqcd_spec::{Observable, SolverBudget, TwoPoint};

fn antiperiodic_time() -> [BoundaryKind; 4] {
    [
        BoundaryKind::Periodic,
        BoundaryKind::Periodic,
        BoundaryKind::Periodic,
        BoundaryKind::Antiperiodic,
    ]
}

#[test]
fn correlator_length_equals_temporal_extent() {
    for extents in [[2, 2, 2, 4], [2, 2, 2, 8], [4, 4, 4, 6]] {
        let shape = LatticeShape::new(extents).unwrap();
        let field = Lattice::cold_start(shape, antiperiodic_time(), 5.5);
        let observable = TwoPoint::at_origin(0.5, SolverBudget::default());
        let value = observable.measure(&field).unwrap();
        let series = value.as_series().unwrap();
        assert_eq!(series.len(), extents[3]);
    }
}

#[test]
fn correlator_is_nonnegative_and_peaks_at_the_source() {
    let shape = LatticeShape::new([4, 4, 4, 8]).unwrap();
    let field = Lattice::cold_start(shape, antiperiodic_time(), 5.5);
    let observable = TwoPoint::at_origin(0.5, SolverBudget::default());
    let value = observable.measure(&field).unwrap();
    let series = value.as_series().unwrap();
    for &point in series {
        assert!(point.is_finite() && point >= 0.0);
    }
    assert!(series[0] > 0.0);
    let mid = series.len() / 2;
    assert!(
        series[0] > series[mid],
        "correlator should decay from the source: C(0)={} C(mid)={}",
        series[0],
        series[mid]
    );
}

#[test]
fn shifted_source_rotates_the_series() {
    let shape = LatticeShape::new([2, 2, 2, 6]).unwrap();
    let field = Lattice::cold_start(shape, antiperiodic_time(), 5.5);
    let budget = SolverBudget::default();
    let origin = TwoPoint::at_origin(0.5, budget).measure(&field).unwrap();
    let shifted = TwoPoint {
        source: [0, 0, 0, 2],
        mass: 0.5,
        solver: budget,
    }
    .measure(&field)
    .unwrap();
    let origin = origin.as_series().unwrap();
    let shifted = shifted.as_series().unwrap();
    // A cold lattice is translation invariant in time up to the boundary
    // phase, which drops out of the squared magnitudes.
    for (a, b) in origin.iter().zip(shifted.iter()) {
        assert!((a - b).abs() < 1e-6, "series differ: {a} vs {b}");
    }
}
