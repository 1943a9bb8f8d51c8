use lqcd_core::LatticeError;
use lqcd_lattice::{BoundaryKind, Lattice, LatticeShape};
use lqcd_spec::{
    DiracOperator, FermionField, Observable, Propagator, SolverBudget, WilsonLoops,
};

const PERIODIC: [BoundaryKind; 4] = [BoundaryKind::Periodic; 4];

fn small_field() -> Lattice {
    let shape = LatticeShape::new([4, 4, 4, 4]).unwrap();
    Lattice::cold_start(shape, PERIODIC, 5.5)
}

#[test]
fn oversized_loop_table_is_rejected() {
    let field = small_field();
    let observable = WilsonLoops::new(4, 2);
    let err = observable.measure(&field).unwrap_err();
    assert!(matches!(err, LatticeError::ShapeMismatch(_)));

    let observable = WilsonLoops::new(2, 4);
    let err = observable.measure(&field).unwrap_err();
    assert!(matches!(err, LatticeError::ShapeMismatch(_)));

    let observable = WilsonLoops::new(2, 2);
    assert!(observable.measure(&field).is_ok());
}

#[test]
fn source_outside_the_lattice_is_rejected() {
    let field = small_field();
    let observable = Propagator {
        source: [0, 0, 0, 4],
        mass: 0.5,
        solver: SolverBudget::default(),
    };
    let err = observable.measure(&field).unwrap_err();
    assert!(matches!(err, LatticeError::ShapeMismatch(_)));
}

#[test]
fn fermion_volume_mismatch_is_rejected() {
    let field = small_field();
    let dirac = DiracOperator::new(&field, 0.5).unwrap();
    let wrong = FermionField::zeros(field.volume() / 2);
    let err = dirac.apply(&wrong).unwrap_err();
    assert!(matches!(err, LatticeError::ShapeMismatch(_)));
}

#[test]
fn nonpositive_mass_is_rejected() {
    let field = small_field();
    let err = DiracOperator::new(&field, 0.0).unwrap_err();
    assert!(matches!(err, LatticeError::Config(_)));
}
