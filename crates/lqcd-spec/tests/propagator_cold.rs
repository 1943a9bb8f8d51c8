use lqcd_core::{LatticeError, RngHandle, NUM_COLOURS};
use lqcd_lattice::{BoundaryKind, Lattice, LatticeShape};
use lqcd_spec::{
    solve_normal, DiracOperator, FermionField, Observable, Propagator, SolverBudget,
};

fn antiperiodic_time() -> [BoundaryKind; 4] {
    [
        BoundaryKind::Periodic,
        BoundaryKind::Periodic,
        BoundaryKind::Periodic,
        BoundaryKind::Antiperiodic,
    ]
}

#[test]
fn cold_solve_converges_below_tolerance() {
    let shape = LatticeShape::new([4, 4, 4, 4]).unwrap();
    let field = Lattice::cold_start(shape, antiperiodic_time(), 5.5);
    let dirac = DiracOperator::new(&field, 0.5).unwrap();
    let budget = SolverBudget::default();

    let source = FermionField::point_source(field.volume(), 0, 0);
    let rhs = dirac.apply_adjoint(&source).unwrap();
    let (solution, outcome) = solve_normal(&dirac, &rhs, &budget).unwrap();
    assert!(outcome.residual <= budget.tolerance);
    assert!(outcome.iterations < budget.max_iterations);

    // Reconstruct the normal equations and verify the residual directly.
    let reconstructed = dirac.apply_normal(&solution).unwrap();
    let gap = reconstructed.add_scaled(&rhs, -1.0).norm_sqr().sqrt();
    assert!(gap / rhs.norm_sqr().sqrt() < 1e-6, "verify residual {gap}");
}

#[test]
fn propagator_reports_one_row_per_colour() {
    let shape = LatticeShape::new([2, 2, 2, 4]).unwrap();
    let field = Lattice::cold_start(shape, antiperiodic_time(), 5.5);
    let observable = Propagator::at_origin(0.5, SolverBudget::default());
    match observable.measure(&field).unwrap() {
        lqcd_spec::ObservableValue::Matrix { rows, cols, data } => {
            assert_eq!(rows, NUM_COLOURS);
            assert_eq!(cols, 4);
            assert_eq!(data.len(), rows * cols);
            assert!(data.iter().all(|value| value.is_finite() && *value >= 0.0));
            assert!(data[0] > 0.0);
        }
        other => panic!("expected a matrix payload, got {other:?}"),
    }
}

#[test]
fn exhausted_budget_surfaces_a_convergence_error() {
    let shape = LatticeShape::new([4, 4, 4, 4]).unwrap();
    let mut rng = RngHandle::from_seed(6);
    let field = Lattice::hot_start(shape, antiperiodic_time(), 5.5, &mut rng);
    let dirac = DiracOperator::new(&field, 0.05).unwrap();
    let budget = SolverBudget {
        max_iterations: 2,
        tolerance: 1e-14,
    };
    let source = FermionField::point_source(field.volume(), 0, 0);
    let rhs = dirac.apply_adjoint(&source).unwrap();
    let err = solve_normal(&dirac, &rhs, &budget).unwrap_err();
    assert!(matches!(err, LatticeError::Convergence(_)));
    assert_eq!(err.info().code, "cg-budget");
}

#[test]
fn dirac_adjoint_matches_inner_product_identity() {
    let shape = LatticeShape::new([2, 2, 2, 4]).unwrap();
    let mut rng = RngHandle::from_seed(44);
    let field = Lattice::hot_start(shape, antiperiodic_time(), 5.5, &mut rng);
    let dirac = DiracOperator::new(&field, 0.3).unwrap();

    let mut x = FermionField::zeros(field.volume());
    let mut y = FermionField::zeros(field.volume());
    for site in 0..field.volume() {
        x.set(site, lqcd_core::ColourVector::gaussian(&mut rng));
        y.set(site, lqcd_core::ColourVector::gaussian(&mut rng));
    }

    // <y, D x> == <D^dag y, x>
    let lhs = y.dot(&dirac.apply(&x).unwrap());
    let rhs = dirac.apply_adjoint(&y).unwrap().dot(&x);
    assert!((lhs - rhs).norm() < 1e-10, "adjoint identity violated: {lhs} vs {rhs}");
}
