use num_complex::Complex64;

use lqcd_core::su3::{embed_su2, ColourMatrix, ColourVector, SU2_SUBGROUPS};
use lqcd_core::{RngHandle, UNITARITY_TOL};

#[test]
fn identity_is_special_unitary() {
    let unit = ColourMatrix::identity();
    assert!(unit.is_special_unitary(UNITARITY_TOL));
    assert_eq!(unit.re_trace(), 3.0);
    assert_eq!(unit.determinant(), Complex64::new(1.0, 0.0));
}

#[test]
fn random_elements_lie_on_the_group() {
    let mut rng = RngHandle::from_seed(31);
    for _ in 0..32 {
        let link = ColourMatrix::random_special_unitary(&mut rng);
        assert!(
            link.is_special_unitary(1e-12),
            "unitarity error {}",
            link.unitarity_error()
        );
    }
}

#[test]
fn near_identity_proposals_are_group_elements_close_to_one() {
    let mut rng = RngHandle::from_seed(5);
    for _ in 0..32 {
        let proposal = ColourMatrix::random_near_identity(&mut rng, 0.2);
        assert!(proposal.is_special_unitary(1e-12));
        let distance = (proposal - ColourMatrix::identity()).frobenius_norm();
        assert!(distance < 1.5, "proposal too far from identity: {distance}");
    }
}

#[test]
fn reunitarisation_removes_drift() {
    let mut rng = RngHandle::from_seed(17);
    let link = ColourMatrix::random_special_unitary(&mut rng);
    let drifted = link.scale(1.0 + 1e-4);
    assert!(!drifted.is_special_unitary(UNITARITY_TOL));
    let repaired = drifted.reunitarised();
    assert!(repaired.is_special_unitary(1e-12));
    let distance = (repaired - link).frobenius_norm();
    assert!(distance < 1e-3, "projection moved too far: {distance}");
}

#[test]
fn su2_embedding_roundtrips_through_extraction() {
    for subgroup in SU2_SUBGROUPS {
        let q = [0.8, 0.36, -0.36, 0.3]; // unit quaternion: 0.64 + 0.1296*2 + 0.09 ~ 1
        let norm = (q.iter().map(|x| x * x).sum::<f64>()).sqrt();
        let q = [q[0] / norm, q[1] / norm, q[2] / norm, q[3] / norm];
        let embedded = embed_su2(q, subgroup);
        assert!(embedded.is_special_unitary(1e-12));
        let extracted = embedded.extract_su2(subgroup);
        for (expected, actual) in q.iter().zip(extracted.iter()) {
            assert!((expected - actual).abs() < 1e-12);
        }
    }
}

#[test]
fn adjoint_reverses_products() {
    let mut rng = RngHandle::from_seed(23);
    let a = ColourMatrix::random_special_unitary(&mut rng);
    let b = ColourMatrix::random_special_unitary(&mut rng);
    let lhs = (a * b).adjoint();
    let rhs = b.adjoint() * a.adjoint();
    assert!((lhs - rhs).frobenius_norm() < 1e-12);
}

#[test]
fn matrix_vector_products_match_adjoint_identity() {
    let mut rng = RngHandle::from_seed(29);
    let u = ColourMatrix::random_special_unitary(&mut rng);
    let x = ColourVector::gaussian(&mut rng);
    let y = ColourVector::gaussian(&mut rng);
    // <U^dag y, x> == <y, U x>
    let lhs = u.adjoint_mul_vector(&y).dot(&x);
    let rhs = y.dot(&u.mul_vector(&x));
    assert!((lhs - rhs).norm() < 1e-12);
}
