use lqcd_core::RngHandle;
use lqcd_lattice::{BoundaryKind, Lattice, LatticeShape};

const PERIODIC: [BoundaryKind; 4] = [BoundaryKind::Periodic; 4];

#[test]
fn cold_lattice_has_unit_average_plaquette() {
    let shape = LatticeShape::new([4, 4, 4, 4]).unwrap();
    let field = Lattice::cold_start(shape, PERIODIC, 5.5);
    assert_eq!(field.average_plaquette(), 1.0);
    assert_eq!(field.total_action(), 0.0);
}

#[test]
fn hot_lattice_is_disordered() {
    let shape = LatticeShape::new([4, 4, 4, 4]).unwrap();
    let mut rng = RngHandle::from_seed(2024);
    let field = Lattice::hot_start(shape, PERIODIC, 5.5, &mut rng);
    let plaquette = field.average_plaquette();
    assert!(plaquette.abs() < 0.2, "hot plaquette {plaquette} should sit near zero");
    assert!(field.max_unitarity_error() < 1e-10);
}

#[test]
fn unit_wilson_loop_matches_plaquette() {
    let shape = LatticeShape::new([4, 4, 4, 4]).unwrap();
    let mut rng = RngHandle::from_seed(77);
    let field = Lattice::hot_start(shape, PERIODIC, 5.5, &mut rng);
    let site = shape.site_index([1, 2, 0, 3]);
    let plaquette = field.plaquette(site, 0, 1).unwrap();
    let loop_1x1 = field.wilson_loop([1, 2, 0, 3], 0, 1, 1, 1).unwrap();
    assert!((plaquette - loop_1x1).frobenius_norm() < 1e-12);
}

#[test]
fn local_action_tracks_staple_geometry() {
    let shape = LatticeShape::new([4, 4, 4, 4]).unwrap();
    let field = Lattice::cold_start(shape, PERIODIC, 6.0);
    // Cold lattice: staple sum is 6 identities, Re Tr(U A) = 18,
    // local action = -(beta/3) * 18 = -36.
    let action = field.local_action(0, 2).unwrap();
    assert!((action + 36.0).abs() < 1e-12);
}
