use lqcd_core::RngHandle;
use lqcd_lattice::{
    canonical_hash, from_bytes, from_json, to_bytes, to_json, BoundaryKind, Lattice, LatticeShape,
};

fn sample_field() -> Lattice {
    let shape = LatticeShape::new([4, 4, 2, 6]).unwrap();
    let boundaries = [
        BoundaryKind::Periodic,
        BoundaryKind::Periodic,
        BoundaryKind::Periodic,
        BoundaryKind::Antiperiodic,
    ];
    let mut rng = RngHandle::from_seed(123);
    Lattice::hot_start(shape, boundaries, 5.7, &mut rng)
}

#[test]
fn json_snapshot_roundtrips() {
    let field = sample_field();
    let json = to_json(&field).unwrap();
    let restored = from_json(&json).unwrap();
    assert_eq!(field, restored);
    assert_eq!(
        canonical_hash(&field).unwrap(),
        canonical_hash(&restored).unwrap()
    );
}

#[test]
fn binary_snapshot_roundtrips() {
    let field = sample_field();
    let bytes = to_bytes(&field).unwrap();
    let restored = from_bytes(&bytes).unwrap();
    assert_eq!(field, restored);
}

#[test]
fn truncated_payload_is_a_shape_mismatch() {
    let field = sample_field();
    let json = to_json(&field).unwrap();
    // Drop one link from the payload.
    let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
    value["links"].as_array_mut().unwrap().pop();
    let err = from_json(&value.to_string()).unwrap_err();
    assert!(matches!(err, lqcd_core::LatticeError::ShapeMismatch(_)));
}

#[test]
fn foreign_schema_is_rejected() {
    let field = sample_field();
    let json = to_json(&field).unwrap();
    let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
    value["schema_version"]["major"] = serde_json::json!(99);
    let err = from_json(&value.to_string()).unwrap_err();
    assert!(matches!(err, lqcd_core::LatticeError::Serde(_)));
}

#[test]
fn distinct_fields_hash_differently() {
    let field = sample_field();
    let cold = Lattice::cold_start(field.shape(), field.boundaries(), field.beta());
    assert_ne!(
        canonical_hash(&field).unwrap(),
        canonical_hash(&cold).unwrap()
    );
}
