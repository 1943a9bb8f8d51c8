use tempfile::tempdir;

use lqcd_core::LatticeError;
use lqcd_data::{DataSet, DataSetHeader, RecordKey};
use lqcd_lattice::LatticeShape;
use lqcd_spec::{ObservableRecord, ObservableValue};

fn sample_header() -> DataSetHeader {
    let shape = LatticeShape::new([4, 4, 4, 8]).unwrap();
    DataSetHeader::new("beta5p5-a", shape, 5.5, "cfg-hash-abc")
}

#[test]
fn writing_the_same_key_twice_fails() {
    let mut data = DataSet::in_memory(sample_header());
    let key = RecordKey::new("beta5p5-a", 10, "average-plaquette");
    let record = ObservableRecord::new(
        "average-plaquette",
        10,
        "cfg-hash-abc",
        ObservableValue::Scalar { value: 0.58 },
    );
    data.put(key.clone(), record.clone()).unwrap();
    let err = data.put(key.clone(), record.clone()).unwrap_err();
    assert!(matches!(err, LatticeError::DuplicateKey(_)));
    assert_eq!(err.info().code, "dataset-duplicate");

    // The original record is untouched.
    assert_eq!(data.get(&key), Some(&record));
    assert_eq!(data.len(), 1);
}

#[test]
fn foreign_schema_version_is_rejected_on_open() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("results.json");
    let data = DataSet::create(&path, sample_header());
    data.flush().unwrap();

    let mut value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    value["header"]["schema_version"]["major"] = serde_json::json!(9);
    std::fs::write(&path, value.to_string()).unwrap();

    let err = DataSet::open(&path).unwrap_err();
    assert!(matches!(err, LatticeError::Serde(_)));
    assert_eq!(err.info().code, "dataset-schema");
}

#[test]
fn corrupted_duplicate_entries_are_rejected_on_open() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("results.json");
    let mut data = DataSet::create(&path, sample_header());
    data.put(
        RecordKey::new("beta5p5-a", 1, "average-plaquette"),
        ObservableRecord::new(
            "average-plaquette",
            1,
            "cfg-hash-abc",
            ObservableValue::Scalar { value: 0.5 },
        ),
    )
    .unwrap();
    data.flush().unwrap();

    let mut value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let entry = value["entries"][0].clone();
    value["entries"].as_array_mut().unwrap().push(entry);
    std::fs::write(&path, value.to_string()).unwrap();

    let err = DataSet::open(&path).unwrap_err();
    assert!(matches!(err, LatticeError::DuplicateKey(_)));
}
