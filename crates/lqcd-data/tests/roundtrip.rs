use tempfile::tempdir;

use lqcd_data::{DataSet, DataSetHeader, RecordKey};
use lqcd_lattice::LatticeShape;
use lqcd_spec::{ObservableRecord, ObservableValue};

fn sample_header() -> DataSetHeader {
    let shape = LatticeShape::new([4, 4, 4, 8]).unwrap();
    DataSetHeader::new("beta5p5-a", shape, 5.5, "cfg-hash-abc")
}

fn sample_record(sweep: usize) -> ObservableRecord {
    ObservableRecord::new(
        "average-plaquette",
        sweep,
        "cfg-hash-abc",
        ObservableValue::Scalar { value: 0.58 },
    )
}

#[test]
fn put_then_get_returns_the_same_record() {
    let mut data = DataSet::in_memory(sample_header());
    let key = RecordKey::new("beta5p5-a", 10, "average-plaquette");
    let record = sample_record(10);
    data.put(key.clone(), record.clone()).unwrap();
    assert_eq!(data.get(&key), Some(&record));
    assert_eq!(data.len(), 1);
}

#[test]
fn flush_and_open_preserve_everything() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("results.json");
    let mut data = DataSet::create(&path, sample_header());
    for sweep in [10, 20, 30] {
        data.put(
            RecordKey::new("beta5p5-a", sweep, "average-plaquette"),
            sample_record(sweep),
        )
        .unwrap();
    }
    data.put(
        RecordKey::new("beta5p5-a", 10, "two-point"),
        ObservableRecord::new(
            "two-point",
            10,
            "cfg-hash-abc",
            ObservableValue::Series {
                values: vec![1.0, 0.5, 0.25, 0.5],
            },
        ),
    )
    .unwrap();
    data.flush().unwrap();

    let restored = DataSet::open(&path).unwrap();
    assert_eq!(restored.header(), data.header());
    assert_eq!(restored.len(), 4);
    let keys: Vec<_> = restored.iter().map(|(key, _)| key.clone()).collect();
    // BTreeMap ordering: sweep-major within an ensemble/observable ordering.
    assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));
    let key = RecordKey::new("beta5p5-a", 10, "two-point");
    assert_eq!(
        restored.get(&key).unwrap().value.as_series().unwrap().len(),
        4
    );
}

#[test]
fn iteration_is_restartable() {
    let mut data = DataSet::in_memory(sample_header());
    for sweep in 0..5 {
        data.put(
            RecordKey::new("beta5p5-a", sweep, "average-plaquette"),
            sample_record(sweep),
        )
        .unwrap();
    }
    let first: Vec<_> = data.iter().map(|(key, _)| key.sweep).collect();
    let second: Vec<_> = data.iter().map(|(key, _)| key.sweep).collect();
    assert_eq!(first, second);
    assert_eq!(first, vec![0, 1, 2, 3, 4]);
}
