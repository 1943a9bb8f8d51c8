//! End-to-end exercise of the facade surface: configure, simulate,
//! measure every observable, and read the dataset back.

use lqcd::prelude::*;

#[test]
fn full_pipeline_through_the_facade() {
    let config = Config {
        shape: [2, 2, 2, 4],
        beta: 5.5,
        thermalization_sweeps: 2,
        measurement_interval: 2,
        total_measurement_sweeps: 2,
        seed: 2026,
        ..Config::default()
    };

    let mut simulation = Simulation::new(config).unwrap();
    simulation
        .with_observable(Box::new(AveragePlaquette))
        .unwrap();
    simulation
        .with_observable(Box::new(WilsonLoops::new(1, 1)))
        .unwrap();
    simulation
        .with_observable(Box::new(TwoPoint::at_origin(0.5, SolverBudget::default())))
        .unwrap();
    simulation
        .with_observable(Box::new(Propagator::at_origin(0.5, SolverBudget::default())))
        .unwrap();

    let mut data = DataSet::in_memory(simulation.dataset_header().unwrap());
    let summary = simulation.run(&mut data).unwrap();

    assert_eq!(simulation.state(), SimulationState::Finished);
    assert_eq!(summary.measurements, 4);
    assert_eq!(data.len(), 4);

    let sweep = summary.sweeps_run;
    let correlator = data
        .get(&RecordKey::new("ensemble", sweep, "two-point"))
        .unwrap();
    assert_eq!(correlator.value.as_series().unwrap().len(), 4);
    assert_eq!(correlator.config_hash, simulation.config_hash());

    for (key, record) in data.iter() {
        assert_eq!(key.ensemble, "ensemble");
        assert_eq!(key.observable, record.observable);
    }
}

#[test]
fn constants_match_the_gauge_group() {
    assert_eq!(NUM_COLOURS, 3);
    assert_eq!(NUM_DIMS, 4);
    assert_eq!(NUM_PLANES, 6);
    assert!(UNITARITY_TOL > 0.0);
}

#[test]
fn every_export_is_independently_constructible() {
    let shape = LatticeShape::new([2, 2, 2, 4]).unwrap();
    let field = Lattice::cold_start(shape, [BoundaryKind::Periodic; 4], 5.5);
    assert_eq!(field.average_plaquette(), 1.0);

    let algorithm = build_algorithm(&AlgorithmKind::default());
    assert_eq!(algorithm.name(), "heatbath");

    let budget = SolverBudget::default();
    let observable = TwoPoint::at_origin(0.5, budget);
    assert_eq!(observable.name(), "two-point");

    let header = DataSetHeader::new("smoke", shape, 5.5, "hash");
    let data = DataSet::in_memory(header);
    assert!(data.is_empty());
}
