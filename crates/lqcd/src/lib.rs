#![deny(missing_docs)]
#![doc = "Facade over the lqcd workspace: one import surface for gauge fields, updates, observables, simulations, and datasets."]

pub use lqcd_core::{
    derive_substream_seed, stable_hash_string, ColourMatrix, ColourVector, EnsembleProvenance,
    ErrorInfo, LatticeError, RngHandle, SchemaVersion,
};
pub use lqcd_data::{DataSet, DataSetHeader, RecordKey};
pub use lqcd_lattice::{BoundaryKind, Lattice, LatticeShape};
pub use lqcd_mcmc::{
    build_algorithm, AlgorithmKind, Heatbath, Metropolis, SweepBackend, SweepReport,
    UpdateAlgorithm,
};
pub use lqcd_sim::{Config, RunSummary, Simulation, SimulationState, StartKind};
pub use lqcd_spec::{
    AveragePlaquette, DiracOperator, FermionField, Observable, ObservableRecord, ObservableValue,
    Propagator, SolverBudget, TwoPoint, WilsonLoops,
};

/// Numeric constants shared across the toolkit.
pub mod constants {
    pub use lqcd_core::su3::NUM_COLOURS;
    pub use lqcd_core::{NUM_DIMS, UNITARITY_TOL};

    /// Plaquette planes per lattice site.
    pub use lqcd_lattice::NUM_PLANES;
}

/// Glob-import surface for interactive use,
/// `use lqcd::prelude::*`.
pub mod prelude {
    pub use crate::constants::*;
    pub use crate::{
        build_algorithm, AlgorithmKind, AveragePlaquette, BoundaryKind, ColourMatrix, Config, DataSet,
        DataSetHeader, Lattice, LatticeError, LatticeShape, Observable, ObservableRecord,
        ObservableValue, Propagator, RecordKey, RngHandle, RunSummary, Simulation,
        SimulationState, SolverBudget, StartKind, SweepBackend, TwoPoint, UpdateAlgorithm,
        WilsonLoops,
    };
}
