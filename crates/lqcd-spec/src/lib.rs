#![deny(missing_docs)]
#![doc = "Observables over gauge-field snapshots: plaquette diagnostics, Wilson loops, staggered propagators, and two-point correlators."]

/// Conjugate-gradient solver and budgets.
pub mod cg;
/// Staggered Dirac operator and fermion fields.
pub mod dirac;
/// Observable trait and result types.
pub mod observable;
/// Point-source propagator observable.
pub mod propagator;
/// Two-point correlator observable.
pub mod twopoint;
/// Wilson-loop table observable.
pub mod wilson_loops;

pub use cg::{solve_normal, CgOutcome, SolverBudget};
pub use dirac::{staggered_phase, DiracOperator, FermionField};
pub use observable::{AveragePlaquette, Observable, ObservableRecord, ObservableValue};
pub use propagator::{solve_point_source, Propagator};
pub use twopoint::TwoPoint;
pub use wilson_loops::WilsonLoops;
