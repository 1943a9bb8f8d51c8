#![deny(missing_docs)]
#![doc = "Deterministic Monte Carlo link updates for SU(3) gauge fields."]

/// Serial and checkerboard sweep schedules.
pub mod backend;
/// Deterministic seed derivation helpers.
pub mod determinism;
/// Cabibbo-Marinari heat-bath updates.
pub mod heatbath;
/// Multi-hit Metropolis updates.
pub mod metropolis;
/// Update-algorithm trait and configuration enum.
pub mod update;

pub use backend::SweepBackend;
pub use determinism::{link_seed, start_seed, sweep_seed};
pub use heatbath::Heatbath;
pub use metropolis::Metropolis;
pub use update::{build_algorithm, AlgorithmKind, LinkUpdate, SweepReport, UpdateAlgorithm};
