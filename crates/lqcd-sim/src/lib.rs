#![deny(missing_docs)]
#![doc = "Run configuration and the Monte Carlo simulation state machine."]

/// Checkpoint payloads and paths.
pub mod checkpoint;
/// Validated run configuration.
pub mod config;
/// Per-sweep metrics and CSV export.
pub mod metrics;
/// The simulation lifecycle.
pub mod simulation;

pub use checkpoint::{build_payload, checkpoint_path, restore_field, CheckpointPayload};
pub use config::{Config, StartKind};
pub use metrics::{MetricSample, MetricsRecorder, SamplePhase};
pub use simulation::{RunSummary, Simulation, SimulationState};
