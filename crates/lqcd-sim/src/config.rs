//! Run configuration: a validated, YAML-loadable parameter bundle.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use lqcd_core::errors::{ErrorInfo, LatticeError};
use lqcd_core::stable_hash_string;
use lqcd_lattice::{BoundaryKind, LatticeShape};
use lqcd_mcmc::{AlgorithmKind, SweepBackend};
use lqcd_spec::SolverBudget;

/// Field initialisation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum StartKind {
    /// All links start at the identity.
    #[default]
    Cold,
    /// All links start as random group elements.
    Hot,
}

/// YAML-configurable parameters governing a simulation run.
///
/// Treated as immutable once validated: [`crate::Simulation`] keeps its own
/// clone, so later edits to a caller's copy never reach a running
/// simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Lattice extents `[Lx, Ly, Lz, Lt]`.
    #[serde(default = "default_shape")]
    pub shape: [usize; 4],
    /// Wilson gauge coupling.
    #[serde(default = "default_beta")]
    pub beta: f64,
    /// Per-axis boundary conditions.
    #[serde(default = "default_boundaries")]
    pub boundaries: [BoundaryKind; 4],
    /// Link-update algorithm.
    #[serde(default)]
    pub algorithm: AlgorithmKind,
    /// Cold or hot start.
    #[serde(default)]
    pub start: StartKind,
    /// Sweeps discarded before any measurement.
    #[serde(default = "default_thermalization")]
    pub thermalization_sweeps: usize,
    /// Sweeps between consecutive measurements.
    #[serde(default = "default_interval")]
    pub measurement_interval: usize,
    /// Sweeps executed in the measuring phase.
    #[serde(default = "default_measurement_sweeps")]
    pub total_measurement_sweeps: usize,
    /// Master seed for all randomness.
    #[serde(default = "default_master_seed")]
    pub seed: u64,
    /// Run directory for metrics, checkpoints, and datasets.
    #[serde(default)]
    pub output_path: Option<PathBuf>,
    /// Ensemble label used to key dataset records.
    #[serde(default = "default_ensemble")]
    pub ensemble: String,
    /// Interval in sweeps between re-unitarisation passes (0 disables).
    #[serde(default = "default_reunitarise_interval")]
    pub reunitarise_interval: usize,
    /// Interval in sweeps between checkpoint writes (0 disables).
    #[serde(default)]
    pub checkpoint_interval: usize,
    /// Iteration/tolerance budget for propagator solves.
    #[serde(default)]
    pub solver: SolverBudget,
    /// Sweep execution backend.
    #[serde(default)]
    pub backend: SweepBackend,
}

fn default_shape() -> [usize; 4] {
    [4, 4, 4, 8]
}

fn default_beta() -> f64 {
    5.5
}

fn default_boundaries() -> [BoundaryKind; 4] {
    [
        BoundaryKind::Periodic,
        BoundaryKind::Periodic,
        BoundaryKind::Periodic,
        BoundaryKind::Antiperiodic,
    ]
}

fn default_thermalization() -> usize {
    16
}

fn default_interval() -> usize {
    2
}

fn default_measurement_sweeps() -> usize {
    16
}

fn default_master_seed() -> u64 {
    0x05EE_D5EE_DD15_5EED_u64
}

fn default_ensemble() -> String {
    "ensemble".to_string()
}

fn default_reunitarise_interval() -> usize {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shape: default_shape(),
            beta: default_beta(),
            boundaries: default_boundaries(),
            algorithm: AlgorithmKind::default(),
            start: StartKind::default(),
            thermalization_sweeps: default_thermalization(),
            measurement_interval: default_interval(),
            total_measurement_sweeps: default_measurement_sweeps(),
            seed: default_master_seed(),
            output_path: None,
            ensemble: default_ensemble(),
            reunitarise_interval: default_reunitarise_interval(),
            checkpoint_interval: 0,
            solver: SolverBudget::default(),
            backend: SweepBackend::default(),
        }
    }
}

impl Config {
    /// Fails fast on any invalid parameter.
    pub fn validate(&self) -> Result<(), LatticeError> {
        LatticeShape::new(self.shape)?;
        if !(self.beta > 0.0) {
            return Err(config_error(
                "bad-beta",
                format!("coupling beta {} must be positive", self.beta),
            ));
        }
        if self.measurement_interval == 0 {
            return Err(config_error(
                "bad-interval",
                "measurement interval must be at least one sweep",
            ));
        }
        if self.total_measurement_sweeps == 0 {
            return Err(config_error(
                "bad-measurement-sweeps",
                "a run needs at least one measurement sweep",
            ));
        }
        if self.ensemble.is_empty() {
            return Err(config_error("bad-ensemble", "ensemble label must be nonempty"));
        }
        if self.solver.max_iterations == 0 {
            return Err(config_error(
                "bad-solver-budget",
                "solver needs at least one iteration",
            ));
        }
        if !(self.solver.tolerance > 0.0) {
            return Err(config_error(
                "bad-solver-tolerance",
                format!("solver tolerance {} must be positive", self.solver.tolerance),
            ));
        }
        Ok(())
    }

    /// Validated lattice shape.
    pub fn lattice_shape(&self) -> Result<LatticeShape, LatticeError> {
        LatticeShape::new(self.shape)
    }

    /// Total sweeps a full run executes.
    pub fn total_sweeps(&self) -> usize {
        self.thermalization_sweeps + self.total_measurement_sweeps
    }

    /// Canonical hash identifying this configuration (and its ensemble).
    pub fn config_hash(&self) -> Result<String, LatticeError> {
        stable_hash_string(self)
    }

    /// Parses and validates a YAML configuration document.
    pub fn from_yaml(text: &str) -> Result<Self, LatticeError> {
        let config: Config = serde_yaml::from_str(text).map_err(|err| {
            LatticeError::Serde(ErrorInfo::new("config-parse", err.to_string()))
        })?;
        config.validate()?;
        Ok(config)
    }
}

fn config_error(code: &str, message: impl Into<String>) -> LatticeError {
    LatticeError::Config(ErrorInfo::new(code, message))
}
