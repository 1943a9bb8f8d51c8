//! The simulation state machine.
//!
//! A simulation owns exactly one gauge field and drives it through a linear
//! lifecycle: `Initialized -> Thermalizing -> Measuring -> Finished`. Any
//! sweep, measurement, or persistence failure moves the run to the terminal
//! `Failed` state with the triggering error preserved; records already
//! handed to the dataset stay written.

use std::path::{Path, PathBuf};

use lqcd_core::errors::{ErrorInfo, LatticeError};
use lqcd_core::{RngHandle, UNITARITY_TOL};
use lqcd_data::{DataSet, DataSetHeader, RecordKey};
use lqcd_lattice::{canonical_hash, Lattice};
use lqcd_mcmc::{build_algorithm, start_seed, SweepBackend, SweepReport, UpdateAlgorithm};
use lqcd_spec::{Observable, ObservableRecord};

use crate::checkpoint::{self, CheckpointPayload};
use crate::config::{Config, StartKind};
use crate::metrics::{MetricSample, MetricsRecorder, SamplePhase};

/// Lifecycle states of a simulation. Linear; no cycles back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationState {
    /// Field constructed, no sweeps run yet.
    Initialized,
    /// Running equilibration sweeps.
    Thermalizing,
    /// Running measurement sweeps.
    Measuring,
    /// Run complete; the field is frozen.
    Finished,
    /// Run aborted; the triggering error is preserved.
    Failed,
}

/// Summary returned to callers after a run completes.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Sweeps executed by this run.
    pub sweeps_run: usize,
    /// Measurement records written to the dataset.
    pub measurements: usize,
    /// Aggregate proposal acceptance rate.
    pub acceptance_rate: f64,
    /// Average plaquette of the final configuration.
    pub final_plaquette: f64,
    /// Canonical hash of the final configuration.
    pub final_field_hash: String,
    /// Metrics CSV written during the run, if an output path was set.
    pub metrics_path: Option<PathBuf>,
    /// Checkpoint files produced during the run.
    pub checkpoints: Vec<PathBuf>,
    /// Distinct field configurations measured.
    pub unique_configurations: usize,
}

/// Orchestrates one Monte Carlo run over one gauge field.
pub struct Simulation {
    config: Config,
    config_hash: String,
    field: Lattice,
    algorithm: Box<dyn UpdateAlgorithm>,
    backend: SweepBackend,
    observables: Vec<Box<dyn Observable>>,
    state: SimulationState,
    failure: Option<LatticeError>,
    sweeps_done: usize,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("state", &self.state)
            .field("sweeps_done", &self.sweeps_done)
            .field("observables", &self.observables.len())
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Validates the configuration and constructs the initial field.
    pub fn new(config: Config) -> Result<Self, LatticeError> {
        config.validate()?;
        let shape = config.lattice_shape()?;
        let config_hash = config.config_hash()?;
        let field = match config.start {
            StartKind::Cold => Lattice::cold_start(shape, config.boundaries, config.beta),
            StartKind::Hot => {
                let mut rng = RngHandle::from_seed(start_seed(config.seed));
                Lattice::hot_start(shape, config.boundaries, config.beta, &mut rng)
            }
        };
        let algorithm = build_algorithm(&config.algorithm);
        let backend = config.backend;
        Ok(Self {
            config,
            config_hash,
            field,
            algorithm,
            backend,
            observables: Vec::new(),
            state: SimulationState::Initialized,
            failure: None,
            sweeps_done: 0,
        })
    }

    /// Resumes a run from a checkpoint file.
    ///
    /// The restored simulation starts in `Initialized` with the saved
    /// sweep count; `run` continues from there with the remaining budget.
    pub fn from_checkpoint(path: &Path) -> Result<Self, LatticeError> {
        let payload = CheckpointPayload::load(path)?;
        let field = checkpoint::restore_field(&payload)?;
        let mut simulation = Self::new(payload.config)?;
        simulation.field = field;
        simulation.sweeps_done = payload.sweep.min(simulation.config.total_sweeps());
        Ok(simulation)
    }

    /// Registers an observable. Only permitted before the run starts.
    pub fn with_observable(
        &mut self,
        observable: Box<dyn Observable>,
    ) -> Result<(), LatticeError> {
        if self.state != SimulationState::Initialized {
            return Err(LatticeError::Config(
                ErrorInfo::new(
                    "observable-after-start",
                    "observables must be registered before the run starts",
                )
                .with_context("state", format!("{:?}", self.state)),
            ));
        }
        self.observables.push(observable);
        Ok(())
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SimulationState {
        self.state
    }

    /// Read access to the owned field.
    pub fn field(&self) -> &Lattice {
        &self.field
    }

    /// The validated configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Canonical hash of the configuration driving this run.
    pub fn config_hash(&self) -> &str {
        &self.config_hash
    }

    /// The error that moved the run to `Failed`, if any.
    pub fn failure(&self) -> Option<&LatticeError> {
        self.failure.as_ref()
    }

    /// Builds a dataset header matching this run's identity.
    pub fn dataset_header(&self) -> Result<DataSetHeader, LatticeError> {
        Ok(DataSetHeader::new(
            self.config.ensemble.clone(),
            self.config.lattice_shape()?,
            self.config.beta,
            self.config_hash.clone(),
        ))
    }

    /// Drives the run to completion, appending measurements to `data`.
    pub fn run(&mut self, data: &mut DataSet) -> Result<RunSummary, LatticeError> {
        if self.state != SimulationState::Initialized {
            return Err(LatticeError::Config(
                ErrorInfo::new(
                    "run-consumed",
                    "a simulation can be run exactly once",
                )
                .with_context("state", format!("{:?}", self.state)),
            ));
        }
        match self.drive(data) {
            Ok(summary) => {
                self.state = SimulationState::Finished;
                Ok(summary)
            }
            Err(err) => {
                self.state = SimulationState::Failed;
                self.failure = Some(err.clone());
                Err(err)
            }
        }
    }

    fn drive(&mut self, data: &mut DataSet) -> Result<RunSummary, LatticeError> {
        let total_sweeps = self.config.total_sweeps();
        let thermalization = self.config.thermalization_sweeps;
        let mut recorder = MetricsRecorder::new();
        let mut totals = SweepReport::default();
        let mut checkpoints = Vec::new();
        let mut measurements = 0usize;

        for sweep in self.sweeps_done..total_sweeps {
            let phase = if sweep < thermalization {
                SamplePhase::Thermalizing
            } else {
                SamplePhase::Measuring
            };
            self.state = match phase {
                SamplePhase::Thermalizing => SimulationState::Thermalizing,
                SamplePhase::Measuring => SimulationState::Measuring,
            };

            let report =
                self.backend
                    .sweep(self.algorithm.as_ref(), &mut self.field, self.config.seed, sweep)?;
            totals.merge(report);
            self.sweeps_done = sweep + 1;

            if self.config.reunitarise_interval > 0
                && self.sweeps_done % self.config.reunitarise_interval == 0
            {
                self.field.reunitarise(UNITARITY_TOL);
            }

            recorder.push_sample(MetricSample {
                sweep: self.sweeps_done,
                phase,
                plaquette: self.field.average_plaquette(),
                accepted: report.accepted,
                proposed: report.proposed,
            });

            if phase == SamplePhase::Measuring
                && (self.sweeps_done - thermalization) % self.config.measurement_interval == 0
            {
                for observable in &self.observables {
                    let value = observable.measure(&self.field)?;
                    let record = ObservableRecord::new(
                        observable.name(),
                        self.sweeps_done,
                        self.config_hash.clone(),
                        value,
                    );
                    data.put(
                        RecordKey::new(
                            self.config.ensemble.clone(),
                            self.sweeps_done,
                            observable.name(),
                        ),
                        record,
                    )?;
                    measurements += 1;
                }
                if !self.observables.is_empty() {
                    recorder.note_field_hash(canonical_hash(&self.field)?);
                    // Completed measurements survive a later failure.
                    data.flush()?;
                }
            }

            if self.config.checkpoint_interval > 0
                && self.sweeps_done % self.config.checkpoint_interval == 0
            {
                if let Some(run_dir) = &self.config.output_path {
                    let path =
                        checkpoint::checkpoint_path(&run_dir.join("checkpoints"), self.sweeps_done);
                    let payload =
                        checkpoint::build_payload(self.sweeps_done, &self.config, &self.field)?;
                    payload.store(&path)?;
                    checkpoints.push(path);
                }
            }
        }

        let metrics_path = if let Some(run_dir) = &self.config.output_path {
            let path = run_dir.join("metrics.csv");
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|err| {
                    LatticeError::Serde(
                        ErrorInfo::new("metrics-mkdir", err.to_string())
                            .with_context("path", parent.display().to_string()),
                    )
                })?;
            }
            recorder.write_csv(&path).map_err(|err| {
                LatticeError::Serde(
                    ErrorInfo::new("metrics-write", err.to_string())
                        .with_context("path", path.display().to_string()),
                )
            })?;
            Some(path)
        } else {
            None
        };

        data.flush()?;
        log::debug!(
            "run complete: {} sweeps, {} measurements, acceptance {:.3}",
            self.sweeps_done,
            measurements,
            totals.acceptance_rate()
        );

        Ok(RunSummary {
            sweeps_run: self.sweeps_done,
            measurements,
            acceptance_rate: totals.acceptance_rate(),
            final_plaquette: self.field.average_plaquette(),
            final_field_hash: canonical_hash(&self.field)?,
            metrics_path,
            checkpoints,
            unique_configurations: recorder.unique_configurations(),
        })
    }
}
