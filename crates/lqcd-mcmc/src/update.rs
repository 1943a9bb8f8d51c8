//! The update-algorithm capability and its configuration surface.

use serde::{Deserialize, Serialize};

use lqcd_core::su3::ColourMatrix;
use lqcd_core::{LatticeError, RngHandle};
use lqcd_lattice::Lattice;

use crate::backend::SweepBackend;
use crate::heatbath::Heatbath;
use crate::metropolis::Metropolis;

/// Replacement computed for a single link visit.
#[derive(Debug, Clone, Copy)]
pub struct LinkUpdate {
    /// The link value after the visit (may equal the old link).
    pub matrix: ColourMatrix,
    /// Number of proposals evaluated during the visit.
    pub proposed: usize,
    /// Number of proposals accepted during the visit.
    pub accepted: usize,
}

/// Acceptance bookkeeping for one or more sweeps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    /// Total proposals evaluated.
    pub proposed: usize,
    /// Total proposals accepted.
    pub accepted: usize,
}

impl SweepReport {
    /// Folds a link update into the running totals.
    pub fn absorb(&mut self, update: &LinkUpdate) {
        self.proposed += update.proposed;
        self.accepted += update.accepted;
    }

    /// Merges another report into this one.
    pub fn merge(&mut self, other: SweepReport) {
        self.proposed += other.proposed;
        self.accepted += other.accepted;
    }

    /// Fraction of proposals accepted (zero when nothing was proposed).
    pub fn acceptance_rate(&self) -> f64 {
        if self.proposed == 0 {
            0.0
        } else {
            self.accepted as f64 / self.proposed as f64
        }
    }
}

/// Monte Carlo link-update capability.
///
/// Implementations must be local: a link visit may read only the link
/// itself and its staple sum, which is what keeps one sweep linear in the
/// lattice volume. Visits must draw all randomness from the provided
/// handle so results are reproducible from the derived seed alone.
pub trait UpdateAlgorithm: Send + Sync {
    /// Short name recorded in metrics and manifests.
    fn name(&self) -> &'static str;

    /// Computes the replacement for one link from purely local data.
    fn update_link(
        &self,
        field: &Lattice,
        site: usize,
        direction: usize,
        rng: &mut RngHandle,
    ) -> Result<LinkUpdate, LatticeError>;

    /// Runs one full sweep over every link with the serial schedule.
    fn sweep(
        &self,
        field: &mut Lattice,
        master_seed: u64,
        sweep_index: usize,
    ) -> Result<SweepReport, LatticeError>
    where
        Self: Sized,
    {
        SweepBackend::Serial.sweep(self, field, master_seed, sweep_index)
    }
}

/// Closed set of update algorithms selectable from configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum AlgorithmKind {
    /// Cabibbo-Marinari heat bath over SU(2) subgroups.
    Heatbath {
        /// Kennedy-Pendleton trial budget per subgroup.
        #[serde(default = "default_subgroup_trials")]
        subgroup_trials: usize,
    },
    /// Multi-hit Metropolis with near-identity proposals.
    Metropolis {
        /// Spread of the SU(2)-subgroup proposal angles.
        #[serde(default = "default_step_spread")]
        step_spread: f64,
        /// Number of proposals per link visit.
        #[serde(default = "default_hits")]
        hits: usize,
    },
}

fn default_subgroup_trials() -> usize {
    20
}

fn default_step_spread() -> f64 {
    0.2
}

fn default_hits() -> usize {
    8
}

impl Default for AlgorithmKind {
    fn default() -> Self {
        AlgorithmKind::Heatbath {
            subgroup_trials: default_subgroup_trials(),
        }
    }
}

/// Resolves the configured algorithm into its implementation.
pub fn build_algorithm(kind: &AlgorithmKind) -> Box<dyn UpdateAlgorithm> {
    match kind {
        AlgorithmKind::Heatbath { subgroup_trials } => Box::new(Heatbath {
            subgroup_trials: (*subgroup_trials).max(1),
        }),
        AlgorithmKind::Metropolis { step_spread, hits } => Box::new(Metropolis {
            step_spread: *step_spread,
            hits: (*hits).max(1),
        }),
    }
}
