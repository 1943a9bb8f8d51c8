//! Deterministic sweep schedules and the optional parallel backend.
//!
//! A sweep visits every link once, in eight phases: for each direction, all
//! even-parity sites and then all odd-parity sites. Within a phase no visit
//! reads a link another visit of the same phase writes (the staple of a
//! direction-mu link only touches other directions at arbitrary sites and
//! direction-mu links at opposite-parity sites), so a phase may be batched
//! or executed concurrently without changing any result.
//!
//! Each link visit seeds its own RNG from `(master_seed, sweep, site,
//! direction)`, which makes the serial and checkerboard schedules produce
//! identical fields and makes the checkerboard schedule independent of
//! thread count. Without the `parallel` feature the checkerboard backend
//! degrades to the same batched schedule on one thread.

use serde::{Deserialize, Serialize};

use lqcd_core::{LatticeError, RngHandle, NUM_DIMS};
use lqcd_lattice::Lattice;

use crate::determinism::link_seed;
use crate::update::{LinkUpdate, SweepReport, UpdateAlgorithm};

/// Sweep execution backend, resolved once at simulation construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SweepBackend {
    /// Phase-ordered in-place traversal.
    #[default]
    Serial,
    /// Batched checkerboard traversal, parallel when the `parallel`
    /// feature is enabled.
    Checkerboard,
}

impl SweepBackend {
    /// Runs one full sweep of the provided algorithm over the field.
    pub fn sweep(
        &self,
        algorithm: &dyn UpdateAlgorithm,
        field: &mut Lattice,
        master_seed: u64,
        sweep_index: usize,
    ) -> Result<SweepReport, LatticeError> {
        let mut report = SweepReport::default();
        for direction in 0..NUM_DIMS {
            for parity in 0..2usize {
                let sites = parity_sites(field, parity);
                let phase_report = match self {
                    SweepBackend::Serial => serial_phase(
                        algorithm,
                        field,
                        &sites,
                        direction,
                        master_seed,
                        sweep_index,
                    )?,
                    SweepBackend::Checkerboard => batched_phase(
                        algorithm,
                        field,
                        &sites,
                        direction,
                        master_seed,
                        sweep_index,
                    )?,
                };
                report.merge(phase_report);
            }
        }
        Ok(report)
    }
}

fn parity_sites(field: &Lattice, parity: usize) -> Vec<usize> {
    let shape = field.shape();
    (0..field.volume())
        .filter(|&site| shape.parity(site) == parity)
        .collect()
}

fn serial_phase(
    algorithm: &dyn UpdateAlgorithm,
    field: &mut Lattice,
    sites: &[usize],
    direction: usize,
    master_seed: u64,
    sweep_index: usize,
) -> Result<SweepReport, LatticeError> {
    let mut report = SweepReport::default();
    for &site in sites {
        let mut rng = RngHandle::from_seed(link_seed(master_seed, sweep_index, site, direction));
        let update = algorithm.update_link(field, site, direction, &mut rng)?;
        report.absorb(&update);
        field.set_link_raw(site, direction, update.matrix)?;
    }
    Ok(report)
}

fn batched_phase(
    algorithm: &dyn UpdateAlgorithm,
    field: &mut Lattice,
    sites: &[usize],
    direction: usize,
    master_seed: u64,
    sweep_index: usize,
) -> Result<SweepReport, LatticeError> {
    let updates = compute_phase(algorithm, field, sites, direction, master_seed, sweep_index)?;
    let mut report = SweepReport::default();
    for (&site, update) in sites.iter().zip(updates.iter()) {
        report.absorb(update);
        field.set_link_raw(site, direction, update.matrix)?;
    }
    Ok(report)
}

#[cfg(feature = "parallel")]
fn compute_phase(
    algorithm: &dyn UpdateAlgorithm,
    field: &Lattice,
    sites: &[usize],
    direction: usize,
    master_seed: u64,
    sweep_index: usize,
) -> Result<Vec<LinkUpdate>, LatticeError> {
    use rayon::prelude::*;

    sites
        .par_iter()
        .map(|&site| {
            let mut rng =
                RngHandle::from_seed(link_seed(master_seed, sweep_index, site, direction));
            algorithm.update_link(field, site, direction, &mut rng)
        })
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn compute_phase(
    algorithm: &dyn UpdateAlgorithm,
    field: &Lattice,
    sites: &[usize],
    direction: usize,
    master_seed: u64,
    sweep_index: usize,
) -> Result<Vec<LinkUpdate>, LatticeError> {
    sites
        .iter()
        .map(|&site| {
            let mut rng =
                RngHandle::from_seed(link_seed(master_seed, sweep_index, site, direction));
            algorithm.update_link(field, site, direction, &mut rng)
        })
        .collect()
}
