//! Multi-hit Metropolis link updates.

use lqcd_core::su3::ColourMatrix;
use lqcd_core::{LatticeError, RngHandle, NUM_COLOURS};
use lqcd_lattice::Lattice;

use crate::update::{LinkUpdate, UpdateAlgorithm};

/// Metropolis update: propose `hits` near-identity rotations of the link
/// and accept each with probability `min(1, exp(-dS))`.
///
/// The action change is evaluated against the staple sum only, so the cost
/// per link is independent of the lattice volume. The staple is computed
/// once per visit; it does not contain the link being updated, so it stays
/// valid across hits.
#[derive(Debug, Clone, Copy)]
pub struct Metropolis {
    /// Spread of the proposal rotation angles (clamped to [0, 0.5]).
    pub step_spread: f64,
    /// Number of proposals per link visit.
    pub hits: usize,
}

impl Default for Metropolis {
    fn default() -> Self {
        Self {
            step_spread: 0.2,
            hits: 8,
        }
    }
}

impl UpdateAlgorithm for Metropolis {
    fn name(&self) -> &'static str {
        "metropolis"
    }

    fn update_link(
        &self,
        field: &Lattice,
        site: usize,
        direction: usize,
        rng: &mut RngHandle,
    ) -> Result<LinkUpdate, LatticeError> {
        let staple = field.staple(site, direction)?;
        let mut link = field.link(site, direction)?;
        let beta_over_nc = field.beta() / NUM_COLOURS as f64;

        let mut accepted = 0usize;
        for _ in 0..self.hits {
            let rotation = ColourMatrix::random_near_identity(rng, self.step_spread);
            let candidate = rotation * link;
            let delta_action = -beta_over_nc * ((candidate - link) * staple).re_trace();
            let draw = rng.uniform();
            if delta_action <= 0.0 || draw < (-delta_action).exp() {
                link = candidate;
                accepted += 1;
            }
        }

        Ok(LinkUpdate {
            matrix: link,
            proposed: self.hits,
            accepted,
        })
    }
}
