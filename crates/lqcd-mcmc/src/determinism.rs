//! Deterministic seed derivation for sweeps and per-link updates.
//!
//! Every link visit draws from its own substream derived from
//! `(master_seed, sweep, site, direction)`, so the update of one link never
//! depends on how many threads executed the sweep or in which order other
//! links were visited.

use lqcd_core::derive_substream_seed;

/// Derives the deterministic seed for a full sweep.
pub fn sweep_seed(master_seed: u64, sweep: usize) -> u64 {
    derive_substream_seed(master_seed, sweep as u64)
}

/// Derives the deterministic seed for a single link update within a sweep.
pub fn link_seed(master_seed: u64, sweep: usize, site: usize, direction: usize) -> u64 {
    let intermediate = derive_substream_seed(master_seed, (sweep as u64) << 3 | direction as u64);
    derive_substream_seed(intermediate, site as u64)
}

/// Deterministic seed for hot-start field construction.
pub fn start_seed(master_seed: u64) -> u64 {
    derive_substream_seed(master_seed ^ 0x5A5A_5A5A_5A5A_5A5A, 0)
}
