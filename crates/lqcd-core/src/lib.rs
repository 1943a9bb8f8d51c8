#![deny(missing_docs)]
#![doc = "Core error, RNG, provenance, and colour-algebra types shared by every lqcd crate."]

pub mod errors;
pub mod hash;
pub mod provenance;
pub mod rng;
pub mod su3;

pub use errors::{ErrorInfo, LatticeError};
pub use hash::{stable_hash_string, to_canonical_json_bytes};
pub use provenance::{EnsembleProvenance, SchemaVersion};
pub use rng::{derive_substream_seed, gaussian, RngHandle};
pub use su3::{embed_su2, ColourMatrix, ColourVector, NUM_COLOURS, SU2_SUBGROUPS};

/// Number of spacetime dimensions of the lattice.
pub const NUM_DIMS: usize = 4;

/// Default tolerance for gauge-group membership checks.
pub const UNITARITY_TOL: f64 = 1e-10;
