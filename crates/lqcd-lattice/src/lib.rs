#![deny(missing_docs)]
#![doc = "Lattice layout and the SU(3) gauge-field container with Wilson-action primitives."]

pub mod field;
pub mod layout;
pub mod serde;
pub mod wilson;

pub use field::Lattice;
pub use layout::{check_axis, BoundaryKind, LatticeShape};
pub use serde::{canonical_hash, from_bytes, from_json, to_bytes, to_json, SNAPSHOT_SCHEMA};
pub use wilson::NUM_PLANES;
