//! Snapshot serialization for gauge fields.
//!
//! Snapshots embed a schema version and the lattice geometry so a restore
//! can reject incompatible payloads before touching link data.

use serde::{Deserialize, Serialize};

use lqcd_core::errors::{ErrorInfo, LatticeError};
use lqcd_core::su3::ColourMatrix;
use lqcd_core::{stable_hash_string, SchemaVersion, NUM_DIMS};

use crate::field::Lattice;
use crate::layout::{BoundaryKind, LatticeShape};

/// Schema version written into every field snapshot.
pub const SNAPSHOT_SCHEMA: SchemaVersion = SchemaVersion::new(1, 0, 0);

#[derive(Debug, Serialize, Deserialize)]
struct SerializableLattice {
    schema_version: SchemaVersion,
    extents: [usize; NUM_DIMS],
    boundaries: [BoundaryKind; NUM_DIMS],
    beta: f64,
    links: Vec<ColourMatrix>,
}

fn decompose(field: &Lattice) -> SerializableLattice {
    SerializableLattice {
        schema_version: SNAPSHOT_SCHEMA,
        extents: field.shape().extents(),
        boundaries: field.boundaries(),
        beta: field.beta(),
        links: field.links().to_vec(),
    }
}

/// Serializes a gauge field to a JSON snapshot.
pub fn to_json(field: &Lattice) -> Result<String, LatticeError> {
    serde_json::to_string_pretty(&decompose(field))
        .map_err(|err| LatticeError::Serde(ErrorInfo::new("snapshot-serialize", err.to_string())))
}

/// Restores a gauge field from a JSON snapshot.
pub fn from_json(data: &str) -> Result<Lattice, LatticeError> {
    let payload: SerializableLattice = serde_json::from_str(data)
        .map_err(|err| LatticeError::Serde(ErrorInfo::new("snapshot-parse", err.to_string())))?;
    if payload.schema_version.major != SNAPSHOT_SCHEMA.major {
        return Err(LatticeError::Serde(
            ErrorInfo::new(
                "snapshot-schema",
                format!(
                    "snapshot schema {}.{}.{} incompatible with supported {}.{}.{}",
                    payload.schema_version.major,
                    payload.schema_version.minor,
                    payload.schema_version.patch,
                    SNAPSHOT_SCHEMA.major,
                    SNAPSHOT_SCHEMA.minor,
                    SNAPSHOT_SCHEMA.patch
                ),
            )
            .with_hint("regenerate the snapshot with the current toolkit"),
        ));
    }
    let shape = LatticeShape::new(payload.extents)?;
    Lattice::from_parts(shape, payload.boundaries, payload.beta, payload.links)
}

/// Serializes a gauge field into a binary snapshot blob.
pub fn to_bytes(field: &Lattice) -> Result<Vec<u8>, LatticeError> {
    let json = to_json(field)?;
    bincode::serialize(&json)
        .map_err(|err| LatticeError::Serde(ErrorInfo::new("snapshot-encode", err.to_string())))
}

/// Rehydrates a gauge field from a binary snapshot blob.
pub fn from_bytes(bytes: &[u8]) -> Result<Lattice, LatticeError> {
    let json: String = bincode::deserialize(bytes)
        .map_err(|err| LatticeError::Serde(ErrorInfo::new("snapshot-decode", err.to_string())))?;
    from_json(&json)
}

/// Stable hexadecimal hash identifying a field configuration.
pub fn canonical_hash(field: &Lattice) -> Result<String, LatticeError> {
    stable_hash_string(&decompose(field))
}
