//! Canonical hashing for configuration and field identity.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::errors::{ErrorInfo, LatticeError};

/// Serializes a payload to canonical JSON bytes.
///
/// `serde_json` preserves struct field order and we only hash payloads whose
/// map types are ordered (`BTreeMap`), so the byte stream is stable across
/// runs and platforms.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, LatticeError> {
    serde_json::to_vec(value)
        .map_err(|err| LatticeError::Serde(ErrorInfo::new("canonical-json", err.to_string())))
}

/// Computes a stable hexadecimal hash for the provided payload using canonical JSON ordering.
pub fn stable_hash_string<T: Serialize>(value: &T) -> Result<String, LatticeError> {
    let bytes = to_canonical_json_bytes(value)?;
    let digest = Sha256::digest(bytes);
    Ok(format!("{:x}", digest))
}
