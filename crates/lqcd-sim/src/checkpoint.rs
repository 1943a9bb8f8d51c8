//! Checkpoint serialization for in-flight runs.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use lqcd_core::errors::{ErrorInfo, LatticeError};
use lqcd_lattice::{from_json as field_from_json, to_json as field_to_json, Lattice};

use crate::config::Config;

/// Serializable snapshot of a run in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointPayload {
    /// Sweeps completed when the checkpoint was written.
    pub sweep: usize,
    /// Configuration snapshot associated with the run.
    pub config: Config,
    /// Serialized gauge field in JSON form.
    pub field_json: String,
}

impl CheckpointPayload {
    /// Restores the payload from disk.
    pub fn load(path: &Path) -> Result<Self, LatticeError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            LatticeError::Serde(
                ErrorInfo::new("checkpoint-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        serde_json::from_str(&contents).map_err(|err| {
            LatticeError::Serde(
                ErrorInfo::new("checkpoint-parse", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }

    /// Writes the payload to disk.
    pub fn store(&self, path: &Path) -> Result<(), LatticeError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                LatticeError::Serde(
                    ErrorInfo::new("checkpoint-mkdir", err.to_string())
                        .with_context("path", parent.display().to_string()),
                )
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|err| {
            LatticeError::Serde(
                ErrorInfo::new("checkpoint-serialize", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        fs::write(path, json).map_err(|err| {
            LatticeError::Serde(
                ErrorInfo::new("checkpoint-write", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }
}

/// Constructs a checkpoint payload from the run state.
pub fn build_payload(
    sweep: usize,
    config: &Config,
    field: &Lattice,
) -> Result<CheckpointPayload, LatticeError> {
    Ok(CheckpointPayload {
        sweep,
        config: config.clone(),
        field_json: field_to_json(field)?,
    })
}

/// Restores the gauge field stored in a checkpoint payload.
pub fn restore_field(payload: &CheckpointPayload) -> Result<Lattice, LatticeError> {
    field_from_json(&payload.field_json)
}

/// Checkpoint file path under `root` using a deterministic numbering scheme.
pub fn checkpoint_path(root: &Path, sweep: usize) -> PathBuf {
    root.join(format!("ckpt_{sweep:05}.json"))
}
