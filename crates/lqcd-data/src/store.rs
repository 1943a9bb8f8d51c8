//! The append-only observable store.
//!
//! A dataset is a header plus an ordered map from [`RecordKey`] to
//! measurement records. Writes never overwrite: a duplicate key fails
//! explicitly so two measurements can never be silently conflated. The
//! on-disk form is a single versioned JSON document whose header carries
//! the lattice shape, so a reader can reject payloads from an
//! incompatible geometry before touching any record.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use lqcd_core::errors::{ErrorInfo, LatticeError};
use lqcd_core::SchemaVersion;
use lqcd_lattice::LatticeShape;
use lqcd_spec::ObservableRecord;

use crate::key::RecordKey;

/// Schema version written into every dataset file.
pub const DATASET_SCHEMA: SchemaVersion = SchemaVersion::new(1, 0, 0);

/// Dataset header: identity and compatibility information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSetHeader {
    /// Schema version of the container format.
    pub schema_version: SchemaVersion,
    /// Ensemble identity the records belong to.
    pub ensemble: String,
    /// Lattice shape the measurements were taken on.
    pub shape: LatticeShape,
    /// Gauge coupling of the ensemble.
    pub beta: f64,
    /// Canonical hash of the producing configuration.
    pub config_hash: String,
    /// ISO-8601 creation timestamp.
    pub created_at: String,
}

impl DataSetHeader {
    /// Creates a header stamped with the current time.
    pub fn new(
        ensemble: impl Into<String>,
        shape: LatticeShape,
        beta: f64,
        config_hash: impl Into<String>,
    ) -> Self {
        Self {
            schema_version: DATASET_SCHEMA,
            ensemble: ensemble.into(),
            shape,
            beta,
            config_hash: config_hash.into(),
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct DataSetPayload {
    header: DataSetHeader,
    entries: Vec<(RecordKey, ObservableRecord)>,
}

/// Append-only store mapping record keys to measurement payloads.
#[derive(Debug)]
pub struct DataSet {
    header: DataSetHeader,
    records: BTreeMap<RecordKey, ObservableRecord>,
    path: Option<PathBuf>,
}

impl DataSet {
    /// Creates an in-memory dataset.
    pub fn in_memory(header: DataSetHeader) -> Self {
        Self {
            header,
            records: BTreeMap::new(),
            path: None,
        }
    }

    /// Creates a dataset bound to an output file written on `flush`.
    pub fn create(path: impl Into<PathBuf>, header: DataSetHeader) -> Self {
        Self {
            header,
            records: BTreeMap::new(),
            path: Some(path.into()),
        }
    }

    /// Opens a dataset file, validating schema version and shape integrity.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LatticeError> {
        let path = path.into();
        let contents = fs::read_to_string(&path).map_err(|err| {
            LatticeError::Serde(
                ErrorInfo::new("dataset-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        let payload: DataSetPayload = serde_json::from_str(&contents).map_err(|err| {
            LatticeError::Serde(
                ErrorInfo::new("dataset-parse", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        if payload.header.schema_version.major != DATASET_SCHEMA.major {
            return Err(LatticeError::Serde(
                ErrorInfo::new(
                    "dataset-schema",
                    format!(
                        "dataset schema {}.{}.{} incompatible with supported {}.{}.{}",
                        payload.header.schema_version.major,
                        payload.header.schema_version.minor,
                        payload.header.schema_version.patch,
                        DATASET_SCHEMA.major,
                        DATASET_SCHEMA.minor,
                        DATASET_SCHEMA.patch
                    ),
                )
                .with_context("path", path.display().to_string()),
            ));
        }
        if let Err(err) = LatticeShape::new(payload.header.shape.extents()) {
            return Err(LatticeError::ShapeMismatch(
                ErrorInfo::new(
                    "dataset-shape",
                    format!("stored lattice shape is invalid: {}", err.info().message),
                )
                .with_context("path", path.display().to_string()),
            ));
        }
        let mut records = BTreeMap::new();
        for (key, record) in payload.entries {
            if records.insert(key.clone(), record).is_some() {
                return Err(LatticeError::DuplicateKey(
                    ErrorInfo::new(
                        "dataset-corrupt",
                        format!("key {key} appears twice in the stored payload"),
                    )
                    .with_context("path", path.display().to_string()),
                ));
            }
        }
        Ok(Self {
            header: payload.header,
            records,
            path: Some(path),
        })
    }

    /// The dataset header.
    pub fn header(&self) -> &DataSetHeader {
        &self.header
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Appends a record; refuses to overwrite an existing key.
    pub fn put(&mut self, key: RecordKey, record: ObservableRecord) -> Result<(), LatticeError> {
        if self.records.contains_key(&key) {
            return Err(LatticeError::DuplicateKey(
                ErrorInfo::new(
                    "dataset-duplicate",
                    format!("key {key} already holds a record"),
                )
                .with_context("ensemble", key.ensemble.clone())
                .with_context("sweep", key.sweep.to_string())
                .with_context("observable", key.observable.clone())
                .with_hint("each (ensemble, sweep, observable) may be written once"),
            ));
        }
        self.records.insert(key, record);
        Ok(())
    }

    /// Looks up one record.
    pub fn get(&self, key: &RecordKey) -> Option<&ObservableRecord> {
        self.records.get(key)
    }

    /// Key-ordered iterator over all records. Finite and restartable.
    pub fn iter(&self) -> impl Iterator<Item = (&RecordKey, &ObservableRecord)> {
        self.records.iter()
    }

    /// Writes the dataset to its bound path.
    ///
    /// In-memory datasets flush as a no-op; bound datasets rewrite the
    /// whole document (the store is small relative to the field data and
    /// the rewrite keeps the on-disk form a single valid JSON value).
    pub fn flush(&self) -> Result<(), LatticeError> {
        let path = match &self.path {
            Some(path) => path,
            None => return Ok(()),
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                LatticeError::Serde(
                    ErrorInfo::new("dataset-mkdir", err.to_string())
                        .with_context("path", parent.display().to_string()),
                )
            })?;
        }
        let payload = DataSetPayload {
            header: self.header.clone(),
            entries: self
                .records
                .iter()
                .map(|(key, record)| (key.clone(), record.clone()))
                .collect(),
        };
        let json = serde_json::to_string_pretty(&payload).map_err(|err| {
            LatticeError::Serde(
                ErrorInfo::new("dataset-serialize", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        fs::write(path, json).map_err(|err| {
            LatticeError::Serde(
                ErrorInfo::new("dataset-write", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }

    /// Path the dataset flushes to, if bound.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
