//! The observable capability and its result types.

use serde::{Deserialize, Serialize};

use lqcd_core::LatticeError;
use lqcd_lattice::Lattice;

/// Numeric payload produced by a measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ObservableValue {
    /// A single number (e.g. the average plaquette).
    Scalar {
        /// The measured value.
        value: f64,
    },
    /// A sequence indexed by separation or time.
    Series {
        /// The measured values in index order.
        values: Vec<f64>,
    },
    /// A dense row-major table.
    Matrix {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
        /// Row-major cell values, `data[row * cols + col]`.
        data: Vec<f64>,
    },
}

impl ObservableValue {
    /// Convenience accessor for scalar payloads.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            ObservableValue::Scalar { value } => Some(*value),
            _ => None,
        }
    }

    /// Convenience accessor for series payloads.
    pub fn as_series(&self) -> Option<&[f64]> {
        match self {
            ObservableValue::Series { values } => Some(values),
            _ => None,
        }
    }
}

/// A measurement result tagged with the configuration it was taken from.
///
/// The sweep index and config hash keep results from incompatible ensembles
/// from ever being mixed downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservableRecord {
    /// Name of the observable that produced the value.
    pub observable: String,
    /// Sweep index the field had when measured.
    pub sweep: usize,
    /// Canonical hash of the run configuration.
    pub config_hash: String,
    /// The measured payload.
    pub value: ObservableValue,
}

impl ObservableRecord {
    /// Creates a tagged measurement record.
    pub fn new(
        observable: impl Into<String>,
        sweep: usize,
        config_hash: impl Into<String>,
        value: ObservableValue,
    ) -> Self {
        Self {
            observable: observable.into(),
            sweep,
            config_hash: config_hash.into(),
            value,
        }
    }
}

/// Measurement capability over a gauge-field snapshot.
///
/// `measure` is pure with respect to the field: implementations receive a
/// shared borrow and must not cache state between calls.
pub trait Observable: Send + Sync {
    /// Name used to key results in datasets.
    fn name(&self) -> &str;

    /// Computes the observable against the provided field.
    fn measure(&self, field: &Lattice) -> Result<ObservableValue, LatticeError>;
}

/// The mean normalized plaquette, the standard thermalization diagnostic.
#[derive(Debug, Clone, Copy, Default)]
pub struct AveragePlaquette;

impl Observable for AveragePlaquette {
    fn name(&self) -> &str {
        "average-plaquette"
    }

    fn measure(&self, field: &Lattice) -> Result<ObservableValue, LatticeError> {
        Ok(ObservableValue::Scalar {
            value: field.average_plaquette(),
        })
    }
}
