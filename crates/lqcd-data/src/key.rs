//! Record keys for the observable store.

use serde::{Deserialize, Serialize};

/// Key addressing one measurement: ensemble, sweep, and observable name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordKey {
    /// Ensemble identity (normally the config hash or a user label).
    pub ensemble: String,
    /// Sweep index the measurement was taken at.
    pub sweep: usize,
    /// Observable name.
    pub observable: String,
}

impl RecordKey {
    /// Creates a record key.
    pub fn new(ensemble: impl Into<String>, sweep: usize, observable: impl Into<String>) -> Self {
        Self {
            ensemble: ensemble.into(),
            sweep,
            observable: observable.into(),
        }
    }
}

impl std::fmt::Display for RecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{:06}/{}", self.ensemble, self.sweep, self.observable)
    }
}
