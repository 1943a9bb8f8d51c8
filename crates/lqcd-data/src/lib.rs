#![deny(missing_docs)]
#![doc = "Versioned, append-only persistence for observable results."]

/// Record keys.
pub mod key;
/// The dataset container.
pub mod store;

pub use key::RecordKey;
pub use store::{DataSet, DataSetHeader, DATASET_SCHEMA};
