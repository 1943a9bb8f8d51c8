//! Per-sweep metrics collection and CSV export.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Phase a metric sample was recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SamplePhase {
    /// Equilibration sweeps before any measurement.
    Thermalizing,
    /// Measurement-phase sweeps.
    Measuring,
}

impl SamplePhase {
    fn as_str(&self) -> &'static str {
        match self {
            SamplePhase::Thermalizing => "thermalizing",
            SamplePhase::Measuring => "measuring",
        }
    }
}

/// One sweep's worth of diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    /// Sweep number (1-based, counting from run start).
    pub sweep: usize,
    /// Run phase when the sample was recorded.
    pub phase: SamplePhase,
    /// Average plaquette after the sweep.
    pub plaquette: f64,
    /// Accepted proposals within the sweep.
    pub accepted: usize,
    /// Proposals issued within the sweep.
    pub proposed: usize,
}

/// Collects per-sweep samples and field-configuration coverage.
#[derive(Debug, Default)]
pub struct MetricsRecorder {
    samples: Vec<MetricSample>,
    field_hashes: IndexSet<String>,
}

impl MetricsRecorder {
    /// Creates a new recorder instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a sweep sample.
    pub fn push_sample(&mut self, sample: MetricSample) {
        self.samples.push(sample);
    }

    /// Tracks the canonical hash of a measured field configuration.
    pub fn note_field_hash(&mut self, hash: String) {
        self.field_hashes.insert(hash);
    }

    /// Returns an immutable view over the recorded samples.
    pub fn samples(&self) -> &[MetricSample] {
        &self.samples
    }

    /// Number of distinct field configurations measured.
    pub fn unique_configurations(&self) -> usize {
        self.field_hashes.len()
    }

    /// Writes the recorded metrics to a CSV file.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let mut file = File::create(path)?;
        writeln!(file, "sweep,phase,plaquette,accepted,proposed")?;
        for sample in &self.samples {
            writeln!(
                file,
                "{},{},{:.9},{},{}",
                sample.sweep,
                sample.phase.as_str(),
                sample.plaquette,
                sample.accepted,
                sample.proposed
            )?;
        }
        Ok(())
    }
}
