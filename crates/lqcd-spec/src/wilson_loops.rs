//! Rectangular Wilson-loop expectation tables.

use lqcd_core::errors::{ErrorInfo, LatticeError};
use lqcd_core::{NUM_COLOURS, NUM_DIMS};
use lqcd_lattice::Lattice;

use crate::observable::{Observable, ObservableValue};

/// Table of `<Re Tr W(r, t) / 3>` for spatial extent `r` and temporal
/// extent `t`, averaged over all sites and the three spatial directions.
#[derive(Debug, Clone, Copy)]
pub struct WilsonLoops {
    /// Largest spatial extent measured.
    pub max_r: usize,
    /// Largest temporal extent measured.
    pub max_t: usize,
}

impl WilsonLoops {
    /// Creates a loop table observable.
    pub fn new(max_r: usize, max_t: usize) -> Self {
        Self { max_r, max_t }
    }

    fn check_shape(&self, field: &Lattice) -> Result<(), LatticeError> {
        let shape = field.shape();
        let min_spatial = (0..3).map(|axis| shape.extent(axis)).min().unwrap_or(0);
        if self.max_r == 0 || self.max_t == 0 {
            return Err(LatticeError::ShapeMismatch(
                ErrorInfo::new("empty-loop-table", "loop extents must be at least one")
                    .with_context("max_r", self.max_r.to_string())
                    .with_context("max_t", self.max_t.to_string()),
            ));
        }
        if self.max_r >= min_spatial || self.max_t >= shape.temporal_extent() {
            return Err(LatticeError::ShapeMismatch(
                ErrorInfo::new(
                    "loop-exceeds-lattice",
                    format!(
                        "loop table {}x{} does not fit a {:?} lattice",
                        self.max_r,
                        self.max_t,
                        shape.extents()
                    ),
                )
                .with_context("max_r", self.max_r.to_string())
                .with_context("max_t", self.max_t.to_string())
                .with_hint("loops must stay shorter than the corresponding extents"),
            ));
        }
        Ok(())
    }
}

impl Observable for WilsonLoops {
    fn name(&self) -> &str {
        "wilson-loops"
    }

    fn measure(&self, field: &Lattice) -> Result<ObservableValue, LatticeError> {
        self.check_shape(field)?;
        let shape = field.shape();
        let volume = field.volume();
        let time_axis = NUM_DIMS - 1;

        let mut data = vec![0.0; self.max_r * self.max_t];
        for site in 0..volume {
            let corner = shape.site_coords(site);
            for spatial in 0..3 {
                for r in 1..=self.max_r {
                    for t in 1..=self.max_t {
                        let loop_product =
                            field.wilson_loop(corner, spatial, r, time_axis, t)?;
                        data[(r - 1) * self.max_t + (t - 1)] +=
                            loop_product.re_trace() / NUM_COLOURS as f64;
                    }
                }
            }
        }
        let samples = (volume * 3) as f64;
        for cell in data.iter_mut() {
            *cell /= samples;
        }

        Ok(ObservableValue::Matrix {
            rows: self.max_r,
            cols: self.max_t,
            data,
        })
    }
}
