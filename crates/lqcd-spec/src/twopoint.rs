//! Zero-momentum two-point correlator.

use lqcd_core::errors::{ErrorInfo, LatticeError};
use lqcd_core::{NUM_COLOURS, NUM_DIMS};
use lqcd_lattice::Lattice;

use crate::cg::SolverBudget;
use crate::dirac::DiracOperator;
use crate::observable::{Observable, ObservableValue};
use crate::propagator::solve_point_source;

/// Pseudoscalar correlator as a function of temporal separation.
///
/// `C(t) = sum_x sum_ab |G_ab(x, t0 + t)|^2`, contracted from the same
/// point-source solves the propagator uses. The series is indexed by
/// separation from the source timeslice and has length equal to the
/// temporal extent.
#[derive(Debug, Clone, Copy)]
pub struct TwoPoint {
    /// Source site coordinates.
    pub source: [usize; NUM_DIMS],
    /// Fermion mass.
    pub mass: f64,
    /// Iteration/tolerance budget per solve.
    pub solver: SolverBudget,
}

impl TwoPoint {
    /// Correlator from a point source at the origin.
    pub fn at_origin(mass: f64, solver: SolverBudget) -> Self {
        Self {
            source: [0; NUM_DIMS],
            mass,
            solver,
        }
    }
}

impl Observable for TwoPoint {
    fn name(&self) -> &str {
        "two-point"
    }

    fn measure(&self, field: &Lattice) -> Result<ObservableValue, LatticeError> {
        let shape = field.shape();
        for axis in 0..NUM_DIMS {
            if self.source[axis] >= shape.extent(axis) {
                return Err(LatticeError::ShapeMismatch(
                    ErrorInfo::new(
                        "source-outside-lattice",
                        format!(
                            "source coordinate {} exceeds extent {} along axis {axis}",
                            self.source[axis],
                            shape.extent(axis)
                        ),
                    )
                    .with_context("axis", axis.to_string()),
                ));
            }
        }
        let source_site = shape.site_index(self.source);
        let source_time = self.source[3];
        let temporal = shape.temporal_extent();
        let dirac = DiracOperator::new(field, self.mass)?;

        let mut correlator = vec![0.0; temporal];
        for colour in 0..NUM_COLOURS {
            let solution = solve_point_source(&dirac, source_site, colour, &self.solver)?;
            for site in 0..field.volume() {
                let t = shape.site_coords(site)[3];
                let separation = (t + temporal - source_time) % temporal;
                correlator[separation] += solution.get(site).norm_sqr();
            }
        }

        Ok(ObservableValue::Series {
            values: correlator,
        })
    }
}
