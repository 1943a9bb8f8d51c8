//! The gauge-field container.
//!
//! Links live in one flat allocation indexed by `site * 4 + direction`.
//! Every accessor reduces site indices modulo the volume; coordinate-based
//! access additionally applies the boundary phase collected while wrapping.

use lqcd_core::errors::{ErrorInfo, LatticeError};
use lqcd_core::su3::ColourMatrix;
use lqcd_core::{RngHandle, NUM_DIMS};

use crate::layout::{check_axis, BoundaryKind, LatticeShape};

/// Gauge-field container: a 4D lattice of SU(3) link matrices.
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    shape: LatticeShape,
    boundaries: [BoundaryKind; NUM_DIMS],
    beta: f64,
    links: Vec<ColourMatrix>,
}

impl Lattice {
    /// Creates a cold-start lattice: every link is the identity.
    pub fn cold_start(shape: LatticeShape, boundaries: [BoundaryKind; NUM_DIMS], beta: f64) -> Self {
        let links = vec![ColourMatrix::identity(); shape.volume() * NUM_DIMS];
        Self {
            shape,
            boundaries,
            beta,
            links,
        }
    }

    /// Creates a hot-start lattice: every link is an independent random
    /// SU(3) element drawn from the provided stream.
    pub fn hot_start(
        shape: LatticeShape,
        boundaries: [BoundaryKind; NUM_DIMS],
        beta: f64,
        rng: &mut RngHandle,
    ) -> Self {
        let links = (0..shape.volume() * NUM_DIMS)
            .map(|_| ColourMatrix::random_special_unitary(rng))
            .collect();
        Self {
            shape,
            boundaries,
            beta,
            links,
        }
    }

    /// Rebuilds a lattice from previously serialized parts.
    ///
    /// The link count must match `volume * 4`; anything else is a shape
    /// mismatch from a foreign or truncated payload.
    pub fn from_parts(
        shape: LatticeShape,
        boundaries: [BoundaryKind; NUM_DIMS],
        beta: f64,
        links: Vec<ColourMatrix>,
    ) -> Result<Self, LatticeError> {
        let expected = shape.volume() * NUM_DIMS;
        if links.len() != expected {
            return Err(LatticeError::ShapeMismatch(
                ErrorInfo::new(
                    "link-count",
                    format!("payload holds {} links, shape needs {expected}", links.len()),
                )
                .with_context("expected", expected.to_string())
                .with_context("actual", links.len().to_string()),
            ));
        }
        Ok(Self {
            shape,
            boundaries,
            beta,
            links,
        })
    }

    /// Lattice shape.
    pub fn shape(&self) -> LatticeShape {
        self.shape
    }

    /// Per-axis boundary conditions.
    pub fn boundaries(&self) -> [BoundaryKind; NUM_DIMS] {
        self.boundaries
    }

    /// Gauge coupling attached to the field.
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Number of lattice sites.
    pub fn volume(&self) -> usize {
        self.shape.volume()
    }

    /// Read-only view of the raw link storage.
    pub fn links(&self) -> &[ColourMatrix] {
        &self.links
    }

    fn link_slot(&self, site: usize, direction: usize) -> usize {
        (site % self.volume()) * NUM_DIMS + direction
    }

    /// Returns the link at `(site mod volume, direction)`.
    pub fn link(&self, site: usize, direction: usize) -> Result<ColourMatrix, LatticeError> {
        check_axis(direction)?;
        Ok(self.links[self.link_slot(site, direction)])
    }

    /// Returns the link at signed coordinates, wrapped, with the boundary
    /// phase applied for every antiperiodic crossing.
    pub fn link_at(
        &self,
        coords: [i64; NUM_DIMS],
        direction: usize,
    ) -> Result<ColourMatrix, LatticeError> {
        check_axis(direction)?;
        Ok(self.link_wrapped(coords, direction))
    }

    /// Phase-aware link lookup for call sites with a pre-validated axis.
    pub(crate) fn link_wrapped(&self, coords: [i64; NUM_DIMS], direction: usize) -> ColourMatrix {
        let (wrapped, crossings) = self.shape.wrap(coords);
        let mut phase = 1.0;
        for axis in 0..NUM_DIMS {
            if crossings[axis].rem_euclid(2) != 0 {
                phase *= self.boundaries[axis].crossing_phase();
            }
        }
        let link = self.links[self.link_slot(self.shape.site_index(wrapped), direction)];
        if phase < 0.0 {
            link.scale(-1.0)
        } else {
            link
        }
    }

    /// Replaces a link after checking gauge-group membership.
    pub fn set_link(
        &mut self,
        site: usize,
        direction: usize,
        matrix: ColourMatrix,
        tolerance: f64,
    ) -> Result<(), LatticeError> {
        check_axis(direction)?;
        let drift = matrix.unitarity_error();
        if drift > tolerance {
            return Err(LatticeError::InvalidMatrix(
                ErrorInfo::new(
                    "not-special-unitary",
                    format!("candidate link drifts {drift:.3e} from SU(3)"),
                )
                .with_context("site", (site % self.volume()).to_string())
                .with_context("direction", direction.to_string())
                .with_context("drift", format!("{drift:.3e}"))
                .with_hint("reunitarise the candidate or use set_link_raw inside an update"),
            ));
        }
        let slot = self.link_slot(site, direction);
        self.links[slot] = matrix;
        Ok(())
    }

    /// Replaces a link without the membership check.
    ///
    /// Reserved for update algorithms that re-unitarise after the fact.
    pub fn set_link_raw(
        &mut self,
        site: usize,
        direction: usize,
        matrix: ColourMatrix,
    ) -> Result<(), LatticeError> {
        check_axis(direction)?;
        let slot = self.link_slot(site, direction);
        self.links[slot] = matrix;
        Ok(())
    }

    /// Projects every drifted link back onto SU(3).
    ///
    /// Links whose membership error exceeds `tolerance` are replaced by
    /// their Gram-Schmidt projection. Returns the number of corrected
    /// links; the pass is logged so the correction stays visible.
    pub fn reunitarise(&mut self, tolerance: f64) -> usize {
        let mut corrected = 0usize;
        let mut worst: f64 = 0.0;
        for link in self.links.iter_mut() {
            let drift = link.unitarity_error();
            if drift > tolerance {
                worst = worst.max(drift);
                *link = link.reunitarised();
                corrected += 1;
            }
        }
        if corrected > 0 {
            log::debug!(
                "reunitarised {corrected} links (worst drift {worst:.3e}, tolerance {tolerance:.1e})"
            );
        }
        corrected
    }

    /// Worst gauge-group membership error over all links.
    pub fn max_unitarity_error(&self) -> f64 {
        self.links
            .iter()
            .map(|link| link.unitarity_error())
            .fold(0.0, f64::max)
    }
}
