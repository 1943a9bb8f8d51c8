//! Site indexing and boundary-aware coordinate arithmetic.
//!
//! Sites are stored lexicographically: the index of `(x, y, z, t)` is
//! `((x * Ly + y) * Lz + z) * Lt + t`. Axis 3 is time. All coordinate
//! arithmetic wraps modulo the extents; the number of boundary crossings per
//! axis is reported so the caller can apply antiperiodic phases.

use serde::{Deserialize, Serialize};

use lqcd_core::errors::{ErrorInfo, LatticeError};
use lqcd_core::NUM_DIMS;

/// Boundary condition along one lattice axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoundaryKind {
    /// Fields wrap around without a phase.
    Periodic,
    /// Fields pick up a sign flip on every crossing.
    Antiperiodic,
}

impl BoundaryKind {
    /// Phase applied per boundary crossing.
    pub fn crossing_phase(&self) -> f64 {
        match self {
            BoundaryKind::Periodic => 1.0,
            BoundaryKind::Antiperiodic => -1.0,
        }
    }
}

/// Validated lattice extents with lexicographic index maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatticeShape {
    extents: [usize; NUM_DIMS],
}

impl LatticeShape {
    /// Creates a shape from `[Lx, Ly, Lz, Lt]`.
    ///
    /// Every extent must be positive and even; even extents keep the
    /// checkerboard partition and the staggered operator well defined.
    pub fn new(extents: [usize; NUM_DIMS]) -> Result<Self, LatticeError> {
        for (axis, &extent) in extents.iter().enumerate() {
            if extent == 0 || extent % 2 != 0 {
                return Err(LatticeError::Config(
                    ErrorInfo::new(
                        "bad-extent",
                        format!("extent {extent} along axis {axis} must be positive and even"),
                    )
                    .with_context("axis", axis.to_string())
                    .with_context("extent", extent.to_string()),
                ));
            }
        }
        Ok(Self { extents })
    }

    /// Returns the extents array.
    pub fn extents(&self) -> [usize; NUM_DIMS] {
        self.extents
    }

    /// Returns the extent along one axis.
    pub fn extent(&self, axis: usize) -> usize {
        self.extents[axis]
    }

    /// Temporal extent (axis 3).
    pub fn temporal_extent(&self) -> usize {
        self.extents[3]
    }

    /// Total number of sites.
    pub fn volume(&self) -> usize {
        self.extents.iter().product()
    }

    /// Lexicographic index of a coordinate tuple (coordinates reduced
    /// modulo the extents first).
    pub fn site_index(&self, coords: [usize; NUM_DIMS]) -> usize {
        let mut index = 0;
        for axis in 0..NUM_DIMS {
            index = index * self.extents[axis] + coords[axis] % self.extents[axis];
        }
        index
    }

    /// Coordinates of a lexicographic site index.
    pub fn site_coords(&self, site: usize) -> [usize; NUM_DIMS] {
        let mut remainder = site % self.volume();
        let mut coords = [0usize; NUM_DIMS];
        for axis in (0..NUM_DIMS).rev() {
            coords[axis] = remainder % self.extents[axis];
            remainder /= self.extents[axis];
        }
        coords
    }

    /// Checkerboard parity of a site (0 = even, 1 = odd).
    pub fn parity(&self, site: usize) -> usize {
        self.site_coords(site).iter().sum::<usize>() % 2
    }

    /// Wraps signed coordinates into range, counting boundary crossings.
    ///
    /// The crossing count per axis is `floor(c / L)`, so a step from
    /// `L - 1` to `L` crosses once and a step from `0` to `-1` crosses
    /// once in the other direction.
    pub fn wrap(&self, coords: [i64; NUM_DIMS]) -> ([usize; NUM_DIMS], [i64; NUM_DIMS]) {
        let mut wrapped = [0usize; NUM_DIMS];
        let mut crossings = [0i64; NUM_DIMS];
        for axis in 0..NUM_DIMS {
            let extent = self.extents[axis] as i64;
            crossings[axis] = coords[axis].div_euclid(extent);
            wrapped[axis] = coords[axis].rem_euclid(extent) as usize;
        }
        (wrapped, crossings)
    }

    /// Site reached by moving `steps` along `axis`, with its crossing count.
    pub fn shift(
        &self,
        site: usize,
        axis: usize,
        steps: i64,
    ) -> Result<(usize, i64), LatticeError> {
        check_axis(axis)?;
        let mut coords: [i64; NUM_DIMS] = [0; NUM_DIMS];
        for (slot, value) in coords.iter_mut().zip(self.site_coords(site)) {
            *slot = value as i64;
        }
        coords[axis] += steps;
        let (wrapped, crossings) = self.wrap(coords);
        Ok((self.site_index(wrapped), crossings[axis]))
    }
}

/// Validates a direction/axis index.
pub fn check_axis(axis: usize) -> Result<(), LatticeError> {
    if axis >= NUM_DIMS {
        return Err(LatticeError::InvalidDirection(
            ErrorInfo::new(
                "bad-direction",
                format!("direction {axis} outside the valid axis set"),
            )
            .with_context("direction", axis.to_string())
            .with_hint(format!("directions are 0..{NUM_DIMS}")),
        ));
    }
    Ok(())
}
