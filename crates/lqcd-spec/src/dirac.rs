//! Massive staggered Dirac operator over a gauge background.
//!
//! The operator is `D = m + H` with the anti-hermitian hopping term
//! `(H x)(n) = 1/2 sum_mu eta_mu(n) [U_mu(n) x(n+mu) - U_mu(n-mu)^dag x(n-mu)]`
//! and staggered phases `eta_mu(n) = (-1)^(n_0 + ... + n_(mu-1))`. Boundary
//! phases from the field's boundary conditions multiply the hopping term on
//! every crossing, so antiperiodic time enters the solve exactly once per
//! wrap. `D^dag = m - H`, which makes `D^dag D` positive definite for any
//! positive mass.

use lqcd_core::errors::{ErrorInfo, LatticeError};
use lqcd_core::su3::ColourVector;
use lqcd_core::NUM_DIMS;
use lqcd_lattice::Lattice;
use num_complex::Complex64;

/// A colour-vector field over all lattice sites (flat, site-indexed).
#[derive(Debug, Clone, PartialEq)]
pub struct FermionField {
    values: Vec<ColourVector>,
}

impl FermionField {
    /// All-zero field for `volume` sites.
    pub fn zeros(volume: usize) -> Self {
        Self {
            values: vec![ColourVector::zero(); volume],
        }
    }

    /// Point source: a single unit colour component at one site.
    pub fn point_source(volume: usize, site: usize, colour: usize) -> Self {
        let mut out = Self::zeros(volume);
        out.values[site % volume] = ColourVector::unit(colour);
        out
    }

    /// Number of sites.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the field has no sites.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at a site.
    pub fn get(&self, site: usize) -> ColourVector {
        self.values[site]
    }

    /// Overwrites the value at a site.
    pub fn set(&mut self, site: usize, value: ColourVector) {
        self.values[site] = value;
    }

    /// Hermitian inner product summed over sites.
    pub fn dot(&self, other: &FermionField) -> Complex64 {
        self.values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| a.dot(b))
            .sum()
    }

    /// Squared 2-norm summed over sites.
    pub fn norm_sqr(&self) -> f64 {
        self.values.iter().map(|value| value.norm_sqr()).sum()
    }

    /// Site-wise `self + factor * other` with a real factor.
    pub fn add_scaled(&self, other: &FermionField, factor: f64) -> Self {
        let factor = Complex64::new(factor, 0.0);
        Self {
            values: self
                .values
                .iter()
                .zip(other.values.iter())
                .map(|(a, b)| a.add_scaled(b, factor))
                .collect(),
        }
    }
}

/// Staggered phase `eta_mu(n)`.
pub fn staggered_phase(coords: [usize; NUM_DIMS], mu: usize) -> f64 {
    let exponent: usize = coords.iter().take(mu).sum();
    if exponent % 2 == 0 {
        1.0
    } else {
        -1.0
    }
}

/// The staggered Dirac operator bound to one gauge background.
#[derive(Debug, Clone, Copy)]
pub struct DiracOperator<'a> {
    field: &'a Lattice,
    mass: f64,
}

impl<'a> DiracOperator<'a> {
    /// Binds the operator to a gauge background.
    ///
    /// The mass must be positive so the normal operator stays invertible.
    pub fn new(field: &'a Lattice, mass: f64) -> Result<Self, LatticeError> {
        if !(mass > 0.0) {
            return Err(LatticeError::Config(
                ErrorInfo::new("bad-mass", format!("fermion mass {mass} must be positive"))
                    .with_context("mass", mass.to_string()),
            ));
        }
        Ok(Self { field, mass })
    }

    /// The gauge background the operator reads.
    pub fn field(&self) -> &Lattice {
        self.field
    }

    /// The fermion mass.
    pub fn mass(&self) -> f64 {
        self.mass
    }

    fn check_field(&self, fermion: &FermionField) -> Result<(), LatticeError> {
        let expected = self.field.volume();
        if fermion.len() != expected {
            return Err(LatticeError::ShapeMismatch(
                ErrorInfo::new(
                    "fermion-volume",
                    format!(
                        "fermion field has {} sites, gauge background has {expected}",
                        fermion.len()
                    ),
                )
                .with_context("expected", expected.to_string())
                .with_context("actual", fermion.len().to_string()),
            ));
        }
        Ok(())
    }

    fn hopping(&self, x: &FermionField) -> Result<FermionField, LatticeError> {
        let shape = self.field.shape();
        let boundaries = self.field.boundaries();
        let volume = self.field.volume();
        let mut out = FermionField::zeros(volume);
        for site in 0..volume {
            let coords = shape.site_coords(site);
            let mut acc = ColourVector::zero();
            for mu in 0..NUM_DIMS {
                let eta = staggered_phase(coords, mu);
                let (forward, forward_crossings) = shape.shift(site, mu, 1)?;
                let (backward, backward_crossings) = shape.shift(site, mu, -1)?;
                let forward_phase = crossing_phase(boundaries[mu], forward_crossings);
                let backward_phase = crossing_phase(boundaries[mu], backward_crossings);

                let link_here = self.field.link(site, mu)?;
                let link_behind = self.field.link(backward, mu)?;

                let forward_term = link_here.mul_vector(&x.get(forward));
                let backward_term = link_behind.adjoint_mul_vector(&x.get(backward));

                let factor = Complex64::new(0.5 * eta, 0.0);
                acc = acc.add_scaled(&forward_term, factor * forward_phase);
                acc = acc.add_scaled(&backward_term, -factor * backward_phase);
            }
            out.set(site, acc);
        }
        Ok(out)
    }

    /// Applies `D = m + H`.
    pub fn apply(&self, x: &FermionField) -> Result<FermionField, LatticeError> {
        self.check_field(x)?;
        let hopped = self.hopping(x)?;
        Ok(x.scale_real(self.mass).add_field(&hopped))
    }

    /// Applies `D^dag = m - H`.
    pub fn apply_adjoint(&self, x: &FermionField) -> Result<FermionField, LatticeError> {
        self.check_field(x)?;
        let hopped = self.hopping(x)?;
        Ok(x.scale_real(self.mass).add_scaled(&hopped, -1.0))
    }

    /// Applies the normal operator `D^dag D`.
    pub fn apply_normal(&self, x: &FermionField) -> Result<FermionField, LatticeError> {
        let dx = self.apply(x)?;
        self.apply_adjoint(&dx)
    }
}

fn crossing_phase(boundary: lqcd_lattice::BoundaryKind, crossings: i64) -> f64 {
    if crossings.rem_euclid(2) == 0 {
        1.0
    } else {
        boundary.crossing_phase()
    }
}

impl FermionField {
    /// Site-wise real rescale.
    pub fn scale_real(&self, factor: f64) -> Self {
        let factor = Complex64::new(factor, 0.0);
        Self {
            values: self.values.iter().map(|value| value.scale(factor)).collect(),
        }
    }

    /// Site-wise sum.
    pub fn add_field(&self, other: &FermionField) -> Self {
        Self {
            values: self
                .values
                .iter()
                .zip(other.values.iter())
                .map(|(a, b)| *a + *b)
                .collect(),
        }
    }
}
