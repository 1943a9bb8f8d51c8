//! SU(3) colour algebra: link matrices, colour vectors, and the SU(2)
//! subgroup helpers used by the heat-bath update.
//!
//! Matrices are stored as a fixed 3x3 array of `Complex64`, kept `Copy` so
//! the lattice can hold them in one flat allocation. Group membership is a
//! numerical statement: a link is accepted when `unitarity_error` stays
//! below the caller's tolerance, and `reunitarised` projects a drifted
//! matrix back onto the group.

use num_complex::Complex64;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use crate::rng::{gaussian, RngHandle};

/// Number of colours (the gauge-group matrix dimension).
pub const NUM_COLOURS: usize = 3;

/// The three SU(2) subgroups of SU(3) used by Cabibbo-Marinari style updates.
pub const SU2_SUBGROUPS: [(usize, usize); 3] = [(0, 1), (0, 2), (1, 2)];

/// A 3x3 complex colour matrix (gauge link candidate).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColourMatrix {
    m: [[Complex64; 3]; 3],
}

/// A 3-component complex colour vector (one fermion site value).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColourVector {
    v: [Complex64; 3],
}

impl ColourMatrix {
    /// The zero matrix.
    pub fn zero() -> Self {
        Self {
            m: [[Complex64::new(0.0, 0.0); 3]; 3],
        }
    }

    /// The identity matrix (cold-start link).
    pub fn identity() -> Self {
        let mut out = Self::zero();
        for i in 0..3 {
            out.m[i][i] = Complex64::new(1.0, 0.0);
        }
        out
    }

    /// Builds a matrix from a row-major element array.
    pub fn from_rows(rows: [[Complex64; 3]; 3]) -> Self {
        Self { m: rows }
    }

    /// Returns the element at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.m[row][col]
    }

    /// Overwrites the element at `(row, col)`.
    pub fn set(&mut self, row: usize, col: usize, value: Complex64) {
        self.m[row][col] = value;
    }

    /// Hermitian conjugate.
    pub fn adjoint(&self) -> Self {
        let mut out = Self::zero();
        for i in 0..3 {
            for j in 0..3 {
                out.m[i][j] = self.m[j][i].conj();
            }
        }
        out
    }

    /// Matrix trace.
    pub fn trace(&self) -> Complex64 {
        self.m[0][0] + self.m[1][1] + self.m[2][2]
    }

    /// Real part of the trace, the quantity entering the Wilson action.
    pub fn re_trace(&self) -> f64 {
        self.trace().re
    }

    /// Determinant by cofactor expansion along the first row.
    pub fn determinant(&self) -> Complex64 {
        let m = &self.m;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Frobenius norm.
    pub fn frobenius_norm(&self) -> f64 {
        let mut acc = 0.0;
        for row in &self.m {
            for value in row {
                acc += value.norm_sqr();
            }
        }
        acc.sqrt()
    }

    /// Rescales every element by a real factor.
    pub fn scale(&self, factor: f64) -> Self {
        let mut out = *self;
        for row in &mut out.m {
            for value in row.iter_mut() {
                *value *= factor;
            }
        }
        out
    }

    /// Rescales every element by a complex factor.
    pub fn scale_complex(&self, factor: Complex64) -> Self {
        let mut out = *self;
        for row in &mut out.m {
            for value in row.iter_mut() {
                *value *= factor;
            }
        }
        out
    }

    /// Applies the matrix to a colour vector.
    pub fn mul_vector(&self, vector: &ColourVector) -> ColourVector {
        let mut out = ColourVector::zero();
        for i in 0..3 {
            let mut acc = Complex64::new(0.0, 0.0);
            for j in 0..3 {
                acc += self.m[i][j] * vector.v[j];
            }
            out.v[i] = acc;
        }
        out
    }

    /// Applies the hermitian conjugate of the matrix to a colour vector.
    pub fn adjoint_mul_vector(&self, vector: &ColourVector) -> ColourVector {
        let mut out = ColourVector::zero();
        for i in 0..3 {
            let mut acc = Complex64::new(0.0, 0.0);
            for j in 0..3 {
                acc += self.m[j][i].conj() * vector.v[j];
            }
            out.v[i] = acc;
        }
        out
    }

    /// Maximum deviation from SU(3) membership.
    ///
    /// Combines the elementwise error of `U U^dag - 1` with the distance of
    /// the determinant from unity, so both unitarity drift and determinant
    /// drift are caught by a single threshold.
    pub fn unitarity_error(&self) -> f64 {
        let product = *self * self.adjoint();
        let mut worst: f64 = 0.0;
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j {
                    Complex64::new(1.0, 0.0)
                } else {
                    Complex64::new(0.0, 0.0)
                };
                worst = worst.max((product.m[i][j] - expected).norm());
            }
        }
        let det_drift = (self.determinant() - Complex64::new(1.0, 0.0)).norm();
        worst.max(det_drift)
    }

    /// Whether the matrix lies within `tolerance` of SU(3).
    pub fn is_special_unitary(&self, tolerance: f64) -> bool {
        self.unitarity_error() <= tolerance
    }

    /// Projects the matrix back onto SU(3).
    ///
    /// Modified Gram-Schmidt over the rows restores unitarity; dividing by
    /// the cube root of the determinant phase restores unit determinant.
    pub fn reunitarised(&self) -> Self {
        let mut rows = [
            [self.m[0][0], self.m[0][1], self.m[0][2]],
            [self.m[1][0], self.m[1][1], self.m[1][2]],
            [self.m[2][0], self.m[2][1], self.m[2][2]],
        ];
        for i in 0..3 {
            for j in 0..i {
                let overlap = dot_rows(&rows[j], &rows[i]);
                for k in 0..3 {
                    let adjusted = rows[i][k] - overlap * rows[j][k];
                    rows[i][k] = adjusted;
                }
            }
            let norm = rows[i].iter().map(|value| value.norm_sqr()).sum::<f64>().sqrt();
            if norm > 0.0 {
                for value in rows[i].iter_mut() {
                    *value /= norm;
                }
            }
        }
        let orthonormal = Self::from_rows(rows);
        let phase = orthonormal.determinant().arg();
        orthonormal.scale_complex(Complex64::from_polar(1.0, -phase / 3.0))
    }

    /// Draws a random SU(3) element (hot-start link).
    pub fn random_special_unitary(rng: &mut RngHandle) -> Self {
        let mut raw = Self::zero();
        for i in 0..3 {
            for j in 0..3 {
                raw.m[i][j] = Complex64::new(gaussian(rng), gaussian(rng));
            }
        }
        raw.reunitarised()
    }

    /// Draws a random SU(3) element close to the identity.
    ///
    /// The element is a product of three embedded SU(2) rotations whose
    /// algebra components are uniform in `[-spread, spread]`. The proposal
    /// is symmetric: negating every component yields the adjoint with equal
    /// probability. `spread` must stay below ~0.5 so the quaternion norm
    /// cannot exceed one.
    pub fn random_near_identity(rng: &mut RngHandle, spread: f64) -> Self {
        let spread = spread.clamp(0.0, 0.5);
        let mut out = Self::identity();
        for subgroup in SU2_SUBGROUPS {
            let x1 = spread * (2.0 * rng.uniform() - 1.0);
            let x2 = spread * (2.0 * rng.uniform() - 1.0);
            let x3 = spread * (2.0 * rng.uniform() - 1.0);
            let radius_sq = x1 * x1 + x2 * x2 + x3 * x3;
            let a0 = (1.0 - radius_sq).max(0.0).sqrt();
            out = embed_su2([a0, x1, x2, x3], subgroup) * out;
        }
        out
    }

    /// Extracts the quaternion components of the SU(2)-projected `(i, j)` block.
    pub fn extract_su2(&self, subgroup: (usize, usize)) -> [f64; 4] {
        let (i, j) = subgroup;
        [
            (self.m[i][i].re + self.m[j][j].re) / 2.0,
            (self.m[i][j].im + self.m[j][i].im) / 2.0,
            (self.m[i][j].re - self.m[j][i].re) / 2.0,
            (self.m[i][i].im - self.m[j][j].im) / 2.0,
        ]
    }
}

/// Embeds a unit quaternion `(a0, a1, a2, a3)` as an SU(2) block of SU(3).
///
/// The block follows the Pauli-matrix convention `a0 + i a.sigma`; the
/// remaining diagonal entry is one, so the embedded matrix is in SU(3)
/// whenever the quaternion has unit norm.
pub fn embed_su2(q: [f64; 4], subgroup: (usize, usize)) -> ColourMatrix {
    let (i, j) = subgroup;
    let mut out = ColourMatrix::identity();
    out.set(i, i, Complex64::new(q[0], q[3]));
    out.set(i, j, Complex64::new(q[2], q[1]));
    out.set(j, i, Complex64::new(-q[2], q[1]));
    out.set(j, j, Complex64::new(q[0], -q[3]));
    out
}

fn dot_rows(a: &[Complex64; 3], b: &[Complex64; 3]) -> Complex64 {
    a[0].conj() * b[0] + a[1].conj() * b[1] + a[2].conj() * b[2]
}

impl Mul for ColourMatrix {
    type Output = ColourMatrix;

    fn mul(self, rhs: ColourMatrix) -> ColourMatrix {
        let mut out = ColourMatrix::zero();
        for i in 0..3 {
            for k in 0..3 {
                let lhs = self.m[i][k];
                for j in 0..3 {
                    out.m[i][j] += lhs * rhs.m[k][j];
                }
            }
        }
        out
    }
}

impl Add for ColourMatrix {
    type Output = ColourMatrix;

    fn add(self, rhs: ColourMatrix) -> ColourMatrix {
        let mut out = self;
        for i in 0..3 {
            for j in 0..3 {
                out.m[i][j] += rhs.m[i][j];
            }
        }
        out
    }
}

impl Sub for ColourMatrix {
    type Output = ColourMatrix;

    fn sub(self, rhs: ColourMatrix) -> ColourMatrix {
        let mut out = self;
        for i in 0..3 {
            for j in 0..3 {
                out.m[i][j] -= rhs.m[i][j];
            }
        }
        out
    }
}

impl AddAssign for ColourMatrix {
    fn add_assign(&mut self, rhs: ColourMatrix) {
        for i in 0..3 {
            for j in 0..3 {
                self.m[i][j] += rhs.m[i][j];
            }
        }
    }
}

impl Neg for ColourMatrix {
    type Output = ColourMatrix;

    fn neg(self) -> ColourMatrix {
        self.scale(-1.0)
    }
}

impl ColourVector {
    /// The zero vector.
    pub fn zero() -> Self {
        Self {
            v: [Complex64::new(0.0, 0.0); 3],
        }
    }

    /// Builds a vector from its components.
    pub fn from_components(v: [Complex64; 3]) -> Self {
        Self { v }
    }

    /// Unit vector with a single nonzero colour component.
    pub fn unit(colour: usize) -> Self {
        let mut out = Self::zero();
        out.v[colour] = Complex64::new(1.0, 0.0);
        out
    }

    /// Returns the component at `colour`.
    pub fn get(&self, colour: usize) -> Complex64 {
        self.v[colour]
    }

    /// Overwrites the component at `colour`.
    pub fn set(&mut self, colour: usize, value: Complex64) {
        self.v[colour] = value;
    }

    /// Fills every component with independent gaussian noise.
    pub fn gaussian(rng: &mut RngHandle) -> Self {
        let mut out = Self::zero();
        for value in out.v.iter_mut() {
            *value = Complex64::new(gaussian(rng), gaussian(rng));
        }
        out
    }

    /// Hermitian inner product `<self, other>`.
    pub fn dot(&self, other: &ColourVector) -> Complex64 {
        self.v[0].conj() * other.v[0]
            + self.v[1].conj() * other.v[1]
            + self.v[2].conj() * other.v[2]
    }

    /// Squared 2-norm.
    pub fn norm_sqr(&self) -> f64 {
        self.v.iter().map(|value| value.norm_sqr()).sum()
    }

    /// Rescales every component by a complex factor.
    pub fn scale(&self, factor: Complex64) -> Self {
        let mut out = *self;
        for value in out.v.iter_mut() {
            *value *= factor;
        }
        out
    }

    /// Component-wise `self + factor * other`.
    pub fn add_scaled(&self, other: &ColourVector, factor: Complex64) -> Self {
        let mut out = *self;
        for (lhs, rhs) in out.v.iter_mut().zip(other.v.iter()) {
            *lhs += factor * rhs;
        }
        out
    }
}

impl Add for ColourVector {
    type Output = ColourVector;

    fn add(self, rhs: ColourVector) -> ColourVector {
        let mut out = self;
        for (lhs, value) in out.v.iter_mut().zip(rhs.v.iter()) {
            *lhs += value;
        }
        out
    }
}

impl Sub for ColourVector {
    type Output = ColourVector;

    fn sub(self, rhs: ColourVector) -> ColourVector {
        let mut out = self;
        for (lhs, value) in out.v.iter_mut().zip(rhs.v.iter()) {
            *lhs -= value;
        }
        out
    }
}

/// Draws a uniform sample in [0, 1) from a raw `RngCore` stream.
///
/// Kept for call sites that only hold a `dyn RngCore`; [`RngHandle::uniform`]
/// is the preferred entry point.
pub fn uniform_from(rng: &mut dyn RngCore) -> f64 {
    (rng.next_u64() >> 11) as f64 / (1u64 << 53) as f64
}
