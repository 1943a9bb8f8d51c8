//! Plaquette, staple, and Wilson-loop primitives.
//!
//! The geometry follows the Wilson gauge action: a plaquette is the ordered
//! product of the four links around an elementary square, the staple of a
//! link is the sum over the six three-link paths closing a plaquette with
//! it, and the local action of a link is `-(beta/3) Re Tr(U A)` with `A`
//! the staple sum. The staple carries everything an update algorithm needs,
//! which keeps one sweep linear in the lattice volume.

use lqcd_core::errors::{ErrorInfo, LatticeError};
use lqcd_core::su3::ColourMatrix;
use lqcd_core::{NUM_COLOURS, NUM_DIMS};

use crate::field::Lattice;
use crate::layout::check_axis;

/// Number of distinct plaquette planes per site.
pub const NUM_PLANES: usize = 6;

fn check_plane(mu: usize, nu: usize) -> Result<(), LatticeError> {
    check_axis(mu)?;
    check_axis(nu)?;
    if mu == nu {
        return Err(LatticeError::InvalidDirection(
            ErrorInfo::new(
                "degenerate-plane",
                format!("plane ({mu}, {nu}) does not span a plaquette"),
            )
            .with_context("mu", mu.to_string())
            .with_context("nu", nu.to_string()),
        ));
    }
    Ok(())
}

impl Lattice {
    /// Ordered product of the four links around the elementary square at
    /// `site` in the `(mu, nu)` plane:
    /// `U_mu(x) U_nu(x+mu) U_mu(x+nu)^dag U_nu(x)^dag`.
    pub fn plaquette(&self, site: usize, mu: usize, nu: usize) -> Result<ColourMatrix, LatticeError> {
        check_plane(mu, nu)?;
        Ok(self.plaquette_unchecked(self.signed_coords(site), mu, nu))
    }

    /// Sum of the six staples attached to the link at `(site, mu)`.
    pub fn staple(&self, site: usize, mu: usize) -> Result<ColourMatrix, LatticeError> {
        check_axis(mu)?;
        Ok(self.staple_unchecked(self.signed_coords(site), mu))
    }

    /// Ordered product of links around the `ext_a x ext_b` rectangle with
    /// one corner at `corner`, spanned by directions `dir_a` and `dir_b`.
    pub fn wilson_loop(
        &self,
        corner: [usize; NUM_DIMS],
        dir_a: usize,
        ext_a: usize,
        dir_b: usize,
        ext_b: usize,
    ) -> Result<ColourMatrix, LatticeError> {
        check_plane(dir_a, dir_b)?;
        if ext_a == 0 || ext_b == 0 {
            return Err(LatticeError::ShapeMismatch(
                ErrorInfo::new("empty-loop", "loop extents must be at least one")
                    .with_context("ext_a", ext_a.to_string())
                    .with_context("ext_b", ext_b.to_string()),
            ));
        }
        let mut pos = [0i64; NUM_DIMS];
        for (slot, value) in pos.iter_mut().zip(corner) {
            *slot = value as i64;
        }
        let mut product = ColourMatrix::identity();
        for _ in 0..ext_a {
            product = product * self.link_wrapped(pos, dir_a);
            pos[dir_a] += 1;
        }
        for _ in 0..ext_b {
            product = product * self.link_wrapped(pos, dir_b);
            pos[dir_b] += 1;
        }
        for _ in 0..ext_a {
            pos[dir_a] -= 1;
            product = product * self.link_wrapped(pos, dir_a).adjoint();
        }
        for _ in 0..ext_b {
            pos[dir_b] -= 1;
            product = product * self.link_wrapped(pos, dir_b).adjoint();
        }
        Ok(product)
    }

    /// Mean normalized plaquette over all sites and planes.
    ///
    /// Accumulation order is fixed (site-major, `mu < nu` plane order) so
    /// the diagnostic is bit-stable across backends. Exactly 1.0 on a
    /// cold-start lattice.
    pub fn average_plaquette(&self) -> f64 {
        let volume = self.volume();
        let mut sum = 0.0;
        for site in 0..volume {
            let coords = self.signed_coords(site);
            for mu in 0..NUM_DIMS {
                for nu in (mu + 1)..NUM_DIMS {
                    sum += self.plaquette_unchecked(coords, mu, nu).re_trace()
                        / NUM_COLOURS as f64;
                }
            }
        }
        sum / (volume * NUM_PLANES) as f64
    }

    /// Local Wilson action contribution of the link at `(site, mu)`:
    /// `-(beta/3) Re Tr(U_mu(x) A_mu(x))`.
    pub fn local_action(&self, site: usize, mu: usize) -> Result<f64, LatticeError> {
        check_axis(mu)?;
        let coords = self.signed_coords(site);
        let staple = self.staple_unchecked(coords, mu);
        let link = self.link_wrapped(coords, mu);
        Ok(-(self.beta() / NUM_COLOURS as f64) * (link * staple).re_trace())
    }

    /// Total Wilson action `beta * sum_p (1 - Re Tr U_p / 3)`.
    pub fn total_action(&self) -> f64 {
        let volume = self.volume();
        let mut sum = 0.0;
        for site in 0..volume {
            let coords = self.signed_coords(site);
            for mu in 0..NUM_DIMS {
                for nu in (mu + 1)..NUM_DIMS {
                    sum += 1.0
                        - self.plaquette_unchecked(coords, mu, nu).re_trace()
                            / NUM_COLOURS as f64;
                }
            }
        }
        self.beta() * sum
    }

    fn signed_coords(&self, site: usize) -> [i64; NUM_DIMS] {
        let coords = self.shape().site_coords(site);
        let mut signed = [0i64; NUM_DIMS];
        for (slot, value) in signed.iter_mut().zip(coords) {
            *slot = value as i64;
        }
        signed
    }

    fn plaquette_unchecked(&self, coords: [i64; NUM_DIMS], mu: usize, nu: usize) -> ColourMatrix {
        let mut ahead_mu = coords;
        ahead_mu[mu] += 1;
        let mut ahead_nu = coords;
        ahead_nu[nu] += 1;
        self.link_wrapped(coords, mu)
            * self.link_wrapped(ahead_mu, nu)
            * self.link_wrapped(ahead_nu, mu).adjoint()
            * self.link_wrapped(coords, nu).adjoint()
    }

    pub(crate) fn staple_unchecked(&self, coords: [i64; NUM_DIMS], mu: usize) -> ColourMatrix {
        let mut total = ColourMatrix::zero();
        let mut ahead_mu = coords;
        ahead_mu[mu] += 1;
        for nu in 0..NUM_DIMS {
            if nu == mu {
                continue;
            }
            let mut ahead_nu = coords;
            ahead_nu[nu] += 1;
            // Upper staple: U_nu(x+mu) U_mu(x+nu)^dag U_nu(x)^dag.
            total += self.link_wrapped(ahead_mu, nu)
                * self.link_wrapped(ahead_nu, mu).adjoint()
                * self.link_wrapped(coords, nu).adjoint();
            let mut behind_nu = coords;
            behind_nu[nu] -= 1;
            let mut ahead_mu_behind_nu = ahead_mu;
            ahead_mu_behind_nu[nu] -= 1;
            // Lower staple: U_nu(x+mu-nu)^dag U_mu(x-nu)^dag U_nu(x-nu).
            total += self.link_wrapped(ahead_mu_behind_nu, nu).adjoint()
                * self.link_wrapped(behind_nu, mu).adjoint()
                * self.link_wrapped(behind_nu, nu);
        }
        total
    }
}
