//! Cabibbo-Marinari heat bath over the SU(2) subgroups of SU(3).
//!
//! For each subgroup the conditional distribution induced by the staples is
//! `P(g) ~ sqrt(1 - g0^2) exp(alpha g0)` for the quaternion scalar of
//! `g = r V`, with `alpha = (2 beta / 3) k` and `k V` the SU(2) projection
//! of `U A`. The scalar is drawn by Kennedy-Pendleton sampling under a
//! bounded trial budget; an exhausted budget keeps the old subgroup element
//! so a sweep can never hang.

use lqcd_core::su3::{embed_su2, ColourMatrix, SU2_SUBGROUPS};
use lqcd_core::{gaussian, LatticeError, RngHandle, NUM_COLOURS};
use lqcd_lattice::Lattice;

use crate::update::{LinkUpdate, UpdateAlgorithm};

/// Heat-bath update with a Kennedy-Pendleton trial budget per subgroup.
#[derive(Debug, Clone, Copy)]
pub struct Heatbath {
    /// Maximum Kennedy-Pendleton trials before keeping the old element.
    pub subgroup_trials: usize,
}

impl Default for Heatbath {
    fn default() -> Self {
        Self {
            subgroup_trials: 20,
        }
    }
}

impl UpdateAlgorithm for Heatbath {
    fn name(&self) -> &'static str {
        "heatbath"
    }

    fn update_link(
        &self,
        field: &Lattice,
        site: usize,
        direction: usize,
        rng: &mut RngHandle,
    ) -> Result<LinkUpdate, LatticeError> {
        let staple = field.staple(site, direction)?;
        let mut link = field.link(site, direction)?;
        let alpha_scale = 2.0 * field.beta() / NUM_COLOURS as f64;

        let mut accepted = 0usize;
        for subgroup in SU2_SUBGROUPS {
            let staple_product = link * staple;
            let projection = staple_product.extract_su2(subgroup);
            let strength = quat_norm(&projection);
            let drawn = if strength < 1e-12 {
                // Degenerate staple: the conditional distribution is flat.
                Some(random_unit_quaternion(rng))
            } else {
                let direction_quat = quat_scale(&projection, 1.0 / strength);
                kennedy_pendleton(alpha_scale * strength, self.subgroup_trials, rng)
                    .map(|g| quat_mul(&g, &quat_conj(&direction_quat)))
            };
            if let Some(rotation) = drawn {
                link = embed_su2(rotation, subgroup) * link;
                accepted += 1;
            }
        }

        Ok(LinkUpdate {
            matrix: link,
            proposed: SU2_SUBGROUPS.len(),
            accepted,
        })
    }
}

/// Draws `g` with `P(g0) ~ sqrt(1 - g0^2) exp(alpha g0)` and a uniform
/// spatial direction. Returns `None` when the trial budget is exhausted.
fn kennedy_pendleton(alpha: f64, trials: usize, rng: &mut RngHandle) -> Option<[f64; 4]> {
    let mut scalar = None;
    for _ in 0..trials {
        let r1 = 1.0 - rng.uniform();
        let r2 = rng.uniform();
        let r3 = 1.0 - rng.uniform();
        let delta = -(r1.ln() + (2.0 * std::f64::consts::PI * r2).cos().powi(2) * r3.ln()) / alpha;
        let r4 = rng.uniform();
        if r4 * r4 <= 1.0 - delta / 2.0 {
            scalar = Some(1.0 - delta);
            break;
        }
    }
    let g0 = scalar?;
    let radius = (1.0 - g0 * g0).max(0.0).sqrt();
    let cos_theta = 2.0 * rng.uniform() - 1.0;
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let phi = 2.0 * std::f64::consts::PI * rng.uniform();
    Some([
        g0,
        radius * sin_theta * phi.cos(),
        radius * sin_theta * phi.sin(),
        radius * cos_theta,
    ])
}

fn random_unit_quaternion(rng: &mut RngHandle) -> [f64; 4] {
    loop {
        let q = [
            gaussian(rng),
            gaussian(rng),
            gaussian(rng),
            gaussian(rng),
        ];
        let norm = quat_norm(&q);
        if norm > 1e-9 {
            return quat_scale(&q, 1.0 / norm);
        }
    }
}

fn quat_norm(q: &[f64; 4]) -> f64 {
    q.iter().map(|value| value * value).sum::<f64>().sqrt()
}

fn quat_scale(q: &[f64; 4], factor: f64) -> [f64; 4] {
    [q[0] * factor, q[1] * factor, q[2] * factor, q[3] * factor]
}

fn quat_conj(q: &[f64; 4]) -> [f64; 4] {
    [q[0], -q[1], -q[2], -q[3]]
}

/// Quaternion product matching the `a0 + i a.sigma` matrix embedding.
fn quat_mul(a: &[f64; 4], b: &[f64; 4]) -> [f64; 4] {
    [
        a[0] * b[0] - a[1] * b[1] - a[2] * b[2] - a[3] * b[3],
        a[0] * b[1] + b[0] * a[1] - (a[2] * b[3] - a[3] * b[2]),
        a[0] * b[2] + b[0] * a[2] - (a[3] * b[1] - a[1] * b[3]),
        a[0] * b[3] + b[0] * a[3] - (a[1] * b[2] - a[2] * b[1]),
    ]
}
