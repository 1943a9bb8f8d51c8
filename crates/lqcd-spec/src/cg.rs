//! Conjugate-gradient solver for the normal Dirac operator.
//!
//! Solves `D^dag D x = b` with the plain residual recurrence; convergence
//! is judged against the relative residual `|r| / |b|`. Exhausting the
//! iteration budget surfaces a `Convergence` error carrying the final
//! residual rather than hanging.

use serde::{Deserialize, Serialize};

use lqcd_core::errors::{ErrorInfo, LatticeError};

use crate::dirac::{DiracOperator, FermionField};

/// Iteration and tolerance budget for propagator solves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverBudget {
    /// Hard cap on CG iterations.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Relative residual at which the solve counts as converged.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

fn default_max_iterations() -> usize {
    1000
}

fn default_tolerance() -> f64 {
    1e-8
}

impl Default for SolverBudget {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
        }
    }
}

/// Outcome of a converged solve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CgOutcome {
    /// Iterations actually used.
    pub iterations: usize,
    /// Relative residual at exit.
    pub residual: f64,
}

/// Solves `D^dag D x = rhs` by conjugate gradient.
pub fn solve_normal(
    dirac: &DiracOperator<'_>,
    rhs: &FermionField,
    budget: &SolverBudget,
) -> Result<(FermionField, CgOutcome), LatticeError> {
    let rhs_norm = rhs.norm_sqr().sqrt();
    if rhs_norm == 0.0 {
        return Ok((
            FermionField::zeros(rhs.len()),
            CgOutcome {
                iterations: 0,
                residual: 0.0,
            },
        ));
    }

    let mut solution = FermionField::zeros(rhs.len());
    let mut residual = rhs.clone();
    let mut search = residual.clone();
    let mut residual_sq = residual.norm_sqr();

    for iteration in 0..budget.max_iterations {
        let relative = residual_sq.sqrt() / rhs_norm;
        if relative <= budget.tolerance {
            return Ok((
                solution,
                CgOutcome {
                    iterations: iteration,
                    residual: relative,
                },
            ));
        }

        let applied = dirac.apply_normal(&search)?;
        let curvature = search.dot(&applied).re;
        if curvature <= 0.0 {
            return Err(LatticeError::Convergence(
                ErrorInfo::new(
                    "cg-breakdown",
                    format!("search curvature {curvature:.3e} lost positivity"),
                )
                .with_context("iteration", iteration.to_string())
                .with_hint("the gauge background may have drifted off the group"),
            ));
        }
        let step = residual_sq / curvature;
        solution = solution.add_scaled(&search, step);
        residual = residual.add_scaled(&applied, -step);

        let next_residual_sq = residual.norm_sqr();
        let improvement = next_residual_sq / residual_sq;
        search = residual.add_scaled(&search, improvement);
        residual_sq = next_residual_sq;
    }

    let relative = residual_sq.sqrt() / rhs_norm;
    if relative <= budget.tolerance {
        return Ok((
            solution,
            CgOutcome {
                iterations: budget.max_iterations,
                residual: relative,
            },
        ));
    }
    Err(LatticeError::Convergence(
        ErrorInfo::new(
            "cg-budget",
            format!(
                "residual {relative:.3e} above tolerance {:.1e} after {} iterations",
                budget.tolerance, budget.max_iterations
            ),
        )
        .with_context("iterations", budget.max_iterations.to_string())
        .with_context("residual", format!("{relative:.3e}"))
        .with_context("tolerance", format!("{:.1e}", budget.tolerance)),
    ))
}
