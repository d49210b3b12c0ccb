//! Clarabel solver integration.
//!
//! The canonical problem keeps the equality block `(A, b)` and the
//! inequality/cone block `(G, h)` separate; here they are stacked into the
//! single conic form Clarabel consumes, with the cone list
//! `[Zero(p), Nonneg(l), SOC(q..), Exp x e]`. The returned dual vector is
//! split at row `p` back into equality duals `y` and inequality duals `z`.

use std::collections::BTreeMap;

use clarabel::algebra::CscMatrix as ClarabelCsc;
use clarabel::solver::{
    DefaultSettings, DefaultSolver, IPSolver, SolverStatus, SupportedConeT,
};

use crate::error::{CanonError, Result};
use crate::problem::CanonicalProblem;
use crate::sparse::csc_vstack;

/// Canonicalized solution status.
///
/// Every native status outside the known table collapses to `SolverError`;
/// callers only need coarse failure information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// Optimal solution found.
    Optimal,
    /// Problem is infeasible.
    Infeasible,
    /// Problem is unbounded.
    Unbounded,
    /// Optimal to reduced accuracy.
    OptimalInaccurate,
    /// Infeasibility certificate at reduced accuracy.
    InfeasibleInaccurate,
    /// Unboundedness certificate at reduced accuracy.
    UnboundedInaccurate,
    /// Any other solver outcome.
    SolverError,
}

impl From<SolverStatus> for SolveStatus {
    fn from(status: SolverStatus) -> Self {
        match status {
            SolverStatus::Solved => SolveStatus::Optimal,
            SolverStatus::PrimalInfeasible => SolveStatus::Infeasible,
            SolverStatus::DualInfeasible => SolveStatus::Unbounded,
            SolverStatus::AlmostSolved => SolveStatus::OptimalInaccurate,
            SolverStatus::AlmostPrimalInfeasible => SolveStatus::InfeasibleInaccurate,
            SolverStatus::AlmostDualInfeasible => SolveStatus::UnboundedInaccurate,
            _ => SolveStatus::SolverError,
        }
    }
}

/// Apply user-supplied numeric options onto the solver settings.
///
/// The recognized names form a closed set; any other name is an error.
/// Options iterate in name order, and names applied before a bad one keep
/// their new values on the settings.
pub(crate) fn apply_options(
    settings: &mut DefaultSettings<f64>,
    options: &BTreeMap<String, f64>,
) -> Result<()> {
    for (name, &value) in options {
        match name.as_str() {
            "feastol" => settings.tol_feas = value,
            "reltol" => settings.tol_gap_rel = value,
            "abstol" => settings.tol_gap_abs = value,
            "feastol_inacc" => settings.reduced_tol_feas = value,
            "reltol_inacc" => settings.reduced_tol_gap_rel = value,
            "abstol_inacc" => settings.reduced_tol_gap_abs = value,
            "max_iters" => settings.max_iter = value as u32,
            "verbose" => settings.verbose = value != 0.0,
            _ => return Err(CanonError::UnknownOption(name.clone())),
        }
    }
    Ok(())
}

/// Raw per-solve output harvested from the solver.
#[derive(Debug, Clone)]
pub(crate) struct RawResult {
    /// Canonicalized status.
    pub status: SolveStatus,
    /// Native cost, before the objective offset and sense correction.
    pub cost: f64,
    /// Flat primal vector.
    pub x: Vec<f64>,
    /// Equality-dual vector (first `p` dual rows).
    pub y: Vec<f64>,
    /// Inequality-dual vector (remaining dual rows).
    pub z: Vec<f64>,
}

/// Owned solver handle; carries the solver's internal solve state between
/// calls, so a handle must not be shared across concurrent solves.
pub(crate) struct SolverHandle {
    solver: DefaultSolver<f64>,
    eq_rows: usize,
}

impl SolverHandle {
    /// Set up the solver from canonical problem data.
    ///
    /// Dimension inconsistencies are rejected here so they surface at build
    /// time rather than on the first solve.
    pub fn setup(prob: &CanonicalProblem) -> Result<Self> {
        check_dimensions(prob)?;

        let p = ClarabelCsc::zeros((prob.n, prob.n));
        let combined = csc_vstack(&prob.a, &prob.g);
        let a = to_clarabel_csc(&combined);
        let mut b = prob.b.clone();
        b.extend_from_slice(&prob.h);

        let cones = cone_list(prob);

        let solver = DefaultSolver::new(&p, &prob.c, &a, &b, &cones, DefaultSettings::default());

        Ok(SolverHandle {
            solver,
            eq_rows: prob.p,
        })
    }

    /// Apply solve options onto the handle's settings.
    pub fn apply_options(&mut self, options: &BTreeMap<String, f64>) -> Result<()> {
        apply_options(&mut self.solver.settings, options)
    }

    /// Run the solve and harvest status, cost, and result vectors.
    pub fn run(&mut self) -> RawResult {
        self.solver.solve();

        let solution = &self.solver.solution;
        let (y, z) = solution.z.split_at(self.eq_rows.min(solution.z.len()));

        RawResult {
            status: solution.status.into(),
            cost: solution.obj_val,
            x: solution.x.clone(),
            y: y.to_vec(),
            z: z.to_vec(),
        }
    }
}

fn check_dimensions(prob: &CanonicalProblem) -> Result<()> {
    let declared_ineq = prob.l + prob.soc_sizes.iter().sum::<usize>() + 3 * prob.e;
    if declared_ineq != prob.m {
        return Err(CanonError::DimensionMismatch {
            expected: format!("l + sum(q) + 3e = {} inequality rows", declared_ineq),
            got: format!("{} assembled rows", prob.m),
        });
    }
    if prob.b.len() != prob.p || prob.a.nrows() != prob.p {
        return Err(CanonError::DimensionMismatch {
            expected: format!("{} equality rows", prob.p),
            got: format!("A: {}, b: {}", prob.a.nrows(), prob.b.len()),
        });
    }
    if prob.h.len() != prob.m || prob.g.nrows() != prob.m {
        return Err(CanonError::DimensionMismatch {
            expected: format!("{} inequality rows", prob.m),
            got: format!("G: {}, h: {}", prob.g.nrows(), prob.h.len()),
        });
    }
    if prob.c.len() != prob.n || prob.a.ncols() != prob.n || prob.g.ncols() != prob.n {
        return Err(CanonError::DimensionMismatch {
            expected: format!("{} columns", prob.n),
            got: format!(
                "c: {}, A: {}, G: {}",
                prob.c.len(),
                prob.a.ncols(),
                prob.g.ncols()
            ),
        });
    }
    Ok(())
}

/// Convert nalgebra CSC to Clarabel CSC.
fn to_clarabel_csc(m: &nalgebra_sparse::CscMatrix<f64>) -> ClarabelCsc<f64> {
    ClarabelCsc::new(
        m.nrows(),
        m.ncols(),
        m.col_offsets().to_vec(),
        m.row_indices().to_vec(),
        m.values().to_vec(),
    )
}

/// Build the cone list, equality rows first. Empty blocks are skipped.
fn cone_list(prob: &CanonicalProblem) -> Vec<SupportedConeT<f64>> {
    let mut cones = Vec::new();

    if prob.p > 0 {
        cones.push(SupportedConeT::ZeroConeT(prob.p));
    }
    if prob.l > 0 {
        cones.push(SupportedConeT::NonnegativeConeT(prob.l));
    }
    for &size in &prob.soc_sizes {
        cones.push(SupportedConeT::SecondOrderConeT(size));
    }
    for _ in 0..prob.e {
        cones.push(SupportedConeT::ExponentialConeT());
    }

    cones
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_canonicalization() {
        assert_eq!(SolveStatus::from(SolverStatus::Solved), SolveStatus::Optimal);
        assert_eq!(
            SolveStatus::from(SolverStatus::PrimalInfeasible),
            SolveStatus::Infeasible
        );
        assert_eq!(
            SolveStatus::from(SolverStatus::DualInfeasible),
            SolveStatus::Unbounded
        );
        assert_eq!(
            SolveStatus::from(SolverStatus::AlmostSolved),
            SolveStatus::OptimalInaccurate
        );
        assert_eq!(
            SolveStatus::from(SolverStatus::AlmostPrimalInfeasible),
            SolveStatus::InfeasibleInaccurate
        );
        assert_eq!(
            SolveStatus::from(SolverStatus::AlmostDualInfeasible),
            SolveStatus::UnboundedInaccurate
        );
        // Everything else collapses.
        assert_eq!(
            SolveStatus::from(SolverStatus::NumericalError),
            SolveStatus::SolverError
        );
        assert_eq!(
            SolveStatus::from(SolverStatus::MaxIterations),
            SolveStatus::SolverError
        );
        assert_eq!(
            SolveStatus::from(SolverStatus::Unsolved),
            SolveStatus::SolverError
        );
    }

    #[test]
    fn test_apply_known_options() {
        let mut settings = DefaultSettings::default();
        let mut options = BTreeMap::new();
        options.insert("feastol".to_string(), 1e-6);
        options.insert("reltol".to_string(), 1e-5);
        options.insert("abstol".to_string(), 1e-4);
        options.insert("max_iters".to_string(), 42.0);
        options.insert("verbose".to_string(), 1.0);

        apply_options(&mut settings, &options).unwrap();
        assert_eq!(settings.tol_feas, 1e-6);
        assert_eq!(settings.tol_gap_rel, 1e-5);
        assert_eq!(settings.tol_gap_abs, 1e-4);
        assert_eq!(settings.max_iter, 42);
        assert!(settings.verbose);
    }

    #[test]
    fn test_apply_inaccurate_options() {
        let mut settings = DefaultSettings::default();
        let mut options = BTreeMap::new();
        options.insert("feastol_inacc".to_string(), 1e-3);
        options.insert("reltol_inacc".to_string(), 1e-2);
        options.insert("abstol_inacc".to_string(), 1e-1);

        apply_options(&mut settings, &options).unwrap();
        assert_eq!(settings.reduced_tol_feas, 1e-3);
        assert_eq!(settings.reduced_tol_gap_rel, 1e-2);
        assert_eq!(settings.reduced_tol_gap_abs, 1e-1);
    }

    #[test]
    fn test_unknown_option_rejected() {
        let mut settings = DefaultSettings::default();
        let mut options = BTreeMap::new();
        options.insert("feastol".to_string(), 1e-6);
        options.insert("xyz".to_string(), 1.0);

        let err = apply_options(&mut settings, &options).unwrap_err();
        match err {
            CanonError::UnknownOption(name) => assert_eq!(name, "xyz"),
            other => panic!("expected UnknownOption, got {:?}", other),
        }
        // Names before the bad one (in iteration order) were already applied.
        assert_eq!(settings.tol_feas, 1e-6);
    }

    #[test]
    fn test_empty_options_noop() {
        let mut settings = DefaultSettings::default();
        apply_options(&mut settings, &BTreeMap::new()).unwrap();
    }
}
