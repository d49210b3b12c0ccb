//! Problem building and solving.
//!
//! `ConeProblem::build` runs the full canonical-form translation once:
//! dual metadata, constraint reformatting, matrix assembly, dimension and
//! offset bookkeeping, CSC conversion, sign negations, and solver setup.
//! `solve` may then be called any number of times, producing a fresh
//! [`Solution`] per call from the already-built data.

use std::collections::{BTreeMap, HashMap};

use nalgebra_sparse::CscMatrix;

use crate::canon::{
    assemble, format_affine, format_exp, format_soc, objective_vector,
};
use crate::constraints::{ConeDims, Constraint, ConstraintSet};
use crate::error::{CanonError, Result};
use crate::expr::{ConeFamily, DualVariable, ExprArena, NodeId, VarId, Variable};
use crate::solver::{recover_dual_values, recover_values, Solution, SolverHandle};

/// Optimization sense. The solver only minimizes; maximization negates the
/// objective vector at build time and the reported value at solve time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    /// Minimize the objective.
    Minimize,
    /// Maximize the objective.
    Maximize,
}

/// Canonical problem data in the solver's numeric layout.
///
/// Built once, immutable thereafter, owned by the enclosing [`ConeProblem`]
/// together with the solver handle.
#[derive(Debug, Clone)]
pub struct CanonicalProblem {
    /// Total variable columns.
    pub n: usize,
    /// Total inequality-block rows.
    pub m: usize,
    /// Equality rows.
    pub p: usize,
    /// Elementwise inequality rows.
    pub l: usize,
    /// Second-order cone sizes, positional.
    pub soc_sizes: Vec<usize>,
    /// Number of exponential-cone triples.
    pub e: usize,
    /// Inequality/cone coefficient matrix.
    pub g: CscMatrix<f64>,
    /// Inequality right-hand side.
    pub h: Vec<f64>,
    /// Equality coefficient matrix.
    pub a: CscMatrix<f64>,
    /// Equality right-hand side.
    pub b: Vec<f64>,
    /// Dense objective vector.
    pub c: Vec<f64>,
    /// Constant added to the reported objective value.
    pub offset: f64,
}

impl CanonicalProblem {
    /// Number of second-order cones.
    pub fn ncones(&self) -> usize {
        self.soc_sizes.len()
    }
}

/// A built conic problem: canonical data plus the owned solver handle and
/// the metadata needed to recover named results.
pub struct ConeProblem {
    sense: Sense,
    primal_vars: Vec<Variable>,
    primal_offsets: HashMap<VarId, usize>,
    eq_duals: Vec<DualVariable>,
    ineq_duals: Vec<DualVariable>,
    canonical: CanonicalProblem,
    handle: SolverHandle,
}

impl std::fmt::Debug for ConeProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConeProblem")
            .field("sense", &self.sense)
            .field("primal_vars", &self.primal_vars)
            .field("primal_offsets", &self.primal_offsets)
            .field("eq_duals", &self.eq_duals)
            .field("ineq_duals", &self.ineq_duals)
            .finish_non_exhaustive()
    }
}

impl ConeProblem {
    /// Build the canonical problem and set up the solver.
    ///
    /// Reformats each constraint family, assembles the objective, equality,
    /// and concatenated inequality/cone blocks against the same variable
    /// offsets, and constructs the solver handle. Any dimension
    /// inconsistency is a build-time error.
    pub fn build(
        arena: &mut ExprArena,
        sense: Sense,
        objective: NodeId,
        constraints: &ConstraintSet,
        dims: &ConeDims,
        variables: Vec<Variable>,
        var_offsets: HashMap<VarId, usize>,
    ) -> Result<Self> {
        // Dual metadata first: the inequality concatenation order
        // [leq, soc, exp] fixes the row ordering dual recovery walks later.
        let eq_duals = dual_variables(&constraints.eq, ConeFamily::Eq);
        let mut ineq_duals = dual_variables(&constraints.leq, ConeFamily::Leq);
        ineq_duals.extend(dual_variables(&constraints.soc, ConeFamily::Soc));
        ineq_duals.extend(dual_variables(&constraints.exp, ConeFamily::Exp));

        // Reformat each family; inequality rows concatenate in the same
        // [leq, soc, exp] order the dual metadata was built in.
        let eq_exprs = format_affine(&constraints.eq)?;
        let mut ineq_exprs = format_affine(&constraints.leq)?;
        ineq_exprs.extend(format_soc(arena, &constraints.soc)?);
        ineq_exprs.extend(format_exp(arena, &constraints.exp)?);

        let obj_data = assemble(arena, &[objective], &var_offsets)?;
        let eq_data = assemble(arena, &eq_exprs, &var_offsets)?;
        let ineq_data = assemble(arena, &ineq_exprs, &var_offsets)?;

        let n = variables.iter().map(|v| v.size()).sum();
        let m = ineq_data.num_rows;
        let p = dims.eq_rows;
        let l = dims.leq_rows;

        check_offsets(&variables, &var_offsets, n)?;
        if eq_data.num_rows != p {
            return Err(CanonError::DimensionMismatch {
                expected: format!("{} declared equality rows", p),
                got: format!("{} assembled rows", eq_data.num_rows),
            });
        }

        let g = ineq_data.to_csc(n);
        let h = negate(&ineq_data.const_vec);
        let a = eq_data.to_csc(n);
        let b = negate(&eq_data.const_vec);

        let mut c = objective_vector(&obj_data, n);
        if sense == Sense::Maximize {
            for entry in c.iter_mut() {
                *entry = -*entry;
            }
        }
        let offset = obj_data.const_vec.first().copied().unwrap_or(0.0);

        let canonical = CanonicalProblem {
            n,
            m,
            p,
            l,
            soc_sizes: dims.soc_sizes.clone(),
            e: dims.exp_cones,
            g,
            h,
            a,
            b,
            c,
            offset,
        };

        log::debug!(
            "canonical dimensions: n={} m={} p={} l={} ncones={} q={:?} e={} offset={}",
            canonical.n,
            canonical.m,
            canonical.p,
            canonical.l,
            canonical.ncones(),
            canonical.soc_sizes,
            canonical.e,
            canonical.offset,
        );

        let handle = SolverHandle::setup(&canonical)?;

        Ok(ConeProblem {
            sense,
            primal_vars: variables,
            primal_offsets: var_offsets,
            eq_duals,
            ineq_duals,
            canonical,
            handle,
        })
    }

    /// Canonical problem data.
    pub fn canonical(&self) -> &CanonicalProblem {
        &self.canonical
    }

    /// Run one solve with the given options and recover named results.
    ///
    /// Options persist on the handle across calls; solving twice with the
    /// same options yields the same solution. Unknown statuses come back as
    /// a [`Solution`] with `SolverError` status, never as an `Err`.
    pub fn solve(&mut self, options: &BTreeMap<String, f64>) -> Result<Solution> {
        self.handle.apply_options(options)?;
        let raw = self.handle.run();

        let mut optimal_value = raw.cost + self.canonical.offset;
        if self.sense == Sense::Maximize {
            // Undo the sign flip applied to c at build time.
            optimal_value = -optimal_value;
        }

        let primal = recover_values(&raw.x, &self.primal_vars, &self.primal_offsets)?;
        let dual_eq = recover_dual_values(&raw.y, &self.eq_duals, ConeFamily::Eq)?;
        let mut dual_ineq = recover_dual_values(&raw.z, &self.ineq_duals, ConeFamily::Leq)?;
        dual_ineq.extend(recover_dual_values(&raw.z, &self.ineq_duals, ConeFamily::Soc)?);
        dual_ineq.extend(recover_dual_values(&raw.z, &self.ineq_duals, ConeFamily::Exp)?);

        Ok(Solution {
            status: raw.status,
            optimal_value,
            primal,
            dual_eq,
            dual_ineq,
        })
    }
}

fn dual_variables(constrs: &[Constraint], family: ConeFamily) -> Vec<DualVariable> {
    constrs
        .iter()
        .map(|c| DualVariable {
            id: c.dual_id,
            shape: c.shape,
            family,
        })
        .collect()
}

fn check_offsets(
    variables: &[Variable],
    var_offsets: &HashMap<VarId, usize>,
    n: usize,
) -> Result<()> {
    for var in variables {
        let offset = *var_offsets
            .get(&var.id)
            .ok_or(CanonError::UnknownVariable(var.id.raw()))?;
        if offset + var.size() > n {
            return Err(CanonError::DimensionMismatch {
                expected: format!("variable {} within {} columns", var.id.raw(), n),
                got: format!("offset {} + size {}", offset, var.size()),
            });
        }
    }
    Ok(())
}

fn negate(vec: &[f64]) -> Vec<f64> {
    vec.iter().map(|v| -v).collect()
}
