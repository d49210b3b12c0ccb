//! # conicform
//!
//! Canonical conic-form translation and solution recovery.
//!
//! conicform takes a convex problem that has already been canonicalized into
//! a tree of linear operators plus tagged cone constraint groups (equality,
//! elementwise inequality, second-order cone, exponential cone), translates
//! it into the exact numeric layout the Clarabel interior-point solver
//! consumes, runs the solve, and maps the flat result vectors back into
//! per-variable primal and dual matrices.
//!
//! ## Quick start
//!
//! ```
//! use std::collections::{BTreeMap, HashMap};
//! use conicform::prelude::*;
//!
//! // minimize x subject to x >= 1, canonicalized upstream to 1 - x <= 0.
//! let mut arena = ExprArena::new();
//! let x = Variable::new(VarId::from_raw(0), (1, 1));
//! let x_node = arena.variable(&x);
//! let one = arena.scalar(1.0);
//! let neg_x = arena.neg(x_node);
//! let lhs = arena.sum(vec![one, neg_x]);
//!
//! let mut constraints = ConstraintSet::new();
//! constraints.leq.push(Constraint::new(vec![lhs], VarId::from_raw(1), (1, 1)));
//! let dims = ConeDims { leq_rows: 1, ..Default::default() };
//!
//! let mut offsets = HashMap::new();
//! offsets.insert(x.id, 0);
//!
//! let mut problem = ConeProblem::build(
//!     &mut arena, Sense::Minimize, x_node, &constraints, &dims, vec![x], offsets,
//! )?;
//! let solution = problem.solve(&BTreeMap::new())?;
//!
//! assert_eq!(solution.status, SolveStatus::Optimal);
//! assert!((solution.optimal_value - 1.0).abs() < 1e-6);
//! # Ok::<(), conicform::CanonError>(())
//! ```
//!
//! ## Architecture
//!
//! - **Expression arena** (`expr`) - linear-operator trees addressed by index
//! - **Reformatting** (`canon::reformat`) - cone constraints rewritten into
//!   the solver's uniform `0 <= block` convention, with interleaved spacing
//!   for elementwise cones
//! - **Assembly** (`canon::assemble`) - expression trees reduced to sparse
//!   triplets and constant vectors, convertible to CSC
//! - **Problem builder** (`problem`) - dimension/offset bookkeeping, sign
//!   conventions, solver setup
//! - **Solver + recovery** (`solver`) - option application, status
//!   canonicalization, and per-variable primal/dual recovery

pub mod canon;
pub mod constraints;
pub mod error;
pub mod expr;
pub mod problem;
pub mod solver;
pub mod sparse;

/// Prelude module for convenient imports.
///
/// ```
/// use conicform::prelude::*;
/// ```
pub mod prelude {
    // Expression types
    pub use crate::expr::{
        ConeFamily, DualVariable, ExprArena, ExprKind, NodeId, Shape, VarId, Variable,
    };

    // Constraints
    pub use crate::constraints::{ConeDims, Constraint, ConstraintSet};

    // Problem
    pub use crate::problem::{CanonicalProblem, ConeProblem, Sense};

    // Solver
    pub use crate::solver::{Solution, SolveStatus};

    // Errors
    pub use crate::error::{CanonError, Result};
}

// Re-export main types at crate root
pub use error::{CanonError, Result};
pub use problem::{CanonicalProblem, ConeProblem, Sense};
pub use solver::{Solution, SolveStatus};
