//! Constraint groups handed to the problem builder.
//!
//! Constraints arrive already canonicalized to "expression `op` 0" form with
//! the comparison stripped; each holds its operand expressions plus the id of
//! the dual variable associated with the constraint block. Order within each
//! family is positional and preserved end-to-end: solver-side row offsets
//! depend on it.

use crate::expr::{NodeId, Shape, VarId};

/// One canonicalized constraint.
///
/// Operand layout by family:
/// - equality / elementwise inequality: `args[0]` is the affine left-hand side
/// - second-order cone: `args` is `[t, x1, .., xk]`
/// - exponential cone: `args` is `(x, y, z)` with `z * exp(x/z) <= y`
#[derive(Debug, Clone)]
pub struct Constraint {
    /// Operand expressions, in the family's layout.
    pub args: Vec<NodeId>,
    /// Id of the dual variable recovered for this constraint.
    pub dual_id: VarId,
    /// Shape of the constraint block (drives dual recovery offsets).
    pub shape: Shape,
}

impl Constraint {
    /// Create a constraint from its operands, dual id, and block shape.
    pub fn new(args: Vec<NodeId>, dual_id: VarId, shape: impl Into<Shape>) -> Self {
        Constraint {
            args,
            dual_id,
            shape: shape.into(),
        }
    }
}

/// Constraints grouped by cone family, each in caller order.
#[derive(Debug, Clone, Default)]
pub struct ConstraintSet {
    /// Equality constraints (zero cone).
    pub eq: Vec<Constraint>,
    /// Elementwise inequality constraints (nonnegative orthant).
    pub leq: Vec<Constraint>,
    /// Second-order cone constraints.
    pub soc: Vec<Constraint>,
    /// Exponential cone constraints.
    pub exp: Vec<Constraint>,
}

impl ConstraintSet {
    /// Create an empty constraint set.
    pub fn new() -> Self {
        ConstraintSet::default()
    }
}

/// Caller-declared per-family row counts and cone sizes.
#[derive(Debug, Clone, Default)]
pub struct ConeDims {
    /// Equality rows (`p`).
    pub eq_rows: usize,
    /// Elementwise inequality rows (`l`).
    pub leq_rows: usize,
    /// Second-order cone sizes (`q`), positional per SOC constraint.
    pub soc_sizes: Vec<usize>,
    /// Number of exponential-cone triples (`e`).
    pub exp_cones: usize,
}

impl ConeDims {
    /// Total inequality-block rows implied by the declared dimensions.
    pub fn ineq_rows(&self) -> usize {
        self.leq_rows + self.soc_sizes.iter().sum::<usize>() + 3 * self.exp_cones
    }
}
