//! Constraint reformatting into the solver's uniform cone convention.
//!
//! The solver consumes `0 <= block` for every inequality/cone family and
//! `block = 0` for equalities, while the canonicalizer delivers constraints
//! in `expr <= 0` / `expr = 0` form. The functions here rewrite one family at
//! a time, producing expressions whose assembled rows land exactly where the
//! cone descriptors expect them.

use nalgebra_sparse::{CooMatrix, CscMatrix};

use crate::constraints::Constraint;
use crate::error::{CanonError, Result};
use crate::expr::{ExprArena, NodeId};

/// Reformat equality / elementwise-inequality constraints.
///
/// The comparison was already normalized upstream, so the reformatted
/// constraint is simply each constraint's left-hand affine expression.
pub fn format_affine(constrs: &[Constraint]) -> Result<Vec<NodeId>> {
    constrs
        .iter()
        .map(|c| {
            c.args.first().copied().ok_or_else(|| {
                CanonError::MalformedConstraint("affine constraint has no operand".into())
            })
        })
        .collect()
}

/// Reformat second-order cone constraints.
///
/// A cone constraint carries `[t, x1, .., xk]`; each component becomes its
/// own negated row block. Child order is the solver's cone order and must not
/// be changed here.
pub fn format_soc(arena: &mut ExprArena, constrs: &[Constraint]) -> Result<Vec<NodeId>> {
    let mut formatted = Vec::new();
    for c in constrs {
        if c.args.is_empty() {
            return Err(CanonError::MalformedConstraint(
                "second-order cone constraint has no operands".into(),
            ));
        }
        for &arg in &c.args {
            formatted.push(arena.neg(arg));
        }
    }
    Ok(formatted)
}

/// Reformat exponential cone constraints.
///
/// Children are stored as `(x, y, z)` but the solver's cone slots are
/// `(x, z, y)`; the reorder happens here, before the elementwise spacing
/// transform. Getting this wrong produces numerically plausible but wrong
/// solves, so it is unit-tested on its own.
pub fn format_exp(arena: &mut ExprArena, constrs: &[Constraint]) -> Result<Vec<NodeId>> {
    let mut formatted = Vec::new();
    for c in constrs {
        if c.args.len() != 3 {
            return Err(CanonError::MalformedConstraint(format!(
                "exponential cone constraint has {} operands, expected 3",
                c.args.len()
            )));
        }
        let operands = [c.args[0], c.args[2], c.args[1]];
        formatted.push(format_elementwise(arena, &operands));
    }
    Ok(formatted)
}

/// Combine `k` operands of shape `(r, c)` into one `(k*r, c)` expression with
/// interleaved rows: operand `j`'s row `i` lands at combined row `k*i + j`,
/// so each cone sample occupies contiguous rows across operands.
///
/// Each operand is multiplied by a sparse 0/1 spacing matrix, the terms are
/// summed, and the sum is negated: the solver wants `0 <= combined` while the
/// canonicalizer's output is `combined <= 0`.
///
/// # Panics
///
/// Panics if `operands` is empty.
pub fn format_elementwise(arena: &mut ExprArena, operands: &[NodeId]) -> NodeId {
    let spacing = operands.len();
    let rows = arena.shape(operands[0]).rows();

    let mut terms = Vec::with_capacity(spacing);
    for (offset, &operand) in operands.iter().enumerate() {
        let mat = spacing_matrix(rows, spacing, offset);
        terms.push(arena.mul(mat, operand));
    }
    let total = arena.sum(terms);
    arena.neg(total)
}

/// Sparse 0/1 matrix of shape `(spacing * rows, rows)` mapping row `i` to row
/// `spacing * i + offset`.
fn spacing_matrix(rows: usize, spacing: usize, offset: usize) -> CscMatrix<f64> {
    let mut coo = CooMatrix::new(spacing * rows, rows);
    for i in 0..rows {
        coo.push(spacing * i + offset, i, 1.0);
    }
    CscMatrix::from(&coo)
}
