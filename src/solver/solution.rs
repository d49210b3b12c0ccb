//! Result recovery: mapping flat solver vectors back into named matrices.

use std::collections::HashMap;

use nalgebra::DMatrix;

use super::clarabel::SolveStatus;
use crate::error::{CanonError, Result};
use crate::expr::{ConeFamily, DualVariable, VarId, Variable};

/// Solution of one solve call.
#[derive(Debug, Clone)]
pub struct Solution {
    /// Canonicalized solver status.
    pub status: SolveStatus,
    /// Reported optimal value (native cost + objective offset, sense
    /// corrected).
    pub optimal_value: f64,
    /// Primal values keyed by variable id.
    pub primal: HashMap<VarId, DMatrix<f64>>,
    /// Equality-constraint dual values keyed by dual-variable id.
    pub dual_eq: HashMap<VarId, DMatrix<f64>>,
    /// Inequality/cone dual values keyed by dual-variable id.
    pub dual_ineq: HashMap<VarId, DMatrix<f64>>,
}

impl Solution {
    /// Get the primal value of a variable.
    pub fn value(&self, id: VarId) -> Option<&DMatrix<f64>> {
        self.primal.get(&id)
    }

    /// Get the equality dual value of a constraint.
    pub fn dual_eq(&self, id: VarId) -> Option<&DMatrix<f64>> {
        self.dual_eq.get(&id)
    }

    /// Get the inequality/cone dual value of a constraint.
    pub fn dual_ineq(&self, id: VarId) -> Option<&DMatrix<f64>> {
        self.dual_ineq.get(&id)
    }
}

/// Copy each variable's entries from the flat result vector at its stored
/// offset and reshape column-major.
pub(crate) fn recover_values(
    result: &[f64],
    vars: &[Variable],
    offsets: &HashMap<VarId, usize>,
) -> Result<HashMap<VarId, DMatrix<f64>>> {
    let mut values = HashMap::new();

    for var in vars {
        let offset = *offsets
            .get(&var.id)
            .ok_or(CanonError::UnknownVariable(var.id.raw()))?;
        let slice = result.get(offset..offset + var.size()).ok_or_else(|| {
            CanonError::Recovery(format!(
                "variable {} needs entries {}..{} but the result vector has {}",
                var.id.raw(),
                offset,
                offset + var.size(),
                result.len()
            ))
        })?;
        values.insert(
            var.id,
            DMatrix::from_column_slice(var.shape.rows(), var.shape.cols(), slice),
        );
    }

    Ok(values)
}

/// Recover dual values for one cone family from a flat dual vector.
///
/// Offsets are recomputed by walking the full metadata list in build order
/// (exponential-cone duals consume three scalars per entry), then only the
/// active family is sliced out.
pub(crate) fn recover_dual_values(
    result: &[f64],
    dual_vars: &[DualVariable],
    active: ConeFamily,
) -> Result<HashMap<VarId, DMatrix<f64>>> {
    let mut values = HashMap::new();
    let mut offset = 0;

    for dual in dual_vars {
        let entries = dual.entries();
        if dual.family == active {
            let slice = result.get(offset..offset + entries).ok_or_else(|| {
                CanonError::Recovery(format!(
                    "dual variable {} needs entries {}..{} but the dual vector has {}",
                    dual.id.raw(),
                    offset,
                    offset + entries,
                    result.len()
                ))
            })?;
            let rows = entries / dual.shape.cols();
            values.insert(
                dual.id,
                DMatrix::from_column_slice(rows, dual.shape.cols(), slice),
            );
        }
        offset += entries;
    }

    Ok(values)
}
