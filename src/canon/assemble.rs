//! Sparse matrix assembly from linear-operator expressions.
//!
//! Each expression tree reduces to a per-variable coefficient (as triplets
//! over the flattened, column-major value) plus a constant vector. The
//! assembler concatenates a list of expressions row-wise, mapping variable
//! components onto global columns through the caller's offset map, and
//! returns the triplets and constants ready for compressed-sparse-column
//! conversion.

use std::collections::HashMap;

use nalgebra::DMatrix;
use nalgebra_sparse::CscMatrix;

use crate::error::{CanonError, Result};
use crate::expr::{ExprArena, ExprKind, NodeId, Shape, VarId};
use crate::sparse::csc_from_triplets;

/// Assembler output: coefficient triplets, one constant per row, row count.
#[derive(Debug, Clone, Default)]
pub struct ProblemData {
    /// Triplet row indices.
    pub rows: Vec<usize>,
    /// Triplet column indices (global, per the offset map).
    pub cols: Vec<usize>,
    /// Triplet values.
    pub vals: Vec<f64>,
    /// Constant vector, one entry per row.
    pub const_vec: Vec<f64>,
    /// Total row count.
    pub num_rows: usize,
}

impl ProblemData {
    /// Convert the triplets to compressed-sparse-column form with `ncols`
    /// total columns. Duplicate entries are summed.
    pub fn to_csc(&self, ncols: usize) -> CscMatrix<f64> {
        csc_from_triplets(self.num_rows, ncols, &self.rows, &self.cols, &self.vals)
    }
}

/// An expression reduced to coefficient-plus-constant form.
///
/// Coefficient triplets are `(flat_row, var_component, value)` over the
/// column-major flattening of the expression's value.
#[derive(Debug, Clone)]
struct AffineForm {
    coeffs: HashMap<VarId, Vec<(usize, usize, f64)>>,
    constant: DMatrix<f64>,
    shape: Shape,
}

/// Assemble a list of expressions into one coefficient matrix and constant
/// vector, one row per scalar entry, in expression order.
pub fn assemble(
    arena: &ExprArena,
    exprs: &[NodeId],
    var_offsets: &HashMap<VarId, usize>,
) -> Result<ProblemData> {
    let mut data = ProblemData::default();
    let mut row_offset = 0;

    for &expr in exprs {
        let form = eval(arena, expr);
        for (var, triplets) in &form.coeffs {
            let col_offset = *var_offsets
                .get(var)
                .ok_or(CanonError::UnknownVariable(var.raw()))?;
            for &(row, col, val) in triplets {
                data.rows.push(row_offset + row);
                data.cols.push(col_offset + col);
                data.vals.push(val);
            }
        }
        data.const_vec.extend_from_slice(form.constant.as_slice());
        row_offset += form.shape.size();
    }

    data.num_rows = row_offset;
    Ok(data)
}

/// Scatter a scalar objective's sparse entries into a dense length-`n` vector.
pub fn objective_vector(data: &ProblemData, n: usize) -> Vec<f64> {
    let mut c = vec![0.0; n];
    for (&col, &val) in data.cols.iter().zip(&data.vals) {
        c[col] += val;
    }
    c
}

/// Reduce an expression tree to coefficient-plus-constant form.
fn eval(arena: &ExprArena, id: NodeId) -> AffineForm {
    let node = arena.node(id);
    match &node.kind {
        ExprKind::Variable { id: var_id } => {
            let size = node.shape.size();
            let identity = (0..size).map(|i| (i, i, 1.0)).collect();
            let mut coeffs = HashMap::new();
            coeffs.insert(*var_id, identity);
            AffineForm {
                coeffs,
                constant: DMatrix::zeros(node.shape.rows(), node.shape.cols()),
                shape: node.shape,
            }
        }
        ExprKind::Constant { value } => AffineForm {
            coeffs: HashMap::new(),
            constant: value.clone(),
            shape: node.shape,
        },
        ExprKind::Neg { arg } => {
            let mut form = eval(arena, *arg);
            for triplets in form.coeffs.values_mut() {
                for entry in triplets.iter_mut() {
                    entry.2 = -entry.2;
                }
            }
            form.constant.neg_mut();
            form
        }
        ExprKind::Sum { args } => {
            let mut total = eval(arena, args[0]);
            for &arg in &args[1..] {
                let form = eval(arena, arg);
                for (var, triplets) in form.coeffs {
                    total.coeffs.entry(var).or_default().extend(triplets);
                }
                total.constant += form.constant;
            }
            total
        }
        ExprKind::Mul { coeff, arg } => {
            let child = eval(arena, *arg);
            apply_matrix(coeff, &child, node.shape)
        }
    }
}

/// Apply a sparse left-coefficient to a reduced form: the result is
/// `kron(I_cols, S)` acting on the flattened coefficients and constant.
fn apply_matrix(s: &CscMatrix<f64>, child: &AffineForm, shape: Shape) -> AffineForm {
    let out_rows = s.nrows();
    let child_rows = child.shape.rows();
    let cols = child.shape.cols();

    // Column-indexed view of S for coefficient expansion.
    let mut s_cols: Vec<Vec<(usize, f64)>> = vec![Vec::new(); s.ncols()];
    for (i, k, v) in s.triplet_iter() {
        s_cols[k].push((i, *v));
    }

    let mut coeffs = HashMap::new();
    for (var, triplets) in &child.coeffs {
        let mut out = Vec::new();
        for &(row, col, val) in triplets {
            let block = row / child_rows;
            let inner = row % child_rows;
            for &(i, sv) in &s_cols[inner] {
                out.push((block * out_rows + i, col, sv * val));
            }
        }
        coeffs.insert(*var, out);
    }

    let mut constant = DMatrix::zeros(out_rows, cols);
    for (i, k, v) in s.triplet_iter() {
        for j in 0..cols {
            constant[(i, j)] += v * child.constant[(k, j)];
        }
    }

    AffineForm {
        coeffs,
        constant,
        shape,
    }
}
