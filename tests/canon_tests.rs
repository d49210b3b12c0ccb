//! Canonical-layout tests: column alignment, sign conventions, and cone
//! block placement at the assembled-matrix level.

use std::collections::HashMap;

use conicform::prelude::*;
use conicform::sparse::csc_to_dense;

fn offsets(pairs: &[(u64, usize)]) -> HashMap<VarId, usize> {
    pairs
        .iter()
        .map(|&(id, off)| (VarId::from_raw(id), off))
        .collect()
}

#[test]
fn test_column_alignment_across_blocks() {
    // x in R^2 at columns 0..2, y in R^3 at columns 2..5.
    let mut arena = ExprArena::new();
    let x = Variable::new(VarId::from_raw(0), 2usize);
    let y = Variable::new(VarId::from_raw(1), 3usize);
    let x_node = arena.variable(&x);
    let y_node = arena.variable(&y);

    // objective: sum of x entries, via a (1, 2) row of ones.
    let ones_row = conicform::sparse::csc_from_triplets(1, 2, &[0, 0], &[0, 1], &[1.0, 1.0]);
    let objective = arena.mul(ones_row, x_node);

    // equality: x - [1, 2] = 0; inequality: -y <= 0 (i.e. y >= 0).
    let target = arena.constant(nalgebra::DMatrix::from_column_slice(2, 1, &[1.0, 2.0]));
    let neg_target = arena.neg(target);
    let eq_lhs = arena.sum(vec![x_node, neg_target]);
    let leq_lhs = arena.neg(y_node);

    let mut constraints = ConstraintSet::new();
    constraints
        .eq
        .push(Constraint::new(vec![eq_lhs], VarId::from_raw(10), (2, 1)));
    constraints
        .leq
        .push(Constraint::new(vec![leq_lhs], VarId::from_raw(11), (3, 1)));
    let dims = ConeDims {
        eq_rows: 2,
        leq_rows: 3,
        ..Default::default()
    };

    let problem = ConeProblem::build(
        &mut arena,
        Sense::Minimize,
        objective,
        &constraints,
        &dims,
        vec![x, y],
        offsets(&[(0, 0), (1, 2)]),
    )
    .unwrap();

    let canonical = problem.canonical();
    assert_eq!(canonical.n, 5);
    assert_eq!(canonical.a.ncols(), 5);
    assert_eq!(canonical.g.ncols(), 5);
    assert_eq!(canonical.c.len(), 5);

    // Objective touches only x's column block.
    assert_eq!(canonical.c, vec![1.0, 1.0, 0.0, 0.0, 0.0]);

    // Equality entries stay in x's columns, inequality entries in y's.
    let a = csc_to_dense(&canonical.a);
    let g = csc_to_dense(&canonical.g);
    for row in 0..2 {
        for col in 2..5 {
            assert_eq!(a[(row, col)], 0.0);
        }
    }
    for row in 0..3 {
        for col in 0..2 {
            assert_eq!(g[(row, col)], 0.0);
        }
    }
    // b = -const: the constant of x - [1, 2] is [-1, -2], so b = [1, 2].
    assert_eq!(canonical.b, vec![1.0, 2.0]);
}

#[test]
fn test_exp_cone_block_layout() {
    // One scalar exponential cone (x, y, z): the assembled rows must carry
    // the solver slot order (x, z, y), each negated.
    let mut arena = ExprArena::new();
    let vars: Vec<Variable> = (0..3)
        .map(|i| Variable::new(VarId::from_raw(i), (1, 1)))
        .collect();
    let nodes: Vec<NodeId> = vars.iter().map(|v| arena.variable(v)).collect();

    let mut constraints = ConstraintSet::new();
    constraints
        .exp
        .push(Constraint::new(nodes.clone(), VarId::from_raw(10), (1, 1)));
    let dims = ConeDims {
        exp_cones: 1,
        ..Default::default()
    };

    let problem = ConeProblem::build(
        &mut arena,
        Sense::Minimize,
        nodes[1],
        &constraints,
        &dims,
        vars,
        offsets(&[(0, 0), (1, 1), (2, 2)]),
    )
    .unwrap();

    let canonical = problem.canonical();
    assert_eq!(canonical.m, 3);
    assert_eq!(canonical.e, 1);
    assert_eq!(canonical.h, vec![0.0, 0.0, 0.0]);

    let g = csc_to_dense(&canonical.g);
    // Row 0: x (column 0), row 1: z (column 2), row 2: y (column 1).
    assert_eq!(g[(0, 0)], -1.0);
    assert_eq!(g[(1, 2)], -1.0);
    assert_eq!(g[(2, 1)], -1.0);
    assert_eq!(g.iter().filter(|v| **v != 0.0).count(), 3);
}

#[test]
fn test_soc_rows_preserve_child_order() {
    // SOC children [t, x] with t scalar and x in R^2: rows must be
    // [-t; -x1; -x2] without reordering.
    let mut arena = ExprArena::new();
    let t = Variable::new(VarId::from_raw(0), (1, 1));
    let x = Variable::new(VarId::from_raw(1), 2usize);
    let t_node = arena.variable(&t);
    let x_node = arena.variable(&x);

    let mut constraints = ConstraintSet::new();
    constraints.soc.push(Constraint::new(
        vec![t_node, x_node],
        VarId::from_raw(10),
        (3, 1),
    ));
    let dims = ConeDims {
        soc_sizes: vec![3],
        ..Default::default()
    };

    let problem = ConeProblem::build(
        &mut arena,
        Sense::Minimize,
        t_node,
        &constraints,
        &dims,
        vec![t, x],
        offsets(&[(0, 0), (1, 1)]),
    )
    .unwrap();

    let canonical = problem.canonical();
    assert_eq!(canonical.m, 3);
    assert_eq!(canonical.soc_sizes, vec![3]);

    let g = csc_to_dense(&canonical.g);
    assert_eq!(g[(0, 0)], -1.0);
    assert_eq!(g[(1, 1)], -1.0);
    assert_eq!(g[(2, 2)], -1.0);
}

#[test]
fn test_objective_constant_becomes_offset() {
    // objective x + 2.5: the constant lands in `offset`, not in c.
    let mut arena = ExprArena::new();
    let x = Variable::new(VarId::from_raw(0), (1, 1));
    let x_node = arena.variable(&x);
    let shift = arena.scalar(2.5);
    let objective = arena.sum(vec![x_node, shift]);

    let mut constraints = ConstraintSet::new();
    let one = arena.scalar(1.0);
    let neg_x = arena.neg(x_node);
    let lhs = arena.sum(vec![one, neg_x]);
    constraints
        .leq
        .push(Constraint::new(vec![lhs], VarId::from_raw(10), (1, 1)));
    let dims = ConeDims {
        leq_rows: 1,
        ..Default::default()
    };

    let problem = ConeProblem::build(
        &mut arena,
        Sense::Minimize,
        objective,
        &constraints,
        &dims,
        vec![x],
        offsets(&[(0, 0)]),
    )
    .unwrap();

    assert_eq!(problem.canonical().c, vec![1.0]);
    assert_eq!(problem.canonical().offset, 2.5);
}
