//! Linear-operator expression trees stored in an arena.
//!
//! Reformatting creates new nodes that reference existing ones, so nodes are
//! addressed by index rather than owned pointers. The arena only models the
//! affine operators the canonicalized problem feeds through this layer:
//! variables, constants, negation, multiplication by a fixed sparse matrix,
//! and sums.

use nalgebra::DMatrix;
use nalgebra_sparse::CscMatrix;

use super::shape::Shape;
use super::variable::{VarId, Variable};

/// Index of a node in an [`ExprArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Get the raw index value.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Operator tag plus payload for one expression node.
#[derive(Debug, Clone)]
pub enum ExprKind {
    /// A leaf referencing a problem variable.
    Variable {
        /// Id of the referenced variable.
        id: VarId,
    },
    /// A dense constant value.
    Constant {
        /// The constant, in the node's shape.
        value: DMatrix<f64>,
    },
    /// Elementwise negation of the child.
    Neg {
        /// The negated child.
        arg: NodeId,
    },
    /// Left-multiplication of the child by a fixed sparse matrix.
    Mul {
        /// The sparse coefficient; its column count matches the child's rows.
        coeff: CscMatrix<f64>,
        /// The multiplied child.
        arg: NodeId,
    },
    /// Sum of the children, all of the same shape.
    Sum {
        /// The summed children, in order.
        args: Vec<NodeId>,
    },
}

/// One node: an operator and the shape of its value.
#[derive(Debug, Clone)]
pub struct ExprNode {
    /// Operator tag and payload.
    pub kind: ExprKind,
    /// Shape of this node's value.
    pub shape: Shape,
}

/// Arena owning every expression node of a problem.
#[derive(Debug, Default)]
pub struct ExprArena {
    nodes: Vec<ExprNode>,
}

impl ExprArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        ExprArena::default()
    }

    fn push(&mut self, kind: ExprKind, shape: Shape) -> NodeId {
        self.nodes.push(ExprNode { kind, shape });
        NodeId(self.nodes.len() - 1)
    }

    /// Get a node by id.
    pub fn node(&self, id: NodeId) -> &ExprNode {
        &self.nodes[id.0]
    }

    /// Get a node's shape.
    pub fn shape(&self, id: NodeId) -> Shape {
        self.nodes[id.0].shape
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check whether the arena is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Create a leaf node for a variable.
    pub fn variable(&mut self, var: &Variable) -> NodeId {
        self.push(ExprKind::Variable { id: var.id }, var.shape)
    }

    /// Create a constant node from a dense matrix.
    pub fn constant(&mut self, value: DMatrix<f64>) -> NodeId {
        let shape = Shape::matrix(value.nrows(), value.ncols());
        self.push(ExprKind::Constant { value }, shape)
    }

    /// Create a scalar constant node.
    pub fn scalar(&mut self, value: f64) -> NodeId {
        self.constant(DMatrix::from_element(1, 1, value))
    }

    /// Create a negation node. The shape is the child's shape.
    pub fn neg(&mut self, arg: NodeId) -> NodeId {
        let shape = self.shape(arg);
        self.push(ExprKind::Neg { arg }, shape)
    }

    /// Create a sparse-multiplication node.
    ///
    /// The result shape is `(coeff.nrows, child.cols)`.
    ///
    /// # Panics
    ///
    /// Panics if the coefficient's column count does not match the child's
    /// row count.
    pub fn mul(&mut self, coeff: CscMatrix<f64>, arg: NodeId) -> NodeId {
        let child = self.shape(arg);
        assert_eq!(
            coeff.ncols(),
            child.rows(),
            "coefficient columns must match child rows"
        );
        let shape = Shape::matrix(coeff.nrows(), child.cols());
        self.push(ExprKind::Mul { coeff, arg }, shape)
    }

    /// Create a sum node. The shape is the first child's shape.
    ///
    /// # Panics
    ///
    /// Panics if `args` is empty.
    pub fn sum(&mut self, args: Vec<NodeId>) -> NodeId {
        assert!(!args.is_empty(), "sum requires at least one operand");
        let shape = self.shape(args[0]);
        self.push(ExprKind::Sum { args }, shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparse::csc_from_triplets;

    #[test]
    fn test_variable_node_shape() {
        let mut arena = ExprArena::new();
        let x = Variable::new(VarId::from_raw(0), (3, 2));
        let node = arena.variable(&x);
        assert_eq!(arena.shape(node), Shape::matrix(3, 2));
    }

    #[test]
    fn test_neg_and_sum_take_child_shape() {
        let mut arena = ExprArena::new();
        let x = Variable::new(VarId::from_raw(0), 4usize);
        let node = arena.variable(&x);
        let neg = arena.neg(node);
        let sum = arena.sum(vec![node, neg]);
        assert_eq!(arena.shape(neg), Shape::vector(4));
        assert_eq!(arena.shape(sum), Shape::vector(4));
    }

    #[test]
    fn test_mul_shape() {
        let mut arena = ExprArena::new();
        let x = Variable::new(VarId::from_raw(0), (2, 3));
        let node = arena.variable(&x);
        // 4x2 coefficient against a (2, 3) child gives (4, 3)
        let coeff = csc_from_triplets(4, 2, &[0, 3], &[0, 1], &[1.0, 1.0]);
        let mul = arena.mul(coeff, node);
        assert_eq!(arena.shape(mul), Shape::matrix(4, 3));
    }

    #[test]
    #[should_panic(expected = "coefficient columns")]
    fn test_mul_dimension_check() {
        let mut arena = ExprArena::new();
        let x = Variable::new(VarId::from_raw(0), 3usize);
        let node = arena.variable(&x);
        let coeff = csc_from_triplets(2, 2, &[0], &[0], &[1.0]);
        arena.mul(coeff, node);
    }
}
