//! Expression types for the canonical-form layer.
//!
//! This module provides the linear-operator node arena and the variable
//! metadata that the builder and recovery steps share:
//! - `ExprArena` / `NodeId` - index-addressed expression trees
//! - `Shape` - two-dimensional value shapes
//! - `Variable` / `DualVariable` - identity and recovery metadata

pub mod arena;
pub mod shape;
pub mod variable;

pub use arena::{ExprArena, ExprKind, ExprNode, NodeId};
pub use shape::Shape;
pub use variable::{ConeFamily, DualVariable, VarId, Variable};
