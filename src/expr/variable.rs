//! Variable identity and dual-variable metadata.

use std::sync::atomic::{AtomicU64, Ordering};

use super::shape::Shape;

/// Unique identifier for a variable within a problem.
///
/// Caller-facing layers that already number their variables can wrap their
/// own ids with [`VarId::from_raw`]; fresh ids come from [`VarId::fresh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(u64);

impl VarId {
    /// Generate a new unique id.
    pub fn fresh() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(0);
        VarId(NEXT_ID.fetch_add(1, Ordering::SeqCst))
    }

    /// Wrap an externally assigned id.
    pub fn from_raw(raw: u64) -> Self {
        VarId(raw)
    }

    /// Get the raw id value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// A primal variable: identity plus the shape of its dense value.
#[derive(Debug, Clone, Copy)]
pub struct Variable {
    /// Unique id within the problem.
    pub id: VarId,
    /// Shape of the variable's value.
    pub shape: Shape,
}

impl Variable {
    /// Create a variable with the given id and shape.
    pub fn new(id: VarId, shape: impl Into<Shape>) -> Self {
        Variable {
            id,
            shape: shape.into(),
        }
    }

    /// Number of scalar entries.
    pub fn size(&self) -> usize {
        self.shape.size()
    }
}

/// Cone family a constraint (and its dual variable) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConeFamily {
    /// Equality (zero cone).
    Eq,
    /// Elementwise inequality (nonnegative orthant).
    Leq,
    /// Second-order cone.
    Soc,
    /// Exponential cone.
    Exp,
}

/// Metadata for recovering a constraint's dual value from the solver's flat
/// dual vector.
///
/// Exponential-cone duals consume three scalars per constraint entry; every
/// other family consumes one.
#[derive(Debug, Clone, Copy)]
pub struct DualVariable {
    /// Id of the dual variable (the constraint's `dual_id`).
    pub id: VarId,
    /// Shape of the constraint block.
    pub shape: Shape,
    /// Cone family of the originating constraint.
    pub family: ConeFamily,
}

impl DualVariable {
    /// Number of flat dual-vector entries this variable consumes.
    pub fn entries(&self) -> usize {
        match self.family {
            ConeFamily::Exp => 3 * self.shape.size(),
            _ => self.shape.size(),
        }
    }
}
