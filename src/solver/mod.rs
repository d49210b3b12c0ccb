//! Solver interface for conicform.
//!
//! This module provides:
//! - Clarabel setup, option application, and status canonicalization
//! - Result recovery from flat primal/dual vectors

pub mod clarabel;
pub mod solution;

pub use self::clarabel::SolveStatus;
pub use solution::Solution;

pub(crate) use self::clarabel::{RawResult, SolverHandle};
pub(crate) use solution::{recover_dual_values, recover_values};
