//! Error types for conicform.

use thiserror::Error;

/// Error type for canonical-form translation and solving.
#[derive(Debug, Error)]
pub enum CanonError {
    /// Solver option name outside the recognized set.
    #[error("unrecognized solver option: {0}")]
    UnknownOption(String),

    /// Solver setup rejected the problem data.
    #[error("solver setup failed: {0}")]
    Setup(String),

    /// A constraint does not have the operand layout its cone family requires.
    #[error("malformed constraint: {0}")]
    MalformedConstraint(String),

    /// An expression references a variable with no column offset.
    #[error("unknown variable id {0}")]
    UnknownVariable(u64),

    /// Declared dimensions disagree with the assembled matrices.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: String, got: String },

    /// A result vector is shorter than the stored offsets require.
    #[error("result recovery failed: {0}")]
    Recovery(String),
}

/// Result type for conicform operations.
pub type Result<T> = std::result::Result<T, CanonError>;
