//! Canonical-form translation: constraint reformatting and matrix assembly.
//!
//! This module turns tagged cone constraint groups into the solver's uniform
//! convention and reduces the resulting expression trees to sparse
//! coefficient triplets plus constant vectors.

pub mod assemble;
pub mod reformat;

pub use assemble::{assemble, objective_vector, ProblemData};
pub use reformat::{format_affine, format_elementwise, format_exp, format_soc};
