//! Shape representation for expressions.
//!
//! Every expression in this layer has a two-dimensional value; scalars are
//! `(1, 1)` and column vectors are `(n, 1)`.

use std::fmt;

/// Shape of an expression's value.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    rows: usize,
    cols: usize,
}

impl Shape {
    /// Create a scalar shape.
    pub fn scalar() -> Self {
        Shape { rows: 1, cols: 1 }
    }

    /// Create a column-vector shape.
    pub fn vector(n: usize) -> Self {
        Shape { rows: n, cols: 1 }
    }

    /// Create a matrix shape.
    pub fn matrix(rows: usize, cols: usize) -> Self {
        Shape { rows, cols }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of scalar entries.
    pub fn size(&self) -> usize {
        self.rows * self.cols
    }

    /// Check if this is a scalar.
    pub fn is_scalar(&self) -> bool {
        self.rows == 1 && self.cols == 1
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shape({}, {})", self.rows, self.cols)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.rows, self.cols)
    }
}

impl From<(usize, usize)> for Shape {
    fn from((rows, cols): (usize, usize)) -> Self {
        Shape::matrix(rows, cols)
    }
}

impl From<usize> for Shape {
    fn from(n: usize) -> Self {
        Shape::vector(n)
    }
}
