//! Extrusion of a field from its natural domain onto a larger grid
//!
//! Added axes always trail the natural ones, matching [`Grid::extend`].
//! The value at `(i, j, k, ...)` of the result is the source value at
//! `(i, j)`: replicated, never re-evaluated.
//!
//! [`Grid::extend`]: crate::grid::Grid::extend

use ndarray::{ArrayD, Dimension, IxDyn};
use crate::error::{FieldError, Result};

/// Replicate `field` along one new trailing axis of length `count`
pub fn extrude<T: Clone>(field: &ArrayD<T>, count: usize) -> ArrayD<T> {
    let natural = field.ndim();
    let mut shape = field.shape().to_vec();
    shape.push(count);
    ArrayD::from_shape_fn(IxDyn(&shape), |idx| field[&idx.slice()[..natural]].clone())
}

/// Replicate `field` across every axis of `target` beyond its own.
///
/// The field's shape must be a leading prefix of `target`.
pub fn extrude_to<T: Clone>(field: &ArrayD<T>, target: &[usize]) -> Result<ArrayD<T>> {
    let natural = field.shape();
    if natural.len() > target.len() || &target[..natural.len()] != natural {
        return Err(FieldError::ShapeMismatch {
            expected: target.to_vec(),
            found: natural.to_vec(),
        });
    }

    let mut out = field.clone();
    for &count in &target[natural.len()..] {
        out = extrude(&out, count);
    }
    Ok(out)
}
