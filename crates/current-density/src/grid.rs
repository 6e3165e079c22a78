//! Axis sampling and meshgrid construction
//!
//! Every grid uses matrix ("ij") indexing: the coordinate arrays of a grid
//! built from axes of lengths `(L0, ..., Ln)` all have shape `(L0, ..., Ln)`,
//! and axis `a` varies only along index dimension `a`. Adding or removing
//! axes never reorders the existing ones.

use ndarray::{Array1, ArrayD, IxDyn};
use serde::Serialize;
use crate::error::{FieldError, Result};

/// Inclusive, evenly spaced sampling of one axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisSpec {
    min: f64,
    max: f64,
    count: usize,
}

impl AxisSpec {
    pub fn new(min: f64, max: f64, count: usize) -> Result<Self> {
        if count == 0 {
            return Err(FieldError::InvalidAxisSpec {
                reason: "count must be at least 1".to_string(),
            });
        }
        if !min.is_finite() || !max.is_finite() {
            return Err(FieldError::InvalidAxisSpec {
                reason: format!("bounds must be finite, got [{}, {}]", min, max),
            });
        }
        if min > max {
            return Err(FieldError::InvalidAxisSpec {
                reason: format!("min {} is greater than max {}", min, max),
            });
        }

        Ok(Self { min, max, count })
    }

    /// Construct from bounds already known to be valid
    pub(crate) fn trusted(min: f64, max: f64, count: usize) -> Self {
        debug_assert!(count >= 1 && min <= max);
        Self { min, max, count }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Sample coordinates from `min` to `max` inclusive.
    ///
    /// A single-sample axis yields `[min]`. The last sample is pinned to
    /// `max` so accumulated rounding never moves the upper edge.
    pub fn samples(&self) -> Array1<f64> {
        if self.count == 1 {
            return Array1::from_elem(1, self.min);
        }

        let step = (self.max - self.min) / (self.count - 1) as f64;
        Array1::from_shape_fn(self.count, |i| {
            if i == self.count - 1 {
                self.max
            } else {
                self.min + step * i as f64
            }
        })
    }
}

/// Coordinate grid with one materialized array per axis
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    axes: Vec<Array1<f64>>,
    coordinates: Vec<ArrayD<f64>>,
}

impl Grid {
    /// Build a grid from already-sampled axes, in the given order
    pub fn from_axes(axes: Vec<Array1<f64>>) -> Self {
        let shape: Vec<usize> = axes.iter().map(|a| a.len()).collect();

        let coordinates = axes
            .iter()
            .enumerate()
            .map(|(axis, samples)| {
                ArrayD::from_shape_fn(IxDyn(&shape), |idx| samples[idx[axis]])
            })
            .collect();

        Self { axes, coordinates }
    }

    pub fn from_specs(specs: &[AxisSpec]) -> Self {
        Self::from_axes(specs.iter().map(AxisSpec::samples).collect())
    }

    /// Append a trailing axis, keeping every existing axis at its index
    pub fn extend(&self, samples: Array1<f64>) -> Self {
        let mut axes = self.axes.clone();
        axes.push(samples);
        Self::from_axes(axes)
    }

    pub fn ndim(&self) -> usize {
        self.axes.len()
    }

    pub fn shape(&self) -> Vec<usize> {
        self.axes.iter().map(|a| a.len()).collect()
    }

    /// Total number of grid points
    pub fn len(&self) -> usize {
        self.axes.iter().map(|a| a.len()).product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The 1D samples the grid was built from
    pub fn samples(&self, axis: usize) -> Result<&Array1<f64>> {
        self.axes.get(axis).ok_or(FieldError::UnknownAxis {
            axis,
            ndim: self.ndim(),
        })
    }

    /// Meshgrid array for `axis`, shaped like the whole grid
    pub fn coordinates(&self, axis: usize) -> Result<&ArrayD<f64>> {
        self.coordinates.get(axis).ok_or(FieldError::UnknownAxis {
            axis,
            ndim: self.ndim(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_inclusive() {
        let spec = AxisSpec::new(0.1, 10.0, 10).unwrap();
        let samples = spec.samples();
        assert_eq!(samples.len(), 10);
        assert_eq!(samples[0], 0.1);
        assert_eq!(samples[9], 10.0);
        assert!((samples[1] - 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_single_sample_is_min() {
        let spec = AxisSpec::new(0.0, 1.0, 1).unwrap();
        assert_eq!(spec.samples().to_vec(), vec![0.0]);
    }

    #[test]
    fn test_degenerate_range() {
        let spec = AxisSpec::new(2.0, 2.0, 3).unwrap();
        assert_eq!(spec.samples().to_vec(), vec![2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_rejects_invalid_specs() {
        assert!(matches!(
            AxisSpec::new(0.0, 1.0, 0),
            Err(FieldError::InvalidAxisSpec { .. })
        ));
        assert!(matches!(
            AxisSpec::new(1.0, 0.0, 5),
            Err(FieldError::InvalidAxisSpec { .. })
        ));
        assert!(AxisSpec::new(f64::NAN, 1.0, 5).is_err());
    }

    #[test]
    fn test_grid_shape_follows_axis_order() {
        let x = AxisSpec::new(0.0, 1.0, 4).unwrap();
        let y = AxisSpec::new(0.0, 1.0, 3).unwrap();
        let z = AxisSpec::new(-1.0, 1.0, 2).unwrap();

        assert_eq!(Grid::from_specs(&[x]).shape(), vec![4]);
        assert_eq!(Grid::from_specs(&[x, y]).shape(), vec![4, 3]);
        assert_eq!(Grid::from_specs(&[x, z]).shape(), vec![4, 2]);

        let grid = Grid::from_specs(&[x, y, z]);
        assert_eq!(grid.shape(), vec![4, 3, 2]);
        assert_eq!(grid.len(), 24);
        for axis in 0..3 {
            assert_eq!(grid.coordinates(axis).unwrap().shape(), &[4, 3, 2]);
        }
    }

    #[test]
    fn test_ij_indexing() {
        let x = AxisSpec::new(0.0, 3.0, 4).unwrap();
        let y = AxisSpec::new(10.0, 20.0, 3).unwrap();
        let z = AxisSpec::new(-1.0, 1.0, 2).unwrap();
        let grid = Grid::from_specs(&[x, y, z]);

        let gx = grid.coordinates(0).unwrap();
        let gy = grid.coordinates(1).unwrap();
        let gz = grid.coordinates(2).unwrap();

        for i in 0..4 {
            for j in 0..3 {
                for k in 0..2 {
                    assert_eq!(gx[[i, j, k]], i as f64);
                    assert_eq!(gy[[i, j, k]], 10.0 + 5.0 * j as f64);
                    assert_eq!(gz[[i, j, k]], if k == 0 { -1.0 } else { 1.0 });
                }
            }
        }
    }

    #[test]
    fn test_extend_keeps_existing_axes() {
        let x = AxisSpec::new(0.0, 1.0, 3).unwrap();
        let y = AxisSpec::new(0.0, 2.0, 5).unwrap();
        let z = AxisSpec::new(-3.0, 3.0, 7).unwrap();

        let plane = Grid::from_specs(&[x, y]);
        let extended = plane.extend(z.samples());
        assert_eq!(extended, Grid::from_specs(&[x, y, z]));
    }

    #[test]
    fn test_unknown_axis() {
        let grid = Grid::from_specs(&[AxisSpec::new(0.0, 1.0, 2).unwrap()]);
        assert!(matches!(
            grid.coordinates(1),
            Err(FieldError::UnknownAxis { axis: 1, ndim: 1 })
        ));
        assert!(matches!(
            grid.samples(3),
            Err(FieldError::UnknownAxis { axis: 3, ndim: 1 })
        ));
    }

    #[test]
    fn test_samples_are_source_axes() {
        let x = AxisSpec::new(0.0, 1.0, 3).unwrap();
        let y = AxisSpec::new(-2.0, 2.0, 5).unwrap();
        let grid = Grid::from_specs(&[x, y]);

        assert_eq!(grid.samples(0).unwrap(), &x.samples());
        assert_eq!(grid.samples(1).unwrap(), &y.samples());
    }
}
