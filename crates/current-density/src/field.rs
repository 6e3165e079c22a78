//! Closed-form current densities of the slab model
//!
//! Volumetric current density inside the slab (`x > 0`, `0 < y <= h`):
//!   J = A (1 - e^{-b x}) x̂ + A b (h - y) e^{-b x} ŷ
//!
//! Surface current density on the lower face (`y = 0`, `x > 0`):
//!   K = -A h (1 - e^{-b x}) x̂
//!
//! Both vanish everywhere else. Grid evaluation is elementwise and runs in
//! parallel; no point depends on its neighbours.

use nalgebra::Vector3;
use ndarray::{ArrayD, Zip};
use crate::domain::FieldDomain;
use crate::error::{FieldError, Result};
use crate::params::FieldParameters;

/// A vector per grid point, co-indexed with the grid it was evaluated on
pub type VectorField = ArrayD<Vector3<f64>>;

/// Vector plus the branch that produced it
pub type TaggedField = ArrayD<(FieldDomain, Vector3<f64>)>;

/// Volumetric current density `J(x, y)`
pub fn spatial_current_density(params: &FieldParameters, x: f64, y: f64) -> Vector3<f64> {
    match FieldDomain::classify(x, y, params.height()) {
        FieldDomain::Volumetric => volumetric_law(params, x, y),
        FieldDomain::Boundary | FieldDomain::Undefined => Vector3::zeros(),
    }
}

/// Surface current density `K(x)` on the `y = 0` plane
pub fn surface_current_density(params: &FieldParameters, x: f64) -> Vector3<f64> {
    match FieldDomain::classify(x, 0.0, params.height()) {
        FieldDomain::Boundary => boundary_law(params, x),
        _ => Vector3::zeros(),
    }
}

/// Whichever law applies at `(x, y)`, tagged with its domain
pub fn current_density(params: &FieldParameters, x: f64, y: f64) -> (FieldDomain, Vector3<f64>) {
    let domain = FieldDomain::classify(x, y, params.height());
    let value = match domain {
        FieldDomain::Volumetric => volumetric_law(params, x, y),
        FieldDomain::Boundary => boundary_law(params, x),
        FieldDomain::Undefined => Vector3::zeros(),
    };
    (domain, value)
}

#[inline]
fn volumetric_law(params: &FieldParameters, x: f64, y: f64) -> Vector3<f64> {
    let attenuation = (-params.decay() * x).exp();
    Vector3::new(
        params.amplitude() * params.saturation(x),
        params.amplitude() * params.decay() * (params.height() - y) * attenuation,
        0.0,
    )
}

#[inline]
fn boundary_law(params: &FieldParameters, x: f64) -> Vector3<f64> {
    Vector3::new(-params.amplitude() * params.height() * params.saturation(x), 0.0, 0.0)
}

fn check_same_shape(x: &ArrayD<f64>, y: &ArrayD<f64>) -> Result<()> {
    if x.shape() != y.shape() {
        return Err(FieldError::ShapeMismatch {
            expected: x.shape().to_vec(),
            found: y.shape().to_vec(),
        });
    }
    Ok(())
}

/// Evaluate `J` over co-indexed x and y coordinate arrays
pub fn evaluate_spatial(
    params: &FieldParameters,
    x: &ArrayD<f64>,
    y: &ArrayD<f64>,
) -> Result<VectorField> {
    check_same_shape(x, y)?;
    Ok(Zip::from(x)
        .and(y)
        .par_map_collect(|&x, &y| spatial_current_density(params, x, y)))
}

/// Evaluate `K` over an array of x coordinates
pub fn evaluate_surface(params: &FieldParameters, x: &ArrayD<f64>) -> VectorField {
    Zip::from(x).par_map_collect(|&x| surface_current_density(params, x))
}

/// Evaluate the combined piecewise law, keeping the domain of every point
pub fn evaluate_tagged(
    params: &FieldParameters,
    x: &ArrayD<f64>,
    y: &ArrayD<f64>,
) -> Result<TaggedField> {
    check_same_shape(x, y)?;
    Ok(Zip::from(x)
        .and(y)
        .par_map_collect(|&x, &y| current_density(params, x, y)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{AxisSpec, Grid};

    fn reference() -> FieldParameters {
        FieldParameters::new(1.0, 0.3, 1.0).unwrap()
    }

    #[test]
    fn test_reference_point() {
        let params = reference();
        let j = spatial_current_density(&params, 10.0, 0.5);
        let expected_jx = 1.0 - (-3.0f64).exp();
        let expected_jy = 0.3 * 0.5 * (-3.0f64).exp();

        assert!((j.x - expected_jx).abs() < 1e-12);
        assert!((j.x - 0.9502).abs() < 1e-4);
        assert!((j.y - expected_jy).abs() < 1e-12);
        assert!((j.y - 0.00747).abs() < 1e-5);
        assert_eq!(j.z, 0.0);
    }

    #[test]
    fn test_surface_reference_point() {
        let k = surface_current_density(&reference(), 10.0);
        assert!((k.x + 0.9502).abs() < 1e-4);
        assert_eq!(k.y, 0.0);
        assert_eq!(k.z, 0.0);
    }

    #[test]
    fn test_zero_for_non_positive_x() {
        let params = reference();
        for x in [0.0, -0.1, -5.0] {
            for y in [-1.0, 0.0, 0.25, 1.0, 3.0] {
                assert_eq!(spatial_current_density(&params, x, y), Vector3::zeros());
            }
            assert_eq!(surface_current_density(&params, x), Vector3::zeros());
        }
    }

    #[test]
    fn test_boundary_owned_by_surface() {
        let params = reference();
        assert_eq!(spatial_current_density(&params, 5.0, 0.0), Vector3::zeros());

        let (domain, value) = current_density(&params, 5.0, 0.0);
        assert_eq!(domain, FieldDomain::Boundary);
        assert_eq!(value, surface_current_density(&params, 5.0));
    }

    #[test]
    fn test_upper_edge_has_zero_jy() {
        let j = spatial_current_density(&reference(), 5.0, 1.0);
        assert_eq!(j.y, 0.0);
        assert!(j.x > 0.0);
    }

    #[test]
    fn test_above_slab_is_zero() {
        assert_eq!(spatial_current_density(&reference(), 5.0, 1.5), Vector3::zeros());
    }

    #[test]
    fn test_jx_independent_of_y() {
        let params = reference();
        let jx = spatial_current_density(&params, 2.0, 0.1).x;
        for y in [0.2, 0.5, 0.9, 1.0] {
            assert_eq!(spatial_current_density(&params, 2.0, y).x, jx);
        }
    }

    #[test]
    fn test_jy_strictly_decreasing_in_y() {
        let params = reference();
        let ys = AxisSpec::new(0.05, 1.0, 20).unwrap().samples();
        let jy: Vec<f64> = ys.iter().map(|&y| spatial_current_density(&params, 1.5, y).y).collect();
        for pair in jy.windows(2) {
            assert!(pair[0] > pair[1]);
        }
    }

    #[test]
    fn test_limits() {
        let params = reference();
        let far = spatial_current_density(&params, 200.0, 0.5);
        assert!((far.x - 1.0).abs() < 1e-12);
        assert!(far.y.abs() < 1e-12);

        let near = spatial_current_density(&params, 1e-12, 0.5);
        assert!(near.x.abs() < 1e-10);
    }

    #[test]
    fn test_grid_evaluation_matches_pointwise() {
        let params = FieldParameters::new(2.0, 0.7, 1.5).unwrap();
        let grid = Grid::from_specs(&[
            AxisSpec::new(-1.0, 4.0, 6).unwrap(),
            AxisSpec::new(0.0, 1.5, 4).unwrap(),
        ]);
        let gx = grid.coordinates(0).unwrap();
        let gy = grid.coordinates(1).unwrap();
        let j = evaluate_spatial(&params, gx, gy).unwrap();

        assert_eq!(j.shape(), &[6, 4]);
        for ((idx, value), (&x, &y)) in j.indexed_iter().zip(gx.iter().zip(gy.iter())) {
            assert_eq!(*value, spatial_current_density(&params, x, y), "at {:?}", idx);
        }
    }

    #[test]
    fn test_surface_evaluation_shape() {
        let xs = AxisSpec::new(-1.0, 1.0, 5).unwrap().samples().into_dyn();
        let k = evaluate_surface(&reference(), &xs);
        assert_eq!(k.shape(), &[5]);
        assert_eq!(k[[0]], Vector3::zeros());
        assert_eq!(k[[2]], Vector3::zeros());
        assert!(k[[4]].x < 0.0);
    }

    #[test]
    fn test_mismatched_shapes_rejected() {
        let x = AxisSpec::new(0.0, 1.0, 3).unwrap().samples().into_dyn();
        let y = AxisSpec::new(0.0, 1.0, 4).unwrap().samples().into_dyn();
        assert!(matches!(
            evaluate_spatial(&reference(), &x, &y),
            Err(FieldError::ShapeMismatch { .. })
        ));
        assert!(evaluate_tagged(&reference(), &x, &y).is_err());
    }
}
