//! Branch selection between the volumetric and surface current laws

use serde::{Deserialize, Serialize};

/// Which analytic law applies at a point `(x, y)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldDomain {
    /// No current flows here
    Undefined,
    /// Slab interior `x > 0, 0 < y <= h`
    Volumetric,
    /// Lower surface `y = 0, x > 0`
    Boundary,
}

impl FieldDomain {
    /// Classify a point against a slab of height `height`.
    ///
    /// `y = 0` belongs only to the boundary; `y = height` is still
    /// volumetric.
    pub fn classify(x: f64, y: f64, height: f64) -> Self {
        if x <= 0.0 || x.is_nan() {
            return FieldDomain::Undefined;
        }

        if y == 0.0 {
            FieldDomain::Boundary
        } else if y > 0.0 && y <= height {
            FieldDomain::Volumetric
        } else {
            FieldDomain::Undefined
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_positive_x_is_undefined() {
        for y in [-1.0, 0.0, 0.5, 1.0, 2.0] {
            assert_eq!(FieldDomain::classify(0.0, y, 1.0), FieldDomain::Undefined);
            assert_eq!(FieldDomain::classify(-3.0, y, 1.0), FieldDomain::Undefined);
        }
    }

    #[test]
    fn test_edges() {
        assert_eq!(FieldDomain::classify(5.0, 0.0, 1.0), FieldDomain::Boundary);
        assert_eq!(FieldDomain::classify(5.0, -0.0, 1.0), FieldDomain::Boundary);
        assert_eq!(FieldDomain::classify(5.0, 1.0, 1.0), FieldDomain::Volumetric);
        assert_eq!(FieldDomain::classify(5.0, 1.0 + 1e-12, 1.0), FieldDomain::Undefined);
        assert_eq!(FieldDomain::classify(5.0, 1e-12, 1.0), FieldDomain::Volumetric);
        assert_eq!(FieldDomain::classify(5.0, -1e-12, 1.0), FieldDomain::Undefined);
    }

    #[test]
    fn test_nan_is_undefined() {
        assert_eq!(FieldDomain::classify(f64::NAN, 0.5, 1.0), FieldDomain::Undefined);
        assert_eq!(FieldDomain::classify(1.0, f64::NAN, 1.0), FieldDomain::Undefined);
    }
}
