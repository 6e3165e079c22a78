//! Flattening grids and fields into renderer-ready datasets
//!
//! Positions and vectors are walked together in the field's row-major
//! order (last axis fastest), so sample `n` of every output column refers
//! to the same grid point.

use nalgebra::Vector3;
use ndarray::{ArrayD, Dimension};
use serde::{Deserialize, Serialize};
use crate::domain::FieldDomain;
use crate::error::{FieldError, Result};
use crate::grid::Grid;

/// Which field a dataset carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    Volumetric,
    Boundary,
}

impl DatasetKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            DatasetKind::Volumetric => "Spatial Current Density",
            DatasetKind::Boundary => "Surface Current Density",
        }
    }

    /// Plotly colorscale name
    pub fn colorscale(&self) -> &'static str {
        match self {
            DatasetKind::Volumetric => "Blues",
            DatasetKind::Boundary => "Reds",
        }
    }

    /// Flat color for viewers without colorscales
    pub fn rgb(&self) -> [u8; 3] {
        match self {
            DatasetKind::Volumetric => [0x1f, 0x77, 0xb4],
            DatasetKind::Boundary => [0xd6, 0x27, 0x28],
        }
    }

    pub fn id(&self) -> u8 {
        match self {
            DatasetKind::Volumetric => 0,
            DatasetKind::Boundary => 1,
        }
    }
}

/// One point of a dataset, as handed to a renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorSample {
    pub position: Vector3<f64>,
    pub vector: Vector3<f64>,
    pub dataset: DatasetKind,
}

/// Where a world coordinate comes from when flattening a grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coordinate {
    /// Read from the grid's meshgrid array for this axis
    Axis(usize),
    /// Same value at every point
    Constant(f64),
}

/// Mapping from grid axes to world x, y, z
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: Coordinate,
    pub y: Coordinate,
    pub z: Coordinate,
}

impl Placement {
    /// Grid axes 0, 1, 2 are world x, y, z
    pub fn volume() -> Self {
        Self {
            x: Coordinate::Axis(0),
            y: Coordinate::Axis(1),
            z: Coordinate::Axis(2),
        }
    }

    /// A 2-axis (x, z) grid lying in the plane `y = offset`
    pub fn xz_plane(offset: f64) -> Self {
        Self {
            x: Coordinate::Axis(0),
            y: Coordinate::Constant(offset),
            z: Coordinate::Axis(1),
        }
    }

    fn check(&self, grid: &Grid) -> Result<()> {
        for coord in [self.x, self.y, self.z] {
            if let Coordinate::Axis(axis) = coord {
                grid.coordinates(axis)?;
            }
        }
        Ok(())
    }

    fn resolve(&self, grid: &Grid, idx: &[usize]) -> Result<Vector3<f64>> {
        let read = |coord: Coordinate| -> Result<f64> {
            match coord {
                Coordinate::Axis(axis) => Ok(grid.coordinates(axis)?[idx]),
                Coordinate::Constant(value) => Ok(value),
            }
        };
        Ok(Vector3::new(read(self.x)?, read(self.y)?, read(self.z)?))
    }
}

/// Parallel position/vector columns for one field type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub name: String,
    pub kind: DatasetKind,
    pub colorscale: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
    pub u: Vec<f64>,
    pub v: Vec<f64>,
    pub w: Vec<f64>,
}

/// Per-dataset counts used in summaries and logs
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DatasetStats {
    pub samples: usize,
    pub nonzero: usize,
    pub max_magnitude: f64,
}

impl Dataset {
    pub fn empty(kind: DatasetKind) -> Self {
        Self {
            name: kind.display_name().to_string(),
            kind,
            colorscale: kind.colorscale().to_string(),
            x: Vec::new(),
            y: Vec::new(),
            z: Vec::new(),
            u: Vec::new(),
            v: Vec::new(),
            w: Vec::new(),
        }
    }

    fn with_capacity(kind: DatasetKind, capacity: usize) -> Self {
        let mut dataset = Self::empty(kind);
        for column in dataset.columns_mut() {
            column.reserve(capacity);
        }
        dataset
    }

    fn columns_mut(&mut self) -> [&mut Vec<f64>; 6] {
        [
            &mut self.x,
            &mut self.y,
            &mut self.z,
            &mut self.u,
            &mut self.v,
            &mut self.w,
        ]
    }

    fn push(&mut self, position: Vector3<f64>, vector: Vector3<f64>) {
        self.x.push(position.x);
        self.y.push(position.y);
        self.z.push(position.z);
        self.u.push(vector.x);
        self.v.push(vector.y);
        self.w.push(vector.z);
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// The six columns in `x, y, z, u, v, w` order
    pub fn columns(&self) -> [&[f64]; 6] {
        [&self.x, &self.y, &self.z, &self.u, &self.v, &self.w]
    }

    pub fn samples(&self) -> impl Iterator<Item = VectorSample> + '_ {
        (0..self.len()).map(move |n| VectorSample {
            position: Vector3::new(self.x[n], self.y[n], self.z[n]),
            vector: Vector3::new(self.u[n], self.v[n], self.w[n]),
            dataset: self.kind,
        })
    }

    pub fn stats(&self) -> DatasetStats {
        let mut nonzero = 0;
        let mut max_magnitude = 0.0f64;
        for sample in self.samples() {
            let magnitude = sample.vector.norm();
            if magnitude > 0.0 {
                nonzero += 1;
            }
            max_magnitude = max_magnitude.max(magnitude);
        }
        DatasetStats {
            samples: self.len(),
            nonzero,
            max_magnitude,
        }
    }
}

fn check_shape<T>(grid: &Grid, field: &ArrayD<T>) -> Result<()> {
    let expected = grid.shape();
    if field.shape() != expected.as_slice() {
        return Err(FieldError::ShapeMismatch {
            expected,
            found: field.shape().to_vec(),
        });
    }
    Ok(())
}

/// Flatten `grid` and the co-indexed `field` into one dataset.
///
/// Every grid point is emitted, including zero vectors.
pub fn assemble(
    kind: DatasetKind,
    grid: &Grid,
    field: &ArrayD<Vector3<f64>>,
    placement: Placement,
) -> Result<Dataset> {
    check_shape(grid, field)?;
    placement.check(grid)?;

    let mut dataset = Dataset::with_capacity(kind, field.len());
    for (idx, vector) in field.indexed_iter() {
        dataset.push(placement.resolve(grid, idx.slice())?, *vector);
    }
    Ok(dataset)
}

/// Split a domain-tagged field into volumetric and boundary datasets.
///
/// Points tagged [`FieldDomain::Boundary`] go to the boundary dataset; all
/// others, including undefined (zero) points, go to the volumetric one.
pub fn assemble_tagged(
    grid: &Grid,
    field: &ArrayD<(FieldDomain, Vector3<f64>)>,
    placement: Placement,
) -> Result<(Dataset, Dataset)> {
    check_shape(grid, field)?;
    placement.check(grid)?;

    let mut volumetric = Dataset::empty(DatasetKind::Volumetric);
    let mut boundary = Dataset::empty(DatasetKind::Boundary);
    for (idx, (domain, vector)) in field.indexed_iter() {
        let position = placement.resolve(grid, idx.slice())?;
        // The y = 0 plane is drawn as the boundary even where K vanishes
        match domain {
            FieldDomain::Boundary => boundary.push(position, *vector),
            FieldDomain::Undefined if position.y == 0.0 => boundary.push(position, *vector),
            FieldDomain::Volumetric | FieldDomain::Undefined => volumetric.push(position, *vector),
        }
    }
    Ok((volumetric, boundary))
}
