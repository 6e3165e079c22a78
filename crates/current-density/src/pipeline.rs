//! Sampling pipeline: grids → evaluation → extrusion → datasets

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use crate::assemble::{assemble, assemble_tagged, Dataset, DatasetKind, Placement};
use crate::config::{Layout, SamplingPlan};
use crate::error::Result;
use crate::extrude::extrude_to;
use crate::field::{evaluate_spatial, evaluate_surface, evaluate_tagged};
use crate::grid::Grid;

/// Default 3D view: y up, looking down the z axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub up: [f64; 3],
    pub center: [f64; 3],
    pub eye: [f64; 3],
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            up: [0.0, 1.0, 0.0],
            center: [0.0, 0.0, 0.0],
            eye: [0.0, 0.0, 2.0],
        }
    }
}

/// Everything the renderer needs for one figure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visualization {
    pub title: String,
    pub camera: Camera,
    pub datasets: Vec<Dataset>,
}

impl Visualization {
    pub fn dataset(&self, kind: DatasetKind) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.kind == kind)
    }

    /// Total samples across all datasets
    pub fn len(&self) -> usize {
        self.datasets.iter().map(Dataset::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Sample both fields according to the plan's layout
pub fn build_visualization(plan: &SamplingPlan) -> Result<Visualization> {
    info!(
        "Sampling {} layout: A={}, b={}, h={}, grid {}x{}x{}",
        plan.layout,
        plan.params.amplitude(),
        plan.params.decay(),
        plan.params.height(),
        plan.x.count(),
        plan.y.count(),
        plan.z.count()
    );

    let datasets = match plan.layout {
        Layout::Slab => sample_slab(plan)?,
        Layout::Volume => sample_volume(plan)?,
    };

    for dataset in &datasets {
        let stats = dataset.stats();
        debug!(
            "{}: {} samples, {} non-zero, max |v| = {:.4}",
            dataset.name, stats.samples, stats.nonzero, stats.max_magnitude
        );
    }

    Ok(Visualization {
        title: plan.title.clone(),
        camera: Camera::default(),
        datasets,
    })
}

/// J over the x-y slab and K along the y = 0 plane, each extruded along z
pub fn sample_slab(plan: &SamplingPlan) -> Result<Vec<Dataset>> {
    let plane = Grid::from_specs(&[plan.x, plan.y]);
    let xs = plane.samples(0)?;
    let zs = plan.z.samples();

    let (volumetric, boundary) = rayon::join(
        || -> Result<Dataset> {
            let volume = plane.extend(zs.clone());
            let j = evaluate_spatial(&plan.params, plane.coordinates(0)?, plane.coordinates(1)?)?;
            let j = extrude_to(&j, &volume.shape())?;
            assemble(DatasetKind::Volumetric, &volume, &j, Placement::volume())
        },
        || -> Result<Dataset> {
            let strip = Grid::from_axes(vec![xs.clone(), zs.clone()]);
            let k = evaluate_surface(&plan.params, &xs.clone().into_dyn());
            let k = extrude_to(&k, &strip.shape())?;
            assemble(DatasetKind::Boundary, &strip, &k, Placement::xz_plane(0.0))
        },
    );

    Ok(vec![volumetric?, boundary?])
}

/// One x-y-z grid; each (x, y) is classified once and extruded along z
pub fn sample_volume(plan: &SamplingPlan) -> Result<Vec<Dataset>> {
    let plane = Grid::from_specs(&[plan.x, plan.y]);
    let volume = plane.extend(plan.z.samples());

    let tagged = evaluate_tagged(&plan.params, plane.coordinates(0)?, plane.coordinates(1)?)?;
    let tagged = extrude_to(&tagged, &volume.shape())?;
    let (volumetric, boundary) = assemble_tagged(&volume, &tagged, Placement::volume())?;

    Ok(vec![volumetric, boundary])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AxisConfig, VisualizationConfig};

    #[test]
    fn test_default_slab_counts() {
        let vis = build_visualization(&SamplingPlan::default()).unwrap();
        let volumetric = vis.dataset(DatasetKind::Volumetric).unwrap();
        let boundary = vis.dataset(DatasetKind::Boundary).unwrap();

        assert_eq!(volumetric.len(), 10 * 10 * 7);
        assert_eq!(boundary.len(), 10 * 7);
        assert_eq!(vis.len(), 770);
        assert_eq!(vis.title, "Spatial and Surface Current Densities");
    }

    #[test]
    fn test_volume_layout_partitions_grid() {
        let config = VisualizationConfig {
            height: 2.0,
            layout: Layout::Volume,
            x: AxisConfig::new(-1.0, 4.0, 11),
            y: AxisConfig::new(-1.0, 4.0, 11),
            z: AxisConfig::new(-2.5, 2.5, 11),
            ..VisualizationConfig::default()
        };
        let vis = build_visualization(&config.resolve()).unwrap();
        let boundary = vis.dataset(DatasetKind::Boundary).unwrap();

        assert_eq!(vis.len(), 11 * 11 * 11);
        // y = 0 is hit exactly; K is non-zero for the 8 of 11 x samples with x > 0
        assert_eq!(boundary.len(), 11 * 11);
        assert!(boundary.y.iter().all(|&y| y == 0.0));
        assert_eq!(boundary.stats().nonzero, 8 * 11);
        assert!(boundary.u.iter().all(|&u| u <= 0.0));
    }
}
