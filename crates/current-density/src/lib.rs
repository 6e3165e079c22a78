//! current-density: sample the slab current-density model for 3D rendering
//!
//! This crate provides:
//! - The closed-form volumetric (J) and surface (K) current densities
//! - Axis sampling and "ij" meshgrids
//! - Extrusion of a field onto extra visualization axes
//! - Flattening into position/vector datasets
//! - Hand-off formats for renderers (JSON, Plotly script, binary frame)

pub mod assemble;
pub mod codegen;
pub mod config;
pub mod domain;
pub mod error;
pub mod extrude;
pub mod field;
pub mod frame;
pub mod grid;
pub mod params;
pub mod pipeline;

pub use assemble::{
    assemble, assemble_tagged, Coordinate, Dataset, DatasetKind, DatasetStats, Placement,
    VectorSample,
};
pub use codegen::generate_plotly_script;
pub use config::{AxisConfig, Layout, SamplingPlan, VisualizationConfig};
pub use domain::FieldDomain;
pub use error::{FieldError, Result};
pub use extrude::{extrude, extrude_to};
pub use field::{
    current_density, evaluate_spatial, evaluate_surface, evaluate_tagged, spatial_current_density,
    surface_current_density, TaggedField, VectorField,
};
pub use grid::{AxisSpec, Grid};
pub use params::FieldParameters;
pub use pipeline::{build_visualization, Camera, Visualization};

/// Main entry point: resolve a config and sample it
pub fn visualize(config: &VisualizationConfig) -> Result<Visualization> {
    build_visualization(&config.resolve())
}
