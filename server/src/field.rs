//! Field snapshots served to viewers
//!
//! A snapshot is one sampled visualization, pre-encoded as JSON and as a
//! binary `FIELD` frame so every client gets the same bytes.

use anyhow::{Context, Result};
use current_density::{visualize, Visualization, VisualizationConfig};
use serde::Serialize;
use std::path::Path;

/// Per-dataset counts reported by `/status`
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub name: String,
    pub samples: usize,
    pub nonzero: usize,
    pub max_magnitude: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldStatus {
    pub revision: u64,
    pub title: String,
    pub layout: String,
    pub datasets: Vec<DatasetSummary>,
}

pub struct FieldSnapshot {
    pub status: FieldStatus,
    pub json: String,
    pub binary: Vec<u8>,
}

impl FieldSnapshot {
    fn from_visualization(
        vis: &Visualization,
        config: &VisualizationConfig,
        revision: u64,
    ) -> Result<Self> {
        let datasets = vis
            .datasets
            .iter()
            .map(|d| {
                let stats = d.stats();
                DatasetSummary {
                    name: d.name.clone(),
                    samples: stats.samples,
                    nonzero: stats.nonzero,
                    max_magnitude: stats.max_magnitude,
                }
            })
            .collect();

        Ok(Self {
            status: FieldStatus {
                revision,
                title: vis.title.clone(),
                layout: config.layout.to_string(),
                datasets,
            },
            json: serde_json::to_string(vis).context("Failed to encode field JSON")?,
            binary: vis.to_binary(),
        })
    }
}

/// Load the config (defaults when absent or malformed) and sample it
pub fn compute_snapshot(config_path: Option<&Path>, revision: u64) -> Result<FieldSnapshot> {
    let config = match config_path {
        Some(path) => VisualizationConfig::load(path),
        None => VisualizationConfig::default(),
    };

    let vis = visualize(&config).context("Sampling failed")?;
    FieldSnapshot::from_visualization(&vis, &config, revision)
}
