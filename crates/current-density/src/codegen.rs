//! Python code generation for Plotly cone plots

use std::io::Write;

use anyhow::Result;
use base64::Engine;
use minijinja::{context, Environment};
use crate::pipeline::Visualization;

const PLOTLY_TEMPLATE: &str = r##"#!/usr/bin/env python3
"""
Auto-generated cone plot

Generated: {{ timestamp }}
Datasets: {{ datasets|length }}
"""

import base64
import zlib

import numpy as np
import plotly.graph_objects as go

TITLE = {{ title|tojson }}

def decode(blob):
    """Decode a base64, zlib-compressed little-endian float64 column."""
    return np.frombuffer(zlib.decompress(base64.b64decode(blob)), dtype="<f8")


# =============================================================================
# Sample Data
# =============================================================================

DATASETS = [
{% for ds in datasets %}
    {
        "name": {{ ds.name|tojson }},
        "colorscale": {{ ds.colorscale|tojson }},
        "count": {{ ds.count }},
        "x": "{{ ds.x }}",
        "y": "{{ ds.y }}",
        "z": "{{ ds.z }}",
        "u": "{{ ds.u }}",
        "v": "{{ ds.v }}",
        "w": "{{ ds.w }}",
    },
{% endfor %}
]


# =============================================================================
# Figure
# =============================================================================

def build_traces():
    traces = []
    for ds in DATASETS:
        columns = {key: decode(ds[key]) for key in ("x", "y", "z", "u", "v", "w")}
        traces.append(go.Cone(
            **columns,
            colorscale=ds["colorscale"],
            showscale=False,
            name=ds["name"],
        ))
    return traces


def axis(title, color):
    return dict(title=title, zeroline=True, zerolinecolor=color, showline=True, showgrid=True)


def create_plot():
    fig = go.Figure(data=build_traces())
    fig.update_layout(
        scene=dict(
            xaxis=axis("X", "red"),
            yaxis=axis("Y", "green"),
            zaxis=axis("Z", "blue"),
            aspectmode="cube",
            camera=dict(
                up=dict(x={{ camera.up[0] }}, y={{ camera.up[1] }}, z={{ camera.up[2] }}),
                center=dict(x={{ camera.center[0] }}, y={{ camera.center[1] }}, z={{ camera.center[2] }}),
                eye=dict(x={{ camera.eye[0] }}, y={{ camera.eye[1] }}, z={{ camera.eye[2] }}),
            ),
        ),
        title=TITLE,
        template="plotly_dark",
    )
    return fig


if __name__ == "__main__":
    create_plot().show()
"##;

/// Compress a column as little-endian f64, zlib, then base64
pub fn encode_column(values: &[f64]) -> Result<String> {
    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    for v in values {
        encoder.write_all(&v.to_le_bytes())?;
    }
    let compressed = encoder.finish()?;
    Ok(base64::engine::general_purpose::STANDARD.encode(compressed))
}

/// Generate a Plotly Python script that draws every dataset as cones
pub fn generate_plotly_script(vis: &Visualization) -> Result<String> {
    let mut env = Environment::new();
    env.add_template("plotly", PLOTLY_TEMPLATE)?;

    let template = env.get_template("plotly")?;

    let datasets = vis
        .datasets
        .iter()
        .map(|ds| -> Result<serde_json::Value> {
            Ok(serde_json::json!({
                "name": ds.name,
                "colorscale": ds.colorscale,
                "count": ds.len(),
                "x": encode_column(&ds.x)?,
                "y": encode_column(&ds.y)?,
                "z": encode_column(&ds.z)?,
                "u": encode_column(&ds.u)?,
                "v": encode_column(&ds.v)?,
                "w": encode_column(&ds.w)?,
            }))
        })
        .collect::<Result<Vec<_>>>()?;

    let output = template.render(context! {
        title => &vis.title,
        timestamp => chrono::Utc::now().to_rfc3339(),
        camera => &vis.camera,
        datasets => datasets,
    })?;

    Ok(output)
}
