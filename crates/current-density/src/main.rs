//! current-density: CLI for sampling the slab current-density model

use anyhow::{Context, Result};
use clap::Parser;
use current_density::{
    generate_plotly_script, visualize, Layout, Visualization, VisualizationConfig,
};
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "current-density")]
#[command(about = "Sample slab current densities J and K for 3D cone plots")]
#[command(version)]
struct Args {
    /// JSON config file (missing or malformed values fall back to defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (plotly, json, summary)
    #[arg(short, long, default_value = "plotly")]
    format: String,

    /// Layout (slab, volume)
    #[arg(long)]
    layout: Option<String>,

    /// Current density amplitude A
    #[arg(long)]
    amplitude: Option<f64>,

    /// Decay rate b along x
    #[arg(long)]
    decay: Option<f64>,

    /// Slab height h
    #[arg(long)]
    height: Option<f64>,

    #[arg(long)]
    x_min: Option<f64>,
    #[arg(long)]
    x_max: Option<f64>,
    #[arg(long)]
    x_count: Option<usize>,

    #[arg(long)]
    y_min: Option<f64>,
    /// Defaults to the slab height
    #[arg(long)]
    y_max: Option<f64>,
    #[arg(long)]
    y_count: Option<usize>,

    #[arg(long)]
    z_min: Option<f64>,
    #[arg(long)]
    z_max: Option<f64>,
    #[arg(long)]
    z_count: Option<usize>,

    /// Figure title
    #[arg(long)]
    title: Option<String>,
}

#[derive(Debug, Clone, Copy)]
enum OutputFormat {
    Plotly,
    Json,
    Summary,
}

fn parse_format(s: &str) -> Result<OutputFormat> {
    match s.to_lowercase().as_str() {
        "plotly" | "py" | "python" => Ok(OutputFormat::Plotly),
        "json" => Ok(OutputFormat::Json),
        "summary" | "text" => Ok(OutputFormat::Summary),
        _ => anyhow::bail!("Unknown format: {}. Use: plotly, json, or summary", s),
    }
}

fn apply_overrides(mut config: VisualizationConfig, args: &Args) -> VisualizationConfig {
    if let Some(layout) = &args.layout {
        match layout.parse::<Layout>() {
            Ok(layout) => config.layout = layout,
            Err(e) => tracing::warn!("{}, keeping {}", e, config.layout),
        }
    }
    if let Some(a) = args.amplitude {
        config.amplitude = a;
    }
    if let Some(b) = args.decay {
        config.decay = b;
    }
    if let Some(h) = args.height {
        // y still spans the slab unless set explicitly
        if args.y_max.is_none() && config.y.max == config.height {
            config.y.max = h;
        }
        config.height = h;
    }

    let axes = [
        (&mut config.x, args.x_min, args.x_max, args.x_count),
        (&mut config.y, args.y_min, args.y_max, args.y_count),
        (&mut config.z, args.z_min, args.z_max, args.z_count),
    ];
    for (axis, min, max, count) in axes {
        if let Some(min) = min {
            axis.min = min;
        }
        if let Some(max) = max {
            axis.max = max;
        }
        if let Some(count) = count {
            axis.count = count;
        }
    }

    if let Some(title) = &args.title {
        config.title = title.clone();
    }
    config
}

fn summarize(vis: &Visualization) -> String {
    let mut out = format!("{}\n", vis.title);
    for dataset in &vis.datasets {
        let stats = dataset.stats();
        out.push_str(&format!(
            "  {:<24} samples={:<6} non-zero={:<6} max|v|={:.6}\n",
            dataset.name, stats.samples, stats.nonzero, stats.max_magnitude
        ));
    }
    out
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let format = parse_format(&args.format)?;

    // Load config, then layer flags on top
    let config = match &args.config {
        Some(path) => VisualizationConfig::load(path),
        None => VisualizationConfig::default(),
    };
    let config = apply_overrides(config, &args);

    let vis = visualize(&config).context("Sampling failed")?;

    let rendered = match format {
        OutputFormat::Plotly => generate_plotly_script(&vis).context("Script generation failed")?,
        OutputFormat::Json => serde_json::to_string_pretty(&vis)?,
        OutputFormat::Summary => summarize(&vis),
    };

    match &args.output {
        Some(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("Failed to write output file: {:?}", path))?;
            info!("Wrote {} samples to {:?}", vis.len(), path);
        }
        None => println!("{}", rendered),
    }

    Ok(())
}
