//! Run configuration with lenient loading
//!
//! Parameters arrive from a JSON file and/or CLI flags. Anything missing or
//! malformed is replaced by its documented default with a warning, so a bad
//! value never aborts a run. Validation into [`SamplingPlan`] applies the
//! same rule.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::grid::AxisSpec;
use crate::params::{FieldParameters, DEFAULT_AMPLITUDE, DEFAULT_DECAY, DEFAULT_HEIGHT};

pub const DEFAULT_TITLE: &str = "Spatial and Surface Current Densities";

/// How the two fields are laid out for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// J on the x-y slab and K on the y = 0 plane, both extruded along z
    #[default]
    Slab,
    /// One x-y-z grid, every point classified and colored by domain
    Volume,
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "slab" => Ok(Layout::Slab),
            "volume" | "grid" => Ok(Layout::Volume),
            _ => Err(format!("Unknown layout: {}. Use: slab or volume", s)),
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::Slab => write!(f, "slab"),
            Layout::Volume => write!(f, "volume"),
        }
    }
}

/// Unvalidated sampling of one axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisConfig {
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

impl AxisConfig {
    pub const fn new(min: f64, max: f64, count: usize) -> Self {
        Self { min, max, count }
    }

    fn from_value(name: &str, value: &Value, default: AxisConfig) -> AxisConfig {
        match value.as_object() {
            Some(obj) => AxisConfig {
                min: take(obj, &format!("{}.min", name), "min", default.min),
                max: take(obj, &format!("{}.max", name), "max", default.max),
                count: take(obj, &format!("{}.count", name), "count", default.count),
            },
            None => {
                warn!("Axis '{}' is not an object, using defaults", name);
                default
            }
        }
    }
}

pub const DEFAULT_X_AXIS: AxisConfig = AxisConfig::new(0.1, 10.0, 10);
pub const DEFAULT_Y_AXIS: AxisConfig = AxisConfig::new(0.0, DEFAULT_HEIGHT, 10);
pub const DEFAULT_Z_AXIS: AxisConfig = AxisConfig::new(-3.0, 3.0, 7);

/// Everything a run needs, before validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualizationConfig {
    pub amplitude: f64,
    pub decay: f64,
    pub height: f64,
    pub x: AxisConfig,
    /// `max` defaults to `height` when omitted from a config file
    pub y: AxisConfig,
    pub z: AxisConfig,
    pub layout: Layout,
    pub title: String,
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            amplitude: DEFAULT_AMPLITUDE,
            decay: DEFAULT_DECAY,
            height: DEFAULT_HEIGHT,
            x: DEFAULT_X_AXIS,
            y: DEFAULT_Y_AXIS,
            z: DEFAULT_Z_AXIS,
            layout: Layout::default(),
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

/// Read one key, falling back to `default` when it is absent or malformed
fn take<T: DeserializeOwned>(obj: &Map<String, Value>, label: &str, key: &str, default: T) -> T {
    match obj.get(key) {
        None | Some(Value::Null) => default,
        Some(value) => match serde_json::from_value(value.clone()) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Ignoring malformed '{}' ({}): {}", label, value, e);
                default
            }
        },
    }
}

impl VisualizationConfig {
    /// Parse JSON leniently: each malformed field falls back on its own
    pub fn from_json_str(json: &str) -> Self {
        let value: Value = match serde_json::from_str(json) {
            Ok(value) => value,
            Err(e) => {
                warn!("Config is not valid JSON, using defaults: {}", e);
                return Self::default();
            }
        };

        let Some(obj) = value.as_object() else {
            warn!("Config root is not an object, using defaults");
            return Self::default();
        };

        let defaults = Self::default();
        let height = take(obj, "height", "height", defaults.height);
        let axis = |name: &str, default: AxisConfig| match obj.get(name) {
            None | Some(Value::Null) => default,
            Some(value) => AxisConfig::from_value(name, value, default),
        };

        Self {
            amplitude: take(obj, "amplitude", "amplitude", defaults.amplitude),
            decay: take(obj, "decay", "decay", defaults.decay),
            height,
            x: axis("x", DEFAULT_X_AXIS),
            y: axis("y", AxisConfig { max: height, ..DEFAULT_Y_AXIS }),
            z: axis("z", DEFAULT_Z_AXIS),
            layout: take(obj, "layout", "layout", defaults.layout),
            title: take(obj, "title", "title", defaults.title),
        }
    }

    /// Load from a file; a missing or unreadable file yields defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => Self::from_json_str(&json),
            Err(e) => {
                warn!("Could not read config {:?}, using defaults: {}", path, e);
                Self::default()
            }
        }
    }

    /// Validate into a plan, replacing each invalid part with its default
    pub fn resolve(&self) -> SamplingPlan {
        let finite_or = |name: &str, value: f64, default: f64| {
            if value.is_finite() {
                value
            } else {
                warn!("{} must be finite, got {}, using {}", name, value, default);
                default
            }
        };
        let amplitude = finite_or("amplitude", self.amplitude, DEFAULT_AMPLITUDE);
        let decay = finite_or("decay", self.decay, DEFAULT_DECAY);
        let height = if self.height.is_finite() && self.height > 0.0 {
            self.height
        } else {
            warn!("height must be positive, got {}, using {}", self.height, DEFAULT_HEIGHT);
            DEFAULT_HEIGHT
        };
        let params = FieldParameters::new(amplitude, decay, height).unwrap_or_default();

        let axis = |name: &str, axis: AxisConfig, default: AxisConfig| {
            AxisSpec::new(axis.min, axis.max, axis.count).unwrap_or_else(|e| {
                warn!("Axis '{}': {}, using default", name, e);
                AxisSpec::trusted(default.min, default.max, default.count)
            })
        };

        // The y default tracks the resolved height
        let y_default = AxisConfig { max: params.height(), ..DEFAULT_Y_AXIS };
        let x = axis("x", self.x, DEFAULT_X_AXIS);
        let y = axis("y", self.y, y_default);
        let z = axis("z", self.z, DEFAULT_Z_AXIS);

        SamplingPlan {
            params,
            x,
            y,
            z,
            layout: self.layout,
            title: self.title.clone(),
        }
    }
}

/// Validated inputs of one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SamplingPlan {
    pub params: FieldParameters,
    pub x: AxisSpec,
    pub y: AxisSpec,
    pub z: AxisSpec,
    pub layout: Layout,
    pub title: String,
}

impl Default for SamplingPlan {
    fn default() -> Self {
        VisualizationConfig::default().resolve()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let plan = SamplingPlan::default();
        assert_eq!(plan.params, FieldParameters::default());
        assert_eq!(plan.x.samples().len(), 10);
        assert_eq!(plan.y.max(), DEFAULT_HEIGHT);
        assert_eq!(plan.z.count(), 7);
        assert_eq!(plan.layout, Layout::Slab);
    }

    #[test]
    fn test_partial_json() {
        let config = VisualizationConfig::from_json_str(r#"{"decay": 0.5, "z": {"count": 3}}"#);
        assert_eq!(config.decay, 0.5);
        assert_eq!(config.amplitude, DEFAULT_AMPLITUDE);
        assert_eq!(config.z, AxisConfig::new(-3.0, 3.0, 3));
    }

    #[test]
    fn test_malformed_fields_fall_back_individually() {
        let config = VisualizationConfig::from_json_str(
            r#"{"amplitude": "big", "decay": 0.1, "x": {"min": 1, "count": -4}, "layout": "spiral"}"#,
        );
        assert_eq!(config.amplitude, DEFAULT_AMPLITUDE);
        assert_eq!(config.decay, 0.1);
        assert_eq!(config.x, AxisConfig::new(1.0, 10.0, 10));
        assert_eq!(config.layout, Layout::Slab);
    }

    #[test]
    fn test_invalid_json_uses_defaults() {
        assert_eq!(VisualizationConfig::from_json_str("{not json"), VisualizationConfig::default());
        assert_eq!(VisualizationConfig::from_json_str("[1, 2]"), VisualizationConfig::default());
    }

    #[test]
    fn test_y_axis_follows_height() {
        let config = VisualizationConfig::from_json_str(r#"{"height": 2.5}"#);
        assert_eq!(config.y.max, 2.5);
    }

    #[test]
    fn test_resolve_replaces_invalid_values() {
        let config = VisualizationConfig {
            height: -1.0,
            x: AxisConfig::new(5.0, 1.0, 10),
            z: AxisConfig::new(0.0, 1.0, 0),
            ..VisualizationConfig::default()
        };
        let plan = config.resolve();
        assert_eq!(plan.params, FieldParameters::default());
        assert_eq!(plan.x.min(), DEFAULT_X_AXIS.min);
        assert_eq!(plan.z.count(), DEFAULT_Z_AXIS.count);
    }

    #[test]
    fn test_layout_parse() {
        assert_eq!("Volume".parse::<Layout>(), Ok(Layout::Volume));
        assert_eq!("slab".parse::<Layout>(), Ok(Layout::Slab));
        assert!("cone".parse::<Layout>().is_err());
    }
}
