use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const APP_NAME: &str = "featuremap";
const CONFIG_FILE: &str = "config.json";

/// Settings for one diagram build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    pub layout: LayoutConfig,
    /// Shape labels longer than this many characters are cut and end in `..`.
    /// `None` keeps labels whole.
    pub label_max_chars: Option<usize>,
    /// Upper bound on feature + scenario + step nodes. Larger inputs are
    /// rejected before anything is written.
    pub max_nodes: usize,
    /// Name of the single diagram page.
    pub page_name: String,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            label_max_chars: None,
            max_nodes: 10_000,
            page_name: "FeatureDiagram".to_string(),
        }
    }
}

/// Page size and tier spacing, in inches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub page_width: f64,
    pub page_height: f64,
    /// Y of the feature node's center.
    pub feature_y: f64,
    pub feature_width: f64,
    pub feature_height: f64,
    /// Vertical distance from the feature to the scenario row.
    pub scenario_drop: f64,
    /// Horizontal distance between neighbouring scenario centers.
    pub scenario_gap: f64,
    pub scenario_width: f64,
    pub scenario_height: f64,
    /// Vertical distance from a scenario to its first step.
    pub first_step_drop: f64,
    /// Vertical distance between consecutive steps.
    pub step_gap: f64,
    pub step_width: f64,
    pub step_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_width: 8.27,
            page_height: 11.69,
            feature_y: 10.0,
            feature_width: 2.0,
            feature_height: 0.8,
            scenario_drop: 1.5,
            scenario_gap: 3.0,
            scenario_width: 2.5,
            scenario_height: 0.8,
            first_step_drop: 1.2,
            step_gap: 0.8,
            step_width: 2.0,
            step_height: 0.6,
        }
    }
}

impl DiagramConfig {
    /// Load configuration from the user's config directory.
    /// Returns default config if the file doesn't exist or fails to parse.
    pub fn load() -> Self {
        match default_config_path().and_then(|path| Self::load_optional(&path)) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        }
    }

    /// Load configuration from an explicit path. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    fn load_optional(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(path)
    }
}

fn default_config_path() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", APP_NAME)
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    Ok(dirs.config_dir().join(CONFIG_FILE))
}
