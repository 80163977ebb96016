//! Analysis configuration: site, layout, operating points and sweep.
//!
//! Every field has a default, so an empty YAML document is a valid
//! configuration describing the reference three-turbine row.

use std::path::Path;

use serde::{Deserialize, Serialize};
use wf_engine::{GaussianConfig, Layout};
use wf_resource::{ResourceGridBuilder, ResourceProfile, ResourceResult, WindResourceGrid, axis};

use crate::error::{AppError, AppResult};
use crate::sweep::SweepOptions;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub site: SiteConfig,
    pub layout: LayoutConfig,
    pub simulation: SimulationConfig,
    pub sweep: SweepConfig,
    pub wake_model: GaussianConfig,
}

/// Resource profile plus the axes the grid is built on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub profile: ResourceProfile,
    pub direction_step_deg: f64,
    pub speed_min: f64,
    /// Inclusive upper end of the speed axis
    pub speed_max: f64,
    pub speed_step: f64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            profile: ResourceProfile::default(),
            direction_step_deg: 10.0,
            speed_min: 3.0,
            speed_max: 24.0,
            speed_step: 1.0,
        }
    }
}

impl SiteConfig {
    pub fn directions(&self) -> ResourceResult<Vec<f64>> {
        axis(0.0, 360.0, self.direction_step_deg)
    }

    pub fn speeds(&self) -> ResourceResult<Vec<f64>> {
        axis(
            self.speed_min,
            self.speed_max + 0.5 * self.speed_step,
            self.speed_step,
        )
    }

    pub fn build_grid(&self) -> ResourceResult<WindResourceGrid> {
        ResourceGridBuilder::new(self.profile.clone()).build(&self.directions()?, &self.speeds()?)
    }
}

/// Turbine placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutConfig {
    /// West-east row with uniform spacing.
    Row { turbine_count: usize, spacing_m: f64 },
    /// Explicit coordinates in meters.
    Explicit { x: Vec<f64>, y: Vec<f64> },
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::Row {
            turbine_count: 3,
            spacing_m: 400.0,
        }
    }
}

impl LayoutConfig {
    pub fn build(&self) -> AppResult<Layout> {
        let layout = match self {
            Self::Row {
                turbine_count,
                spacing_m,
            } => Layout::row(*turbine_count, *spacing_m)?,
            Self::Explicit { x, y } => Layout::new(x, y)?,
        };
        Ok(layout)
    }
}

/// Operating points for the per-turbine power summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub directions: Vec<f64>,
    pub speeds: Vec<f64>,
    pub turbulence: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            directions: vec![0.0, 90.0, 180.0, 270.0],
            speeds: vec![4.0, 8.0, 12.0, 16.0],
            turbulence: 0.08,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub enabled: bool,
    pub turbulence_values: Vec<f64>,
    pub speed: f64,
    pub direction_deg: f64,
    pub parallel: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            turbulence_values: vec![0.06, 0.08, 0.10, 0.12],
            speed: 12.0,
            direction_deg: 270.0,
            parallel: false,
        }
    }
}

impl SweepConfig {
    pub fn options(&self) -> SweepOptions {
        SweepOptions {
            parallel: self.parallel,
        }
    }
}

fn check_turbulence(ti: f64, what: &str) -> AppResult<()> {
    if ti.is_finite() && ti > 0.0 && ti < 1.0 {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "{what} must lie in (0, 1), got {ti}"
        )))
    }
}

/// Check everything that would make an analysis fail at construction.
pub fn validate_config(config: &AnalysisConfig) -> AppResult<()> {
    config.site.build_grid()?;
    config.layout.build()?;

    let sim = &config.simulation;
    if sim.directions.is_empty() || sim.speeds.is_empty() {
        return Err(AppError::Validation(
            "simulation needs at least one direction and one speed".to_string(),
        ));
    }
    check_turbulence(sim.turbulence, "simulation turbulence")?;

    let sweep = &config.sweep;
    if sweep.enabled {
        for &ti in &sweep.turbulence_values {
            check_turbulence(ti, "sweep turbulence value")?;
        }
        if !sweep.speed.is_finite() || !sweep.direction_deg.is_finite() {
            return Err(AppError::Validation(
                "sweep speed and direction must be finite".to_string(),
            ));
        }
    }
    Ok(())
}

/// Load and validate a YAML configuration.
pub fn load_yaml(path: &Path) -> AppResult<AnalysisConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::ConfigFileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let config: AnalysisConfig = serde_yaml::from_str(&content)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn save_yaml(path: &Path, config: &AnalysisConfig) -> AppResult<()> {
    validate_config(config)?;
    let content = serde_yaml::to_string(config)?;
    std::fs::write(path, content).map_err(|e| AppError::ConfigFileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load and validate a JSON configuration.
pub fn load_json(path: &Path) -> AppResult<AnalysisConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::ConfigFileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let config: AnalysisConfig = serde_json::from_str(&content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Load by extension: `.json` as JSON, anything else as YAML.
pub fn load_config(path: &Path) -> AppResult<AnalysisConfig> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => load_json(path),
        _ => load_yaml(path),
    }
}
