use serde::{Deserialize, Serialize};

use super::blend::blend;
use super::repulsion::{repel, RepulsionParams, DEFAULT_SAFE_DIST, DEFAULT_STRENGTH};
use super::scenario::Scenario;
use super::spline::{SmoothingSpline, SplineOptions, DEFAULT_SMOOTHING_FACTOR};
use super::types::{DenseCurve, Point2D};
use super::workspace::{Obstacle, WorkspaceBounds};
use crate::common::{ConfigError, DomainResult};

pub const DEFAULT_SAMPLE_COUNT: usize = 200;

/// Numeric knobs of the refinement pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    pub safe_dist: f64,
    pub strength: f64,
    pub smoothing_factor: f64,
    pub sample_count: usize,
    pub spline_degree: Option<usize>,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            safe_dist: DEFAULT_SAFE_DIST,
            strength: DEFAULT_STRENGTH,
            smoothing_factor: DEFAULT_SMOOTHING_FACTOR,
            sample_count: DEFAULT_SAMPLE_COUNT,
            spline_degree: None,
        }
    }
}

impl SmoothingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.repulsion()?;
        self.spline_options().validate()?;
        if self.sample_count < 2 {
            return Err(ConfigError::InvalidSampleCount(self.sample_count));
        }
        Ok(())
    }

    pub fn repulsion(&self) -> Result<RepulsionParams, ConfigError> {
        RepulsionParams::new(self.safe_dist, self.strength)
    }

    pub fn spline_options(&self) -> SplineOptions {
        SplineOptions { smoothing_factor: self.smoothing_factor, degree: self.spline_degree }
    }
}

/// Everything one pipeline run produces for a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmoothingOutput {
    pub scenario: String,
    pub bounds: WorkspaceBounds,
    pub obstacles: Vec<Obstacle>,
    pub raw_path: Vec<Point2D>,
    pub safe_path: Vec<Point2D>,
    pub blend_curve: DenseCurve,
    pub spline_curve: DenseCurve,
    pub spline: SmoothingSpline,
}

impl SmoothingOutput {
    /// Waypoints the repulsion filter moved.
    pub fn moved_waypoints(&self) -> usize {
        self.raw_path
            .iter()
            .zip(&self.safe_path)
            .filter(|(raw, safe)| raw != safe)
            .count()
    }
}

/// Repulsion, blend and spline fit over one scenario. All parameters are validated
/// before any computation.
pub fn run_pipeline(scenario: &Scenario, config: &SmoothingConfig) -> DomainResult<SmoothingOutput> {
    config.validate()?;
    scenario.validate()?;
    let repulsion = config.repulsion()?;

    let safe_path = repel(&scenario.raw_path, scenario.obstacles(), &repulsion);
    let blend_curve = blend(&scenario.raw_path, config.sample_count)?;
    let spline = SmoothingSpline::fit(&safe_path, &config.spline_options())?;
    let spline_curve = spline.sample(config.sample_count)?;

    Ok(SmoothingOutput {
        scenario: scenario.name.clone(),
        bounds: scenario.workspace.bounds,
        obstacles: scenario.obstacles().to_vec(),
        raw_path: scenario.raw_path.clone(),
        safe_path,
        blend_curve,
        spline_curve,
        spline,
    })
}
