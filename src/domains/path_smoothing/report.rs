use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::clearance::{analyze, ClearanceReport};
use super::pipeline::SmoothingOutput;

/// Summary of one pipeline run, published alongside the curves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmoothingReport {
    pub run_id: Uuid,
    pub scenario: String,
    pub generated_at: DateTime<Utc>,
    pub waypoints: usize,
    pub moved_waypoints: usize,
    pub raw_length: f64,
    pub blend_length: f64,
    pub spline_length: f64,
    pub spline_degree: usize,
    pub spline_residual: f64,
    pub raw_clearance: ClearanceReport,
    pub blend_clearance: ClearanceReport,
    pub spline_clearance: ClearanceReport,
}

impl SmoothingReport {
    pub fn from_output(output: &SmoothingOutput, safe_dist: f64) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            scenario: output.scenario.clone(),
            generated_at: Utc::now(),
            waypoints: output.raw_path.len(),
            moved_waypoints: output.moved_waypoints(),
            raw_length: super::types::polyline_length(&output.raw_path),
            blend_length: output.blend_curve.length(),
            spline_length: output.spline_curve.length(),
            spline_degree: output.spline.degree(),
            spline_residual: output.spline.residual(),
            raw_clearance: analyze(&output.raw_path, &output.obstacles, safe_dist),
            blend_clearance: analyze(output.blend_curve.points(), &output.obstacles, safe_dist),
            spline_clearance: analyze(output.spline_curve.points(), &output.obstacles, safe_dist),
        }
    }
}
