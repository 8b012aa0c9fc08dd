//! Obstacle repulsion applied to raw waypoints before spline fitting.
//!
//! Each waypoint is handled independently. Obstacles are applied in the order
//! given and each one sees the position left by the previous one. There is a
//! single pass only, so a point pushed out of one keep-out zone may end up in
//! another.

use serde::{Deserialize, Serialize};
use super::types::Point2D;
use super::workspace::Obstacle;
use crate::common::ConfigError;

/// Added to the distance when normalizing the push direction.
pub const DIRECTION_EPSILON: f64 = 1e-6;

pub const DEFAULT_SAFE_DIST: f64 = 1.2;
pub const DEFAULT_STRENGTH: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepulsionParams {
    safe_dist: f64,
    strength: f64,
}

impl RepulsionParams {
    pub fn new(safe_dist: f64, strength: f64) -> Result<Self, ConfigError> {
        if !(safe_dist > 0.0) || !safe_dist.is_finite() {
            return Err(ConfigError::NonPositiveSafeDistance(safe_dist));
        }
        if !(strength > 0.0 && strength <= 1.0) {
            return Err(ConfigError::StrengthOutOfRange(strength));
        }
        Ok(Self { safe_dist, strength })
    }

    pub fn safe_dist(&self) -> f64 {
        self.safe_dist
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }
}

impl Default for RepulsionParams {
    fn default() -> Self {
        Self { safe_dist: DEFAULT_SAFE_DIST, strength: DEFAULT_STRENGTH }
    }
}

/// Push every waypoint out of the keep-out zones it lies in. Returns a new sequence
/// of the same length and order.
pub fn repel(path: &[Point2D], obstacles: &[Obstacle], params: &RepulsionParams) -> Vec<Point2D> {
    path.iter()
        .enumerate()
        .map(|(index, p)| repel_point(index, *p, obstacles, params))
        .collect()
}

/// Scalar form of [`repel`]; validates the parameters first.
pub fn repel_from_obstacles(
    path: &[Point2D],
    obstacles: &[Obstacle],
    safe_dist: f64,
    strength: f64,
) -> Result<Vec<Point2D>, ConfigError> {
    let params = RepulsionParams::new(safe_dist, strength)?;
    Ok(repel(path, obstacles, &params))
}

fn repel_point(index: usize, mut p: Point2D, obstacles: &[Obstacle], params: &RepulsionParams) -> Point2D {
    for obstacle in obstacles {
        let offset = p - obstacle.center();
        let dist = offset.norm();
        let keep_out = obstacle.keep_out_radius(params.safe_dist);
        if dist < keep_out {
            if dist < DIRECTION_EPSILON {
                tracing::warn!(
                    waypoint = index,
                    "waypoint sits on obstacle center ({:.3}, {:.3}); push direction undefined",
                    obstacle.center().x,
                    obstacle.center().y
                );
            }
            let direction = offset * (1.0 / (dist + DIRECTION_EPSILON));
            p += direction * (params.strength * (keep_out - dist));
        }
    }
    p
}
