use serde::{Deserialize, Serialize};
use super::types::Point2D;
use crate::common::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    pub bounds: WorkspaceBounds,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceBounds {
    pub min_x: f64, pub max_x: f64,
    pub min_y: f64, pub max_y: f64,
}

/// Circular obstacle. The radius is validated on construction and on deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ObstacleSpec", into = "ObstacleSpec")]
pub struct Obstacle {
    center: Point2D,
    radius: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct ObstacleSpec {
    x: f64,
    y: f64,
    radius: f64,
}

impl Obstacle {
    pub fn new(center: Point2D, radius: f64) -> Result<Self, ConfigError> {
        if !center.is_finite() {
            return Err(ConfigError::NonFiniteValue { field: "obstacle center".to_string() });
        }
        if !(radius > 0.0) || !radius.is_finite() {
            return Err(ConfigError::NonPositiveRadius(radius));
        }
        Ok(Self { center, radius })
    }

    /// For compile-time constants already known to be valid.
    pub(crate) const fn from_parts(center: Point2D, radius: f64) -> Self {
        Self { center, radius }
    }

    pub fn center(&self) -> Point2D {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Radius of the disk a waypoint must stay out of.
    pub fn keep_out_radius(&self, safe_dist: f64) -> f64 {
        self.radius + safe_dist
    }

    /// Distance from `p` to the obstacle boundary; negative inside the obstacle.
    pub fn clearance(&self, p: &Point2D) -> f64 {
        p.distance_to(&self.center) - self.radius
    }
}

impl TryFrom<ObstacleSpec> for Obstacle {
    type Error = ConfigError;

    fn try_from(spec: ObstacleSpec) -> Result<Self, Self::Error> {
        Obstacle::new(Point2D::new(spec.x, spec.y), spec.radius)
    }
}

impl From<Obstacle> for ObstacleSpec {
    fn from(o: Obstacle) -> Self {
        ObstacleSpec { x: o.center.x, y: o.center.y, radius: o.radius }
    }
}

impl WorkspaceBounds {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let values = [self.min_x, self.max_x, self.min_y, self.max_y];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::NonFiniteValue { field: "workspace bounds".to_string() });
        }
        if self.min_x >= self.max_x || self.min_y >= self.max_y {
            return Err(ConfigError::InvalidBounds {
                reason: format!(
                    "x [{}, {}], y [{}, {}] must have min < max",
                    self.min_x, self.max_x, self.min_y, self.max_y
                ),
            });
        }
        Ok(())
    }

    pub fn contains(&self, p: &Point2D) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }
}

impl Workspace {
    pub fn new(bounds: WorkspaceBounds, obstacles: Vec<Obstacle>) -> Result<Self, ConfigError> {
        bounds.validate()?;
        Ok(Self { bounds, obstacles })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bounds.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn obstacle_rejects_non_positive_radius() {
        assert_eq!(
            Obstacle::new(Point2D::new(0.0, 0.0), 0.0),
            Err(ConfigError::NonPositiveRadius(0.0))
        );
        assert!(Obstacle::new(Point2D::new(0.0, 0.0), -1.0).is_err());
        assert!(Obstacle::new(Point2D::new(0.0, 0.0), f64::NAN).is_err());
    }

    #[test]
    fn obstacle_deserialization_validates_radius() {
        let ok: Obstacle = serde_json::from_str(r#"{"x": 4.0, "y": 4.0, "radius": 1.0}"#).unwrap();
        assert_eq!(ok.center(), Point2D::new(4.0, 4.0));
        let bad = serde_json::from_str::<Obstacle>(r#"{"x": 4.0, "y": 4.0, "radius": -1.0}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn bounds_require_min_below_max() {
        let bounds = WorkspaceBounds { min_x: 0.0, max_x: 0.0, min_y: 0.0, max_y: 10.0 };
        assert!(matches!(bounds.validate(), Err(ConfigError::InvalidBounds { .. })));
    }
}
