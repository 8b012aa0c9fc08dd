use serde::{Deserialize, Serialize};
use super::types::Point2D;
use super::workspace::{Obstacle, Workspace, WorkspaceBounds};
use crate::common::ConfigError;

/// A raw planner path together with the workspace it was planned in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub raw_path: Vec<Point2D>,
    pub workspace: Workspace,
}

impl Scenario {
    pub fn new(name: impl Into<String>, workspace: Workspace, raw_path: Vec<Point2D>) -> Result<Self, ConfigError> {
        let scenario = Self { name: name.into(), workspace, raw_path };
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.workspace.obstacles
    }

    pub fn start(&self) -> Option<&Point2D> {
        self.raw_path.first()
    }

    pub fn goal(&self) -> Option<&Point2D> {
        self.raw_path.last()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_name(&self.name)?;
        self.workspace.validate()?;
        match self.raw_path.len() {
            0 => return Err(ConfigError::EmptyPath),
            1 => return Err(ConfigError::PathTooShort(1)),
            _ => {}
        }
        if !self.raw_path.iter().all(Point2D::is_finite) {
            return Err(ConfigError::NonFiniteValue { field: format!("raw path of scenario '{}'", self.name) });
        }
        Ok(())
    }
}

/// Scenario names double as output file stems, so they must be a single
/// plain path component.
pub fn validate_name(name: &str) -> Result<(), ConfigError> {
    let reason = if name.trim().is_empty() {
        Some("name is empty")
    } else if name == "." || name == ".." {
        Some("name is a relative directory")
    } else if name.contains(['/', '\\']) {
        Some("name contains a path separator")
    } else if name.chars().any(char::is_control) {
        Some("name contains control characters")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(ConfigError::InvalidName { name: name.to_string(), reason: reason.to_string() }),
        None => Ok(()),
    }
}

impl Default for Scenario {
    /// KNN-RRT output through a 10 x 10 field with three circular obstacles.
    fn default() -> Self {
        let raw_path = [
            [0.5, 0.5],
            [1.2, 1.0],
            [1.8, 1.9],
            [2.5, 2.4],
            [3.0, 3.3],
            [3.1, 4.2],
            [3.5, 5.1],
            [4.2, 5.8],
            [5.0, 6.6],
            [6.0, 7.4],
            [7.0, 8.2],
            [8.2, 8.9],
            [9.5, 9.5],
        ]
        .into_iter()
        .map(Point2D::from)
        .collect();
        // positive finite radii
        let obstacles = vec![
            Obstacle::from_parts(Point2D::new(4.0, 4.0), 1.0),
            Obstacle::from_parts(Point2D::new(6.0, 6.0), 1.0),
            Obstacle::from_parts(Point2D::new(5.0, 2.0), 0.8),
        ];
        Self {
            name: "default".to_string(),
            workspace: Workspace {
                bounds: WorkspaceBounds { min_x: 0.0, max_x: 10.0, min_y: 0.0, max_y: 10.0 },
                obstacles,
            },
            raw_path,
        }
    }
}
