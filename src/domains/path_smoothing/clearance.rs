use serde::{Deserialize, Serialize};
use super::types::Point2D;
use super::workspace::Obstacle;

/// How close a path comes to the obstacle set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClearanceReport {
    /// Smallest distance from any sample to any obstacle boundary. Negative when a
    /// sample lies inside an obstacle. `None` without obstacles.
    pub min_clearance: Option<f64>,
    /// Index into the obstacle list of the closest obstacle.
    pub closest_obstacle: Option<usize>,
    /// Samples inside at least one keep-out zone.
    pub keep_out_violations: usize,
    /// Samples inside at least one obstacle.
    pub collisions: usize,
}

impl ClearanceReport {
    pub fn is_clear(&self) -> bool {
        self.keep_out_violations == 0
    }
}

pub fn analyze(path: &[Point2D], obstacles: &[Obstacle], safe_dist: f64) -> ClearanceReport {
    let mut report = ClearanceReport {
        min_clearance: None,
        closest_obstacle: None,
        keep_out_violations: 0,
        collisions: 0,
    };
    for p in path {
        let mut in_keep_out = false;
        let mut in_obstacle = false;
        for (index, obstacle) in obstacles.iter().enumerate() {
            let clearance = obstacle.clearance(p);
            if report.min_clearance.map_or(true, |c| clearance < c) {
                report.min_clearance = Some(clearance);
                report.closest_obstacle = Some(index);
            }
            in_keep_out |= clearance < safe_dist;
            in_obstacle |= clearance < 0.0;
        }
        report.keep_out_violations += usize::from(in_keep_out);
        report.collisions += usize::from(in_obstacle);
    }
    report
}
