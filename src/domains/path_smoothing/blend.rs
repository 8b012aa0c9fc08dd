//! Global Bernstein blend (Bezier) curve through a whole waypoint sequence.
//!
//! The degree equals the number of waypoints minus one. Endpoints are
//! interpolated exactly, interior waypoints only attract the curve. High
//! degrees lose precision quickly; the curve is meant for short planner
//! outputs (a few dozen waypoints at most).

use super::types::{sample_parameters, DenseCurve, Point2D};
use crate::common::ConfigError;

#[derive(Debug, Clone)]
pub struct BlendCurve {
    control_points: Vec<Point2D>,
    coefficients: Vec<f64>,
}

impl BlendCurve {
    pub fn new(control_points: &[Point2D]) -> Result<Self, ConfigError> {
        if control_points.is_empty() {
            return Err(ConfigError::EmptyPath);
        }
        if !control_points.iter().all(Point2D::is_finite) {
            return Err(ConfigError::NonFiniteValue { field: "blend control points".to_string() });
        }
        let degree = control_points.len() - 1;
        let coefficients = (0..=degree).map(|i| binomial(degree, i)).collect();
        Ok(Self { control_points: control_points.to_vec(), coefficients })
    }

    pub fn degree(&self) -> usize {
        self.control_points.len() - 1
    }

    pub fn control_points(&self) -> &[Point2D] {
        &self.control_points
    }

    /// Point at parameter `t` in [0, 1].
    pub fn evaluate(&self, t: f64) -> Point2D {
        let degree = self.degree() as i32;
        let s = 1.0 - t;
        self.control_points
            .iter()
            .zip(&self.coefficients)
            .enumerate()
            .fold(Point2D::default(), |acc, (i, (p, c))| {
                let i = i as i32;
                acc + *p * (c * t.powi(i) * s.powi(degree - i))
            })
    }

    pub fn sample(&self, sample_count: usize) -> Result<DenseCurve, ConfigError> {
        if sample_count < 2 {
            return Err(ConfigError::InvalidSampleCount(sample_count));
        }
        Ok(DenseCurve::from_samples(
            sample_parameters(sample_count).map(|t| self.evaluate(t)).collect(),
        ))
    }
}

/// Sample the blend curve of `points` at `sample_count` evenly spaced parameters.
pub fn blend(points: &[Point2D], sample_count: usize) -> Result<DenseCurve, ConfigError> {
    if sample_count < 2 {
        return Err(ConfigError::InvalidSampleCount(sample_count));
    }
    BlendCurve::new(points)?.sample(sample_count)
}

/// `n choose k`, computed exactly in integers while it fits in a `u128`.
pub fn binomial(n: usize, k: usize) -> f64 {
    if k > n {
        return 0.0;
    }
    let k = k.min(n - k);
    let mut acc: u128 = 1;
    for i in 0..k {
        // acc * (n - i) is divisible by (i + 1) at every step
        match acc.checked_mul((n - i) as u128) {
            Some(v) => acc = v / (i as u128 + 1),
            None => {
                tracing::warn!(n, k, "binomial coefficient overflows u128, using floating point");
                return binomial_f64(n, k);
            }
        }
    }
    acc as f64
}

fn binomial_f64(n: usize, k: usize) -> f64 {
    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}
