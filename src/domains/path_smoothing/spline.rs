//! Parametric smoothing B-spline through the repulsion-adjusted waypoints.
//!
//! Waypoints are parameterized by normalized cumulative chord length. The
//! spline has one coefficient per waypoint on a clamped knot vector whose
//! interior knots average consecutive parameters, so a smoothing factor of
//! zero yields an exact interpolant.
//!
//! For a positive smoothing factor `s` the fit minimizes
//!
//! ```text
//! fp + lambda * sum of squared jumps of the degree-th derivative at interior knots
//! ```
//!
//! where `fp` is the sum of squared distances between the curve and the
//! waypoints at their parameters, and `lambda` is searched so that `fp` meets
//! `s`. If even a single polynomial piece stays within `s`, that piece is
//! returned. The first and last coefficients are pinned to the start and goal,
//! so the curve always hits both exactly.
//!
//! Unlike FITPACK's `parcur` the knot set is fixed rather than grown
//! adaptively; the penalty weight alone trades fidelity for smoothness.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use super::bspline::{averaged_knots, collocation_matrix, derivative_jump_matrix, BSpline};
use super::types::{sample_parameters, DenseCurve, Point2D};
use crate::common::{ConfigError, DomainResult, FitError};

pub const DEFAULT_SMOOTHING_FACTOR: f64 = 0.3;
pub const DEFAULT_DEGREE: usize = 3;
pub const MAX_DEGREE: usize = 5;

/// Consecutive waypoints closer than this are treated as the same point.
pub const COINCIDENT_TOLERANCE: f64 = 1e-12;

/// Accepted relative deviation of `fp` from the smoothing factor.
const RESIDUAL_TOLERANCE: f64 = 1e-3;
/// Search range for `log10(lambda / scale)`.
const LOG_LAMBDA_RANGE: (f64, f64) = (-8.0, 8.0);
const MAX_BISECTIONS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplineOptions {
    pub smoothing_factor: f64,
    /// `None` picks cubic, or `points - 1` for shorter sequences.
    #[serde(default)]
    pub degree: Option<usize>,
}

impl Default for SplineOptions {
    fn default() -> Self {
        Self { smoothing_factor: DEFAULT_SMOOTHING_FACTOR, degree: None }
    }
}

impl SplineOptions {
    pub fn with_smoothing(smoothing_factor: f64) -> Self {
        Self { smoothing_factor, degree: None }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.smoothing_factor >= 0.0) || !self.smoothing_factor.is_finite() {
            return Err(ConfigError::NegativeSmoothingFactor(self.smoothing_factor));
        }
        if let Some(degree) = self.degree {
            if degree == 0 || degree > MAX_DEGREE {
                return Err(ConfigError::InvalidSplineDegree(degree));
            }
        }
        Ok(())
    }

    fn degree_for(&self, count: usize) -> usize {
        self.degree
            .unwrap_or_else(|| DEFAULT_DEGREE.min(count.saturating_sub(1)).max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmoothingSpline {
    spline: BSpline,
    parameters: Vec<f64>,
    residual: f64,
    smoothing_factor: f64,
}

impl SmoothingSpline {
    pub fn fit(points: &[Point2D], options: &SplineOptions) -> DomainResult<Self> {
        options.validate()?;
        if points.is_empty() {
            return Err(ConfigError::EmptyPath.into());
        }
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(FitError::NonFiniteInput { index }.into());
        }
        let degree = options.degree_for(points.len());
        if points.len() <= degree {
            return Err(FitError::TooFewPoints { count: points.len(), degree }.into());
        }

        let parameters = chord_parameters(points)?;
        let n = points.len();
        let knots = averaged_knots(&parameters, degree);
        let basis = collocation_matrix(&parameters, degree, &knots, n);
        let data = DMatrix::from_fn(n, 2, |i, c| if c == 0 { points[i].x } else { points[i].y });

        let coefficients = if options.smoothing_factor == 0.0 || n == degree + 1 {
            interpolate(&basis, &data)?
        } else {
            let jumps = derivative_jump_matrix(degree, &knots, n);
            smooth(&basis, &data, &jumps, options.smoothing_factor)?
        };
        let residual = residual_sum(&basis, &coefficients, &data);

        let mut control: Vec<Point2D> = (0..n)
            .map(|i| Point2D::new(coefficients[(i, 0)], coefficients[(i, 1)]))
            .collect();
        control[0] = points[0];
        control[n - 1] = points[n - 1];

        tracing::debug!(
            waypoints = n,
            degree,
            smoothing = options.smoothing_factor,
            residual,
            "fitted smoothing spline"
        );

        Ok(Self {
            spline: BSpline { degree, knots, coefficients: control },
            parameters,
            residual,
            smoothing_factor: options.smoothing_factor,
        })
    }

    pub fn evaluate(&self, u: f64) -> Point2D {
        self.spline.evaluate(u)
    }

    pub fn sample(&self, sample_count: usize) -> Result<DenseCurve, ConfigError> {
        if sample_count < 2 {
            return Err(ConfigError::InvalidSampleCount(sample_count));
        }
        Ok(DenseCurve::from_samples(
            sample_parameters(sample_count).map(|u| self.evaluate(u)).collect(),
        ))
    }

    /// Parameter assigned to each input waypoint.
    pub fn parameters(&self) -> &[f64] {
        &self.parameters
    }

    /// Sum of squared distances between the curve and the waypoints (`fp`).
    pub fn residual(&self) -> f64 {
        self.residual
    }

    pub fn smoothing_factor(&self) -> f64 {
        self.smoothing_factor
    }

    pub fn degree(&self) -> usize {
        self.spline.degree()
    }

    pub fn knots(&self) -> &[f64] {
        self.spline.knots()
    }

    pub fn coefficients(&self) -> &[Point2D] {
        self.spline.coefficients()
    }

    pub fn spline(&self) -> &BSpline {
        &self.spline
    }
}

/// Fit a smoothing spline and sample it at `sample_count` evenly spaced parameters.
pub fn fit_spline(points: &[Point2D], smoothing_factor: f64, sample_count: usize) -> DomainResult<DenseCurve> {
    if sample_count < 2 {
        return Err(ConfigError::InvalidSampleCount(sample_count).into());
    }
    let spline = SmoothingSpline::fit(points, &SplineOptions::with_smoothing(smoothing_factor))?;
    Ok(spline.sample(sample_count)?)
}

/// Normalized cumulative chord length; the first parameter is 0 and the last 1.
pub fn chord_parameters(points: &[Point2D]) -> Result<Vec<f64>, FitError> {
    let mut cumulative = Vec::with_capacity(points.len());
    let mut total = 0.0;
    cumulative.push(0.0);
    for (index, pair) in points.windows(2).enumerate() {
        let step = pair[0].distance_to(&pair[1]);
        if step <= COINCIDENT_TOLERANCE {
            return Err(FitError::CoincidentWaypoints { index });
        }
        total += step;
        cumulative.push(total);
    }
    if total > 0.0 {
        for u in cumulative.iter_mut() {
            *u /= total;
        }
        if let Some(last) = cumulative.last_mut() {
            *last = 1.0;
        }
    }
    Ok(cumulative)
}

fn interpolate(basis: &DMatrix<f64>, data: &DMatrix<f64>) -> Result<DMatrix<f64>, FitError> {
    basis.clone().lu().solve(data).ok_or(FitError::SingularSystem)
}

fn residual_sum(basis: &DMatrix<f64>, coefficients: &DMatrix<f64>, data: &DMatrix<f64>) -> f64 {
    (basis * coefficients - data).norm_squared()
}

/// Penalized fit with the end coefficients fixed to the first and last data rows.
struct PinnedSystem {
    gram: DMatrix<f64>,
    penalty: DMatrix<f64>,
    data_rhs: DMatrix<f64>,
    penalty_rhs: DMatrix<f64>,
    pinned: DMatrix<f64>,
}

impl PinnedSystem {
    fn new(basis: &DMatrix<f64>, data: &DMatrix<f64>, jumps: &DMatrix<f64>) -> Self {
        let n = basis.ncols();
        let last = data.nrows() - 1;
        let pinned = DMatrix::from_fn(2, 2, |r, c| data[(if r == 0 { 0 } else { last }, c)]);
        let free_basis = basis.columns(1, n - 2).into_owned();
        let pinned_basis = DMatrix::from_fn(basis.nrows(), 2, |i, c| basis[(i, if c == 0 { 0 } else { n - 1 })]);
        let free_jumps = jumps.columns(1, n - 2).into_owned();
        let pinned_jumps = DMatrix::from_fn(jumps.nrows(), 2, |i, c| jumps[(i, if c == 0 { 0 } else { n - 1 })]);

        let reduced_data = data - &pinned_basis * &pinned;
        Self {
            gram: free_basis.transpose() * &free_basis,
            penalty: free_jumps.transpose() * &free_jumps,
            data_rhs: free_basis.transpose() * reduced_data,
            penalty_rhs: free_jumps.transpose() * (pinned_jumps * &pinned),
            pinned,
        }
    }

    /// Penalty weight that puts both terms on a comparable scale.
    fn scale(&self) -> Option<f64> {
        let penalty = self.penalty.trace();
        (penalty > 0.0).then(|| self.gram.trace() / penalty)
    }

    fn solve(&self, lambda: f64) -> Result<DMatrix<f64>, FitError> {
        let system = &self.gram + &self.penalty * lambda;
        let rhs = &self.data_rhs - &self.penalty_rhs * lambda;
        let free = system
            .cholesky()
            .ok_or(FitError::SingularSystem)?
            .solve(&rhs);
        let n = free.nrows() + 2;
        Ok(DMatrix::from_fn(n, 2, |i, c| {
            if i == 0 {
                self.pinned[(0, c)]
            } else if i == n - 1 {
                self.pinned[(1, c)]
            } else {
                free[(i - 1, c)]
            }
        }))
    }
}

fn smooth(
    basis: &DMatrix<f64>,
    data: &DMatrix<f64>,
    jumps: &DMatrix<f64>,
    smoothing: f64,
) -> Result<DMatrix<f64>, FitError> {
    let system = PinnedSystem::new(basis, data, jumps);
    let Some(scale) = system.scale() else {
        return interpolate(basis, data);
    };
    let fp_at = |log_lambda: f64| -> Result<(DMatrix<f64>, f64), FitError> {
        let coefficients = system.solve(scale * 10f64.powf(log_lambda))?;
        let fp = residual_sum(basis, &coefficients, data);
        Ok((coefficients, fp))
    };

    let (mut lo, mut hi) = LOG_LAMBDA_RANGE;
    let (smoothest, fp_max) = fp_at(hi)?;
    if fp_max <= smoothing {
        return Ok(smoothest);
    }
    let (mut best, fp_min) = fp_at(lo)?;
    if fp_min >= smoothing {
        return Ok(best);
    }

    // fp grows monotonically with lambda
    for _ in 0..MAX_BISECTIONS {
        let mid = 0.5 * (lo + hi);
        let (coefficients, fp) = fp_at(mid)?;
        if (fp - smoothing).abs() <= RESIDUAL_TOLERANCE * smoothing {
            return Ok(coefficients);
        }
        if fp > smoothing {
            hi = mid;
        } else {
            lo = mid;
            best = coefficients;
        }
    }
    Ok(best)
}
