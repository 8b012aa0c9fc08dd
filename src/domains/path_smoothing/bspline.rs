//! Clamped B-spline representation and evaluation.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use super::types::Point2D;

/// Knot vector, control points and degree of a clamped planar B-spline on [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BSpline {
    pub(crate) degree: usize,
    pub(crate) knots: Vec<f64>,
    pub(crate) coefficients: Vec<Point2D>,
}

impl BSpline {
    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    pub fn coefficients(&self) -> &[Point2D] {
        &self.coefficients
    }

    pub fn evaluate(&self, u: f64) -> Point2D {
        // clamped ends reduce to the end coefficients
        if u <= self.knots[self.degree] {
            return self.coefficients[0];
        }
        if u >= self.knots[self.coefficients.len()] {
            return self.coefficients[self.coefficients.len() - 1];
        }
        let span = find_span(self.coefficients.len(), self.degree, u, &self.knots);
        let basis = basis_functions(span, u, self.degree, &self.knots);
        basis
            .iter()
            .enumerate()
            .fold(Point2D::default(), |acc, (j, b)| acc + self.coefficients[span - self.degree + j] * *b)
    }
}

/// Clamped knot vector with interior knots placed by averaging `degree`
/// consecutive parameters, giving one coefficient per parameter.
pub fn averaged_knots(params: &[f64], degree: usize) -> Vec<f64> {
    let m = params.len();
    let mut knots = vec![0.0; degree + 1];
    for j in 1..m - degree {
        let sum: f64 = params[j..j + degree].iter().sum();
        knots.push(sum / degree as f64);
    }
    knots.extend(std::iter::repeat(1.0).take(degree + 1));
    knots
}

/// Index of the knot span containing `u`. `n_coeffs` is the number of control points.
pub fn find_span(n_coeffs: usize, degree: usize, u: f64, knots: &[f64]) -> usize {
    let last = n_coeffs - 1;
    if u >= knots[last + 1] {
        return last;
    }
    if u <= knots[degree] {
        return degree;
    }
    let (mut low, mut high) = (degree, last + 1);
    let mut mid = (low + high) / 2;
    while u < knots[mid] || u >= knots[mid + 1] {
        if u < knots[mid] {
            high = mid;
        } else {
            low = mid;
        }
        mid = (low + high) / 2;
    }
    mid
}

/// The `degree + 1` basis functions that are non-zero on `span`, evaluated at `u`.
pub fn basis_functions(span: usize, u: f64, degree: usize, knots: &[f64]) -> Vec<f64> {
    let mut n = vec![0.0; degree + 1];
    let mut left = vec![0.0; degree + 1];
    let mut right = vec![0.0; degree + 1];
    n[0] = 1.0;
    for j in 1..=degree {
        left[j] = u - knots[span + 1 - j];
        right[j] = knots[span + j] - u;
        let mut saved = 0.0;
        for r in 0..j {
            let temp = n[r] / (right[r + 1] + left[j - r]);
            n[r] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        n[j] = saved;
    }
    n
}

/// Collocation matrix: row `i` holds every basis function evaluated at `params[i]`.
pub fn collocation_matrix(params: &[f64], degree: usize, knots: &[f64], n_coeffs: usize) -> DMatrix<f64> {
    let mut b = DMatrix::zeros(params.len(), n_coeffs);
    for (i, &u) in params.iter().enumerate() {
        let span = find_span(n_coeffs, degree, u, knots);
        for (j, v) in basis_functions(span, u, degree, knots).into_iter().enumerate() {
            b[(i, span - degree + j)] = v;
        }
    }
    b
}

/// Linear map from coefficients to the jumps of the `degree`-th derivative at the
/// interior knots. Shape `(n_coeffs - degree - 1) x n_coeffs`.
///
/// Differentiating a degree `q` spline turns coefficients `c` into
/// `q (c[i+1] - c[i]) / (t[i+q+1] - t[i+1])` on the knot vector without its end
/// knots. After `degree` steps the spline is piecewise constant, one value per span.
pub fn derivative_jump_matrix(degree: usize, knots: &[f64], n_coeffs: usize) -> DMatrix<f64> {
    let mut op = DMatrix::<f64>::identity(n_coeffs, n_coeffs);
    let mut tau: &[f64] = knots;
    for q in (1..=degree).rev() {
        let rows = op.nrows() - 1;
        let mut diff = DMatrix::zeros(rows, op.nrows());
        for i in 0..rows {
            let width = tau[i + q + 1] - tau[i + 1];
            let scale = if width > 0.0 { q as f64 / width } else { 0.0 };
            diff[(i, i)] = -scale;
            diff[(i, i + 1)] = scale;
        }
        op = diff * op;
        tau = &tau[1..tau.len() - 1];
    }
    let spans = op.nrows();
    if spans < 2 {
        return DMatrix::zeros(0, n_coeffs);
    }
    let mut jump = DMatrix::zeros(spans - 1, spans);
    for i in 0..spans - 1 {
        jump[(i, i)] = -1.0;
        jump[(i, i + 1)] = 1.0;
    }
    jump * op
}
