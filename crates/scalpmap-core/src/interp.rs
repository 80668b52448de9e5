//! Scattered-data cubic interpolation
//!
//! Fits a smooth surface through irregularly placed (x, y, value) samples
//! using cubic radial basis functions (φ(r) = r³) with a linear polynomial
//! tail, solved as one dense system. The surface is undefined outside the
//! convex hull of the sample points; evaluation there yields `NaN`.

use nalgebra::{DMatrix, DVector};

use crate::error::{RenderError, RenderResult};

/// Distance below which two sample points are considered duplicates.
const DUPLICATE_EPS: f64 = 1e-9;

/// Tolerance for the inclusive convex-hull membership test.
const HULL_EPS: f64 = 1e-9;

/// A fitted cubic RBF interpolant over irregular 2-D points.
#[derive(Debug)]
pub struct ScatteredInterpolator {
    points: Vec<(f64, f64)>,
    /// RBF weights followed by the three linear polynomial coefficients
    coefficients: DVector<f64>,
    /// Convex hull of the input points, counter-clockwise
    hull: Vec<(f64, f64)>,
}

impl ScatteredInterpolator {
    /// Fit an interpolant through the given points and values.
    ///
    /// # Errors
    ///
    /// [`RenderError::DegenerateLayout`] if points are duplicated or
    /// collinear, or the interpolation system is singular.
    ///
    /// # Panics
    ///
    /// Panics if `points` and `values` have different lengths; the caller
    /// pairs them.
    pub fn fit(points: &[(f64, f64)], values: &[f64]) -> RenderResult<Self> {
        assert_eq!(points.len(), values.len());

        for (i, a) in points.iter().enumerate() {
            for (j, b) in points.iter().enumerate().skip(i + 1) {
                if distance(*a, *b) < DUPLICATE_EPS {
                    return Err(RenderError::DegenerateLayout {
                        reason: format!("duplicate sensor positions at indices {i} and {j}"),
                    });
                }
            }
        }

        let hull = convex_hull(points);
        if hull.len() < 3 {
            return Err(RenderError::DegenerateLayout {
                reason: "sensor positions are collinear".to_string(),
            });
        }

        // [ A  P ] [w]   [v]
        // [ Pᵀ 0 ] [c] = [0]   with A_ij = φ(|p_i - p_j|), P_i = (1, x_i, y_i)
        let n = points.len();
        let dim = n + 3;
        let mut system = DMatrix::<f64>::zeros(dim, dim);
        for (i, &pi) in points.iter().enumerate() {
            for (j, &pj) in points.iter().enumerate() {
                system[(i, j)] = kernel(distance(pi, pj));
            }
            system[(i, n)] = 1.0;
            system[(i, n + 1)] = pi.0;
            system[(i, n + 2)] = pi.1;
            system[(n, i)] = 1.0;
            system[(n + 1, i)] = pi.0;
            system[(n + 2, i)] = pi.1;
        }

        let mut rhs = DVector::<f64>::zeros(dim);
        for (i, &v) in values.iter().enumerate() {
            rhs[i] = v;
        }

        let coefficients = system.lu().solve(&rhs).ok_or_else(|| {
            RenderError::DegenerateLayout {
                reason: "interpolation system is singular".to_string(),
            }
        })?;

        Ok(Self {
            points: points.to_vec(),
            coefficients,
            hull,
        })
    }

    /// Evaluate the surface at (x, y); `NaN` outside the convex hull.
    #[must_use]
    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        if !self.contains(x, y) {
            return f64::NAN;
        }

        let n = self.points.len();
        let mut acc = self.coefficients[n]
            + self.coefficients[n + 1] * x
            + self.coefficients[n + 2] * y;
        for (i, &p) in self.points.iter().enumerate() {
            acc += self.coefficients[i] * kernel(distance(p, (x, y)));
        }
        acc
    }

    /// Whether (x, y) lies inside or on the convex hull of the inputs.
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let m = self.hull.len();
        for i in 0..m {
            let a = self.hull[i];
            let b = self.hull[(i + 1) % m];
            if cross(a, b, (x, y)) < -HULL_EPS {
                return false;
            }
        }
        true
    }
}

/// Cubic radial kernel.
fn kernel(r: f64) -> f64 {
    r * r * r
}

fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt()
}

/// Z component of (a - o) × (b - o).
fn cross(o: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.0 - o.0) * (b.1 - o.1) - (a.1 - o.1) * (b.0 - o.0)
}

/// Convex hull via Andrew's monotone chain, counter-clockwise, collinear
/// points dropped.
fn convex_hull(points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let mut pts = points.to_vec();
    pts.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    pts.dedup();
    if pts.len() < 3 {
        return pts;
    }

    let mut lower: Vec<(f64, f64)> = Vec::with_capacity(pts.len());
    for &p in &pts {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<(f64, f64)> = Vec::with_capacity(pts.len());
    for &p in pts.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}
