//! Wolfe's minimum-norm-point algorithm over the convex hull of a point set.
//!
//! Keeps a *corral* of affinely independent points whose convex combination
//! is the current iterate. Major cycles add the point that most decreases the
//! norm; minor cycles move toward the affine minimizer of the corral and drop
//! points whose coefficients hit zero.

use tracing::trace;

use crate::error::{BlendError, Result};
use crate::models::Nutrient;
use crate::optimizer::budget::SolveBudget;
use crate::optimizer::linalg::{dot, norm2, solve_dense};

type Point = [f64; Nutrient::COUNT];

/// Result of a minimum-norm-point solve.
#[derive(Debug, Clone)]
pub struct MinNormPoint {
    /// Convex coefficients, one per input point.
    pub coefficients: Vec<f64>,
    /// `sum_j coefficients[j] * points[j]`.
    pub point: Point,
}

impl MinNormPoint {
    pub fn norm2(&self) -> f64 {
        norm2(&self.point)
    }
}

/// Find the point of `conv(points)` closest to the origin.
///
/// Converges once Wolfe's gap `|x|^2 - min_j x . p_j` is at most
/// `tolerance^2 * max(1, max_j |p_j|^2)`.
pub fn min_norm_point(points: &[Point], tolerance: f64, budget: &mut SolveBudget) -> Result<MinNormPoint> {
    if points.is_empty() {
        return Err(BlendError::configuration("No points to minimize over"));
    }

    let max_norm2 = points.iter().map(|p| norm2(p)).fold(0.0, f64::max);
    let gap_tolerance = tolerance * tolerance * max_norm2.max(1.0);

    // Start from the shortest point; ties go to the earliest.
    let start = argmin(points.iter().map(|p| norm2(p)));
    let mut corral = vec![start];
    let mut lambda = vec![1.0];
    let mut x = points[start];

    loop {
        budget.tick("minimum-norm solve")?;

        let best = argmin(points.iter().map(|p| dot(&x, p)));
        let gap = norm2(&x) - dot(&x, &points[best]);
        trace!(corral = corral.len(), gap, "major cycle");
        if gap <= gap_tolerance {
            break;
        }
        // Every corral point sits on the optimal hyperplane; any gap left is rounding.
        if corral.contains(&best) {
            break;
        }

        corral.push(best);
        lambda.push(0.0);

        loop {
            budget.tick("minimum-norm solve")?;

            let alpha = affine_minimizer(points, &corral).ok_or_else(|| {
                BlendError::numerical("minimum-norm solve hit a degenerate corral")
            })?;

            if alpha.iter().all(|&a| a > 0.0) {
                lambda = alpha;
                x = combine(points, &corral, &lambda);
                break;
            }

            // Walk from lambda toward alpha until the first coefficient reaches zero.
            let (leaving, theta) = lambda
                .iter()
                .zip(&alpha)
                .enumerate()
                .filter(|(_, (_, a))| **a <= 0.0)
                .map(|(i, (l, a))| {
                    let denom = l - a;
                    let t = if denom > 0.0 { l / denom } else { 0.0 };
                    (i, t)
                })
                .fold((usize::MAX, f64::INFINITY), |best, (i, t)| {
                    if t < best.1 { (i, t) } else { best }
                });
            let theta = theta.clamp(0.0, 1.0);

            for (l, a) in lambda.iter_mut().zip(&alpha) {
                *l = theta * a + (1.0 - theta) * *l;
            }

            if leaving < lambda.len() {
                lambda[leaving] = 0.0;
            }
            let kept: Vec<(usize, f64)> = corral
                .iter()
                .copied()
                .zip(lambda.iter().copied())
                .filter(|(_, l)| *l > 0.0)
                .collect();
            corral = kept.iter().map(|(j, _)| *j).collect();
            lambda = kept.iter().map(|(_, l)| *l).collect();

            if corral.is_empty() {
                return Err(BlendError::numerical(
                    "minimum-norm solve emptied its corral",
                ));
            }
            let sum: f64 = lambda.iter().sum();
            for l in lambda.iter_mut() {
                *l /= sum;
            }
            x = combine(points, &corral, &lambda);
        }
    }

    let mut coefficients = vec![0.0; points.len()];
    for (&j, &l) in corral.iter().zip(&lambda) {
        coefficients[j] = l;
    }

    Ok(MinNormPoint {
        coefficients,
        point: x,
    })
}

/// Index of the smallest value; ties go to the earliest index.
fn argmin(values: impl Iterator<Item = f64>) -> usize {
    values
        .enumerate()
        .fold((0, f64::INFINITY), |best, (i, v)| if v < best.1 { (i, v) } else { best })
        .0
}

fn combine(points: &[Point], corral: &[usize], lambda: &[f64]) -> Point {
    let mut x = [0.0; Nutrient::COUNT];
    for (&j, &l) in corral.iter().zip(lambda) {
        for (xk, pk) in x.iter_mut().zip(points[j]) {
            *xk += l * pk;
        }
    }
    x
}

/// Coefficients (summing to 1, possibly negative) of the point of smallest
/// norm in the affine hull of the corral.
fn affine_minimizer(points: &[Point], corral: &[usize]) -> Option<Vec<f64>> {
    let base = points[corral[0]];
    let dirs: Vec<Point> = corral[1..]
        .iter()
        .map(|&j| std::array::from_fn(|k| points[j][k] - base[k]))
        .collect();
    if dirs.is_empty() {
        return Some(vec![1.0]);
    }

    // Normal equations for min |base + D beta|.
    let gram: Vec<Vec<f64>> = dirs
        .iter()
        .map(|di| dirs.iter().map(|dj| dot(di, dj)).collect())
        .collect();
    let rhs: Vec<f64> = dirs.iter().map(|d| -dot(d, &base)).collect();
    let beta = solve_dense(gram, rhs)?;

    let mut alpha = Vec::with_capacity(corral.len());
    alpha.push(1.0 - beta.iter().sum::<f64>());
    alpha.extend(beta);
    Some(alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizer::config::OptimizerConfig;

    fn pt(x: f64, y: f64) -> Point {
        [x, y, 0.0, 0.0, 0.0]
    }

    fn solve(points: &[Point]) -> MinNormPoint {
        let config = OptimizerConfig::default();
        let mut budget = SolveBudget::new(&config, None);
        min_norm_point(points, 1e-9, &mut budget).unwrap()
    }

    #[test]
    fn test_single_point() {
        let r = solve(&[pt(3.0, 4.0)]);
        assert_eq!(r.coefficients, vec![1.0]);
        assert!((r.norm2() - 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_segment_interior() {
        // Segment from (-1, 1) to (1, 1): closest point is (0, 1).
        let r = solve(&[pt(-1.0, 1.0), pt(1.0, 1.0)]);
        assert!((r.point[0]).abs() < 1e-9);
        assert!((r.point[1] - 1.0).abs() < 1e-9);
        assert!((r.coefficients[0] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_segment_endpoint() {
        // Segment from (3, 0) to (1, 0): closest point is (1, 0).
        let r = solve(&[pt(3.0, 0.0), pt(1.0, 0.0)]);
        assert!((r.point[0] - 1.0).abs() < 1e-12);
        assert_eq!(r.coefficients, vec![0.0, 1.0]);
    }

    #[test]
    fn test_origin_inside_triangle() {
        let r = solve(&[pt(-1.0, -1.0), pt(2.0, -1.0), pt(-1.0, 2.0)]);
        assert!(r.norm2() < 1e-12);
        let sum: f64 = r.coefficients.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!(r.coefficients.iter().all(|&c| c >= 0.0));
    }

    #[test]
    fn test_drops_points_from_corral() {
        // Start at (0.2, 1); the optimum lies on the edge between the last two points.
        let r = solve(&[pt(0.2, 1.0), pt(-2.0, 0.5), pt(2.0, 0.5)]);
        assert!((r.point[0]).abs() < 1e-9);
        assert!((r.point[1] - 0.5).abs() < 1e-9);
        assert!(r.coefficients[0].abs() < 1e-9);
    }

    #[test]
    fn test_duplicate_points() {
        let r = solve(&[pt(1.0, 1.0), pt(1.0, 1.0)]);
        assert_eq!(r.coefficients, vec![1.0, 0.0]);
    }

    #[test]
    fn test_iteration_cap_is_numerical_error() {
        let config = OptimizerConfig {
            max_iterations: 1,
            ..Default::default()
        };
        let mut budget = SolveBudget::new(&config, None);
        let result = min_norm_point(&[pt(-1.0, 1.0), pt(1.0, 1.0)], 1e-9, &mut budget);
        assert!(matches!(result, Err(BlendError::Numerical(_))));
    }
}
