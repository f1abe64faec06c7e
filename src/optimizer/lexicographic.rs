//! Deterministic choice among equally good blends.
//!
//! The optimal blended profile is unique, but the vertex weights that reach it
//! need not be. This module restricts the prefix-vertex simplex to weights
//! that reproduce the optimal point and, among those, maximizes the first
//! proportion, then the second, and so on, with a dense two-phase simplex using
//! Bland's rule.

use tracing::debug;

use crate::error::{BlendError, Result};
use crate::models::Nutrient;
use crate::optimizer::budget::SolveBudget;
use crate::optimizer::constants::PIVOT_EPSILON;

type Point = [f64; Nutrient::COUNT];

/// Relative slack when comparing ratio-test candidates.
const RATIO_TIE: f64 = 1e-12;

/// Vertex weights reproducing `optimum` whose proportions are lexicographically largest.
pub fn lexicographic_vertex_weights(
    points: &[Point],
    optimum: &Point,
    tolerance: f64,
    budget: &mut SolveBudget,
) -> Result<Vec<f64>> {
    let n = points.len();
    let mut tableau = Tableau::phase_one(points, optimum);

    let phase_one_cost: Vec<f64> = (0..tableau.cols)
        .map(|j| if j >= n { -1.0 } else { 0.0 })
        .collect();
    let all = vec![true; tableau.cols];
    tableau.maximize(&phase_one_cost, &all, budget)?;

    let infeasibility: f64 = (0..tableau.rows.len())
        .filter(|&r| tableau.basis[r] >= n)
        .map(|r| tableau.rhs(r))
        .sum();
    if infeasibility > tolerance {
        return Err(BlendError::numerical(format!(
            "tie-break could not reproduce the optimal blend (residual {:.3e})",
            infeasibility
        )));
    }
    tableau.drive_out_artificials(n);

    // Artificial columns never re-enter.
    let mut allowed: Vec<bool> = (0..tableau.cols).map(|j| j < n).collect();

    for stage in 0..n {
        // Proportion of ingredient `stage`, up to the factor 100.
        let cost: Vec<f64> = (0..tableau.cols)
            .map(|j| if j >= stage && j < n { 1.0 / (j + 1) as f64 } else { 0.0 })
            .collect();
        tableau.maximize(&cost, &allowed, budget)?;

        // Columns that would lower this proportion stay at zero from here on.
        for j in 0..n {
            if allowed[j] && !tableau.is_basic(j) && tableau.reduced_cost(&cost, j) < -PIVOT_EPSILON {
                allowed[j] = false;
            }
        }
    }

    let mut weights = vec![0.0; n];
    for (r, &j) in tableau.basis.iter().enumerate() {
        if j < n {
            weights[j] = tableau.rhs(r).max(0.0);
        }
    }
    debug!(rows = tableau.rows.len(), "tie-break settled");
    Ok(weights)
}

/// Dense simplex tableau; the last entry of every row is its right-hand side.
struct Tableau {
    rows: Vec<Vec<f64>>,
    basis: Vec<usize>,
    cols: usize,
}

impl Tableau {
    /// `sum_j w_j q_j = optimum`, `sum_j w_j = 1`, one artificial column per row.
    fn phase_one(points: &[Point], optimum: &Point) -> Self {
        let n = points.len();
        let m = Nutrient::COUNT + 1;
        let cols = n + m;

        let mut rows = Vec::with_capacity(m);
        for r in 0..m {
            let mut row = vec![0.0; cols + 1];
            if r < Nutrient::COUNT {
                for (j, q) in points.iter().enumerate() {
                    row[j] = q[r];
                }
                row[cols] = optimum[r];
            } else {
                for v in row.iter_mut().take(n) {
                    *v = 1.0;
                }
                row[cols] = 1.0;
            }
            if row[cols] < 0.0 {
                for v in row.iter_mut() {
                    *v = -*v;
                }
            }
            row[n + r] = 1.0;
            rows.push(row);
        }

        Self {
            rows,
            basis: (n..n + m).collect(),
            cols,
        }
    }

    fn rhs(&self, r: usize) -> f64 {
        self.rows[r][self.cols]
    }

    fn is_basic(&self, j: usize) -> bool {
        self.basis.contains(&j)
    }

    fn reduced_cost(&self, cost: &[f64], j: usize) -> f64 {
        cost[j]
            - self
                .basis
                .iter()
                .zip(&self.rows)
                .map(|(&b, row)| cost[b] * row[j])
                .sum::<f64>()
    }

    fn pivot(&mut self, r: usize, j: usize) {
        let p = self.rows[r][j];
        for v in self.rows[r].iter_mut() {
            *v /= p;
        }
        let pivot_row = self.rows[r].clone();

        for (i, row) in self.rows.iter_mut().enumerate() {
            if i == r {
                continue;
            }
            let factor = row[j];
            if factor == 0.0 {
                continue;
            }
            for (v, pv) in row.iter_mut().zip(&pivot_row) {
                *v -= factor * pv;
            }
            row[j] = 0.0;
        }

        for row in self.rows.iter_mut() {
            let rhs = &mut row[self.cols];
            if *rhs < 0.0 && *rhs > -PIVOT_EPSILON {
                *rhs = 0.0;
            }
        }
        self.basis[r] = j;
    }

    /// Primal simplex with Bland's rule over the `allowed` columns.
    fn maximize(&mut self, cost: &[f64], allowed: &[bool], budget: &mut SolveBudget) -> Result<()> {
        loop {
            let entering = (0..self.cols).find(|&j| {
                allowed[j] && !self.is_basic(j) && self.reduced_cost(cost, j) > PIVOT_EPSILON
            });
            let Some(j) = entering else {
                return Ok(());
            };

            let mut leaving: Option<(usize, f64)> = None;
            for r in 0..self.rows.len() {
                let a = self.rows[r][j];
                if a <= PIVOT_EPSILON {
                    continue;
                }
                let ratio = self.rhs(r).max(0.0) / a;
                leaving = match leaving {
                    None => Some((r, ratio)),
                    Some((best_r, best)) => {
                        let slack = RATIO_TIE * (1.0 + best.abs());
                        if ratio < best - slack
                            || (ratio <= best + slack && self.basis[r] < self.basis[best_r])
                        {
                            Some((r, ratio))
                        } else {
                            Some((best_r, best))
                        }
                    }
                };
            }
            let Some((r, _)) = leaving else {
                return Err(BlendError::numerical("tie-break simplex is unbounded"));
            };

            budget.tick("tie-break simplex")?;
            self.pivot(r, j);
        }
    }

    /// Replace artificial basics by real columns, dropping redundant rows.
    fn drive_out_artificials(&mut self, n: usize) {
        let mut r = 0;
        while r < self.rows.len() {
            if self.basis[r] < n {
                r += 1;
                continue;
            }
            let replacement = (0..n).find(|&j| !self.is_basic(j) && self.rows[r][j].abs() > PIVOT_EPSILON);
            match replacement {
                Some(j) => {
                    // The artificial sits at (numerically) zero; pin it there.
                    let cols = self.cols;
                    self.rows[r][cols] = 0.0;
                    self.pivot(r, j);
                    r += 1;
                }
                None => {
                    self.rows.remove(r);
                    self.basis.remove(r);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizer::config::OptimizerConfig;

    fn pt(x: f64, y: f64) -> Point {
        [x, y, 0.0, 0.0, 0.0]
    }

    fn run(points: &[Point], optimum: Point) -> Vec<f64> {
        let config = OptimizerConfig::default();
        let mut budget = SolveBudget::new(&config, None);
        lexicographic_vertex_weights(points, &optimum, 1e-9, &mut budget).unwrap()
    }

    #[test]
    fn test_single_vertex() {
        let w = run(&[pt(2.0, 1.0)], pt(2.0, 1.0));
        assert!((w[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_unique_optimum_is_kept() {
        let w = run(&[pt(-1.0, 1.0), pt(1.0, 1.0)], pt(0.0, 1.0));
        assert!((w[0] - 0.5).abs() < 1e-9);
        assert!((w[1] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_duplicate_vertices_prefer_earliest() {
        let w = run(&[pt(1.0, 1.0), pt(1.0, 1.0)], pt(1.0, 1.0));
        assert!((w[0] - 1.0).abs() < 1e-12);
        assert!(w[1].abs() < 1e-12);
    }

    #[test]
    fn test_free_face_maximizes_leading_proportion() {
        // Optimal set is w = (t, t, 1 - 2t); the first proportion grows with t.
        let w = run(&[pt(1.0, 0.0), pt(-1.0, 0.0), pt(0.0, 0.0)], pt(0.0, 0.0));
        assert!((w[0] - 0.5).abs() < 1e-9);
        assert!((w[1] - 0.5).abs() < 1e-9);
        assert!(w[2].abs() < 1e-9);
    }

    #[test]
    fn test_unreachable_optimum_is_numerical_error() {
        let config = OptimizerConfig::default();
        let mut budget = SolveBudget::new(&config, None);
        let result = lexicographic_vertex_weights(&[pt(1.0, 0.0)], &pt(5.0, 0.0), 1e-9, &mut budget);
        assert!(matches!(result, Err(BlendError::Numerical(_))));
    }
}
