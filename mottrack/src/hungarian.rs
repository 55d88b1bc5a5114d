//! Assignment solvers for the track-to-detection cost matrix
//!
//! Rows are tracks, columns are detections. Both solvers return one
//! column per row (or `None`) and leave cost gating to the caller.

use ndarray::ArrayView2;
use pathfinding::prelude::{kuhn_munkres_min, Matrix};

/// Integer weight used for columns padded in to satisfy the optimal
/// solver's shape requirement; larger than any scaled real cost.
const PAD_COST: i64 = 10_000_000;
/// Real costs live in `[0, 1]`; scaled to integers for the optimal solver.
const COST_SCALE: f32 = 1_000_000.0;

pub struct HungarianSolver;

impl HungarianSolver {
    /// Reduce-then-greedy assignment.
    ///
    /// Subtracts each row's and then each column's minimum, assigns
    /// zeros greedily in row order, and gives each remaining row the
    /// cheapest uncovered column. Deterministic, but not globally
    /// optimal.
    pub fn solve(cost: ArrayView2<f32>) -> Vec<Option<usize>> {
        let (rows, cols) = cost.dim();
        if rows == 0 || cols == 0 {
            return vec![None; rows];
        }

        let mut c = cost.to_owned();

        for mut row in c.rows_mut() {
            let min = row.iter().copied().fold(f32::INFINITY, f32::min);
            row.mapv_inplace(|v| v - min);
        }
        for j in 0..cols {
            let min = (0..rows).map(|i| c[[i, j]]).fold(f32::INFINITY, f32::min);
            for i in 0..rows {
                c[[i, j]] -= min;
            }
        }

        let mut assignment = vec![None; rows];
        let mut col_covered = vec![false; cols];

        // exact zeros: the subtracted minimum cancels itself
        for i in 0..rows {
            for j in 0..cols {
                if c[[i, j]] == 0.0 && !col_covered[j] {
                    assignment[i] = Some(j);
                    col_covered[j] = true;
                    break;
                }
            }
        }

        // leftover rows take the cheapest column still open; ties go to
        // the lowest column index
        for i in 0..rows {
            if assignment[i].is_some() {
                continue;
            }
            let mut best: Option<(usize, f32)> = None;
            for j in (0..cols).filter(|&j| !col_covered[j]) {
                if best.map_or(true, |(_, cost)| c[[i, j]] < cost) {
                    best = Some((j, c[[i, j]]));
                }
            }
            if let Some((j, _)) = best {
                assignment[i] = Some(j);
                col_covered[j] = true;
            }
        }

        assignment
    }

    /// Optimal assignment via Kuhn-Munkres.
    ///
    /// Costs are scaled to integers; when there are more rows than
    /// columns the matrix is padded with unmatchable columns.
    pub fn solve_optimal(cost: ArrayView2<f32>) -> Vec<Option<usize>> {
        let (rows, cols) = cost.dim();
        if rows == 0 || cols == 0 {
            return vec![None; rows];
        }

        let width = rows.max(cols);
        let weights = Matrix::from_fn(rows, width, |(i, j)| {
            if j < cols {
                (cost[[i, j]] * COST_SCALE) as i64
            } else {
                PAD_COST
            }
        });

        let (_, assigned_cols) = kuhn_munkres_min(&weights);
        assigned_cols
            .into_iter()
            .map(|j| (j < cols).then_some(j))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_diagonal_preference() {
        let cost = array![[0.1, 0.9], [0.9, 0.1]];
        assert_eq!(HungarianSolver::solve(cost.view()), vec![Some(0), Some(1)]);
        assert_eq!(
            HungarianSolver::solve_optimal(cost.view()),
            vec![Some(0), Some(1)]
        );
    }

    #[test]
    fn test_crossed_preference() {
        let cost = array![[0.8, 0.2], [0.3, 0.7]];
        assert_eq!(HungarianSolver::solve(cost.view()), vec![Some(1), Some(0)]);
        assert_eq!(
            HungarianSolver::solve_optimal(cost.view()),
            vec![Some(1), Some(0)]
        );
    }

    #[test]
    fn test_more_rows_than_columns() {
        let cost = array![[0.5], [0.1], [0.9]];
        let assignment = HungarianSolver::solve(cost.view());
        // exactly one row wins the single column
        assert_eq!(assignment.iter().filter(|a| a.is_some()).count(), 1);

        let optimal = HungarianSolver::solve_optimal(cost.view());
        assert_eq!(optimal, vec![None, Some(0), None]);
    }

    #[test]
    fn test_more_columns_than_rows() {
        let cost = array![[0.9, 0.1, 0.5]];
        assert_eq!(HungarianSolver::solve(cost.view()), vec![Some(1)]);
        assert_eq!(HungarianSolver::solve_optimal(cost.view()), vec![Some(1)]);
    }

    #[test]
    fn test_uniform_costs_assign_in_row_order() {
        let cost = array![[1.0, 1.0], [1.0, 1.0]];
        // reduction zeroes everything; greedy walks rows left to right
        assert_eq!(HungarianSolver::solve(cost.view()), vec![Some(0), Some(1)]);
    }

    #[test]
    fn test_empty_matrix() {
        let cost = ndarray::Array2::<f32>::zeros((0, 3));
        assert!(HungarianSolver::solve(cost.view()).is_empty());
        let cost = ndarray::Array2::<f32>::zeros((2, 0));
        assert_eq!(HungarianSolver::solve(cost.view()), vec![None, None]);
        assert_eq!(HungarianSolver::solve_optimal(cost.view()), vec![None, None]);
    }
}
