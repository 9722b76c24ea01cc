// Copyright 2026 The Weft Project
// SPDX-License-Identifier: Apache-2.0

// Pairwise comparison matrices and the AHP weight solver.
//
// A matrix is validated once at construction (square, strictly positive,
// reciprocal within tolerance) and solved as many times as needed.
// Weights come from the column-normalize-then-average eigenvector
// approximation; the consistency ratio follows Saaty's CI / RI with the
// published random-index table.

use serde::{Deserialize, Serialize};

/// A solved matrix whose consistency ratio is at or above this value is
/// flagged as inconsistent. Advisory only: results are never withheld.
pub const INCONSISTENCY_THRESHOLD: f64 = 0.1;

/// Reciprocity check tolerance: `a[i][j] * a[j][i]` must be within this
/// distance of 1.
const RECIPROCITY_TOLERANCE: f64 = 1e-6;

/// Saaty random indices for matrix orders 1..=10. Orders beyond the
/// table fall back to the order-10 value.
const RANDOM_INDEX: [f64; 10] = [0.0, 0.0, 0.58, 0.90, 1.12, 1.24, 1.32, 1.41, 1.45, 1.49];

fn random_index(n: usize) -> f64 {
    // Orders 1 and 2 are perfectly consistent by construction; using 1
    // here keeps CR = CI = 0 without a division by zero.
    if n <= 2 {
        return 1.0;
    }
    RANDOM_INDEX.get(n - 1).copied().unwrap_or(1.49)
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A pairwise comparison matrix that cannot be accepted as supplied.
/// Malformed matrices are rejected, never silently corrected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MatrixError {
    #[error("pairwise matrix is empty")]
    Empty,

    #[error("pairwise matrix is not square: row {row} has {len} entries, expected {n}")]
    NotSquare { row: usize, len: usize, n: usize },

    #[error("pairwise matrix entry ({i},{j}) must be strictly positive, got {value}")]
    NonPositiveEntry { i: usize, j: usize, value: f64 },

    #[error(
        "reciprocity violated at ({i},{j}): {a_ij} against {a_ji}, product must be 1"
    )]
    ReciprocityViolation { i: usize, j: usize, a_ij: f64, a_ji: f64 },
}

// ---------------------------------------------------------------------------
// Matrix
// ---------------------------------------------------------------------------

/// A validated reciprocal pairwise comparison matrix on the Saaty scale.
///
/// Invariants held after construction: square with order >= 1, every
/// entry strictly positive and finite, `a[i][j] * a[j][i] = 1` within
/// tolerance (which forces a unit diagonal).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct PairwiseMatrix {
    entries: Vec<Vec<f64>>,
}

impl PairwiseMatrix {
    /// Validate and wrap raw rows.
    pub fn new(entries: Vec<Vec<f64>>) -> Result<Self, MatrixError> {
        let n = entries.len();
        if n == 0 {
            return Err(MatrixError::Empty);
        }
        for (row, r) in entries.iter().enumerate() {
            if r.len() != n {
                return Err(MatrixError::NotSquare {
                    row,
                    len: r.len(),
                    n,
                });
            }
        }
        for (i, row) in entries.iter().enumerate() {
            for (j, &value) in row.iter().enumerate() {
                if !(value.is_finite() && value > 0.0) {
                    return Err(MatrixError::NonPositiveEntry { i, j, value });
                }
            }
        }
        // Product form of the reciprocal invariant; i == j covers the
        // diagonal, which must be 1.
        for i in 0..n {
            for j in i..n {
                let a_ij = entries[i][j];
                let a_ji = entries[j][i];
                if (a_ij * a_ji - 1.0).abs() > RECIPROCITY_TOLERANCE {
                    return Err(MatrixError::ReciprocityViolation { i, j, a_ij, a_ji });
                }
            }
        }
        Ok(Self { entries })
    }

    /// The all-ones matrix of the given order: every item equally
    /// important, uniform weights, CR = 0. This is the default wherever
    /// a caller supplies no matrix.
    pub fn uniform(n: usize) -> Result<Self, MatrixError> {
        if n == 0 {
            return Err(MatrixError::Empty);
        }
        Ok(Self {
            entries: vec![vec![1.0; n]; n],
        })
    }

    /// Matrix order (number of compared items).
    pub fn order(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[Vec<f64>] {
        &self.entries
    }

    /// Derive priority weights and the consistency ratio.
    ///
    /// Weights: normalize each column to sum 1, then average across each
    /// row. λ_max is the mean of `(A·w)_i / w_i`; CI = (λ_max − n)/(n − 1)
    /// with CI = 0 for n <= 2; CR = CI / RI(n).
    pub fn solve(&self) -> Priorities {
        let n = self.order();

        let mut col_sums = vec![0.0_f64; n];
        for row in &self.entries {
            for (j, &value) in row.iter().enumerate() {
                col_sums[j] += value;
            }
        }

        let mut weights = vec![0.0_f64; n];
        for (i, row) in self.entries.iter().enumerate() {
            let mut acc = 0.0;
            for (j, &value) in row.iter().enumerate() {
                acc += value / col_sums[j];
            }
            weights[i] = acc / n as f64;
        }

        let mut lambda_max = 0.0;
        for (i, row) in self.entries.iter().enumerate() {
            let aw: f64 = row.iter().zip(&weights).map(|(a, w)| a * w).sum();
            lambda_max += aw / weights[i];
        }
        lambda_max /= n as f64;

        let consistency_index = if n <= 2 {
            0.0
        } else {
            (lambda_max - n as f64) / (n as f64 - 1.0)
        };
        let consistency_ratio = consistency_index / random_index(n);

        Priorities {
            weights,
            lambda_max,
            consistency_index,
            consistency_ratio,
        }
    }
}

impl TryFrom<Vec<Vec<f64>>> for PairwiseMatrix {
    type Error = MatrixError;

    fn try_from(entries: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

impl From<PairwiseMatrix> for Vec<Vec<f64>> {
    fn from(m: PairwiseMatrix) -> Self {
        m.entries
    }
}

// ---------------------------------------------------------------------------
// Solver output
// ---------------------------------------------------------------------------

/// Priority weights and consistency figures for one solved matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Priorities {
    /// Non-negative, one per compared item, summing to 1.
    pub weights: Vec<f64>,
    pub lambda_max: f64,
    pub consistency_index: f64,
    pub consistency_ratio: f64,
}

impl Priorities {
    pub fn is_consistent(&self) -> bool {
        self.consistency_ratio < INCONSISTENCY_THRESHOLD
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < TOL, "{a} != {b}");
    }

    #[test]
    fn uniform_matrix_yields_equal_weights_and_zero_cr() {
        for n in 1..=6 {
            let p = PairwiseMatrix::uniform(n).unwrap().solve();
            assert_eq!(p.weights.len(), n);
            for w in &p.weights {
                assert_close(*w, 1.0 / n as f64);
            }
            assert_close(p.consistency_ratio, 0.0);
            assert!(p.is_consistent());
        }
    }

    #[test]
    fn order_one_is_trivially_consistent() {
        let p = PairwiseMatrix::new(vec![vec![1.0]]).unwrap().solve();
        assert_eq!(p.weights, vec![1.0]);
        assert_close(p.lambda_max, 1.0);
        assert_close(p.consistency_ratio, 0.0);
    }

    #[test]
    fn order_two_always_has_zero_cr() {
        // Any reciprocal 2x2 is perfectly consistent.
        let p = PairwiseMatrix::new(vec![vec![1.0, 5.0], vec![0.2, 1.0]])
            .unwrap()
            .solve();
        // Column sums 1.2 and 6; both normalized columns are [5/6, 1/6].
        assert_close(p.weights[0], 5.0 / 6.0);
        assert_close(p.weights[1], 1.0 / 6.0);
        assert_close(p.lambda_max, 2.0);
        assert_close(p.consistency_ratio, 0.0);
    }

    #[test]
    fn consistent_matrix_recovers_the_ratio_scale() {
        // Built from weights 0.6 / 0.3 / 0.1 as a_ij = w_i / w_j.
        let m = PairwiseMatrix::new(vec![
            vec![1.0, 2.0, 6.0],
            vec![0.5, 1.0, 3.0],
            vec![1.0 / 6.0, 1.0 / 3.0, 1.0],
        ])
        .unwrap();
        let p = m.solve();
        assert_close(p.weights[0], 0.6);
        assert_close(p.weights[1], 0.3);
        assert_close(p.weights[2], 0.1);
        assert_close(p.lambda_max, 3.0);
        assert_close(p.consistency_ratio, 0.0);
    }

    #[test]
    fn weights_sum_to_one() {
        let m = PairwiseMatrix::new(vec![
            vec![1.0, 2.0, 5.0],
            vec![0.5, 1.0, 2.0],
            vec![0.2, 0.5, 1.0],
        ])
        .unwrap();
        let p = m.solve();
        assert_close(p.weights.iter().sum::<f64>(), 1.0);
        // Nearly consistent: a small positive CR below the threshold.
        assert!(p.consistency_ratio > 0.0);
        assert!(p.is_consistent());
    }

    #[test]
    fn cyclic_preferences_are_flagged_inconsistent() {
        // a beats b, b beats c, c beats a: maximally incoherent.
        let m = PairwiseMatrix::new(vec![
            vec![1.0, 3.0, 1.0 / 9.0],
            vec![1.0 / 3.0, 1.0, 9.0],
            vec![9.0, 1.0 / 9.0, 1.0],
        ])
        .unwrap();
        let p = m.solve();
        assert!(p.consistency_ratio >= INCONSISTENCY_THRESHOLD);
        assert!(!p.is_consistent());
        // The solver still produces a usable weight vector.
        assert_close(p.weights.iter().sum::<f64>(), 1.0);
    }

    #[test]
    fn empty_matrix_rejected() {
        assert_eq!(PairwiseMatrix::new(vec![]).unwrap_err(), MatrixError::Empty);
        assert_eq!(PairwiseMatrix::uniform(0).unwrap_err(), MatrixError::Empty);
    }

    #[test]
    fn ragged_matrix_rejected() {
        let err = PairwiseMatrix::new(vec![vec![1.0, 2.0], vec![0.5]]).unwrap_err();
        assert_eq!(
            err,
            MatrixError::NotSquare {
                row: 1,
                len: 1,
                n: 2
            }
        );
    }

    #[test]
    fn non_positive_entries_rejected() {
        let err = PairwiseMatrix::new(vec![vec![1.0, 0.0], vec![2.0, 1.0]]).unwrap_err();
        assert!(matches!(err, MatrixError::NonPositiveEntry { i: 0, j: 1, .. }));

        let err = PairwiseMatrix::new(vec![vec![1.0, -3.0], vec![2.0, 1.0]]).unwrap_err();
        assert!(matches!(err, MatrixError::NonPositiveEntry { .. }));

        let err =
            PairwiseMatrix::new(vec![vec![1.0, f64::INFINITY], vec![2.0, 1.0]]).unwrap_err();
        assert!(matches!(err, MatrixError::NonPositiveEntry { .. }));
    }

    #[test]
    fn reciprocity_violation_rejected() {
        let err = PairwiseMatrix::new(vec![vec![1.0, 2.0], vec![0.4, 1.0]]).unwrap_err();
        assert!(matches!(
            err,
            MatrixError::ReciprocityViolation { i: 0, j: 1, .. }
        ));
        // A non-unit diagonal is a reciprocity violation against itself.
        let err = PairwiseMatrix::new(vec![vec![2.0]]).unwrap_err();
        assert!(matches!(
            err,
            MatrixError::ReciprocityViolation { i: 0, j: 0, .. }
        ));
    }

    #[test]
    fn reciprocity_tolerates_float_noise() {
        let third = 1.0 / 3.0;
        assert!(PairwiseMatrix::new(vec![vec![1.0, 3.0], vec![third, 1.0]]).is_ok());
    }

    #[test]
    fn serde_rejects_invalid_payloads() {
        let ok: PairwiseMatrix = serde_json::from_str("[[1.0, 2.0], [0.5, 1.0]]").unwrap();
        assert_eq!(ok.order(), 2);

        let err = serde_json::from_str::<PairwiseMatrix>("[[1.0, 2.0], [0.3, 1.0]]");
        assert!(err.is_err());
    }

    #[test]
    fn cr_falls_back_to_the_largest_random_index_past_order_ten() {
        // A consistent 11x11 (all ones) still solves with CR 0.
        let p = PairwiseMatrix::uniform(11).unwrap().solve();
        assert_close(p.consistency_ratio, 0.0);
        assert_close(p.weights[0], 1.0 / 11.0);
    }
}
