//! Null spaces and orthonormal complements of small sets of row vectors.
//!
//! All routines work in `f64`. A pivot is treated as zero when its magnitude is at most
//! `1e-10` times the largest magnitude of the input matrix, so the rank does not depend
//! on the overall scale of the input. An all-zero matrix has rank 0.
use nalgebra::{DMatrix, DVector};

use crate::constants::PIVOT_EPS;
use crate::galmock_errors::GalmockError;

/// Basis of the null space of `a` (vectors `v` with `a · v = 0`).
///
/// The matrix is brought to reduced row echelon form with partial pivoting; each free
/// column `f` yields one basis vector with a `1` in position `f`. The vectors are
/// linearly independent but not orthogonal. A matrix without rows has the canonical
/// basis of ℝⁿ as null space.
pub fn null_space(a: &DMatrix<f64>) -> Vec<DVector<f64>> {
    let (m, n) = a.shape();
    let mut rref = a.clone();
    let tol = PIVOT_EPS * rref.amax();

    let mut pivots: Vec<usize> = Vec::with_capacity(m.min(n));
    let mut row = 0;
    for col in 0..n {
        if row == m {
            break;
        }
        let (best, magnitude) = (row..m)
            .map(|r| (r, rref[(r, col)].abs()))
            .fold((row, -1.0), |acc, cur| if cur.1 > acc.1 { cur } else { acc });
        if magnitude <= tol {
            continue;
        }
        rref.swap_rows(row, best);

        let pivot = rref[(row, col)];
        for c in col..n {
            rref[(row, c)] /= pivot;
        }
        for r in 0..m {
            if r != row {
                let factor = rref[(r, col)];
                if factor != 0.0 {
                    for c in col..n {
                        let delta = factor * rref[(row, c)];
                        rref[(r, c)] -= delta;
                    }
                }
            }
        }
        pivots.push(col);
        row += 1;
    }

    (0..n)
        .filter(|c| !pivots.contains(c))
        .map(|free| {
            let mut v = DVector::zeros(n);
            v[free] = 1.0;
            for (i, &p) in pivots.iter().enumerate() {
                v[p] = -rref[(i, free)];
            }
            v
        })
        .collect()
}

/// Scale `v` to unit Euclidean norm.
pub fn normalize_vector(v: &DVector<f64>) -> Result<DVector<f64>, GalmockError> {
    let norm = v.norm();
    if !(norm.is_finite() && norm > 0.0) {
        return Err(GalmockError::DegenerateInput(
            "cannot normalize a zero or non-finite vector".into(),
        ));
    }
    Ok(v / norm)
}

/// Orthonormalize `vectors` with the modified Gram–Schmidt process.
///
/// Vectors that are linearly dependent on their predecessors, relative to their own
/// magnitude, are dropped. Zero vectors are always dropped.
pub fn gram_schmidt(vectors: &[DVector<f64>]) -> Vec<DVector<f64>> {
    let mut basis: Vec<DVector<f64>> = Vec::with_capacity(vectors.len());
    for v in vectors {
        let scale = v.amax();
        let mut w = v.clone();
        for u in &basis {
            let proj = u.dot(&w);
            w.axpy(-proj, u, 1.0);
        }
        if w.norm() > PIVOT_EPS * scale {
            if let Ok(unit) = normalize_vector(&w) {
                basis.push(unit);
            }
        }
    }
    basis
}

/// Orthonormal basis of the orthogonal complement of the span of the rows of `v`.
///
/// Arguments
/// -----------------
/// * `v`: m × n matrix whose rows span the subspace.
///
/// Return
/// ----------
/// * A k × n matrix (k = n − rank(v)) whose rows are unit vectors, mutually orthogonal
///   and orthogonal to every row of `v`. It has no rows when `v` spans ℝⁿ.
pub fn orthogonal_complement(v: &DMatrix<f64>) -> DMatrix<f64> {
    let n = v.ncols();
    let basis = gram_schmidt(&null_space(v));
    DMatrix::from_fn(basis.len(), n, |i, j| basis[i][j])
}

#[cfg(test)]
mod linear_algebra_test {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_complement(v: &DMatrix<f64>, complement: &DMatrix<f64>) {
        for i in 0..complement.nrows() {
            let c = complement.row(i);
            assert_relative_eq!(c.norm(), 1.0, epsilon = 1e-12);
            for r in 0..v.nrows() {
                assert!(c.dot(&v.row(r)).abs() < 1e-10);
            }
            for j in (i + 1)..complement.nrows() {
                assert!(c.dot(&complement.row(j)).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_full_rank_square_has_empty_complement() {
        let v = DMatrix::from_row_slice(3, 3, &[2.0, 1.0, 0.0, 0.0, 1.0, -1.0, 1.0, 0.0, 3.0]);
        let complement = orthogonal_complement(&v);
        assert_eq!(complement.shape(), (0, 3));
    }

    #[test]
    fn test_rank_is_scale_invariant() {
        for scale in [1e-11, 1e-3, 1e9] {
            let identity = DMatrix::<f64>::identity(3, 3) * scale;
            assert_eq!(orthogonal_complement(&identity).shape(), (0, 3), "scale {scale}");

            let v = DMatrix::from_row_slice(1, 3, &[scale, scale, scale]);
            let complement = orthogonal_complement(&v);
            assert_eq!(complement.nrows(), 2, "scale {scale}");
            assert_complement(&(v / scale), &complement);
        }

        assert_eq!(null_space(&DMatrix::zeros(2, 3)).len(), 3);
        assert_eq!(gram_schmidt(&[DVector::zeros(3)]).len(), 0);
        assert_eq!(gram_schmidt(&[DVector::from_element(3, 1e-14)]).len(), 1);
    }

    #[test]
    fn test_single_vector_in_3d() {
        let v = DMatrix::from_row_slice(1, 3, &[1.0, 1.0, 1.0]);
        let complement = orthogonal_complement(&v);
        assert_eq!(complement.nrows(), 2);
        assert_complement(&v, &complement);
    }

    #[test]
    fn test_rank_deficient_rows() {
        // third row is the sum of the first two
        let v = DMatrix::from_row_slice(
            3,
            4,
            &[
                1.0, 2.0, 0.0, -1.0, //
                0.0, 1.0, 1.0, 3.0, //
                1.0, 3.0, 1.0, 2.0,
            ],
        );
        let complement = orthogonal_complement(&v);
        assert_eq!(complement.nrows(), 2);
        assert_complement(&v, &complement);
    }

    #[test]
    fn test_null_space_vectors_are_annihilated() {
        let a = DMatrix::from_row_slice(2, 4, &[0.0, 0.0, 1.0, 2.0, 3.0, 1.0, 0.0, 0.0]);
        let kernel = null_space(&a);
        assert_eq!(kernel.len(), 2);
        for k in &kernel {
            assert!((&a * k).amax() < 1e-12);
        }
    }

    #[test]
    fn test_no_rows_gives_identity() {
        let v = DMatrix::<f64>::zeros(0, 3);
        assert_eq!(orthogonal_complement(&v), DMatrix::identity(3, 3));
    }

    #[test]
    fn test_normalize_vector() {
        let v = normalize_vector(&DVector::from_vec(vec![3.0, 4.0])).unwrap();
        assert_relative_eq!(v, DVector::from_vec(vec![0.6, 0.8]));
        assert!(matches!(
            normalize_vector(&DVector::zeros(3)),
            Err(GalmockError::DegenerateInput(_))
        ));
    }

    #[test]
    fn test_gram_schmidt_drops_dependent_vectors() {
        let vectors = vec![
            DVector::from_vec(vec![1.0, 1.0, 0.0]),
            DVector::from_vec(vec![2.0, 2.0, 0.0]),
            DVector::from_vec(vec![0.0, 1.0, 1.0]),
        ];
        let basis = gram_schmidt(&vectors);
        assert_eq!(basis.len(), 2);
        assert!(basis[0].dot(&basis[1]).abs() < 1e-12);
    }
}
