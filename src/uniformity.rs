//! # Numerical differentiation and uniformity checks
//!
//! Central finite differences on scalar fields `f: ℝⁿ → ℝ`, and the directional
//! derivatives of such a field along the vectors of a subspace basis.
//!
//! A field is *uniform* along a subspace at `x` when every directional derivative
//! returned by [`evaluate_uniformity`] is close to zero; the tolerance is left to the
//! caller.
//!
//! Every helper evaluates `f` on a private copy of the point, so the caller's buffer is
//! never modified and the same point may be reused across calls.
use nalgebra::{DMatrix, DVector};

use crate::constants::FINITE_DIFF_STEP;
use crate::galmock_errors::GalmockError;

/// Symmetric difference quotient `(f(x0 + dx) - f(x0 - dx)) / 2dx`.
pub fn derivative<F>(f: F, x0: f64, dx: f64) -> f64
where
    F: Fn(f64) -> f64,
{
    (f(x0 + dx) - f(x0 - dx)) / (2.0 * dx)
}

/// Partial derivative of `f` with respect to coordinate `i`.
///
/// Arguments
/// -----------------
/// * `f`: scalar field evaluated on n-vectors.
/// * `i`: index of the differentiated coordinate.
///
/// Return
/// ----------
/// * A function of the point returning `∂f/∂xᵢ`, computed with a step of `1e-6`, or
///   `Err(GalmockError::DimensionMismatch)` when the point has no coordinate `i`.
pub fn partial_derivative<F>(
    f: &F,
    i: usize,
) -> impl Fn(&[f64]) -> Result<f64, GalmockError> + '_
where
    F: Fn(&[f64]) -> f64,
{
    move |point: &[f64]| {
        if i >= point.len() {
            return Err(GalmockError::DimensionMismatch {
                expected: i + 1,
                found: point.len(),
            });
        }
        Ok(derivative(
            |xi| {
                let mut shifted = point.to_vec();
                shifted[i] = xi;
                f(&shifted)
            },
            point[i],
            FINITE_DIFF_STEP,
        ))
    }
}

/// Gradient of `f`, one partial derivative per coordinate of the point.
pub fn gradient<F>(f: &F) -> impl Fn(&[f64]) -> Result<DVector<f64>, GalmockError> + '_
where
    F: Fn(&[f64]) -> f64,
{
    move |point: &[f64]| {
        let partials = (0..point.len())
            .map(|i| partial_derivative(f, i)(point))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DVector::from_vec(partials))
    }
}

/// Directional derivatives of `f` at `x` along each row of `basis`.
///
/// Arguments
/// -----------------
/// * `f`: scalar field on ℝⁿ.
/// * `x`: evaluation point, length n.
/// * `basis`: m × n matrix whose rows span the tested subspace.
///
/// Return
/// ----------
/// * The m-vector `basis · ∇f(x)`.
/// * `Err(GalmockError::DimensionMismatch)` if `basis` does not have n columns.
pub fn evaluate_uniformity<F>(
    f: &F,
    x: &[f64],
    basis: &DMatrix<f64>,
) -> Result<DVector<f64>, GalmockError>
where
    F: Fn(&[f64]) -> f64,
{
    if basis.ncols() != x.len() {
        return Err(GalmockError::DimensionMismatch {
            expected: x.len(),
            found: basis.ncols(),
        });
    }
    let grad = gradient(f)(x)?;
    Ok(basis * grad)
}
