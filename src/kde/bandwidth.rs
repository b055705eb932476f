//! Spread statistics and the bandwidth rule of the density estimator.
use itertools::Itertools;
use nalgebra::DMatrix;

use crate::galmock_errors::GalmockError;

/// Population standard deviation of each column, ignoring NaN entries.
///
/// A column without any finite entry has a NaN spread.
pub fn column_nanstd(data: &DMatrix<f64>) -> Vec<f64> {
    data.column_iter()
        .map(|col| {
            let values = col.iter().copied().filter(|v| !v.is_nan()).collect_vec();
            population_std(&values)
        })
        .collect()
}

/// Population standard deviation (`ddof = 0`); NaN for an empty slice.
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt()
}

/// `q`-th percentile (`0 ≤ q ≤ 100`) with linear interpolation between closest ranks.
///
/// NaN if the slice is empty or holds a NaN.
pub fn percentile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() || values.iter().any(|v| v.is_nan()) {
        return f64::NAN;
    }
    let sorted = values.iter().copied().sorted_by(f64::total_cmp).collect_vec();
    let pos = q / 100.0 * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (pos - lo as f64) * (sorted[hi] - sorted[lo])
}

/// Interquartile range `P75 − P25`.
pub fn iqr(values: &[f64]) -> f64 {
    percentile(values, 75.0) - percentile(values, 25.0)
}

/// Bandwidth of a column-scaled sample matrix.
///
/// With `σ` and `IQR` computed over all entries of `scaled` and `N` its number of rows:
///
/// ```text
/// h = 1.059 · min(σ, IQR / 1.34) · N^(-1/5)
/// ```
///
/// Return
/// ----------
/// * `Err(GalmockError::DegenerateInput)` if the matrix is empty or `h` is not a finite
///   positive number.
pub fn scott_bandwidth(scaled: &DMatrix<f64>) -> Result<f64, GalmockError> {
    let n = scaled.nrows();
    if n == 0 || scaled.ncols() == 0 {
        return Err(GalmockError::DegenerateInput(
            "cannot compute a bandwidth without samples".into(),
        ));
    }
    let flat = scaled.as_slice();
    let spread = population_std(flat).min(iqr(flat) / 1.34);
    let bandwidth = 1.059 * spread * (n as f64).powf(-0.2);

    if !(bandwidth.is_finite() && bandwidth > 0.0) {
        return Err(GalmockError::DegenerateInput(format!(
            "bandwidth must be finite and positive, got {bandwidth}"
        )));
    }
    Ok(bandwidth)
}
