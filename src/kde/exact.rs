//! Brute-force kernel density backend.
//!
//! Every query is compared with every fitted point, so scoring costs `O(N · Q · d)`.
//! Kernel contributions are accumulated in log space.
use nalgebra::{DMatrix, DVector};

use super::kernel::Kernel;
use super::{DensityBackend, DensityModel};
use crate::galmock_errors::GalmockError;

/// Backend fitting an [`ExactKdeModel`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactKernelDensity;

impl DensityBackend for ExactKernelDensity {
    fn fit(
        &self,
        data: &DMatrix<f64>,
        kernel: Kernel,
        bandwidth: f64,
    ) -> Result<Box<dyn DensityModel + Send + Sync>, GalmockError> {
        Ok(Box::new(ExactKdeModel::fit(data, kernel, bandwidth)?))
    }
}

#[derive(Debug, Clone)]
pub struct ExactKdeModel {
    data: DMatrix<f64>,
    kernel: Kernel,
    bandwidth: f64,
    log_norm: f64,
}

impl ExactKdeModel {
    pub fn fit(data: &DMatrix<f64>, kernel: Kernel, bandwidth: f64) -> Result<Self, GalmockError> {
        if data.nrows() == 0 || data.ncols() == 0 {
            return Err(GalmockError::DegenerateInput(
                "cannot fit a density on an empty sample".into(),
            ));
        }
        if !(bandwidth.is_finite() && bandwidth > 0.0) {
            return Err(GalmockError::InvalidParameter(format!(
                "bandwidth must be finite and positive, got {bandwidth}"
            )));
        }
        let log_norm = kernel.log_norm(data.ncols(), bandwidth) + (data.nrows() as f64).ln();
        Ok(ExactKdeModel {
            data: data.clone(),
            kernel,
            bandwidth,
            log_norm,
        })
    }

    pub fn kernel(&self) -> Kernel {
        self.kernel
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    fn score_row(&self, query: &DMatrix<f64>, q: usize) -> f64 {
        let log_terms = (0..self.data.nrows()).map(|i| {
            let dist = (0..self.data.ncols())
                .map(|j| (self.data[(i, j)] - query[(q, j)]).powi(2))
                .sum::<f64>()
                .sqrt();
            self.kernel.log_kernel(dist, self.bandwidth)
        });
        log_sum_exp(log_terms) - self.log_norm
    }
}

impl DensityModel for ExactKdeModel {
    fn dim(&self) -> usize {
        self.data.ncols()
    }

    fn score_samples(&self, query: &DMatrix<f64>) -> Result<DVector<f64>, GalmockError> {
        if query.ncols() != self.dim() {
            return Err(GalmockError::DimensionMismatch {
                expected: self.dim(),
                found: query.ncols(),
            });
        }
        Ok(DVector::from_iterator(
            query.nrows(),
            (0..query.nrows()).map(|q| self.score_row(query, q)),
        ))
    }
}

/// `ln Σ exp(xᵢ)`, stable for large magnitudes; `-inf` when every term is `-inf`.
fn log_sum_exp(terms: impl Iterator<Item = f64> + Clone) -> f64 {
    let max = terms.clone().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        return max;
    }
    max + terms.map(|t| (t - max).exp()).sum::<f64>().ln()
}

#[cfg(test)]
mod exact_test {
    use super::*;
    use approx::assert_relative_eq;

    fn integrate_1d(model: &ExactKdeModel, lo: f64, hi: f64, step: f64) -> f64 {
        let n = ((hi - lo) / step) as usize;
        let grid = DMatrix::from_fn(n, 1, |i, _| lo + (i as f64 + 0.5) * step);
        model
            .score_samples(&grid)
            .unwrap()
            .iter()
            .map(|l| l.exp() * step)
            .sum()
    }

    #[test]
    fn test_densities_integrate_to_one_in_1d() {
        let data = DMatrix::from_column_slice(3, 1, &[0.0, 0.3, -0.5]);
        for kernel in Kernel::ALL {
            let model = ExactKdeModel::fit(&data, kernel, 0.5).unwrap();
            let total = integrate_1d(&model, -12.0, 12.0, 1e-3);
            assert_relative_eq!(total, 1.0, epsilon = 5e-3);
        }
    }

    #[test]
    fn test_densities_integrate_to_one_in_2d() {
        let data = DMatrix::from_row_slice(2, 2, &[0.0, 0.0, 0.4, -0.2]);
        let step = 0.02;
        let n = 600;
        let grid = DMatrix::from_fn(n * n, 2, |k, j| {
            let idx = if j == 0 { k / n } else { k % n };
            -6.0 + (idx as f64 + 0.5) * step
        });
        for kernel in Kernel::ALL {
            let model = ExactKdeModel::fit(&data, kernel, 0.5).unwrap();
            let total: f64 = model
                .score_samples(&grid)
                .unwrap()
                .iter()
                .map(|l| l.exp() * step * step)
                .sum();
            assert_relative_eq!(total, 1.0, epsilon = 1e-2);
        }
    }

    #[test]
    fn test_single_point_gaussian() {
        let data = DMatrix::from_column_slice(1, 1, &[0.0]);
        let model = ExactKdeModel::fit(&data, Kernel::Gaussian, 1.0).unwrap();
        let score = model
            .score_samples(&DMatrix::from_column_slice(1, 1, &[1.0]))
            .unwrap();
        assert_relative_eq!(
            score[0],
            -0.5 - 0.5 * (2.0 * std::f64::consts::PI).ln(),
            epsilon = 1e-10
        );
    }

    #[test]
    fn test_outside_compact_support() {
        let data = DMatrix::from_column_slice(2, 1, &[0.0, 0.1]);
        let model = ExactKdeModel::fit(&data, Kernel::Tophat, 0.2).unwrap();
        let score = model
            .score_samples(&DMatrix::from_column_slice(1, 1, &[5.0]))
            .unwrap();
        assert_eq!(score[0], f64::NEG_INFINITY);
    }

    #[test]
    fn test_invalid_fits_and_queries() {
        let data = DMatrix::from_column_slice(2, 1, &[0.0, 0.1]);
        assert!(ExactKdeModel::fit(&data, Kernel::Gaussian, 0.0).is_err());
        assert!(ExactKdeModel::fit(&DMatrix::zeros(0, 1), Kernel::Gaussian, 1.0).is_err());

        let model = ExactKdeModel::fit(&data, Kernel::Gaussian, 1.0).unwrap();
        assert_eq!(
            model.score_samples(&DMatrix::zeros(1, 2)).unwrap_err(),
            GalmockError::DimensionMismatch {
                expected: 1,
                found: 2
            }
        );
    }
}
