//! # Kernel density estimation
//!
//! [`generate_kde`] fits a density estimate on an `N × M` sample matrix and returns a
//! [`DensityEstimate`] that can be evaluated any number of times.
//!
//! ## Algorithm
//!
//! 1. Each column is divided by its standard deviation (NaN entries ignored). Columns
//!    without spread are rejected with [`GalmockError::DegenerateInput`].
//! 2. The bandwidth is derived from the scaled matrix by [`scott_bandwidth`]:
//!    `1.059 · min(σ, IQR / 1.34) · N^(-1/5)`, with `σ` and `IQR` taken over all entries.
//! 3. A [`DensityBackend`] fits a model on the scaled samples with the chosen [`Kernel`].
//!
//! Queries are scaled with the per-column deviations captured at fit time, scored in log
//! space by the model, and returned as linear densities of the scaled variables.
//!
//! ## Example
//!
//! ```rust
//! use galmock::kde::{generate_kde, Kernel};
//! use nalgebra::DMatrix;
//!
//! let samples = DMatrix::from_column_slice(5, 1, &[-1.0, -0.4, 0.0, 0.5, 1.2]);
//! let estimate = generate_kde(&samples, Kernel::Gaussian).unwrap();
//! assert!(estimate.evaluate_point(&[0.0]).unwrap() > estimate.evaluate_point(&[5.0]).unwrap());
//! ```
pub mod bandwidth;
pub mod exact;
pub mod kernel;

use nalgebra::{DMatrix, DVector};
use tracing::debug;

use crate::galmock_errors::GalmockError;

pub use bandwidth::scott_bandwidth;
pub use exact::ExactKernelDensity;
pub use kernel::Kernel;

/// A fitted density model, scoring query rows in log density.
pub trait DensityModel {
    /// Number of columns the model was fitted on.
    fn dim(&self) -> usize;

    /// Log density of each row of `query`.
    fn score_samples(&self, query: &DMatrix<f64>) -> Result<DVector<f64>, GalmockError>;
}

/// Fit-then-score density estimation service.
pub trait DensityBackend {
    fn fit(
        &self,
        data: &DMatrix<f64>,
        kernel: Kernel,
        bandwidth: f64,
    ) -> Result<Box<dyn DensityModel + Send + Sync>, GalmockError>;
}

/// A density estimate together with the column scaling it was fitted with.
pub struct DensityEstimate {
    model: Box<dyn DensityModel + Send + Sync>,
    scale: DVector<f64>,
    kernel: Kernel,
    bandwidth: f64,
}

impl std::fmt::Debug for DensityEstimate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DensityEstimate")
            .field("scale", &self.scale)
            .field("kernel", &self.kernel)
            .field("bandwidth", &self.bandwidth)
            .finish_non_exhaustive()
    }
}

impl DensityEstimate {
    pub fn kernel(&self) -> Kernel {
        self.kernel
    }

    /// Bandwidth in scaled units.
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Per-column standard deviations used to scale samples and queries.
    pub fn scale(&self) -> &DVector<f64> {
        &self.scale
    }

    /// Density at each row of `samples`.
    ///
    /// Return
    /// ----------
    /// * One density per query row.
    /// * `Err(GalmockError::DimensionMismatch)` if `samples` does not have as many columns
    ///   as the fitted data.
    pub fn evaluate(&self, samples: &DMatrix<f64>) -> Result<DVector<f64>, GalmockError> {
        if samples.ncols() != self.scale.len() {
            return Err(GalmockError::DimensionMismatch {
                expected: self.scale.len(),
                found: samples.ncols(),
            });
        }
        let mut scaled = samples.clone();
        for (mut col, s) in scaled.column_iter_mut().zip(self.scale.iter()) {
            col /= *s;
        }
        Ok(self.model.score_samples(&scaled)?.map(f64::exp))
    }

    /// Density at a single point given as a flat vector.
    pub fn evaluate_point(&self, point: &[f64]) -> Result<f64, GalmockError> {
        let query = DMatrix::from_row_slice(1, point.len(), point);
        Ok(self.evaluate(&query)?[0])
    }

    /// Closure form of [`DensityEstimate::evaluate`].
    pub fn into_fn(self) -> impl Fn(&DMatrix<f64>) -> Result<DVector<f64>, GalmockError> {
        move |samples: &DMatrix<f64>| self.evaluate(samples)
    }
}

/// Fit a density estimate on `inputs` with the built-in exact backend.
pub fn generate_kde(inputs: &DMatrix<f64>, kernel: Kernel) -> Result<DensityEstimate, GalmockError> {
    generate_kde_with(&ExactKernelDensity, inputs, kernel)
}

/// Fit a density estimate on `inputs` with `backend`.
///
/// Arguments
/// -----------------
/// * `backend`: density service doing the fit.
/// * `inputs`: `N × M` samples, one per row.
/// * `kernel`: kernel family.
///
/// Return
/// ----------
/// * The fitted [`DensityEstimate`].
/// * `Err(GalmockError::DegenerateInput)` for an empty input, a column without spread, or
///   a non-positive bandwidth.
pub fn generate_kde_with<B>(
    backend: &B,
    inputs: &DMatrix<f64>,
    kernel: Kernel,
) -> Result<DensityEstimate, GalmockError>
where
    B: DensityBackend + ?Sized,
{
    if inputs.nrows() == 0 || inputs.ncols() == 0 {
        return Err(GalmockError::DegenerateInput(
            "cannot fit a density on an empty sample".into(),
        ));
    }

    let scale = DVector::from_vec(bandwidth::column_nanstd(inputs));
    if let Some((col, s)) = scale
        .iter()
        .enumerate()
        .find(|(_, s)| !(s.is_finite() && **s > 0.0))
    {
        return Err(GalmockError::DegenerateInput(format!(
            "column {col} has no spread (std = {s})"
        )));
    }

    let mut scaled = inputs.clone();
    for (mut col, s) in scaled.column_iter_mut().zip(scale.iter()) {
        col /= *s;
    }

    let bandwidth = scott_bandwidth(&scaled)?;
    debug!(
        rows = inputs.nrows(),
        cols = inputs.ncols(),
        %kernel,
        bandwidth,
        "fitting kernel density"
    );
    let model = backend.fit(&scaled, kernel, bandwidth)?;

    Ok(DensityEstimate {
        model,
        scale,
        kernel,
        bandwidth,
    })
}
