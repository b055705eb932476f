//! # Distribution-function samplers
//!
//! A [`DistributionSampler`] draws independent `(R, vR, vT)` triples from a planar stellar
//! distribution function. The sample generator only relies on this narrow contract, so any
//! model (or a test stub) can be plugged into the pipeline.
//!
//! The built-in [`SchwarzschildDf`] is a warm exponential disk whose velocity ellipsoid
//! follows the epicyclic approximation.
pub mod schwarzschild;

pub use schwarzschild::SchwarzschildDf;

use rand::Rng;

use crate::galmock_errors::GalmockError;
use crate::phase_space::PlanarState;

pub trait DistributionSampler {
    /// Draw `n` independent planar states.
    ///
    /// Arguments
    /// -----------------
    /// * `n`: number of draws.
    /// * `r_range`: optional closed radius interval, in natural length units.
    /// * `rng`: caller-provided random source.
    ///
    /// Return
    /// ----------
    /// * `n` states, or `Err(GalmockError::SamplingFailure)` when the model cannot
    ///   produce them.
    fn sample<R: Rng + ?Sized>(
        &self,
        n: usize,
        r_range: Option<(f64, f64)>,
        rng: &mut R,
    ) -> Result<Vec<PlanarState>, GalmockError>;
}
