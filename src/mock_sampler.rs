//! # Mock sampler
//!
//! [`MockSampler`] is the entry point of the crate: it owns a [`SampleGenerator`] and a
//! [`SampleCache`] and serves batches of rectangular `(x, y, z, vx, vy, vz)` samples in
//! physical units (kpc, km/s).
//!
//! ## Workflow
//!
//! ```text
//! load_samples(n, phi_range, r_range)
//!   ├─ cache hit  → read file, return
//!   └─ cache miss → generate → distribute over φ → convert to kpc, km/s → store → return
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use galmock::constants::DPI;
//! use galmock::mock_sampler::MockSampler;
//! use galmock::params::SamplingParams;
//! use galmock::sample_cache::SampleCache;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let sampler = MockSampler::with_defaults(SamplingParams::default(), SampleCache::default())?;
//! let mut rng = StdRng::seed_from_u64(42);
//! let batch = sampler.load_samples(1000, (0.0, DPI), Some((6.0, 10.0)), &mut rng)?;
//! assert_eq!(batch.len(), 1000);
//! # Ok::<(), galmock::galmock_errors::GalmockError>(())
//! ```
use rand::Rng;
use tracing::info;

use crate::azimuth::distribute_over_phi_range;
use crate::constants::{PhiRange, RadialRange};
use crate::distribution_function::{DistributionSampler, SchwarzschildDf};
use crate::galmock_errors::GalmockError;
use crate::orbit_integration::{OrbitIntegrator, Rk4Integrator};
use crate::params::SamplingParams;
use crate::phase_space::SampleBatch;
use crate::potential::{mw_potential_2014, CompositePotential};
use crate::sample_cache::{SampleCache, SampleKey};
use crate::sample_generator::SampleGenerator;

/// The built-in model: a Schwarzschild disc integrated in the Milky-Way-like potential.
pub type DefaultMockSampler = MockSampler<SchwarzschildDf, Rk4Integrator<CompositePotential>>;

pub struct MockSampler<D, I> {
    generator: SampleGenerator<D, I>,
    cache: SampleCache,
}

impl DefaultMockSampler {
    /// Build the default model with `params`, persisting batches in `cache`.
    pub fn with_defaults(params: SamplingParams, cache: SampleCache) -> Result<Self, GalmockError> {
        let integrator = Rk4Integrator::new(mw_potential_2014()?, params.substeps);
        Ok(MockSampler::new(
            SampleGenerator::new(SchwarzschildDf::default(), integrator, params),
            cache,
        ))
    }
}

impl<D, I> MockSampler<D, I>
where
    D: DistributionSampler,
    I: OrbitIntegrator,
{
    pub fn new(generator: SampleGenerator<D, I>, cache: SampleCache) -> Self {
        MockSampler { generator, cache }
    }

    pub fn generator(&self) -> &SampleGenerator<D, I> {
        &self.generator
    }

    pub fn cache(&self) -> &SampleCache {
        &self.cache
    }

    /// Generate a fresh batch for `key`, persist it, and return it.
    ///
    /// Any existing file for the key is replaced.
    pub fn generate_sample_data<R: Rng + ?Sized>(
        &self,
        key: &SampleKey,
        rng: &mut R,
    ) -> Result<SampleBatch, GalmockError> {
        let params = self.generator.params();
        let integrated = self.generator.get_samples_with_z(key.n, key.r_range, rng)?;
        let distributed = distribute_over_phi_range(&integrated, key.phi_range, rng)?;
        let batch = SampleBatch::from_phase_space(&distributed, params.ro_kpc, params.vo_kms);

        let path = self.cache.store(key, &batch)?;
        info!(%path, rows = batch.len(), "sample batch generated");
        Ok(batch)
    }

    /// Return `n` samples for the given ranges, generating and caching them on first use.
    ///
    /// Arguments
    /// -----------------
    /// * `n`: number of samples, at least 1.
    /// * `phi_range`: azimuthal range in radians, `lo < hi`.
    /// * `r_range`: optional galactocentric radius range in kpc, `0 <= lo < hi`.
    /// * `rng`: random source, only used on a cache miss.
    ///
    /// Return
    /// ----------
    /// * An `n × 6` batch `(x, y, z, vx, vy, vz)` in kpc and km/s.
    /// * `Err(GalmockError::CacheCorruption)` if an existing file for the key is unreadable;
    ///   the file is left in place.
    pub fn load_samples<R: Rng + ?Sized>(
        &self,
        n: usize,
        phi_range: PhiRange,
        r_range: Option<RadialRange>,
        rng: &mut R,
    ) -> Result<SampleBatch, GalmockError> {
        let key = SampleKey::new(n, phi_range, r_range)?;
        self.load_key(&key, rng)
    }

    /// Same as [`MockSampler::load_samples`], for an already validated key.
    pub fn load_key<R: Rng + ?Sized>(
        &self,
        key: &SampleKey,
        rng: &mut R,
    ) -> Result<SampleBatch, GalmockError> {
        if let Some(batch) = self.cache.load(key)? {
            info!(file = %key.file_name(), "loaded cached samples");
            return Ok(batch);
        }
        info!(file = %key.file_name(), "no cached samples, generating");
        self.generate_sample_data(key, rng)
    }
}
