#![allow(dead_code)]

use camino::Utf8PathBuf;
use galmock::distribution_function::DistributionSampler;
use galmock::galmock_errors::GalmockError;
use galmock::mock_sampler::MockSampler;
use galmock::orbit_integration::OrbitIntegrator;
use galmock::params::SamplingParams;
use galmock::phase_space::{OrbitState, PlanarState};
use galmock::sample_cache::SampleCache;
use galmock::sample_generator::SampleGenerator;
use rand::Rng;
use tempfile::TempDir;

/// Sampler drawing radii uniformly in the requested range (or in [0.5, 1.5]) with small
/// random velocities around a flat rotation curve.
pub struct UniformDiscSampler;

impl DistributionSampler for UniformDiscSampler {
    fn sample<R: Rng + ?Sized>(
        &self,
        n: usize,
        r_range: Option<(f64, f64)>,
        rng: &mut R,
    ) -> Result<Vec<PlanarState>, GalmockError> {
        let (lo, hi) = r_range.unwrap_or((0.5, 1.5));
        Ok((0..n)
            .map(|_| PlanarState {
                r: rng.random_range(lo..hi),
                v_r: rng.random_range(-0.1..0.1),
                v_t: 1.0 + rng.random_range(-0.05..0.05),
            })
            .collect())
    }
}

/// Integrator returning the initial state at every output time.
pub struct FrozenIntegrator;

impl OrbitIntegrator for FrozenIntegrator {
    fn integrate(
        &self,
        initial: &OrbitState,
        times: &[f64],
    ) -> Result<Vec<OrbitState>, GalmockError> {
        Ok(vec![*initial; times.len()])
    }
}

pub type StubMockSampler = MockSampler<UniformDiscSampler, FrozenIntegrator>;

/// Fresh temporary cache directory; keep the guard alive for the duration of the test.
pub fn temp_cache() -> (TempDir, SampleCache) {
    let dir = tempfile::tempdir().expect("temporary directory");
    let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("UTF-8 temp path");
    (dir, SampleCache::new(path))
}

pub fn stub_mock_sampler(cache: SampleCache) -> StubMockSampler {
    MockSampler::new(
        SampleGenerator::new(UniformDiscSampler, FrozenIntegrator, SamplingParams::default()),
        cache,
    )
}
