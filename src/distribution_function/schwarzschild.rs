//! Warm exponential disk with a Schwarzschild (Gaussian) velocity ellipsoid.
//!
//! Surface density and radial dispersion follow exponential profiles,
//!
//! ```text
//! Σ(R)   ∝ exp(−R / h_R)
//! σR(R)  = σ0 exp(−(R − 1) / h_σ)
//! ```
//!
//! in a flat rotation curve `vc = 1`. Radii are drawn from the surface-mass pdf
//! `R Σ(R)`, i.e. a Gamma(2, h_R) law. Velocities are drawn from
//!
//! ```text
//! vR ~ N(0, σR)
//! vT ~ N(v̄T, σR / √2)      (epicyclic ratio σT²/σR² = κ²/4Ω² = 1/2)
//! v̄T² = vc² − σR² (R/h_R + 2R/h_σ − 1/2)
//! ```
//!
//! where the mean rotation comes from the asymmetric-drift Jeans equation.
use rand::Rng;
use rand_distr::{Distribution, Gamma, Normal};
use std::f64::consts::FRAC_1_SQRT_2;

use super::DistributionSampler;
use crate::galmock_errors::GalmockError;
use crate::phase_space::PlanarState;

/// Maximum number of radius proposals per accepted draw before giving up.
const MAX_PROPOSALS_PER_DRAW: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchwarzschildDf {
    /// Surface-density scale length.
    pub h_r: f64,
    /// Scale length of the radial velocity dispersion.
    pub h_sigma: f64,
    /// Radial velocity dispersion at `R = 1`.
    pub sigma_r0: f64,
}

impl Default for SchwarzschildDf {
    fn default() -> Self {
        SchwarzschildDf {
            h_r: 1.0 / 3.0,
            h_sigma: 1.0,
            sigma_r0: 0.2,
        }
    }
}

impl SchwarzschildDf {
    pub fn new(h_r: f64, h_sigma: f64, sigma_r0: f64) -> Result<Self, GalmockError> {
        for (name, v) in [("h_r", h_r), ("h_sigma", h_sigma), ("sigma_r0", sigma_r0)] {
            if !(v.is_finite() && v > 0.0) {
                return Err(GalmockError::InvalidParameter(format!(
                    "{name} must be > 0, got {v}"
                )));
            }
        }
        Ok(SchwarzschildDf {
            h_r,
            h_sigma,
            sigma_r0,
        })
    }

    pub fn sigma_r(&self, r: f64) -> f64 {
        self.sigma_r0 * (-(r - 1.0) / self.h_sigma).exp()
    }

    /// Mean rotation velocity from the asymmetric drift, clamped at zero.
    pub fn mean_v_t(&self, r: f64) -> f64 {
        let sigma2 = self.sigma_r(r).powi(2);
        let drift = sigma2 * (r / self.h_r + 2.0 * r / self.h_sigma - 0.5);
        (1.0 - drift).max(0.0).sqrt()
    }

    fn draw_radius<R: Rng + ?Sized>(
        &self,
        radius: &Gamma<f64>,
        r_range: Option<(f64, f64)>,
        rng: &mut R,
    ) -> Result<f64, GalmockError> {
        let Some((lo, hi)) = r_range else {
            return Ok(radius.sample(rng));
        };
        for _ in 0..MAX_PROPOSALS_PER_DRAW {
            let r = radius.sample(rng);
            if (lo..=hi).contains(&r) {
                return Ok(r);
            }
        }
        Err(GalmockError::SamplingFailure(format!(
            "no radius accepted in [{lo}, {hi}] after {MAX_PROPOSALS_PER_DRAW} proposals"
        )))
    }
}

impl DistributionSampler for SchwarzschildDf {
    fn sample<R: Rng + ?Sized>(
        &self,
        n: usize,
        r_range: Option<(f64, f64)>,
        rng: &mut R,
    ) -> Result<Vec<PlanarState>, GalmockError> {
        let radius = Gamma::new(2.0, self.h_r)?;

        (0..n)
            .map(|_| -> Result<PlanarState, GalmockError> {
                let r = self.draw_radius(&radius, r_range, rng)?;
                let sigma = self.sigma_r(r);
                let v_r = Normal::new(0.0, sigma)?.sample(rng);
                let v_t = Normal::new(self.mean_v_t(r), sigma * FRAC_1_SQRT_2)?.sample(rng);
                Ok(PlanarState { r, v_r, v_t })
            })
            .collect()
    }
}

#[cfg(test)]
mod schwarzschild_test {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_draws_respect_radius_range() {
        let df = SchwarzschildDf::default();
        let mut rng = StdRng::seed_from_u64(42_u64);
        let draws = df.sample(2_000, Some((0.875, 1.125)), &mut rng).unwrap();

        assert_eq!(draws.len(), 2_000);
        assert!(draws.iter().all(|s| (0.875..=1.125).contains(&s.r)));

        let n = draws.len() as f64;
        let mean_v_r = draws.iter().map(|s| s.v_r).sum::<f64>() / n;
        let mean_v_t = draws.iter().map(|s| s.v_t).sum::<f64>() / n;
        // σR ≈ 0.2 so the standard error of the mean is ≈ 0.0045
        assert_relative_eq!(mean_v_r, 0.0, epsilon = 0.02);
        assert_relative_eq!(mean_v_t, df.mean_v_t(1.0), epsilon = 0.03);
    }

    #[test]
    fn test_unrestricted_mean_radius() {
        let df = SchwarzschildDf::default();
        let mut rng = StdRng::seed_from_u64(7_u64);
        let draws = df.sample(20_000, None, &mut rng).unwrap();
        let mean_r = draws.iter().map(|s| s.r).sum::<f64>() / draws.len() as f64;
        // Gamma(2, h) has mean 2h
        assert_relative_eq!(mean_r, 2.0 / 3.0, epsilon = 0.01);
    }

    #[test]
    fn test_unreachable_range_fails() {
        let df = SchwarzschildDf::default();
        let mut rng = StdRng::seed_from_u64(1_u64);
        let err = df.sample(1, Some((1e3, 1e3 + 1e-9)), &mut rng).unwrap_err();
        assert!(matches!(err, GalmockError::SamplingFailure(_)));
    }

    #[test]
    fn test_invalid_profile() {
        assert!(SchwarzschildDf::new(0.0, 1.0, 0.2).is_err());
        assert!(SchwarzschildDf::new(1.0 / 3.0, 1.0, f64::NAN).is_err());
    }
}
