//! Uniform distribution of integrated samples over an azimuthal range.
use rand::distr::{Distribution, Uniform};
use rand::Rng;

use crate::constants::PhiRange;
use crate::galmock_errors::GalmockError;
use crate::phase_space::{OrbitState, PhaseSpace};

/// Check that `phi_range` is a finite, non-empty interval.
pub fn validate_phi_range(phi_range: PhiRange) -> Result<(), GalmockError> {
    let (lo, hi) = phi_range;
    if !(lo.is_finite() && hi.is_finite() && lo < hi) {
        return Err(GalmockError::InvalidRange(format!(
            "phi range must satisfy lo < hi with finite bounds, got [{lo}, {hi})"
        )));
    }
    Ok(())
}

/// Attach an azimuth drawn uniformly from `[lo, hi)` to every sample.
///
/// Arguments
/// -----------------
/// * `samples`: integrated states, without azimuth.
/// * `phi_range`: azimuthal range in radians.
/// * `rng`: random source, one draw per sample.
///
/// Return
/// ----------
/// * The samples in their original order, each with its azimuth.
/// * `Err(GalmockError::InvalidRange)` if the range is empty or non-finite.
pub fn distribute_over_phi_range<R: Rng + ?Sized>(
    samples: &[OrbitState],
    phi_range: PhiRange,
    rng: &mut R,
) -> Result<Vec<PhaseSpace>, GalmockError> {
    validate_phi_range(phi_range)?;
    let phi = Uniform::new(phi_range.0, phi_range.1)
        .map_err(|e| GalmockError::InvalidRange(format!("{e:?}")))?;

    Ok(samples
        .iter()
        .map(|s| s.with_phi(phi.sample(rng)))
        .collect())
}
