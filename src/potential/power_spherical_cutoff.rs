use std::f64::consts::PI;

use super::{normalized_amplitude, Potential};
use crate::galmock_errors::GalmockError;
use crate::special::{lower_gamma, upper_gamma};

/// Spherical power-law density with a Gaussian cutoff, ρ = amp r^−α exp(−(r/rc)²).
///
/// The enclosed mass is `M(r) = 2π amp rc^(3−α) γ(3/2 − α/2, (r/rc)²)` and the potential
/// adds the contribution of the outer shells through the upper incomplete gamma function.
/// Requires `α < 2` so that the outer-shell integral converges at the centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerSphericalCutoff {
    pub amp: f64,
    pub alpha: f64,
    pub rc: f64,
}

impl PowerSphericalCutoff {
    pub fn new(amp: f64, alpha: f64, rc: f64) -> Result<Self, GalmockError> {
        if !(alpha.is_finite() && alpha < 2.0) {
            return Err(GalmockError::InvalidParameter(format!(
                "power-law slope must be < 2, got {alpha}"
            )));
        }
        if !(rc.is_finite() && rc > 0.0) {
            return Err(GalmockError::InvalidParameter(format!(
                "cutoff radius must be > 0, got {rc}"
            )));
        }
        Ok(PowerSphericalCutoff { amp, alpha, rc })
    }

    /// Bulge contributing `fraction` of `vc²` at `R = 1`.
    pub fn normalized(alpha: f64, rc: f64, fraction: f64) -> Result<Self, GalmockError> {
        let unit = PowerSphericalCutoff::new(1.0, alpha, rc)?;
        let amp = normalized_amplitude(fraction, unit.r_force(1.0, 0.0))?;
        PowerSphericalCutoff::new(amp, alpha, rc)
    }

    fn enclosed_mass(&self, r_sph: f64) -> f64 {
        let x = (r_sph / self.rc).powi(2);
        2.0 * PI * self.amp * self.rc.powf(3.0 - self.alpha) * lower_gamma(1.5 - 0.5 * self.alpha, x)
    }

    fn spherical_force(&self, r_sph: f64) -> f64 {
        -self.enclosed_mass(r_sph) / (r_sph * r_sph)
    }
}

impl Potential for PowerSphericalCutoff {
    fn potential(&self, r: f64, z: f64) -> f64 {
        let r_sph = r.hypot(z);
        let x = (r_sph / self.rc).powi(2);
        let outer = 2.0 * PI * self.amp * self.rc.powf(2.0 - self.alpha) * upper_gamma(1.0 - 0.5 * self.alpha, x);
        if r_sph == 0.0 {
            return -outer;
        }
        -self.enclosed_mass(r_sph) / r_sph - outer
    }

    fn r_force(&self, r: f64, z: f64) -> f64 {
        let r_sph = r.hypot(z);
        if r_sph == 0.0 {
            return 0.0;
        }
        self.spherical_force(r_sph) * r / r_sph
    }

    fn z_force(&self, r: f64, z: f64) -> f64 {
        let r_sph = r.hypot(z);
        if r_sph == 0.0 {
            return 0.0;
        }
        self.spherical_force(r_sph) * z / r_sph
    }
}
