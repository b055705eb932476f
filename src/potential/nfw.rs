use super::{normalized_amplitude, Potential};
use crate::galmock_errors::GalmockError;

/// Navarro–Frenk–White halo, Φ = −amp ln(1 + r/a) / r.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nfw {
    pub amp: f64,
    pub a: f64,
}

impl Nfw {
    pub fn new(amp: f64, a: f64) -> Self {
        Nfw { amp, a }
    }

    /// Halo contributing `fraction` of `vc²` at `R = 1`.
    pub fn normalized(a: f64, fraction: f64) -> Result<Self, GalmockError> {
        let unit = Nfw::new(1.0, a);
        let amp = normalized_amplitude(fraction, unit.r_force(1.0, 0.0))?;
        Ok(Nfw::new(amp, a))
    }

    /// Spherical force −dΦ/dr.
    fn spherical_force(&self, r_sph: f64) -> f64 {
        // small-radius limit of ln(1+x)/r² − 1/(r(a+r)) is 1/(2a²)
        if r_sph < 1e-8 * self.a {
            return -self.amp / (2.0 * self.a * self.a);
        }
        let d_phi = (r_sph / self.a).ln_1p() / (r_sph * r_sph) - 1.0 / (r_sph * (self.a + r_sph));
        -self.amp * d_phi
    }
}

impl Potential for Nfw {
    fn potential(&self, r: f64, z: f64) -> f64 {
        let r_sph = r.hypot(z);
        if r_sph == 0.0 {
            return -self.amp / self.a;
        }
        -self.amp * (r_sph / self.a).ln_1p() / r_sph
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

#[cfg(test)]
mod nfw_test {
    use super::*;
    use crate::potential::potential_test::assert_forces_match_gradient;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalized_halo() {
        let halo = Nfw::normalized(2.0, 0.35).unwrap();
        assert_relative_eq!(halo.circular_velocity(1.0).powi(2), 0.35, epsilon = 1e-12);
        assert_forces_match_gradient(&halo, 0.8, 0.4);
        assert_eq!(halo.r_force(0.0, 0.0), 0.0);
    }
}
