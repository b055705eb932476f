use super::{normalized_amplitude, Potential};
use crate::galmock_errors::GalmockError;

/// Miyamoto–Nagai disk, Φ = −amp / sqrt(R² + (a + sqrt(z² + b²))²).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MiyamotoNagai {
    pub amp: f64,
    pub a: f64,
    pub b: f64,
}

impl MiyamotoNagai {
    pub fn new(amp: f64, a: f64, b: f64) -> Self {
        MiyamotoNagai { amp, a, b }
    }

    /// Disk contributing `fraction` of `vc²` at `R = 1`.
    pub fn normalized(a: f64, b: f64, fraction: f64) -> Result<Self, GalmockError> {
        let unit = MiyamotoNagai::new(1.0, a, b);
        let amp = normalized_amplitude(fraction, unit.r_force(1.0, 0.0))?;
        Ok(MiyamotoNagai::new(amp, a, b))
    }

    #[inline]
    fn zb(&self, z: f64) -> f64 {
        (z * z + self.b * self.b).sqrt()
    }
}

impl Potential for MiyamotoNagai {
    fn potential(&self, r: f64, z: f64) -> f64 {
        let s = self.a + self.zb(z);
        -self.amp / (r * r + s * s).sqrt()
    }

    fn r_force(&self, r: f64, z: f64) -> f64 {
        let s = self.a + self.zb(z);
        -self.amp * r / (r * r + s * s).powf(1.5)
    }

    fn z_force(&self, r: f64, z: f64) -> f64 {
        let zb = self.zb(z);
        let s = self.a + zb;
        -self.amp * z * s / (zb * (r * r + s * s).powf(1.5))
    }
}

#[cfg(test)]
mod miyamoto_nagai_test {
    use super::*;
    use crate::potential::potential_test::assert_forces_match_gradient;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalized_disk() {
        let disk = MiyamotoNagai::normalized(0.375, 0.035, 0.6).unwrap();
        assert_relative_eq!(disk.circular_velocity(1.0).powi(2), 0.6, epsilon = 1e-12);
        assert_forces_match_gradient(&disk, 1.2, 0.05);
        // symmetric about the midplane
        assert_relative_eq!(disk.z_force(1.0, 0.2), -disk.z_force(1.0, -0.2));
        assert_eq!(disk.z_force(1.0, 0.0), 0.0);
    }
}
