//! Redistribution of the in-plane radial kinetic energy between the `R` and `z` directions.
//!
//! A planar distribution function carries no vertical motion. To lift a draw out of the
//! plane, its radial kinetic energy `vR²/2` is split at a uniform random fraction into a
//! radial share and a vertical share. The radial velocity keeps its original sign; the
//! vertical velocity gets an independent random sign.
use rand::Rng;

/// Outcome of one kinetic-energy split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergySplit {
    /// Radial share of the kinetic energy.
    pub k_r: f64,
    /// Vertical share of the kinetic energy.
    pub k_z: f64,
    /// Radial velocity carrying `k_r`, same sign as the input velocity.
    pub v_r: f64,
    /// Vertical velocity carrying `k_z`, random sign.
    pub v_z: f64,
}

/// Split the kinetic energy of `v_r` between radial and vertical motion.
///
/// Arguments
/// -----------------
/// * `v_r`: radial velocity of the planar draw.
/// * `rng`: random source for the split fraction and the vertical direction.
///
/// Return
/// ----------
/// * An [`EnergySplit`] with `k_r + k_z == v_r² / 2`.
pub fn split_radial_energy<R: Rng + ?Sized>(v_r: f64, rng: &mut R) -> EnergySplit {
    let k_total = v_r * v_r / 2.0;
    let k_r = k_total * rng.random::<f64>();
    let k_z = k_total - k_r;

    let radial_sign = if v_r < 0.0 { -1.0 } else { 1.0 };
    let vertical_sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };

    EnergySplit {
        k_r,
        k_z,
        v_r: (2.0 * k_r).sqrt() * radial_sign,
        v_z: (2.0 * k_z).sqrt() * vertical_sign,
    }
}

#[cfg(test)]
mod energy_split_test {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_split_is_lossless() {
        let mut rng = StdRng::seed_from_u64(42_u64);
        for _ in 0..1_000 {
            let v_r = rng.random_range(-1.0..1.0);
            let split = split_radial_energy(v_r, &mut rng);

            assert_relative_eq!(split.k_r + split.k_z, v_r * v_r / 2.0, epsilon = 1e-15);
            assert!(split.k_r >= 0.0 && split.k_z >= 0.0);
            assert_relative_eq!(
                split.v_r * split.v_r + split.v_z * split.v_z,
                v_r * v_r,
                epsilon = 1e-14
            );
            if split.v_r != 0.0 {
                assert_eq!(split.v_r.signum(), v_r.signum());
            }
        }
    }

    #[test]
    fn test_vertical_direction_is_balanced() {
        let mut rng = StdRng::seed_from_u64(3_u64);
        let upward = (0..10_000)
            .filter(|_| split_radial_energy(0.3, &mut rng).v_z > 0.0)
            .count();
        // binomial(10 000, 1/2) has a standard deviation of 50
        assert!((4_800..=5_200).contains(&upward), "upward = {upward}");
    }

    #[test]
    fn test_zero_velocity() {
        let mut rng = StdRng::seed_from_u64(0_u64);
        let split = split_radial_energy(0.0, &mut rng);
        assert_eq!(split.k_r + split.k_z, 0.0);
        assert_eq!(split.v_r, 0.0);
        assert_eq!(split.v_z.abs(), 0.0);
    }
}
