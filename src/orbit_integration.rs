//! # Orbit integration
//!
//! An [`OrbitIntegrator`] advances an axisymmetric [`OrbitState`] through a fixed potential
//! and reports the state at every point of a monotonically increasing time grid.
//!
//! The built-in [`Rk4Integrator`] uses the classical fourth-order Runge–Kutta scheme on
//! `(R, vR, z, vz)`. The angular momentum `L = R vT` is an exact invariant of an
//! axisymmetric potential, so it is carried as a constant and `vT = L / R` is recomputed
//! after each step.
//!
//! ```text
//! dR/dt  = vR            dvR/dt = L²/R³ + F_R(R, z)
//! dz/dt  = vz            dvz/dt = F_z(R, z)
//! ```
use crate::galmock_errors::GalmockError;
use crate::phase_space::OrbitState;
use crate::potential::Potential;

pub trait OrbitIntegrator {
    /// Integrate `initial` over `times` (first entry = time of `initial`).
    ///
    /// Return
    /// ------
    /// * One state per time-grid point, the first one being `initial`.
    /// * `Err(GalmockError::IntegrationFailure)` if the orbit leaves the valid domain.
    fn integrate(&self, initial: &OrbitState, times: &[f64]) -> Result<Vec<OrbitState>, GalmockError>;

    /// Final state of the integration, the only part consumed by the sample generator.
    fn integrate_to_end(&self, initial: &OrbitState, times: &[f64]) -> Result<OrbitState, GalmockError> {
        self.integrate(initial, times)?
            .pop()
            .ok_or_else(|| GalmockError::IntegrationFailure("empty time grid".into()))
    }
}

/// `n` evenly spaced values over `[start, stop]`, both ends included.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { stop } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Fixed-step RK4 integrator with `substeps` steps between two output points.
#[derive(Debug, Clone)]
pub struct Rk4Integrator<P> {
    potential: P,
    substeps: usize,
}

/// Reduced state `(R, vR, z, vz)`.
type Reduced = [f64; 4];

impl<P: Potential> Rk4Integrator<P> {
    pub fn new(potential: P, substeps: usize) -> Self {
        Rk4Integrator {
            potential,
            substeps: substeps.max(1),
        }
    }

    pub fn potential(&self) -> &P {
        &self.potential
    }

    #[inline]
    fn rhs(&self, s: &Reduced, l: f64) -> Reduced {
        let [r, v_r, z, v_z] = *s;
        [
            v_r,
            l * l / (r * r * r) + self.potential.r_force(r, z),
            v_z,
            self.potential.z_force(r, z),
        ]
    }

    fn rk4_step(&self, s: &mut Reduced, l: f64, dt: f64) {
        let add = |a: &Reduced, k: &Reduced, h: f64| -> Reduced {
            std::array::from_fn(|i| a[i] + h * k[i])
        };

        let k1 = self.rhs(s, l);
        let k2 = self.rhs(&add(s, &k1, 0.5 * dt), l);
        let k3 = self.rhs(&add(s, &k2, 0.5 * dt), l);
        let k4 = self.rhs(&add(s, &k3, dt), l);

        for i in 0..4 {
            s[i] += dt * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]) / 6.0;
        }
    }
}

impl<P: Potential> OrbitIntegrator for Rk4Integrator<P> {
    fn integrate(&self, initial: &OrbitState, times: &[f64]) -> Result<Vec<OrbitState>, GalmockError> {
        if !initial.is_finite() || initial.r <= 0.0 {
            return Err(GalmockError::IntegrationFailure(format!(
                "invalid initial state {initial:?}"
            )));
        }
        if times.windows(2).any(|w| !(w[1] > w[0])) {
            return Err(GalmockError::IntegrationFailure(
                "time grid must be strictly increasing".into(),
            ));
        }

        let l = initial.angular_momentum();
        let mut state: Reduced = [initial.r, initial.v_r, initial.z, initial.v_z];
        let mut trajectory = Vec::with_capacity(times.len());
        if times.is_empty() {
            return Ok(trajectory);
        }
        trajectory.push(*initial);

        for w in times.windows(2) {
            let dt = (w[1] - w[0]) / self.substeps as f64;
            for _ in 0..self.substeps {
                self.rk4_step(&mut state, l, dt);
            }

            let [r, v_r, z, v_z] = state;
            let current = OrbitState {
                r,
                v_r,
                v_t: l / r,
                z,
                v_z,
            };
            if !current.is_finite() || r <= 0.0 {
                return Err(GalmockError::IntegrationFailure(format!(
                    "orbit left the valid domain at t = {}: {current:?}",
                    w[1]
                )));
            }
            trajectory.push(current);
        }

        Ok(trajectory)
    }
}

#[cfg(test)]
mod orbit_integration_test {
    use super::*;
    use crate::potential::{mw_potential_2014, CompositePotential};
    use approx::assert_relative_eq;

    fn energy(pot: &CompositePotential, s: &OrbitState) -> f64 {
        0.5 * (s.v_r * s.v_r + s.v_t * s.v_t + s.v_z * s.v_z) + pot.potential(s.r, s.z)
    }

    #[test]
    fn test_linspace() {
        let t = linspace(0.0, 1.0, 5);
        assert_eq!(t, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(2.0, 3.0, 1), vec![2.0]);
    }

    #[test]
    fn test_circular_orbit_stays_circular() {
        let integrator = Rk4Integrator::new(mw_potential_2014().unwrap(), 10);
        let initial = OrbitState {
            r: 1.0,
            v_r: 0.0,
            v_t: 1.0,
            z: 0.0,
            v_z: 0.0,
        };
        let times = linspace(0.0, 10.0, 50);
        let end = integrator.integrate_to_end(&initial, &times).unwrap();
        assert_relative_eq!(end.r, 1.0, epsilon = 1e-8);
        assert_relative_eq!(end.v_r, 0.0, epsilon = 1e-8);
        assert_eq!(end.z, 0.0);
    }

    #[test]
    fn test_energy_and_angular_momentum_conserved() {
        let pot = mw_potential_2014().unwrap();
        let initial = OrbitState {
            r: 0.9,
            v_r: 0.15,
            v_t: 0.95,
            z: 0.0,
            v_z: 0.1,
        };
        let e0 = energy(&pot, &initial);
        let integrator = Rk4Integrator::new(pot, 10);

        let times = linspace(0.0, 28.0, 100);
        let orbit = integrator.integrate(&initial, &times).unwrap();
        assert_eq!(orbit.len(), 100);
        assert_eq!(orbit[0], initial);

        for s in &orbit {
            assert_relative_eq!(s.angular_momentum(), initial.angular_momentum(), epsilon = 1e-12);
            assert_relative_eq!(energy(integrator.potential(), s), e0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_invalid_inputs() {
        let integrator = Rk4Integrator::new(mw_potential_2014().unwrap(), 1);
        let bad = OrbitState {
            r: -1.0,
            v_r: 0.0,
            v_t: 1.0,
            z: 0.0,
            v_z: 0.0,
        };
        assert!(integrator.integrate(&bad, &[0.0, 1.0]).is_err());

        let good = OrbitState { r: 1.0, ..bad };
        assert!(integrator.integrate(&good, &[0.0, 0.0]).is_err());
        assert!(integrator.integrate(&good, &[]).unwrap().is_empty());
        assert!(matches!(
            integrator.integrate_to_end(&good, &[]),
            Err(GalmockError::IntegrationFailure(_))
        ));
    }
}
