//! # Axisymmetric gravitational potentials
//!
//! Potentials are expressed in natural units (G = 1, `ro = vo = 1`) and are evaluated at
//! cylindrical coordinates `(R, z)`. Each component can be **normalised** the usual way:
//! a component with normalisation `f` contributes a fraction `f` of `vc²` at `R = 1`, so a
//! composite whose fractions sum to one has `vc(1) = 1`.
//!
//! Components
//! -----------------
//! * [`MiyamotoNagai`] – flattened disk.
//! * [`Nfw`] – dark halo.
//! * [`PowerSphericalCutoff`] – power-law bulge with a Gaussian cutoff.
//! * [`CompositePotential`] – sum of boxed components, see [`mw_potential_2014`].
pub mod miyamoto_nagai;
pub mod nfw;
pub mod power_spherical_cutoff;

pub use miyamoto_nagai::MiyamotoNagai;
pub use nfw::Nfw;
pub use power_spherical_cutoff::PowerSphericalCutoff;

use crate::galmock_errors::GalmockError;

pub trait Potential {
    /// Potential Φ(R, z).
    fn potential(&self, r: f64, z: f64) -> f64;

    /// Radial force −∂Φ/∂R.
    fn r_force(&self, r: f64, z: f64) -> f64;

    /// Vertical force −∂Φ/∂z.
    fn z_force(&self, r: f64, z: f64) -> f64;

    /// Circular velocity in the midplane, `vc(R) = sqrt(−R F_R(R, 0))`.
    fn circular_velocity(&self, r: f64) -> f64 {
        (-r * self.r_force(r, 0.0)).max(0.0).sqrt()
    }
}

/// Amplitude that makes a unit-amplitude component contribute `fraction` of `vc²(R = 1)`.
///
/// Return
/// ------
/// * `Err(GalmockError::InvalidParameter)` for a non-positive fraction or a component
///   that exerts no attractive force at `R = 1`.
pub(crate) fn normalized_amplitude(
    fraction: f64,
    unit_r_force_at_one: f64,
) -> Result<f64, GalmockError> {
    if !(fraction.is_finite() && fraction > 0.0) {
        return Err(GalmockError::InvalidParameter(format!(
            "potential normalisation must be > 0, got {fraction}"
        )));
    }
    if !(unit_r_force_at_one.is_finite() && unit_r_force_at_one < 0.0) {
        return Err(GalmockError::InvalidParameter(
            "potential component is not attractive at R = 1".into(),
        ));
    }
    Ok(fraction / -unit_r_force_at_one)
}

/// Sum of several potential components.
#[derive(Default)]
pub struct CompositePotential {
    components: Vec<Box<dyn Potential + Send + Sync>>,
}

impl CompositePotential {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, component: impl Potential + Send + Sync + 'static) -> Self {
        self.components.push(Box::new(component));
        self
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl Potential for CompositePotential {
    fn potential(&self, r: f64, z: f64) -> f64 {
        self.components.iter().map(|c| c.potential(r, z)).sum()
    }

    fn r_force(&self, r: f64, z: f64) -> f64 {
        self.components.iter().map(|c| c.r_force(r, z)).sum()
    }

    fn z_force(&self, r: f64, z: f64) -> f64 {
        self.components.iter().map(|c| c.z_force(r, z)).sum()
    }
}

/// Three-component Milky Way model (Bovy 2015) in natural units (`ro` = 8 kpc, `vo` = 220 km/s).
///
/// * bulge: power law α = 1.8 with cutoff radius 1.9 kpc, 5% of vc²(R₀),
/// * disk: Miyamoto–Nagai a = 3 kpc, b = 280 pc, 60%,
/// * halo: NFW with scale radius 16 kpc, 35%.
pub fn mw_potential_2014() -> Result<CompositePotential, GalmockError> {
    Ok(CompositePotential::new()
        .with(PowerSphericalCutoff::normalized(1.8, 1.9 / 8.0, 0.05)?)
        .with(MiyamotoNagai::normalized(3.0 / 8.0, 0.28 / 8.0, 0.6)?)
        .with(Nfw::normalized(16.0 / 8.0, 0.35)?))
}
