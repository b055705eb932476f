//! # Sampling pipeline parameters
//!
//! This module defines [`SamplingParams`], the configuration struct shared by the
//! sample generator, the ETA estimator and the unit conversion of the sample cache,
//! together with its validating builder [`SamplingParamsBuilder`].
//!
//! ## Example
//!
//! ```rust
//! use galmock::params::SamplingParams;
//!
//! let params = SamplingParams::builder()
//!     .integration_time_gyr(0.5)
//!     .integration_steps(200)
//!     .substeps(4)
//!     .build()
//!     .unwrap();
//! assert_eq!(params.integration_steps, 200);
//! ```
use std::cmp::Ordering::Greater;

use serde::{Deserialize, Serialize};

use crate::constants::{time_in_gyr, Gyr, KmPerSec, Kpc, RO_KPC, VO_KMS};
use crate::galmock_errors::GalmockError;

/// Deserialized values go through [`SamplingParamsBuilder::build`]; missing fields take
/// their default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedParams")]
pub struct SamplingParams {
    // --- Orbit integration ---
    /// Length of the orbit integration, in Gyr.
    pub integration_time_gyr: Gyr,
    /// Number of points of the output time grid (first and last included).
    pub integration_steps: usize,
    /// RK4 steps taken between two consecutive output grid points.
    pub substeps: usize,

    // --- Completion time estimation ---
    /// Batches with at least this many samples get an estimated completion time.
    pub eta_threshold: usize,
    /// Number of draws/orbits timed by each ETA trial.
    pub eta_trial_size: usize,

    // --- Unit system ---
    pub ro_kpc: Kpc,
    pub vo_kms: KmPerSec,
}

impl SamplingParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new [`SamplingParamsBuilder`] initialized with the default values.
    pub fn builder() -> SamplingParamsBuilder {
        SamplingParamsBuilder::new()
    }

    /// Integration length converted to natural time units.
    pub fn integration_time_natural(&self) -> f64 {
        self.integration_time_gyr / time_in_gyr(self.ro_kpc, self.vo_kms)
    }
}

impl Default for SamplingParams {
    fn default() -> Self {
        SamplingParams {
            integration_time_gyr: 1.0,
            integration_steps: 100,
            substeps: 10,

            eta_threshold: 1000,
            eta_trial_size: 100,

            ro_kpc: RO_KPC,
            vo_kms: VO_KMS,
        }
    }
}

/// Raw deserialized form of [`SamplingParams`], before validation.
#[derive(Deserialize)]
#[serde(default)]
struct UncheckedParams {
    integration_time_gyr: Gyr,
    integration_steps: usize,
    substeps: usize,
    eta_threshold: usize,
    eta_trial_size: usize,
    ro_kpc: Kpc,
    vo_kms: KmPerSec,
}

impl Default for UncheckedParams {
    fn default() -> Self {
        let p = SamplingParams::default();
        UncheckedParams {
            integration_time_gyr: p.integration_time_gyr,
            integration_steps: p.integration_steps,
            substeps: p.substeps,
            eta_threshold: p.eta_threshold,
            eta_trial_size: p.eta_trial_size,
            ro_kpc: p.ro_kpc,
            vo_kms: p.vo_kms,
        }
    }
}

impl TryFrom<UncheckedParams> for SamplingParams {
    type Error = GalmockError;

    fn try_from(raw: UncheckedParams) -> Result<Self, Self::Error> {
        SamplingParams::builder()
            .integration_time_gyr(raw.integration_time_gyr)
            .integration_steps(raw.integration_steps)
            .substeps(raw.substeps)
            .eta_threshold(raw.eta_threshold)
            .eta_trial_size(raw.eta_trial_size)
            .ro_kpc(raw.ro_kpc)
            .vo_kms(raw.vo_kms)
            .build()
    }
}

/// Builder for [`SamplingParams`], with validation.
#[derive(Debug, Clone)]
pub struct SamplingParamsBuilder {
    params: SamplingParams,
}

impl Default for SamplingParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SamplingParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: SamplingParams::default(),
        }
    }

    pub fn integration_time_gyr(mut self, v: Gyr) -> Self {
        self.params.integration_time_gyr = v;
        self
    }
    pub fn integration_steps(mut self, v: usize) -> Self {
        self.params.integration_steps = v;
        self
    }
    pub fn substeps(mut self, v: usize) -> Self {
        self.params.substeps = v;
        self
    }
    pub fn eta_threshold(mut self, v: usize) -> Self {
        self.params.eta_threshold = v;
        self
    }
    pub fn eta_trial_size(mut self, v: usize) -> Self {
        self.params.eta_trial_size = v;
        self
    }
    pub fn ro_kpc(mut self, v: Kpc) -> Self {
        self.params.ro_kpc = v;
        self
    }
    pub fn vo_kms(mut self, v: KmPerSec) -> Self {
        self.params.vo_kms = v;
        self
    }

    /// Return true iff x > 0.0 and finite.
    #[inline]
    fn gt0(x: f64) -> bool {
        x.is_finite() && x.partial_cmp(&0.0) == Some(Greater)
    }

    /// Finalize the builder and produce a [`SamplingParams`] instance.
    ///
    /// Validation rules
    /// -----------------
    /// * `integration_time_gyr > 0.0` and finite.
    /// * `integration_steps >= 2` – the time grid needs a start and an end point.
    /// * `substeps >= 1`, `eta_trial_size >= 1`.
    /// * `ro_kpc > 0.0`, `vo_kms > 0.0`.
    ///
    /// Returns
    /// -----------------
    /// * `Ok(SamplingParams)` if all values are valid.
    /// * `Err(GalmockError::InvalidParameter)` naming the first rejected field.
    pub fn build(self) -> Result<SamplingParams, GalmockError> {
        let p = &self.params;

        if !Self::gt0(p.integration_time_gyr) {
            return Err(GalmockError::InvalidParameter(
                "integration_time_gyr must be finite and > 0".into(),
            ));
        }
        if p.integration_steps < 2 {
            return Err(GalmockError::InvalidParameter(
                "integration_steps must be >= 2".into(),
            ));
        }
        if p.substeps == 0 {
            return Err(GalmockError::InvalidParameter(
                "substeps must be >= 1".into(),
            ));
        }
        if p.eta_trial_size == 0 {
            return Err(GalmockError::InvalidParameter(
                "eta_trial_size must be >= 1".into(),
            ));
        }
        if !Self::gt0(p.ro_kpc) || !Self::gt0(p.vo_kms) {
            return Err(GalmockError::InvalidParameter(
                "ro_kpc and vo_kms must be > 0".into(),
            ));
        }

        Ok(self.params)
    }
}

#[cfg(test)]
mod params_test {
    use super::*;
    use approx::assert_relative_eq;
    use serde::de::value::{self, MapDeserializer};

    #[test]
    fn test_default_params_are_valid() {
        let params = SamplingParams::builder().build().unwrap();
        assert_eq!(params, SamplingParams::default());
        // 1 Gyr is about 28.1 natural time units
        assert_relative_eq!(params.integration_time_natural(), 28.12, epsilon = 1e-2);
    }

    #[test]
    fn test_rejected_params() {
        let err = SamplingParams::builder()
            .integration_steps(1)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            GalmockError::InvalidParameter("integration_steps must be >= 2".into())
        );

        assert!(SamplingParams::builder()
            .integration_time_gyr(f64::NAN)
            .build()
            .is_err());
        assert!(SamplingParams::builder()
            .integration_time_gyr(0.0)
            .build()
            .is_err());
        assert!(SamplingParams::builder().substeps(0).build().is_err());
        assert!(SamplingParams::builder().vo_kms(0.0).build().is_err());
        assert!(SamplingParams::builder().eta_trial_size(0).build().is_err());
    }

    fn from_fields(fields: Vec<(&'static str, u64)>) -> Result<SamplingParams, value::Error> {
        SamplingParams::deserialize(MapDeserializer::<_, value::Error>::new(
            fields.into_iter(),
        ))
    }

    #[test]
    fn test_deserialize_validates() {
        let params = from_fields(vec![("integration_steps", 50), ("substeps", 2)]).unwrap();
        assert_eq!(params.integration_steps, 50);
        assert_eq!(params.substeps, 2);
        assert_eq!(params.eta_threshold, SamplingParams::default().eta_threshold);

        let err = from_fields(vec![("substeps", 0)]).unwrap_err();
        assert!(err.to_string().contains("substeps must be >= 1"), "{err}");
        assert!(from_fields(vec![("integration_steps", 0)]).is_err());
    }
}
