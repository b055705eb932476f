//! # Mock sample generation
//!
//! [`SampleGenerator`] turns planar distribution-function draws into integrated 3-D states:
//!
//! 1. **Sampling** – `n` `(R, vR, vT)` triples are drawn from the distribution function,
//!    restricted to the requested radius range (converted from kpc to natural units).
//! 2. **Energy split** – each radial kinetic energy is shared between `R` and `z`
//!    (see [`crate::energy_split`]); the star starts in the midplane (`z = 0`).
//! 3. **Integration** – every state is integrated for `integration_time_gyr` over a grid
//!    of `integration_steps` points; only the final state is kept.
//!
//! For batches of at least `eta_threshold` samples, each expensive stage is preceded by
//! a completion-time estimate (see [`crate::eta`]). Estimation failures are logged and
//! ignored; sampling or integration failures abort the whole batch.
//!
//! All randomness comes from the caller-provided generator, so a seeded generator makes
//! batches reproducible.
use rand::Rng;
use tracing::{info, warn};

use crate::constants::RadialRange;
use crate::distribution_function::DistributionSampler;
use crate::energy_split::split_radial_energy;
use crate::eta::{average_integration_time, average_sample_time, estimate_completion_time};
use crate::galmock_errors::GalmockError;
use crate::orbit_integration::{linspace, OrbitIntegrator};
use crate::params::SamplingParams;
use crate::phase_space::{OrbitState, PlanarState};
use crate::progress_bar::fmt_dur;

#[cfg(feature = "progress")]
use crate::progress_bar::IterTimer;
#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};

/// Check that `r_range` is a finite, non-negative and non-empty radius interval.
pub fn validate_radial_range(r_range: RadialRange) -> Result<(), GalmockError> {
    let (lo, hi) = r_range;
    if !(lo.is_finite() && hi.is_finite() && lo >= 0.0 && lo < hi) {
        return Err(GalmockError::InvalidRange(format!(
            "radius range must satisfy 0 <= lo < hi with finite bounds, got [{lo}, {hi}]"
        )));
    }
    Ok(())
}

/// Lift planar draws out of the plane: split their radial energy and start them at `z = 0`.
pub fn lift_out_of_plane<R: Rng + ?Sized>(draws: &[PlanarState], rng: &mut R) -> Vec<OrbitState> {
    draws
        .iter()
        .map(|d| {
            let split = split_radial_energy(d.v_r, rng);
            OrbitState {
                r: d.r,
                v_r: split.v_r,
                v_t: d.v_t,
                z: 0.0,
                v_z: split.v_z,
            }
        })
        .collect()
}

pub struct SampleGenerator<D, I> {
    sampler: D,
    integrator: I,
    params: SamplingParams,
}

impl<D, I> SampleGenerator<D, I>
where
    D: DistributionSampler,
    I: OrbitIntegrator,
{
    pub fn new(sampler: D, integrator: I, params: SamplingParams) -> Self {
        SampleGenerator {
            sampler,
            integrator,
            params,
        }
    }

    pub fn params(&self) -> &SamplingParams {
        &self.params
    }

    pub fn sampler(&self) -> &D {
        &self.sampler
    }

    pub fn integrator(&self) -> &I {
        &self.integrator
    }

    /// Output time grid of the integration, in natural units.
    pub fn time_grid(&self) -> Vec<f64> {
        linspace(
            0.0,
            self.params.integration_time_natural(),
            self.params.integration_steps,
        )
    }

    /// Sample `n` stars, give them vertical motion and integrate their orbits.
    ///
    /// Arguments
    /// -----------------
    /// * `n`: number of samples, at least 1.
    /// * `r_range`: optional radius range in kpc; `None` samples at any radius.
    /// * `rng`: random source used by every stochastic step.
    ///
    /// Return
    /// ----------
    /// * `n` integrated states (final point of each orbit), in natural units.
    /// * `Err(GalmockError)` on an invalid request or any sampling/integration failure.
    pub fn get_samples_with_z<R: Rng + ?Sized>(
        &self,
        n: usize,
        r_range: Option<RadialRange>,
        rng: &mut R,
    ) -> Result<Vec<OrbitState>, GalmockError> {
        if n == 0 {
            return Err(GalmockError::InvalidParameter(
                "sample count must be >= 1".into(),
            ));
        }
        if let Some(range) = r_range {
            validate_radial_range(range)?;
        }
        let estimate_time = n >= self.params.eta_threshold;

        let ro = self.params.ro_kpc;
        let natural_range = r_range.map(|(lo, hi)| (lo / ro, hi / ro));

        info!(n, ?r_range, "sampling orbits");
        if estimate_time {
            let trial = average_sample_time(
                &self.sampler,
                natural_range,
                self.params.eta_trial_size,
                rng,
            );
            self.report_eta(n, trial);
        }
        let draws = self.sampler.sample(n, natural_range, rng)?;
        info!(at = %chrono::Local::now().format("%H:%M:%S"), "sampling done");

        let initial = lift_out_of_plane(&draws, rng);
        let times = self.time_grid();

        info!(
            n,
            integration_time_gyr = self.params.integration_time_gyr,
            steps = self.params.integration_steps,
            "integrating orbits"
        );
        if estimate_time {
            let trial = average_integration_time(
                &self.integrator,
                &initial,
                &times,
                self.params.eta_trial_size,
                rng,
            );
            self.report_eta(n, trial);
        }
        let integrated = self.integrate_all(&initial, &times)?;
        info!(at = %chrono::Local::now().format("%H:%M:%S"), "integration done");

        Ok(integrated)
    }

    fn report_eta(&self, n: usize, trial: Result<std::time::Duration, GalmockError>) {
        match trial {
            Ok(average) => info!(
                per_item = %fmt_dur(average),
                eta = %estimate_completion_time(n, average),
                "estimated time of completion"
            ),
            Err(err) => warn!(error = %err, "completion time estimate failed"),
        }
    }

    #[cfg(not(feature = "progress"))]
    fn integrate_all(
        &self,
        initial: &[OrbitState],
        times: &[f64],
    ) -> Result<Vec<OrbitState>, GalmockError> {
        initial
            .iter()
            .map(|s| self.integrator.integrate_to_end(s, times))
            .collect()
    }

    #[cfg(feature = "progress")]
    fn integrate_all(
        &self,
        initial: &[OrbitState],
        times: &[f64],
    ) -> Result<Vec<OrbitState>, GalmockError> {
        let pb = ProgressBar::new((initial.len() as u64).max(1));
        pb.set_style(
            ProgressStyle::with_template(
                "{bar:40.cyan/blue} {pos}/{len} ({percent:>3}%) | {per_sec} | ETA {eta_precise} | {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb.enable_steady_tick(std::time::Duration::from_millis(200));

        let mut it_timer = IterTimer::new(0.2);
        let mut integrated = Vec::with_capacity(initial.len());
        for s in initial {
            let last = it_timer.tick();
            let avg = it_timer.avg();
            pb.set_message(format!("last: {}, avg: {}", fmt_dur(last), fmt_dur(avg)));

            match self.integrator.integrate_to_end(s, times) {
                Ok(end) => integrated.push(end),
                Err(err) => {
                    pb.abandon_with_message("integration failed");
                    return Err(err);
                }
            }
            pb.inc(1);
        }

        pb.finish_and_clear();
        Ok(integrated)
    }
}
