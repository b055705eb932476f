//! # Completion-time estimation
//!
//! Large batches announce when they are expected to finish. Each expensive stage is
//! preceded by a small timed **trial** (sampling `trial_size` draws, or integrating
//! `trial_size` randomly chosen orbits). Trials are timed in process CPU time; the
//! per-item cost is extrapolated to the full batch size and rendered as a local
//! wall-clock time.
//!
//! Estimates are advisory: callers log a failed trial and carry on with the real work.
//!
//! ## Formatting
//!
//! * `HH:MM:SS` when the projected duration is at most 24 hours,
//! * `DD Mon HH:MM:SS` otherwise.
use std::time::Duration;

use chrono::{DateTime, Local, TimeDelta, TimeZone};
use cpu_time::ProcessTime;
use rand::Rng;

use crate::constants::SECONDS_PER_DAY;
use crate::distribution_function::DistributionSampler;
use crate::galmock_errors::GalmockError;
use crate::orbit_integration::OrbitIntegrator;
use crate::phase_space::OrbitState;

const TIME_FORMAT: &str = "%H:%M:%S";
const DATE_TIME_FORMAT: &str = "%d %b %H:%M:%S";

/// Average CPU time needed to draw one sample, measured on `trial_size` draws.
///
/// Arguments
/// -----------------
/// * `sampler`: the distribution function used by the real batch.
/// * `r_range`: radius range in natural units, identical to the real batch.
/// * `trial_size`: number of timed draws.
/// * `rng`: random source.
///
/// Return
/// ----------
/// * The per-draw duration, or the sampler error.
pub fn average_sample_time<D, R>(
    sampler: &D,
    r_range: Option<(f64, f64)>,
    trial_size: usize,
    rng: &mut R,
) -> Result<Duration, GalmockError>
where
    D: DistributionSampler,
    R: Rng + ?Sized,
{
    let trial_size = trial_size.max(1);
    let start = ProcessTime::now();
    sampler.sample(trial_size, r_range, rng)?;
    Ok(start.elapsed().div_f64(trial_size as f64))
}

/// Average CPU time needed to integrate one orbit over `times`.
///
/// A random subset of `min(trial_size, orbits.len())` orbits, drawn without replacement,
/// is integrated; the input orbits are left untouched.
pub fn average_integration_time<I, R>(
    integrator: &I,
    orbits: &[OrbitState],
    times: &[f64],
    trial_size: usize,
    rng: &mut R,
) -> Result<Duration, GalmockError>
where
    I: OrbitIntegrator,
    R: Rng + ?Sized,
{
    let amount = trial_size.min(orbits.len());
    if amount == 0 {
        return Err(GalmockError::DegenerateInput(
            "no orbit available for the integration trial".into(),
        ));
    }
    let picked = rand::seq::index::sample(rng, orbits.len(), amount);

    let start = ProcessTime::now();
    for idx in picked.iter() {
        integrator.integrate_to_end(&orbits[idx], times)?;
    }
    Ok(start.elapsed().div_f64(amount as f64))
}

/// Render the completion time of `n` iterations costing `average_time` each, from `now`.
///
/// Return
/// ----------
/// * The completion time formatted as `HH:MM:SS`, prefixed by `DD Mon ` when the projected
///   duration exceeds one day.
pub fn format_completion_time<Tz>(now: DateTime<Tz>, n: usize, average_time: Duration) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let total_secs = average_time.as_secs_f64() * n as f64;
    let format = if total_secs > SECONDS_PER_DAY {
        DATE_TIME_FORMAT
    } else {
        TIME_FORMAT
    };

    let completion = Duration::try_from_secs_f64(total_secs)
        .ok()
        .and_then(|d| TimeDelta::from_std(d).ok())
        .and_then(|d| now.clone().checked_add_signed(d))
        .unwrap_or(now);
    completion.format(format).to_string()
}

/// Completion time of `n` iterations costing `average_time` each, in local time.
pub fn estimate_completion_time(n: usize, average_time: Duration) -> String {
    format_completion_time(Local::now(), n, average_time)
}

#[cfg(test)]
mod eta_test {
    use super::*;
    use chrono::Utc;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_short_run_shows_time_only() {
        let now = Utc.with_ymd_and_hms(2018, 6, 16, 12, 0, 0).unwrap();
        let eta = format_completion_time(now, 100, Duration::from_secs(1));
        assert_eq!(eta, "12:01:40");
    }

    #[test]
    fn test_long_run_shows_date() {
        let now = Utc.with_ymd_and_hms(2018, 6, 16, 12, 0, 0).unwrap();
        // 100 000 s ≈ 27.8 h
        let eta = format_completion_time(now, 100_000, Duration::from_secs(1));
        assert_eq!(eta, "17 Jun 15:46:40");
    }

    #[test]
    fn test_exactly_one_day_has_no_date() {
        let now = Utc.with_ymd_and_hms(2018, 6, 16, 0, 0, 0).unwrap();
        let eta = format_completion_time(now, 86_400, Duration::from_secs(1));
        assert_eq!(eta, "00:00:00");
    }

    /// Hands back nothing, whatever the requested size.
    struct EmptySampler;

    impl DistributionSampler for EmptySampler {
        fn sample<R: Rng + ?Sized>(
            &self,
            _n: usize,
            _r_range: Option<(f64, f64)>,
            _rng: &mut R,
        ) -> Result<Vec<crate::phase_space::PlanarState>, GalmockError> {
            Ok(Vec::new())
        }
    }

    struct Frozen;

    impl OrbitIntegrator for Frozen {
        fn integrate(
            &self,
            initial: &OrbitState,
            times: &[f64],
        ) -> Result<Vec<OrbitState>, GalmockError> {
            Ok(vec![*initial; times.len()])
        }
    }

    #[test]
    fn test_trial_sizes_beyond_u32() {
        let mut rng = StdRng::seed_from_u64(3);
        let per_draw = average_sample_time(&EmptySampler, None, 1usize << 32, &mut rng).unwrap();
        assert!(per_draw < Duration::from_millis(1));

        let circular = OrbitState {
            r: 1.0,
            v_r: 0.0,
            v_t: 1.0,
            z: 0.0,
            v_z: 0.0,
        };
        let orbits = vec![circular; 3];
        let per_orbit =
            average_integration_time(&Frozen, &orbits, &[0.0, 1.0], 1usize << 32, &mut rng)
                .unwrap();
        assert!(per_orbit < Duration::from_secs(1));

        assert!(matches!(
            average_integration_time(&Frozen, &[], &[0.0, 1.0], 10, &mut rng),
            Err(GalmockError::DegenerateInput(_))
        ));
    }

    #[test]
    fn test_local_estimate_has_time_shape() {
        let eta = estimate_completion_time(10, Duration::from_millis(1));
        assert_eq!(eta.len(), 8);
        assert_eq!(eta.matches(':').count(), 2);
    }
}
