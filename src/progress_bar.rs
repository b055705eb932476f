//! Per-orbit timing for the integration loop.
//!
//! [`IterTimer`] smooths the wall time spent on each orbit with an exponential moving
//! average; the optional progress bar (feature `progress`) shows it next to the count
//! of integrated orbits. [`fmt_dur`] renders durations at the scale they live on and
//! also formats the per-item cost of the completion-time trials.
use std::time::{Duration, Instant};

/// Moving average of the time between consecutive [`IterTimer::tick`] calls.
///
/// The first orbit seeds the average; each later one contributes with weight `alpha`,
/// clamped to `(0, 1]`.
pub struct IterTimer {
    previous: Instant,
    smoothed: Option<Duration>,
    alpha: f64,
    orbits: u64,
}

impl IterTimer {
    pub fn new(alpha: f64) -> Self {
        Self {
            previous: Instant::now(),
            smoothed: None,
            alpha: alpha.clamp(f64::EPSILON, 1.0),
            orbits: 0,
        }
    }

    /// Mark one more orbit as integrated and return the time it took.
    pub fn tick(&mut self) -> Duration {
        let elapsed = self.previous.elapsed();
        self.previous += elapsed;
        self.orbits += 1;

        self.smoothed = Some(match self.smoothed {
            None => elapsed,
            Some(prev) => elapsed.mul_f64(self.alpha) + prev.mul_f64(1.0 - self.alpha),
        });
        elapsed
    }

    /// Smoothed per-orbit duration, zero before the first tick.
    pub fn avg(&self) -> Duration {
        self.smoothed.unwrap_or_default()
    }

    pub fn count(&self) -> u64 {
        self.orbits
    }
}

/// `253µs`, `42ms` or `3.14s`, depending on the magnitude of `d`.
pub fn fmt_dur(d: Duration) -> String {
    match d.as_micros() {
        us @ 0..1_000 => format!("{us}µs"),
        us if us < 1_000_000 => format!("{}ms", us / 1_000),
        _ => format!("{:.2}s", d.as_secs_f64()),
    }
}

#[cfg(test)]
mod progress_bar_test {
    use super::*;

    #[test]
    fn test_fmt_dur_scales() {
        assert_eq!(fmt_dur(Duration::from_micros(253)), "253µs");
        assert_eq!(fmt_dur(Duration::from_millis(42)), "42ms");
        assert_eq!(fmt_dur(Duration::from_millis(3_140)), "3.14s");
    }

    #[test]
    fn test_iter_timer_counts_ticks() {
        let mut timer = IterTimer::new(0.2);
        assert_eq!(timer.avg(), Duration::from_nanos(0));
        let first = timer.tick();
        timer.tick();
        assert_eq!(timer.count(), 2);
        // after a single tick the average equals the first duration
        let mut single = IterTimer::new(0.2);
        let d = single.tick();
        assert_eq!(single.avg(), d);
        assert!(first >= Duration::from_nanos(0));
    }
}
