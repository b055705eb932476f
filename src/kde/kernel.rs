use std::f64::consts::{LN_2, PI};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::galmock_errors::GalmockError;
use crate::special::ln_gamma;

/// Kernel family of a density estimate.
///
/// Every kernel is radially symmetric; for a distance `d` and a bandwidth `h`, with
/// `u = d / h`:
///
/// | kernel         | unnormalised `K(u)`          | support  |
/// |----------------|------------------------------|----------|
/// | `gaussian`     | `exp(-u²/2)`                 | ℝ        |
/// | `tophat`       | `1`                          | `u < 1`  |
/// | `epanechnikov` | `1 - u²`                     | `u < 1`  |
/// | `exponential`  | `exp(-u)`                    | ℝ        |
/// | `linear`       | `1 - u`                      | `u < 1`  |
/// | `cosine`       | `cos(πu/2)`                  | `u < 1`  |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kernel {
    #[default]
    Gaussian,
    Tophat,
    Epanechnikov,
    Exponential,
    Linear,
    Cosine,
}

impl Kernel {
    pub const ALL: [Kernel; 6] = [
        Kernel::Gaussian,
        Kernel::Tophat,
        Kernel::Epanechnikov,
        Kernel::Exponential,
        Kernel::Linear,
        Kernel::Cosine,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Kernel::Gaussian => "gaussian",
            Kernel::Tophat => "tophat",
            Kernel::Epanechnikov => "epanechnikov",
            Kernel::Exponential => "exponential",
            Kernel::Linear => "linear",
            Kernel::Cosine => "cosine",
        }
    }

    /// Logarithm of the unnormalised kernel at distance `dist`; `-inf` outside the support.
    pub fn log_kernel(&self, dist: f64, h: f64) -> f64 {
        let u = dist / h;
        match self {
            Kernel::Gaussian => -0.5 * u * u,
            Kernel::Exponential => -u,
            _ if u >= 1.0 => f64::NEG_INFINITY,
            Kernel::Tophat => 0.0,
            Kernel::Epanechnikov => (1.0 - u * u).ln(),
            Kernel::Linear => (1.0 - u).ln(),
            Kernel::Cosine => (0.5 * PI * u).cos().ln(),
        }
    }

    /// Logarithm of the integral of the unnormalised kernel over ℝᵈ, for bandwidth `h`.
    pub fn log_norm(&self, d: usize, h: f64) -> f64 {
        let df = d as f64;
        let factor = match self {
            Kernel::Gaussian => 0.5 * df * (2.0 * PI).ln(),
            Kernel::Tophat => log_unit_ball_volume(df),
            Kernel::Epanechnikov => log_unit_ball_volume(df) + (2.0 / (df + 2.0)).ln(),
            Kernel::Exponential => log_unit_sphere_area(df - 1.0) + ln_gamma(df),
            Kernel::Linear => log_unit_ball_volume(df) - (df + 1.0).ln(),
            Kernel::Cosine => cosine_radial_integral(d).ln() + log_unit_sphere_area(df - 1.0),
        };
        factor + df * h.ln()
    }
}

/// `∫₀¹ r^(d-1) cos(πr/2) dr`, by integration by parts.
fn cosine_radial_integral(d: usize) -> f64 {
    let a = 0.5 * PI;
    let (mut k, mut integral) = if d % 2 == 1 {
        (1, 1.0 / a)
    } else {
        (2, 1.0 / a - 1.0 / (a * a))
    };
    while k < d {
        k += 2;
        let kf = k as f64;
        integral = 1.0 / a - (kf - 1.0) * (kf - 2.0) / (a * a) * integral;
    }
    integral
}

/// Volume of the unit ball in ℝⁿ, in log.
fn log_unit_ball_volume(n: f64) -> f64 {
    0.5 * n * PI.ln() - ln_gamma(0.5 * n + 1.0)
}

/// Surface of the unit n-sphere (embedded in ℝⁿ⁺¹), in log.
fn log_unit_sphere_area(n: f64) -> f64 {
    LN_2 + 0.5 * (n + 1.0) * PI.ln() - ln_gamma(0.5 * (n + 1.0))
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Kernel {
    type Err = GalmockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kernel::ALL
            .into_iter()
            .find(|k| k.name() == s.trim().to_ascii_lowercase())
            .ok_or_else(|| GalmockError::InvalidParameter(format!("unknown kernel '{s}'")))
    }
}
