//! Scalar special functions used by the bulge potential and the kernel normalisations.

const HALF_LOG_TWO_PI: f64 = 0.918_938_533_204_672_741_780_329_736_406;

/// Lanczos coefficients, g = 7, n = 9.
const COF: [f64; 9] = [
    0.999_999_999_999_809_93,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_13,
    -176.615_029_162_140_59,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_571_6e-6,
    1.505_632_735_149_311_6e-7,
];

const MAX_ITER: usize = 200;
const REL_TOL: f64 = 1e-15;
const TINY: f64 = 1e-300;

/// Natural log of the absolute value of the Gamma function, ln|Γ(x)|.
///
/// * Lanczos approximation for x ≥ 0.5, reflection formula below.
/// * Poles at non-positive integers return **+∞**; NaN propagates.
pub fn ln_gamma(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    if x.is_infinite() && x.is_sign_positive() {
        return f64::INFINITY;
    }
    if x <= 0.0 && x.fract() == 0.0 {
        return f64::INFINITY;
    }

    if x < 0.5 {
        return std::f64::consts::PI.ln()
            - (std::f64::consts::PI * x).sin().abs().ln()
            - ln_gamma(1.0 - x);
    }

    let z = x - 1.0;
    let mut a = COF[0];
    for (i, &c) in COF.iter().enumerate().skip(1) {
        a += c / (z + i as f64);
    }
    let t = z + 7.5;
    HALF_LOG_TWO_PI + (z + 0.5) * t.ln() - t + a.ln()
}

/// Regularised lower incomplete gamma function P(a, x) = γ(a, x) / Γ(a).
///
/// Series representation for x < a + 1, Lentz continued fraction for Q = 1 − P otherwise.
/// Returns NaN outside the domain a > 0, x ≥ 0.
pub fn reg_lower_gamma(a: f64, x: f64) -> f64 {
    if !(a.is_finite() && a > 0.0) || x.is_nan() || x < 0.0 {
        return f64::NAN;
    }
    if x == 0.0 {
        return 0.0;
    }
    if x.is_infinite() {
        return 1.0;
    }

    let log_prefactor = -x + a * x.ln() - ln_gamma(a);

    if x < a + 1.0 {
        let mut ap = a;
        let mut sum = 1.0 / a;
        let mut del = sum;
        for _ in 0..MAX_ITER {
            ap += 1.0;
            del *= x / ap;
            sum += del;
            if del.abs() < sum.abs() * REL_TOL {
                break;
            }
        }
        (log_prefactor.exp() * sum).min(1.0)
    } else {
        let mut b = x + 1.0 - a;
        let mut c = 1.0 / TINY;
        let mut d = 1.0 / b;
        let mut h = d;
        for i in 1..MAX_ITER {
            let an = -(i as f64) * (i as f64 - a);
            b += 2.0;
            d = an * d + b;
            if d.abs() < TINY {
                d = TINY;
            }
            c = b + an / c;
            if c.abs() < TINY {
                c = TINY;
            }
            d = 1.0 / d;
            let delta = d * c;
            h *= delta;
            if (delta - 1.0).abs() < REL_TOL {
                break;
            }
        }
        (1.0 - log_prefactor.exp() * h).max(0.0)
    }
}

/// Lower incomplete gamma function γ(a, x), not regularised.
pub fn lower_gamma(a: f64, x: f64) -> f64 {
    reg_lower_gamma(a, x) * ln_gamma(a).exp()
}

/// Upper incomplete gamma function Γ(a, x), not regularised.
pub fn upper_gamma(a: f64, x: f64) -> f64 {
    (1.0 - reg_lower_gamma(a, x)) * ln_gamma(a).exp()
}
