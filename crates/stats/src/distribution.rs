//! Special functions and distribution helpers.
//!
//! These are textbook approximations (Abramowitz-Stegun, Acklam, Lanczos,
//! Lentz). Coefficient tables and branch points are kept exactly as published;
//! changing them changes every p-value the engine reports.

use std::f64::consts::SQRT_2;

/// Above this many degrees of freedom the t distribution is treated as normal.
pub const NORMAL_APPROXIMATION_DF: f64 = 100.0;

const BETA_CF_MAX_ITERATIONS: usize = 100;
const BETA_CF_EPSILON: f64 = 1e-10;
const BETA_CF_FPMIN: f64 = 1e-30;

/// Standard normal CDF, Abramowitz-Stegun 7.1.26 (|error| < 1.5e-7).
pub fn normal_cdf(x: f64) -> f64 {
    const A1: f64 = 0.254829592;
    const A2: f64 = -0.284496736;
    const A3: f64 = 1.421413741;
    const A4: f64 = -1.453152027;
    const A5: f64 = 1.061405429;
    const P: f64 = 0.3275911;

    if x.is_nan() {
        return f64::NAN;
    }
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs() / SQRT_2;

    let t = 1.0 / (1.0 + P * x);
    let y = 1.0 - (((((A5 * t + A4) * t) + A3) * t + A2) * t + A1) * t * (-x * x).exp();

    0.5 * (1.0 + sign * y)
}

/// Inverse of the standard normal CDF (Acklam's rational approximation).
///
/// Returns `-inf` for `p <= 0` and `+inf` for `p >= 1`.
pub fn normal_inverse_cdf(p: f64) -> f64 {
    const A: [f64; 6] = [
        -3.969683028665376e+01,
        2.209460984245205e+02,
        -2.759285104469687e+02,
        1.383577518672690e+02,
        -3.066479806614716e+01,
        2.506628277459239e+00,
    ];
    const B: [f64; 5] = [
        -5.447609879822406e+01,
        1.615858368580409e+02,
        -1.556989798598866e+02,
        6.680131188771972e+01,
        -1.328068155288572e+01,
    ];
    const C: [f64; 6] = [
        -7.784894002430293e-03,
        -3.223964580411365e-01,
        -2.400758277161838e+00,
        -2.549732539343734e+00,
        4.374664141464968e+00,
        2.938163982698783e+00,
    ];
    const D: [f64; 4] = [
        7.784695709041462e-03,
        3.224671290700398e-01,
        2.445134137142996e+00,
        3.754408661907416e+00,
    ];
    const P_LOW: f64 = 0.02425;
    const P_HIGH: f64 = 1.0 - P_LOW;

    if p.is_nan() {
        return f64::NAN;
    }
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }

    let tail = |q: f64| {
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    };

    if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        tail(q)
    } else if p <= P_HIGH {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -tail(q)
    }
}

/// `ln(Γ(x))` for `x > 0`, Lanczos approximation with the Numerical Recipes
/// six-term series.
pub fn gamma_ln(x: f64) -> f64 {
    const COF: [f64; 6] = [
        76.18009172947146,
        -86.50532032941677,
        24.01409824083091,
        -1.231739572450155,
        0.1208650973866179e-2,
        -0.5395239384953e-5,
    ];

    let mut y = x;
    let tmp = x + 5.5;
    let tmp = tmp - (x + 0.5) * tmp.ln();
    let mut ser = 1.000000000190015;
    for c in COF {
        y += 1.0;
        ser += c / y;
    }
    -tmp + (2.5066282746310005 * ser / x).ln()
}

/// Continued fraction for the incomplete beta function (modified Lentz).
fn beta_continued_fraction(x: f64, a: f64, b: f64) -> f64 {
    let clamp_tiny = |v: f64| if v.abs() < BETA_CF_FPMIN { BETA_CF_FPMIN } else { v };

    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;
    let mut c = 1.0;
    let mut d = 1.0 / clamp_tiny(1.0 - qab * x / qap);
    let mut h = d;

    for m in 1..=BETA_CF_MAX_ITERATIONS {
        let m = m as f64;
        let m2 = 2.0 * m;

        // Even step.
        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 / clamp_tiny(1.0 + aa * d);
        c = clamp_tiny(1.0 + aa / c);
        h *= d * c;

        // Odd step.
        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 / clamp_tiny(1.0 + aa * d);
        c = clamp_tiny(1.0 + aa / c);
        let delta = d * c;
        h *= delta;

        if (delta - 1.0).abs() < BETA_CF_EPSILON {
            break;
        }
    }
    h
}

/// Regularized incomplete beta function `I_x(a, b)`.
pub fn incomplete_beta(x: f64, a: f64, b: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    let front = (gamma_ln(a + b) - gamma_ln(a) - gamma_ln(b) + a * x.ln() + b * (1.0 - x).ln())
        .exp();

    // The fraction converges quickly only on one side of the mean; use the
    // symmetry I_x(a, b) = 1 - I_{1-x}(b, a) on the other.
    if x < (a + 1.0) / (a + b + 2.0) {
        front * beta_continued_fraction(x, a, b) / a
    } else {
        1.0 - front * beta_continued_fraction(1.0 - x, b, a) / b
    }
}

/// Two-tailed p-value of a Student's t statistic.
///
/// `df <= 0` gives 1. An infinite statistic gives 0 and NaN gives 1, without
/// evaluating the approximation.
pub fn t_distribution_p_value(t: f64, df: f64) -> f64 {
    if df <= 0.0 || t.is_nan() {
        return 1.0;
    }
    if t.is_infinite() {
        return 0.0;
    }

    let p = if df > NORMAL_APPROXIMATION_DF {
        2.0 * (1.0 - normal_cdf(t.abs()))
    } else {
        incomplete_beta(df / (df + t * t), df / 2.0, 0.5)
    };
    p.clamp(0.0, 1.0)
}

/// Two-sided critical value of the t distribution for significance `alpha`.
///
/// For `df <= 100` this is a coarse `z + c / df` approximation keyed on the
/// usual tail probabilities, not an exact table lookup: at df = 5 and
/// alpha = 0.05 it returns ~2.43 where the table says 2.571. It is kept as-is
/// so interval widths stay comparable with previously published output.
pub fn t_critical_value(alpha: f64, df: f64) -> f64 {
    let tail = alpha / 2.0;
    if df > NORMAL_APPROXIMATION_DF {
        return normal_inverse_cdf(1.0 - tail);
    }

    let df = df.max(1.0);
    // Callers usually pass `1.0 - confidence`, which lands a hair above the
    // nominal tail probability.
    let tail = tail - 1e-12;
    if tail <= 0.005 {
        2.576 + 4.92 / df
    } else if tail <= 0.01 {
        2.326 + 3.73 / df
    } else if tail <= 0.025 {
        1.960 + 2.37 / df
    } else if tail <= 0.05 {
        1.645 + 1.52 / df
    } else {
        // Wider tails: first Cornish-Fisher term around the normal quantile.
        let z = normal_inverse_cdf(1.0 - tail);
        z + (z.powi(3) + z) / (4.0 * df)
    }
}
