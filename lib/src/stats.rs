//! Numeric helpers for encoders and variable scoring.
//!
//! Distribution tails use the standard series / continued-fraction expansions
//! of the regularized incomplete beta and gamma functions.

const EPS: f64 = 1e-14;
const TINY: f64 = 1e-300;
const MAX_ITER: usize = 300;

/// Arithmetic mean; `0.0` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance; `0.0` for an empty slice.
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}

/// Whether the values span more than rounding noise.
pub fn has_spread(values: &[f64]) -> bool {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if !min.is_finite() || !max.is_finite() {
        return false;
    }
    max - min > 1e-9 * (1.0 + max.abs().max(min.abs()))
}

/// Pearson correlation; `None` when either side has no variance.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let mx = mean(x);
    let my = mean(y);
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y) {
        let dx = a - mx;
        let dy = b - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx <= 0.0 || syy <= 0.0 {
        return None;
    }
    let r = sxy / (sxx.sqrt() * syy.sqrt());
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}

/// Quantile of sorted data with linear interpolation, `p` in `[0, 1]`.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let pos = p.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            let frac = pos - lo as f64;
            sorted[lo] + (sorted[hi] - sorted[lo]) * frac
        }
    }
}

/// Natural log of the gamma function (Lanczos, g = 7).
pub fn ln_gamma(x: f64) -> f64 {
    const COEF: [f64; 9] = [
        0.999_999_999_999_809_9,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_1,
        -176.615_029_162_140_6,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_572e-6,
        1.505_632_735_149_311_6e-7,
    ];
    if x < 0.5 {
        // reflection
        let pi = std::f64::consts::PI;
        return (pi / (pi * x).sin()).abs().ln() - ln_gamma(1.0 - x);
    }
    let x = x - 1.0;
    let mut acc = COEF[0];
    for (i, c) in COEF.iter().enumerate().skip(1) {
        acc += c / (x + i as f64);
    }
    let t = x + 7.5;
    0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + acc.ln()
}

fn beta_continued_fraction(a: f64, b: f64, x: f64) -> f64 {
    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;
    let mut c = 1.0;
    let mut d = 1.0 - qab * x / qap;
    if d.abs() < TINY {
        d = TINY;
    }
    d = 1.0 / d;
    let mut h = d;
    for m in 1..=MAX_ITER {
        let m = m as f64;
        let m2 = 2.0 * m;
        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 + aa * d;
        if d.abs() < TINY {
            d = TINY;
        }
        c = 1.0 + aa / c;
        if c.abs() < TINY {
            c = TINY;
        }
        d = 1.0 / d;
        h *= d * c;
        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 + aa * d;
        if d.abs() < TINY {
            d = TINY;
        }
        c = 1.0 + aa / c;
        if c.abs() < TINY {
            c = TINY;
        }
        d = 1.0 / d;
        let del = d * c;
        h *= del;
        if (del - 1.0).abs() < EPS {
            break;
        }
    }
    h
}

/// Regularized incomplete beta function `I_x(a, b)`.
pub fn incomplete_beta(a: f64, b: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let ln_front = ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln();
    let front = ln_front.exp();
    if x < (a + 1.0) / (a + b + 2.0) {
        front * beta_continued_fraction(a, b, x) / a
    } else {
        1.0 - front * beta_continued_fraction(b, a, 1.0 - x) / b
    }
}

/// Regularized lower incomplete gamma function `P(a, x)`.
pub fn incomplete_gamma_lower(a: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x < a + 1.0 {
        let mut ap = a;
        let mut sum = 1.0 / a;
        let mut del = sum;
        for _ in 0..MAX_ITER {
            ap += 1.0;
            del *= x / ap;
            sum += del;
            if del.abs() < sum.abs() * EPS {
                break;
            }
        }
        (sum.ln() - x + a * x.ln() - ln_gamma(a)).exp()
    } else {
        1.0 - incomplete_gamma_upper_cf(a, x)
    }
}

fn incomplete_gamma_upper_cf(a: f64, x: f64) -> f64 {
    let mut b = x + 1.0 - a;
    let mut c = 1.0 / TINY;
    let mut d = 1.0 / b;
    let mut h = d;
    for i in 1..=MAX_ITER {
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
        let del = d * c;
        h *= del;
        if (del - 1.0).abs() < EPS {
            break;
        }
    }
    (-x + a * x.ln() - ln_gamma(a)).exp() * h
}

/// Upper tail of the F(d1, d2) distribution at `f`.
pub fn f_test_p_value(f: f64, d1: f64, d2: f64) -> f64 {
    if !f.is_finite() {
        return if f > 0.0 { 0.0 } else { 1.0 };
    }
    if f <= 0.0 {
        return 1.0;
    }
    incomplete_beta(d2 / 2.0, d1 / 2.0, d2 / (d2 + d1 * f)).clamp(0.0, 1.0)
}

/// Upper tail of the chi-squared distribution with `df` degrees of freedom.
pub fn chi_squared_p_value(stat: f64, df: f64) -> f64 {
    if !stat.is_finite() {
        return if stat > 0.0 { 0.0 } else { 1.0 };
    }
    if stat <= 0.0 {
        return 1.0;
    }
    (1.0 - incomplete_gamma_lower(df / 2.0, stat / 2.0)).clamp(0.0, 1.0)
}

/// Significance of a regression association with correlation `r` over `n` rows.
///
/// Returns `(r_squared, p_value)` from the F(1, n - 2) test.
pub fn regression_significance(r: f64, n: usize) -> (f64, f64) {
    let r2 = r * r;
    if n < 3 {
        return (r2, 1.0);
    }
    let df = (n - 2) as f64;
    if r2 >= 1.0 {
        return (1.0, 0.0);
    }
    let f = r2 * df / (1.0 - r2);
    (r2, f_test_p_value(f, 1.0, df))
}

/// Result of a single-variable logistic regression.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogisticFit {
    pub intercept: f64,
    pub slope: f64,
    pub deviance: f64,
    pub null_deviance: f64,
    pub iterations: usize,
    pub converged: bool,
}

impl LogisticFit {
    /// Deviance pseudo R-squared, `1 - deviance / null_deviance`.
    pub fn pseudo_r_squared(&self) -> f64 {
        if self.null_deviance <= 0.0 {
            return f64::NAN;
        }
        (1.0 - self.deviance / self.null_deviance).clamp(0.0, 1.0)
    }

    /// Chi-squared (1 df) p-value of the deviance reduction.
    pub fn p_value(&self) -> f64 {
        chi_squared_p_value((self.null_deviance - self.deviance).max(0.0), 1.0)
    }
}

const PROB_CLAMP: f64 = 1e-12;

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

fn bernoulli_deviance(y: &[f64], p: impl Fn(usize) -> f64) -> f64 {
    -2.0 * y
        .iter()
        .enumerate()
        .map(|(i, &yi)| {
            let pi = p(i).clamp(PROB_CLAMP, 1.0 - PROB_CLAMP);
            yi * pi.ln() + (1.0 - yi) * (1.0 - pi).ln()
        })
        .sum::<f64>()
}

/// Fit `logit P(y = 1) = a + b x` by Newton-Raphson.
///
/// `y` holds 0/1 values. Returns `None` when the inputs are empty or mismatched.
/// A single-class `y` yields a zero null deviance, so its pseudo R-squared is NaN.
pub fn logistic_fit(x: &[f64], y: &[f64]) -> Option<LogisticFit> {
    if x.is_empty() || x.len() != y.len() {
        return None;
    }
    let p0 = mean(y);
    let p_init = p0.clamp(1e-6, 1.0 - 1e-6);
    let mut a = (p_init / (1.0 - p_init)).ln();
    // single-class outcome: nothing to explain, null deviance is exactly zero
    if p0 <= 0.0 || p0 >= 1.0 {
        return Some(LogisticFit {
            intercept: a,
            slope: 0.0,
            deviance: 0.0,
            null_deviance: 0.0,
            iterations: 0,
            converged: true,
        });
    }
    let null_deviance = bernoulli_deviance(y, |_| p0);

    let mut b = 0.0;
    let mut converged = false;
    let mut iterations = 0;

    for iter in 1..=50 {
        iterations = iter;
        let (mut g0, mut g1, mut h00, mut h01, mut h11) = (0.0, 0.0, 0.0, 0.0, 0.0);
        for (&xi, &yi) in x.iter().zip(y) {
            let p = sigmoid(a + b * xi);
            let w = p * (1.0 - p);
            let r = yi - p;
            g0 += r;
            g1 += r * xi;
            h00 += w;
            h01 += w * xi;
            h11 += w * xi * xi;
        }
        let det = h00 * h11 - h01 * h01;
        if !det.is_finite() || det.abs() < 1e-12 {
            break;
        }
        let da = (h11 * g0 - h01 * g1) / det;
        let db = (h00 * g1 - h01 * g0) / det;
        if !da.is_finite() || !db.is_finite() {
            break;
        }
        a += da;
        b += db;
        if da.abs().max(db.abs()) < 1e-10 {
            converged = true;
            break;
        }
    }

    let deviance = bernoulli_deviance(y, |i| sigmoid(a + b * x[i]));
    Some(LogisticFit {
        intercept: a,
        slope: b,
        deviance: deviance.min(null_deviance),
        null_deviance,
        iterations,
        converged,
    })
}
