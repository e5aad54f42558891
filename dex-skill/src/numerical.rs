pub const TANH_MULTIPLIER: f64 = std::f64::consts::PI / 1.7320508075688772;

pub fn standard_logistic_cdf(z: f64) -> f64 {
    0.5 + 0.5 * (0.5 * TANH_MULTIPLIER * z).tanh()
}

pub fn standard_normal_pdf(z: f64) -> f64 {
    const NORMALIZE: f64 = 0.5 * std::f64::consts::FRAC_2_SQRT_PI / std::f64::consts::SQRT_2;
    NORMALIZE * (-0.5 * z * z).exp()
}

pub fn standard_normal_cdf(z: f64) -> f64 {
    0.5 * statrs::function::erf::erfc(-z / std::f64::consts::SQRT_2)
    // Less numerically stable: 0.5 + 0.5 * statrs::function::erf::erf(z / std::f64::consts::SQRT_2)
}

/// The additive and multiplicative correction factors (v, w) of a Gaussian
/// truncated to the half-line where the winner's performance exceeds the loser's.
/// `t` is the normalized mean performance gap in the winner's favour.
/// Always satisfies v > 0 and 0 < w < 1.
pub fn win_truncation_factors(t: f64) -> (f64, f64) {
    let cdf = standard_normal_cdf(t);
    // Far in the upset tail, pdf/cdf underflows; its asymptote is -t.
    let v = if cdf < 1e-300 {
        -t
    } else {
        standard_normal_pdf(t) / cdf
    };
    let w = (v * (v + t)).clamp(f64::EPSILON, 1. - f64::EPSILON);
    (v, w)
}
