//! Sample size planning
//!
//! Computes the minimum per-variant sample required to detect a given
//! relative effect at a target baseline rate, using the standard pooled
//! variance two-proportion formula. Total function: invalid input maps to
//! `f64::INFINITY` (the experiment can never reach a valid target, so the
//! required sample is unbounded), never an error.

use crate::constants::{DEFAULT_ALPHA, DEFAULT_POWER};

/// Required sample size per variant at the default alpha/power (0.05 / 0.80).
///
/// `minimum_detectable_effect` is relative: 0.2 means "detect a 20% lift
/// over the baseline rate". Returns `f64::INFINITY` when `baseline_rate` is
/// outside (0, 1) or the effect is non-positive. Otherwise rounds up.
///
/// Monotone: a smaller effect (harder to detect) never yields a smaller
/// required sample than a larger effect at the same baseline.
pub fn required_sample_size(baseline_rate: f64, minimum_detectable_effect: f64) -> f64 {
    required_sample_size_with(
        baseline_rate,
        minimum_detectable_effect,
        DEFAULT_ALPHA,
        DEFAULT_POWER,
    )
}

/// Required sample size per variant for an explicit alpha and power.
pub fn required_sample_size_with(
    baseline_rate: f64,
    minimum_detectable_effect: f64,
    alpha: f64,
    power: f64,
) -> f64 {
    if baseline_rate <= 0.0
        || baseline_rate >= 1.0
        || minimum_detectable_effect <= 0.0
        || !(0.0..1.0).contains(&alpha)
        || alpha == 0.0
        || !(0.0..1.0).contains(&power)
        || power == 0.0
    {
        return f64::INFINITY;
    }

    let p1 = baseline_rate;
    // Effect-adjusted variant rate, capped at certainty.
    let p2 = (p1 * (1.0 + minimum_detectable_effect)).min(1.0);
    let effect = p2 - p1;
    if effect <= 0.0 {
        return f64::INFINITY;
    }

    let z_alpha = inverse_normal_cdf(1.0 - alpha / 2.0);
    let z_beta = inverse_normal_cdf(power);

    let p_bar = (p1 + p2) / 2.0;
    let pooled_variance = p_bar * (1.0 - p_bar);

    let n = 2.0 * pooled_variance * (z_alpha + z_beta).powi(2) / effect.powi(2);
    n.ceil()
}

/// Inverse normal CDF via Acklam's rational approximation.
///
/// Relative error below 1.15e-9 over the full open interval, far tighter
/// than sample-size planning needs.
pub fn inverse_normal_cdf(p: f64) -> f64 {
    let a = [
        -3.969683028665376e+01,
        2.209460984245205e+02,
        -2.759285104469687e+02,
        1.383577518672690e+02,
        -3.066479806614716e+01,
        2.506628277459239e+00,
    ];
    let b = [
        -5.447609879822406e+01,
        1.615858368580409e+02,
        -1.556989798598866e+02,
        6.680131188771972e+01,
        -1.328068155288572e+01,
    ];
    let c = [
        -7.784894002430293e-03,
        -3.223964580411365e-01,
        -2.400758277161838e+00,
        -2.549732539343734e+00,
        4.374664141464968e+00,
        2.938163982698783e+00,
    ];
    let d = [
        7.784695709041462e-03,
        3.224671290700398e-01,
        2.445134137142996e+00,
        3.754408661907416e+00,
    ];

    let p_low = 0.02425;
    let p_high = 1.0 - p_low;

    if p < p_low {
        let q = (-2.0 * p.ln()).sqrt();
        (((((c[0] * q + c[1]) * q + c[2]) * q + c[3]) * q + c[4]) * q + c[5])
            / ((((d[0] * q + d[1]) * q + d[2]) * q + d[3]) * q + 1.0)
    } else if p <= p_high {
        let q = p - 0.5;
        let r = q * q;
        (((((a[0] * r + a[1]) * r + a[2]) * r + a[3]) * r + a[4]) * r + a[5]) * q
            / (((((b[0] * r + b[1]) * r + b[2]) * r + b[3]) * r + b[4]) * r + 1.0)
    } else {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -(((((c[0] * q + c[1]) * q + c[2]) * q + c[3]) * q + c[4]) * q + c[5])
            / ((((d[0] * q + d[1]) * q + d[2]) * q + d[3]) * q + 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_inputs_are_unbounded() {
        assert!(required_sample_size(0.0, 0.2).is_infinite());
        assert!(required_sample_size(1.0, 0.2).is_infinite());
        assert!(required_sample_size(-0.1, 0.2).is_infinite());
        assert!(required_sample_size(1.5, 0.2).is_infinite());
        assert!(required_sample_size(0.1, 0.0).is_infinite());
        assert!(required_sample_size(0.1, -0.5).is_infinite());
    }

    #[test]
    fn test_known_value() {
        // baseline 10%, detect a 50% relative lift: p2 = 0.15,
        // n = 2 * 0.109375 * (1.95996 + 0.84162)^2 / 0.05^2 = 686.8 -> 687
        let n = required_sample_size(0.10, 0.50);
        assert_eq!(n, 687.0);
    }

    #[test]
    fn test_monotonicity_in_effect_size() {
        let baseline = 0.1;
        let mut previous = f64::INFINITY;
        for mde in [0.01, 0.02, 0.05, 0.1, 0.2, 0.5, 1.0, 2.0] {
            let n = required_sample_size(baseline, mde);
            assert!(n.is_finite());
            assert!(
                n <= previous,
                "n({mde}) = {n} exceeded n for a smaller effect ({previous})"
            );
            previous = n;
        }
    }

    #[test]
    fn test_smaller_baseline_needs_more_samples() {
        // Rare events need more traffic to detect the same relative lift.
        let rare = required_sample_size(0.01, 0.2);
        let common = required_sample_size(0.2, 0.2);
        assert!(rare > common);
    }

    #[test]
    fn test_inverse_normal_cdf_known_quantiles() {
        assert!((inverse_normal_cdf(0.975) - 1.959964).abs() < 1e-5);
        assert!((inverse_normal_cdf(0.80) - 0.841621).abs() < 1e-5);
        assert!((inverse_normal_cdf(0.5)).abs() < 1e-9);
        assert!((inverse_normal_cdf(0.025) + 1.959964).abs() < 1e-5);
    }

    #[test]
    fn test_effect_capped_at_certainty() {
        // baseline 0.8 with a 100% lift caps p2 at 1.0 rather than exceeding it
        let n = required_sample_size(0.8, 1.0);
        assert!(n.is_finite());
        assert!(n >= 1.0);
    }
}
