//! Statistical significance testing
//!
//! Two related algorithms over counter snapshots:
//!
//! - Pairwise two-proportion z-test: the decision path. Pooled standard
//!   error, two-tailed p-value via an erf-based normal CDF approximation.
//! - Chi-squared goodness-of-fit: multi-variant smell test with a coarse
//!   df=1 threshold table for the p-value.
//!
//! Both are pure functions of the variants' current counters: no I/O, no
//! blocking, safe to run concurrently with ongoing counter increments.
//! Every division is guarded; degenerate input (zero visitors) yields a
//! neutral result rather than NaN reaching a decision.

use serde::{Deserialize, Serialize};

use crate::constants::CHI_SQUARED_P_TABLE_DF1;
use crate::experiment::Variant;
use crate::sample_size::required_sample_size;

/// Outcome of a pairwise significance test
///
/// Produced fresh on every analysis call; a pure function of the input
/// counters, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignificanceResult {
    /// Whether the confidence level met the caller's threshold
    pub is_significant: bool,
    /// 1 - p_value, in [0, 1]
    pub confidence_level: f64,
    /// Two-tailed p-value, in [0, 1]
    pub p_value: f64,
    /// z-score of the observed difference (signed: positive favors the variant)
    pub z_score: f64,
    /// Relative change of the variant over the control, signed.
    ///
    /// By convention 0.0 when the control rate is 0. This conflates "no
    /// measurable lift" with "undefined lift on a zero baseline"; it is a
    /// known limitation kept as documented behavior.
    pub lift: f64,
    /// Winning variant id when significant, None otherwise
    pub winner: Option<String>,
    /// Per-variant sample the planner recommends for the observed effect
    /// when the result is not significant (how much more traffic is needed);
    /// 0.0 once significance is reached. `f64::INFINITY` when the observed
    /// effect gives the planner nothing to work with.
    pub recommended_sample_size: f64,
}

impl SignificanceResult {
    /// Neutral result for degenerate input: no evidence either way.
    fn neutral() -> Self {
        Self {
            is_significant: false,
            confidence_level: 0.0,
            p_value: 1.0,
            z_score: 0.0,
            lift: 0.0,
            winner: None,
            recommended_sample_size: f64::INFINITY,
        }
    }
}

/// Two-proportion z-test between a control and a variant.
///
/// `significance_level` is the confidence threshold (e.g. 0.95) the result
/// must reach to count as significant. Zero visitors on either side yields
/// a neutral result.
pub fn calculate_significance(
    control: &Variant,
    variant: &Variant,
    significance_level: f64,
) -> SignificanceResult {
    if control.visitors == 0 || variant.visitors == 0 {
        return SignificanceResult::neutral();
    }

    let n1 = control.visitors as f64;
    let n2 = variant.visitors as f64;
    let x1 = control.conversions as f64;
    let x2 = variant.conversions as f64;

    let p1 = x1 / n1;
    let p2 = x2 / n2;

    let lift = if p1 > 0.0 { (p2 - p1) / p1 } else { 0.0 };

    let p_pool = (x1 + x2) / (n1 + n2);
    let se = (p_pool * (1.0 - p_pool) * (1.0 / n1 + 1.0 / n2)).sqrt();

    // Pooled rate of exactly 0 or 1 means both arms agree perfectly: there
    // is no variance to test against.
    if se == 0.0 {
        return SignificanceResult {
            lift,
            ..SignificanceResult::neutral()
        };
    }

    let z_score = (p2 - p1) / se;
    let p_value = two_tailed_p_value(z_score);
    let confidence_level = 1.0 - p_value;
    let is_significant = confidence_level >= significance_level;

    let winner = if is_significant {
        if p2 > p1 {
            Some(variant.id.clone())
        } else {
            Some(control.id.clone())
        }
    } else {
        None
    };

    let recommended_sample_size = if is_significant {
        0.0
    } else {
        required_sample_size(p1, lift.abs())
    };

    SignificanceResult {
        is_significant,
        confidence_level,
        p_value,
        z_score,
        lift,
        winner,
        recommended_sample_size,
    }
}

/// Two-tailed p-value for a z-score under the standard normal
pub fn two_tailed_p_value(z: f64) -> f64 {
    (2.0 * (1.0 - normal_cdf(z.abs()))).clamp(0.0, 1.0)
}

/// Standard normal CDF
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / std::f64::consts::SQRT_2))
}

/// Error function via the Abramowitz & Stegun 7.1.26 rational approximation
///
/// Absolute error below 1.5e-7, comfortably inside the ~4 decimal places
/// decisions hinge on at the 0.05/0.01 boundaries.
fn erf(x: f64) -> f64 {
    let a1 = 0.254829592;
    let a2 = -0.284496736;
    let a3 = 1.421413741;
    let a4 = -1.453152027;
    let a5 = 1.061405429;
    let p = 0.3275911;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    let t = 1.0 / (1.0 + p * x);
    let y = 1.0 - (((((a5 * t + a4) * t) + a3) * t + a2) * t + a1) * t * (-x * x).exp();

    sign * y
}

/// Chi-squared goodness-of-fit statistic across N variants.
///
/// Tests the null hypothesis that all variants share one conversion rate:
/// for each variant, compares observed conversions and non-conversions to
/// the counts expected under the pooled rate. Cells whose expectation is
/// not positive are skipped. Returns 0.0 when total visitors is 0.
pub fn chi_squared_statistic(variants: &[Variant]) -> f64 {
    let total_visitors: u64 = variants.iter().map(|v| v.visitors).sum();
    if total_visitors == 0 {
        return 0.0;
    }
    let total_conversions: u64 = variants.iter().map(|v| v.conversions).sum();
    let overall_rate = total_conversions as f64 / total_visitors as f64;

    let mut chi_squared = 0.0;
    for variant in variants {
        let n = variant.visitors as f64;
        let observed_conversions = variant.conversions as f64;
        let observed_non_conversions = n - observed_conversions;

        let expected_conversions = n * overall_rate;
        let expected_non_conversions = n * (1.0 - overall_rate);

        if expected_conversions > 0.0 {
            chi_squared +=
                (observed_conversions - expected_conversions).powi(2) / expected_conversions;
        }
        if expected_non_conversions > 0.0 {
            chi_squared += (observed_non_conversions - expected_non_conversions).powi(2)
                / expected_non_conversions;
        }
    }
    chi_squared
}

/// Coarse p-value for a chi-squared statistic at df=1.
///
/// Threshold table lookup, not an inverse CDF: values below the weakest
/// threshold map to 1.0. Callers needing finer resolution should use the
/// z-test path instead.
pub fn chi_squared_to_p_value(chi_squared: f64) -> f64 {
    for (threshold, p_value) in CHI_SQUARED_P_TABLE_DF1 {
        if chi_squared >= threshold {
            return p_value;
        }
    }
    1.0
}
