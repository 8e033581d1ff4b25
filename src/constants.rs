//! Documented constants for the decision engine
//!
//! All tunable parameters with justification for their values.
//! Centralizing constants prevents magic numbers and makes tuning easier.

// =============================================================================
// SIGNIFICANCE DEFAULTS
// =============================================================================

/// Default significance level (confidence an experiment must reach)
///
/// A result counts as significant when `confidence_level = 1 - p_value`
/// meets or exceeds this threshold.
///
/// Justification:
/// - 95% is the conventional two-sided threshold for product experiments
/// - Strategies may raise it (see [`crate::stop_rule::StopStrategy`])
pub const DEFAULT_SIGNIFICANCE_LEVEL: f64 = 0.95;

/// Default minimum sample size per variant before a stop decision is valid
///
/// Justification:
/// - Stopping on significance alone invites the classic "peeking" pitfall:
///   tiny early samples produce spuriously extreme proportions
/// - 100 visitors per arm keeps the normal approximation honest for
///   conversion rates in the 1-50% range
pub const DEFAULT_MINIMUM_SAMPLE_SIZE: u64 = 100;

/// Default maximum sample size per variant before forcing a conclusion
///
/// An experiment that has not reached significance by this point concludes
/// inconclusive rather than running forever.
pub const DEFAULT_MAXIMUM_SAMPLE_SIZE: u64 = 10_000;

/// Default experiment duration in days
///
/// Justification:
/// - Two full weekly traffic cycles smooth out day-of-week effects
/// - Enforced by wall-clock comparison at analysis time, not by timers
pub const DEFAULT_DURATION_DAYS: u32 = 14;

// =============================================================================
// SAMPLE SIZE PLANNING
// =============================================================================

/// Default two-sided false positive rate (alpha) for sample-size planning
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Default statistical power (1 - beta) for sample-size planning
///
/// 80% power is the standard planning convention: a 20% chance of missing
/// a true effect of exactly the minimum detectable size.
pub const DEFAULT_POWER: f64 = 0.80;

// =============================================================================
// STOP STRATEGY THRESHOLDS
// =============================================================================

/// Significance floor applied by the conservative strategy
///
/// Conservative experiments never stop below 99% confidence, regardless of
/// the configured level. Favors avoiding false positives over speed.
pub const CONSERVATIVE_SIGNIFICANCE_LEVEL: f64 = 0.99;

/// Minimum sample multiplier applied by the conservative strategy
pub const CONSERVATIVE_SAMPLE_MULTIPLIER: u64 = 2;

/// Minimum sample divisor applied by the economic strategy
///
/// Economic experiments accept half the configured floor, trading rigor for
/// faster decisions.
pub const ECONOMIC_SAMPLE_DIVISOR: u64 = 2;

// =============================================================================
// ASSIGNMENT
// =============================================================================

/// Number of assignment buckets
///
/// Split percentages are integers in [0, 100], so 100 buckets gives exact
/// percentage-granularity splits.
pub const BUCKET_COUNT: u64 = 100;

// =============================================================================
// CHI-SQUARED LOOKUP TABLE (df = 1)
// =============================================================================

/// Critical values of the chi-squared distribution at df=1, paired with
/// their canonical p-values, ordered from most to least extreme.
///
/// This is an intentional coarse approximation: the table answers "which
/// significance boundary did we cross" rather than computing an exact
/// inverse CDF. Callers needing finer resolution should use the z-test path.
pub const CHI_SQUARED_P_TABLE_DF1: [(f64, f64); 5] = [
    (10.83, 0.001),
    (6.63, 0.01),
    (5.41, 0.02),
    (3.84, 0.05),
    (2.71, 0.10),
];

// =============================================================================
// CONFIGURATION SANITY
// =============================================================================

/// Tolerated deviation of a variant split sum from 100
///
/// Splits like 33/33/33 sum to 99; that is rounding, not misconfiguration.
/// Sums outside [100 - tolerance, 100 + tolerance] draw a warning (the
/// assignment fallback still guarantees every subject gets a variant).
pub const SPLIT_SUM_TOLERANCE: u32 = 5;
