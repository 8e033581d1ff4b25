//! Stop rules and winner selection
//!
//! Decides, from a significance result and the current per-variant sample,
//! whether an experiment should stop. Two guardrails apply:
//!
//! - significance alone is not enough: a minimum sample floor prevents
//!   stopping on noise from tiny early samples (the "peeking" pitfall)
//! - a maximum sample ceiling prevents an experiment from running forever;
//!   hitting it without a significant winner concludes inconclusive
//!
//! Thresholds are governed by a named strategy supplied as configuration,
//! not hard-coded.

use serde::{Deserialize, Serialize};

use crate::constants::{
    CONSERVATIVE_SAMPLE_MULTIPLIER, CONSERVATIVE_SIGNIFICANCE_LEVEL, ECONOMIC_SAMPLE_DIVISOR,
};
use crate::significance::SignificanceResult;

/// Named threshold strategies for stop decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopStrategy {
    /// Higher significance bar, larger minimum sample. Favors avoiding
    /// false positives over speed.
    Conservative,
    /// Lower minimum sample, faster decisions. Favors speed over rigor.
    Economic,
}

impl Default for StopStrategy {
    fn default() -> Self {
        Self::Conservative
    }
}

impl StopStrategy {
    /// Effective confidence threshold given the configured level
    pub fn effective_significance_level(&self, configured: f64) -> f64 {
        match self {
            Self::Conservative => configured.max(CONSERVATIVE_SIGNIFICANCE_LEVEL),
            Self::Economic => configured,
        }
    }

    /// Effective per-variant minimum sample given the configured floor
    pub fn effective_minimum_sample(&self, configured: u64) -> u64 {
        match self {
            Self::Conservative => configured.saturating_mul(CONSERVATIVE_SAMPLE_MULTIPLIER),
            Self::Economic => (configured / ECONOMIC_SAMPLE_DIVISOR).max(1),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Conservative => "conservative",
            Self::Economic => "economic",
        }
    }
}

impl std::str::FromStr for StopStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "conservative" => Ok(Self::Conservative),
            "economic" => Ok(Self::Economic),
            other => Err(format!("unknown stop strategy: {other}")),
        }
    }
}

/// A stop decision with a machine-checkable reason and a human-readable
/// recommendation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopDecision {
    pub should_stop: bool,
    pub reason: String,
    pub recommendation: String,
}

/// Decide whether to stop an experiment.
///
/// `current_sample_size` is the per-variant sample (smallest arm); the
/// minimum floor must already reflect the active strategy (see
/// [`StopStrategy::effective_minimum_sample`]).
pub fn should_stop_test(
    result: &SignificanceResult,
    current_sample_size: u64,
    minimum_sample_size: u64,
    maximum_sample_size: u64,
) -> StopDecision {
    if result.is_significant && current_sample_size >= minimum_sample_size {
        let recommendation = match &result.winner {
            Some(winner) => format!(
                "Stop the test and roll out variant '{winner}' ({:.1}% confidence)",
                result.confidence_level * 100.0
            ),
            None => "Stop the test; winner could not be determined".to_string(),
        };
        return StopDecision {
            should_stop: true,
            reason: "significance achieved".to_string(),
            recommendation,
        };
    }

    if current_sample_size >= maximum_sample_size {
        let recommendation = if result.is_significant {
            // Significant but still under the minimum floor: an unusual
            // configuration (min > max). The ceiling wins.
            "Stop the test; sample ceiling reached".to_string()
        } else {
            format!(
                "Stop the test as inconclusive; consider a larger minimum \
                 detectable effect (observed lift {:.2}%)",
                result.lift * 100.0
            )
        };
        return StopDecision {
            should_stop: true,
            reason: "Maximum sample size reached".to_string(),
            recommendation,
        };
    }

    StopDecision {
        should_stop: false,
        reason: "insufficient sample or significance".to_string(),
        recommendation: "Continue test - insufficient sample/significance".to_string(),
    }
}
