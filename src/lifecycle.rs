//! Experiment lifecycle: the analysis pass
//!
//! `run_analysis` is the single place where statistics turn into lifecycle
//! transitions. It consumes an experiment's configuration and a fresh
//! counter snapshot, runs the significance calculator and stop-rule policy,
//! and resolves to the next status. Pure over its inputs: re-running on an
//! unchanged snapshot yields the identical result and the identical stop
//! decision.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{EngineError, Result};
use crate::experiment::{Experiment, ExperimentStatus, Variant};
use crate::significance::{calculate_significance, chi_squared_statistic, SignificanceResult};
use crate::stop_rule::{should_stop_test, StopDecision, StopStrategy};

/// Resolution of one analysis pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    /// The status the experiment resolves to: `Running` (continue) or a
    /// terminal state. Never `Analyzing`.
    pub status: ExperimentStatus,
    /// Pairwise result for control vs the strongest challenger
    pub result: SignificanceResult,
    /// Stop-rule decision behind the status
    pub decision: StopDecision,
    /// Goodness-of-fit statistic across all arms, populated for 3+ variants
    pub chi_squared: Option<f64>,
}

/// Run one analysis pass over a counter snapshot.
///
/// The experiment must be `Running` (or already mid-`Analyzing`); an
/// experiment cannot conclude before having accumulated traffic, so `Design`
/// and terminal states are rejected. The snapshot's first variant is the
/// control; the strongest challenger (highest conversion rate among the
/// rest) is tested against it.
///
/// Degenerate snapshots (fewer than two arms, zero traffic) resolve to
/// "continue" with a neutral result rather than an error.
pub fn run_analysis(
    experiment: &Experiment,
    snapshot: &[Variant],
    strategy: StopStrategy,
    now: DateTime<Utc>,
) -> Result<AnalysisOutcome> {
    match experiment.status {
        ExperimentStatus::Running | ExperimentStatus::Analyzing => {}
        ExperimentStatus::Design => {
            return Err(EngineError::ExperimentNotRunning(experiment.id.clone()))
        }
        _ => {
            return Err(EngineError::InvalidState(format!(
                "experiment {} already concluded",
                experiment.id
            )))
        }
    }

    let significance_level = strategy.effective_significance_level(experiment.significance_level);
    let minimum_sample = strategy.effective_minimum_sample(experiment.minimum_sample_size);

    let result = match split_control_and_challenger(snapshot) {
        Some((control, challenger)) => {
            calculate_significance(control, challenger, significance_level)
        }
        // Nothing to compare yet; neutral evidence.
        None => calculate_significance(
            &Variant::new("", "", 0),
            &Variant::new("", "", 0),
            significance_level,
        ),
    };

    let chi_squared = (snapshot.len() > 2).then(|| chi_squared_statistic(snapshot));

    // Both/all arms must clear the sample floor, so the smallest arm counts.
    let current_sample = snapshot.iter().map(|v| v.visitors).min().unwrap_or(0);

    let mut decision = should_stop_test(
        &result,
        current_sample,
        minimum_sample,
        experiment.maximum_sample_size,
    );

    // Wall-clock ceiling: an expired experiment stops even without a verdict.
    if !decision.should_stop && experiment.is_expired(now) {
        decision = StopDecision {
            should_stop: true,
            reason: "Experiment duration reached".to_string(),
            recommendation: format!(
                "Stop the test; {} days elapsed without a significant winner",
                experiment.duration_days
            ),
        };
    }

    let status = if decision.should_stop {
        if result.is_significant && result.winner.is_some() {
            ExperimentStatus::ConcludedWithWinner
        } else {
            ExperimentStatus::ConcludedInconclusive
        }
    } else {
        ExperimentStatus::Running
    };

    debug!(
        experiment_id = %experiment.id,
        strategy = strategy.as_str(),
        p_value = result.p_value,
        current_sample,
        should_stop = decision.should_stop,
        "analysis pass resolved"
    );

    Ok(AnalysisOutcome {
        status,
        result,
        decision,
        chi_squared,
    })
}

/// Control is the first variant; the challenger is the highest-converting
/// of the rest. None when the snapshot has fewer than two arms.
fn split_control_and_challenger(snapshot: &[Variant]) -> Option<(&Variant, &Variant)> {
    let (control, rest) = snapshot.split_first()?;
    let challenger = rest.iter().max_by(|a, b| {
        a.conversion_rate()
            .partial_cmp(&b.conversion_rate())
            .unwrap_or(std::cmp::Ordering::Equal)
    })?;
    Some((control, challenger))
}
