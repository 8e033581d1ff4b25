//! Experiment registry and orchestration
//!
//! `ExperimentEngine` holds experiment configurations and lifecycle state
//! behind a `parking_lot::RwLock`, and applies analysis outcomes back onto
//! the registry entries. Counters never live here: each analysis call takes
//! a caller-provided snapshot, so the registry is cheap to share across
//! request-handling threads.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::assignment::assign_variant;
use crate::config::EngineConfig;
use crate::errors::{EngineError, Result};
use crate::experiment::{Experiment, ExperimentStatus, Variant};
use crate::lifecycle::{run_analysis, AnalysisOutcome};
use crate::validation::variant_config_warnings;

/// Registry of experiments with lifecycle orchestration
pub struct ExperimentEngine {
    experiments: Arc<RwLock<HashMap<String, Experiment>>>,
    config: EngineConfig,
}

impl Default for ExperimentEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ExperimentEngine {
    /// Create an engine with default configuration
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an engine with an explicit configuration
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            experiments: Arc::new(RwLock::new(HashMap::new())),
            config,
        }
    }

    /// Register a designed experiment.
    ///
    /// Configuration smells (splits not summing to ~100, duplicate ids) are
    /// logged as warnings but do not reject the experiment: the assignment
    /// fallback keeps a misconfigured experiment functional.
    pub fn create_experiment(&self, experiment: Experiment) -> Result<String> {
        let id = experiment.id.clone();

        for warning in variant_config_warnings(&experiment.variants) {
            warn!(experiment_id = %id, "{warning}");
        }

        let mut experiments = self.experiments.write();
        if experiments.contains_key(&id) {
            return Err(EngineError::ExperimentAlreadyExists(id));
        }

        info!(experiment_id = %id, name = %experiment.name, "experiment designed");
        experiments.insert(id.clone(), experiment);
        Ok(id)
    }

    /// Get an experiment by id
    pub fn get_experiment(&self, experiment_id: &str) -> Option<Experiment> {
        self.experiments.read().get(experiment_id).cloned()
    }

    /// List all registered experiments
    pub fn list_experiments(&self) -> Vec<Experiment> {
        self.experiments.read().values().cloned().collect()
    }

    /// List experiments in a given status
    pub fn list_by_status(&self, status: ExperimentStatus) -> Vec<Experiment> {
        self.experiments
            .read()
            .values()
            .filter(|e| e.status == status)
            .cloned()
            .collect()
    }

    /// Move an experiment from Design to Running (traffic starts flowing)
    pub fn start_experiment(&self, experiment_id: &str) -> Result<()> {
        let mut experiments = self.experiments.write();
        let experiment = experiments
            .get_mut(experiment_id)
            .ok_or_else(|| EngineError::ExperimentNotFound(experiment_id.to_string()))?;

        if experiment.status != ExperimentStatus::Design {
            return Err(EngineError::InvalidState(format!(
                "cannot start experiment in {:?} state",
                experiment.status
            )));
        }

        experiment.start();
        info!(experiment_id, "experiment running");
        Ok(())
    }

    /// Assign a subject to one of the experiment's variants.
    ///
    /// Deterministic per (subject, experiment) pair. `Ok(None)` when the
    /// experiment has no variants configured.
    pub fn assign(&self, experiment_id: &str, subject_id: &str) -> Result<Option<Variant>> {
        let experiments = self.experiments.read();
        let experiment = experiments
            .get(experiment_id)
            .ok_or_else(|| EngineError::ExperimentNotFound(experiment_id.to_string()))?;

        if experiment.status != ExperimentStatus::Running {
            return Err(EngineError::ExperimentNotRunning(experiment_id.to_string()));
        }

        Ok(assign_variant(subject_id, experiment_id, &experiment.variants).cloned())
    }

    /// Run an analysis pass over a counter snapshot and apply the outcome.
    ///
    /// Transitions through `Analyzing` and resolves to `Running` or a
    /// terminal state within this call; the resulting status and any winner
    /// are persisted into the registry entry for the caller to read back.
    pub fn analyze_experiment(
        &self,
        experiment_id: &str,
        snapshot: &[Variant],
        now: DateTime<Utc>,
    ) -> Result<AnalysisOutcome> {
        let mut experiments = self.experiments.write();
        let experiment = experiments
            .get_mut(experiment_id)
            .ok_or_else(|| EngineError::ExperimentNotFound(experiment_id.to_string()))?;

        if experiment.status != ExperimentStatus::Running {
            return Err(EngineError::ExperimentNotRunning(experiment_id.to_string()));
        }

        experiment.status = ExperimentStatus::Analyzing;
        debug!(experiment_id, "analysis pass started");

        let outcome = run_analysis(experiment, snapshot, self.config.strategy, now)?;

        experiment.status = outcome.status;
        if outcome.status.is_terminal() {
            experiment.concluded_at = Some(now);
            experiment.winner_variant_id = outcome.result.winner.clone();
            info!(
                experiment_id,
                status = ?outcome.status,
                winner = outcome.result.winner.as_deref().unwrap_or("none"),
                reason = %outcome.decision.reason,
                "experiment concluded"
            );
        }

        Ok(outcome)
    }

    /// Summary counts by status
    pub fn summary(&self) -> EngineSummary {
        let experiments = self.experiments.read();

        let mut summary = EngineSummary {
            total: experiments.len(),
            ..EngineSummary::default()
        };
        for experiment in experiments.values() {
            match experiment.status {
                ExperimentStatus::Design => summary.design += 1,
                ExperimentStatus::Running | ExperimentStatus::Analyzing => summary.running += 1,
                ExperimentStatus::ConcludedWithWinner => summary.concluded_with_winner += 1,
                ExperimentStatus::ConcludedInconclusive => summary.concluded_inconclusive += 1,
            }
        }
        summary
    }
}

/// Summary of registry state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSummary {
    pub total: usize,
    pub design: usize,
    pub running: usize,
    pub concluded_with_winner: usize,
    pub concluded_inconclusive: usize,
}
