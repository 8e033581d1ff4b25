//! Experiment and variant value types
//!
//! Experiments and variants are explicit immutable value records passed by
//! the caller. The engine never caches counters across analysis calls:
//! external collaborators own the durable counters and mutate them under
//! concurrency via atomic increments, so every analysis works on a fresh
//! point-in-time snapshot.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{
    DEFAULT_DURATION_DAYS, DEFAULT_MAXIMUM_SAMPLE_SIZE, DEFAULT_MINIMUM_SAMPLE_SIZE,
    DEFAULT_SIGNIFICANCE_LEVEL,
};

/// One arm of an experiment: a traffic split plus outcome counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    /// Stable identifier, unique among siblings
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Share of traffic in percent (siblings sum to ~100)
    pub split_percentage: u8,
    /// Visitors assigned to this variant (atomic increments, never decremented)
    pub visitors: u64,
    /// Conversions observed for this variant (<= visitors)
    pub conversions: u64,
}

impl Variant {
    /// A fresh variant with zeroed counters
    pub fn new(id: &str, name: &str, split_percentage: u8) -> Self {
        Self::with_counters(id, name, split_percentage, 0, 0)
    }

    /// A variant snapshot with explicit counter values
    pub fn with_counters(
        id: &str,
        name: &str,
        split_percentage: u8,
        visitors: u64,
        conversions: u64,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            split_percentage,
            visitors,
            conversions,
        }
    }

    /// Observed conversion rate, 0.0 when no traffic has arrived
    pub fn conversion_rate(&self) -> f64 {
        if self.visitors == 0 {
            0.0
        } else {
            self.conversions as f64 / self.visitors as f64
        }
    }
}

/// Lifecycle status of an experiment
///
/// `Analyzing` is transient: every analysis pass immediately resolves back
/// to `Running` or one of the terminal states within the same call. No
/// transition skips `Running`; an experiment cannot conclude before having
/// accumulated traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperimentStatus {
    /// Variants configured, no traffic yet
    Design,
    /// Traffic flowing, counters accumulating
    Running,
    /// A significance check is in flight (never a resting state)
    Analyzing,
    /// Concluded with a statistically significant winner
    ConcludedWithWinner,
    /// Concluded without a significant winner (sample or time ceiling hit)
    ConcludedInconclusive,
}

impl ExperimentStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::ConcludedWithWinner | Self::ConcludedInconclusive
        )
    }
}

/// An experiment: variant configuration plus decision thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experiment {
    /// Unique experiment identifier
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Configured variants (2..N arms; splits sum to ~100)
    pub variants: Vec<Variant>,
    /// Confidence threshold for declaring significance (default 0.95)
    pub significance_level: f64,
    /// Per-variant sample floor before a stop decision is valid
    pub minimum_sample_size: u64,
    /// Per-variant sample ceiling: force a conclusion at this point
    pub maximum_sample_size: u64,
    /// Wall-clock ceiling in days, measured from `started_at`
    pub duration_days: u32,
    /// Current lifecycle status (the only field the engine mutates)
    pub status: ExperimentStatus,
    /// When the experiment was designed
    pub created_at: DateTime<Utc>,
    /// When traffic started flowing
    pub started_at: Option<DateTime<Utc>>,
    /// When the experiment concluded
    pub concluded_at: Option<DateTime<Utc>>,
    /// Winning variant id, set when concluded with a winner
    pub winner_variant_id: Option<String>,
}

impl Experiment {
    /// Create a new experiment builder
    pub fn builder(name: &str) -> ExperimentBuilder {
        ExperimentBuilder::new(name)
    }

    /// Move Design -> Running. External trigger: traffic starts flowing.
    ///
    /// A no-op for any other state (starting twice is harmless).
    pub fn start(&mut self) {
        if self.status == ExperimentStatus::Design {
            self.status = ExperimentStatus::Running;
            self.started_at = Some(Utc::now());
        }
    }

    /// Whether the wall-clock duration ceiling has passed
    ///
    /// Always false before the experiment has started.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.started_at {
            Some(started) => {
                now.signed_duration_since(started) >= Duration::days(i64::from(self.duration_days))
            }
            None => false,
        }
    }
}

/// Builder for experiments
pub struct ExperimentBuilder {
    experiment: Experiment,
}

impl ExperimentBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            experiment: Experiment {
                id: Uuid::new_v4().to_string(),
                name: name.to_string(),
                variants: Vec::new(),
                significance_level: DEFAULT_SIGNIFICANCE_LEVEL,
                minimum_sample_size: DEFAULT_MINIMUM_SAMPLE_SIZE,
                maximum_sample_size: DEFAULT_MAXIMUM_SAMPLE_SIZE,
                duration_days: DEFAULT_DURATION_DAYS,
                status: ExperimentStatus::Design,
                created_at: Utc::now(),
                started_at: None,
                concluded_at: None,
                winner_variant_id: None,
            },
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.experiment.id = id.to_string();
        self
    }

    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.experiment.variants.push(variant);
        self
    }

    pub fn with_variants(mut self, variants: Vec<Variant>) -> Self {
        self.experiment.variants = variants;
        self
    }

    pub fn with_significance_level(mut self, level: f64) -> Self {
        self.experiment.significance_level = level.clamp(0.5, 0.9999);
        self
    }

    pub fn with_minimum_sample_size(mut self, min: u64) -> Self {
        self.experiment.minimum_sample_size = min;
        self
    }

    pub fn with_maximum_sample_size(mut self, max: u64) -> Self {
        self.experiment.maximum_sample_size = max;
        self
    }

    pub fn with_duration_days(mut self, days: u32) -> Self {
        self.experiment.duration_days = days;
        self
    }

    /// Apply engine-level threshold defaults from a config
    pub fn with_config(mut self, config: &crate::config::EngineConfig) -> Self {
        self.experiment.significance_level = config.significance_level;
        self.experiment.minimum_sample_size = config.minimum_sample_size;
        self.experiment.maximum_sample_size = config.maximum_sample_size;
        self.experiment.duration_days = config.duration_days;
        self
    }

    pub fn build(self) -> Experiment {
        self.experiment
    }
}
