//! Configuration for the decision engine
//!
//! Sensible defaults, overridable from the environment in production.
//! These are engine-level defaults: individual experiments may override the
//! thresholds through their builder.

use std::env;

use tracing::{info, warn};

use crate::constants::{
    DEFAULT_DURATION_DAYS, DEFAULT_MAXIMUM_SAMPLE_SIZE, DEFAULT_MINIMUM_SAMPLE_SIZE,
    DEFAULT_SIGNIFICANCE_LEVEL,
};
use crate::stop_rule::StopStrategy;

/// Engine configuration loaded from environment with defaults
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Confidence threshold for declaring significance (default: 0.95)
    pub significance_level: f64,

    /// Per-variant sample floor before stop decisions are valid (default: 100)
    pub minimum_sample_size: u64,

    /// Per-variant sample ceiling forcing a conclusion (default: 10000)
    pub maximum_sample_size: u64,

    /// Wall-clock duration ceiling in days (default: 14)
    pub duration_days: u32,

    /// Stop-rule threshold strategy (default: conservative)
    pub strategy: StopStrategy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            significance_level: DEFAULT_SIGNIFICANCE_LEVEL,
            minimum_sample_size: DEFAULT_MINIMUM_SAMPLE_SIZE,
            maximum_sample_size: DEFAULT_MAXIMUM_SAMPLE_SIZE,
            duration_days: DEFAULT_DURATION_DAYS,
            strategy: StopStrategy::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = env::var("SPLITSTAT_SIGNIFICANCE_LEVEL") {
            if let Ok(level) = val.parse::<f64>() {
                config.significance_level = level.clamp(0.5, 0.9999);
            }
        }

        if let Ok(val) = env::var("SPLITSTAT_MIN_SAMPLE") {
            if let Ok(n) = val.parse() {
                config.minimum_sample_size = n;
            }
        }

        if let Ok(val) = env::var("SPLITSTAT_MAX_SAMPLE") {
            if let Ok(n) = val.parse() {
                config.maximum_sample_size = n;
            }
        }

        if let Ok(val) = env::var("SPLITSTAT_DURATION_DAYS") {
            if let Ok(n) = val.parse() {
                config.duration_days = n;
            }
        }

        if let Ok(val) = env::var("SPLITSTAT_STRATEGY") {
            match val.parse::<StopStrategy>() {
                Ok(strategy) => config.strategy = strategy,
                Err(e) => warn!("SPLITSTAT_STRATEGY ignored: {e}"),
            }
        }

        if config.minimum_sample_size > config.maximum_sample_size {
            warn!(
                "minimum sample ({}) exceeds maximum ({}); the ceiling will \
                 conclude experiments before the floor is reachable",
                config.minimum_sample_size, config.maximum_sample_size
            );
        }

        config
    }

    /// Log the current configuration
    pub fn log(&self) {
        info!("Engine configuration:");
        info!("   Significance level: {:.2}", self.significance_level);
        info!(
            "   Sample floor/ceiling: {} / {}",
            self.minimum_sample_size, self.maximum_sample_size
        );
        info!("   Duration: {} days", self.duration_days);
        info!("   Strategy: {}", self.strategy.as_str());
    }
}

/// Environment variable documentation
#[allow(unused)] // Public API - available for CLI help output
pub fn print_env_help() {
    println!("Splitstat Configuration Environment Variables:");
    println!();
    println!("  SPLITSTAT_SIGNIFICANCE_LEVEL - Confidence threshold (default: 0.95)");
    println!("  SPLITSTAT_MIN_SAMPLE         - Per-variant sample floor (default: 100)");
    println!("  SPLITSTAT_MAX_SAMPLE         - Per-variant sample ceiling (default: 10000)");
    println!("  SPLITSTAT_DURATION_DAYS      - Experiment duration in days (default: 14)");
    println!("  SPLITSTAT_STRATEGY           - conservative | economic (default: conservative)");
    println!();
    println!("  RUST_LOG                     - Log level (e.g., info, debug, trace)");
    println!();
}
