//! Splitstat Library
//!
//! Deterministic experimentation decision engine for two-or-more-variant
//! A/B tests. The engine owns no durable storage: callers supply experiment
//! configuration and point-in-time counter snapshots, and the engine answers
//! three questions:
//!
//! - Which variant does this subject see? (stable weighted bucketing)
//! - Is the observed difference real? (two-proportion z-test, chi-squared)
//! - Should the experiment stop, and who won? (stop rules + lifecycle)
//!
//! # Key Properties
//! - Assignment is a pure function: same (subject, experiment) pair always
//!   lands in the same variant, across processes and restarts
//! - All statistics are total functions over counter snapshots: degenerate
//!   input (zero visitors, empty variant lists) yields neutral sentinel
//!   values, never panics or errors
//! - Analysis is idempotent: re-running on an unchanged snapshot produces
//!   the identical result and stop decision
//!
//! # Example
//!
//! ```
//! use splitstat::engine::ExperimentEngine;
//! use splitstat::experiment::{Experiment, Variant};
//! use splitstat::chrono::Utc;
//!
//! let engine = ExperimentEngine::new();
//! let experiment = Experiment::builder("checkout-cta")
//!     .with_variant(Variant::new("control", "Buy now", 50))
//!     .with_variant(Variant::new("urgent", "Buy now - 2 left!", 50))
//!     .build();
//! let id = engine.create_experiment(experiment).unwrap();
//! engine.start_experiment(&id).unwrap();
//!
//! // Hot path: deterministic assignment, no shared state.
//! let assigned = engine.assign(&id, "visitor-42").unwrap();
//! assert!(assigned.is_some());
//!
//! // Periodic analysis pass over a counter snapshot from persistence.
//! let snapshot = vec![
//!     Variant::with_counters("control", "Buy now", 50, 1000, 100),
//!     Variant::with_counters("urgent", "Buy now - 2 left!", 50, 1000, 150),
//! ];
//! let outcome = engine.analyze_experiment(&id, &snapshot, Utc::now()).unwrap();
//! assert!(outcome.result.is_significant);
//! ```

pub mod assignment;
pub mod config;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod experiment;
pub mod lifecycle;
pub mod sample_size;
pub mod significance;
pub mod stop_rule;
pub mod validation;

// Re-export dependencies to ensure tests/benchmarks use the same version
pub use chrono;
pub use parking_lot;
pub use uuid;
