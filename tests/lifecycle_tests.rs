//! Lifecycle and Engine Integration Tests
//!
//! Drives full experiments through the registry: design, start, periodic
//! analysis passes over counter snapshots, stop-rule resolution, and the
//! terminal states. Covers the stop-rule scenarios and the strategy split.

use splitstat::chrono::{Duration, Utc};
use splitstat::config::EngineConfig;
use splitstat::engine::ExperimentEngine;
use splitstat::errors::EngineError;
use splitstat::experiment::{Experiment, ExperimentStatus, Variant};
use splitstat::lifecycle::run_analysis;
use splitstat::stop_rule::{should_stop_test, StopStrategy};

fn cta_experiment(id: &str) -> Experiment {
    Experiment::builder("checkout-cta")
        .with_id(id)
        .with_variant(Variant::new("control", "Buy now", 50))
        .with_variant(Variant::new("urgent", "Buy now - 2 left!", 50))
        .build()
}

fn snapshot(control_conv: u64, urgent_conv: u64, visitors: u64) -> Vec<Variant> {
    vec![
        Variant::with_counters("control", "Buy now", 50, visitors, control_conv),
        Variant::with_counters("urgent", "Buy now - 2 left!", 50, visitors, urgent_conv),
    ]
}

// =============================================================================
// FULL LIFECYCLE THROUGH THE ENGINE
// =============================================================================

#[test]
fn winner_flow_design_to_concluded() {
    let engine = ExperimentEngine::new();
    let id = engine.create_experiment(cta_experiment("winner-flow")).unwrap();

    // Cannot analyze or assign before traffic starts.
    assert!(matches!(
        engine.analyze_experiment(&id, &snapshot(10, 20, 100), Utc::now()),
        Err(EngineError::ExperimentNotRunning(_))
    ));

    engine.start_experiment(&id).unwrap();
    assert_eq!(
        engine.get_experiment(&id).unwrap().status,
        ExperimentStatus::Running
    );

    // Early pass: too little evidence, experiment keeps running.
    let early = engine
        .analyze_experiment(&id, &snapshot(10, 12, 100), Utc::now())
        .unwrap();
    assert_eq!(early.status, ExperimentStatus::Running);
    assert!(early.decision.recommendation.contains("Continue test"));

    // Later pass: clear winner.
    let done = engine
        .analyze_experiment(&id, &snapshot(100, 150, 1000), Utc::now())
        .unwrap();
    assert_eq!(done.status, ExperimentStatus::ConcludedWithWinner);
    assert!(done.decision.reason.contains("significance achieved"));

    let stored = engine.get_experiment(&id).unwrap();
    assert_eq!(stored.winner_variant_id.as_deref(), Some("urgent"));
    assert!(stored.concluded_at.is_some());
}

#[test]
fn inconclusive_flow_at_sample_ceiling() {
    let engine = ExperimentEngine::new();
    let experiment = Experiment::builder("flat")
        .with_id("flat")
        .with_variant(Variant::new("control", "Control", 50))
        .with_variant(Variant::new("variant", "Variant", 50))
        .with_maximum_sample_size(1000)
        .build();
    engine.create_experiment(experiment).unwrap();
    engine.start_experiment("flat").unwrap();

    let snap = vec![
        Variant::with_counters("control", "Control", 50, 1000, 100),
        Variant::with_counters("variant", "Variant", 50, 1000, 103),
    ];
    let outcome = engine.analyze_experiment("flat", &snap, Utc::now()).unwrap();
    assert_eq!(outcome.status, ExperimentStatus::ConcludedInconclusive);
    assert!(outcome.decision.reason.contains("Maximum sample size"));
    assert!(engine
        .get_experiment("flat")
        .unwrap()
        .winner_variant_id
        .is_none());
}

#[test]
fn duration_ceiling_is_enforced_by_wall_clock() {
    let engine = ExperimentEngine::new();
    let experiment = Experiment::builder("slow")
        .with_id("slow")
        .with_variant(Variant::new("a", "A", 50))
        .with_variant(Variant::new("b", "B", 50))
        .with_duration_days(7)
        .build();
    engine.create_experiment(experiment).unwrap();
    engine.start_experiment("slow").unwrap();

    let started = engine.get_experiment("slow").unwrap().started_at.unwrap();
    let after_deadline = started + Duration::days(8);

    let outcome = engine
        .analyze_experiment("slow", &snapshot(10, 11, 200), after_deadline)
        .unwrap();
    assert_eq!(outcome.status, ExperimentStatus::ConcludedInconclusive);
    assert!(outcome.decision.reason.contains("duration"));
}

// =============================================================================
// STOP-RULE SCENARIOS (spec'd behaviors)
// =============================================================================

#[test]
fn stop_rules_cover_the_three_spec_scenarios() {
    let significant = splitstat::significance::calculate_significance(
        &Variant::with_counters("c", "C", 50, 1000, 100),
        &Variant::with_counters("v", "V", 50, 1000, 150),
        0.95,
    );

    // Significant + floor met -> stop on significance.
    let d = should_stop_test(&significant, 1000, 100, 10_000);
    assert!(d.should_stop);
    assert!(d.reason.contains("significance achieved"));

    let insignificant = splitstat::significance::calculate_significance(
        &Variant::with_counters("c", "C", 50, 1000, 100),
        &Variant::with_counters("v", "V", 50, 1000, 105),
        0.95,
    );

    // Not significant, below ceiling -> continue.
    let d = should_stop_test(&insignificant, 1000, 100, 10_000);
    assert!(!d.should_stop);

    // Not significant, at ceiling -> stop inconclusive.
    let d = should_stop_test(&insignificant, 10_000, 100, 10_000);
    assert!(d.should_stop);
    assert!(d.reason.contains("Maximum sample size"));
}

// =============================================================================
// STRATEGIES
// =============================================================================

#[test]
fn economic_engine_stops_where_conservative_keeps_running() {
    // ~97.4% confidence: between the economic (0.95) and conservative
    // (0.99) bars.
    let marginal = snapshot(100, 133, 2000);

    let economic = ExperimentEngine::with_config(EngineConfig {
        strategy: StopStrategy::Economic,
        ..EngineConfig::default()
    });
    economic.create_experiment(cta_experiment("m")).unwrap();
    economic.start_experiment("m").unwrap();
    let outcome = economic.analyze_experiment("m", &marginal, Utc::now()).unwrap();
    assert_eq!(outcome.status, ExperimentStatus::ConcludedWithWinner);

    let conservative = ExperimentEngine::with_config(EngineConfig {
        strategy: StopStrategy::Conservative,
        ..EngineConfig::default()
    });
    conservative.create_experiment(cta_experiment("m")).unwrap();
    conservative.start_experiment("m").unwrap();
    let outcome = conservative
        .analyze_experiment("m", &marginal, Utc::now())
        .unwrap();
    assert_eq!(outcome.status, ExperimentStatus::Running);
}

// =============================================================================
// IDEMPOTENCE
// =============================================================================

#[test]
fn reanalyzing_an_unchanged_snapshot_is_idempotent() {
    // run_analysis is pure: same experiment, snapshot, and clock yield the
    // identical result and the identical stop decision.
    let mut experiment = cta_experiment("idem");
    experiment.start();
    let snap = snapshot(100, 105, 1000);
    let now = Utc::now();

    let first = run_analysis(&experiment, &snap, StopStrategy::Economic, now).unwrap();
    let second = run_analysis(&experiment, &snap, StopStrategy::Economic, now).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.status, ExperimentStatus::Running);
}
