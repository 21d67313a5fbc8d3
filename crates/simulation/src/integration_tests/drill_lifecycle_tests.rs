//! Starting, restarting and failing tests through drill events.

use crate::evaluator::{EvaluatorPhase, FailReason};
use crate::extinguisher::{ExtinguisherState, ExtinguisherUnit};
use crate::fire_unit::{FireAction, FireUnit};
use crate::journal::JournalEntry;
use crate::procedure::ProcedureStep;
use crate::test_harness::TestDrill;
use crate::warnings::WarningKind;

// ---------------------------------------------------------------------------
// Start
// ---------------------------------------------------------------------------

#[test]
fn test_start_event_installs_evaluator_over_registered_fires() {
    let mut drill = TestDrill::new()
        .with_default_extinguisher()
        .with_fires(2);
    drill.request_start(Some(10.0)).tick(1);

    let evaluator = drill.evaluator().expect("test should be installed");
    assert_eq!(evaluator.time_limit(), 10.0);
    assert_eq!(evaluator.fires(), drill.fire_ids());
    drill.assert_running();

    drill.tick(500);
    drill.assert_failed(FailReason::TimeLimitExceeded);
    let report = drill.report().unwrap();
    assert!((report.elapsed - 10.0).abs() < 0.021, "elapsed {}", report.elapsed);
    assert_eq!(drill.completed_reports().len(), 1);
}

#[test]
fn test_start_without_limit_uses_configured_limit() {
    let mut drill = TestDrill::new()
        .with_params_edit(|p| p.evaluator.time_limit = 5.0)
        .with_fires(1);
    drill.request_start(None).tick(1);
    assert_eq!(drill.evaluator().unwrap().time_limit(), 5.0);
}

#[test]
fn test_start_while_running_is_refused() {
    let mut drill = TestDrill::new().with_fires(1).with_test(30.0);
    drill.tick(10);
    drill.request_start(Some(5.0)).tick(1);

    assert_eq!(drill.evaluator().unwrap().time_limit(), 30.0);
    let kinds: Vec<WarningKind> = drill.warnings().into_iter().map(|w| w.kind).collect();
    assert_eq!(kinds, vec![WarningKind::TestAlreadyRunning]);
}

#[test]
fn test_start_after_finish_begins_a_new_test() {
    let mut drill = TestDrill::new().with_fires(1).with_test(1.0);
    drill.tick(50);
    drill.assert_failed(FailReason::TimeLimitExceeded);

    drill.request_start(Some(2.0)).tick(1);
    drill.assert_running();
    assert_eq!(drill.evaluator().unwrap().time_limit(), 2.0);
    assert!(drill.warnings().is_empty());
}

#[test]
fn test_start_with_no_fires_warns_and_can_only_time_out() {
    let mut drill = TestDrill::new().with_default_extinguisher();
    drill.request_start(Some(1.0)).tick(1);

    let kinds: Vec<WarningKind> = drill.warnings().into_iter().map(|w| w.kind).collect();
    assert_eq!(kinds, vec![WarningKind::NoFires]);

    drill.pull_aim_squeeze();
    drill.tick(60);
    drill.assert_failed(FailReason::TimeLimitExceeded);
}

#[test]
fn test_start_delay_holds_the_clock() {
    let mut drill = TestDrill::new()
        .with_params_edit(|p| p.evaluator.start_delay = 2.0)
        .with_fires(1)
        .with_test(30.0);

    drill.tick(99);
    assert_eq!(drill.evaluator().unwrap().phase(), EvaluatorPhase::Starting);
    drill.tick(1);
    assert_eq!(drill.evaluator().unwrap().elapsed(), 0.0);

    drill.tick(1);
    assert_eq!(drill.evaluator().unwrap().phase(), EvaluatorPhase::Running);
    assert!((drill.evaluator().unwrap().elapsed() - 0.02).abs() < 1e-9);
}

// ---------------------------------------------------------------------------
// Fail and fire commands
// ---------------------------------------------------------------------------

#[test]
fn test_fail_request_ends_running_test() {
    let mut drill = TestDrill::new().with_fires(1).with_test(30.0);
    drill.tick(5);
    drill.request_fail(FailReason::CriteriaNotMet).tick(1);
    drill.assert_failed(FailReason::CriteriaNotMet);

    // A finished test stays as reported.
    drill.request_fail(FailReason::TimeLimitExceeded).tick(1);
    drill.assert_failed(FailReason::CriteriaNotMet);
    assert_eq!(drill.completed_reports().len(), 1);
}

#[test]
fn test_forced_extinguish_counts_toward_pass() {
    let mut drill = TestDrill::new()
        .with_default_extinguisher()
        .with_fire(FireUnit::new(0.5))
        .with_fire(FireUnit::new(0.5))
        .with_test(30.0);
    let (a, b) = (drill.fire_ids()[0], drill.fire_ids()[1]);

    drill.pull_aim_squeeze();
    drill.force_fire(a, FireAction::Extinguish).tick(1);
    drill.assert_fire_extinguished(a);
    drill.assert_running();

    drill.force_fire(b, FireAction::Extinguish).tick(1);
    drill.assert_passed();
}

#[test]
fn test_forced_reignite_relights_fire() {
    let mut drill = TestDrill::new().with_fire(FireUnit::new(5.0));
    let fire = drill.fire_ids()[0];

    drill.force_fire(fire, FireAction::Extinguish).tick(1);
    drill.assert_fire_extinguished(fire);
    drill.force_fire(fire, FireAction::Reignite).tick(1);
    drill.assert_fire_burning(fire);
    assert_eq!(drill.intensity(fire), 1.0);
}

#[test]
fn test_despawned_fire_counts_as_extinguished() {
    let mut drill = TestDrill::new()
        .with_default_extinguisher()
        .with_fire(FireUnit::new(5.0))
        .with_fire(FireUnit::new(0.5))
        .with_test(30.0);
    let (a, b) = (drill.fire_ids()[0], drill.fire_ids()[1]);

    drill.pull_aim_squeeze().contact_enter(a).tick(10);
    drill.assert_fire_extinguished(a);
    drill.assert_running();

    drill.despawn_fire(b);
    drill.tick(1);
    drill.assert_passed();
    assert_eq!(drill.report().unwrap().fires_total, 2);
}

// ---------------------------------------------------------------------------
// Restart
// ---------------------------------------------------------------------------

#[test]
fn test_restart_resets_scene_and_keeps_limit() {
    let mut drill = TestDrill::new()
        .with_extinguisher(ExtinguisherUnit::new(10.0))
        .with_fire(FireUnit::new(0.5))
        .with_test(20.0);
    let fire = drill.fire_ids()[0];

    drill.pull_aim_squeeze().contact_enter(fire).tick(50);
    drill.assert_intensity_near(fire, 0.5, 1e-3);

    drill.request_restart().tick(1);

    drill.assert_fire_burning(fire);
    assert_eq!(drill.intensity(fire), 1.0);
    assert!(!drill.fire(fire).in_contact());

    let unit = drill.extinguisher().unwrap();
    assert_eq!(unit.state, ExtinguisherState::Locked);
    assert_eq!(unit.remaining_agent, 10.0);
    drill.assert_step(ProcedureStep::PullPin);

    let evaluator = drill.evaluator().unwrap();
    assert_eq!(evaluator.time_limit(), 20.0);
    assert!(evaluator.elapsed() < 0.05);
    drill.assert_running();

    let restarts = drill
        .journal()
        .records()
        .iter()
        .filter(|r| r.entry == JournalEntry::DrillRestarted)
        .count();
    assert_eq!(restarts, 1);
}

#[test]
fn test_restart_after_failure_runs_again() {
    let mut drill = TestDrill::new()
        .with_default_extinguisher()
        .with_fire(FireUnit::new(5.0))
        .with_test(1.0);
    let fire = drill.fire_ids()[0];
    drill.tick(50);
    drill.assert_failed(FailReason::TimeLimitExceeded);

    drill.request_restart().tick(1);
    drill.assert_running();

    drill.pull_aim_squeeze().contact_enter(fire).tick(10);
    drill.assert_passed();
    assert_eq!(drill.completed_reports().len(), 2);
}

#[test]
fn test_restart_without_test_only_resets() {
    let mut drill = TestDrill::new()
        .with_default_extinguisher()
        .with_fire(FireUnit::new(5.0));
    let fire = drill.fire_ids()[0];

    drill.pull_aim_squeeze().contact_enter(fire).tick(10);
    drill.assert_fire_extinguished(fire);

    drill.request_restart().tick(1);
    drill.assert_fire_burning(fire);
    assert!(drill.evaluator().is_none());
}
