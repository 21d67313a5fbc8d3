use crate::extinguisher::{ExtinguisherState, ExtinguisherUnit, TriggerRejection};
use crate::fire_unit::FireUnit;
use crate::gestures::{NozzleAimGesture, PinPullGesture, TriggerPressGesture};
use crate::journal::JournalEntry;
use crate::procedure::ProcedureStep;
use crate::test_harness::TestDrill;
use crate::warnings::WarningKind;

fn rejections(drill: &TestDrill) -> Vec<TriggerRejection> {
    drill
        .warnings()
        .into_iter()
        .filter_map(|w| match w.kind {
            WarningKind::TriggerRejected(reason) => Some(reason),
            _ => None,
        })
        .collect()
}

#[test]
fn test_procedure_begins_once_extinguisher_exists() {
    let mut drill = TestDrill::new();
    drill.tick(5);
    drill.assert_step(ProcedureStep::None);

    drill.spawn_extinguisher(ExtinguisherUnit::default());
    drill.tick(1);
    drill.assert_step(ProcedureStep::PullPin);
    assert_eq!(drill.status().prompt.as_deref(), Some("Step 1: Pull the Pin"));
}

#[test]
fn test_pas_one_gesture_per_tick() {
    let mut drill = TestDrill::new().with_default_extinguisher();
    drill.tick(1);
    drill.assert_step(ProcedureStep::PullPin);

    drill.pull_pin().tick(1);
    drill.assert_step(ProcedureStep::AimNozzle);
    assert!(drill.extinguisher().unwrap().is_pin_removed());

    drill.aim_nozzle().tick(1);
    drill.assert_step(ProcedureStep::PressHandle);

    drill.squeeze_trigger().tick(1);
    drill.assert_step(ProcedureStep::Spray);
    assert_eq!(drill.extinguisher().unwrap().state, ExtinguisherState::Spraying);
    assert!(drill.agent_volume().unwrap().active);
    assert!(rejections(&drill).is_empty());

    let advances: Vec<(ProcedureStep, ProcedureStep)> = drill
        .journal()
        .records()
        .iter()
        .filter_map(|r| match r.entry {
            JournalEntry::ProcedureAdvanced { from, to } => Some((from, to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        advances,
        vec![
            (ProcedureStep::None, ProcedureStep::PullPin),
            (ProcedureStep::PullPin, ProcedureStep::AimNozzle),
            (ProcedureStep::AimNozzle, ProcedureStep::PressHandle),
            (ProcedureStep::PressHandle, ProcedureStep::Spray),
        ]
    );
}

#[test]
fn test_squeeze_with_pin_in_is_refused() {
    let mut drill = TestDrill::new().with_default_extinguisher();
    drill.squeeze_trigger().tick(1);

    drill.assert_step(ProcedureStep::PullPin);
    assert_eq!(drill.extinguisher().unwrap().state, ExtinguisherState::Locked);
    assert_eq!(rejections(&drill), vec![TriggerRejection::PinInPlace]);
}

#[test]
fn test_squeeze_before_aim_is_refused_then_accepted() {
    let mut drill = TestDrill::new().with_default_extinguisher();
    drill.pull_pin().squeeze_trigger().tick(1);

    drill.assert_step(ProcedureStep::AimNozzle);
    assert_eq!(drill.extinguisher().unwrap().state, ExtinguisherState::Idle);
    assert_eq!(rejections(&drill), vec![TriggerRejection::OutOfSequence]);

    drill.aim_nozzle().squeeze_trigger().tick(1);
    drill.assert_step(ProcedureStep::Spray);
    assert_eq!(drill.extinguisher().unwrap().state, ExtinguisherState::Spraying);
}

#[test]
fn test_out_of_sequence_aim_is_ignored() {
    let mut drill = TestDrill::new().with_default_extinguisher();
    drill.aim_nozzle().tick(1);
    drill.assert_step(ProcedureStep::PullPin);

    drill.pull_pin().tick(1);
    drill.assert_step(ProcedureStep::AimNozzle);
}

#[test]
fn test_weak_gestures_do_not_count() {
    let mut drill = TestDrill::new().with_default_extinguisher();
    drill.gesture(PinPullGesture { distance: 1.0 }).tick(1);
    drill.assert_step(ProcedureStep::PullPin);
    assert!(!drill.extinguisher().unwrap().is_pin_removed());

    drill.pull_pin().gesture(NozzleAimGesture { angle: 30.0 }).tick(1);
    drill.assert_step(ProcedureStep::AimNozzle);

    drill.aim_nozzle().gesture(TriggerPressGesture { angle: 5.0 }).tick(1);
    drill.assert_step(ProcedureStep::PressHandle);
    assert!(!drill.extinguisher().unwrap().is_trigger_pressed());
    assert!(rejections(&drill).is_empty());
}

#[test]
fn test_release_and_squeeze_again_after_spray_step() {
    let mut drill = TestDrill::new().with_default_extinguisher();
    drill.pull_aim_squeeze().tick(1);
    drill.release_trigger().tick(1);
    assert_eq!(drill.extinguisher().unwrap().state, ExtinguisherState::Idle);
    drill.assert_step(ProcedureStep::Spray);

    drill.squeeze_trigger().tick(1);
    assert_eq!(drill.extinguisher().unwrap().state, ExtinguisherState::Spraying);
}

#[test]
fn test_trigger_gestures_in_one_tick_apply_in_order() {
    let mut drill = TestDrill::new().with_default_extinguisher();
    drill.pull_aim_squeeze().tick(1);
    assert!(drill.extinguisher().unwrap().is_trigger_pressed());

    // Let go and squeeze again before the next tick: still spraying.
    drill.release_trigger().squeeze_trigger().tick(1);
    assert!(drill.extinguisher().unwrap().is_trigger_pressed());
    assert_eq!(drill.extinguisher().unwrap().state, ExtinguisherState::Spraying);
    assert!(drill.spray_effects().unwrap().audio_playing);

    // The other way round ends released.
    drill.squeeze_trigger().release_trigger().tick(1);
    assert!(!drill.extinguisher().unwrap().is_trigger_pressed());
    assert_eq!(drill.extinguisher().unwrap().state, ExtinguisherState::Idle);
    assert!(rejections(&drill).is_empty());
}

#[test]
fn test_aim_before_pin_in_one_tick_is_ignored() {
    let mut drill = TestDrill::new().with_default_extinguisher();
    drill.aim_nozzle().pull_pin().tick(1);
    drill.assert_step(ProcedureStep::AimNozzle);

    drill.aim_nozzle().tick(1);
    drill.assert_step(ProcedureStep::PressHandle);
}

#[test]
fn test_free_play_sprays_without_aiming() {
    let mut drill = TestDrill::new()
        .with_params_edit(|p| p.gestures.enforce_procedure = false)
        .with_default_extinguisher();
    drill.pull_pin().squeeze_trigger().tick(1);

    assert_eq!(drill.extinguisher().unwrap().state, ExtinguisherState::Spraying);
    drill.assert_step(ProcedureStep::AimNozzle);
    assert!(rejections(&drill).is_empty());
}

#[test]
fn test_gestures_without_extinguisher_warn_once_per_tick() {
    let mut drill = TestDrill::new().with_fire(FireUnit::new(0.5));
    drill.pull_aim_squeeze().tick(1);

    drill.assert_step(ProcedureStep::None);
    let kinds: Vec<WarningKind> = drill.warnings().into_iter().map(|w| w.kind).collect();
    assert_eq!(kinds, vec![WarningKind::NoExtinguisher]);

    // Drained: a quiet tick adds nothing.
    drill.tick(1);
    assert_eq!(drill.warnings().len(), 1);
}

#[test]
fn test_empty_unit_completes_procedure_but_refuses_spray() {
    let mut drill = TestDrill::new().with_extinguisher(ExtinguisherUnit::new(0.0));
    drill.pull_aim_squeeze().tick(1);

    drill.assert_step(ProcedureStep::Spray);
    assert_eq!(rejections(&drill), vec![TriggerRejection::Empty]);
    assert!(!drill.agent_volume().unwrap().active);
}
