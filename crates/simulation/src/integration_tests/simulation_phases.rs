//! Ordering of the fixed-tick phases: every system sees this tick's state
//! from the phases before it, never last tick's.

use bevy::prelude::*;

use crate::extinguisher::ExtinguisherUnit;
use crate::fire_unit::{AgentContact, FireUnit};
use crate::gestures::Gesture;
use crate::journal::JournalEntry;
use crate::run_fixed_tick;
use crate::simulation_sets::SimulationSet;
use crate::test_harness::TestDrill;

#[test]
fn test_set_order_is_input_to_evaluation() {
    assert_eq!(
        SimulationSet::ORDER,
        [
            SimulationSet::PreSim,
            SimulationSet::Input,
            SimulationSet::Extinguisher,
            SimulationSet::Fire,
            SimulationSet::Evaluation,
            SimulationSet::PostSim,
        ]
    );
}

#[test]
fn test_squeeze_and_contact_decay_in_the_same_tick() {
    let mut drill = TestDrill::new()
        .with_default_extinguisher()
        .with_fire(FireUnit::new(0.5));
    let fire = drill.fire_ids()[0];

    drill.pull_aim_squeeze().contact_enter(fire).tick(1);
    drill.assert_intensity_near(fire, 0.99, 1e-5);
    assert!(drill.agent_volume().unwrap().active);
}

#[test]
fn test_running_dry_stops_decay_on_that_tick() {
    let mut drill = TestDrill::new()
        .with_extinguisher(ExtinguisherUnit::new(0.5))
        .with_fire(FireUnit::new(0.5));
    let fire = drill.fire_ids()[0];

    drill.pull_aim_squeeze().contact_enter(fire);
    let emptied_at = drill.tick_until(100, |d| d.extinguisher().is_some_and(|u| u.is_empty()));
    assert_eq!(emptied_at, Some(25));

    // Ticks 1..=24 decayed; tick 25 ran dry before the fire phase.
    drill.assert_intensity_near(fire, 0.76, 1e-3);
    assert!(!drill.fire(fire).in_contact());
    assert!(!drill.agent_volume().unwrap().active);

    drill.tick(50);
    drill.assert_intensity_near(fire, 0.76, 1e-3);

    let emptied = drill
        .journal()
        .records()
        .iter()
        .filter(|r| r.entry == JournalEntry::ExtinguisherEmptied)
        .count();
    assert_eq!(emptied, 1);
}

#[test]
fn test_report_lands_on_extinguish_tick() {
    let mut drill = TestDrill::new()
        .with_default_extinguisher()
        .with_fire(FireUnit::new(5.0))
        .with_test(30.0);
    let fire = drill.fire_ids()[0];

    drill.pull_aim_squeeze().contact_enter(fire);
    let ticks = drill.tick_until(100, |d| d.report().is_some());
    assert_eq!(ticks, Some(10));

    // Extinguish, then completion, both journaled on the same tick.
    let tail: Vec<&JournalEntry> = drill.journal().last_n(2).iter().map(|r| &r.entry).collect();
    assert_eq!(tail[0], &JournalEntry::FireExtinguished { fire });
    assert!(matches!(tail[1], JournalEntry::TestCompleted { .. }));
}

#[test]
fn test_status_matches_the_tick_it_follows() {
    let mut drill = TestDrill::new()
        .with_default_extinguisher()
        .with_fires(2)
        .with_test(30.0);

    drill.pull_aim_squeeze().tick(1);
    let status = drill.status().clone();
    assert_eq!(status.tick, 1);
    assert!(status.spraying);
    assert!(status.pin_removed);
    assert_eq!(status.fires_burning, 2);
    assert!((status.elapsed - 0.02).abs() < 1e-9);
}

#[test]
fn test_fixed_tick_keeps_event_queues_bounded() {
    let mut drill = TestDrill::new()
        .with_default_extinguisher()
        .with_fire(FireUnit::new(0.5));
    let fire = drill.fire_ids()[0];

    for _ in 0..1000 {
        drill.contact_enter(fire).contact_exit(fire);
        run_fixed_tick(drill.world_mut());
    }

    assert_eq!(drill.clock().ticks, 1000);
    assert!(drill.resource::<Events<AgentContact>>().len() <= 2);
    assert!(drill.resource::<Events<Gesture>>().is_empty());
    assert!(!drill.fire(fire).in_contact());
}

#[test]
fn test_fixed_tick_applies_each_event_once() {
    let mut stepped = TestDrill::new()
        .with_default_extinguisher()
        .with_fire(FireUnit::new(5.0))
        .with_test(30.0);
    let mut ticked = TestDrill::new()
        .with_default_extinguisher()
        .with_fire(FireUnit::new(5.0))
        .with_test(30.0);
    let fire = stepped.fire_ids()[0];

    stepped.pull_aim_squeeze().contact_enter(fire);
    ticked.pull_aim_squeeze().contact_enter(fire);
    for _ in 0..12 {
        run_fixed_tick(stepped.world_mut());
    }
    ticked.tick(12);

    stepped.assert_passed();
    assert_eq!(stepped.journal().records(), ticked.journal().records());
}
