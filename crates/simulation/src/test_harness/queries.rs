//! Query and simulation-tick methods for `TestDrill`.

use bevy::prelude::*;

use crate::drill_clock::DrillClock;
use crate::effects::{FireEffects, SprayEffects};
use crate::evaluator::{TestCompleted, TestEvaluator, TestReport};
use crate::extinguisher::{AgentVolume, ExtinguisherUnit};
use crate::fire_unit::{FireId, FireRegistry, FireUnit};
use crate::journal::DrillJournal;
use crate::procedure::{ProcedureStep, ProcedureTracker};
use crate::status::DrillStatus;
use crate::warnings::DrillWarning;

use super::TestDrill;

impl TestDrill {
    // -----------------------------------------------------------------------
    // Simulation
    // -----------------------------------------------------------------------

    /// Run N fixed ticks by executing the `FixedUpdate` schedule directly,
    /// bypassing Bevy's virtual time so every tick is exactly one
    /// `DrillClock` step.
    pub fn tick(&mut self, n: u32) -> &mut Self {
        for _ in 0..n {
            self.app.world_mut().run_schedule(FixedUpdate);
        }
        self
    }

    /// Run enough ticks to cover `seconds` of drill time.
    pub fn tick_seconds(&mut self, seconds: f64) -> &mut Self {
        let step = self.clock().step;
        let n = if step > 0.0 {
            (seconds / step).round() as u32
        } else {
            0
        };
        self.tick(n)
    }

    /// Tick until `done` holds or `max` ticks pass. Returns the ticks taken.
    pub fn tick_until(&mut self, max: u32, mut done: impl FnMut(&mut Self) -> bool) -> Option<u32> {
        for i in 1..=max {
            self.tick(1);
            if done(self) {
                return Some(i);
            }
        }
        None
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    pub fn resource<R: Resource>(&self) -> &R {
        self.app.world().resource::<R>()
    }

    pub fn clock(&self) -> &DrillClock {
        self.resource::<DrillClock>()
    }

    pub fn now(&self) -> f64 {
        self.clock().now()
    }

    /// Ids of fires spawned through the harness, in spawn order.
    pub fn fire_ids(&self) -> &[FireId] {
        &self.fires
    }

    pub fn fire_entity(&self, id: FireId) -> Option<Entity> {
        self.resource::<FireRegistry>().get(id)
    }

    /// The fire's current state. Panics if the fire is not registered.
    pub fn fire(&self, id: FireId) -> &FireUnit {
        let entity = self
            .fire_entity(id)
            .unwrap_or_else(|| panic!("fire {id} is not registered"));
        self.app
            .world()
            .get::<FireUnit>(entity)
            .unwrap_or_else(|| panic!("fire {id} has no FireUnit"))
    }

    pub fn fire_effects(&self, id: FireId) -> &FireEffects {
        let entity = self
            .fire_entity(id)
            .unwrap_or_else(|| panic!("fire {id} is not registered"));
        self.app
            .world()
            .get::<FireEffects>(entity)
            .unwrap_or_else(|| panic!("fire {id} has no FireEffects"))
    }

    pub fn intensity(&self, id: FireId) -> f32 {
        self.fire(id).intensity
    }

    pub fn extinguisher(&mut self) -> Option<ExtinguisherUnit> {
        let world = self.app.world_mut();
        let mut query = world.query::<&ExtinguisherUnit>();
        query.get_single(world).ok().cloned()
    }

    pub fn agent_volume(&mut self) -> Option<AgentVolume> {
        let world = self.app.world_mut();
        let mut query = world.query::<&AgentVolume>();
        query.get_single(world).ok().copied()
    }

    pub fn spray_effects(&mut self) -> Option<SprayEffects> {
        let world = self.app.world_mut();
        let mut query = world.query::<&SprayEffects>();
        query.get_single(world).ok().copied()
    }

    pub fn step(&self) -> ProcedureStep {
        self.resource::<ProcedureTracker>().step()
    }

    pub fn evaluator(&self) -> Option<&TestEvaluator> {
        self.app.world().get_resource::<TestEvaluator>()
    }

    pub fn report(&self) -> Option<&TestReport> {
        self.evaluator().and_then(TestEvaluator::report)
    }

    pub fn status(&self) -> &DrillStatus {
        self.resource::<DrillStatus>()
    }

    pub fn journal(&self) -> &DrillJournal {
        self.resource::<DrillJournal>()
    }

    /// Every `TestCompleted` sent so far.
    pub fn completed_reports(&self) -> Vec<TestReport> {
        let events = self.resource::<Events<TestCompleted>>();
        let mut cursor = events.get_cursor();
        cursor.read(events).map(|e| e.report.clone()).collect()
    }

    /// Every `DrillWarning` sent so far.
    pub fn warnings(&self) -> Vec<DrillWarning> {
        let events = self.resource::<Events<DrillWarning>>();
        let mut cursor = events.get_cursor();
        cursor.read(events).cloned().collect()
    }
}
