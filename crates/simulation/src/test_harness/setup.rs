//! Builder methods for scene setup in integration tests.

use bevy::prelude::*;

use crate::drill_clock::DrillClock;
use crate::evaluator::TestEvaluator;
use crate::extinguisher::{ExtinguisherBundle, ExtinguisherUnit};
use crate::fire_unit::{FireBundle, FireId, FireRegistry, FireUnit};
use crate::training_params::TrainingParams;

use super::TestDrill;

impl TestDrill {
    // -----------------------------------------------------------------------
    // Parameters
    // -----------------------------------------------------------------------

    /// Replace the drill parameters. The clock step follows `tick_seconds`
    /// immediately so ticks taken before the next `app.update()` use it.
    pub fn with_params(mut self, params: TrainingParams) -> Self {
        let world = self.app.world_mut();
        world.resource_mut::<DrillClock>().step = params.tick_seconds.max(0.0);
        world.insert_resource(params);
        self
    }

    /// Tweak the current parameters in place.
    pub fn with_params_edit(self, edit: impl FnOnce(&mut TrainingParams)) -> Self {
        let mut params = self.resource::<TrainingParams>().clone();
        edit(&mut params);
        self.with_params(params)
    }

    // -----------------------------------------------------------------------
    // Entities
    // -----------------------------------------------------------------------

    /// Spawn the trainee's extinguisher.
    pub fn with_extinguisher(mut self, unit: ExtinguisherUnit) -> Self {
        self.spawn_extinguisher(unit);
        self
    }

    /// Spawn an extinguisher built from the current parameters.
    pub fn with_default_extinguisher(self) -> Self {
        let unit = ExtinguisherUnit::from_params(&self.resource::<TrainingParams>().extinguisher);
        self.with_extinguisher(unit)
    }

    /// Spawn a fire. Ids are handed out in spawn order starting at 0; see
    /// [`TestDrill::fire_ids`].
    pub fn with_fire(mut self, unit: FireUnit) -> Self {
        self.spawn_fire(unit);
        self
    }

    /// Spawn `n` fires built from the current parameters.
    pub fn with_fires(mut self, n: usize) -> Self {
        for _ in 0..n {
            let unit = FireUnit::from_params(&self.resource::<TrainingParams>().fire);
            self.spawn_fire(unit);
        }
        self
    }

    pub fn spawn_extinguisher(&mut self, unit: ExtinguisherUnit) -> Entity {
        self.app
            .world_mut()
            .spawn(ExtinguisherBundle::new(unit))
            .id()
    }

    /// Spawn a fire mid-test and register it right away.
    pub fn spawn_fire(&mut self, unit: FireUnit) -> FireId {
        let world = self.app.world_mut();
        let id = world.resource_mut::<FireRegistry>().allocate();
        let entity = world.spawn(FireBundle::new(id, unit)).id();
        world.resource_mut::<FireRegistry>().insert(id, entity);
        self.fires.push(id);
        id
    }

    /// Despawn a fire entity; the registry drops it on the next tick.
    pub fn despawn_fire(&mut self, id: FireId) {
        let world = self.app.world_mut();
        if let Some(entity) = world.resource::<FireRegistry>().get(id) {
            world.despawn(entity);
        }
        self.fires.retain(|f| *f != id);
    }

    // -----------------------------------------------------------------------
    // Test control
    // -----------------------------------------------------------------------

    /// Install a test over every registered fire, bypassing `StartDrill` so it
    /// is running from the very next tick.
    pub fn with_test(mut self, time_limit: f64) -> Self {
        self.install_test(time_limit);
        self
    }

    pub fn install_test(&mut self, time_limit: f64) {
        let world = self.app.world_mut();
        let start_delay = world.resource::<TrainingParams>().evaluator.start_delay;
        let fires: Vec<FireId> = world.resource::<FireRegistry>().ids().collect();
        world.insert_resource(TestEvaluator::new(fires, time_limit).with_start_delay(start_delay));
    }
}
