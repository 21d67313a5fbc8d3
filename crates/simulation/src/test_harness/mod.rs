//! # TestDrill: headless integration test harness for the drill core
//!
//! Wraps `bevy::app::App` + `SimulationPlugin` in a fluent builder so tests
//! can set up fires and an extinguisher, feed gestures and contacts, tick the
//! fixed schedule and assert on the result without a window or XR runtime.

mod assertions;
mod input;
mod queries;
mod setup;

use bevy::app::App;
use bevy::prelude::*;

use crate::fire_unit::FireId;
use crate::SimulationPlugin;

/// A headless Bevy App wrapping `SimulationPlugin` for integration testing.
///
/// Use the `with_*` builders to set up the scene, the input helpers to act as
/// the trainee, then `tick()` and query or assert on the ECS state.
pub struct TestDrill {
    app: App,
    fires: Vec<FireId>,
}

impl TestDrill {
    /// An empty drill: default `TrainingParams`, no fires, no extinguisher,
    /// no test running.
    pub fn new() -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(SimulationPlugin);

        // Run one update so Startup and the params sync execute.
        app.update();

        Self {
            app,
            fires: Vec::new(),
        }
    }
}

impl Default for TestDrill {
    fn default() -> Self {
        Self::new()
    }
}
