//! Trainee and host input helpers for `TestDrill`.

use bevy::prelude::*;

use crate::evaluator::{FailDrill, FailReason, RestartDrill, StartDrill};
use crate::fire_unit::{AgentContact, FireAction, FireCommand, FireId};
use crate::gestures::{
    Gesture, NozzleAimGesture, PinPullGesture, TriggerPressGesture, TriggerReleaseGesture,
};

use super::TestDrill;

impl TestDrill {
    /// Queue any event for the next tick.
    pub fn send<E: Event>(&mut self, event: E) -> &mut Self {
        self.app.world_mut().send_event(event);
        self
    }

    // -----------------------------------------------------------------------
    // Gestures (full-magnitude by default)
    // -----------------------------------------------------------------------

    pub fn gesture(&mut self, gesture: impl Into<Gesture>) -> &mut Self {
        self.send(gesture.into())
    }

    pub fn pull_pin(&mut self) -> &mut Self {
        self.gesture(PinPullGesture { distance: 2.0 })
    }

    pub fn aim_nozzle(&mut self) -> &mut Self {
        self.gesture(NozzleAimGesture { angle: 90.0 })
    }

    pub fn squeeze_trigger(&mut self) -> &mut Self {
        self.gesture(TriggerPressGesture { angle: 90.0 })
    }

    pub fn release_trigger(&mut self) -> &mut Self {
        self.gesture(TriggerReleaseGesture)
    }

    /// Pull, aim and squeeze in one tick's worth of events.
    pub fn pull_aim_squeeze(&mut self) -> &mut Self {
        self.pull_pin().aim_nozzle().squeeze_trigger()
    }

    // -----------------------------------------------------------------------
    // Contacts and fire control
    // -----------------------------------------------------------------------

    pub fn contact_enter(&mut self, fire: FireId) -> &mut Self {
        self.send(AgentContact::enter(fire))
    }

    pub fn contact_exit(&mut self, fire: FireId) -> &mut Self {
        self.send(AgentContact::exit(fire))
    }

    pub fn force_fire(&mut self, fire: FireId, action: FireAction) -> &mut Self {
        self.send(FireCommand { fire, action })
    }

    // -----------------------------------------------------------------------
    // Drill control
    // -----------------------------------------------------------------------

    pub fn request_start(&mut self, time_limit: Option<f64>) -> &mut Self {
        self.send(StartDrill { time_limit })
    }

    pub fn request_restart(&mut self) -> &mut Self {
        self.send(RestartDrill)
    }

    pub fn request_fail(&mut self, reason: FailReason) -> &mut Self {
        self.send(FailDrill { reason })
    }
}
