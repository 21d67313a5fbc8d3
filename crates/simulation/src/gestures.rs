//! Host gestures driving the extinguisher and the PAS procedure.
//!
//! The XR layer reports raw magnitudes (pin travel, nozzle and trigger
//! rotation). A gesture only counts once it crosses the threshold configured in
//! [`GestureParams`]; below that it is ignored. Counted gestures move the
//! [`ProcedureTracker`] forward when it is at the matching step and are
//! silently ignored out of sequence, except for trigger squeezes, which are
//! refused with a [`DrillWarning`] so the trainee learns why nothing sprayed.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::drill_clock::DrillClock;
use crate::extinguisher::{ExtinguisherUnit, TriggerRejection};
use crate::procedure::{ProcedureAdvanced, ProcedureStep, ProcedureTracker};
use crate::training_params::{GestureParams, TrainingParams};
use crate::warnings::{DrillWarning, WarningKind};

// =============================================================================
// Events
// =============================================================================

/// Safety pin moved `distance` local units out of its seat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinPullGesture {
    pub distance: f32,
}

/// Nozzle rotated `angle` degrees from rest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NozzleAimGesture {
    pub angle: f32,
}

/// Trigger handle rotated `angle` degrees from rest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerPressGesture {
    pub angle: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TriggerReleaseGesture;

/// One host gesture. All gestures share a single event queue so a tick
/// applies them in the order the host sent them.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    PinPull(PinPullGesture),
    NozzleAim(NozzleAimGesture),
    TriggerPress(TriggerPressGesture),
    TriggerRelease(TriggerReleaseGesture),
}

impl From<PinPullGesture> for Gesture {
    fn from(gesture: PinPullGesture) -> Self {
        Gesture::PinPull(gesture)
    }
}

impl From<NozzleAimGesture> for Gesture {
    fn from(gesture: NozzleAimGesture) -> Self {
        Gesture::NozzleAim(gesture)
    }
}

impl From<TriggerPressGesture> for Gesture {
    fn from(gesture: TriggerPressGesture) -> Self {
        Gesture::TriggerPress(gesture)
    }
}

impl From<TriggerReleaseGesture> for Gesture {
    fn from(gesture: TriggerReleaseGesture) -> Self {
        Gesture::TriggerRelease(gesture)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GestureOutcome {
    /// Magnitude below the threshold.
    BelowThreshold,
    /// Counted, but nothing left to do (repeat or out of sequence).
    Ignored,
    Accepted,
    Rejected(TriggerRejection),
}

// =============================================================================
// Thresholds
// =============================================================================

pub fn pin_pulled(distance: f32, params: &GestureParams) -> bool {
    distance.min(params.pin_max_distance) >= params.pin_pull_distance
}

pub fn nozzle_aimed(angle: f32, params: &GestureParams) -> bool {
    angle.abs().min(params.nozzle_max_angle) >= params.nozzle_threshold()
}

pub fn trigger_squeezed(angle: f32, params: &GestureParams) -> bool {
    angle.abs().min(params.trigger_max_angle) >= params.trigger_threshold()
}

// =============================================================================
// Gesture application
// =============================================================================

pub fn apply_pin_pull(
    distance: f32,
    params: &GestureParams,
    unit: &mut ExtinguisherUnit,
    tracker: &mut ProcedureTracker,
) -> GestureOutcome {
    if !pin_pulled(distance, params) {
        return GestureOutcome::BelowThreshold;
    }
    let removed = unit.pull_pin();
    let advanced = tracker.advance(ProcedureStep::PullPin, ProcedureStep::AimNozzle);
    if removed || advanced {
        GestureOutcome::Accepted
    } else {
        GestureOutcome::Ignored
    }
}

pub fn apply_nozzle_aim(
    angle: f32,
    params: &GestureParams,
    tracker: &mut ProcedureTracker,
) -> GestureOutcome {
    if !nozzle_aimed(angle, params) {
        return GestureOutcome::BelowThreshold;
    }
    if tracker.advance(ProcedureStep::AimNozzle, ProcedureStep::PressHandle) {
        GestureOutcome::Accepted
    } else {
        GestureOutcome::Ignored
    }
}

/// A squeeze moves the procedure to `Spray` before the extinguisher is asked
/// to spray, so an empty unit still completes the sequence. With
/// `enforce_procedure` off the unit sprays whenever the pin is out.
pub fn apply_trigger_press(
    angle: f32,
    params: &GestureParams,
    unit: &mut ExtinguisherUnit,
    tracker: &mut ProcedureTracker,
) -> GestureOutcome {
    if !trigger_squeezed(angle, params) {
        return GestureOutcome::BelowThreshold;
    }
    if !unit.is_pin_removed() {
        return GestureOutcome::Rejected(TriggerRejection::PinInPlace);
    }
    tracker.advance(ProcedureStep::PressHandle, ProcedureStep::Spray);
    if params.enforce_procedure && !tracker.allows_spray() {
        return GestureOutcome::Rejected(TriggerRejection::OutOfSequence);
    }
    match unit.press_trigger() {
        Ok(()) => GestureOutcome::Accepted,
        Err(reason) => GestureOutcome::Rejected(reason),
    }
}

pub fn apply_trigger_release(unit: &mut ExtinguisherUnit) -> GestureOutcome {
    if unit.release_trigger() {
        GestureOutcome::Accepted
    } else {
        GestureOutcome::Ignored
    }
}

// =============================================================================
// System
// =============================================================================

/// Applies this tick's gestures to the single extinguisher.
///
/// 1. Gestures are applied in arrival order, so a release followed by a
///    squeeze in the same tick leaves the unit spraying.
/// 2. Every procedure step change is published as `ProcedureAdvanced`.
/// 3. Refused squeezes are published as `DrillWarning`.
/// 4. With no extinguisher, gestures are drained and reported as a warning.
pub fn apply_gestures(
    clock: Res<DrillClock>,
    params: Res<TrainingParams>,
    mut gestures: EventReader<Gesture>,
    mut units: Query<&mut ExtinguisherUnit>,
    mut tracker: ResMut<ProcedureTracker>,
    mut advanced: EventWriter<ProcedureAdvanced>,
    mut warnings: EventWriter<DrillWarning>,
) {
    let now = clock.now();
    let thresholds = &params.gestures;

    let Ok(mut unit) = units.get_single_mut() else {
        let dropped = gestures.read().count();
        if dropped > 0 {
            warn!("Dropped {} gesture(s): no single extinguisher present", dropped);
            warnings.send(DrillWarning {
                at: now,
                kind: WarningKind::NoExtinguisher,
            });
        }
        return;
    };

    for gesture in gestures.read() {
        let before = tracker.step();
        let outcome = match *gesture {
            Gesture::PinPull(PinPullGesture { distance }) => {
                let outcome = apply_pin_pull(distance, thresholds, &mut unit, &mut tracker);
                if outcome == GestureOutcome::Accepted {
                    info!("Safety pin removed at {:.2}s", now);
                }
                outcome
            }
            Gesture::NozzleAim(NozzleAimGesture { angle }) => {
                apply_nozzle_aim(angle, thresholds, &mut tracker)
            }
            Gesture::TriggerPress(TriggerPressGesture { angle }) => {
                apply_trigger_press(angle, thresholds, &mut unit, &mut tracker)
            }
            Gesture::TriggerRelease(_) => apply_trigger_release(&mut unit),
        };

        let after = tracker.step();
        if after != before {
            info!("Procedure: {:?} -> {:?} at {:.2}s", before, after, now);
            advanced.send(ProcedureAdvanced {
                from: before,
                to: after,
                at: now,
            });
        }
        if let GestureOutcome::Rejected(reason) = outcome {
            warn!("Trigger squeeze refused: {}", reason);
            warnings.send(DrillWarning {
                at: now,
                kind: WarningKind::TriggerRejected(reason),
            });
        }
    }
}

pub struct GesturesPlugin;

impl Plugin for GesturesPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<Gesture>().add_systems(
            FixedUpdate,
            apply_gestures.in_set(crate::SimulationSet::Input),
        );
    }
}
