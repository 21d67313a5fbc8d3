use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::extinguisher::TriggerRejection;
use crate::fire_unit::FireId;

/// Why a drill operation was ignored.
///
/// Invalid operations never panic; the system that rejects them emits a
/// [`DrillWarning`] so hosts can surface it next to the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// A trigger squeeze was refused by the extinguisher or the procedure.
    TriggerRejected(TriggerRejection),
    /// A contact or control event named a fire that is not registered.
    UnknownFire(FireId),
    /// A gesture arrived with no extinguisher in the scene.
    NoExtinguisher,
    /// A start request arrived while a test was still running.
    TestAlreadyRunning,
    /// A start request arrived with no fires to score.
    NoFires,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TriggerRejected(reason) => write!(f, "trigger rejected: {reason}"),
            Self::UnknownFire(id) => write!(f, "unknown fire {id}"),
            Self::NoExtinguisher => write!(f, "no extinguisher present"),
            Self::TestAlreadyRunning => write!(f, "a test is already running"),
            Self::NoFires => write!(f, "no fires registered"),
        }
    }
}

/// Non-fatal drill warning, timestamped with drill time.
#[derive(Event, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrillWarning {
    pub at: f64,
    pub kind: WarningKind,
}

pub struct DrillWarningsPlugin;

impl Plugin for DrillWarningsPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<DrillWarning>();
    }
}
