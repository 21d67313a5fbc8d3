//! Text protocol types for the headless `firedrill` runner.
//!
//! Scripts and test rigs drive the drill over newline-delimited JSON on
//! stdin/stdout, standing in for the XR host: they send gestures and contact
//! events, step the fixed clock and read back status and reports.
//!
//! The types live here so they can be unit-tested without the binary. The I/O
//! loop lives in `crates/app/src/drill_mode.rs`.

use serde::{Deserialize, Serialize};

use crate::evaluator::TestReport;
use crate::fire_unit::{ContactKind, FireAction};
use crate::journal::JournalRecord;
use crate::status::DrillStatus;

// ---------------------------------------------------------------------------
// Commands (stdin → drill)
// ---------------------------------------------------------------------------

/// A host gesture, tagged by `kind`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GestureInput {
    PinPull { distance: f32 },
    NozzleAim { angle: f32 },
    TriggerPress { angle: f32 },
    TriggerRelease,
}

/// One command per stdin line; `cmd` is the discriminator.
#[derive(Debug, Deserialize)]
#[serde(tag = "cmd")]
pub enum DrillCommand {
    /// Apply a gesture on the next tick.
    #[serde(rename = "gesture")]
    Gesture { gesture: GestureInput },

    /// Agent volume entered or left a fire.
    #[serde(rename = "contact")]
    Contact { fire: u32, kind: ContactKind },

    /// Spawn a fire using `TrainingParams::fire`, optionally overriding decay
    /// and reignite delay.
    #[serde(rename = "spawn_fire")]
    SpawnFire {
        #[serde(default)]
        decay_rate: Option<f32>,
        #[serde(default)]
        reignite_delay: Option<f64>,
    },

    /// Force a fire out or alight.
    #[serde(rename = "fire")]
    Fire { fire: u32, action: FireAction },

    /// Start a test over every registered fire.
    #[serde(rename = "start")]
    Start {
        #[serde(default)]
        time_limit: Option<f64>,
    },

    /// Reset extinguisher, fires and procedure.
    #[serde(rename = "restart")]
    Restart,

    /// Advance `ticks` fixed ticks.
    #[serde(rename = "step")]
    Step { ticks: u64 },

    #[serde(rename = "status")]
    Status,

    /// The last finished test's report, if any.
    #[serde(rename = "report")]
    Report,

    /// Recent journal records, oldest first.
    #[serde(rename = "journal")]
    Journal {
        #[serde(default)]
        last: Option<usize>,
    },

    #[serde(rename = "quit")]
    Quit,
}

// ---------------------------------------------------------------------------
// Responses (drill → stdout)
// ---------------------------------------------------------------------------

/// Every response carries the protocol version and a tagged payload.
#[derive(Debug, Serialize)]
pub struct DrillResponse {
    pub protocol_version: u32,
    #[serde(flatten)]
    pub payload: ResponsePayload,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum ResponsePayload {
    #[serde(rename = "ready")]
    Ready,

    #[serde(rename = "ok")]
    Ok,

    #[serde(rename = "fire_spawned")]
    FireSpawned { fire: u32 },

    #[serde(rename = "step_complete")]
    StepComplete { tick: u64, time: f64 },

    #[serde(rename = "status")]
    Status { status: DrillStatus, line: String },

    #[serde(rename = "report")]
    Report {
        report: Option<TestReport>,
        panel: Option<String>,
    },

    #[serde(rename = "journal")]
    Journal { records: Vec<JournalRecord> },

    #[serde(rename = "error")]
    Error { message: String },

    #[serde(rename = "goodbye")]
    Goodbye,
}

/// Bump when the command/response schema changes.
pub const PROTOCOL_VERSION: u32 = 1;

pub fn make_response(payload: ResponsePayload) -> DrillResponse {
    DrillResponse {
        protocol_version: PROTOCOL_VERSION,
        payload,
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
