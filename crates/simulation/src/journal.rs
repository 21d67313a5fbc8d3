//! Ring-buffer journal of drill events.
//!
//! The [`DrillJournal`] resource keeps the last [`MAX_RECORDS`] timestamped
//! events of the session so hosts and the headless runner can replay what
//! happened without subscribing to every event type themselves.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::drill_clock::DrillClock;
use crate::evaluator::{DrillRestarted, TestCompleted, TestReport, TestStarted};
use crate::extinguisher::ExtinguisherEmptied;
use crate::fire_unit::{FireExtinguished, FireId, FireReignited};
use crate::procedure::{ProcedureAdvanced, ProcedureStep};
use crate::warnings::{DrillWarning, WarningKind};

/// Maximum number of records retained.
pub const MAX_RECORDS: usize = 256;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum JournalEntry {
    TestStarted { fires: usize, time_limit: f64 },
    DrillRestarted,
    ProcedureAdvanced { from: ProcedureStep, to: ProcedureStep },
    FireExtinguished { fire: FireId },
    FireReignited { fire: FireId },
    ExtinguisherEmptied,
    Warning { kind: WarningKind },
    TestCompleted { report: TestReport },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalRecord {
    pub at: f64,
    #[serde(flatten)]
    pub entry: JournalEntry,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct DrillJournal {
    records: Vec<JournalRecord>,
}

impl DrillJournal {
    /// Append a record, evicting the oldest when full.
    pub fn push(&mut self, at: f64, entry: JournalEntry) {
        if self.records.len() >= MAX_RECORDS {
            self.records.remove(0);
        }
        self.records.push(JournalRecord { at, entry });
    }

    /// The last `n` records (fewer if the journal is shorter), oldest first.
    pub fn last_n(&self, n: usize) -> &[JournalRecord] {
        let start = self.records.len().saturating_sub(n);
        &self.records[start..]
    }

    pub fn records(&self) -> &[JournalRecord] {
        &self.records
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Copies this tick's drill events into the journal.
#[allow(clippy::too_many_arguments)]
pub fn record_drill_events(
    clock: Res<DrillClock>,
    mut journal: ResMut<DrillJournal>,
    mut started: EventReader<TestStarted>,
    mut restarted: EventReader<DrillRestarted>,
    mut advanced: EventReader<ProcedureAdvanced>,
    mut extinguished: EventReader<FireExtinguished>,
    mut reignited: EventReader<FireReignited>,
    mut emptied: EventReader<ExtinguisherEmptied>,
    mut warnings: EventReader<DrillWarning>,
    mut completed: EventReader<TestCompleted>,
) {
    for e in restarted.read() {
        journal.push(e.at, JournalEntry::DrillRestarted);
    }
    for e in started.read() {
        journal.push(
            e.at,
            JournalEntry::TestStarted {
                fires: e.fires,
                time_limit: e.time_limit,
            },
        );
    }
    for e in warnings.read() {
        journal.push(e.at, JournalEntry::Warning { kind: e.kind });
    }
    for e in advanced.read() {
        journal.push(
            e.at,
            JournalEntry::ProcedureAdvanced {
                from: e.from,
                to: e.to,
            },
        );
    }
    for e in emptied.read() {
        journal.push(e.at, JournalEntry::ExtinguisherEmptied);
    }
    for e in extinguished.read() {
        journal.push(e.at, JournalEntry::FireExtinguished { fire: e.fire });
    }
    for e in reignited.read() {
        journal.push(e.at, JournalEntry::FireReignited { fire: e.fire });
    }
    for e in completed.read() {
        journal.push(
            clock.now(),
            JournalEntry::TestCompleted {
                report: e.report.clone(),
            },
        );
    }
}

pub struct DrillJournalPlugin;

impl Plugin for DrillJournalPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DrillJournal>().add_systems(
            FixedUpdate,
            record_drill_events.in_set(crate::SimulationSet::PostSim),
        );
    }
}
