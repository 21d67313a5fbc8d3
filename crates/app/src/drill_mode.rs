//! Headless drill runner: a blocking synchronous loop that reads JSON
//! commands from stdin and writes JSON responses to stdout.
//!
//! The runner stands in for the XR host. It owns one extinguisher, spawns
//! fires on request and only advances the fixed clock on `step` commands, so
//! scripted sessions are fully deterministic.
//!
//! ## Protocol
//!
//! Each line of stdin is a JSON object with a `"cmd"` discriminator.
//! Each line of stdout is a JSON response with `"protocol_version"` and
//! `"type"` fields. See [`simulation::drill_protocol`] for the full schema.

use std::io::{BufRead, Write};

use bevy::log::LogPlugin;
use bevy::prelude::*;

use simulation::drill_clock::DrillClock;
use simulation::drill_protocol::{
    make_response, DrillCommand, DrillResponse, GestureInput, ResponsePayload, PROTOCOL_VERSION,
};
use simulation::evaluator::{RestartDrill, StartDrill, TestEvaluator};
use simulation::extinguisher::{ExtinguisherBundle, ExtinguisherUnit};
use simulation::fire_unit::{
    AgentContact, FireBundle, FireCommand, FireId, FireRegistry, FireUnit,
};
use simulation::gestures::{
    Gesture, NozzleAimGesture, PinPullGesture, TriggerPressGesture, TriggerReleaseGesture,
};
use simulation::journal::DrillJournal;
use simulation::status::DrillStatus;
use simulation::training_params::TrainingParams;

/// Upper bound on ticks per `step` command.
const MAX_STEP_TICKS: u64 = 10_000;

pub fn run_drill_mode(params_path: Option<&str>) {
    // Log to stderr so it does not interfere with the JSON protocol on stdout.
    let mut app = App::new();
    app.add_plugins(LogPlugin::default());

    let params = load_params(params_path);
    configure_drill_app(&mut app, params);

    // -- I/O setup -----------------------------------------------------------
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut stdout = stdout.lock();

    write_response(&mut stdout, &make_response(ResponsePayload::Ready));
    info!(
        "firedrill protocol v{} ready, waiting for commands on stdin",
        PROTOCOL_VERSION
    );

    // -- Main command loop ---------------------------------------------------
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                error!("stdin read error: {e}");
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<DrillCommand>(&line) {
            Ok(cmd) => process_command(cmd, &mut app),
            Err(e) => make_response(ResponsePayload::Error {
                message: format!("Parse error: {e}"),
            }),
        };
        let is_goodbye = matches!(response.payload, ResponsePayload::Goodbye);

        write_response(&mut stdout, &response);

        if is_goodbye {
            break;
        }
    }

    info!("firedrill shutting down");
}

fn write_response(out: &mut impl Write, response: &DrillResponse) {
    match serde_json::to_string(response) {
        Ok(json) => {
            let _ = writeln!(out, "{json}");
            let _ = out.flush();
        }
        Err(e) => error!("could not encode response: {e}"),
    }
}

// ---------------------------------------------------------------------------
// App setup
// ---------------------------------------------------------------------------

/// Parameters from `path`, or the defaults when there is no path or the file
/// cannot be read or parsed.
pub fn load_params(path: Option<&str>) -> TrainingParams {
    let Some(path) = path else {
        return TrainingParams::default();
    };
    match std::fs::read_to_string(path) {
        Ok(json) => TrainingParams::from_json_or_default(&json),
        Err(e) => {
            warn!("Could not read params file {}: {}, using defaults", path, e);
            TrainingParams::default()
        }
    }
}

/// Adds the drill core to `app` with one extinguisher and no fires.
pub fn configure_drill_app(app: &mut App, params: TrainingParams) {
    let extinguisher = ExtinguisherUnit::from_params(&params.extinguisher);

    app.add_plugins(MinimalPlugins);
    app.add_plugins(simulation::SimulationPlugin);
    app.insert_resource(params);

    // Initial update so Startup systems run and the clock picks up the step.
    app.update();

    app.world_mut().spawn(ExtinguisherBundle::new(extinguisher));
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

pub fn process_command(cmd: DrillCommand, app: &mut App) -> DrillResponse {
    match cmd {
        DrillCommand::Gesture { gesture } => {
            send_gesture(app.world_mut(), gesture);
            make_response(ResponsePayload::Ok)
        }

        DrillCommand::Contact { fire, kind } => {
            app.world_mut().send_event(AgentContact {
                fire: FireId(fire),
                kind,
            });
            make_response(ResponsePayload::Ok)
        }

        DrillCommand::SpawnFire {
            decay_rate,
            reignite_delay,
        } => {
            let fire = spawn_fire(app.world_mut(), decay_rate, reignite_delay);
            make_response(ResponsePayload::FireSpawned { fire: fire.0 })
        }

        DrillCommand::Fire { fire, action } => {
            app.world_mut().send_event(FireCommand {
                fire: FireId(fire),
                action,
            });
            make_response(ResponsePayload::Ok)
        }

        DrillCommand::Start { time_limit } => {
            app.world_mut().send_event(StartDrill { time_limit });
            make_response(ResponsePayload::Ok)
        }

        DrillCommand::Restart => {
            app.world_mut().send_event(RestartDrill);
            make_response(ResponsePayload::Ok)
        }

        DrillCommand::Step { ticks } => {
            let n = ticks.min(MAX_STEP_TICKS);
            for _ in 0..n {
                simulation::run_fixed_tick(app.world_mut());
            }
            let clock = app.world().resource::<DrillClock>();
            make_response(ResponsePayload::StepComplete {
                tick: clock.ticks,
                time: clock.now(),
            })
        }

        DrillCommand::Status => {
            let status = app
                .world()
                .get_resource::<DrillStatus>()
                .cloned()
                .unwrap_or_default();
            let line = status.status_line();
            make_response(ResponsePayload::Status { status, line })
        }

        DrillCommand::Report => {
            let report = app
                .world()
                .get_resource::<TestEvaluator>()
                .and_then(|e| e.report().cloned());
            let panel = report.as_ref().map(|r| r.panel_text());
            make_response(ResponsePayload::Report { report, panel })
        }

        DrillCommand::Journal { last } => {
            let records = app
                .world()
                .get_resource::<DrillJournal>()
                .map(|journal| match last {
                    Some(n) => journal.last_n(n).to_vec(),
                    None => journal.records().to_vec(),
                })
                .unwrap_or_default();
            make_response(ResponsePayload::Journal { records })
        }

        DrillCommand::Quit => make_response(ResponsePayload::Goodbye),
    }
}

fn send_gesture(world: &mut World, gesture: GestureInput) {
    let gesture = match gesture {
        GestureInput::PinPull { distance } => Gesture::from(PinPullGesture { distance }),
        GestureInput::NozzleAim { angle } => Gesture::from(NozzleAimGesture { angle }),
        GestureInput::TriggerPress { angle } => Gesture::from(TriggerPressGesture { angle }),
        GestureInput::TriggerRelease => Gesture::from(TriggerReleaseGesture),
    };
    world.send_event(gesture);
}

/// Spawns a fire from `TrainingParams::fire` and registers it right away so
/// contacts sent before the next step find it.
fn spawn_fire(world: &mut World, decay_rate: Option<f32>, reignite_delay: Option<f64>) -> FireId {
    let mut unit = FireUnit::from_params(&world.resource::<TrainingParams>().fire);
    if let Some(rate) = decay_rate {
        unit.decay_rate = rate.max(0.0);
    }
    if let Some(delay) = reignite_delay {
        unit = unit.with_reignite(delay);
    }

    let id = world.resource_mut::<FireRegistry>().allocate();
    let entity = world.spawn(FireBundle::new(id, unit)).id();
    world.resource_mut::<FireRegistry>().insert(id, entity);
    info!("Spawned fire {}", id);
    id
}
