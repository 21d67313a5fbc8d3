use bevy::prelude::*;

use crate::drill_clock::DrillClock;
use crate::extinguisher::AgentVolume;
use crate::warnings::{DrillWarning, WarningKind};

use super::contact::{AgentContact, ContactKind};
use super::registry::FireRegistry;
use super::types::{
    FireAction, FireCommand, FireExtinguished, FireId, FireReignited, FireTransition, FireUnit,
};

// =============================================================================
// Registration
// =============================================================================

/// Adds newly spawned fires to the [`FireRegistry`].
pub fn register_fires(
    added: Query<(Entity, &FireId), Added<FireId>>,
    mut registry: ResMut<FireRegistry>,
) {
    for (entity, id) in &added {
        if registry.insert(*id, entity) {
            debug!("Registered fire {} as {:?}", id, entity);
        } else {
            warn!(
                "Fire id {} already registered, ignoring duplicate {:?}",
                id, entity
            );
        }
    }
}

/// Drops despawned fires from the [`FireRegistry`].
pub fn unregister_fires(
    mut removed: RemovedComponents<FireId>,
    mut registry: ResMut<FireRegistry>,
) {
    for entity in removed.read() {
        if let Some(id) = registry.remove_entity(entity) {
            debug!("Unregistered fire {}", id);
        }
    }
}

// =============================================================================
// Fire phase
// =============================================================================

/// Applies forced extinguish / reignite requests.
pub fn apply_fire_commands(
    clock: Res<DrillClock>,
    registry: Res<FireRegistry>,
    mut commands: EventReader<FireCommand>,
    mut fires: Query<&mut FireUnit>,
    mut extinguished: EventWriter<FireExtinguished>,
    mut reignited: EventWriter<FireReignited>,
    mut warnings: EventWriter<DrillWarning>,
) {
    let now = clock.now();
    for cmd in commands.read() {
        let Some(mut fire) = registry.get(cmd.fire).and_then(|e| fires.get_mut(e).ok()) else {
            warn!("Fire command for unknown fire {}", cmd.fire);
            warnings.send(DrillWarning {
                at: now,
                kind: WarningKind::UnknownFire(cmd.fire),
            });
            continue;
        };
        match cmd.action {
            FireAction::Extinguish => {
                if fire.force_extinguish(now) {
                    info!("Fire {} forced out at {:.2}s", cmd.fire, now);
                    extinguished.send(FireExtinguished { fire: cmd.fire, at: now });
                }
            }
            FireAction::Reignite => {
                if fire.force_reignite() {
                    info!("Fire {} forced alight at {:.2}s", cmd.fire, now);
                    reignited.send(FireReignited { fire: cmd.fire, at: now });
                }
            }
        }
    }
}

/// Routes host contact events onto fire units.
///
/// 1. Looks up each contact's fire through the registry; unknown ids warn.
/// 2. `Enter` only registers while agent is flowing. With no agent volume in
///    the scene (fires without an extinguisher) contacts are taken as sent.
/// 3. `Exit` always unregisters.
/// 4. While agent is not flowing, every fire's contacts are released.
pub fn route_agent_contacts(
    clock: Res<DrillClock>,
    registry: Res<FireRegistry>,
    volumes: Query<&AgentVolume>,
    mut contacts: EventReader<AgentContact>,
    mut fires: Query<&mut FireUnit>,
    mut warnings: EventWriter<DrillWarning>,
) {
    let flowing = if volumes.is_empty() {
        true
    } else {
        volumes.iter().any(|v| v.active)
    };

    for contact in contacts.read() {
        let Some(mut fire) = registry
            .get(contact.fire)
            .and_then(|e| fires.get_mut(e).ok())
        else {
            warn!("Agent contact for unknown fire {}", contact.fire);
            warnings.send(DrillWarning {
                at: clock.now(),
                kind: WarningKind::UnknownFire(contact.fire),
            });
            continue;
        };
        match contact.kind {
            ContactKind::Enter if flowing => fire.contact_begin(),
            ContactKind::Enter => {
                debug!("Ignoring contact on {}: no agent flowing", contact.fire);
            }
            ContactKind::Exit => fire.contact_end(),
        }
    }

    if !flowing {
        for mut fire in &mut fires {
            if fire.in_contact() {
                fire.release_contacts();
            }
        }
    }
}

/// Decays fires in contact and relights those whose reignite deadline passed.
pub fn tick_fires(
    clock: Res<DrillClock>,
    mut fires: Query<(&FireId, &mut FireUnit)>,
    mut extinguished: EventWriter<FireExtinguished>,
    mut reignited: EventWriter<FireReignited>,
) {
    #[cfg(feature = "trace")]
    let _span = bevy::log::info_span!("tick_fires").entered();
    let dt = clock.dt();
    let now = clock.now();
    for (id, mut fire) in &mut fires {
        match fire.tick(dt, now) {
            Some(FireTransition::Extinguished) => {
                info!("Fire {} extinguished at {:.2}s", id, now);
                extinguished.send(FireExtinguished { fire: *id, at: now });
            }
            Some(FireTransition::Reignited) => {
                info!("Fire {} reignited at {:.2}s", id, now);
                reignited.send(FireReignited { fire: *id, at: now });
            }
            None => {}
        }
    }
}

pub struct FireUnitPlugin;

impl Plugin for FireUnitPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FireRegistry>()
            .add_event::<AgentContact>()
            .add_event::<FireCommand>()
            .add_event::<FireExtinguished>()
            .add_event::<FireReignited>()
            .add_systems(
                FixedUpdate,
                (register_fires, unregister_fires)
                    .chain()
                    .after(crate::drill_clock::tick_drill_clock)
                    .in_set(crate::SimulationSet::PreSim),
            )
            .add_systems(
                FixedUpdate,
                (apply_fire_commands, route_agent_contacts, tick_fires)
                    .chain()
                    .in_set(crate::SimulationSet::Fire),
            );
    }
}
