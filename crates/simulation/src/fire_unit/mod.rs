mod contact;
mod registry;
mod systems;
mod types;

pub use contact::{AgentContact, ContactKind};
pub use registry::FireRegistry;
pub use systems::{
    apply_fire_commands, register_fires, route_agent_contacts, tick_fires, unregister_fires,
    FireUnitPlugin,
};
pub use types::{
    FireAction, FireBundle, FireCommand, FireExtinguished, FireId, FireReignited, FireState,
    FireTransition, FireUnit, INTENSITY_EPSILON,
};
