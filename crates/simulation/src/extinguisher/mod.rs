mod systems;
mod tests;
mod types;

pub use systems::{tick_extinguisher, ExtinguisherPlugin};
pub use types::{
    AgentVolume, ExtinguisherBundle, ExtinguisherEmptied, ExtinguisherState, ExtinguisherUnit,
    TriggerRejection, AGENT_EPSILON,
};
