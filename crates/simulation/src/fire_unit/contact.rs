use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::types::FireId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactKind {
    Enter,
    Exit,
}

/// Agent volume entered or left a fire's trigger volume. Sent by the host's
/// collision layer; presence only, no depth.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentContact {
    pub fire: FireId,
    pub kind: ContactKind,
}

impl AgentContact {
    pub fn enter(fire: FireId) -> Self {
        Self {
            fire,
            kind: ContactKind::Enter,
        }
    }

    pub fn exit(fire: FireId) -> Self {
        Self {
            fire,
            kind: ContactKind::Exit,
        }
    }
}
