use cgmath::Vector3;

use crate::teleport::RelocationSink;

/// Side effects the teleport layer asks the host game loop to apply.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    SetPlayerPosition {
        position: Vector3<f32>,
        is_teleport: bool,
    },
}

/// Relocation sink that defers the move to the host.
///
/// Hosts that own the player body (physics capsule, ECS component) drain this
/// after the teleport update and apply the positions in order.
#[derive(Debug, Default)]
pub struct EffectQueue {
    pub effects: Vec<Effect>,
}

impl EffectQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    pub fn drain(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

impl RelocationSink for EffectQueue {
    fn set_player_position(&mut self, position: Vector3<f32>) {
        self.push(Effect::SetPlayerPosition {
            position,
            is_teleport: true,
        });
    }
}
