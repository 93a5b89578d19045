use cgmath::Vector3;
use engine::scoped_log;

use super::{ArcResult, MarkerSink, RelocationSink};

const LOG_SCOPE: &str = "teleport::arbiter";

#[derive(Clone, Debug, PartialEq)]
pub struct ArbiterConfig {
    /// Lift applied to the landing point so the player doesn't clip into the floor
    pub landing_height_offset: f32,
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        ArbiterConfig {
            landing_height_offset: 0.5,
        }
    }
}

/// Decides, per aiming frame, whether the landing marker shows and whether a
/// confirm press relocates the player. Holds no per-frame state.
#[derive(Clone, Debug, Default)]
pub struct TeleportArbiter {
    config: ArbiterConfig,
}

impl TeleportArbiter {
    pub fn new(config: ArbiterConfig) -> Self {
        Self { config }
    }

    pub fn destination_for(&self, endpoint: Vector3<f32>) -> Vector3<f32> {
        endpoint + Vector3::new(0.0, self.config.landing_height_offset, 0.0)
    }

    /// Returns the position the player was moved to, if any.
    pub fn resolve(
        &self,
        result: &ArcResult,
        confirm_down: bool,
        marker: &mut dyn MarkerSink,
        relocation: &mut dyn RelocationSink,
    ) -> Option<Vector3<f32>> {
        let Some(endpoint) = result.endpoint else {
            marker.set_visible(false);
            return None;
        };

        marker.set_visible(true);
        marker.set_position(endpoint);

        if !confirm_down {
            return None;
        }

        let destination = self.destination_for(endpoint);
        relocation.set_player_position(destination);
        scoped_log!(
            debug,
            LOG_SCOPE,
            x = destination.x,
            y = destination.y,
            z = destination.z,
            "player relocated"
        );
        Some(destination)
    }
}
