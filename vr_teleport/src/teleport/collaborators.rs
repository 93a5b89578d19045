use cgmath::{InnerSpace, Vector3};

use crate::input_context::TeleportButton;

/// Nearest surface hit reported by a scene raycast.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub point: Vector3<f32>,
    pub distance: f32,
}

/// Ray-vs-scene intersection.
///
/// `direction` is unit length. Implementations return the nearest hit within
/// `max_distance`, or `None`. Called up to once per arc segment every frame.
pub trait SceneCollisionQuery {
    fn raycast(
        &self,
        origin: Vector3<f32>,
        direction: Vector3<f32>,
        max_distance: f32,
    ) -> Option<RayHit>;
}

/// Where the arc starts and which way it points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EmitterPose {
    pub position: Vector3<f32>,
    pub forward: Vector3<f32>,
}

impl EmitterPose {
    /// `forward` is normalized; a zero-length forward stays zero.
    pub fn new(position: Vector3<f32>, forward: Vector3<f32>) -> Self {
        let forward = if forward.magnitude2() > f32::EPSILON {
            forward.normalize()
        } else {
            Vector3::new(0.0, 0.0, 0.0)
        };
        Self { position, forward }
    }
}

pub trait PoseSource {
    fn emitter_pose(&self) -> EmitterPose;
}

/// Edge-triggered buttons plus the optional reach axis.
pub trait InputSource {
    fn is_button_down_this_frame(&self, button: TeleportButton) -> bool;

    /// Reach extension rate in [-1, 1]; 0 leaves the reach alone.
    fn extension_rate(&self) -> f32 {
        0.0
    }
}

/// Line renderer for the arc.
pub trait ArcRendererSink {
    fn set_drawing(&mut self, enabled: bool);
    fn set_points(&mut self, points: &[Vector3<f32>]);
}

/// Landing indicator.
pub trait MarkerSink {
    fn set_visible(&mut self, visible: bool);
    fn set_position(&mut self, position: Vector3<f32>);
}

pub trait RelocationSink {
    fn set_player_position(&mut self, position: Vector3<f32>);
}

/// The output side of one teleport update, borrowed for the duration of the call.
pub struct TeleportSinks<'a> {
    pub renderer: &'a mut dyn ArcRendererSink,
    pub marker: &'a mut dyn MarkerSink,
    pub relocation: &'a mut dyn RelocationSink,
}
