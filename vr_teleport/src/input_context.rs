use cgmath::{Quaternion, Vector2, Vector3, vec3};
use serde::{Deserialize, Serialize};

use crate::{
    teleport::{EmitterPose, InputSource, PoseSource},
    vr_config::Handedness,
};

/// Controller buttons the teleport layer can bind to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeleportButton {
    Trigger,
    Squeeze,
    /// A on the right controller, X on the left
    AButton,
    /// B on the right controller, Y on the left
    BButton,
}

impl TeleportButton {
    pub const ALL: [TeleportButton; 4] = [
        TeleportButton::Trigger,
        TeleportButton::Squeeze,
        TeleportButton::AButton,
        TeleportButton::BButton,
    ];

    fn index(self) -> usize {
        match self {
            TeleportButton::Trigger => 0,
            TeleportButton::Squeeze => 1,
            TeleportButton::AButton => 2,
            TeleportButton::BButton => 3,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Head {
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
}

impl Default for Head {
    fn default() -> Self {
        Head {
            position: vec3(0.0, 0.0, 0.0),
            rotation: Quaternion::new(1.0, 0.0, 0.0, 0.0),
        }
    }
}

/// Tracked state of one controller for the current frame.
#[derive(Clone, Debug)]
pub struct Hand {
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub thumbstick: Vector2<f32>,
    pub trigger_value: f32,
    pub squeeze_value: f32,
    pub a_value: f32,
    pub b_value: f32,
}

impl Default for Hand {
    fn default() -> Self {
        Hand {
            position: vec3(0.0, 0.0, 0.0),
            rotation: Quaternion::new(1.0, 0.0, 0.0, 0.0),
            thumbstick: Vector2::new(0.0, 0.0),
            trigger_value: 0.0,
            squeeze_value: 0.0,
            a_value: 0.0,
            b_value: 0.0,
        }
    }
}

impl Hand {
    pub fn button_value(&self, button: TeleportButton) -> f32 {
        match button {
            TeleportButton::Trigger => self.trigger_value,
            TeleportButton::Squeeze => self.squeeze_value,
            TeleportButton::AButton => self.a_value,
            TeleportButton::BButton => self.b_value,
        }
    }

    /// Pointing direction of the controller (-Z in controller space).
    pub fn forward(&self) -> Vector3<f32> {
        self.rotation * vec3(0.0, 0.0, -1.0)
    }
}

#[derive(Clone, Debug, Default)]
pub struct InputContext {
    pub head: Head,
    pub left_hand: Hand,
    pub right_hand: Hand,
}

impl InputContext {
    pub fn hand(&self, handedness: Handedness) -> &Hand {
        match handedness {
            Handedness::Left => &self.left_hand,
            Handedness::Right => &self.right_hand,
        }
    }
}

/// Turns analog button values into down-edges by remembering last frame's state.
#[derive(Clone, Debug)]
pub struct ButtonEdgeTracker {
    threshold: f32,
    was_pressed: [bool; 4],
}

/// Buttons that went from released to pressed this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonEdges {
    down: [bool; 4],
}

impl ButtonEdges {
    pub fn is_down(&self, button: TeleportButton) -> bool {
        self.down[button.index()]
    }
}

impl ButtonEdgeTracker {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            was_pressed: [false; 4],
        }
    }

    pub fn update(&mut self, hand: &Hand) -> ButtonEdges {
        let mut edges = ButtonEdges::default();
        for button in TeleportButton::ALL {
            let idx = button.index();
            let is_pressed = hand.button_value(button) >= self.threshold;
            edges.down[idx] = is_pressed && !self.was_pressed[idx];
            self.was_pressed[idx] = is_pressed;
        }
        edges
    }

    /// Forget held buttons, so a button still held afterwards reports a fresh edge.
    pub fn reset(&mut self) {
        self.was_pressed = [false; 4];
    }
}

/// Maps a thumbstick axis to a discrete extension rate.
///
/// Small deflections are ignored so resting thumbs don't creep the arc.
pub fn extension_rate_from_axis(axis: f32, threshold: f32) -> f32 {
    if axis.abs() > threshold {
        axis.signum()
    } else {
        0.0
    }
}

/// One frame of input for the aiming hand, already reduced to what the
/// teleport layer consumes.
#[derive(Clone, Debug)]
pub struct ControllerFrame {
    pub pose: EmitterPose,
    pub edges: ButtonEdges,
    pub extension_rate: f32,
}

impl ControllerFrame {
    pub fn sample(
        input_context: &InputContext,
        handedness: Handedness,
        tracker: &mut ButtonEdgeTracker,
        extension_axis_threshold: f32,
    ) -> Self {
        let hand = input_context.hand(handedness);
        ControllerFrame {
            pose: EmitterPose::new(hand.position, hand.forward()),
            edges: tracker.update(hand),
            extension_rate: extension_rate_from_axis(hand.thumbstick.y, extension_axis_threshold),
        }
    }
}

impl InputSource for ControllerFrame {
    fn is_button_down_this_frame(&self, button: TeleportButton) -> bool {
        self.edges.is_down(button)
    }

    fn extension_rate(&self) -> f32 {
        self.extension_rate
    }
}

impl PoseSource for ControllerFrame {
    fn emitter_pose(&self) -> EmitterPose {
        self.pose
    }
}
