use cgmath::{Deg, Quaternion, Rotation3, Vector2, Vector3, vec3};
use vr_teleport::{Hand, Handedness, InputContext};

/// Frames between the two presses of a scripted double-click
const DOUBLE_CLICK_GAP: u32 = 4;

/// Scripted controller input for a headless session.
pub struct InputScript {
    pub hand: Handedness,
    pub start_aiming_frame: Option<u32>,
    pub stop_aiming_frame: Option<u32>,
    pub confirm_frames: Vec<u32>,
    /// Thumbstick Y held while aiming
    pub extend_axis: f32,
    /// Downward tilt of the pointing hand
    pub pitch_degrees: f32,
    pub hand_offset: Vector3<f32>,
}

impl InputScript {
    fn is_double_click_press(start: Option<u32>, frame: u32) -> bool {
        match start {
            Some(start) => frame == start || start.checked_add(DOUBLE_CLICK_GAP) == Some(frame),
            None => false,
        }
    }

    fn is_aiming_window(&self, frame: u32) -> bool {
        let started = self.start_aiming_frame.is_some_and(|start| frame > start);
        let stopped = self.stop_aiming_frame.is_some_and(|stop| frame > stop);
        started && !stopped
    }

    pub fn input_for_frame(&self, frame: u32, player_position: Vector3<f32>) -> InputContext {
        let mut hand = Hand {
            position: player_position + self.hand_offset,
            rotation: Quaternion::from_angle_x(Deg(-self.pitch_degrees)),
            ..Hand::default()
        };

        if Self::is_double_click_press(self.start_aiming_frame, frame)
            || Self::is_double_click_press(self.stop_aiming_frame, frame)
        {
            hand.b_value = 1.0;
        }
        if self.confirm_frames.contains(&frame) {
            hand.trigger_value = 1.0;
        }
        if self.is_aiming_window(frame) {
            hand.thumbstick = Vector2::new(0.0, self.extend_axis);
        }

        let mut context = InputContext::default();
        context.head.position = player_position + vec3(0.0, 1.7, 0.0);
        match self.hand {
            Handedness::Left => context.left_hand = hand,
            Handedness::Right => context.right_hand = hand,
        }
        context
    }
}
