use std::time::Duration;

/// Frame timing handed to every per-frame update.
///
/// `elapsed` is the delta since the previous frame. `total` is unscaled time
/// since startup; it keeps advancing while the game is paused or slowed down,
/// so input timing (double-clicks) should read it rather than summing scaled deltas.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Time {
    pub elapsed: Duration,
    pub total: Duration,
}

impl Time {
    pub fn new(elapsed: Duration, total: Duration) -> Self {
        Self { elapsed, total }
    }

    /// Time for a fixed-rate frame loop, e.g. `Time::at_frame(3, 72.0)`.
    /// A non-positive rate yields zero-length frames.
    pub fn at_frame(frame: u32, frames_per_second: f32) -> Self {
        let step = Duration::try_from_secs_f32(1.0 / frames_per_second).unwrap_or(Duration::ZERO);
        Self {
            elapsed: if frame == 0 { Duration::ZERO } else { step },
            total: step * frame,
        }
    }

    pub fn delta_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }
}
