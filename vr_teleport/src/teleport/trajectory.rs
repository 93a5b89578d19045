use cgmath::{InnerSpace, Vector3};

/// Outcome of one sampling pass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ArcResult {
    /// Landing position, present only when a segment hit the scene
    pub endpoint: Option<Vector3<f32>>,
    /// Number of scene raycasts issued during the pass
    pub queries: usize,
}

impl ArcResult {
    pub fn endpoint_found(&self) -> bool {
        self.endpoint.is_some()
    }
}

/// The arc as walked this frame: emitted points in order plus the result.
///
/// Rebuilt from scratch every frame. When a segment hits the scene the hit
/// point is the last entry in `points`.
#[derive(Clone, Debug, Default)]
pub struct ArcTrajectory {
    pub points: Vec<Vector3<f32>>,
    pub result: ArcResult,
}

impl ArcTrajectory {
    pub fn landing_position(&self) -> Option<Vector3<f32>> {
        self.result.endpoint
    }

    pub fn is_valid(&self) -> bool {
        self.result.endpoint_found()
    }

    pub(crate) fn clear(&mut self) {
        self.points.clear();
        self.result = ArcResult::default();
    }

    /// Get the arc length (useful for visual feedback)
    pub fn arc_length(&self) -> f32 {
        self.points
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).magnitude())
            .sum()
    }

    /// Get trajectory point at normalized position (0.0 to 1.0), interpolating
    /// linearly between emitted points.
    pub fn point_at_normalized_position(&self, t: f32) -> Option<Vector3<f32>> {
        let last = self.points.len().checked_sub(1)?;
        if last == 0 {
            return Some(self.points[0]);
        }

        let scaled = t.clamp(0.0, 1.0) * last as f32;
        let index = (scaled as usize).min(last - 1);
        let t_local = scaled - index as f32;

        let p1 = self.points[index];
        let p2 = self.points[index + 1];
        Some(p1 + (p2 - p1) * t_local)
    }
}
