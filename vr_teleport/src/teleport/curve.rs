use cgmath::Vector3;
use serde::{Deserialize, Serialize};

/// Degree of the Bezier curve the arc follows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurveDegree {
    /// Straight line from the emitter to the drop point
    Linear,
    #[default]
    Quadratic,
}

/// Control points for one frame's arc.
///
/// `p0` is the emitter, `p1` a forward projection, `p2` a further forward
/// projection dropped by a fixed height. The linear curve uses `p0` and `p2`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlPointSet {
    pub p0: Vector3<f32>,
    pub p1: Vector3<f32>,
    pub p2: Vector3<f32>,
}

impl ControlPointSet {
    /// `p1 = p0 + forward * length * 2/5`,
    /// `p2 = p1 + forward * length * 3/5 - up * drop_height`
    pub fn from_emitter(
        origin: Vector3<f32>,
        forward: Vector3<f32>,
        length: f32,
        drop_height: f32,
    ) -> Self {
        let p0 = origin;
        let p1 = p0 + forward * length * 2.0 / 5.0;
        let p2 = p1 + forward * length * 3.0 / 5.0 + Vector3::new(0.0, -1.0, 0.0) * drop_height;
        Self { p0, p1, p2 }
    }

    pub fn start(&self) -> Vector3<f32> {
        self.p0
    }
}

/// Point on the curve at `t`. `t` is clamped to [0, 1]; NaN reads as 0.
pub fn evaluate(t: f32, points: &ControlPointSet, degree: CurveDegree) -> Vector3<f32> {
    match degree {
        CurveDegree::Linear => evaluate_linear(t, points.p0, points.p2),
        CurveDegree::Quadratic => evaluate_quadratic(t, points.p0, points.p1, points.p2),
    }
}

/// B(t) = p0 + t(p1 - p0)
pub fn evaluate_linear(t: f32, p0: Vector3<f32>, p1: Vector3<f32>) -> Vector3<f32> {
    let t = clamp_parameter(t);
    p0 + (p1 - p0) * t
}

/// B(t) = (1 - t)^2 p0 + 2(1 - t)t p1 + t^2 p2
pub fn evaluate_quadratic(
    t: f32,
    p0: Vector3<f32>,
    p1: Vector3<f32>,
    p2: Vector3<f32>,
) -> Vector3<f32> {
    let t = clamp_parameter(t);
    let one_minus_t = 1.0 - t;
    p0 * (one_minus_t * one_minus_t) + p1 * (2.0 * one_minus_t * t) + p2 * (t * t)
}

fn clamp_parameter(t: f32) -> f32 {
    if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) }
}
