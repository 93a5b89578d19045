use cgmath::{InnerSpace, Vector3};
use engine::scoped_log;

use super::{
    ArcResult, ArcTrajectory, ControlPointSet, CurveDegree, EmitterPose, SceneCollisionQuery,
    curve,
};

const LOG_SCOPE: &str = "teleport::sampler";

/// Segments shorter than this are not raycast.
const MIN_SEGMENT_LENGTH: f32 = 1e-6;

#[derive(Clone, Debug, PartialEq)]
pub struct ArcSamplerConfig {
    pub segment_count: usize,
    pub degree: CurveDegree,
    pub initial_reach: f32,
    pub min_reach: f32,
    pub max_reach: f32,
    /// Reach change per second at full extension rate
    pub extension_speed: f32,
    /// Extra forward distance added on top of the reach
    pub forward_projection_extend: f32,
    /// How far below the forward projection the last control point sits
    pub drop_height: f32,
    /// How far the final segment is pushed past the last curve sample
    pub end_overshoot: f32,
}

impl Default for ArcSamplerConfig {
    fn default() -> Self {
        ArcSamplerConfig {
            segment_count: 50,
            degree: CurveDegree::Quadratic,
            initial_reach: 5.0,
            min_reach: 2.5,
            max_reach: 7.5,
            extension_speed: 2.0,
            forward_projection_extend: 0.0,
            drop_height: 2.0,
            end_overshoot: 2.0,
        }
    }
}

/// Walks the arc each frame and finds where it first touches the scene.
pub struct ArcSampler {
    config: ArcSamplerConfig,
    reach: f32,
    drawing: bool,
    control_points: ControlPointSet,
    trajectory: ArcTrajectory,
}

impl ArcSampler {
    pub fn new(config: ArcSamplerConfig) -> Self {
        if config.segment_count < 2 {
            scoped_log!(
                warn,
                LOG_SCOPE,
                segment_count = config.segment_count,
                "arc needs two segments to overshoot its end; final point will sit on the curve"
            );
        }

        let reach = clamp_reach(config.initial_reach, &config);
        let origin = Vector3::new(0.0, 0.0, 0.0);
        ArcSampler {
            reach,
            drawing: false,
            control_points: ControlPointSet {
                p0: origin,
                p1: origin,
                p2: origin,
            },
            trajectory: ArcTrajectory {
                points: Vec::with_capacity(config.segment_count.max(1) + 1),
                result: ArcResult::default(),
            },
            config,
        }
    }

    pub fn config(&self) -> &ArcSamplerConfig {
        &self.config
    }

    pub fn reach(&self) -> f32 {
        self.reach
    }

    pub fn set_reach(&mut self, reach: f32) {
        self.reach = clamp_reach(reach, &self.config);
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn set_drawing(&mut self, drawing: bool) {
        self.drawing = drawing;
        if !drawing {
            self.trajectory.clear();
        }
    }

    pub fn control_points(&self) -> &ControlPointSet {
        &self.control_points
    }

    pub fn trajectory(&self) -> &ArcTrajectory {
        &self.trajectory
    }

    pub fn result(&self) -> ArcResult {
        self.trajectory.result
    }

    /// Advance one frame.
    ///
    /// Control points are rebuilt from `pose` with the current reach, then the
    /// reach eases by `extension_rate` (clamped to [-1, 1]) over `dt`. While not
    /// drawing the walk is skipped and the trajectory stays empty.
    pub fn update(
        &mut self,
        pose: &EmitterPose,
        dt: f32,
        extension_rate: f32,
        scene: &dyn SceneCollisionQuery,
    ) -> &ArcTrajectory {
        self.control_points = ControlPointSet::from_emitter(
            pose.position,
            pose.forward,
            self.reach + self.config.forward_projection_extend,
            self.config.drop_height,
        );
        self.extend_reach(dt, extension_rate);

        if !self.drawing {
            self.trajectory.clear();
            return &self.trajectory;
        }

        self.walk(scene);
        &self.trajectory
    }

    fn extend_reach(&mut self, dt: f32, extension_rate: f32) {
        if extension_rate == 0.0 || extension_rate.is_nan() {
            return;
        }

        let rate = extension_rate.clamp(-1.0, 1.0);
        let extended = self.reach + dt * rate * self.config.extension_speed;
        self.reach = clamp_reach(extended, &self.config);
    }

    fn walk(&mut self, scene: &dyn SceneCollisionQuery) {
        let segment_count = self.config.segment_count.max(1);
        let control_points = self.control_points;
        let degree = self.config.degree;
        let overshoot = self.config.end_overshoot;

        let trajectory = &mut self.trajectory;
        trajectory.clear();
        trajectory.points.push(control_points.start());

        let mut prev_position = control_points.start();
        for i in 1..=segment_count {
            let next_position = if i == segment_count {
                project_past_end(&trajectory.points, control_points, degree, overshoot)
            } else {
                let t = i as f32 / segment_count as f32;
                curve::evaluate(t, &control_points, degree)
            };

            let segment = next_position - prev_position;
            let length = segment.magnitude();
            if length > MIN_SEGMENT_LENGTH {
                trajectory.result.queries += 1;
                if let Some(hit) = scene.raycast(prev_position, segment / length, length) {
                    trajectory.points.push(hit.point);
                    trajectory.result.endpoint = Some(hit.point);
                    scoped_log!(
                        trace,
                        LOG_SCOPE,
                        segment = i,
                        distance = hit.distance,
                        "arc hit scene"
                    );
                    return;
                }
            }

            trajectory.points.push(next_position);
            prev_position = next_position;
        }

        scoped_log!(
            trace,
            LOG_SCOPE,
            queries = trajectory.result.queries,
            "arc found no landing point"
        );
    }
}

/// Unlike `f32::clamp` this tolerates inverted bounds (max wins).
fn clamp_reach(reach: f32, config: &ArcSamplerConfig) -> f32 {
    reach.max(config.min_reach).min(config.max_reach)
}

/// Final candidate: continue along the last emitted direction by `overshoot`.
///
/// Needs two emitted points. With fewer (a single-segment arc) the curve's own
/// end is used. A zero-length direction yields no displacement.
fn project_past_end(
    points: &[Vector3<f32>],
    control_points: ControlPointSet,
    degree: CurveDegree,
    overshoot: f32,
) -> Vector3<f32> {
    match points {
        [.., before, prev] => {
            let direction = *prev - *before;
            if direction.magnitude2() > MIN_SEGMENT_LENGTH * MIN_SEGMENT_LENGTH {
                *prev + direction.normalize() * overshoot
            } else {
                *prev
            }
        }
        _ => curve::evaluate(1.0, &control_points, degree),
    }
}
