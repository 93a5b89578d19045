// VR Teleport Movement System
//
// Instead of smooth locomotion the player double-clicks to start aiming, a
// Bezier arc is cast from the pointing hand, and a confirm press jumps to
// wherever the arc first touches the level. Each frame runs activation, then
// arc sampling, then arbitration, in that order.

pub mod activation;
pub mod arbiter;
pub mod arc_sampler;
pub mod collaborators;
pub mod curve;
pub mod teleport_system;
pub mod trajectory;

pub use activation::{ActivationConfig, ActivationState, ActivationStateMachine};
pub use arbiter::{ArbiterConfig, TeleportArbiter};
pub use arc_sampler::{ArcSampler, ArcSamplerConfig};
pub use collaborators::{
    ArcRendererSink, EmitterPose, InputSource, MarkerSink, PoseSource, RayHit, RelocationSink,
    SceneCollisionQuery, TeleportSinks,
};
pub use curve::{ControlPointSet, CurveDegree};
pub use teleport_system::{TeleportConfig, TeleportConfigError, TeleportSystem, TeleportUpdate};
pub use trajectory::{ArcResult, ArcTrajectory};

pub use crate::input_context::TeleportButton;
