// Arc teleport locomotion for VR.
//
// The pointer hand projects a Bezier arc into the scene, the first surface the
// arc touches becomes the landing spot, and a confirm press moves the player there.

pub mod effect;
pub mod input_context;
pub mod physics;
pub mod teleport;
pub mod vr_config;

pub use effect::{Effect, EffectQueue};
pub use input_context::{ButtonEdgeTracker, ControllerFrame, Hand, Head, InputContext};
pub use physics::{CollisionGroups, PhysicsWorld};
pub use vr_config::Handedness;
