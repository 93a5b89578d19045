use cgmath::vec3;
use vr_teleport::{CollisionGroups, PhysicsWorld};

/// A flat floor with its top at y = 0, plus an optional wall straight ahead
/// (towards -Z) at `wall_distance`.
pub fn build_test_level(floor_half_size: f32, wall_distance: Option<f32>) -> PhysicsWorld {
    let mut world = PhysicsWorld::new();

    world.add_static_cuboid(
        vec3(0.0, -0.5, 0.0),
        vec3(floor_half_size, 0.5, floor_half_size),
        CollisionGroups::WORLD,
    );

    if let Some(distance) = wall_distance {
        world.add_static_cuboid(
            vec3(0.0, 1.5, -distance),
            vec3(floor_half_size, 1.5, 0.1),
            CollisionGroups::WORLD,
        );
    }

    world
}
