/// Scene collision for the teleport arc, backed by rapier3d.
///
/// Only static geometry is modelled: level meshes and blockers are inserted as
/// fixed colliders and queried with rays. The query pipeline is refreshed on
/// every insert so lookups can run through a shared reference.
pub mod util;

use bitflags::bitflags;
use cgmath::Vector3;
use engine::physics_log;
use rapier3d::prelude::*;

use crate::teleport::{RayHit, SceneCollisionQuery};
use util::{npoint_to_cgvec, vec_to_npoint, vec_to_nvec};

bitflags! {
    pub struct CollisionGroups: u32 {
        const WORLD = 0b0001;
        const ENTITY = 0b0010;
        const PLAYER = 0b0100;
        const UI = 0b1000;
    }
}

impl CollisionGroups {
    fn to_rapier(self) -> Group {
        Group::from_bits_truncate(self.bits())
    }
}

pub struct PhysicsWorld {
    bodies: RigidBodySet,
    colliders: ColliderSet,
    query_pipeline: QueryPipeline,
    /// Groups the teleport arc can land on
    raycast_mask: CollisionGroups,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        PhysicsWorld {
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            query_pipeline: QueryPipeline::new(),
            raycast_mask: CollisionGroups::WORLD,
        }
    }

    pub fn with_raycast_mask(mut self, mask: CollisionGroups) -> Self {
        self.raycast_mask = mask;
        self
    }

    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// Axis-aligned box centred at `center`.
    pub fn add_static_cuboid(
        &mut self,
        center: Vector3<f32>,
        half_extents: Vector3<f32>,
        group: CollisionGroups,
    ) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(vec_to_nvec(center))
            .collision_groups(InteractionGroups::new(group.to_rapier(), Group::ALL))
            .build();
        self.insert(collider)
    }

    /// Triangle soup, typically level geometry.
    pub fn add_static_trimesh(
        &mut self,
        vertices: &[Vector3<f32>],
        indices: Vec<[u32; 3]>,
        group: CollisionGroups,
    ) -> ColliderHandle {
        let points = vertices.iter().copied().map(vec_to_npoint).collect();
        let collider = ColliderBuilder::trimesh(points, indices)
            .collision_groups(InteractionGroups::new(group.to_rapier(), Group::ALL))
            .build();
        self.insert(collider)
    }

    fn insert(&mut self, collider: Collider) -> ColliderHandle {
        let handle = self.colliders.insert(collider);
        self.query_pipeline.update(&self.bodies, &self.colliders);
        physics_log!(debug, colliders = self.colliders.len(), "static collider added");
        handle
    }

    /// Nearest hit along a ray against colliders in `mask`.
    pub fn ray_cast(
        &self,
        origin: Vector3<f32>,
        direction: Vector3<f32>,
        max_distance: f32,
        mask: CollisionGroups,
    ) -> Option<RayHit> {
        let ray = Ray::new(vec_to_npoint(origin), vec_to_nvec(direction));
        let filter =
            QueryFilter::default().groups(InteractionGroups::new(Group::ALL, mask.to_rapier()));

        let (_handle, distance) = self.query_pipeline.cast_ray(
            &self.bodies,
            &self.colliders,
            &ray,
            max_distance,
            true,
            filter,
        )?;

        Some(RayHit {
            point: npoint_to_cgvec(ray.point_at(distance)),
            distance,
        })
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneCollisionQuery for PhysicsWorld {
    fn raycast(
        &self,
        origin: Vector3<f32>,
        direction: Vector3<f32>,
        max_distance: f32,
    ) -> Option<RayHit> {
        self.ray_cast(origin, direction, max_distance, self.raycast_mask)
    }
}
