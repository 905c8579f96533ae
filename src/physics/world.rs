//! Physics world using rapier3d
//!
//! Owns every rapier set and the per-collider kinematic character
//! controllers, and implements [`PhysicsBackend`] on top of them.

use glam::{Quat, Vec3};
use nalgebra::{Quaternion, Translation3, UnitQuaternion};
use rapier3d::control::{CharacterAutostep, CharacterLength, KinematicCharacterController};
use rapier3d::prelude::*;
use rustc_hash::FxHashMap;

use super::backend::{
    CapsuleConfig, ColliderHandle, PhysicsBackend, RigidBodyHandle, SweepResult, SweepSettings,
};

/// Convert glam Quat to rapier3d UnitQuaternion
fn quat_to_rapier(q: Quat) -> UnitQuaternion<f32> {
    UnitQuaternion::from_quaternion(Quaternion::new(q.w, q.x, q.y, q.z))
}

/// Convert rapier3d UnitQuaternion to glam Quat
fn rapier_to_quat(uq: &UnitQuaternion<f32>) -> Quat {
    let q = uq.quaternion();
    Quat::from_xyzw(q.i, q.j, q.k, q.w)
}

fn isometry(position: Vec3, rotation: Quat) -> Isometry<f32> {
    Isometry::from_parts(
        Translation3::new(position.x, position.y, position.z),
        quat_to_rapier(rotation),
    )
}

fn character_controller(settings: &SweepSettings) -> KinematicCharacterController {
    let mut controller = KinematicCharacterController::default();
    controller.max_slope_climb_angle = settings.max_slope_climb_angle.to_radians();
    controller.min_slope_slide_angle = settings.min_slope_slide_angle.to_radians();
    controller.autostep = settings.autostep_max_height.map(|height| CharacterAutostep {
        max_height: CharacterLength::Absolute(height),
        min_width: CharacterLength::Absolute(settings.autostep_min_width),
        include_dynamic_bodies: true,
    });
    controller.snap_to_ground = settings.snap_to_ground.map(CharacterLength::Absolute);
    controller.offset = CharacterLength::Absolute(settings.offset);
    controller
}

/// Rapier world shared by every actor
pub struct PhysicsWorld {
    /// Gravity applied to dynamic bodies; kinematic actors fall on their own
    pub gravity: Vec3,
    pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    /// Query pipeline for sweeps, sensor overlaps and raycasts
    query_pipeline: QueryPipeline,
    integration_parameters: IntegrationParameters,
    /// Sweep controller per actor collider
    controllers: FxHashMap<rapier3d::geometry::ColliderHandle, KinematicCharacterController>,
}

impl PhysicsWorld {
    /// Create a new physics world with default gravity
    #[must_use]
    pub fn new() -> Self {
        Self::with_gravity(Vec3::new(0.0, -9.81, 0.0))
    }

    /// Create a new physics world with custom gravity
    #[must_use]
    pub fn with_gravity(gravity: Vec3) -> Self {
        Self {
            gravity,
            pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            integration_parameters: IntegrationParameters::default(),
            controllers: FxHashMap::default(),
        }
    }

    /// Step the simulation once; kinematic bodies reach their queued poses
    /// and the query pipeline is refreshed.
    pub fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;

        self.pipeline.step(
            &vector![self.gravity.x, self.gravity.y, self.gravity.z],
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Create a static rigid body (doesn't move)
    pub fn create_static_body(&mut self, position: Vec3, rotation: Quat) -> RigidBodyHandle {
        let body = RigidBodyBuilder::fixed()
            .position(isometry(position, rotation))
            .build();

        RigidBodyHandle(self.rigid_body_set.insert(body))
    }

    /// Flat ground slab whose top face sits at `height`
    pub fn add_ground(&mut self, height: f32, half_extent: f32) -> ColliderHandle {
        let thickness = 0.1;
        let body = self.create_static_body(Vec3::new(0.0, height - thickness, 0.0), Quat::IDENTITY);
        let collider = ColliderBuilder::cuboid(half_extent, thickness, half_extent).build();

        ColliderHandle(self.collider_set.insert_with_parent(
            collider,
            body.0,
            &mut self.rigid_body_set,
        ))
    }

    /// Fixed box obstacle (walls, steps, ramps when rotated)
    pub fn add_obstacle(&mut self, position: Vec3, rotation: Quat, half_extents: Vec3) -> ColliderHandle {
        let body = self.create_static_body(position, rotation);
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z).build();

        ColliderHandle(self.collider_set.insert_with_parent(
            collider,
            body.0,
            &mut self.rigid_body_set,
        ))
    }

    /// Box trigger volume that reports overlaps without blocking
    pub fn add_sensor(&mut self, position: Vec3, half_extents: Vec3) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(vector![position.x, position.y, position.z])
            .sensor(true)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();

        ColliderHandle(self.collider_set.insert(collider))
    }

    /// Get the position of a rigid body
    #[must_use]
    pub fn body_position(&self, body: RigidBodyHandle) -> Option<Vec3> {
        self.rigid_body_set.get(body.0).map(|rb| {
            let pos = rb.translation();
            Vec3::new(pos.x, pos.y, pos.z)
        })
    }

    /// Get the rotation of a rigid body
    #[must_use]
    pub fn body_rotation(&self, body: RigidBodyHandle) -> Option<Quat> {
        self.rigid_body_set
            .get(body.0)
            .map(|rb| rapier_to_quat(rb.rotation()))
    }

    /// Cast a ray and return the first solid hit
    #[must_use]
    pub fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RaycastHit> {
        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![direction.x, direction.y, direction.z],
        );

        self.query_pipeline
            .cast_ray(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                max_distance,
                true,
                QueryFilter::default().exclude_sensors(),
            )
            .map(|(handle, distance)| {
                let point = ray.point_at(distance);
                RaycastHit {
                    collider: ColliderHandle(handle),
                    point: Vec3::new(point.x, point.y, point.z),
                    distance,
                }
            })
    }

    /// Remove a rigid body, its colliders and their sweep controllers
    pub fn remove_body(&mut self, body: RigidBodyHandle) {
        if let Some(rb) = self.rigid_body_set.get(body.0) {
            for collider in rb.colliders() {
                self.controllers.remove(collider);
            }
        }

        self.rigid_body_set.remove(
            body.0,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsBackend for PhysicsWorld {
    fn create_kinematic_body(&mut self, position: Vec3, rotation: Quat) -> RigidBodyHandle {
        let body = RigidBodyBuilder::kinematic_position_based()
            .position(isometry(position, rotation))
            .build();

        RigidBodyHandle(self.rigid_body_set.insert(body))
    }

    fn create_capsule_collider(
        &mut self,
        body: RigidBodyHandle,
        capsule: &CapsuleConfig,
    ) -> ColliderHandle {
        let collider = ColliderBuilder::capsule_y(capsule.half_height(), capsule.radius)
            .friction(capsule.friction)
            .restitution(capsule.restitution)
            .build();

        ColliderHandle(self.collider_set.insert_with_parent(
            collider,
            body.0,
            &mut self.rigid_body_set,
        ))
    }

    fn configure_sweep(&mut self, collider: ColliderHandle, settings: &SweepSettings) {
        self.controllers
            .insert(collider.0, character_controller(settings));
    }

    fn sweep_move(
        &mut self,
        collider: ColliderHandle,
        position: Vec3,
        desired: Vec3,
        dt: f32,
    ) -> SweepResult {
        let Some(shape_collider) = self.collider_set.get(collider.0) else {
            log::warn!("sweep for unknown collider {collider:?}");
            return SweepResult::default();
        };

        let default_controller = KinematicCharacterController::default();
        let controller = self
            .controllers
            .get(&collider.0)
            .unwrap_or(&default_controller);

        let movement = controller.move_shape(
            dt,
            &self.rigid_body_set,
            &self.collider_set,
            &self.query_pipeline,
            shape_collider.shape(),
            &Isometry::translation(position.x, position.y, position.z),
            vector![desired.x, desired.y, desired.z],
            QueryFilter::default()
                .exclude_sensors()
                .exclude_collider(collider.0),
            |_| {},
        );

        let translation = movement.translation;
        log::trace!(
            "sweep {collider:?}: desired {desired} -> ({}, {}, {}) grounded={}",
            translation.x,
            translation.y,
            translation.z,
            movement.grounded
        );

        SweepResult {
            translation: Vec3::new(translation.x, translation.y, translation.z),
            grounded: movement.grounded,
        }
    }

    fn query_sensor_overlaps(
        &self,
        collider: ColliderHandle,
        position: Vec3,
    ) -> Vec<ColliderHandle> {
        let Some(shape_collider) = self.collider_set.get(collider.0) else {
            return Vec::new();
        };

        let mut overlaps = Vec::new();
        self.query_pipeline.intersections_with_shape(
            &self.rigid_body_set,
            &self.collider_set,
            &Isometry::translation(position.x, position.y, position.z),
            shape_collider.shape(),
            QueryFilter::default()
                .exclude_solids()
                .exclude_collider(collider.0),
            |handle| {
                overlaps.push(ColliderHandle(handle));
                true
            },
        );
        overlaps
    }

    fn set_kinematic_pose(&mut self, body: RigidBodyHandle, position: Vec3, rotation: Quat) {
        if let Some(rb) = self.rigid_body_set.get_mut(body.0) {
            rb.set_next_kinematic_position(isometry(position, rotation));
        }
    }

    fn teleport(&mut self, body: RigidBodyHandle, position: Vec3, rotation: Quat) {
        if let Some(rb) = self.rigid_body_set.get_mut(body.0) {
            rb.set_position(isometry(position, rotation), true);
            rb.set_next_kinematic_position(isometry(position, rotation));
        }
    }
}

/// Result of a raycast
#[derive(Debug, Clone)]
pub struct RaycastHit {
    /// The collider that was hit
    pub collider: ColliderHandle,
    /// The point of intersection
    pub point: Vec3,
    /// Distance from ray origin
    pub distance: f32,
}
