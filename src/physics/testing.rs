//! Scripted physics backend for unit tests

use glam::{Quat, Vec3};

use super::backend::{
    CapsuleConfig, ColliderHandle, PhysicsBackend, RigidBodyHandle, SweepResult, SweepSettings,
};

/// Backend that records every request and answers sweeps from a script.
///
/// Without a scripted displacement, sweeps pass the desired displacement
/// through and stop the collider's lowest point at `floor`.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    /// Answer for the next sweeps, if set
    pub displacement: Option<Vec3>,
    /// Height of an infinite flat floor, if any
    pub floor: Option<f32>,
    /// Sensors reported on the next overlap queries
    pub overlaps: Vec<ColliderHandle>,
    /// Distance from collider center to its lowest point
    pub center_to_bottom: f32,
    /// Desired displacements submitted, in order
    pub sweeps: Vec<Vec3>,
    pub poses: Vec<(RigidBodyHandle, Vec3, Quat)>,
    pub teleports: Vec<(RigidBodyHandle, Vec3, Quat)>,
    pub sweep_settings: Option<SweepSettings>,
    next_handle: u32,
}

impl ScriptedBackend {
    pub fn with_floor(height: f32) -> Self {
        Self {
            floor: Some(height),
            ..Default::default()
        }
    }

    /// Handle for a sensor that the test reports through `overlaps`
    pub fn sensor(&mut self) -> ColliderHandle {
        self.next_handle += 1;
        ColliderHandle::from_raw_parts(self.next_handle, 0)
    }
}

impl PhysicsBackend for ScriptedBackend {
    fn create_kinematic_body(&mut self, _position: Vec3, _rotation: Quat) -> RigidBodyHandle {
        self.next_handle += 1;
        RigidBodyHandle::from_raw_parts(self.next_handle, 0)
    }

    fn create_capsule_collider(
        &mut self,
        _body: RigidBodyHandle,
        capsule: &CapsuleConfig,
    ) -> ColliderHandle {
        self.center_to_bottom = capsule.center_to_bottom();
        self.next_handle += 1;
        ColliderHandle::from_raw_parts(self.next_handle, 0)
    }

    fn configure_sweep(&mut self, _collider: ColliderHandle, settings: &SweepSettings) {
        self.sweep_settings = Some(settings.clone());
    }

    fn sweep_move(
        &mut self,
        _collider: ColliderHandle,
        position: Vec3,
        desired: Vec3,
        _dt: f32,
    ) -> SweepResult {
        self.sweeps.push(desired);

        if let Some(translation) = self.displacement {
            return SweepResult {
                translation,
                grounded: false,
            };
        }

        let mut translation = desired;
        let mut grounded = false;
        if let Some(floor) = self.floor {
            let lowest = floor + self.center_to_bottom;
            if position.y + translation.y <= lowest {
                translation.y = lowest - position.y;
                grounded = true;
            }
        }
        SweepResult {
            translation,
            grounded,
        }
    }

    fn query_sensor_overlaps(
        &self,
        _collider: ColliderHandle,
        _position: Vec3,
    ) -> Vec<ColliderHandle> {
        self.overlaps.clone()
    }

    fn set_kinematic_pose(&mut self, body: RigidBodyHandle, position: Vec3, rotation: Quat) {
        self.poses.push((body, position, rotation));
    }

    fn teleport(&mut self, body: RigidBodyHandle, position: Vec3, rotation: Quat) {
        self.teleports.push((body, position, rotation));
    }
}
