use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Vec3};

use crate::render::CameraParams;

/// Motion primitives the scheduler drives from keyboard input.
pub trait CameraController {
    /// Moves along the view direction projected onto the ground plane.
    fn move_forward(&mut self, distance: f32);

    /// Strafes perpendicular to the view direction on the ground plane.
    fn move_right(&mut self, distance: f32);

    /// Offsets the camera rig vertically.
    fn move_up(&mut self, distance: f32);

    /// Engages pointer lock.
    fn lock(&mut self);

    fn unlock(&mut self);

    fn is_locked(&self) -> bool;

    fn position(&self) -> Vec3;

    fn params(&self, aspect: f32) -> CameraParams;
}

/// Pointer-lock style first-person rig.
#[derive(Debug, Clone, PartialEq)]
pub struct FirstPersonCamera {
    pub position: Vec3,
    /// Radians around +Y; zero looks down -Z.
    pub yaw: f32,
    /// Radians, clamped just short of straight up/down.
    pub pitch: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    locked: bool,
}

impl Default for FirstPersonCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            yaw: 0.0,
            pitch: 0.0,
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            locked: false,
        }
    }
}

impl FirstPersonCamera {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn set_orientation(&mut self, yaw: f32, pitch: f32) {
        let limit = FRAC_PI_2 - 0.01;
        self.yaw = yaw;
        self.pitch = pitch.clamp(-limit, limit);
    }

    fn ground_forward(&self) -> Vec3 {
        Vec3::new(-self.yaw.sin(), 0.0, -self.yaw.cos())
    }

    fn look_direction(&self) -> Vec3 {
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.ground_forward() * cos_pitch + Vec3::Y * sin_pitch
    }
}

impl CameraController for FirstPersonCamera {
    fn move_forward(&mut self, distance: f32) {
        self.position += self.ground_forward() * distance;
    }

    fn move_right(&mut self, distance: f32) {
        let right = self.ground_forward().cross(Vec3::Y);
        self.position += right * distance;
    }

    fn move_up(&mut self, distance: f32) {
        self.position.y += distance;
    }

    fn lock(&mut self) {
        self.locked = true;
    }

    fn unlock(&mut self) {
        self.locked = false;
    }

    fn is_locked(&self) -> bool {
        self.locked
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn params(&self, aspect: f32) -> CameraParams {
        let view = Mat4::look_to_rh(self.position, self.look_direction(), Vec3::Y);
        let projection = Mat4::perspective_rh_gl(
            self.fov_degrees.to_radians(),
            aspect.max(0.01),
            self.near,
            self.far,
        );
        CameraParams {
            view_proj: projection * view,
            position: self.position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn default_rig_moves_down_negative_z() {
        let mut camera = FirstPersonCamera::new(Vec3::ZERO);
        camera.move_forward(0.5);
        assert!(close(camera.position, Vec3::new(0.0, 0.0, -0.5)));
        camera.move_right(0.5);
        assert!(close(camera.position, Vec3::new(0.5, 0.0, -0.5)));
        camera.move_up(-1.0);
        assert!(close(camera.position, Vec3::new(0.5, -1.0, -0.5)));
    }

    #[test]
    fn pitch_does_not_lift_forward_motion() {
        let mut camera = FirstPersonCamera::new(Vec3::ZERO);
        camera.set_orientation(0.0, 1.0);
        camera.move_forward(1.0);
        assert_eq!(camera.position.y, 0.0);
    }

    #[test]
    fn yaw_rotates_movement_basis() {
        let mut camera = FirstPersonCamera::new(Vec3::ZERO);
        camera.set_orientation(FRAC_PI_2, 0.0);
        camera.move_forward(1.0);
        assert!(close(camera.position, Vec3::new(-1.0, 0.0, 0.0)));
    }

    #[test]
    fn lock_toggles() {
        let mut camera = FirstPersonCamera::default();
        assert!(!camera.is_locked());
        camera.lock();
        assert!(camera.is_locked());
        camera.unlock();
        assert!(!camera.is_locked());
    }

    #[test]
    fn params_project_points_in_front_of_camera() {
        let camera = FirstPersonCamera::new(Vec3::ZERO);
        let params = camera.params(4.0 / 3.0);
        let clip = params.view_proj * Vec3::new(0.0, 0.0, -10.0).extend(1.0);
        assert!(clip.w > 0.0);
        assert!((clip.x / clip.w).abs() < 1e-5);
        assert_eq!(params.position, Vec3::ZERO);
    }
}
