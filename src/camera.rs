//! The view transform.
//!
//! The camera is a fixed translation applied after an accumulated rotation of
//! the scene. Each call to [`Camera::rotate`] multiplies a new rotation onto
//! the right of the stack, so later rotations act in the scene's own frame.

use glam::{Mat4, Quat, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub translation: Vec3,
    pub orientation: Quat,
}

impl Camera {
    pub fn new(translation: Vec3) -> Self {
        Self {
            translation,
            orientation: Quat::IDENTITY,
        }
    }

    /// Rotate the scene by `degrees` about `axis`. A zero axis is ignored.
    pub fn rotate(&mut self, degrees: f32, axis: Vec3) {
        let Some(axis) = axis.try_normalize() else {
            return;
        };
        let turn = Quat::from_axis_angle(axis, degrees.to_radians());
        self.orientation = (self.orientation * turn).normalize();
    }

    /// World to view transform.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.translation) * Mat4::from_quat(self.orientation)
    }
}

/// Perspective projection for a `width` x `height` target.
pub fn projection(fov_y_degrees: f32, width: u32, height: u32, near: f32, far: f32) -> Mat4 {
    let aspect = width.max(1) as f32 / height.max(1) as f32;
    Mat4::perspective_rh(fov_y_degrees.to_radians(), aspect, near, far)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_camera_is_pure_translation() {
        let camera = Camera::new(Vec3::new(1.0, 1.0, -100.0));
        let p = camera.view_matrix().transform_point3(Vec3::ZERO);
        assert!((p - Vec3::new(1.0, 1.0, -100.0)).length() < 1e-5);
    }

    #[test]
    fn test_rotations_accumulate() {
        let mut camera = Camera::new(Vec3::ZERO);
        for _ in 0..90 {
            camera.rotate(1.0, Vec3::Y);
        }
        let p = camera.view_matrix().transform_point3(Vec3::X);
        assert!((p - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-4, "{p}");
    }

    #[test]
    fn test_rotation_unbounded() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.rotate(720.0 + 45.0, Vec3::Z);
        let mut expected = Camera::new(Vec3::ZERO);
        expected.rotate(45.0, Vec3::Z);
        assert!(camera.orientation.abs_diff_eq(expected.orientation, 1e-5));
    }

    #[test]
    fn test_zero_axis_ignored() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.rotate(30.0, Vec3::ZERO);
        assert_eq!(camera.orientation, Quat::IDENTITY);
    }

    #[test]
    fn test_projection_maps_near_plane_to_zero_depth() {
        let proj = projection(45.0, 1920, 1080, 0.1, 1000.0);
        let p = proj.project_point3(Vec3::new(0.0, 0.0, -0.1));
        assert!(p.z.abs() < 1e-4);
    }
}
