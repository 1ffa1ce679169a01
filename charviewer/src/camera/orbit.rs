//! Viewer camera with manual orbit controls
//!
//! Holds the camera pose and projection. While user control is enabled the
//! camera orbits around its look-target in spherical coordinates.

use glam::{Mat4, Vec3};

/// Pitch limit in radians (~80 degrees) to avoid gimbal lock
const PITCH_LIMIT: f32 = 1.4;

/// Closest and farthest manual dolly distance
const MIN_DISTANCE: f32 = 0.01;
const MAX_DISTANCE: f32 = 1000.0;

/// Perspective camera for the model viewport
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerCamera {
    /// Eye position
    position: Vec3,
    /// Look-target
    target: Vec3,
    /// Vertical field of view in degrees
    fov: f32,
    /// Aspect ratio (width/height) for projection
    aspect: f32,
    /// Near clipping plane
    near: f32,
    /// Far clipping plane
    far: f32,
    /// Whether orbit and dolly input is accepted
    user_control: bool,
}

impl ViewerCamera {
    /// Create a new camera looking at the origin
    pub fn new(fov: f32, aspect: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 1.0, 5.0),
            target: Vec3::ZERO,
            fov,
            aspect,
            near: 0.01,
            far: 1000.0,
            user_control: true,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Point the camera at `target`
    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Vertical field of view in degrees
    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn set_fov(&mut self, fov: f32) {
        if fov.is_finite() {
            self.fov = fov.clamp(10.0, 120.0);
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Update aspect ratio on resize
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    pub fn user_control_enabled(&self) -> bool {
        self.user_control
    }

    pub fn set_user_control(&mut self, enabled: bool) {
        self.user_control = enabled;
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    /// Get combined view-projection matrix
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Distance from eye to target
    pub fn distance(&self) -> f32 {
        (self.position - self.target).length()
    }

    /// Horizontal angle of the eye around `center`, measured from +X toward +Z
    pub fn horizontal_angle_around(&self, center: Vec3) -> f32 {
        let dx = self.position.x - center.x;
        let dz = self.position.z - center.z;
        dz.atan2(dx)
    }

    /// Orbit around the target. Ignored while user control is disabled.
    pub fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        if !self.user_control {
            return;
        }
        let offset = self.position - self.target;
        let distance = offset.length();
        if distance <= f32::EPSILON {
            return;
        }

        let yaw = offset.x.atan2(offset.z) + delta_yaw;
        let pitch = ((offset.y / distance).asin() - delta_pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);

        self.position = self.target
            + Vec3::new(
                distance * pitch.cos() * yaw.sin(),
                distance * pitch.sin(),
                distance * pitch.cos() * yaw.cos(),
            );
    }

    /// Move toward or away from the target. Ignored while user control is disabled.
    pub fn dolly(&mut self, delta: f32) {
        if !self.user_control {
            return;
        }
        let offset = self.position - self.target;
        let distance = offset.length();
        if distance <= f32::EPSILON {
            return;
        }
        // Multiplicative zoom for smooth feel
        let new_distance = (distance * (1.0 - delta * 0.1)).clamp(MIN_DISTANCE, MAX_DISTANCE);
        self.position = self.target + offset * (new_distance / distance);
    }
}

impl Default for ViewerCamera {
    fn default() -> Self {
        Self::new(45.0, 16.0 / 9.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orbit_keeps_distance() {
        let mut camera = ViewerCamera::default();
        let before = camera.distance();
        camera.orbit(0.5, 0.2);
        assert!((camera.distance() - before).abs() < 1e-4);
        assert_ne!(camera.position(), Vec3::new(0.0, 1.0, 5.0));
    }

    #[test]
    fn test_orbit_pitch_clamped() {
        let mut camera = ViewerCamera::default();
        camera.orbit(0.0, -10.0);
        let offset = camera.position() - camera.target();
        let pitch = (offset.y / offset.length()).asin();
        assert!(pitch <= PITCH_LIMIT + 1e-4);
    }

    #[test]
    fn test_input_ignored_without_control() {
        let mut camera = ViewerCamera::default();
        camera.set_user_control(false);
        let before = camera.position();
        camera.orbit(1.0, 1.0);
        camera.dolly(2.0);
        assert_eq!(camera.position(), before);
    }

    #[test]
    fn test_dolly_scales_distance() {
        let mut camera = ViewerCamera::default();
        let before = camera.distance();
        camera.dolly(1.0);
        assert!((camera.distance() - before * 0.9).abs() < 1e-4);
    }

    #[test]
    fn test_horizontal_angle() {
        let mut camera = ViewerCamera::default();
        camera.set_position(Vec3::new(0.0, 0.0, 2.0));
        let angle = camera.horizontal_angle_around(Vec3::ZERO);
        assert!((angle - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_nan_fov_keeps_previous() {
        let mut camera = ViewerCamera::default();
        camera.set_fov(70.0);
        camera.set_fov(f32::NAN);
        assert_eq!(camera.fov(), 70.0);
        assert!(camera.view_projection_matrix().is_finite());
    }

    #[test]
    fn test_matrices_finite() {
        let camera = ViewerCamera::default();
        assert!(camera.view_projection_matrix().is_finite());
    }
}
