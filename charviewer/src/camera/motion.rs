//! Procedural target poses for each camera mode

use glam::Vec3;

use super::{cinematic, CameraMode, ModelBounds};

/// Camera position and look-target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub target: Vec3,
}

/// Pose the given mode wants at `time`; `None` for manual mode
pub fn target_pose(mode: CameraMode, time: f32, bounds: &ModelBounds) -> Option<Pose> {
    match mode {
        CameraMode::None => None,
        CameraMode::Turntable => Some(turntable(time, bounds)),
        CameraMode::Cinematic => Some(cinematic::sample(time, bounds)),
        CameraMode::Drift => Some(drift(time, bounds)),
        CameraMode::Bounce => Some(bounce(time, bounds)),
    }
}

/// Circular orbit at 0.4 rad/s
pub fn turntable(time: f32, bounds: &ModelBounds) -> Pose {
    let ModelBounds { center, radius, .. } = *bounds;
    let angle = time * 0.4;
    let r = radius * 1.6;
    Pose {
        position: Vec3::new(
            center.x + angle.cos() * r,
            center.y + radius * 0.4,
            center.z + angle.sin() * r,
        ),
        target: center,
    }
}

/// Slow wander with two phases and a breathing radius
pub fn drift(time: f32, bounds: &ModelBounds) -> Pose {
    let ModelBounds { center, radius, .. } = *bounds;
    let a1 = time * 0.12;
    let a2 = time * 0.08;
    let r = radius * 1.6 * (1.0 + (time * 0.06).sin() * 0.15);
    Pose {
        position: Vec3::new(
            center.x + a1.sin() * r,
            center.y + radius * (0.35 + a2.sin() * 0.15),
            center.z + (a1 * 2.0).sin() * r * 0.6,
        ),
        target: center,
    }
}

/// Orbit at 0.6 rad/s that snaps inward and upward on every beat
pub fn bounce(time: f32, bounds: &ModelBounds) -> Pose {
    let ModelBounds { center, radius, .. } = *bounds;
    let angle = time * 0.6;
    let beat = (time * 2.0).sin().abs();
    let snap = beat.powi(4);
    let r = radius * 1.6 * (0.9 - snap * 0.35);
    Pose {
        position: Vec3::new(
            center.x + angle.cos() * r,
            center.y + radius * (0.3 + snap * 0.25),
            center.z + angle.sin() * r,
        ),
        target: center,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> ModelBounds {
        ModelBounds::from_sphere(Vec3::ZERO, 1.0)
    }

    #[test]
    fn test_turntable_at_zero() {
        let pose = turntable(0.0, &unit());
        assert!(pose.position.abs_diff_eq(Vec3::new(1.6, 0.4, 0.0), 1e-6));
        assert_eq!(pose.target, Vec3::ZERO);
    }

    #[test]
    fn test_drift_height_band() {
        let bounds = unit();
        for i in 0..200 {
            let pose = drift(i as f32 * 0.7, &bounds);
            assert!(pose.position.y >= 0.2 - 1e-5 && pose.position.y <= 0.5 + 1e-5);
            assert_eq!(pose.target, Vec3::ZERO);
        }
    }

    #[test]
    fn test_bounce_peak_contracts() {
        let bounds = unit();
        let rest = bounce(0.0, &bounds);
        let peak = bounce(std::f32::consts::FRAC_PI_4, &bounds);

        let rest_r = Vec3::new(rest.position.x, 0.0, rest.position.z).length();
        let peak_r = Vec3::new(peak.position.x, 0.0, peak.position.z).length();
        assert!((rest_r - 1.44).abs() < 1e-5);
        assert!((peak_r - 1.6 * 0.55).abs() < 1e-4);
        assert!((peak.position.y - 0.55).abs() < 1e-4);
    }

    #[test]
    fn test_manual_has_no_pose() {
        assert!(target_pose(CameraMode::None, 1.0, &unit()).is_none());
        assert!(target_pose(CameraMode::Cinematic, 1.0, &unit()).is_some());
    }
}
