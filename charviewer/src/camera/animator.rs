//! Camera animator - procedural camera modes with blended transitions
//!
//! The animator owns the `ViewerCamera` and the `CameraAnimationState`.
//! Entering a mode seeds its clock from the camera's current horizontal
//! angle and blends from the current pose to the moving mode target.

use std::rc::Rc;

use glam::Vec3;

use super::ease::Ease;
use super::motion::target_pose;
use super::{CameraMode, ModelBounds, ViewerCamera};
use crate::events::{EventBus, ViewerEvent};

/// Azimuth of the framing pose (30 degrees)
const FIT_AZIMUTH: f32 = std::f32::consts::PI / 6.0;
/// Elevation of the framing pose (18 degrees)
const FIT_ELEVATION: f32 = std::f32::consts::PI / 10.0;
/// Margin applied to the framing distance
const FIT_MARGIN: f32 = 1.1;

/// Animation state for the current camera mode
#[derive(Debug, Clone, PartialEq)]
pub struct CameraAnimationState {
    pub mode: CameraMode,
    /// Mode clock in seconds, scaled by `speed`
    pub time: f32,
    /// Clock multiplier
    pub speed: f32,
    pub is_transitioning: bool,
    /// Blend progress in `[0, 1]`
    pub transition_progress: f32,
    /// Blend length in seconds
    pub transition_duration: f32,
    pub transition_start_position: Vec3,
    pub transition_start_target: Vec3,
}

impl CameraAnimationState {
    fn new(speed: f32) -> Self {
        Self {
            mode: CameraMode::None,
            time: 0.0,
            speed,
            is_transitioning: false,
            transition_progress: 0.0,
            transition_duration: CameraMode::None.transition_duration(),
            transition_start_position: Vec3::ZERO,
            transition_start_target: Vec3::ZERO,
        }
    }
}

/// Per-frame camera mode state machine
pub struct CameraAnimator {
    camera: ViewerCamera,
    state: CameraAnimationState,
    bounds: Option<ModelBounds>,
    events: Rc<EventBus>,
    default_fov: f32,
    default_speed: f32,
}

impl CameraAnimator {
    /// Create an animator in manual mode
    pub fn new(events: Rc<EventBus>, default_fov: f32, default_speed: f32, aspect: f32) -> Self {
        Self {
            camera: ViewerCamera::new(default_fov, aspect),
            state: CameraAnimationState::new(default_speed),
            bounds: None,
            events,
            default_fov,
            default_speed,
        }
    }

    pub fn camera(&self) -> &ViewerCamera {
        &self.camera
    }

    pub fn state(&self) -> &CameraAnimationState {
        &self.state
    }

    pub fn mode(&self) -> CameraMode {
        self.state.mode
    }

    pub fn speed(&self) -> f32 {
        self.state.speed
    }

    pub fn fov(&self) -> f32 {
        self.camera.fov()
    }

    pub fn bounds(&self) -> Option<&ModelBounds> {
        self.bounds.as_ref()
    }

    /// Store new model bounds and frame the model
    pub fn set_model_bounds(&mut self, bounds: ModelBounds) {
        tracing::debug!(center = ?bounds.center, radius = bounds.radius, "Model bounds updated");
        self.bounds = Some(bounds);
        self.fit();
    }

    /// Request a mode.
    ///
    /// Requesting `None` or the mode that is already running exits to manual
    /// control and abandons any blend in progress.
    pub fn set_mode(&mut self, mode: CameraMode) {
        if mode == CameraMode::None || mode == self.state.mode {
            self.exit_to_manual();
            self.emit_mode();
            return;
        }

        self.state.mode = mode;
        self.camera.set_user_control(false);

        match self.bounds {
            Some(bounds) => {
                self.seed_time(&bounds);
                self.begin_transition();
            }
            None => {
                self.state.time = 0.0;
                self.state.is_transitioning = false;
            }
        }

        tracing::info!(mode = ?mode, time = self.state.time, "Camera mode entered");
        self.emit_mode();
    }

    /// Enter a mode without the toggle-off behavior of `set_mode`
    pub fn enter_mode(&mut self, mode: CameraMode) {
        if mode == self.state.mode {
            return;
        }
        self.set_mode(mode);
    }

    fn exit_to_manual(&mut self) {
        self.state.mode = CameraMode::None;
        self.state.is_transitioning = false;
        self.camera.set_user_control(true);
    }

    /// Seed the mode clock so the path starts at the camera's current angle
    fn seed_time(&mut self, bounds: &ModelBounds) {
        self.state.time = match self.state.mode.angular_rate() {
            Some(rate) => self.camera.horizontal_angle_around(bounds.center) / rate,
            None => 0.0,
        };
    }

    fn begin_transition(&mut self) {
        self.state.transition_start_position = self.camera.position();
        self.state.transition_start_target = self.camera.target();
        self.state.is_transitioning = true;
        self.state.transition_progress = 0.0;
        self.state.transition_duration = self.state.mode.transition_duration();
    }

    /// Advance the current mode by one frame
    pub fn update(&mut self, delta_time: f32) {
        let Some(bounds) = self.bounds else {
            return;
        };
        if !self.state.mode.is_animated() {
            return;
        }

        // The clock keeps running during the blend so the destination moves
        self.state.time += delta_time * self.state.speed;

        let Some(pose) = target_pose(self.state.mode, self.state.time, &bounds) else {
            return;
        };

        if self.state.is_transitioning {
            self.state.transition_progress += delta_time / self.state.transition_duration;
            if self.state.transition_progress >= 1.0 {
                self.state.transition_progress = 1.0;
                self.state.is_transitioning = false;
            }

            let eased = Ease::OutCubic.apply(self.state.transition_progress);
            self.camera
                .set_position(self.state.transition_start_position.lerp(pose.position, eased));
            self.camera
                .look_at(self.state.transition_start_target.lerp(pose.target, eased));
        } else {
            self.camera.set_position(pose.position);
            self.camera.look_at(pose.target);
        }

        tracing::trace!(time = self.state.time, position = ?self.camera.position(), "Camera updated");
    }

    /// Distance at which the bounding sphere fills the narrower field of view
    fn fit_distance(&self, radius: f32) -> f32 {
        let v_fov = self.camera.fov().to_radians() / 2.0;
        let h_fov = (v_fov.tan() * self.camera.aspect()).atan();
        (radius / v_fov.sin()).max(radius / h_fov.sin())
    }

    /// Exit any mode and frame the whole model
    pub fn fit(&mut self) {
        let Some(bounds) = self.bounds else {
            return;
        };

        if self.state.mode != CameraMode::None {
            self.exit_to_manual();
            self.emit_mode();
        }
        self.camera.set_user_control(true);

        let look_y = bounds.look_height();
        let distance = self.fit_distance(bounds.radius) * FIT_MARGIN;
        let center = bounds.center;

        self.camera.set_position(Vec3::new(
            center.x + distance * FIT_AZIMUTH.sin() * FIT_ELEVATION.cos(),
            look_y + distance * FIT_ELEVATION.sin(),
            center.z + distance * FIT_AZIMUTH.cos() * FIT_ELEVATION.cos(),
        ));
        self.camera.look_at(Vec3::new(center.x, look_y, center.z));
        tracing::debug!(distance, "Camera fitted to model");
    }

    /// Exit any mode, restore default speed and field of view, then fit
    pub fn reset(&mut self) {
        if self.state.mode != CameraMode::None {
            self.set_mode(CameraMode::None);
        }
        self.state.speed = self.default_speed;
        self.camera.set_fov(self.default_fov);
        self.fit();
    }

    pub fn set_speed(&mut self, speed: f32) {
        if speed.is_finite() {
            self.state.speed = speed.clamp(0.0, 10.0);
        }
    }

    pub fn set_fov(&mut self, fov: f32) {
        self.camera.set_fov(fov);
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.camera.set_aspect(aspect);
    }

    /// Manual orbit, ignored while a mode runs
    pub fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.camera.orbit(delta_yaw, delta_pitch);
    }

    /// Manual dolly, ignored while a mode runs
    pub fn dolly(&mut self, delta: f32) {
        self.camera.dolly(delta);
    }

    fn emit_mode(&self) {
        self.events.emit(ViewerEvent::CameraModeChanged { mode: self.state.mode });
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    fn animator() -> (CameraAnimator, Rc<RefCell<Vec<CameraMode>>>) {
        let bus = Rc::new(EventBus::new());
        let modes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&modes);
        bus.subscribe(move |event| {
            if let ViewerEvent::CameraModeChanged { mode } = event {
                sink.borrow_mut().push(*mode);
            }
        });
        (CameraAnimator::new(bus, 45.0, 1.0, 1.0), modes)
    }

    fn unit_bounds() -> ModelBounds {
        ModelBounds::from_sphere(Vec3::ZERO, 1.0)
    }

    #[test]
    fn test_update_without_bounds_is_noop() {
        let (mut animator, _) = animator();
        animator.set_mode(CameraMode::Turntable);
        let before = animator.camera().position();
        animator.update(1.0);
        assert_eq!(animator.camera().position(), before);
        assert_eq!(animator.state().time, 0.0);
    }

    #[test]
    fn test_manual_mode_update_is_noop() {
        let (mut animator, _) = animator();
        animator.set_model_bounds(unit_bounds());
        let before = animator.camera().position();
        animator.update(1.0);
        assert_eq!(animator.camera().position(), before);
    }

    #[test]
    fn test_turntable_round_trip_returns_control() {
        let (mut animator, modes) = animator();
        animator.set_model_bounds(unit_bounds());

        animator.set_mode(CameraMode::Turntable);
        assert!(!animator.camera().user_control_enabled());
        assert!(animator.state().is_transitioning);

        animator.set_mode(CameraMode::None);
        assert!(animator.camera().user_control_enabled());
        assert!(!animator.state().is_transitioning);
        assert_eq!(*modes.borrow(), vec![CameraMode::Turntable, CameraMode::None]);
    }

    #[test]
    fn test_same_mode_exits() {
        let (mut animator, _) = animator();
        animator.set_model_bounds(unit_bounds());
        animator.set_mode(CameraMode::Drift);
        animator.set_mode(CameraMode::Drift);
        assert_eq!(animator.mode(), CameraMode::None);
        assert!(animator.camera().user_control_enabled());
    }

    #[test]
    fn test_enter_mode_does_not_toggle() {
        let (mut animator, _) = animator();
        animator.set_model_bounds(unit_bounds());
        animator.enter_mode(CameraMode::Bounce);
        animator.enter_mode(CameraMode::Bounce);
        assert_eq!(animator.mode(), CameraMode::Bounce);
    }

    #[test]
    fn test_time_seeded_from_camera_angle() {
        let (mut animator, _) = animator();
        animator.set_model_bounds(unit_bounds());
        let angle = animator.camera().horizontal_angle_around(Vec3::ZERO);

        animator.set_mode(CameraMode::Turntable);
        assert!((animator.state().time - angle / 0.4).abs() < 1e-5);

        animator.set_mode(CameraMode::Cinematic);
        assert_eq!(animator.state().time, 0.0);
        assert_eq!(animator.state().transition_duration, 2.0);
    }

    #[test]
    fn test_transition_completes_on_mode_path() {
        let (mut animator, _) = animator();
        animator.set_model_bounds(unit_bounds());
        animator.set_mode(CameraMode::Turntable);

        for _ in 0..80 {
            animator.update(1.0 / 60.0);
        }
        assert!(!animator.state().is_transitioning);
        assert_eq!(animator.state().transition_progress, 1.0);

        let time = animator.state().time;
        let expected = super::super::motion::turntable(time, &unit_bounds());
        assert!(animator.camera().position().abs_diff_eq(expected.position, 1e-4));
        assert_eq!(animator.camera().target(), Vec3::ZERO);
    }

    #[test]
    fn test_transition_starts_from_captured_pose() {
        let (mut animator, _) = animator();
        animator.set_model_bounds(unit_bounds());
        let start = animator.camera().position();
        animator.set_mode(CameraMode::Bounce);
        assert_eq!(animator.state().transition_start_position, start);

        animator.update(1e-4);
        assert!(animator.camera().position().abs_diff_eq(start, 1e-2));
    }

    #[test]
    fn test_update_is_deterministic() {
        let run = || {
            let (mut animator, _) = animator();
            animator.set_model_bounds(unit_bounds());
            animator.set_mode(CameraMode::Cinematic);
            for step in 0..300 {
                animator.update(0.01 + (step % 3) as f32 * 0.005);
            }
            (animator.camera().position(), animator.camera().target())
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_speed_scales_clock() {
        let (mut animator, _) = animator();
        animator.set_model_bounds(unit_bounds());
        animator.set_mode(CameraMode::Cinematic);
        animator.set_speed(2.0);
        animator.update(0.5);
        assert!((animator.state().time - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_fit_frames_model() {
        let (mut animator, modes) = animator();
        let bounds = ModelBounds::from_box(Vec3::new(-0.5, 0.0, -0.5), Vec3::new(0.5, 2.0, 0.5));
        animator.set_model_bounds(bounds);

        let v_fov = 22.5_f32.to_radians();
        let expected = bounds.radius / v_fov.sin() * 1.1;
        let camera = animator.camera();
        assert!((camera.distance() - expected).abs() < 1e-3);
        assert_eq!(camera.target(), Vec3::new(0.0, 1.0, 0.0));
        assert!(camera.position().x > 0.0 && camera.position().z > camera.position().x);
        assert!(modes.borrow().is_empty());
    }

    #[test]
    fn test_fit_exits_mode() {
        let (mut animator, modes) = animator();
        animator.set_model_bounds(unit_bounds());
        animator.set_mode(CameraMode::Turntable);
        animator.fit();
        assert_eq!(animator.mode(), CameraMode::None);
        assert!(animator.camera().user_control_enabled());
        assert_eq!(modes.borrow().last(), Some(&CameraMode::None));
    }

    #[test]
    fn test_reset_restores_defaults() {
        let (mut animator, _) = animator();
        animator.set_model_bounds(unit_bounds());
        animator.set_speed(3.0);
        animator.set_fov(70.0);
        animator.set_mode(CameraMode::Drift);

        animator.reset();
        assert_eq!(animator.mode(), CameraMode::None);
        assert_eq!(animator.speed(), 1.0);
        assert_eq!(animator.fov(), 45.0);
    }

    #[test]
    fn test_non_finite_speed_and_fov_ignored() {
        let (mut animator, _) = animator();
        animator.set_speed(2.5);
        animator.set_fov(60.0);

        animator.set_speed(f32::NAN);
        animator.set_fov(f32::INFINITY);
        assert_eq!(animator.speed(), 2.5);
        assert_eq!(animator.fov(), 60.0);
    }

    #[test]
    fn test_mode_without_bounds_zeroes_time() {
        let (mut animator, _) = animator();
        animator.set_mode(CameraMode::Bounce);
        assert_eq!(animator.mode(), CameraMode::Bounce);
        assert_eq!(animator.state().time, 0.0);
        assert!(!animator.state().is_transitioning);
    }
}
