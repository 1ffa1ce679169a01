//! Render backend interface
//!
//! The pipeline never draws anything itself. It tracks which passes are
//! enabled and forwards every change to a `RenderBackend`, which owns the
//! actual GPU resources.

/// Id of the implicit scene pass that always runs first
pub const SCENE_PASS: &str = "scene";

/// Uniform key carrying accumulated elapsed seconds
pub const TIME_UNIFORM: &str = "time";

/// Uniform keys carrying the viewport size in pixels
pub const RESOLUTION_WIDTH_UNIFORM: &str = "resolutionWidth";
pub const RESOLUTION_HEIGHT_UNIFORM: &str = "resolutionHeight";

/// Uniform requirements declared by a pass at registration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassTraits {
    /// Consumes the elapsed-time uniform
    pub time_based: bool,
    /// Consumes the viewport resolution uniforms
    pub resolution_dependent: bool,
}

/// One composed frame as handed to the backend
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan<'a> {
    /// Seconds since the previous frame
    pub delta_time: f32,
    /// Accumulated seconds since the pipeline was created
    pub elapsed: f32,
    /// Passes to run, scene pass first, then enabled passes in registration order
    pub passes: Vec<&'a str>,
}

/// Contract implemented by the rendering runtime
///
/// Implementations must run the passes of a `FramePlan` in the given order.
pub trait RenderBackend {
    /// Turn a pass on
    fn enable(&mut self, pass_id: &str);

    /// Turn a pass off
    fn disable(&mut self, pass_id: &str);

    /// Set a single uniform on a pass
    fn set_parameter(&mut self, pass_id: &str, key: &str, value: f32);

    /// Render a composited frame. Returns false if nothing was composited.
    fn compose(&mut self, plan: &FramePlan<'_>) -> bool;

    /// Resize render targets
    fn resize(&mut self, width: u32, height: u32);

    /// Render the scene directly without compositing
    fn render_direct(&mut self, _delta_time: f32) {}
}
