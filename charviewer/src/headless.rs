//! Headless scene and render backends
//!
//! Both backends record every call they receive instead of drawing. They are
//! cheap to clone; clones share one call log so a test can keep a handle
//! after boxing the backend into the viewer.

use std::cell::RefCell;
use std::rc::Rc;

use crate::effects::{EffectDescriptor, ParameterValues, SceneBackend};
use crate::pipeline::{FramePlan, RenderBackend};

/// A call received by `HeadlessBackend`
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    Enable(String),
    Disable(String),
    SetParameter(String, String, f32),
    Compose(Vec<String>),
    Resize(u32, u32),
    RenderDirect,
}

/// Recording render backend
#[derive(Debug, Clone, Default)]
pub struct HeadlessBackend {
    calls: Rc<RefCell<Vec<BackendCall>>>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every call received so far
    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.borrow().clone()
    }

    /// Forget recorded calls
    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Number of composited frames
    pub fn compose_count(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, BackendCall::Compose(_)))
            .count()
    }

    /// Pass list of the most recent composited frame
    pub fn last_plan(&self) -> Option<Vec<String>> {
        self.calls.borrow().iter().rev().find_map(|c| match c {
            BackendCall::Compose(passes) => Some(passes.clone()),
            _ => None,
        })
    }

    fn record(&self, call: BackendCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl RenderBackend for HeadlessBackend {
    fn enable(&mut self, pass_id: &str) {
        self.record(BackendCall::Enable(pass_id.to_string()));
    }

    fn disable(&mut self, pass_id: &str) {
        self.record(BackendCall::Disable(pass_id.to_string()));
    }

    fn set_parameter(&mut self, pass_id: &str, key: &str, value: f32) {
        self.record(BackendCall::SetParameter(pass_id.to_string(), key.to_string(), value));
    }

    fn compose(&mut self, plan: &FramePlan<'_>) -> bool {
        self.record(BackendCall::Compose(plan.passes.iter().map(|p| p.to_string()).collect()));
        true
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.record(BackendCall::Resize(width, height));
    }

    fn render_direct(&mut self, _delta_time: f32) {
        self.record(BackendCall::RenderDirect);
    }
}

/// A call received by `HeadlessScene`
#[derive(Debug, Clone, PartialEq)]
pub enum SceneCall {
    RestoreOriginal,
    ApplyMaterial(String),
    SetMaterialParameter(String, f32),
    SetWireframe(bool),
}

/// Recording scene backend
#[derive(Debug, Clone, Default)]
pub struct HeadlessScene {
    calls: Rc<RefCell<Vec<SceneCall>>>,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<SceneCall> {
        self.calls.borrow().clone()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Id of the last material applied
    pub fn current_material(&self) -> Option<String> {
        self.calls.borrow().iter().rev().find_map(|c| match c {
            SceneCall::ApplyMaterial(id) => Some(id.clone()),
            _ => None,
        })
    }

    fn record(&self, call: SceneCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl SceneBackend for HeadlessScene {
    fn restore_original_materials(&mut self) {
        self.record(SceneCall::RestoreOriginal);
    }

    fn apply_material(&mut self, descriptor: &EffectDescriptor, values: &ParameterValues) {
        self.record(SceneCall::ApplyMaterial(descriptor.id.clone()));
        for (key, value) in values {
            self.record(SceneCall::SetMaterialParameter(key.clone(), *value));
        }
    }

    fn set_material_parameter(&mut self, key: &str, value: f32) {
        self.record(SceneCall::SetMaterialParameter(key.to_string(), value));
    }

    fn set_wireframe(&mut self, enabled: bool) {
        self.record(SceneCall::SetWireframe(enabled));
    }
}
