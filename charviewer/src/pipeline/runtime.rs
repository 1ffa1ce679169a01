//! Pass pipeline runtime
//!
//! `PassPipeline` holds the registered passes in registration order, tracks
//! their enabled flag and parameters, and renders one frame per tick through
//! the backend.

use crate::effects::ParameterValues;

use super::traits::{
    FramePlan, PassTraits, RenderBackend, RESOLUTION_HEIGHT_UNIFORM, RESOLUTION_WIDTH_UNIFORM,
    SCENE_PASS, TIME_UNIFORM,
};

/// Runtime state for a single registered pass
#[derive(Debug, Clone)]
struct PassEntry {
    id: String,
    traits: PassTraits,
    enabled: bool,
    parameters: ParameterValues,
}

/// Ordered chain of compositing passes
pub struct PassPipeline {
    /// Passes in registration order
    passes: Vec<PassEntry>,
    /// Rendering runtime
    backend: Box<dyn RenderBackend>,
    /// Accumulated frame time
    elapsed: f32,
    /// Current viewport size
    width: u32,
    height: u32,
}

impl PassPipeline {
    /// Create an empty pipeline rendering through `backend`
    pub fn new(backend: Box<dyn RenderBackend>, width: u32, height: u32) -> Self {
        Self {
            passes: Vec::new(),
            backend,
            elapsed: 0.0,
            width,
            height,
        }
    }

    /// Register a pass. Registration order is composition order.
    pub fn register(&mut self, id: impl Into<String>, traits: PassTraits) {
        let id = id.into();
        if self.passes.iter().any(|p| p.id == id) {
            tracing::warn!(pass = %id, "Pass already registered");
            return;
        }
        self.passes.push(PassEntry {
            id,
            traits,
            enabled: false,
            parameters: ParameterValues::new(),
        });
    }

    fn pass_mut(&mut self, id: &str) -> Option<&mut PassEntry> {
        self.passes.iter_mut().find(|p| p.id == id)
    }

    /// Enable a pass and push its initial parameter values
    pub fn enable(&mut self, id: &str, values: &ParameterValues) {
        let (width, height, elapsed) = (self.width, self.height, self.elapsed);
        let Some(pass) = self.passes.iter_mut().find(|p| p.id == id) else {
            tracing::trace!(pass = id, "Enable ignored for unregistered pass");
            return;
        };

        pass.enabled = true;
        pass.parameters = values.clone();
        let traits = pass.traits;

        self.backend.enable(id);
        for (key, value) in values {
            self.backend.set_parameter(id, key, *value);
        }
        if traits.resolution_dependent {
            self.backend.set_parameter(id, RESOLUTION_WIDTH_UNIFORM, width as f32);
            self.backend.set_parameter(id, RESOLUTION_HEIGHT_UNIFORM, height as f32);
        }
        if traits.time_based {
            self.backend.set_parameter(id, TIME_UNIFORM, elapsed);
        }
        tracing::debug!(pass = id, "Pass enabled");
    }

    /// Disable a pass
    pub fn disable(&mut self, id: &str) {
        let Some(pass) = self.pass_mut(id) else {
            return;
        };
        if !pass.enabled {
            return;
        }
        pass.enabled = false;
        self.backend.disable(id);
        tracing::debug!(pass = id, "Pass disabled");
    }

    /// Disable every enabled pass
    pub fn disable_all(&mut self) {
        let enabled: Vec<String> = self
            .passes
            .iter()
            .filter(|p| p.enabled)
            .map(|p| p.id.clone())
            .collect();
        for id in enabled {
            self.disable(&id);
        }
    }

    /// Update one parameter of an enabled pass; ignored while disabled
    pub fn update_parameter(&mut self, id: &str, key: &str, value: f32) {
        let Some(pass) = self.pass_mut(id) else {
            return;
        };
        if !pass.enabled {
            return;
        }
        pass.parameters.insert(key.to_string(), value);
        self.backend.set_parameter(id, key, value);
    }

    /// Render one frame.
    ///
    /// Returns true if a composited frame was produced. With no enabled pass
    /// the backend renders the scene directly and false is returned.
    pub fn render_frame(&mut self, delta_time: f32) -> bool {
        self.elapsed += delta_time;

        if !self.passes.iter().any(|p| p.enabled) {
            self.backend.render_direct(delta_time);
            return false;
        }

        for pass in self.passes.iter().filter(|p| p.enabled && p.traits.time_based) {
            self.backend.set_parameter(&pass.id, TIME_UNIFORM, self.elapsed);
        }

        let mut passes = Vec::with_capacity(self.passes.len() + 1);
        passes.push(SCENE_PASS);
        passes.extend(self.passes.iter().filter(|p| p.enabled).map(|p| p.id.as_str()));

        let plan = FramePlan {
            delta_time,
            elapsed: self.elapsed,
            passes,
        };
        tracing::trace!(passes = plan.passes.len(), elapsed = self.elapsed, "Composing frame");
        self.backend.compose(&plan)
    }

    /// Propagate a new viewport size
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;
        self.backend.resize(width, height);

        for pass in self.passes.iter().filter(|p| p.traits.resolution_dependent) {
            self.backend.set_parameter(&pass.id, RESOLUTION_WIDTH_UNIFORM, width as f32);
            self.backend.set_parameter(&pass.id, RESOLUTION_HEIGHT_UNIFORM, height as f32);
        }
        tracing::debug!(width, height, "Pipeline resized");
    }

    /// Ids of enabled passes in composition order
    pub fn active_pass_ids(&self) -> Vec<&str> {
        self.passes
            .iter()
            .filter(|p| p.enabled)
            .map(|p| p.id.as_str())
            .collect()
    }

    /// Ids of all registered passes in composition order
    pub fn pass_ids(&self) -> Vec<&str> {
        self.passes.iter().map(|p| p.id.as_str()).collect()
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.passes.iter().any(|p| p.id == id)
    }

    pub fn is_enabled(&self, id: &str) -> bool {
        self.passes.iter().any(|p| p.id == id && p.enabled)
    }

    /// Last value pushed for a pass parameter
    pub fn parameter(&self, id: &str, key: &str) -> Option<f32> {
        self.passes
            .iter()
            .find(|p| p.id == id)
            .and_then(|p| p.parameters.get(key).copied())
    }

    pub fn elapsed_time(&self) -> f32 {
        self.elapsed
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
