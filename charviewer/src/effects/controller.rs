//! Effect stack controller
//!
//! The controller is the only owner of the `EffectStack`. It validates every
//! request against the registry, forwards changes to the scene and the pass
//! pipeline, and publishes notifications on the event bus.

use std::rc::Rc;
use std::sync::Arc;

use super::builtin::DEFAULT_MATERIAL;
use super::registry::{Admission, BudgetRejection, EffectRegistry};
use super::traits::SceneBackend;
use super::types::{ActiveEffectEntry, EffectCategory, EffectStack, ParameterValues};
use crate::events::{EventBus, ViewerEvent};
use crate::pipeline::PassPipeline;

/// Result of `EffectStackController::toggle_effect`
#[derive(Debug, Clone, PartialEq)]
pub enum ToggleOutcome {
    /// The effect was admitted; the total is reported when a cost was computed
    Enabled { total_cost: Option<f32> },
    /// The effect was removed from the stack
    Disabled,
    /// The budget check refused the effect; nothing changed
    Blocked(BudgetRejection),
    /// Unknown id or not a post-process effect
    Ignored,
}

/// Owns the active material and the ordered post-process stack
pub struct EffectStackController {
    registry: Arc<EffectRegistry>,
    stack: EffectStack,
    /// Live parameter values of the current material
    material_values: ParameterValues,
    pipeline: PassPipeline,
    scene: Box<dyn SceneBackend>,
    events: Rc<EventBus>,
    wireframe: bool,
}

impl EffectStackController {
    /// Create a controller on the baseline material with an empty stack
    pub fn new(
        registry: Arc<EffectRegistry>,
        pipeline: PassPipeline,
        scene: Box<dyn SceneBackend>,
        events: Rc<EventBus>,
    ) -> Self {
        let material_values = registry
            .get(DEFAULT_MATERIAL)
            .map(|d| d.default_values())
            .unwrap_or_default();
        Self {
            registry,
            stack: EffectStack::new(DEFAULT_MATERIAL),
            material_values,
            pipeline,
            scene,
            events,
            wireframe: false,
        }
    }

    pub fn registry(&self) -> &EffectRegistry {
        &self.registry
    }

    pub fn stack(&self) -> &EffectStack {
        &self.stack
    }

    pub fn current_material(&self) -> &str {
        self.stack.current_material()
    }

    /// Live parameter values of the current material
    pub fn material_values(&self) -> &ParameterValues {
        &self.material_values
    }

    /// Active effect ids in insertion order
    pub fn active_ids(&self) -> Vec<&str> {
        self.stack.active_ids()
    }

    pub fn wireframe(&self) -> bool {
        self.wireframe
    }

    pub fn pipeline(&self) -> &PassPipeline {
        &self.pipeline
    }

    pub fn pipeline_mut(&mut self) -> &mut PassPipeline {
        &mut self.pipeline
    }

    /// Switch to a material mode with default parameter values.
    ///
    /// Unknown ids and non-material ids are ignored. Returns true if the
    /// material was applied.
    pub fn apply_material(&mut self, id: &str) -> bool {
        self.apply_material_with(id, &ParameterValues::new())
    }

    /// Switch to a material mode, overlaying saved parameter values on the defaults
    pub fn apply_material_with(&mut self, id: &str, saved: &ParameterValues) -> bool {
        let Some(descriptor) = self.registry.get(id).filter(|d| d.is_material()) else {
            tracing::trace!(id, "Ignoring apply for unknown material");
            return false;
        };

        let values = descriptor.merge_values(saved);
        self.scene.restore_original_materials();
        self.scene.apply_material(descriptor, &values);
        if self.wireframe {
            self.scene.set_wireframe(true);
        }

        self.stack.set_material(id);
        self.material_values = values;
        tracing::info!(material = id, "Material applied");
        self.events.emit(ViewerEvent::MaterialChanged { id: id.to_string() });
        true
    }

    /// Re-apply the current material, e.g. after a new model was loaded
    pub fn reapply_material(&mut self) {
        let Some(descriptor) = self.registry.get(self.stack.current_material()) else {
            return;
        };
        self.scene.apply_material(descriptor, &self.material_values);
        if self.wireframe {
            self.scene.set_wireframe(true);
        }
    }

    /// Step through materials in UI order, wrapping at both ends
    pub fn cycle_material(&mut self, step: i32) -> bool {
        let next = {
            let materials = self.registry.list_by_category(EffectCategory::Material);
            if materials.is_empty() {
                return false;
            }
            let current = materials
                .iter()
                .position(|d| d.id == self.stack.current_material())
                .unwrap_or(0);
            let index = (current as i64 + step as i64).rem_euclid(materials.len() as i64) as usize;
            materials[index].id.clone()
        };
        self.apply_material(&next)
    }

    /// Enable an inactive effect or disable an active one
    pub fn toggle_effect(&mut self, id: &str) -> ToggleOutcome {
        let Some(descriptor) = self.registry.get(id).filter(|d| d.is_post_process()) else {
            tracing::trace!(id, "Ignoring toggle for unknown effect");
            return ToggleOutcome::Ignored;
        };

        if self.stack.remove(id).is_some() {
            self.pipeline.disable(id);
            tracing::info!(effect = id, "Effect disabled");
            self.emit_stack_changed();
            return ToggleOutcome::Disabled;
        }

        match self.registry.can_admit(&self.stack.active_ids(), id) {
            Admission::Rejected(rejection) => {
                tracing::info!(effect = id, reason = %rejection, "Effect blocked by budget");
                self.events.emit(ViewerEvent::BudgetBlocked {
                    effect_id: id.to_string(),
                    reason: rejection.to_string(),
                    total_cost: rejection.total_cost(),
                });
                ToggleOutcome::Blocked(rejection)
            }
            Admission::Allowed { total_cost } => {
                let values = descriptor.default_values();
                self.pipeline.enable(id, &values);
                self.stack.push(ActiveEffectEntry::new(id, values));
                tracing::info!(effect = id, ?total_cost, "Effect enabled");
                self.emit_stack_changed();
                ToggleOutcome::Enabled { total_cost }
            }
        }
    }

    /// Update one parameter of an active effect.
    ///
    /// Values are clamped to the declared range; inactive effects and
    /// undeclared keys are ignored.
    pub fn update_effect_parameter(&mut self, id: &str, key: &str, value: f32) {
        let Some(meta) = self.registry.get(id).and_then(|d| d.parameter(key)) else {
            return;
        };
        let Some(entry) = self.stack.get_mut(id) else {
            return;
        };
        let value = meta.clamp(value);
        entry.parameter_values.insert(key.to_string(), value);
        self.pipeline.update_parameter(id, key, value);
        tracing::debug!(effect = id, key, value, "Effect parameter updated");
    }

    /// Update one parameter of the current material
    pub fn update_material_parameter(&mut self, key: &str, value: f32) {
        let Some(meta) = self
            .registry
            .get(self.stack.current_material())
            .and_then(|d| d.parameter(key))
        else {
            return;
        };
        let value = meta.clamp(value);
        self.material_values.insert(key.to_string(), value);
        self.scene.set_material_parameter(key, value);
        tracing::debug!(key, value, "Material parameter updated");
    }

    /// Replace the material and the whole effect stack in one step.
    ///
    /// Effects are admitted in the given order without a budget check. Saved
    /// values are merged onto descriptor defaults before the pass is enabled,
    /// so every pass exists before it is configured.
    pub fn set_full_stack(&mut self, material: &str, material_values: &ParameterValues, effects: &[ActiveEffectEntry]) {
        for entry in self.stack.clear() {
            self.pipeline.disable(&entry.effect_id);
        }

        self.apply_material_with(material, material_values);

        for saved in effects {
            let Some(descriptor) = self
                .registry
                .get(&saved.effect_id)
                .filter(|d| d.is_post_process())
            else {
                tracing::warn!(effect = %saved.effect_id, "Skipping unknown effect in stack");
                continue;
            };
            if self.stack.contains(&saved.effect_id) {
                continue;
            }
            let values = descriptor.merge_values(&saved.parameter_values);
            self.pipeline.enable(&saved.effect_id, &values);
            self.stack.push(ActiveEffectEntry::new(saved.effect_id.as_str(), values));
        }

        tracing::debug!(material, effects = self.stack.len(), "Full stack applied");
        self.emit_stack_changed();
    }

    /// Flip the wireframe flag; returns the new state
    pub fn toggle_wireframe(&mut self) -> bool {
        self.set_wireframe(!self.wireframe);
        self.wireframe
    }

    /// Set the wireframe flag, notifying only on change
    pub fn set_wireframe(&mut self, enabled: bool) {
        if self.wireframe == enabled {
            return;
        }
        self.wireframe = enabled;
        self.scene.set_wireframe(enabled);
        self.events.emit(ViewerEvent::WireframeChanged { enabled });
    }

    fn emit_stack_changed(&self) {
        let active = self.stack.active_ids().into_iter().map(String::from).collect();
        self.events.emit(ViewerEvent::EffectsChanged { active });
    }
}
