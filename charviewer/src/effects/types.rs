//! Core effect data types
//!
//! These types define the immutable effect catalog entries and the runtime
//! stack state. Descriptors are registered once; the stack is owned by the
//! `EffectStackController` and mutated nowhere else.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Live parameter values keyed by parameter key
pub type ParameterValues = BTreeMap<String, f32>;

/// Whether an effect restyles model surfaces or the composed frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectCategory {
    /// Exclusive surface style, exactly one is active at a time
    #[serde(rename = "material")]
    Material,
    /// Stackable compositing pass applied to the rendered frame
    #[serde(rename = "post-process")]
    PostProcess,
}

impl EffectCategory {
    /// Get display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            EffectCategory::Material => "Material",
            EffectCategory::PostProcess => "Post-Process",
        }
    }
}

/// Coarse performance class used for budget admission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostTier {
    Trivial,
    Light,
    Medium,
    Heavy,
}

impl CostTier {
    /// Budget weight of this tier
    pub fn weight(&self) -> f32 {
        match self {
            CostTier::Trivial => 0.2,
            CostTier::Light => 1.0,
            CostTier::Medium => 2.0,
            CostTier::Heavy => 4.0,
        }
    }

    /// Get all tiers, cheapest first
    pub fn all() -> &'static [CostTier] {
        &[CostTier::Trivial, CostTier::Light, CostTier::Medium, CostTier::Heavy]
    }
}

/// Metadata for a numeric parameter (describes the parameter, doesn't hold the value)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterMeta {
    /// Internal key
    pub key: String,
    /// Display label in UI
    pub label: String,
    /// Minimum value
    pub min: f32,
    /// Maximum value
    pub max: f32,
    /// Slider step increment
    pub step: f32,
    /// Default value
    pub default: f32,
}

impl ParameterMeta {
    /// Create a new parameter description
    pub fn new(key: impl Into<String>, label: impl Into<String>, min: f32, max: f32, step: f32, default: f32) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            min,
            max,
            step,
            default,
        }
    }

    /// Clamp a value into this parameter's range
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

/// Immutable catalog entry for a material mode or post-process effect
#[derive(Debug, Clone, PartialEq)]
pub struct EffectDescriptor {
    /// Unique identifier (e.g., "ascii", "chrome")
    pub id: String,
    /// Human-readable display name
    pub name: String,
    /// Optional keyboard shortcut
    pub shortcut: Option<char>,
    /// Material or post-process
    pub category: EffectCategory,
    /// Budget class; `None` means the effect is never budget-limited
    pub cost_tier: Option<CostTier>,
    /// Whether the effect may coexist with others
    pub stackable: bool,
    /// Ordered parameter descriptions
    pub parameters: Vec<ParameterMeta>,
    /// Sort key for UI listings
    pub ui_order: f32,
    /// Base descriptor id when this entry was composed from a variant
    pub variant_of: Option<String>,
}

impl EffectDescriptor {
    /// Create a material descriptor (never stackable, never budgeted)
    pub fn material(id: impl Into<String>, name: impl Into<String>, ui_order: f32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            shortcut: None,
            category: EffectCategory::Material,
            cost_tier: None,
            stackable: false,
            parameters: Vec::new(),
            ui_order,
            variant_of: None,
        }
    }

    /// Create a post-process descriptor
    pub fn post_process(id: impl Into<String>, name: impl Into<String>, ui_order: f32, cost_tier: CostTier) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            shortcut: None,
            category: EffectCategory::PostProcess,
            cost_tier: Some(cost_tier),
            stackable: true,
            parameters: Vec::new(),
            ui_order,
            variant_of: None,
        }
    }

    /// Add a parameter
    pub fn with_param(mut self, key: &str, label: &str, min: f32, max: f32, step: f32, default: f32) -> Self {
        self.parameters.push(ParameterMeta::new(key, label, min, max, step, default));
        self
    }

    /// Set the keyboard shortcut
    pub fn with_shortcut(mut self, key: char) -> Self {
        self.shortcut = Some(key);
        self
    }

    /// Remove the cost tier (budget-exempt effect)
    pub fn without_cost_tier(mut self) -> Self {
        self.cost_tier = None;
        self
    }

    /// Is this a material mode
    pub fn is_material(&self) -> bool {
        self.category == EffectCategory::Material
    }

    /// Is this a post-process effect
    pub fn is_post_process(&self) -> bool {
        self.category == EffectCategory::PostProcess
    }

    /// Was this descriptor composed from a variant
    pub fn is_variant(&self) -> bool {
        self.variant_of.is_some()
    }

    /// Budget weight (0 when untiered)
    pub fn cost(&self) -> f32 {
        self.cost_tier.map(|t| t.weight()).unwrap_or(0.0)
    }

    /// Get a parameter description by key
    pub fn parameter(&self, key: &str) -> Option<&ParameterMeta> {
        self.parameters.iter().find(|p| p.key == key)
    }

    /// Default values for every declared parameter
    pub fn default_values(&self) -> ParameterValues {
        self.parameters
            .iter()
            .map(|p| (p.key.clone(), p.default))
            .collect()
    }

    /// Defaults overlaid with saved values; keys the descriptor does not
    /// declare are dropped and saved values are clamped to range.
    pub fn merge_values(&self, saved: &ParameterValues) -> ParameterValues {
        self.parameters
            .iter()
            .map(|p| {
                let value = saved.get(&p.key).map(|v| p.clamp(*v)).unwrap_or(p.default);
                (p.key.clone(), value)
            })
            .collect()
    }

    /// Compose a finalized descriptor from this base and a variant override
    pub fn with_variant(&self, variant: &EffectVariant) -> Self {
        let category = self.category;
        let mut stackable = variant.stackable.unwrap_or(self.stackable);
        if category == EffectCategory::Material {
            stackable = false;
        }
        Self {
            id: variant.id.clone(),
            name: variant.name.clone().unwrap_or_else(|| self.name.clone()),
            shortcut: variant.shortcut,
            category,
            cost_tier: variant.cost_tier.unwrap_or(self.cost_tier),
            stackable,
            parameters: variant
                .parameters
                .clone()
                .unwrap_or_else(|| self.parameters.clone()),
            ui_order: variant.ui_order.unwrap_or(self.ui_order),
            variant_of: Some(self.id.clone()),
        }
    }
}

/// Override record for a descriptor variant
///
/// Every `None` field inherits from the base descriptor. Shortcuts are never
/// inherited so a variant cannot steal its base's key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectVariant {
    pub id: String,
    pub name: Option<String>,
    pub shortcut: Option<char>,
    pub cost_tier: Option<Option<CostTier>>,
    pub stackable: Option<bool>,
    pub parameters: Option<Vec<ParameterMeta>>,
    pub ui_order: Option<f32>,
}

impl EffectVariant {
    /// Create a variant that only changes the id
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_cost_tier(mut self, tier: Option<CostTier>) -> Self {
        self.cost_tier = Some(tier);
        self
    }

    pub fn with_parameters(mut self, parameters: Vec<ParameterMeta>) -> Self {
        self.parameters = Some(parameters);
        self
    }
}

/// An effect admitted onto the stack, with its live parameter values
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveEffectEntry {
    /// Descriptor id
    pub effect_id: String,
    /// Current parameter values
    pub parameter_values: ParameterValues,
}

impl ActiveEffectEntry {
    pub fn new(effect_id: impl Into<String>, parameter_values: ParameterValues) -> Self {
        Self {
            effect_id: effect_id.into(),
            parameter_values,
        }
    }

    /// Get a parameter value by key
    pub fn get(&self, key: &str) -> Option<f32> {
        self.parameter_values.get(key).copied()
    }
}

/// The active material plus the ordered list of active post-process effects
#[derive(Debug, Clone, PartialEq)]
pub struct EffectStack {
    current_material: String,
    active_effects: Vec<ActiveEffectEntry>,
}

impl EffectStack {
    /// Create a stack with the given baseline material and no effects
    pub fn new(material: impl Into<String>) -> Self {
        Self {
            current_material: material.into(),
            active_effects: Vec::new(),
        }
    }

    pub fn current_material(&self) -> &str {
        &self.current_material
    }

    pub(crate) fn set_material(&mut self, material: impl Into<String>) {
        self.current_material = material.into();
    }

    /// Active effects in insertion order
    pub fn active_effects(&self) -> &[ActiveEffectEntry] {
        &self.active_effects
    }

    /// Active effect ids in insertion order
    pub fn active_ids(&self) -> Vec<&str> {
        self.active_effects.iter().map(|e| e.effect_id.as_str()).collect()
    }

    pub fn contains(&self, effect_id: &str) -> bool {
        self.active_effects.iter().any(|e| e.effect_id == effect_id)
    }

    pub fn get(&self, effect_id: &str) -> Option<&ActiveEffectEntry> {
        self.active_effects.iter().find(|e| e.effect_id == effect_id)
    }

    pub(crate) fn get_mut(&mut self, effect_id: &str) -> Option<&mut ActiveEffectEntry> {
        self.active_effects.iter_mut().find(|e| e.effect_id == effect_id)
    }

    /// Append an entry; refuses duplicates
    pub(crate) fn push(&mut self, entry: ActiveEffectEntry) -> bool {
        if self.contains(&entry.effect_id) {
            return false;
        }
        self.active_effects.push(entry);
        true
    }

    /// Remove an entry by id
    pub(crate) fn remove(&mut self, effect_id: &str) -> Option<ActiveEffectEntry> {
        let pos = self.active_effects.iter().position(|e| e.effect_id == effect_id)?;
        Some(self.active_effects.remove(pos))
    }

    /// Drop every active effect, returning them in order
    pub(crate) fn clear(&mut self) -> Vec<ActiveEffectEntry> {
        std::mem::take(&mut self.active_effects)
    }

    pub fn len(&self) -> usize {
        self.active_effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active_effects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_weights() {
        assert_eq!(CostTier::Trivial.weight(), 0.2);
        assert_eq!(CostTier::Light.weight(), 1.0);
        assert_eq!(CostTier::Medium.weight(), 2.0);
        assert_eq!(CostTier::Heavy.weight(), 4.0);
    }

    #[test]
    fn test_category_serde_names() {
        let json = serde_json::to_string(&EffectCategory::PostProcess).unwrap();
        assert_eq!(json, "\"post-process\"");
        let tier: CostTier = serde_json::from_str("\"heavy\"").unwrap();
        assert_eq!(tier, CostTier::Heavy);
    }

    #[test]
    fn test_material_descriptor_never_stackable() {
        let base = EffectDescriptor::material("clay", "Clay", 1.0);
        let variant = EffectVariant {
            stackable: Some(true),
            ..EffectVariant::new("clay-dark")
        };
        let composed = base.with_variant(&variant);
        assert!(!base.stackable);
        assert!(!composed.stackable);
        assert!(composed.is_material());
    }

    #[test]
    fn test_variant_inherits_base_fields() {
        let base = EffectDescriptor::post_process("ascii", "ASCII", 5.0, CostTier::Medium)
            .with_param("cellSize", "Cell Size", 4.0, 30.0, 1.0, 8.0)
            .with_shortcut('4');
        let composed = base.with_variant(&EffectVariant::new("ascii-mono").named("ASCII Mono"));

        assert_eq!(composed.id, "ascii-mono");
        assert_eq!(composed.name, "ASCII Mono");
        assert_eq!(composed.cost_tier, Some(CostTier::Medium));
        assert_eq!(composed.parameters, base.parameters);
        assert_eq!(composed.ui_order, 5.0);
        assert_eq!(composed.shortcut, None);
        assert_eq!(composed.variant_of.as_deref(), Some("ascii"));
        assert!(composed.is_variant());
    }

    #[test]
    fn test_merge_values_clamps_and_drops_unknown() {
        let desc = EffectDescriptor::post_process("crt", "CRT", 12.0, CostTier::Light)
            .with_param("curvature", "Curvature", 0.0, 10.0, 0.5, 3.0)
            .with_param("vignetteIntensity", "Vignette", 0.0, 1.0, 0.05, 0.3);

        let mut saved = ParameterValues::new();
        saved.insert("curvature".to_string(), 42.0);
        saved.insert("bogus".to_string(), 1.0);

        let merged = desc.merge_values(&saved);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged["curvature"], 10.0);
        assert_eq!(merged["vignetteIntensity"], 0.3);
    }

    #[test]
    fn test_effect_stack_operations() {
        let mut stack = EffectStack::new("standard");
        assert!(stack.push(ActiveEffectEntry::new("ascii", ParameterValues::new())));
        assert!(stack.push(ActiveEffectEntry::new("crt", ParameterValues::new())));
        assert!(!stack.push(ActiveEffectEntry::new("ascii", ParameterValues::new())));

        assert_eq!(stack.active_ids(), vec!["ascii", "crt"]);
        assert!(stack.remove("ascii").is_some());
        assert!(stack.remove("ascii").is_none());
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.current_material(), "standard");

        let cleared = stack.clear();
        assert_eq!(cleared.len(), 1);
        assert!(stack.is_empty());
    }
}
