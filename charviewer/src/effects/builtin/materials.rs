//! Built-in material modes
//!
//! Materials restyle the model surfaces. Exactly one is active at a time and
//! they never count against the effect budget.

use crate::effects::EffectDescriptor;

/// Baseline material applied at startup and after a stack reset
pub const DEFAULT_MATERIAL: &str = "standard";

/// Descriptors for every built-in material
pub fn material_descriptors() -> Vec<EffectDescriptor> {
    vec![
        EffectDescriptor::material("cinematic", "Cinematic", 1.0)
            .with_shortcut('1')
            .with_param("envMapIntensity", "Env Intensity", 0.2, 3.0, 0.1, 1.0),
        EffectDescriptor::material("standard", "Standard", 2.0),
        EffectDescriptor::material("chrome", "Chrome", 2.5)
            .with_param("envMapIntensity", "Reflection", 0.5, 5.0, 0.1, 2.5)
            .with_param("roughness", "Roughness", 0.0, 0.5, 0.01, 0.02),
        EffectDescriptor::material("matcap", "Matcap", 3.0).with_shortcut('2'),
        EffectDescriptor::material("normals", "Normals", 4.0).with_shortcut('3'),
    ]
}
