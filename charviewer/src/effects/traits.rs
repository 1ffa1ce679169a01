//! Scene interface used by the effect stack controller
//!
//! Materials are applied to the loaded model by the scene runtime. The
//! controller only decides which material is active and with which values.

use super::{EffectDescriptor, ParameterValues};

/// Contract implemented by the scene/model runtime
pub trait SceneBackend {
    /// Put every mesh back on the materials it was loaded with
    fn restore_original_materials(&mut self);

    /// Apply a material mode to every mesh
    fn apply_material(&mut self, descriptor: &EffectDescriptor, values: &ParameterValues);

    /// Update one uniform of the active material
    fn set_material_parameter(&mut self, key: &str, value: f32);

    /// Toggle wireframe rendering on every current material
    fn set_wireframe(&mut self, enabled: bool);
}
