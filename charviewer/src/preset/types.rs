//! Preset data types and legacy migration

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::PresetError;
use crate::camera::CameraMode;
use crate::effects::builtin::DEFAULT_MATERIAL;
use crate::effects::{ActiveEffectEntry, EffectCategory, EffectRegistry, ParameterValues};
use crate::lighting::{lighting_presets, LightIntensities, DEFAULT_LIGHTING_PRESET};

/// Current preset schema version
pub const PRESET_VERSION: u32 = 2;

/// An effect or material id with its parameter values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectSnapshot {
    pub id: String,
    #[serde(default)]
    pub params: ParameterValues,
}

impl EffectSnapshot {
    pub fn new(id: impl Into<String>, params: ParameterValues) -> Self {
        Self {
            id: id.into(),
            params,
        }
    }
}

impl From<&ActiveEffectEntry> for EffectSnapshot {
    fn from(entry: &ActiveEffectEntry) -> Self {
        Self::new(entry.effect_id.as_str(), entry.parameter_values.clone())
    }
}

impl From<&EffectSnapshot> for ActiveEffectEntry {
    fn from(snapshot: &EffectSnapshot) -> Self {
        ActiveEffectEntry::new(snapshot.id.as_str(), snapshot.params.clone())
    }
}

/// Lighting preset id plus the five intensities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightingSnapshot {
    pub preset: String,
    pub intensities: LightIntensities,
}

impl Default for LightingSnapshot {
    fn default() -> Self {
        let intensities = lighting_presets()
            .into_iter()
            .find(|p| p.id == DEFAULT_LIGHTING_PRESET)
            .map(|p| p.intensities)
            .unwrap_or(LightIntensities {
                key: 2.0,
                fill: 0.5,
                rim: 0.3,
                ambient: 0.6,
                hemi: 0.5,
            });
        Self {
            preset: DEFAULT_LIGHTING_PRESET.to_string(),
            intensities,
        }
    }
}

/// Camera mode, speed and field of view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraSnapshot {
    #[serde(default)]
    pub mode: CameraMode,
    #[serde(default = "default_speed")]
    pub speed: f32,
    #[serde(default = "default_fov")]
    pub fov: f32,
}

fn default_speed() -> f32 {
    1.0
}

fn default_fov() -> f32 {
    45.0
}

impl Default for CameraSnapshot {
    fn default() -> Self {
        Self {
            mode: CameraMode::None,
            speed: default_speed(),
            fov: default_fov(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    #[serde(default)]
    pub wireframe: bool,
}

/// A saved visual configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    /// Milliseconds since the Unix epoch; unique within a store
    pub timestamp: i64,
    pub version: u32,
    pub material: EffectSnapshot,
    #[serde(default)]
    pub effects: Vec<EffectSnapshot>,
    #[serde(default)]
    pub lighting: LightingSnapshot,
    #[serde(default)]
    pub camera: CameraSnapshot,
    #[serde(default)]
    pub scene: SceneSnapshot,
}

impl Preset {
    /// Decode a stored preset, migrating legacy versions first
    pub fn from_value(value: Value, registry: &EffectRegistry) -> Result<Self, PresetError> {
        let Value::Object(mut object) = value else {
            return Err(PresetError::Migration("preset is not an object".into()));
        };

        let version = object.get("version").and_then(Value::as_u64).unwrap_or(1);
        if version < u64::from(PRESET_VERSION) {
            migrate_v1(&mut object, registry)?;
        }

        Ok(serde_json::from_value(Value::Object(object))?)
    }

    /// Effect list as stack entries
    pub fn effect_entries(&self) -> Vec<ActiveEffectEntry> {
        self.effects.iter().map(ActiveEffectEntry::from).collect()
    }
}

/// Rewrite a v1 object in place.
///
/// A v1 preset stored a single `shader` reference. A post-process shader
/// becomes the only effect over the baseline material; anything else becomes
/// the material with an empty effect list.
fn migrate_v1(object: &mut Map<String, Value>, registry: &EffectRegistry) -> Result<(), PresetError> {
    let (shader_id, shader_params) = match object.remove("shader") {
        None | Some(Value::Null) => (DEFAULT_MATERIAL.to_string(), ParameterValues::new()),
        Some(Value::Object(mut shader)) => {
            let id = match shader.remove("id") {
                None | Some(Value::Null) => DEFAULT_MATERIAL.to_string(),
                Some(Value::String(id)) if id.is_empty() => DEFAULT_MATERIAL.to_string(),
                Some(Value::String(id)) => id,
                Some(other) => return Err(PresetError::Migration(format!("invalid shader id {other}"))),
            };
            let params = match shader.remove("params") {
                None | Some(Value::Null) => ParameterValues::new(),
                Some(params) => serde_json::from_value(params)
                    .map_err(|e| PresetError::Migration(format!("invalid shader params: {e}")))?,
            };
            (id, params)
        }
        Some(other) => return Err(PresetError::Migration(format!("invalid shader {other}"))),
    };

    let is_post_process = registry
        .get(&shader_id)
        .is_some_and(|d| d.category == EffectCategory::PostProcess);

    let (material, effects) = if is_post_process {
        (
            EffectSnapshot::new(DEFAULT_MATERIAL, ParameterValues::new()),
            vec![EffectSnapshot::new(shader_id, shader_params)],
        )
    } else {
        (EffectSnapshot::new(shader_id, shader_params), Vec::new())
    };

    tracing::debug!(material = %material.id, effects = effects.len(), "Migrated legacy preset");
    object.insert("material".into(), serde_json::to_value(material)?);
    object.insert("effects".into(), serde_json::to_value(effects)?);
    object.insert("version".into(), Value::from(PRESET_VERSION));
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::effects::BudgetPolicy;

    fn registry() -> EffectRegistry {
        EffectRegistry::with_builtins(BudgetPolicy::default())
    }

    #[test]
    fn test_v2_decodes_unchanged() {
        let value = json!({
            "name": "Hero",
            "timestamp": 1700000000000_i64,
            "version": 2,
            "material": {"id": "chrome", "params": {"roughness": 0.1}},
            "effects": [{"id": "crt", "params": {"curvature": 4.0}}],
            "lighting": {"preset": "studio", "intensities": {"key": 1.2, "fill": 1.0, "rim": 0.8, "ambient": 0.7, "hemi": 0.6}},
            "camera": {"mode": "drift", "speed": 0.5, "fov": 60.0},
            "scene": {"wireframe": true}
        });
        let preset = Preset::from_value(value, &registry()).unwrap();
        assert_eq!(preset.material.id, "chrome");
        assert_eq!(preset.effects[0].params["curvature"], 4.0);
        assert_eq!(preset.camera.mode, CameraMode::Drift);
        assert!(preset.scene.wireframe);
    }

    #[test]
    fn test_v1_post_process_shader_becomes_effect() {
        let value = json!({
            "name": "Old",
            "timestamp": 1,
            "shader": {"id": "ascii", "params": {"cellSize": 12.0}},
            "lighting": {"preset": "natural", "intensities": {"key": 1.4, "fill": 0.5, "rim": 0.3, "ambient": 0.5, "hemi": 0.8}},
            "camera": {"mode": "none", "speed": 1.0, "fov": 45.0},
            "scene": {"wireframe": false}
        });
        let preset = Preset::from_value(value, &registry()).unwrap();
        assert_eq!(preset.version, PRESET_VERSION);
        assert_eq!(preset.material.id, "standard");
        assert!(preset.material.params.is_empty());
        assert_eq!(preset.effects.len(), 1);
        assert_eq!(preset.effects[0].id, "ascii");
        assert_eq!(preset.effects[0].params["cellSize"], 12.0);
        assert_eq!(preset.lighting.preset, "natural");
    }

    #[test]
    fn test_v1_material_shader_stays_material() {
        let value = json!({
            "name": "Old",
            "timestamp": 1,
            "version": 1,
            "shader": {"id": "matcap"}
        });
        let preset = Preset::from_value(value, &registry()).unwrap();
        assert_eq!(preset.material.id, "matcap");
        assert!(preset.effects.is_empty());
    }

    #[test]
    fn test_v1_without_shader_defaults_to_standard() {
        let value = json!({"name": "Bare", "timestamp": 5});
        let preset = Preset::from_value(value, &registry()).unwrap();
        assert_eq!(preset.material.id, "standard");
        assert_eq!(preset.camera, CameraSnapshot::default());
    }

    #[test]
    fn test_malformed_legacy_rejected() {
        let bad_shader = json!({"name": "x", "timestamp": 1, "shader": 42});
        assert!(matches!(
            Preset::from_value(bad_shader, &registry()),
            Err(PresetError::Migration(_))
        ));

        let bad_params = json!({"name": "x", "timestamp": 1, "shader": {"id": "ascii", "params": "loud"}});
        assert!(matches!(
            Preset::from_value(bad_params, &registry()),
            Err(PresetError::Migration(_))
        ));

        assert!(Preset::from_value(json!([1, 2]), &registry()).is_err());
    }

    #[test]
    fn test_serialized_shape() {
        let preset = Preset {
            name: "P".into(),
            timestamp: 10,
            version: PRESET_VERSION,
            material: EffectSnapshot::new("standard", ParameterValues::new()),
            effects: Vec::new(),
            lighting: LightingSnapshot::default(),
            camera: CameraSnapshot::default(),
            scene: SceneSnapshot::default(),
        };
        let value = serde_json::to_value(&preset).unwrap();
        assert_eq!(value["lighting"]["preset"], "3-point");
        assert_eq!(value["lighting"]["intensities"]["key"], 2.0);
        assert_eq!(value["camera"]["mode"], "none");
        assert_eq!(value["scene"]["wireframe"], false);
        assert_eq!(value["material"]["params"], json!({}));
    }
}
