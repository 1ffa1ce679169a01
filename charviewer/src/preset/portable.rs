//! Portable preset export/import
//!
//! The portable form carries material, effects and lighting only, wrapped in
//! an envelope tagged with `"format": "charviewer-preset"`.

use serde::{Deserialize, Serialize};

use super::error::PresetError;
use super::types::{EffectSnapshot, LightingSnapshot, Preset};
use crate::effects::builtin::DEFAULT_MATERIAL;
use crate::effects::{ActiveEffectEntry, ParameterValues};

/// Envelope format tag
pub const PORTABLE_FORMAT: &str = "charviewer-preset";

/// Envelope version
pub const PORTABLE_VERSION: u32 = 1;

/// Material, effects and lighting of a preset
#[derive(Debug, Clone, PartialEq)]
pub struct PortablePreset {
    pub material: EffectSnapshot,
    pub effects: Vec<EffectSnapshot>,
    pub lighting: Option<LightingSnapshot>,
}

impl PortablePreset {
    pub fn effect_entries(&self) -> Vec<ActiveEffectEntry> {
        self.effects.iter().map(ActiveEffectEntry::from).collect()
    }
}

impl From<&Preset> for PortablePreset {
    fn from(preset: &Preset) -> Self {
        Self {
            material: preset.material.clone(),
            effects: preset.effects.clone(),
            lighting: Some(preset.lighting.clone()),
        }
    }
}

#[derive(Serialize)]
struct EnvelopeOut<'a> {
    format: &'static str,
    version: u32,
    material: &'a EffectSnapshot,
    effects: &'a [EffectSnapshot],
    lighting: Option<&'a LightingSnapshot>,
}

#[derive(Deserialize)]
struct EnvelopeIn {
    #[serde(default)]
    format: Option<String>,
    #[serde(default)]
    material: Option<EffectSnapshot>,
    #[serde(default)]
    effects: Vec<EffectSnapshot>,
    #[serde(default)]
    lighting: Option<LightingSnapshot>,
}

/// Serialize the portable subset of a preset as pretty-printed JSON
pub fn export_preset(preset: &PortablePreset) -> Result<String, PresetError> {
    let envelope = EnvelopeOut {
        format: PORTABLE_FORMAT,
        version: PORTABLE_VERSION,
        material: &preset.material,
        effects: &preset.effects,
        lighting: preset.lighting.as_ref(),
    };
    Ok(serde_json::to_string_pretty(&envelope)?)
}

/// Parse a portable preset, rejecting payloads without the format tag
pub fn import_preset(json: &str) -> Result<PortablePreset, PresetError> {
    let envelope: EnvelopeIn = serde_json::from_str(json)?;
    if envelope.format.as_deref() != Some(PORTABLE_FORMAT) {
        return Err(PresetError::InvalidFormat {
            found: envelope.format,
        });
    }

    Ok(PortablePreset {
        material: envelope
            .material
            .unwrap_or_else(|| EffectSnapshot::new(DEFAULT_MATERIAL, ParameterValues::new())),
        effects: envelope.effects,
        lighting: envelope.lighting,
    })
}
