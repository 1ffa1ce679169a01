//! Preset manager - capture, persist and restore visual configurations
//!
//! Presets are stored as one JSON array under a single key, most recent
//! first, bounded to a fixed capacity.

use std::rc::Rc;
use std::sync::Arc;

use serde_json::Value;

use super::error::PresetError;
use super::portable::{self, PortablePreset};
use super::storage::PresetStore;
use super::types::{CameraSnapshot, EffectSnapshot, LightingSnapshot, Preset, SceneSnapshot, PRESET_VERSION};
use crate::camera::CameraAnimator;
use crate::effects::{EffectRegistry, EffectStackController};
use crate::events::{EventBus, ViewerEvent};
use crate::lighting::LightingController;

/// Storage key of the preset list
pub const STORAGE_KEY: &str = "charviewer_presets";

/// Default number of presets kept
pub const MAX_PRESETS: usize = 20;

/// Components a preset is read from
#[derive(Clone, Copy)]
pub struct PresetSources<'a> {
    pub effects: &'a EffectStackController,
    pub lighting: &'a LightingController,
    pub camera: &'a CameraAnimator,
}

/// Components a preset is written back to
pub struct PresetTargets<'a> {
    pub effects: &'a mut EffectStackController,
    pub lighting: &'a mut LightingController,
    pub camera: &'a mut CameraAnimator,
}

/// Manages the persisted preset list
pub struct PresetManager {
    store: Box<dyn PresetStore>,
    registry: Arc<EffectRegistry>,
    events: Rc<EventBus>,
    capacity: usize,
}

impl PresetManager {
    pub fn new(store: Box<dyn PresetStore>, registry: Arc<EffectRegistry>, events: Rc<EventBus>, capacity: usize) -> Self {
        Self {
            store,
            registry,
            events,
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Snapshot of the current material, effect stack, lighting, camera and wireframe
    pub fn capture_current_state(sources: PresetSources<'_>) -> Preset {
        let PresetSources { effects, lighting, camera } = sources;
        Preset {
            name: String::new(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            version: PRESET_VERSION,
            material: EffectSnapshot::new(effects.current_material(), effects.material_values().clone()),
            effects: effects
                .stack()
                .active_effects()
                .iter()
                .map(EffectSnapshot::from)
                .collect(),
            lighting: LightingSnapshot {
                preset: lighting.current_preset().to_string(),
                intensities: lighting.intensities(),
            },
            camera: CameraSnapshot {
                mode: camera.mode(),
                speed: camera.speed(),
                fov: camera.fov(),
            },
            scene: SceneSnapshot {
                wireframe: effects.wireframe(),
            },
        }
    }

    /// All stored presets, most recent first.
    ///
    /// Fails closed: unreadable or unparsable storage yields an empty list and
    /// entries that cannot be decoded or migrated are skipped.
    pub fn list(&self) -> Vec<Preset> {
        let raw = match self.store.read(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read presets");
                return Vec::new();
            }
        };

        let values: Vec<Value> = match serde_json::from_str(&raw) {
            Ok(values) => values,
            Err(e) => {
                tracing::warn!(error = %e, "Stored presets are not a JSON list");
                return Vec::new();
            }
        };

        values
            .into_iter()
            .filter_map(|value| match Preset::from_value(value, &self.registry) {
                Ok(preset) => Some(preset),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable preset");
                    None
                }
            })
            .collect()
    }

    fn persist(&mut self, presets: &[Preset]) -> Result<(), PresetError> {
        let json = serde_json::to_string(presets)?;
        self.store.write(STORAGE_KEY, &json)?;
        self.events.emit(ViewerEvent::PresetsChanged { count: presets.len() });
        Ok(())
    }

    /// Capture the current state under `name` and store it first in the list.
    ///
    /// The oldest presets beyond capacity are dropped.
    pub fn save(&mut self, name: &str, sources: PresetSources<'_>) -> Result<Preset, PresetError> {
        let mut presets = self.list();

        let mut preset = Self::capture_current_state(sources);
        preset.name = name.to_string();
        // Timestamps identify presets; keep them unique within the list
        if let Some(newest) = presets.iter().map(|p| p.timestamp).max() {
            if preset.timestamp <= newest {
                preset.timestamp = newest + 1;
            }
        }

        presets.insert(0, preset.clone());
        presets.truncate(self.capacity);
        self.persist(&presets)?;

        tracing::info!(name, timestamp = preset.timestamp, "Preset saved");
        Ok(preset)
    }

    /// Delete the preset with the given timestamp. Returns false if none matched.
    pub fn delete(&mut self, timestamp: i64) -> Result<bool, PresetError> {
        let mut presets = self.list();
        let before = presets.len();
        presets.retain(|p| p.timestamp != timestamp);
        let removed = presets.len() != before;
        self.persist(&presets)?;
        if removed {
            tracing::info!(timestamp, "Preset deleted");
        }
        Ok(removed)
    }

    /// Find a stored preset by timestamp
    pub fn find(&self, timestamp: i64) -> Result<Preset, PresetError> {
        self.list()
            .into_iter()
            .find(|p| p.timestamp == timestamp)
            .ok_or(PresetError::NotFound(timestamp))
    }

    /// Restore a preset.
    ///
    /// The material and the full effect stack are applied first, then
    /// lighting, camera and wireframe. Effects bypass the budget check.
    pub fn apply(&self, preset: &Preset, targets: PresetTargets<'_>) {
        let PresetTargets { effects, lighting, camera } = targets;

        effects.set_full_stack(&preset.material.id, &preset.material.params, &preset.effect_entries());

        lighting.apply_preset(&preset.lighting.preset);
        lighting.set_intensities(preset.lighting.intensities);

        camera.enter_mode(preset.camera.mode);
        camera.set_speed(preset.camera.speed);
        camera.set_fov(preset.camera.fov);

        if preset.scene.wireframe != effects.wireframe() {
            effects.toggle_wireframe();
        }

        tracing::info!(name = %preset.name, "Preset applied");
        self.events.emit(ViewerEvent::PresetApplied {
            name: preset.name.clone(),
        });
    }

    /// Restore the stored preset with the given timestamp
    pub fn apply_stored(&self, timestamp: i64, targets: PresetTargets<'_>) -> Result<Preset, PresetError> {
        let preset = self.find(timestamp)?;
        self.apply(&preset, targets);
        Ok(preset)
    }

    /// Portable JSON for a preset
    pub fn export(&self, preset: &Preset) -> Result<String, PresetError> {
        portable::export_preset(&PortablePreset::from(preset))
    }

    /// Parse portable JSON; nothing is applied
    pub fn import(&self, json: &str) -> Result<PortablePreset, PresetError> {
        portable::import_preset(json).inspect_err(|e| tracing::warn!(error = %e, "Preset import failed"))
    }

    /// Apply material, effects and lighting of an imported preset.
    ///
    /// Camera and wireframe are left untouched.
    pub fn apply_imported(&self, preset: &PortablePreset, targets: PresetTargets<'_>) {
        let PresetTargets { effects, lighting, .. } = targets;

        effects.set_full_stack(&preset.material.id, &preset.material.params, &preset.effect_entries());
        if let Some(snapshot) = &preset.lighting {
            lighting.apply_preset(&snapshot.preset);
            lighting.set_intensities(snapshot.intensities);
        }
        tracing::info!(material = %preset.material.id, effects = preset.effects.len(), "Imported preset applied");
    }
}
