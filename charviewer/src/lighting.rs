//! Lighting controller
//!
//! Owns the active lighting preset and the intensities of the five scene
//! lights. Applying a preset sets every intensity plus the key, fill and rim
//! positions.

use std::rc::Rc;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::events::{EventBus, ViewerEvent};

/// Preset applied at startup
pub const DEFAULT_LIGHTING_PRESET: &str = "3-point";

/// One of the five scene lights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightRole {
    Key,
    Fill,
    Rim,
    Ambient,
    Hemi,
}

impl LightRole {
    pub fn all() -> &'static [LightRole] {
        &[
            LightRole::Key,
            LightRole::Fill,
            LightRole::Rim,
            LightRole::Ambient,
            LightRole::Hemi,
        ]
    }
}

/// Intensities of the five scene lights
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightIntensities {
    pub key: f32,
    pub fill: f32,
    pub rim: f32,
    pub ambient: f32,
    pub hemi: f32,
}

impl LightIntensities {
    pub fn get(&self, role: LightRole) -> f32 {
        match role {
            LightRole::Key => self.key,
            LightRole::Fill => self.fill,
            LightRole::Rim => self.rim,
            LightRole::Ambient => self.ambient,
            LightRole::Hemi => self.hemi,
        }
    }

    pub fn set(&mut self, role: LightRole, value: f32) {
        let slot = match role {
            LightRole::Key => &mut self.key,
            LightRole::Fill => &mut self.fill,
            LightRole::Rim => &mut self.rim,
            LightRole::Ambient => &mut self.ambient,
            LightRole::Hemi => &mut self.hemi,
        };
        *slot = value;
    }
}

/// Positions of the three directional lights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightPositions {
    pub key: Vec3,
    pub fill: Vec3,
    pub rim: Vec3,
}

/// A named lighting setup
#[derive(Debug, Clone, PartialEq)]
pub struct LightingPreset {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub intensities: LightIntensities,
    pub positions: LightPositions,
}

/// Built-in lighting presets
pub fn lighting_presets() -> Vec<LightingPreset> {
    vec![
        LightingPreset {
            id: "3-point",
            name: "3-Point",
            description: "Classic 3-point lighting (key, fill, rim)",
            intensities: LightIntensities { key: 2.0, fill: 0.5, rim: 0.3, ambient: 0.6, hemi: 0.5 },
            positions: LightPositions {
                key: Vec3::new(3.0, 6.0, 4.0),
                fill: Vec3::new(-3.0, 2.0, -2.0),
                rim: Vec3::new(0.0, 3.0, -5.0),
            },
        },
        LightingPreset {
            id: "studio",
            name: "Studio",
            description: "Bright, even studio lighting",
            intensities: LightIntensities { key: 1.2, fill: 1.0, rim: 0.8, ambient: 0.7, hemi: 0.6 },
            positions: LightPositions {
                key: Vec3::new(0.0, 10.0, 5.0),
                fill: Vec3::new(-8.0, 6.0, 0.0),
                rim: Vec3::new(8.0, 6.0, 0.0),
            },
        },
        LightingPreset {
            id: "dramatic",
            name: "Dramatic",
            description: "High contrast single-source",
            intensities: LightIntensities { key: 3.0, fill: 0.1, rim: 0.2, ambient: 0.1, hemi: 0.2 },
            positions: LightPositions {
                key: Vec3::new(10.0, 12.0, 8.0),
                fill: Vec3::new(-2.0, 2.0, -4.0),
                rim: Vec3::new(-5.0, 4.0, -8.0),
            },
        },
        LightingPreset {
            id: "natural",
            name: "Natural",
            description: "Soft outdoor lighting",
            intensities: LightIntensities { key: 1.4, fill: 0.5, rim: 0.3, ambient: 0.5, hemi: 0.8 },
            positions: LightPositions {
                key: Vec3::new(8.0, 15.0, 10.0),
                fill: Vec3::new(-6.0, 8.0, 6.0),
                rim: Vec3::new(4.0, 6.0, -10.0),
            },
        },
    ]
}

/// Lighting state for the scene
pub struct LightingController {
    presets: Vec<LightingPreset>,
    current_preset: String,
    intensities: LightIntensities,
    positions: LightPositions,
    events: Rc<EventBus>,
}

impl LightingController {
    /// Create a controller with the default preset applied
    pub fn new(events: Rc<EventBus>) -> Self {
        let presets = lighting_presets();
        let default = presets
            .iter()
            .find(|p| p.id == DEFAULT_LIGHTING_PRESET)
            .unwrap_or(&presets[0]);
        let (intensities, positions) = (default.intensities, default.positions);
        Self {
            presets,
            current_preset: DEFAULT_LIGHTING_PRESET.to_string(),
            intensities,
            positions,
            events,
        }
    }

    pub fn presets(&self) -> &[LightingPreset] {
        &self.presets
    }

    pub fn current_preset(&self) -> &str {
        &self.current_preset
    }

    pub fn intensities(&self) -> LightIntensities {
        self.intensities
    }

    pub fn positions(&self) -> LightPositions {
        self.positions
    }

    pub fn intensity(&self, role: LightRole) -> f32 {
        self.intensities.get(role)
    }

    /// Apply a preset by id; unknown ids are ignored
    pub fn apply_preset(&mut self, id: &str) -> bool {
        let Some(preset) = self.presets.iter().find(|p| p.id == id) else {
            tracing::trace!(id, "Ignoring unknown lighting preset");
            return false;
        };
        self.intensities = preset.intensities;
        self.positions = preset.positions;
        self.current_preset = id.to_string();
        tracing::info!(preset = id, "Lighting preset applied");
        self.events.emit(ViewerEvent::LightingChanged { preset: id.to_string() });
        true
    }

    /// Set one light's intensity
    pub fn set_intensity(&mut self, role: LightRole, value: f32) {
        let value = if value.is_finite() { value.max(0.0) } else { 0.0 };
        self.intensities.set(role, value);
        self.events.emit(ViewerEvent::LightIntensityChanged { role, value });
    }

    /// Set all five intensities, notifying once per light
    pub fn set_intensities(&mut self, intensities: LightIntensities) {
        for role in LightRole::all() {
            self.set_intensity(*role, intensities.get(*role));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    fn controller() -> (LightingController, Rc<RefCell<Vec<ViewerEvent>>>) {
        let bus = Rc::new(EventBus::new());
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        bus.subscribe(move |e| sink.borrow_mut().push(e.clone()));
        (LightingController::new(bus), log)
    }

    #[test]
    fn test_default_preset() {
        let (lighting, _) = controller();
        assert_eq!(lighting.current_preset(), "3-point");
        assert_eq!(lighting.intensity(LightRole::Key), 2.0);
        assert_eq!(lighting.positions().rim, Vec3::new(0.0, 3.0, -5.0));
    }

    #[test]
    fn test_apply_preset() {
        let (mut lighting, log) = controller();
        assert!(lighting.apply_preset("dramatic"));
        assert_eq!(lighting.intensity(LightRole::Fill), 0.1);
        assert_eq!(lighting.positions().key, Vec3::new(10.0, 12.0, 8.0));
        assert_eq!(
            log.borrow().as_slice(),
            &[ViewerEvent::LightingChanged { preset: "dramatic".into() }]
        );
    }

    #[test]
    fn test_unknown_preset_ignored() {
        let (mut lighting, log) = controller();
        assert!(!lighting.apply_preset("disco"));
        assert_eq!(lighting.current_preset(), "3-point");
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_set_intensity() {
        let (mut lighting, log) = controller();
        lighting.set_intensity(LightRole::Hemi, 1.3);
        lighting.set_intensity(LightRole::Rim, -2.0);
        assert_eq!(lighting.intensity(LightRole::Hemi), 1.3);
        assert_eq!(lighting.intensity(LightRole::Rim), 0.0);
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn test_intensities_serde() {
        let json = serde_json::to_string(&LightIntensities { key: 1.0, fill: 0.5, rim: 0.25, ambient: 0.0, hemi: 2.0 }).unwrap();
        assert_eq!(json, r#"{"key":1.0,"fill":0.5,"rim":0.25,"ambient":0.0,"hemi":2.0}"#);
    }
}
