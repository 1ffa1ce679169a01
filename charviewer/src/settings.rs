//! Settings management for the character viewer
//!
//! Handles loading/saving of the `settings.xml` document in the user config
//! directory. Missing fields fall back to their defaults and loaded values are
//! clamped to sane ranges.

use quick_xml::de::from_str;
use quick_xml::se::to_string;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::effects::{BudgetPolicy, MAX_BUDGET, MAX_STACK};
use crate::preset::MAX_PRESETS;

/// Viewer configuration (serialized as `<CharviewerSettings>`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename = "CharviewerSettings")]
pub struct ViewerSettings {
    /// Maximum aggregate cost-tier weight of active post-process effects
    #[serde(rename = "maxBudget", default = "default_max_budget")]
    pub max_budget: f32,

    /// Maximum number of simultaneously active post-process effects
    #[serde(rename = "maxStack", default = "default_max_stack")]
    pub max_stack: usize,

    /// Number of saved presets kept before the oldest is evicted
    #[serde(rename = "presetCapacity", default = "default_preset_capacity")]
    pub preset_capacity: usize,

    /// Vertical field of view in degrees, restored by camera reset
    #[serde(rename = "defaultFov", default = "default_fov")]
    pub default_fov: f32,

    /// Procedural camera speed multiplier, restored by camera reset
    #[serde(rename = "defaultCameraSpeed", default = "default_camera_speed")]
    pub default_camera_speed: f32,

    /// Viewport width in pixels
    #[serde(rename = "viewportWidth", default = "default_viewport_width")]
    pub viewport_width: u32,

    /// Viewport height in pixels
    #[serde(rename = "viewportHeight", default = "default_viewport_height")]
    pub viewport_height: u32,

    /// Directory for stored presets (config directory when unset)
    #[serde(rename = "presetsDir", default, skip_serializing_if = "Option::is_none")]
    pub presets_dir: Option<String>,
}

fn default_max_budget() -> f32 {
    MAX_BUDGET
}

fn default_max_stack() -> usize {
    MAX_STACK
}

fn default_preset_capacity() -> usize {
    MAX_PRESETS
}

fn default_fov() -> f32 {
    45.0
}

fn default_camera_speed() -> f32 {
    1.0
}

fn default_viewport_width() -> u32 {
    1920
}

fn default_viewport_height() -> u32 {
    1080
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            max_budget: default_max_budget(),
            max_stack: default_max_stack(),
            preset_capacity: default_preset_capacity(),
            default_fov: default_fov(),
            default_camera_speed: default_camera_speed(),
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            presets_dir: None,
        }
    }
}

impl ViewerSettings {
    /// Clamp every value into its supported range
    pub fn clamp(&mut self) {
        self.max_budget = if self.max_budget.is_finite() {
            self.max_budget.clamp(0.0, 64.0)
        } else {
            default_max_budget()
        };
        self.max_stack = self.max_stack.clamp(1, 32);
        self.preset_capacity = self.preset_capacity.clamp(1, 200);
        self.default_fov = if self.default_fov.is_finite() {
            self.default_fov.clamp(10.0, 120.0)
        } else {
            default_fov()
        };
        self.default_camera_speed = if self.default_camera_speed.is_finite() {
            self.default_camera_speed.clamp(0.0, 10.0)
        } else {
            default_camera_speed()
        };
        self.viewport_width = self.viewport_width.max(1);
        self.viewport_height = self.viewport_height.max(1);
    }

    /// Admission limits for the effect registry
    pub fn budget_policy(&self) -> BudgetPolicy {
        BudgetPolicy {
            max_stack: self.max_stack,
            max_budget: self.max_budget,
        }
    }

    /// Configured presets directory, if any
    pub fn presets_dir(&self) -> Option<PathBuf> {
        self.presets_dir
            .as_deref()
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
    }

    /// Load settings from an XML file
    pub fn load_from_file(path: &Path) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path)?;
        let mut settings: Self = from_str(&contents)?;
        settings.clamp();
        Ok(settings)
    }

    /// Save settings to an XML file
    pub fn save_to_file(&self, path: &Path) -> Result<(), SettingsError> {
        let xml = to_string(self)?;
        let formatted = format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{}", xml);
        fs::write(path, formatted)?;
        Ok(())
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("Charviewer");
            p.push("settings.xml");
            p
        })
    }

    /// Load settings from the config directory, falling back to defaults
    pub fn load_or_default() -> Self {
        let Some(path) = Self::settings_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match Self::load_from_file(&path) {
            Ok(settings) => {
                tracing::debug!(path = %path.display(), "Loaded viewer settings");
                settings
            }
            Err(e) => {
                tracing::warn!("Failed to load settings from {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings to the config directory
    pub fn save(&self) -> Result<(), SettingsError> {
        let path = Self::settings_path().ok_or(SettingsError::NoConfigDir)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        self.save_to_file(&path)
    }
}

/// Settings-related errors
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::DeError),
    #[error("XML write error: {0}")]
    XmlWrite(#[from] quick_xml::SeError),
    #[error("Could not find config directory")]
    NoConfigDir,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = ViewerSettings::default();
        assert_eq!(settings.max_budget, 6.0);
        assert_eq!(settings.max_stack, 6);
        assert_eq!(settings.preset_capacity, 20);
        assert_eq!(settings.default_fov, 45.0);
        assert_eq!(settings.viewport_width, 1920);
        assert_eq!(settings.viewport_height, 1080);
        assert!(settings.presets_dir().is_none());
    }

    #[test]
    fn test_clamping() {
        let mut settings = ViewerSettings {
            max_stack: 0,
            default_fov: 500.0,
            default_camera_speed: f32::NAN,
            viewport_width: 0,
            ..ViewerSettings::default()
        };
        settings.clamp();
        assert_eq!(settings.max_stack, 1);
        assert_eq!(settings.default_fov, 120.0);
        assert_eq!(settings.default_camera_speed, 1.0);
        assert_eq!(settings.viewport_width, 1);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.xml");

        let settings = ViewerSettings {
            max_budget: 8.0,
            max_stack: 4,
            presets_dir: Some("/tmp/presets".into()),
            ..ViewerSettings::default()
        };
        settings.save_to_file(&path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("<?xml"));
        assert!(contents.contains("<CharviewerSettings"));

        let loaded = ViewerSettings::load_from_file(&path).unwrap();
        assert_eq!(loaded, settings);
        assert_eq!(loaded.budget_policy().max_stack, 4);
        assert_eq!(loaded.budget_policy().max_budget, 8.0);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.xml");
        fs::write(
            &path,
            "<CharviewerSettings><maxStack>3</maxStack><defaultFov>5</defaultFov></CharviewerSettings>",
        )
        .unwrap();

        let loaded = ViewerSettings::load_from_file(&path).unwrap();
        assert_eq!(loaded.max_stack, 3);
        assert_eq!(loaded.default_fov, 10.0);
        assert_eq!(loaded.max_budget, 6.0);
        assert_eq!(loaded.viewport_height, 1080);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = ViewerSettings::load_from_file(&dir.path().join("nope.xml"));
        assert!(matches!(missing, Err(SettingsError::Io(_))));

        let path = dir.path().join("bad.xml");
        fs::write(&path, "<CharviewerSettings><maxStack>lots</maxStack></CharviewerSettings>").unwrap();
        assert!(matches!(
            ViewerSettings::load_from_file(&path),
            Err(SettingsError::XmlParse(_))
        ));
    }
}
