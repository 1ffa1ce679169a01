//! Preset system for saving and restoring visual configurations
//!
//! A preset captures the material, the effect stack, lighting, camera mode
//! and the wireframe flag. Presets are persisted through a `PresetStore`,
//! migrated from legacy versions on read, and can be exported as portable JSON.

mod error;
mod manager;
mod portable;
mod storage;
mod types;

pub use error::{PresetError, StorageError};
pub use manager::{PresetManager, PresetSources, PresetTargets, MAX_PRESETS, STORAGE_KEY};
pub use portable::{export_preset, import_preset, PortablePreset, PORTABLE_FORMAT, PORTABLE_VERSION};
pub use storage::{FileStore, MemoryStore, PresetStore};
pub use types::{CameraSnapshot, EffectSnapshot, LightingSnapshot, Preset, SceneSnapshot, PRESET_VERSION};
